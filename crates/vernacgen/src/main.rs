use std::path::PathBuf;

use clap::*;
use colored::Colorize;
use interface_model::normalize;
use log::{debug, warn, LevelFilter};
use simplelog::{Config, TermLogger, TerminalMode};
use vernac_backend::renderer::render_sentences;
use vernac_backend::{generate, AliasTable, FeatureSet, FeatureSetting, RequiredModule};

mod loader;

#[derive(Parser)]
#[clap(
    name = env!("CARGO_BIN_NAME"),
    about = "Command-line tool for generating proof-assistant bindings from compiled module interfaces. Reads a pre-parsed signature tree and emits the vernacular declarations mirroring it under the enabled feature set",
    rename_all = "kebab-case",
    author,
    version = env!("CARGO_PKG_VERSION"),
)]
pub struct Args {
    /// Path to the pre-parsed module signature (JSON)
    pub input: PathBuf,

    /// Generation options
    #[clap(flatten)]
    pub generation: GenerationConfig,

    /// Output options
    #[clap(flatten)]
    pub output: OutputConfig,
}

/// Options shaping the generated vernacular
#[derive(clap::Args)]
#[clap(next_help_heading = "Generation Options")]
pub struct GenerationConfig {
    /// Feature toggle, in order of arrival; the first setting per feature
    /// wins (e.g. -f interface -f no-simple-io)
    #[clap(name = "feature", long = "feature", short = 'f')]
    pub features: Vec<String>,

    /// Witness file of a target module to require, in require order
    #[clap(name = "require", long = "require", short = 'r')]
    pub requires: Vec<PathBuf>,
}

/// Options for where results go
#[derive(clap::Args)]
#[clap(next_help_heading = "Output Options")]
pub struct OutputConfig {
    /// Write the vernacular here instead of stdout
    #[clap(name = "output", long, short = 'o')]
    pub output: Option<PathBuf>,

    /// Emit this run's witness file, for later --require
    #[clap(name = "witness", long, short = 'w')]
    pub witness: Option<PathBuf>,

    /// Display detailed generation progress
    #[clap(name = "verbose", long, short = 'v', global = true)]
    pub verbose: bool,
}

fn main() {
    let args = Args::parse();

    let level = if args.output.verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Warn
    };
    let _ = TermLogger::init(level, Config::default(), TerminalMode::Mixed);

    debug!("vernacgen CLI version: {}", env!("CARGO_PKG_VERSION"));

    match execute(&args) {
        Ok(()) => (),
        Err(err) => {
            let err = format!("{:?}", err);
            println!("{}", err.bold().red());
            std::process::exit(1);
        }
    }
}

fn execute(args: &Args) -> anyhow::Result<()> {
    let raw = loader::load_signature(&args.input)?;

    let settings = args
        .generation
        .features
        .iter()
        .map(|setting| setting.parse::<FeatureSetting>())
        .collect::<Result<Vec<_>, _>>()?;
    let (features, duplicates) = FeatureSet::from_settings(&settings)?;
    for duplicate in &duplicates {
        warn!("{duplicate}");
    }

    let requires = args
        .generation
        .requires
        .iter()
        .map(|path| loader::load_witness(path))
        .collect::<anyhow::Result<Vec<RequiredModule>>>()?;

    let module = normalize(&raw, features.pure_module())?;
    let aliases = AliasTable::build(&requires, &module.model_hints);
    let generation = generate(&module, &features, &aliases)?;
    let text = render_sentences(&generation.sentences);

    match &args.output.output {
        Some(path) => {
            std::fs::write(path, text)?;
            println!("✅ {}", path.display());
        }
        None => print!("{text}"),
    }

    if let Some(path) = &args.output.witness {
        loader::write_witness(path, &generation.witness)?;
        debug!("witness written to {}", path.display());
    }

    Ok(())
}
