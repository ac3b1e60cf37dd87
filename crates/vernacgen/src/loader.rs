//! File handling for the pre-parsed signature tree and witness files.

use anyhow::Context;
use interface_model::RawSignature;
use std::fs;
use std::path::Path;
use vernac_backend::RequiredModule;

/// Load a pre-parsed module signature.
pub fn load_signature(path: &Path) -> anyhow::Result<RawSignature> {
    let data = fs::read_to_string(path)
        .with_context(|| format!("cannot read signature file {}", path.display()))?;
    serde_json::from_str(&data)
        .with_context(|| format!("malformed signature file {}", path.display()))
}

/// Load the witness file of an earlier generation run.
pub fn load_witness(path: &Path) -> anyhow::Result<RequiredModule> {
    let data = fs::read_to_string(path)
        .with_context(|| format!("cannot read witness file {}", path.display()))?;
    serde_json::from_str(&data)
        .with_context(|| format!("malformed witness file {}", path.display()))
}

/// Write this run's witness file.
pub fn write_witness(path: &Path, witness: &RequiredModule) -> anyhow::Result<()> {
    let data = serde_json::to_string_pretty(witness)?;
    fs::write(path, data).with_context(|| format!("cannot write witness file {}", path.display()))
}
