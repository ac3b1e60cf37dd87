// Copyright (c) Asymptotic Labs
// SPDX-License-Identifier: Apache-2.0

//! Vernacular Generator
//!
//! Consumes the ordered declarations of a normalized module and emits the
//! ordered sentence sequence, including derived artifacts: monadic
//! wrappers, the primitive interface inductive, its semantics, and
//! exception proxies. The traversal is a single ordered fold; all
//! once-per-module markers live in explicit accumulator state, and a
//! fatal error aborts the whole run with no partial output.

use crate::aliases::{AliasBinding, AliasTable, RequiredModule};
use crate::features::FeatureSet;
use crate::names;
use crate::registry::{TranslationRegistry, TranslationState};
use crate::target::{
    Binder, Ctor, Definition, Inductive, MatchAnnot, MatchArm, Sentence, TargetTerm, TargetType,
};
use crate::translate::{TranslationError, TypeTranslator};
use interface_model::{Declaration, NormalizedModule, QualifiedName, TypeBody, ValueDecl};
use itertools::Itertools;
use log::{debug, warn};
use std::collections::BTreeSet;
use thiserror::Error;

/// The support prelude supplying `i63`, `seq`, `exn`, the `Inject` class
/// and `io_semantics`. Required unconditionally at the top of the output.
pub const SUPPORT_PRELUDE: &str = "FfiRuntime.Prelude";

/// Fatal generation failures. Translator errors propagate with the
/// declaration added for context.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GenerateError {
    #[error("in declaration `{decl}`: {error}")]
    Translation { decl: String, error: TranslationError },
}

/// The result of one run: the ordered sentences plus the witness other
/// runs can alias against.
#[derive(Debug, Clone)]
pub struct Generation {
    pub sentences: Vec<Sentence>,
    pub witness: RequiredModule,
}

/// One impure value accumulated for the interface inductive.
struct InterfaceEntry {
    /// Escaped value name (becomes the smart constructor definition).
    value: String,
    /// Interface constructor name.
    ctor: String,
    /// Underlying implementation axiom name.
    unsafe_axiom: String,
    type_vars: Vec<String>,
    args: Vec<TargetType>,
    result: TargetType,
}

/// Accumulator state threaded through the generation fold.
struct GenState {
    registry: TranslationRegistry,
    requires_emitted: BTreeSet<String>,
    io_emitted: bool,
    interface: Vec<InterfaceEntry>,
    witness: Vec<AliasBinding>,
}

/// Generate the ordered sentence sequence for a normalized module.
pub fn generate(
    module: &NormalizedModule,
    features: &FeatureSet,
    aliases: &AliasTable,
) -> Result<Generation, GenerateError> {
    let translator = TypeTranslator::new(features, aliases);
    let mut state = GenState {
        registry: TranslationRegistry::new(),
        requires_emitted: BTreeSet::new(),
        io_emitted: false,
        interface: Vec::new(),
        witness: Vec::new(),
    };
    let mut sentences = vec![
        Sentence::Comment(format!(
            "Generated bindings for module {}; do not edit.",
            module.name
        )),
        Sentence::Require { module: SUPPORT_PRELUDE.to_string() },
    ];

    for decl in &module.declarations {
        emit_requires(
            modules_for_decl(decl, features, aliases),
            aliases,
            &mut state,
            &mut sentences,
        );
        match decl {
            Declaration::Type(decl) => {
                let emitted = translator
                    .declare_type(decl, &mut state.registry)
                    .map_err(|error| GenerateError::Translation {
                        decl: decl.name.clone(),
                        error,
                    })?;
                sentences.extend(emitted);
                let recorded = state
                    .registry
                    .status(&QualifiedName::local(decl.name.clone()))
                    .expect("declare_type records every declaration");
                state.witness.push(witness_binding(module, &decl.name, recorded));
            }

            Declaration::Value(decl) => {
                generate_value(decl, module, features, &translator, &mut state, &mut sentences)?;
            }

            Declaration::Exception(decl) => {
                let proxy = names::proxy_type_name(&decl.name);
                let ctor_ty = match &decl.payload {
                    Some(payload) => {
                        let translated = translator
                            .translate_data_type(payload, &state.registry)
                            .map_err(|error| GenerateError::Translation {
                                decl: decl.name.clone(),
                                error,
                            })?;
                        TargetType::arrow(translated, TargetType::reff(&proxy))
                    }
                    None => TargetType::reff(&proxy),
                };
                sentences.push(Sentence::Inductive(Inductive {
                    name: proxy.clone(),
                    params: vec![],
                    arity: TargetType::Sort,
                    ctors: vec![Ctor { name: names::proxy_ctor_name(&decl.name), ty: ctor_ty }],
                }));
                sentences.push(Sentence::Axiom {
                    name: names::inject_name(&decl.name),
                    ty: TargetType::arrow(TargetType::reff(&proxy), TargetType::reff("exn")),
                });
                sentences.push(Sentence::Axiom {
                    name: names::project_name(&decl.name),
                    ty: TargetType::arrow(
                        TargetType::reff("exn"),
                        TargetType::app(
                            TargetType::reff("option"),
                            vec![TargetType::reff(&proxy)],
                        ),
                    ),
                });
                state.witness.push(AliasBinding {
                    source: QualifiedName::new(vec![module.name.clone(), decl.name.clone()]),
                    target: format!("{}.{proxy}", module.name),
                });
            }
        }
    }

    if features.interface() && !state.interface.is_empty() {
        emit_interface(&module.name, features, &state, &mut sentences);
    }

    debug!(
        "generated {} sentences for module {}",
        sentences.len(),
        module.name
    );
    Ok(Generation {
        sentences,
        witness: RequiredModule { name: module.name.clone(), aliases: state.witness },
    })
}

/// Handle one value declaration.
fn generate_value(
    decl: &ValueDecl,
    module: &NormalizedModule,
    features: &FeatureSet,
    translator: &TypeTranslator<'_>,
    state: &mut GenState,
    sentences: &mut Vec<Sentence>,
) -> Result<(), GenerateError> {
    let name = names::escape_ident(&decl.name);

    // An aliased value emits a reference to the existing target term
    // instead of a fresh axiom; its signature is not translated at all.
    if let Some(target) = module_alias(decl, translator) {
        sentences.push(Sentence::Definition(Definition {
            name: name.clone(),
            binders: vec![],
            ret: None,
            body: TargetTerm::reff(target),
        }));
        state.witness.push(AliasBinding {
            source: QualifiedName::new(vec![module.name.clone(), decl.name.clone()]),
            target: format!("{}.{name}", module.name),
        });
        return Ok(());
    }

    // Decided before translation so an untranslatable signature cannot
    // abort a run that would not emit the value anyway.
    if !decl.pure && !features.interface() && !features.simple_io() {
        warn!(
            "skipping impure value `{}`: no effect encoding enabled",
            decl.name
        );
        return Ok(());
    }

    let signature = translator
        .translate_signature(&decl.signature, &state.registry)
        .map_err(|error| GenerateError::Translation { decl: decl.name.clone(), error })?;

    if decl.pure {
        sentences.push(Sentence::Axiom { name: name.clone(), ty: signature.arrow_type() });
    } else if features.interface() {
        let unsafe_axiom = names::unsafe_name(&decl.name);
        if features.simple_io() || features.free_spec() {
            ensure_io_boilerplate(state, sentences);
            sentences.push(Sentence::Axiom {
                name: unsafe_axiom.clone(),
                ty: signature.wrapped_type("IO"),
            });
        }
        state.interface.push(InterfaceEntry {
            value: name.clone(),
            ctor: names::ctor_name(&decl.name),
            unsafe_axiom,
            type_vars: signature.type_vars,
            args: signature.args,
            result: signature.result,
        });
    } else {
        ensure_io_boilerplate(state, sentences);
        sentences.push(Sentence::Axiom { name: name.clone(), ty: signature.wrapped_type("IO") });
    }

    state.witness.push(AliasBinding {
        source: QualifiedName::new(vec![module.name.clone(), decl.name.clone()]),
        target: format!("{}.{name}", module.name),
    });
    Ok(())
}

/// The alias target for a value declaration, if any.
fn module_alias(decl: &ValueDecl, translator: &TypeTranslator<'_>) -> Option<String> {
    translator
        .aliases()
        .lookup(&QualifiedName::local(decl.name.clone()))
        .map(|target| target.term.clone())
}

/// Required modules a declaration's emitted sentences will reference,
/// deduplicated, in order of first appearance. Declarations that emit
/// nothing (aliased types, opaque bodies, skipped impure values) trigger
/// no directives.
fn modules_for_decl(
    decl: &Declaration,
    features: &FeatureSet,
    aliases: &AliasTable,
) -> Vec<String> {
    let own = aliases.lookup(&QualifiedName::local(decl.name().to_string()));
    let mut modules = Vec::new();
    match decl {
        // An aliased type declaration emits nothing; its require fires at
        // the first reference instead. The same holds for bodies the
        // opacity policy never translates.
        Declaration::Type(decl) => {
            if own.is_some() || !features.transparent_types() {
                return vec![];
            }
            match &decl.body {
                TypeBody::Abstract => {}
                TypeBody::Alias(ty) => modules.extend(aliases.modules_referenced(ty)),
                TypeBody::Record(fields) => {
                    for field in fields {
                        modules.extend(aliases.modules_referenced(&field.ty));
                    }
                }
                TypeBody::Variant(ctors) => {
                    for arg in ctors.iter().flat_map(|c| &c.args) {
                        modules.extend(aliases.modules_referenced(arg));
                    }
                }
            }
        }
        // An aliased value's reference definition is itself the first use.
        Declaration::Value(decl) => match own {
            Some(target) => modules.extend(target.module.clone()),
            None => {
                let skipped = !decl.pure && !features.interface() && !features.simple_io();
                if !skipped {
                    modules.extend(aliases.modules_referenced(&decl.signature));
                }
            }
        },
        Declaration::Exception(decl) => {
            if let Some(payload) = &decl.payload {
                modules.extend(aliases.modules_referenced(payload));
            }
        }
    }
    modules.into_iter().unique().collect()
}

/// Emit the require directives not yet seen, in required-module order.
fn emit_requires(
    modules: Vec<String>,
    aliases: &AliasTable,
    state: &mut GenState,
    sentences: &mut Vec<Sentence>,
) {
    let fresh: Vec<String> = modules
        .into_iter()
        .filter(|m| !state.requires_emitted.contains(m))
        .sorted_by_key(|m| aliases.module_rank(m))
        .collect();
    for module in fresh {
        state.requires_emitted.insert(module.clone());
        sentences.push(Sentence::Require { module });
    }
}

/// Emit the once-per-module IO monad boilerplate.
fn ensure_io_boilerplate(state: &mut GenState, sentences: &mut Vec<Sentence>) {
    if state.io_emitted {
        return;
    }
    state.io_emitted = true;
    let io = |ty: TargetType| TargetType::app(TargetType::reff("IO"), vec![ty]);
    sentences.push(Sentence::Axiom {
        name: "IO".to_string(),
        ty: TargetType::arrow(TargetType::Sort, TargetType::Sort),
    });
    sentences.push(Sentence::Axiom {
        name: "io_pure".to_string(),
        ty: TargetType::forall(
            vec![Binder::implicit("a", TargetType::Sort)],
            TargetType::arrow(TargetType::var("a"), io(TargetType::var("a"))),
        ),
    });
    sentences.push(Sentence::Axiom {
        name: "io_bind".to_string(),
        ty: TargetType::forall(
            vec![
                Binder::implicit("a", TargetType::Sort),
                Binder::implicit("b", TargetType::Sort),
            ],
            TargetType::arrows(
                vec![
                    io(TargetType::var("a")),
                    TargetType::arrow(TargetType::var("a"), io(TargetType::var("b"))),
                ],
                io(TargetType::var("b")),
            ),
        ),
    });
}

/// Emit the interface inductive, its smart constructors, and (under
/// FreeSpec) the per-module semantics.
fn emit_interface(
    module_name: &str,
    features: &FeatureSet,
    state: &GenState,
    sentences: &mut Vec<Sentence>,
) {
    let iface = names::interface_name(module_name);

    let ctors = state
        .interface
        .iter()
        .map(|entry| Ctor {
            name: entry.ctor.clone(),
            ty: TargetType::forall(
                entry
                    .type_vars
                    .iter()
                    .map(|v| Binder::implicit(v.clone(), TargetType::Sort))
                    .collect(),
                TargetType::arrows(
                    entry.args.clone(),
                    TargetType::app(TargetType::reff(&iface), vec![entry.result.clone()]),
                ),
            ),
        })
        .collect();
    sentences.push(Sentence::Inductive(Inductive {
        name: iface.clone(),
        params: vec![],
        arity: TargetType::arrow(TargetType::Sort, TargetType::Sort),
        ctors,
    }));

    for entry in &state.interface {
        let arg_names: Vec<String> = (0..entry.args.len()).map(|i| format!("x{i}")).collect();
        let mut binders = vec![
            Binder::implicit("m", TargetType::arrow(TargetType::Sort, TargetType::Sort)),
            Binder::Class(TargetType::app(
                TargetType::reff("Inject"),
                vec![TargetType::reff(&iface), TargetType::var("m")],
            )),
        ];
        binders.extend(
            entry
                .type_vars
                .iter()
                .map(|v| Binder::implicit(v.clone(), TargetType::Sort)),
        );
        binders.extend(
            arg_names
                .iter()
                .zip(&entry.args)
                .map(|(name, ty)| Binder::explicit(name.clone(), ty.clone())),
        );
        sentences.push(Sentence::Definition(Definition {
            name: entry.value.clone(),
            binders,
            ret: Some(TargetType::App(
                Box::new(TargetType::var("m")),
                vec![entry.result.clone()],
            )),
            body: TargetTerm::app(
                TargetTerm::reff("inject"),
                vec![TargetTerm::app(
                    TargetTerm::reff(&entry.ctor),
                    arg_names.iter().map(|n| TargetTerm::reff(n.clone())).collect(),
                )],
            ),
        }));
    }

    if features.free_spec() {
        let arms = state
            .interface
            .iter()
            .map(|entry| {
                let binders: Vec<String> =
                    (0..entry.args.len()).map(|i| format!("x{i}")).collect();
                let args = binders.iter().map(|n| TargetTerm::reff(n.clone())).collect();
                MatchArm {
                    ctor: entry.ctor.clone(),
                    binders,
                    body: TargetTerm::app(TargetTerm::reff(&entry.unsafe_axiom), args),
                }
            })
            .collect();
        sentences.push(Sentence::Definition(Definition {
            name: names::semantics_name(module_name),
            binders: vec![],
            ret: Some(TargetType::app(
                TargetType::reff("semantics"),
                vec![TargetType::reff(&iface)],
            )),
            body: TargetTerm::app(
                TargetTerm::reff("io_semantics"),
                vec![TargetTerm::Fun {
                    binders: vec![
                        Binder::explicit("a", TargetType::Sort),
                        Binder::explicit(
                            "e",
                            TargetType::app(
                                TargetType::reff(&iface),
                                vec![TargetType::var("a")],
                            ),
                        ),
                    ],
                    body: Box::new(TargetTerm::Match {
                        scrutinee: "e".to_string(),
                        annot: Some(MatchAnnot {
                            inductive: iface.clone(),
                            binder: "a".to_string(),
                            ret: TargetType::app(
                                TargetType::reff("IO"),
                                vec![TargetType::var("a")],
                            ),
                        }),
                        arms,
                    }),
                }],
            ),
        }));
    }
}

/// The witness binding for a translated type declaration.
fn witness_binding(
    module: &NormalizedModule,
    name: &str,
    state: &TranslationState,
) -> AliasBinding {
    let target = match state {
        TranslationState::Aliased { target } => target.term.clone(),
        other => format!("{}.{}", module.name, other.reference()),
    };
    AliasBinding {
        source: QualifiedName::new(vec![module.name.clone(), name.to_string()]),
        target,
    }
}
