// Copyright (c) Asymptotic Labs
// SPDX-License-Identifier: Apache-2.0

//! Alias Resolver
//!
//! Maps fully-qualified source names to pre-existing target declarations.
//! The table is built once per run from the required target modules
//! (witness files of earlier runs) plus the per-declaration `model` hints
//! harvested by the normalizer, and is immutable afterwards.

use interface_model::{QualifiedName, TypeExpr};
use itertools::Itertools;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A required target module together with the source names it translates.
/// This is also the witness format a generation run emits for its own
/// module, so later runs can alias against it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequiredModule {
    /// Target module name to require (e.g. `Coqbase.Bytes`).
    pub name: String,

    /// Source-to-target bindings provided by the module.
    #[serde(default)]
    pub aliases: Vec<AliasBinding>,
}

/// One source-to-target binding.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AliasBinding {
    /// Fully-qualified source name (e.g. `Stdlib.Bytes.t`).
    pub source: QualifiedName,

    /// Target term reference (e.g. `Coqbase.Bytes.t`).
    pub target: String,
}

/// A resolved target reference: the term to emit, and the required module
/// whose directive must precede the first use (if any).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TargetRef {
    pub term: String,
    pub module: Option<String>,
}

/// The immutable per-run alias table.
#[derive(Debug, Clone, Default)]
pub struct AliasTable {
    /// Required module names in require order.
    modules: Vec<String>,
    entries: BTreeMap<QualifiedName, TargetRef>,
}

impl AliasTable {
    /// Build the table. Module bindings are entered first, in module order;
    /// per-declaration hints follow and take precedence on collision. A
    /// hint's owning module is the longest required-module name that
    /// prefixes its target term.
    pub fn build(required: &[RequiredModule], hints: &[(QualifiedName, String)]) -> Self {
        let mut table = AliasTable {
            modules: required.iter().map(|m| m.name.clone()).collect(),
            entries: BTreeMap::new(),
        };
        for module in required {
            for binding in &module.aliases {
                table.entries.insert(
                    binding.source.clone(),
                    TargetRef {
                        term: binding.target.clone(),
                        module: Some(module.name.clone()),
                    },
                );
            }
        }
        for (source, target) in hints {
            let module = table.owner_of(target);
            table.entries.insert(
                source.clone(),
                TargetRef {
                    term: target.clone(),
                    module,
                },
            );
        }
        table
    }

    /// Look up the target reference for a source name.
    pub fn lookup(&self, name: &QualifiedName) -> Option<&TargetRef> {
        self.entries.get(name)
    }

    /// Position of a module in the require order.
    pub fn module_rank(&self, module: &str) -> Option<usize> {
        self.modules.iter().position(|m| m == module)
    }

    /// Required modules whose aliases appear in `ty`, deduplicated, in
    /// order of first appearance.
    pub fn modules_referenced(&self, ty: &TypeExpr) -> Vec<String> {
        let mut modules = Vec::new();
        ty.for_each(|sub| {
            if let TypeExpr::Named { name, .. } = sub {
                if let Some(TargetRef { module: Some(module), .. }) = self.lookup(name) {
                    modules.push(module.clone());
                }
            }
        });
        modules.into_iter().unique().collect()
    }

    /// The longest required-module name that is a dotted prefix of the
    /// target term.
    fn owner_of(&self, target_term: &str) -> Option<String> {
        self.modules
            .iter()
            .filter(|m| {
                target_term
                    .strip_prefix(m.as_str())
                    .is_some_and(|rest| rest.starts_with('.'))
            })
            .max_by_key(|m| m.len())
            .cloned()
    }
}
