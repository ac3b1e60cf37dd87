// Copyright (c) Asymptotic Labs
// SPDX-License-Identifier: Apache-2.0

//! Raw signature tree
//!
//! The pre-parsed shape of a compiled module interface, exactly as handed
//! over by the external binary-interface loader. No validation happens
//! here; the Module Normalizer turns this into `Declaration`s or fails.

use crate::signature::TypeBody;
use crate::types::TypeExpr;
use serde::{Deserialize, Serialize};

/// A whole pre-parsed module signature.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawSignature {
    /// Module name (e.g. `Console`).
    pub module: String,

    /// Signature items in source order.
    #[serde(default)]
    pub items: Vec<RawItem>,
}

/// One signature item with its attached attributes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawItem {
    #[serde(flatten)]
    pub kind: RawItemKind,

    #[serde(default)]
    pub attributes: Vec<Attribute>,
}

impl RawItem {
    /// Whether a `pure` attribute is present.
    pub fn is_pure(&self) -> bool {
        self.attributes.iter().any(|a| matches!(a, Attribute::Pure))
    }

    /// The target term named by a `model` attribute, if any. With several
    /// model attributes the first one is taken.
    pub fn model(&self) -> Option<&str> {
        self.attributes.iter().find_map(|a| match a {
            Attribute::Model(target) => Some(target.as_str()),
            Attribute::Pure => None,
        })
    }
}

/// The item payload. Only `type`, `value` and `exception` are translatable;
/// the remaining kinds exist so the normalizer can reject them by name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RawItemKind {
    Type {
        name: String,
        #[serde(default)]
        params: Vec<String>,
        #[serde(default)]
        body: TypeBody,
    },
    Value {
        name: String,
        signature: TypeExpr,
    },
    Exception {
        name: String,
        #[serde(default)]
        payload: Option<TypeExpr>,
    },
    /// Nested sub-module. Unsupported: translation is flat.
    Module { name: String },
    /// Module type declaration. Unsupported.
    ModuleType { name: String },
    /// Object-layer class declaration. Unsupported.
    Class { name: String },
}

impl RawItemKind {
    /// The declared name, whatever the kind.
    pub fn name(&self) -> &str {
        match self {
            RawItemKind::Type { name, .. }
            | RawItemKind::Value { name, .. }
            | RawItemKind::Exception { name, .. }
            | RawItemKind::Module { name }
            | RawItemKind::ModuleType { name }
            | RawItemKind::Class { name } => name,
        }
    }

    /// Source-language keyword for this item kind, for diagnostics.
    pub fn keyword(&self) -> &'static str {
        match self {
            RawItemKind::Type { .. } => "type",
            RawItemKind::Value { .. } => "val",
            RawItemKind::Exception { .. } => "exception",
            RawItemKind::Module { .. } => "module",
            RawItemKind::ModuleType { .. } => "module type",
            RawItemKind::Class { .. } => "class",
        }
    }
}

/// An attribute attached to a signature item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Attribute {
    /// Forces purity on a value regardless of the PureModule feature.
    Pure,
    /// Binds the item to a pre-existing target term instead of generating
    /// a fresh axiom or definition.
    Model(String),
}
