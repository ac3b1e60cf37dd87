// Copyright (c) Asymptotic Labs
// SPDX-License-Identifier: Apache-2.0

//! Module Normalizer
//!
//! Walks the raw signature tree into an ordered list of typed
//! declarations, attaching purity and alias metadata from source
//! attributes. Every raw item becomes exactly one declaration; anything
//! outside {type, value, exception} aborts the run.

use crate::raw::{RawItemKind, RawSignature};
use crate::signature::{Declaration, ExceptionDecl, TypeDecl, ValueDecl};
use crate::types::QualifiedName;
use log::debug;
use thiserror::Error;

/// A normalized module: ordered declarations plus the alias hints harvested
/// from `model` attributes, keyed by the local declaration name.
#[derive(Debug, Clone)]
pub struct NormalizedModule {
    /// Module name, as in the raw signature.
    pub name: String,

    /// Declarations in source order.
    pub declarations: Vec<Declaration>,

    /// `(source name, target term)` pairs for the alias resolver.
    pub model_hints: Vec<(QualifiedName, String)>,
}

/// Fatal normalization failures.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NormalizeError {
    #[error("unsupported signature item `{keyword} {name}` in module {module}")]
    UnsupportedSignatureItem {
        module: String,
        keyword: &'static str,
        name: String,
    },
}

/// Normalize a raw signature into an ordered declaration list.
///
/// `pure_default` is the PureModule feature value: values without a `pure`
/// attribute inherit it.
pub fn normalize(
    raw: &RawSignature,
    pure_default: bool,
) -> Result<NormalizedModule, NormalizeError> {
    let mut declarations = Vec::with_capacity(raw.items.len());
    let mut model_hints = Vec::new();

    for item in &raw.items {
        if let Some(target) = item.model() {
            model_hints.push((
                QualifiedName::local(item.kind.name()),
                target.to_string(),
            ));
        }

        let decl = match &item.kind {
            RawItemKind::Type { name, params, body } => Declaration::Type(TypeDecl {
                name: name.clone(),
                params: params.clone(),
                body: body.clone(),
            }),
            RawItemKind::Value { name, signature } => Declaration::Value(ValueDecl {
                name: name.clone(),
                signature: signature.clone(),
                pure: item.is_pure() || pure_default,
            }),
            RawItemKind::Exception { name, payload } => Declaration::Exception(ExceptionDecl {
                name: name.clone(),
                payload: payload.clone(),
            }),
            other => {
                return Err(NormalizeError::UnsupportedSignatureItem {
                    module: raw.module.clone(),
                    keyword: other.keyword(),
                    name: other.name().to_string(),
                })
            }
        };
        debug!("normalized {} `{}`", item.kind.keyword(), decl.name());
        declarations.push(decl);
    }

    Ok(NormalizedModule {
        name: raw.module.clone(),
        declarations,
        model_hints,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::raw::{Attribute, RawItem};
    use crate::signature::TypeBody;
    use crate::types::TypeExpr;

    fn value_item(name: &str, attributes: Vec<Attribute>) -> RawItem {
        RawItem {
            kind: RawItemKind::Value {
                name: name.to_string(),
                signature: TypeExpr::arrow(TypeExpr::named("unit"), TypeExpr::named("string")),
            },
            attributes,
        }
    }

    fn signature_of(items: Vec<RawItem>) -> RawSignature {
        RawSignature {
            module: "Console".to_string(),
            items,
        }
    }

    #[test]
    fn test_order_preserved_one_to_one() {
        let raw = signature_of(vec![
            RawItem {
                kind: RawItemKind::Type {
                    name: "t".to_string(),
                    params: vec![],
                    body: TypeBody::Abstract,
                },
                attributes: vec![],
            },
            value_item("read_line", vec![]),
            RawItem {
                kind: RawItemKind::Exception {
                    name: "Eof".to_string(),
                    payload: None,
                },
                attributes: vec![],
            },
        ]);
        let module = normalize(&raw, false).unwrap();
        let names: Vec<&str> = module.declarations.iter().map(|d| d.name()).collect();
        assert_eq!(names, ["t", "read_line", "Eof"]);
    }

    #[test]
    fn test_pure_attribute_overrides_default() {
        let raw = signature_of(vec![
            value_item("pure_one", vec![Attribute::Pure]),
            value_item("plain", vec![]),
        ]);

        let module = normalize(&raw, false).unwrap();
        let pure: Vec<bool> = module
            .declarations
            .iter()
            .map(|d| match d {
                Declaration::Value(v) => v.pure,
                _ => unreachable!(),
            })
            .collect();
        assert_eq!(pure, [true, false]);

        // With PureModule on, the absent attribute inherits true.
        let module = normalize(&raw, true).unwrap();
        let pure: Vec<bool> = module
            .declarations
            .iter()
            .map(|d| match d {
                Declaration::Value(v) => v.pure,
                _ => unreachable!(),
            })
            .collect();
        assert_eq!(pure, [true, true]);
    }

    #[test]
    fn test_model_attribute_becomes_hint() {
        let raw = signature_of(vec![RawItem {
            kind: RawItemKind::Type {
                name: "t".to_string(),
                params: vec![],
                body: TypeBody::Abstract,
            },
            attributes: vec![Attribute::Model("Coqbase.Bytes.t".to_string())],
        }]);
        let module = normalize(&raw, false).unwrap();
        assert_eq!(
            module.model_hints,
            vec![(QualifiedName::local("t"), "Coqbase.Bytes.t".to_string())]
        );
        // The declaration itself still appears, in order.
        assert_eq!(module.declarations.len(), 1);
    }

    #[test]
    fn test_submodule_is_fatal() {
        let raw = signature_of(vec![RawItem {
            kind: RawItemKind::Module {
                name: "Inner".to_string(),
            },
            attributes: vec![],
        }]);
        let err = normalize(&raw, false).unwrap_err();
        assert_eq!(
            err,
            NormalizeError::UnsupportedSignatureItem {
                module: "Console".to_string(),
                keyword: "module",
                name: "Inner".to_string(),
            }
        );
    }
}
