// Copyright (c) Asymptotic Labs
// SPDX-License-Identifier: Apache-2.0

//! Type Translator
//!
//! Converts source type expressions to target type expressions. Built-ins
//! map structurally to fixed target equivalents; module-local names go
//! through the translation registry under the opacity policy of the
//! feature set; names present in the alias table short-circuit to their
//! pre-existing target reference. Constructs outside the supported
//! grammar are fatal - no fallback translation is guessed.

use crate::aliases::AliasTable;
use crate::features::FeatureSet;
use crate::names;
use crate::registry::{TranslationRegistry, TranslationState};
use crate::target::{Binder, Ctor, Inductive, RecordDef, Sentence, TargetType};
use interface_model::{BuiltinType, QualifiedName, TypeBody, TypeDecl, TypeExpr};
use thiserror::Error;

/// Fatal translation failures. Errors carry the offending source
/// construct; the generator adds the declaration context.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TranslationError {
    #[error("unsupported type construct `{ty}`")]
    UnsupportedType { ty: TypeExpr },
    #[error("unresolved type name `{name}`")]
    UnresolvedName { name: QualifiedName },
}

/// Where a type expression occurs. Function types are only supported in
/// signature position; nested in a data argument they are fatal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Position {
    /// A value signature or type abbreviation body.
    Signature,
    /// An argument of a type application, a constructor argument, a record
    /// field, or an exception payload.
    DataArgument,
}

/// A translated value signature, arrow spine split.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranslatedSignature {
    /// Type-variable binder names, in order of first appearance.
    pub type_vars: Vec<String>,
    /// Translated argument types.
    pub args: Vec<TargetType>,
    /// Translated result type.
    pub result: TargetType,
}

impl TranslatedSignature {
    fn quantified(&self, result: TargetType) -> TargetType {
        TargetType::forall(
            self.type_vars
                .iter()
                .map(|v| Binder::implicit(v.clone(), TargetType::Sort))
                .collect(),
            TargetType::arrows(self.args.clone(), result),
        )
    }

    /// The plain function type (`forall {a}, T1 -> ... -> R`).
    pub fn arrow_type(&self) -> TargetType {
        self.quantified(self.result.clone())
    }

    /// The function type with the result wrapped in a unary type former
    /// (`forall {a}, T1 -> ... -> IO R`).
    pub fn wrapped_type(&self, wrapper: &str) -> TargetType {
        self.quantified(TargetType::app(
            TargetType::reff(wrapper),
            vec![self.result.clone()],
        ))
    }
}

/// The translator proper: immutable views of the feature set and alias
/// table; all memoization lives in the registry passed per call.
#[derive(Debug, Clone, Copy)]
pub struct TypeTranslator<'env> {
    features: &'env FeatureSet,
    aliases: &'env AliasTable,
}

impl<'env> TypeTranslator<'env> {
    pub fn new(features: &'env FeatureSet, aliases: &'env AliasTable) -> Self {
        Self { features, aliases }
    }

    /// The alias table this translator resolves against.
    pub fn aliases(&self) -> &'env AliasTable {
        self.aliases
    }

    /// Translate a type expression in signature position. Pure: repeated
    /// calls with unchanged registry state yield identical results.
    pub fn translate_type(
        &self,
        ty: &TypeExpr,
        registry: &TranslationRegistry,
    ) -> Result<TargetType, TranslationError> {
        self.translate_expr(ty, registry, Position::Signature)
    }

    /// Translate a type expression in data position (exception payloads).
    pub fn translate_data_type(
        &self,
        ty: &TypeExpr,
        registry: &TranslationRegistry,
    ) -> Result<TargetType, TranslationError> {
        self.translate_expr(ty, registry, Position::DataArgument)
    }

    /// Translate a value signature, splitting the outer arrow spine.
    pub fn translate_signature(
        &self,
        signature: &TypeExpr,
        registry: &TranslationRegistry,
    ) -> Result<TranslatedSignature, TranslationError> {
        let (args, result) = signature.uncurry();
        Ok(TranslatedSignature {
            type_vars: signature.free_vars().iter().map(|v| names::type_var(v)).collect(),
            args: args
                .iter()
                .map(|arg| self.translate_expr(arg, registry, Position::Signature))
                .collect::<Result<_, _>>()?,
            result: self.translate_expr(result, registry, Position::Signature)?,
        })
    }

    pub(crate) fn translate_expr(
        &self,
        ty: &TypeExpr,
        registry: &TranslationRegistry,
        position: Position,
    ) -> Result<TargetType, TranslationError> {
        match ty {
            TypeExpr::Var(v) => Ok(TargetType::var(names::type_var(v))),

            TypeExpr::Tuple(items) => match items.as_slice() {
                [] => Ok(TargetType::reff("unit")),
                [single] => self.translate_expr(single, registry, position),
                items => Ok(TargetType::Prod(
                    items
                        .iter()
                        .map(|item| self.translate_expr(item, registry, position))
                        .collect::<Result<_, _>>()?,
                )),
            },

            TypeExpr::Arrow { domain, codomain } => {
                if position == Position::DataArgument {
                    return Err(TranslationError::UnsupportedType { ty: ty.clone() });
                }
                Ok(TargetType::arrow(
                    self.translate_expr(domain, registry, Position::Signature)?,
                    self.translate_expr(codomain, registry, Position::Signature)?,
                ))
            }

            TypeExpr::PolyVariant(_) => {
                Err(TranslationError::UnsupportedType { ty: ty.clone() })
            }

            TypeExpr::Named { name, args } => {
                // Alias short-circuit bypasses both the opaque and the
                // transparent path.
                if let Some(target) = self.aliases.lookup(name) {
                    let args = self.translate_args(args, registry)?;
                    return Ok(TargetType::app(TargetType::reff(&target.term), args));
                }

                if let Some(builtin) = BuiltinType::from_name(name) {
                    if args.len() != builtin.arity() {
                        return Err(TranslationError::UnsupportedType { ty: ty.clone() });
                    }
                    let args = self.translate_args(args, registry)?;
                    return Ok(builtin_target(builtin, args));
                }

                match registry.status(name) {
                    Some(state) => {
                        let args = self.translate_args(args, registry)?;
                        Ok(TargetType::app(
                            TargetType::reff(state.reference()),
                            args,
                        ))
                    }
                    None => Err(TranslationError::UnresolvedName { name: name.clone() }),
                }
            }
        }
    }

    fn translate_args(
        &self,
        args: &[TypeExpr],
        registry: &TranslationRegistry,
    ) -> Result<Vec<TargetType>, TranslationError> {
        args.iter()
            .map(|arg| self.translate_expr(arg, registry, Position::DataArgument))
            .collect()
    }

    /// Translate a type declaration into its sentences, recording the
    /// result in the registry. A name present in the alias table emits
    /// nothing; later references short-circuit to the aliased term.
    pub fn declare_type(
        &self,
        decl: &TypeDecl,
        registry: &mut TranslationRegistry,
    ) -> Result<Vec<Sentence>, TranslationError> {
        let source = QualifiedName::local(decl.name.clone());
        let target = names::escape_ident(&decl.name);

        if let Some(aliased) = self.aliases.lookup(&source) {
            registry.record(source, TranslationState::Aliased { target: aliased.clone() });
            return Ok(vec![]);
        }

        if !self.features.transparent_types() || decl.body == TypeBody::Abstract {
            let arity = TargetType::arrows(
                decl.params.iter().map(|_| TargetType::Sort).collect(),
                TargetType::Sort,
            );
            registry.record(source, TranslationState::Opaque { axiom: target.clone() });
            return Ok(vec![Sentence::Axiom { name: target, ty: arity }]);
        }

        let params: Vec<Binder> = decl
            .params
            .iter()
            .map(|p| Binder::explicit(names::type_var(p), TargetType::Sort))
            .collect();

        match &decl.body {
            TypeBody::Abstract => unreachable!("handled by the opaque path"),

            TypeBody::Alias(referent) => {
                let body = self.translate_expr(referent, registry, Position::Signature)?;
                registry.record(source, TranslationState::Transparent { target: target.clone() });
                Ok(vec![Sentence::TypeAbbrev { name: target, params, body }])
            }

            TypeBody::Record(fields) => {
                // Registered up front so field types may mention the record.
                registry.record(
                    source,
                    TranslationState::Transparent { target: target.clone() },
                );
                let fields = fields
                    .iter()
                    .map(|field| {
                        let ty =
                            self.translate_expr(&field.ty, registry, Position::DataArgument)?;
                        Ok((names::escape_ident(&field.name), ty))
                    })
                    .collect::<Result<_, TranslationError>>()?;
                Ok(vec![Sentence::Record(RecordDef { name: target, params, fields })])
            }

            TypeBody::Variant(ctors) => {
                // Registered up front so constructors may recurse.
                registry.record(
                    source,
                    TranslationState::Transparent { target: target.clone() },
                );
                let result = TargetType::app(
                    TargetType::reff(&target),
                    decl.params
                        .iter()
                        .map(|p| TargetType::var(names::type_var(p)))
                        .collect(),
                );
                let ctors = ctors
                    .iter()
                    .map(|ctor| {
                        let args = self.translate_args(&ctor.args, registry)?;
                        Ok(Ctor {
                            name: names::escape_ident(&ctor.name),
                            ty: TargetType::arrows(args, result.clone()),
                        })
                    })
                    .collect::<Result<_, TranslationError>>()?;
                Ok(vec![Sentence::Inductive(Inductive {
                    name: target,
                    params,
                    arity: TargetType::Sort,
                    ctors,
                })])
            }
        }
    }
}

/// Structural mapping of built-ins to their fixed target equivalents.
/// `i63`, `seq` and `exn` come from the support prelude.
fn builtin_target(builtin: BuiltinType, args: Vec<TargetType>) -> TargetType {
    let head = match builtin {
        BuiltinType::Bool => "bool",
        BuiltinType::Char => "ascii",
        BuiltinType::Int => "i63",
        BuiltinType::List => "list",
        BuiltinType::Seq => "seq",
        BuiltinType::Option => "option",
        BuiltinType::Result => "sum",
        BuiltinType::String => "string",
        BuiltinType::Unit => "unit",
        BuiltinType::Exn => "exn",
    };
    TargetType::app(TargetType::reff(head), args)
}
