// Copyright (c) Asymptotic Labs
// SPDX-License-Identifier: Apache-2.0

//! Target-language AST
//!
//! Types, terms and vernacular sentences of the generated output. The
//! renderer serializes these; nothing here touches the source language.

/// A target type expression.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TargetType {
    /// The universe of types (`Type`).
    Sort,
    /// A bound type variable.
    Var(String),
    /// A named constant, possibly dot-qualified.
    Ref(String),
    /// Application of a type to arguments.
    App(Box<TargetType>, Vec<TargetType>),
    /// Function type, right-associative.
    Arrow(Box<TargetType>, Box<TargetType>),
    /// Product type (`a * b`), two or more components.
    Prod(Vec<TargetType>),
    /// Universal quantification over type variables.
    Forall {
        binders: Vec<Binder>,
        body: Box<TargetType>,
    },
}

impl TargetType {
    pub fn reff(name: impl Into<String>) -> Self {
        TargetType::Ref(name.into())
    }

    pub fn var(name: impl Into<String>) -> Self {
        TargetType::Var(name.into())
    }

    /// Apply a head type to arguments; no application node for zero args.
    pub fn app(head: TargetType, args: Vec<TargetType>) -> Self {
        if args.is_empty() {
            head
        } else {
            TargetType::App(Box::new(head), args)
        }
    }

    pub fn arrow(domain: TargetType, codomain: TargetType) -> Self {
        TargetType::Arrow(Box::new(domain), Box::new(codomain))
    }

    /// Right-fold argument types into a function type ending in `result`.
    pub fn arrows(args: Vec<TargetType>, result: TargetType) -> Self {
        args.into_iter()
            .rev()
            .fold(result, |acc, arg| TargetType::arrow(arg, acc))
    }

    /// Quantify over type variables; no forall node for zero binders.
    pub fn forall(binders: Vec<Binder>, body: TargetType) -> Self {
        if binders.is_empty() {
            body
        } else {
            TargetType::Forall {
                binders,
                body: Box::new(body),
            }
        }
    }
}

/// A binder as it appears in foralls, lambdas, definitions and inductive
/// parameter lists.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Binder {
    /// `(x : T)`
    Explicit { name: String, ty: TargetType },
    /// `{x : T}`
    Implicit { name: String, ty: TargetType },
    /// `` `{C x} `` - a type-class constraint with an anonymous instance.
    Class(TargetType),
}

impl Binder {
    pub fn explicit(name: impl Into<String>, ty: TargetType) -> Self {
        Binder::Explicit { name: name.into(), ty }
    }

    pub fn implicit(name: impl Into<String>, ty: TargetType) -> Self {
        Binder::Implicit { name: name.into(), ty }
    }
}

/// A target term (definition bodies).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TargetTerm {
    /// A named constant or bound variable.
    Ref(String),
    /// Application.
    App(Box<TargetTerm>, Vec<TargetTerm>),
    /// Lambda abstraction.
    Fun {
        binders: Vec<Binder>,
        body: Box<TargetTerm>,
    },
    /// Dependent case analysis over an inductive scrutinee.
    Match {
        scrutinee: String,
        annot: Option<MatchAnnot>,
        arms: Vec<MatchArm>,
    },
}

impl TargetTerm {
    pub fn reff(name: impl Into<String>) -> Self {
        TargetTerm::Ref(name.into())
    }

    /// Apply a head term to arguments; no application node for zero args.
    pub fn app(head: TargetTerm, args: Vec<TargetTerm>) -> Self {
        if args.is_empty() {
            head
        } else {
            TargetTerm::App(Box::new(head), args)
        }
    }
}

/// The `in ... return ...` annotation of a dependent match.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchAnnot {
    /// Inductive name (`CONSOLE` in `match e in CONSOLE a return IO a`).
    pub inductive: String,
    /// Index binder name (`a`).
    pub binder: String,
    /// Return type, may mention the binder.
    pub ret: TargetType,
}

/// One arm of a match.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchArm {
    pub ctor: String,
    pub binders: Vec<String>,
    pub body: TargetTerm,
}

/// An inductive constructor: name and full type (result included).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ctor {
    pub name: String,
    pub ty: TargetType,
}

/// An inductive definition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Inductive {
    pub name: String,
    /// Uniform parameters (`(a : Type)`).
    pub params: Vec<Binder>,
    /// Arity after the parameters (`Type` or `Type -> Type`).
    pub arity: TargetType,
    pub ctors: Vec<Ctor>,
}

/// A record definition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordDef {
    pub name: String,
    pub params: Vec<Binder>,
    pub fields: Vec<(String, TargetType)>,
}

/// A function or constant definition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Definition {
    pub name: String,
    pub binders: Vec<Binder>,
    pub ret: Option<TargetType>,
    pub body: TargetTerm,
}

/// One vernacular sentence of the generated output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Sentence {
    /// `(* ... *)`
    Comment(String),
    /// `Require Import M.`
    Require { module: String },
    /// `Axiom name : T.`
    Axiom { name: String, ty: TargetType },
    /// `Definition name (params) := T.` - a type abbreviation.
    TypeAbbrev {
        name: String,
        params: Vec<Binder>,
        body: TargetType,
    },
    Inductive(Inductive),
    Record(RecordDef),
    Definition(Definition),
}

impl Sentence {
    /// The name this sentence declares, when it declares one.
    pub fn declared_name(&self) -> Option<&str> {
        match self {
            Sentence::Axiom { name, .. }
            | Sentence::TypeAbbrev { name, .. } => Some(name),
            Sentence::Inductive(ind) => Some(&ind.name),
            Sentence::Record(rec) => Some(&rec.name),
            Sentence::Definition(def) => Some(&def.name),
            Sentence::Comment(_) | Sentence::Require { .. } => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_arrows_fold_right() {
        let ty = TargetType::arrows(
            vec![TargetType::reff("i63"), TargetType::reff("string")],
            TargetType::reff("unit"),
        );
        assert_eq!(
            ty,
            TargetType::arrow(
                TargetType::reff("i63"),
                TargetType::arrow(TargetType::reff("string"), TargetType::reff("unit")),
            )
        );
    }

    #[test]
    fn test_empty_application_collapses() {
        assert_eq!(
            TargetType::app(TargetType::reff("t"), vec![]),
            TargetType::reff("t")
        );
        assert_eq!(
            TargetTerm::app(TargetTerm::reff("f"), vec![]),
            TargetTerm::reff("f")
        );
        assert_eq!(
            TargetType::forall(vec![], TargetType::Sort),
            TargetType::Sort
        );
    }
}
