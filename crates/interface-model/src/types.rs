// Copyright (c) Asymptotic Labs
// SPDX-License-Identifier: Apache-2.0

//! Source-language type expressions
//!
//! The type grammar of a compiled module interface as delivered by the
//! binary-interface loader. Translation to the target language lives in
//! the backend crate; this module only models and traverses the source
//! side.

use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// A possibly dot-qualified source name (e.g. `t` or `Stdlib.Buffer.t`).
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct QualifiedName {
    segments: Vec<String>,
}

impl QualifiedName {
    /// Create from already-split segments.
    ///
    /// # Panics
    /// Panics if `segments` is empty; a name always has at least one segment.
    pub fn new(segments: Vec<String>) -> Self {
        assert!(!segments.is_empty(), "a qualified name cannot be empty");
        Self { segments }
    }

    /// Create an unqualified (single-segment) name.
    pub fn local(name: impl Into<String>) -> Self {
        Self::new(vec![name.into()])
    }

    /// Split a dotted path into a qualified name.
    pub fn from_dotted(path: &str) -> Self {
        Self::new(path.split('.').map(str::to_string).collect())
    }

    /// The name segments, qualifiers first.
    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    /// The final (unqualified) segment.
    pub fn unqualified(&self) -> &str {
        self.segments.last().expect("non-empty by construction")
    }

    /// Whether this name carries no module qualifier.
    pub fn is_local(&self) -> bool {
        self.segments.len() == 1
    }
}

impl fmt::Display for QualifiedName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.segments.join("."))
    }
}

impl Serialize for QualifiedName {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for QualifiedName {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let path = String::deserialize(deserializer)?;
        if path.is_empty() || path.split('.').any(str::is_empty) {
            return Err(D::Error::custom(format!("malformed qualified name `{path}`")));
        }
        Ok(Self::from_dotted(&path))
    }
}

/// The fixed built-in types of the source language.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BuiltinType {
    Bool,
    Char,
    Int,
    List,
    Seq,
    Option,
    Result,
    String,
    Unit,
    /// The universal (open) exception type.
    Exn,
}

impl BuiltinType {
    /// Identify a built-in by name. The loader normalizes built-ins to their
    /// short names; the `Seq.t` spelling is also accepted.
    pub fn from_name(name: &QualifiedName) -> Option<Self> {
        if name.segments() == ["Seq", "t"] {
            return Some(BuiltinType::Seq);
        }
        if !name.is_local() {
            return None;
        }
        match name.unqualified() {
            "bool" => Some(BuiltinType::Bool),
            "char" => Some(BuiltinType::Char),
            "int" => Some(BuiltinType::Int),
            "list" => Some(BuiltinType::List),
            "seq" => Some(BuiltinType::Seq),
            "option" => Some(BuiltinType::Option),
            "result" => Some(BuiltinType::Result),
            "string" => Some(BuiltinType::String),
            "unit" => Some(BuiltinType::Unit),
            "exn" => Some(BuiltinType::Exn),
            _ => None,
        }
    }

    /// Number of type arguments the built-in expects.
    pub fn arity(self) -> usize {
        match self {
            BuiltinType::List | BuiltinType::Seq | BuiltinType::Option => 1,
            BuiltinType::Result => 2,
            _ => 0,
        }
    }
}

/// A source type expression.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TypeExpr {
    /// Type variable (`'a`), stored without the leading quote.
    Var(String),
    /// Application of a named type to its arguments (`(int, string) result`).
    /// Built-ins appear here under their reserved names.
    Named {
        name: QualifiedName,
        #[serde(default)]
        args: Vec<TypeExpr>,
    },
    /// Tuple type (`int * string`).
    Tuple(Vec<TypeExpr>),
    /// Function type (`int -> string`).
    Arrow {
        domain: Box<TypeExpr>,
        codomain: Box<TypeExpr>,
    },
    /// Polymorphic variant, carried as its tag list. Kept in the grammar so
    /// the translator can report it precisely; never translatable.
    PolyVariant(Vec<String>),
}

impl TypeExpr {
    /// Shorthand for an argument-less named type.
    pub fn named(name: &str) -> Self {
        TypeExpr::Named {
            name: QualifiedName::from_dotted(name),
            args: vec![],
        }
    }

    /// Shorthand for a named type application.
    pub fn apply(name: &str, args: Vec<TypeExpr>) -> Self {
        TypeExpr::Named {
            name: QualifiedName::from_dotted(name),
            args,
        }
    }

    /// Shorthand for a function type.
    pub fn arrow(domain: TypeExpr, codomain: TypeExpr) -> Self {
        TypeExpr::Arrow {
            domain: Box::new(domain),
            codomain: Box::new(codomain),
        }
    }

    /// Split the outer arrow spine into argument types and the result type.
    /// A non-function type has no arguments and is its own result.
    pub fn uncurry(&self) -> (Vec<&TypeExpr>, &TypeExpr) {
        let mut args = Vec::new();
        let mut rest = self;
        while let TypeExpr::Arrow { domain, codomain } = rest {
            args.push(domain.as_ref());
            rest = codomain;
        }
        (args, rest)
    }

    /// Iterate over all sub-expressions in pre-order, including `self`.
    pub fn for_each<'a>(&'a self, mut f: impl FnMut(&'a TypeExpr)) {
        self.for_each_impl(&mut f);
    }

    fn for_each_impl<'a>(&'a self, f: &mut impl FnMut(&'a TypeExpr)) {
        f(self);
        match self {
            TypeExpr::Named { args, .. } => {
                for arg in args {
                    arg.for_each_impl(f);
                }
            }
            TypeExpr::Tuple(items) => {
                for item in items {
                    item.for_each_impl(f);
                }
            }
            TypeExpr::Arrow { domain, codomain } => {
                domain.for_each_impl(f);
                codomain.for_each_impl(f);
            }
            TypeExpr::Var(_) | TypeExpr::PolyVariant(_) => {}
        }
    }

    /// Free type variables in order of first appearance.
    pub fn free_vars(&self) -> Vec<&str> {
        let mut vars: Vec<&str> = Vec::new();
        self.for_each(|ty| {
            if let TypeExpr::Var(v) = ty {
                if !vars.contains(&v.as_str()) {
                    vars.push(v);
                }
            }
        });
        vars
    }
}

/// Precedence levels for source-syntax printing.
const PREC_ARROW: u8 = 0;
const PREC_TUPLE: u8 = 1;
const PREC_APP: u8 = 2;

impl TypeExpr {
    fn fmt_prec(&self, f: &mut fmt::Formatter<'_>, min: u8) -> fmt::Result {
        let prec = match self {
            TypeExpr::Arrow { .. } => PREC_ARROW,
            TypeExpr::Tuple(_) => PREC_TUPLE,
            _ => PREC_APP,
        };
        if prec < min {
            write!(f, "(")?;
        }
        match self {
            TypeExpr::Var(v) => write!(f, "'{v}")?,
            TypeExpr::Named { name, args } => match args.as_slice() {
                [] => write!(f, "{name}")?,
                [arg] => {
                    arg.fmt_prec(f, PREC_APP)?;
                    write!(f, " {name}")?;
                }
                args => {
                    write!(f, "(")?;
                    for (i, arg) in args.iter().enumerate() {
                        if i > 0 {
                            write!(f, ", ")?;
                        }
                        arg.fmt_prec(f, PREC_ARROW)?;
                    }
                    write!(f, ") {name}")?;
                }
            },
            TypeExpr::Tuple(items) => {
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        write!(f, " * ")?;
                    }
                    item.fmt_prec(f, PREC_APP)?;
                }
            }
            TypeExpr::Arrow { domain, codomain } => {
                domain.fmt_prec(f, PREC_TUPLE)?;
                write!(f, " -> ")?;
                codomain.fmt_prec(f, PREC_ARROW)?;
            }
            TypeExpr::PolyVariant(tags) => {
                write!(f, "[ ")?;
                for (i, tag) in tags.iter().enumerate() {
                    if i > 0 {
                        write!(f, " | ")?;
                    }
                    write!(f, "`{tag}")?;
                }
                write!(f, " ]")?;
            }
        }
        if prec < min {
            write!(f, ")")?;
        }
        Ok(())
    }
}

impl fmt::Display for TypeExpr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.fmt_prec(f, PREC_ARROW)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_identification() {
        assert_eq!(
            BuiltinType::from_name(&QualifiedName::local("int")),
            Some(BuiltinType::Int)
        );
        assert_eq!(
            BuiltinType::from_name(&QualifiedName::from_dotted("Seq.t")),
            Some(BuiltinType::Seq)
        );
        assert_eq!(BuiltinType::from_name(&QualifiedName::from_dotted("Stdlib.int")), None);
        assert_eq!(BuiltinType::from_name(&QualifiedName::local("buffer")), None);
    }

    #[test]
    fn test_uncurry_spine() {
        let ty = TypeExpr::arrow(
            TypeExpr::named("int"),
            TypeExpr::arrow(TypeExpr::named("string"), TypeExpr::named("unit")),
        );
        let (args, result) = ty.uncurry();
        assert_eq!(args.len(), 2);
        assert_eq!(*result, TypeExpr::named("unit"));

        let atom = TypeExpr::named("int");
        let (args, result) = atom.uncurry();
        assert!(args.is_empty());
        assert_eq!(*result, TypeExpr::named("int"));
    }

    #[test]
    fn test_free_vars_first_appearance_order() {
        let ty = TypeExpr::arrow(
            TypeExpr::Var("b".to_string()),
            TypeExpr::Tuple(vec![TypeExpr::Var("a".to_string()), TypeExpr::Var("b".to_string())]),
        );
        assert_eq!(ty.free_vars(), vec!["b", "a"]);
    }

    #[test]
    fn test_display_ocaml_syntax() {
        let ty = TypeExpr::arrow(
            TypeExpr::arrow(TypeExpr::named("int"), TypeExpr::named("bool")),
            TypeExpr::apply("list", vec![TypeExpr::named("int")]),
        );
        assert_eq!(ty.to_string(), "(int -> bool) -> int list");

        let result = TypeExpr::apply(
            "result",
            vec![TypeExpr::named("int"), TypeExpr::named("string")],
        );
        assert_eq!(result.to_string(), "(int, string) result");
    }

    #[test]
    fn test_qualified_name_serde() {
        let name: QualifiedName = serde_json::from_str("\"Stdlib.Buffer.t\"").unwrap();
        assert_eq!(name.segments(), ["Stdlib", "Buffer", "t"]);
        assert_eq!(name.unqualified(), "t");
        assert!(serde_json::from_str::<QualifiedName>("\"a..b\"").is_err());
    }
}
