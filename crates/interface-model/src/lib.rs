// Copyright (c) Asymptotic Labs
// SPDX-License-Identifier: Apache-2.0

//! Source-language model for compiled module interfaces
//!
//! This crate models the source side of the translation pipeline: the raw
//! pre-parsed signature tree, source type expressions, and the Module
//! Normalizer that turns raw items into an ordered declaration list. It
//! knows nothing about the target language - that responsibility belongs
//! to the backend crate.

mod normalize;
mod raw;
mod signature;
mod types;

// Raw signature tree (loader interchange format)
pub use raw::{Attribute, RawItem, RawItemKind, RawSignature};

// Source type expressions
pub use types::{BuiltinType, QualifiedName, TypeExpr};

// Normalized declarations
pub use signature::{
    Constructor, Declaration, ExceptionDecl, Field, TypeBody, TypeDecl, ValueDecl,
};

// Module Normalizer
pub use normalize::{normalize, NormalizeError, NormalizedModule};
