// Copyright (c) Asymptotic Labs
// SPDX-License-Identifier: Apache-2.0

//! Vernacular generation backend
//!
//! Translates normalized module signatures into ordered sequences of
//! proof-assistant sentences under a configurable feature set: type
//! mapping, effect encoding (pure, monadic, free-interface), exception
//! proxies, and alias resolution against pre-existing target definitions.
//! The source-language model lives in `interface-model`; this crate owns
//! everything target-side.

mod aliases;
mod features;
mod generator;
mod names;
mod registry;
pub mod renderer;
mod target;
mod translate;

// Feature Config
pub use features::{ConfigError, DuplicateSetting, Feature, FeatureSet, FeatureSetting};

// Alias Resolver
pub use aliases::{AliasBinding, AliasTable, RequiredModule, TargetRef};

// Translation registry
pub use registry::{TranslationRegistry, TranslationState};

// Target-language AST
pub use target::{
    Binder, Ctor, Definition, Inductive, MatchAnnot, MatchArm, RecordDef, Sentence, TargetTerm,
    TargetType,
};

// Type Translator
pub use translate::{TranslatedSignature, TranslationError, TypeTranslator};

// Vernacular Generator
pub use generator::{generate, GenerateError, Generation, SUPPORT_PRELUDE};
