// Copyright (c) Asymptotic Labs
// SPDX-License-Identifier: Apache-2.0

//! Deterministic serialization of the ordered sentence sequence.

mod render;
mod writer;

pub use render::{render_sentence, render_sentences};
pub use writer::{render_to_string, VernacWriter};
