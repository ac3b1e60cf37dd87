// Copyright (c) Asymptotic Labs
// SPDX-License-Identifier: Apache-2.0

//! Naming utilities for the generated vernacular
//!
//! Escaping of identifiers that collide with target reserved words, case
//! conversions, and the derived names of generated artifacts (interface
//! inductive, exception proxies, underlying-implementation axioms).

use once_cell::sync::Lazy;
use std::collections::BTreeSet;

/// Target reserved words an escaped identifier must avoid.
static RESERVED: Lazy<BTreeSet<&'static str>> = Lazy::new(|| {
    BTreeSet::from([
        "as", "at", "cofix", "else", "end", "exists", "fix", "forall", "fun", "if", "in", "let",
        "match", "return", "then", "where", "with", "Prop", "Set", "Type", "SProp",
    ])
});

/// Escape an identifier that collides with a reserved word.
pub fn escape_ident(name: &str) -> String {
    if RESERVED.contains(name) {
        format!("{name}_")
    } else {
        name.to_string()
    }
}

/// Strip the quote convention from a source type variable and escape it.
pub fn type_var(name: &str) -> String {
    escape_ident(name.trim_start_matches('\''))
}

/// Capitalize the first character.
pub fn capitalize_first(name: &str) -> String {
    let mut chars = name.chars();
    match chars.next() {
        None => String::new(),
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
    }
}

/// `read_line` -> `ReadLine`.
pub fn camel_case(name: &str) -> String {
    name.split('_').map(capitalize_first).collect()
}

/// `Overflow` -> `overflow`, `ReadLine` -> `read_line`.
pub fn snake_case(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    for (i, c) in name.chars().enumerate() {
        if c.is_uppercase() {
            if i > 0 {
                out.push('_');
            }
            out.extend(c.to_lowercase());
        } else {
            out.push(c);
        }
    }
    out
}

/// The per-module primitive interface inductive (`Console` -> `CONSOLE`).
pub fn interface_name(module: &str) -> String {
    module.to_uppercase()
}

/// The per-module semantics value (`Console` -> `CONSOLE_semantics`).
pub fn semantics_name(module: &str) -> String {
    format!("{}_semantics", interface_name(module))
}

/// Interface constructor for a value (`read_line` -> `ReadLine`).
pub fn ctor_name(value: &str) -> String {
    camel_case(value)
}

/// Underlying impure implementation axiom (`read_line` -> `unsafe_read_line`).
pub fn unsafe_name(value: &str) -> String {
    format!("unsafe_{value}")
}

/// Exception proxy type (`Overflow` -> `OverflowExn`).
pub fn proxy_type_name(exception: &str) -> String {
    format!("{}Exn", capitalize_first(exception))
}

/// Exception proxy constructor (`Overflow` -> `MakeOverflowExn`).
pub fn proxy_ctor_name(exception: &str) -> String {
    format!("Make{}", proxy_type_name(exception))
}

/// Proxy-to-universal converter (`Overflow` -> `inject_overflow_exn`).
pub fn inject_name(exception: &str) -> String {
    format!("inject_{}_exn", snake_case(exception))
}

/// Universal-to-proxy partial converter (`Overflow` -> `project_overflow_exn`).
pub fn project_name(exception: &str) -> String {
    format!("project_{}_exn", snake_case(exception))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_reserved() {
        assert_eq!(escape_ident("end"), "end_");
        assert_eq!(escape_ident("read_line"), "read_line");
        assert_eq!(type_var("'as"), "as_");
        assert_eq!(type_var("'a"), "a");
    }

    #[test]
    fn test_case_conversions() {
        assert_eq!(camel_case("read_line"), "ReadLine");
        assert_eq!(camel_case("flush"), "Flush");
        assert_eq!(snake_case("OutOfRange"), "out_of_range");
        assert_eq!(snake_case("Overflow"), "overflow");
    }

    #[test]
    fn test_derived_names() {
        assert_eq!(interface_name("Console"), "CONSOLE");
        assert_eq!(semantics_name("Console"), "CONSOLE_semantics");
        assert_eq!(ctor_name("read_line"), "ReadLine");
        assert_eq!(unsafe_name("read_line"), "unsafe_read_line");
        assert_eq!(proxy_type_name("Overflow"), "OverflowExn");
        assert_eq!(proxy_ctor_name("Overflow"), "MakeOverflowExn");
        assert_eq!(inject_name("OutOfRange"), "inject_out_of_range_exn");
        assert_eq!(project_name("Overflow"), "project_overflow_exn");
    }
}
