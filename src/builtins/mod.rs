//! # Built-in Functions Registry
//!
//! The fixed, process-wide, read-only registry of native functions spec.md
//! §4.5 requires, organized into thematic categories in the style this
//! workspace's builtin modules already use — one file per category, each
//! exposing a `static ENTRIES: &[Builtin]` table.
//!
//! - [core]: len, print, type, copy, contains, index
//! - [arrays]: push, pop, slice, sort, reverse, range
//! - [maps]: mapKeys, mapValues, mapEntries, map
//! - [convert]: int, float, str, convertable
//! - [help]: help
//!
//! A fixed, process-wide table built directly from named Rust functions,
//! needing no runtime registration step: every entry is a `static` built at
//! compile time, so the whole registry already exists before evaluation
//! begins.

pub mod arrays;
pub mod convert;
pub mod core;
pub mod help;
pub mod maps;

use crate::value::Builtin;

static TABLES: &[&[Builtin]] = &[
    core::ENTRIES,
    arrays::ENTRIES,
    maps::ENTRIES,
    convert::ENTRIES,
    help::ENTRIES,
];

/// Looks up a built-in by name. Returns `None` if nothing is registered
/// under that name; the evaluator then reports an undefined identifier.
pub fn lookup(name: &str) -> Option<&'static Builtin> {
    TABLES.iter().flat_map(|table| table.iter()).find(|b| b.name == name)
}

/// Every registered name, in table order.
pub fn names() -> Vec<&'static str> {
    TABLES.iter().flat_map(|table| table.iter()).map(|b| b.name).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lookup_finds_every_category() {
        assert!(lookup("len").is_some());
        assert!(lookup("push").is_some());
        assert!(lookup("mapKeys").is_some());
        assert!(lookup("int").is_some());
        assert!(lookup("help").is_some());
    }

    #[test]
    fn lookup_returns_none_for_unknown_name() {
        assert!(lookup("definitely_not_a_builtin").is_none());
    }

    #[test]
    fn names_has_no_duplicates() {
        let all = names();
        let unique: std::collections::HashSet<_> = all.iter().collect();
        assert_eq!(all.len(), unique.len());
    }
}
