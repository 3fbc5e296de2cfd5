//! Player Registry - Reconciles salary-sheet names with the stats feed
//!
//! Salary sheets are hand-typed and often mangled (dropped suffixes,
//! nicknames, glyphs lost to bad encodings). The registry holds the canonical
//! names published by the stats feed and resolves each dirty name to at most
//! one of them.

pub mod matching;
pub mod registry;
pub mod types;

pub use registry::{resolve, PlayerRegistry};
pub use types::{AliasEntry, AliasTable, MatchKind, Resolution};

/// Placeholder left behind by mis-encoded glyphs in salary sheets
pub const WILDCARD: char = '?';

/// Minimum similarity ratio accepted by the fuzzy fallback
pub const FUZZY_THRESHOLD: f64 = 0.96;
