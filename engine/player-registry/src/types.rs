use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

/// Hand-maintained nickname table: salary-sheet spelling -> stats-feed spelling
const DEFAULT_ALIASES: &[(&str, &str)] = &[
    ("Jimmy Butler", "Jimmy Butler III"),
    ("Jayson Tatum", "Jayson Tatum"),
    ("Damian Lillard", "Damian Lillard"),
    ("Tyrese Haliburton", "Tyrese Haliburton"),
    ("Kyrie Irving", "Kyrie Irving"),
    ("Dejounte Murray", "Dejounte Murray"),
    ("Fred VanVleet", "Fred VanVleet"),
    ("Terry Rozier", "Terry Rozier III"),
    ("Trey Murphy III", "Trey Murphy III"),
    ("Scoot Henderson", "Scoot Henderson"),
    ("Alperen ?engn", "Alperen Sengun"),
    ("Cameron Thomas", "Cam Thomas"),
    ("Nicolas Claxton", "Nic Claxton"),
    ("Gregory Jackson", "GG Jackson"),
    ("Kenneth Lofton", "Kenny Lofton Jr."),
    ("Robert Williams", "Robert Williams III"),
    ("Grant Williams", "Grant Williams"),
    ("Max Strus", "Max Strus"),
    ("Kelly Oubre Jr.", "Kelly Oubre Jr."),
    ("Gary Trent Jr.", "Gary Trent Jr."),
    ("Kevin Porter Jr.", "Kevin Porter Jr."),
    ("Xavier Tillman Sr.", "Xavier Tillman"),
];

/// One alias: a known-dirty display name and the canonical name it stands for
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AliasEntry {
    /// Name as it appears in the salary source (e.g., "Nicolas Claxton")
    pub raw: String,

    /// Name as published by the stats feed (e.g., "Nic Claxton")
    pub canonical: String,
}

impl AliasEntry {
    pub fn new(raw: impl Into<String>, canonical: impl Into<String>) -> Self {
        Self { raw: raw.into(), canonical: canonical.into() }
    }

    /// The built-in nickname table
    pub fn defaults() -> Vec<AliasEntry> {
        DEFAULT_ALIASES.iter().map(|(raw, canonical)| AliasEntry::new(*raw, *canonical)).collect()
    }
}

/// Lookup table consulted before any pattern or fuzzy matching
///
/// Later entries override earlier ones with the same raw name, so a table
/// built from the defaults and then extended with user entries lets the user
/// correct a default mapping.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AliasTable {
    entries: HashMap<String, String>,
}

impl AliasTable {
    /// Create an empty table
    pub fn new() -> Self {
        Self::default()
    }

    /// Table pre-filled with the built-in nickname entries
    pub fn with_defaults() -> Self {
        Self::from_entries(AliasEntry::defaults())
    }

    pub fn from_entries<I: IntoIterator<Item = AliasEntry>>(entries: I) -> Self {
        let mut table = Self::new();
        table.extend(entries);
        table
    }

    pub fn insert(&mut self, raw: impl Into<String>, canonical: impl Into<String>) {
        self.entries.insert(raw.into(), canonical.into());
    }

    pub fn extend<I: IntoIterator<Item = AliasEntry>>(&mut self, entries: I) {
        for entry in entries {
            self.entries.insert(entry.raw, entry.canonical);
        }
    }

    /// Canonical spelling recorded for `raw`, if any
    pub fn get(&self, raw: &str) -> Option<&str> {
        self.entries.get(raw).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Which resolution step produced a match
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum MatchKind {
    /// Found in the alias table
    Alias,
    /// Raw name was already canonical
    Exact,
    /// Matched after treating placeholder glyphs as single-character wildcards
    Wildcard,
    /// Closest canonical name above the similarity threshold
    Fuzzy { similarity: f64 },
}

impl fmt::Display for MatchKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MatchKind::Alias => write!(f, "alias"),
            MatchKind::Exact => write!(f, "exact"),
            MatchKind::Wildcard => write!(f, "wildcard"),
            MatchKind::Fuzzy { similarity } => write!(f, "fuzzy ({similarity:.3})"),
        }
    }
}

/// A successfully resolved salary-sheet name
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Resolution {
    pub canonical_name: String,
    pub kind: MatchKind,
}

impl Resolution {
    pub fn new(canonical_name: impl Into<String>, kind: MatchKind) -> Self {
        Self { canonical_name: canonical_name.into(), kind }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_table_contains_known_nicknames() {
        let table = AliasTable::with_defaults();
        assert_eq!(table.get("Jimmy Butler"), Some("Jimmy Butler III"));
        assert_eq!(table.get("Nicolas Claxton"), Some("Nic Claxton"));
        assert_eq!(table.get("Xavier Tillman Sr."), Some("Xavier Tillman"));
        assert_eq!(table.len(), DEFAULT_ALIASES.len());
    }

    #[test]
    fn test_later_entries_override_earlier_ones() {
        let mut table = AliasTable::with_defaults();
        table.extend(vec![AliasEntry::new("Jimmy Butler", "Jimmy Butler Sr.")]);
        assert_eq!(table.get("Jimmy Butler"), Some("Jimmy Butler Sr."));
    }

    #[test]
    fn test_empty_table() {
        let table = AliasTable::new();
        assert!(table.is_empty());
        assert_eq!(table.get("Anyone"), None);
    }

    #[test]
    fn test_match_kind_display() {
        assert_eq!(MatchKind::Alias.to_string(), "alias");
        assert_eq!(MatchKind::Fuzzy { similarity: 0.97 }.to_string(), "fuzzy (0.970)");
    }
}
