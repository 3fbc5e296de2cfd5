use crate::matching::{closest_match, wildcard_candidates};
use crate::types::{AliasTable, MatchKind, Resolution};
use crate::FUZZY_THRESHOLD;
use std::collections::BTreeSet;
use tracing::{debug, info};

/// Resolve a salary-sheet name against the canonical stats-feed names
///
/// Steps, first success wins:
/// 1. alias table entry whose target is canonical
/// 2. the raw name itself
/// 3. placeholder glyphs treated as single-character wildcards (same length)
/// 4. closest name by similarity, if it reaches [`FUZZY_THRESHOLD`]
pub fn resolve(
    raw_name: &str,
    canonical_names: &BTreeSet<String>,
    alias_table: &AliasTable,
) -> Option<Resolution> {
    if let Some(target) = alias_table.get(raw_name) {
        if canonical_names.contains(target) {
            return Some(Resolution::new(target, MatchKind::Alias));
        }
    }

    if canonical_names.contains(raw_name) {
        return Some(Resolution::new(raw_name, MatchKind::Exact));
    }

    // Several same-length names can fit the pattern; the set is ordered, so
    // the first candidate is the lexicographically smallest.
    let candidates = wildcard_candidates(raw_name, canonical_names.iter().map(String::as_str));
    if let Some(first) = candidates.first() {
        if candidates.len() > 1 {
            debug!("Wildcard name '{}' is ambiguous, candidates: {:?}", raw_name, candidates);
        }
        return Some(Resolution::new(*first, MatchKind::Wildcard));
    }

    match closest_match(raw_name, canonical_names.iter().map(String::as_str)) {
        Some((name, similarity)) if similarity >= FUZZY_THRESHOLD => {
            Some(Resolution::new(name, MatchKind::Fuzzy { similarity }))
        }
        _ => None,
    }
}

/// Player Registry - canonical names from the stats feed plus the alias table
///
/// Built once per run from the stat records and consulted for every salary
/// row. Canonical names are kept ordered so every fallback step is
/// deterministic.
#[derive(Debug, Clone, Default)]
pub struct PlayerRegistry {
    canonical_names: BTreeSet<String>,
    aliases: AliasTable,
}

impl PlayerRegistry {
    /// Create a registry over the given canonical names
    pub fn new<I, S>(canonical_names: I, aliases: AliasTable) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let canonical_names: BTreeSet<String> = canonical_names.into_iter().map(Into::into).collect();
        info!(
            "Player registry holds {} canonical names and {} aliases",
            canonical_names.len(),
            aliases.len()
        );
        Self { canonical_names, aliases }
    }

    /// Resolve one salary-sheet name
    pub fn resolve(&self, raw_name: &str) -> Option<Resolution> {
        let resolution = resolve(raw_name, &self.canonical_names, &self.aliases);
        match &resolution {
            Some(found) if found.kind != MatchKind::Exact => {
                debug!("Repaired '{}' -> '{}' ({})", raw_name, found.canonical_name, found.kind);
            }
            Some(_) => {}
            None => debug!("No canonical name for '{}'", raw_name),
        }
        resolution
    }

    pub fn contains(&self, name: &str) -> bool {
        self.canonical_names.contains(name)
    }

    pub fn canonical_names(&self) -> impl Iterator<Item = &str> {
        self.canonical_names.iter().map(String::as_str)
    }

    pub fn aliases(&self) -> &AliasTable {
        &self.aliases
    }

    pub fn len(&self) -> usize {
        self.canonical_names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.canonical_names.is_empty()
    }
}
