use crate::WILDCARD;
use regex::Regex;

/// Build an anchored pattern where every placeholder glyph matches any single
/// character and everything else matches literally
///
/// Returns `None` when the name carries no placeholder.
pub fn wildcard_pattern(raw_name: &str) -> Option<Regex> {
    if !raw_name.contains(WILDCARD) {
        return None;
    }

    let mut pattern = String::with_capacity(raw_name.len() + 2);
    pattern.push('^');
    for ch in raw_name.chars() {
        if ch == WILDCARD {
            pattern.push('.');
        } else {
            pattern.push_str(&regex::escape(ch.encode_utf8(&mut [0; 4])));
        }
    }
    pattern.push('$');

    Regex::new(&pattern).ok()
}

/// Canonical names of the same length (in characters) that match the
/// placeholder pattern, sorted lexicographically
pub fn wildcard_candidates<'a, I>(raw_name: &str, canonical_names: I) -> Vec<&'a str>
where
    I: IntoIterator<Item = &'a str>,
{
    let Some(pattern) = wildcard_pattern(raw_name) else {
        return Vec::new();
    };
    let length = raw_name.chars().count();

    let mut candidates: Vec<&str> = canonical_names
        .into_iter()
        .filter(|name| name.chars().count() == length && pattern.is_match(name))
        .collect();
    candidates.sort_unstable();
    candidates.dedup();
    candidates
}

/// Similarity ratio in [0, 1]; 1.0 means identical
///
/// Matched characters over the combined length of both names, so one dropped
/// character costs 1 / (|a| + |b|) rather than 1 / max(|a|, |b|).
pub fn similarity(a: &str, b: &str) -> f64 {
    rapidfuzz::fuzz::ratio(a.chars(), b.chars())
}

/// Closest canonical name and its similarity
///
/// Ties on similarity go to the lexicographically smallest name so the answer
/// never depends on iteration order.
pub fn closest_match<'a, I>(raw_name: &str, canonical_names: I) -> Option<(&'a str, f64)>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut best: Option<(&str, f64)> = None;

    for name in canonical_names {
        let score = similarity(raw_name, name);
        best = match best {
            None => Some((name, score)),
            Some((best_name, best_score)) => {
                if score > best_score || (score == best_score && name < best_name) {
                    Some((name, score))
                } else {
                    Some((best_name, best_score))
                }
            }
        };
    }

    best
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pattern_requires_placeholder() {
        assert!(wildcard_pattern("Nikola Jokic").is_none());
        assert!(wildcard_pattern("Nikola Joki?").is_some());
    }

    #[test]
    fn test_pattern_escapes_literal_characters() {
        // The '.' in "Jr." must not act as a wildcard
        let pattern = wildcard_pattern("Kelly Oubre Jr? ").unwrap();
        assert!(pattern.is_match("Kelly Oubre Jr. "));
        let pattern = wildcard_pattern("?. J. Dillon").unwrap();
        assert!(pattern.is_match("A. J. Dillon"));
        assert!(!pattern.is_match("A.xJ. Dillon"));
    }

    #[test]
    fn test_candidates_require_identical_length() {
        let names = ["Alperen Sengun", "Alperen Sengunn"];
        let found = wildcard_candidates("Alperen ?engun", names.iter().copied());
        assert_eq!(found, vec!["Alperen Sengun"]);
    }

    #[test]
    fn test_candidates_handle_multibyte_names() {
        let names = ["Nikola Jokić", "Nikola Jokic"];
        let found = wildcard_candidates("Nikola Joki?", names.iter().copied());
        assert_eq!(found, vec!["Nikola Jokic", "Nikola Jokić"]);
    }

    #[test]
    fn test_similarity_bounds() {
        assert_eq!(similarity("Nic Claxton", "Nic Claxton"), 1.0);
        assert!(similarity("Nic Claxton", "LeBron James") < 0.5);
    }

    #[test]
    fn test_similarity_counts_both_lengths() {
        // 28 / 29 and 26 / 27 matched characters
        assert!((similarity("Kelly Oubre Jr", "Kelly Oubre Jr.") - 28.0 / 29.0).abs() < 1e-9);
        assert!((similarity("Alperen Segun", "Alperen Sengun") - 26.0 / 27.0).abs() < 1e-9);
        assert!((similarity("Nicolas Claxton", "Nic Claxton") - 22.0 / 26.0).abs() < 1e-9);
    }

    #[test]
    fn test_closest_match_tie_break_is_lexicographic() {
        // Both candidates are one substitution away
        let names = ["Jalen Willians", "Jalen Williama"];
        let (name, _) = closest_match("Jalen Williams", names.iter().copied()).unwrap();
        assert_eq!(name, "Jalen Williama");

        let reversed = ["Jalen Williama", "Jalen Willians"];
        let (name, _) = closest_match("Jalen Williams", reversed.iter().copied()).unwrap();
        assert_eq!(name, "Jalen Williama");
    }

    #[test]
    fn test_closest_match_empty_set() {
        assert!(closest_match("Anyone", std::iter::empty()).is_none());
    }
}
