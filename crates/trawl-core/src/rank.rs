//! Candidate ranker: successive fuzzy narrowing of the static catalog.
//!
//! Each token narrows the previous result (logical AND). Within one pass an
//! item is scored on its label and on its type; the better key decides its
//! [`MatchRank`]. Results are ordered by rank, then by which key matched
//! (label first), then by position in the original catalog.

use nucleo_matcher::pattern::{AtomKind, CaseMatching, Normalization, Pattern};
use nucleo_matcher::{Config, Matcher, Utf32Str};
use serde::Deserialize;

use crate::types::{DataItem, SearchToken, SelectionSet};

/// How well a token matched a key, worst to best.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchRank {
    /// Characters appear in order, anywhere.
    Fuzzy,
    /// Characters match the initials of the key's words.
    Acronym,
    Contains,
    WordStart,
    StartsWith,
    /// Case-insensitive equality.
    Equal,
    CaseSensitiveEqual,
}

/// Rank the catalog against `tokens`, excluding anything already selected.
///
/// An empty token list returns the catalog minus the selection, in catalog
/// order.
pub fn rank(
    tokens: &[SearchToken],
    catalog: &[DataItem],
    selection: &SelectionSet,
    threshold: MatchRank,
) -> Vec<DataItem> {
    let mut current: Vec<(usize, &DataItem)> = catalog
        .iter()
        .enumerate()
        .filter(|(_, item)| !selection.contains_id(&item.id))
        .collect();

    let mut scorer = Scorer::new();
    for token in tokens {
        let needle = token.text.as_str();
        let mut scored: Vec<(MatchRank, usize, usize, &DataItem)> = current
            .iter()
            .filter_map(|&(pos, item)| {
                let best = [item.label.as_str(), item.field_type.as_str()]
                    .into_iter()
                    .enumerate()
                    .filter_map(|(key, haystack)| {
                        scorer.rank(haystack, needle).map(|r| (r, key))
                    })
                    // best rank wins, lower key index on ties
                    .max_by(|a, b| a.0.cmp(&b.0).then(b.1.cmp(&a.1)))?;
                (best.0 >= threshold).then_some((best.0, best.1, pos, item))
            })
            .collect();

        scored.sort_by(|a, b| b.0.cmp(&a.0).then(a.1.cmp(&b.1)).then(a.2.cmp(&b.2)));
        current = scored.into_iter().map(|(_, _, pos, item)| (pos, item)).collect();

        if current.is_empty() {
            break;
        }
    }

    current.into_iter().map(|(_, item)| item.clone()).collect()
}

/// Rank a single key against a needle. `None` means no match at all.
pub fn match_rank(haystack: &str, needle: &str) -> Option<MatchRank> {
    Scorer::new().rank(haystack, needle)
}

// ---------------------------------------------------------------------------
// Scoring
// ---------------------------------------------------------------------------

/// Reuses the nucleo matcher and its scratch buffer across a ranking pass.
struct Scorer {
    matcher: Matcher,
    buf: Vec<char>,
}

impl Scorer {
    fn new() -> Self {
        Self {
            matcher: Matcher::new(Config::DEFAULT),
            buf: Vec::with_capacity(64),
        }
    }

    fn rank(&mut self, haystack: &str, needle: &str) -> Option<MatchRank> {
        let needle = needle.trim();
        if needle.is_empty() {
            return Some(MatchRank::Contains);
        }
        if haystack == needle {
            return Some(MatchRank::CaseSensitiveEqual);
        }

        let hay = haystack.to_lowercase();
        let pat = needle.to_lowercase();
        if hay == pat {
            return Some(MatchRank::Equal);
        }
        if hay.starts_with(&pat) {
            return Some(MatchRank::StartsWith);
        }
        if hay.contains(&format!(" {pat}")) {
            return Some(MatchRank::WordStart);
        }
        if hay.contains(&pat) {
            return Some(MatchRank::Contains);
        }
        if pat.chars().count() == 1 {
            return None;
        }
        if acronym(&hay).contains(&pat) {
            return Some(MatchRank::Acronym);
        }
        self.fuzzy(haystack, needle).then_some(MatchRank::Fuzzy)
    }

    fn fuzzy(&mut self, haystack: &str, needle: &str) -> bool {
        let pattern = Pattern::new(
            needle,
            CaseMatching::Ignore,
            Normalization::Smart,
            AtomKind::Fuzzy,
        );
        self.buf.clear();
        let utf32 = Utf32Str::new(haystack, &mut self.buf);
        pattern.score(utf32, &mut self.matcher).is_some()
    }
}

/// First letter of every word, split on spaces and dashes.
fn acronym(s: &str) -> String {
    s.split(|c: char| c == ' ' || c == '-')
        .filter_map(|w| w.chars().next())
        .collect()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    fn tok(text: &str) -> SearchToken {
        SearchToken {
            text: text.to_string(),
            inferred_type: None,
            start: 0,
            end: text.len(),
        }
    }

    fn catalog() -> Vec<DataItem> {
        vec![
            DataItem::new("1", "Spain", "flag"),
            DataItem::new("2", "Indonesia", "flag"),
            DataItem::new("3", "IOTC", "rfmo"),
        ]
    }

    fn labels(items: &[DataItem]) -> Vec<&str> {
        items.iter().map(|i| i.label.as_str()).collect()
    }

    #[rstest]
    #[case("IOTC", "IOTC", Some(MatchRank::CaseSensitiveEqual))]
    #[case("IOTC", "iotc", Some(MatchRank::Equal))]
    #[case("Indonesia", "indo", Some(MatchRank::StartsWith))]
    #[case("Sea Breeze", "bree", Some(MatchRank::WordStart))]
    #[case("Indonesia", "nesia", Some(MatchRank::Contains))]
    #[case("Indian Ocean Tuna Commission", "iotc", Some(MatchRank::Acronym))]
    #[case("Indonesia", "idna", Some(MatchRank::Fuzzy))]
    #[case("Spain", "IOTC", None)]
    #[case("Spain", "z", None)]
    fn match_tiers(#[case] haystack: &str, #[case] needle: &str, #[case] expected: Option<MatchRank>) {
        assert_eq!(match_rank(haystack, needle), expected);
    }

    #[test]
    fn no_tokens_returns_catalog_minus_selection() {
        let selection: SelectionSet =
            std::iter::once(DataItem::new("2", "Indonesia", "flag")).collect();
        let out = rank(&[], &catalog(), &selection, MatchRank::Fuzzy);
        assert_eq!(labels(&out), ["Spain", "IOTC"]);
    }

    #[test]
    fn ranked_by_quality_then_catalog_order() {
        let items = vec![
            DataItem::new("a", "Inner Spain", "flag"),
            DataItem::new("b", "Spain", "flag"),
            DataItem::new("c", "Spainland", "flag"),
            DataItem::new("d", "Saint Pierre and Miquelon", "flag"),
        ];
        let out = rank(&[tok("spain")], &items, &SelectionSet::new(), MatchRank::Fuzzy);
        assert_eq!(labels(&out), ["Spain", "Spainland", "Inner Spain", "Saint Pierre and Miquelon"]);
    }

    #[test]
    fn type_key_matches_too() {
        let out = rank(&[tok("rfmo")], &catalog(), &SelectionSet::new(), MatchRank::Fuzzy);
        assert_eq!(labels(&out), ["IOTC"]);
    }

    #[test]
    fn tokens_narrow_with_and_semantics() {
        let out = rank(
            &[tok("flag"), tok("indo")],
            &catalog(),
            &SelectionSet::new(),
            MatchRank::Fuzzy,
        );
        assert_eq!(labels(&out), ["Indonesia"]);
    }

    #[test]
    fn threshold_drops_weak_matches() {
        let out = rank(&[tok("idna")], &catalog(), &SelectionSet::new(), MatchRank::Contains);
        assert!(out.is_empty());
        let out = rank(&[tok("idna")], &catalog(), &SelectionSet::new(), MatchRank::Fuzzy);
        assert_eq!(labels(&out), ["Indonesia"]);
    }
}
