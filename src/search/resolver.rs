//! Resolution of user-typed item names to canonical table keys.
//!
//! Strategies run from cheapest and strictest to most permissive:
//! 1. exact match on the normalized query (hash lookup)
//! 2. case-insensitive substring search over all known names
//! 3. fuzzy matching on normalized Levenshtein similarity
//!
//! When a strategy yields several candidates, the best-attested item (most
//! admitted reviews) wins; ties go to the earliest candidate.

use regex::RegexBuilder;
use serde::{Deserialize, Serialize};

use crate::embedding::OccurrenceIndex;

/// Default similarity cutoff for fuzzy candidates.
pub const DEFAULT_FUZZY_CUTOFF: f64 = 0.6;

/// Default number of fuzzy candidates kept.
pub const DEFAULT_FUZZY_CANDIDATES: usize = 3;

/// Which strategy produced a resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchStrategy {
    Exact,
    Substring,
    Fuzzy,
}

/// Outcome of a successful name resolution.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Resolution {
    /// Canonical name as stored in the embedding table.
    pub name: String,
    pub strategy: MatchStrategy,
    /// How many candidates the winning strategy produced.
    pub candidates: usize,
}

/// Fuzzy matching knobs.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ResolverConfig {
    /// Minimum normalized Levenshtein similarity, in [0, 1].
    pub cutoff: f64,
    /// Maximum number of fuzzy candidates, best first.
    pub max_candidates: usize,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            cutoff: DEFAULT_FUZZY_CUTOFF,
            max_candidates: DEFAULT_FUZZY_CANDIDATES,
        }
    }
}

/// Resolves names against the items of one built pipeline.
#[derive(Debug, Clone, Copy)]
pub struct NameResolver<'a> {
    index: &'a OccurrenceIndex,
    config: ResolverConfig,
}

impl<'a> NameResolver<'a> {
    pub fn new(index: &'a OccurrenceIndex, config: ResolverConfig) -> Self {
        Self { index, config }
    }

    /// Resolves `query` to a canonical name, or `None` when nothing matches.
    pub fn resolve(&self, query: &str) -> Option<Resolution> {
        let query = query.trim().to_lowercase();
        if query.is_empty() {
            return None;
        }

        if self.index.contains(&query) {
            return Some(Resolution {
                name: query,
                strategy: MatchStrategy::Exact,
                candidates: 1,
            });
        }

        tracing::debug!("'{query}' is not a known name, trying substring search");
        let (strategy, candidates) = match self.substring_matches(&query) {
            matches if !matches.is_empty() => (MatchStrategy::Substring, matches),
            _ => {
                tracing::debug!("no substring match for '{query}', trying fuzzy match");
                (MatchStrategy::Fuzzy, self.fuzzy_matches(&query))
            }
        };

        let Some(name) = self.best_attested(&candidates) else {
            tracing::debug!("could not find a suitable match for '{query}'");
            return None;
        };

        tracing::info!("resolved '{query}' to '{name}' ({strategy:?}, {} candidates)", candidates.len());
        Some(Resolution {
            name: name.to_string(),
            strategy,
            candidates: candidates.len(),
        })
    }

    /// Known names containing `query`, in first-seen order.
    fn substring_matches(&self, query: &str) -> Vec<&'a str> {
        let names = self.index.names().iter().map(String::as_str);

        match RegexBuilder::new(&regex::escape(query))
            .case_insensitive(true)
            .build()
        {
            Ok(pattern) => names.filter(|name| pattern.is_match(name)).collect(),
            Err(e) => {
                tracing::warn!("substring pattern for '{query}' failed to build: {e}");
                let query = query.to_lowercase();
                names
                    .filter(|name| name.to_lowercase().contains(&query))
                    .collect()
            }
        }
    }

    /// Closest names by normalized Levenshtein similarity, best first.
    fn fuzzy_matches(&self, query: &str) -> Vec<&'a str> {
        let mut scored: Vec<(f64, &'a str)> = self
            .index
            .names()
            .iter()
            .map(|name| (strsim::normalized_levenshtein(query, name), name.as_str()))
            .filter(|(score, _)| *score >= self.config.cutoff)
            .collect();

        // Stable: equal scores keep first-seen order.
        scored.sort_by(|a, b| b.0.total_cmp(&a.0));
        scored.truncate(self.config.max_candidates);
        scored.into_iter().map(|(_, name)| name).collect()
    }

    /// Candidate with the most reviews; the first one wins a tie.
    fn best_attested<'n>(&self, candidates: &[&'n str]) -> Option<&'n str> {
        let mut best: Option<(&'n str, usize)> = None;
        for &name in candidates {
            let count = self.index.count(name);
            if best.is_none_or(|(_, best_count)| count > best_count) {
                best = Some((name, count));
            }
        }
        best.map(|(name, _)| name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn index(names: &[&str]) -> OccurrenceIndex {
        OccurrenceIndex::from_names(names.iter().copied())
    }

    #[test]
    fn test_exact_match_short_circuits() {
        let index = index(&["glenfoo", "glenfoo extra", "glenbar"]);
        let resolver = NameResolver::new(&index, ResolverConfig::default());

        let resolution = resolver.resolve("  GlenFoo ").unwrap();
        assert_eq!(resolution.name, "glenfoo");
        assert_eq!(resolution.strategy, MatchStrategy::Exact);
        assert_eq!(resolution.candidates, 1);
    }

    #[test]
    fn test_substring_prefers_most_reviewed() {
        let index = index(&[
            "caol ila 12",
            "caol ila 18",
            "caol ila 18",
            "caol ila 25",
            "caol ila 18",
        ]);
        let resolver = NameResolver::new(&index, ResolverConfig::default());

        let resolution = resolver.resolve("caol ila").unwrap();
        assert_eq!(resolution.name, "caol ila 18");
        assert_eq!(resolution.strategy, MatchStrategy::Substring);
        assert_eq!(resolution.candidates, 3);
    }

    #[test]
    fn test_substring_tie_goes_to_first_seen() {
        let index = index(&["talisker 18", "talisker 10", "talisker 10", "talisker 18"]);
        let resolver = NameResolver::new(&index, ResolverConfig::default());
        assert_eq!(resolver.resolve("talisker").unwrap().name, "talisker 18");
    }

    #[test]
    fn test_substring_query_is_not_a_regex() {
        let index = index(&["bunnahabhain 12", "bowmore 12 (cask strength)"]);
        let resolver = NameResolver::new(&index, ResolverConfig::default());

        let resolution = resolver.resolve("(cask").unwrap();
        assert_eq!(resolution.name, "bowmore 12 (cask strength)");
        assert!(resolver.resolve("b.*12").is_none());
    }

    #[test]
    fn test_missing_final_letter_resolves() {
        let index = index(&["glenfoo", "glenbar"]);
        let resolver = NameResolver::new(&index, ResolverConfig::default());
        assert_eq!(resolver.resolve("glenfo").unwrap().name, "glenfoo");
    }

    #[test]
    fn test_fuzzy_fallback_picks_closest() {
        let index = index(&["glenfoo", "glenbar"]);
        let resolver = NameResolver::new(&index, ResolverConfig::default());

        let resolution = resolver.resolve("glenfoa").unwrap();
        assert_eq!(resolution.name, "glenfoo");
        assert_eq!(resolution.strategy, MatchStrategy::Fuzzy);
        assert_eq!(resolution.candidates, 1);
    }

    #[test]
    fn test_fuzzy_prefers_attested_among_candidates() {
        let index = index(&["ardbeg 10", "ardbeg 17", "ardbeg 17"]);
        let resolver = NameResolver::new(&index, ResolverConfig::default());

        // Transposition typo: both names are within the cutoff.
        let resolution = resolver.resolve("argbed 10").unwrap();
        assert_eq!(resolution.strategy, MatchStrategy::Fuzzy);
        assert_eq!(resolution.candidates, 2);
        assert_eq!(resolution.name, "ardbeg 17");
    }

    #[test]
    fn test_fuzzy_candidate_limit() {
        let index = index(&["abcd", "abce", "abcf", "abcg"]);
        let config = ResolverConfig {
            cutoff: 0.5,
            max_candidates: 2,
        };
        let resolver = NameResolver::new(&index, config);
        let resolution = resolver.resolve("abcx").unwrap();
        assert_eq!(resolution.candidates, 2);
        assert_eq!(resolution.name, "abcd");
    }

    #[test]
    fn test_unresolved() {
        let index = index(&["glenfoo", "glenbar"]);
        let resolver = NameResolver::new(&index, ResolverConfig::default());
        assert!(resolver.resolve("yamazaki 12").is_none());
        assert!(resolver.resolve("   ").is_none());
    }
}
