//! Three-tier biomarker name resolution.
//!
//! Resolution order is load-bearing: exact canonical-name hit, then synonym
//! hit, then fuzzy similarity at or above the threshold. A fuzzy score below
//! the threshold always falls through to a rejection carrying ranked
//! suggestions; the matcher never raises.

use std::cmp::Ordering;

use labrec_model::{MatchType, RejectedRecord, TaxonomyEntry, TaxonomyIndex, normalize_key};

use crate::score::similarity;

/// Minimum similarity (0–100) for a fuzzy match to be accepted.
pub const FUZZY_THRESHOLD: f64 = 85.0;

/// Maximum number of canonical-name suggestions on a rejection.
pub const MAX_SUGGESTIONS: usize = 3;

/// A successfully resolved biomarker name.
#[derive(Debug, Clone)]
pub struct BiomarkerMatch {
    pub normalized_name: String,
    pub category: String,
    pub category_order: u32,
    pub biomarker_order: u32,
    /// Declared unit of the taxonomy entry, or the inferred one.
    pub unit: String,
    pub synonyms: Vec<String>,
    pub confidence: f64,
    pub match_type: MatchType,
    pub original_name: String,
}

/// Every `find` call produces exactly one of these.
#[derive(Debug, Clone)]
pub enum MatchOutcome {
    Matched(BiomarkerMatch),
    Rejected(RejectedRecord),
}

/// Name resolver over a read-only [`TaxonomyIndex`].
#[derive(Debug, Clone)]
pub struct Matcher<'a> {
    index: &'a TaxonomyIndex,
    threshold: f64,
}

impl<'a> Matcher<'a> {
    pub fn new(index: &'a TaxonomyIndex) -> Self {
        Self::with_threshold(index, FUZZY_THRESHOLD)
    }

    pub fn with_threshold(index: &'a TaxonomyIndex, threshold: f64) -> Self {
        Self { index, threshold }
    }

    pub fn index(&self) -> &TaxonomyIndex {
        self.index
    }

    /// Resolve an extracted name against the taxonomy.
    pub fn find(&self, original_name: &str) -> MatchOutcome {
        if original_name.trim().chars().count() < 2 {
            return MatchOutcome::Rejected(RejectedRecord {
                original_name: original_name.to_string(),
                reason: "name too short or empty".to_string(),
                suggestions: Vec::new(),
            });
        }

        let normalized = normalize_key(original_name);

        if let Some(resolved) = self.index.lookup(&normalized) {
            let (confidence, match_type) = if resolved.canonical {
                (1.0, MatchType::Exact)
            } else {
                (0.95, MatchType::Synonym)
            };
            return MatchOutcome::Matched(self.build_match(
                resolved.entry,
                confidence,
                match_type,
                original_name,
            ));
        }

        let mut best: Option<(&str, f64)> = None;
        for key in self.index.keys() {
            let score = similarity(&normalized, key);
            // Strict comparison keeps the first key in lexicographic order
            // on ties, so resolution is deterministic.
            if best.is_none_or(|(_, best_score)| score > best_score) {
                best = Some((key, score));
            }
        }

        if let Some((key, score)) = best
            && score >= self.threshold
            && let Some(entry) = self.index.entry_for_key(key)
        {
            return MatchOutcome::Matched(self.build_match(
                entry,
                score / 100.0,
                MatchType::Fuzzy,
                original_name,
            ));
        }

        let best_score = best.map(|(_, score)| score).unwrap_or(0.0);
        MatchOutcome::Rejected(RejectedRecord {
            original_name: original_name.to_string(),
            reason: format!(
                "biomarker not recognized (best match {best_score:.0}% below the {:.0}% threshold)",
                self.threshold
            ),
            suggestions: self.suggestions(&normalized),
        })
    }

    /// Top canonical names by key similarity, best first.
    ///
    /// Deduplicated so two keys of the same entry do not consume two
    /// suggestion slots.
    pub fn suggestions(&self, normalized: &str) -> Vec<String> {
        let mut scored: Vec<(f64, &str)> = self
            .index
            .keys()
            .map(|key| (similarity(normalized, key), key))
            .collect();
        scored.sort_by(|a, b| {
            b.0.partial_cmp(&a.0)
                .unwrap_or(Ordering::Equal)
                .then_with(|| a.1.cmp(b.1))
        });

        let mut names: Vec<String> = Vec::new();
        for (_, key) in scored {
            let Some(entry) = self.index.entry_for_key(key) else {
                continue;
            };
            if !names.iter().any(|name| name == &entry.name) {
                names.push(entry.name.clone());
            }
            if names.len() == MAX_SUGGESTIONS {
                break;
            }
        }
        names
    }

    fn build_match(
        &self,
        entry: &TaxonomyEntry,
        confidence: f64,
        match_type: MatchType,
        original_name: &str,
    ) -> BiomarkerMatch {
        BiomarkerMatch {
            normalized_name: entry.name.clone(),
            category: entry.category.clone(),
            category_order: entry.category_order,
            biomarker_order: entry.biomarker_order,
            unit: self.index.unit_for(entry),
            synonyms: entry.synonyms.clone(),
            confidence,
            match_type,
            original_name: original_name.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(name: &str, synonyms: &[&str]) -> TaxonomyEntry {
        TaxonomyEntry {
            name: name.to_string(),
            category: "Bioquímica".to_string(),
            category_order: 1,
            biomarker_order: 1,
            synonyms: synonyms.iter().map(ToString::to_string).collect(),
            unit: None,
        }
    }

    fn index() -> TaxonomyIndex {
        TaxonomyIndex::build(vec![
            entry("Glicemia", &["Glicose", "Glicemia de Jejum"]),
            entry("Ferro", &["Fe", "Ferro Sérico"]),
            entry("Ferritina", &[]),
            entry("TSH", &["Hormônio Tireoestimulante"]),
        ])
    }

    fn expect_match(outcome: MatchOutcome) -> BiomarkerMatch {
        match outcome {
            MatchOutcome::Matched(matched) => matched,
            MatchOutcome::Rejected(rejected) => {
                panic!("expected a match, got rejection: {}", rejected.reason)
            }
        }
    }

    fn expect_rejection(outcome: MatchOutcome) -> RejectedRecord {
        match outcome {
            MatchOutcome::Rejected(rejected) => rejected,
            MatchOutcome::Matched(matched) => {
                panic!("expected a rejection, got match: {}", matched.normalized_name)
            }
        }
    }

    #[test]
    fn canonical_name_is_an_exact_match() {
        let index = index();
        let matched = expect_match(Matcher::new(&index).find("Glicemia"));
        assert_eq!(matched.match_type, MatchType::Exact);
        assert_eq!(matched.confidence, 1.0);
        assert_eq!(matched.normalized_name, "Glicemia");
    }

    #[test]
    fn case_and_accents_do_not_break_exactness() {
        let index = index();
        let matched = expect_match(Matcher::new(&index).find("  GLICEMIA  "));
        assert_eq!(matched.match_type, MatchType::Exact);
        assert_eq!(matched.original_name, "  GLICEMIA  ");
    }

    #[test]
    fn synonym_resolves_with_synonym_confidence() {
        let index = index();
        let matched = expect_match(Matcher::new(&index).find("Glicose"));
        assert_eq!(matched.match_type, MatchType::Synonym);
        assert_eq!(matched.confidence, 0.95);
        assert_eq!(matched.normalized_name, "Glicemia");
    }

    #[test]
    fn synonym_resolves_to_its_owner_not_a_similar_entry() {
        // "Fe" is a registered synonym of Ferro; Ferritina is textually
        // close but must not capture it.
        let index = index();
        let matched = expect_match(Matcher::new(&index).find("Fe"));
        assert_eq!(matched.normalized_name, "Ferro");
        assert_eq!(matched.match_type, MatchType::Synonym);
    }

    #[test]
    fn ocr_variant_matches_fuzzily() {
        let index = index();
        let matched = expect_match(Matcher::new(&index).find("Glicemya"));
        assert_eq!(matched.match_type, MatchType::Fuzzy);
        assert!(matched.confidence >= 0.85);
        assert!(matched.confidence < 1.0);
        assert_eq!(matched.normalized_name, "Glicemia");
    }

    #[test]
    fn short_or_empty_names_are_rejected() {
        let index = index();
        let matcher = Matcher::new(&index);

        for name in ["", "a", " x "] {
            let rejected = expect_rejection(matcher.find(name));
            assert_eq!(rejected.reason, "name too short or empty");
            assert!(rejected.suggestions.is_empty());
        }
    }

    #[test]
    fn unknown_name_is_rejected_with_suggestions() {
        let index = index();
        let rejected = expect_rejection(Matcher::new(&index).find("Exame Totalmente Diferente"));
        assert!(rejected.reason.contains("85%"), "reason: {}", rejected.reason);
        assert!(!rejected.suggestions.is_empty());
        assert!(rejected.suggestions.len() <= MAX_SUGGESTIONS);
    }

    #[test]
    fn suggestions_do_not_repeat_an_entry() {
        // "glicemia de jejum" and "glicose" both belong to Glicemia; the
        // suggestion list must not spend two slots on it.
        let index = index();
        let suggestions = Matcher::new(&index).suggestions("glicemia em jejum");
        let glicemia_slots = suggestions.iter().filter(|name| *name == "Glicemia").count();
        assert_eq!(glicemia_slots, 1);
    }

    #[test]
    fn empty_index_rejects_everything() {
        let index = TaxonomyIndex::empty();
        let rejected = expect_rejection(Matcher::new(&index).find("Glicemia"));
        assert!(rejected.suggestions.is_empty());
        assert!(rejected.reason.contains("0%"), "reason: {}", rejected.reason);
    }

    #[test]
    fn below_threshold_falls_through_to_rejection() {
        let index = index();
        // Lower the threshold and the same name matches; at the default it
        // must be rejected rather than silently accepted.
        let lenient = Matcher::with_threshold(&index, 40.0);
        let strict = Matcher::new(&index);

        let name = "Gli";
        assert!(matches!(lenient.find(name), MatchOutcome::Matched(_)));
        assert!(matches!(strict.find(name), MatchOutcome::Rejected(_)));
    }
}
