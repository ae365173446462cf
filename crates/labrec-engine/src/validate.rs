//! Batch validation: the error boundary of the engine.
//!
//! One candidate in, one [`NormalizedRecord`] or one [`RejectedRecord`]
//! out — never both, never neither. A per-record anomaly (unparseable
//! value, malformed reference text) degrades that record's fields to
//! `None`/indeterminate; it never aborts the rest of the batch.

use labrec_match::{BiomarkerMatch, MatchOutcome, Matcher};
use labrec_model::{
    CandidateRecord, MatchType, NormalizedRecord, TaxonomyIndex, ValidationResult,
    ValidationStats,
};

use crate::dedupe::detect_duplicates;
use crate::reference::{ReferenceRange, parse_reference_range};
use crate::status::classify;
use crate::value::{extract_numeric_value, normalize_unit, normalize_value};

/// Runs the full per-record pipeline over a batch of candidates.
pub struct BatchValidator<'a> {
    matcher: Matcher<'a>,
}

impl<'a> BatchValidator<'a> {
    pub fn new(index: &'a TaxonomyIndex) -> Self {
        Self {
            matcher: Matcher::new(index),
        }
    }

    /// Use a matcher with a non-default threshold.
    pub fn with_matcher(matcher: Matcher<'a>) -> Self {
        Self { matcher }
    }

    /// Normalize, match, classify and reconcile a batch.
    pub fn validate(&self, candidates: &[CandidateRecord]) -> ValidationResult {
        let mut processed = Vec::new();
        let mut rejected = Vec::new();

        for candidate in candidates {
            match self.matcher.find(&candidate.name) {
                MatchOutcome::Matched(matched) => processed.push(enrich(candidate, matched)),
                MatchOutcome::Rejected(rejection) => rejected.push(rejection),
            }
        }

        let duplicate_conflicts = detect_duplicates(&processed);

        let count_of = |match_type: MatchType| {
            processed
                .iter()
                .filter(|record| record.match_type == match_type)
                .count()
        };
        let stats = ValidationStats {
            total: candidates.len(),
            processed: processed.len(),
            rejected: rejected.len(),
            duplicates: duplicate_conflicts.len(),
            exact_matches: count_of(MatchType::Exact),
            synonym_matches: count_of(MatchType::Synonym),
            fuzzy_matches: count_of(MatchType::Fuzzy),
        };

        tracing::debug!(
            total = stats.total,
            processed = stats.processed,
            rejected = stats.rejected,
            duplicates = stats.duplicates,
            "validated candidate batch"
        );

        ValidationResult {
            processed,
            rejected,
            duplicate_conflicts,
            stats,
        }
    }
}

/// Build the normalized record for one matched candidate.
///
/// Explicit numeric reference fields take precedence over free-form
/// reference text; the normalized raw unit takes precedence over the
/// taxonomy entry's declared/inferred unit.
fn enrich(candidate: &CandidateRecord, matched: BiomarkerMatch) -> NormalizedRecord {
    let value = candidate
        .value
        .as_deref()
        .map(normalize_value)
        .unwrap_or_default();
    let value_numeric = extract_numeric_value(&value);

    let unit = candidate
        .unit
        .as_deref()
        .map(normalize_unit)
        .filter(|unit| !unit.is_empty())
        .unwrap_or(matched.unit);

    let range = if candidate.reference_min.is_some() || candidate.reference_max.is_some() {
        ReferenceRange {
            min: candidate.reference_min,
            max: candidate.reference_max,
        }
    } else if let Some(text) = candidate.reference_text.as_deref() {
        parse_reference_range(text)
    } else {
        ReferenceRange::default()
    };

    let status = classify(value_numeric, range.min, range.max);

    NormalizedRecord {
        original_name: candidate.name.clone(),
        normalized_name: matched.normalized_name,
        category: matched.category,
        category_order: matched.category_order,
        biomarker_order: matched.biomarker_order,
        value,
        value_numeric,
        unit,
        reference_min: range.min,
        reference_max: range.max,
        reference_text: candidate.reference_text.clone(),
        status,
        match_type: matched.match_type,
        confidence: matched.confidence,
    }
}
