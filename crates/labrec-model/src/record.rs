//! Record types flowing through the normalization pipeline.
//!
//! A [`CandidateRecord`] is what upstream extraction hands the engine: raw,
//! untrusted text. The engine never mutates it; normalization produces a new
//! [`NormalizedRecord`] or a [`RejectedRecord`]. A record appears in exactly
//! one of the two output lists.

use serde::{Deserialize, Deserializer, Serialize};

use crate::enums::{MatchType, Status};

/// A raw exam record as produced by OCR/LLM extraction.
///
/// Only `name` is required. `status` and `method` are occasionally supplied
/// by the extraction step and only feed the completeness score during
/// deduplication; the engine derives its own status downstream.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CandidateRecord {
    pub name: String,
    /// Raw value text. Upstream emits both JSON strings and JSON numbers;
    /// numbers are accepted and carried as their shortest decimal form.
    #[serde(default, deserialize_with = "string_or_number")]
    pub value: Option<String>,
    #[serde(default)]
    pub unit: Option<String>,
    #[serde(default)]
    pub reference_text: Option<String>,
    #[serde(default)]
    pub reference_min: Option<f64>,
    #[serde(default)]
    pub reference_max: Option<f64>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub method: Option<String>,
}

fn string_or_number<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Text(String),
        Number(f64),
    }

    let raw = Option::<Raw>::deserialize(deserializer)?;
    Ok(raw.map(|value| match value {
        Raw::Text(text) => text,
        Raw::Number(number) => number.to_string(),
    }))
}

/// One biomarker measurement, normalized and resolved against the taxonomy.
///
/// `value` keeps the comparison operator when the source carried one
/// ("<0.5"); `value_numeric` is the operator-stripped numeric form, `None`
/// for qualitative or unparseable values.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NormalizedRecord {
    pub original_name: String,
    pub normalized_name: String,
    pub category: String,
    pub category_order: u32,
    pub biomarker_order: u32,
    pub value: String,
    pub value_numeric: Option<f64>,
    pub unit: String,
    pub reference_min: Option<f64>,
    pub reference_max: Option<f64>,
    pub reference_text: Option<String>,
    pub status: Status,
    pub match_type: MatchType,
    pub confidence: f64,
}

/// A candidate that could not be resolved against the taxonomy.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RejectedRecord {
    pub original_name: String,
    pub reason: String,
    /// Up to three canonical names, best similarity first.
    pub suggestions: Vec<String>,
}

/// Advisory report of one canonical name occurring more than once in a batch.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DuplicateConflict {
    pub biomarker_name: String,
    pub occurrences: usize,
    /// Value strings of the conflicting members, batch order.
    pub values: Vec<String>,
    /// Indices into the processed list.
    pub indices: Vec<usize>,
}

/// Aggregate counters for one validation run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationStats {
    pub total: usize,
    pub processed: usize,
    pub rejected: usize,
    pub duplicates: usize,
    pub exact_matches: usize,
    pub synonym_matches: usize,
    pub fuzzy_matches: usize,
}

/// Terminal output of one reconciliation run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidationResult {
    pub processed: Vec<NormalizedRecord>,
    pub rejected: Vec<RejectedRecord>,
    pub duplicate_conflicts: Vec<DuplicateConflict>,
    pub stats: ValidationStats,
}
