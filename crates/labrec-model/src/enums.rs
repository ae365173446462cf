use std::fmt;

use serde::{Deserialize, Serialize};

/// Classification of a measurement against its reference range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    Normal,
    Low,
    High,
    /// No numeric value or no reference bounds to compare against.
    Indeterminate,
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            Status::Normal => "normal",
            Status::Low => "low",
            Status::High => "high",
            Status::Indeterminate => "indeterminate",
        };
        f.write_str(text)
    }
}

/// How a candidate name was resolved against the taxonomy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchType {
    /// The normalized name is a canonical taxonomy name.
    Exact,
    /// The normalized name is a registered synonym.
    Synonym,
    /// Accepted on string similarity at or above the matcher threshold.
    Fuzzy,
}

impl fmt::Display for MatchType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            MatchType::Exact => "exact",
            MatchType::Synonym => "synonym",
            MatchType::Fuzzy => "fuzzy",
        };
        f.write_str(text)
    }
}
