//! Reference-range extraction from free-form text.
//!
//! Lab reports write ranges many ways: "70 - 99", "4,0 a 11,0",
//! "Inferior a 8", "Superior a 40", "< 1,0". Pattern order matters — the
//! two-bound form is tried first, then upper-bound-only, then
//! lower-bound-only. This parser is only invoked when explicit numeric
//! min/max fields are absent.

use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::value::normalize_value;

/// Extracted reference bounds. Both `None` when nothing parses.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ReferenceRange {
    pub min: Option<f64>,
    pub max: Option<f64>,
}

static FULL_RANGE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(\d+\.?\d*)\s*[-a]\s*(\d+\.?\d*)").expect("valid range pattern")
});
static UPPER_BOUND: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)(?:até|abaixo de|inferior a|<=|<)\s*(\d+\.?\d*)").expect("valid upper pattern")
});
static LOWER_BOUND: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)(?:acima de|superior a|>=|>)\s*(\d+\.?\d*)").expect("valid lower pattern")
});

/// Extract min/max bounds from free reference text. Never fails.
pub fn parse_reference_range(text: &str) -> ReferenceRange {
    let normalized = normalize_value(text);
    if normalized.is_empty() {
        return ReferenceRange::default();
    }

    if let Some(caps) = FULL_RANGE.captures(&normalized)
        && let (Ok(min), Ok(max)) = (caps[1].parse::<f64>(), caps[2].parse::<f64>())
    {
        return ReferenceRange {
            min: Some(min),
            max: Some(max),
        };
    }

    if let Some(caps) = UPPER_BOUND.captures(&normalized)
        && let Ok(max) = caps[1].parse::<f64>()
    {
        return ReferenceRange {
            min: None,
            max: Some(max),
        };
    }

    if let Some(caps) = LOWER_BOUND.captures(&normalized)
        && let Ok(min) = caps[1].parse::<f64>()
    {
        return ReferenceRange {
            min: Some(min),
            max: None,
        };
    }

    ReferenceRange::default()
}
