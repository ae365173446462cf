//! Raw value and unit canonicalization.
//!
//! Brazilian lab reports use comma decimals and composite operator
//! notations ("< 0,5", "1,5 e+03"). Normalization keeps the comparison
//! operator in the string form (it is clinically meaningful) while
//! [`extract_numeric_value`] produces the operator-free numeric form used
//! for reference-range comparison. Every function here is total: bad input
//! degrades to an empty string or `None`, never an error.

use std::sync::LazyLock;

use regex::Regex;

/// Qualitative results reported by Brazilian labs, accented and plain
/// spellings. Matched case-insensitively against trimmed input.
const QUALITATIVE_VALUES: &[&str] = &[
    "negativo",
    "positivo",
    "não reagente",
    "nao reagente",
    "reagente",
    "indetectável",
    "indetectavel",
    "detectável",
    "detectavel",
    "presente",
    "ausente",
    "normal",
    "alterado",
];

static OPERATOR_PREFIX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[<>]=?\s*\d").expect("valid operator prefix pattern"));
static OPERATOR_SPACING: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"([<>]=?)\s+").expect("valid operator spacing pattern"));
static SCIENTIFIC: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^-?\d+\.?\d*\s*e[+-]?\d+$").expect("valid scientific notation pattern")
});
static LEADING_OPERATOR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[<>]=?\s*").expect("valid leading operator pattern"));
static TRAILING_UNIT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[A-Za-zµ/%]+$").expect("valid trailing unit pattern"));

/// Whether a value is one of the known qualitative results.
pub fn is_qualitative(text: &str) -> bool {
    QUALITATIVE_VALUES.contains(&text.trim().to_lowercase().as_str())
}

/// Canonicalize a raw value string.
///
/// Qualitative results come back lowercased and otherwise unchanged.
/// Quantitative text gets comma→period decimal conversion, operator
/// whitespace collapsed ("< 0,5" → "<0.5") and scientific-notation spaces
/// removed ("1.5 e+03" → "1.5e+03").
pub fn normalize_value(raw: &str) -> String {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return String::new();
    }

    let lowered = trimmed.to_lowercase();
    if QUALITATIVE_VALUES.contains(&lowered.as_str()) {
        return lowered;
    }

    let mut text = trimmed.replace(',', ".");
    if OPERATOR_PREFIX.is_match(&text) {
        text = OPERATOR_SPACING.replace_all(&text, "$1").into_owned();
    }
    if SCIENTIFIC.is_match(&text) {
        text.retain(|ch| ch != ' ');
    }
    text
}

/// Numeric form of a value, operator stripped.
///
/// `None` for qualitative results and anything that does not parse. Callers
/// needing the operator must read it from the normalized string form.
pub fn extract_numeric_value(raw: &str) -> Option<f64> {
    let text = normalize_value(raw);
    if text.is_empty() || QUALITATIVE_VALUES.contains(&text.as_str()) {
        return None;
    }

    let text = LEADING_OPERATOR.replace(&text, "");
    let text = TRAILING_UNIT.replace(&text, "");
    let text = text.trim();
    if text.is_empty() {
        return None;
    }
    text.parse::<f64>().ok()
}

/// Canonical spelling for common lab units; unmapped input is returned
/// trimmed.
pub fn normalize_unit(raw: &str) -> String {
    let trimmed = raw.trim();
    let canonical = match trimmed.to_lowercase().as_str() {
        "mg/dl" => "mg/dL",
        "g/dl" => "g/dL",
        "ui/ml" => "UI/mL",
        "uui/ml" | "µui/ml" => "µUI/mL",
        "mui/ml" => "mUI/mL",
        "ng/ml" => "ng/mL",
        "pg/ml" => "pg/mL",
        "ug/dl" | "µg/dl" => "µg/dL",
        "ng/dl" => "ng/dL",
        "u/l" => "U/L",
        "/mm3" => "/mm³",
        "meq/l" => "mEq/L",
        "mmol/l" => "mmol/L",
        _ => return trimmed.to_string(),
    };
    canonical.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn comma_decimal_becomes_period() {
        assert_eq!(normalize_value("2,90"), "2.90");
        assert_eq!(extract_numeric_value("2,90"), Some(2.90));
    }

    #[test]
    fn operator_is_kept_in_string_form_only() {
        assert_eq!(normalize_value("< 0,5"), "<0.5");
        assert_eq!(normalize_value(">= 100"), ">=100");
        assert_eq!(extract_numeric_value("< 0,5"), Some(0.5));
        assert_eq!(extract_numeric_value(">= 100"), Some(100.0));
    }

    #[test]
    fn qualitative_values_are_lowercased_and_non_numeric() {
        assert_eq!(normalize_value("Reagente"), "reagente");
        assert_eq!(normalize_value("NÃO REAGENTE"), "não reagente");
        assert_eq!(extract_numeric_value("Reagente"), None);
        assert!(is_qualitative("  Indetectável "));
        assert!(!is_qualitative("7.2"));
    }

    #[test]
    fn scientific_notation_loses_internal_spaces() {
        assert_eq!(normalize_value("1,5 e+03"), "1.5e+03");
        assert_eq!(extract_numeric_value("1,5 e+03"), Some(1500.0));
    }

    #[test]
    fn trailing_unit_text_is_stripped_for_the_numeric_form() {
        assert_eq!(extract_numeric_value("13.5 g/dL"), Some(13.5));
        assert_eq!(extract_numeric_value("42%"), Some(42.0));
        assert_eq!(normalize_value("13,5 g/dL"), "13.5 g/dL");
    }

    #[test]
    fn garbage_degrades_to_empty_or_none() {
        assert_eq!(normalize_value(""), "");
        assert_eq!(normalize_value("   "), "");
        assert_eq!(extract_numeric_value(""), None);
        assert_eq!(extract_numeric_value("aguardando coleta"), None);
    }

    #[test]
    fn units_are_canonicalized() {
        assert_eq!(normalize_unit("mg/dl"), "mg/dL");
        assert_eq!(normalize_unit("UI/ML"), "UI/mL");
        assert_eq!(normalize_unit("/mm3"), "/mm³");
        assert_eq!(normalize_unit("uui/ml"), "µUI/mL");
        assert_eq!(normalize_unit(" mEq/L "), "mEq/L");
        assert_eq!(normalize_unit("mil/mm³"), "mil/mm³");
    }
}
