pub mod dedupe;
pub mod reference;
pub mod status;
pub mod validate;
pub mod value;

pub use dedupe::{
    DEDUPE_THRESHOLD, completeness_score, dedupe_by_completeness,
    dedupe_by_completeness_with_threshold, detect_duplicates,
};
pub use reference::{ReferenceRange, parse_reference_range};
pub use status::classify;
pub use validate::BatchValidator;
pub use value::{extract_numeric_value, is_qualitative, normalize_unit, normalize_value};
