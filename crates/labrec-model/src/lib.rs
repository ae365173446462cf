pub mod enums;
pub mod record;
pub mod taxonomy;

pub use enums::{MatchType, Status};
pub use record::{
    CandidateRecord, DuplicateConflict, NormalizedRecord, RejectedRecord, ValidationResult,
    ValidationStats,
};
pub use taxonomy::{IndexStats, Resolved, TaxonomyEntry, TaxonomyIndex, infer_unit, normalize_key};
