pub mod matcher;
pub mod score;

pub use matcher::{BiomarkerMatch, FUZZY_THRESHOLD, MAX_SUGGESTIONS, MatchOutcome, Matcher};
pub use score::similarity;
