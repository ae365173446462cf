pub mod error;
pub mod loader;

pub use error::{Result, TaxonomyError};
pub use loader::{
    TaxonomyFile, load_default_index, load_index, load_index_or_empty, load_taxonomy_csv,
    load_taxonomy_json,
};
