//! Loaders for the external biomarker taxonomy resource.
//!
//! The taxonomy is a versioned, externally-maintained file. Two formats are
//! supported: the JSON document shipped under `standards/` (primary) and a
//! flat CSV catalog with one biomarker per row. Loading happens strictly
//! before the engine runs; a failed load degrades to an empty index via
//! [`load_index_or_empty`] so the engine keeps working (every lookup then
//! becomes a rejection).

use std::path::{Path, PathBuf};

use csv::ReaderBuilder;
use serde::Deserialize;

use labrec_model::{TaxonomyEntry, TaxonomyIndex};

use crate::error::{Result, TaxonomyError};

const DEFAULT_TAXONOMY_FILE: &str = "biomarker-taxonomy.json";

/// Shape of the JSON taxonomy document.
#[derive(Debug, Clone, Deserialize)]
pub struct TaxonomyFile {
    #[serde(default)]
    pub version: Option<String>,
    #[serde(default)]
    pub updated_at: Option<String>,
    pub biomarkers: Vec<TaxonomyEntry>,
}

/// Get the standards root directory.
fn default_standards_root() -> PathBuf {
    if let Ok(root) = std::env::var("LABREC_STANDARDS_DIR") {
        return PathBuf::from(root);
    }
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../../standards")
}

/// Load the bundled default taxonomy and build its index.
pub fn load_default_index() -> Result<TaxonomyIndex> {
    load_index(&default_standards_root().join(DEFAULT_TAXONOMY_FILE))
}

/// Load a taxonomy file and build its index, dispatching on extension.
pub fn load_index(path: &Path) -> Result<TaxonomyIndex> {
    let extension = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(str::to_ascii_lowercase);

    let document = match extension.as_deref() {
        Some("json") => load_taxonomy_json(path)?,
        Some("csv") => load_taxonomy_csv(path)?,
        _ => {
            return Err(TaxonomyError::UnsupportedFormat {
                path: path.to_path_buf(),
            });
        }
    };

    Ok(TaxonomyIndex::build(document.biomarkers).with_version(document.version))
}

/// Load a taxonomy, degrading to an empty index on any failure.
///
/// This is the error boundary for taxonomy loading: absence or corruption
/// of the resource must not crash the engine.
pub fn load_index_or_empty(path: &Path) -> TaxonomyIndex {
    match load_index(path) {
        Ok(index) => index,
        Err(error) => {
            tracing::warn!(
                path = %path.display(),
                error = %error,
                "taxonomy load failed, continuing with an empty index"
            );
            TaxonomyIndex::empty()
        }
    }
}

/// Load the JSON taxonomy document.
pub fn load_taxonomy_json(path: &Path) -> Result<TaxonomyFile> {
    let text =
        std::fs::read_to_string(path).map_err(|source| TaxonomyError::io(path, source))?;
    serde_json::from_str(&text).map_err(|source| TaxonomyError::Json {
        path: path.to_path_buf(),
        source,
    })
}

/// Load a CSV taxonomy catalog.
///
/// Expected headers: `name`, `category`, `category_order`,
/// `biomarker_order`, `synonyms` (semicolon-separated), `unit`. Order
/// columns may be blank (defaulting to 999); `name` and `category` are
/// required per row.
pub fn load_taxonomy_csv(path: &Path) -> Result<TaxonomyFile> {
    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .from_path(path)
        .map_err(|source| TaxonomyError::csv(path, source.to_string()))?;

    let headers = reader
        .headers()
        .map_err(|source| TaxonomyError::csv(path, source.to_string()))?
        .clone();
    let column = |name: &str| {
        headers
            .iter()
            .position(|header| header.trim().trim_matches('\u{feff}').eq_ignore_ascii_case(name))
    };

    let name_col = column("name")
        .ok_or_else(|| TaxonomyError::csv(path, "missing required column 'name'"))?;
    let category_col = column("category")
        .ok_or_else(|| TaxonomyError::csv(path, "missing required column 'category'"))?;
    let category_order_col = column("category_order");
    let biomarker_order_col = column("biomarker_order");
    let synonyms_col = column("synonyms");
    let unit_col = column("unit");

    let mut biomarkers = Vec::new();
    for (row_idx, record) in reader.records().enumerate() {
        let record = record.map_err(|source| TaxonomyError::csv(path, source.to_string()))?;
        let field = |col: Option<usize>| {
            col.and_then(|idx| record.get(idx)).unwrap_or("").trim().to_string()
        };

        let name = field(Some(name_col));
        if name.is_empty() {
            continue;
        }
        let category = field(Some(category_col));
        if category.is_empty() {
            return Err(TaxonomyError::csv(
                path,
                format!("row {}: biomarker '{}' has no category", row_idx + 2, name),
            ));
        }

        let unit = field(unit_col);
        biomarkers.push(TaxonomyEntry {
            name,
            category,
            category_order: parse_order(path, row_idx, &field(category_order_col))?,
            biomarker_order: parse_order(path, row_idx, &field(biomarker_order_col))?,
            synonyms: parse_synonyms(&field(synonyms_col)),
            unit: if unit.is_empty() { None } else { Some(unit) },
        });
    }

    Ok(TaxonomyFile {
        version: None,
        updated_at: None,
        biomarkers,
    })
}

fn parse_order(path: &Path, row_idx: usize, raw: &str) -> Result<u32> {
    if raw.is_empty() {
        return Ok(999);
    }
    raw.parse().map_err(|_| {
        TaxonomyError::csv(
            path,
            format!("row {}: invalid order value '{}'", row_idx + 2, raw),
        )
    })
}

/// Parse semicolon-separated synonyms.
fn parse_synonyms(raw: &str) -> Vec<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Vec::new();
    }

    trimmed
        .split(';')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}
