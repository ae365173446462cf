//! Tests for taxonomy resource loading.

use std::path::PathBuf;

use labrec_taxonomy::{TaxonomyError, load_index, load_index_or_empty, load_taxonomy_csv};

fn standards_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../../standards")
}

fn test_data_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/data")
}

#[test]
fn loads_bundled_taxonomy() {
    let path = standards_dir().join("biomarker-taxonomy.json");
    if !path.exists() {
        return; // Skip if the standards file is not available
    }

    let index = load_index(&path).expect("load bundled taxonomy");
    assert!(!index.is_empty());
    assert_eq!(index.version(), Some("2.1.0"));

    // Canonical name resolves as canonical, synonym as synonym.
    let canonical = index.lookup("glicemia").expect("Glicemia should exist");
    assert!(canonical.canonical);
    assert_eq!(canonical.entry.name, "Glicemia");

    let synonym = index.lookup("globulos brancos").expect("synonym should exist");
    assert!(!synonym.canonical);
    assert_eq!(synonym.entry.name, "Leucócitos");

    // Declared unit wins; inference covers the rest.
    let hba1c = index.lookup("hemoglobina glicada").expect("HbA1c").entry.clone();
    assert_eq!(index.unit_for(&hba1c), "%");
    let creatinina = index.lookup("creatinina").expect("Creatinina").entry.clone();
    assert_eq!(index.unit_for(&creatinina), "mg/dL");
}

#[test]
fn bundled_taxonomy_categories_are_ordered() {
    let path = standards_dir().join("biomarker-taxonomy.json");
    if !path.exists() {
        return;
    }

    let index = load_index(&path).expect("load bundled taxonomy");
    let stats = index.stats();
    assert!(stats.categories >= 5);
    assert!(stats.keys > stats.entries, "synonyms should add keys");

    for entry in index.entries() {
        assert!(entry.category_order < 999, "{} lacks a category order", entry.name);
        assert!(entry.biomarker_order < 999, "{} lacks a biomarker order", entry.name);
    }
}

#[test]
fn loads_csv_catalog() {
    let document =
        load_taxonomy_csv(&test_data_dir().join("biomarker-taxonomy.csv")).expect("load csv");

    assert_eq!(document.biomarkers.len(), 4);

    let glicemia = &document.biomarkers[0];
    assert_eq!(glicemia.name, "Glicemia");
    assert_eq!(glicemia.synonyms, vec!["Glicose", "Glicemia de Jejum"]);
    assert!(glicemia.unit.is_none());

    let tsh = &document.biomarkers[1];
    assert_eq!(tsh.unit.as_deref(), Some("µUI/mL"));

    // Blank order columns default to the end of the display order.
    let frutosamina = &document.biomarkers[3];
    assert_eq!(frutosamina.category_order, 999);
    assert_eq!(frutosamina.biomarker_order, 999);
}

#[test]
fn corrupt_json_reports_parse_error() {
    let error = load_index(&test_data_dir().join("corrupt.json")).expect_err("corrupt file");
    assert!(matches!(error, TaxonomyError::Json { .. }));
}

#[test]
fn corrupt_json_degrades_to_empty_index() {
    let index = load_index_or_empty(&test_data_dir().join("corrupt.json"));
    assert!(index.is_empty());
    assert!(index.lookup("glicemia").is_none());
}
