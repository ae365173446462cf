//! Controlled biomarker taxonomy and its lookup index.
//!
//! The index maps every canonical name and every synonym, in
//! case/accent/punctuation-insensitive form, to its owning entry. It is
//! built once at process start from the external taxonomy resource and is
//! read-only afterwards, so it can be shared freely across parallel batch
//! evaluations.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};
use unicode_normalization::UnicodeNormalization;
use unicode_normalization::char::is_combining_mark;

fn default_order() -> u32 {
    999
}

/// One entry of the controlled taxonomy.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaxonomyEntry {
    /// Canonical biomarker name (e.g. "Glicemia").
    pub name: String,
    /// Category label (e.g. "Metabolismo").
    pub category: String,
    /// Display rank of the category. 999 when the resource omits it.
    #[serde(default = "default_order")]
    pub category_order: u32,
    /// Display rank within the category. 999 when the resource omits it.
    #[serde(default = "default_order")]
    pub biomarker_order: u32,
    #[serde(default)]
    pub synonyms: Vec<String>,
    /// Declared measurement unit. Takes precedence over [`infer_unit`].
    #[serde(default)]
    pub unit: Option<String>,
}

/// Normalize text into an index key.
///
/// Strips diacritics (NFD decomposition, combining marks removed),
/// lowercases, drops punctuation except hyphen, and collapses whitespace.
/// Total: empty input yields an empty string.
pub fn normalize_key(text: &str) -> String {
    let folded: String = text.nfd().filter(|ch| !is_combining_mark(*ch)).collect();

    let mut cleaned = String::with_capacity(folded.len());
    for ch in folded.chars() {
        if ch.is_alphanumeric() || ch == '_' || ch == '-' {
            for lower in ch.to_lowercase() {
                cleaned.push(lower);
            }
        } else if ch.is_whitespace() {
            cleaned.push(' ');
        }
    }

    cleaned.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Keyword table mapping canonical-name substrings to units.
///
/// Scanned in order; the first group containing a matching keyword wins, so
/// e.g. "creatinina" resolves to mg/dL before the short "na" sodium keyword
/// is ever considered.
const UNIT_PATTERNS: &[(&str, &[&str])] = &[
    (
        "mg/dL",
        &[
            "colesterol",
            "ldl",
            "hdl",
            "triglicérides",
            "triglicerides",
            "glicemia",
            "glicose",
            "ureia",
            "creatinina",
            "ácido úrico",
            "urico",
            "cálcio",
            "calcio",
            "magnésio",
            "magnesio",
            "vitamina c",
            "bilirrubina",
        ],
    ),
    (
        "g/dL",
        &[
            "hemoglobina",
            "albumina",
            "proteínas totais",
            "proteinas totais",
            "globulinas",
            "chcm",
        ],
    ),
    (
        "%",
        &[
            "hematócrito",
            "hematocrito",
            "hba1c",
            "rdw",
            "ist",
            "neutrófilos %",
            "neutrofilos %",
            "linfócitos %",
            "linfocitos %",
            "monócitos %",
            "monocitos %",
            "eosinófilos %",
            "eosinofilos %",
            "basófilos %",
            "basofilos %",
            "reticulócitos",
            "reticulocitos",
        ],
    ),
    (
        "ng/mL",
        &[
            "ferritina",
            "psa",
            "prolactina",
            "igf-1",
            "osteocalcina",
            "ctx",
            "vitamina b1",
            "vitamina b2",
            "vitamina b3",
            "vitamina b5",
            "vitamina b6",
            "tireoglobulina",
            "ácido fólico",
            "acido folico",
        ],
    ),
    (
        "pg/mL",
        &["vitamina b12", "b12", "t3 livre", "pth", "testosterona livre"],
    ),
    ("µUI/mL", &["tsh", "insulina"]),
    ("mUI/mL", &["lh", "fsh"]),
    (
        "ng/dL",
        &[
            "t4 livre",
            "testosterona total",
            "cortisol",
            "dhea",
            "dht",
            "t3 total",
            "estradiol",
        ],
    ),
    (
        "µg/dL",
        &["t4 total", "ferro", "ctlf", "zinco", "vitamina a", "sdhea"],
    ),
    (
        "U/L",
        &["tgo", "ast", "tgp", "alt", "fa", "fosfatase", "ggt", "cpk", "ldh"],
    ),
    (
        "/mm³",
        &[
            "leucócitos",
            "leucocitos",
            "hemácias",
            "hemacias",
            "plaquetas",
            "neutrófilos",
            "neutrofilos",
            "linfócitos",
            "linfocitos",
            "monócitos",
            "monocitos",
            "eosinófilos",
            "eosinofilos",
            "basófilos",
            "basofilos",
        ],
    ),
    ("mEq/L", &["sódio", "sodio", "potássio", "potassio", "na", "k"]),
    ("fL", &["vcm"]),
    ("pg", &["hcm"]),
    ("mg/L", &["pcr"]),
    ("µmol/L", &["homocisteína", "homocisteina", "frutosamina"]),
    ("nmol/L", &["shbg"]),
    ("segundos", &["ptt"]),
];

/// Best-effort unit inference from a canonical biomarker name.
///
/// Returns an empty string when no keyword matches. A unit declared on the
/// taxonomy entry always takes precedence; see [`TaxonomyIndex::unit_for`].
pub fn infer_unit(canonical_name: &str) -> &'static str {
    let name = canonical_name.to_lowercase();
    for (unit, keywords) in UNIT_PATTERNS {
        if keywords.iter().any(|keyword| name.contains(keyword)) {
            return unit;
        }
    }
    ""
}

#[derive(Debug, Clone, Copy)]
struct KeySlot {
    entry: usize,
    canonical: bool,
}

/// A key hit, carrying the owning entry and whether the key is the entry's
/// canonical name (as opposed to a synonym).
pub struct Resolved<'a> {
    pub entry: &'a TaxonomyEntry,
    pub canonical: bool,
}

/// Summary counters for a built index.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexStats {
    pub entries: usize,
    pub keys: usize,
    pub categories: usize,
    pub version: Option<String>,
}

/// Case/accent/punctuation-insensitive lookup over the taxonomy.
#[derive(Debug, Clone, Default)]
pub struct TaxonomyIndex {
    entries: Vec<TaxonomyEntry>,
    keys: BTreeMap<String, KeySlot>,
    version: Option<String>,
}

impl TaxonomyIndex {
    /// Build the index from taxonomy entries.
    ///
    /// Per entry, in list order: the canonical key is inserted
    /// unconditionally (a later entry's canonical name reclaims a key
    /// previously registered as a synonym), then each synonym key is
    /// inserted only if absent — a synonym shared by two entries resolves
    /// to whichever entry registered it first.
    pub fn build(entries: Vec<TaxonomyEntry>) -> Self {
        let mut keys: BTreeMap<String, KeySlot> = BTreeMap::new();

        for (idx, entry) in entries.iter().enumerate() {
            let canonical_key = normalize_key(&entry.name);
            if !canonical_key.is_empty() {
                keys.insert(
                    canonical_key,
                    KeySlot {
                        entry: idx,
                        canonical: true,
                    },
                );
            }
            for synonym in &entry.synonyms {
                let key = normalize_key(synonym);
                if key.is_empty() || keys.contains_key(&key) {
                    continue;
                }
                keys.insert(
                    key,
                    KeySlot {
                        entry: idx,
                        canonical: false,
                    },
                );
            }
        }

        tracing::info!(
            entries = entries.len(),
            keys = keys.len(),
            "taxonomy index built"
        );

        Self {
            entries,
            keys,
            version: None,
        }
    }

    /// The degraded index: no entries, every lookup misses.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Attach the resource version the entries were loaded from.
    pub fn with_version(mut self, version: Option<String>) -> Self {
        self.version = version;
        self
    }

    /// Number of taxonomy entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Look up an already-normalized key.
    pub fn lookup(&self, key: &str) -> Option<Resolved<'_>> {
        let slot = self.keys.get(key)?;
        self.entries.get(slot.entry).map(|entry| Resolved {
            entry,
            canonical: slot.canonical,
        })
    }

    /// The entry owning a key, canonical or synonym.
    pub fn entry_for_key(&self, key: &str) -> Option<&TaxonomyEntry> {
        self.lookup(key).map(|resolved| resolved.entry)
    }

    /// All index keys in deterministic (lexicographic) order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.keys.keys().map(String::as_str)
    }

    pub fn entries(&self) -> &[TaxonomyEntry] {
        &self.entries
    }

    /// Unit for an entry: declared unit first, keyword inference second,
    /// empty string when neither applies.
    pub fn unit_for(&self, entry: &TaxonomyEntry) -> String {
        match entry.unit.as_deref() {
            Some(unit) if !unit.trim().is_empty() => unit.trim().to_string(),
            _ => infer_unit(&entry.name).to_string(),
        }
    }

    pub fn version(&self) -> Option<&str> {
        self.version.as_deref()
    }

    pub fn stats(&self) -> IndexStats {
        let categories: BTreeSet<&str> = self
            .entries
            .iter()
            .map(|entry| entry.category.as_str())
            .collect();
        IndexStats {
            entries: self.entries.len(),
            keys: self.keys.len(),
            categories: categories.len(),
            version: self.version.clone(),
        }
    }
}
