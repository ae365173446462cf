//! Duplicate handling.
//!
//! Two distinct operations live here. Within-batch duplicate detection is
//! advisory: it reports canonical names that occur more than once in a
//! processed batch without filtering anything. Completeness-based
//! deduplication works on raw candidates from noisy multi-page or
//! multi-chunk extraction, clustering similarly-named records and keeping
//! only the most complete member of each cluster.

use std::collections::BTreeMap;

use labrec_match::similarity;
use labrec_model::{CandidateRecord, DuplicateConflict, NormalizedRecord, normalize_key};

/// Minimum name similarity (0–100) for two candidates to be considered the
/// same measurement.
pub const DEDUPE_THRESHOLD: f64 = 85.0;

/// Report canonical names occurring more than once, first-occurrence order.
pub fn detect_duplicates(records: &[NormalizedRecord]) -> Vec<DuplicateConflict> {
    let mut positions: BTreeMap<&str, usize> = BTreeMap::new();
    let mut groups: Vec<(String, Vec<usize>)> = Vec::new();

    for (idx, record) in records.iter().enumerate() {
        match positions.get(record.normalized_name.as_str()) {
            Some(&pos) => groups[pos].1.push(idx),
            None => {
                positions.insert(record.normalized_name.as_str(), groups.len());
                groups.push((record.normalized_name.clone(), vec![idx]));
            }
        }
    }

    groups
        .into_iter()
        .filter(|(_, members)| members.len() > 1)
        .map(|(name, members)| DuplicateConflict {
            biomarker_name: name,
            occurrences: members.len(),
            values: members.iter().map(|&idx| records[idx].value.clone()).collect(),
            indices: members,
        })
        .collect()
}

/// Heuristic measure of how many useful fields a candidate carries.
///
/// Weights: value 10, each reference bound 5, unit 3, status 2, method 1.
pub fn completeness_score(record: &CandidateRecord) -> u32 {
    let present = |field: &Option<String>| {
        field.as_deref().is_some_and(|text| !text.trim().is_empty())
    };

    let mut score = 0;
    if present(&record.value) {
        score += 10;
    }
    if record.reference_min.is_some() {
        score += 5;
    }
    if record.reference_max.is_some() {
        score += 5;
    }
    if present(&record.unit) {
        score += 3;
    }
    if present(&record.status) {
        score += 2;
    }
    if present(&record.method) {
        score += 1;
    }
    score
}

/// Deduplicate raw candidates at the default similarity threshold.
pub fn dedupe_by_completeness(records: &[CandidateRecord]) -> Vec<CandidateRecord> {
    dedupe_by_completeness_with_threshold(records, DEDUPE_THRESHOLD)
}

/// Deduplicate raw candidates, keeping the most complete member of each
/// name cluster.
///
/// Records join the first cluster any member of which has a similar
/// normalized name (equal keys short-circuit the similarity call). Ties on
/// completeness keep the first-encountered member. Records whose name
/// normalizes to nothing cannot be grouped and are excluded from the
/// output. Winners are emitted in cluster creation order.
pub fn dedupe_by_completeness_with_threshold(
    records: &[CandidateRecord],
    threshold: f64,
) -> Vec<CandidateRecord> {
    struct Cluster {
        keys: Vec<String>,
        winner: usize,
        winner_score: u32,
    }

    let mut clusters: Vec<Cluster> = Vec::new();

    for (idx, record) in records.iter().enumerate() {
        let key = normalize_key(&record.name);
        if key.is_empty() {
            tracing::warn!(index = idx, "skipping record with no usable name during deduplication");
            continue;
        }

        let score = completeness_score(record);
        let existing = clusters.iter_mut().find(|cluster| {
            cluster
                .keys
                .iter()
                .any(|member| *member == key || similarity(member, &key) >= threshold)
        });

        match existing {
            Some(cluster) => {
                if score > cluster.winner_score {
                    cluster.winner = idx;
                    cluster.winner_score = score;
                }
                cluster.keys.push(key);
            }
            None => clusters.push(Cluster {
                keys: vec![key],
                winner: idx,
                winner_score: score,
            }),
        }
    }

    if clusters.len() < records.len() {
        tracing::debug!(
            input = records.len(),
            output = clusters.len(),
            "removed duplicate candidate records"
        );
    }

    clusters
        .into_iter()
        .map(|cluster| records[cluster.winner].clone())
        .collect()
}
