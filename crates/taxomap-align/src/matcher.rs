//! Candidate selection: every source label against every target label.

use crate::concepts::{SourceConcept, SourceConcepts, TargetConcepts};
use crate::normalize::normalize_label;
use crate::similarity::Scorer;
use rayon::prelude::*;
use taxomap_core::config::MatchingConfig;
use taxomap_core::report::Mapping;

/// Parameters for one matching run.
#[derive(Debug, Clone, Copy)]
pub struct MatchParams {
    /// Minimum similarity (inclusive) for a candidate to be kept.
    pub threshold: f64,
    /// Maximum candidates kept per source concept.
    pub top_n: usize,
    pub scorer: Scorer,
    /// How many parents are joined into each mapping row.
    pub max_parents: usize,
}

impl Default for MatchParams {
    fn default() -> Self {
        Self {
            threshold: 0.75,
            top_n: 5,
            scorer: Scorer::Ratio,
            max_parents: 3,
        }
    }
}

impl MatchParams {
    /// Build from the `[matching]` config section.
    pub fn from_config(config: &MatchingConfig) -> Result<Self, crate::similarity::UnknownScorer> {
        Ok(Self {
            threshold: config.threshold,
            top_n: config.top_n,
            scorer: config.scorer.parse()?,
            max_parents: config.max_parents,
        })
    }
}

/// One target label paired with a normalized form, computed once per run.
struct TargetLabel<'a> {
    uri: &'a str,
    label: &'a str,
    normalized: String,
}

struct Candidate<'a> {
    target: &'a TargetLabel<'a>,
    source_label: &'a str,
    score: f64,
}

/// Find the best-scoring target labels for each source concept.
///
/// Candidates at or above the threshold are ordered by score (ties keep
/// discovery order) and cut to `top_n`. A target concept may appear more than
/// once for the same source concept when several of its labels match.
/// Output follows source IRI order.
pub fn find_matches(
    source: &SourceConcepts,
    target: &TargetConcepts,
    params: &MatchParams,
) -> Vec<Mapping> {
    let target_labels: Vec<TargetLabel<'_>> = target
        .values()
        .flat_map(|concept| {
            concept.labels.iter().map(|label| TargetLabel {
                uri: &concept.uri,
                label,
                normalized: normalize_label(label),
            })
        })
        .collect();

    let concepts: Vec<&SourceConcept> = source.values().collect();
    let per_concept: Vec<Vec<Mapping>> = concepts
        .par_iter()
        .map(|concept| match_concept(concept, &target_labels, params))
        .collect();

    let mappings: Vec<Mapping> = per_concept.into_iter().flatten().collect();
    tracing::debug!(
        sources = source.len(),
        target_labels = target_labels.len(),
        mappings = mappings.len(),
        "matching complete"
    );
    mappings
}

fn match_concept(
    concept: &SourceConcept,
    target_labels: &[TargetLabel<'_>],
    params: &MatchParams,
) -> Vec<Mapping> {
    let mut candidates: Vec<Candidate<'_>> = Vec::new();

    for source_label in &concept.labels {
        let normalized = normalize_label(source_label);
        for target in target_labels {
            let score = params.scorer.score(&normalized, &target.normalized);
            if score >= params.threshold {
                candidates.push(Candidate {
                    target,
                    source_label,
                    score,
                });
            }
        }
    }

    candidates.sort_by(|a, b| {
        b.score
            .partial_cmp(&a.score)
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    candidates.truncate(params.top_n);

    let parents = join_limited(&concept.parents, params.max_parents);
    candidates
        .into_iter()
        .map(|c| Mapping {
            source_uri: concept.uri.clone(),
            source_label: concept.primary_label().to_string(),
            source_label_matched: c.source_label.to_string(),
            target_uri: c.target.uri.to_string(),
            target_label: c.target.label.to_string(),
            similarity_score: round3(c.score),
            source_parents: parents.clone(),
        })
        .collect()
}

/// Join the first `limit` items with `"; "`.
pub fn join_limited(items: &[String], limit: usize) -> String {
    items
        .iter()
        .take(limit)
        .map(String::as_str)
        .collect::<Vec<_>>()
        .join("; ")
}

/// Round to 3 decimals, exact halves to even.
fn round3(score: f64) -> f64 {
    (score * 1000.0).round_ties_even() / 1000.0
}
