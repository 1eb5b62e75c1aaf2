//! Mapping report data model: mappings, coverage gaps, and summary statistics.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One accepted match between a source concept and a target concept.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Mapping {
    pub source_uri: String,
    /// Primary label of the source concept.
    pub source_label: String,
    /// The source label that produced this match.
    pub source_label_matched: String,
    pub target_uri: String,
    pub target_label: String,
    /// Similarity rounded to three decimals.
    pub similarity_score: f64,
    /// Leading parent classes of the source concept, joined with "; ".
    pub source_parents: String,
}

/// A source concept without any mapping.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnmappedSource {
    pub uri: String,
    pub label: String,
    pub all_labels: String,
    pub parents: String,
}

/// A target concept that no source concept mapped onto.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnmappedTarget {
    pub uri: String,
    pub label: String,
    pub all_labels: String,
}

/// Aggregate counts for a mapping run.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Summary {
    pub source_concepts: usize,
    pub target_concepts: usize,
    pub mappings: usize,
    pub source_mapped: usize,
    pub target_mapped: usize,
    pub unmapped_source: usize,
    pub unmapped_target: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mean_similarity: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub median_similarity: Option<f64>,
}

/// The complete result of mapping a source ontology onto a target taxonomy.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MappingReport {
    pub version: String,
    pub created_at: DateTime<Utc>,
    pub source_file: String,
    pub target_file: String,
    pub source_namespace: String,
    pub threshold: f64,
    pub top_n: usize,
    pub scorer: String,
    pub summary: Summary,
    pub mappings: Vec<Mapping>,
    pub unmapped_source: Vec<UnmappedSource>,
    pub unmapped_target: Vec<UnmappedTarget>,
}

impl MappingReport {
    /// Create an empty report for the given run parameters.
    pub fn new(source_namespace: impl Into<String>, threshold: f64, top_n: usize) -> Self {
        Self {
            version: crate::schema::CURRENT_VERSION.to_string(),
            created_at: Utc::now(),
            source_file: String::new(),
            target_file: String::new(),
            source_namespace: source_namespace.into(),
            threshold,
            top_n,
            scorer: String::new(),
            summary: Summary::default(),
            mappings: Vec::new(),
            unmapped_source: Vec::new(),
            unmapped_target: Vec::new(),
        }
    }
}

impl Summary {
    /// Mean and median of the mapping scores; `None` when there are no mappings.
    pub fn score_stats(mappings: &[Mapping]) -> (Option<f64>, Option<f64>) {
        if mappings.is_empty() {
            return (None, None);
        }
        let mut scores: Vec<f64> = mappings.iter().map(|m| m.similarity_score).collect();
        let mean = scores.iter().sum::<f64>() / scores.len() as f64;
        scores.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
        let mid = scores.len() / 2;
        let median = if scores.len() % 2 == 0 {
            (scores[mid - 1] + scores[mid]) / 2.0
        } else {
            scores[mid]
        };
        (Some(mean), Some(median))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mapping(score: f64) -> Mapping {
        Mapping {
            source_uri: "s".into(),
            source_label: "s".into(),
            source_label_matched: "s".into(),
            target_uri: "t".into(),
            target_label: "t".into(),
            similarity_score: score,
            source_parents: String::new(),
        }
    }

    #[test]
    fn test_score_stats_empty() {
        assert_eq!(Summary::score_stats(&[]), (None, None));
    }

    #[test]
    fn test_score_stats_even_count_median() {
        let ms = vec![mapping(0.8), mapping(1.0), mapping(0.9), mapping(0.76)];
        let (mean, median) = Summary::score_stats(&ms);
        assert!((mean.unwrap() - 0.865).abs() < 1e-9);
        assert!((median.unwrap() - 0.85).abs() < 1e-9);
    }

    #[test]
    fn test_score_stats_odd_count_median() {
        let ms = vec![mapping(0.8), mapping(1.0), mapping(0.9)];
        let (_, median) = Summary::score_stats(&ms);
        assert_eq!(median, Some(0.9));
    }
}
