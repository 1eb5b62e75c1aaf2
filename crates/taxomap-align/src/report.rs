//! Report assembly and CSV output.

use crate::concepts::{SourceConcepts, TargetConcepts};
use crate::matcher::MatchParams;
use anyhow::{Context, Result};
use serde::Serialize;
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use taxomap_core::report::{Mapping, MappingReport, Summary, UnmappedSource, UnmappedTarget};

/// Assemble a report and its summary from one run's results.
pub fn build_report(
    namespace: &str,
    params: &MatchParams,
    source: &SourceConcepts,
    target: &TargetConcepts,
    mappings: Vec<Mapping>,
    unmapped_source: Vec<UnmappedSource>,
    unmapped_target: Vec<UnmappedTarget>,
) -> MappingReport {
    let (mean_similarity, median_similarity) = Summary::score_stats(&mappings);
    let source_mapped: HashSet<&str> = mappings.iter().map(|m| m.source_uri.as_str()).collect();
    let target_mapped: HashSet<&str> = mappings.iter().map(|m| m.target_uri.as_str()).collect();

    let summary = Summary {
        source_concepts: source.len(),
        target_concepts: target.len(),
        mappings: mappings.len(),
        source_mapped: source_mapped.len(),
        target_mapped: target_mapped.len(),
        unmapped_source: unmapped_source.len(),
        unmapped_target: unmapped_target.len(),
        mean_similarity,
        median_similarity,
    };

    let mut report = MappingReport::new(namespace, params.threshold, params.top_n);
    report.scorer = params.scorer.name().to_string();
    report.summary = summary;
    report.mappings = mappings;
    report.unmapped_source = unmapped_source;
    report.unmapped_target = unmapped_target;
    report
}

/// Write `{prefix}_mappings.csv`, `{prefix}_gaps_source.csv` and
/// `{prefix}_gaps_target.csv` into `dir`. Empty tables are skipped.
/// Returns the paths actually written.
pub fn write_csv(report: &MappingReport, dir: &Path, prefix: &str) -> Result<Vec<PathBuf>> {
    std::fs::create_dir_all(dir)
        .with_context(|| format!("failed to create directory {}", dir.display()))?;

    let mut written = Vec::new();
    let mappings = dir.join(format!("{prefix}_mappings.csv"));
    if write_table(&mappings, &report.mappings)? {
        written.push(mappings);
    }
    let gaps_source = dir.join(format!("{prefix}_gaps_source.csv"));
    if write_table(&gaps_source, &report.unmapped_source)? {
        written.push(gaps_source);
    }
    let gaps_target = dir.join(format!("{prefix}_gaps_target.csv"));
    if write_table(&gaps_target, &report.unmapped_target)? {
        written.push(gaps_target);
    }
    Ok(written)
}

/// Serialize rows with a header line. Returns `false` without touching disk
/// when there are no rows.
fn write_table<T: Serialize>(path: &Path, rows: &[T]) -> Result<bool> {
    if rows.is_empty() {
        return Ok(false);
    }
    let mut writer = csv::Writer::from_path(path)
        .with_context(|| format!("failed to create {}", path.display()))?;
    for row in rows {
        writer
            .serialize(row)
            .with_context(|| format!("failed to write row to {}", path.display()))?;
    }
    writer
        .flush()
        .with_context(|| format!("failed to flush {}", path.display()))?;
    tracing::info!(path = %path.display(), rows = rows.len(), "wrote table");
    Ok(true)
}
