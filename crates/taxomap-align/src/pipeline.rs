//! End-to-end mapping run: load → namespace → extract → match → gaps → report.

use crate::concepts::{detect_source_namespace, extract_source_concepts, extract_target_concepts};
use crate::gaps::identify_gaps;
use crate::matcher::{MatchParams, find_matches};
use crate::report::build_report;
use crate::similarity::UnknownScorer;
use std::path::Path;
use taxomap_core::config::TaxomapConfig;
use taxomap_core::graph::RdfGraph;
use taxomap_core::loader::{self, LoadError};
use taxomap_core::report::MappingReport;

#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    #[error(transparent)]
    Load(#[from] LoadError),
    #[error("could not detect a source namespace: {0} declares no owl:Class subjects")]
    NoNamespace(String),
    #[error(transparent)]
    Scorer(#[from] UnknownScorer),
}

/// Load both files and map the source ontology onto the target taxonomy.
pub fn run_mapping(
    source_path: &Path,
    target_path: &Path,
    config: &TaxomapConfig,
) -> Result<MappingReport, PipelineError> {
    tracing::info!(path = %source_path.display(), "loading source ontology");
    let source_graph = loader::load(source_path)?;
    tracing::info!(path = %target_path.display(), "loading target taxonomy");
    let target_graph = loader::load(target_path)?;

    let mut report = map_graphs(&source_graph, &target_graph, config)
        .map_err(|e| match e {
            PipelineError::NoNamespace(_) => {
                PipelineError::NoNamespace(source_path.display().to_string())
            }
            other => other,
        })?;
    report.source_file = source_path.display().to_string();
    report.target_file = target_path.display().to_string();
    Ok(report)
}

/// Map already-loaded graphs. `source_file`/`target_file` are left empty.
pub fn map_graphs(
    source_graph: &RdfGraph,
    target_graph: &RdfGraph,
    config: &TaxomapConfig,
) -> Result<MappingReport, PipelineError> {
    let params = MatchParams::from_config(&config.matching)?;

    let namespace = detect_source_namespace(source_graph, &config.namespace)
        .ok_or_else(|| PipelineError::NoNamespace("source graph".to_string()))?;
    tracing::info!(namespace = %namespace, "source namespace detected");

    let source = extract_source_concepts(source_graph, &namespace);
    let target = extract_target_concepts(target_graph);
    tracing::info!(
        source = source.len(),
        target = target.len(),
        "concepts extracted"
    );

    tracing::info!(
        threshold = params.threshold,
        top_n = params.top_n,
        scorer = %params.scorer,
        "finding matches"
    );
    let mappings = find_matches(&source, &target, &params);

    let (unmapped_source, unmapped_target) =
        identify_gaps(&source, &target, &mappings, params.max_parents);
    tracing::info!(
        mappings = mappings.len(),
        unmapped_source = unmapped_source.len(),
        unmapped_target = unmapped_target.len(),
        "coverage gaps identified"
    );

    Ok(build_report(
        &namespace,
        &params,
        &source,
        &target,
        mappings,
        unmapped_source,
        unmapped_target,
    ))
}
