//! Read/write the last mapping report from disk.

use crate::report::MappingReport;
use crate::schema;
use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};

const TAXOMAP_DIR: &str = ".taxomap";
const REPORT_FILE: &str = "report.json";

/// Get the path to the taxomap directory for a given project root.
pub fn taxomap_dir(project_root: &Path) -> PathBuf {
    project_root.join(TAXOMAP_DIR)
}

/// Get the path to the saved report for a given project root.
pub fn report_file(project_root: &Path) -> PathBuf {
    taxomap_dir(project_root).join(REPORT_FILE)
}

/// Check if a report has been saved under the given project root.
pub fn report_exists(project_root: &Path) -> bool {
    report_file(project_root).exists()
}

/// Load the saved report.
pub fn load_report(project_root: &Path) -> Result<MappingReport> {
    let path = report_file(project_root);
    let json = fs::read_to_string(&path)
        .with_context(|| format!("failed to read report from {}", path.display()))?;
    schema::from_json(&json)
}

/// Save a report, creating the .taxomap directory if needed.
pub fn save_report(project_root: &Path, report: &MappingReport) -> Result<PathBuf> {
    let dir = taxomap_dir(project_root);
    fs::create_dir_all(&dir)
        .with_context(|| format!("failed to create directory {}", dir.display()))?;

    let path = report_file(project_root);
    let json = schema::to_json(report)?;
    fs::write(&path, json)
        .with_context(|| format!("failed to write report to {}", path.display()))?;

    Ok(path)
}
