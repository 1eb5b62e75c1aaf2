//! JSON serialization and version handling for saved mapping reports.

use crate::report::MappingReport;
use anyhow::{Context, Result};

pub const CURRENT_VERSION: &str = "1.0.0";

/// Validate a report's schema version.
pub fn validate_version(report: &MappingReport) -> Result<()> {
    if report.version != CURRENT_VERSION {
        anyhow::bail!(
            "report version mismatch: expected {}, found {}",
            CURRENT_VERSION,
            report.version
        );
    }
    Ok(())
}

/// Serialize a report to a pretty-printed JSON string.
pub fn to_json(report: &MappingReport) -> Result<String> {
    serde_json::to_string_pretty(report).context("failed to serialize report to JSON")
}

/// Deserialize a report from a JSON string.
pub fn from_json(json: &str) -> Result<MappingReport> {
    let report: MappingReport =
        serde_json::from_str(json).context("failed to deserialize report from JSON")?;
    validate_version(&report)?;
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejects_other_version() {
        let mut report = MappingReport::new("http://x/", 0.75, 5);
        report.version = "0.1.0".to_string();
        let json = serde_json::to_string(&report).unwrap();
        let err = from_json(&json).unwrap_err();
        assert!(err.to_string().contains("version mismatch"));
    }

    #[test]
    fn test_rejects_garbage() {
        assert!(from_json("not json").is_err());
    }
}
