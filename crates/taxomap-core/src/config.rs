//! Configuration for matching, namespace detection, output and search.
//!
//! Load order: `.taxomap/config.toml` → environment variables → defaults.

use crate::vocab;
use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Top-level taxomap configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TaxomapConfig {
    pub matching: MatchingConfig,
    pub namespace: NamespaceConfig,
    pub output: OutputConfig,
    pub search: SearchConfig,
}

/// Label matching configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MatchingConfig {
    /// Minimum similarity (0.0-1.0) for a candidate to be kept. Higher is stricter.
    pub threshold: f64,
    /// Number of candidate matches reported per source concept.
    pub top_n: usize,
    /// Similarity scorer: ratio, jaro_winkler, levenshtein, sorensen_dice.
    pub scorer: String,
    /// Number of parent classes listed in report rows.
    pub max_parents: usize,
}

/// How the source ontology's namespace is found.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct NamespaceConfig {
    /// Explicit source namespace. Skips detection when set.
    pub source: Option<String>,
    /// A declared prefix whose name contains one of these marks the source namespace.
    pub prefix_hints: Vec<String>,
    /// A declared namespace IRI containing one of these (case-insensitive) marks it too.
    pub iri_hints: Vec<String>,
}

/// Report output configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// File name prefix for the CSV tables.
    pub prefix: String,
}

/// Resource and label search configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    /// Namespace holding the fraud model classes and properties.
    pub namespace: String,
    /// Maximum number of label search results returned.
    pub result_limit: usize,
}

impl Default for MatchingConfig {
    fn default() -> Self {
        Self {
            threshold: 0.75,
            top_n: 5,
            scorer: "ratio".to_string(),
            max_parents: 3,
        }
    }
}

impl Default for NamespaceConfig {
    fn default() -> Self {
        Self {
            source: None,
            prefix_hints: vec!["gfo".to_string()],
            iri_hints: vec!["fraud".to_string()],
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            prefix: "ontology_mapping".to_string(),
        }
    }
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            namespace: vocab::GFO_NAMESPACE.to_string(),
            result_limit: 10,
        }
    }
}

/// Helper to parse an env var and apply it to a config field.
fn env_override<T: std::str::FromStr>(var: &str, target: &mut T) {
    if let Ok(v) = std::env::var(var)
        && let Ok(n) = v.parse()
    {
        *target = n;
    }
}

impl TaxomapConfig {
    /// Load config from `.taxomap/config.toml` in the project root, with env var overrides.
    /// Falls back to defaults if no config file exists.
    pub fn load(project_root: &Path) -> Result<Self> {
        let config_path = project_root.join(".taxomap").join("config.toml");

        let mut config = if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)?;
            toml::from_str(&content)?
        } else {
            Self::default()
        };

        env_override("TAXOMAP_THRESHOLD", &mut config.matching.threshold);
        env_override("TAXOMAP_TOP_N", &mut config.matching.top_n);
        env_override("TAXOMAP_SCORER", &mut config.matching.scorer);
        env_override("TAXOMAP_OUTPUT_PREFIX", &mut config.output.prefix);
        env_override("TAXOMAP_SEARCH_NAMESPACE", &mut config.search.namespace);
        env_override("TAXOMAP_SEARCH_LIMIT", &mut config.search.result_limit);
        if let Ok(ns) = std::env::var("TAXOMAP_SOURCE_NAMESPACE")
            && !ns.is_empty()
        {
            config.namespace.source = Some(ns);
        }

        config.validate()?;
        Ok(config)
    }

    /// Check value ranges. Called by `load` and again after CLI flag overrides.
    pub fn validate(&self) -> Result<()> {
        if !(0.0..=1.0).contains(&self.matching.threshold) {
            anyhow::bail!(
                "matching.threshold ({}) must be between 0.0 and 1.0",
                self.matching.threshold
            );
        }
        if self.matching.top_n == 0 {
            anyhow::bail!("matching.top_n must be at least 1");
        }
        Ok(())
    }
}
