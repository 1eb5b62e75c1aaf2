//! Label-based alignment of an OWL ontology onto a SKOS taxonomy.
//!
//! # Architecture
//!
//! - **normalize**: label canonicalization before comparison
//! - **similarity**: Ratcliff/Obershelp ratio plus `strsim` alternatives
//! - **concepts**: concept extraction from both graphs and source namespace detection
//! - **matcher**: threshold + top-N candidate selection per source concept
//! - **gaps**: unmapped concepts on both sides
//! - **report**: report assembly and CSV output
//! - **pipeline**: load → extract → match → gaps → report

pub mod concepts;
pub mod gaps;
pub mod matcher;
pub mod normalize;
pub mod pipeline;
pub mod report;
pub mod similarity;

pub use concepts::{SourceConcept, TargetConcept, detect_source_namespace};
pub use matcher::{MatchParams, find_matches};
pub use pipeline::{PipelineError, map_graphs, run_mapping};
pub use similarity::Scorer;
