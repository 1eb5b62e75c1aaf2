//! Core types and storage for taxomap.
//!
//! Provides the in-memory RDF graph ([`graph::RdfGraph`]), the vocabulary IRIs
//! the mapper and search rely on, ontology file loading, configuration, and
//! JSON persistence of mapping reports.

pub mod config;
pub mod graph;
pub mod loader;
pub mod report;
pub mod schema;
pub mod storage;
pub mod vocab;
