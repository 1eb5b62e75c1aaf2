//! Navigation over a loaded fraud ontology: resource lookup by fraud activity,
//! label search, hierarchy traversal, export and integrity checks.

pub mod activities;
pub mod explore;
pub mod export;
pub mod resources;
pub mod search;
pub mod validate;
