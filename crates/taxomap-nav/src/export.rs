//! Export the class hierarchy as DOT (Graphviz) or a Mermaid flowchart.

use crate::search::node_labels;
use std::collections::{BTreeMap, HashMap};
use std::fmt::Write;
use taxomap_core::graph::{RdfGraph, Term};
use taxomap_core::vocab;

/// Export format for graph visualization.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Dot,
    Mermaid,
}

impl std::str::FromStr for ExportFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "dot" | "graphviz" => Ok(Self::Dot),
            "mermaid" | "mmd" => Ok(Self::Mermaid),
            other => Err(format!("unknown format `{other}` (expected dot or mermaid)")),
        }
    }
}

/// Labelled classes and the subclass edges between them.
struct ClassHierarchy {
    /// IRI → label, in IRI order.
    nodes: BTreeMap<String, String>,
    /// (child, parent) pairs, sorted.
    edges: Vec<(String, String)>,
}

impl ClassHierarchy {
    fn collect(graph: &RdfGraph, namespace: Option<&str>) -> Self {
        let mut nodes = BTreeMap::new();
        for class in graph.instances_of(vocab::OWL_CLASS) {
            let Some(iri) = class.as_iri() else {
                continue;
            };
            if namespace.is_some_and(|ns| !iri.starts_with(ns)) {
                continue;
            }
            if let Some(label) = node_labels(graph, class).into_iter().next() {
                nodes.insert(iri.to_string(), label);
            }
        }

        let mut edges = Vec::new();
        for child in nodes.keys() {
            for parent in graph.iri_objects(&Term::iri(child.as_str()), vocab::RDFS_SUBCLASS_OF) {
                if nodes.contains_key(&parent) {
                    edges.push((child.clone(), parent));
                }
            }
        }
        edges.sort();
        edges.dedup();

        Self { nodes, edges }
    }
}

/// Export the class hierarchy as a DOT string. Edges point from subclass to superclass.
pub fn export_dot(graph: &RdfGraph, namespace: Option<&str>) -> String {
    let hierarchy = ClassHierarchy::collect(graph, namespace);
    let mut out = String::new();
    writeln!(out, "digraph Ontology {{").unwrap();
    writeln!(out, "  rankdir=BT;").unwrap();
    writeln!(out, "  node [shape=box, fontsize=10];").unwrap();
    writeln!(out).unwrap();

    for (iri, label) in &hierarchy.nodes {
        writeln!(
            out,
            "  \"{}\" [label=\"{}\"];",
            dot_escape(iri),
            dot_escape(label)
        )
        .unwrap();
    }

    writeln!(out).unwrap();

    for (child, parent) in &hierarchy.edges {
        writeln!(
            out,
            "  \"{}\" -> \"{}\" [label=\"subClassOf\"];",
            dot_escape(child),
            dot_escape(parent)
        )
        .unwrap();
    }

    writeln!(out, "}}").unwrap();
    out
}

/// Export the class hierarchy as a Mermaid flowchart string.
pub fn export_mermaid(graph: &RdfGraph, namespace: Option<&str>) -> String {
    let hierarchy = ClassHierarchy::collect(graph, namespace);
    let ids: HashMap<&str, String> = hierarchy
        .nodes
        .keys()
        .enumerate()
        .map(|(i, iri)| (iri.as_str(), format!("c{i}")))
        .collect();

    let mut out = String::new();
    writeln!(out, "flowchart BT").unwrap();

    for (iri, label) in &hierarchy.nodes {
        writeln!(out, "  {}[\"{}\"]", ids[iri.as_str()], mermaid_escape(label)).unwrap();
    }

    for (child, parent) in &hierarchy.edges {
        writeln!(
            out,
            "  {} -->|subClassOf| {}",
            ids[child.as_str()],
            ids[parent.as_str()]
        )
        .unwrap();
    }

    out
}

fn dot_escape(text: &str) -> String {
    text.replace('\\', "\\\\").replace('"', "\\\"")
}

fn mermaid_escape(text: &str) -> String {
    text.replace('"', "#quot;")
}

/// Export the class hierarchy in the specified format.
pub fn export(graph: &RdfGraph, format: ExportFormat, namespace: Option<&str>) -> String {
    match format {
        ExportFormat::Dot => export_dot(graph, namespace),
        ExportFormat::Mermaid => export_mermaid(graph, namespace),
    }
}
