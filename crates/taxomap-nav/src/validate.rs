//! Integrity checks on a loaded ontology.

use crate::search::node_labels;
use serde::Serialize;
use std::collections::{BTreeMap, HashSet};
use std::fmt;
use taxomap_core::graph::{RdfGraph, Term};
use taxomap_core::vocab;

/// Namespaces whose terms are never expected to be described locally.
const EXTERNAL_NAMESPACES: [&str; 4] = [
    "http://www.w3.org/2002/07/owl#",
    "http://www.w3.org/2000/01/rdf-schema#",
    "http://www.w3.org/1999/02/22-rdf-syntax-ns#",
    "http://www.w3.org/2004/02/skos/core#",
];

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Issue {
    /// `rdfs:subClassOf` points at an IRI the graph says nothing about.
    DanglingParent { class: String, parent: String },
    /// An `owl:Class` with neither `rdfs:label` nor `skos:prefLabel`.
    UnlabeledClass { class: String },
    /// Classes that are subclasses of each other, smallest IRI first.
    SubclassCycle { members: Vec<String> },
}

impl fmt::Display for Issue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DanglingParent { class, parent } => {
                write!(f, "dangling parent: {class} subClassOf {parent}")
            }
            Self::UnlabeledClass { class } => write!(f, "unlabeled class: {class}"),
            Self::SubclassCycle { members } => {
                write!(f, "subclass cycle: {}", format_cycle(members))
            }
        }
    }
}

/// Run all checks. Issues are grouped by kind, each group in IRI order.
pub fn validate(graph: &RdfGraph) -> Vec<Issue> {
    let mut issues = Vec::new();
    issues.extend(dangling_parents(graph));
    issues.extend(unlabeled_classes(graph));
    issues.extend(subclass_cycles(graph));
    tracing::debug!(issues = issues.len(), "validation complete");
    issues
}

fn dangling_parents(graph: &RdfGraph) -> Vec<Issue> {
    let mut out = Vec::new();
    for triple in graph.triples() {
        if triple.predicate != vocab::RDFS_SUBCLASS_OF {
            continue;
        }
        let (Some(class), Some(parent)) = (triple.subject.as_iri(), triple.object.as_iri())
        else {
            continue;
        };
        if EXTERNAL_NAMESPACES.iter().any(|ns| parent.starts_with(ns)) {
            continue;
        }
        if !graph.describes(&triple.object) {
            out.push(Issue::DanglingParent {
                class: class.to_string(),
                parent: parent.to_string(),
            });
        }
    }
    out.sort_by(|a, b| issue_key(a).cmp(&issue_key(b)));
    out
}

fn unlabeled_classes(graph: &RdfGraph) -> Vec<Issue> {
    let mut out: Vec<Issue> = graph
        .instances_of(vocab::OWL_CLASS)
        .into_iter()
        .filter(|class| class.as_iri().is_some() && node_labels(graph, class).is_empty())
        .map(|class| Issue::UnlabeledClass {
            class: class.lexical().to_string(),
        })
        .collect();
    out.sort_by(|a, b| issue_key(a).cmp(&issue_key(b)));
    out
}

struct CycleSearch<'a> {
    adj: &'a BTreeMap<&'a str, Vec<&'a str>>,
    visited: HashSet<&'a str>,
    stack: Vec<&'a str>,
    on_stack: HashSet<&'a str>,
    cycles: Vec<Vec<String>>,
}

/// DFS over named subclass edges; each cycle is reported once, rotated to
/// start at its smallest IRI.
fn subclass_cycles(graph: &RdfGraph) -> Vec<Issue> {
    let mut adj: BTreeMap<&str, Vec<&str>> = BTreeMap::new();
    for triple in graph.triples() {
        if triple.predicate != vocab::RDFS_SUBCLASS_OF {
            continue;
        }
        if let (Some(child), Some(parent)) = (triple.subject.as_iri(), triple.object.as_iri()) {
            adj.entry(child).or_default().push(parent);
        }
    }

    let mut search = CycleSearch {
        adj: &adj,
        visited: HashSet::new(),
        stack: Vec::new(),
        on_stack: HashSet::new(),
        cycles: Vec::new(),
    };
    for &node in adj.keys() {
        if !search.visited.contains(node) {
            find_cycles_from(node, &mut search);
        }
    }

    let mut seen: HashSet<Vec<String>> = HashSet::new();
    let mut issues = Vec::new();
    for mut cycle in search.cycles {
        if let Some(min_pos) = cycle
            .iter()
            .enumerate()
            .min_by_key(|(_, v)| *v)
            .map(|(i, _)| i)
        {
            cycle.rotate_left(min_pos);
        }
        if seen.insert(cycle.clone()) {
            issues.push(Issue::SubclassCycle { members: cycle });
        }
    }
    issues
}

fn find_cycles_from<'a>(node: &'a str, ctx: &mut CycleSearch<'a>) {
    ctx.visited.insert(node);
    ctx.stack.push(node);
    ctx.on_stack.insert(node);

    if let Some(parents) = ctx.adj.get(node) {
        for &parent in parents {
            if ctx.on_stack.contains(parent) {
                if let Some(start) = ctx.stack.iter().position(|&n| n == parent) {
                    ctx.cycles
                        .push(ctx.stack[start..].iter().map(|s| s.to_string()).collect());
                }
            } else if !ctx.visited.contains(parent) {
                find_cycles_from(parent, ctx);
            }
        }
    }

    ctx.stack.pop();
    ctx.on_stack.remove(node);
}

/// Format a cycle as "A → B → A".
fn format_cycle(cycle: &[String]) -> String {
    if cycle.is_empty() {
        return String::new();
    }
    let mut result = cycle.join(" → ");
    result.push_str(" → ");
    result.push_str(&cycle[0]);
    result
}

fn issue_key(issue: &Issue) -> (&str, &str) {
    match issue {
        Issue::DanglingParent { class, parent } => (class.as_str(), parent.as_str()),
        Issue::UnlabeledClass { class } => (class.as_str(), ""),
        Issue::SubclassCycle { members } => (members.first().map_or("", String::as_str), ""),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use taxomap_core::graph::Triple;

    fn add(graph: &mut RdfGraph, s: &str, p: &str, o: Term) {
        graph.insert(Triple::new(Term::iri(s), p, o));
    }

    #[test]
    fn test_clean_graph_has_no_issues() {
        let mut g = RdfGraph::new();
        add(&mut g, "e:A", vocab::RDF_TYPE, Term::iri(vocab::OWL_CLASS));
        add(&mut g, "e:A", vocab::RDFS_LABEL, Term::literal("A"));
        add(
            &mut g,
            "e:A",
            vocab::RDFS_SUBCLASS_OF,
            Term::iri("http://www.w3.org/2002/07/owl#Thing"),
        );
        assert!(validate(&g).is_empty());
    }

    #[test]
    fn test_dangling_and_unlabeled() {
        let mut g = RdfGraph::new();
        add(&mut g, "e:A", vocab::RDF_TYPE, Term::iri(vocab::OWL_CLASS));
        add(&mut g, "e:A", vocab::RDFS_SUBCLASS_OF, Term::iri("e:Missing"));
        let issues = validate(&g);
        assert_eq!(
            issues,
            vec![
                Issue::DanglingParent {
                    class: "e:A".into(),
                    parent: "e:Missing".into()
                },
                Issue::UnlabeledClass { class: "e:A".into() },
            ]
        );
    }

    #[test]
    fn test_cycle_reported_once_from_smallest() {
        let mut g = RdfGraph::new();
        add(&mut g, "e:C", vocab::RDFS_SUBCLASS_OF, Term::iri("e:A"));
        add(&mut g, "e:A", vocab::RDFS_SUBCLASS_OF, Term::iri("e:B"));
        add(&mut g, "e:B", vocab::RDFS_SUBCLASS_OF, Term::iri("e:C"));
        let cycles: Vec<Issue> = validate(&g)
            .into_iter()
            .filter(|i| matches!(i, Issue::SubclassCycle { .. }))
            .collect();
        assert_eq!(cycles.len(), 1);
        assert_eq!(
            cycles[0].to_string(),
            "subclass cycle: e:A → e:B → e:C → e:A"
        );
    }
}
