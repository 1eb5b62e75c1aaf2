//! Hierarchy traversal from a class or concept.

use crate::search::node_labels;
use serde::Serialize;
use std::collections::{HashSet, VecDeque};
use taxomap_core::graph::{RdfGraph, Term, local_name};
use taxomap_core::vocab;

/// Traversal direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// Towards broader nodes (superclasses, `skos:broader`).
    Upstream,
    /// Towards narrower nodes (subclasses, `skos:narrower`).
    Downstream,
    Both,
}

impl std::str::FromStr for Direction {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "up" | "upstream" => Ok(Self::Upstream),
            "down" | "downstream" => Ok(Self::Downstream),
            "both" => Ok(Self::Both),
            other => Err(format!(
                "unknown direction `{other}` (expected upstream, downstream or both)"
            )),
        }
    }
}

/// Which hierarchy a traversal follows, picked from the start node's type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Hierarchy {
    /// `rdfs:subClassOf`
    Class,
    /// `skos:broader` / `skos:narrower`
    Skos,
}

/// A node in the traversal result tree.
#[derive(Debug, Clone, Serialize)]
pub struct TraversalNode {
    pub iri: String,
    pub label: String,
    /// How this node relates to its parent in the tree, e.g. "superclass".
    #[serde(skip_serializing_if = "Option::is_none")]
    pub relation: Option<&'static str>,
    pub depth: usize,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<TraversalNode>,
}

/// BFS from `start_iri` up to `max_depth` levels; each node appears once.
/// Returns `None` when the graph says nothing about the start node.
pub fn explore(
    graph: &RdfGraph,
    start_iri: &str,
    direction: Direction,
    max_depth: usize,
) -> Option<TraversalNode> {
    let start = Term::iri(start_iri);
    if !graph.describes(&start) && graph.sub_classes(&start).is_empty() {
        return None;
    }
    let hierarchy = if graph.has_type(&start, vocab::SKOS_CONCEPT) {
        Hierarchy::Skos
    } else {
        Hierarchy::Class
    };

    let mut root = TraversalNode {
        iri: start_iri.to_string(),
        label: display_label(graph, &start),
        relation: None,
        depth: 0,
        children: Vec::new(),
    };

    let mut visited: HashSet<Term> = HashSet::from([start.clone()]);
    let mut queue: VecDeque<(Term, usize, Vec<usize>)> = VecDeque::new();
    queue.push_back((start, 0, Vec::new()));

    while let Some((current, depth, path_indices)) = queue.pop_front() {
        if depth >= max_depth {
            continue;
        }

        for (neighbor, relation) in neighbors(graph, &current, hierarchy, direction) {
            if !visited.insert(neighbor.clone()) {
                continue;
            }
            let Some(iri) = neighbor.as_iri() else {
                continue;
            };

            let child = TraversalNode {
                iri: iri.to_string(),
                label: display_label(graph, &neighbor),
                relation: Some(relation),
                depth: depth + 1,
                children: Vec::new(),
            };
            insert_child(&mut root, &path_indices, child);

            let mut new_path = path_indices.clone();
            new_path.push(get_child_count(&root, &path_indices) - 1);
            queue.push_back((neighbor, depth + 1, new_path));
        }
    }

    Some(root)
}

fn neighbors(
    graph: &RdfGraph,
    node: &Term,
    hierarchy: Hierarchy,
    direction: Direction,
) -> Vec<(Term, &'static str)> {
    let mut out: Vec<(Term, &'static str)> = Vec::new();
    let up = matches!(direction, Direction::Upstream | Direction::Both);
    let down = matches!(direction, Direction::Downstream | Direction::Both);

    match hierarchy {
        Hierarchy::Class => {
            if up {
                out.extend(
                    graph
                        .objects(node, vocab::RDFS_SUBCLASS_OF)
                        .filter(|t| t.as_iri().is_some())
                        .map(|t| (t.clone(), "superclass")),
                );
            }
            if down {
                out.extend(
                    graph
                        .sub_classes(node)
                        .into_iter()
                        .map(|t| (t.clone(), "subclass")),
                );
            }
        }
        Hierarchy::Skos => {
            if up {
                out.extend(
                    graph
                        .objects(node, vocab::SKOS_BROADER)
                        .chain(graph.subjects(vocab::SKOS_NARROWER, node))
                        .map(|t| (t.clone(), "broader")),
                );
            }
            if down {
                out.extend(
                    graph
                        .objects(node, vocab::SKOS_NARROWER)
                        .chain(graph.subjects(vocab::SKOS_BROADER, node))
                        .map(|t| (t.clone(), "narrower")),
                );
            }
        }
    }
    out
}

/// First label, or the IRI's local name.
pub fn display_label(graph: &RdfGraph, node: &Term) -> String {
    node_labels(graph, node)
        .into_iter()
        .next()
        .unwrap_or_else(|| local_name(node.lexical()).to_string())
}

fn insert_child(root: &mut TraversalNode, path: &[usize], child: TraversalNode) {
    if path.is_empty() {
        root.children.push(child);
        return;
    }

    if let Some(node) = root.children.get_mut(path[0]) {
        insert_child(node, &path[1..], child);
    }
}

fn get_child_count(root: &TraversalNode, path: &[usize]) -> usize {
    if path.is_empty() {
        return root.children.len();
    }

    if let Some(node) = root.children.get(path[0]) {
        get_child_count(node, &path[1..])
    } else {
        0
    }
}

/// Format a traversal result as an indented tree string.
pub fn format_tree(node: &TraversalNode) -> String {
    format_tree_inner(node, 0, false)
}

fn format_tree_inner(node: &TraversalNode, indent: usize, is_last: bool) -> String {
    let mut output = String::new();
    let prefix = "  ".repeat(indent);

    if indent == 0 {
        output.push_str(&format!("{} <{}>\n", node.label, node.iri));
    } else {
        let connector = if is_last { "└──" } else { "├──" };
        output.push_str(&format!(
            "{}{} {}: {} <{}>\n",
            prefix,
            connector,
            node.relation.unwrap_or(""),
            node.label,
            node.iri
        ));
    }

    let child_count = node.children.len();
    for (i, child) in node.children.iter().enumerate() {
        output.push_str(&format_tree_inner(child, indent + 1, i == child_count - 1));
    }

    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use taxomap_core::graph::Triple;

    fn sub(graph: &mut RdfGraph, child: &str, parent: &str) {
        graph.insert(Triple::new(
            Term::iri(child),
            vocab::RDFS_SUBCLASS_OF,
            Term::iri(parent),
        ));
    }

    fn chain() -> RdfGraph {
        let mut g = RdfGraph::new();
        sub(&mut g, "http://e.org/Grant", "http://e.org/Fraud");
        sub(&mut g, "http://e.org/Fraud", "http://e.org/Activity");
        sub(&mut g, "http://e.org/Loan", "http://e.org/Fraud");
        g.insert(Triple::new(
            Term::iri("http://e.org/Fraud"),
            vocab::RDFS_LABEL,
            Term::literal("Fraud"),
        ));
        g
    }

    #[test]
    fn test_upstream_follows_superclasses() {
        let tree = explore(&chain(), "http://e.org/Grant", Direction::Upstream, 5).unwrap();
        assert_eq!(tree.children.len(), 1);
        assert_eq!(tree.children[0].label, "Fraud");
        assert_eq!(tree.children[0].relation, Some("superclass"));
        assert_eq!(tree.children[0].children[0].iri, "http://e.org/Activity");
    }

    #[test]
    fn test_downstream_depth_limit() {
        let tree = explore(&chain(), "http://e.org/Activity", Direction::Downstream, 1).unwrap();
        assert_eq!(tree.children.len(), 1);
        assert!(tree.children[0].children.is_empty());

        let deep = explore(&chain(), "http://e.org/Activity", Direction::Downstream, 2).unwrap();
        assert_eq!(deep.children[0].children.len(), 2);
    }

    #[test]
    fn test_both_visits_each_node_once() {
        let tree = explore(&chain(), "http://e.org/Fraud", Direction::Both, 3).unwrap();
        let iris: Vec<&str> = tree.children.iter().map(|c| c.iri.as_str()).collect();
        assert_eq!(iris, vec![
                "http://e.org/Activity",
                "http://e.org/Grant",
                "http://e.org/Loan"
            ]);
        assert!(tree.children.iter().all(|c| c.children.is_empty()));
    }

    #[test]
    fn test_unknown_start() {
        assert!(explore(&chain(), "http://e.org/Nothing", Direction::Both, 3).is_none());
    }

    #[test]
    fn test_skos_hierarchy() {
        let mut g = RdfGraph::new();
        for iri in ["t:Fraud", "t:Grant"] {
            g.insert(Triple::new(
                Term::iri(iri),
                vocab::RDF_TYPE,
                Term::iri(vocab::SKOS_CONCEPT),
            ));
        }
        g.insert(Triple::new(
            Term::iri("t:Grant"),
            vocab::SKOS_BROADER,
            Term::iri("t:Fraud"),
        ));
        let tree = explore(&g, "t:Fraud", Direction::Downstream, 2).unwrap();
        assert_eq!(tree.children[0].iri, "t:Grant");
        assert_eq!(tree.children[0].relation, Some("narrower"));
    }

    #[test]
    fn test_format_tree_connectors() {
        let tree = explore(&chain(), "http://e.org/Activity", Direction::Downstream, 2).unwrap();
        let text = format_tree(&tree);
        assert!(text.starts_with("Activity <http://e.org/Activity>\n"));
        assert!(text.contains("└── subclass: Fraud <http://e.org/Fraud>"));
        assert!(text.contains("├── subclass: Grant <http://e.org/Grant>"));
        assert!(text.contains("└── subclass: Loan <http://e.org/Loan>"));
    }
}
