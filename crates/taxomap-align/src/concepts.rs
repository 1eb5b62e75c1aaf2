//! Concept extraction from the source ontology and the target taxonomy.

use std::collections::{BTreeMap, HashMap};
use taxomap_core::config::NamespaceConfig;
use taxomap_core::graph::{RdfGraph, Term, iri_namespace};
use taxomap_core::vocab;

/// A labelled `owl:Class` from the source ontology.
#[derive(Debug, Clone, PartialEq)]
pub struct SourceConcept {
    pub uri: String,
    /// Distinct `rdfs:label` then `skos:prefLabel` values, first occurrence order.
    pub labels: Vec<String>,
    /// IRI-valued `rdfs:subClassOf` objects; anonymous restrictions are skipped.
    pub parents: Vec<String>,
}

impl SourceConcept {
    pub fn primary_label(&self) -> &str {
        self.labels.first().map_or("", String::as_str)
    }
}

/// A `skos:Concept` from the target taxonomy.
#[derive(Debug, Clone, PartialEq)]
pub struct TargetConcept {
    pub uri: String,
    pub labels: Vec<String>,
    pub related: Vec<String>,
    pub broader: Vec<String>,
    pub narrower: Vec<String>,
}

impl TargetConcept {
    pub fn primary_label(&self) -> &str {
        self.labels.first().map_or("", String::as_str)
    }
}

/// Source concepts keyed by IRI.
pub type SourceConcepts = BTreeMap<String, SourceConcept>;
/// Target concepts keyed by IRI.
pub type TargetConcepts = BTreeMap<String, TargetConcept>;

/// Every `owl:Class` under `namespace` that carries at least one label.
pub fn extract_source_concepts(graph: &RdfGraph, namespace: &str) -> SourceConcepts {
    let mut concepts = BTreeMap::new();

    for subject in graph.instances_of(vocab::OWL_CLASS) {
        let Some(uri) = subject.as_iri() else {
            continue;
        };
        if !uri.starts_with(namespace) {
            continue;
        }

        let mut labels = graph.literal_values(subject, vocab::RDFS_LABEL);
        for label in graph.literal_values(subject, vocab::SKOS_PREF_LABEL) {
            if !labels.contains(&label) {
                labels.push(label);
            }
        }
        if labels.is_empty() {
            continue;
        }

        concepts.insert(
            uri.to_string(),
            SourceConcept {
                uri: uri.to_string(),
                labels,
                parents: graph.iri_objects(subject, vocab::RDFS_SUBCLASS_OF),
            },
        );
    }

    tracing::debug!(count = concepts.len(), namespace, "extracted source concepts");
    concepts
}

/// Every `skos:Concept` with at least one `skos:prefLabel`.
pub fn extract_target_concepts(graph: &RdfGraph) -> TargetConcepts {
    let mut concepts = BTreeMap::new();

    for subject in graph.instances_of(vocab::SKOS_CONCEPT) {
        let Some(uri) = subject.as_iri() else {
            continue;
        };
        let labels = graph.literal_values(subject, vocab::SKOS_PREF_LABEL);
        if labels.is_empty() {
            continue;
        }
        let related = |predicate: &str| -> Vec<String> {
            graph
                .objects(subject, predicate)
                .map(|t| t.lexical().to_string())
                .collect()
        };

        concepts.insert(
            uri.to_string(),
            TargetConcept {
                uri: uri.to_string(),
                labels,
                related: related(vocab::SKOS_RELATED),
                broader: related(vocab::SKOS_BROADER),
                narrower: related(vocab::SKOS_NARROWER),
            },
        );
    }

    tracing::debug!(count = concepts.len(), "extracted target concepts");
    concepts
}

/// Pick the namespace whose classes form the source side of the alignment.
///
/// Order: the configured namespace, then the first declared prefix matching a
/// prefix hint (name) or IRI hint (case-insensitive), then the most common
/// namespace among `owl:Class` subjects. Returns `None` for a graph with no
/// named classes.
pub fn detect_source_namespace(graph: &RdfGraph, hints: &NamespaceConfig) -> Option<String> {
    if let Some(ns) = hints.source.as_deref().filter(|ns| !ns.is_empty()) {
        return Some(ns.to_string());
    }

    let declared = graph.namespaces().iter().find(|(prefix, iri)| {
        let iri_lower = iri.to_lowercase();
        hints.prefix_hints.iter().any(|h| prefix.contains(h.as_str()))
            || hints
                .iri_hints
                .iter()
                .any(|h| iri_lower.contains(&h.to_lowercase()))
    });
    if let Some((_, iri)) = declared {
        return Some(iri.clone());
    }

    let mut counts: HashMap<String, usize> = HashMap::new();
    for class in graph.instances_of(vocab::OWL_CLASS) {
        if let Term::Iri(iri) = class {
            *counts.entry(iri_namespace(iri)).or_insert(0) += 1;
        }
    }
    counts
        .into_iter()
        .max_by(|(a_ns, a_n), (b_ns, b_n)| a_n.cmp(b_n).then_with(|| b_ns.cmp(a_ns)))
        .map(|(ns, _)| ns)
}

#[cfg(test)]
mod tests {
    use super::*;
    use taxomap_core::graph::{Literal, Triple};

    fn class(graph: &mut RdfGraph, iri: &str, label: Option<&str>) {
        graph.insert(Triple::new(
            Term::iri(iri),
            vocab::RDF_TYPE,
            Term::iri(vocab::OWL_CLASS),
        ));
        if let Some(label) = label {
            graph.insert(Triple::new(
                Term::iri(iri),
                vocab::RDFS_LABEL,
                Term::Literal(Literal::plain(label)),
            ));
        }
    }

    #[test]
    fn test_source_concepts_filter_namespace_and_unlabelled() {
        let mut graph = RdfGraph::new();
        class(&mut graph, "http://ex.org/fraud/Grant", Some("Grant fraud"));
        class(&mut graph, "http://ex.org/fraud/Bare", None);
        class(&mut graph, "http://other.org/Thing", Some("Thing"));

        let concepts = extract_source_concepts(&graph, "http://ex.org/fraud/");
        assert_eq!(concepts.len(), 1);
        assert_eq!(
            concepts["http://ex.org/fraud/Grant"].primary_label(),
            "Grant fraud"
        );
    }

    #[test]
    fn test_source_labels_merge_pref_label_without_duplicates() {
        let mut graph = RdfGraph::new();
        let iri = "http://ex.org/fraud/Loan";
        class(&mut graph, iri, Some("Loan fraud"));
        for label in ["Loan fraud", "Lending fraud"] {
            graph.insert(Triple::new(
                Term::iri(iri),
                vocab::SKOS_PREF_LABEL,
                Term::literal(label),
            ));
        }
        let concepts = extract_source_concepts(&graph, "http://ex.org/fraud/");
        assert_eq!(concepts[iri].labels, vec!["Loan fraud", "Lending fraud"]);
    }

    #[test]
    fn test_detect_falls_back_to_most_common_class_namespace() {
        let mut graph = RdfGraph::new();
        class(&mut graph, "http://a.org/x/One", None);
        class(&mut graph, "http://b.org/y/One", None);
        class(&mut graph, "http://b.org/y/Two", None);
        let hints = NamespaceConfig::default();
        assert_eq!(
            detect_source_namespace(&graph, &hints).as_deref(),
            Some("http://b.org/y/")
        );
    }

    #[test]
    fn test_detect_tie_prefers_smallest_namespace() {
        let mut graph = RdfGraph::new();
        class(&mut graph, "http://z.org/One", None);
        class(&mut graph, "http://a.org/One", None);
        assert_eq!(
            detect_source_namespace(&graph, &NamespaceConfig::default()).as_deref(),
            Some("http://a.org/")
        );
    }

    #[test]
    fn test_detect_prefers_hinted_prefix_and_explicit_source() {
        let mut graph = RdfGraph::new();
        graph.add_prefix("ex", "http://ex.org/");
        graph.add_prefix("gfo", "http://gao.example/gfo/");
        class(&mut graph, "http://ex.org/One", None);

        let mut hints = NamespaceConfig::default();
        assert_eq!(
            detect_source_namespace(&graph, &hints).as_deref(),
            Some("http://gao.example/gfo/")
        );

        hints.source = Some("http://explicit.org/".to_string());
        assert_eq!(
            detect_source_namespace(&graph, &hints).as_deref(),
            Some("http://explicit.org/")
        );
    }

    #[test]
    fn test_detect_none_without_classes() {
        assert_eq!(
            detect_source_namespace(&RdfGraph::new(), &NamespaceConfig::default()),
            None
        );
    }
}
