//! In-memory RDF graph with the lookups the mapper and resource search need.

use crate::vocab;
use std::collections::{HashMap, HashSet, VecDeque};
use std::fmt;

/// An RDF term: IRI, blank node, or literal.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Term {
    Iri(String),
    Blank(String),
    Literal(Literal),
}

/// A literal value with optional language tag or datatype.
///
/// `datatype` is only kept for typed literals other than plain strings.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Literal {
    pub value: String,
    pub language: Option<String>,
    pub datatype: Option<String>,
}

impl Literal {
    pub fn plain(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            language: None,
            datatype: None,
        }
    }

    pub fn with_language(value: impl Into<String>, language: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            language: Some(language.into()),
            datatype: None,
        }
    }
}

impl Term {
    pub fn iri(value: impl Into<String>) -> Self {
        Self::Iri(value.into())
    }

    pub fn literal(value: impl Into<String>) -> Self {
        Self::Literal(Literal::plain(value))
    }

    /// The IRI string, if this term is an IRI.
    pub fn as_iri(&self) -> Option<&str> {
        match self {
            Self::Iri(iri) => Some(iri),
            _ => None,
        }
    }

    /// The lexical form: IRI text, blank node id, or literal value.
    pub fn lexical(&self) -> &str {
        match self {
            Self::Iri(iri) => iri,
            Self::Blank(id) => id,
            Self::Literal(lit) => &lit.value,
        }
    }
}

impl fmt::Display for Term {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Iri(iri) => write!(f, "<{}>", iri),
            Self::Blank(id) => write!(f, "_:{}", id),
            Self::Literal(lit) => match (&lit.language, &lit.datatype) {
                (Some(lang), _) => write!(f, "{:?}@{}", lit.value, lang),
                (None, Some(dt)) => write!(f, "{:?}^^<{}>", lit.value, dt),
                (None, None) => write!(f, "{:?}", lit.value),
            },
        }
    }
}

/// A single statement. Predicates are always IRIs.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Triple {
    pub subject: Term,
    pub predicate: String,
    pub object: Term,
}

impl Triple {
    pub fn new(subject: Term, predicate: impl Into<String>, object: Term) -> Self {
        Self {
            subject,
            predicate: predicate.into(),
            object,
        }
    }
}

/// An RDF graph that preserves insertion order.
///
/// Duplicate triples are dropped on insert. Every lookup returns results in the
/// order the triples were first seen, which keeps "first label" semantics stable.
#[derive(Debug, Clone, Default)]
pub struct RdfGraph {
    triples: Vec<Triple>,
    /// subject → triple indices.
    by_subject: HashMap<Term, Vec<usize>>,
    /// predicate → object → triple indices.
    by_predicate_object: HashMap<String, HashMap<Term, Vec<usize>>>,
    /// Prefixes declared by the source document, sorted by prefix name.
    prefixes: Vec<(String, String)>,
}

impl RdfGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a triple. Returns false if the graph already held it.
    pub fn insert(&mut self, triple: Triple) -> bool {
        if let Some(indices) = self.by_subject.get(&triple.subject)
            && indices.iter().any(|&i| self.triples[i] == triple)
        {
            return false;
        }

        let idx = self.triples.len();
        self.by_subject
            .entry(triple.subject.clone())
            .or_default()
            .push(idx);
        self.by_predicate_object
            .entry(triple.predicate.clone())
            .or_default()
            .entry(triple.object.clone())
            .or_default()
            .push(idx);
        self.triples.push(triple);
        true
    }

    pub fn len(&self) -> usize {
        self.triples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.triples.is_empty()
    }

    pub fn triples(&self) -> impl Iterator<Item = &Triple> {
        self.triples.iter()
    }

    /// Register a namespace prefix. A redeclared prefix keeps its latest IRI.
    pub fn add_prefix(&mut self, prefix: impl Into<String>, iri: impl Into<String>) {
        let prefix = prefix.into();
        let iri = iri.into();
        match self.prefixes.binary_search_by(|(p, _)| p.as_str().cmp(&prefix)) {
            Ok(pos) => self.prefixes[pos].1 = iri,
            Err(pos) => self.prefixes.insert(pos, (prefix, iri)),
        }
    }

    /// Declared prefixes as (prefix, namespace IRI), ordered by prefix.
    pub fn namespaces(&self) -> &[(String, String)] {
        &self.prefixes
    }

    /// Whether any triple has `subject` as its subject.
    pub fn describes(&self, subject: &Term) -> bool {
        self.by_subject.contains_key(subject)
    }

    /// Objects of all `subject predicate ?o` triples.
    pub fn objects<'a>(
        &'a self,
        subject: &Term,
        predicate: &'a str,
    ) -> impl Iterator<Item = &'a Term> + use<'a> {
        self.by_subject
            .get(subject)
            .into_iter()
            .flatten()
            .map(|&i| &self.triples[i])
            .filter(move |t| t.predicate == predicate)
            .map(|t| &t.object)
    }

    /// Subjects of all `?s predicate object` triples.
    pub fn subjects<'a>(
        &'a self,
        predicate: &str,
        object: &Term,
    ) -> impl Iterator<Item = &'a Term> + use<'a> {
        self.by_predicate_object
            .get(predicate)
            .and_then(|by_object| by_object.get(object))
            .into_iter()
            .flatten()
            .map(|&i| &self.triples[i].subject)
    }

    /// Distinct subjects declared `rdf:type class`, in first-seen order.
    pub fn instances_of(&self, class: &str) -> Vec<&Term> {
        let class = Term::iri(class);
        let mut seen = HashSet::new();
        self.subjects(vocab::RDF_TYPE, &class)
            .filter(|s| seen.insert(*s))
            .collect()
    }

    pub fn has_type(&self, subject: &Term, class: &str) -> bool {
        self.objects(subject, vocab::RDF_TYPE)
            .any(|t| t.as_iri() == Some(class))
    }

    /// Direct `rdf:type` objects of a subject.
    pub fn types_of<'a>(&'a self, subject: &Term) -> Vec<&'a Term> {
        self.objects(subject, vocab::RDF_TYPE).collect()
    }

    /// Lexical values of `subject predicate ?o`, deduplicated, first-seen order.
    pub fn literal_values(&self, subject: &Term, predicate: &str) -> Vec<String> {
        let mut out: Vec<String> = Vec::new();
        for object in self.objects(subject, predicate) {
            let value = object.lexical();
            if !out.iter().any(|v| v == value) {
                out.push(value.to_string());
            }
        }
        out
    }

    /// IRI-valued objects of `subject predicate ?o` (blank nodes and literals skipped).
    pub fn iri_objects(&self, subject: &Term, predicate: &str) -> Vec<String> {
        self.objects(subject, predicate)
            .filter_map(|t| t.as_iri().map(str::to_string))
            .collect()
    }

    /// Direct `rdfs:subClassOf` children of a class.
    pub fn sub_classes<'a>(&'a self, class: &Term) -> Vec<&'a Term> {
        self.subjects(vocab::RDFS_SUBCLASS_OF, class).collect()
    }

    /// Every node reachable via `rdfs:subClassOf*`, starting with `class` itself.
    /// Blank nodes are traversed like any other node; cycles terminate.
    pub fn super_class_closure(&self, class: &Term) -> Vec<Term> {
        let mut visited: HashSet<Term> = HashSet::new();
        let mut order = Vec::new();
        let mut queue = VecDeque::from([class.clone()]);

        while let Some(current) = queue.pop_front() {
            if !visited.insert(current.clone()) {
                continue;
            }
            for parent in self.objects(&current, vocab::RDFS_SUBCLASS_OF) {
                if !visited.contains(parent) {
                    queue.push_back(parent.clone());
                }
            }
            order.push(current);
        }
        order
    }

    /// `class rdfs:subClassOf* ancestor` (reflexive).
    pub fn is_subclass_of(&self, class: &Term, ancestor: &str) -> bool {
        if class.as_iri() == Some(ancestor) {
            return true;
        }
        let mut visited: HashSet<&Term> = HashSet::new();
        let mut queue: VecDeque<&Term> = VecDeque::from([class]);
        while let Some(current) = queue.pop_front() {
            if !visited.insert(current) {
                continue;
            }
            for parent in self.objects(current, vocab::RDFS_SUBCLASS_OF) {
                if parent.as_iri() == Some(ancestor) {
                    return true;
                }
                queue.push_back(parent);
            }
        }
        false
    }
}

/// Namespace part of an IRI: up to and including the last `#`, else the last `/`.
pub fn iri_namespace(iri: &str) -> String {
    if let Some(pos) = iri.rfind('#') {
        return iri[..=pos].to_string();
    }
    match iri.rfind('/') {
        Some(pos) => iri[..=pos].to_string(),
        None => format!("{}/", iri),
    }
}

/// Local name of an IRI: the text after the last `#` or `/`.
pub fn local_name(iri: &str) -> &str {
    iri.rfind(['#', '/']).map_or(iri, |pos| &iri[pos + 1..])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_iri_namespace_slash_and_hash() {
        assert_eq!(
            iri_namespace("https://example.org/onto/Thing"),
            "https://example.org/onto/"
        );
        assert_eq!(
            iri_namespace("http://www.w3.org/2002/07/owl#Class"),
            "http://www.w3.org/2002/07/owl#"
        );
        assert_eq!(iri_namespace("urn:thing"), "urn:thing/");
    }

    #[test]
    fn test_local_name() {
        assert_eq!(local_name("https://example.org/onto/GrantFraud"), "GrantFraud");
        assert_eq!(local_name("http://www.w3.org/2002/07/owl#Class"), "Class");
        assert_eq!(local_name("plain"), "plain");
    }

    #[test]
    fn test_term_display() {
        assert_eq!(Term::iri("http://x/a").to_string(), "<http://x/a>");
        assert_eq!(Term::Blank("b0".into()).to_string(), "_:b0");
        assert_eq!(
            Term::Literal(Literal::with_language("Fraud", "en")).to_string(),
            "\"Fraud\"@en"
        );
    }

    #[test]
    fn test_add_prefix_keeps_sorted_and_overrides() {
        let mut graph = RdfGraph::new();
        graph.add_prefix("skos", "http://www.w3.org/2004/02/skos/core#");
        graph.add_prefix("gfo", "http://a/");
        graph.add_prefix("gfo", "http://b/");
        let names: Vec<&str> = graph.namespaces().iter().map(|(p, _)| p.as_str()).collect();
        assert_eq!(names, vec!["gfo", "skos"]);
        assert_eq!(graph.namespaces()[0].1, "http://b/");
    }
}
