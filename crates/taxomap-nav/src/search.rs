//! Label search over ontology classes and taxonomy concepts.

use serde::Serialize;
use std::collections::{HashMap, HashSet};
use taxomap_core::graph::{RdfGraph, Term};
use taxomap_core::vocab;

/// Which kind of node a search result is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ConceptKind {
    /// `owl:Class`
    Class,
    /// `skos:Concept`
    Concept,
}

impl std::str::FromStr for ConceptKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "class" | "classes" => Ok(Self::Class),
            "concept" | "concepts" => Ok(Self::Concept),
            other => Err(format!("unknown kind `{other}` (expected class or concept)")),
        }
    }
}

/// A search result with relevance score.
#[derive(Debug, Clone, Serialize)]
pub struct SearchHit {
    pub iri: String,
    /// First label of the node.
    pub label: String,
    /// The label that scored best.
    pub matched_label: String,
    pub kind: ConceptKind,
    pub score: f64,
}

/// Minimum label score for a node to be returned.
const MIN_SCORE: f64 = 0.05;

struct Candidate<'a> {
    iri: &'a str,
    kind: ConceptKind,
    labels: Vec<String>,
}

/// Search labelled classes and concepts for `query`, best first.
pub fn search_concepts(
    graph: &RdfGraph,
    query: &str,
    kind: Option<ConceptKind>,
    limit: usize,
) -> Vec<SearchHit> {
    let query_lower = query.to_lowercase();
    let query_terms: Vec<&str> = query_lower.split_whitespace().collect();
    if query_terms.is_empty() {
        return Vec::new();
    }

    let candidates = collect_candidates(graph, kind);
    let idf = compute_idf(&candidates);
    let query_joined = query_terms.join(" ");

    let mut results: Vec<SearchHit> = Vec::new();
    for candidate in &candidates {
        let best = candidate
            .labels
            .iter()
            .map(|label| {
                (
                    label,
                    multi_signal_score(label, &query_joined, &query_terms, &idf),
                )
            })
            .fold(None::<(&String, f64)>, |best, (label, score)| match best {
                Some((_, s)) if s >= score => best,
                _ => Some((label, score)),
            });

        if let Some((matched, score)) = best
            && score > MIN_SCORE
        {
            results.push(SearchHit {
                iri: candidate.iri.to_string(),
                label: candidate.labels[0].clone(),
                matched_label: matched.clone(),
                kind: candidate.kind,
                score,
            });
        }
    }

    results.sort_by(|a, b| {
        b.score
            .partial_cmp(&a.score)
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    results.truncate(limit);
    results
}

fn collect_candidates(graph: &RdfGraph, kind: Option<ConceptKind>) -> Vec<Candidate<'_>> {
    let mut out = Vec::new();
    let mut seen: HashSet<&str> = HashSet::new();

    let sources = [
        (ConceptKind::Class, vocab::OWL_CLASS),
        (ConceptKind::Concept, vocab::SKOS_CONCEPT),
    ];
    for (candidate_kind, class) in sources {
        if kind.is_some_and(|k| k != candidate_kind) {
            continue;
        }
        for node in graph.instances_of(class) {
            let Term::Iri(iri) = node else {
                continue;
            };
            if !seen.insert(iri.as_str()) {
                continue;
            }
            let labels = node_labels(graph, node);
            if !labels.is_empty() {
                out.push(Candidate {
                    iri,
                    kind: candidate_kind,
                    labels,
                });
            }
        }
    }
    out
}

/// `rdfs:label` values followed by any `skos:prefLabel` not already present.
pub fn node_labels(graph: &RdfGraph, node: &Term) -> Vec<String> {
    let mut labels = graph.literal_values(node, vocab::RDFS_LABEL);
    for label in graph.literal_values(node, vocab::SKOS_PREF_LABEL) {
        if !labels.contains(&label) {
            labels.push(label);
        }
    }
    labels
}

/// IDF(term) = ln(N / (1 + df(term))), where N = candidate count and df = candidates
/// whose labels contain the term.
fn compute_idf(candidates: &[Candidate<'_>]) -> HashMap<String, f64> {
    let n = candidates.len() as f64;
    let mut df: HashMap<String, usize> = HashMap::new();

    for candidate in candidates {
        let mut tokens: HashSet<String> = HashSet::new();
        for label in &candidate.labels {
            for token in label.to_lowercase().split_whitespace() {
                tokens.insert(token.to_string());
            }
        }
        for token in tokens {
            *df.entry(token).or_insert(0) += 1;
        }
    }

    df.into_iter()
        .map(|(term, count)| {
            let idf = (n / (1.0 + count as f64)).ln().max(0.0);
            (term, idf)
        })
        .collect()
}

/// IDF-weighted token overlap: sum of IDF values for matching tokens, normalized.
fn idf_weighted_overlap(
    query_tokens: &HashSet<&str>,
    text_tokens: &HashSet<&str>,
    idf: &HashMap<String, f64>,
) -> f64 {
    if query_tokens.is_empty() {
        return 0.0;
    }

    let mut match_weight = 0.0;
    let mut total_weight = 0.0;

    for qt in query_tokens {
        let w = idf.get(*qt).copied().unwrap_or(1.0);
        total_weight += w;
        if text_tokens.contains(qt) {
            match_weight += w;
        }
    }

    if total_weight == 0.0 {
        return 0.0;
    }
    match_weight / total_weight
}

/// Score a label against the query:
/// 1. IDF-weighted token overlap
/// 2. Exact phrase bonus
/// 3. Edit distance for near-misses
fn multi_signal_score(
    text: &str,
    query: &str,
    query_terms: &[&str],
    idf: &HashMap<String, f64>,
) -> f64 {
    let text_lower = text.to_lowercase();
    let text_tokens: HashSet<&str> = text_lower.split_whitespace().collect();
    let query_tokens: HashSet<&str> = query_terms.iter().copied().collect();

    let overlap = idf_weighted_overlap(&query_tokens, &text_tokens, idf);

    let phrase_bonus = if text_lower.contains(query) { 0.5 } else { 0.0 };

    // Only fuzzy matches above 0.6 count.
    let mut edit_score = 0.0;
    for term in query_terms {
        let mut best = 0.0_f64;
        for token in &text_tokens {
            let sim = strsim::normalized_levenshtein(term, token);
            if sim > 0.6 {
                best = best.max(sim);
            }
        }
        edit_score += best;
    }
    edit_score /= query_terms.len() as f64;

    overlap * 0.4 + phrase_bonus * 0.2 + edit_score * 0.4
}
