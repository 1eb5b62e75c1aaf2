use criterion::{Criterion, criterion_group, criterion_main};
use std::hint::black_box;
use taxomap_core::graph::{RdfGraph, Term, Triple};
use taxomap_core::vocab;
use taxomap_nav::resources::search_resources;
use taxomap_nav::search::search_concepts;

const NS: &str = "http://example.org/gfo/";

fn add(graph: &mut RdfGraph, subject: &Term, predicate: &str, object: Term) {
    graph.insert(Triple::new(subject.clone(), predicate, object));
}

/// Activity classes grouped under a few parents, plus one report per class.
fn build_search_graph(size: usize) -> RdfGraph {
    let mut graph = RdfGraph::new();

    let areas = [
        ("Healthcare", "healthcare billing fraud"),
        ("Procurement", "contract bid rigging"),
        ("Benefits", "benefit eligibility fraud"),
        ("Identity", "stolen identity misuse"),
        ("Payments", "improper payment diversion"),
        ("Grants", "grant award misuse"),
        ("Loans", "loan application fraud"),
        ("Cyber", "phishing and account takeover"),
    ];

    let root = Term::iri(format!("{NS}FraudActivity"));
    add(&mut graph, &root, vocab::RDF_TYPE, Term::iri(vocab::OWL_CLASS));
    add(&mut graph, &root, vocab::RDFS_LABEL, Term::literal("Fraud activity"));

    for (area, _) in &areas {
        let parent = Term::iri(format!("{NS}{area}Fraud"));
        add(&mut graph, &parent, vocab::RDF_TYPE, Term::iri(vocab::OWL_CLASS));
        add(&mut graph, &parent, vocab::RDFS_SUBCLASS_OF, root.clone());
        add(&mut graph, &parent, vocab::RDFS_LABEL, Term::literal(format!("{area} fraud")));
    }

    for i in 0..size {
        let (area, phrase) = areas[i % areas.len()];
        let class = Term::iri(format!("{NS}{area}Scheme{i}"));
        add(&mut graph, &class, vocab::RDF_TYPE, Term::iri(vocab::OWL_CLASS));
        add(
            &mut graph,
            &class,
            vocab::RDFS_SUBCLASS_OF,
            Term::iri(format!("{NS}{area}Fraud")),
        );
        add(&mut graph, &class, vocab::RDFS_LABEL, Term::literal(format!("{phrase} {i}")));

        let report = Term::iri(format!("{NS}Report{i}"));
        add(&mut graph, &report, vocab::RDF_TYPE, Term::iri(format!("{NS}GAOReport")));
        add(&mut graph, &report, vocab::RDF_TYPE, class.clone());
        add(&mut graph, &report, vocab::RDFS_LABEL, Term::literal(format!("Report {i}")));
    }

    graph
}

fn bench_search_small(c: &mut Criterion) {
    let graph = build_search_graph(50);

    c.bench_function("search_50_classes", |b| {
        b.iter(|| search_concepts(black_box(&graph), black_box("grant award"), None, 10))
    });
}

fn bench_search_medium(c: &mut Criterion) {
    let graph = build_search_graph(500);

    c.bench_function("search_500_classes", |b| {
        b.iter(|| {
            search_concepts(
                black_box(&graph),
                black_box("healthcare billing fraud"),
                None,
                10,
            )
        })
    });
}

fn bench_search_large(c: &mut Criterion) {
    let graph = build_search_graph(2000);

    c.bench_function("search_2000_classes", |b| {
        b.iter(|| search_concepts(black_box(&graph), black_box("identty misuse"), None, 10))
    });
}

fn bench_resources(c: &mut Criterion) {
    let graph = build_search_graph(500);
    let activity = format!("{NS}GrantsFraud");

    c.bench_function("resources_500_classes", |b| {
        b.iter(|| search_resources(black_box(&graph), black_box(&activity), NS))
    });
}

criterion_group!(
    benches,
    bench_search_small,
    bench_search_medium,
    bench_search_large,
    bench_resources,
);
criterion_main!(benches);
