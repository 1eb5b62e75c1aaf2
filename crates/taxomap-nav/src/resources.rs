//! Resource lookup: which reports, schemes and guidance documents address a
//! given fraud activity.
//!
//! An individual of a resource class is linked to an activity either through an
//! OWL restriction it is typed with (`owl:onProperty <link>` +
//! `owl:someValuesFrom S`, with `S rdfs:subClassOf* activity`) or through a
//! direct type below the activity in the class hierarchy.

use serde::Serialize;
use std::cmp::Ordering;
use taxomap_core::graph::{RdfGraph, Term};
use taxomap_core::vocab;

/// The five resource kinds, in display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ResourceCategory {
    GaoReport,
    FraudScheme,
    PreventionGuidance,
    Awareness,
    RiskManagement,
}

impl ResourceCategory {
    pub const ALL: [ResourceCategory; 5] = [
        Self::GaoReport,
        Self::FraudScheme,
        Self::PreventionGuidance,
        Self::Awareness,
        Self::RiskManagement,
    ];

    /// Local name of the category's OWL class.
    pub fn class_name(self) -> &'static str {
        match self {
            Self::GaoReport => "GAOReport",
            Self::FraudScheme => "FederalFraudScheme",
            Self::PreventionGuidance => "FraudPreventionAndDetectionGuidance",
            Self::Awareness => "FraudEducation",
            Self::RiskManagement => "FraudRiskManagementPrinciples",
        }
    }

    /// Local name of the object property that links individuals to activities.
    pub fn link_property(self) -> &'static str {
        match self {
            Self::FraudScheme => "involves",
            _ => "addresses",
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            Self::GaoReport => "GAO Reports",
            Self::FraudScheme => "Fraud Scheme Examples",
            Self::PreventionGuidance => "Fraud Prevention & Detection Guidance",
            Self::Awareness => "Fraud Awareness Resources",
            Self::RiskManagement => "Fraud Risk Management Principles",
        }
    }
}

/// One matching individual. Optional fields hold the first value found.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResourceHit {
    pub iri: String,
    pub label: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub definition: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub website: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fraud_narrative: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_defined_by: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ResourceGroup {
    pub category: ResourceCategory,
    pub hits: Vec<ResourceHit>,
}

/// All resource groups for one activity, in `ResourceCategory::ALL` order.
#[derive(Debug, Clone, Serialize)]
pub struct ResourceSearch {
    pub activity: String,
    pub groups: Vec<ResourceGroup>,
}

impl ResourceSearch {
    pub fn total(&self) -> usize {
        self.groups.iter().map(|g| g.hits.len()).sum()
    }

    pub fn group(&self, category: ResourceCategory) -> Option<&ResourceGroup> {
        self.groups.iter().find(|g| g.category == category)
    }
}

/// Run every category for `activity_iri`. Class and property names resolve
/// against `namespace`.
pub fn search_resources(graph: &RdfGraph, activity_iri: &str, namespace: &str) -> ResourceSearch {
    let groups: Vec<ResourceGroup> = ResourceCategory::ALL
        .iter()
        .map(|&category| ResourceGroup {
            category,
            hits: search_category(graph, activity_iri, category, namespace),
        })
        .collect();

    let search = ResourceSearch {
        activity: activity_iri.to_string(),
        groups,
    };
    tracing::debug!(activity = activity_iri, total = search.total(), "resource search");
    search
}

/// Individuals of one category that address `activity_iri`, sorted by label then IRI.
pub fn search_category(
    graph: &RdfGraph,
    activity_iri: &str,
    category: ResourceCategory,
    namespace: &str,
) -> Vec<ResourceHit> {
    let class_iri = vocab::expand(namespace, category.class_name());
    let ctx = MatchContext {
        graph,
        activity: activity_iri,
        class_iri: &class_iri,
        link: vocab::expand(namespace, category.link_property()),
        // Schemes must also reach a labelled class other than the root activity.
        excluded_root: (category == ResourceCategory::FraudScheme)
            .then(|| vocab::expand(namespace, vocab::GFO_FRAUD_ACTIVITY)),
    };
    let website = vocab::expand(namespace, "hasWebsite");
    let narrative = vocab::expand(namespace, "fraudNarrative");

    let mut hits = Vec::new();
    for individual in graph.instances_of(&class_iri) {
        let labels = graph.literal_values(individual, vocab::RDFS_LABEL);
        if labels.is_empty() || !ctx.addresses_activity(individual) {
            continue;
        }

        let first = |predicate: &str| {
            graph
                .objects(individual, predicate)
                .next()
                .map(|t| t.lexical().to_string())
        };
        let (definition, site, description, fraud_narrative) = match category {
            ResourceCategory::FraudScheme => (
                None,
                None,
                first(vocab::DCTERMS_DESCRIPTION),
                first(narrative.as_str()),
            ),
            _ => (first(vocab::SKOS_DEFINITION), first(website.as_str()), None, None),
        };
        let is_defined_by = first(vocab::RDFS_IS_DEFINED_BY);

        for label in labels {
            hits.push(ResourceHit {
                iri: individual.lexical().to_string(),
                label,
                definition: definition.clone(),
                website: site.clone(),
                description: description.clone(),
                fraud_narrative: fraud_narrative.clone(),
                is_defined_by: is_defined_by.clone(),
            });
        }
    }

    hits.sort_by(|a, b| match a.label.cmp(&b.label) {
        Ordering::Equal => a.iri.cmp(&b.iri),
        other => other,
    });
    hits
}

struct MatchContext<'a> {
    graph: &'a RdfGraph,
    activity: &'a str,
    class_iri: &'a str,
    link: String,
    excluded_root: Option<String>,
}

impl MatchContext<'_> {
    fn addresses_activity(&self, individual: &Term) -> bool {
        self.graph
            .types_of(individual)
            .into_iter()
            .any(|ty| self.via_restriction(ty) || self.via_subclass(ty))
    }

    /// `ty owl:onProperty link ; owl:someValuesFrom S` with `S ⊑* activity`.
    fn via_restriction(&self, ty: &Term) -> bool {
        let on_link = self
            .graph
            .objects(ty, vocab::OWL_ON_PROPERTY)
            .any(|p| p.as_iri() == Some(self.link.as_str()));
        on_link
            && self
                .graph
                .objects(ty, vocab::OWL_SOME_VALUES_FROM)
                .any(|target| self.below_activity(target))
    }

    /// A direct type other than the category class with `ty ⊑* activity`.
    fn via_subclass(&self, ty: &Term) -> bool {
        ty.as_iri() != Some(self.class_iri) && self.below_activity(ty)
    }

    fn below_activity(&self, class: &Term) -> bool {
        if !self.graph.is_subclass_of(class, self.activity) {
            return false;
        }
        match &self.excluded_root {
            None => true,
            Some(root) => self.graph.super_class_closure(class).iter().any(|node| {
                node.as_iri() != Some(root.as_str())
                    && self.graph.objects(node, vocab::RDFS_LABEL).next().is_some()
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use taxomap_core::graph::Triple;

    const NS: &str = "http://ex.org/gfo/";

    fn iri(local: &str) -> Term {
        Term::iri(format!("{NS}{local}"))
    }

    fn add(graph: &mut RdfGraph, s: Term, p: &str, o: Term) {
        graph.insert(Triple::new(s, p, o));
    }

    fn base_graph() -> RdfGraph {
        let mut g = RdfGraph::new();
        add(&mut g, iri("GrantFraud"), vocab::RDFS_SUBCLASS_OF, iri("FraudActivity"));
        add(&mut g, iri("GrantFraud"), vocab::RDFS_LABEL, Term::literal("Grant fraud"));
        add(&mut g, iri("FraudActivity"), vocab::RDFS_LABEL, Term::literal("Fraud activity"));
        g
    }

    #[test]
    fn test_restriction_branch_matches_report() {
        let mut g = base_graph();
        let restriction = Term::Blank("r1".to_string());
        add(&mut g, restriction.clone(), vocab::OWL_ON_PROPERTY, iri("addresses"));
        add(&mut g, restriction.clone(), vocab::OWL_SOME_VALUES_FROM, iri("GrantFraud"));

        let report = iri("Report1");
        add(&mut g, report.clone(), vocab::RDF_TYPE, iri("GAOReport"));
        add(&mut g, report.clone(), vocab::RDF_TYPE, restriction);
        add(&mut g, report.clone(), vocab::RDFS_LABEL, Term::literal("Grants oversight"));
        add(&mut g, report.clone(), vocab::SKOS_DEFINITION, Term::literal("A report"));

        let hits = search_category(
            &g,
            &format!("{NS}GrantFraud"),
            ResourceCategory::GaoReport,
            NS,
        );
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].label, "Grants oversight");
        assert_eq!(hits[0].definition.as_deref(), Some("A report"));
        assert_eq!(hits[0].website, None);
    }

    #[test]
    fn test_wrong_link_property_does_not_match() {
        let mut g = base_graph();
        let restriction = Term::Blank("r1".to_string());
        add(&mut g, restriction.clone(), vocab::OWL_ON_PROPERTY, iri("involves"));
        add(&mut g, restriction.clone(), vocab::OWL_SOME_VALUES_FROM, iri("GrantFraud"));
        let report = iri("Report1");
        add(&mut g, report.clone(), vocab::RDF_TYPE, iri("GAOReport"));
        add(&mut g, report.clone(), vocab::RDF_TYPE, restriction);
        add(&mut g, report, vocab::RDFS_LABEL, Term::literal("Report"));

        let hits = search_category(
            &g,
            &format!("{NS}GrantFraud"),
            ResourceCategory::GaoReport,
            NS,
        );
        assert!(hits.is_empty());
    }

    #[test]
    fn test_category_class_itself_is_not_a_subclass_match() {
        let mut g = base_graph();
        // the category class sits below the activity, but that alone must not match
        add(&mut g, iri("FraudEducation"), vocab::RDFS_SUBCLASS_OF, iri("GrantFraud"));
        let course = iri("Course");
        add(&mut g, course.clone(), vocab::RDF_TYPE, iri("FraudEducation"));
        add(&mut g, course, vocab::RDFS_LABEL, Term::literal("Course"));

        let hits = search_category(
            &g,
            &format!("{NS}GrantFraud"),
            ResourceCategory::Awareness,
            NS,
        );
        assert!(hits.is_empty());
    }

    #[test]
    fn test_scheme_needs_labelled_node_besides_root() {
        let mut g = RdfGraph::new();
        let scheme = iri("Scheme1");
        add(&mut g, scheme.clone(), vocab::RDF_TYPE, iri("FederalFraudScheme"));
        add(&mut g, scheme.clone(), vocab::RDF_TYPE, iri("FraudActivity"));
        add(&mut g, scheme.clone(), vocab::RDFS_LABEL, Term::literal("Scheme"));
        add(&mut g, iri("FraudActivity"), vocab::RDFS_LABEL, Term::literal("Fraud activity"));

        let activity = format!("{NS}FraudActivity");
        let hits = search_category(&g, &activity, ResourceCategory::FraudScheme, NS);
        assert!(hits.is_empty());

        // a labelled intermediate class satisfies the extra condition
        add(&mut g, scheme.clone(), vocab::RDF_TYPE, iri("GrantFraud"));
        add(&mut g, iri("GrantFraud"), vocab::RDFS_SUBCLASS_OF, iri("FraudActivity"));
        add(&mut g, iri("GrantFraud"), vocab::RDFS_LABEL, Term::literal("Grant fraud"));
        add(&mut g, scheme, vocab::DCTERMS_DESCRIPTION, Term::literal("Fake grants"));
        let hits = search_category(&g, &activity, ResourceCategory::FraudScheme, NS);
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].description.as_deref(), Some("Fake grants"));
        assert_eq!(hits[0].definition, None);
    }

    #[test]
    fn test_hits_sorted_by_label_one_per_label() {
        let mut g = base_graph();
        for (local, labels) in [("B", vec!["Zeta"]), ("A", vec!["Alpha", "Beta"])] {
            let individual = iri(local);
            add(
                &mut g,
                individual.clone(),
                vocab::RDF_TYPE,
                iri("FraudRiskManagementPrinciples"),
            );
            add(&mut g, individual.clone(), vocab::RDF_TYPE, iri("GrantFraud"));
            for label in labels {
                add(&mut g, individual.clone(), vocab::RDFS_LABEL, Term::literal(label));
            }
        }
        let search = search_resources(&g, &format!("{NS}GrantFraud"), NS);
        let group = search.group(ResourceCategory::RiskManagement).unwrap();
        let labels: Vec<&str> = group.hits.iter().map(|h| h.label.as_str()).collect();
        assert_eq!(labels, vec!["Alpha", "Beta", "Zeta"]);
        assert_eq!(search.total(), 3);
        assert_eq!(search.groups[0].category, ResourceCategory::GaoReport);
    }
}
