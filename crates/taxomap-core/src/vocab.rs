//! IRIs of the vocabularies read by the mapper and the resource search.

pub const RDF_TYPE: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#type";

pub const RDFS_LABEL: &str = "http://www.w3.org/2000/01/rdf-schema#label";
pub const RDFS_SUBCLASS_OF: &str = "http://www.w3.org/2000/01/rdf-schema#subClassOf";
pub const RDFS_IS_DEFINED_BY: &str = "http://www.w3.org/2000/01/rdf-schema#isDefinedBy";

pub const OWL_CLASS: &str = "http://www.w3.org/2002/07/owl#Class";
pub const OWL_ON_PROPERTY: &str = "http://www.w3.org/2002/07/owl#onProperty";
pub const OWL_SOME_VALUES_FROM: &str = "http://www.w3.org/2002/07/owl#someValuesFrom";

pub const SKOS_CONCEPT: &str = "http://www.w3.org/2004/02/skos/core#Concept";
pub const SKOS_PREF_LABEL: &str = "http://www.w3.org/2004/02/skos/core#prefLabel";
pub const SKOS_DEFINITION: &str = "http://www.w3.org/2004/02/skos/core#definition";
pub const SKOS_RELATED: &str = "http://www.w3.org/2004/02/skos/core#related";
pub const SKOS_BROADER: &str = "http://www.w3.org/2004/02/skos/core#broader";
pub const SKOS_NARROWER: &str = "http://www.w3.org/2004/02/skos/core#narrower";

pub const DCTERMS_DESCRIPTION: &str = "http://purl.org/dc/terms/description";

pub const XSD_STRING: &str = "http://www.w3.org/2001/XMLSchema#string";
pub const RDF_LANG_STRING: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#langString";

/// Namespace of the GAO Conceptual Fraud Model (GFO).
pub const GFO_NAMESPACE: &str = "https://gaoinnovations.gov/antifraud_resource/howfraudworks/gfo/";

/// Root class of every fraud activity in the GFO model (local name).
pub const GFO_FRAUD_ACTIVITY: &str = "FraudActivity";

/// Join a namespace and a local name into a full IRI.
pub fn expand(namespace: &str, local: &str) -> String {
    format!("{}{}", namespace, local)
}
