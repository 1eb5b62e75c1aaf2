//! Parse ontology files (Turtle, N-Triples, RDF/XML) into an [`RdfGraph`].

use crate::graph::{Literal, RdfGraph, Term, Triple};
use crate::vocab;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::{Path, PathBuf};

/// Serialization formats recognized by file extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RdfFormat {
    Turtle,
    NTriples,
    RdfXml,
    N3,
    JsonLd,
}

impl RdfFormat {
    /// Guess the format from a file extension. Unknown extensions are read as Turtle.
    pub fn from_path(path: &Path) -> Self {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase)
            .unwrap_or_default();
        match ext.as_str() {
            "nt" => Self::NTriples,
            "rdf" | "xml" | "owl" => Self::RdfXml,
            "n3" => Self::N3,
            "jsonld" | "json-ld" => Self::JsonLd,
            _ => Self::Turtle,
        }
    }

    /// Resolve a user-supplied format name (`ttl`, `turtle`, `nt`, `xml`, ...).
    pub fn from_name(name: &str) -> Option<Self> {
        match name.to_ascii_lowercase().as_str() {
            "ttl" | "turtle" => Some(Self::Turtle),
            "nt" | "ntriples" | "n-triples" => Some(Self::NTriples),
            "xml" | "rdf" | "rdfxml" | "rdf/xml" | "owl" => Some(Self::RdfXml),
            "n3" => Some(Self::N3),
            "jsonld" | "json-ld" => Some(Self::JsonLd),
            _ => None,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Turtle => "turtle",
            Self::NTriples => "n-triples",
            Self::RdfXml => "rdf/xml",
            Self::N3 => "n3",
            Self::JsonLd => "json-ld",
        }
    }
}

/// Errors from reading or parsing an ontology file.
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("{format} syntax error in {origin}: {message}")]
    Syntax {
        origin: String,
        format: &'static str,
        message: String,
    },
    #[error("{0} input is not supported; convert it to Turtle, N-Triples or RDF/XML")]
    Unsupported(&'static str),
}

/// Load an ontology file, choosing the parser from its extension.
pub fn load(path: &Path) -> Result<RdfGraph, LoadError> {
    load_as(path, RdfFormat::from_path(path))
}

/// Load an ontology file with an explicit format. Relative IRIs resolve
/// against the file's `file://` IRI.
pub fn load_as(path: &Path, format: RdfFormat) -> Result<RdfGraph, LoadError> {
    let file = File::open(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let base = file_iri(path);
    let graph = parse_reader(
        BufReader::new(file),
        format,
        &path.display().to_string(),
        base.as_deref(),
    )?;
    tracing::debug!(
        "loaded {} triples from {} ({})",
        graph.len(),
        path.display(),
        format.name()
    );
    Ok(graph)
}

/// Parse an in-memory document. Relative IRIs are rejected.
pub fn parse_str(text: &str, format: RdfFormat) -> Result<RdfGraph, LoadError> {
    parse_reader(text.as_bytes(), format, "<string>", None)
}

/// `file://` IRI of the canonical path, percent-encoding bytes outside the
/// IRI path characters. `None` when the path cannot be resolved.
fn file_iri(path: &Path) -> Option<String> {
    let canonical = path.canonicalize().ok()?;
    let text = canonical.to_str()?.replace('\\', "/");
    let mut iri = String::from("file://");
    if !text.starts_with('/') {
        iri.push('/');
    }
    for byte in text.bytes() {
        if byte.is_ascii_alphanumeric() || b"-._~/!$&'()*+,;=:@".contains(&byte) {
            iri.push(char::from(byte));
        } else {
            iri.push_str(&format!("%{byte:02X}"));
        }
    }
    Some(iri)
}

fn parse_reader<R: Read>(
    reader: R,
    format: RdfFormat,
    origin: &str,
    base: Option<&str>,
) -> Result<RdfGraph, LoadError> {
    let syntax = |message: String| LoadError::Syntax {
        origin: origin.to_string(),
        format: format.name(),
        message,
    };

    let mut graph = RdfGraph::new();
    match format {
        RdfFormat::Turtle => {
            let mut parser = oxttl::TurtleParser::new();
            if let Some(base) = base {
                parser = parser
                    .with_base_iri(base)
                    .map_err(|e| syntax(format!("invalid base IRI {base}: {e}")))?;
            }
            let mut parser = parser.for_reader(reader);
            for triple in parser.by_ref() {
                let triple = triple.map_err(|e| syntax(e.to_string()))?;
                graph.insert(convert_triple(triple));
            }
            for (prefix, iri) in parser.prefixes() {
                graph.add_prefix(prefix, iri);
            }
        }
        // N-Triples only allows absolute IRIs, so there is no base to apply.
        RdfFormat::NTriples => {
            for triple in oxttl::NTriplesParser::new().for_reader(reader) {
                let triple = triple.map_err(|e| syntax(e.to_string()))?;
                graph.insert(convert_triple(triple));
            }
        }
        RdfFormat::RdfXml => {
            let mut parser = oxrdfxml::RdfXmlParser::new();
            if let Some(base) = base {
                parser = parser
                    .with_base_iri(base)
                    .map_err(|e| syntax(format!("invalid base IRI {base}: {e}")))?;
            }
            for triple in parser.for_reader(reader) {
                let triple = triple.map_err(|e| syntax(e.to_string()))?;
                graph.insert(convert_triple(triple));
            }
        }
        RdfFormat::N3 | RdfFormat::JsonLd => return Err(LoadError::Unsupported(format.name())),
    }
    Ok(graph)
}

fn convert_triple(triple: oxrdf::Triple) -> Triple {
    let subject: oxrdf::Term = triple.subject.into();
    Triple {
        subject: convert_term(subject),
        predicate: triple.predicate.into_string(),
        object: convert_term(triple.object),
    }
}

fn convert_term(term: oxrdf::Term) -> Term {
    match term {
        oxrdf::Term::NamedNode(node) => Term::Iri(node.into_string()),
        oxrdf::Term::BlankNode(node) => Term::Blank(node.into_string()),
        oxrdf::Term::Literal(lit) => {
            let language = lit.language().map(str::to_string);
            let datatype = lit.datatype().as_str();
            let datatype = (language.is_none()
                && datatype != vocab::XSD_STRING
                && datatype != vocab::RDF_LANG_STRING)
                .then(|| datatype.to_string());
            Term::Literal(Literal {
                value: lit.value().to_string(),
                language,
                datatype,
            })
        }
        // Triple terms only appear with RDF 1.2 input; keep their text.
        #[allow(unreachable_patterns)]
        other => Term::literal(other.to_string()),
    }
}
