//! Ontology ingestion for the ontotree browser.
//!
//! A document is read in two phases. The [`parser`] makes a single streaming
//! pass over an RDF/XML document and collects classes, instances and
//! properties into a [`RawOntology`] whose cross-references are still plain
//! identifier strings. The [`resolver`] then turns those strings into typed
//! indices, derives the reverse edges, and freezes everything into an
//! [`OntologyGraph`].
//!
//! # Entry Point
//!
//! ```
//! use ontotree_ontology::{parse, resolve};
//!
//! let document = r##"<rdf:RDF
//!     xmlns:rdf="http://www.w3.org/1999/02/22-rdf-syntax-ns#"
//!     xmlns:rdfs="http://www.w3.org/2000/01/rdf-schema#"
//!     xmlns:owl="http://www.w3.org/2002/07/owl#">
//!   <owl:Class rdf:ID="Animal"/>
//!   <owl:Class rdf:ID="Dog">
//!     <rdfs:subClassOf rdf:resource="#Animal"/>
//!   </owl:Class>
//! </rdf:RDF>"##;
//!
//! let raw = parse(document.as_bytes()).expect("well-formed document");
//! let graph = resolve(raw).graph;
//! let animal = graph.find_class("#Animal").expect("declared");
//! assert_eq!(graph.class(animal).subclasses.len(), 1);
//! ```

#![deny(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic,
    missing_docs,
    clippy::missing_errors_doc
)]

pub mod error;
pub mod model;
pub mod parser;
pub mod raw;
pub mod resolver;
pub mod source;
pub mod vocabulary;

pub use error::ParseError;
pub use model::{
    local_name, Class, ClassId, OntologyGraph, Property, PropertyId, PropertyKind, Resource,
    Thing, ThingId,
};
pub use parser::{parse, parse_locator};
pub use raw::{RawClass, RawOntology, RawProperty, RawThing};
pub use resolver::{resolve, Diagnostic, Resolution};
pub use source::{DocumentSource, FileSource, MemorySource};
pub use vocabulary::Relation;
