//! The RDF/XML element vocabulary understood by the parser.
//!
//! Only elements in the three reserved namespaces ([`iris::RDF`],
//! [`iris::RDFS`], [`iris::OWL`]) are looked at. Within those, the fixed set
//! of local names below is recognised; anything else is reported as
//! [`Lookup::Unsupported`] so grammar gaps show up in the logs.

use crate::model::PropertyKind;

/// Namespace IRI constants.
pub mod iris {
    /// OWL namespace.
    pub const OWL: &str = "http://www.w3.org/2002/07/owl#";
    /// RDF namespace.
    pub const RDF: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#";
    /// RDFS namespace.
    pub const RDFS: &str = "http://www.w3.org/2000/01/rdf-schema#";
}

/// A relational declaration, carrying a reference to another entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Relation {
    /// `rdfs:subClassOf`, owned by the innermost open class.
    SubClassOf,
    /// `rdf:type`, owned by the current instance.
    Type,
    /// `rdfs:domain`, owned by the current property.
    Domain,
    /// `rdfs:range`, owned by the current property.
    Range,
    /// `rdfs:subPropertyOf`, owned by the current property.
    SubPropertyOf,
    /// `owl:inverseOf`, owned by the current property.
    InverseOf,
}

impl Relation {
    /// Returns the prefixed element name.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Relation::SubClassOf => "rdfs:subClassOf",
            Relation::Type => "rdf:type",
            Relation::Domain => "rdfs:domain",
            Relation::Range => "rdfs:range",
            Relation::SubPropertyOf => "rdfs:subPropertyOf",
            Relation::InverseOf => "owl:inverseOf",
        }
    }
}

impl std::fmt::Display for Relation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A text-valued element whose content is attributed to the enclosing entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TextField {
    /// `rdfs:comment`.
    Comment,
    /// `rdfs:label`.
    Label,
    /// `owl:versionInfo`, `rdfs:seeAlso`, `rdfs:isDefinedBy`.
    Annotation,
}

/// A recognised element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Term {
    /// `rdf:RDF`, the document element.
    Root,
    /// Ontology header elements (`owl:Ontology`, `owl:imports`), accepted and skipped.
    Header,
    /// `owl:Class`.
    Class,
    /// `owl:Thing`.
    Thing,
    /// A property declaration, with its subtype when not plain.
    Property(Option<PropertyKind>),
    /// A relational declaration.
    Relation(Relation),
    /// A text-valued element.
    Text(TextField),
}

/// Outcome of classifying an element name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Lookup {
    /// A recognised element.
    Known(Term),
    /// An element in a reserved namespace that is not part of the vocabulary.
    Unsupported,
    /// An element outside the reserved namespaces.
    Foreign,
}

/// Classifies an element by resolved namespace and local name.
#[must_use]
pub fn classify(namespace: &[u8], local: &[u8]) -> Lookup {
    let term = if namespace == iris::OWL.as_bytes() {
        match local {
            b"Class" => Some(Term::Class),
            b"Thing" => Some(Term::Thing),
            b"ObjectProperty" | b"DatatypeProperty" => Some(Term::Property(None)),
            b"SymmetricProperty" => Some(Term::Property(Some(PropertyKind::Symmetric))),
            b"TransitiveProperty" => Some(Term::Property(Some(PropertyKind::Transitive))),
            b"FunctionalProperty" => Some(Term::Property(Some(PropertyKind::Functional))),
            b"inverseOf" => Some(Term::Relation(Relation::InverseOf)),
            b"versionInfo" => Some(Term::Text(TextField::Annotation)),
            b"Ontology" | b"imports" => Some(Term::Header),
            _ => None,
        }
    } else if namespace == iris::RDFS.as_bytes() {
        match local {
            b"subClassOf" => Some(Term::Relation(Relation::SubClassOf)),
            b"domain" => Some(Term::Relation(Relation::Domain)),
            b"range" => Some(Term::Relation(Relation::Range)),
            b"subPropertyOf" => Some(Term::Relation(Relation::SubPropertyOf)),
            b"comment" => Some(Term::Text(TextField::Comment)),
            b"label" => Some(Term::Text(TextField::Label)),
            b"seeAlso" | b"isDefinedBy" => Some(Term::Text(TextField::Annotation)),
            _ => None,
        }
    } else if namespace == iris::RDF.as_bytes() {
        match local {
            b"RDF" => Some(Term::Root),
            b"type" => Some(Term::Relation(Relation::Type)),
            _ => None,
        }
    } else {
        return Lookup::Foreign;
    };
    term.map_or(Lookup::Unsupported, Lookup::Known)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn property_subtypes_follow_tag_name() {
        let owl = iris::OWL.as_bytes();
        assert_eq!(
            classify(owl, b"ObjectProperty"),
            Lookup::Known(Term::Property(None))
        );
        assert_eq!(
            classify(owl, b"TransitiveProperty"),
            Lookup::Known(Term::Property(Some(PropertyKind::Transitive)))
        );
    }

    #[test]
    fn local_name_must_match_its_namespace() {
        // subClassOf lives in RDFS, not OWL.
        assert_eq!(classify(iris::OWL.as_bytes(), b"subClassOf"), Lookup::Unsupported);
        assert_eq!(
            classify(iris::RDFS.as_bytes(), b"subClassOf"),
            Lookup::Known(Term::Relation(Relation::SubClassOf))
        );
    }

    #[test]
    fn foreign_namespace_is_not_unsupported() {
        assert_eq!(classify(b"http://example.org/zoo#", b"Class"), Lookup::Foreign);
        assert_eq!(classify(iris::RDF.as_bytes(), b"Description"), Lookup::Unsupported);
    }
}
