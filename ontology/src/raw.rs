//! Parse-time entity maps.
//!
//! Everything here is keyed by identifier and refers to other entities by
//! identifier string only. The resolver consumes a [`RawOntology`] whole, so
//! none of the string sets outlive resolution.

use std::collections::{BTreeMap, BTreeSet};

use crate::model::{PropertyKind, Resource};

/// A class as collected by the parser.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawClass {
    /// Identity and documentation.
    pub resource: Resource,
    /// Raw `rdfs:subClassOf` identifiers.
    pub superclasses: BTreeSet<String>,
}

/// An instance as collected by the parser.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawThing {
    /// Identity and documentation.
    pub resource: Resource,
    /// Raw `rdf:type` identifiers.
    pub types: BTreeSet<String>,
}

/// A property as collected by the parser.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawProperty {
    /// Identity and documentation.
    pub resource: Resource,
    /// Subtype derived from the declaring tag.
    pub kind: Option<PropertyKind>,
    /// Raw `rdfs:domain` identifiers.
    pub domains: BTreeSet<String>,
    /// Raw `rdfs:range` identifiers.
    pub ranges: BTreeSet<String>,
    /// Raw `rdfs:subPropertyOf` identifiers.
    pub sub_property_of: BTreeSet<String>,
    /// Raw `owl:inverseOf` identifiers.
    pub inverses: BTreeSet<String>,
}

/// The three identifier-keyed maps produced by one parse.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawOntology {
    /// Classes by identifier.
    pub classes: BTreeMap<String, RawClass>,
    /// Instances by identifier.
    pub things: BTreeMap<String, RawThing>,
    /// Properties by identifier.
    pub properties: BTreeMap<String, RawProperty>,
}

impl RawOntology {
    /// Returns the class registered under `iri`, registering it first if needed.
    pub fn class_mut(&mut self, iri: &str) -> &mut RawClass {
        self.classes
            .entry(iri.to_string())
            .or_insert_with(|| RawClass {
                resource: Resource::new(iri),
                ..RawClass::default()
            })
    }

    /// Returns the instance registered under `iri`, registering it first if needed.
    pub fn thing_mut(&mut self, iri: &str) -> &mut RawThing {
        self.things
            .entry(iri.to_string())
            .or_insert_with(|| RawThing {
                resource: Resource::new(iri),
                ..RawThing::default()
            })
    }

    /// Returns the property registered under `iri`, registering it first if needed.
    pub fn property_mut(&mut self, iri: &str) -> &mut RawProperty {
        self.properties
            .entry(iri.to_string())
            .or_insert_with(|| RawProperty {
                resource: Resource::new(iri),
                ..RawProperty::default()
            })
    }

    /// Returns true if nothing was collected.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.classes.is_empty() && self.things.is_empty() && self.properties.is_empty()
    }
}
