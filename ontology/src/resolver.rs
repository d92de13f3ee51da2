//! Graph resolution: raw identifier sets → typed index sets.
//!
//! Resolution runs in a fixed order:
//!
//! 1. class superclasses, against classes,
//! 2. instance types, against classes,
//! 3. property domains and ranges against classes, sub-properties and
//!    inverses against properties,
//! 4. reverse edges (subclasses, instances, properties of a class),
//! 5. the raw maps are dropped.
//!
//! Indices are assigned in identifier order, so the result does not depend on
//! the order in which the document declared things.

use std::collections::{BTreeSet, HashMap};

use crate::model::{Class, ClassId, OntologyGraph, Property, PropertyId, Thing, ThingId};
use crate::raw::RawOntology;
use crate::vocabulary::Relation;

/// A reference to an identifier no entity of the expected kind carries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    /// Identifier of the entity holding the reference.
    pub subject: String,
    /// Declaration the reference came from.
    pub relation: Relation,
    /// The unknown identifier.
    pub target: String,
}

impl std::fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} {} refers to unknown {}",
            self.subject, self.relation, self.target
        )
    }
}

/// Output of [`resolve`]: the graph plus every dropped reference.
#[derive(Debug, Clone)]
pub struct Resolution {
    /// The frozen graph.
    pub graph: OntologyGraph,
    /// References dropped because their target is unknown.
    pub diagnostics: Vec<Diagnostic>,
}

/// Resolves raw parser output into an [`OntologyGraph`].
///
/// Never fails: unknown references are dropped, logged and listed in
/// [`Resolution::diagnostics`].
#[must_use]
pub fn resolve(raw: RawOntology) -> Resolution {
    let class_index: HashMap<String, ClassId> = raw
        .classes
        .keys()
        .enumerate()
        .map(|(i, iri)| (iri.clone(), ClassId(i)))
        .collect();
    let property_index: HashMap<String, PropertyId> = raw
        .properties
        .keys()
        .enumerate()
        .map(|(i, iri)| (iri.clone(), PropertyId(i)))
        .collect();

    let mut diagnostics = Vec::new();

    // 1. superclasses
    let mut classes: Vec<Class> = raw
        .classes
        .into_values()
        .map(|raw_class| {
            let superclasses = lookup_all(
                &class_index,
                &raw_class.resource.iri,
                Relation::SubClassOf,
                raw_class.superclasses,
                &mut diagnostics,
            );
            Class {
                resource: raw_class.resource,
                superclasses,
                ..Class::default()
            }
        })
        .collect();

    // 2. types
    let things: Vec<Thing> = raw
        .things
        .into_values()
        .map(|raw_thing| {
            let types = lookup_all(
                &class_index,
                &raw_thing.resource.iri,
                Relation::Type,
                raw_thing.types,
                &mut diagnostics,
            );
            Thing {
                resource: raw_thing.resource,
                types,
            }
        })
        .collect();

    // 3. property references
    let properties: Vec<Property> = raw
        .properties
        .into_values()
        .map(|raw_property| {
            let iri = raw_property.resource.iri.as_str();
            let domains = lookup_all(
                &class_index,
                iri,
                Relation::Domain,
                raw_property.domains,
                &mut diagnostics,
            );
            let ranges = lookup_all(
                &class_index,
                iri,
                Relation::Range,
                raw_property.ranges,
                &mut diagnostics,
            );
            let sub_property_of = lookup_all(
                &property_index,
                iri,
                Relation::SubPropertyOf,
                raw_property.sub_property_of,
                &mut diagnostics,
            );
            let inverses = lookup_all(
                &property_index,
                iri,
                Relation::InverseOf,
                raw_property.inverses,
                &mut diagnostics,
            );
            Property {
                resource: raw_property.resource,
                kind: raw_property.kind,
                domains,
                ranges,
                sub_property_of,
                inverses,
            }
        })
        .collect();

    // 4. reverse edges
    for index in 0..classes.len() {
        let superclasses: Vec<ClassId> = classes[index].superclasses.iter().copied().collect();
        for superclass in superclasses {
            classes[superclass.0].subclasses.insert(ClassId(index));
        }
    }
    for (index, thing) in things.iter().enumerate() {
        for class in &thing.types {
            classes[class.0].instances.insert(ThingId(index));
        }
    }
    for (index, property) in properties.iter().enumerate() {
        for class in &property.domains {
            classes[class.0].properties.insert(PropertyId(index));
        }
    }

    // 5. the raw maps were consumed above; only index sets remain.
    let graph = OntologyGraph::from_parts(classes, things, properties);
    debug_assert!(
        graph.dangling_members().is_empty(),
        "resolver produced out-of-range members: {:?}",
        graph.dangling_members()
    );

    if !diagnostics.is_empty() {
        tracing::warn!(
            dropped = diagnostics.len(),
            "unknown references dropped during resolution"
        );
    }
    tracing::debug!(
        classes = graph.class_count(),
        things = graph.thing_count(),
        properties = graph.property_count(),
        "ontology graph resolved"
    );

    Resolution { graph, diagnostics }
}

fn lookup_all<I: Copy + Ord>(
    index: &HashMap<String, I>,
    subject: &str,
    relation: Relation,
    targets: BTreeSet<String>,
    diagnostics: &mut Vec<Diagnostic>,
) -> BTreeSet<I> {
    let mut resolved = BTreeSet::new();
    for target in targets {
        match index.get(&target) {
            Some(&id) => {
                resolved.insert(id);
            }
            None => {
                tracing::warn!(subject, %relation, target = %target, "dropping unknown reference");
                diagnostics.push(Diagnostic {
                    subject: subject.to_string(),
                    relation,
                    target,
                });
            }
        }
    }
    resolved
}
