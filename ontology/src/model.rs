//! Resolved ontology model.
//!
//! The resolved graph is cyclic by nature: a class points at its superclasses
//! and each superclass points back at its subclasses, classes point at their
//! instances and instances at their types. All entities therefore live in one
//! arena, [`OntologyGraph`], and every relationship is a set of typed indices
//! into it. The graph is built once by [`resolve`](crate::resolve) and never
//! mutated afterwards.

use std::collections::{BTreeSet, HashMap};

macro_rules! entity_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
        pub struct $name(pub(crate) usize);

        impl $name {
            /// Position of the entity in its arena.
            #[must_use]
            pub fn index(self) -> usize {
                self.0
            }
        }
    };
}

entity_id!(
    /// Index of a [`Class`] inside an [`OntologyGraph`].
    ClassId
);
entity_id!(
    /// Index of a [`Thing`] inside an [`OntologyGraph`].
    ThingId
);
entity_id!(
    /// Index of a [`Property`] inside an [`OntologyGraph`].
    PropertyId
);

/// Attributes shared by classes, instances and properties.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Resource {
    /// Identifier: `#Local` for `rdf:ID` declarations, absolute otherwise.
    pub iri: String,
    /// `rdfs:label`, when present.
    pub label: Option<String>,
    /// `rdfs:comment`, when present.
    pub comment: Option<String>,
    /// Free-text annotations (`owl:versionInfo`, `rdfs:seeAlso`, `rdfs:isDefinedBy`).
    pub annotations: BTreeSet<String>,
}

impl Resource {
    /// Creates a resource carrying only its identifier.
    #[must_use]
    pub fn new(iri: impl Into<String>) -> Self {
        Self {
            iri: iri.into(),
            ..Self::default()
        }
    }

    /// Returns the fragment or last path segment of the identifier.
    #[must_use]
    pub fn local_name(&self) -> &str {
        local_name(&self.iri)
    }

    /// Returns the label if one was declared, the local name otherwise.
    #[must_use]
    pub fn display_label(&self) -> &str {
        self.label.as_deref().unwrap_or_else(|| self.local_name())
    }
}

/// Returns the part of `iri` after its last `#` or `/`.
///
/// Trailing separators are ignored; an identifier without any separator is
/// returned unchanged.
#[must_use]
pub fn local_name(iri: &str) -> &str {
    let trimmed = iri.trim_end_matches(['#', '/']);
    if trimmed.is_empty() {
        return iri;
    }
    match trimmed.rfind(['#', '/']) {
        Some(pos) => &trimmed[pos + 1..],
        None => trimmed,
    }
}

/// Subtype tag of a non-plain property declaration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum PropertyKind {
    /// `owl:SymmetricProperty`.
    Symmetric,
    /// `owl:TransitiveProperty`.
    Transitive,
    /// `owl:FunctionalProperty`.
    Functional,
}

impl PropertyKind {
    /// Returns the lowercase name used in tree content.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            PropertyKind::Symmetric => "symmetric",
            PropertyKind::Transitive => "transitive",
            PropertyKind::Functional => "functional",
        }
    }
}

/// An OWL class with both directions of its edges resolved.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Class {
    /// Identity and documentation.
    pub resource: Resource,
    /// `rdfs:subClassOf` targets.
    pub superclasses: BTreeSet<ClassId>,
    /// Classes naming this one as superclass.
    pub subclasses: BTreeSet<ClassId>,
    /// Instances typed with this class.
    pub instances: BTreeSet<ThingId>,
    /// Properties whose domain includes this class.
    pub properties: BTreeSet<PropertyId>,
}

/// A named individual.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Thing {
    /// Identity and documentation.
    pub resource: Resource,
    /// `rdf:type` targets.
    pub types: BTreeSet<ClassId>,
}

/// An OWL property.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Property {
    /// Identity and documentation.
    pub resource: Resource,
    /// Subtype, `None` for plain object/datatype properties.
    pub kind: Option<PropertyKind>,
    /// `rdfs:domain` targets.
    pub domains: BTreeSet<ClassId>,
    /// `rdfs:range` targets.
    pub ranges: BTreeSet<ClassId>,
    /// `rdfs:subPropertyOf` targets.
    pub sub_property_of: BTreeSet<PropertyId>,
    /// `owl:inverseOf` targets.
    pub inverses: BTreeSet<PropertyId>,
}

/// The frozen, fully resolved entity graph of one document.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OntologyGraph {
    classes: Vec<Class>,
    things: Vec<Thing>,
    properties: Vec<Property>,
    class_index: HashMap<String, ClassId>,
    thing_index: HashMap<String, ThingId>,
    property_index: HashMap<String, PropertyId>,
}

impl OntologyGraph {
    pub(crate) fn from_parts(
        classes: Vec<Class>,
        things: Vec<Thing>,
        properties: Vec<Property>,
    ) -> Self {
        let class_index = classes
            .iter()
            .enumerate()
            .map(|(i, c)| (c.resource.iri.clone(), ClassId(i)))
            .collect();
        let thing_index = things
            .iter()
            .enumerate()
            .map(|(i, t)| (t.resource.iri.clone(), ThingId(i)))
            .collect();
        let property_index = properties
            .iter()
            .enumerate()
            .map(|(i, p)| (p.resource.iri.clone(), PropertyId(i)))
            .collect();
        Self {
            classes,
            things,
            properties,
            class_index,
            thing_index,
            property_index,
        }
    }

    /// Returns the class stored at `id`.
    #[must_use]
    pub fn class(&self, id: ClassId) -> &Class {
        &self.classes[id.0]
    }

    /// Returns the instance stored at `id`.
    #[must_use]
    pub fn thing(&self, id: ThingId) -> &Thing {
        &self.things[id.0]
    }

    /// Returns the property stored at `id`.
    #[must_use]
    pub fn property(&self, id: PropertyId) -> &Property {
        &self.properties[id.0]
    }

    /// Iterates over all classes in index order.
    pub fn classes(&self) -> impl Iterator<Item = (ClassId, &Class)> {
        self.classes.iter().enumerate().map(|(i, c)| (ClassId(i), c))
    }

    /// Iterates over all instances in index order.
    pub fn things(&self) -> impl Iterator<Item = (ThingId, &Thing)> {
        self.things.iter().enumerate().map(|(i, t)| (ThingId(i), t))
    }

    /// Iterates over all properties in index order.
    pub fn properties(&self) -> impl Iterator<Item = (PropertyId, &Property)> {
        self.properties
            .iter()
            .enumerate()
            .map(|(i, p)| (PropertyId(i), p))
    }

    /// Looks up a class by identifier.
    #[must_use]
    pub fn find_class(&self, iri: &str) -> Option<ClassId> {
        self.class_index.get(iri).copied()
    }

    /// Looks up an instance by identifier.
    #[must_use]
    pub fn find_thing(&self, iri: &str) -> Option<ThingId> {
        self.thing_index.get(iri).copied()
    }

    /// Looks up a property by identifier.
    #[must_use]
    pub fn find_property(&self, iri: &str) -> Option<PropertyId> {
        self.property_index.get(iri).copied()
    }

    /// Returns the property registered under the same identifier as the class,
    /// if the class doubles as a property.
    #[must_use]
    pub fn property_for_class(&self, id: ClassId) -> Option<PropertyId> {
        self.find_property(&self.class(id).resource.iri)
    }

    /// Returns every class without a (resolved) superclass, in index order.
    #[must_use]
    pub fn roots(&self) -> Vec<ClassId> {
        self.classes()
            .filter(|(_, c)| c.superclasses.is_empty())
            .map(|(id, _)| id)
            .collect()
    }

    /// Returns the number of classes.
    #[must_use]
    pub fn class_count(&self) -> usize {
        self.classes.len()
    }

    /// Returns the number of instances.
    #[must_use]
    pub fn thing_count(&self) -> usize {
        self.things.len()
    }

    /// Returns the number of properties.
    #[must_use]
    pub fn property_count(&self) -> usize {
        self.properties.len()
    }

    /// Lists every relationship member that does not point into the arena.
    ///
    /// A resolved graph never has any; a non-empty result is a resolver bug.
    #[must_use]
    pub fn dangling_members(&self) -> Vec<String> {
        let classes = self.classes.len();
        let things = self.things.len();
        let properties = self.properties.len();
        let mut dangling = Vec::new();

        for class in &self.classes {
            let iri = &class.resource.iri;
            for id in class.superclasses.iter().chain(&class.subclasses) {
                if id.0 >= classes {
                    dangling.push(format!("class {iri}: class member {}", id.0));
                }
            }
            for id in &class.instances {
                if id.0 >= things {
                    dangling.push(format!("class {iri}: instance member {}", id.0));
                }
            }
            for id in &class.properties {
                if id.0 >= properties {
                    dangling.push(format!("class {iri}: property member {}", id.0));
                }
            }
        }
        for thing in &self.things {
            for id in &thing.types {
                if id.0 >= classes {
                    dangling.push(format!("thing {}: type {}", thing.resource.iri, id.0));
                }
            }
        }
        for property in &self.properties {
            let iri = &property.resource.iri;
            for id in property.domains.iter().chain(&property.ranges) {
                if id.0 >= classes {
                    dangling.push(format!("property {iri}: class member {}", id.0));
                }
            }
            for id in property.sub_property_of.iter().chain(&property.inverses) {
                if id.0 >= properties {
                    dangling.push(format!("property {iri}: property member {}", id.0));
                }
            }
        }
        dangling
    }
}
