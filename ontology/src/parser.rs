//! Streaming RDF/XML parser.
//!
//! One forward pass over the document's events drives a small state machine:
//!
//! - a **class stack** holding the identifier of every open `owl:Class`
//!   (`None` for a class that could not be identified),
//! - a **scope stack** with the recognised term of every open element,
//!   used to find the owner of trailing text when a comment or label closes,
//! - single slots for the **current instance** and **current property**;
//!   those declarations never nest.
//!
//! References are recorded as raw identifier strings. Nothing is resolved
//! here; see [`crate::resolver`].

use std::io::BufRead;

use quick_xml::events::{BytesStart, Event};
use quick_xml::name::{LocalName, Namespace, ResolveResult};
use quick_xml::NsReader;

use crate::error::ParseError;
use crate::model::{PropertyKind, Resource};
use crate::raw::RawOntology;
use crate::source::DocumentSource;
use crate::vocabulary::{self, iris, Lookup, Relation, Term, TextField};

/// Parses a whole document into raw entity maps.
///
/// # Errors
///
/// Returns a [`ParseError`] if the document is not well-formed XML, ends with
/// elements still open, or contains no element. No partial result is kept.
pub fn parse<R: BufRead>(reader: R) -> Result<RawOntology, ParseError> {
    let mut xml = NsReader::from_reader(reader);
    let mut buf = Vec::new();
    let mut state = ParseState::default();
    let mut seen_element = false;

    loop {
        buf.clear();
        let (resolved, event) = xml.read_resolved_event_into(&mut buf)?;
        match event {
            Event::Start(start) => {
                let lookup = lookup(&resolved, start.local_name());
                let attributes = RdfAttributes::read(&xml, &start)?;
                seen_element = true;
                state.open(lookup, &attributes);
            }
            Event::Empty(start) => {
                let lookup = lookup(&resolved, start.local_name());
                let attributes = RdfAttributes::read(&xml, &start)?;
                seen_element = true;
                state.open(lookup, &attributes);
                state.close();
            }
            Event::End(_) => state.close(),
            Event::Text(text) => state.text.push_str(&text.unescape()?),
            Event::CData(data) => state
                .text
                .push_str(&String::from_utf8_lossy(&data.into_inner())),
            Event::Eof => break,
            _ => {}
        }
    }

    if !seen_element {
        return Err(ParseError::Empty);
    }
    if !state.scopes.is_empty() {
        return Err(ParseError::Truncated {
            open: state.scopes.len(),
        });
    }
    Ok(state.raw)
}

/// Opens `locator` through `source` and parses it.
///
/// # Errors
///
/// Returns the source's error if the document cannot be opened, or any error
/// from [`parse`].
pub fn parse_locator<S: DocumentSource + ?Sized>(
    source: &S,
    locator: &str,
) -> Result<RawOntology, ParseError> {
    let reader = source.open(locator)?;
    let raw = parse(reader)?;
    tracing::debug!(
        locator,
        classes = raw.classes.len(),
        things = raw.things.len(),
        properties = raw.properties.len(),
        "document parsed"
    );
    Ok(raw)
}

fn lookup(resolved: &ResolveResult, local: LocalName) -> Lookup {
    let ResolveResult::Bound(Namespace(namespace)) = resolved else {
        return Lookup::Foreign;
    };
    let found = vocabulary::classify(namespace, local.as_ref());
    if found == Lookup::Unsupported {
        tracing::warn!(
            namespace = %String::from_utf8_lossy(namespace),
            element = %String::from_utf8_lossy(local.as_ref()),
            "unsupported element in reserved namespace ignored"
        );
    }
    found
}

/// The `rdf:` attributes the grammar cares about.
#[derive(Debug, Default)]
struct RdfAttributes {
    id: Option<String>,
    about: Option<String>,
    resource: Option<String>,
}

impl RdfAttributes {
    fn read<R>(xml: &NsReader<R>, start: &BytesStart) -> Result<Self, ParseError> {
        let mut attributes = Self::default();
        for attribute in start.attributes() {
            let attribute = attribute?;
            let (namespace, local) = xml.resolve_attribute(attribute.key);
            let in_rdf = matches!(
                namespace,
                ResolveResult::Bound(Namespace(ns)) if ns == iris::RDF.as_bytes()
            );
            if !in_rdf {
                continue;
            }
            let slot = match local.as_ref() {
                b"ID" => &mut attributes.id,
                b"about" => &mut attributes.about,
                b"resource" => &mut attributes.resource,
                _ => continue,
            };
            *slot = Some(attribute.unescape_value()?.into_owned());
        }
        Ok(attributes)
    }

    /// `rdf:ID` normalised to `#ID`, else a non-empty `rdf:about`.
    fn identifier(&self) -> Option<String> {
        if let Some(id) = self.id.as_deref().filter(|id| !id.is_empty()) {
            return Some(format!("#{id}"));
        }
        self.about.clone().filter(|about| !about.is_empty())
    }
}

/// Single-slot handle on the current instance or property.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Slot {
    Named(String),
    /// Declared without identifier: never registered, attributions dropped.
    Anonymous,
}

impl Slot {
    fn from_identifier(identifier: Option<String>) -> Self {
        identifier.map_or(Slot::Anonymous, Slot::Named)
    }

    fn name(&self) -> Option<&str> {
        match self {
            Slot::Named(name) => Some(name),
            Slot::Anonymous => None,
        }
    }
}

/// Entity owning trailing text or a relational declaration.
enum Owner {
    Class(String),
    Thing(String),
    Property(String),
}

#[derive(Debug, Default)]
struct ParseState {
    raw: RawOntology,
    class_stack: Vec<Option<String>>,
    scopes: Vec<Option<Term>>,
    current_thing: Option<Slot>,
    current_property: Option<Slot>,
    /// Properties suspended by a property declared inside them.
    outer_properties: Vec<Option<Slot>>,
    text: String,
}

impl ParseState {
    fn open(&mut self, lookup: Lookup, attributes: &RdfAttributes) {
        let term = match lookup {
            Lookup::Known(term) => Some(term),
            Lookup::Unsupported | Lookup::Foreign => None,
        };
        let enclosing = self.scopes.last().copied().flatten();
        self.text.clear();

        match term {
            Some(Term::Class) => self.open_class(attributes.identifier(), enclosing),
            Some(Term::Thing) => {
                let identifier = attributes.identifier();
                if let Some(iri) = &identifier {
                    self.raw.thing_mut(iri);
                }
                self.current_thing = Some(Slot::from_identifier(identifier));
            }
            Some(Term::Property(kind)) => {
                self.open_property(attributes.identifier(), kind, enclosing);
            }
            Some(Term::Relation(relation)) => {
                if let Some(target) = &attributes.resource {
                    self.attach(relation, target);
                }
            }
            Some(Term::Text(TextField::Annotation)) => {
                if let Some(target) = &attributes.resource {
                    if let Some(resource) = self.owner(enclosing).and_then(|o| self.resource_mut(o))
                    {
                        resource.annotations.insert(target.clone());
                    }
                }
            }
            Some(Term::Text(_) | Term::Root | Term::Header) | None => {}
        }

        self.scopes.push(term);
    }

    fn open_class(&mut self, identifier: Option<String>, enclosing: Option<Term>) {
        if let Some(iri) = &identifier {
            self.raw.class_mut(iri);
            // <rdfs:subClassOf><owl:Class rdf:about="..."/></rdfs:subClassOf>
            if let Some(Term::Relation(relation)) = enclosing {
                self.attach(relation, iri);
            }
        }
        self.class_stack.push(identifier);
    }

    fn open_property(
        &mut self,
        identifier: Option<String>,
        kind: Option<PropertyKind>,
        enclosing: Option<Term>,
    ) {
        if let Some(iri) = &identifier {
            let property = self.raw.property_mut(iri);
            if kind.is_some() {
                property.kind = kind;
            }
            // <rdfs:subPropertyOf><owl:ObjectProperty rdf:about="..."/></rdfs:subPropertyOf>
            if let Some(Term::Relation(
                relation @ (Relation::SubPropertyOf | Relation::InverseOf),
            )) = enclosing
            {
                self.attach(relation, iri);
            }
        }
        let inner = identifier.as_deref().unwrap_or("<anonymous>").to_string();
        let outer = self
            .current_property
            .replace(Slot::from_identifier(identifier));
        if let Some(outer) = &outer {
            tracing::warn!(
                outer = outer.name().unwrap_or("<anonymous>"),
                inner = %inner,
                "property declared inside another property; outer one resumes on close"
            );
        }
        self.outer_properties.push(outer);
    }

    fn close(&mut self) {
        let Some(term) = self.scopes.pop() else {
            return;
        };
        match term {
            Some(Term::Text(field)) => {
                let enclosing = self.scopes.last().copied().flatten();
                let text = self.text.trim().to_string();
                if !text.is_empty() {
                    if let Some(resource) = self.owner(enclosing).and_then(|o| self.resource_mut(o))
                    {
                        match field {
                            TextField::Comment => resource.comment = Some(text),
                            TextField::Label => resource.label = Some(text),
                            TextField::Annotation => {
                                resource.annotations.insert(text);
                            }
                        }
                    }
                }
            }
            Some(Term::Class) => {
                self.class_stack.pop();
            }
            Some(Term::Thing) => self.current_thing = None,
            Some(Term::Property(_)) => {
                self.current_property = self.outer_properties.pop().flatten();
            }
            Some(Term::Relation(_) | Term::Root | Term::Header) | None => {}
        }
        self.text.clear();
    }

    /// Appends `target` to the raw set `relation` feeds, on the entity that owns it.
    fn attach(&mut self, relation: Relation, target: &str) {
        let target = target.to_string();
        match relation {
            Relation::SubClassOf => {
                // A `None` entry is a placeholder: the reference is swallowed.
                if let Some(Some(owner)) = self.class_stack.last() {
                    let owner = owner.clone();
                    self.raw.class_mut(&owner).superclasses.insert(target);
                }
            }
            Relation::Type => {
                if let Some(owner) = self.current_thing.as_ref().and_then(Slot::name) {
                    let owner = owner.to_string();
                    self.raw.thing_mut(&owner).types.insert(target);
                }
            }
            Relation::Domain | Relation::Range | Relation::SubPropertyOf | Relation::InverseOf => {
                let Some(owner) = self.current_property.as_ref().and_then(Slot::name) else {
                    return;
                };
                let owner = owner.to_string();
                let property = self.raw.property_mut(&owner);
                let set = match relation {
                    Relation::Domain => &mut property.domains,
                    Relation::Range => &mut property.ranges,
                    Relation::SubPropertyOf => &mut property.sub_property_of,
                    _ => &mut property.inverses,
                };
                set.insert(target);
            }
        }
    }

    /// The entity owning an element nested directly inside `enclosing`.
    fn owner(&self, enclosing: Option<Term>) -> Option<Owner> {
        match enclosing? {
            Term::Thing => self
                .current_thing
                .as_ref()
                .and_then(Slot::name)
                .map(|iri| Owner::Thing(iri.to_string())),
            Term::Property(_) => self
                .current_property
                .as_ref()
                .and_then(Slot::name)
                .map(|iri| Owner::Property(iri.to_string())),
            Term::Class => self
                .class_stack
                .last()
                .cloned()
                .flatten()
                .map(Owner::Class),
            _ => None,
        }
    }

    fn resource_mut(&mut self, owner: Owner) -> Option<&mut Resource> {
        let resource = match owner {
            Owner::Class(iri) => &mut self.raw.classes.get_mut(&iri)?.resource,
            Owner::Thing(iri) => &mut self.raw.things.get_mut(&iri)?.resource,
            Owner::Property(iri) => &mut self.raw.properties.get_mut(&iri)?.resource,
        };
        Some(resource)
    }
}
