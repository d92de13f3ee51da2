//! Resolved-graph validator.
//!
//! Checks the invariants every resolved graph must satisfy:
//! - every forward edge has its reverse edge (superclass/subclass,
//!   type/instance, domain/property)
//! - every relationship member points into the arena
//! - identifiers map back to the entity carrying them
//! - resolving the same raw output twice yields the same graph
//!
//! Dangling references in the document are reported as warnings.

use ontotree_ontology::{resolve, OntologyGraph, RawOntology, Resolution};

use crate::report::{ConformanceReport, Severity, TestResult};

const VALIDATOR: &str = "graph";

/// Validates the resolution of `raw`.
pub fn validate(raw: &RawOntology) -> ConformanceReport {
    let mut report = ConformanceReport::new();
    let first = resolve(raw.clone());
    let second = resolve(raw.clone());

    report.push(TestResult::from_problems(
        VALIDATOR,
        "Every forward edge has its reverse edge",
        "Missing reverse edges",
        Severity::Failure,
        reverse_edge_problems(&first.graph),
    ));
    report.push(TestResult::from_problems(
        VALIDATOR,
        "All relationship members are inside the graph",
        "Relationship members outside the graph",
        Severity::Failure,
        first.graph.dangling_members(),
    ));
    report.push(TestResult::from_problems(
        VALIDATOR,
        "Identifiers are unique per entity kind",
        "Identifier index disagrees with the arena",
        Severity::Failure,
        identity_problems(&first.graph),
    ));
    if first.graph == second.graph && first.diagnostics == second.diagnostics {
        report.push(TestResult::pass(VALIDATOR, "Resolution is idempotent"));
    } else {
        report.push(TestResult::fail(
            VALIDATOR,
            "Resolving the same document twice gave different graphs",
        ));
    }
    report.push(dangling_references(&first));
    report
}

fn dangling_references(resolution: &Resolution) -> TestResult {
    TestResult::from_problems(
        VALIDATOR,
        "All references resolved",
        format!(
            "{} reference(s) to undeclared entities dropped",
            resolution.diagnostics.len()
        ),
        Severity::Warning,
        resolution
            .diagnostics
            .iter()
            .map(ToString::to_string)
            .collect(),
    )
}

fn reverse_edge_problems(graph: &OntologyGraph) -> Vec<String> {
    let mut problems = Vec::new();
    for (id, class) in graph.classes() {
        let iri = &class.resource.iri;
        for &parent in &class.superclasses {
            if !graph.class(parent).subclasses.contains(&id) {
                problems.push(format!(
                    "{iri} is not a subclass of its superclass {}",
                    graph.class(parent).resource.iri
                ));
            }
        }
        for &child in &class.subclasses {
            if !graph.class(child).superclasses.contains(&id) {
                problems.push(format!(
                    "{iri} lists subclass {} which does not name it",
                    graph.class(child).resource.iri
                ));
            }
        }
        for &thing in &class.instances {
            if !graph.thing(thing).types.contains(&id) {
                problems.push(format!(
                    "{iri} lists instance {} which is not typed with it",
                    graph.thing(thing).resource.iri
                ));
            }
        }
        for &property in &class.properties {
            if !graph.property(property).domains.contains(&id) {
                problems.push(format!(
                    "{iri} lists property {} outside its domain",
                    graph.property(property).resource.iri
                ));
            }
        }
    }
    for (id, thing) in graph.things() {
        for &class in &thing.types {
            if !graph.class(class).instances.contains(&id) {
                problems.push(format!(
                    "{} is missing from the instances of {}",
                    thing.resource.iri,
                    graph.class(class).resource.iri
                ));
            }
        }
    }
    for (id, property) in graph.properties() {
        for &class in &property.domains {
            if !graph.class(class).properties.contains(&id) {
                problems.push(format!(
                    "{} is missing from the properties of {}",
                    property.resource.iri,
                    graph.class(class).resource.iri
                ));
            }
        }
    }
    problems
}

fn identity_problems(graph: &OntologyGraph) -> Vec<String> {
    let mut problems = Vec::new();
    for (id, class) in graph.classes() {
        if graph.find_class(&class.resource.iri) != Some(id) {
            problems.push(format!("class {}", class.resource.iri));
        }
    }
    for (id, thing) in graph.things() {
        if graph.find_thing(&thing.resource.iri) != Some(id) {
            problems.push(format!("instance {}", thing.resource.iri));
        }
    }
    for (id, property) in graph.properties() {
        if graph.find_property(&property.resource.iri) != Some(id) {
            problems.push(format!("property {}", property.resource.iri));
        }
    }
    problems
}
