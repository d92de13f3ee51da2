//! End-to-end parse and resolution of the `fixtures/zoo.owl` document.

use std::path::PathBuf;

use ontotree_ontology::{
    parse_locator, resolve, DocumentSource, FileSource, ParseError, PropertyKind, Relation,
};

fn zoo_locator() -> String {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join("zoo.owl")
        .display()
        .to_string()
}

#[test]
fn zoo_parses_into_three_maps() {
    let raw = parse_locator(&FileSource, &zoo_locator()).expect("fixture parses");
    assert_eq!(raw.classes.len(), 7, "classes: {:?}", raw.classes.keys());
    assert_eq!(raw.things.len(), 3);
    assert_eq!(raw.properties.len(), 4);
    assert_eq!(
        raw.properties["#hasName"].kind,
        Some(PropertyKind::Functional)
    );
}

#[test]
fn zoo_resolves_with_reverse_edges() {
    let raw = parse_locator(&FileSource, &zoo_locator()).expect("fixture parses");
    let resolution = resolve(raw);
    let graph = &resolution.graph;

    let animal = graph.find_class("#Animal").expect("declared");
    let mammal = graph.find_class("#Mammal").expect("declared");
    let carnivore = graph.find_class("#Carnivore").expect("declared");
    let lion = graph.find_class("#Lion").expect("declared");

    assert!(graph.class(animal).subclasses.contains(&mammal));
    assert!(graph.class(mammal).subclasses.contains(&carnivore));
    assert!(graph.class(carnivore).subclasses.contains(&lion));
    assert_eq!(graph.class(lion).instances.len(), 1);
    assert_eq!(graph.class(animal).properties.len(), 3);
    assert_eq!(
        graph.class(animal).resource.comment.as_deref(),
        Some("Anything kept in the zoo.")
    );
}

#[test]
fn zoo_reports_dangling_references() {
    let raw = parse_locator(&FileSource, &zoo_locator()).expect("fixture parses");
    let resolution = resolve(raw);
    let mut dropped: Vec<(Relation, &str)> = resolution
        .diagnostics
        .iter()
        .map(|d| (d.relation, d.target.as_str()))
        .collect();
    dropped.sort();
    assert_eq!(
        dropped,
        vec![
            (Relation::SubClassOf, "#Legend"),
            (Relation::SubPropertyOf, "#nearTo"),
        ]
    );

    // Griffin lost its only superclass and becomes a root next to Animal and Keeper.
    let graph = &resolution.graph;
    let roots: Vec<&str> = graph
        .roots()
        .into_iter()
        .map(|id| graph.class(id).resource.iri.as_str())
        .collect();
    assert_eq!(roots, vec!["#Animal", "#Griffin", "#Keeper"]);
}

#[test]
fn file_url_locators_are_accepted() {
    let url = format!("file://{}", zoo_locator());
    if cfg!(unix) {
        assert!(FileSource.open(&url).is_ok());
    }
}

#[test]
fn unreadable_locator_is_an_error() {
    let err = parse_locator(&FileSource, "/nonexistent/zoo.owl").expect_err("missing file");
    assert!(matches!(err, ParseError::Io { .. }));
}
