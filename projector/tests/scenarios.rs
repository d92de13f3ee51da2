//! End-to-end projections over small in-memory documents.

use std::collections::BTreeSet;

use ontotree_ontology::MemorySource;
use ontotree_projector::{
    Decorate, Facet, LoadBalancer, MountPoint, NodeRole, StylePolicy, TreeNode, TreeProjector,
};

fn document(body: &str) -> String {
    format!(
        r#"<?xml version="1.0"?>
<rdf:RDF xmlns:rdf="http://www.w3.org/1999/02/22-rdf-syntax-ns#"
         xmlns:rdfs="http://www.w3.org/2000/01/rdf-schema#"
         xmlns:owl="http://www.w3.org/2002/07/owl#">
{body}
</rdf:RDF>"#
    )
}

fn projector(source: MemorySource) -> TreeProjector<MemorySource> {
    TreeProjector::new(source, LoadBalancer::default(), StylePolicy::default())
}

/// Identified nodes below `node`, depth first.
fn entity_labels(node: &TreeNode) -> Vec<&str> {
    node.descendants()
        .into_iter()
        .skip(1)
        .filter(|n| n.id.is_some())
        .map(|n| n.label.as_str())
        .collect()
}

fn mount_of(node: &TreeNode) -> MountPoint {
    node.mount_point
        .as_deref()
        .expect("node has a mount point")
        .parse()
        .expect("mount point parses")
}

const A_AND_B: &str = r##"
  <owl:Class rdf:ID="A"/>
  <owl:Class rdf:ID="B">
    <rdfs:subClassOf rdf:resource="#A"/>
  </owl:Class>
  <owl:Thing rdf:ID="b1">
    <rdf:type rdf:resource="#B"/>
  </owl:Thing>
  <owl:ObjectProperty rdf:ID="p">
    <rdfs:domain rdf:resource="#A"/>
  </owl:ObjectProperty>
"##;

#[test]
fn single_root_with_instance_and_property_facets() {
    let mut projector = projector(MemorySource::new().with("ab.owl", document(A_AND_B)));

    let tree = projector.project("ab.owl").expect("whole view");
    assert_eq!(tree.label, "A");
    assert_eq!(tree.children.len(), 1);
    let b = tree.child("B").expect("B under A");

    let b_mount = mount_of(b);
    assert_eq!(b_mount.iri, "#B");
    assert_eq!(b_mount.facets, BTreeSet::from([Facet::Instances]));
    let expanded = projector
        .project(b.mount_point.as_deref().expect("present"))
        .expect("B expands");
    assert_eq!(expanded.label, "B");
    assert_eq!(expanded.mount_point, None);
    let instances = expanded.child("instances").expect("instances group");
    assert_eq!(instances.children.len(), 1);
    assert_eq!(instances.children[0].label, "b1");
    assert_eq!(instances.children[0].content.as_deref(), Some("types: B"));

    let a_mount = mount_of(&tree);
    assert_eq!(a_mount.facets, BTreeSet::from([Facet::Properties]));
    let expanded = projector
        .project(tree.mount_point.as_deref().expect("present"))
        .expect("A expands");
    let properties = expanded.child("properties").expect("properties group");
    assert_eq!(properties.children.len(), 1);
    assert_eq!(properties.children[0].label, "p");
    assert_eq!(properties.children[0].content.as_deref(), Some("domain: A"));
}

#[test]
fn unrelated_classes_get_a_synthetic_root() {
    let body = r#"
      <owl:Class rdf:ID="Left"/>
      <owl:Class rdf:ID="Right"/>
    "#;
    let mut projector = projector(MemorySource::new().with("/data/pair.owl", document(body)));

    let tree = projector.project("/data/pair.owl").expect("whole view");
    assert_eq!(tree.label, "pair.owl");
    assert_eq!(tree.id, None);
    assert_eq!(tree.mount_point, None);
    assert_eq!(tree.style, StylePolicy::default().style(NodeRole::Root));
    let labels: Vec<&str> = tree.children.iter().map(|c| c.label.as_str()).collect();
    assert_eq!(labels, vec!["Left", "Right"]);
    assert!(tree.children.iter().all(|c| c.mount_point.is_none()));
}

#[test]
fn failed_parse_leaves_no_half_built_graph() {
    let source = MemorySource::new()
        .with(
            "broken.owl",
            r#"<rdf:RDF xmlns:rdf="http://www.w3.org/1999/02/22-rdf-syntax-ns#"><owl:Class"#,
        )
        .with("good.owl", document(A_AND_B));
    let mut projector = projector(source);

    assert_eq!(projector.project("broken.owl"), None);
    assert_eq!(projector.cached_locator(), None);
    assert!(projector.graph().is_none());

    assert!(projector.project("good.owl").is_some());
    assert_eq!(projector.cached_locator(), Some("good.owl"));

    assert_eq!(projector.project("broken.owl"), None);
    assert_eq!(projector.cached_locator(), Some("good.owl"));
    assert_eq!(projector.graph().map(|g| g.class_count()), Some(2));
}

#[test]
fn unknown_documents_and_selectors_yield_nothing() {
    let mut projector = projector(MemorySource::new().with("ab.owl", document(A_AND_B)));
    assert_eq!(projector.project("missing.owl"), None);
    assert_eq!(projector.project("ab.owl?iri=Nope"), None);
    assert_eq!(projector.project("ab.owl?target=sideways"), None);
    assert!(projector.project("ab.owl?iri=B").is_some());
}

#[test]
fn drill_in_shows_the_subtree_only() {
    let body = r##"
      <owl:Class rdf:ID="Root"/>
      <owl:Class rdf:ID="Mid"><rdfs:subClassOf rdf:resource="#Root"/></owl:Class>
      <owl:Class rdf:ID="Leaf"><rdfs:subClassOf rdf:resource="#Mid"/></owl:Class>
      <owl:Class rdf:ID="Other"><rdfs:subClassOf rdf:resource="#Root"/></owl:Class>
    "##;
    let mut projector = projector(MemorySource::new().with("t.owl", document(body)));

    let tree = projector.project("t.owl?iri=Mid").expect("drill-in");
    assert_eq!(tree.render_outline(), "Mid\n  Leaf\n");
}

#[test]
fn large_instance_lists_are_balanced() {
    let mut body = String::from(r#"<owl:Class rdf:ID="Crowd"/>"#);
    for i in 0..500 {
        body.push_str(&format!(
            r##"<owl:Thing rdf:ID="m{i:03}"><rdf:type rdf:resource="#Crowd"/></owl:Thing>"##
        ));
    }
    let source = MemorySource::new().with("crowd.owl", document(&body));
    let mut projector =
        TreeProjector::new(source, LoadBalancer::new(vec![8], 24), StylePolicy::default());

    let tree = projector
        .project("crowd.owl?iri=Crowd&target=instances")
        .expect("facet view");
    let group = tree.child("instances").expect("instances group");
    assert!(group.children.len() <= 8, "{} children", group.children.len());
    assert!(group.descendants().iter().all(|n| n.children.len() <= 8));
    let leaves = group
        .descendants()
        .into_iter()
        .filter(|n| n.id.is_some())
        .count();
    assert_eq!(leaves, 500);
    assert_eq!(group.children[0].label, "m000 – m062");
    assert_eq!(
        group.children[0].style,
        StylePolicy::default().style(NodeRole::InstancesGroup)
    );
}

#[test]
fn many_root_classes_hang_directly_off_the_synthetic_root() {
    let body: String = (0..20)
        .map(|i| format!(r#"<owl:Class rdf:ID="R{i:02}"/>"#))
        .collect();
    let mut projector = projector(MemorySource::new().with("roots.owl", document(&body)));

    let tree = projector.project("roots.owl").expect("whole view");
    assert_eq!(tree.children.len(), 20);
    assert!(tree.children.iter().all(|c| c.id.is_some()));
    assert_eq!(tree.children[0].label, "R00");
    assert_eq!(tree.children[19].label, "R19");
}

#[test]
fn wide_subclass_lists_are_balanced_in_whole_and_drill_in_views() {
    let mut body = String::from(
        r##"<owl:Class rdf:ID="Top"/>
            <owl:Class rdf:ID="Mid"><rdfs:subClassOf rdf:resource="#Top"/></owl:Class>"##,
    );
    for i in (0..30).rev() {
        body.push_str(&format!(
            r##"<owl:Class rdf:ID="S{i:02}"><rdfs:subClassOf rdf:resource="#Mid"/></owl:Class>"##
        ));
    }
    let source = MemorySource::new().with("wide.owl", document(&body));
    let mut projector =
        TreeProjector::new(source, LoadBalancer::new(vec![8], 24), StylePolicy::default());
    let expected: Vec<String> = (0..30).map(|i| format!("S{i:02}")).collect();
    let group_style = StylePolicy::default().style(NodeRole::ClassGroup);

    let whole = projector.project("wide.owl").expect("whole view");
    let drill_in = projector.project("wide.owl?iri=Mid").expect("drill-in");
    let mid_in_whole = whole.child("Mid").expect("Mid under Top");

    for mid in [mid_in_whole, &drill_in] {
        assert_eq!(mid.label, "Mid");
        assert_eq!(mid.children.len(), 8);
        assert!(mid.descendants().iter().all(|n| n.children.len() <= 8));
        assert_eq!(mid.children[0].label, "S00 – S03");
        assert_eq!(mid.children[7].label, "S28 – S29");
        assert!(mid.children.iter().all(|g| g.id.is_none() && g.style == group_style));
        assert_eq!(entity_labels(mid), expected);
    }
}

#[test]
fn wide_property_lists_are_balanced_and_sorted_by_local_name() {
    let mut body = String::from(r#"<owl:Class rdf:ID="Hub"/>"#);
    for i in (0..30).rev() {
        body.push_str(&format!(
            r##"<owl:DatatypeProperty rdf:ID="q{i:02}">
                  <rdfs:domain rdf:resource="#Hub"/>
                </owl:DatatypeProperty>"##
        ));
    }
    let source = MemorySource::new().with("props.owl", document(&body));
    let mut projector =
        TreeProjector::new(source, LoadBalancer::new(vec![8], 24), StylePolicy::default());

    let tree = projector
        .project("props.owl?iri=Hub&target=properties")
        .expect("facet view");
    let group = tree.child("properties").expect("properties group");
    assert_eq!(group.children.len(), 8);
    assert!(group.descendants().iter().all(|n| n.children.len() <= 8));
    assert_eq!(group.children[0].label, "q00 – q03");
    assert_eq!(
        group.children[0].style,
        StylePolicy::default().style(NodeRole::PropertyGroup)
    );
    let expected: Vec<String> = (0..30).map(|i| format!("q{i:02}")).collect();
    assert_eq!(entity_labels(group), expected);
}

#[test]
fn relation_facet_lists_non_empty_groups() {
    let body = r##"
      <owl:Class rdf:ID="Keeper"/>
      <owl:Class rdf:ID="Animal"/>
      <owl:Class rdf:ID="caresFor"/>
      <owl:ObjectProperty rdf:ID="caresFor">
        <rdfs:domain rdf:resource="#Keeper"/>
        <rdfs:range rdf:resource="#Animal"/>
      </owl:ObjectProperty>
    "##;
    let mut projector = projector(MemorySource::new().with("r.owl", document(body)));

    let whole = projector.project("r.owl").expect("whole view");
    let cares = whole.child("caresFor").expect("root child");
    assert_eq!(mount_of(cares).facets, BTreeSet::from([Facet::Relation]));
    assert_eq!(
        cares.style,
        StylePolicy::default().style(NodeRole::ClassWithRelation)
    );

    let tree = projector
        .project("r.owl?iri=caresFor&target=relation")
        .expect("facet view");
    let relation = tree.child("relation").expect("relation group");
    let groups: Vec<&str> = relation.children.iter().map(|c| c.label.as_str()).collect();
    assert_eq!(groups, vec!["domains", "ranges"]);
    assert_eq!(relation.children[0].children[0].label, "Keeper");
}

#[test]
fn facets_render_in_fixed_order() {
    let body = r##"
      <owl:Class rdf:ID="Hub"/>
      <owl:Thing rdf:ID="h1"><rdf:type rdf:resource="#Hub"/></owl:Thing>
      <owl:ObjectProperty rdf:ID="Hub"><rdfs:domain rdf:resource="#Hub"/></owl:ObjectProperty>
    "##;
    let mut projector = projector(MemorySource::new().with("h.owl", document(body)));

    let tree = projector
        .project("h.owl?iri=Hub&target=properties+relation+instances")
        .expect("facet view");
    let order: Vec<&str> = tree.children.iter().map(|c| c.label.as_str()).collect();
    assert_eq!(order, vec!["instances", "relation", "properties"]);
}
