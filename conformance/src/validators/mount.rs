//! Mount-point validator.
//!
//! Projects the whole-ontology view and a drill-in view of every class, then
//! checks each mount point found in those trees:
//! - it parses, and re-encodes to the identical string
//! - it names the projected document and a declared class
//! - its facets are exactly the class's non-empty facets
//! - sending it back yields a facet view with one group per facet

use std::collections::{BTreeMap, BTreeSet};

use ontotree_ontology::{DocumentSource, OntologyGraph};
use ontotree_projector::{
    Facet, LoadBalancer, MountPoint, Request, StylePolicy, TreeNode, TreeProjector,
};

use crate::report::{ConformanceReport, Severity, TestResult};

const VALIDATOR: &str = "mount";

/// Validates every mount point the projector hands out for `locator`.
pub fn validate<S: DocumentSource>(source: &S, locator: &str) -> ConformanceReport {
    let mut report = ConformanceReport::new();
    let mut projector = TreeProjector::new(source, LoadBalancer::default(), StylePolicy::default());

    let Some(whole) = projector.project_request(&Request::whole(locator)) else {
        report.push(TestResult::fail(
            VALIDATOR,
            format!("{locator} does not project"),
        ));
        return report;
    };
    let Some(expected) = projector.graph().map(expected_facets) else {
        report.push(TestResult::fail(VALIDATOR, "projector cached no graph"));
        return report;
    };

    let mut trees = vec![whole];
    for iri in expected.keys() {
        let request = Request {
            locator: locator.to_string(),
            iri: Some(iri.clone()),
            facets: None,
        };
        match projector.project_request(&request) {
            Some(tree) => trees.push(tree),
            None => report.push(TestResult::fail(
                VALIDATOR,
                format!("drill-in view of {iri} does not project"),
            )),
        }
    }

    let mounts: BTreeSet<String> = trees
        .iter()
        .flat_map(TreeNode::descendants)
        .filter_map(|node| node.mount_point.clone())
        .collect();

    let mut problems = Vec::new();
    for encoded in &mounts {
        if let Err(problem) = check(&mut projector, locator, &expected, encoded) {
            problems.push(format!("{encoded}: {problem}"));
        }
    }
    tracing::debug!(locator, mounts = mounts.len(), "mount points checked");

    report.push(TestResult::from_problems(
        VALIDATOR,
        format!("{} mount point(s) round-trip and expand", mounts.len()),
        "Invalid mount points",
        Severity::Failure,
        problems,
    ));
    report
}

/// Non-empty facets of every class, keyed by identifier.
fn expected_facets(graph: &OntologyGraph) -> BTreeMap<String, BTreeSet<Facet>> {
    graph
        .classes()
        .map(|(id, class)| {
            let mut facets = BTreeSet::new();
            if !class.instances.is_empty() {
                facets.insert(Facet::Instances);
            }
            if !class.properties.is_empty() {
                facets.insert(Facet::Properties);
            }
            if graph.property_for_class(id).is_some() {
                facets.insert(Facet::Relation);
            }
            (class.resource.iri.clone(), facets)
        })
        .collect()
}

fn check<S: DocumentSource>(
    projector: &mut TreeProjector<S, LoadBalancer, StylePolicy>,
    locator: &str,
    expected: &BTreeMap<String, BTreeSet<Facet>>,
    encoded: &str,
) -> Result<(), String> {
    let mount: MountPoint = encoded.parse().map_err(|e| format!("does not parse: {e}"))?;
    if mount.to_string() != encoded {
        return Err(format!("re-encodes as {mount}"));
    }
    if mount.locator != locator {
        return Err(format!("names document {}", mount.locator));
    }
    let facets = expected
        .get(&mount.iri)
        .ok_or_else(|| format!("names undeclared class {}", mount.iri))?;
    if &mount.facets != facets {
        return Err(format!("offers {:?}, class has {facets:?}", mount.facets));
    }
    let view = projector
        .project_request(&Request::from(mount.clone()))
        .ok_or("does not expand")?;
    if view.id.as_deref() != Some(mount.iri.as_str()) {
        return Err(format!("expands to {:?}", view.id));
    }
    if view.mount_point.is_some() {
        return Err("facet view is expandable again".to_string());
    }
    if view.children.len() != mount.facets.len() {
        return Err(format!(
            "expands to {} group(s) for {} facet(s)",
            view.children.len(),
            mount.facets.len()
        ));
    }
    Ok(())
}
