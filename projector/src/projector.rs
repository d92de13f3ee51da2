//! The tree projector: request string in, displayable tree out.
//!
//! Three views are served, depending on the request:
//!
//! | Request | View |
//! |---------|------|
//! | `<locator>` | whole ontology, from the root class(es) down |
//! | `<locator>?iri=C` | class `C` and its subclass subtree |
//! | `<locator>?iri=C&target=F` | class `C` with facets `F` expanded |
//!
//! Class nodes are never expanded for their facets during a subtree walk;
//! instead each one gets a mount point naming the facets it has.
//!
//! A class with several superclasses appears under each of them. Diamond
//! shaped hierarchies therefore grow with the number of paths, not classes;
//! one walk builds at most [`DEFAULT_NODE_LIMIT`] class nodes (see
//! [`TreeProjector::with_node_limit`]) and leaves deeper classes collapsed.

use std::collections::{BTreeSet, HashSet};

use ontotree_ontology::{
    local_name, parse_locator, resolve, ClassId, DocumentSource, FileSource, OntologyGraph,
    PropertyId, Resource,
};

use crate::balancer::{Balance, LoadBalancer};
use crate::config::ProjectorConfig;
use crate::decoration::{Decorate, GroupLabel, NodeRole, StylePolicy};
use crate::mount::{Facet, MountPoint, Request};
use crate::tree::{NodeStyle, TreeNode};

/// Class nodes one subtree walk may build before it stops expanding.
pub const DEFAULT_NODE_LIMIT: usize = 100_000;

/// The graph of the most recently loaded document.
#[derive(Debug)]
struct CachedGraph {
    locator: String,
    graph: OntologyGraph,
}

/// Answers projection requests against a cached, lazily reloaded graph.
///
/// Not synchronised: callers sharing one projector across threads must
/// serialise access, or hold one projector each.
#[derive(Debug)]
pub struct TreeProjector<S = FileSource, B = LoadBalancer, D = StylePolicy> {
    source: S,
    balancer: B,
    decoration: D,
    node_limit: usize,
    cache: Option<CachedGraph>,
}

impl TreeProjector {
    /// A file-system projector configured from `config`.
    #[must_use]
    pub fn from_config(config: &ProjectorConfig) -> Self {
        TreeProjector::new(
            FileSource,
            LoadBalancer::from_config(&config.balancer),
            StylePolicy::from_config(config),
        )
    }
}

impl<S: DocumentSource, B: Balance, D: Decorate> TreeProjector<S, B, D> {
    /// Creates a projector with an empty cache.
    pub fn new(source: S, balancer: B, decoration: D) -> Self {
        Self {
            source,
            balancer,
            decoration,
            node_limit: DEFAULT_NODE_LIMIT,
            cache: None,
        }
    }

    /// Caps the class nodes built by one subtree walk. Classes beyond the
    /// cap are shown without their subclasses.
    #[must_use]
    pub fn with_node_limit(mut self, limit: usize) -> Self {
        self.node_limit = limit;
        self
    }

    /// Locator of the cached graph, if any.
    #[must_use]
    pub fn cached_locator(&self) -> Option<&str> {
        self.cache.as_ref().map(|c| c.locator.as_str())
    }

    /// The cached graph, if any.
    #[must_use]
    pub fn graph(&self) -> Option<&OntologyGraph> {
        self.cache.as_ref().map(|c| &c.graph)
    }

    /// Projects `request` into a tree.
    ///
    /// Returns `None` when the request is malformed, the document cannot be
    /// loaded, or the selected class does not exist.
    pub fn project(&mut self, request: &str) -> Option<TreeNode> {
        let request: Request = match request.parse() {
            Ok(request) => request,
            Err(error) => {
                tracing::warn!(request, %error, "rejecting malformed request");
                return None;
            }
        };
        self.project_request(&request)
    }

    /// Projects an already parsed request.
    pub fn project_request(&mut self, request: &Request) -> Option<TreeNode> {
        if !self.load(&request.locator) {
            return None;
        }
        let cached = self.cache.as_ref()?;
        let view = View {
            graph: &cached.graph,
            locator: &cached.locator,
            balancer: &self.balancer,
            decoration: &self.decoration,
            node_limit: self.node_limit,
        };

        let Some(selector) = &request.iri else {
            if request.facets.is_some() {
                tracing::debug!("facets without a class selector ignored");
            }
            return Some(view.whole());
        };
        let Some(class) = view.find_class(selector) else {
            tracing::warn!(selector = %selector, locator = %cached.locator, "unknown class selector");
            return None;
        };
        match &request.facets {
            None => Some(view.subtree(class, 0, &mut Walk::default())),
            Some(facets) => Some(view.facets(class, facets)),
        }
    }

    /// Makes sure the graph for `locator` is cached. The previous cache is
    /// kept when loading fails.
    fn load(&mut self, locator: &str) -> bool {
        if self.cached_locator() == Some(locator) {
            return true;
        }
        match parse_locator(&self.source, locator) {
            Ok(raw) => {
                let resolution = resolve(raw);
                tracing::info!(
                    locator,
                    classes = resolution.graph.class_count(),
                    dropped = resolution.diagnostics.len(),
                    "ontology loaded"
                );
                self.cache = Some(CachedGraph {
                    locator: locator.to_string(),
                    graph: resolution.graph,
                });
                true
            }
            Err(error) => {
                tracing::warn!(locator, %error, "document could not be loaded");
                false
            }
        }
    }
}

/// Borrowed context for one projection.
struct View<'a, B, D> {
    graph: &'a OntologyGraph,
    locator: &'a str,
    balancer: &'a B,
    decoration: &'a D,
    node_limit: usize,
}

/// State of one subtree walk.
#[derive(Debug, Default)]
struct Walk {
    /// Ancestors being expanded; stops subclass cycles.
    path: Vec<ClassId>,
    /// Classes expanded so far.
    expanded: HashSet<ClassId>,
    /// Class nodes built so far.
    nodes: usize,
    exhausted: bool,
}

impl<B: Balance, D: Decorate> View<'_, B, D> {
    /// Accepts the stored identifier, `#short`, or `<locator>#short`.
    fn find_class(&self, selector: &str) -> Option<ClassId> {
        self.graph
            .find_class(selector)
            .or_else(|| self.graph.find_class(&format!("#{selector}")))
            .or_else(|| {
                self.graph
                    .find_class(&format!("{}#{selector}", self.locator))
            })
    }

    /// The root class, or a synthetic root holding every root class.
    fn whole(&self) -> TreeNode {
        let roots = self.graph.roots();
        let mut walk = Walk::default();
        if let [root] = roots.as_slice() {
            return self.subtree(*root, 0, &mut walk);
        }
        let children: Vec<TreeNode> = roots
            .iter()
            .map(|&root| self.subtree(root, 1, &mut walk))
            .collect();
        let label = local_name(self.locator).to_string();
        TreeNode::new(label)
            .with_style(self.decoration.style(NodeRole::Root))
            .with_children(children)
    }

    /// `class` and its subclasses, recursively.
    fn subtree(&self, class: ClassId, depth: usize, walk: &mut Walk) -> TreeNode {
        let node = self.class_node(class, true);
        walk.nodes += 1;
        let iri = &self.graph.class(class).resource.iri;
        if walk.path.contains(&class) {
            tracing::warn!(class = %iri, "subclass cycle cut");
            return node;
        }
        if walk.nodes > self.node_limit {
            if !walk.exhausted {
                walk.exhausted = true;
                tracing::warn!(
                    class = %iri,
                    limit = self.node_limit,
                    "node limit reached, deeper subclasses left collapsed"
                );
            }
            return node;
        }
        if !walk.expanded.insert(class) {
            tracing::trace!(class = %iri, "class expanded again under another superclass");
        }
        walk.path.push(class);
        let children: Vec<TreeNode> = self
            .graph
            .class(class)
            .subclasses
            .iter()
            .map(|&sub| self.subtree(sub, depth + 1, walk))
            .collect();
        walk.path.pop();
        node.with_children(self.balanced(children, depth, NodeRole::ClassGroup))
    }

    /// Balances `children` of a node at `level`, styling the groups as `role`.
    fn balanced(&self, children: Vec<TreeNode>, level: usize, role: NodeRole) -> Vec<TreeNode> {
        let style = self.decoration.style(role);
        let mut balanced = self.balancer.balance(children, level);
        for node in &mut balanced {
            style_groups(node, &style);
        }
        balanced
    }

    /// Facets `class` can be expanded into.
    fn eligible(&self, class: ClassId) -> BTreeSet<Facet> {
        let entity = self.graph.class(class);
        let mut facets = BTreeSet::new();
        if !entity.instances.is_empty() {
            facets.insert(Facet::Instances);
        }
        if !entity.properties.is_empty() {
            facets.insert(Facet::Properties);
        }
        if self.graph.property_for_class(class).is_some() {
            facets.insert(Facet::Relation);
        }
        facets
    }

    fn class_node(&self, class: ClassId, with_mount_point: bool) -> TreeNode {
        let entity = self.graph.class(class);
        let eligible = self.eligible(class);
        let role = if eligible.contains(&Facet::Instances) {
            NodeRole::ClassWithInstances
        } else if eligible.contains(&Facet::Properties) {
            NodeRole::ClassWithProperties
        } else if eligible.contains(&Facet::Relation) {
            NodeRole::ClassWithRelation
        } else {
            NodeRole::Class
        };
        let node = resource_node(&entity.resource).with_style(self.decoration.style(role));
        if !with_mount_point || eligible.is_empty() {
            return node;
        }
        match MountPoint::new(self.locator, entity.resource.iri.as_str(), eligible) {
            Ok(mount) => node.with_mount_point(mount.to_string()),
            Err(error) => {
                tracing::debug!(class = %entity.resource.iri, %error, "no mount point");
                node
            }
        }
    }

    fn facets(&self, class: ClassId, requested: &BTreeSet<Facet>) -> TreeNode {
        let mut children = Vec::new();
        // Display order differs from encoding order.
        for facet in [Facet::Instances, Facet::Relation, Facet::Properties] {
            if !requested.contains(&facet) {
                continue;
            }
            let group = match facet {
                Facet::Instances => self.instances_group(class),
                Facet::Relation => self.relation_group(class),
                Facet::Properties => self.properties_group(class),
            };
            match group {
                Some(group) => children.push(group),
                None => tracing::debug!(
                    class = %self.graph.class(class).resource.iri,
                    facet = %facet,
                    "requested facet not present"
                ),
            }
        }
        self.class_node(class, false).with_children(children)
    }

    fn instances_group(&self, class: ClassId) -> Option<TreeNode> {
        let entity = self.graph.class(class);
        if entity.instances.is_empty() {
            return None;
        }
        let mut things: Vec<_> = entity
            .instances
            .iter()
            .map(|&id| self.graph.thing(id))
            .collect();
        things.sort_by(|a, b| sort_key(&a.resource).cmp(&sort_key(&b.resource)));

        let style = self.decoration.style(NodeRole::Instance);
        let nodes: Vec<TreeNode> = things
            .into_iter()
            .map(|thing| {
                let types: Vec<&str> = thing
                    .types
                    .iter()
                    .map(|&c| self.graph.class(c).resource.local_name())
                    .collect();
                let mut lines = vec![format!("types: {}", types.join(", "))];
                lines.extend(thing.resource.annotations.iter().cloned());
                TreeNode::new(thing.resource.display_label())
                    .with_id(&thing.resource.iri)
                    .with_content(lines.join("\n"))
                    .with_style(style.clone())
            })
            .collect();

        let children = self.balanced(nodes, 1, NodeRole::InstancesGroup);
        Some(self.group(GroupLabel::Instances, NodeRole::InstancesGroup, children))
    }

    fn relation_group(&self, class: ClassId) -> Option<TreeNode> {
        let property = self.graph.property(self.graph.property_for_class(class)?);
        let class_style = self.decoration.style(NodeRole::Class);
        let property_style = self.decoration.style(NodeRole::Property);

        let class_members = |ids: &BTreeSet<ClassId>| -> Vec<TreeNode> {
            ids.iter()
                .map(|&id| member_node(&self.graph.class(id).resource, &class_style))
                .collect()
        };
        let property_members = |ids: &BTreeSet<PropertyId>| -> Vec<TreeNode> {
            ids.iter()
                .map(|&id| member_node(&self.graph.property(id).resource, &property_style))
                .collect()
        };

        let lists = [
            (GroupLabel::Domains, class_members(&property.domains)),
            (GroupLabel::Ranges, class_members(&property.ranges)),
            (GroupLabel::Subproperties, property_members(&property.sub_property_of)),
            (GroupLabel::Inverses, property_members(&property.inverses)),
        ];
        let children = lists
            .into_iter()
            .filter(|(_, members)| !members.is_empty())
            .map(|(label, members)| self.group(label, NodeRole::RelationGroup, members))
            .collect();
        Some(self.group(GroupLabel::Relation, NodeRole::RelationGroup, children))
    }

    fn properties_group(&self, class: ClassId) -> Option<TreeNode> {
        let entity = self.graph.class(class);
        if entity.properties.is_empty() {
            return None;
        }
        let mut properties: Vec<_> = entity
            .properties
            .iter()
            .map(|&id| self.graph.property(id))
            .collect();
        properties.sort_by(|a, b| sort_key(&a.resource).cmp(&sort_key(&b.resource)));

        let style = self.decoration.style(NodeRole::Property);
        let nodes: Vec<TreeNode> = properties
            .into_iter()
            .map(|property| {
                let names = |ids: &BTreeSet<ClassId>| -> String {
                    ids.iter()
                        .map(|&c| self.graph.class(c).resource.local_name())
                        .collect::<Vec<_>>()
                        .join(", ")
                };
                let mut lines = Vec::new();
                if let Some(kind) = property.kind {
                    lines.push(kind.as_str().to_string());
                }
                if !property.domains.is_empty() {
                    lines.push(format!("domain: {}", names(&property.domains)));
                }
                if !property.ranges.is_empty() {
                    lines.push(format!("range: {}", names(&property.ranges)));
                }
                lines.extend(property.resource.comment.iter().cloned());
                TreeNode::new(property.resource.display_label())
                    .with_id(&property.resource.iri)
                    .with_content(lines.join("\n"))
                    .with_style(style.clone())
            })
            .collect();

        let children = self.balanced(nodes, 1, NodeRole::PropertyGroup);
        Some(self.group(GroupLabel::Properties, NodeRole::PropertyGroup, children))
    }

    fn group(&self, label: GroupLabel, role: NodeRole, children: Vec<TreeNode>) -> TreeNode {
        TreeNode::new(self.decoration.label(label))
            .with_style(self.decoration.style(role))
            .with_children(children)
    }
}

/// Sorting by local name, identifier as tie-breaker.
fn sort_key(resource: &Resource) -> (&str, &str) {
    (resource.local_name(), resource.iri.as_str())
}

fn resource_node(resource: &Resource) -> TreeNode {
    let mut lines: Vec<String> = resource.comment.iter().cloned().collect();
    lines.extend(resource.annotations.iter().cloned());
    TreeNode::new(resource.display_label())
        .with_id(&resource.iri)
        .with_content(lines.join("\n"))
}

/// Balancer groups are the nodes without an identifier.
fn style_groups(node: &mut TreeNode, style: &NodeStyle) {
    if node.id.is_some() {
        return;
    }
    node.style = style.clone();
    for child in &mut node.children {
        style_groups(child, style);
    }
}

fn member_node(resource: &Resource, style: &NodeStyle) -> TreeNode {
    TreeNode::new(resource.local_name())
        .with_id(&resource.iri)
        .with_style(style.clone())
}

#[cfg(test)]
mod tests {
    use ontotree_ontology::MemorySource;

    use super::*;

    const LOCATOR: &str = "mem://cycle.owl";

    fn projector(document: &str) -> TreeProjector<MemorySource> {
        let source = MemorySource::new().with(LOCATOR, document);
        TreeProjector::new(source, LoadBalancer::default(), StylePolicy::default())
    }

    #[test]
    fn subclass_cycles_are_cut() {
        let mut projector = projector(
            r##"<rdf:RDF xmlns:rdf="http://www.w3.org/1999/02/22-rdf-syntax-ns#"
                         xmlns:rdfs="http://www.w3.org/2000/01/rdf-schema#"
                         xmlns:owl="http://www.w3.org/2002/07/owl#">
                  <owl:Class rdf:ID="Top"/>
                  <owl:Class rdf:ID="A">
                    <rdfs:subClassOf rdf:resource="#Top"/>
                    <rdfs:subClassOf rdf:resource="#B"/>
                  </owl:Class>
                  <owl:Class rdf:ID="B">
                    <rdfs:subClassOf rdf:resource="#A"/>
                  </owl:Class>
                </rdf:RDF>"##,
        );
        let tree = projector.project(LOCATOR).expect("projects");
        assert_eq!(tree.label, "Top");
        let a = tree.child("A").expect("A under Top");
        let b = a.child("B").expect("B under A");
        let a_again = b.child("A").expect("A repeated once");
        assert!(a_again.children.is_empty());
    }

    const HEADER: &str = r#"<rdf:RDF xmlns:rdf="http://www.w3.org/1999/02/22-rdf-syntax-ns#"
                         xmlns:rdfs="http://www.w3.org/2000/01/rdf-schema#"
                         xmlns:owl="http://www.w3.org/2002/07/owl#">"#;

    /// `Top`, then `levels` layers of two classes each, every one a subclass
    /// of both classes in the layer above.
    fn diamond_ladder(levels: usize) -> String {
        let mut document = format!("{HEADER}<owl:Class rdf:ID=\"Top\"/>");
        for level in 1..=levels {
            let supers = if level == 1 {
                vec!["Top".to_string()]
            } else {
                vec![format!("A{}", level - 1), format!("B{}", level - 1)]
            };
            for side in ["A", "B"] {
                document.push_str(&format!("<owl:Class rdf:ID=\"{side}{level}\">"));
                for sup in &supers {
                    document.push_str(&format!("<rdfs:subClassOf rdf:resource=\"#{sup}\"/>"));
                }
                document.push_str("</owl:Class>");
            }
        }
        document.push_str("</rdf:RDF>");
        document
    }

    #[test]
    fn diamond_subclass_appears_under_each_superclass() {
        let mut projector = projector(&format!(
            r##"{HEADER}
                  <owl:Class rdf:ID="A"/>
                  <owl:Class rdf:ID="B"><rdfs:subClassOf rdf:resource="#A"/></owl:Class>
                  <owl:Class rdf:ID="C"><rdfs:subClassOf rdf:resource="#A"/></owl:Class>
                  <owl:Class rdf:ID="D">
                    <rdfs:subClassOf rdf:resource="#B"/>
                    <rdfs:subClassOf rdf:resource="#C"/>
                  </owl:Class>
                </rdf:RDF>"##
        ));
        let tree = projector.project(LOCATOR).expect("projects");
        assert_eq!(tree.label, "A");
        for middle in ["B", "C"] {
            let d = tree
                .child(middle)
                .and_then(|m| m.child("D"))
                .expect("D under both superclasses");
            assert!(d.children.is_empty());
        }
        assert_eq!(tree.descendants().len(), 5);
    }

    #[test]
    fn node_limit_bounds_diamond_ladders() {
        let source = MemorySource::new().with(LOCATOR, diamond_ladder(12));
        let mut limited =
            TreeProjector::new(source, LoadBalancer::default(), StylePolicy::default())
                .with_node_limit(500);
        let tree = limited.project(LOCATOR).expect("projects");
        let built = tree.descendants().len();
        // Siblings of the classes on the open path are still listed.
        assert!(built > 500 && built <= 500 + 2 * 13, "{built} nodes");

        let mut unlimited = projector(&diamond_ladder(6));
        let full = unlimited.project(LOCATOR).expect("projects");
        // 1 + 2 + 4 + ... + 2^6 paths.
        assert_eq!(full.descendants().len(), 127);
    }

    #[test]
    fn short_selector_falls_back_to_locator_namespace() {
        let locator = "http://example.org/zoo";
        let source = MemorySource::new().with(
            locator,
            r#"<rdf:RDF xmlns:rdf="http://www.w3.org/1999/02/22-rdf-syntax-ns#"
                        xmlns:owl="http://www.w3.org/2002/07/owl#">
                 <owl:Class rdf:about="http://example.org/zoo#Lion"/>
               </rdf:RDF>"#,
        );
        let mut projector =
            TreeProjector::new(source, LoadBalancer::default(), StylePolicy::default());
        let tree = projector
            .project("http://example.org/zoo?iri=Lion")
            .expect("short selector resolves");
        assert_eq!(tree.id.as_deref(), Some("http://example.org/zoo#Lion"));
    }
}
