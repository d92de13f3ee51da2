//! Decoration policy: visual attributes per node role.
//!
//! The projector never picks colors or icons itself. It asks a [`Decorate`]
//! implementation for the style of each node's role and for the text of each
//! group label. [`StylePolicy`] is the stock implementation; its built-in
//! defaults are:
//!
//! | Role | Background | Icon |
//! |------|------------|------|
//! | `root` | `#f0f0f0` | `root.png` |
//! | `class` | `#ffffe0` | `class.png` |
//! | `class-with-instances` | `#ffefd5` | `classwithinstances.png` |
//! | `class-with-properties` | `#e0ffff` | `classwithproperties.png` |
//! | `class-with-relation` | `#f5e6ff` | `classwithrelation.png` |
//! | `class-group` | `#eee8aa` | `classes.png` |
//! | `instances-group` | `#ffd39b` | `instances.png` |
//! | `instance` | `#fff5ee` | `instance.png` |
//! | `relation-group` | `#d8bfd8` | `relation.png` |
//! | `property-group` | `#afeeee` | `properties.png` |
//! | `property` | `#f0ffff` | `property.png` |
//!
//! Every role uses a black foreground and a grey (`#808080`) edge.
//!
//! Balancer groups take the group role of the list they were cut from:
//! `class-group` for subclasses, `instances-group` for instances and
//! `property-group` for properties.

use std::collections::BTreeMap;

use serde::Deserialize;

use crate::config::ProjectorConfig;
use crate::tree::{NodeStyle, Rgb};

/// What a node stands for, as far as styling goes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum NodeRole {
    /// Synthetic root of a multi-root ontology.
    Root,
    /// Class with nothing to expand.
    Class,
    /// Class with attached instances.
    ClassWithInstances,
    /// Class with attached properties.
    ClassWithProperties,
    /// Class that doubles as a property.
    ClassWithRelation,
    /// Balancer group cut from a subclass list.
    ClassGroup,
    /// Group holding a class's instances.
    InstancesGroup,
    /// One instance.
    Instance,
    /// Group holding a class's relation lists.
    RelationGroup,
    /// Group holding a class's properties.
    PropertyGroup,
    /// One property.
    Property,
}

impl NodeRole {
    /// All roles.
    pub const ALL: [NodeRole; 11] = [
        NodeRole::Root,
        NodeRole::Class,
        NodeRole::ClassWithInstances,
        NodeRole::ClassWithProperties,
        NodeRole::ClassWithRelation,
        NodeRole::ClassGroup,
        NodeRole::InstancesGroup,
        NodeRole::Instance,
        NodeRole::RelationGroup,
        NodeRole::PropertyGroup,
        NodeRole::Property,
    ];

    fn defaults(self) -> (u32, &'static str) {
        match self {
            NodeRole::Root => (0xf0f0f0, "root.png"),
            NodeRole::Class => (0xffffe0, "class.png"),
            NodeRole::ClassWithInstances => (0xffefd5, "classwithinstances.png"),
            NodeRole::ClassWithProperties => (0xe0ffff, "classwithproperties.png"),
            NodeRole::ClassWithRelation => (0xf5e6ff, "classwithrelation.png"),
            NodeRole::ClassGroup => (0xeee8aa, "classes.png"),
            NodeRole::InstancesGroup => (0xffd39b, "instances.png"),
            NodeRole::Instance => (0xfff5ee, "instance.png"),
            NodeRole::RelationGroup => (0xd8bfd8, "relation.png"),
            NodeRole::PropertyGroup => (0xafeeee, "properties.png"),
            NodeRole::Property => (0xf0ffff, "property.png"),
        }
    }
}

/// Text of the labels on synthetic group nodes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum GroupLabel {
    /// Instances facet group.
    Instances,
    /// Properties facet group.
    Properties,
    /// Relation facet group.
    Relation,
    /// Relation sub-group listing domains.
    Domains,
    /// Relation sub-group listing ranges.
    Ranges,
    /// Relation sub-group listing sub-properties.
    Subproperties,
    /// Relation sub-group listing inverses.
    Inverses,
}

impl GroupLabel {
    /// Built-in text.
    #[must_use]
    pub fn default_text(self) -> &'static str {
        match self {
            GroupLabel::Instances => "instances",
            GroupLabel::Properties => "properties",
            GroupLabel::Relation => "relation",
            GroupLabel::Domains => "domains",
            GroupLabel::Ranges => "ranges",
            GroupLabel::Subproperties => "subproperties",
            GroupLabel::Inverses => "inverses",
        }
    }
}

/// Supplies visual attributes. Must not depend on or alter the graph.
pub trait Decorate {
    /// Style for a node of the given role.
    fn style(&self, role: NodeRole) -> NodeStyle;

    /// Text for a group label.
    fn label(&self, label: GroupLabel) -> String {
        label.default_text().to_string()
    }
}

/// Built-in defaults, optionally overridden from configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StylePolicy {
    styles: BTreeMap<NodeRole, NodeStyle>,
    labels: BTreeMap<GroupLabel, String>,
}

impl Default for StylePolicy {
    fn default() -> Self {
        let styles = NodeRole::ALL
            .into_iter()
            .map(|role| {
                let (background, icon) = role.defaults();
                let style = NodeStyle {
                    background: Some(Rgb::new(background)),
                    foreground: Some(Rgb::new(0x000000)),
                    edge: Some(Rgb::new(0x808080)),
                    icon: Some(icon.to_string()),
                };
                (role, style)
            })
            .collect();
        Self {
            styles,
            labels: BTreeMap::new(),
        }
    }
}

impl StylePolicy {
    /// Applies every override found in `config` on top of the defaults.
    #[must_use]
    pub fn from_config(config: &ProjectorConfig) -> Self {
        let mut policy = Self::default();
        for (role, patch) in &config.style {
            if let Some(style) = policy.styles.get_mut(role) {
                patch.apply(style);
            }
        }
        policy.labels.extend(
            config
                .labels
                .iter()
                .map(|(label, text)| (*label, text.clone())),
        );
        policy
    }
}

impl Decorate for StylePolicy {
    fn style(&self, role: NodeRole) -> NodeStyle {
        self.styles.get(&role).cloned().unwrap_or_default()
    }

    fn label(&self, label: GroupLabel) -> String {
        self.labels
            .get(&label)
            .cloned()
            .unwrap_or_else(|| label.default_text().to_string())
    }
}
