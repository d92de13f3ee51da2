//! Lazy tree projection of resolved ontology graphs.
//!
//! [`TreeProjector`] answers request strings of the form
//! `<locator>[?iri=<class>[&target=<facets>]]` with a [`TreeNode`]. Large
//! parts of the ontology are not expanded up front: each class node that has
//! instances, properties or a relation to show carries a [`MountPoint`] the
//! caller sends back to expand it.
//!
//! Wide child lists are regrouped by a [`Balance`] implementation and every
//! node is styled by a [`Decorate`] implementation; both are plugged into the
//! projector at construction time.
//!
//! ```
//! use ontotree_ontology::MemorySource;
//! use ontotree_projector::{LoadBalancer, StylePolicy, TreeProjector};
//!
//! let source = MemorySource::new().with(
//!     "zoo.owl",
//!     r##"<rdf:RDF
//!         xmlns:rdf="http://www.w3.org/1999/02/22-rdf-syntax-ns#"
//!         xmlns:owl="http://www.w3.org/2002/07/owl#">
//!       <owl:Class rdf:ID="Animal"/>
//!       <owl:Thing rdf:ID="leo"><rdf:type rdf:resource="#Animal"/></owl:Thing>
//!     </rdf:RDF>"##,
//! );
//! let mut projector = TreeProjector::new(source, LoadBalancer::default(), StylePolicy::default());
//!
//! let tree = projector.project("zoo.owl").expect("document loads");
//! assert_eq!(tree.label, "Animal");
//! let mount = tree.mount_point.clone().expect("Animal has instances");
//! assert_eq!(mount, "zoo.owl?iri=%23Animal&target=instances");
//!
//! let facets = projector.project(&mount).expect("mount point expands");
//! assert_eq!(facets.children[0].children[0].label, "leo");
//! ```

#![deny(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic,
    missing_docs,
    clippy::missing_errors_doc
)]

pub mod balancer;
pub mod config;
pub mod decoration;
pub mod mount;
pub mod projector;
pub mod tree;

pub use balancer::{Balance, LoadBalancer};
pub use config::{BalancerConfig, ConfigError, ProjectorConfig, StyleOverride};
pub use decoration::{Decorate, GroupLabel, NodeRole, StylePolicy};
pub use mount::{Facet, MountPoint, MountPointError, Request};
pub use projector::{TreeProjector, DEFAULT_NODE_LIMIT};
pub use tree::{NodeStyle, Rgb, TreeNode};
