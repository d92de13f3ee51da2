//! Validators run against one ontology document.

pub mod graph;
pub mod mount;
