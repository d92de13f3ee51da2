//! `ontotree-project`: Projects an ontology document into a tree.
//!
//! The request is either a document path, or a mount point printed by a
//! previous run:
//!
//! ```text
//! ontotree-project zoo.owl
//! ontotree-project 'zoo.owl?iri=%23Lion&target=instances'
//! ```
//!
//! **Usage:**
//! ```text
//! ontotree-project <request> [--config <path>] [--format text|json] [--mounts]
//! ```
//!
//! Exits non-zero if the request yields no tree.

#![deny(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic,
    missing_docs,
    clippy::missing_errors_doc
)]

use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::{Parser, ValueEnum};
use ontotree_projector::{ProjectorConfig, TreeNode, TreeProjector};
use tracing_subscriber::EnvFilter;

/// Output formats.
#[derive(Debug, Clone, Copy, ValueEnum)]
enum Format {
    /// Indented outline; expandable nodes are marked `[+]`.
    Text,
    /// The full tree with styles and mount points.
    Json,
}

/// Project an ontology document, or one of its mount points, into a tree.
#[derive(Parser)]
#[command(name = "ontotree-project", about = "Project an ontology document into a tree")]
struct Args {
    /// Document path or mount point.
    request: String,

    /// Projector configuration (TOML).
    #[arg(long)]
    config: Option<PathBuf>,

    /// Output format.
    #[arg(long, value_enum, default_value = "text")]
    format: Format,

    /// List the mount points of the tree after the outline.
    #[arg(long)]
    mounts: bool,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    let config = match &args.config {
        Some(path) => ProjectorConfig::load(path)
            .with_context(|| format!("Failed to load configuration {}", path.display()))?,
        None => ProjectorConfig::default(),
    };
    let mut projector = TreeProjector::from_config(&config);

    let Some(tree) = projector.project(&args.request) else {
        bail!("No tree for request `{}` (see log for details)", args.request);
    };

    match args.format {
        Format::Text => {
            print!("{}", tree.render_outline());
            if args.mounts {
                print_mounts(&tree);
            }
        }
        Format::Json => {
            let json =
                serde_json::to_string_pretty(&tree).context("Failed to serialize tree")?;
            println!("{json}");
        }
    }
    Ok(())
}

fn print_mounts(tree: &TreeNode) {
    println!();
    for node in tree.descendants() {
        if let Some(mount) = &node.mount_point {
            println!("{}\t{}", node.label, mount);
        }
    }
}
