//! `ontotree-check`: Validates ontology documents.
//!
//! Every file argument is checked; every directory argument is walked for
//! `.owl`, `.rdf` and `.xml` files. Each document goes through the parse,
//! graph and mount validators of `ontotree-conformance`.
//!
//! **Usage:**
//! ```text
//! ontotree-check <path>...
//! ```
//!
//! Exits non-zero if any check fails.

#![deny(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic,
    missing_docs,
    clippy::missing_errors_doc
)]

use std::path::{Path, PathBuf};
use std::process;

use anyhow::{Context, Result};
use clap::Parser;
use ontotree_conformance::{check_document, ConformanceReport, Severity};
use ontotree_ontology::FileSource;
use tracing_subscriber::EnvFilter;
use walkdir::WalkDir;

const EXTENSIONS: [&str; 3] = ["owl", "rdf", "xml"];

/// Validate ontology documents.
#[derive(Parser)]
#[command(name = "ontotree-check", about = "Validate ontology documents")]
struct Args {
    /// Documents, or directories to search for documents.
    #[arg(required = true)]
    paths: Vec<PathBuf>,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    let documents = collect_documents(&args.paths)?;

    println!("ontotree Conformance Report");
    println!("===========================");

    let mut passed = 0usize;
    let mut failed = 0usize;
    let mut warned = 0usize;

    for document in &documents {
        let locator = document.display().to_string();
        println!();
        println!("{locator}");
        let report = match check_document(&FileSource, &locator) {
            Ok(report) => report,
            Err(error) => {
                println!("[{}] read - {error:#}", Severity::Failure);
                failed += 1;
                continue;
            }
        };
        let (p, w, f) = print_report(&report);
        passed += p;
        warned += w;
        failed += f;
    }

    println!();
    println!(
        "Summary: {} document(s), {} passed, {} warnings, {} failed",
        documents.len(),
        passed,
        warned,
        failed
    );

    if failed > 0 {
        eprintln!("Conformance FAILED: {} check(s) did not pass.", failed);
        process::exit(1);
    }

    println!("Conformance PASSED.");
    Ok(())
}

/// Expands directories into the documents they contain, sorted.
fn collect_documents(paths: &[PathBuf]) -> Result<Vec<PathBuf>> {
    let mut documents = Vec::new();
    for path in paths {
        if !path.is_dir() {
            documents.push(path.clone());
            continue;
        }
        for entry in WalkDir::new(path).sort_by_file_name() {
            let entry =
                entry.with_context(|| format!("Failed to walk {}", path.display()))?;
            if entry.file_type().is_file() && is_document(entry.path()) {
                documents.push(entry.into_path());
            }
        }
    }
    Ok(documents)
}

fn is_document(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| EXTENSIONS.iter().any(|e| ext.eq_ignore_ascii_case(e)))
}

/// Prints one document's results; returns (passed, warned, failed).
fn print_report(report: &ConformanceReport) -> (usize, usize, usize) {
    let mut counts = (0, 0, 0);
    for result in &report.results {
        match result.severity {
            Severity::Pass => counts.0 += 1,
            Severity::Warning => counts.1 += 1,
            Severity::Failure => counts.2 += 1,
        }
        println!("[{}] {} - {}", result.severity, result.validator, result.message);
        for detail in &result.details {
            println!("       {}", detail);
        }
    }
    counts
}
