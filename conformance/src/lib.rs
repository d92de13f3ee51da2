//! ontotree conformance suite.
//!
//! Runs every validator against one ontology document and aggregates the
//! outcome into a [`ConformanceReport`].
//!
//! # Conformance Scope
//!
//! | Validator | Checks |
//! |-----------|--------|
//! | `parse` | the document is well-formed and declares something |
//! | `graph` | reverse edges, index closure, unique identifiers, idempotent resolution, dangling references (warning) |
//! | `mount` | every mount point round-trips, names a declared class and expands |
//!
//! # Entry Point
//!
//! ```no_run
//! use ontotree_conformance::check_document;
//! use ontotree_ontology::FileSource;
//!
//! let report = check_document(&FileSource, "zoo.owl").expect("document is readable");
//! assert!(report.all_passed());
//! ```

#![deny(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic,
    missing_docs,
    clippy::missing_errors_doc
)]

pub mod report;
pub mod validators;

use anyhow::Context;
use ontotree_ontology::{parse_locator, DocumentSource, ParseError};

pub use report::{ConformanceReport, Severity, TestResult};

/// Runs all validators on the document at `locator` and returns the
/// aggregated report.
///
/// Validators are run in this order:
/// 1. parse (a malformed document stops here with a failure)
/// 2. graph invariants
/// 3. mount points
///
/// # Errors
///
/// Returns an error only if the document cannot be read at all.
pub fn check_document<S: DocumentSource>(
    source: &S,
    locator: &str,
) -> anyhow::Result<ConformanceReport> {
    let mut report = ConformanceReport::new();

    // 1. Parse
    let raw = match parse_locator(source, locator) {
        Ok(raw) => raw,
        Err(error @ (ParseError::Io { .. } | ParseError::Unreachable(_))) => {
            return Err(error).with_context(|| format!("cannot read {locator}"));
        }
        Err(error) => {
            report.push(TestResult::fail("parse", format!("{locator}: {error}")));
            return Ok(report);
        }
    };
    if raw.is_empty() {
        report.push(TestResult::warn("parse", "document declares no entities"));
    } else {
        report.push(TestResult::pass(
            "parse",
            format!(
                "{} class(es), {} instance(s), {} propert(ies) declared",
                raw.classes.len(),
                raw.things.len(),
                raw.properties.len()
            ),
        ));
    }

    // 2. Graph invariants
    report.extend(validators::graph::validate(&raw));

    // 3. Mount points
    report.extend(validators::mount::validate(source, locator));

    tracing::info!(
        locator,
        failures = report.failure_count(),
        warnings = report.warning_count(),
        "conformance checked"
    );
    Ok(report)
}
