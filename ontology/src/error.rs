//! Errors raised while reading a document.

use quick_xml::events::attributes::AttrError;

/// A fatal parse failure. No partial result is ever returned alongside it.
#[derive(Debug, thiserror::Error)]
pub enum ParseError {
    /// The document could not be opened or read.
    #[error("cannot read `{locator}`: {source}")]
    Io {
        /// Locator of the document.
        locator: String,
        /// Underlying I/O failure.
        source: std::io::Error,
    },
    /// The locator does not name anything a source can open.
    #[error("unreachable document locator `{0}`")]
    Unreachable(String),
    /// The document is not well-formed XML.
    #[error("malformed document: {0}")]
    Xml(#[from] quick_xml::Error),
    /// An element carries a malformed attribute.
    #[error("malformed attribute: {0}")]
    Attribute(#[from] AttrError),
    /// The stream ended while elements were still open.
    #[error("document truncated with {open} unclosed element(s)")]
    Truncated {
        /// Depth of the scope stack at end of stream.
        open: usize,
    },
    /// The stream contained no element at all.
    #[error("document has no root element")]
    Empty,
}
