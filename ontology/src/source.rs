//! Document sources: turn a locator into a byte stream.

use std::collections::HashMap;
use std::fs::File;
use std::io::{BufRead, BufReader, Cursor};
use std::path::PathBuf;

use url::Url;

use crate::error::ParseError;

/// Something that can open a document by locator.
pub trait DocumentSource {
    /// Opens the document named by `locator` for a single streaming read.
    ///
    /// # Errors
    ///
    /// Returns [`ParseError::Unreachable`] when the locator cannot be mapped to
    /// a document and [`ParseError::Io`] when opening it fails.
    fn open(&self, locator: &str) -> Result<Box<dyn BufRead + '_>, ParseError>;
}

impl<S: DocumentSource + ?Sized> DocumentSource for &S {
    fn open(&self, locator: &str) -> Result<Box<dyn BufRead + '_>, ParseError> {
        (**self).open(locator)
    }
}

/// Reads documents from the local file system.
///
/// Accepts plain paths and `file:` URLs. Any other URL scheme is unreachable.
#[derive(Debug, Clone, Copy, Default)]
pub struct FileSource;

impl FileSource {
    fn path_of(locator: &str) -> Result<PathBuf, ParseError> {
        match Url::parse(locator) {
            Ok(url) if url.scheme() == "file" => url
                .to_file_path()
                .map_err(|()| ParseError::Unreachable(locator.to_string())),
            // A single-letter scheme is a Windows drive, not a URL.
            Ok(url) if url.scheme().len() == 1 => Ok(PathBuf::from(locator)),
            Ok(_) => Err(ParseError::Unreachable(locator.to_string())),
            Err(_) => Ok(PathBuf::from(locator)),
        }
    }
}

impl DocumentSource for FileSource {
    fn open(&self, locator: &str) -> Result<Box<dyn BufRead + '_>, ParseError> {
        let path = Self::path_of(locator)?;
        let file = File::open(&path).map_err(|source| ParseError::Io {
            locator: locator.to_string(),
            source,
        })?;
        Ok(Box::new(BufReader::new(file)))
    }
}

/// Serves documents held in memory, keyed by locator.
#[derive(Debug, Clone, Default)]
pub struct MemorySource {
    documents: HashMap<String, String>,
}

impl MemorySource {
    /// Creates an empty source.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers (or replaces) the document served for `locator`.
    pub fn insert(&mut self, locator: impl Into<String>, document: impl Into<String>) {
        self.documents.insert(locator.into(), document.into());
    }

    /// Builder form of [`MemorySource::insert`].
    #[must_use]
    pub fn with(mut self, locator: impl Into<String>, document: impl Into<String>) -> Self {
        self.insert(locator, document);
        self
    }
}

impl DocumentSource for MemorySource {
    fn open(&self, locator: &str) -> Result<Box<dyn BufRead + '_>, ParseError> {
        self.documents
            .get(locator)
            .map(|doc| Box::new(Cursor::new(doc.as_bytes())) as Box<dyn BufRead + '_>)
            .ok_or_else(|| ParseError::Unreachable(locator.to_string()))
    }
}
