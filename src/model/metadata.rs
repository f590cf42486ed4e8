//! Book-level and source-document metadata.

use md5::{Digest, Md5};
use serde::{Deserialize, Serialize};

/// Default author when none is configured.
pub const DEFAULT_AUTHOR: &str = "Unknown";

/// Default language code when none is configured.
pub const DEFAULT_LANGUAGE: &str = "en";

/// Metadata attached once to the output e-book.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookMetadata {
    /// Unique identifier (deterministic for a given title)
    pub identifier: String,
    /// Book title
    pub title: String,
    /// Book author
    pub author: String,
    /// BCP 47 language code
    pub language: String,
}

impl BookMetadata {
    /// Create metadata, deriving the identifier from the title.
    pub fn new(
        title: impl Into<String>,
        author: impl Into<String>,
        language: impl Into<String>,
    ) -> Self {
        let title = title.into();
        Self {
            identifier: identifier_for(&title),
            title,
            author: author.into(),
            language: language.into(),
        }
    }
}

/// Derive a stable book identifier from a title.
pub fn identifier_for(title: &str) -> String {
    let digest = Md5::digest(title.as_bytes());
    format!("pdf2epub-{:x}", digest)
}

/// Information read from the PDF's document info dictionary.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentInfo {
    /// PDF version string
    pub pdf_version: String,
    /// Total number of pages in the document
    pub page_count: u32,
    /// Document title, if declared
    pub title: Option<String>,
    /// Document author, if declared
    pub author: Option<String>,
    /// Producing application, if declared
    pub producer: Option<String>,
    /// Creation date, if declared and parseable
    pub created: Option<chrono::DateTime<chrono::Utc>>,
}
