//! Book-level options.

use crate::error::{Error, Result};
use crate::model::{DEFAULT_AUTHOR, DEFAULT_LANGUAGE};

/// Options for assembling pages into an e-book.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BookOptions {
    /// Book title (defaults to the input file's base name when converting)
    pub title: Option<String>,

    /// Author name
    pub author: String,

    /// Language code, e.g. "en"
    pub language: String,

    /// Pages per chapter (at least 1)
    pub chapter_pages: usize,
}

impl BookOptions {
    /// Create new book options with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the title.
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Set the author.
    pub fn with_author(mut self, author: impl Into<String>) -> Self {
        self.author = author.into();
        self
    }

    /// Set the language code.
    pub fn with_language(mut self, language: impl Into<String>) -> Self {
        self.language = language.into();
        self
    }

    /// Set the number of pages per chapter.
    pub fn with_chapter_pages(mut self, pages: usize) -> Self {
        self.chapter_pages = pages;
        self
    }

    /// Check option domains.
    pub fn validate(&self) -> Result<()> {
        if self.chapter_pages == 0 {
            return Err(Error::InvalidOption(
                "pages per chapter must be at least 1".to_string(),
            ));
        }
        if self.language.trim().is_empty() {
            return Err(Error::InvalidOption("language must not be empty".to_string()));
        }
        Ok(())
    }
}

impl Default for BookOptions {
    fn default() -> Self {
        Self {
            title: None,
            author: DEFAULT_AUTHOR.to_string(),
            language: DEFAULT_LANGUAGE.to_string(),
            chapter_pages: 1,
        }
    }
}
