//! Page-level types.

use serde::{Deserialize, Serialize};

/// Separator placed between paragraphs in plain-text renderings.
pub const PARAGRAPH_SEPARATOR: &str = "\n\n";

/// A single extracted page with its reconstructed paragraphs.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Page {
    /// Page number (1-indexed, as numbered in the source PDF)
    pub number: u32,

    /// Paragraphs in reading order, each flattened to a single line
    pub paragraphs: Vec<String>,
}

impl Page {
    /// Create a page from its paragraphs.
    ///
    /// Paragraphs that are empty after trimming are discarded, so every
    /// stored paragraph is non-empty.
    pub fn new(number: u32, paragraphs: Vec<String>) -> Self {
        let paragraphs = paragraphs
            .into_iter()
            .filter(|p| !p.trim().is_empty())
            .collect();
        Self { number, paragraphs }
    }

    /// Create a page with no content.
    pub fn empty(number: u32) -> Self {
        Self {
            number,
            paragraphs: Vec::new(),
        }
    }

    /// Paragraphs joined by a blank line.
    pub fn text(&self) -> String {
        self.paragraphs.join(PARAGRAPH_SEPARATOR)
    }

    /// Check whether the page carries no text.
    pub fn is_empty(&self) -> bool {
        self.paragraphs.is_empty()
    }

    /// Total number of whitespace-delimited words on the page.
    pub fn word_count(&self) -> usize {
        self.paragraphs
            .iter()
            .map(|p| p.split_whitespace().count())
            .sum()
    }
}
