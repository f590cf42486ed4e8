//! Chapter types: contiguous runs of pages rendered as one content document.

use super::Page;

/// Build the page-boundary sentinel line for a page.
pub fn page_marker(page_number: u32) -> String {
    format!("<!-- Page {} -->", page_number)
}

/// A group of consecutive pages that becomes one EPUB content document.
///
/// Page provenance is kept structurally in `pages`; the marker-bearing
/// text blob is only produced on demand by [`Chapter::text`].
#[derive(Debug, Clone, PartialEq)]
pub struct Chapter {
    /// Chapter number derived from the page group's position (1-indexed).
    /// Numbers can have gaps when blank page groups were dropped.
    pub number: u32,

    /// Pages covered by this chapter, in document order
    pub pages: Vec<Page>,
}

impl Chapter {
    /// Create a chapter.
    pub fn new(number: u32, pages: Vec<Page>) -> Self {
        Self { number, pages }
    }

    /// Display title, e.g. "Chapter 3".
    pub fn title(&self) -> String {
        format!("Chapter {}", self.number)
    }

    /// Content document file name, e.g. "chapter_0003.xhtml".
    pub fn file_name(&self) -> String {
        format!("chapter_{:04}.xhtml", self.number)
    }

    /// Manifest identifier for the content document.
    pub fn id(&self) -> String {
        format!("chapter_{:04}", self.number)
    }

    /// Paragraphs with their originating page number, in reading order.
    pub fn paragraphs(&self) -> impl Iterator<Item = (u32, &str)> + '_ {
        self.pages
            .iter()
            .flat_map(|page| page.paragraphs.iter().map(|p| (page.number, p.as_str())))
    }

    /// Plain-text blob: every non-empty page as a marker line followed by
    /// its paragraphs, pages separated by a blank line.
    pub fn text(&self) -> String {
        self.pages
            .iter()
            .filter(|page| !page.is_empty())
            .map(|page| format!("{}\n{}", page_marker(page.number), page.text()))
            .collect::<Vec<_>>()
            .join("\n\n")
    }

    /// Whether the chapter has no renderable text.
    pub fn is_blank(&self) -> bool {
        self.pages
            .iter()
            .all(|page| page.paragraphs.iter().all(|p| p.trim().is_empty()))
    }

    /// First and last page numbers covered, if any.
    pub fn page_span(&self) -> Option<(u32, u32)> {
        Some((self.pages.first()?.number, self.pages.last()?.number))
    }
}
