//! Extraction options and configuration.

use std::ops::RangeInclusive;

use crate::error::{Error, Result};
use crate::layout::SegmentConfig;

/// Options for extracting pages from PDF documents.
#[derive(Debug, Clone)]
pub struct ExtractOptions {
    /// Error handling mode
    pub error_mode: ErrorMode,

    /// How page text is extracted
    pub extract_mode: ExtractMode,

    /// Paragraph segmentation thresholds
    pub segment: SegmentConfig,

    /// Whether to extract pages in parallel
    pub parallel: bool,

    /// Page selection (which pages to extract)
    pub pages: PageSelection,
}

impl ExtractOptions {
    /// Create new extract options with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set error mode.
    pub fn with_error_mode(mut self, mode: ErrorMode) -> Self {
        self.error_mode = mode;
        self
    }

    /// Enable lenient mode (fall back or skip on per-page failures).
    pub fn lenient(mut self) -> Self {
        self.error_mode = ErrorMode::Lenient;
        self
    }

    /// Set extract mode.
    pub fn with_extract_mode(mut self, mode: ExtractMode) -> Self {
        self.extract_mode = mode;
        self
    }

    /// Use the PDF library's plain full-text extraction instead of layout.
    pub fn plain_text(mut self) -> Self {
        self.extract_mode = ExtractMode::PlainText;
        self
    }

    /// Set the indent threshold used for paragraph detection.
    pub fn with_indent_threshold(mut self, threshold: f32) -> Self {
        self.segment = self.segment.with_indent_threshold(threshold);
        self
    }

    /// Set the maximum `x0` of body text.
    pub fn with_max_body_x0(mut self, max_x0: f32) -> Self {
        self.segment = self.segment.with_max_body_x0(max_x0);
        self
    }

    /// Enable or disable parallel processing.
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Disable parallel processing.
    pub fn sequential(mut self) -> Self {
        self.parallel = false;
        self
    }

    /// Set page selection.
    pub fn with_pages(mut self, pages: PageSelection) -> Self {
        self.pages = pages;
        self
    }

    /// Check that thresholds are usable numbers.
    pub fn validate(&self) -> Result<()> {
        if !self.segment.indent_threshold.is_finite() {
            return Err(Error::InvalidOption(
                "indent threshold must be a finite number".to_string(),
            ));
        }
        if !self.segment.max_body_x0.is_finite() {
            return Err(Error::InvalidOption(
                "max body x0 must be a finite number".to_string(),
            ));
        }
        Ok(())
    }
}

impl Default for ExtractOptions {
    fn default() -> Self {
        Self {
            error_mode: ErrorMode::Strict,
            extract_mode: ExtractMode::Layout,
            segment: SegmentConfig::default(),
            parallel: true,
            pages: PageSelection::All,
        }
    }
}

/// Error handling mode during extraction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ErrorMode {
    /// Fail on the first page that cannot be read
    #[default]
    Strict,
    /// Fall back to plain text, then to an empty page, and continue
    Lenient,
}

/// How text is pulled out of each page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExtractMode {
    /// Positioned words, line grouping, and indent-based paragraphs
    #[default]
    Layout,
    /// The PDF library's plain text; blank-line-separated blocks become
    /// paragraphs
    PlainText,
}

/// Page selection for extraction.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum PageSelection {
    /// All pages
    #[default]
    All,
    /// A range of pages (inclusive, 1-indexed)
    Range(RangeInclusive<u32>),
    /// Several disjoint ranges (1-indexed, sorted by start, merged)
    Ranges(Vec<RangeInclusive<u32>>),
}

impl PageSelection {
    /// Check if a page number should be included.
    pub fn includes(&self, page: u32) -> bool {
        match self {
            PageSelection::All => true,
            PageSelection::Range(range) => range.contains(&page),
            PageSelection::Ranges(ranges) => ranges.iter().any(|r| r.contains(&page)),
        }
    }

    /// Parse a page selection string (e.g., "1-10", "1,3,5,7-10").
    pub fn parse(s: &str) -> Result<Self> {
        let s = s.trim();
        if s.is_empty() || s.eq_ignore_ascii_case("all") {
            return Ok(PageSelection::All);
        }

        if !s.contains(',') {
            if let Some((start, end)) = s.split_once('-') {
                let (start, end) = (parse_page(start)?, parse_page(end)?);
                if start > end {
                    return Err(Error::InvalidPageRange(s.to_string()));
                }
                return Ok(PageSelection::Range(start..=end));
            }
        }

        let mut ranges = Vec::new();
        for part in s.split(',') {
            match part.split_once('-') {
                Some((start, end)) => {
                    let (start, end) = (parse_page(start)?, parse_page(end)?);
                    if start > end {
                        return Err(Error::InvalidPageRange(part.trim().to_string()));
                    }
                    ranges.push(start..=end);
                }
                None => {
                    let page = parse_page(part)?;
                    ranges.push(page..=page);
                }
            }
        }

        Ok(PageSelection::Ranges(merge_ranges(ranges)))
    }
}

/// Sort ranges by start and fold overlapping or adjacent ones together.
fn merge_ranges(mut ranges: Vec<RangeInclusive<u32>>) -> Vec<RangeInclusive<u32>> {
    ranges.sort_unstable_by_key(|r| *r.start());

    let mut merged: Vec<RangeInclusive<u32>> = Vec::with_capacity(ranges.len());
    for range in ranges {
        match merged.last_mut() {
            Some(last) if *range.start() <= last.end().saturating_add(1) => {
                let end = (*last.end()).max(*range.end());
                *last = *last.start()..=end;
            }
            _ => merged.push(range),
        }
    }
    merged
}

fn parse_page(s: &str) -> Result<u32> {
    match s.trim().parse::<u32>() {
        Ok(0) | Err(_) => Err(Error::InvalidPageRange(s.trim().to_string())),
        Ok(n) => Ok(n),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_options_builder() {
        let options = ExtractOptions::new()
            .lenient()
            .plain_text()
            .with_indent_threshold(30.0)
            .with_max_body_x0(120.0)
            .sequential();

        assert_eq!(options.error_mode, ErrorMode::Lenient);
        assert_eq!(options.extract_mode, ExtractMode::PlainText);
        assert_eq!(options.segment.indent_threshold, 30.0);
        assert_eq!(options.segment.max_body_x0, 120.0);
        assert!(!options.parallel);
    }

    #[test]
    fn test_default_options() {
        let options = ExtractOptions::default();
        assert_eq!(options.error_mode, ErrorMode::Strict);
        assert_eq!(options.extract_mode, ExtractMode::Layout);
        assert_eq!(options.segment.indent_threshold, 45.0);
        assert_eq!(options.segment.max_body_x0, 100.0);
        assert!(options.parallel);
        assert!(options.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_nan() {
        let options = ExtractOptions::new().with_indent_threshold(f32::NAN);
        assert!(matches!(options.validate(), Err(Error::InvalidOption(_))));
    }

    #[test]
    fn test_page_selection_includes() {
        let range = PageSelection::Range(5..=10);
        assert!(!range.includes(4));
        assert!(range.includes(5));
        assert!(range.includes(10));
        assert!(!range.includes(11));

        let pages = PageSelection::Ranges(vec![1..=1, 3..=3, 5..=7]);
        assert!(pages.includes(3));
        assert!(pages.includes(6));
        assert!(!pages.includes(2));
        assert!(!pages.includes(8));
    }

    #[test]
    fn test_page_selection_parse() {
        assert_eq!(PageSelection::parse("all").unwrap(), PageSelection::All);
        assert_eq!(
            PageSelection::parse("1-10").unwrap(),
            PageSelection::Range(1..=10)
        );
        assert_eq!(
            PageSelection::parse("5,1,3-4,5").unwrap(),
            PageSelection::Ranges(vec![1..=1, 3..=5])
        );
        assert_eq!(
            PageSelection::parse("8-9,2,10").unwrap(),
            PageSelection::Ranges(vec![2..=2, 8..=10])
        );
    }

    #[test]
    fn test_page_selection_huge_upper_bound() {
        let selection = PageSelection::parse("1,2-4000000000").unwrap();
        assert_eq!(selection, PageSelection::Ranges(vec![1..=4_000_000_000]));
        assert!(selection.includes(3_999_999_999));
        assert!(!selection.includes(4_000_000_001));

        let selection = PageSelection::parse("3,4294967295").unwrap();
        assert_eq!(
            selection,
            PageSelection::Ranges(vec![3..=3, u32::MAX..=u32::MAX])
        );
    }

    #[test]
    fn test_page_selection_parse_errors() {
        assert!(PageSelection::parse("0").is_err());
        assert!(PageSelection::parse("9-2").is_err());
        assert!(PageSelection::parse("a,b").is_err());
    }
}
