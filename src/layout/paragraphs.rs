//! Paragraph segmentation by first-line indent.
//!
//! PDF stores glyph positions, not paragraphs. The only cross-document
//! signal available without style metadata is the typographic first-line
//! indent, so a body line whose `x0` exceeds the indent threshold opens a
//! new paragraph.
//!
//! Known limitations of the heuristic, kept as-is and tunable only through
//! [`SegmentConfig`]:
//! - an indented quotation or list item inside the body is split into its
//!   own paragraph;
//! - block-style paragraphs without a first-line indent are merged into
//!   whatever precedes them;
//! - the first body line of a page always opens a paragraph, indented or
//!   not, while later indented lines close and reopen one.

use super::Line;

/// Default `x0` above which a body line counts as indented.
pub const DEFAULT_INDENT_THRESHOLD: f32 = 45.0;

/// Default `x0` above which a line is not body text.
pub const DEFAULT_MAX_BODY_X0: f32 = 100.0;

/// Thresholds for paragraph segmentation, in the extractor's coordinates
/// (left page edge = 0, increasing rightward).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SegmentConfig {
    /// Lines with `x0 > indent_threshold` start a paragraph
    pub indent_threshold: f32,
    /// Lines with `x0 > max_body_x0` are headers, page numbers, or
    /// marginalia and are dropped
    pub max_body_x0: f32,
}

impl SegmentConfig {
    /// Create a config with default thresholds.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the indent threshold.
    pub fn with_indent_threshold(mut self, threshold: f32) -> Self {
        self.indent_threshold = threshold;
        self
    }

    /// Set the maximum body `x0`.
    pub fn with_max_body_x0(mut self, max_x0: f32) -> Self {
        self.max_body_x0 = max_x0;
        self
    }

    /// Whether a line is outside the body column.
    pub fn is_marginal(&self, line: &Line) -> bool {
        line.x0 > self.max_body_x0
    }

    /// Whether a line starts a paragraph.
    pub fn is_paragraph_start(&self, line: &Line) -> bool {
        line.x0 > self.indent_threshold
    }
}

impl Default for SegmentConfig {
    fn default() -> Self {
        Self {
            indent_threshold: DEFAULT_INDENT_THRESHOLD,
            max_body_x0: DEFAULT_MAX_BODY_X0,
        }
    }
}

/// Segment one page's ordered lines into paragraphs.
///
/// No state is carried between pages.
pub fn segment_paragraphs(lines: &[Line], config: &SegmentConfig) -> Vec<String> {
    let mut paragraphs = Vec::new();
    let mut current: Vec<&str> = Vec::new();

    for line in lines {
        let text = line.text.trim();
        if text.is_empty() {
            continue;
        }

        if config.is_marginal(line) {
            log::trace!("dropping marginal line at x0={:.1}: {}", line.x0, text);
            continue;
        }

        if config.is_paragraph_start(line) && !current.is_empty() {
            paragraphs.push(current.join(" "));
            current.clear();
        }
        current.push(text);
    }

    if !current.is_empty() {
        paragraphs.push(current.join(" "));
    }

    paragraphs
}

#[cfg(test)]
mod tests {
    use super::*;

    fn line(x0: f32, text: &str) -> Line {
        Line {
            top: 0.0,
            x0,
            text: text.to_string(),
        }
    }

    #[test]
    fn test_no_lines_no_paragraphs() {
        assert!(segment_paragraphs(&[], &SegmentConfig::default()).is_empty());
    }

    #[test]
    fn test_indent_splits_paragraphs() {
        let lines = vec![
            line(30.0, "line1 text"),
            line(30.0, "line2 text"),
            line(50.0, "line3 text"),
            line(30.0, "line4 text"),
        ];
        let config = SegmentConfig::new().with_indent_threshold(45.0);
        assert_eq!(
            segment_paragraphs(&lines, &config),
            vec!["line1 text line2 text", "line3 text line4 text"]
        );
    }

    #[test]
    fn test_marginal_lines_dropped() {
        let lines = vec![
            line(30.0, "Body starts"),
            line(300.0, "42"),
            line(30.0, "and continues."),
        ];
        let paragraphs = segment_paragraphs(&lines, &SegmentConfig::default());
        assert_eq!(paragraphs, vec!["Body starts and continues."]);
    }

    #[test]
    fn test_indented_first_line_opens_but_does_not_split() {
        let lines = vec![line(60.0, "Opening"), line(30.0, "rest")];
        assert_eq!(
            segment_paragraphs(&lines, &SegmentConfig::default()),
            vec!["Opening rest"]
        );
    }

    #[test]
    fn test_consecutive_indented_lines_each_split() {
        let lines = vec![line(60.0, "a"), line(60.0, "b"), line(60.0, "c")];
        assert_eq!(
            segment_paragraphs(&lines, &SegmentConfig::default()),
            vec!["a", "b", "c"]
        );
    }

    #[test]
    fn test_blank_lines_ignored() {
        let lines = vec![line(30.0, "one"), line(60.0, "   "), line(30.0, "two")];
        assert_eq!(
            segment_paragraphs(&lines, &SegmentConfig::default()),
            vec!["one two"]
        );
    }

    #[test]
    fn test_threshold_is_strict_inequality() {
        let lines = vec![line(30.0, "a"), line(45.0, "b"), line(100.0, "c")];
        assert_eq!(
            segment_paragraphs(&lines, &SegmentConfig::default()),
            vec!["a b", "c"]
        );
    }
}
