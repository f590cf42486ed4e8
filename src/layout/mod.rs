//! Layout reconstruction: words → lines → paragraphs.

mod lines;
mod paragraphs;

pub use lines::{group_words_into_lines, Line};
pub use paragraphs::{
    segment_paragraphs, SegmentConfig, DEFAULT_INDENT_THRESHOLD, DEFAULT_MAX_BODY_X0,
};

use crate::model::Word;

/// Reconstruct the paragraphs of one page from its words.
pub fn paragraphs_from_words(words: &[Word], config: &SegmentConfig) -> Vec<String> {
    let lines = group_words_into_lines(words);
    log::debug!("grouped {} words into {} lines", words.len(), lines.len());
    segment_paragraphs(&lines, config)
}
