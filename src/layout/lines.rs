//! Line grouping: clusters positioned words into visual lines.

use std::collections::BTreeMap;

use crate::model::Word;

/// A visual line: words sharing one vertical position, ordered left to right.
#[derive(Debug, Clone, PartialEq)]
pub struct Line {
    /// Vertical position key (top, rounded to one decimal)
    pub top: f32,
    /// Leftmost word's `x0`; the line's indent signal
    pub x0: f32,
    /// Words joined by single spaces
    pub text: String,
}

/// Quantize a vertical position to tenths of a unit.
///
/// Words whose `top` rounds to the same tenth share a line.
fn line_key(top: f32) -> i64 {
    (f64::from(top) * 10.0).round() as i64
}

/// Group the words of one page into lines sorted top to bottom.
///
/// Within a line, words are ordered by ascending `x0` (ties keep their
/// extraction order). A page with no words yields no lines.
pub fn group_words_into_lines(words: &[Word]) -> Vec<Line> {
    let mut by_top: BTreeMap<i64, Vec<&Word>> = BTreeMap::new();
    for word in words {
        by_top.entry(line_key(word.top)).or_default().push(word);
    }

    by_top
        .into_iter()
        .filter_map(|(key, mut line_words)| {
            line_words.sort_by(|a, b| a.x0.total_cmp(&b.x0));
            let x0 = line_words.first()?.x0;
            let text = line_words
                .iter()
                .map(|w| w.text.as_str())
                .collect::<Vec<_>>()
                .join(" ");
            Some(Line {
                top: key as f32 / 10.0,
                x0,
                text,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_page_has_no_lines() {
        assert!(group_words_into_lines(&[]).is_empty());
    }

    #[test]
    fn test_words_sorted_within_line() {
        let words = vec![
            Word::new("world", 80.0, 100.0),
            Word::new("Hello", 30.0, 100.0),
        ];
        let lines = group_words_into_lines(&words);
        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0].text, "Hello world");
        assert_eq!(lines[0].x0, 30.0);
    }

    #[test]
    fn test_lines_sorted_top_to_bottom() {
        let words = vec![
            Word::new("third", 30.0, 140.0),
            Word::new("first", 30.0, 100.0),
            Word::new("second", 30.0, 120.0),
        ];
        let lines = group_words_into_lines(&words);
        let texts: Vec<_> = lines.iter().map(|l| l.text.as_str()).collect();
        assert_eq!(texts, vec!["first", "second", "third"]);
        assert!(lines.windows(2).all(|w| w[0].top < w[1].top));
    }

    #[test]
    fn test_tolerance_merges_close_tops() {
        let words = vec![
            Word::new("a", 30.0, 100.01),
            Word::new("b", 40.0, 100.04),
            Word::new("c", 30.0, 100.5),
        ];
        let lines = group_words_into_lines(&words);
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0].text, "a b");
        assert_eq!(lines[1].text, "c");
    }
}
