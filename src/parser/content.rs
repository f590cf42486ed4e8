//! Content stream interpretation: turns text-showing operators into
//! positioned [`Word`]s.
//!
//! Glyph advances are estimated from the font's `Widths` array when it has
//! one and from a half-em default otherwise, which is precise enough for
//! the left-edge positions that line grouping and indent detection use.

use std::collections::BTreeMap;

use lopdf::content::Content;
use lopdf::{Dictionary, Document as LopdfDocument, Object};
use unicode_normalization::UnicodeNormalization;

use crate::error::{Error, Result};
use crate::model::Word;

/// Page geometry needed to flip PDF's bottom-up coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PageBox {
    /// Left edge (llx of the MediaBox)
    pub left: f32,
    /// Top edge (ury of the MediaBox)
    pub top: f32,
}

impl PageBox {
    /// Build from a MediaBox `[llx, lly, urx, ury]`.
    pub fn from_media_box(media_box: [f32; 4]) -> Self {
        Self {
            left: media_box[0].min(media_box[2]),
            top: media_box[1].max(media_box[3]),
        }
    }
}

impl Default for PageBox {
    fn default() -> Self {
        // US Letter
        Self::from_media_box([0.0, 0.0, 612.0, 792.0])
    }
}

/// TJ adjustments beyond this (thousandths of an em) are word breaks.
const TJ_SPACE_THRESHOLD: f32 = 200.0;

/// Fraction of the font size above the baseline used as a glyph's top.
const ASCENT_RATIO: f32 = 0.8;

/// Glyph width (thousandths of an em) when the font declares none.
const DEFAULT_GLYPH_WIDTH: f32 = 500.0;

/// Ligatures expanded in extracted text.
const LIGATURES: &[(char, &str)] = &[
    ('\u{FB00}', "ff"),
    ('\u{FB01}', "fi"),
    ('\u{FB02}', "fl"),
    ('\u{FB03}', "ffi"),
    ('\u{FB04}', "ffl"),
    ('\u{FB05}', "st"),
    ('\u{FB06}', "st"),
];

/// 2D affine transform `[a b c d e f]` as used by PDF.
#[derive(Debug, Clone, Copy, PartialEq)]
struct Matrix([f32; 6]);

impl Matrix {
    const IDENTITY: Matrix = Matrix([1.0, 0.0, 0.0, 1.0, 0.0, 0.0]);

    fn translation(tx: f32, ty: f32) -> Self {
        Matrix([1.0, 0.0, 0.0, 1.0, tx, ty])
    }

    /// `self × other`: apply `self` first, then `other`.
    fn then(&self, other: &Matrix) -> Matrix {
        let [a, b, c, d, e, f] = self.0;
        let [a2, b2, c2, d2, e2, f2] = other.0;
        Matrix([
            a * a2 + b * c2,
            a * b2 + b * d2,
            c * a2 + d * c2,
            c * b2 + d * d2,
            e * a2 + f * c2 + e2,
            e * b2 + f * d2 + f2,
        ])
    }

    fn apply(&self, x: f32, y: f32) -> (f32, f32) {
        let [a, b, c, d, e, f] = self.0;
        (x * a + y * c + e, x * b + y * d + f)
    }

    fn vertical_scale(&self) -> f32 {
        let [_, b, _, d, _, _] = self.0;
        (b * b + d * d).sqrt()
    }
}

/// Per-font horizontal metrics from a simple font's `Widths` array.
#[derive(Debug, Clone, Default)]
struct FontMetrics {
    first_char: i64,
    widths: Vec<f32>,
    two_byte: bool,
}

impl FontMetrics {
    fn from_dict(doc: &LopdfDocument, font: &Dictionary) -> Self {
        let two_byte = font
            .get(b"Subtype")
            .and_then(Object::as_name)
            .map(|n| n == b"Type0")
            .unwrap_or(false);
        let first_char = font
            .get(b"FirstChar")
            .and_then(Object::as_i64)
            .unwrap_or(0);
        let widths = font
            .get(b"Widths")
            .ok()
            .and_then(|obj| match obj {
                Object::Reference(id) => doc.get_object(*id).ok(),
                other => Some(other),
            })
            .and_then(|obj| obj.as_array().ok())
            .map(|arr| arr.iter().filter_map(number).collect())
            .unwrap_or_default();

        Self {
            first_char,
            widths,
            two_byte,
        }
    }

    /// Total advance of a shown string, in thousandths of an em.
    fn string_width(&self, bytes: &[u8]) -> f32 {
        if self.two_byte {
            return (bytes.len() / 2).max(1) as f32 * DEFAULT_GLYPH_WIDTH;
        }
        bytes
            .iter()
            .map(|&code| {
                let idx = i64::from(code) - self.first_char;
                usize::try_from(idx)
                    .ok()
                    .and_then(|i| self.widths.get(i))
                    .copied()
                    .filter(|w| *w > 0.0)
                    .unwrap_or(DEFAULT_GLYPH_WIDTH)
            })
            .sum()
    }
}

/// Graphics and text state tracked while walking a content stream.
#[derive(Debug, Clone)]
struct TextState {
    ctm: Matrix,
    text_matrix: Matrix,
    line_matrix: Matrix,
    font: Vec<u8>,
    font_size: f32,
    leading: f32,
    char_spacing: f32,
    word_spacing: f32,
    horizontal_scale: f32,
}

impl Default for TextState {
    fn default() -> Self {
        Self {
            ctm: Matrix::IDENTITY,
            text_matrix: Matrix::IDENTITY,
            line_matrix: Matrix::IDENTITY,
            font: Vec::new(),
            font_size: 12.0,
            leading: 0.0,
            char_spacing: 0.0,
            word_spacing: 0.0,
            horizontal_scale: 1.0,
        }
    }
}

impl TextState {
    fn move_line(&mut self, tx: f32, ty: f32) {
        self.line_matrix = Matrix::translation(tx, ty).then(&self.line_matrix);
        self.text_matrix = self.line_matrix;
    }

    fn next_line(&mut self) {
        let leading = if self.leading != 0.0 {
            self.leading
        } else {
            self.font_size * 1.2
        };
        self.move_line(0.0, -leading);
    }

    /// Device-space position of a point `advance` text-space units along
    /// the current baseline.
    fn position(&self, advance: f32) -> (f32, f32) {
        let m = Matrix::translation(advance, 0.0)
            .then(&self.text_matrix)
            .then(&self.ctm);
        m.apply(0.0, 0.0)
    }

    fn effective_font_size(&self) -> f32 {
        self.font_size * self.text_matrix.then(&self.ctm).vertical_scale()
    }
}

/// A word under construction, in device space.
#[derive(Debug, Clone)]
struct PendingWord {
    text: String,
    x0: f32,
    x1: f32,
    baseline: f32,
    size: f32,
}

/// Interprets one page's content stream and collects words.
pub struct WordCollector<'a> {
    doc: &'a LopdfDocument,
    fonts: BTreeMap<Vec<u8>, &'a Dictionary>,
    metrics: BTreeMap<Vec<u8>, FontMetrics>,
    page_box: PageBox,
    words: Vec<PendingWord>,
}

impl<'a> WordCollector<'a> {
    /// Create a collector for a page using its resolved font dictionaries.
    pub fn new(
        doc: &'a LopdfDocument,
        fonts: BTreeMap<Vec<u8>, &'a Dictionary>,
        page_box: PageBox,
    ) -> Self {
        let metrics = fonts
            .iter()
            .map(|(name, dict)| (name.clone(), FontMetrics::from_dict(doc, dict)))
            .collect();
        Self {
            doc,
            fonts,
            metrics,
            page_box,
            words: Vec::new(),
        }
    }

    /// Walk decompressed content stream bytes and return the page's words.
    pub fn collect(mut self, content: &[u8]) -> Result<Vec<Word>> {
        let content = Content::decode(content).map_err(|e| Error::PdfParse(e.to_string()))?;

        let mut state = TextState::default();
        let mut saved: Vec<Matrix> = Vec::new();
        let mut in_text_block = false;

        for op in &content.operations {
            let operands = &op.operands;
            match op.operator.as_str() {
                "q" => saved.push(state.ctm),
                "Q" => {
                    if let Some(ctm) = saved.pop() {
                        state.ctm = ctm;
                    }
                }
                "cm" => {
                    if let Some(m) = matrix_operand(operands) {
                        state.ctm = m.then(&state.ctm);
                    }
                }
                "BT" => {
                    in_text_block = true;
                    state.text_matrix = Matrix::IDENTITY;
                    state.line_matrix = Matrix::IDENTITY;
                }
                "ET" => in_text_block = false,
                "Tf" => {
                    if let Some(Object::Name(name)) = operands.first() {
                        state.font = name.clone();
                    }
                    state.font_size = operands.get(1).and_then(number).unwrap_or(12.0);
                }
                "TL" => state.leading = operands.first().and_then(number).unwrap_or(0.0),
                "Tc" => state.char_spacing = operands.first().and_then(number).unwrap_or(0.0),
                "Tw" => state.word_spacing = operands.first().and_then(number).unwrap_or(0.0),
                "Tz" => {
                    state.horizontal_scale =
                        operands.first().and_then(number).unwrap_or(100.0) / 100.0
                }
                "Td" | "TD" => {
                    let tx = operands.first().and_then(number).unwrap_or(0.0);
                    let ty = operands.get(1).and_then(number).unwrap_or(0.0);
                    if op.operator == "TD" {
                        state.leading = -ty;
                    }
                    state.move_line(tx, ty);
                }
                "Tm" => {
                    if let Some(m) = matrix_operand(operands) {
                        state.text_matrix = m;
                        state.line_matrix = m;
                    }
                }
                "T*" => state.next_line(),
                "Tj" if in_text_block => {
                    if let Some(s @ Object::String(..)) = operands.first() {
                        self.show(&mut state, std::slice::from_ref(s));
                    }
                }
                "TJ" if in_text_block => {
                    if let Some(Object::Array(items)) = operands.first() {
                        self.show(&mut state, items);
                    }
                }
                "'" if in_text_block => {
                    state.next_line();
                    if let Some(s @ Object::String(..)) = operands.first() {
                        self.show(&mut state, std::slice::from_ref(s));
                    }
                }
                "\"" if in_text_block => {
                    state.word_spacing = operands.first().and_then(number).unwrap_or(0.0);
                    state.char_spacing = operands.get(1).and_then(number).unwrap_or(0.0);
                    state.next_line();
                    if let Some(s @ Object::String(..)) = operands.get(2) {
                        self.show(&mut state, std::slice::from_ref(s));
                    }
                }
                _ => {}
            }
        }

        let page_box = self.page_box;
        Ok(self
            .words
            .into_iter()
            .filter_map(|w| {
                let text = normalize_text(&w.text);
                if text.trim().is_empty() {
                    return None;
                }
                let top = page_box.top - (w.baseline + w.size * ASCENT_RATIO);
                Some(Word::new(text, w.x0 - page_box.left, top))
            })
            .collect())
    }

    /// Show a TJ-style array of strings and kerning adjustments, splitting
    /// the glyph run into words and advancing the text matrix.
    fn show(&mut self, state: &mut TextState, items: &[Object]) {
        let metrics = self.metrics.get(&state.font).cloned().unwrap_or_default();
        let size = state.effective_font_size();
        let (_, baseline) = state.position(0.0);
        let mut advance = 0.0;
        let mut current: Option<PendingWord> = None;

        for item in items {
            match item {
                Object::String(bytes, _) => {
                    let text = self.decode(&state.font, bytes);
                    let char_count = text.chars().count();
                    if char_count == 0 {
                        continue;
                    }
                    let glyph_advance = metrics.string_width(bytes) / 1000.0
                        * state.font_size
                        / char_count as f32;

                    for ch in text.chars() {
                        let mut step = glyph_advance + state.char_spacing;
                        if ch.is_whitespace() {
                            step += state.word_spacing;
                            self.finish(current.take());
                        } else {
                            let (x, _) = state.position(advance);
                            let word = current.get_or_insert_with(|| PendingWord {
                                text: String::new(),
                                x0: x,
                                x1: x,
                                baseline,
                                size,
                            });
                            word.text.push(ch);
                        }
                        advance += step * state.horizontal_scale;
                        if let Some(word) = current.as_mut() {
                            word.x1 = state.position(advance).0;
                        }
                    }
                }
                other => {
                    if let Some(n) = number(other) {
                        if -n > TJ_SPACE_THRESHOLD {
                            self.finish(current.take());
                        }
                        advance -= n / 1000.0 * state.font_size * state.horizontal_scale;
                    }
                }
            }
        }

        self.finish(current);
        state.text_matrix = Matrix::translation(advance, 0.0).then(&state.text_matrix);
    }

    /// Commit a finished word, gluing it onto the previous word when the two
    /// touch on the same baseline (text split across show operators).
    fn finish(&mut self, word: Option<PendingWord>) {
        let Some(word) = word else {
            return;
        };
        if let Some(last) = self.words.last_mut() {
            let same_baseline = (last.baseline - word.baseline).abs() < 0.01;
            let touching = (word.x0 - last.x1).abs() < word.size * 0.15;
            if same_baseline && touching && word.x0 >= last.x0 {
                last.text.push_str(&word.text);
                last.x1 = word.x1;
                return;
            }
        }
        self.words.push(word);
    }

    fn decode(&self, font: &[u8], bytes: &[u8]) -> String {
        if let Some(dict) = self.fonts.get(font) {
            if let Ok(encoding) = dict.get_font_encoding(self.doc) {
                if let Ok(text) = LopdfDocument::decode_text(&encoding, bytes) {
                    return text;
                }
            }
            let identity = dict
                .get(b"Encoding")
                .and_then(Object::as_name)
                .map(|n| n.starts_with(b"Identity"))
                .unwrap_or(false);
            if identity && bytes.len() >= 2 && bytes.len() % 2 == 0 {
                let units: Vec<u16> = bytes
                    .chunks_exact(2)
                    .map(|c| u16::from_be_bytes([c[0], c[1]]))
                    .collect();
                return String::from_utf16_lossy(&units);
            }
        }
        decode_text_simple(bytes)
    }
}

/// Simple text decoding fallback when no font encoding is usable.
pub fn decode_text_simple(bytes: &[u8]) -> String {
    if let Some(rest) = bytes.strip_prefix(&[0xFE, 0xFF]) {
        let units: Vec<u16> = rest
            .chunks_exact(2)
            .map(|c| u16::from_be_bytes([c[0], c[1]]))
            .collect();
        return String::from_utf16_lossy(&units);
    }

    match std::str::from_utf8(bytes) {
        Ok(s) => s.to_string(),
        // Latin-1
        Err(_) => bytes.iter().map(|&b| b as char).collect(),
    }
}

/// NFC-normalize text and expand typographic ligatures.
pub fn normalize_text(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.nfc() {
        match LIGATURES.iter().find(|(lig, _)| *lig == ch) {
            Some((_, expanded)) => out.push_str(expanded),
            None => out.push(ch),
        }
    }
    out
}

fn number(obj: &Object) -> Option<f32> {
    match obj {
        Object::Integer(i) => Some(*i as f32),
        Object::Real(r) => Some(*r),
        _ => None,
    }
}

fn matrix_operand(operands: &[Object]) -> Option<Matrix> {
    if operands.len() < 6 {
        return None;
    }
    let mut m = [0.0; 6];
    for (slot, obj) in m.iter_mut().zip(operands) {
        *slot = number(obj)?;
    }
    Some(Matrix(m))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn collect(content: &str) -> Vec<Word> {
        let doc = LopdfDocument::with_version("1.5");
        WordCollector::new(&doc, BTreeMap::new(), PageBox::default())
            .collect(content.as_bytes())
            .unwrap()
    }

    #[test]
    fn test_decode_text_simple() {
        assert_eq!(decode_text_simple(b"Hello"), "Hello");
        assert_eq!(decode_text_simple(&[0x48, 0x65, 0x6C, 0x6C, 0xE9]), "Hellé");
        assert_eq!(decode_text_simple(&[0xFE, 0xFF, 0x00, 0x48, 0x00, 0x69]), "Hi");
    }

    #[test]
    fn test_normalize_text_expands_ligatures() {
        assert_eq!(normalize_text("\u{FB01}nal \u{FB02}ow"), "final flow");
        assert_eq!(normalize_text("e\u{0301}"), "é");
    }

    #[test]
    fn test_matrix_composition() {
        let m = Matrix::translation(10.0, 20.0).then(&Matrix([2.0, 0.0, 0.0, 2.0, 0.0, 0.0]));
        assert_eq!(m.apply(0.0, 0.0), (20.0, 40.0));
        assert_eq!(m.vertical_scale(), 2.0);
    }

    #[test]
    fn test_words_split_on_spaces() {
        let words = collect("BT /F1 10 Tf 72 700 Td (Hello big world) Tj ET");
        let texts: Vec<_> = words.iter().map(|w| w.text.as_str()).collect();
        assert_eq!(texts, vec!["Hello", "big", "world"]);
        assert_eq!(words[0].x0, 72.0);
        assert!(words[1].x0 > words[0].x0);
        assert!(words[2].x0 > words[1].x0);
        // top = 792 - (700 + 10 * 0.8)
        assert!((words[0].top - 84.0).abs() < 0.001);
        assert!(words.iter().all(|w| w.top == words[0].top));
    }

    #[test]
    fn test_tj_kerning_breaks_words() {
        let words = collect("BT /F1 10 Tf 50 600 Td [(Hel) -20 (lo) -400 (there)] TJ ET");
        let texts: Vec<_> = words.iter().map(|w| w.text.as_str()).collect();
        assert_eq!(texts, vec!["Hello", "there"]);
    }

    #[test]
    fn test_next_line_moves_down() {
        let words = collect("BT /F1 10 Tf 14 TL 50 600 Td (one) Tj T* (two) Tj ET");
        assert_eq!(words.len(), 2);
        assert_eq!(words[0].x0, 50.0);
        assert_eq!(words[1].x0, 50.0);
        assert!((words[1].top - words[0].top - 14.0).abs() < 0.001);
    }

    #[test]
    fn test_text_outside_bt_ignored() {
        assert!(collect("(stray) Tj").is_empty());
    }

    #[test]
    fn test_split_show_operators_glued() {
        let words = collect("BT /F1 10 Tf 50 600 Td (Wo) Tj (rd) Tj ET");
        assert_eq!(words.len(), 1);
        assert_eq!(words[0].text, "Word");
    }
}
