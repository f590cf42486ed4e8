//! XHTML rendering for chapters.

use std::borrow::Cow;
use std::sync::OnceLock;

use regex::Regex;

use crate::model::{Chapter, PARAGRAPH_SEPARATOR};

/// Stylesheet embedded in every chapter document.
pub const CHAPTER_STYLE: &str = "\
        body { font-family: serif; line-height: 1.6; margin: 1em; }
        p { margin-bottom: 1em; text-indent: 1.5em; }
        .page-break { page-break-before: always; }";

fn marker_regex() -> &'static Regex {
    static MARKER: OnceLock<Regex> = OnceLock::new();
    MARKER.get_or_init(|| {
        Regex::new(r"^<!-- Page \d+ -->[ \t]*(?:\n|$)").expect("page marker pattern is valid")
    })
}

/// Escape text for embedding in XHTML content or attribute values.
///
/// Covers `&`, `<`, `>`, `"` and `'`.
pub fn escape_text(text: &str) -> Cow<'_, str> {
    html_escape::encode_quoted_attribute(text)
}

fn paragraph_tag(text: &str) -> String {
    format!("<p>{}</p>", escape_text(text))
}

/// Convert a chapter text blob into `<p>` fragments, in source order.
///
/// The blob is split on blank lines. Candidates that are empty or consist
/// only of a page marker are dropped; a leading marker line is removed from
/// candidates that carry content after it. Nothing is reordered or
/// deduplicated.
pub fn text_to_html(blob: &str) -> Vec<String> {
    let marker = marker_regex();

    blob.split(PARAGRAPH_SEPARATOR)
        .filter_map(|candidate| {
            let candidate = candidate.trim();
            let body = match marker.find(candidate) {
                Some(m) => candidate[m.end()..].trim(),
                None => candidate,
            };
            (!body.is_empty()).then(|| paragraph_tag(body))
        })
        .collect()
}

/// Render a chapter's paragraphs directly from its page structure.
///
/// Produces the same fragments as running [`text_to_html`] over
/// [`Chapter::text`], without building or re-parsing the marker blob.
pub fn render_paragraphs(chapter: &Chapter) -> Vec<String> {
    chapter
        .paragraphs()
        .map(|(_, text)| text.trim())
        .filter(|text| !text.is_empty())
        .map(paragraph_tag)
        .collect()
}

/// Render a complete XHTML content document for a chapter.
pub fn chapter_document(chapter: &Chapter, language: &str) -> String {
    let title = chapter.title();
    let body = render_paragraphs(chapter).join("\n    ");

    format!(
        r#"<?xml version="1.0" encoding="UTF-8"?>
<!DOCTYPE html>
<html xmlns="http://www.w3.org/1999/xhtml" xmlns:epub="http://www.idpf.org/2007/ops" lang="{lang}" xml:lang="{lang}">
<head>
    <title>{title}</title>
    <style>
{style}
    </style>
</head>
<body>
    <h2>{title}</h2>
    {body}
</body>
</html>
"#,
        lang = escape_text(language),
        title = escape_text(&title),
        style = CHAPTER_STYLE,
        body = body,
    )
}
