//! Rendering: chapter aggregation, XHTML content documents, and JSON dumps.

mod chapters;
mod html;
mod json;
mod options;

pub use chapters::build_chapters;
pub use html::{chapter_document, escape_text, render_paragraphs, text_to_html, CHAPTER_STYLE};
pub use json::{pages_to_json, JsonFormat};
pub use options::BookOptions;
