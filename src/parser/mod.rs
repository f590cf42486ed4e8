//! PDF reading: page enumeration, word extraction, and paragraph records.

mod content;
mod options;
mod pdf_parser;

pub use content::{decode_text_simple, normalize_text, PageBox, WordCollector};
pub use options::{ErrorMode, ExtractMode, ExtractOptions, PageSelection};
pub use pdf_parser::{paragraphs_from_plain_text, PdfParser};
