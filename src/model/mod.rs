//! Data model shared by the extraction, aggregation, and rendering stages.
//!
//! Data flows word list → lines → paragraphs → [`Page`] → [`Chapter`] →
//! rendered content document.

mod chapter;
mod metadata;
mod page;
mod word;

pub use chapter::{page_marker, Chapter};
pub use metadata::{
    identifier_for, BookMetadata, DocumentInfo, DEFAULT_AUTHOR, DEFAULT_LANGUAGE,
};
pub use page::{Page, PARAGRAPH_SEPARATOR};
pub use word::Word;
