//! # pdf2epub
//!
//! Convert text-based PDF documents into reflowable EPUB e-books.
//!
//! Words are pulled from each page with their positions, grouped into
//! lines, and merged into paragraphs using first-line indentation as the
//! paragraph-start signal. Pages are batched into chapters, rendered as
//! escaped XHTML, and packaged into an EPUB 3 container.
//!
//! ## Quick Start
//!
//! ```no_run
//! use pdf2epub::Pdf2Epub;
//!
//! fn main() -> pdf2epub::Result<()> {
//!     let report = Pdf2Epub::new()
//!         .with_title("My Book")
//!         .with_chapter_pages(5)
//!         .convert("document.pdf")?;
//!     println!("Successfully created: {}", report.output.display());
//!     Ok(())
//! }
//! ```
//!
//! ## Features
//!
//! - **Indent-based paragraphs**: tunable indent threshold and body margin
//! - **Plain-text fallback**: whole-page text extraction when layout fails
//! - **Parallel processing**: Rayon-backed paragraph reconstruction
//!   (`parallel` feature)
//! - **Atomic output**: the EPUB is written to a temporary file and renamed

pub mod convert;
pub mod detect;
pub mod epub;
pub mod error;
pub mod layout;
pub mod model;
pub mod parser;
pub mod render;

// Re-export commonly used types
pub use convert::{
    assemble_book, default_output_path, default_title, ConvertOptions, ConvertReport, Converter,
};
pub use detect::{has_pdf_extension, sniff_bytes, sniff_path, PdfHeader};
pub use epub::{write_epub, EpubWriter};
pub use error::{Error, Result};
pub use layout::{
    group_words_into_lines, paragraphs_from_words, segment_paragraphs, Line, SegmentConfig,
};
pub use model::{BookMetadata, Chapter, DocumentInfo, Page, Word};
pub use parser::{ErrorMode, ExtractMode, ExtractOptions, PageSelection, PdfParser};
pub use render::{build_chapters, chapter_document, text_to_html, BookOptions, JsonFormat};

use std::path::{Path, PathBuf};

/// Extract the paragraph records of every page of a PDF file.
///
/// # Example
///
/// ```no_run
/// use pdf2epub::extract_pages;
///
/// let pages = extract_pages("document.pdf").unwrap();
/// for page in &pages {
///     println!("page {}: {} paragraphs", page.number, page.paragraphs.len());
/// }
/// ```
pub fn extract_pages<P: AsRef<Path>>(path: P) -> Result<Vec<Page>> {
    extract_pages_with_options(path, ExtractOptions::default())
}

/// Extract page records with custom options.
pub fn extract_pages_with_options<P: AsRef<Path>>(
    path: P,
    options: ExtractOptions,
) -> Result<Vec<Page>> {
    PdfParser::open_with_options(path, options)?.extract_pages()
}

/// Extract page records from PDF bytes.
pub fn extract_pages_from_bytes(data: &[u8]) -> Result<Vec<Page>> {
    PdfParser::from_bytes(data)?.extract_pages()
}

/// Convert a PDF file to EPUB with default settings.
///
/// The output lands next to the input with an `.epub` extension.
pub fn convert<P: AsRef<Path>>(path: P) -> Result<ConvertReport> {
    Converter::default().convert(path)
}

/// Convert a PDF file to EPUB with custom options.
pub fn convert_with_options<P: AsRef<Path>>(
    path: P,
    options: ConvertOptions,
) -> Result<ConvertReport> {
    Converter::new(options).convert(path)
}

/// Builder-style API for conversions.
///
/// # Example
///
/// ```no_run
/// use pdf2epub::Pdf2Epub;
///
/// let report = Pdf2Epub::new()
///     .lenient()
///     .with_author("Jane Doe")
///     .with_indent_threshold(30.0)
///     .output("out/book.epub")
///     .convert("document.pdf")?;
/// # Ok::<(), pdf2epub::Error>(())
/// ```
#[derive(Debug, Clone, Default)]
pub struct Pdf2Epub {
    options: ConvertOptions,
}

impl Pdf2Epub {
    /// Create a new builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Fall back to plain text, then to empty pages, on per-page failures.
    pub fn lenient(mut self) -> Self {
        self.options.extract = self.options.extract.lenient();
        self
    }

    /// Use plain full-text extraction instead of layout reconstruction.
    pub fn plain_text(mut self) -> Self {
        self.options.extract = self.options.extract.plain_text();
        self
    }

    /// Disable parallel processing.
    pub fn sequential(mut self) -> Self {
        self.options.extract = self.options.extract.sequential();
        self
    }

    /// Set page selection.
    pub fn with_pages(mut self, pages: PageSelection) -> Self {
        self.options.extract = self.options.extract.with_pages(pages);
        self
    }

    /// Set the indent threshold for paragraph starts.
    pub fn with_indent_threshold(mut self, threshold: f32) -> Self {
        self.options.extract = self.options.extract.with_indent_threshold(threshold);
        self
    }

    /// Set the maximum `x0` of body text.
    pub fn with_max_body_x0(mut self, max_x0: f32) -> Self {
        self.options.extract = self.options.extract.with_max_body_x0(max_x0);
        self
    }

    /// Set the book title.
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.options.book = self.options.book.with_title(title);
        self
    }

    /// Set the author.
    pub fn with_author(mut self, author: impl Into<String>) -> Self {
        self.options.book = self.options.book.with_author(author);
        self
    }

    /// Set the language code.
    pub fn with_language(mut self, language: impl Into<String>) -> Self {
        self.options.book = self.options.book.with_language(language);
        self
    }

    /// Set the number of pages per chapter.
    pub fn with_chapter_pages(mut self, pages: usize) -> Self {
        self.options.book = self.options.book.with_chapter_pages(pages);
        self
    }

    /// Set the output path.
    pub fn output(mut self, path: impl Into<PathBuf>) -> Self {
        self.options.output = Some(path.into());
        self
    }

    /// Get the accumulated options.
    pub fn options(&self) -> &ConvertOptions {
        &self.options
    }

    /// Run the conversion.
    pub fn convert<P: AsRef<Path>>(self, path: P) -> Result<ConvertReport> {
        Converter::new(self.options).convert(path)
    }
}
