//! End-to-end PDF to EPUB conversion.
//!
//! # Example
//!
//! ```no_run
//! use pdf2epub::convert::{ConvertOptions, Converter};
//! use pdf2epub::BookOptions;
//!
//! fn main() -> pdf2epub::Result<()> {
//!     let options = ConvertOptions::new()
//!         .with_book(BookOptions::new().with_author("Jane Doe").with_chapter_pages(5));
//!     let report = Converter::new(options).convert("novel.pdf")?;
//!     println!("wrote {} chapters to {}", report.chapter_count, report.output.display());
//!     Ok(())
//! }
//! ```

use std::path::{Path, PathBuf};

use crate::epub::EpubWriter;
use crate::error::{Error, Result};
use crate::model::{BookMetadata, Chapter, Page};
use crate::parser::{ExtractOptions, PdfParser};
use crate::render::{build_chapters, BookOptions};

/// Title used when the input path has no usable file stem.
const FALLBACK_TITLE: &str = "Untitled";

/// Options for a full conversion.
#[derive(Debug, Clone, Default)]
pub struct ConvertOptions {
    /// Extraction options (thresholds, modes, page selection)
    pub extract: ExtractOptions,

    /// Book assembly options (metadata, chapter size)
    pub book: BookOptions,

    /// Output path; defaults to the input path with an `.epub` extension
    pub output: Option<PathBuf>,
}

impl ConvertOptions {
    /// Create new conversion options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set extraction options.
    pub fn with_extract(mut self, extract: ExtractOptions) -> Self {
        self.extract = extract;
        self
    }

    /// Set book options.
    pub fn with_book(mut self, book: BookOptions) -> Self {
        self.book = book;
        self
    }

    /// Set the output path.
    pub fn with_output(mut self, output: impl Into<PathBuf>) -> Self {
        self.output = Some(output.into());
        self
    }

    /// Validate all nested options.
    pub fn validate(&self) -> Result<()> {
        self.extract.validate()?;
        self.book.validate()
    }
}

/// Summary of a finished conversion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConvertReport {
    /// Where the EPUB was written
    pub output: PathBuf,
    /// Book metadata written to the package document
    pub metadata: BookMetadata,
    /// Number of pages extracted
    pub page_count: usize,
    /// Number of chapters written
    pub chapter_count: usize,
}

/// Runs the extraction, aggregation, and assembly stages for one input.
#[derive(Debug, Clone, Default)]
pub struct Converter {
    options: ConvertOptions,
}

impl Converter {
    /// Create a converter.
    pub fn new(options: ConvertOptions) -> Self {
        Self { options }
    }

    /// Get the conversion options.
    pub fn options(&self) -> &ConvertOptions {
        &self.options
    }

    /// Convert a PDF file into an EPUB.
    pub fn convert<P: AsRef<Path>>(&self, input: P) -> Result<ConvertReport> {
        self.convert_with_progress(input, |_, _| {})
    }

    /// Convert a PDF file, reporting `(done, total)` pages as they are read.
    pub fn convert_with_progress<P, F>(&self, input: P, progress: F) -> Result<ConvertReport>
    where
        P: AsRef<Path>,
        F: Fn(usize, usize),
    {
        let input = input.as_ref();
        let pages = self.extract_with_progress(input, progress)?;
        self.write_book(input, &pages)
    }

    /// Validate the options and open the input with the extract options.
    ///
    /// The returned parser can be inspected (page count, info dictionary)
    /// before extraction without loading the document again.
    pub fn open<P: AsRef<Path>>(&self, input: P) -> Result<PdfParser> {
        self.options.validate()?;
        PdfParser::open_with_options(input, self.options.extract.clone())
    }

    /// Run only the extraction stage.
    pub fn extract_with_progress<P, F>(&self, input: P, progress: F) -> Result<Vec<Page>>
    where
        P: AsRef<Path>,
        F: Fn(usize, usize),
    {
        self.open(input)?.extract_pages_with_progress(progress)
    }

    /// Aggregate already-extracted pages and write the EPUB.
    ///
    /// `input` only supplies the default title and output path.
    pub fn write_book<P: AsRef<Path>>(&self, input: P, pages: &[Page]) -> Result<ConvertReport> {
        let input = input.as_ref();
        self.options.book.validate()?;

        let title = self
            .options
            .book
            .title
            .clone()
            .unwrap_or_else(|| default_title(input));
        let (metadata, chapters) = assemble_book(pages, &self.options.book, title)?;

        let output = self
            .options
            .output
            .clone()
            .unwrap_or_else(|| default_output_path(input));
        log::info!(
            "writing {} chapters ({} pages) to {}",
            chapters.len(),
            pages.len(),
            output.display()
        );
        EpubWriter::new(&metadata).write_file(&chapters, &output)?;

        Ok(ConvertReport {
            output,
            metadata,
            page_count: pages.len(),
            chapter_count: chapters.len(),
        })
    }
}

/// Group extracted pages into chapters and build the book metadata.
///
/// Fails with [`Error::NoPages`] when `pages` is empty.
pub fn assemble_book(
    pages: &[Page],
    book: &BookOptions,
    title: impl Into<String>,
) -> Result<(BookMetadata, Vec<Chapter>)> {
    if pages.is_empty() {
        return Err(Error::NoPages);
    }

    let chapters = build_chapters(pages, book.chapter_pages)?;
    if chapters.is_empty() {
        log::warn!("no text found on any of {} pages", pages.len());
    }

    let metadata = BookMetadata::new(title, book.author.clone(), book.language.clone());
    Ok((metadata, chapters))
}

/// The input path with its extension replaced by `.epub`.
pub fn default_output_path<P: AsRef<Path>>(input: P) -> PathBuf {
    input.as_ref().with_extension("epub")
}

/// The input file's base name without extension.
pub fn default_title<P: AsRef<Path>>(input: P) -> String {
    input
        .as_ref()
        .file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .filter(|stem| !stem.is_empty())
        .unwrap_or_else(|| FALLBACK_TITLE.to_string())
}
