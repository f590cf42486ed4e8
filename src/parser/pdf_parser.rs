//! PDF page reader using lopdf.

use std::io::Read;
use std::path::Path;

use lopdf::{Document as LopdfDocument, Object, ObjectId};

use crate::detect::sniff_path;
use crate::error::{Error, Result};
use crate::layout::{paragraphs_from_words, SegmentConfig};
use crate::model::{DocumentInfo, Page, Word};

use super::content::{decode_text_simple, normalize_text, PageBox, WordCollector};
use super::options::{ErrorMode, ExtractMode, ExtractOptions};

/// Raw text pulled from one page, before paragraph reconstruction.
#[derive(Debug, Clone)]
enum PageSource {
    Words(Vec<Word>),
    Plain(String),
    Empty,
}

/// PDF document reader producing per-page paragraph records.
pub struct PdfParser {
    doc: LopdfDocument,
    options: ExtractOptions,
}

impl PdfParser {
    /// Open a PDF file.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        Self::open_with_options(path, ExtractOptions::default())
    }

    /// Open a PDF file with custom options.
    pub fn open_with_options<P: AsRef<Path>>(path: P, options: ExtractOptions) -> Result<Self> {
        let path = path.as_ref();
        let header = sniff_path(path)?;
        log::info!("reading {} ({})", path.display(), header);

        let doc = LopdfDocument::load(path)?;
        Self::from_document(doc, options)
    }

    /// Read a PDF from bytes.
    pub fn from_bytes(data: &[u8]) -> Result<Self> {
        Self::from_bytes_with_options(data, ExtractOptions::default())
    }

    /// Read a PDF from bytes with custom options.
    pub fn from_bytes_with_options(data: &[u8], options: ExtractOptions) -> Result<Self> {
        crate::detect::sniff_bytes(data)?;
        let doc = LopdfDocument::load_mem(data)?;
        Self::from_document(doc, options)
    }

    /// Read a PDF from a reader.
    pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
        Self::from_reader_with_options(reader, ExtractOptions::default())
    }

    /// Read a PDF from a reader with custom options.
    pub fn from_reader_with_options<R: Read>(mut reader: R, options: ExtractOptions) -> Result<Self> {
        let mut data = Vec::new();
        reader.read_to_end(&mut data)?;
        Self::from_bytes_with_options(&data, options)
    }

    fn from_document(doc: LopdfDocument, options: ExtractOptions) -> Result<Self> {
        options.validate()?;
        if doc.is_encrypted() {
            return Err(Error::Encrypted);
        }
        Ok(Self { doc, options })
    }

    /// Options this parser was opened with.
    pub fn options(&self) -> &ExtractOptions {
        &self.options
    }

    /// Get the number of pages.
    pub fn page_count(&self) -> u32 {
        self.doc.get_pages().len() as u32
    }

    /// Get PDF version.
    pub fn version(&self) -> String {
        self.doc.version.to_string()
    }

    /// Read the document info dictionary.
    pub fn info(&self) -> DocumentInfo {
        let mut info = DocumentInfo {
            pdf_version: self.version(),
            page_count: self.page_count(),
            ..Default::default()
        };

        let dict = match self.doc.trailer.get(b"Info") {
            Ok(Object::Reference(id)) => self.doc.get_dictionary(*id).ok(),
            Ok(Object::Dictionary(d)) => Some(d),
            _ => None,
        };

        if let Some(dict) = dict {
            info.title = get_string_from_dict(dict, b"Title");
            info.author = get_string_from_dict(dict, b"Author");
            info.producer = get_string_from_dict(dict, b"Producer");
            info.created =
                get_string_from_dict(dict, b"CreationDate").and_then(|s| parse_pdf_date(&s));
        }

        info
    }

    /// Extract every selected page, in document order.
    pub fn extract_pages(&self) -> Result<Vec<Page>> {
        self.extract_pages_with_progress(|_, _| {})
    }

    /// Extract every selected page, reporting `(done, total)` after each
    /// page is read.
    ///
    /// Reading the PDF is sequential; paragraph reconstruction runs in
    /// parallel when enabled, and results keep page-number order.
    pub fn extract_pages_with_progress<F>(&self, progress: F) -> Result<Vec<Page>>
    where
        F: Fn(usize, usize),
    {
        let selected: Vec<(u32, ObjectId)> = self
            .doc
            .get_pages()
            .into_iter()
            .filter(|(num, _)| self.options.pages.includes(*num))
            .collect();
        let total = selected.len();
        log::info!("extracting {} of {} pages", total, self.page_count());

        let mut sources = Vec::with_capacity(total);
        for (done, (page_num, page_id)) in selected.into_iter().enumerate() {
            sources.push((page_num, self.read_page(page_num, page_id)?));
            progress(done + 1, total);
        }

        Ok(self.build_pages(sources))
    }

    /// Extract the positioned words of a single page.
    pub fn page_words(&self, page_num: u32) -> Result<Vec<Word>> {
        let page_id = self.page_id(page_num)?;
        self.collect_words(page_id)
    }

    /// Extract a single page as a paragraph record.
    pub fn extract_page(&self, page_num: u32) -> Result<Page> {
        let page_id = self.page_id(page_num)?;
        let source = self.read_page(page_num, page_id)?;
        Ok(build_page(page_num, source, &self.options.segment))
    }

    fn page_id(&self, page_num: u32) -> Result<ObjectId> {
        let pages = self.doc.get_pages();
        pages
            .get(&page_num)
            .copied()
            .ok_or(Error::PageOutOfRange(page_num, pages.len() as u32))
    }

    /// Read one page's text according to the extract and error modes.
    fn read_page(&self, page_num: u32, page_id: ObjectId) -> Result<PageSource> {
        let primary = match self.options.extract_mode {
            ExtractMode::Layout => self.collect_words(page_id).map(PageSource::Words),
            ExtractMode::PlainText => self.plain_text(page_num).map(PageSource::Plain),
        };

        let err = match primary {
            Ok(source) => return Ok(source),
            Err(e) if self.options.error_mode == ErrorMode::Strict => return Err(e),
            Err(e) => e,
        };

        if self.options.extract_mode == ExtractMode::Layout {
            log::warn!(
                "Layout extraction failed on page {}: {}; falling back to plain text",
                page_num,
                err
            );
            match self.plain_text(page_num) {
                Ok(text) => return Ok(PageSource::Plain(text)),
                Err(e) => log::warn!("Plain text fallback failed on page {}: {}", page_num, e),
            }
        } else {
            log::warn!("Failed to extract text from page {}: {}", page_num, err);
        }

        Ok(PageSource::Empty)
    }

    #[cfg(feature = "parallel")]
    fn build_pages(&self, sources: Vec<(u32, PageSource)>) -> Vec<Page> {
        use rayon::prelude::*;

        let segment = self.options.segment;
        if self.options.parallel {
            return sources
                .into_par_iter()
                .map(|(num, source)| build_page(num, source, &segment))
                .collect();
        }
        sources
            .into_iter()
            .map(|(num, source)| build_page(num, source, &segment))
            .collect()
    }

    #[cfg(not(feature = "parallel"))]
    fn build_pages(&self, sources: Vec<(u32, PageSource)>) -> Vec<Page> {
        let segment = self.options.segment;
        sources
            .into_iter()
            .map(|(num, source)| build_page(num, source, &segment))
            .collect()
    }

    fn collect_words(&self, page_id: ObjectId) -> Result<Vec<Word>> {
        let fonts = self
            .doc
            .get_page_fonts(page_id)
            .map_err(|e| Error::PdfParse(e.to_string()))?;
        let content = self.page_content(page_id)?;
        let page_box = self.page_box(page_id);
        WordCollector::new(&self.doc, fonts, page_box).collect(&content)
    }

    fn plain_text(&self, page_num: u32) -> Result<String> {
        self.doc
            .extract_text(&[page_num])
            .map_err(|e| Error::TextExtract(format!("Page {}: {}", page_num, e)))
    }

    /// Concatenated, decompressed content streams of a page.
    fn page_content(&self, page_id: ObjectId) -> Result<Vec<u8>> {
        let page_dict = self
            .doc
            .get_dictionary(page_id)
            .map_err(|e| Error::PdfParse(e.to_string()))?;

        let contents = match page_dict.get(b"Contents") {
            Ok(contents) => contents,
            // A page without content streams is blank, not broken.
            Err(_) => return Ok(Vec::new()),
        };

        let refs: Vec<ObjectId> = match contents {
            Object::Reference(r) => vec![*r],
            Object::Array(arr) => arr.iter().filter_map(|o| o.as_reference().ok()).collect(),
            _ => return Err(Error::Corrupted("Invalid content stream".to_string())),
        };

        let mut content = Vec::new();
        for r in refs {
            match self.doc.get_object(r) {
                Ok(Object::Stream(s)) => {
                    let data = s
                        .decompressed_content()
                        .unwrap_or_else(|_| s.content.clone());
                    content.extend_from_slice(&data);
                    content.push(b'\n');
                }
                _ => return Err(Error::Corrupted("Invalid content stream".to_string())),
            }
        }
        Ok(content)
    }

    /// The page's MediaBox, inherited through the page tree, defaulting to
    /// US Letter.
    fn page_box(&self, page_id: ObjectId) -> PageBox {
        self.doc
            .get_dictionary(page_id)
            .ok()
            .and_then(|dict| self.find_media_box(dict, 0))
            .map(PageBox::from_media_box)
            .unwrap_or_default()
    }

    fn find_media_box(&self, dict: &lopdf::Dictionary, depth: usize) -> Option<[f32; 4]> {
        // Guard against cyclic Parent links.
        if depth > 32 {
            return None;
        }

        if let Ok(obj) = dict.get(b"MediaBox") {
            let arr = match obj {
                Object::Reference(id) => self.doc.get_object(*id).ok()?.as_array().ok()?,
                other => other.as_array().ok()?,
            };
            let nums: Vec<f32> = arr
                .iter()
                .filter_map(|o| match o {
                    Object::Integer(i) => Some(*i as f32),
                    Object::Real(r) => Some(*r),
                    _ => None,
                })
                .collect();
            if let [llx, lly, urx, ury] = nums[..] {
                return Some([llx, lly, urx, ury]);
            }
        }

        let parent = dict.get(b"Parent").ok()?.as_reference().ok()?;
        let parent = self.doc.get_dictionary(parent).ok()?;
        self.find_media_box(parent, depth + 1)
    }
}

/// Reconstruct a page record from its raw text.
fn build_page(page_num: u32, source: PageSource, segment: &SegmentConfig) -> Page {
    let paragraphs = match source {
        PageSource::Words(words) => paragraphs_from_words(&words, segment),
        PageSource::Plain(text) => paragraphs_from_plain_text(&text),
        PageSource::Empty => Vec::new(),
    };
    log::debug!("page {}: {} paragraphs", page_num, paragraphs.len());
    Page::new(page_num, paragraphs)
}

/// Split plain extracted text into paragraphs on blank lines, flattening
/// the remaining line breaks to spaces.
pub fn paragraphs_from_plain_text(text: &str) -> Vec<String> {
    let mut paragraphs = Vec::new();
    let mut current: Vec<&str> = Vec::new();

    for line in text.lines().map(str::trim) {
        if line.is_empty() {
            if !current.is_empty() {
                paragraphs.push(normalize_text(&current.join(" ")));
                current.clear();
            }
        } else {
            current.push(line);
        }
    }
    if !current.is_empty() {
        paragraphs.push(normalize_text(&current.join(" ")));
    }

    paragraphs
}

/// Get a text string from a PDF dictionary.
fn get_string_from_dict(dict: &lopdf::Dictionary, key: &[u8]) -> Option<String> {
    let value = match dict.get(key).ok()? {
        Object::String(bytes, _) => decode_text_simple(bytes),
        Object::Name(bytes) => String::from_utf8_lossy(bytes).into_owned(),
        _ => return None,
    };
    let value = value.trim();
    (!value.is_empty()).then(|| value.to_string())
}

/// Parse a PDF date string (D:YYYYMMDDHHmmSS...).
fn parse_pdf_date(s: &str) -> Option<chrono::DateTime<chrono::Utc>> {
    let s = s.strip_prefix("D:").unwrap_or(s);
    let year: i32 = s.get(0..4)?.parse().ok()?;
    let field = |range: std::ops::Range<usize>, default: u32| {
        s.get(range).and_then(|v| v.parse().ok()).unwrap_or(default)
    };

    chrono::NaiveDate::from_ymd_opt(year, field(4..6, 1), field(6..8, 1))
        .and_then(|date| date.and_hms_opt(field(8..10, 0), field(10..12, 0), field(12..14, 0)))
        .map(|dt| chrono::DateTime::from_naive_utc_and_offset(dt, chrono::Utc))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Datelike;

    #[test]
    fn test_parse_pdf_date() {
        let date = parse_pdf_date("D:20240115103045").unwrap();
        assert_eq!(date.year(), 2024);
        assert_eq!(date.month(), 1);
        assert_eq!(date.day(), 15);

        let date = parse_pdf_date("D:2024").unwrap();
        assert_eq!(date.month(), 1);
        assert!(parse_pdf_date("D:20").is_none());
    }

    #[test]
    fn test_paragraphs_from_plain_text() {
        let text = "First line\nsecond line\n\n\n  Next block  \n\n";
        assert_eq!(
            paragraphs_from_plain_text(text),
            vec!["First line second line", "Next block"]
        );
        assert!(paragraphs_from_plain_text("\n \n").is_empty());
    }

    #[test]
    fn test_from_bytes_rejects_non_pdf() {
        assert!(matches!(
            PdfParser::from_bytes(b"not a pdf at all"),
            Err(Error::UnknownFormat)
        ));
    }

    #[test]
    fn test_open_missing_file() {
        assert!(matches!(
            PdfParser::open("/no/such/book.pdf"),
            Err(Error::InputNotFound(_))
        ));
    }
}
