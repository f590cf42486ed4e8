//! Zip serialization of the EPUB container.

use std::io::{Seek, Write};
use std::path::Path;

use chrono::{DateTime, SubsecRound, Utc};
use tempfile::NamedTempFile;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

use super::package::{container_xml, content_opf, nav_xhtml, toc_ncx, MIMETYPE, NAV_FILE, NCX_FILE};
use crate::error::{Error, Result};
use crate::model::{BookMetadata, Chapter};
use crate::render::chapter_document;

/// Writes chapters and book metadata into an EPUB 3 archive.
#[derive(Debug, Clone)]
pub struct EpubWriter<'a> {
    metadata: &'a BookMetadata,
    modified: DateTime<Utc>,
}

impl<'a> EpubWriter<'a> {
    /// Create a writer stamped with the current time.
    pub fn new(metadata: &'a BookMetadata) -> Self {
        Self {
            metadata,
            modified: Utc::now().trunc_subsecs(0),
        }
    }

    /// Override the `dcterms:modified` timestamp.
    pub fn with_modified(mut self, modified: DateTime<Utc>) -> Self {
        self.modified = modified;
        self
    }

    /// Serialize the archive into any [`Write`] + [`Seek`] destination.
    ///
    /// Returns the destination once the central directory is written.
    pub fn write_to<W: Write + Seek>(&self, chapters: &[Chapter], writer: W) -> Result<W> {
        let mut zip = ZipWriter::new(writer);

        let stored = SimpleFileOptions::default().compression_method(CompressionMethod::Stored);
        let deflated = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);

        // mimetype must be the first entry and uncompressed
        zip.start_file("mimetype", stored)?;
        zip.write_all(MIMETYPE.as_bytes())?;

        zip.start_file("META-INF/container.xml", deflated)?;
        zip.write_all(container_xml().as_bytes())?;

        zip.start_file("OEBPS/content.opf", deflated)?;
        zip.write_all(content_opf(self.metadata, chapters, self.modified).as_bytes())?;

        zip.start_file(format!("OEBPS/{}", NCX_FILE), deflated)?;
        zip.write_all(toc_ncx(self.metadata, chapters).as_bytes())?;

        zip.start_file(format!("OEBPS/{}", NAV_FILE), deflated)?;
        zip.write_all(nav_xhtml(self.metadata, chapters).as_bytes())?;

        for chapter in chapters {
            let document = chapter_document(chapter, &self.metadata.language);
            log::debug!(
                "writing {} ({} bytes)",
                chapter.file_name(),
                document.len()
            );
            zip.start_file(format!("OEBPS/{}", chapter.file_name()), deflated)?;
            zip.write_all(document.as_bytes())?;
        }

        Ok(zip.finish()?)
    }

    /// Write the archive to `path`.
    ///
    /// The archive is built in a temporary file next to the destination and
    /// renamed into place, so a failed write never leaves a partial file at
    /// `path`.
    pub fn write_file<P: AsRef<Path>>(&self, chapters: &[Chapter], path: P) -> Result<()> {
        let path = path.as_ref();
        let dir = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };

        let mut temp = NamedTempFile::new_in(dir)?;
        self.write_to(chapters, &mut temp)?;
        temp.as_file().sync_all()?;
        temp.persist(path).map_err(|e| Error::Io(e.error))?;

        log::info!("wrote {} chapters to {}", chapters.len(), path.display());
        Ok(())
    }
}

/// Write chapters to an EPUB file on disk.
pub fn write_epub<P: AsRef<Path>>(
    metadata: &BookMetadata,
    chapters: &[Chapter],
    path: P,
) -> Result<()> {
    EpubWriter::new(metadata).write_file(chapters, path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Page;
    use std::io::{Cursor, Read};
    use zip::ZipArchive;

    fn sample() -> (BookMetadata, Vec<Chapter>) {
        let metadata = BookMetadata::new("Sample", "Author", "en");
        let chapters = vec![
            Chapter::new(1, vec![Page::new(1, vec!["First <page>.".into()])]),
            Chapter::new(2, vec![Page::new(2, vec!["Second page.".into()])]),
        ];
        (metadata, chapters)
    }

    fn read_entry<R: Read + Seek>(archive: &mut ZipArchive<R>, name: &str) -> String {
        let mut content = String::new();
        archive
            .by_name(name)
            .unwrap()
            .read_to_string(&mut content)
            .unwrap();
        content
    }

    #[test]
    fn test_archive_layout() {
        let (metadata, chapters) = sample();
        let cursor = EpubWriter::new(&metadata)
            .write_to(&chapters, Cursor::new(Vec::new()))
            .unwrap();

        let mut archive = ZipArchive::new(Cursor::new(cursor.into_inner())).unwrap();
        let names: Vec<String> = archive.file_names().map(str::to_string).collect();
        for expected in [
            "mimetype",
            "META-INF/container.xml",
            "OEBPS/content.opf",
            "OEBPS/toc.ncx",
            "OEBPS/nav.xhtml",
            "OEBPS/chapter_0001.xhtml",
            "OEBPS/chapter_0002.xhtml",
        ] {
            assert!(names.iter().any(|n| n == expected), "missing {}", expected);
        }

        let first = archive.by_index(0).unwrap();
        assert_eq!(first.name(), "mimetype");
        assert_eq!(first.compression(), CompressionMethod::Stored);
        drop(first);

        assert_eq!(read_entry(&mut archive, "mimetype"), MIMETYPE);
        let chapter = read_entry(&mut archive, "OEBPS/chapter_0001.xhtml");
        assert!(chapter.contains("<p>First &lt;page&gt;.</p>"));
    }

    #[test]
    fn test_write_file_replaces_destination() {
        let (metadata, chapters) = sample();
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("book.epub");
        std::fs::write(&path, b"stale").unwrap();

        write_epub(&metadata, &chapters, &path).unwrap();

        let bytes = std::fs::read(&path).unwrap();
        assert!(bytes.starts_with(b"PK"));
        let leftovers = std::fs::read_dir(dir.path()).unwrap().count();
        assert_eq!(leftovers, 1);
    }

    #[test]
    fn test_write_file_missing_directory() {
        let (metadata, chapters) = sample();
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("absent").join("book.epub");
        assert!(matches!(
            write_epub(&metadata, &chapters, &path),
            Err(Error::Io(_))
        ));
        assert!(!path.exists());
    }
}
