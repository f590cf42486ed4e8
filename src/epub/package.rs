//! Package documents: container, OPF, NCX, and the navigation document.

use chrono::{DateTime, Utc};

use crate::model::{BookMetadata, Chapter};
use crate::render::escape_text;

/// Media type stored uncompressed as the first archive entry.
pub const MIMETYPE: &str = "application/epub+zip";

/// Manifest id and file name of the navigation document.
pub(crate) const NAV_ID: &str = "nav";
pub(crate) const NAV_FILE: &str = "nav.xhtml";
pub(crate) const NCX_FILE: &str = "toc.ncx";
pub(crate) const OPF_PATH: &str = "OEBPS/content.opf";

/// `META-INF/container.xml` pointing at the package document.
pub fn container_xml() -> String {
    format!(
        r#"<?xml version="1.0" encoding="UTF-8"?>
<container version="1.0" xmlns="urn:oasis:names:tc:opendocument:xmlns:container">
  <rootfiles>
    <rootfile full-path="{}" media-type="application/oebps-package+xml"/>
  </rootfiles>
</container>
"#,
        OPF_PATH
    )
}

/// The OPF package document.
///
/// The spine lists the navigation document first, then chapters in order.
pub fn content_opf(metadata: &BookMetadata, chapters: &[Chapter], modified: DateTime<Utc>) -> String {
    let mut opf = String::new();

    opf.push_str(
        r#"<?xml version="1.0" encoding="UTF-8"?>
<package xmlns="http://www.idpf.org/2007/opf" version="3.0" unique-identifier="BookId">
  <metadata xmlns:dc="http://purl.org/dc/elements/1.1/">
"#,
    );
    opf.push_str(&format!(
        "    <dc:identifier id=\"BookId\">{}</dc:identifier>\n",
        escape_text(&metadata.identifier)
    ));
    opf.push_str(&format!(
        "    <dc:title>{}</dc:title>\n",
        escape_text(&metadata.title)
    ));
    opf.push_str(&format!(
        "    <dc:language>{}</dc:language>\n",
        escape_text(&metadata.language)
    ));
    opf.push_str(&format!(
        "    <dc:creator id=\"creator\">{}</dc:creator>\n",
        escape_text(&metadata.author)
    ));
    opf.push_str(&format!(
        "    <meta property=\"dcterms:modified\">{}</meta>\n",
        modified.format("%Y-%m-%dT%H:%M:%SZ")
    ));

    opf.push_str("  </metadata>\n  <manifest>\n");
    opf.push_str(&format!(
        "    <item id=\"{}\" href=\"{}\" media-type=\"application/xhtml+xml\" properties=\"nav\"/>\n",
        NAV_ID, NAV_FILE
    ));
    opf.push_str(&format!(
        "    <item id=\"ncx\" href=\"{}\" media-type=\"application/x-dtbncx+xml\"/>\n",
        NCX_FILE
    ));
    for chapter in chapters {
        opf.push_str(&format!(
            "    <item id=\"{}\" href=\"{}\" media-type=\"application/xhtml+xml\"/>\n",
            chapter.id(),
            chapter.file_name()
        ));
    }

    opf.push_str("  </manifest>\n  <spine toc=\"ncx\">\n");
    opf.push_str(&format!("    <itemref idref=\"{}\"/>\n", NAV_ID));
    for chapter in chapters {
        opf.push_str(&format!("    <itemref idref=\"{}\"/>\n", chapter.id()));
    }
    opf.push_str("  </spine>\n</package>\n");
    opf
}

/// The EPUB 2 NCX table of contents, kept for older reading systems.
pub fn toc_ncx(metadata: &BookMetadata, chapters: &[Chapter]) -> String {
    let mut ncx = String::new();

    ncx.push_str(&format!(
        r#"<?xml version="1.0" encoding="UTF-8"?>
<ncx xmlns="http://www.daisy.org/z3986/2005/ncx/" version="2005-1">
  <head>
    <meta name="dtb:uid" content="{}"/>
    <meta name="dtb:depth" content="1"/>
    <meta name="dtb:totalPageCount" content="0"/>
    <meta name="dtb:maxPageNumber" content="0"/>
  </head>
  <docTitle>
    <text>{}</text>
  </docTitle>
  <navMap>
"#,
        escape_text(&metadata.identifier),
        escape_text(&metadata.title)
    ));

    for (index, chapter) in chapters.iter().enumerate() {
        let play_order = index + 1;
        ncx.push_str(&format!(
            "    <navPoint id=\"navpoint-{}\" playOrder=\"{}\">\n",
            play_order, play_order
        ));
        ncx.push_str(&format!(
            "      <navLabel>\n        <text>{}</text>\n      </navLabel>\n",
            escape_text(&chapter.title())
        ));
        ncx.push_str(&format!(
            "      <content src=\"{}\"/>\n    </navPoint>\n",
            chapter.file_name()
        ));
    }

    ncx.push_str("  </navMap>\n</ncx>\n");
    ncx
}

/// The EPUB 3 navigation document listing every chapter.
pub fn nav_xhtml(metadata: &BookMetadata, chapters: &[Chapter]) -> String {
    let items: String = chapters
        .iter()
        .map(|chapter| {
            format!(
                "        <li><a href=\"{}\">{}</a></li>\n",
                chapter.file_name(),
                escape_text(&chapter.title())
            )
        })
        .collect();

    format!(
        r#"<?xml version="1.0" encoding="UTF-8"?>
<!DOCTYPE html>
<html xmlns="http://www.w3.org/1999/xhtml" xmlns:epub="http://www.idpf.org/2007/ops" lang="{lang}" xml:lang="{lang}">
<head>
    <title>{title}</title>
</head>
<body>
    <nav epub:type="toc" id="toc">
      <h1>{title}</h1>
      <ol>
{items}      </ol>
    </nav>
</body>
</html>
"#,
        lang = escape_text(&metadata.language),
        title = escape_text(&metadata.title),
        items = items,
    )
}
