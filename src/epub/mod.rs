//! EPUB 3 container assembly.

mod package;
mod writer;

pub use package::{container_xml, content_opf, nav_xhtml, toc_ncx, MIMETYPE};
pub use writer::{write_epub, EpubWriter};
