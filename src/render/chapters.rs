//! Page/chapter aggregation.

use crate::error::{Error, Result};
use crate::model::{Chapter, Page};

/// Batch pages into chapters of up to `chapter_pages` pages each.
///
/// Chapter numbers follow the page group's position, starting at 1. Groups
/// with no text are dropped without renumbering the groups after them, so
/// the emitted numbers can have gaps (e.g. 1, 2, 4).
pub fn build_chapters(pages: &[Page], chapter_pages: usize) -> Result<Vec<Chapter>> {
    if chapter_pages == 0 {
        return Err(Error::InvalidOption(
            "pages per chapter must be at least 1".to_string(),
        ));
    }

    let total_groups = pages.len().div_ceil(chapter_pages);
    let mut chapters = Vec::with_capacity(total_groups);

    for (index, group) in pages.chunks(chapter_pages).enumerate() {
        let chapter = Chapter::new(index as u32 + 1, group.to_vec());
        if chapter.is_blank() {
            log::debug!(
                "skipping empty chapter {}/{} (pages {:?})",
                chapter.number,
                total_groups,
                chapter.page_span()
            );
            continue;
        }
        log::debug!(
            "chapter {}/{}: pages {:?}, {} chars",
            chapter.number,
            total_groups,
            chapter.page_span(),
            chapter.text().len()
        );
        chapters.push(chapter);
    }

    Ok(chapters)
}
