use crate::error::Error;
use crate::measure::{Measure, PageCandidate};
use crate::model::{ContentBlock, PageDescriptor, PageGeometry, PageRole, TrailingNote};

use super::budget::usable_height;

/// Decide where the trailing note goes: inline at the bottom of the last
/// content page when it fits under the final budget (plus the configured
/// safety margin), on a dedicated page otherwise. A spawned note page never
/// changes the variant already assigned to the last content page.
pub fn place_note<M: Measure + ?Sized>(
    mut pages: Vec<PageDescriptor>,
    blocks: &[ContentBlock],
    note: &TrailingNote,
    geometry: &PageGeometry,
    measurer: &mut M,
) -> Result<Vec<PageDescriptor>, Error> {
    let (last_index, last_span) = match pages.last() {
        Some(last) => (last.index, last.blocks.clone()),
        None => {
            // No content pages at all: the note gets the only page.
            pages.push(PageDescriptor {
                index: 0,
                blocks: 0..0,
                footer: PageRole::Final,
                includes_note: true,
            });
            return Ok(pages);
        }
    };
    let candidate =
        PageCandidate::with_note(&blocks[last_span.clone()], &note.body, PageRole::Final);
    let height = measurer.measure(candidate)?;

    if height + geometry.note_safety_margin <= usable_height(geometry, PageRole::Final) {
        if let Some(last) = pages.last_mut() {
            last.includes_note = true;
        }
    } else {
        log::debug!(
            "Trailing note does not fit on page {last_index} ({height:.1} + margin over budget) — spawning a note page",
        );
        pages.push(PageDescriptor {
            index: last_index + 1,
            blocks: last_span.end..last_span.end,
            footer: PageRole::Final,
            includes_note: true,
        });
    }

    Ok(pages)
}
