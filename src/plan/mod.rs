mod budget;
mod note;

pub use budget::{footer_reserved, usable_height};
pub use note::place_note;

use crate::error::Error;
use crate::measure::{Measure, PageCandidate};
use crate::model::{ContentBlock, PageDescriptor, PageGeometry, PageRole, ReportSource};

/// Forward-fill reducer state: completed pages plus the open page, which is
/// the half-open span `page_start..cursor` of the input sequence. Keeping the
/// whole loop in one place makes the no-split invariant checkable at a
/// glance: blocks only ever move by advancing `page_start`.
struct PageFill<'a> {
    blocks: &'a [ContentBlock],
    geometry: &'a PageGeometry,
    pages: Vec<PageDescriptor>,
    page_start: usize,
}

impl<'a> PageFill<'a> {
    fn new(blocks: &'a [ContentBlock], geometry: &'a PageGeometry) -> Self {
        Self {
            blocks,
            geometry,
            pages: Vec::new(),
            page_start: 0,
        }
    }

    fn close_page(&mut self, end: usize, role: PageRole) {
        self.pages.push(PageDescriptor {
            index: self.pages.len(),
            blocks: self.page_start..end,
            footer: role,
            includes_note: false,
        });
        self.page_start = end;
    }

    /// Tentatively extend the open page with block `idx`, measured as a
    /// middle-page candidate (more content may follow). On overflow the open
    /// page closes without `idx` and a fresh page starts holding it alone.
    fn push_block<M: Measure + ?Sized>(
        &mut self,
        idx: usize,
        measurer: &mut M,
    ) -> Result<(), Error> {
        let candidate = &self.blocks[self.page_start..idx + 1];
        let height = measurer.measure(PageCandidate::content(candidate, PageRole::Middle))?;

        if height <= usable_height(self.geometry, PageRole::Middle) {
            return Ok(());
        }
        if self.page_start == idx {
            // The block alone overflows a middle page. It stays: a block is
            // never split and never dropped, so the page is allowed to run
            // over its budget.
            if height > usable_height(self.geometry, PageRole::Final) {
                log::warn!(
                    "Block {idx} alone measures {height:.1}, over even the final-page budget {:.1} — overflow allowed",
                    usable_height(self.geometry, PageRole::Final),
                );
            }
            return Ok(());
        }

        self.close_page(idx, PageRole::Middle);
        Ok(())
    }

    /// Close the trailing page under the final budget. The shorter final
    /// footer may leave room to spare, but blocks are never pulled back from
    /// pages that already closed (forward-only fill).
    fn finish<M: Measure + ?Sized>(&mut self, measurer: &mut M) -> Result<(), Error> {
        if self.page_start >= self.blocks.len() {
            return Ok(());
        }
        let candidate = &self.blocks[self.page_start..];
        let height = measurer.measure(PageCandidate::content(candidate, PageRole::Final))?;
        let budget = usable_height(self.geometry, PageRole::Final);
        if height > budget {
            log::warn!(
                "Final page measures {height:.1}, over its budget {budget:.1} — overflow allowed",
            );
        }
        self.close_page(self.blocks.len(), PageRole::Final);
        Ok(())
    }
}

/// Assign every block to a page in a single forward pass: O(n) measurement
/// calls, order preserved, no block ever divided. Every page but the last is
/// a middle page; the last carries the final footer and its larger budget.
/// Empty input yields zero pages.
pub fn paginate<M: Measure + ?Sized>(
    blocks: &[ContentBlock],
    geometry: &PageGeometry,
    measurer: &mut M,
) -> Result<Vec<PageDescriptor>, Error> {
    let mut fill = PageFill::new(blocks, geometry);
    for idx in 0..blocks.len() {
        fill.push_block(idx, measurer)?;
    }
    fill.finish(measurer)?;
    Ok(fill.pages)
}

/// Paginate a full report: greedy fill, then trailing note resolution.
pub fn plan_report<M: Measure + ?Sized>(
    source: &ReportSource,
    geometry: &PageGeometry,
    measurer: &mut M,
) -> Result<Vec<PageDescriptor>, Error> {
    let pages = paginate(&source.blocks, geometry, measurer)?;
    match &source.note {
        Some(note) => place_note(pages, &source.blocks, note, geometry, measurer),
        None => Ok(pages),
    }
}
