#![allow(dead_code)]

use std::collections::HashMap;

use pageplan::Error;
use pageplan::measure::{Measure, PageCandidate};
use pageplan::model::{
    ContentBlock, PageGeometry, Paragraph, ParagraphKind, ReportSource, RichText, Run,
    TrailingNote,
};

/// Geometry used by the algorithm tests: 1000-unit page, usable content
/// height 780 on middle pages and 860 on the final page, no spacing overhead
/// so block heights add up exactly.
pub fn unit_geometry() -> PageGeometry {
    PageGeometry {
        page_height: 1000.0,
        content_width: 600.0,
        header_reserved: 100.0,
        footer_reserved_middle: 120.0,
        footer_reserved_final: 40.0,
        inter_block_spacing: 0.0,
        first_block_top_margin: 0.0,
        note_safety_margin: 20.0,
    }
}

pub fn text(s: &str) -> RichText {
    RichText {
        paragraphs: vec![Paragraph {
            kind: ParagraphKind::Body,
            runs: vec![Run::plain(s)],
        }],
    }
}

/// A block identified by its header text; the fixed surface looks heights up
/// by that name.
pub fn block(name: &str) -> ContentBlock {
    ContentBlock {
        header: text(name),
        body: text("body"),
    }
}

pub fn note() -> TrailingNote {
    TrailingNote { body: text("note") }
}

pub fn source(names: &[&str], with_note: bool) -> ReportSource {
    ReportSource {
        blocks: names.iter().map(|n| block(n)).collect(),
        note: with_note.then(note),
    }
}

/// Deterministic lookup-table measurement surface: candidate height is the
/// sum of per-block heights (keyed by header text) plus the note height when
/// the candidate carries the note.
pub struct FixedSurface {
    heights: HashMap<String, f32>,
    note_height: f32,
    fail_after: Option<usize>,
    pub calls: usize,
}

impl FixedSurface {
    pub fn new(heights: &[(&str, f32)]) -> Self {
        Self {
            heights: heights
                .iter()
                .map(|(name, h)| (name.to_string(), *h))
                .collect(),
            note_height: 0.0,
            fail_after: None,
            calls: 0,
        }
    }

    pub fn with_note_height(mut self, height: f32) -> Self {
        self.note_height = height;
        self
    }

    /// Error on the measurement call after `calls` successful ones.
    pub fn fail_after(mut self, calls: usize) -> Self {
        self.fail_after = Some(calls);
        self
    }
}

fn block_key(block: &ContentBlock) -> &str {
    block
        .header
        .paragraphs
        .first()
        .and_then(|p| p.runs.first())
        .map(|r| r.text.as_str())
        .unwrap_or("")
}

impl Measure for FixedSurface {
    fn measure(&mut self, candidate: PageCandidate<'_>) -> Result<f32, Error> {
        if let Some(limit) = self.fail_after
            && self.calls >= limit
        {
            return Err(Error::Measurement("surface went away".into()));
        }
        self.calls += 1;

        let mut height = 0.0;
        for block in candidate.blocks {
            height += self
                .heights
                .get(block_key(block))
                .copied()
                .expect("height registered for block");
        }
        if candidate.note.is_some() {
            height += self.note_height;
        }
        Ok(height)
    }
}
