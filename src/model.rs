use std::ops::Range;

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Run {
    pub text: String,
    pub bold: bool,
    pub italic: bool,
    pub underline: bool,
    pub hyperlink_url: Option<String>,
}

impl Run {
    pub fn plain(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            bold: false,
            italic: false,
            underline: false,
            hyperlink_url: None,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum ParagraphKind {
    Body,
    /// Heading level 1–3.
    Heading(u8),
    ListItem {
        ordered: bool,
    },
}

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Paragraph {
    pub kind: ParagraphKind,
    pub runs: Vec<Run>,
}

#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct RichText {
    pub paragraphs: Vec<Paragraph>,
}

impl RichText {
    /// True when no paragraph carries visible text.
    pub fn is_empty(&self) -> bool {
        self.paragraphs
            .iter()
            .all(|p| p.runs.iter().all(|r| r.text.trim().is_empty()))
    }
}

/// An atomic unit of report content. Identified by its position in the input
/// sequence; never divided between two pages.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct ContentBlock {
    pub header: RichText,
    pub body: RichText,
}

/// Single trailing disclaimer-style unit, always last in the document.
/// Placement follows its own rule instead of the greedy fill.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct TrailingNote {
    pub body: RichText,
}

#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct ReportSource {
    pub blocks: Vec<ContentBlock>,
    pub note: Option<TrailingNote>,
}

/// Whether a page is a middle content page or the final one. The role selects
/// the footer graphic, and with it the footer's reserved height.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum PageRole {
    Middle,
    Final,
}

/// Page geometry constants for one document template, in points.
/// The final footer graphic is shorter than the middle one in this document
/// family, so the final page has more usable content height.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct PageGeometry {
    pub page_height: f32,
    pub content_width: f32,
    pub header_reserved: f32,
    pub footer_reserved_middle: f32,
    pub footer_reserved_final: f32,
    pub inter_block_spacing: f32,
    pub first_block_top_margin: f32,
    /// Buffer added when testing the trailing note against the final budget,
    /// guarding against font metric rounding.
    pub note_safety_margin: f32,
}

impl PageGeometry {
    /// A4 at 72 dpi points with 36pt side margins.
    pub fn a4() -> Self {
        Self {
            page_height: 842.0,
            content_width: 523.0,
            header_reserved: 90.0,
            footer_reserved_middle: 72.0,
            footer_reserved_final: 40.0,
            inter_block_spacing: 14.0,
            first_block_top_margin: 10.0,
            note_safety_margin: 6.0,
        }
    }

    /// US Letter at 72 dpi points with 36pt side margins.
    pub fn letter() -> Self {
        Self {
            page_height: 792.0,
            content_width: 540.0,
            ..Self::a4()
        }
    }
}

/// One planned page. `blocks` is the span of input block indices placed on
/// this page (contiguous by construction of the forward fill; empty for a
/// dedicated note page). Recomputed per generation request, never persisted.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct PageDescriptor {
    pub index: usize,
    pub blocks: Range<usize>,
    pub footer: PageRole,
    pub includes_note: bool,
}

/// Result of planning one report: the immutable source snapshot plus the
/// ordered page descriptors handed to the renderer.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct PagePlan {
    pub source: ReportSource,
    pub pages: Vec<PageDescriptor>,
}
