pub mod metrics;

use crate::error::Error;
use crate::model::{ContentBlock, PageRole, RichText};

/// Candidate content for one page, handed to a measurement surface. The role
/// is carried so surfaces whose metrics depend on it can honor it.
#[derive(Clone, Copy)]
pub struct PageCandidate<'a> {
    pub blocks: &'a [ContentBlock],
    pub note: Option<&'a RichText>,
    pub role: PageRole,
}

impl<'a> PageCandidate<'a> {
    pub fn content(blocks: &'a [ContentBlock], role: PageRole) -> Self {
        Self {
            blocks,
            note: None,
            role,
        }
    }

    pub fn with_note(blocks: &'a [ContentBlock], note: &'a RichText, role: PageRole) -> Self {
        Self {
            blocks,
            note: Some(note),
            role,
        }
    }
}

/// Boundary around the external rendering technology that can lay out rich
/// text and report its height. Surfaces hold transient layout state, so each
/// concurrent pagination request owns its own instance (`&mut self`).
///
/// Any error from a surface aborts the generation request; the pagination
/// core never retries.
pub trait Measure {
    fn measure(&mut self, candidate: PageCandidate<'_>) -> Result<f32, Error>;
}
