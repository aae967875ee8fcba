use std::path::{Path, PathBuf};

use memmap2::Mmap;
use ttf_parser::Face;

use crate::error::Error;
use crate::measure::{Measure, PageCandidate};
use crate::model::{ContentBlock, PageGeometry, Paragraph, ParagraphKind, RichText, Run};

const HEADING_SCALES: [f32; 3] = [1.45, 1.25, 1.1];
const BLOCK_HEADER_SCALE: f32 = 1.15;
const LIST_INDENT_PT: f32 = 18.0;
const PARA_SPACE_RATIO: f32 = 0.4;
const MISSING_GLYPH_RATIO: f32 = 0.5;

enum FontData {
    Mapped(Mmap),
    Owned(Vec<u8>),
}

impl FontData {
    fn bytes(&self) -> &[u8] {
        match self {
            FontData::Mapped(map) => map,
            FontData::Owned(vec) => vec,
        }
    }
}

/// Measurement surface backed by real font metrics: advance widths and
/// vertical metrics from a parsed face, greedy word-wrap at the template's
/// content width. No rasterization happens; only heights come out.
pub struct MetricsSurface {
    data: FontData,
    face_index: u32,
    upem: f32,
    line_h_ratio: f32,
    ascii_advances: [f32; 95],
    geometry: PageGeometry,
    body_size: f32,
}

fn font_family_name(face: &Face) -> Option<String> {
    for name in face.names() {
        if name.name_id == ttf_parser::name_id::FAMILY
            && name.is_unicode()
            && let Some(s) = name.to_string()
        {
            return Some(s);
        }
    }
    None
}

fn font_directories() -> Vec<PathBuf> {
    let mut dirs: Vec<PathBuf> = Vec::new();

    // 1. User-configured directories via PAGEPLAN_FONTS env var
    if let Ok(val) = std::env::var("PAGEPLAN_FONTS") {
        let sep = if cfg!(windows) { ';' } else { ':' };
        for part in val.split(sep) {
            let trimmed = part.trim();
            if !trimmed.is_empty() {
                dirs.push(PathBuf::from(trimmed));
            }
        }
    }

    // 2. Platform-specific system font directories
    #[cfg(target_os = "macos")]
    {
        dirs.extend([
            "/Library/Fonts".into(),
            "/System/Library/Fonts".into(),
            "/System/Library/Fonts/Supplemental".into(),
        ]);
        if let Ok(home) = std::env::var("HOME") {
            dirs.push(PathBuf::from(home).join("Library/Fonts"));
        }
    }

    #[cfg(target_os = "linux")]
    {
        dirs.extend(["/usr/share/fonts".into(), "/usr/local/share/fonts".into()]);
        if let Ok(home) = std::env::var("HOME") {
            dirs.push(PathBuf::from(&home).join(".local/share/fonts"));
            dirs.push(PathBuf::from(home).join(".fonts"));
        }
    }

    #[cfg(target_os = "windows")]
    {
        if let Ok(windir) = std::env::var("WINDIR") {
            dirs.push(PathBuf::from(windir).join("Fonts"));
        } else {
            dirs.push("C:\\Windows\\Fonts".into());
        }
    }

    dirs
}

fn collect_font_files(dir: &Path, depth: usize, out: &mut Vec<PathBuf>) {
    let Ok(entries) = std::fs::read_dir(dir) else {
        return;
    };
    for entry in entries.flatten() {
        let path = entry.path();
        if path.is_dir() {
            if depth > 0 {
                collect_font_files(&path, depth - 1, out);
            }
            continue;
        }
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase);
        if matches!(ext.as_deref(), Some("ttf" | "otf" | "ttc")) {
            out.push(path);
        }
    }
}

fn map_font_file(path: &Path) -> Option<FontData> {
    let file = std::fs::File::open(path).ok()?;
    match unsafe { Mmap::map(&file) } {
        Ok(map) => Some(FontData::Mapped(map)),
        Err(_) => std::fs::read(path).ok().map(FontData::Owned),
    }
}

impl MetricsSurface {
    /// Load the face at `path` (first face of a collection).
    pub fn from_file(path: &Path, geometry: PageGeometry, body_size: f32) -> Result<Self, Error> {
        let data = map_font_file(path).ok_or_else(|| {
            Error::Measurement(format!("cannot read font file {}", path.display()))
        })?;
        Self::from_data(data, 0, geometry, body_size)
    }

    /// Search the platform font directories (plus PAGEPLAN_FONTS) for a face.
    /// With a family name, the regular variant of that family is preferred;
    /// otherwise, or when the family is absent, the first parsable face wins.
    pub fn discover(
        family: Option<&str>,
        geometry: PageGeometry,
        body_size: f32,
    ) -> Result<Self, Error> {
        let dirs = font_directories();
        let mut files: Vec<PathBuf> = Vec::new();
        for dir in &dirs {
            collect_font_files(dir, 2, &mut files);
        }

        if let Some(wanted) = family {
            let wanted_lc = wanted.to_ascii_lowercase();
            for path in &files {
                let Some(data) = map_font_file(path) else {
                    continue;
                };
                let Ok(face) = Face::parse(data.bytes(), 0) else {
                    continue;
                };
                if !face.is_bold()
                    && !face.is_italic()
                    && font_family_name(&face).is_some_and(|f| f.to_ascii_lowercase() == wanted_lc)
                {
                    return Self::from_data(data, 0, geometry, body_size);
                }
            }
            log::warn!("Font family not found: {wanted} — using the first usable face");
        }

        for path in &files {
            let Some(data) = map_font_file(path) else {
                continue;
            };
            if Face::parse(data.bytes(), 0).is_ok() {
                log::debug!("Measurement face: {}", path.display());
                return Self::from_data(data, 0, geometry, body_size);
            }
        }

        Err(Error::Measurement(format!(
            "no usable font face found across {} directories (set PAGEPLAN_FONTS)",
            dirs.len(),
        )))
    }

    fn from_data(
        data: FontData,
        face_index: u32,
        geometry: PageGeometry,
        body_size: f32,
    ) -> Result<Self, Error> {
        let (upem, line_h_ratio, ascii_advances) = {
            let face = Face::parse(data.bytes(), face_index)
                .map_err(|e| Error::Measurement(format!("cannot parse font face: {e}")))?;
            let upem = f32::from(face.units_per_em());
            let line_h_ratio = (f32::from(face.ascender()) - f32::from(face.descender())
                + f32::from(face.line_gap()))
                / upem;
            let mut advances = [0.0f32; 95];
            for (i, slot) in advances.iter_mut().enumerate() {
                let ch = (32 + i as u8) as char;
                *slot = face
                    .glyph_index(ch)
                    .and_then(|g| face.glyph_hor_advance(g))
                    .map(f32::from)
                    .unwrap_or(upem * MISSING_GLYPH_RATIO);
            }
            (upem, line_h_ratio, advances)
        };

        Ok(Self {
            data,
            face_index,
            upem,
            line_h_ratio,
            ascii_advances,
            geometry,
            body_size,
        })
    }

    fn advance_units(&self, face: &Face, ch: char) -> f32 {
        if (' '..='~').contains(&ch) {
            self.ascii_advances[ch as usize - 32]
        } else {
            face.glyph_index(ch)
                .and_then(|g| face.glyph_hor_advance(g))
                .map(f32::from)
                .unwrap_or(self.upem * MISSING_GLYPH_RATIO)
        }
    }

    fn word_width(&self, face: &Face, word: &str, size: f32) -> f32 {
        word.chars()
            .map(|ch| self.advance_units(face, ch))
            .sum::<f32>()
            * size
            / self.upem
    }

    /// Count wrapped lines for a paragraph's runs. Mirrors the width
    /// accumulation a rendering surface performs: no space is inserted at a
    /// run seam unless whitespace bounds it, '\n' forces a break, and a word
    /// wider than the line still occupies one line.
    fn line_count(&self, face: &Face, runs: &[Run], size: f32, max_width: f32) -> usize {
        let space_w = self.ascii_advances[0] * size / self.upem;
        let mut lines = 1usize;
        let mut x = 0.0f32;
        let mut line_has_words = false;
        let mut prev_ended_ws = false;

        for run in runs {
            for (seg_idx, segment) in run.text.split('\n').enumerate() {
                if seg_idx > 0 {
                    lines += 1;
                    x = 0.0;
                    line_has_words = false;
                    prev_ended_ws = false;
                }
                let starts_ws = segment.starts_with(char::is_whitespace);
                for (i, word) in segment.split_whitespace().enumerate() {
                    let ww = self.word_width(face, word, size);
                    let need_space = line_has_words && (i > 0 || starts_ws || prev_ended_ws);
                    let proposed = if need_space { x + space_w } else { x };
                    if line_has_words && proposed + ww > max_width {
                        lines += 1;
                        x = ww;
                    } else {
                        x = proposed + ww;
                    }
                    line_has_words = true;
                }
                if !segment.is_empty() {
                    prev_ended_ws = segment.ends_with(char::is_whitespace);
                }
            }
        }
        lines
    }

    fn paragraph_height(&self, face: &Face, para: &Paragraph, base_size: f32) -> f32 {
        let (size, indent) = match para.kind {
            ParagraphKind::Body => (base_size, 0.0),
            ParagraphKind::Heading(level) => {
                let scale = HEADING_SCALES[usize::from(level.clamp(1, 3)) - 1];
                (base_size * scale, 0.0)
            }
            ParagraphKind::ListItem { .. } => (base_size, LIST_INDENT_PT),
        };
        let max_width = (self.geometry.content_width - indent).max(1.0);
        let lines = self.line_count(face, &para.runs, size, max_width);
        lines as f32 * size * self.line_h_ratio + size * PARA_SPACE_RATIO
    }

    fn rich_text_height(&self, face: &Face, text: &RichText, base_size: f32) -> f32 {
        text.paragraphs
            .iter()
            .map(|para| self.paragraph_height(face, para, base_size))
            .sum()
    }

    fn block_height(&self, face: &Face, block: &ContentBlock) -> f32 {
        self.rich_text_height(face, &block.header, self.body_size * BLOCK_HEADER_SCALE)
            + self.rich_text_height(face, &block.body, self.body_size)
    }
}

impl Measure for MetricsSurface {
    fn measure(&mut self, candidate: PageCandidate<'_>) -> Result<f32, Error> {
        let face = Face::parse(self.data.bytes(), self.face_index)
            .map_err(|e| Error::Measurement(format!("font face no longer parsable: {e}")))?;

        let mut height = self.geometry.first_block_top_margin;
        for (i, block) in candidate.blocks.iter().enumerate() {
            if i > 0 {
                height += self.geometry.inter_block_spacing;
            }
            height += self.block_height(&face, block);
        }
        if let Some(note) = candidate.note {
            if !candidate.blocks.is_empty() {
                height += self.geometry.inter_block_spacing;
            }
            height += self.rich_text_height(&face, note, self.body_size);
        }
        Ok(height)
    }
}
