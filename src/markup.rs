use std::path::Path;

use crate::error::Error;
use crate::model::{
    ContentBlock, Paragraph, ParagraphKind, ReportSource, RichText, Run, TrailingNote,
};

/// Formatting state inherited from enclosing inline elements.
#[derive(Clone, Default)]
struct RunState {
    bold: bool,
    italic: bool,
    underline: bool,
    hyperlink_url: Option<String>,
}

impl RunState {
    fn run(&self, text: String) -> Run {
        Run {
            text,
            bold: self.bold,
            italic: self.italic,
            underline: self.underline,
            hyperlink_url: self.hyperlink_url.clone(),
        }
    }
}

fn is_inline(name: &str) -> bool {
    matches!(name, "b" | "strong" | "i" | "em" | "u" | "a" | "br")
}

/// Collect formatted runs from an inline subtree. Unknown elements keep their
/// text content with the inherited state (input is sanitized upstream).
fn collect_runs(node: roxmltree::Node, state: &RunState, out: &mut Vec<Run>) {
    for child in node.children() {
        if child.is_text() {
            if let Some(text) = child.text()
                && !text.is_empty()
            {
                out.push(state.run(text.to_string()));
            }
        } else if child.is_element() {
            collect_element(child, state, out);
        }
    }
}

fn collect_element(el: roxmltree::Node, state: &RunState, out: &mut Vec<Run>) {
    let mut inner = state.clone();
    match el.tag_name().name() {
        "b" | "strong" => inner.bold = true,
        "i" | "em" => inner.italic = true,
        "u" => inner.underline = true,
        "a" => inner.hyperlink_url = el.attribute("href").map(str::to_string),
        "br" => {
            // Hard line break inside a paragraph
            out.push(state.run("\n".to_string()));
            return;
        }
        _ => {}
    }
    collect_runs(el, &inner, out);
}

fn paragraph(kind: ParagraphKind, node: roxmltree::Node) -> Paragraph {
    let mut runs = Vec::new();
    collect_runs(node, &RunState::default(), &mut runs);
    Paragraph { kind, runs }
}

fn heading_level(name: &str) -> Option<u8> {
    match name {
        "h1" => Some(1),
        "h2" => Some(2),
        "h3" => Some(3),
        _ => None,
    }
}

/// Parse mixed block-level content into rich text. Bare text and inline
/// elements between block elements form an implicit paragraph.
fn parse_rich_text(node: roxmltree::Node) -> RichText {
    let mut paragraphs: Vec<Paragraph> = Vec::new();
    let mut loose: Vec<Run> = Vec::new();
    let state = RunState::default();

    let flush_loose = |loose: &mut Vec<Run>, paragraphs: &mut Vec<Paragraph>| {
        if loose.iter().any(|r| !r.text.trim().is_empty()) {
            paragraphs.push(Paragraph {
                kind: ParagraphKind::Body,
                runs: std::mem::take(loose),
            });
        } else {
            loose.clear();
        }
    };

    for child in node.children() {
        if child.is_text() {
            if let Some(text) = child.text()
                && !text.trim().is_empty()
            {
                loose.push(state.run(text.to_string()));
            }
            continue;
        }
        if !child.is_element() {
            continue;
        }
        let name = child.tag_name().name();
        if let Some(level) = heading_level(name) {
            flush_loose(&mut loose, &mut paragraphs);
            paragraphs.push(paragraph(ParagraphKind::Heading(level), child));
        } else if name == "p" {
            flush_loose(&mut loose, &mut paragraphs);
            paragraphs.push(paragraph(ParagraphKind::Body, child));
        } else if name == "ul" || name == "ol" {
            flush_loose(&mut loose, &mut paragraphs);
            let ordered = name == "ol";
            for item in child.children().filter(|n| n.is_element()) {
                if item.tag_name().name() == "li" {
                    paragraphs.push(paragraph(ParagraphKind::ListItem { ordered }, item));
                }
            }
        } else if is_inline(name) {
            collect_element(child, &state, &mut loose);
        } else {
            // Unknown block element: keep its text, discard the structure
            collect_runs(child, &state, &mut loose);
        }
    }
    flush_loose(&mut loose, &mut paragraphs);

    RichText { paragraphs }
}

fn parse_block(node: roxmltree::Node) -> ContentBlock {
    let mut header = RichText::default();
    let mut body = RichText::default();
    for child in node.children().filter(|n| n.is_element()) {
        match child.tag_name().name() {
            "header" => header = parse_rich_text(child),
            "body" => body = parse_rich_text(child),
            _ => {}
        }
    }
    ContentBlock { header, body }
}

pub fn parse_str(input: &str) -> Result<ReportSource, Error> {
    let xml = roxmltree::Document::parse(input)
        .map_err(|e| Error::InvalidMarkup(format!("not well-formed markup: {e}")))?;
    let root = xml.root_element();
    if root.tag_name().name() != "report" {
        return Err(Error::InvalidMarkup("missing <report> root element".into()));
    }

    let mut blocks = Vec::new();
    let mut note = None;
    for child in root.children().filter(|n| n.is_element()) {
        match child.tag_name().name() {
            "block" => blocks.push(parse_block(child)),
            "note" => {
                note = Some(TrailingNote {
                    body: parse_rich_text(child),
                });
            }
            _ => {}
        }
    }

    log::debug!(
        "Parsed report markup: {} blocks, note: {}",
        blocks.len(),
        note.is_some(),
    );

    Ok(ReportSource { blocks, note })
}

pub fn parse(path: &Path) -> Result<ReportSource, Error> {
    let text = std::fs::read_to_string(path).map_err(|e| match e.kind() {
        std::io::ErrorKind::NotFound | std::io::ErrorKind::PermissionDenied => Error::Io(
            std::io::Error::new(e.kind(), format!("{}: {}", e, path.display())),
        ),
        _ => Error::Io(e),
    })?;
    parse_str(&text)
}
