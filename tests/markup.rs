use pageplan::Error;
use pageplan::markup::parse_str;
use pageplan::model::{ParagraphKind, Run};

const FULL_REPORT: &str = r#"
<report>
  <block>
    <header>Intake summary</header>
    <body>
      <p>Client arrived <b>on time</b> and <i>engaged</i> throughout.</p>
      <h2>Observations</h2>
      <ul>
        <li>Sleep improved</li>
        <li>Appetite <u>stable</u></li>
      </ul>
      <ol>
        <li>Continue plan</li>
      </ol>
    </body>
  </block>
  <block>
    <header>Next steps</header>
    <body><p>See <a href="https://example.org/plan">the plan</a>.<br/>Review in two weeks.</p></body>
  </block>
  <note><p>This report is confidential.</p></note>
</report>
"#;

fn joined_text(runs: &[Run]) -> String {
    runs.iter().map(|r| r.text.as_str()).collect()
}

#[test]
fn parses_blocks_and_note() {
    let report = parse_str(FULL_REPORT).unwrap();
    assert_eq!(report.blocks.len(), 2);

    let note = report.note.expect("note parsed");
    assert_eq!(note.body.paragraphs.len(), 1);
    assert_eq!(
        joined_text(&note.body.paragraphs[0].runs),
        "This report is confidential."
    );
}

#[test]
fn header_text_becomes_an_implicit_paragraph() {
    let report = parse_str(FULL_REPORT).unwrap();
    let header = &report.blocks[0].header;
    assert_eq!(header.paragraphs.len(), 1);
    assert_eq!(header.paragraphs[0].kind, ParagraphKind::Body);
    assert_eq!(joined_text(&header.paragraphs[0].runs), "Intake summary");
}

#[test]
fn inline_formatting_is_tracked_per_run() {
    let report = parse_str(FULL_REPORT).unwrap();
    let para = &report.blocks[0].body.paragraphs[0];

    let bold = para.runs.iter().find(|r| r.bold).expect("bold run");
    assert_eq!(bold.text, "on time");
    let italic = para.runs.iter().find(|r| r.italic).expect("italic run");
    assert_eq!(italic.text, "engaged");
    assert!(para.runs.iter().any(|r| !r.bold && !r.italic));
}

#[test]
fn headings_and_lists_keep_their_kind() {
    let report = parse_str(FULL_REPORT).unwrap();
    let paragraphs = &report.blocks[0].body.paragraphs;

    assert!(
        paragraphs
            .iter()
            .any(|p| p.kind == ParagraphKind::Heading(2))
    );
    let unordered: Vec<_> = paragraphs
        .iter()
        .filter(|p| p.kind == ParagraphKind::ListItem { ordered: false })
        .collect();
    assert_eq!(unordered.len(), 2);
    assert!(
        unordered[1].runs.iter().any(|r| r.underline),
        "underline survives inside a list item"
    );
    assert!(
        paragraphs
            .iter()
            .any(|p| p.kind == ParagraphKind::ListItem { ordered: true })
    );
}

#[test]
fn links_and_hard_breaks() {
    let report = parse_str(FULL_REPORT).unwrap();
    let para = &report.blocks[1].body.paragraphs[0];

    let link = para
        .runs
        .iter()
        .find(|r| r.hyperlink_url.is_some())
        .expect("link run");
    assert_eq!(link.text, "the plan");
    assert_eq!(link.hyperlink_url.as_deref(), Some("https://example.org/plan"));
    assert!(
        para.runs.iter().any(|r| r.text == "\n"),
        "br becomes a hard break run"
    );
}

#[test]
fn nested_formatting_accumulates() {
    let report = parse_str("<report><block><body><p><b><i>both</i></b></p></body></block></report>")
        .unwrap();
    let run = &report.blocks[0].body.paragraphs[0].runs[0];
    assert!(run.bold && run.italic);
    assert_eq!(run.text, "both");
}

#[test]
fn unknown_elements_keep_their_text() {
    let report = parse_str(
        "<report><block><body><callout>Keep this</callout><p>And this</p></body></block></report>",
    )
    .unwrap();
    let paragraphs = &report.blocks[0].body.paragraphs;
    assert_eq!(paragraphs.len(), 2);
    assert_eq!(joined_text(&paragraphs[0].runs), "Keep this");
}

#[test]
fn loose_inline_content_forms_a_paragraph() {
    let report =
        parse_str("<report><block><body>Bare <b>text</b> works</body></block></report>").unwrap();
    let paragraphs = &report.blocks[0].body.paragraphs;
    assert_eq!(paragraphs.len(), 1);
    assert_eq!(joined_text(&paragraphs[0].runs), "Bare text works");
}

#[test]
fn empty_report_is_valid() {
    let report = parse_str("<report></report>").unwrap();
    assert!(report.blocks.is_empty());
    assert!(report.note.is_none());
}

#[test]
fn missing_root_is_rejected() {
    let err = parse_str("<document><block/></document>").unwrap_err();
    assert!(matches!(err, Error::InvalidMarkup(_)));
}

#[test]
fn malformed_markup_is_rejected() {
    let err = parse_str("<report><block>").unwrap_err();
    assert!(matches!(err, Error::InvalidMarkup(_)));
}
