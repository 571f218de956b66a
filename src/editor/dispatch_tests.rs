use super::*;
use crate::document::{Block, List, ListItem, ListPath, NodeId, Paragraph};
use crate::editor::cursor::Bias;

#[derive(Default)]
struct RecordingCaret {
    placements: Vec<(NodeId, Bias)>,
}

impl CaretService for RecordingCaret {
    fn place_start(&mut self, _document: &Document, node: NodeId) {
        self.placements.push((node, Bias::Start));
    }

    fn place_end(&mut self, _document: &Document, node: NodeId) {
        self.placements.push((node, Bias::End));
    }
}

fn list_document(items: &[&str]) -> Document {
    let items = items.iter().map(|text| ListItem::new(*text)).collect();
    Document::new().with_blocks(vec![Block::List(List::with_items(items))])
}

fn caret_on_item(document: &Document, index: usize, offset: usize) -> Caret {
    let id = document
        .item(&ListPath::root(0).item(index))
        .map(ListItem::id)
        .expect("item exists");
    Caret::new(id, offset)
}

#[test]
fn trigger_converts_paragraph_and_places_caret_once() {
    let mut document = Document::new().with_blocks(vec![Block::Paragraph(Paragraph::new("/-"))]);
    let at = Caret::at_start(document.paragraph(0).map(Paragraph::id).expect("paragraph"));
    let mut caret = RecordingCaret::default();

    let outcome = dispatch(&mut document, Command::ConvertTrigger, &at, &mut caret);

    assert_eq!(outcome, Dispatch::Handled);
    assert_eq!(document.outline(), "- \n");
    let item_id = document
        .item(&ListPath::root(0).item(0))
        .map(ListItem::id)
        .expect("new item");
    assert_eq!(caret.placements, vec![(item_id, Bias::Start)]);
}

#[test]
fn trigger_accepts_surrounding_non_breaking_spaces() {
    let mut document =
        Document::new().with_blocks(vec![Block::Paragraph(Paragraph::new("\u{00A0}/-"))]);
    let at = Caret::at_start(document.paragraph(0).map(Paragraph::id).expect("paragraph"));
    let mut caret = RecordingCaret::default();

    assert_eq!(
        dispatch(&mut document, Command::ConvertTrigger, &at, &mut caret),
        Dispatch::Handled
    );
}

#[test]
fn trigger_ignores_paragraphs_with_other_content() {
    let mut document =
        Document::new().with_blocks(vec![Block::Paragraph(Paragraph::new("a /-"))]);
    let at = Caret::at_start(document.paragraph(0).map(Paragraph::id).expect("paragraph"));
    let mut caret = RecordingCaret::default();

    let outcome = dispatch(&mut document, Command::ConvertTrigger, &at, &mut caret);

    assert_eq!(outcome, Dispatch::Declined);
    assert_eq!(document.outline(), "a /-\n");
    assert!(caret.placements.is_empty());
}

#[test]
fn trigger_inside_list_item_is_declined() {
    let mut document = list_document(&["/-"]);
    let at = caret_on_item(&document, 0, 2);
    let mut caret = RecordingCaret::default();

    assert_eq!(
        dispatch(&mut document, Command::ConvertTrigger, &at, &mut caret),
        Dispatch::Declined
    );
    assert_eq!(document.outline(), "- /-\n");
}

#[test]
fn list_commands_outside_list_are_declined_without_changes() {
    let mut document = Document::new().with_blocks(vec![Block::Paragraph(Paragraph::new(""))]);
    let at = Caret::at_start(document.paragraph(0).map(Paragraph::id).expect("paragraph"));
    let mut caret = RecordingCaret::default();

    for command in [
        Command::Indent,
        Command::Unindent,
        Command::Split,
        Command::ExitOrNewline,
        Command::DeleteBackward,
    ] {
        assert_eq!(
            dispatch(&mut document, command, &at, &mut caret),
            Dispatch::Declined,
            "{command:?} should be declined"
        );
    }
    assert_eq!(document.outline(), "\n");
    assert!(caret.placements.is_empty());
}

#[test]
fn unknown_caret_node_is_declined() {
    let mut document = list_document(&["A"]);
    let stray = Caret::at_start(ListItem::new("detached").id());
    let mut caret = RecordingCaret::default();

    assert_eq!(
        dispatch(&mut document, Command::Indent, &stray, &mut caret),
        Dispatch::Declined
    );
}

#[test]
fn enter_on_empty_item_exits_and_on_filled_item_splits() {
    let mut document = list_document(&["Alpha", ""]);
    let mut caret = RecordingCaret::default();

    let at = caret_on_item(&document, 0, 5);
    assert_eq!(
        dispatch(&mut document, Command::ExitOrNewline, &at, &mut caret),
        Dispatch::Handled
    );
    assert_eq!(document.outline(), "- Alpha\n- \n- \n");

    let at = caret_on_item(&document, 2, 0);
    assert_eq!(
        dispatch(&mut document, Command::ExitOrNewline, &at, &mut caret),
        Dispatch::Handled
    );
    assert_eq!(document.outline(), "- Alpha\n- \n\n");
    assert_eq!(caret.placements.len(), 2);
}

#[test]
fn delete_backward_only_acts_on_empty_items() {
    let mut document = list_document(&["A", "\u{00A0}"]);
    let mut caret = RecordingCaret::default();

    let at = caret_on_item(&document, 0, 0);
    assert_eq!(
        dispatch(&mut document, Command::DeleteBackward, &at, &mut caret),
        Dispatch::Declined
    );

    let at = caret_on_item(&document, 1, 0);
    assert_eq!(
        dispatch(&mut document, Command::DeleteBackward, &at, &mut caret),
        Dispatch::Handled
    );
    assert_eq!(document.outline(), "- A\n");
    let a_id = caret_on_item(&document, 0, 0).node;
    assert_eq!(caret.placements, vec![(a_id, Bias::End)]);
}

#[test]
fn indent_and_unindent_place_caret_at_item_end() {
    let mut document = list_document(&["A", "B"]);
    let at = caret_on_item(&document, 1, 0);
    let mut caret = RecordingCaret::default();

    dispatch(&mut document, Command::Indent, &at, &mut caret);
    dispatch(&mut document, Command::Unindent, &at, &mut caret);

    assert_eq!(document.outline(), "- A\n- B\n");
    assert_eq!(caret.placements, vec![(at.node, Bias::End), (at.node, Bias::End)]);
}
