use super::*;
use crate::document::{Block, List, ListItem, ListPath, Paragraph};

fn outline_document() -> Document {
    // first
    // - one
    //   - two
    // last
    let one = ListItem::new("one").with_sublist(List::with_items(vec![ListItem::new("two")]));
    Document::new().with_blocks(vec![
        Block::Paragraph(Paragraph::new("first")),
        Block::List(List::with_items(vec![one])),
        Block::Paragraph(Paragraph::new("last")),
    ])
}

fn text_under_cursor(editor: &DocumentEditor) -> String {
    node_text(editor.document(), editor.cursor().node)
        .unwrap_or_default()
        .to_string()
}

#[test]
fn place_end_uses_char_count() {
    let document = Document::new().with_blocks(vec![Block::Paragraph(Paragraph::new("héllo"))]);
    let id = document.paragraph(0).map(Paragraph::id).expect("paragraph");
    let mut caret = Caret::at_start(id);

    caret.place_end(&document, id);
    assert_eq!(caret.offset, 5);

    caret.place_start(&document, id);
    assert_eq!(caret, Caret::at_start(id));
}

#[test]
fn caret_request_applies_requested_bias() {
    let document = outline_document();
    let two_path = ListPath::root(1).item(0).sublist().item(0);
    let two = document.item(&two_path).map(ListItem::id).expect("two");
    let mut caret = Caret::at_start(two);

    CaretRequest::end(two).apply(&document, &mut caret);
    assert_eq!(caret.offset, 3);
    CaretRequest::start(two).apply(&document, &mut caret);
    assert_eq!(caret.offset, 0);
}

#[test]
fn move_right_crosses_into_nested_items() {
    let mut editor = DocumentEditor::new(outline_document());
    editor.move_to_node_end();

    assert!(editor.move_right());
    assert_eq!(text_under_cursor(&editor), "one");
    assert_eq!(editor.cursor().offset, 0);

    editor.move_to_node_end();
    assert!(editor.move_right());
    assert_eq!(text_under_cursor(&editor), "two");
}

#[test]
fn move_left_lands_at_end_of_previous_node() {
    let mut editor = DocumentEditor::new(outline_document());
    assert!(editor.move_down());
    assert_eq!(text_under_cursor(&editor), "one");

    assert!(editor.move_left());
    assert_eq!(text_under_cursor(&editor), "first");
    assert_eq!(editor.cursor().offset, 5);
}

#[test]
fn vertical_moves_clamp_offset_and_stop_at_edges() {
    let mut editor = DocumentEditor::new(outline_document());
    editor.move_to_node_end();

    assert!(!editor.move_up());
    assert!(editor.move_down());
    assert!(editor.move_down());
    assert_eq!(text_under_cursor(&editor), "two");
    assert_eq!(editor.cursor().offset, 3);
    assert!(editor.move_down());
    assert_eq!(text_under_cursor(&editor), "last");
    assert!(!editor.move_down());
}

#[test]
fn move_to_rejects_unknown_nodes() {
    let mut editor = DocumentEditor::new(outline_document());
    let stranger = ListItem::new("elsewhere");

    assert!(!editor.move_to(stranger.id(), 0));
    assert_eq!(text_under_cursor(&editor), "first");
}
