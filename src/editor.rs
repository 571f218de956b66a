use tracing::debug;

use crate::document::{Document, NodePath};

mod content;
mod cursor;
mod dispatch;
mod inspect;
mod structure;

pub use cursor::{Bias, Caret, CaretRequest, CaretService};
pub use dispatch::{Command, Dispatch, LIST_TRIGGER, dispatch, enclosing_item};
pub use inspect::breadcrumbs_for_node;

use content::{insert_char_at, remove_char_at};
use inspect::content_nodes;
use structure::{merge_paragraph_backward, split_item, split_paragraph};

/// A document plus the caret editing it.
///
/// Structural list commands go through [`dispatch`]; when the engine declines
/// a command the editor falls back to plain text editing.
pub struct DocumentEditor {
    document: Document,
    cursor: Caret,
}

impl DocumentEditor {
    pub fn new(mut document: Document) -> Self {
        document.prune_empty_lists();
        document.ensure_initialized();
        // Every remaining block has at least one content node.
        let cursor = Caret::at_start(content_nodes(&document)[0]);
        Self { document, cursor }
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    /// Applies a logical command. Returns whether the document changed.
    pub fn apply(&mut self, command: Command) -> bool {
        let at = self.cursor.clone();
        match dispatch(&mut self.document, command, &at, &mut self.cursor) {
            Dispatch::Handled => true,
            Dispatch::Declined => self.apply_default(command),
        }
    }

    fn apply_default(&mut self, command: Command) -> bool {
        debug!(?command, "applying default editing behaviour");
        match command {
            Command::ConvertTrigger => self.insert_char(' '),
            Command::Split | Command::ExitOrNewline => self.insert_paragraph_break(),
            Command::DeleteBackward => self.backspace(),
            Command::Indent | Command::Unindent => false,
        }
    }

    pub fn insert_char(&mut self, ch: char) -> bool {
        let Some(path) = self.document.locate(self.cursor.node) else {
            return false;
        };
        let offset = self.cursor.offset;
        let Some(text) = self.document.text_mut(&path) else {
            return false;
        };
        insert_char_at(text, offset, ch);
        self.cursor.offset += 1;
        true
    }

    pub fn insert_text(&mut self, text: &str) -> bool {
        let mut changed = false;
        for ch in text.chars() {
            changed |= self.insert_char(ch);
        }
        changed
    }

    /// Removes the char before the caret. At the start of a paragraph that
    /// follows another paragraph, the two are joined.
    pub fn backspace(&mut self) -> bool {
        let Some(path) = self.document.locate(self.cursor.node) else {
            return false;
        };
        if self.cursor.offset == 0 {
            let NodePath::Paragraph(block) = path else {
                return false;
            };
            let Some(caret) = merge_paragraph_backward(&mut self.document, block) else {
                return false;
            };
            self.cursor = caret;
            return true;
        }
        let offset = self.cursor.offset - 1;
        let Some(text) = self.document.text_mut(&path) else {
            return false;
        };
        if remove_char_at(text, offset) {
            self.cursor.offset = offset;
            true
        } else {
            false
        }
    }

    /// Breaks the current node at the caret: paragraphs become two
    /// paragraphs, list items two sibling items.
    pub fn insert_paragraph_break(&mut self) -> bool {
        let Some(path) = self.document.locate(self.cursor.node) else {
            return false;
        };
        match path {
            NodePath::Paragraph(block) => {
                match split_paragraph(&mut self.document, block, self.cursor.offset) {
                    Some(caret) => {
                        self.cursor = caret;
                        true
                    }
                    None => false,
                }
            }
            NodePath::Item(item) => match split_item(&mut self.document, &item, self.cursor.offset) {
                Some(request) => {
                    request.apply(&self.document, &mut self.cursor);
                    true
                }
                None => false,
            },
        }
    }

    pub fn cursor_breadcrumbs(&self) -> Option<Vec<String>> {
        breadcrumbs_for_node(&self.document, self.cursor.node)
    }
}

#[cfg(test)]
#[path = "editor_tests.rs"]
mod editor_tests;
