use tracing::debug;

use crate::document::{Document, ItemPath, NodePath};

use super::content::normalized_content;
use super::cursor::{Caret, CaretService};
use super::structure::{
    convert_paragraph_into_list, delete_empty_item, exit_list, indent_item, split_item,
    unindent_item,
};

/// Token that turns a paragraph into a list when followed by a space.
pub const LIST_TRIGGER: &str = "/-";

/// Logical editing commands derived from raw key input.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Command {
    /// A space typed into the current block.
    ConvertTrigger,
    Indent,
    Unindent,
    /// Break the current item into two items at the caret.
    Split,
    /// Enter: leave the list on an empty item, otherwise split.
    ExitOrNewline,
    DeleteBackward,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Dispatch {
    /// The tree was rewritten and the caret placed.
    Handled,
    /// Nothing changed; the caller's default behaviour applies.
    Declined,
}

/// The list item the caret sits in, if any.
pub fn enclosing_item(document: &Document, at: &Caret) -> Option<ItemPath> {
    match document.locate(at.node)? {
        NodePath::Item(path) => Some(path),
        NodePath::Paragraph(_) => None,
    }
}

/// Runs one command against the tree.
///
/// On [`Dispatch::Handled`] the caret service has been called exactly once,
/// after all structural edits and cleanup finished.
pub fn dispatch(
    document: &mut Document,
    command: Command,
    at: &Caret,
    caret: &mut impl CaretService,
) -> Dispatch {
    let request = match command {
        Command::ConvertTrigger => match document.locate(at.node) {
            Some(NodePath::Paragraph(block)) if is_list_trigger(document, block) => {
                convert_paragraph_into_list(document, block)
            }
            _ => None,
        },
        _ => {
            let Some(item) = enclosing_item(document, at) else {
                debug!(?command, "no enclosing list item; declining");
                return Dispatch::Declined;
            };
            let is_empty = document.item(&item).is_some_and(|item| item.is_empty());
            match command {
                Command::Indent => indent_item(document, &item),
                Command::Unindent => unindent_item(document, &item),
                Command::Split => split_item(document, &item, at.offset),
                Command::ExitOrNewline if is_empty => exit_list(document, &item),
                Command::ExitOrNewline => split_item(document, &item, at.offset),
                Command::DeleteBackward if is_empty => delete_empty_item(document, &item),
                Command::DeleteBackward | Command::ConvertTrigger => None,
            }
        }
    };

    let Some(request) = request else {
        return Dispatch::Declined;
    };
    document.ensure_initialized();
    debug!(?command, node = ?request.node, bias = ?request.bias, "command handled");
    request.apply(document, caret);
    Dispatch::Handled
}

fn is_list_trigger(document: &Document, block: usize) -> bool {
    document
        .paragraph(block)
        .is_some_and(|paragraph| normalized_content(&paragraph.text) == LIST_TRIGGER)
}

#[cfg(test)]
#[path = "dispatch_tests.rs"]
mod dispatch_tests;
