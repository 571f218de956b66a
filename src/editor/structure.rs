use tracing::{debug, trace};

use crate::document::{
    Block, Document, ItemPath, List, ListItem, ListPath, NodeId, Paragraph, owner_item, root_list,
};

use super::Caret;
use super::content::{char_len, split_text_at};
use super::cursor::CaretRequest;

// ============================================================================
// Cleanup pass
// ============================================================================

#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) enum Settled {
    Intact,
    Trimmed { owner: ItemPath },
    // `at` is where the last removed owner used to be.
    Collapsed { at: ItemPath },
    Vanished { block: usize },
}

pub(crate) fn cleanup_upwards(document: &mut Document, list: &ListPath) -> Settled {
    let mut current = list.clone();
    let mut settled = Settled::Intact;
    loop {
        match document.list(&current) {
            Some(list) if list.is_empty() => {}
            _ => return settled,
        }
        let owner = owner_item(&current);
        detach_list(document, &current);
        trace!(block = current.block(), depth = current.depth(), "removed empty list");

        let Some(owner) = owner else {
            return Settled::Vanished {
                block: current.block(),
            };
        };
        let owner_is_empty = document.item(&owner).is_some_and(ListItem::is_empty);
        if !owner_is_empty {
            return Settled::Trimmed { owner };
        }
        take_item(document, &owner);
        trace!(index = owner.index(), "removed empty owner item");
        current = owner.list().clone();
        settled = Settled::Collapsed { at: owner };
    }
}

fn detach_list(document: &mut Document, path: &ListPath) {
    match owner_item(path) {
        Some(owner) => {
            if let Some(item) = document.item_mut(&owner) {
                item.sublist = None;
            }
        }
        None => {
            if matches!(document.blocks.get(path.block()), Some(Block::List(_))) {
                document.blocks.remove(path.block());
            }
        }
    }
}

pub(crate) fn take_item(document: &mut Document, path: &ItemPath) -> Option<ListItem> {
    let list = document.list_mut(path.list())?;
    if path.index() >= list.items.len() {
        return None;
    }
    Some(list.items.remove(path.index()))
}

// ============================================================================
// List creation
// ============================================================================

pub(crate) fn convert_paragraph_into_list(
    document: &mut Document,
    block: usize,
) -> Option<CaretRequest> {
    let slot = document.blocks.get_mut(block)?;
    if !matches!(slot, Block::Paragraph(_)) {
        return None;
    }
    let item = ListItem::empty();
    let id = item.id();
    *slot = Block::List(List::with_items(vec![item]));
    debug!(block, "converted paragraph into list");
    Some(CaretRequest::start(id))
}

// ============================================================================
// Indent / unindent
// ============================================================================

pub(crate) fn indent_item(document: &mut Document, path: &ItemPath) -> Option<CaretRequest> {
    let list = document.list_mut(path.list())?;
    if path.index() >= list.items.len() {
        return None;
    }
    let item = list.items.remove(path.index());
    let id = item.id();

    if let Some(previous) = path.previous_sibling() {
        list.items[previous.index()]
            .sublist
            .get_or_insert_with(List::new)
            .items
            .push(item);
        debug!(index = path.index(), "indented item under previous sibling");
    } else {
        let placeholder = ListItem::empty().with_sublist(List::with_items(vec![item]));
        list.items.insert(0, placeholder);
        debug!("indented topmost item under placeholder");
    }

    Some(CaretRequest::end(id))
}

pub(crate) fn unindent_item(document: &mut Document, path: &ItemPath) -> Option<CaretRequest> {
    document.item(path)?;
    match owner_item(path.list()) {
        Some(owner) => {
            document.list(owner.list())?;
            let item = take_item(document, path)?;
            let id = item.id();
            if let Some(parent) = document.list_mut(owner.list()) {
                let at = (owner.index() + 1).min(parent.items.len());
                parent.items.insert(at, item);
            }
            let settled = cleanup_upwards(document, path.list());
            debug!(?settled, "unindented item next to its owner");
            Some(CaretRequest::end(id))
        }
        None => {
            let ListItem { text, sublist, .. } = take_item(document, path)?;
            let paragraph = Paragraph::new(text);
            let id = paragraph.id();
            let block = path.list().block();
            document.blocks.insert(block + 1, Block::Paragraph(paragraph));
            if let Some(sublist) = sublist.filter(|list| !list.is_empty()) {
                document.blocks.insert(block + 2, Block::List(sublist));
            }
            let settled = cleanup_upwards(document, path.list());
            debug!(?settled, "unindented root item into paragraph");
            Some(CaretRequest::start(id))
        }
    }
}

// ============================================================================
// Exit / delete / split
// ============================================================================

pub(crate) fn exit_list(document: &mut Document, path: &ItemPath) -> Option<CaretRequest> {
    let root = root_list(path.list());
    document.item(path)?;

    let paragraph = Paragraph::empty();
    let id = paragraph.id();
    document
        .blocks
        .insert(root.block() + 1, Block::Paragraph(paragraph));

    take_item(document, path);
    let settled = cleanup_upwards(document, path.list());
    if document.list(&root).is_some_and(List::is_empty) {
        document.blocks.remove(root.block());
    }
    debug!(depth = path.list().depth(), ?settled, "exited list");
    Some(CaretRequest::start(id))
}

pub(crate) fn delete_empty_item(document: &mut Document, path: &ItemPath) -> Option<CaretRequest> {
    document.item(path)?;
    let next = document.item(&path.next_sibling()).map(ListItem::id);
    let owner = owner_item(path.list())
        .and_then(|owner| document.item(&owner))
        .map(ListItem::id);

    take_item(document, path);
    let settled = cleanup_upwards(document, path.list());
    debug!(index = path.index(), ?settled, "deleted empty item");

    // Next sibling, then owner, then whatever the cleanup left behind.
    if let Some(next) = next.filter(|id| document.contains(*id)) {
        return Some(CaretRequest::start(next));
    }
    if let Some(owner) = owner.filter(|id| document.contains(*id)) {
        return Some(CaretRequest::end(owner));
    }

    let request = match settled {
        Settled::Vanished { block } => {
            let paragraph = Paragraph::empty();
            let id = paragraph.id();
            let at = block.min(document.blocks.len());
            document.blocks.insert(at, Block::Paragraph(paragraph));
            Some(CaretRequest::start(id))
        }
        Settled::Trimmed { owner } => document
            .item(&owner)
            .map(|item| CaretRequest::end(item.id())),
        Settled::Collapsed { at } => neighbour_of_removed(document, &at),
        Settled::Intact => neighbour_of_removed(document, path),
    };
    Some(request.unwrap_or_else(|| first_node_request(document)))
}

fn neighbour_of_removed(document: &Document, hole: &ItemPath) -> Option<CaretRequest> {
    let list = document.list(hole.list())?;
    if let Some(item) = list.items.get(hole.index()) {
        return Some(CaretRequest::start(item.id()));
    }
    let previous = list.items.get(hole.index().checked_sub(1)?)?;
    Some(CaretRequest::end(previous.id()))
}

fn first_node_request(document: &mut Document) -> CaretRequest {
    document.ensure_initialized();
    let id = match &document.blocks[0] {
        Block::Paragraph(paragraph) => Some(paragraph.id()),
        Block::List(list) => list.items.first().map(ListItem::id),
    };
    match id {
        Some(id) => CaretRequest::start(id),
        None => {
            let paragraph = Paragraph::empty();
            let id = paragraph.id();
            document.blocks[0] = Block::Paragraph(paragraph);
            CaretRequest::start(id)
        }
    }
}

pub(crate) fn split_item(
    document: &mut Document,
    path: &ItemPath,
    offset: usize,
) -> Option<CaretRequest> {
    let list = document.list_mut(path.list())?;
    let item = list.items.get_mut(path.index())?;
    let tail = split_text_at(&mut item.text, offset);
    let mut sibling = ListItem::new(tail);
    sibling.sublist = item.sublist.take();
    let id = sibling.id();
    list.items.insert(path.index() + 1, sibling);
    debug!(index = path.index(), offset, "split item");
    Some(CaretRequest::start(id))
}

// ============================================================================
// Paragraph edits (default behaviour outside lists)
// ============================================================================

pub(crate) fn split_paragraph(document: &mut Document, block: usize, offset: usize) -> Option<Caret> {
    let paragraph = document.paragraph_mut(block)?;
    let tail = split_text_at(&mut paragraph.text, offset);
    let next = Paragraph::new(tail);
    let id = next.id();
    document.blocks.insert(block + 1, Block::Paragraph(next));
    Some(Caret::at_start(id))
}

pub(crate) fn merge_paragraph_backward(document: &mut Document, block: usize) -> Option<Caret> {
    let previous_block = block.checked_sub(1)?;
    document.paragraph(block)?;
    let previous: NodeId = document.paragraph(previous_block)?.id();
    let Block::Paragraph(current) = document.blocks.remove(block) else {
        return None;
    };
    let target = document.paragraph_mut(previous_block)?;
    let joint = char_len(&target.text);
    target.text.push_str(&current.text);
    Some(Caret::new(previous, joint))
}

#[cfg(test)]
#[path = "structure_tests.rs"]
mod structure_tests;
