//! The block tree edited by the list engine.
//!
//! A [`Document`] is an ordered sequence of [`Block`]s. A block is either a
//! [`Paragraph`] or a [`List`]; list items may own one nested [`List`]. Ownership
//! is strictly hierarchical, so "who owns this list" is always answered from the
//! position of the list in the tree ([`owner_item`], [`root_list`]) and never
//! from a stored back pointer.

use std::sync::atomic::{AtomicU64, Ordering};

static NEXT_NODE_ID: AtomicU64 = AtomicU64::new(1);

/// Identity of a content-bearing node (a paragraph or a list item).
///
/// Ids are handed out once per created node and never reused, so a caret that
/// refers to a node by id stays valid while the node moves around the tree.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(u64);

impl NodeId {
    fn next() -> Self {
        Self(NEXT_NODE_ID.fetch_add(1, Ordering::Relaxed))
    }
}

/// Returns true when `text` contains nothing but whitespace. Non-breaking
/// spaces count as whitespace.
pub fn is_blank(text: &str) -> bool {
    text.chars().all(|ch| ch == '\u{00A0}' || ch.is_whitespace())
}

#[derive(Clone, Debug)]
pub struct Paragraph {
    id: NodeId,
    pub text: String,
}

impl Paragraph {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            id: NodeId::next(),
            text: text.into(),
        }
    }

    pub fn empty() -> Self {
        Self::new("")
    }

    pub fn id(&self) -> NodeId {
        self.id
    }

    pub fn is_blank(&self) -> bool {
        is_blank(&self.text)
    }
}

#[derive(Clone, Debug)]
pub struct ListItem {
    id: NodeId,
    pub text: String,
    pub sublist: Option<List>,
}

impl ListItem {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            id: NodeId::next(),
            text: text.into(),
            sublist: None,
        }
    }

    pub fn empty() -> Self {
        Self::new("")
    }

    pub fn with_sublist(mut self, sublist: List) -> Self {
        self.sublist = Some(sublist);
        self
    }

    pub fn id(&self) -> NodeId {
        self.id
    }

    /// Inline content only; the sublist is not consulted.
    pub fn is_blank(&self) -> bool {
        is_blank(&self.text)
    }

    /// Blank inline content and nothing but empty items below it.
    pub fn is_empty(&self) -> bool {
        self.is_blank()
            && self
                .sublist
                .as_ref()
                .map_or(true, |list| list.items.iter().all(ListItem::is_empty))
    }

    /// An item without a sublist, or whose sublist has no items.
    pub fn is_leaf(&self) -> bool {
        self.sublist.as_ref().map_or(true, List::is_empty)
    }
}

#[derive(Clone, Debug, Default)]
pub struct List {
    pub items: Vec<ListItem>,
}

impl List {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_items(items: Vec<ListItem>) -> Self {
        Self { items }
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

#[derive(Clone, Debug)]
pub enum Block {
    Paragraph(Paragraph),
    List(List),
}

impl Block {
    pub fn as_list(&self) -> Option<&List> {
        match self {
            Block::List(list) => Some(list),
            Block::Paragraph(_) => None,
        }
    }

    pub fn as_paragraph(&self) -> Option<&Paragraph> {
        match self {
            Block::Paragraph(paragraph) => Some(paragraph),
            Block::List(_) => None,
        }
    }
}

/// Position of a list: the block index of its root list followed by the item
/// indices walked down through sublists.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct ListPath {
    block: usize,
    items: Vec<usize>,
}

impl ListPath {
    pub fn root(block: usize) -> Self {
        Self {
            block,
            items: Vec::new(),
        }
    }

    pub fn block(&self) -> usize {
        self.block
    }

    /// Nesting depth, zero for a root list.
    pub fn depth(&self) -> usize {
        self.items.len()
    }

    pub fn item(&self, index: usize) -> ItemPath {
        ItemPath {
            list: self.clone(),
            index,
        }
    }

    pub(crate) fn steps(&self) -> &[usize] {
        &self.items
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct ItemPath {
    list: ListPath,
    index: usize,
}

impl ItemPath {
    pub fn list(&self) -> &ListPath {
        &self.list
    }

    pub fn index(&self) -> usize {
        self.index
    }

    /// Path of the list this item owns (whether or not it exists yet).
    pub fn sublist(&self) -> ListPath {
        let mut items = self.list.items.clone();
        items.push(self.index);
        ListPath {
            block: self.list.block,
            items,
        }
    }

    pub fn previous_sibling(&self) -> Option<ItemPath> {
        let index = self.index.checked_sub(1)?;
        Some(self.list.item(index))
    }

    pub fn next_sibling(&self) -> ItemPath {
        self.list.item(self.index + 1)
    }
}

/// Position of a content-bearing node.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum NodePath {
    Paragraph(usize),
    Item(ItemPath),
}

/// The item whose direct sublist is `list`, or `None` for a root list.
pub fn owner_item(list: &ListPath) -> Option<ItemPath> {
    let (&index, prefix) = list.items.split_last()?;
    Some(ItemPath {
        list: ListPath {
            block: list.block,
            items: prefix.to_vec(),
        },
        index,
    })
}

/// The topmost list in the ownership chain of `list`.
pub fn root_list(list: &ListPath) -> ListPath {
    let mut current = list.clone();
    while let Some(owner) = owner_item(&current) {
        current = owner.list;
    }
    current
}

fn prune_sublists(list: &mut List) {
    for item in &mut list.items {
        if let Some(sublist) = item.sublist.as_mut() {
            prune_sublists(sublist);
        }
        if item.sublist.as_ref().is_some_and(List::is_empty) {
            item.sublist = None;
        }
    }
}

#[derive(Clone, Debug, Default)]
pub struct Document {
    pub blocks: Vec<Block>,
}

impl Document {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_blocks(mut self, blocks: Vec<Block>) -> Self {
        self.blocks = blocks;
        self
    }

    pub fn blocks(&self) -> &[Block] {
        &self.blocks
    }

    /// An empty document is represented by a single empty paragraph.
    pub fn ensure_initialized(&mut self) {
        if self.blocks.is_empty() {
            self.blocks.push(Block::Paragraph(Paragraph::empty()));
        }
    }

    /// Drops every list without items, nested ones included.
    pub fn prune_empty_lists(&mut self) {
        for block in &mut self.blocks {
            if let Block::List(list) = block {
                prune_sublists(list);
            }
        }
        self.blocks
            .retain(|block| block.as_list().is_none_or(|list| !list.is_empty()));
    }

    pub fn paragraph(&self, block: usize) -> Option<&Paragraph> {
        self.blocks.get(block)?.as_paragraph()
    }

    pub fn paragraph_mut(&mut self, block: usize) -> Option<&mut Paragraph> {
        match self.blocks.get_mut(block)? {
            Block::Paragraph(paragraph) => Some(paragraph),
            Block::List(_) => None,
        }
    }

    pub fn list(&self, path: &ListPath) -> Option<&List> {
        let mut list = self.blocks.get(path.block)?.as_list()?;
        for &idx in &path.items {
            list = list.items.get(idx)?.sublist.as_ref()?;
        }
        Some(list)
    }

    pub fn list_mut(&mut self, path: &ListPath) -> Option<&mut List> {
        let mut list = match self.blocks.get_mut(path.block)? {
            Block::List(list) => list,
            Block::Paragraph(_) => return None,
        };
        for &idx in &path.items {
            list = list.items.get_mut(idx)?.sublist.as_mut()?;
        }
        Some(list)
    }

    pub fn item(&self, path: &ItemPath) -> Option<&ListItem> {
        self.list(&path.list)?.items.get(path.index)
    }

    pub fn item_mut(&mut self, path: &ItemPath) -> Option<&mut ListItem> {
        self.list_mut(&path.list)?.items.get_mut(path.index)
    }

    pub fn text(&self, path: &NodePath) -> Option<&str> {
        match path {
            NodePath::Paragraph(block) => self.paragraph(*block).map(|p| p.text.as_str()),
            NodePath::Item(item) => self.item(item).map(|item| item.text.as_str()),
        }
    }

    pub fn text_mut(&mut self, path: &NodePath) -> Option<&mut String> {
        match path {
            NodePath::Paragraph(block) => self.paragraph_mut(*block).map(|p| &mut p.text),
            NodePath::Item(item) => self.item_mut(item).map(|item| &mut item.text),
        }
    }

    /// Current position of the node with the given id.
    pub fn locate(&self, id: NodeId) -> Option<NodePath> {
        for (block_index, block) in self.blocks.iter().enumerate() {
            match block {
                Block::Paragraph(paragraph) if paragraph.id == id => {
                    return Some(NodePath::Paragraph(block_index));
                }
                Block::Paragraph(_) => {}
                Block::List(list) => {
                    if let Some(path) = locate_in_list(list, ListPath::root(block_index), id) {
                        return Some(NodePath::Item(path));
                    }
                }
            }
        }
        None
    }

    pub fn contains(&self, id: NodeId) -> bool {
        self.locate(id).is_some()
    }

    /// Plain-text rendering of the tree: paragraphs as bare lines, list items
    /// as `- ` bullets indented by two spaces per nesting level.
    pub fn outline(&self) -> String {
        let mut out = String::new();
        for block in &self.blocks {
            match block {
                Block::Paragraph(paragraph) => {
                    out.push_str(&paragraph.text);
                    out.push('\n');
                }
                Block::List(list) => write_outline_list(list, 0, &mut out),
            }
        }
        out
    }
}

fn locate_in_list(list: &List, path: ListPath, id: NodeId) -> Option<ItemPath> {
    for (index, item) in list.items.iter().enumerate() {
        let item_path = path.item(index);
        if item.id == id {
            return Some(item_path);
        }
        if let Some(sublist) = &item.sublist {
            if let Some(found) = locate_in_list(sublist, item_path.sublist(), id) {
                return Some(found);
            }
        }
    }
    None
}

fn write_outline_list(list: &List, depth: usize, out: &mut String) {
    for item in &list.items {
        out.push_str(&"  ".repeat(depth));
        out.push_str("- ");
        out.push_str(&item.text);
        out.push('\n');
        if let Some(sublist) = &item.sublist {
            write_outline_list(sublist, depth + 1, out);
        }
    }
}

#[cfg(test)]
#[path = "document_tests.rs"]
mod document_tests;
