use crate::document::{Document, NodeId};

use super::DocumentEditor;
use super::content::char_len;
use super::inspect::{content_nodes, node_text};

/// Which end of a node's inline content the caret lands on.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Bias {
    Start,
    End,
}

/// Caret location: a content node plus a char offset into its inline text.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Caret {
    pub node: NodeId,
    pub offset: usize,
}

impl Caret {
    pub fn new(node: NodeId, offset: usize) -> Self {
        Self { node, offset }
    }

    pub fn at_start(node: NodeId) -> Self {
        Self::new(node, 0)
    }
}

/// Sets the editing caret to one end of a content node.
///
/// The list engine calls exactly one of these as the final step of every
/// command it handles.
pub trait CaretService {
    fn place_start(&mut self, document: &Document, node: NodeId);
    fn place_end(&mut self, document: &Document, node: NodeId);
}

impl CaretService for Caret {
    fn place_start(&mut self, _document: &Document, node: NodeId) {
        self.node = node;
        self.offset = 0;
    }

    fn place_end(&mut self, document: &Document, node: NodeId) {
        self.node = node;
        self.offset = node_text(document, node).map(char_len).unwrap_or(0);
    }
}

/// Placement produced by a tree mutator, applied once the tree is settled.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CaretRequest {
    pub node: NodeId,
    pub bias: Bias,
}

impl CaretRequest {
    pub fn start(node: NodeId) -> Self {
        Self {
            node,
            bias: Bias::Start,
        }
    }

    pub fn end(node: NodeId) -> Self {
        Self {
            node,
            bias: Bias::End,
        }
    }

    pub fn apply(self, document: &Document, service: &mut impl CaretService) {
        match self.bias {
            Bias::Start => service.place_start(document, self.node),
            Bias::End => service.place_end(document, self.node),
        }
    }
}

impl DocumentEditor {
    pub fn cursor(&self) -> &Caret {
        &self.cursor
    }

    /// Moves the caret to `offset` inside `node`, clamped to the node's text.
    pub fn move_to(&mut self, node: NodeId, offset: usize) -> bool {
        let Some(text) = node_text(&self.document, node) else {
            return false;
        };
        self.cursor = Caret::new(node, offset.min(char_len(text)));
        true
    }

    pub fn move_left(&mut self) -> bool {
        if self.cursor.offset > 0 {
            self.cursor.offset -= 1;
            return true;
        }
        let Some(previous) = self.neighbour_node(-1) else {
            return false;
        };
        let len = node_text(&self.document, previous).map(char_len).unwrap_or(0);
        self.cursor = Caret::new(previous, len);
        true
    }

    pub fn move_right(&mut self) -> bool {
        if self.cursor.offset < self.current_len() {
            self.cursor.offset += 1;
            return true;
        }
        let Some(next) = self.neighbour_node(1) else {
            return false;
        };
        self.cursor = Caret::at_start(next);
        true
    }

    pub fn move_up(&mut self) -> bool {
        let Some(previous) = self.neighbour_node(-1) else {
            return false;
        };
        self.move_to(previous, self.cursor.offset)
    }

    pub fn move_down(&mut self) -> bool {
        let Some(next) = self.neighbour_node(1) else {
            return false;
        };
        self.move_to(next, self.cursor.offset)
    }

    pub fn move_to_node_start(&mut self) {
        self.cursor.offset = 0;
    }

    pub fn move_to_node_end(&mut self) {
        self.cursor.offset = self.current_len();
    }

    pub(crate) fn current_len(&self) -> usize {
        node_text(&self.document, self.cursor.node)
            .map(char_len)
            .unwrap_or(0)
    }

    fn neighbour_node(&self, delta: isize) -> Option<NodeId> {
        let nodes = content_nodes(&self.document);
        let position = nodes.iter().position(|id| *id == self.cursor.node)?;
        let target = position.checked_add_signed(delta)?;
        nodes.get(target).copied()
    }
}

#[cfg(test)]
#[path = "cursor_tests.rs"]
mod cursor_tests;
