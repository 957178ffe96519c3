//! Walking the previous tree for reusable subtrees.

use numscript_tables::{Language, StateId};

use crate::lexer::Token;
use crate::scanner::ScannerState;
use crate::tree::GreenNode;

struct Entry {
    /// Parent whose children are being walked.
    node: GreenNode,
    /// Start offset of `node.children()[index]`.
    start: usize,
    index: usize,
}

/// Cursor over an edited tree, moving forward only. Offsets are in the
/// coordinates of the new text.
pub struct ReuseCursor {
    stack: Vec<Entry>,
}

impl ReuseCursor {
    pub fn new(root: &GreenNode) -> Self {
        let mut cursor = Self { stack: Vec::new() };
        if !root.children().is_empty() {
            cursor.stack.push(Entry {
                node: root.clone(),
                start: 0,
                index: 0,
            });
        }
        cursor
    }

    fn current(&self) -> Option<(GreenNode, usize)> {
        let top = self.stack.last()?;
        let child = top.node.children().get(top.index)?;
        Some((child.node.clone(), top.start))
    }

    /// Outermost node starting exactly at `position`, skipping everything
    /// that ends at or before it. `None` when the next node starts later.
    pub fn candidate(&mut self, position: usize) -> Option<GreenNode> {
        loop {
            let (node, start) = self.current()?;
            let end = start + node.len();
            if end <= position {
                self.advance();
                continue;
            }
            if start > position {
                return None;
            }
            if start == position {
                return Some(node);
            }
            if !self.descend() {
                self.advance();
            }
        }
    }

    /// Step into the current node. Returns false for nodes without children.
    pub fn descend(&mut self) -> bool {
        let Some((node, start)) = self.current() else {
            return false;
        };
        if node.children().is_empty() {
            return false;
        }
        self.stack.push(Entry {
            node,
            start,
            index: 0,
        });
        true
    }

    /// Move past the current node, climbing out of exhausted parents.
    pub fn advance(&mut self) {
        while let Some(top) = self.stack.last_mut() {
            if let Some(child) = top.node.children().get(top.index) {
                top.start += child.node.len();
                top.index += 1;
            }
            if top.index < top.node.children().len() {
                return;
            }
            self.stack.pop();
        }
    }
}

/// Whether `node` can be pushed in `state` instead of reparsing, given the
/// token just lexed there. Returns the state to go to.
pub fn reusable(
    language: &Language,
    node: &GreenNode,
    state: StateId,
    token: &Token,
    scanner: &ScannerState,
) -> Option<StateId> {
    if node.is_damaged()
        || node.is_fragile()
        || node.has_error()
        || node.is_extra()
        || node.children().is_empty()
    {
        return None;
    }
    if node.parse_state() != state || node.scanner_start() != scanner {
        return None;
    }
    let leaf = node.first_leaf()?;
    if leaf.parse_symbol() != token.symbol || leaf.len() != token.len() {
        return None;
    }
    language.goto(state, node.parse_symbol())
}
