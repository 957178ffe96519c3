//! Text edits and their effect on an existing tree.
//!
//! Applying an edit never touches the source or reparses anything. It marks
//! the nodes whose text or lookahead the edit reaches as damaged and fixes
//! their lengths, so the next reparse knows which subtrees it may reuse.

use std::ops::Range;

use numscript_tables::Language;

use crate::tree::{GreenChild, GreenNode, NodeFlags, Tree};

/// Replacement of `start..old_end` by text now ending at `new_end`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Edit {
    pub start: usize,
    pub old_end: usize,
    pub new_end: usize,
}

impl Edit {
    pub fn new(start: usize, old_end: usize, new_end: usize) -> Self {
        Self {
            start,
            old_end: old_end.max(start),
            new_end: new_end.max(start),
        }
    }

    pub fn insert(at: usize, len: usize) -> Self {
        Self::new(at, at, at + len)
    }

    pub fn delete(range: Range<usize>) -> Self {
        Self::new(range.start, range.end, range.start)
    }

    pub fn replace(range: Range<usize>, len: usize) -> Self {
        Self::new(range.start, range.end, range.start + len)
    }

    /// Map an offset in the old text to the new text. Offsets inside the
    /// replaced range collapse to its new end.
    pub fn map(&self, offset: usize) -> usize {
        if offset <= self.start {
            offset
        } else if offset >= self.old_end {
            offset - self.old_end + self.new_end
        } else {
            self.new_end
        }
    }

    /// Whether a node spanning `start..end` plus `lookahead` bytes is
    /// affected. Touching counts.
    fn reaches(&self, start: usize, end: usize, lookahead: usize) -> bool {
        start <= self.old_end && end + lookahead >= self.start
    }
}

/// A tree whose spans have been shifted through one or more edits, ready to
/// be handed to [`crate::Parser::reparse`].
#[derive(Clone, Debug)]
pub struct EditedTree {
    root: GreenNode,
    language: Language,
    len: usize,
    revision: u32,
    invalidated: Option<Range<usize>>,
}

impl EditedTree {
    /// Wrap a tree without any edit applied yet.
    pub fn new(tree: &Tree) -> Self {
        Self {
            root: tree.root().clone(),
            language: tree.language().clone(),
            len: tree.root().len(),
            revision: tree.revision(),
            invalidated: None,
        }
    }

    /// Apply another edit, expressed in the coordinates left by the previous
    /// ones.
    pub fn edit(&self, edit: &Edit) -> Self {
        let root = damage(&self.root, 0, edit);
        let touched = edit.start..edit.new_end;
        let invalidated = match &self.invalidated {
            Some(prev) => {
                let prev = edit.map(prev.start)..edit.map(prev.end);
                prev.start.min(touched.start)..prev.end.max(touched.end)
            }
            None => touched,
        };
        Self {
            len: root.len(),
            root,
            language: self.language.clone(),
            revision: self.revision,
            invalidated: Some(invalidated),
        }
    }

    pub fn root(&self) -> &GreenNode {
        &self.root
    }

    pub fn language(&self) -> &Language {
        &self.language
    }

    /// Length of the text the edited tree describes.
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn revision(&self) -> u32 {
        self.revision
    }

    /// Union of the new-text spans of every edit applied so far.
    pub fn invalidated(&self) -> Option<Range<usize>> {
        self.invalidated.clone()
    }
}

pub fn apply_edit(tree: &Tree, edit: &Edit) -> EditedTree {
    tree.edit(edit)
}

fn damage(node: &GreenNode, start: usize, edit: &Edit) -> GreenNode {
    let end = start + node.len();
    if !edit.reaches(start, end, node.lookahead_bytes()) {
        return node.clone();
    }

    let new_start = edit.map(start);
    let new_end = edit.map(end);

    if node.children().is_empty() {
        return node.clone().modify(|data| {
            data.len = new_end - new_start;
            data.flags.insert(NodeFlags::DAMAGED);
        });
    }

    let mut offset = start;
    let mut children = Vec::with_capacity(node.children().len());
    for child in node.children() {
        children.push(GreenChild::new(damage(&child.node, offset, edit), child.field));
        offset += child.node.len();
    }

    node.clone().modify(|data| {
        data.len = children.iter().map(|c| c.node.len()).sum();
        data.children = children;
        data.flags.insert(NodeFlags::DAMAGED);
    })
}
