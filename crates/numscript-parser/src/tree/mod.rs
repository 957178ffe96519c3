//! Concrete syntax trees.

mod green;
mod lines;
mod node;
mod sexp;

#[cfg(test)]
mod node_tests;

use std::sync::Arc;

use numscript_tables::Language;

use crate::diagnostics::SyntaxErrors;
use crate::edit::{Edit, EditedTree};

pub(crate) use green::GreenData;
pub use green::{GreenChild, GreenNode, NodeFlags};
pub use lines::{LineIndex, Point};
pub use node::Node;

/// An immutable parse result. Edits and reparses produce new trees; the
/// subtrees they do not touch are shared with this one.
#[derive(Clone, Debug)]
pub struct Tree {
    root: GreenNode,
    source: Arc<str>,
    language: Language,
    revision: u32,
    lines: LineIndex,
}

impl Tree {
    pub(crate) fn new(root: GreenNode, source: &str, language: Language, revision: u32) -> Self {
        Self {
            root,
            lines: LineIndex::new(source),
            source: source.into(),
            language,
            revision,
        }
    }

    pub fn root_node(&self) -> Node<'_> {
        Node::root(self)
    }

    pub fn root(&self) -> &GreenNode {
        &self.root
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn language(&self) -> &Language {
        &self.language
    }

    /// 0 for a fresh parse, previous revision + 1 for a reparse.
    pub fn revision(&self) -> u32 {
        self.revision
    }

    pub fn line_index(&self) -> &LineIndex {
        &self.lines
    }

    /// Shift this tree's spans through `edit`. The tree itself is unchanged.
    pub fn edit(&self, edit: &Edit) -> EditedTree {
        EditedTree::new(self).edit(edit)
    }

    /// Structural equality, ignoring revision and reuse bookkeeping.
    pub fn same_structure(&self, other: &Tree) -> bool {
        self.root.same_structure(&other.root)
    }

    pub fn to_sexp(&self) -> String {
        self.root_node().to_sexp()
    }

    /// Every node, one per line, with byte spans and flags.
    pub fn dump(&self) -> String {
        sexp::dump(self)
    }

    pub fn syntax_errors(&self) -> SyntaxErrors {
        SyntaxErrors::collect(self)
    }
}
