//! Red view over green nodes: absolute positions and parent links.

use std::fmt;
use std::ops::Range;
use std::rc::Rc;

use numscript_tables::{FieldId, Language, Symbol};

use super::green::GreenNode;
use super::lines::Point;
use super::Tree;

/// A node inside a [`Tree`], with its absolute start offset.
///
/// Hidden tokens (for example a grammar's `_newline`) are not children of
/// any red node; they are still present in the green tree.
#[derive(Clone)]
pub struct Node<'t> {
    tree: &'t Tree,
    green: &'t GreenNode,
    start: usize,
    /// Position among the parent's green children.
    index: usize,
    field: Option<FieldId>,
    parent: Option<Rc<Node<'t>>>,
}

fn is_shown(language: &Language, node: &GreenNode) -> bool {
    node.is_missing() || node.is_error() || language.is_visible(node.symbol())
}

impl<'t> Node<'t> {
    pub(crate) fn root(tree: &'t Tree) -> Self {
        Self {
            tree,
            green: tree.root(),
            start: 0,
            index: 0,
            field: None,
            parent: None,
        }
    }

    pub fn green(&self) -> &'t GreenNode {
        self.green
    }

    pub fn tree(&self) -> &'t Tree {
        self.tree
    }

    fn language(&self) -> &'t Language {
        self.tree.language()
    }

    pub fn kind(&self) -> &'t str {
        self.language().symbol_name(self.green.symbol())
    }

    pub fn kind_id(&self) -> Symbol {
        self.green.symbol()
    }

    pub fn start_byte(&self) -> usize {
        self.start
    }

    pub fn end_byte(&self) -> usize {
        self.start + self.green.len()
    }

    pub fn byte_range(&self) -> Range<usize> {
        self.start_byte()..self.end_byte()
    }

    pub fn start_position(&self) -> Point {
        self.tree.line_index().point(self.start_byte())
    }

    pub fn end_position(&self) -> Point {
        self.tree.line_index().point(self.end_byte())
    }

    pub fn text(&self) -> &'t str {
        self.tree.source().get(self.byte_range()).unwrap_or("")
    }

    pub fn is_named(&self) -> bool {
        let symbol = self.green.symbol();
        self.language().is_named(symbol) && self.language().is_visible(symbol)
    }

    pub fn is_extra(&self) -> bool {
        self.green.is_extra()
    }

    pub fn is_error(&self) -> bool {
        self.green.is_error()
    }

    pub fn is_missing(&self) -> bool {
        self.green.is_missing()
    }

    pub fn has_error(&self) -> bool {
        self.green.has_error()
    }

    /// Name of the field this node fills in its parent.
    pub fn field_name(&self) -> Option<&'t str> {
        let language = self.language();
        self.field.map(|field| language.field_name(field))
    }

    pub fn children(&self) -> impl Iterator<Item = Node<'t>> + use<'t> {
        let parent = Rc::new(self.clone());
        let tree = self.tree;
        let green: &'t GreenNode = self.green;
        let mut offset = self.start;
        green
            .children()
            .iter()
            .enumerate()
            .filter_map(move |(index, child)| {
                let start = offset;
                offset += child.node.len();
                is_shown(tree.language(), &child.node).then(|| Node {
                    tree,
                    green: &child.node,
                    start,
                    index,
                    field: child.field,
                    parent: Some(Rc::clone(&parent)),
                })
            })
    }

    pub fn named_children(&self) -> impl Iterator<Item = Node<'t>> + use<'t> {
        self.children().filter(|child| child.is_named())
    }

    pub fn child_count(&self) -> usize {
        self.children().count()
    }

    pub fn child(&self, index: usize) -> Option<Node<'t>> {
        self.children().nth(index)
    }

    pub fn named_child_count(&self) -> usize {
        self.named_children().count()
    }

    pub fn named_child(&self, index: usize) -> Option<Node<'t>> {
        self.named_children().nth(index)
    }

    pub fn parent(&self) -> Option<Node<'t>> {
        self.parent.as_deref().cloned()
    }

    pub fn next_sibling(&self) -> Option<Node<'t>> {
        let index = self.index;
        self.parent.as_ref()?.children().find(|n| n.index > index)
    }

    pub fn prev_sibling(&self) -> Option<Node<'t>> {
        let index = self.index;
        self.parent.as_ref()?.children().take_while(|n| n.index < index).last()
    }

    pub fn next_named_sibling(&self) -> Option<Node<'t>> {
        let index = self.index;
        self.parent
            .as_ref()?
            .named_children()
            .find(|n| n.index > index)
    }

    pub fn prev_named_sibling(&self) -> Option<Node<'t>> {
        let index = self.index;
        self.parent
            .as_ref()?
            .named_children()
            .take_while(|n| n.index < index)
            .last()
    }

    pub fn child_by_field_name(&self, name: &str) -> Option<Node<'t>> {
        let field = self.language().field_id_for_name(name)?;
        self.children().find(|child| child.field == Some(field))
    }

    pub fn children_by_field_name(&self, name: &str) -> Vec<Node<'t>> {
        let Some(field) = self.language().field_id_for_name(name) else {
            return Vec::new();
        };
        self.children()
            .filter(|child| child.field == Some(field))
            .collect()
    }

    /// Field name of the `index`-th child.
    pub fn field_name_for_child(&self, index: usize) -> Option<&'t str> {
        self.child(index)?.field_name()
    }

    /// Smallest node that spans `range`, preferring the deepest one.
    pub fn descendant_for_byte_range(&self, range: Range<usize>) -> Option<Node<'t>> {
        if range.start < self.start_byte() || range.end > self.end_byte() {
            return None;
        }
        let mut current = self.clone();
        'descend: loop {
            for child in current.children() {
                let covers = child.start_byte() <= range.start && range.end <= child.end_byte();
                // A zero-width child only matches an empty range at its offset.
                let nonempty = child.start_byte() < child.end_byte() || range.is_empty();
                if covers && nonempty {
                    current = child;
                    continue 'descend;
                }
            }
            return Some(current);
        }
    }

    /// This node and everything under it, in pre-order.
    pub fn descendants(&self) -> Vec<Node<'t>> {
        let mut out = Vec::new();
        let mut stack = vec![self.clone()];
        while let Some(node) = stack.pop() {
            let mut children: Vec<Node<'t>> = node.children().collect();
            children.reverse();
            out.push(node);
            stack.extend(children);
        }
        out
    }

    pub fn to_sexp(&self) -> String {
        super::sexp::to_sexp(self)
    }
}

impl PartialEq for Node<'_> {
    fn eq(&self, other: &Self) -> bool {
        std::ptr::eq(self.tree, other.tree)
            && self.green.ptr_eq(other.green)
            && self.start == other.start
    }
}

impl fmt::Debug for Node<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {:?}", self.kind(), self.byte_range())
    }
}
