//! Green nodes: immutable, position-independent, shared subtrees.
//!
//! A green node knows its length but not its offset, so a subtree that an
//! edit does not touch can be shared between tree revisions as is.

use std::fmt;
use std::ops::BitOr;
use std::sync::Arc;

use numscript_tables::{FieldId, Language, ProductionId, StateId, Symbol};

use crate::engine::costs;
use crate::scanner::ScannerState;

#[derive(Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct NodeFlags(u8);

impl NodeFlags {
    pub const EMPTY: NodeFlags = NodeFlags(0);
    /// The node is an `ERROR` node or an unlexable-byte leaf.
    pub const ERROR: NodeFlags = NodeFlags(1);
    /// Zero-width leaf inserted by recovery.
    pub const MISSING: NodeFlags = NodeFlags(1 << 1);
    /// Shifted outside the grammar's productions (whitespace, comments).
    pub const EXTRA: NodeFlags = NodeFlags(1 << 2);
    /// Built while the parse was ambiguous or recovering; never reused.
    pub const FRAGILE: NodeFlags = NodeFlags(1 << 3);
    /// The subtree contains an error or missing node.
    pub const HAS_ERROR: NodeFlags = NodeFlags(1 << 4);
    /// Touched by an edit; never reused.
    pub const DAMAGED: NodeFlags = NodeFlags(1 << 5);

    pub fn contains(self, other: NodeFlags) -> bool {
        self.0 & other.0 == other.0
    }

    pub fn insert(&mut self, other: NodeFlags) {
        self.0 |= other.0;
    }

    pub fn remove(&mut self, other: NodeFlags) {
        self.0 &= !other.0;
    }

    pub fn set(&mut self, other: NodeFlags, value: bool) {
        if value {
            self.insert(other);
        } else {
            self.remove(other);
        }
    }
}

impl BitOr for NodeFlags {
    type Output = NodeFlags;

    fn bitor(self, rhs: NodeFlags) -> NodeFlags {
        NodeFlags(self.0 | rhs.0)
    }
}

impl fmt::Debug for NodeFlags {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        const NAMES: [(NodeFlags, &str); 6] = [
            (NodeFlags::ERROR, "error"),
            (NodeFlags::MISSING, "missing"),
            (NodeFlags::EXTRA, "extra"),
            (NodeFlags::FRAGILE, "fragile"),
            (NodeFlags::HAS_ERROR, "has_error"),
            (NodeFlags::DAMAGED, "damaged"),
        ];
        let set: Vec<&str> = NAMES
            .iter()
            .filter(|(flag, _)| self.contains(*flag))
            .map(|(_, name)| *name)
            .collect();
        write!(f, "[{}]", set.join(" "))
    }
}

/// A child slot: the node plus the field it fills in its parent.
#[derive(Clone, Debug)]
pub struct GreenChild {
    pub node: GreenNode,
    pub field: Option<FieldId>,
}

impl GreenChild {
    pub fn new(node: GreenNode, field: Option<FieldId>) -> Self {
        Self { node, field }
    }

    pub fn unnamed(node: GreenNode) -> Self {
        Self { node, field: None }
    }
}

#[derive(Clone, Debug)]
pub(crate) struct GreenData {
    /// Displayed symbol, after aliasing.
    pub(crate) symbol: Symbol,
    /// Symbol the parse table knows the node by.
    pub(crate) parse_symbol: Symbol,
    pub(crate) len: usize,
    pub(crate) children: Vec<GreenChild>,
    pub(crate) flags: NodeFlags,
    pub(crate) terminal: bool,
    pub(crate) production: Option<ProductionId>,
    /// State on top of the stack before the node's first token.
    pub(crate) parse_state: StateId,
    /// State the token after the node was lexed in.
    pub(crate) trailing_state: StateId,
    /// Bytes past the end the lexer looked at while building the node.
    pub(crate) lookahead_bytes: usize,
    pub(crate) scanner_start: ScannerState,
    pub(crate) scanner_end: ScannerState,
    pub(crate) error_cost: u32,
    pub(crate) dynamic_precedence: i32,
    /// Nodes in the subtree, this one included.
    pub(crate) node_count: u32,
}

impl GreenData {
    pub(crate) fn leaf(symbol: Symbol, len: usize) -> Self {
        let mut data = Self {
            symbol,
            parse_symbol: symbol,
            len,
            children: Vec::new(),
            flags: NodeFlags::EMPTY,
            terminal: true,
            production: None,
            parse_state: StateId(0),
            trailing_state: StateId(0),
            lookahead_bytes: 0,
            scanner_start: ScannerState::default(),
            scanner_end: ScannerState::default(),
            error_cost: 0,
            dynamic_precedence: 0,
            node_count: 1,
        };
        if symbol == Symbol::ERROR {
            data.flags = NodeFlags::ERROR | NodeFlags::HAS_ERROR;
            data.error_cost = costs::RECOVERY + len as u32 * costs::SKIPPED_CHAR;
        }
        data
    }

    pub(crate) fn missing(symbol: Symbol) -> Self {
        let mut data = Self::leaf(symbol, 0);
        data.flags = NodeFlags::MISSING | NodeFlags::HAS_ERROR;
        data.error_cost = costs::MISSING;
        data
    }

    /// Interior node over `parts`. Hidden nonterminal parts are replaced by
    /// their own children, which inherit the hidden part's field when they
    /// have none.
    pub(crate) fn branch(language: &Language, symbol: Symbol, parts: Vec<GreenChild>) -> Self {
        let mut children = Vec::with_capacity(parts.len());
        for part in parts {
            if is_spliced(language, &part.node) {
                children.extend(part.node.children().iter().map(|inner| GreenChild {
                    node: inner.node.clone(),
                    field: inner.field.or(part.field),
                }));
            } else {
                children.push(part);
            }
        }

        let mut data = Self::leaf(symbol, 0);
        data.terminal = false;
        data.flags = NodeFlags::EMPTY;
        data.error_cost = 0;
        data.children = children;
        data.recompute();

        if let Some(first) = data.children.first() {
            data.parse_state = first.node.parse_state();
            data.scanner_start = first.node.scanner_start().clone();
        }
        if let Some(last) = data.children.last() {
            data.trailing_state = last.node.trailing_state();
            data.scanner_end = last.node.scanner_end().clone();
        }

        if symbol == Symbol::ERROR {
            let swallowed = data
                .children
                .iter()
                .filter(|c| !c.node.is_extra())
                .count() as u32;
            data.flags.insert(NodeFlags::ERROR | NodeFlags::HAS_ERROR);
            data.error_cost += costs::RECOVERY
                + data.len as u32 * costs::SKIPPED_CHAR
                + swallowed * costs::SKIPPED_TREE;
        }
        data
    }

    /// Recompute the sums that depend on children.
    fn recompute(&mut self) {
        let mut len = 0;
        let mut lookahead_end = 0;
        let mut error_cost = 0;
        let mut dynamic_precedence = 0;
        let mut node_count = 1;
        let mut has_error = false;
        let mut fragile = false;
        for child in &self.children {
            let node = &child.node;
            len += node.len();
            lookahead_end = lookahead_end.max(len + node.lookahead_bytes());
            error_cost += node.error_cost();
            dynamic_precedence += node.dynamic_precedence();
            node_count += node.node_count();
            has_error |= node.has_error();
            fragile |= node.is_fragile();
        }
        self.len = len;
        self.lookahead_bytes = lookahead_end.saturating_sub(len);
        self.error_cost = error_cost;
        self.dynamic_precedence = dynamic_precedence;
        self.node_count = node_count;
        self.flags.set(NodeFlags::HAS_ERROR, has_error);
        self.flags.set(NodeFlags::FRAGILE, fragile);
    }
}

fn is_spliced(language: &Language, node: &GreenNode) -> bool {
    let symbol = node.symbol();
    !node.0.terminal
        && symbol != Symbol::ERROR
        && !language.is_terminal(symbol)
        && !language.is_visible(symbol)
}

/// Shared handle to an immutable node.
#[derive(Clone)]
pub struct GreenNode(Arc<GreenData>);

impl GreenNode {
    pub fn leaf(symbol: Symbol, len: usize) -> Self {
        Self(Arc::new(GreenData::leaf(symbol, len)))
    }

    pub fn missing(symbol: Symbol) -> Self {
        Self(Arc::new(GreenData::missing(symbol)))
    }

    /// Interior node whose span is the concatenation of `children`.
    pub fn build(language: &Language, symbol: Symbol, children: Vec<GreenChild>) -> Self {
        Self(Arc::new(GreenData::branch(language, symbol, children)))
    }

    pub(crate) fn from_data(data: GreenData) -> Self {
        Self(Arc::new(data))
    }

    /// Copy-on-write update. Unshared nodes are changed in place.
    pub(crate) fn modify(mut self, f: impl FnOnce(&mut GreenData)) -> Self {
        f(Arc::make_mut(&mut self.0));
        self
    }

    pub(crate) fn aliased(self, symbol: Symbol) -> Self {
        if self.symbol() == symbol {
            return self;
        }
        self.modify(|data| data.symbol = symbol)
    }

    pub(crate) fn unaliased(self) -> Self {
        if self.symbol() == self.parse_symbol() {
            return self;
        }
        self.modify(|data| data.symbol = data.parse_symbol)
    }

    pub(crate) fn set_extra(self, extra: bool) -> Self {
        if self.is_extra() == extra {
            return self;
        }
        self.modify(|data| data.flags.set(NodeFlags::EXTRA, extra))
    }

    /// Attach extras that precede and follow this node. Only the root gets
    /// these; everywhere else extras stay between siblings.
    pub(crate) fn with_edge_extras(self, leading: Vec<GreenNode>, trailing: Vec<GreenNode>) -> Self {
        if leading.is_empty() && trailing.is_empty() {
            return self;
        }
        self.modify(|data| {
            let own_precedence = data.dynamic_precedence
                - data
                    .children
                    .iter()
                    .map(|c| c.node.dynamic_precedence())
                    .sum::<i32>();
            let mut children: Vec<GreenChild> = leading.into_iter().map(GreenChild::unnamed).collect();
            children.append(&mut data.children);
            children.extend(trailing.into_iter().map(GreenChild::unnamed));
            let fragile = data.flags.contains(NodeFlags::FRAGILE);
            data.children = children;
            data.recompute();
            data.dynamic_precedence += own_precedence;
            if fragile {
                data.flags.insert(NodeFlags::FRAGILE);
            }
        })
    }

    pub fn symbol(&self) -> Symbol {
        self.0.symbol
    }

    pub fn parse_symbol(&self) -> Symbol {
        self.0.parse_symbol
    }

    pub fn len(&self) -> usize {
        self.0.len
    }

    pub fn is_empty(&self) -> bool {
        self.0.len == 0
    }

    pub fn children(&self) -> &[GreenChild] {
        &self.0.children
    }

    pub fn flags(&self) -> NodeFlags {
        self.0.flags
    }

    /// Produced by the lexer (or inserted as missing), as opposed to a
    /// reduction.
    pub fn is_terminal(&self) -> bool {
        self.0.terminal
    }

    pub fn is_error(&self) -> bool {
        self.0.flags.contains(NodeFlags::ERROR)
    }

    pub fn is_missing(&self) -> bool {
        self.0.flags.contains(NodeFlags::MISSING)
    }

    pub fn is_extra(&self) -> bool {
        self.0.flags.contains(NodeFlags::EXTRA)
    }

    pub fn is_fragile(&self) -> bool {
        self.0.flags.contains(NodeFlags::FRAGILE)
    }

    pub fn has_error(&self) -> bool {
        self.0.flags.contains(NodeFlags::HAS_ERROR)
    }

    pub fn is_damaged(&self) -> bool {
        self.0.flags.contains(NodeFlags::DAMAGED)
    }

    pub fn production(&self) -> Option<ProductionId> {
        self.0.production
    }

    pub fn parse_state(&self) -> StateId {
        self.0.parse_state
    }

    pub fn trailing_state(&self) -> StateId {
        self.0.trailing_state
    }

    pub fn lookahead_bytes(&self) -> usize {
        self.0.lookahead_bytes
    }

    pub fn scanner_start(&self) -> &ScannerState {
        &self.0.scanner_start
    }

    pub fn scanner_end(&self) -> &ScannerState {
        &self.0.scanner_end
    }

    pub fn error_cost(&self) -> u32 {
        self.0.error_cost
    }

    pub fn dynamic_precedence(&self) -> i32 {
        self.0.dynamic_precedence
    }

    pub fn node_count(&self) -> u32 {
        self.0.node_count
    }

    pub fn ptr_eq(&self, other: &GreenNode) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }

    /// First token of the subtree, skipping empty interior nodes.
    pub fn first_leaf(&self) -> Option<&GreenNode> {
        if self.is_terminal() {
            return Some(self);
        }
        self.children().iter().find_map(|c| c.node.first_leaf())
    }

    /// Same symbols, spans, fields, and error/missing/extra flags,
    /// recursively. Reuse bookkeeping is ignored.
    pub fn same_structure(&self, other: &GreenNode) -> bool {
        const COMPARED: [NodeFlags; 4] = [
            NodeFlags::ERROR,
            NodeFlags::MISSING,
            NodeFlags::EXTRA,
            NodeFlags::HAS_ERROR,
        ];
        if self.ptr_eq(other) {
            return true;
        }
        self.symbol() == other.symbol()
            && self.len() == other.len()
            && COMPARED
                .iter()
                .all(|&flag| self.flags().contains(flag) == other.flags().contains(flag))
            && self.children().len() == other.children().len()
            && self
                .children()
                .iter()
                .zip(other.children())
                .all(|(a, b)| a.field == b.field && a.node.same_structure(&b.node))
    }
}

impl fmt::Debug for GreenNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GreenNode")
            .field("symbol", &self.0.symbol)
            .field("len", &self.0.len)
            .field("flags", &self.0.flags)
            .field("children", &self.0.children.len())
            .finish()
    }
}
