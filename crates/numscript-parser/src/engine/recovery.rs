//! Error recovery.
//!
//! A version with no action for its lookahead either halts, when another
//! version can carry on, or is repaired in place. Repairs are tried in
//! order of increasing damage: pretend a token was there, throw away part
//! of the stack, throw away the token.

use numscript_tables::{ParseAction, Symbol};

use crate::lexer::{Lexed, NoViableToken, Token};
use crate::trace::{RecoveryAction, Tracer};
use crate::tree::{GreenChild, GreenData, GreenNode, NodeFlags};

use super::machine::{Machine, Status};
use super::stack::FrameId;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum RecoveryMode {
    #[default]
    Normal,
    /// No action for the lookahead; recovery has not started yet.
    Faulted,
    /// Repairing; nodes built now are fragile. Ends at the next real shift.
    Resynchronizing,
}

impl<T: Tracer> Machine<'_, '_, T> {
    pub(super) fn recover(&mut self, index: usize) {
        if self.active_count() > 1 {
            self.halt(index);
            return;
        }
        let Some(lexed) = self.versions[index].lookahead.clone() else {
            return;
        };
        let position = self.position(index);
        self.enter_recovery(index, position);

        let version = &self.versions[index];
        if version.attempts <= self.limits.max_recovery_attempts {
            if version.missing_inserted_at != Some(position) && self.insert_missing(index, &lexed.token) {
                return;
            }
            if self.pop_back(index, lexed.token.symbol) {
                return;
            }
        }

        if lexed.token.symbol == Symbol::END {
            self.force_finish(index);
        } else {
            self.skip(index, lexed);
        }
    }

    /// Input the lexer cannot match at all becomes a one-character error
    /// leaf, skipped unconditionally.
    pub(super) fn unlexable(&mut self, index: usize, failure: NoViableToken) {
        let position = failure.position;
        self.enter_recovery(index, position);
        let len = self.lexer.source()[position..]
            .chars()
            .next()
            .map_or(1, char::len_utf8);
        let lexed = Lexed {
            token: Token {
                symbol: Symbol::ERROR,
                range: position..position + len,
                scan_end: failure.scan_end.max(position + len),
                point: self.lexer.point(position),
            },
            scanner: self.versions[index].scanner.clone(),
        };
        self.skip(index, lexed);
    }

    fn enter_recovery(&mut self, index: usize, position: usize) {
        let version = &mut self.versions[index];
        if version.attempts_at != position {
            version.attempts_at = position;
            version.attempts = 0;
        }
        version.attempts += 1;
        if version.mode == RecoveryMode::Normal {
            version.mode = RecoveryMode::Faulted;
            self.tracer.trace_mode(index, RecoveryMode::Faulted);
        }
        if version.mode == RecoveryMode::Faulted {
            version.mode = RecoveryMode::Resynchronizing;
            self.tracer.trace_mode(index, RecoveryMode::Resynchronizing);
        }
    }

    /// Try every terminal, lowest id first, as a zero-width token in front
    /// of the lookahead.
    fn insert_missing(&mut self, index: usize, lookahead: &Token) -> bool {
        let head = self.versions[index].head;
        let state = self.arena[head].state;
        for raw in 2..self.language.terminal_count() {
            let candidate = Symbol(raw as u16);
            if candidate == lookahead.symbol
                || self.language.is_extra(candidate)
                || !self.language.has_actions(state, candidate)
            {
                continue;
            }
            if let Some(top) = self.simulate_insert(index, head, candidate, lookahead) {
                let position = self.position(index);
                let version = &mut self.versions[index];
                version.head = top;
                version.missing_inserted_at = Some(position);
                self.tracer
                    .trace_recover(index, RecoveryAction::Missing(candidate), position);
                return true;
            }
        }
        false
    }

    /// Run the reductions `missing` triggers, shift it, and check that the
    /// real lookahead can follow. Frames built by failed attempts are left
    /// unreferenced in the arena.
    fn simulate_insert(&mut self, index: usize, head: FrameId, missing: Symbol, lookahead: &Token) -> Option<FrameId> {
        let scanner = self.versions[index].scanner.clone();
        let mut top = head;
        loop {
            let state = self.arena[top].state;
            match self.language.actions(state, missing).first().copied()? {
                ParseAction::Shift(next) => {
                    let mut data = GreenData::missing(missing);
                    data.parse_state = state;
                    data.trailing_state = next;
                    data.scanner_start = scanner.clone();
                    data.scanner_end = scanner;
                    data.flags.insert(NodeFlags::FRAGILE);
                    if !self.language.has_actions(next, lookahead.symbol) {
                        return None;
                    }
                    return Some(self.arena.push(top, GreenNode::from_data(data), next));
                }
                ParseAction::Reduce(id) => {
                    let missing_token = Token {
                        symbol: missing,
                        range: lookahead.range.start..lookahead.range.start,
                        scan_end: lookahead.range.start,
                        point: lookahead.point,
                    };
                    top = *self
                        .pop_and_reduce(top, id, Some(&missing_token), &scanner, true)
                        .first()?;
                }
                ParseAction::Accept => return None,
            }
        }
    }

    /// Walk down the stack to the nearest frame that has an action for
    /// `symbol`, and fold everything above it into an `ERROR` extra.
    fn pop_back(&mut self, index: usize, symbol: Symbol) -> bool {
        let head = self.versions[index].head;
        let mut frame = head;
        let mut popped = Vec::new();
        for depth in 1..=self.limits.max_pop_back_depth {
            let Some(link) = self.arena[frame].links.first() else {
                return false;
            };
            popped.push(link.node.clone());
            frame = link.prev;
            let state = self.arena[frame].state;
            if !self.language.has_actions(state, symbol) {
                continue;
            }

            popped.reverse();
            let trailing_extras = popped.iter().rev().take_while(|n| n.is_extra()).count();
            let trailing = popped.split_off(popped.len() - trailing_extras);
            let error = self.error_node(popped);
            let mut top = self.arena.push(frame, error, state);
            for extra in trailing {
                top = self.arena.push(top, extra, state);
            }

            let position = self.position(index);
            self.versions[index].head = top;
            self.tracer
                .trace_recover(index, RecoveryAction::PopBack { depth }, position);
            return true;
        }
        false
    }

    /// Push the lookahead inside an `ERROR` extra, extending the previous
    /// one when only extras separate them.
    fn skip(&mut self, index: usize, lexed: Lexed) {
        let position = lexed.token.range.start;
        let head = self.versions[index].head;
        let state = self.arena[head].state;
        let leaf = self.leaf(&lexed, state, state, &self.versions[index].scanner);

        let mut frame = head;
        let mut between = Vec::new();
        let previous = loop {
            let Some(link) = self.arena[frame].links.first() else {
                break None;
            };
            if !link.node.is_extra() {
                break None;
            }
            if is_error_branch(&link.node) {
                break Some((link.prev, link.node.clone()));
            }
            between.push(link.node.clone());
            frame = link.prev;
        };

        let top = match previous {
            Some((below, error)) => {
                let mut nodes: Vec<GreenNode> = vec![error];
                nodes.extend(between.into_iter().rev());
                nodes.push(leaf);
                let merged = self.error_node(nodes);
                self.arena.push(below, merged, state)
            }
            None if leaf.symbol() == Symbol::ERROR => self.arena.push(head, leaf.set_extra(true), state),
            None => {
                let error = self.error_node(vec![leaf]);
                self.arena.push(head, error, state)
            }
        };

        let version = &mut self.versions[index];
        version.head = top;
        version.lookahead = None;
        version.scanner = lexed.scanner;
        if lexed.token.is_empty() {
            version.builtin_only_at = Some(position);
        }
        self.tracer
            .trace_recover(index, RecoveryAction::Skip(lexed.token.symbol), position);
    }

    /// Wrap the whole stack in an `ERROR` under a start-symbol root. Only
    /// used at end of input when nothing else worked.
    fn force_finish(&mut self, index: usize) {
        let head = self.versions[index].head;
        let mut nodes = self
            .arena
            .pop_all(head, 1)
            .into_iter()
            .next()
            .map(|path| path.nodes)
            .unwrap_or_default();

        let leading = nodes.iter().take_while(|n| n.is_extra()).count();
        let trailing_extras = nodes[leading..].iter().rev().take_while(|n| n.is_extra()).count();
        let trailing = nodes.split_off(nodes.len() - trailing_extras);
        let inner = nodes.split_off(leading);

        let mut children: Vec<GreenChild> = nodes.into_iter().map(GreenChild::unnamed).collect();
        if !inner.is_empty() {
            children.push(GreenChild::unnamed(self.error_node(inner)));
        }
        children.extend(trailing.into_iter().map(GreenChild::unnamed));

        let root = GreenNode::build(&self.language, self.language.start_symbol(), children);
        self.finished.push(root);
        let position = self.position(index);
        self.versions[index].status = Status::Accepted;
        self.tracer
            .trace_recover(index, RecoveryAction::ForcedFinish, position);
    }

    /// An `ERROR` extra over `nodes`, absorbing nested `ERROR` nodes.
    fn error_node(&self, nodes: Vec<GreenNode>) -> GreenNode {
        let mut children = Vec::with_capacity(nodes.len());
        for node in nodes {
            if is_error_branch(&node) {
                children.extend(node.children().iter().cloned());
            } else {
                children.push(GreenChild::unnamed(node));
            }
        }
        GreenNode::build(&self.language, Symbol::ERROR, children).modify(|data| {
            data.flags.insert(NodeFlags::EXTRA | NodeFlags::FRAGILE);
        })
    }
}

fn is_error_branch(node: &GreenNode) -> bool {
    node.symbol() == Symbol::ERROR && !node.is_terminal()
}
