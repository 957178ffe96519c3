//! The GLR driver.
//!
//! Each version is a head on the shared stack plus its pending lookahead.
//! The loop always advances the version that is furthest behind, one action
//! at a time, and condenses the version list after every step.

use numscript_tables::{Language, ParseAction, ProductionId, StateId, Symbol};

use crate::lexer::{Lexed, Lexer, Token};
use crate::scanner::ScannerState;
use crate::trace::Tracer;
use crate::tree::{GreenChild, GreenData, GreenNode, NodeFlags};

use super::limits::ParseLimits;
use super::recovery::RecoveryMode;
use super::reuse::{self, ReuseCursor};
use super::select;
use super::stack::{FrameArena, FrameId, PopPath};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(super) enum Status {
    Active,
    Halted,
    Accepted,
}

#[derive(Clone, Debug)]
pub(super) struct Version {
    pub(super) head: FrameId,
    pub(super) status: Status,
    pub(super) lookahead: Option<Lexed>,
    /// Lex state to use instead of the head's, set after a reused subtree
    /// and kept until the next non-extra token.
    pub(super) lex_override: Option<StateId>,
    /// Scanner state after the last shifted token.
    pub(super) scanner: ScannerState,
    pub(super) mode: RecoveryMode,
    pub(super) attempts: u32,
    pub(super) attempts_at: usize,
    pub(super) missing_inserted_at: Option<usize>,
    /// Position where the external scanner is bypassed, after one of its
    /// zero-width tokens had to be skipped.
    pub(super) builtin_only_at: Option<usize>,
}

pub(crate) struct Machine<'p, 's, T: Tracer> {
    pub(super) language: Language,
    pub(super) limits: ParseLimits,
    pub(super) arena: &'p mut FrameArena,
    pub(super) lexer: Lexer<'s>,
    pub(super) versions: Vec<Version>,
    pub(super) finished: Vec<GreenNode>,
    reuse: Option<ReuseCursor>,
    pub(super) tracer: &'p mut T,
}

impl<'p, 's, T: Tracer> Machine<'p, 's, T> {
    pub(crate) fn new(
        language: &Language,
        limits: ParseLimits,
        arena: &'p mut FrameArena,
        lexer: Lexer<'s>,
        reuse: Option<ReuseCursor>,
        tracer: &'p mut T,
    ) -> Self {
        arena.clear();
        let head = arena.bottom(language.start_state());
        Self {
            language: language.clone(),
            limits,
            arena,
            lexer,
            versions: vec![Version {
                head,
                status: Status::Active,
                lookahead: None,
                lex_override: None,
                scanner: ScannerState::default(),
                mode: RecoveryMode::Normal,
                attempts: 0,
                attempts_at: usize::MAX,
                missing_inserted_at: None,
                builtin_only_at: None,
            }],
            finished: Vec::new(),
            reuse,
            tracer,
        }
    }

    pub(crate) fn run(mut self) -> GreenNode {
        while let Some(index) = self.next_version() {
            self.step(index);
            self.condense();
        }
        self.finish()
    }

    /// Active version with the smallest position; the first one on ties.
    fn next_version(&self) -> Option<usize> {
        self.versions
            .iter()
            .enumerate()
            .filter(|(_, v)| v.status == Status::Active)
            .min_by_key(|(_, v)| self.arena[v.head].position)
            .map(|(index, _)| index)
    }

    pub(super) fn active_count(&self) -> usize {
        self.versions
            .iter()
            .filter(|v| v.status == Status::Active)
            .count()
    }

    pub(super) fn position(&self, index: usize) -> usize {
        self.arena[self.versions[index].head].position
    }

    pub(super) fn state(&self, index: usize) -> StateId {
        self.arena[self.versions[index].head].state
    }

    fn step(&mut self, index: usize) {
        if self.versions[index].lookahead.is_none() && !self.lex(index) {
            return;
        }
        let Some(symbol) = self.versions[index]
            .lookahead
            .as_ref()
            .map(|lexed| lexed.token.symbol)
        else {
            return;
        };

        let actions = self.language.actions(self.state(index), symbol).to_vec();
        let Some((&first, rest)) = actions.split_first() else {
            if self.language.is_extra(symbol) {
                self.shift_extra(index);
            } else {
                self.recover(index);
            }
            return;
        };

        for &action in rest {
            let fork = self.versions[index].clone();
            let new_index = self.versions.len();
            self.versions.push(fork);
            self.tracer.trace_split(index, new_index);
            self.apply(new_index, action);
        }
        self.apply(index, first);
    }

    fn apply(&mut self, index: usize, action: ParseAction) {
        match action {
            ParseAction::Shift(next) => self.shift(index, next),
            ParseAction::Reduce(production) => self.reduce(index, production),
            ParseAction::Accept => self.accept(index),
        }
    }

    /// Lex a lookahead for a version. Unlexable input is handed to recovery
    /// and reported as `false`.
    fn lex(&mut self, index: usize) -> bool {
        let position = self.position(index);
        let version = &self.versions[index];
        let state = version.lex_override.unwrap_or(self.arena[version.head].state);
        let scanner = version.scanner.clone();
        let builtin_only = version.builtin_only_at == Some(position);

        self.lexer.rewind(position);
        let result = if builtin_only {
            self.lexer.next_builtin_token(state, &scanner)
        } else {
            self.lexer.next_token(state, &scanner)
        };

        match result {
            Ok(lexed) => {
                self.tracer.trace_lex(index, &lexed.token);
                let version = &mut self.versions[index];
                if !self.language.is_extra(lexed.token.symbol) {
                    version.lex_override = None;
                }
                version.lookahead = Some(lexed);
                true
            }
            Err(failure) => {
                self.unlexable(index, failure);
                false
            }
        }
    }

    /// Leaf for `lexed`, recorded as shifted in `state` with the next token
    /// lexed in `trailing`.
    pub(super) fn leaf(&self, lexed: &Lexed, state: StateId, trailing: StateId, scanner: &ScannerState) -> GreenNode {
        let token = &lexed.token;
        let mut data = GreenData::leaf(token.symbol, token.len());
        data.parse_state = state;
        data.trailing_state = trailing;
        data.lookahead_bytes = token.scan_end.saturating_sub(token.range.end);
        data.scanner_start = scanner.clone();
        data.scanner_end = lexed.scanner.clone();
        GreenNode::from_data(data)
    }

    fn shift(&mut self, index: usize, next: StateId) {
        if self.try_reuse(index) {
            return;
        }
        let Some(lexed) = self.versions[index].lookahead.take() else {
            return;
        };
        let state = self.state(index);
        let leaf = self.leaf(&lexed, state, next, &self.versions[index].scanner);
        let version = &mut self.versions[index];
        version.head = self.arena.push(version.head, leaf, next);
        version.scanner = lexed.scanner;
        self.tracer.trace_shift(index, lexed.token.symbol, next);
        self.resume(index);
    }

    fn shift_extra(&mut self, index: usize) {
        let Some(lexed) = self.versions[index].lookahead.take() else {
            return;
        };
        let state = self.state(index);
        let leaf = self
            .leaf(&lexed, state, state, &self.versions[index].scanner)
            .set_extra(true);
        let version = &mut self.versions[index];
        version.head = self.arena.push(version.head, leaf, state);
        version.scanner = lexed.scanner;
        self.tracer.trace_shift(index, lexed.token.symbol, state);
    }

    /// Back to normal parsing after a successful shift.
    fn resume(&mut self, index: usize) {
        let version = &mut self.versions[index];
        if version.mode != RecoveryMode::Normal {
            version.mode = RecoveryMode::Normal;
            self.tracer.trace_mode(index, RecoveryMode::Normal);
        }
    }

    fn try_reuse(&mut self, index: usize) -> bool {
        if self.active_count() != 1 || self.versions[index].mode != RecoveryMode::Normal {
            return false;
        }
        let Some(cursor) = self.reuse.as_mut() else {
            return false;
        };
        let version = &self.versions[index];
        let Some(lexed) = version.lookahead.as_ref() else {
            return false;
        };
        let head = version.head;
        let state = self.arena[head].state;
        let position = self.arena[head].position;

        while let Some(candidate) = cursor.candidate(position) {
            let Some(next) = reuse::reusable(&self.language, &candidate, state, &lexed.token, &version.scanner)
            else {
                if cursor.descend() {
                    continue;
                }
                break;
            };

            let node = candidate.unaliased();
            let range = position..position + node.len();
            let symbol = node.symbol();
            let lex_override = node.trailing_state();
            let scanner = node.scanner_end().clone();
            cursor.advance();

            let head = self.arena.push(head, node, next);
            let version = &mut self.versions[index];
            version.head = head;
            version.lex_override = Some(lex_override);
            version.scanner = scanner;
            version.lookahead = None;
            self.tracer.trace_reuse(index, symbol, range);
            return true;
        }
        false
    }

    fn reduce(&mut self, index: usize, id: ProductionId) {
        let version = &self.versions[index];
        let head = version.head;
        let lookahead = version.lookahead.as_ref().map(|lexed| lexed.token.clone());
        let scanner = version.scanner.clone();
        let fragile = version.mode != RecoveryMode::Normal || self.active_count() > 1;

        let heads = self.pop_and_reduce(head, id, lookahead.as_ref(), &scanner, fragile);
        let production = self.language.production(id);
        self.tracer
            .trace_reduce(index, id, production.lhs, production.child_count as usize);

        let Some((&first, rest)) = heads.split_first() else {
            self.halt(index);
            return;
        };
        for &head in rest {
            let mut fork = self.versions[index].clone();
            fork.head = head;
            let new_index = self.versions.len();
            self.versions.push(fork);
            self.tracer.trace_split(index, new_index);
        }
        self.versions[index].head = first;
    }

    /// Reduce `id` on top of `head` along every pop path, and return the new
    /// heads.
    pub(super) fn pop_and_reduce(
        &mut self,
        head: FrameId,
        id: ProductionId,
        lookahead: Option<&Token>,
        scanner: &ScannerState,
        fragile: bool,
    ) -> Vec<FrameId> {
        let production = self.language.production(id).clone();
        let paths = self
            .arena
            .pop(head, production.child_count as usize, self.limits.max_pop_paths);

        let mut heads = Vec::with_capacity(paths.len());
        for PopPath { base, mut nodes } in paths {
            let trailing_extras = nodes.iter().rev().take_while(|n| n.is_extra()).count();
            let trailing = nodes.split_off(nodes.len() - trailing_extras);
            let base_state = self.arena[base].state;
            let Some(next) = self.language.goto(base_state, production.lhs) else {
                continue;
            };

            let mut child_index = 0;
            let parts = nodes
                .into_iter()
                .map(|node| {
                    if node.is_extra() {
                        return GreenChild::unnamed(node);
                    }
                    let alias = production.alias_at(child_index);
                    let field = production.field_at(child_index);
                    child_index += 1;
                    match alias {
                        Some(alias) => GreenChild::new(node.aliased(alias), field),
                        None => GreenChild::new(node, field),
                    }
                })
                .collect();

            let mut data = GreenData::branch(&self.language, production.lhs, parts);
            data.production = Some(id);
            data.dynamic_precedence += production.dynamic_precedence;
            data.parse_state = base_state;
            if data.children.is_empty() {
                data.trailing_state = base_state;
                data.scanner_start = scanner.clone();
                data.scanner_end = scanner.clone();
            }
            if let Some(token) = lookahead {
                let end = self.arena[base].position + data.len;
                let seen = token.scan_end.saturating_sub(end);
                data.lookahead_bytes = data.lookahead_bytes.max(seen);
            }
            if fragile {
                data.flags.insert(NodeFlags::FRAGILE);
            }

            let mut top = self.arena.push(base, GreenNode::from_data(data), next);
            for extra in trailing {
                top = self.arena.push(top, extra, next);
            }
            heads.push(top);
        }
        heads
    }

    fn accept(&mut self, index: usize) {
        let head = self.versions[index].head;
        for PopPath { mut nodes, .. } in self.arena.pop_all(head, self.limits.max_pop_paths) {
            let Some(at) = nodes.iter().position(|n| !n.is_extra()) else {
                continue;
            };
            let trailing = nodes.split_off(at + 1);
            let Some(root) = nodes.pop() else {
                continue;
            };
            self.finished.push(root.with_edge_extras(nodes, trailing));
        }
        self.versions[index].status = Status::Accepted;
        self.tracer.trace_accept(index);
    }

    pub(super) fn halt(&mut self, index: usize) {
        self.versions[index].status = Status::Halted;
        self.tracer.trace_halt(index);
    }

    fn mergeable(&self, a: &Version, b: &Version) -> bool {
        let fa = &self.arena[a.head];
        let fb = &self.arena[b.head];
        fa.state == fb.state
            && fa.position == fb.position
            && a.lookahead == b.lookahead
            && a.scanner == b.scanner
            && a.lex_override == b.lex_override
            && a.mode == b.mode
    }

    /// Drop dead versions, merge equivalent ones, and enforce the cap.
    fn condense(&mut self) {
        self.versions.retain(|v| v.status == Status::Active);

        let arena = &*self.arena;
        if let Some(best) = self.finished.iter().map(GreenNode::error_cost).min() {
            self.versions
                .retain(|v| arena[v.head].error_cost <= best);
        }

        let mut i = 0;
        while i < self.versions.len() {
            let mut j = i + 1;
            while j < self.versions.len() {
                if !self.mergeable(&self.versions[i], &self.versions[j]) {
                    j += 1;
                    continue;
                }
                let cost_i = self.arena[self.versions[i].head].error_cost;
                let cost_j = self.arena[self.versions[j].head].error_cost;
                if cost_i == cost_j {
                    let keep = self.versions[i].head;
                    let other = self.versions[j].head;
                    let language = &self.language;
                    self.arena
                        .merge(keep, other, |candidate, existing| select::prefer(language, candidate, existing));
                } else if cost_j < cost_i {
                    self.versions.swap(i, j);
                }
                self.versions.remove(j);
                self.tracer.trace_merge(i, j);
            }
            i += 1;
        }

        if self.versions.len() > self.limits.max_versions {
            let arena = &*self.arena;
            self.versions.sort_by_key(|v| arena[v.head].error_cost);
            self.versions.truncate(self.limits.max_versions);
        }
    }

    fn finish(self) -> GreenNode {
        let language = &self.language;
        let best = self.finished.into_iter().reduce(|best, candidate| {
            if select::prefer(language, &candidate, &best) {
                candidate
            } else {
                best
            }
        });
        match best {
            Some(root) => root,
            None => {
                let source_len = self.lexer.source().len();
                let error = GreenNode::leaf(Symbol::ERROR, source_len).set_extra(true);
                GreenNode::build(language, language.start_symbol(), vec![GreenChild::unnamed(error)])
            }
        }
    }
}
