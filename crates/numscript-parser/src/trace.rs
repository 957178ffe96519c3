//! Tracing hooks for the parse loop.
//!
//! The machine is generic over [`Tracer`]. With [`NoopTracer`] every hook is
//! an empty `#[inline(always)]` function, so the calls and their arguments
//! compile away. [`PrintTracer`] renders one line per event for debugging
//! and for tests that assert on the parser's decisions.

use std::ops::Range;

use numscript_tables::{Language, ProductionId, StateId, Symbol};

use crate::engine::RecoveryMode;
use crate::lexer::Token;

/// Which events [`PrintTracer`] records.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord)]
pub enum Verbosity {
    /// Shifts, reductions, accepts, recoveries, and reuse.
    #[default]
    Default,
    /// Adds version bookkeeping: splits, merges, halts, mode changes.
    Verbose,
    /// Adds every lexed token.
    VeryVerbose,
}

/// What the recovery controller did to get a version moving again.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RecoveryAction {
    Missing(Symbol),
    PopBack { depth: usize },
    Skip(Symbol),
    ForcedFinish,
}

/// Parse loop instrumentation. Versions are identified by their index in
/// the machine's version list at the time of the event.
pub trait Tracer {
    /// A token was lexed for a version.
    fn trace_lex(&mut self, version: usize, token: &Token);

    /// A token was shifted, moving the version to `state`.
    fn trace_shift(&mut self, version: usize, symbol: Symbol, state: StateId);

    /// A production was reduced over `child_count` children.
    fn trace_reduce(&mut self, version: usize, production: ProductionId, symbol: Symbol, child_count: usize);

    /// A conflicting action forked `version` into `new_version`.
    fn trace_split(&mut self, version: usize, new_version: usize);

    /// `dropped` was folded into `kept`.
    fn trace_merge(&mut self, kept: usize, dropped: usize);

    /// A version had no action while others were still alive.
    fn trace_halt(&mut self, version: usize);

    /// A version accepted the input.
    fn trace_accept(&mut self, version: usize);

    fn trace_recover(&mut self, version: usize, action: RecoveryAction, position: usize);

    /// A subtree of the previous tree was spliced in at `range`.
    fn trace_reuse(&mut self, version: usize, symbol: Symbol, range: Range<usize>);

    fn trace_mode(&mut self, version: usize, mode: RecoveryMode);
}

/// Tracer that compiles to nothing.
pub struct NoopTracer;

impl Tracer for NoopTracer {
    #[inline(always)]
    fn trace_lex(&mut self, _version: usize, _token: &Token) {}

    #[inline(always)]
    fn trace_shift(&mut self, _version: usize, _symbol: Symbol, _state: StateId) {}

    #[inline(always)]
    fn trace_reduce(
        &mut self,
        _version: usize,
        _production: ProductionId,
        _symbol: Symbol,
        _child_count: usize,
    ) {
    }

    #[inline(always)]
    fn trace_split(&mut self, _version: usize, _new_version: usize) {}

    #[inline(always)]
    fn trace_merge(&mut self, _kept: usize, _dropped: usize) {}

    #[inline(always)]
    fn trace_halt(&mut self, _version: usize) {}

    #[inline(always)]
    fn trace_accept(&mut self, _version: usize) {}

    #[inline(always)]
    fn trace_recover(&mut self, _version: usize, _action: RecoveryAction, _position: usize) {}

    #[inline(always)]
    fn trace_reuse(&mut self, _version: usize, _symbol: Symbol, _range: Range<usize>) {}

    #[inline(always)]
    fn trace_mode(&mut self, _version: usize, _mode: RecoveryMode) {}
}

/// Tracer that collects formatted lines.
pub struct PrintTracer {
    language: Language,
    verbosity: Verbosity,
    lines: Vec<String>,
}

impl PrintTracer {
    pub fn new(language: &Language, verbosity: Verbosity) -> Self {
        Self {
            language: language.clone(),
            verbosity,
            lines: Vec::new(),
        }
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    pub fn into_lines(self) -> Vec<String> {
        self.lines
    }

    /// Print all collected lines to stdout.
    pub fn print(&self) {
        for line in &self.lines {
            println!("{line}");
        }
    }

    fn push(&mut self, level: Verbosity, line: String) {
        if self.verbosity >= level {
            self.lines.push(line);
        }
    }

    fn name(&self, symbol: Symbol) -> String {
        let info = self.language.symbol_info(symbol);
        if info.named {
            info.name.clone()
        } else {
            format!("{:?}", info.name)
        }
    }
}

impl Tracer for PrintTracer {
    fn trace_lex(&mut self, version: usize, token: &Token) {
        let line = format!(
            "lex v{version} {} {}..{}",
            self.name(token.symbol),
            token.range.start,
            token.range.end
        );
        self.push(Verbosity::VeryVerbose, line);
    }

    fn trace_shift(&mut self, version: usize, symbol: Symbol, state: StateId) {
        let line = format!("shift v{version} {} -> {}", self.name(symbol), state.0);
        self.push(Verbosity::Default, line);
    }

    fn trace_reduce(&mut self, version: usize, production: ProductionId, symbol: Symbol, child_count: usize) {
        let line = format!(
            "reduce v{version} {} #{} ({child_count})",
            self.name(symbol),
            production.0
        );
        self.push(Verbosity::Default, line);
    }

    fn trace_split(&mut self, version: usize, new_version: usize) {
        self.push(Verbosity::Verbose, format!("split v{version} -> v{new_version}"));
    }

    fn trace_merge(&mut self, kept: usize, dropped: usize) {
        self.push(Verbosity::Verbose, format!("merge v{dropped} into v{kept}"));
    }

    fn trace_halt(&mut self, version: usize) {
        self.push(Verbosity::Verbose, format!("halt v{version}"));
    }

    fn trace_accept(&mut self, version: usize) {
        self.push(Verbosity::Default, format!("accept v{version}"));
    }

    fn trace_recover(&mut self, version: usize, action: RecoveryAction, position: usize) {
        let what = match action {
            RecoveryAction::Missing(symbol) => format!("missing {}", self.name(symbol)),
            RecoveryAction::PopBack { depth } => format!("pop back {depth}"),
            RecoveryAction::Skip(symbol) => format!("skip {}", self.name(symbol)),
            RecoveryAction::ForcedFinish => "forced finish".to_string(),
        };
        self.push(
            Verbosity::Default,
            format!("recover v{version} {what} at {position}"),
        );
    }

    fn trace_reuse(&mut self, version: usize, symbol: Symbol, range: Range<usize>) {
        let line = format!(
            "reuse v{version} {} {}..{}",
            self.name(symbol),
            range.start,
            range.end
        );
        self.push(Verbosity::Default, line);
    }

    fn trace_mode(&mut self, version: usize, mode: RecoveryMode) {
        let mode = match mode {
            RecoveryMode::Normal => "normal",
            RecoveryMode::Faulted => "faulted",
            RecoveryMode::Resynchronizing => "resynchronizing",
        };
        self.push(Verbosity::Verbose, format!("mode v{version} {mode}"));
    }
}
