use numscript_tables::Language;

use crate::edit::{Edit, EditedTree};
use crate::lexer::Lexer;
use crate::trace::{NoopTracer, Tracer};
use crate::tree::{GreenNode, LineIndex, Tree};

use super::limits::ParseLimits;
use super::machine::Machine;
use super::reuse::ReuseCursor;
use super::stack::FrameArena;

/// Parses source text into [`Tree`]s for one language.
///
/// Parsing never fails: malformed input yields a tree with `ERROR` and
/// missing nodes. A parser can be reused for any number of parses; its
/// stack arena is recycled between them.
pub struct Parser {
    language: Language,
    limits: ParseLimits,
    arena: FrameArena,
}

/// Builder for [`Parser`] instances.
pub struct ParserBuilder {
    language: Language,
    limits: ParseLimits,
}

impl ParserBuilder {
    pub fn new(language: &Language) -> Self {
        Self {
            language: language.clone(),
            limits: ParseLimits::default(),
        }
    }

    /// Set all limits at once.
    pub fn limits(mut self, limits: ParseLimits) -> Self {
        self.limits = limits;
        self
    }

    pub fn max_versions(mut self, versions: usize) -> Self {
        self.limits = self.limits.max_versions(versions);
        self
    }

    pub fn max_pop_paths(mut self, paths: usize) -> Self {
        self.limits = self.limits.max_pop_paths(paths);
        self
    }

    pub fn max_recovery_attempts(mut self, attempts: u32) -> Self {
        self.limits = self.limits.max_recovery_attempts(attempts);
        self
    }

    pub fn max_pop_back_depth(mut self, depth: usize) -> Self {
        self.limits = self.limits.max_pop_back_depth(depth);
        self
    }

    pub fn build(self) -> Parser {
        Parser {
            language: self.language,
            limits: self.limits,
            arena: FrameArena::new(),
        }
    }
}

impl Parser {
    pub fn new(language: &Language) -> Self {
        Self::builder(language).build()
    }

    pub fn builder(language: &Language) -> ParserBuilder {
        ParserBuilder::new(language)
    }

    pub fn language(&self) -> &Language {
        &self.language
    }

    pub fn limits(&self) -> ParseLimits {
        self.limits
    }

    pub fn parse(&mut self, source: &str) -> Tree {
        self.parse_with_tracer(source, &mut NoopTracer)
    }

    pub fn parse_with_tracer(&mut self, source: &str, tracer: &mut impl Tracer) -> Tree {
        let root = self.run(source, None, tracer);
        Tree::new(root, source, self.language.clone(), 0)
    }

    /// Parse `source`, the text `edited` now describes, reusing what the
    /// edits left intact.
    pub fn reparse(&mut self, source: &str, edited: &EditedTree) -> Tree {
        self.reparse_with_tracer(source, edited, &mut NoopTracer)
    }

    pub fn reparse_with_tracer(&mut self, source: &str, edited: &EditedTree, tracer: &mut impl Tracer) -> Tree {
        // A tree from another language, or edits that do not add up to this
        // text, cannot be trusted for reuse.
        let reuse = (edited.language().ptr_eq(&self.language) && edited.len() == source.len())
            .then(|| ReuseCursor::new(edited.root()));
        let root = self.run(source, reuse, tracer);
        Tree::new(root, source, self.language.clone(), edited.revision() + 1)
    }

    /// Apply `edits` to `old` in order, then reparse.
    pub fn parse_incremental(&mut self, source: &str, old: &Tree, edits: &[Edit]) -> Tree {
        let edited = edits
            .iter()
            .fold(EditedTree::new(old), |tree, edit| tree.edit(edit));
        self.reparse(source, &edited)
    }

    fn run(&mut self, source: &str, reuse: Option<ReuseCursor>, tracer: &mut impl Tracer) -> GreenNode {
        let lines = LineIndex::new(source);
        let lexer = Lexer::new(&self.language, source, &lines);
        Machine::new(&self.language, self.limits, &mut self.arena, lexer, reuse, tracer).run()
    }
}
