//! Syntax errors read back out of a tree.
//!
//! The parser reports nothing while it runs; malformed input simply yields
//! `ERROR` and missing nodes. This module walks a finished tree and turns
//! those nodes into messages with byte ranges.

mod printer;

#[cfg(test)]
mod diagnostics_tests;

use std::fmt;
use std::ops::Range;

use numscript_tables::{Language, Symbol};

use crate::tree::{GreenNode, Tree};

pub use printer::SyntaxErrorsPrinter;

/// Longest token text quoted verbatim in a message.
const MAX_QUOTED: usize = 24;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SyntaxErrorKind {
    /// Input the grammar could not place, covered by an `ERROR` node.
    Unexpected,
    /// A token the parser had to assume.
    Missing(Symbol),
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SyntaxError {
    pub kind: SyntaxErrorKind,
    pub range: Range<usize>,
    pub message: String,
}

impl fmt::Display for SyntaxError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} at {}..{}", self.message, self.range.start, self.range.end)
    }
}

/// Syntax errors of one tree, in source order.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SyntaxErrors(Vec<SyntaxError>);

impl SyntaxErrors {
    pub fn collect(tree: &Tree) -> Self {
        let mut errors = Vec::new();
        walk(tree.language(), tree.source(), tree.root(), 0, &mut errors);
        Self(errors)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &SyntaxError> {
        self.0.iter()
    }

    pub fn as_slice(&self) -> &[SyntaxError] {
        &self.0
    }

    pub fn into_vec(self) -> Vec<SyntaxError> {
        self.0
    }

    pub fn printer(&self) -> SyntaxErrorsPrinter<'_, '_> {
        SyntaxErrorsPrinter::new(self)
    }
}

impl IntoIterator for SyntaxErrors {
    type Item = SyntaxError;
    type IntoIter = std::vec::IntoIter<SyntaxError>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<'a> IntoIterator for &'a SyntaxErrors {
    type Item = &'a SyntaxError;
    type IntoIter = std::slice::Iter<'a, SyntaxError>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

fn walk(language: &Language, source: &str, node: &GreenNode, start: usize, out: &mut Vec<SyntaxError>) {
    let range = start..start + node.len();
    if node.is_missing() {
        let info = language.symbol_info(node.symbol());
        let message = if info.named {
            format!("missing {}", info.name)
        } else {
            format!("missing `{}`", info.name)
        };
        out.push(SyntaxError {
            kind: SyntaxErrorKind::Missing(node.symbol()),
            range,
            message,
        });
        return;
    }
    if node.is_error() {
        let message = unexpected_message(source.get(range.clone()).unwrap_or(""));
        out.push(SyntaxError {
            kind: SyntaxErrorKind::Unexpected,
            range,
            message,
        });
        return;
    }
    if !node.has_error() {
        return;
    }
    let mut offset = start;
    for child in node.children() {
        walk(language, source, &child.node, offset, out);
        offset += child.node.len();
    }
}

fn unexpected_message(text: &str) -> String {
    let text = text.trim();
    if text.is_empty() {
        "unexpected end of input".to_string()
    } else if text.len() <= MAX_QUOTED && !text.contains('\n') {
        format!("unexpected `{text}`")
    } else {
        "unexpected input".to_string()
    }
}
