//! Token recognizers and per-state lex modes.

use regex_automata::dfa::sparse::DFA;
use serde::{Deserialize, Serialize};

use crate::dfa::{self, Scan};
use crate::ids::Symbol;

/// How a terminal is recognized, as stored in the artifact.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum TokenDef {
    /// End of input and the error symbol; never matched by the lexer.
    Builtin,
    /// Exact byte string.
    Literal(String),
    /// Regex compiled to a sparse DFA (little-endian serialization).
    Pattern { source: String, dfa: Vec<u8> },
    /// Slot of the external scanner.
    External(u16),
}

/// Runtime form of [`TokenDef`], with DFAs deserialized once at load.
#[derive(Clone, Debug)]
pub enum TokenMatcher {
    Builtin,
    Literal(Box<[u8]>),
    Pattern(DFA<Vec<u8>>),
    External(u16),
}

impl TokenMatcher {
    /// Match this recognizer against the start of `input`.
    ///
    /// Builtin and external recognizers never match here; the lexer drives
    /// external tokens through the scanner instead.
    pub fn scan(&self, input: &[u8]) -> Scan {
        match self {
            TokenMatcher::Builtin | TokenMatcher::External(_) => Scan::default(),
            TokenMatcher::Literal(text) => {
                let common = text
                    .iter()
                    .zip(input)
                    .take_while(|(expected, actual)| expected == actual)
                    .count();
                if common == text.len() {
                    Scan {
                        len: Some(common),
                        examined: common,
                    }
                } else {
                    Scan {
                        len: None,
                        examined: (common + 1).min(input.len()),
                    }
                }
            }
            TokenMatcher::Pattern(dfa) => dfa::longest_match(dfa, input),
        }
    }

    pub fn is_literal(&self) -> bool {
        matches!(self, TokenMatcher::Literal(_))
    }
}

/// Terminals the lexer may return in a given parse state.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LexMode {
    /// Built-in terminals (literals and patterns), sorted by symbol.
    pub terminals: Vec<Symbol>,
    /// Valid external scanner slots, sorted.
    pub externals: Vec<u16>,
}

/// Built-in external scanners.
///
/// A grammar names one of these in `external_scanner`; its `externals` are
/// bound to the scanner's token slots by position.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ScannerKind {
    /// Off-side rule: `newline`, `indent`, `dedent`.
    Indentation,
    /// Nestable `/* ... */` comments: `comment`.
    NestedComment,
}

impl ScannerKind {
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "indentation" => Some(ScannerKind::Indentation),
            "nested_comment" => Some(ScannerKind::NestedComment),
            _ => None,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            ScannerKind::Indentation => "indentation",
            ScannerKind::NestedComment => "nested_comment",
        }
    }

    /// Number of token slots the scanner can produce.
    pub fn slot_count(self) -> usize {
        match self {
            ScannerKind::Indentation => 3,
            ScannerKind::NestedComment => 1,
        }
    }
}
