//! Incremental GLR parsing for Numscript.
//!
//! # Example
//!
//! ```ignore
//! use numscript_parser::{Edit, Parser};
//!
//! let mut parser = Parser::new(&language);
//! let tree = parser.parse("send [COIN 100] (source = @world destination = @bob)");
//! println!("{}", tree.to_sexp());
//!
//! let text = "send [COIN 200] (source = @world destination = @bob)";
//! let next = parser.parse_incremental(text, &tree, &[Edit::replace(11..14, 3)]);
//! assert_eq!(next.revision(), 1);
//! ```

#![allow(clippy::comparison_chain)]
#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

pub mod diagnostics;
pub mod edit;
pub mod engine;
pub mod lexer;
pub mod scanner;
pub mod trace;
pub mod tree;

#[cfg(test)]
mod lexer_tests;
#[cfg(test)]
mod test_utils;

pub use diagnostics::{SyntaxError, SyntaxErrorKind, SyntaxErrors, SyntaxErrorsPrinter};
pub use edit::{Edit, EditedTree, apply_edit};
pub use engine::{ParseLimits, Parser, ParserBuilder, RecoveryMode};
pub use lexer::{Lexed, Lexer, NoViableToken, Token};
pub use scanner::{ExternalScanner, ScannerState};
pub use trace::{NoopTracer, PrintTracer, RecoveryAction, Tracer, Verbosity};
pub use tree::{GreenChild, GreenNode, LineIndex, Node, NodeFlags, Point, Tree};

pub use numscript_tables::{Language, LanguageError, Symbol};
