//! Grammar types for tree-sitter style grammars.
//!
//! [`Grammar::from_json`] reads `grammar.json`, and [`Grammar::validate`]
//! checks that every symbol reference resolves before the grammar is handed
//! to the table generator.

mod error;
mod json;
mod types;
mod validate;

#[cfg(test)]
mod validate_tests;

pub use error::GrammarError;
pub use types::{Grammar, Precedence, PrecedenceEntry, Rule};
