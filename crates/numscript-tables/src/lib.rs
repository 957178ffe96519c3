//! Parse-table artifact for the Numscript syntax engine.
//!
//! This crate contains:
//! - The artifact format (header, postcard payload, checksum)
//! - Table types (symbols, actions, productions, lex modes, token recognizers)
//! - [`Language`], the validated, immutable handle shared by every parse

#![allow(clippy::comparison_chain)]

mod actions;
mod artifact;
mod constants;
mod dfa;
pub mod dump;
mod error;
mod header;
mod ids;
mod language;
mod lexical;
mod symbols;
mod validate;

#[cfg(test)]
mod dump_tests;
#[cfg(test)]
mod language_tests;
#[cfg(test)]
mod test_utils;

pub use actions::{Associativity, ParseAction, Production};
pub use artifact::encode;
pub use constants::{HEADER_SIZE, MAGIC, NO_GOTO, VERSION};
pub use dfa::{Scan, deserialize_dfa};
pub use error::{GrammarDefect, LanguageError};
pub use header::Header;
pub use ids::{FieldId, ProductionId, StateId, Symbol};
pub use language::{Language, LanguageData};
pub use lexical::{LexMode, ScannerKind, TokenDef, TokenMatcher};
pub use symbols::{SymbolInfo, SymbolKind};
