//! Grammar compiler for the Numscript syntax engine.
//!
//! Turns a [`Grammar`] into the tables the parser runs on:
//! - `intern` decides which rules are tokens and numbers the terminals
//! - `expand` flattens rules into productions
//! - `lalr` builds the LALR(1) automaton
//! - `conflicts` fills the action table, resolving what precedence can
//! - `tokens` compiles pattern tokens to DFAs
//! - `emit` assembles the dense [`LanguageData`]

#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

mod conflicts;
mod emit;
mod error;
mod expand;
mod first;
mod intern;
mod lalr;
mod prepare;
mod tokens;

#[cfg(test)]
mod conflicts_tests;
#[cfg(test)]
mod intern_tests;
#[cfg(test)]
mod lalr_tests;
#[cfg(test)]
mod tokens_tests;

use numscript_grammar::Grammar;
use numscript_tables::{Language, LanguageData};

pub use conflicts::{Conflict, ConflictReport};
pub use error::GenerateError;

/// Compiled tables plus the conflicts left for the runtime.
#[derive(Debug)]
pub struct Generated {
    pub data: LanguageData,
    pub conflicts: ConflictReport,
}

/// Compile a grammar into parse tables.
pub fn generate(grammar: &Grammar) -> Result<Generated, GenerateError> {
    let prepared = prepare::prepare(grammar)?;
    let tokens = tokens::TokenTableBuilder::new().build(&prepared)?;
    let automaton = lalr::Automaton::build(&prepared)?;
    let (states, conflicts) = conflicts::build_actions(&automaton);
    drop(automaton);
    let data = emit::emit(prepared, &states, tokens);
    Ok(Generated { data, conflicts })
}

/// Compile `grammar.json` text.
pub fn generate_from_json(json: &str) -> Result<Generated, GenerateError> {
    generate(&Grammar::from_json(json)?)
}

/// Compile a grammar straight to artifact bytes.
pub fn generate_artifact(grammar: &Grammar) -> Result<Vec<u8>, GenerateError> {
    Ok(numscript_tables::encode(&generate(grammar)?.data)?)
}

/// Compile a grammar and load the result, running the same checks an
/// artifact goes through.
pub fn generate_language(grammar: &Grammar) -> Result<Language, GenerateError> {
    Ok(Language::from_data(generate(grammar)?.data)?)
}
