//! Grammar model for the Numscript syntax engine.
//!
//! Grammars arrive in tree-sitter's `grammar.json` shape. This crate only
//! loads and checks them; turning a grammar into parse tables is the job of
//! `numscript-generate`.

pub mod grammar;

pub use grammar::{Grammar, GrammarError, Precedence, PrecedenceEntry, Rule};
