//! Numscript language binding.
//!
//! `grammar.json` is compiled to parse tables by the build script. The
//! artifact is embedded in the library and decoded once per process.

#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

use std::sync::LazyLock;

use numscript_parser::Parser;
use numscript_tables::Language;


/// Encoded parse tables for Numscript.
pub static TABLES: &[u8] = include_bytes!(concat!(env!("OUT_DIR"), "/numscript.tables"));

static LANGUAGE: LazyLock<Language> = LazyLock::new(|| {
    Language::from_bytes(TABLES).expect("embedded Numscript tables are valid")
});

/// The Numscript language handle. Cloning is cheap.
pub fn language() -> Language {
    LANGUAGE.clone()
}

/// A parser for Numscript with default limits.
pub fn parser() -> Parser {
    Parser::new(&LANGUAGE)
}
