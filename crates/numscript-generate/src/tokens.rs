//! Token recognizer table.
//!
//! Pattern tokens are compiled to anchored sparse DFAs and serialized. Every
//! DFA reports all match ends so the lexer can take the longest one.

use std::collections::HashMap;

use regex_automata::MatchKind;
use regex_automata::dfa::{StartKind, dense};

use numscript_tables::TokenDef;

use crate::error::GenerateError;
use crate::intern::TokenSource;
use crate::prepare::Prepared;

/// Compiles token sources into artifact recognizers, deduplicating
/// identical patterns.
#[derive(Debug, Default)]
pub(crate) struct TokenTableBuilder {
    compiled: HashMap<String, Vec<u8>>,
}

impl TokenTableBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Compile one pattern, returning its serialized DFA.
    pub fn intern(&mut self, token: &str, pattern: &str) -> Result<Vec<u8>, GenerateError> {
        if let Some(bytes) = self.compiled.get(pattern) {
            return Ok(bytes.clone());
        }

        let invalid = |message: String| GenerateError::InvalidRegex {
            token: token.to_string(),
            message,
        };

        let hir = regex_syntax::parse(pattern).map_err(|e| invalid(e.to_string()))?;
        if hir.properties().minimum_len() == Some(0) {
            return Err(GenerateError::EmptyToken(token.to_string()));
        }

        let dense = dense::DFA::builder()
            .configure(
                dense::DFA::config()
                    .match_kind(MatchKind::All)
                    .start_kind(StartKind::Anchored)
                    .minimize(true),
            )
            .build(pattern)
            .map_err(|e| invalid(e.to_string()))?;
        let sparse = dense.to_sparse().map_err(|e| invalid(e.to_string()))?;
        let bytes = sparse.to_bytes_little_endian();

        self.compiled.insert(pattern.to_string(), bytes.clone());
        Ok(bytes)
    }

    pub fn build(&mut self, prepared: &Prepared) -> Result<Vec<TokenDef>, GenerateError> {
        let mut defs = Vec::with_capacity(prepared.tokens.len());
        for (index, source) in prepared.tokens.iter().enumerate() {
            let def = match source {
                TokenSource::Builtin => TokenDef::Builtin,
                TokenSource::Literal(text) => TokenDef::Literal(text.clone()),
                TokenSource::Pattern(pattern) => TokenDef::Pattern {
                    source: pattern.clone(),
                    dfa: self.intern(&prepared.symbols[index].name, pattern)?,
                },
                TokenSource::External(slot) => TokenDef::External(*slot),
            };
            defs.push(def);
        }
        Ok(defs)
    }
}
