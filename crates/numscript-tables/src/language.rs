//! The loaded, validated language handle.

use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::actions::{ParseAction, Production};
use crate::artifact;
use crate::constants::NO_GOTO;
use crate::dfa::deserialize_dfa;
use crate::error::{GrammarDefect, LanguageError};
use crate::ids::{FieldId, ProductionId, StateId, Symbol};
use crate::lexical::{LexMode, ScannerKind, TokenDef, TokenMatcher};
use crate::symbols::SymbolInfo;

/// Everything the generator emits, in serializable form.
///
/// Tables are dense. Terminals occupy symbol ids `0..terminal_count`,
/// nonterminals follow, alias-only names come last.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LanguageData {
    pub name: String,
    pub symbols: Vec<SymbolInfo>,
    pub terminal_count: u16,
    pub nonterminal_count: u16,
    pub fields: Vec<String>,
    pub state_count: u16,
    /// `state * terminal_count + terminal` → index into `action_lists`.
    pub action_index: Vec<u32>,
    /// Deduplicated action lists; list 0 is empty.
    pub action_lists: Vec<Vec<ParseAction>>,
    /// `state * nonterminal_count + (symbol - terminal_count)` → state, or [`NO_GOTO`].
    pub gotos: Vec<u16>,
    pub lex_modes: Vec<LexMode>,
    pub state_lex_modes: Vec<u16>,
    pub productions: Vec<Production>,
    /// One recognizer per terminal.
    pub tokens: Vec<TokenDef>,
    pub extras: Vec<Symbol>,
    pub scanner: Option<ScannerKind>,
    /// Symbol bound to each external scanner slot.
    pub external_tokens: Vec<Symbol>,
    pub start_symbol: Symbol,
    pub start_state: StateId,
}

struct Inner {
    data: LanguageData,
    matchers: Vec<TokenMatcher>,
    error_mode: LexMode,
}

/// Immutable, shareable parse tables.
///
/// Cloning is cheap (one `Arc`). A `Language` only exists after the artifact
/// passed every structural check, so accessors index without re-validating.
#[derive(Clone)]
pub struct Language(Arc<Inner>);

impl Language {
    /// Load a language from artifact bytes.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, LanguageError> {
        let data = artifact::decode(bytes)?;
        Self::from_data(data)
    }

    /// Validate in-memory tables and build the runtime handle.
    pub fn from_data(data: LanguageData) -> Result<Self, LanguageError> {
        crate::validate::validate(&data)?;

        let mut matchers = Vec::with_capacity(data.tokens.len());
        for (index, def) in data.tokens.iter().enumerate() {
            let matcher = match def {
                TokenDef::Builtin => TokenMatcher::Builtin,
                TokenDef::Literal(text) => TokenMatcher::Literal(text.as_bytes().into()),
                TokenDef::Pattern { dfa, .. } => {
                    let dfa = deserialize_dfa(dfa).map_err(|message| GrammarDefect::Dfa {
                        symbol: data.symbols[index].name.clone(),
                        message,
                    })?;
                    TokenMatcher::Pattern(dfa)
                }
                TokenDef::External(slot) => TokenMatcher::External(*slot),
            };
            matchers.push(matcher);
        }

        let error_mode = LexMode {
            terminals: matchers
                .iter()
                .enumerate()
                .filter(|(_, m)| matches!(m, TokenMatcher::Literal(_) | TokenMatcher::Pattern(_)))
                .map(|(index, _)| Symbol(index as u16))
                .collect(),
            externals: Vec::new(),
        };

        Ok(Self(Arc::new(Inner {
            data,
            matchers,
            error_mode,
        })))
    }

    /// Re-encode the tables as an artifact.
    pub fn to_bytes(&self) -> Result<Vec<u8>, postcard::Error> {
        artifact::encode(&self.0.data)
    }

    /// Whether two handles share the same loaded tables.
    pub fn ptr_eq(&self, other: &Language) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }

    pub fn data(&self) -> &LanguageData {
        &self.0.data
    }

    pub fn name(&self) -> &str {
        &self.0.data.name
    }

    pub fn symbol_count(&self) -> usize {
        self.0.data.symbols.len()
    }

    pub fn terminal_count(&self) -> usize {
        self.0.data.terminal_count as usize
    }

    pub fn state_count(&self) -> usize {
        self.0.data.state_count as usize
    }

    pub fn symbol_info(&self, symbol: Symbol) -> &SymbolInfo {
        &self.0.data.symbols[symbol.index()]
    }

    pub fn symbol_name(&self, symbol: Symbol) -> &str {
        &self.symbol_info(symbol).name
    }

    pub fn is_named(&self, symbol: Symbol) -> bool {
        self.symbol_info(symbol).named
    }

    pub fn is_visible(&self, symbol: Symbol) -> bool {
        self.symbol_info(symbol).visible
    }

    pub fn is_extra(&self, symbol: Symbol) -> bool {
        self.symbol_info(symbol).extra
    }

    pub fn is_terminal(&self, symbol: Symbol) -> bool {
        symbol.index() < self.terminal_count()
    }

    /// Look up a visible symbol by name. Named symbols win over anonymous
    /// ones spelled the same way.
    pub fn symbol_for_name(&self, name: &str, named: bool) -> Option<Symbol> {
        self.0
            .data
            .symbols
            .iter()
            .position(|info| info.visible && info.named == named && info.name == name)
            .map(|index| Symbol(index as u16))
    }

    pub fn field_count(&self) -> usize {
        self.0.data.fields.len()
    }

    pub fn field_name(&self, field: FieldId) -> &str {
        &self.0.data.fields[field.index()]
    }

    pub fn field_id_for_name(&self, name: &str) -> Option<FieldId> {
        self.0
            .data
            .fields
            .iter()
            .position(|field| field == name)
            .map(|index| FieldId(index as u16))
    }

    /// Actions for `(state, lookahead)`; empty means a syntax error.
    pub fn actions(&self, state: StateId, lookahead: Symbol) -> &[ParseAction] {
        let data = &self.0.data;
        let terminals = data.terminal_count as usize;
        if lookahead.index() >= terminals {
            return &[];
        }
        let list = data.action_index[state.index() * terminals + lookahead.index()];
        &data.action_lists[list as usize]
    }

    pub fn has_actions(&self, state: StateId, lookahead: Symbol) -> bool {
        !self.actions(state, lookahead).is_empty()
    }

    /// State reached after reducing to `symbol` in `state`.
    pub fn goto(&self, state: StateId, symbol: Symbol) -> Option<StateId> {
        let data = &self.0.data;
        let terminals = data.terminal_count as usize;
        let nonterminals = data.nonterminal_count as usize;
        let column = symbol.index().checked_sub(terminals)?;
        if column >= nonterminals {
            return None;
        }
        match data.gotos[state.index() * nonterminals + column] {
            NO_GOTO => None,
            target => Some(StateId(target)),
        }
    }

    pub fn production(&self, id: ProductionId) -> &Production {
        &self.0.data.productions[id.index()]
    }

    pub fn lex_mode(&self, state: StateId) -> &LexMode {
        let data = &self.0.data;
        &data.lex_modes[data.state_lex_modes[state.index()] as usize]
    }

    /// Every built-in terminal; used when the state's own mode matches nothing.
    pub fn error_lex_mode(&self) -> &LexMode {
        &self.0.error_mode
    }

    pub fn token_matcher(&self, terminal: Symbol) -> &TokenMatcher {
        &self.0.matchers[terminal.index()]
    }

    pub fn extras(&self) -> &[Symbol] {
        &self.0.data.extras
    }

    pub fn scanner(&self) -> Option<ScannerKind> {
        self.0.data.scanner
    }

    pub fn external_tokens(&self) -> &[Symbol] {
        &self.0.data.external_tokens
    }

    pub fn start_state(&self) -> StateId {
        self.0.data.start_state
    }

    pub fn start_symbol(&self) -> Symbol {
        self.0.data.start_symbol
    }
}

impl fmt::Debug for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Language")
            .field("name", &self.0.data.name)
            .field("symbols", &self.0.data.symbols.len())
            .field("states", &self.0.data.state_count)
            .finish()
    }
}
