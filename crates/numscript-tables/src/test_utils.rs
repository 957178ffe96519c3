use regex_automata::dfa::{StartKind, dense};
use regex_automata::MatchKind;

use crate::actions::{ParseAction, Production};
use crate::constants::NO_GOTO;
use crate::ids::{ProductionId, StateId, Symbol};
use crate::language::LanguageData;
use crate::lexical::{LexMode, TokenDef};
use crate::symbols::{SymbolInfo, SymbolKind};

pub fn symbol(name: &str, kind: SymbolKind, named: bool, visible: bool) -> SymbolInfo {
    SymbolInfo {
        name: name.to_string(),
        kind,
        named,
        visible,
        extra: false,
    }
}

/// Serialized sparse DFA for `pattern`, built the way the generator builds them.
pub fn pattern_dfa(pattern: &str) -> Vec<u8> {
    let dense = dense::Builder::new()
        .configure(
            dense::Config::new()
                .match_kind(MatchKind::All)
                .start_kind(StartKind::Anchored)
                .minimize(true),
        )
        .build(pattern)
        .unwrap();
    dense.to_sparse().unwrap().to_bytes_little_endian()
}

/// Tables for `S -> "a"`:
///
/// - state 0: `"a"` shifts to 1, goto S is 2
/// - state 1: `end` reduces by production 0
/// - state 2: `end` accepts
pub fn tiny_language() -> LanguageData {
    let a = Symbol(2);
    let s = Symbol(3);
    LanguageData {
        name: "tiny".to_string(),
        symbols: vec![
            symbol("end", SymbolKind::End, true, false),
            symbol("ERROR", SymbolKind::Error, true, true),
            symbol("a", SymbolKind::Terminal, false, true),
            symbol("S", SymbolKind::NonTerminal, true, true),
        ],
        terminal_count: 3,
        nonterminal_count: 1,
        fields: Vec::new(),
        state_count: 3,
        action_index: vec![0, 0, 1, 2, 0, 0, 3, 0, 0],
        action_lists: vec![
            vec![],
            vec![ParseAction::Shift(StateId(1))],
            vec![ParseAction::Reduce(ProductionId(0))],
            vec![ParseAction::Accept],
        ],
        gotos: vec![2, NO_GOTO, NO_GOTO],
        lex_modes: vec![
            LexMode {
                terminals: vec![a],
                externals: vec![],
            },
            LexMode::default(),
        ],
        state_lex_modes: vec![0, 1, 1],
        productions: vec![Production {
            lhs: s,
            child_count: 1,
            precedence: 0,
            associativity: Default::default(),
            dynamic_precedence: 0,
            aliases: vec![],
            fields: vec![],
        }],
        tokens: vec![
            TokenDef::Builtin,
            TokenDef::Builtin,
            TokenDef::Literal("a".to_string()),
        ],
        extras: vec![],
        scanner: None,
        external_tokens: vec![],
        start_symbol: s,
        start_state: StateId(0),
    }
}
