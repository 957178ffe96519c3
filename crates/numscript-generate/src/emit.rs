//! Assembly of the dense, serializable tables.

use indexmap::IndexSet;

use numscript_tables::{LanguageData, LexMode, NO_GOTO, ParseAction, Production, StateId, TokenDef};

use crate::conflicts::StateActions;
use crate::prepare::Prepared;

pub(crate) fn emit(prepared: Prepared, states: &[StateActions], tokens: Vec<TokenDef>) -> LanguageData {
    let terminal_count = prepared.terminal_count;
    let nonterminal_count = prepared.nonterminal_count;

    let mut action_lists: IndexSet<Vec<ParseAction>> = IndexSet::from([Vec::new()]);
    let mut action_index = vec![0u32; states.len() * terminal_count];
    let mut gotos = vec![NO_GOTO; states.len() * nonterminal_count];

    let mut lex_modes: IndexSet<LexMode> = IndexSet::new();
    let mut state_lex_modes = Vec::with_capacity(states.len());

    for (state, table) in states.iter().enumerate() {
        for (terminal, actions) in &table.actions {
            let (id, _) = action_lists.insert_full(actions.clone());
            action_index[state * terminal_count + terminal.index()] = id as u32;
        }
        for (symbol, target) in &table.gotos {
            gotos[state * nonterminal_count + symbol.index() - terminal_count] = target.0;
        }

        let mode = lex_mode(&prepared, &tokens, table);
        let (id, _) = lex_modes.insert_full(mode);
        state_lex_modes.push(id as u16);
    }

    let productions = prepared
        .productions
        .iter()
        .map(|p| Production {
            lhs: p.lhs,
            child_count: p.steps.len() as u16,
            precedence: p.precedence,
            associativity: p.associativity,
            dynamic_precedence: p.dynamic_precedence,
            aliases: if p.steps.iter().any(|s| s.alias.is_some()) {
                p.steps.iter().map(|s| s.alias).collect()
            } else {
                Vec::new()
            },
            fields: if p.steps.iter().any(|s| s.field.is_some()) {
                p.steps.iter().map(|s| s.field).collect()
            } else {
                Vec::new()
            },
        })
        .collect();

    LanguageData {
        name: prepared.name,
        symbols: prepared.symbols,
        terminal_count: terminal_count as u16,
        nonterminal_count: nonterminal_count as u16,
        fields: prepared.fields,
        state_count: states.len() as u16,
        action_index,
        action_lists: action_lists.into_iter().collect(),
        gotos,
        lex_modes: lex_modes.into_iter().collect(),
        state_lex_modes,
        productions,
        tokens,
        extras: prepared.extras,
        scanner: prepared.scanner,
        external_tokens: prepared.external_tokens,
        start_symbol: prepared.start,
        start_state: StateId(0),
    }
}

/// Tokens the lexer may produce in a state: those with actions, plus extras.
fn lex_mode(prepared: &Prepared, tokens: &[TokenDef], table: &StateActions) -> LexMode {
    let mut mode = LexMode::default();
    let candidates = table
        .actions
        .keys()
        .copied()
        .chain(prepared.extras.iter().copied());
    for symbol in candidates {
        match &tokens[symbol.index()] {
            TokenDef::Literal(_) | TokenDef::Pattern { .. } => mode.terminals.push(symbol),
            TokenDef::External(slot) => mode.externals.push(*slot),
            TokenDef::Builtin => {}
        }
    }
    mode.terminals.sort();
    mode.terminals.dedup();
    mode.externals.sort();
    mode.externals.dedup();
    mode
}

