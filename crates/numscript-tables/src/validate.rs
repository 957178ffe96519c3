//! Structural checks run on every artifact before it becomes a [`Language`].
//!
//! The parser indexes tables without bounds recovery, so every cross
//! reference is checked here once.
//!
//! [`Language`]: crate::Language

use crate::actions::ParseAction;
use crate::constants::NO_GOTO;
use crate::error::GrammarDefect;
use crate::ids::Symbol;
use crate::language::LanguageData;
use crate::lexical::TokenDef;
use crate::symbols::SymbolKind;

fn defect(message: impl Into<String>) -> GrammarDefect {
    GrammarDefect::Inconsistent(message.into())
}

pub(crate) fn validate(data: &LanguageData) -> Result<(), GrammarDefect> {
    let symbol_count = data.symbols.len();
    let terminals = data.terminal_count as usize;
    let nonterminals = data.nonterminal_count as usize;
    let states = data.state_count as usize;

    if symbol_count < 2
        || data.symbols[Symbol::END.index()].kind != SymbolKind::End
        || data.symbols[Symbol::ERROR.index()].kind != SymbolKind::Error
    {
        return Err(defect("symbols 0 and 1 must be `end` and `ERROR`"));
    }
    if terminals < 2 || terminals + nonterminals > symbol_count {
        return Err(defect(format!(
            "{terminals} terminals and {nonterminals} nonterminals exceed {symbol_count} symbols"
        )));
    }
    for (index, info) in data.symbols.iter().enumerate() {
        let expected = if index < terminals {
            info.is_terminal()
        } else if index < terminals + nonterminals {
            matches!(info.kind, SymbolKind::NonTerminal | SymbolKind::Auxiliary)
        } else {
            info.kind == SymbolKind::Alias
        };
        if !expected || info.name.is_empty() {
            return Err(defect(format!("symbol {index} (`{}`) is misplaced", info.name)));
        }
    }

    if states == 0 || data.start_state.index() >= states {
        return Err(defect("start state out of range"));
    }
    let start = data.start_symbol.index();
    if start < terminals || start >= terminals + nonterminals {
        return Err(defect("start symbol is not a nonterminal"));
    }

    if data.tokens.len() != terminals {
        return Err(defect(format!(
            "{} token recognizers for {terminals} terminals",
            data.tokens.len()
        )));
    }

    if data.action_index.len() != states * terminals {
        return Err(defect("action index has the wrong shape"));
    }
    if let Some(&bad) = data
        .action_index
        .iter()
        .find(|&&list| list as usize >= data.action_lists.len())
    {
        return Err(defect(format!("action list {bad} does not exist")));
    }
    for action in data.action_lists.iter().flatten() {
        match *action {
            ParseAction::Shift(target) if target.index() >= states => {
                return Err(defect(format!("shift to missing state {}", target.0)));
            }
            ParseAction::Reduce(production) if production.index() >= data.productions.len() => {
                return Err(defect(format!("reduce by missing production {}", production.0)));
            }
            _ => {}
        }
    }

    if data.gotos.len() != states * nonterminals {
        return Err(defect("goto table has the wrong shape"));
    }
    if data
        .gotos
        .iter()
        .any(|&target| target != NO_GOTO && target as usize >= states)
    {
        return Err(defect("goto to missing state"));
    }

    if data.state_lex_modes.len() != states
        || data
            .state_lex_modes
            .iter()
            .any(|&mode| mode as usize >= data.lex_modes.len())
    {
        return Err(defect("lex mode index out of range"));
    }
    for mode in &data.lex_modes {
        if mode.terminals.iter().any(|s| s.index() >= terminals)
            || mode
                .externals
                .iter()
                .any(|&slot| slot as usize >= data.external_tokens.len())
        {
            return Err(defect("lex mode references unknown token"));
        }
    }

    for (index, production) in data.productions.iter().enumerate() {
        let lhs = production.lhs.index();
        if lhs < terminals || lhs >= terminals + nonterminals {
            return Err(defect(format!("production {index} has a terminal lhs")));
        }
        let children = production.child_count as usize;
        let shaped = |len: usize| len == 0 || len == children;
        if !shaped(production.aliases.len()) || !shaped(production.fields.len()) {
            return Err(defect(format!("production {index} metadata has the wrong length")));
        }
        if production.aliases.iter().flatten().any(|s| s.index() >= symbol_count)
            || production
                .fields
                .iter()
                .flatten()
                .any(|f| f.index() >= data.fields.len())
        {
            return Err(defect(format!("production {index} references unknown alias or field")));
        }
    }

    if data.extras.iter().any(|s| s.index() >= terminals) {
        return Err(defect("extra is not a terminal"));
    }

    match data.scanner {
        None if !data.external_tokens.is_empty() => {
            return Err(defect("external tokens without an external scanner"));
        }
        Some(kind) if data.external_tokens.len() > kind.slot_count() => {
            return Err(defect(format!(
                "{} external tokens for scanner `{}` with {} slots",
                data.external_tokens.len(),
                kind.name(),
                kind.slot_count()
            )));
        }
        _ => {}
    }
    for (slot, symbol) in data.external_tokens.iter().enumerate() {
        let bound = data.tokens.get(symbol.index());
        if bound != Some(&TokenDef::External(slot as u16))
            || data.symbols[symbol.index()].kind != SymbolKind::External
        {
            return Err(defect(format!("external slot {slot} is not bound to its symbol")));
        }
    }

    Ok(())
}
