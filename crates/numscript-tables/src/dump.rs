//! Human-readable listing of a language's tables, for debugging grammars.

use std::fmt::{self, Write};

use crate::actions::{Associativity, ParseAction};
use crate::ids::{StateId, Symbol};
use crate::language::Language;

/// Render symbols, productions and the per-state action and goto rows.
pub fn dump(language: &Language) -> String {
    let mut out = String::new();
    write_dump(language, &mut out).expect("String write never fails");
    out
}

fn display_name(language: &Language, symbol: Symbol) -> String {
    let info = language.symbol_info(symbol);
    if info.named {
        info.name.clone()
    } else {
        format!("{:?}", info.name)
    }
}

fn write_dump(language: &Language, out: &mut String) -> fmt::Result {
    let data = language.data();
    writeln!(
        out,
        "language {}: {} symbols, {} states, {} productions",
        data.name,
        data.symbols.len(),
        data.state_count,
        data.productions.len()
    )?;

    out.push_str("\n[symbols]\n");
    for (index, info) in data.symbols.iter().enumerate() {
        write!(
            out,
            "{index:>3} {} {:?}",
            display_name(language, Symbol(index as u16)),
            info.kind
        )?;
        if !info.visible {
            out.push_str(" hidden");
        }
        if info.extra {
            out.push_str(" extra");
        }
        out.push('\n');
    }

    out.push_str("\n[productions]\n");
    for (index, production) in data.productions.iter().enumerate() {
        write!(
            out,
            "{index:>3} {} -> {} children",
            display_name(language, production.lhs),
            production.child_count
        )?;
        if production.precedence != 0 || production.associativity != Associativity::None {
            write!(
                out,
                " prec={} {:?}",
                production.precedence, production.associativity
            )?;
        }
        if production.dynamic_precedence != 0 {
            write!(out, " dynamic={}", production.dynamic_precedence)?;
        }
        out.push('\n');
    }

    out.push_str("\n[states]\n");
    for state in 0..data.state_count {
        let state = StateId(state);
        writeln!(
            out,
            "{:>3} mode={}",
            state.0,
            data.state_lex_modes[state.index()]
        )?;
        for terminal in 0..data.terminal_count {
            let terminal = Symbol(terminal);
            let actions = language.actions(state, terminal);
            if actions.is_empty() {
                continue;
            }
            write!(out, "      {} ->", display_name(language, terminal))?;
            for (i, action) in actions.iter().enumerate() {
                let sep = if i == 0 { " " } else { ", " };
                match action {
                    ParseAction::Shift(target) => write!(out, "{sep}shift {}", target.0)?,
                    ParseAction::Reduce(production) => write!(out, "{sep}reduce {}", production.0)?,
                    ParseAction::Accept => write!(out, "{sep}accept")?,
                }
            }
            out.push('\n');
        }
        let first = data.terminal_count;
        for symbol in first..first + data.nonterminal_count {
            let symbol = Symbol(symbol);
            if let Some(target) = language.goto(state, symbol) {
                writeln!(out, "      {} => {}", display_name(language, symbol), target.0)?;
            }
        }
    }

    Ok(())
}
