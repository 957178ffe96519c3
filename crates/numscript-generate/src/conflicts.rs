//! Action table construction and conflict resolution.
//!
//! Static precedence and associativity settle shift/reduce and
//! reduce/reduce conflicts where they can. Whatever survives stays in the
//! table as several actions, and the parser forks on it at runtime.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use numscript_tables::{Associativity, ParseAction, ProductionId, StateId, Symbol};

use crate::lalr::Automaton;

/// Actions and gotos of one parse state.
#[derive(Debug, Default)]
pub(crate) struct StateActions {
    pub actions: BTreeMap<Symbol, Vec<ParseAction>>,
    pub gotos: BTreeMap<Symbol, StateId>,
}

/// A table cell left with more than one action.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Conflict {
    pub state: StateId,
    pub lookahead: String,
    pub actions: Vec<ParseAction>,
    /// Rules whose items take part, sorted by name.
    pub symbols: Vec<String>,
    /// The grammar lists these rules in `conflicts`.
    pub expected: bool,
}

/// Every conflict left for the runtime to resolve.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ConflictReport {
    pub conflicts: Vec<Conflict>,
}

impl ConflictReport {
    pub fn is_empty(&self) -> bool {
        self.conflicts.is_empty()
    }

    /// Conflicts the grammar did not declare.
    pub fn unexpected(&self) -> impl Iterator<Item = &Conflict> {
        self.conflicts.iter().filter(|c| !c.expected)
    }
}

impl fmt::Display for ConflictReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for conflict in &self.conflicts {
            write!(
                f,
                "state {} on {:?}: {} actions among [{}]",
                conflict.state.0,
                conflict.lookahead,
                conflict.actions.len(),
                conflict.symbols.join(", ")
            )?;
            if conflict.expected {
                f.write_str(" (expected)")?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

struct Reduce {
    production: u32,
    precedence: i32,
    associativity: Associativity,
}

pub(crate) fn build_actions(automaton: &Automaton<'_>) -> (Vec<StateActions>, ConflictReport) {
    let prepared = automaton.prepared;
    let mut tables = Vec::with_capacity(automaton.states.len());
    let mut report = ConflictReport::default();

    for (index, state) in automaton.states.iter().enumerate() {
        let closure = automaton.closure(&state.kernel);
        let mut table = StateActions::default();

        // Shift precedence is the highest precedence among the items that
        // shift the token.
        let mut shift_precedence: BTreeMap<Symbol, i32> = BTreeMap::new();
        let mut reduces: BTreeMap<Symbol, Vec<Reduce>> = BTreeMap::new();
        let mut accepts = false;

        for (item, lookahead) in &closure {
            match automaton.step_at(*item) {
                Some(step) if prepared.is_terminal(step.symbol) => {
                    shift_precedence
                        .entry(step.symbol)
                        .and_modify(|p| *p = (*p).max(step.precedence))
                        .or_insert(step.precedence);
                }
                Some(_) => {}
                None if item.production == 0 => accepts = true,
                None => {
                    let production = automaton.production(*item);
                    for terminal in lookahead.iter() {
                        reduces.entry(terminal).or_default().push(Reduce {
                            production: item.production,
                            precedence: production.precedence,
                            associativity: production.associativity,
                        });
                    }
                }
            }
        }

        for (&symbol, &target) in &state.transitions {
            if !prepared.is_terminal(symbol) {
                table.gotos.insert(symbol, StateId(target as u16));
            }
        }

        let terminals: BTreeSet<Symbol> = shift_precedence
            .keys()
            .chain(reduces.keys())
            .copied()
            .chain(accepts.then_some(Symbol::END))
            .collect();

        for terminal in terminals {
            let mut shift = shift_precedence
                .get(&terminal)
                .map(|&precedence| (state.transitions[&terminal], precedence));
            let mut candidates = reduces.remove(&terminal).unwrap_or_default();

            // Reduce/reduce: keep the highest precedence, ties stay ambiguous.
            if let Some(best) = candidates.iter().map(|r| r.precedence).max() {
                candidates.retain(|r| r.precedence == best);
            }

            if let Some((_, shift_prec)) = shift {
                let mut keep_shift = true;
                candidates.retain(|reduce| {
                    if shift_prec > reduce.precedence {
                        return false;
                    }
                    if shift_prec < reduce.precedence {
                        keep_shift = false;
                        return true;
                    }
                    match reduce.associativity {
                        Associativity::Left => {
                            keep_shift = false;
                            true
                        }
                        Associativity::Right => false,
                        Associativity::None => true,
                    }
                });
                if !keep_shift {
                    shift = None;
                }
            }

            let mut actions = Vec::new();
            if let Some((target, _)) = shift {
                actions.push(ParseAction::Shift(StateId(target as u16)));
            }
            candidates.sort_by_key(|r| r.production);
            actions.extend(
                candidates
                    .iter()
                    .map(|r| ParseAction::Reduce(ProductionId((r.production - 1) as u16))),
            );
            if terminal == Symbol::END && accepts {
                actions.push(ParseAction::Accept);
            }
            if actions.is_empty() {
                continue;
            }

            if actions.len() > 1 {
                let mut involved: BTreeSet<Symbol> = candidates
                    .iter()
                    .map(|r| automaton.productions[r.production as usize].lhs)
                    .collect();
                involved.extend(
                    state
                        .kernel
                        .keys()
                        .filter(|item| item.production != 0)
                        .map(|item| automaton.production(*item).lhs),
                );
                let expected = prepared
                    .conflicts
                    .iter()
                    .any(|declared| !declared.is_empty() && declared.is_subset(&involved));
                let mut symbols: Vec<String> =
                    involved.iter().map(|&s| prepared.name(s).to_string()).collect();
                symbols.sort();
                report.conflicts.push(Conflict {
                    state: StateId(index as u16),
                    lookahead: prepared.name(terminal).to_string(),
                    actions: actions.clone(),
                    symbols,
                    expected,
                });
            }

            table.actions.insert(terminal, actions);
        }

        tables.push(table);
    }

    (tables, report)
}
