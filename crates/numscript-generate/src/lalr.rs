//! LALR(1) automaton construction.
//!
//! LR(1) item sets whose cores coincide are merged as they are discovered.
//! A merged state whose lookaheads grow is processed again, so lookaheads
//! propagate until nothing changes. States are numbered in discovery order,
//! and all iteration is over ordered maps, so the output is deterministic.

use std::collections::btree_map::Entry;
use std::collections::{BTreeMap, HashMap, VecDeque};

use numscript_tables::{Associativity, NO_GOTO, Symbol};

use crate::error::GenerateError;
use crate::first::{FirstSets, TokenSet};
use crate::prepare::{FlatProduction, FlatStep, Prepared};

/// A production with a position. Production 0 is the augmented start.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub(crate) struct Item {
    pub production: u32,
    pub dot: u16,
}

impl Item {
    fn advance(self) -> Item {
        Item {
            production: self.production,
            dot: self.dot + 1,
        }
    }
}

pub(crate) type ItemSet = BTreeMap<Item, TokenSet>;

#[derive(Debug, Default)]
pub(crate) struct LrState {
    pub kernel: ItemSet,
    pub transitions: BTreeMap<Symbol, usize>,
}

pub(crate) struct Automaton<'p> {
    pub prepared: &'p Prepared,
    /// `prepared.productions` behind the augmented start production.
    pub productions: Vec<FlatProduction>,
    pub states: Vec<LrState>,
    pub first: FirstSets,
    by_lhs: Vec<Vec<u32>>,
}

impl<'p> Automaton<'p> {
    pub fn build(prepared: &'p Prepared) -> Result<Self, GenerateError> {
        let augmented = FlatProduction {
            lhs: Symbol(u16::MAX),
            steps: vec![FlatStep {
                symbol: prepared.start,
                alias: None,
                field: None,
                precedence: 0,
                associativity: Associativity::None,
            }],
            precedence: 0,
            associativity: Associativity::None,
            dynamic_precedence: 0,
        };
        let productions: Vec<FlatProduction> = std::iter::once(augmented)
            .chain(prepared.productions.iter().cloned())
            .collect();

        let mut by_lhs = vec![Vec::new(); prepared.nonterminal_count];
        for (index, production) in productions.iter().enumerate().skip(1) {
            by_lhs[production.lhs.index() - prepared.terminal_count].push(index as u32);
        }

        let mut automaton = Self {
            prepared,
            productions,
            states: Vec::new(),
            first: FirstSets::new(prepared),
            by_lhs,
        };
        automaton.explore()?;
        Ok(automaton)
    }

    /// Symbol after the dot, if any.
    pub fn next_symbol(&self, item: Item) -> Option<Symbol> {
        self.step_at(item).map(|step| step.symbol)
    }

    pub fn step_at(&self, item: Item) -> Option<&FlatStep> {
        self.productions[item.production as usize]
            .steps
            .get(item.dot as usize)
    }

    pub fn production(&self, item: Item) -> &FlatProduction {
        &self.productions[item.production as usize]
    }

    pub fn closure(&self, kernel: &ItemSet) -> ItemSet {
        let mut items = kernel.clone();
        let mut pending: Vec<Item> = kernel.keys().copied().collect();

        while let Some(item) = pending.pop() {
            let Some(symbol) = self.next_symbol(item) else {
                continue;
            };
            if self.prepared.is_terminal(symbol) {
                continue;
            }

            let rest = self.production(item).steps[item.dot as usize + 1..]
                .iter()
                .map(|step| step.symbol);
            let lookahead = self.first.lookahead(rest, &items[&item]);

            for &production in &self.by_lhs[symbol.index() - self.prepared.terminal_count] {
                let start = Item { production, dot: 0 };
                match items.entry(start) {
                    Entry::Vacant(entry) => {
                        entry.insert(lookahead.clone());
                        pending.push(start);
                    }
                    Entry::Occupied(mut entry) => {
                        if entry.get_mut().union_with(&lookahead) {
                            pending.push(start);
                        }
                    }
                }
            }
        }

        items
    }

    fn explore(&mut self) -> Result<(), GenerateError> {
        let start = Item {
            production: 0,
            dot: 0,
        };
        let end = TokenSet::single(self.prepared.terminal_count, Symbol::END);
        self.states.push(LrState {
            kernel: BTreeMap::from([(start, end)]),
            transitions: BTreeMap::new(),
        });

        let mut by_core: HashMap<Vec<Item>, usize> = HashMap::from([(vec![start], 0)]);
        let mut queue = VecDeque::from([0usize]);
        let mut queued = vec![true];

        while let Some(state) = queue.pop_front() {
            queued[state] = false;

            let mut successors: BTreeMap<Symbol, ItemSet> = BTreeMap::new();
            for (item, lookahead) in self.closure(&self.states[state].kernel) {
                if let Some(symbol) = self.next_symbol(item) {
                    successors
                        .entry(symbol)
                        .or_default()
                        .entry(item.advance())
                        .or_default()
                        .union_with(&lookahead);
                }
            }

            for (symbol, kernel) in successors {
                let core: Vec<Item> = kernel.keys().copied().collect();
                let target = match by_core.get(&core) {
                    Some(&target) => {
                        let mut grew = false;
                        for (item, lookahead) in &kernel {
                            if let Some(existing) = self.states[target].kernel.get_mut(item) {
                                grew |= existing.union_with(lookahead);
                            }
                        }
                        if grew && !queued[target] {
                            queued[target] = true;
                            queue.push_back(target);
                        }
                        target
                    }
                    None => {
                        let target = self.states.len();
                        if target >= NO_GOTO as usize {
                            return Err(GenerateError::TooManyStates(target + 1));
                        }
                        self.states.push(LrState {
                            kernel,
                            transitions: BTreeMap::new(),
                        });
                        by_core.insert(core, target);
                        queue.push_back(target);
                        queued.push(true);
                        target
                    }
                };
                self.states[state].transitions.insert(symbol, target);
            }
        }

        Ok(())
    }
}
