//! Terminal sets and FIRST/nullable computation.

use std::fmt;

use numscript_tables::Symbol;

use crate::prepare::{FlatProduction, Prepared};

/// Bitset over terminal symbols.
#[derive(Clone, Default, PartialEq, Eq, Hash)]
pub(crate) struct TokenSet(Vec<u64>);

impl TokenSet {
    pub fn with_capacity(terminals: usize) -> Self {
        TokenSet(vec![0; terminals.div_ceil(64)])
    }

    pub fn single(terminals: usize, symbol: Symbol) -> Self {
        let mut set = Self::with_capacity(terminals);
        set.insert(symbol);
        set
    }

    /// Returns `true` if the symbol was not present.
    pub fn insert(&mut self, symbol: Symbol) -> bool {
        let (word, bit) = (symbol.index() / 64, symbol.index() % 64);
        if word >= self.0.len() {
            self.0.resize(word + 1, 0);
        }
        let added = self.0[word] & (1 << bit) == 0;
        self.0[word] |= 1 << bit;
        added
    }

    #[cfg(test)]
    pub fn contains(&self, symbol: Symbol) -> bool {
        let (word, bit) = (symbol.index() / 64, symbol.index() % 64);
        self.0.get(word).is_some_and(|w| w & (1 << bit) != 0)
    }

    /// Returns `true` if anything was added.
    pub fn union_with(&mut self, other: &TokenSet) -> bool {
        if other.0.len() > self.0.len() {
            self.0.resize(other.0.len(), 0);
        }
        let mut changed = false;
        for (mine, theirs) in self.0.iter_mut().zip(&other.0) {
            let merged = *mine | theirs;
            changed |= merged != *mine;
            *mine = merged;
        }
        changed
    }

    #[cfg(test)]
    pub fn is_empty(&self) -> bool {
        self.0.iter().all(|&w| w == 0)
    }

    pub fn iter(&self) -> impl Iterator<Item = Symbol> + '_ {
        self.0.iter().enumerate().flat_map(|(i, &word)| {
            (0..64usize)
                .filter(move |bit| word & (1 << bit) != 0)
                .map(move |bit| Symbol((i * 64 + bit) as u16))
        })
    }
}

impl fmt::Debug for TokenSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.iter().map(|s| s.0)).finish()
    }
}

pub(crate) struct FirstSets {
    terminal_count: usize,
    first: Vec<TokenSet>,
    nullable: Vec<bool>,
}

impl FirstSets {
    pub fn new(prepared: &Prepared) -> Self {
        let terminal_count = prepared.terminal_count;
        let mut sets = Self {
            terminal_count,
            first: vec![TokenSet::with_capacity(terminal_count); prepared.nonterminal_count],
            nullable: vec![false; prepared.nonterminal_count],
        };

        let mut changed = true;
        while changed {
            changed = false;
            for production in &prepared.productions {
                changed |= sets.absorb(production);
            }
        }
        sets
    }

    fn absorb(&mut self, production: &FlatProduction) -> bool {
        let lhs = production.lhs.index() - self.terminal_count;
        let first = self.sequence(production.steps.iter().map(|s| s.symbol), None);
        let mut changed = self.first[lhs].union_with(&first.0);
        if first.1 && !self.nullable[lhs] {
            self.nullable[lhs] = true;
            changed = true;
        }
        changed
    }

    /// FIRST of a symbol sequence, and whether the whole sequence is nullable.
    /// A nullable sequence also receives `follow`.
    fn sequence(
        &self,
        symbols: impl IntoIterator<Item = Symbol>,
        follow: Option<&TokenSet>,
    ) -> (TokenSet, bool) {
        let mut out = TokenSet::with_capacity(self.terminal_count);
        for symbol in symbols {
            if symbol.index() < self.terminal_count {
                out.insert(symbol);
                return (out, false);
            }
            let index = symbol.index() - self.terminal_count;
            out.union_with(&self.first[index]);
            if !self.nullable[index] {
                return (out, false);
            }
        }
        if let Some(follow) = follow {
            out.union_with(follow);
        }
        (out, true)
    }

    /// FIRST(`symbols` · `follow`).
    pub fn lookahead(&self, symbols: impl IntoIterator<Item = Symbol>, follow: &TokenSet) -> TokenSet {
        self.sequence(symbols, Some(follow)).0
    }

    #[cfg(test)]
    pub fn first(&self, nonterminal: Symbol) -> &TokenSet {
        &self.first[nonterminal.index() - self.terminal_count]
    }

    #[cfg(test)]
    pub fn is_nullable(&self, nonterminal: Symbol) -> bool {
        self.nullable[nonterminal.index() - self.terminal_count]
    }
}
