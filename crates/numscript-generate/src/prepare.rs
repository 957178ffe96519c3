//! Final numbering of symbols, fields and aliases.

use std::collections::{BTreeMap, BTreeSet};

use numscript_grammar::Grammar;
use numscript_tables::{Associativity, FieldId, ScannerKind, Symbol, SymbolInfo, SymbolKind};

use crate::error::GenerateError;
use crate::expand::{AliasKey, expand_grammar};
use crate::intern::{Interned, SymbolRef, TokenSource};

#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct FlatStep {
    pub symbol: Symbol,
    pub alias: Option<Symbol>,
    pub field: Option<FieldId>,
    pub precedence: i32,
    pub associativity: Associativity,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct FlatProduction {
    pub lhs: Symbol,
    pub steps: Vec<FlatStep>,
    pub precedence: i32,
    pub associativity: Associativity,
    pub dynamic_precedence: i32,
}

/// A grammar reduced to numbered symbols and flat productions.
#[derive(Debug)]
pub(crate) struct Prepared {
    pub name: String,
    pub symbols: Vec<SymbolInfo>,
    pub terminal_count: usize,
    pub nonterminal_count: usize,
    pub tokens: Vec<TokenSource>,
    pub productions: Vec<FlatProduction>,
    pub fields: Vec<String>,
    pub extras: Vec<Symbol>,
    pub start: Symbol,
    pub conflicts: Vec<BTreeSet<Symbol>>,
    pub scanner: Option<ScannerKind>,
    pub external_tokens: Vec<Symbol>,
}

impl Prepared {
    pub fn is_terminal(&self, symbol: Symbol) -> bool {
        symbol.index() < self.terminal_count
    }

    pub fn name(&self, symbol: Symbol) -> &str {
        &self.symbols[symbol.index()].name
    }
}

pub(crate) fn prepare(grammar: &Grammar) -> Result<Prepared, GenerateError> {
    grammar.validate()?;
    let mut interned = Interned::new(grammar)?;
    let raw = expand_grammar(&mut interned)?;

    let terminal_count = interned.terminals.len();
    let nonterminal_count = interned.nonterminals.len();
    let symbol_of = |r: SymbolRef| match r {
        SymbolRef::Terminal(i) => Symbol(i as u16),
        SymbolRef::NonTerminal(i) => Symbol((terminal_count + i) as u16),
    };

    let mut symbols: Vec<SymbolInfo> = interned
        .terminals
        .iter()
        .enumerate()
        .map(|(i, t)| SymbolInfo {
            name: t.name.clone(),
            kind: match (i, &t.source) {
                (0, _) => SymbolKind::End,
                (1, _) => SymbolKind::Error,
                (_, TokenSource::External(_)) => SymbolKind::External,
                _ => SymbolKind::Terminal,
            },
            named: t.named,
            visible: t.visible,
            extra: t.extra,
        })
        .collect();
    symbols.extend(interned.nonterminals.iter().map(|n| SymbolInfo {
        name: n.name.clone(),
        kind: if n.auxiliary {
            SymbolKind::Auxiliary
        } else {
            SymbolKind::NonTerminal
        },
        named: true,
        visible: n.visible,
        extra: false,
    }));

    let fields: Vec<String> = raw
        .iter()
        .flat_map(|p| p.steps.iter().filter_map(|s| s.field.clone()))
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect();
    let field_id = |name: &str| {
        fields
            .binary_search_by(|f| f.as_str().cmp(name))
            .ok()
            .map(|i| FieldId(i as u16))
    };

    // An alias naming an existing visible symbol reuses it; anything else
    // becomes an alias-only symbol.
    let mut aliases: BTreeMap<AliasKey, Symbol> = BTreeMap::new();
    let mut productions = Vec::with_capacity(raw.len());
    for production in &raw {
        let mut steps = Vec::with_capacity(production.steps.len());
        for step in &production.steps {
            let alias = match &step.alias {
                None => None,
                Some(key) => Some(match aliases.get(key) {
                    Some(&symbol) => symbol,
                    None => {
                        let existing = symbols.iter().position(|info| {
                            info.visible
                                && info.named == key.named
                                && info.name == key.name
                                && info.kind != SymbolKind::Auxiliary
                        });
                        let symbol = match existing {
                            Some(index) => Symbol(index as u16),
                            None => {
                                symbols.push(SymbolInfo {
                                    name: key.name.clone(),
                                    kind: SymbolKind::Alias,
                                    named: key.named,
                                    visible: true,
                                    extra: false,
                                });
                                Symbol((symbols.len() - 1) as u16)
                            }
                        };
                        aliases.insert(key.clone(), symbol);
                        symbol
                    }
                }),
            };
            steps.push(FlatStep {
                symbol: symbol_of(step.symbol),
                alias,
                field: step.field.as_deref().and_then(field_id),
                precedence: step.precedence,
                associativity: step.associativity,
            });
        }
        let (precedence, associativity) = production.precedence();
        productions.push(FlatProduction {
            lhs: symbol_of(SymbolRef::NonTerminal(production.lhs)),
            steps,
            precedence,
            associativity,
            dynamic_precedence: production.dynamic_precedence,
        });
    }

    if symbols.len() >= u16::MAX as usize {
        return Err(GenerateError::TooManySymbols(symbols.len()));
    }

    let mut conflicts = Vec::with_capacity(grammar.conflicts.len());
    for names in &grammar.conflicts {
        let mut set = BTreeSet::new();
        for name in names {
            set.insert(symbol_of(interned.resolve(name, "conflicts")?));
        }
        conflicts.push(set);
    }

    Ok(Prepared {
        name: grammar.name.clone(),
        extras: (0..terminal_count)
            .filter(|&i| interned.terminals[i].extra)
            .map(|i| Symbol(i as u16))
            .collect(),
        tokens: interned.terminals.iter().map(|t| t.source.clone()).collect(),
        start: Symbol(terminal_count as u16),
        external_tokens: interned.externals.iter().map(|&i| Symbol(i as u16)).collect(),
        scanner: interned.scanner,
        symbols,
        terminal_count,
        nonterminal_count,
        productions,
        fields,
        conflicts,
    })
}
