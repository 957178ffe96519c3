//! Rule expansion.
//!
//! Every rule body is flattened into alternatives of plain symbol sequences.
//! `CHOICE` and optional parts multiply out, `REPEAT` becomes a hidden
//! left-recursive rule, and fields, aliases and precedences are attached to
//! the individual steps they wrap.

use std::collections::HashMap;

use numscript_grammar::{Grammar, Precedence, PrecedenceEntry, Rule};
use numscript_tables::Associativity;

use crate::error::GenerateError;
use crate::intern::{Interned, SymbolRef, TokenSource, token_source};

#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub(crate) struct AliasKey {
    pub name: String,
    pub named: bool,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct Step {
    pub symbol: SymbolRef,
    pub alias: Option<AliasKey>,
    pub field: Option<String>,
    pub precedence: i32,
    pub associativity: Associativity,
}

#[derive(Clone, Debug, Default)]
struct Alternative {
    steps: Vec<Step>,
    dynamic: i32,
}

#[derive(Clone, Debug)]
pub(crate) struct RawProduction {
    /// Index into `Interned::nonterminals`.
    pub lhs: usize,
    pub steps: Vec<Step>,
    pub dynamic_precedence: i32,
}

impl RawProduction {
    /// Precedence used when reducing: that of the last step.
    pub fn precedence(&self) -> (i32, Associativity) {
        self.steps
            .last()
            .map_or((0, Associativity::None), |s| (s.precedence, s.associativity))
    }
}

#[derive(Clone, Copy, Debug, Default)]
struct Context {
    precedence: i32,
    associativity: Associativity,
}

/// Numeric values for named precedences. Within one ordering the first
/// entry binds tightest.
fn precedence_levels(grammar: &Grammar) -> HashMap<String, i32> {
    let mut levels: HashMap<String, i32> = HashMap::new();
    for ordering in &grammar.precedences {
        let len = ordering.len();
        for (i, entry) in ordering.iter().enumerate() {
            let (PrecedenceEntry::Name(name) | PrecedenceEntry::Symbol(name)) = entry;
            let value = (len - i) as i32;
            levels
                .entry(name.clone())
                .and_modify(|v| *v = (*v).max(value))
                .or_insert(value);
        }
    }
    levels
}

struct Expander<'i, 'g> {
    interned: &'i mut Interned<'g>,
    levels: HashMap<String, i32>,
    productions: Vec<RawProduction>,
    repeat_counts: HashMap<String, usize>,
}

/// Expand every nonterminal of the grammar into productions.
pub(crate) fn expand_grammar(interned: &mut Interned<'_>) -> Result<Vec<RawProduction>, GenerateError> {
    let grammar = interned.grammar;
    let mut expander = Expander {
        levels: precedence_levels(grammar),
        interned,
        productions: Vec::new(),
        repeat_counts: HashMap::new(),
    };

    for (name, body) in &grammar.rules {
        let Some(lhs) = expander.interned.nonterminal_id(name) else {
            continue;
        };
        for alternative in expander.expand(body, name, Context::default())? {
            expander.productions.push(RawProduction {
                lhs,
                steps: alternative.steps,
                dynamic_precedence: alternative.dynamic,
            });
        }
    }

    Ok(expander.productions)
}

fn single(symbol: SymbolRef, ctx: Context) -> Alternative {
    Alternative {
        steps: vec![Step {
            symbol,
            alias: None,
            field: None,
            precedence: ctx.precedence,
            associativity: ctx.associativity,
        }],
        dynamic: 0,
    }
}

impl Expander<'_, '_> {
    fn precedence(&self, value: &Precedence) -> Result<i32, GenerateError> {
        match value {
            Precedence::Integer(value) => Ok(*value),
            Precedence::Name(name) => self
                .levels
                .get(name)
                .copied()
                .ok_or_else(|| GenerateError::UnknownPrecedence(name.clone())),
        }
    }

    fn token(&self, rule: &Rule, context: &str) -> Result<usize, GenerateError> {
        let (id, key) = match token_source(rule, context)? {
            TokenSource::Literal(text) => (self.interned.literal_id(&text), text),
            TokenSource::Pattern(regex) => (self.interned.pattern_id(&regex), regex),
            TokenSource::Builtin | TokenSource::External(_) => (None, String::new()),
        };
        id.ok_or_else(|| GenerateError::UndefinedSymbol {
            symbol: key,
            context: context.to_string(),
        })
    }

    fn expand(&mut self, rule: &Rule, context: &str, ctx: Context) -> Result<Vec<Alternative>, GenerateError> {
        let alternatives = match rule {
            Rule::Blank => vec![Alternative::default()],
            Rule::String(_) | Rule::Pattern { .. } | Rule::Token(_) | Rule::ImmediateToken(_) => {
                let id = self.token(rule, context)?;
                vec![single(SymbolRef::Terminal(id), ctx)]
            }
            Rule::Symbol(name) => {
                let symbol = self.interned.resolve(name, context)?;
                vec![single(symbol, ctx)]
            }
            Rule::Seq(items) => {
                let mut product = vec![Alternative::default()];
                for item in items {
                    let next = self.expand(item, context, ctx)?;
                    product = product
                        .iter()
                        .flat_map(|prefix| {
                            next.iter().map(move |suffix| Alternative {
                                steps: prefix.steps.iter().chain(&suffix.steps).cloned().collect(),
                                dynamic: prefix.dynamic + suffix.dynamic,
                            })
                        })
                        .collect();
                }
                product
            }
            Rule::Choice(items) => {
                let mut all = Vec::new();
                for item in items {
                    all.extend(self.expand(item, context, ctx)?);
                }
                all
            }
            Rule::Repeat(content) | Rule::Repeat1(content) => {
                let count = self.repeat_counts.entry(context.to_string()).or_default();
                *count += 1;
                let aux = self.interned.add_auxiliary(format!("{context}_repeat{count}"));
                let aux_step = single(SymbolRef::NonTerminal(aux), ctx);

                for alternative in self.expand(content, context, ctx)? {
                    if alternative.steps.is_empty() {
                        continue;
                    }
                    self.productions.push(RawProduction {
                        lhs: aux,
                        steps: aux_step.steps.iter().chain(&alternative.steps).cloned().collect(),
                        dynamic_precedence: alternative.dynamic,
                    });
                    self.productions.push(RawProduction {
                        lhs: aux,
                        steps: alternative.steps,
                        dynamic_precedence: alternative.dynamic,
                    });
                }

                if matches!(rule, Rule::Repeat(_)) {
                    vec![Alternative::default(), aux_step]
                } else {
                    vec![aux_step]
                }
            }
            Rule::Field { name, content } => {
                let mut alternatives = self.expand(content, context, ctx)?;
                for step in alternatives.iter_mut().flat_map(|a| a.steps.iter_mut()) {
                    step.field.get_or_insert_with(|| name.clone());
                }
                alternatives
            }
            Rule::Alias { content, value, named } => {
                let mut alternatives = self.expand(content, context, ctx)?;
                for alternative in &mut alternatives {
                    let [step] = alternative.steps.as_mut_slice() else {
                        return Err(GenerateError::UnsupportedAlias {
                            rule: context.to_string(),
                            alias: value.clone(),
                        });
                    };
                    step.alias = Some(AliasKey {
                        name: value.clone(),
                        named: *named,
                    });
                }
                alternatives
            }
            Rule::Prec { value, content } => {
                let ctx = Context {
                    precedence: self.precedence(value)?,
                    associativity: Associativity::None,
                };
                self.expand(content, context, ctx)?
            }
            Rule::PrecLeft { value, content } => {
                let ctx = Context {
                    precedence: self.precedence(value)?,
                    associativity: Associativity::Left,
                };
                self.expand(content, context, ctx)?
            }
            Rule::PrecRight { value, content } => {
                let ctx = Context {
                    precedence: self.precedence(value)?,
                    associativity: Associativity::Right,
                };
                self.expand(content, context, ctx)?
            }
            Rule::PrecDynamic { value, content } => {
                let mut alternatives = self.expand(content, context, ctx)?;
                for alternative in &mut alternatives {
                    if alternative.dynamic == 0 {
                        alternative.dynamic = *value;
                    }
                }
                alternatives
            }
        };
        Ok(alternatives)
    }
}
