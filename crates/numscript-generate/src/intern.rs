//! Symbol interning.
//!
//! Decides which rules are lexical and assigns every terminal its final id:
//! `end` and `ERROR` first, then terminals in order of first appearance in
//! the rules, then terminals only used as extras, then externals.

use std::collections::HashMap;

use numscript_grammar::{Grammar, Rule};
use numscript_tables::ScannerKind;

use crate::error::GenerateError;

/// How a terminal is recognized, before DFAs are built.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) enum TokenSource {
    Builtin,
    Literal(String),
    Pattern(String),
    External(u16),
}

#[derive(Clone, Debug)]
pub(crate) struct TerminalSpec {
    pub name: String,
    pub named: bool,
    pub visible: bool,
    pub extra: bool,
    pub source: TokenSource,
}

#[derive(Clone, Debug)]
pub(crate) struct NonTerminalSpec {
    pub name: String,
    pub visible: bool,
    pub auxiliary: bool,
}

/// A symbol reference before final numbering of nonterminals.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub(crate) enum SymbolRef {
    Terminal(usize),
    NonTerminal(usize),
}

pub(crate) struct Interned<'g> {
    pub grammar: &'g Grammar,
    pub terminals: Vec<TerminalSpec>,
    pub nonterminals: Vec<NonTerminalSpec>,
    pub scanner: Option<ScannerKind>,
    /// Terminal id of each external scanner slot.
    pub externals: Vec<usize>,
    literals: HashMap<String, usize>,
    patterns: HashMap<String, usize>,
    named_terminals: HashMap<String, usize>,
    named_nonterminals: HashMap<String, usize>,
}

fn hidden(name: &str) -> bool {
    name.starts_with('_')
}

/// Unwrap precedence wrappers that do not change what a token matches.
fn strip_prec(rule: &Rule) -> &Rule {
    match rule {
        Rule::Prec { content, .. }
        | Rule::PrecLeft { content, .. }
        | Rule::PrecRight { content, .. }
        | Rule::PrecDynamic { content, .. } => strip_prec(content),
        _ => rule,
    }
}

fn count_literals<'a>(rule: &'a Rule, counts: &mut HashMap<&'a str, usize>) {
    match rule {
        Rule::String(text) => *counts.entry(text.as_str()).or_default() += 1,
        Rule::Seq(items) | Rule::Choice(items) => {
            for item in items {
                count_literals(item, counts);
            }
        }
        _ => {
            if let Some(inner) = rule.inner() {
                count_literals(inner, counts);
            }
        }
    }
}

/// Render token content as a regex.
pub(crate) fn token_regex(rule: &Rule, context: &str) -> Result<String, GenerateError> {
    let mut out = String::new();
    write_regex(rule, context, &mut out)?;
    Ok(out)
}

fn write_regex(rule: &Rule, context: &str, out: &mut String) -> Result<(), GenerateError> {
    match rule {
        Rule::Blank => {}
        Rule::String(text) => out.push_str(&regex_syntax::escape(text)),
        Rule::Pattern { value, flags } => {
            let case_insensitive = flags.as_deref().is_some_and(|f| f.contains('i'));
            out.push_str(if case_insensitive { "(?i:" } else { "(?:" });
            out.push_str(value);
            out.push(')');
        }
        Rule::Seq(items) => {
            for item in items {
                write_regex(item, context, out)?;
            }
        }
        Rule::Choice(items) => {
            out.push_str("(?:");
            for (i, item) in items.iter().enumerate() {
                if i > 0 {
                    out.push('|');
                }
                write_regex(item, context, out)?;
            }
            out.push(')');
        }
        Rule::Repeat(content) | Rule::Repeat1(content) => {
            out.push_str("(?:");
            write_regex(content, context, out)?;
            out.push_str(if matches!(rule, Rule::Repeat(_)) { ")*" } else { ")+" });
        }
        Rule::Symbol(name) => {
            return Err(GenerateError::SymbolInToken {
                rule: context.to_string(),
                symbol: name.clone(),
            });
        }
        _ => {
            if let Some(inner) = rule.inner() {
                write_regex(inner, context, out)?;
            }
        }
    }
    Ok(())
}

/// Recognizer for a token rule (`STRING`, `PATTERN`, `TOKEN`).
pub(crate) fn token_source(rule: &Rule, context: &str) -> Result<TokenSource, GenerateError> {
    let content = match strip_prec(rule) {
        Rule::Token(content) | Rule::ImmediateToken(content) => strip_prec(content),
        other => other,
    };
    match content {
        Rule::String(text) if text.is_empty() => Err(GenerateError::EmptyToken(context.to_string())),
        Rule::String(text) => Ok(TokenSource::Literal(text.clone())),
        other => Ok(TokenSource::Pattern(token_regex(other, context)?)),
    }
}

impl<'g> Interned<'g> {
    pub fn new(grammar: &'g Grammar) -> Result<Self, GenerateError> {
        let start = grammar.start_rule().ok_or(GenerateError::MissingStartRule)?;

        let scanner = match &grammar.external_scanner {
            Some(name) => Some(
                ScannerKind::from_name(name)
                    .ok_or_else(|| GenerateError::UnknownExternalScanner(name.clone()))?,
            ),
            None if !grammar.externals.is_empty() => {
                return Err(GenerateError::UnknownExternalScanner(String::new()));
            }
            None => None,
        };
        if let Some(kind) = scanner
            && grammar.externals.len() > kind.slot_count()
        {
            return Err(GenerateError::ExternalSlots {
                scanner: kind.name().to_string(),
                declared: grammar.externals.len(),
                available: kind.slot_count(),
            });
        }

        let mut literal_counts = HashMap::new();
        for (_, body) in &grammar.rules {
            count_literals(body, &mut literal_counts);
        }
        for extra in &grammar.extras {
            count_literals(extra, &mut literal_counts);
        }

        let external_names: Vec<&str> = grammar.external_names().collect();

        let mut interned = Self {
            grammar,
            terminals: vec![
                TerminalSpec {
                    name: "end".to_string(),
                    named: true,
                    visible: false,
                    extra: false,
                    source: TokenSource::Builtin,
                },
                TerminalSpec {
                    name: "ERROR".to_string(),
                    named: true,
                    visible: true,
                    extra: false,
                    source: TokenSource::Builtin,
                },
            ],
            nonterminals: Vec::new(),
            scanner,
            externals: Vec::new(),
            literals: HashMap::new(),
            patterns: HashMap::new(),
            named_terminals: HashMap::new(),
            named_nonterminals: HashMap::new(),
        };

        // A rule whose body is a single token becomes a named terminal, unless
        // its literal text is also used anonymously somewhere else.
        let mut lexical = HashMap::new();
        for (name, body) in &grammar.rules {
            if name == start || external_names.contains(&name.as_str()) {
                continue;
            }
            let body = strip_prec(body);
            if !body.is_token() {
                continue;
            }
            if let Rule::String(text) = body
                && literal_counts.get(text.as_str()).copied().unwrap_or(0) > 1
            {
                continue;
            }
            lexical.insert(name.as_str(), body);
        }

        for (name, _) in &grammar.rules {
            if lexical.contains_key(name.as_str()) || external_names.contains(&name.as_str()) {
                continue;
            }
            interned
                .named_nonterminals
                .insert(name.clone(), interned.nonterminals.len());
            interned.nonterminals.push(NonTerminalSpec {
                name: name.clone(),
                visible: !hidden(name),
                auxiliary: false,
            });
        }

        for (name, body) in &grammar.rules {
            if interned.named_nonterminals.contains_key(name) {
                let mut counter = 0;
                interned.collect(body, name, &lexical, &mut counter)?;
            }
        }

        let mut extra_counter = 0;
        for (index, extra) in grammar.extras.iter().enumerate() {
            let id = match strip_prec(extra) {
                Rule::Symbol(name) if external_names.contains(&name.as_str()) => continue,
                Rule::Symbol(name) => match lexical.get(name.as_str()) {
                    Some(body) => interned.lexical_terminal(name, body)?,
                    None => return Err(GenerateError::NonTokenExtra(name.clone())),
                },
                Rule::String(text) => interned.literal(text, "extras")?,
                Rule::Pattern { value, flags } => {
                    extra_counter += 1;
                    let case_insensitive = flags.as_deref().is_some_and(|f| f.contains('i'));
                    let regex = if case_insensitive {
                        format!("(?i:{value})+")
                    } else {
                        format!("(?:{value})+")
                    };
                    interned.pattern(regex, || format!("_extra_token{extra_counter}"))
                }
                Rule::Token(content) | Rule::ImmediateToken(content) => {
                    extra_counter += 1;
                    match token_source(content, "extras")? {
                        TokenSource::Literal(text) => interned.literal(&text, "extras")?,
                        TokenSource::Pattern(regex) => {
                            interned.pattern(regex, || format!("_extra_token{extra_counter}"))
                        }
                        TokenSource::Builtin | TokenSource::External(_) => continue,
                    }
                }
                _ => return Err(GenerateError::NonTokenExtra(format!("extras[{index}]"))),
            };
            interned.terminals[id].extra = true;
        }

        for (slot, rule) in grammar.externals.iter().enumerate() {
            let (name, named) = match rule {
                Rule::Symbol(name) => (name.clone(), true),
                Rule::String(text) => (text.clone(), false),
                _ => return Err(GenerateError::InvalidExternal(slot)),
            };
            let id = interned.terminals.len();
            interned.named_terminals.insert(name.clone(), id);
            interned.externals.push(id);
            let extra = grammar
                .extras
                .iter()
                .any(|e| matches!(e, Rule::Symbol(n) if *n == name));
            interned.terminals.push(TerminalSpec {
                visible: !hidden(&name),
                name,
                named,
                extra,
                source: TokenSource::External(slot as u16),
            });
        }

        Ok(interned)
    }

    fn collect(
        &mut self,
        rule: &Rule,
        context: &str,
        lexical: &HashMap<&str, &Rule>,
        counter: &mut usize,
    ) -> Result<(), GenerateError> {
        match rule {
            Rule::String(text) => {
                self.literal(text, context)?;
            }
            Rule::Pattern { .. } | Rule::Token(_) | Rule::ImmediateToken(_) => {
                match token_source(rule, context)? {
                    TokenSource::Literal(text) => {
                        self.literal(&text, context)?;
                    }
                    TokenSource::Pattern(regex) => {
                        self.pattern(regex, || {
                            *counter += 1;
                            format!("{context}_token{counter}")
                        });
                    }
                    _ => {}
                }
            }
            Rule::Symbol(name) => {
                if let Some(body) = lexical.get(name.as_str()) {
                    self.lexical_terminal(name, body)?;
                }
            }
            Rule::Seq(items) | Rule::Choice(items) => {
                for item in items {
                    self.collect(item, context, lexical, counter)?;
                }
            }
            _ => {
                if let Some(inner) = rule.inner() {
                    self.collect(inner, context, lexical, counter)?;
                }
            }
        }
        Ok(())
    }

    fn literal(&mut self, text: &str, context: &str) -> Result<usize, GenerateError> {
        if text.is_empty() {
            return Err(GenerateError::EmptyToken(context.to_string()));
        }
        if let Some(&id) = self.literals.get(text) {
            return Ok(id);
        }
        let id = self.terminals.len();
        self.literals.insert(text.to_string(), id);
        self.terminals.push(TerminalSpec {
            name: text.to_string(),
            named: false,
            visible: true,
            extra: false,
            source: TokenSource::Literal(text.to_string()),
        });
        Ok(id)
    }

    fn pattern(&mut self, regex: String, name: impl FnOnce() -> String) -> usize {
        if let Some(&id) = self.patterns.get(&regex) {
            return id;
        }
        let id = self.terminals.len();
        self.patterns.insert(regex.clone(), id);
        self.terminals.push(TerminalSpec {
            name: name(),
            named: false,
            visible: false,
            extra: false,
            source: TokenSource::Pattern(regex),
        });
        id
    }

    fn lexical_terminal(&mut self, name: &str, body: &Rule) -> Result<usize, GenerateError> {
        if let Some(&id) = self.named_terminals.get(name) {
            return Ok(id);
        }
        let source = token_source(body, name)?;
        let id = self.terminals.len();
        self.named_terminals.insert(name.to_string(), id);
        self.terminals.push(TerminalSpec {
            name: name.to_string(),
            named: true,
            visible: !hidden(name),
            extra: false,
            source,
        });
        Ok(id)
    }

    /// Resolve a `SYMBOL` reference inside a nonterminal body.
    pub fn resolve(&self, name: &str, context: &str) -> Result<SymbolRef, GenerateError> {
        if let Some(&id) = self.named_terminals.get(name) {
            return Ok(SymbolRef::Terminal(id));
        }
        if let Some(&id) = self.named_nonterminals.get(name) {
            return Ok(SymbolRef::NonTerminal(id));
        }
        Err(GenerateError::UndefinedSymbol {
            symbol: name.to_string(),
            context: context.to_string(),
        })
    }

    pub fn literal_id(&self, text: &str) -> Option<usize> {
        self.literals.get(text).copied()
    }

    pub fn pattern_id(&self, regex: &str) -> Option<usize> {
        self.patterns.get(regex).copied()
    }

    pub fn nonterminal_id(&self, name: &str) -> Option<usize> {
        self.named_nonterminals.get(name).copied()
    }

    /// Register a synthesized repetition rule.
    pub fn add_auxiliary(&mut self, name: String) -> usize {
        let id = self.nonterminals.len();
        self.nonterminals.push(NonTerminalSpec {
            name,
            visible: false,
            auxiliary: true,
        });
        id
    }
}
