//! Reference checking for grammars.

use std::collections::HashSet;

use super::error::GrammarError;
use super::types::{Grammar, Rule};

impl Grammar {
    /// Check that the grammar has a start rule and that every symbol it
    /// mentions is defined, either as a rule or as an external token.
    pub fn validate(&self) -> Result<(), GrammarError> {
        if self.rules.is_empty() {
            return Err(GrammarError::Empty(self.name.clone()));
        }

        let mut defined = HashSet::new();
        for (name, _) in &self.rules {
            if !defined.insert(name.as_str()) {
                return Err(GrammarError::DuplicateRule(name.clone()));
            }
        }
        defined.extend(self.external_names());

        for (name, rule) in &self.rules {
            check_references(rule, name, &defined)?;
        }
        for extra in &self.extras {
            check_references(extra, "extras", &defined)?;
        }
        for conflict in &self.conflicts {
            for name in conflict {
                if !defined.contains(name.as_str()) {
                    return Err(undefined(name, "conflicts"));
                }
            }
        }

        Ok(())
    }
}

fn check_references(rule: &Rule, context: &str, defined: &HashSet<&str>) -> Result<(), GrammarError> {
    match rule {
        Rule::Symbol(name) if !defined.contains(name.as_str()) => Err(undefined(name, context)),
        Rule::Seq(members) | Rule::Choice(members) => members
            .iter()
            .try_for_each(|member| check_references(member, context, defined)),
        _ => match rule.inner() {
            Some(content) => check_references(content, context, defined),
            None => Ok(()),
        },
    }
}

fn undefined(symbol: &str, context: &str) -> GrammarError {
    GrammarError::UndefinedSymbol {
        symbol: symbol.to_string(),
        context: context.to_string(),
    }
}
