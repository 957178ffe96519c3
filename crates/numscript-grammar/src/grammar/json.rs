//! JSON deserialization for `grammar.json` files.
//!
//! Rules are internally tagged by their `type` field, so they are read into
//! private mirror types first and then converted.

use indexmap::IndexMap;
use serde::Deserialize;

use super::error::GrammarError;
use super::types::{Grammar, Precedence, PrecedenceEntry, Rule};

impl Grammar {
    /// Parse grammar from a `grammar.json` string.
    ///
    /// Keys the engine does not understand (`word`, `supertypes`, `inline`,
    /// `reserved`) are ignored.
    pub fn from_json(json: &str) -> Result<Self, GrammarError> {
        let raw: JsonGrammar = serde_json::from_str(json)?;
        Ok(raw.into())
    }
}

#[derive(Debug, Deserialize)]
struct JsonGrammar {
    name: String,
    rules: IndexMap<String, JsonRule>,
    #[serde(default)]
    extras: Vec<JsonRule>,
    #[serde(default)]
    precedences: Vec<Vec<JsonPrecedenceEntry>>,
    #[serde(default)]
    conflicts: Vec<Vec<String>>,
    #[serde(default)]
    externals: Vec<JsonRule>,
    #[serde(default)]
    external_scanner: Option<String>,
}

impl From<JsonGrammar> for Grammar {
    fn from(raw: JsonGrammar) -> Self {
        // IndexMap keeps definition order, so the start rule stays first.
        Self {
            name: raw.name,
            rules: raw
                .rules
                .into_iter()
                .map(|(name, rule)| (name, rule.into()))
                .collect(),
            extras: raw.extras.into_iter().map(Rule::from).collect(),
            precedences: raw
                .precedences
                .into_iter()
                .map(|level| level.into_iter().map(PrecedenceEntry::from).collect())
                .collect(),
            conflicts: raw.conflicts,
            externals: raw.externals.into_iter().map(Rule::from).collect(),
            external_scanner: raw.external_scanner,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
enum JsonRule {
    Blank,
    String {
        value: String,
    },
    Pattern {
        value: String,
        #[serde(default)]
        flags: Option<String>,
    },
    Symbol {
        name: String,
    },
    Seq {
        members: Vec<JsonRule>,
    },
    Choice {
        members: Vec<JsonRule>,
    },
    Repeat {
        content: Box<JsonRule>,
    },
    Repeat1 {
        content: Box<JsonRule>,
    },
    Field {
        name: String,
        content: Box<JsonRule>,
    },
    Alias {
        content: Box<JsonRule>,
        value: String,
        named: bool,
    },
    Token {
        content: Box<JsonRule>,
    },
    ImmediateToken {
        content: Box<JsonRule>,
    },
    Prec {
        value: JsonPrecedence,
        content: Box<JsonRule>,
    },
    PrecLeft {
        value: JsonPrecedence,
        content: Box<JsonRule>,
    },
    PrecRight {
        value: JsonPrecedence,
        content: Box<JsonRule>,
    },
    PrecDynamic {
        value: i32,
        content: Box<JsonRule>,
    },
}

fn boxed(content: Box<JsonRule>) -> Box<Rule> {
    Box::new(Rule::from(*content))
}

fn members(members: Vec<JsonRule>) -> Vec<Rule> {
    members.into_iter().map(Rule::from).collect()
}

impl From<JsonRule> for Rule {
    fn from(raw: JsonRule) -> Self {
        match raw {
            JsonRule::Blank => Rule::Blank,
            JsonRule::String { value } => Rule::String(value),
            JsonRule::Pattern { value, flags } => Rule::Pattern {
                value,
                flags: flags.filter(|f| !f.is_empty()),
            },
            JsonRule::Symbol { name } => Rule::Symbol(name),
            JsonRule::Seq { members: m } => Rule::Seq(members(m)),
            JsonRule::Choice { members: m } => Rule::Choice(members(m)),
            JsonRule::Repeat { content } => Rule::Repeat(boxed(content)),
            JsonRule::Repeat1 { content } => Rule::Repeat1(boxed(content)),
            JsonRule::Field { name, content } => Rule::Field {
                name,
                content: boxed(content),
            },
            JsonRule::Alias {
                content,
                value,
                named,
            } => Rule::Alias {
                content: boxed(content),
                value,
                named,
            },
            JsonRule::Token { content } => Rule::Token(boxed(content)),
            JsonRule::ImmediateToken { content } => Rule::ImmediateToken(boxed(content)),
            JsonRule::Prec { value, content } => Rule::Prec {
                value: value.into(),
                content: boxed(content),
            },
            JsonRule::PrecLeft { value, content } => Rule::PrecLeft {
                value: value.into(),
                content: boxed(content),
            },
            JsonRule::PrecRight { value, content } => Rule::PrecRight {
                value: value.into(),
                content: boxed(content),
            },
            JsonRule::PrecDynamic { value, content } => Rule::PrecDynamic {
                value,
                content: boxed(content),
            },
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum JsonPrecedence {
    Integer(i32),
    Name(String),
}

impl From<JsonPrecedence> for Precedence {
    fn from(raw: JsonPrecedence) -> Self {
        match raw {
            JsonPrecedence::Integer(n) => Precedence::Integer(n),
            JsonPrecedence::Name(s) => Precedence::Name(s),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
enum JsonPrecedenceEntry {
    String { value: String },
    Symbol { name: String },
}

impl From<JsonPrecedenceEntry> for PrecedenceEntry {
    fn from(raw: JsonPrecedenceEntry) -> Self {
        match raw {
            JsonPrecedenceEntry::String { value } => PrecedenceEntry::Name(value),
            JsonPrecedenceEntry::Symbol { name } => PrecedenceEntry::Symbol(name),
        }
    }
}
