//! Grammar type definitions.

/// Complete tree-sitter style grammar.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Grammar {
    /// Grammar name (e.g., "numscript").
    pub name: String,
    /// Production rules in definition order. The first rule is the start rule.
    pub rules: Vec<(String, Rule)>,
    /// Tokens that may appear between any two tokens (whitespace, comments).
    pub extras: Vec<Rule>,
    /// Named precedence orderings, highest first.
    pub precedences: Vec<Vec<PrecedenceEntry>>,
    /// Conflicts the grammar author expects to be resolved at runtime.
    pub conflicts: Vec<Vec<String>>,
    /// Tokens produced by the external scanner, in scanner slot order.
    pub externals: Vec<Rule>,
    /// Name of the built-in external scanner that produces `externals`.
    pub external_scanner: Option<String>,
}

/// Grammar rule variants.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Rule {
    /// Epsilon (empty match).
    Blank,
    /// Literal token.
    String(String),
    /// Regex token.
    Pattern { value: String, flags: Option<String> },
    /// Reference to another rule.
    Symbol(String),
    /// Sequence of rules (must match in order).
    Seq(Vec<Rule>),
    /// Alternation.
    Choice(Vec<Rule>),
    /// Zero or more repetitions.
    Repeat(Box<Rule>),
    /// One or more repetitions.
    Repeat1(Box<Rule>),
    /// Named field on every node produced by `content`.
    Field { name: String, content: Box<Rule> },
    /// Rename the node produced by `content`.
    Alias {
        content: Box<Rule>,
        value: String,
        named: bool,
    },
    /// Lex `content` as a single token.
    Token(Box<Rule>),
    /// Lex `content` as a single token with no extras before it.
    ImmediateToken(Box<Rule>),
    Prec {
        value: Precedence,
        content: Box<Rule>,
    },
    PrecLeft {
        value: Precedence,
        content: Box<Rule>,
    },
    PrecRight {
        value: Precedence,
        content: Box<Rule>,
    },
    /// Runtime precedence, summed over a subtree when choosing between
    /// ambiguous parses.
    PrecDynamic { value: i32, content: Box<Rule> },
}

/// Precedence value (numeric or named).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Precedence {
    Integer(i32),
    Name(String),
}

/// Entry in a precedence ordering.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PrecedenceEntry {
    /// Named precedence level.
    Name(String),
    /// Symbol reference.
    Symbol(String),
}

impl Grammar {
    /// The start rule, which is always the first rule defined.
    pub fn start_rule(&self) -> Option<&str> {
        self.rules.first().map(|(name, _)| name.as_str())
    }

    /// Look up a rule body by name.
    pub fn rule(&self, name: &str) -> Option<&Rule> {
        self.rules
            .iter()
            .find(|(rule_name, _)| rule_name == name)
            .map(|(_, rule)| rule)
    }

    /// Names declared by `externals`, in slot order.
    ///
    /// Literal externals are named by their text.
    pub fn external_names(&self) -> impl Iterator<Item = &str> {
        self.externals.iter().filter_map(|rule| match rule {
            Rule::Symbol(name) => Some(name.as_str()),
            Rule::String(value) => Some(value.as_str()),
            _ => None,
        })
    }
}

impl Rule {
    /// Content wrapped by a field, alias, token, or precedence rule.
    pub fn inner(&self) -> Option<&Rule> {
        match self {
            Rule::Repeat(content)
            | Rule::Repeat1(content)
            | Rule::Token(content)
            | Rule::ImmediateToken(content) => Some(content),
            Rule::Field { content, .. }
            | Rule::Alias { content, .. }
            | Rule::Prec { content, .. }
            | Rule::PrecLeft { content, .. }
            | Rule::PrecRight { content, .. }
            | Rule::PrecDynamic { content, .. } => Some(content),
            Rule::Blank
            | Rule::String(_)
            | Rule::Pattern { .. }
            | Rule::Symbol(_)
            | Rule::Seq(_)
            | Rule::Choice(_) => None,
        }
    }

    /// Whether this rule is lexed as a single token.
    pub fn is_token(&self) -> bool {
        matches!(
            self,
            Rule::String(_) | Rule::Pattern { .. } | Rule::Token(_) | Rule::ImmediateToken(_)
        )
    }
}
