use numscript_grammar::GrammarError;
use numscript_tables::LanguageError;

/// Why a grammar could not be compiled into tables.
#[derive(Debug, thiserror::Error)]
pub enum GenerateError {
    #[error(transparent)]
    Grammar(#[from] GrammarError),

    #[error("grammar has no start rule")]
    MissingStartRule,

    #[error("undefined symbol `{symbol}` referenced from `{context}`")]
    UndefinedSymbol { symbol: String, context: String },

    #[error("token `{0}` matches the empty string")]
    EmptyToken(String),

    #[error("invalid regex for token `{token}`: {message}")]
    InvalidRegex { token: String, message: String },

    #[error("token in `{rule}` refers to symbol `{symbol}`")]
    SymbolInToken { rule: String, symbol: String },

    #[error("alias `{alias}` in `{rule}` must wrap exactly one symbol")]
    UnsupportedAlias { rule: String, alias: String },

    #[error("extra `{0}` is not a token")]
    NonTokenExtra(String),

    #[error("unknown precedence `{0}`")]
    UnknownPrecedence(String),

    #[error("external token {0} must be a symbol or a string")]
    InvalidExternal(usize),

    #[error("unknown external scanner `{0}`")]
    UnknownExternalScanner(String),

    #[error("external scanner `{scanner}` provides {available} tokens, grammar declares {declared}")]
    ExternalSlots {
        scanner: String,
        declared: usize,
        available: usize,
    },

    #[error("grammar needs {0} symbols, the limit is 65535")]
    TooManySymbols(usize),

    #[error("grammar needs {0} parse states, the limit is 65534")]
    TooManyStates(usize),

    #[error("artifact encoding failed: {0}")]
    Encode(#[from] postcard::Error),

    #[error("generated tables failed to load: {0}")]
    Language(#[from] LanguageError),
}
