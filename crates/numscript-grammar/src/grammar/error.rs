/// Error raised while loading or checking a grammar.
#[derive(Debug, thiserror::Error)]
pub enum GrammarError {
    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("grammar `{0}` defines no rules")]
    Empty(String),
    #[error("undefined symbol `{symbol}` referenced from `{context}`")]
    UndefinedSymbol { symbol: String, context: String },
    #[error("rule `{0}` is defined more than once")]
    DuplicateRule(String),
}
