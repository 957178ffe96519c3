use serde::{Deserialize, Serialize};

/// What a symbol stands for in the grammar.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum SymbolKind {
    /// End of input (always symbol 0).
    End,
    /// Error node (always symbol 1).
    Error,
    /// Token recognized by the built-in lexer.
    Terminal,
    /// Token recognized by the external scanner.
    External,
    /// Rule defined by the grammar.
    NonTerminal,
    /// Rule synthesized by the generator (repetitions).
    Auxiliary,
    /// Name introduced by an alias; never appears in the parse table.
    Alias,
}

/// Per-symbol metadata.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SymbolInfo {
    pub name: String,
    pub kind: SymbolKind,
    /// Named nodes show up in s-expressions; anonymous ones (`"("`) do not.
    pub named: bool,
    /// Hidden nodes are spliced into their parent when reduced.
    pub visible: bool,
    /// May appear between any two tokens.
    pub extra: bool,
}

impl SymbolInfo {
    pub fn is_terminal(&self) -> bool {
        matches!(
            self.kind,
            SymbolKind::End | SymbolKind::Error | SymbolKind::Terminal | SymbolKind::External
        )
    }
}
