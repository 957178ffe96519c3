use crate::constants::{HEADER_SIZE, VERSION};

/// Failure to load a grammar artifact. Both variants are fatal: no parse is
/// attempted with a table that failed to load.
#[derive(Debug, thiserror::Error)]
pub enum LanguageError {
    #[error("incompatible grammar version: artifact has {found}, engine expects {VERSION}")]
    IncompatibleGrammarVersion { found: u32 },
    #[error("unrecoverable grammar: {0}")]
    UnrecoverableGrammar(#[from] GrammarDefect),
}

/// What exactly is wrong with a malformed artifact.
#[derive(Debug, thiserror::Error)]
pub enum GrammarDefect {
    #[error("artifact too small: {0} bytes (minimum {HEADER_SIZE})")]
    Truncated(usize),
    #[error("invalid magic: expected NSPT")]
    InvalidMagic,
    #[error("size mismatch: header says {header} bytes, got {actual}")]
    SizeMismatch { header: u32, actual: usize },
    #[error("checksum mismatch: header says {header:#010x}, payload hashes to {actual:#010x}")]
    ChecksumMismatch { header: u32, actual: u32 },
    #[error("payload decode failed: {0}")]
    Decode(#[from] postcard::Error),
    #[error("token `{symbol}` has an invalid DFA: {message}")]
    Dfa { symbol: String, message: String },
    #[error("inconsistent table: {0}")]
    Inconsistent(String),
}
