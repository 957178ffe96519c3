//! Index newtypes used throughout the tables.

use serde::{Deserialize, Serialize};

/// Grammar symbol id (terminal, nonterminal, or alias).
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Symbol(pub u16);

impl Symbol {
    /// End of input.
    pub const END: Symbol = Symbol(0);
    /// Error nodes and unrecognized input.
    pub const ERROR: Symbol = Symbol(1);

    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// Parse state id.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StateId(pub u16);

impl StateId {
    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// Production id.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProductionId(pub u16);

impl ProductionId {
    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// Field id, an index into the language's field-name table.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FieldId(pub u16);

impl FieldId {
    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}
