use serde::{Deserialize, Serialize};

use crate::ids::{FieldId, ProductionId, StateId, Symbol};

/// One entry of the action table.
///
/// A (state, lookahead) cell may hold several actions; that is where the
/// parser forks.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ParseAction {
    Shift(StateId),
    Reduce(ProductionId),
    Accept,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Associativity {
    #[default]
    None,
    Left,
    Right,
}

/// A grammar production, with the metadata the runtime needs to build nodes
/// and to choose between ambiguous parses.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Production {
    pub lhs: Symbol,
    /// Number of non-extra children popped on reduce.
    pub child_count: u16,
    pub precedence: i32,
    pub associativity: Associativity,
    pub dynamic_precedence: i32,
    /// Per-child rename, either empty or `child_count` long.
    pub aliases: Vec<Option<Symbol>>,
    /// Per-child field, either empty or `child_count` long.
    pub fields: Vec<Option<FieldId>>,
}

impl Production {
    #[inline]
    pub fn alias_at(&self, index: usize) -> Option<Symbol> {
        self.aliases.get(index).copied().flatten()
    }

    #[inline]
    pub fn field_at(&self, index: usize) -> Option<FieldId> {
        self.fields.get(index).copied().flatten()
    }
}
