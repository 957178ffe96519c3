//! GLR parse engine.
//!
//! The machine runs LR actions on a graph-structured stack, forking where
//! the table holds several actions and merging versions that reach the same
//! configuration. Recovery keeps a single failing version moving, and the
//! reuse cursor splices unchanged subtrees of a previous tree into the new
//! parse.

pub(crate) mod costs;
mod limits;
mod machine;
mod parser;
mod recovery;
mod reuse;
pub mod select;
mod stack;


pub use limits::ParseLimits;
pub use parser::{Parser, ParserBuilder};
pub use recovery::RecoveryMode;
