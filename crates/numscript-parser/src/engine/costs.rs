//! Error-cost scale used to rank recovered parses.

/// Charged once per `ERROR` node.
pub const RECOVERY: u32 = 500;

/// Charged per zero-width `MISSING` leaf.
pub const MISSING: u32 = 110;

/// Charged per subtree swallowed by an `ERROR` node.
pub const SKIPPED_TREE: u32 = 100;

/// Charged per byte covered by an `ERROR` node.
pub const SKIPPED_CHAR: u32 = 1;
