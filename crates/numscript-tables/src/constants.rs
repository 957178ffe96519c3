/// Magic bytes identifying a Numscript parse-table artifact.
pub const MAGIC: [u8; 4] = *b"NSPT";

/// Artifact format version. Bumped whenever the payload layout changes.
pub const VERSION: u32 = 1;

/// Size of the fixed header that precedes the payload.
pub const HEADER_SIZE: usize = 32;

/// Goto table entry meaning "no transition".
pub const NO_GOTO: u16 = u16::MAX;
