//! Artifact header (32 bytes).
//!
//! Layout, all little-endian:
//! - 0-19: identity and sizes (magic, version, checksum, total_size, payload_size)
//! - 20-29: table counts (5 × u16), duplicated from the payload so a loader can
//!   size-check before decoding
//! - 30-31: reserved

use crate::constants::{HEADER_SIZE, MAGIC, VERSION};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Header {
    /// Magic bytes: b"NSPT"
    pub magic: [u8; 4],
    /// Format version
    pub version: u32,
    /// CRC32 of the payload (everything after the header)
    pub checksum: u32,
    /// Total artifact size in bytes
    pub total_size: u32,
    /// Payload size in bytes
    pub payload_size: u32,

    pub symbol_count: u16,
    pub state_count: u16,
    pub production_count: u16,
    pub terminal_count: u16,
    pub field_count: u16,

    pub _reserved: [u8; 2],
}

impl Default for Header {
    fn default() -> Self {
        Self {
            magic: MAGIC,
            version: VERSION,
            checksum: 0,
            total_size: 0,
            payload_size: 0,
            symbol_count: 0,
            state_count: 0,
            production_count: 0,
            terminal_count: 0,
            field_count: 0,
            _reserved: [0; 2],
        }
    }
}

impl Header {
    /// Decode a header from its fixed-size prefix.
    pub fn from_bytes(bytes: &[u8; HEADER_SIZE]) -> Self {
        let u32_at = |at: usize| u32::from_le_bytes([bytes[at], bytes[at + 1], bytes[at + 2], bytes[at + 3]]);
        let u16_at = |at: usize| u16::from_le_bytes([bytes[at], bytes[at + 1]]);

        Self {
            magic: [bytes[0], bytes[1], bytes[2], bytes[3]],
            version: u32_at(4),
            checksum: u32_at(8),
            total_size: u32_at(12),
            payload_size: u32_at(16),
            symbol_count: u16_at(20),
            state_count: u16_at(22),
            production_count: u16_at(24),
            terminal_count: u16_at(26),
            field_count: u16_at(28),
            _reserved: [bytes[30], bytes[31]],
        }
    }

    /// Encode the header to its fixed-size prefix.
    pub fn to_bytes(&self) -> [u8; HEADER_SIZE] {
        let mut bytes = [0u8; HEADER_SIZE];
        bytes[0..4].copy_from_slice(&self.magic);
        bytes[4..8].copy_from_slice(&self.version.to_le_bytes());
        bytes[8..12].copy_from_slice(&self.checksum.to_le_bytes());
        bytes[12..16].copy_from_slice(&self.total_size.to_le_bytes());
        bytes[16..20].copy_from_slice(&self.payload_size.to_le_bytes());
        bytes[20..22].copy_from_slice(&self.symbol_count.to_le_bytes());
        bytes[22..24].copy_from_slice(&self.state_count.to_le_bytes());
        bytes[24..26].copy_from_slice(&self.production_count.to_le_bytes());
        bytes[26..28].copy_from_slice(&self.terminal_count.to_le_bytes());
        bytes[28..30].copy_from_slice(&self.field_count.to_le_bytes());
        bytes[30..32].copy_from_slice(&self._reserved);
        bytes
    }

    pub fn validate_magic(&self) -> bool {
        self.magic == MAGIC
    }

    pub fn validate_version(&self) -> bool {
        self.version == VERSION
    }
}
