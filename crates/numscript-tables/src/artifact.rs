//! Binary artifact codec: fixed header followed by a postcard payload.

use crate::constants::HEADER_SIZE;
use crate::error::{GrammarDefect, LanguageError};
use crate::header::Header;
use crate::language::LanguageData;

/// Serialize tables into a versioned, checksummed artifact.
pub fn encode(data: &LanguageData) -> Result<Vec<u8>, postcard::Error> {
    let payload = postcard::to_allocvec(data)?;

    let header = Header {
        checksum: crc32fast::hash(&payload),
        total_size: (HEADER_SIZE + payload.len()) as u32,
        payload_size: payload.len() as u32,
        symbol_count: data.symbols.len() as u16,
        state_count: data.state_count,
        production_count: data.productions.len() as u16,
        terminal_count: data.terminal_count,
        field_count: data.fields.len() as u16,
        ..Header::default()
    };

    let mut bytes = Vec::with_capacity(HEADER_SIZE + payload.len());
    bytes.extend_from_slice(&header.to_bytes());
    bytes.extend_from_slice(&payload);
    Ok(bytes)
}

/// Check the header and decode the payload.
///
/// Order matters: the version is checked right after the magic so that an
/// artifact from another format revision reports as incompatible rather than
/// as corrupt.
pub(crate) fn decode(bytes: &[u8]) -> Result<LanguageData, LanguageError> {
    let Some(prefix) = bytes.first_chunk::<HEADER_SIZE>() else {
        return Err(GrammarDefect::Truncated(bytes.len()).into());
    };
    let header = Header::from_bytes(prefix);

    if !header.validate_magic() {
        return Err(GrammarDefect::InvalidMagic.into());
    }
    if !header.validate_version() {
        return Err(LanguageError::IncompatibleGrammarVersion {
            found: header.version,
        });
    }
    if header.total_size as usize != bytes.len()
        || header.payload_size as usize + HEADER_SIZE != bytes.len()
    {
        return Err(GrammarDefect::SizeMismatch {
            header: header.total_size,
            actual: bytes.len(),
        }
        .into());
    }

    let payload = &bytes[HEADER_SIZE..];
    let actual = crc32fast::hash(payload);
    if actual != header.checksum {
        return Err(GrammarDefect::ChecksumMismatch {
            header: header.checksum,
            actual,
        }
        .into());
    }

    let data: LanguageData = postcard::from_bytes(payload).map_err(GrammarDefect::Decode)?;

    let counts = [
        (header.symbol_count as usize, data.symbols.len(), "symbol"),
        (header.state_count as usize, data.state_count as usize, "state"),
        (header.production_count as usize, data.productions.len(), "production"),
        (header.terminal_count as usize, data.terminal_count as usize, "terminal"),
        (header.field_count as usize, data.fields.len(), "field"),
    ];
    for (in_header, in_payload, what) in counts {
        if in_header != in_payload {
            return Err(GrammarDefect::Inconsistent(format!(
                "header declares {in_header} {what}s, payload has {in_payload}"
            ))
            .into());
        }
    }

    Ok(data)
}
