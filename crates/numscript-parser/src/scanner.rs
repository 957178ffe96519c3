//! Built-in external scanners.
//!
//! A grammar names one of these in `external_scanner` and lists the tokens
//! it produces in `externals`. The lexer consults the scanner before its own
//! recognizers whenever the current lex mode has external slots.

use std::sync::Arc;

use numscript_tables::ScannerKind;

/// Scanner state carried from one token to the next.
///
/// The blob is opaque to the parser; equality is byte equality. `None`
/// stands for the scanner's initial state.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct ScannerState(Option<Arc<[u8]>>);

impl ScannerState {
    pub fn from_bytes(bytes: &[u8]) -> Self {
        if bytes.is_empty() {
            Self(None)
        } else {
            Self(Some(bytes.into()))
        }
    }

    pub fn as_bytes(&self) -> &[u8] {
        self.0.as_deref().unwrap_or(&[])
    }

    pub fn is_initial(&self) -> bool {
        self.0.is_none()
    }
}

/// A token recognized by an external scanner.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ExternalToken {
    /// Index into the grammar's `externals`.
    pub slot: u16,
    pub len: usize,
}

/// Result of one scanner invocation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ScanOutcome {
    pub token: Option<ExternalToken>,
    /// State after the token; unchanged when nothing was recognized.
    pub state: ScannerState,
    /// Bytes looked at, counted from the scan position.
    pub examined: usize,
}

impl ScanOutcome {
    fn nothing(state: &ScannerState, examined: usize) -> Self {
        Self {
            token: None,
            state: state.clone(),
            examined,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ExternalScanner {
    /// Slots: `newline`, `indent`, `dedent`. The state is the indent stack,
    /// one little-endian `u16` per open level.
    Indentation,
    /// Slot: `comment`. Stateless.
    NestedComment,
}

impl From<ScannerKind> for ExternalScanner {
    fn from(kind: ScannerKind) -> Self {
        match kind {
            ScannerKind::Indentation => ExternalScanner::Indentation,
            ScannerKind::NestedComment => ExternalScanner::NestedComment,
        }
    }
}

impl ExternalScanner {
    /// Try to recognize a token at `position`. `valid` holds the slots the
    /// current parse state accepts; tokens for other slots are never returned.
    pub fn scan(
        self,
        input: &[u8],
        position: usize,
        valid: &[u16],
        state: &ScannerState,
    ) -> ScanOutcome {
        match self {
            ExternalScanner::Indentation => scan_indentation(input, position, valid, state),
            ExternalScanner::NestedComment => scan_nested_comment(input, position, valid, state),
        }
    }
}

const NEWLINE: u16 = 0;
const INDENT: u16 = 1;
const DEDENT: u16 = 2;

fn decode_indents(state: &ScannerState) -> Vec<u16> {
    state
        .as_bytes()
        .chunks_exact(2)
        .map(|pair| u16::from_le_bytes([pair[0], pair[1]]))
        .collect()
}

fn encode_indents(indents: &[u16]) -> ScannerState {
    let bytes: Vec<u8> = indents.iter().flat_map(|level| level.to_le_bytes()).collect();
    ScannerState::from_bytes(&bytes)
}

fn token(slot: u16, len: usize, state: ScannerState, examined: usize) -> ScanOutcome {
    ScanOutcome {
        token: Some(ExternalToken { slot, len }),
        state,
        examined,
    }
}

fn scan_indentation(
    input: &[u8],
    position: usize,
    valid: &[u16],
    state: &ScannerState,
) -> ScanOutcome {
    let rest = &input[position.min(input.len())..];
    let mut indents = decode_indents(state);
    let current = indents.last().copied().unwrap_or(0) as usize;

    // A newline swallows the blank lines after it, so indentation is only
    // ever measured on a line with content.
    if valid.contains(&NEWLINE) && rest.first() == Some(&b'\n') {
        let mut len = 1;
        let examined = loop {
            let line = &rest[len..];
            let blank = line
                .iter()
                .take_while(|&&b| matches!(b, b' ' | b'\t' | b'\r'))
                .count();
            if line.get(blank) != Some(&b'\n') {
                break (len + blank + 1).min(rest.len());
            }
            len += blank + 1;
        };
        return token(NEWLINE, len, state.clone(), examined);
    }

    if rest.is_empty() {
        if valid.contains(&DEDENT) && indents.pop().is_some() {
            return token(DEDENT, 0, encode_indents(&indents), 0);
        }
        return ScanOutcome::nothing(state, 0);
    }

    let at_line_start = position == 0 || input.get(position - 1) == Some(&b'\n');
    if !at_line_start {
        return ScanOutcome::nothing(state, 0);
    }

    let width = rest.iter().take_while(|&&b| b == b' ').count();
    let examined = (width + 1).min(rest.len());
    if matches!(rest.get(width), None | Some(b'\n')) {
        return ScanOutcome::nothing(state, examined);
    }

    if width > current && valid.contains(&INDENT) {
        indents.push(width.min(u16::MAX as usize) as u16);
        return token(INDENT, width, encode_indents(&indents), examined);
    }
    if width < current && valid.contains(&DEDENT) {
        indents.pop();
        return token(DEDENT, 0, encode_indents(&indents), examined);
    }
    ScanOutcome::nothing(state, examined)
}

fn scan_nested_comment(
    input: &[u8],
    position: usize,
    valid: &[u16],
    state: &ScannerState,
) -> ScanOutcome {
    let rest = &input[position.min(input.len())..];
    if !valid.contains(&0) || !rest.starts_with(b"/*") {
        return ScanOutcome::nothing(state, rest.len().min(2));
    }

    let mut depth = 0usize;
    let mut i = 0;
    while i + 1 < rest.len() {
        match (rest[i], rest[i + 1]) {
            (b'/', b'*') => {
                depth += 1;
                i += 2;
            }
            (b'*', b'/') => {
                depth -= 1;
                i += 2;
                if depth == 0 {
                    return token(0, i, state.clone(), i);
                }
            }
            _ => i += 1,
        }
    }
    // Unterminated: let the built-in lexer have the bytes.
    ScanOutcome::nothing(state, rest.len())
}
