//! Tokenizer driven by the parse state's lex mode.
//!
//! Order of attempts at the cursor:
//! 1. the external scanner, when the mode has external slots
//! 2. the end token, at end of input
//! 3. longest match over the mode's terminals (extras included)
//! 4. longest match over every terminal
//!
//! When all of them fail the caller gets [`NoViableToken`].

use std::ops::Range;

use numscript_tables::{Language, StateId, Symbol};

use crate::scanner::{ExternalScanner, ScannerState};
use crate::tree::{LineIndex, Point};

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Token {
    pub symbol: Symbol,
    pub range: Range<usize>,
    /// One past the furthest byte the lexer examined to produce this token.
    pub scan_end: usize,
    /// Row and column of `range.start`.
    pub point: Point,
}

impl Token {
    pub fn len(&self) -> usize {
        self.range.end - self.range.start
    }

    pub fn is_empty(&self) -> bool {
        self.range.is_empty()
    }
}

/// A token plus the scanner state after it.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Lexed {
    pub token: Token,
    pub scanner: ScannerState,
}

/// Nothing matches at the cursor, even in error mode.
#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
#[error("no token matches at byte {position}")]
pub struct NoViableToken {
    pub position: usize,
    pub scan_end: usize,
}

pub struct Lexer<'s> {
    language: Language,
    source: &'s str,
    lines: &'s LineIndex,
    scanner: Option<ExternalScanner>,
    position: usize,
}

impl<'s> Lexer<'s> {
    pub fn new(language: &Language, source: &'s str, lines: &'s LineIndex) -> Self {
        Self {
            language: language.clone(),
            source,
            lines,
            scanner: language.scanner().map(ExternalScanner::from),
            position: 0,
        }
    }

    pub fn source(&self) -> &'s str {
        self.source
    }

    pub fn position(&self) -> usize {
        self.position
    }

    /// Move the cursor. The parser calls this whenever it switches stack
    /// versions or backs up during recovery.
    pub fn rewind(&mut self, position: usize) {
        self.position = position.min(self.source.len());
    }

    pub fn point(&self, offset: usize) -> Point {
        self.lines.point(offset)
    }

    /// Lex one token at the cursor using the lex mode of `state`, and move
    /// the cursor past it.
    pub fn next_token(
        &mut self,
        state: StateId,
        scanner: &ScannerState,
    ) -> Result<Lexed, NoViableToken> {
        self.lex(state, scanner, true)
    }

    /// Like [`Lexer::next_token`], but without consulting the external
    /// scanner. Used to get past a zero-width external token that could not
    /// be parsed.
    pub(crate) fn next_builtin_token(
        &mut self,
        state: StateId,
        scanner: &ScannerState,
    ) -> Result<Lexed, NoViableToken> {
        self.lex(state, scanner, false)
    }

    fn lex(
        &mut self,
        state: StateId,
        scanner_state: &ScannerState,
        externals: bool,
    ) -> Result<Lexed, NoViableToken> {
        let language = self.language.clone();
        let input = self.source.as_bytes();
        let start = self.position;
        let mode = language.lex_mode(state);
        let mut examined = 0;

        if externals
            && !mode.externals.is_empty()
            && let Some(scanner) = self.scanner
        {
            let outcome = scanner.scan(input, start, &mode.externals, scanner_state);
            examined = outcome.examined;
            if let Some(found) = outcome.token
                && let Some(&symbol) = language.external_tokens().get(found.slot as usize)
            {
                return Ok(self.finish(symbol, found.len, examined, outcome.state));
            }
        }

        if start >= input.len() {
            return Ok(self.finish(Symbol::END, 0, examined, scanner_state.clone()));
        }

        let rest = &input[start..];
        let found = longest_match(&language, &mode.terminals, rest, &mut examined).or_else(|| {
            longest_match(
                &language,
                &language.error_lex_mode().terminals,
                rest,
                &mut examined,
            )
        });

        match found {
            Some((symbol, len)) => Ok(self.finish(symbol, len, examined, scanner_state.clone())),
            None => Err(NoViableToken {
                position: start,
                scan_end: start + examined.max(1),
            }),
        }
    }

    fn finish(&mut self, symbol: Symbol, len: usize, examined: usize, scanner: ScannerState) -> Lexed {
        let start = self.position;
        let end = start + len;
        self.position = end;
        Lexed {
            token: Token {
                symbol,
                range: start..end,
                scan_end: start + examined.max(len),
                point: self.lines.point(start),
            },
            scanner,
        }
    }
}

/// Longest non-empty match among `terminals`. On equal length a literal
/// beats a pattern, then the lower symbol id wins. `examined` is raised to
/// cover every byte any recognizer looked at.
fn longest_match(
    language: &Language,
    terminals: &[Symbol],
    input: &[u8],
    examined: &mut usize,
) -> Option<(Symbol, usize)> {
    let mut best: Option<(Symbol, usize, bool)> = None;
    for &terminal in terminals {
        let matcher = language.token_matcher(terminal);
        let scan = matcher.scan(input);
        *examined = (*examined).max(scan.examined);
        let Some(len) = scan.len.filter(|&len| len > 0) else {
            continue;
        };
        let literal = matcher.is_literal();
        let better = match best {
            None => true,
            Some((_, best_len, best_literal)) => {
                len > best_len || (len == best_len && literal && !best_literal)
            }
        };
        if better {
            best = Some((terminal, len, literal));
        }
    }
    best.map(|(symbol, len, _)| (symbol, len))
}
