use numscript_tables::{Language, StateId};

use crate::lexer::{Lexer, NoViableToken};
use crate::scanner::ScannerState;
use crate::test_utils::{KEYWORDS, LIST, language};
use crate::tree::{LineIndex, Point};

/// Lex the whole source in one state, returning `name start..end` lines.
fn tokens(language: &Language, source: &str, state: StateId) -> Vec<String> {
    let lines = LineIndex::new(source);
    let mut lexer = Lexer::new(language, source, &lines);
    let mut out = Vec::new();
    loop {
        let lexed = lexer.next_token(state, &ScannerState::default()).unwrap();
        let token = lexed.token;
        out.push(format!(
            "{} {}..{}",
            language.symbol_name(token.symbol),
            token.range.start,
            token.range.end
        ));
        if token.is_empty() {
            return out;
        }
    }
}

#[test]
fn lexes_in_mode_then_falls_back() {
    let language = language(LIST);
    let start = language.start_state();

    let tokens = tokens(&language, "[ 12]", start);

    insta::assert_debug_snapshot!(tokens, @r#"
    [
        "[ 0..1",
        "_extra_token1 1..2",
        "number 2..4",
        "] 4..5",
        "end 5..5",
    ]
    "#);
}

#[test]
fn pattern_token_records_bytes_examined() {
    let language = language(LIST);
    let source = "[ 12]";
    let lines = LineIndex::new(source);
    let mut lexer = Lexer::new(&language, source, &lines);
    lexer.rewind(2);

    let token = lexer
        .next_token(language.start_state(), &ScannerState::default())
        .unwrap()
        .token;

    assert_eq!(token.range, 2..4);
    assert_eq!(token.scan_end, 5);
    assert_eq!(lexer.position(), 4);
}

#[test]
fn nothing_matches() {
    let language = language(LIST);
    let source = "[ #";
    let lines = LineIndex::new(source);
    let mut lexer = Lexer::new(&language, source, &lines);
    lexer.rewind(2);

    let err = lexer
        .next_token(language.start_state(), &ScannerState::default())
        .unwrap_err();

    assert_eq!(
        err,
        NoViableToken {
            position: 2,
            scan_end: 3
        }
    );
    assert_eq!(err.to_string(), "no token matches at byte 2");
}

#[test]
fn literal_wins_tie_with_pattern() {
    let language = language(KEYWORDS);
    let start = language.start_state();

    insta::assert_debug_snapshot!(tokens(&language, "if iffy", start), @r#"
    [
        "if 0..2",
        "_extra_token1 2..3",
        "identifier 3..7",
        "end 7..7",
    ]
    "#);
}

#[test]
fn end_token_at_eof() {
    let language = language(LIST);
    let lines = LineIndex::new("");
    let mut lexer = Lexer::new(&language, "", &lines);

    let token = lexer
        .next_token(language.start_state(), &ScannerState::default())
        .unwrap()
        .token;

    assert_eq!(token.symbol, numscript_tables::Symbol::END);
    assert!(token.is_empty());
}

#[test]
fn token_points() {
    let language = language(LIST);
    let source = "[\n  7]";
    let lines = LineIndex::new(source);
    let mut lexer = Lexer::new(&language, source, &lines);
    lexer.rewind(4);

    let token = lexer
        .next_token(language.start_state(), &ScannerState::default())
        .unwrap()
        .token;

    assert_eq!(token.range, 4..5);
    assert_eq!(token.point, Point::new(1, 2));
}

#[test]
fn rewind_clamps_to_source() {
    let language = language(LIST);
    let lines = LineIndex::new("[]");
    let mut lexer = Lexer::new(&language, "[]", &lines);

    lexer.rewind(10);

    assert_eq!(lexer.position(), 2);
}
