use crate::error::{GrammarDefect, LanguageError};
use crate::ids::{ProductionId, StateId, Symbol};
use crate::language::Language;
use crate::lexical::{ScannerKind, TokenDef, TokenMatcher};
use crate::symbols::SymbolKind;
use crate::test_utils::{pattern_dfa, symbol, tiny_language};
use crate::ParseAction;

#[test]
fn accessors() {
    let language = Language::from_data(tiny_language()).unwrap();
    let a = Symbol(2);
    let s = Symbol(3);

    assert_eq!(language.name(), "tiny");
    assert_eq!(language.symbol_count(), 4);
    assert_eq!(language.terminal_count(), 3);
    assert_eq!(language.symbol_name(Symbol::END), "end");
    assert!(!language.is_visible(Symbol::END));
    assert!(!language.is_named(a));
    assert!(language.is_terminal(a));
    assert!(!language.is_terminal(s));
    assert_eq!(language.symbol_for_name("a", false), Some(a));
    assert_eq!(language.symbol_for_name("a", true), None);
    assert_eq!(language.symbol_for_name("S", true), Some(s));
    assert_eq!(language.start_symbol(), s);
}

#[test]
fn action_and_goto_lookup() {
    let language = Language::from_data(tiny_language()).unwrap();
    let a = Symbol(2);
    let s = Symbol(3);

    assert_eq!(
        language.actions(StateId(0), a),
        &[ParseAction::Shift(StateId(1))]
    );
    assert!(language.actions(StateId(0), Symbol::END).is_empty());
    assert_eq!(
        language.actions(StateId(1), Symbol::END),
        &[ParseAction::Reduce(ProductionId(0))]
    );
    assert_eq!(language.actions(StateId(2), Symbol::END), &[ParseAction::Accept]);
    // nonterminals have no actions
    assert!(language.actions(StateId(0), s).is_empty());

    assert_eq!(language.goto(StateId(0), s), Some(StateId(2)));
    assert_eq!(language.goto(StateId(1), s), None);
    assert_eq!(language.goto(StateId(0), a), None);
}

#[test]
fn lex_modes() {
    let language = Language::from_data(tiny_language()).unwrap();
    assert_eq!(language.lex_mode(StateId(0)).terminals, vec![Symbol(2)]);
    assert!(language.lex_mode(StateId(2)).terminals.is_empty());
    assert_eq!(language.error_lex_mode().terminals, vec![Symbol(2)]);
    assert!(language.token_matcher(Symbol(2)).is_literal());
    assert!(matches!(
        language.token_matcher(Symbol::END),
        TokenMatcher::Builtin
    ));
}

#[test]
fn clones_share_tables() {
    let language = Language::from_data(tiny_language()).unwrap();
    let other = Language::from_data(tiny_language()).unwrap();
    assert!(language.ptr_eq(&language.clone()));
    assert!(!language.ptr_eq(&other));
}

#[test]
fn pattern_tokens_are_deserialized_at_load() {
    let mut data = tiny_language();
    data.tokens[2] = TokenDef::Pattern {
        source: "a+".to_string(),
        dfa: pattern_dfa("a+"),
    };
    let language = Language::from_data(data).unwrap();
    assert_eq!(
        language.token_matcher(Symbol(2)).scan(b"aab").len,
        Some(2)
    );
}

#[test]
fn invalid_dfa_names_the_token() {
    let mut data = tiny_language();
    data.tokens[2] = TokenDef::Pattern {
        source: "a+".to_string(),
        dfa: vec![0; 16],
    };
    let err = Language::from_data(data).unwrap_err();
    assert!(matches!(
        err,
        LanguageError::UnrecoverableGrammar(GrammarDefect::Dfa { ref symbol, .. }) if symbol == "a"
    ));
}

#[test]
fn external_tokens_require_a_scanner() {
    let mut data = tiny_language();
    data.symbols[2] = symbol("newline", SymbolKind::External, true, true);
    data.tokens[2] = TokenDef::External(0);
    data.external_tokens = vec![Symbol(2)];
    data.lex_modes[0].terminals.clear();
    data.lex_modes[0].externals = vec![0];

    assert!(Language::from_data(data.clone()).is_err());

    data.scanner = Some(ScannerKind::Indentation);
    let language = Language::from_data(data).unwrap();
    assert_eq!(language.scanner(), Some(ScannerKind::Indentation));
    assert_eq!(language.external_tokens(), &[Symbol(2)]);
    assert!(language.error_lex_mode().terminals.is_empty());
}

#[test]
fn misplaced_symbol_kinds_are_rejected() {
    let mut data = tiny_language();
    data.symbols.swap(0, 1);
    assert!(Language::from_data(data).is_err());

    let mut data = tiny_language();
    data.terminal_count = 4;
    assert!(Language::from_data(data).is_err());
}

#[test]
fn scanner_kind_names() {
    for kind in [ScannerKind::Indentation, ScannerKind::NestedComment] {
        assert_eq!(ScannerKind::from_name(kind.name()), Some(kind));
    }
    assert_eq!(ScannerKind::from_name("heredoc"), None);
}
