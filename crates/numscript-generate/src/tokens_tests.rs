use indoc::indoc;
use numscript_grammar::Grammar;
use numscript_tables::{TokenDef, TokenMatcher, deserialize_dfa};

use crate::error::GenerateError;
use crate::generate;
use crate::tokens::TokenTableBuilder;

fn pattern_grammar(pattern: &str) -> Grammar {
    let json = indoc! {r#"
        {
          "name": "t",
          "rules": {
            "program": { "type": "SYMBOL", "name": "word" },
            "word": { "type": "PATTERN", "value": "REGEX" }
          }
        }
    "#};
    Grammar::from_json(&json.replace("REGEX", pattern)).unwrap()
}

#[test]
fn pattern_matching_empty_string_is_rejected() {
    let err = generate(&pattern_grammar("x*")).unwrap_err();
    assert!(matches!(err, GenerateError::EmptyToken(ref name) if name == "word"));
}

#[test]
fn invalid_regex_is_rejected() {
    let err = generate(&pattern_grammar("(unclosed")).unwrap_err();
    assert!(matches!(err, GenerateError::InvalidRegex { ref token, .. } if token == "word"));
}

#[test]
fn compiled_dfa_takes_longest_match() {
    let mut builder = TokenTableBuilder::new();
    let bytes = builder.intern("number", r"-?[0-9]+(_[0-9]+)*").unwrap();
    let matcher = TokenMatcher::Pattern(deserialize_dfa(&bytes).unwrap());

    assert_eq!(matcher.scan(b"1_000_000 ").len, Some(9));
    assert_eq!(matcher.scan(b"-42]").len, Some(3));
    assert_eq!(matcher.scan(b"12_").len, Some(2));
    assert_eq!(matcher.scan(b"_1").len, None);
}

#[test]
fn identical_patterns_compile_once() {
    let mut builder = TokenTableBuilder::new();
    let first = builder.intern("a", "[a-z]+").unwrap();
    let second = builder.intern("b", "[a-z]+").unwrap();
    assert_eq!(first, second);
}

#[test]
fn literals_stay_literal() {
    let grammar = Grammar::from_json(indoc! {r#"
        {
          "name": "t",
          "rules": {
            "program": {
              "type": "SEQ",
              "members": [
                { "type": "STRING", "value": "send" },
                { "type": "TOKEN", "content": { "type": "STRING", "value": "//" } },
                { "type": "TOKEN", "content": {
                  "type": "SEQ",
                  "members": [{ "type": "STRING", "value": "/*" }, { "type": "PATTERN", "value": "[^*]*" }]
                }}
              ]
            }
          }
        }
    "#})
    .unwrap();
    let data = generate(&grammar).unwrap().data;

    assert_eq!(data.tokens[2], TokenDef::Literal("send".to_string()));
    assert_eq!(data.tokens[3], TokenDef::Literal("//".to_string()));
    assert!(matches!(
        &data.tokens[4],
        TokenDef::Pattern { source, .. } if source == r"/\*(?:[^*]*)"
    ));
}
