use indoc::indoc;
use numscript_grammar::{Grammar, Rule};

use crate::error::GenerateError;
use crate::intern::token_regex;
use crate::prepare::{Prepared, prepare};

fn prepared(json: &str) -> Prepared {
    prepare(&Grammar::from_json(json).unwrap()).unwrap()
}

fn symbol_table(prepared: &Prepared) -> String {
    let mut out = String::new();
    for (index, info) in prepared.symbols.iter().enumerate() {
        out.push_str(&format!(
            "{index} {} {:?}{}{}{}\n",
            info.name,
            info.kind,
            if info.named { " named" } else { "" },
            if info.visible { "" } else { " hidden" },
            if info.extra { " extra" } else { "" },
        ));
    }
    out
}

#[test]
fn terminals_numbered_by_first_appearance() {
    let prepared = prepared(indoc! {r#"
        {
          "name": "t",
          "extras": [{ "type": "PATTERN", "value": "\\s" }],
          "rules": {
            "program": { "type": "REPEAT", "content": { "type": "SYMBOL", "name": "item" } },
            "item": {
              "type": "CHOICE",
              "members": [
                { "type": "SYMBOL", "name": "word" },
                { "type": "STRING", "value": "(" }
              ]
            },
            "word": { "type": "PATTERN", "value": "[a-z]+" }
          }
        }
    "#});

    insta::assert_snapshot!(symbol_table(&prepared), @r"
    0 end End named hidden
    1 ERROR Error named
    2 word Terminal named
    3 ( Terminal
    4 _extra_token1 Terminal hidden extra
    5 program NonTerminal named
    6 item NonTerminal named
    7 program_repeat1 Auxiliary named hidden
    ");
    assert_eq!(prepared.terminal_count, 5);
    assert_eq!(prepared.nonterminal_count, 3);
    assert_eq!(prepared.start.0, 5);
    assert_eq!(prepared.extras.len(), 1);
}

#[test]
fn literal_used_elsewhere_stays_a_rule() {
    let prepared = prepared(indoc! {r#"
        {
          "name": "t",
          "rules": {
            "program": {
              "type": "SEQ",
              "members": [
                { "type": "SYMBOL", "name": "remaining_allotment" },
                { "type": "STRING", "value": "remaining" },
                { "type": "SYMBOL", "name": "kept" }
              ]
            },
            "remaining_allotment": { "type": "STRING", "value": "remaining" },
            "kept": { "type": "STRING", "value": "kept" }
          }
        }
    "#});

    insta::assert_snapshot!(symbol_table(&prepared), @r"
    0 end End named hidden
    1 ERROR Error named
    2 remaining Terminal
    3 kept Terminal named
    4 program NonTerminal named
    5 remaining_allotment NonTerminal named
    ");
}

#[test]
fn inline_patterns_become_hidden_tokens() {
    let prepared = prepared(indoc! {r#"
        {
          "name": "t",
          "rules": {
            "program": {
              "type": "SEQ",
              "members": [
                { "type": "PATTERN", "value": "[0-9]+" },
                { "type": "TOKEN", "content": { "type": "STRING", "value": "->" } },
                { "type": "PATTERN", "value": "[0-9]+" },
                { "type": "PATTERN", "value": "[a-z]+" }
              ]
            }
          }
        }
    "#});

    insta::assert_snapshot!(symbol_table(&prepared), @r"
    0 end End named hidden
    1 ERROR Error named
    2 program_token1 Terminal hidden
    3 -> Terminal
    4 program_token2 Terminal hidden
    5 program NonTerminal named
    ");
}

#[test]
fn token_content_to_regex() {
    let line_comment = Rule::Seq(vec![
        Rule::String("//".into()),
        Rule::Pattern {
            value: ".*".into(),
            flags: None,
        },
    ]);
    assert_eq!(token_regex(&line_comment, "c").unwrap(), "//(?:.*)");

    let keyword = Rule::Choice(vec![
        Rule::Pattern {
            value: "send".into(),
            flags: Some("i".into()),
        },
        Rule::Repeat1(Box::new(Rule::String("+".into()))),
    ]);
    assert_eq!(token_regex(&keyword, "k").unwrap(), r"(?:(?i:send)|(?:\+)+)");
}

#[test]
fn symbol_inside_token_is_rejected() {
    let rule = Rule::Seq(vec![Rule::String("a".into()), Rule::Symbol("b".into())]);
    let err = token_regex(&rule, "tok").unwrap_err();
    assert_eq!(err.to_string(), "token in `tok` refers to symbol `b`");
}

#[test]
fn non_token_extra_is_rejected() {
    let grammar = Grammar::from_json(indoc! {r#"
        {
          "name": "t",
          "extras": [{ "type": "SYMBOL", "name": "pair" }],
          "rules": {
            "program": { "type": "SYMBOL", "name": "pair" },
            "pair": {
              "type": "SEQ",
              "members": [
                { "type": "STRING", "value": "a" },
                { "type": "STRING", "value": "b" }
              ]
            }
          }
        }
    "#})
    .unwrap();
    let err = prepare(&grammar).unwrap_err();
    assert!(matches!(err, GenerateError::NonTokenExtra(ref name) if name == "pair"));
}

#[test]
fn external_scanner_must_be_known() {
    let grammar = Grammar::from_json(indoc! {r#"
        {
          "name": "t",
          "external_scanner": "heredoc",
          "externals": [{ "type": "SYMBOL", "name": "body" }],
          "rules": { "program": { "type": "SYMBOL", "name": "body" } }
        }
    "#})
    .unwrap();
    let err = prepare(&grammar).unwrap_err();
    assert_eq!(err.to_string(), "unknown external scanner `heredoc`");
}

#[test]
fn external_slots_are_limited() {
    let grammar = Grammar::from_json(indoc! {r#"
        {
          "name": "t",
          "external_scanner": "nested_comment",
          "externals": [
            { "type": "SYMBOL", "name": "comment" },
            { "type": "SYMBOL", "name": "other" }
          ],
          "rules": { "program": { "type": "SYMBOL", "name": "comment" } }
        }
    "#})
    .unwrap();
    let err = prepare(&grammar).unwrap_err();
    assert!(matches!(
        err,
        GenerateError::ExternalSlots {
            declared: 2,
            available: 1,
            ..
        }
    ));
}

#[test]
fn externals_come_after_builtin_terminals() {
    let prepared = prepared(indoc! {r#"
        {
          "name": "t",
          "external_scanner": "indentation",
          "externals": [
            { "type": "SYMBOL", "name": "_newline" },
            { "type": "SYMBOL", "name": "_indent" },
            { "type": "SYMBOL", "name": "_dedent" }
          ],
          "rules": {
            "program": {
              "type": "SEQ",
              "members": [
                { "type": "STRING", "value": "x" },
                { "type": "SYMBOL", "name": "_newline" }
              ]
            }
          }
        }
    "#});

    insta::assert_snapshot!(symbol_table(&prepared), @r"
    0 end End named hidden
    1 ERROR Error named
    2 x Terminal
    3 _newline External named hidden
    4 _indent External named hidden
    5 _dedent External named hidden
    6 program NonTerminal named
    ");
    assert_eq!(prepared.external_tokens.len(), 3);
}
