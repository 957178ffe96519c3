use super::*;

fn grammar(json: &str) -> Grammar {
    Grammar::from_json(json).unwrap()
}

#[test]
fn accepts_resolved_references() {
    let g = grammar(
        r#"{
            "name": "test",
            "rules": {
                "program": { "type": "SEQ", "members": [
                    { "type": "SYMBOL", "name": "item" },
                    { "type": "SYMBOL", "name": "indent" }
                ]},
                "item": { "type": "STRING", "value": "x" }
            },
            "externals": [{ "type": "SYMBOL", "name": "indent" }]
        }"#,
    );

    g.validate().unwrap();
}

#[test]
fn reports_undefined_symbol_with_context() {
    let g = grammar(
        r#"{
            "name": "test",
            "rules": {
                "program": { "type": "REPEAT", "content": {
                    "type": "FIELD", "name": "body", "content": { "type": "SYMBOL", "name": "stmt" }
                }}
            }
        }"#,
    );

    let err = g.validate().unwrap_err();
    assert_eq!(
        err.to_string(),
        "undefined symbol `stmt` referenced from `program`"
    );
}

#[test]
fn reports_undefined_extra() {
    let g = grammar(
        r#"{
            "name": "test",
            "rules": { "program": { "type": "STRING", "value": "x" } },
            "extras": [{ "type": "SYMBOL", "name": "comment" }]
        }"#,
    );

    let err = g.validate().unwrap_err();
    assert!(matches!(
        err,
        GrammarError::UndefinedSymbol { ref symbol, ref context } if symbol == "comment" && context == "extras"
    ));
}

#[test]
fn reports_undefined_conflict_member() {
    let g = grammar(
        r#"{
            "name": "test",
            "rules": { "program": { "type": "STRING", "value": "x" } },
            "conflicts": [["program", "ghost"]]
        }"#,
    );

    assert!(matches!(
        g.validate(),
        Err(GrammarError::UndefinedSymbol { symbol, .. }) if symbol == "ghost"
    ));
}

#[test]
fn rejects_empty_and_duplicate_rules() {
    let empty = grammar(r#"{ "name": "void", "rules": {} }"#);
    assert_eq!(empty.validate().unwrap_err().to_string(), "grammar `void` defines no rules");

    let mut dup = grammar(r#"{ "name": "test", "rules": { "a": { "type": "BLANK" } } }"#);
    dup.rules.push(("a".into(), Rule::Blank));
    assert!(matches!(dup.validate(), Err(GrammarError::DuplicateRule(name)) if name == "a"));
}
