use indoc::indoc;
use numscript_grammar::Grammar;
use numscript_tables::ParseAction;

use crate::generate;

fn binary_grammar(operator: &str, conflicts: &str) -> Grammar {
    let json = indoc! {r#"
        {
          "name": "t",
          "conflicts": CONFLICTS,
          "rules": {
            "expr": {
              "type": "CHOICE",
              "members": [
                OPERATOR,
                { "type": "SYMBOL", "name": "number" }
              ]
            },
            "number": { "type": "PATTERN", "value": "[0-9]+" }
          }
        }
    "#};
    let binary = r#"{ "type": "SEQ", "members": [
        { "type": "SYMBOL", "name": "expr" },
        { "type": "STRING", "value": "-" },
        { "type": "SYMBOL", "name": "expr" }
    ]}"#;
    let operator = match operator {
        "left" => format!(r#"{{ "type": "PREC_LEFT", "value": 1, "content": {binary} }}"#),
        "right" => format!(r#"{{ "type": "PREC_RIGHT", "value": 1, "content": {binary} }}"#),
        _ => binary.to_string(),
    };
    Grammar::from_json(
        &json
            .replace("OPERATOR", &operator)
            .replace("CONFLICTS", conflicts),
    )
    .unwrap()
}

#[test]
fn left_associativity_resolves_statically() {
    let generated = generate(&binary_grammar("left", "[]")).unwrap();
    assert!(generated.conflicts.is_empty());
}

#[test]
fn right_associativity_resolves_statically() {
    let generated = generate(&binary_grammar("right", "[]")).unwrap();
    assert!(generated.conflicts.is_empty());
}

#[test]
fn unresolved_conflict_is_kept_for_runtime() {
    let generated = generate(&binary_grammar("none", "[]")).unwrap();
    let report = &generated.conflicts;

    assert_eq!(report.conflicts.len(), 1);
    let conflict = &report.conflicts[0];
    assert_eq!(conflict.lookahead, "-");
    assert_eq!(conflict.symbols, vec!["expr".to_string()]);
    assert!(!conflict.expected);
    assert!(matches!(
        conflict.actions.as_slice(),
        [ParseAction::Shift(_), ParseAction::Reduce(_)]
    ));
    assert_eq!(report.unexpected().count(), 1);
    assert!(report.to_string().starts_with(&format!(
        "state {} on \"-\": 2 actions among [expr]",
        conflict.state.0
    )));
}

#[test]
fn declared_conflict_is_expected() {
    let generated = generate(&binary_grammar("none", r#"[["expr"]]"#)).unwrap();
    let report = &generated.conflicts;

    assert_eq!(report.conflicts.len(), 1);
    assert!(report.conflicts[0].expected);
    assert_eq!(report.unexpected().count(), 0);
    assert!(report.to_string().ends_with("(expected)\n"));
}

#[test]
fn higher_precedence_wins_over_associativity() {
    // `-` binds looser than `/`, so after `a - b` a `/` is shifted and after
    // `a / b` a `-` reduces.
    let grammar = Grammar::from_json(indoc! {r#"
        {
          "name": "t",
          "rules": {
            "expr": {
              "type": "CHOICE",
              "members": [
                { "type": "PREC_LEFT", "value": 1, "content": { "type": "SEQ", "members": [
                  { "type": "SYMBOL", "name": "expr" },
                  { "type": "STRING", "value": "-" },
                  { "type": "SYMBOL", "name": "expr" }
                ]}},
                { "type": "PREC_LEFT", "value": 2, "content": { "type": "SEQ", "members": [
                  { "type": "SYMBOL", "name": "expr" },
                  { "type": "STRING", "value": "/" },
                  { "type": "SYMBOL", "name": "expr" }
                ]}},
                { "type": "SYMBOL", "name": "number" }
              ]
            },
            "number": { "type": "PATTERN", "value": "[0-9]+" }
          }
        }
    "#})
    .unwrap();
    let generated = generate(&grammar).unwrap();
    assert!(generated.conflicts.is_empty());

    let data = &generated.data;
    let terminals = data.terminal_count as usize;
    let slash = data.symbols.iter().position(|s| s.name == "/").unwrap();
    let minus = data.symbols.iter().position(|s| s.name == "-").unwrap();

    let cell = |state: usize, terminal: usize| {
        &data.action_lists[data.action_index[state * terminals + terminal] as usize]
    };
    // Every state with a single reduce by `expr - expr` on `/` would be a
    // precedence bug; every such cell shifts instead.
    let minus_production = data
        .productions
        .iter()
        .position(|p| p.child_count == 3 && p.precedence == 1)
        .unwrap();
    let slash_production = data
        .productions
        .iter()
        .position(|p| p.child_count == 3 && p.precedence == 2)
        .unwrap();
    for state in 0..data.state_count as usize {
        let reduce_minus = ParseAction::Reduce(numscript_tables::ProductionId(minus_production as u16));
        let reduce_slash = ParseAction::Reduce(numscript_tables::ProductionId(slash_production as u16));
        if cell(state, minus).contains(&reduce_minus) {
            assert!(matches!(cell(state, slash).as_slice(), [ParseAction::Shift(_)]));
        }
        if cell(state, slash).contains(&reduce_slash) {
            assert_eq!(cell(state, minus).as_slice(), &[reduce_slash]);
        }
    }
}
