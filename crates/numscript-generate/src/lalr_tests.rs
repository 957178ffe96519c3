use indoc::indoc;
use numscript_grammar::Grammar;
use numscript_tables::{Language, Symbol, dump::dump};

use crate::first::{FirstSets, TokenSet};
use crate::generate;
use crate::prepare::prepare;

#[test]
fn token_set_operations() {
    let mut set = TokenSet::with_capacity(70);
    assert!(set.is_empty());
    assert!(set.insert(Symbol(3)));
    assert!(!set.insert(Symbol(3)));
    assert!(set.insert(Symbol(68)));
    assert!(set.contains(Symbol(68)));
    assert!(!set.contains(Symbol(4)));

    let other = TokenSet::single(70, Symbol(4));
    assert!(set.union_with(&other));
    assert!(!set.union_with(&other));
    assert_eq!(set.iter().map(|s| s.0).collect::<Vec<_>>(), vec![3, 4, 68]);
}

#[test]
fn first_sets_and_nullable() {
    let grammar = Grammar::from_json(indoc! {r#"
        {
          "name": "t",
          "rules": {
            "program": {
              "type": "SEQ",
              "members": [
                { "type": "SYMBOL", "name": "prefix" },
                { "type": "STRING", "value": "b" }
              ]
            },
            "prefix": {
              "type": "CHOICE",
              "members": [{ "type": "STRING", "value": "a" }, { "type": "BLANK" }]
            }
          }
        }
    "#})
    .unwrap();
    let prepared = prepare(&grammar).unwrap();
    let first = FirstSets::new(&prepared);

    // "b" is interned before "a": it appears first in rule order.
    let program = prepared.start;
    let prefix = Symbol(program.0 + 1);
    let names = |set: &TokenSet| set.iter().map(|s| prepared.name(s).to_string()).collect::<Vec<_>>();

    assert_eq!(names(first.first(program)), vec!["b", "a"]);
    assert_eq!(names(first.first(prefix)), vec!["a"]);
    assert!(first.is_nullable(prefix));
    assert!(!first.is_nullable(program));
}

#[test]
fn single_token_grammar_tables() {
    let grammar = Grammar::from_json(indoc! {r#"
        {
          "name": "t",
          "rules": { "program": { "type": "STRING", "value": "a" } }
        }
    "#})
    .unwrap();
    let language = Language::from_data(generate(&grammar).unwrap().data).unwrap();

    insta::assert_snapshot!(dump(&language), @r#"
    language t: 4 symbols, 3 states, 1 productions

    [symbols]
      0 end End hidden
      1 ERROR Error
      2 "a" Terminal
      3 program NonTerminal

    [productions]
      0 program -> 1 children

    [states]
      0 mode=0
          "a" -> shift 1
          program => 2
      1 mode=1
          end -> reduce 0
      2 mode=1
          end -> accept
    "#);
}

#[test]
fn lookaheads_propagate_through_merged_states() {
    // S -> a A c | b A d ; A -> x. The state after `x` is shared, and must
    // reduce on both `c` and `d`.
    let grammar = Grammar::from_json(indoc! {r#"
        {
          "name": "t",
          "rules": {
            "program": {
              "type": "CHOICE",
              "members": [
                { "type": "SEQ", "members": [
                  { "type": "STRING", "value": "a" },
                  { "type": "SYMBOL", "name": "inner" },
                  { "type": "STRING", "value": "c" }
                ]},
                { "type": "SEQ", "members": [
                  { "type": "STRING", "value": "b" },
                  { "type": "SYMBOL", "name": "inner" },
                  { "type": "STRING", "value": "d" }
                ]}
              ]
            },
            "inner": { "type": "SEQ", "members": [{ "type": "STRING", "value": "x" }] }
          }
        }
    "#})
    .unwrap();
    let generated = generate(&grammar).unwrap();
    assert!(generated.conflicts.is_empty());
    let language = Language::from_data(generated.data).unwrap();

    let x = language.symbol_for_name("x", false).unwrap();
    let c = language.symbol_for_name("c", false).unwrap();
    let d = language.symbol_for_name("d", false).unwrap();

    let after_x: Vec<_> = (0..language.state_count())
        .map(|s| numscript_tables::StateId(s as u16))
        .filter(|&s| {
            (0..language.state_count()).any(|from| {
                language
                    .actions(numscript_tables::StateId(from as u16), x)
                    .contains(&numscript_tables::ParseAction::Shift(s))
            })
        })
        .collect();
    assert_eq!(after_x.len(), 1);
    assert!(language.has_actions(after_x[0], c));
    assert!(language.has_actions(after_x[0], d));
}
