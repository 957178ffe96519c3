use indoc::indoc;

use crate::dump::dump;
use crate::language::Language;
use crate::test_utils::tiny_language;

#[test]
fn dump_tiny_language() {
    let language = Language::from_data(tiny_language()).unwrap();
    insta::assert_snapshot!(dump(&language), @r#"
    language tiny: 4 symbols, 3 states, 1 productions

    [symbols]
      0 end End hidden
      1 ERROR Error
      2 "a" Terminal
      3 S NonTerminal

    [productions]
      0 S -> 1 children

    [states]
      0 mode=0
          "a" -> shift 1
          S => 2
      1 mode=1
          end -> reduce 0
      2 mode=1
          end -> accept
    "#);
}

#[test]
fn dump_shows_precedence() {
    let mut data = tiny_language();
    data.productions[0].precedence = 2;
    data.productions[0].associativity = crate::Associativity::Left;
    data.productions[0].dynamic_precedence = -1;
    let language = Language::from_data(data).unwrap();
    let text = dump(&language);
    assert!(text.contains(indoc! {"
        [productions]
          0 S -> 1 children prec=2 Left dynamic=-1
    "}));
}
