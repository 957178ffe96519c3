use indoc::indoc;

use crate::diagnostics::SyntaxErrorKind;
use crate::test_utils::{LIST, STATEMENTS, parse};

#[test]
fn clean_tree_has_no_errors() {
    let tree = parse(LIST, "[1 2]");

    let errors = tree.syntax_errors();

    assert!(errors.is_empty());
    assert_eq!(errors.printer().source(tree.source()).render(), "");
}

#[test]
fn missing_token() {
    let tree = parse(LIST, "[1 2");

    let errors = tree.syntax_errors();

    assert_eq!(errors.len(), 1);
    let error = &errors.as_slice()[0];
    assert!(matches!(error.kind, SyntaxErrorKind::Missing(_)));
    assert_eq!(error.range, 4..4);
    assert_eq!(error.to_string(), "missing `]` at 4..4");
}

#[test]
fn missing_named_node() {
    let tree = parse(STATEMENTS, "a = ;");

    let messages: Vec<String> = tree.syntax_errors().iter().map(|e| e.message.clone()).collect();

    assert_eq!(messages, ["missing number"]);
}

#[test]
fn unexpected_input() {
    let tree = parse(LIST, "[1 } 2]");

    let errors = tree.syntax_errors().into_vec();

    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].kind, SyntaxErrorKind::Unexpected);
    assert_eq!(errors[0].range, 3..4);
    assert_eq!(errors[0].message, "unexpected `}`");
}

#[test]
fn errors_in_source_order() {
    let tree = parse(LIST, "[} 1 {");

    let ranges: Vec<_> = tree.syntax_errors().iter().map(|e| e.range.clone()).collect();

    let mut sorted = ranges.clone();
    sorted.sort_by_key(|r| (r.start, r.end));
    assert_eq!(ranges, sorted);
    assert!(ranges.len() >= 2);
}

#[test]
fn plain_rendering_without_source() {
    let tree = parse(LIST, "[1 } 2");

    let rendered = tree.syntax_errors().printer().render();

    insta::assert_snapshot!(rendered, @r"
    unexpected `}` at 3..4
    missing `]` at 6..6
    ");
}

#[test]
fn annotated_rendering() {
    let source = indoc! {"
        [1
         } 2]
    "};
    let tree = parse(LIST, source);
    let errors = tree.syntax_errors();

    let rendered = errors.printer().source(source).path("main.num").render();

    assert!(rendered.contains("error: unexpected `}`"));
    assert!(rendered.contains("main.num:2:2"));
    assert!(rendered.contains(" } 2]"));
}
