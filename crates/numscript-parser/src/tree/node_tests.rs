use crate::test_utils::{LIST, arithmetic, parse};
use crate::tree::Point;

#[test]
fn root_and_children() {
    let tree = parse(&arithmetic("left"), "1 - 2 - 3");
    let root = tree.root_node();

    assert_eq!(root.kind(), "expr");
    assert_eq!(root.byte_range(), 0..9);
    assert_eq!(root.child_count(), 3);
    assert_eq!(root.named_child_count(), 2);
    assert!(root.parent().is_none());
    assert!(!root.has_error());

    let kinds: Vec<&str> = root.children().map(|c| c.kind()).collect();
    assert_eq!(kinds, ["expr", "-", "expr"]);
    assert!(!root.child(1).unwrap().is_named());
}

#[test]
fn fields() {
    let tree = parse(&arithmetic("left"), "1 - 2 - 3");
    let root = tree.root_node();

    let left = root.child_by_field_name("left").unwrap();
    let right = root.child_by_field_name("right").unwrap();

    assert_eq!(left.text(), "1 - 2");
    assert_eq!(right.text(), "3");
    assert_eq!(left.field_name(), Some("left"));
    assert_eq!(root.field_name_for_child(0), Some("left"));
    assert_eq!(root.field_name_for_child(1), None);
    assert!(root.child_by_field_name("nope").is_none());
    assert_eq!(root.children_by_field_name("right").len(), 1);
}

#[test]
fn repeated_field() {
    let tree = parse(LIST, "[1 2 3]");
    let root = tree.root_node();

    let items: Vec<&str> = root
        .children_by_field_name("item")
        .iter()
        .map(|n| n.text())
        .collect();

    assert_eq!(items, ["1", "2", "3"]);
}

#[test]
fn siblings_and_parent() {
    let tree = parse(&arithmetic("left"), "1 - 2 - 3");
    let root = tree.root_node();
    let left = root.child(0).unwrap();

    let operator = left.next_sibling().unwrap();
    assert_eq!(operator.kind(), "-");
    assert_eq!(operator.byte_range(), 6..7);

    let right = left.next_named_sibling().unwrap();
    assert_eq!(right.text(), "3");
    assert_eq!(right.prev_sibling().unwrap(), operator);
    assert_eq!(right.prev_named_sibling().unwrap(), left);
    assert!(right.next_sibling().is_none());
    assert_eq!(right.parent().unwrap(), root);
}

#[test]
fn deepest_node_for_range() {
    let tree = parse(&arithmetic("left"), "1 - 2 - 3");
    let root = tree.root_node();

    let two = root.descendant_for_byte_range(4..5).unwrap();
    assert_eq!(two.kind(), "number");
    assert_eq!(two.text(), "2");
    assert_eq!(two.parent().unwrap().kind(), "expr");

    let spanning = root.descendant_for_byte_range(0..3).unwrap();
    assert_eq!(spanning.text(), "1 - 2");

    assert!(root.descendant_for_byte_range(3..12).is_none());
}

#[test]
fn descendants_in_pre_order() {
    let tree = parse(&arithmetic("left"), "1 - 2 - 3");

    let kinds: Vec<String> = tree
        .root_node()
        .descendants()
        .iter()
        .map(|n| format!("{} {:?}", n.kind(), n.byte_range()))
        .collect();

    insta::assert_debug_snapshot!(kinds, @r#"
    [
        "expr 0..9",
        "expr 0..5",
        "expr 0..1",
        "number 0..1",
        "- 2..3",
        "expr 4..5",
        "number 4..5",
        "- 6..7",
        "expr 8..9",
        "number 8..9",
    ]
    "#);
}

#[test]
fn positions() {
    let tree = parse(&arithmetic("left"), "1 -\n  22");
    let right = tree.root_node().child_by_field_name("right").unwrap();

    assert_eq!(right.start_position(), Point::new(1, 2));
    assert_eq!(right.end_position(), Point::new(1, 4));
    assert_eq!(tree.line_index().line_count(), 2);
}

#[test]
fn subtree_sexp() {
    let tree = parse(&arithmetic("left"), "1 - 2 - 3");
    let left = tree.root_node().child(0).unwrap();

    assert_eq!(
        left.to_sexp(),
        "(expr left: (expr (number)) right: (expr (number)))"
    );
}

#[test]
fn dump_shows_hidden_nodes() {
    let tree = parse(LIST, "[1 ]");

    insta::assert_snapshot!(tree.dump(), @r#"
    list [0..4]
      "[" [0..1]
      item: number [1..2]
      _extra_token1 [2..3] (extra)
      "]" [3..4]
    "#);
}
