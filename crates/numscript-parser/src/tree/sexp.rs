//! Text renderings of a tree.
//!
//! `to_sexp` is the tree-sitter style used in tests and by tooling: named
//! nodes only, plus missing leaves. `dump` shows every node with its span.

use std::fmt::Write as _;

use numscript_tables::{FieldId, Language};

use super::Tree;
use super::green::GreenNode;
use super::node::Node;

pub(crate) fn to_sexp(node: &Node<'_>) -> String {
    let mut out = String::new();
    write_sexp(node, &mut out);
    out
}

fn write_sexp(node: &Node<'_>, out: &mut String) {
    if node.is_missing() {
        if node.is_named() {
            write!(out, "(MISSING {})", node.kind()).expect("String write never fails");
        } else {
            write!(out, "(MISSING {:?})", node.kind()).expect("String write never fails");
        }
        return;
    }

    out.push('(');
    out.push_str(node.kind());
    for child in node.children().filter(|c| c.is_named() || c.is_missing()) {
        out.push(' ');
        if let Some(field) = child.field_name() {
            out.push_str(field);
            out.push_str(": ");
        }
        write_sexp(&child, out);
    }
    out.push(')');
}

pub(crate) fn dump(tree: &Tree) -> String {
    let mut out = String::new();
    dump_node(tree.language(), tree.root(), None, 0, 0, &mut out);
    out
}

fn dump_node(
    language: &Language,
    node: &GreenNode,
    field: Option<FieldId>,
    start: usize,
    depth: usize,
    out: &mut String,
) {
    let end = start + node.len();
    let info = language.symbol_info(node.symbol());

    out.push_str(&"  ".repeat(depth));
    if let Some(field) = field {
        write!(out, "{}: ", language.field_name(field)).expect("String write never fails");
    }
    if info.named {
        out.push_str(&info.name);
    } else {
        write!(out, "{:?}", info.name).expect("String write never fails");
    }
    write!(out, " [{start}..{end}]").expect("String write never fails");
    for (set, label) in [
        (node.is_error(), "error"),
        (node.is_missing(), "missing"),
        (node.is_extra(), "extra"),
    ] {
        if set {
            write!(out, " ({label})").expect("String write never fails");
        }
    }
    out.push('\n');

    let mut offset = start;
    for child in node.children() {
        dump_node(language, &child.node, child.field, offset, depth + 1, out);
        offset += child.node.len();
    }
}
