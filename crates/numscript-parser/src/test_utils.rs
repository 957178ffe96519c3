//! Small grammars compiled at test time, plus tree helpers.

use std::ops::Range;

use indoc::indoc;
use numscript_generate::generate_language;
use numscript_grammar::Grammar;
use numscript_tables::Language;

use crate::tree::{GreenNode, Tree};
use crate::{Parser, PrintTracer, Verbosity};

/// `[` numbers `]`, each number in the `item` field.
pub const LIST: &str = indoc! {r#"
    {
      "name": "list",
      "extras": [{ "type": "PATTERN", "value": "\\s" }],
      "rules": {
        "list": {
          "type": "SEQ",
          "members": [
            { "type": "STRING", "value": "[" },
            { "type": "REPEAT", "content": {
              "type": "FIELD", "name": "item", "content": { "type": "SYMBOL", "name": "number" }
            }},
            { "type": "STRING", "value": "]" }
          ]
        },
        "number": { "type": "PATTERN", "value": "[0-9]+" }
      }
    }
"#};

/// Subtraction over numbers. `OPERATOR` is replaced by the binary rule,
/// optionally wrapped in a precedence.
const ARITHMETIC: &str = indoc! {r#"
    {
      "name": "arithmetic",
      "extras": [{ "type": "PATTERN", "value": "\\s" }],
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

const BINARY: &str = r#"{ "type": "SEQ", "members": [
    { "type": "FIELD", "name": "left", "content": { "type": "SYMBOL", "name": "expr" } },
    { "type": "STRING", "value": "-" },
    { "type": "FIELD", "name": "right", "content": { "type": "SYMBOL", "name": "expr" } }
]}"#;

/// `left`, `right`, or anything else for no precedence at all.
pub fn arithmetic(associativity: &str) -> String {
    let operator = match associativity {
        "left" => format!(r#"{{ "type": "PREC_LEFT", "value": 1, "content": {BINARY} }}"#),
        "right" => format!(r#"{{ "type": "PREC_RIGHT", "value": 1, "content": {BINARY} }}"#),
        _ => BINARY.to_string(),
    };
    let conflicts = if matches!(associativity, "left" | "right") {
        "[]"
    } else {
        r#"[["expr"]]"#
    };
    ARITHMETIC
        .replace("OPERATOR", &operator)
        .replace("CONFLICTS", conflicts)
}

/// A word is either `first` or `second`; only dynamic precedence can tell.
/// `DYNAMIC` is the precedence given to `second`.
const DYNAMIC: &str = indoc! {r#"
    {
      "name": "dynamic",
      "conflicts": [["first", "second"]],
      "rules": {
        "program": { "type": "SYMBOL", "name": "_thing" },
        "_thing": {
          "type": "CHOICE",
          "members": [
            { "type": "SYMBOL", "name": "first" },
            { "type": "SYMBOL", "name": "second" }
          ]
        },
        "first": { "type": "SYMBOL", "name": "word" },
        "second": {
          "type": "PREC_DYNAMIC",
          "value": DYNAMIC,
          "content": { "type": "SYMBOL", "name": "word" }
        },
        "word": { "type": "PATTERN", "value": "[a-z]+" }
      }
    }
"#};

pub fn dynamic(precedence: i32) -> String {
    DYNAMIC.replace("\"value\": DYNAMIC", &format!("\"value\": {precedence}"))
}

/// Python-style blocks through the indentation scanner.
pub const BLOCKS: &str = indoc! {r#"
    {
      "name": "blocks",
      "external_scanner": "indentation",
      "externals": [
        { "type": "SYMBOL", "name": "_newline" },
        { "type": "SYMBOL", "name": "_indent" },
        { "type": "SYMBOL", "name": "_dedent" }
      ],
      "extras": [{ "type": "PATTERN", "value": "[ \\t]" }],
      "rules": {
        "module": { "type": "REPEAT", "content": { "type": "SYMBOL", "name": "statement" } },
        "statement": {
          "type": "CHOICE",
          "members": [
            { "type": "SYMBOL", "name": "pass" },
            { "type": "SYMBOL", "name": "block" }
          ]
        },
        "pass": {
          "type": "SEQ",
          "members": [
            { "type": "STRING", "value": "pass" },
            { "type": "SYMBOL", "name": "_newline" }
          ]
        },
        "block": {
          "type": "SEQ",
          "members": [
            { "type": "STRING", "value": "if" },
            { "type": "SYMBOL", "name": "name" },
            { "type": "STRING", "value": ":" },
            { "type": "SYMBOL", "name": "_newline" },
            { "type": "SYMBOL", "name": "_indent" },
            { "type": "REPEAT1", "content": { "type": "SYMBOL", "name": "statement" } },
            { "type": "SYMBOL", "name": "_dedent" }
          ]
        },
        "name": { "type": "PATTERN", "value": "[a-z]+" }
      }
    }
"#};

/// Words separated by nestable block comments.
pub const COMMENTS: &str = indoc! {r#"
    {
      "name": "comments",
      "external_scanner": "nested_comment",
      "externals": [{ "type": "SYMBOL", "name": "comment" }],
      "extras": [
        { "type": "PATTERN", "value": "\\s" },
        { "type": "SYMBOL", "name": "comment" }
      ],
      "rules": {
        "items": { "type": "REPEAT", "content": { "type": "SYMBOL", "name": "item" } },
        "item": { "type": "PATTERN", "value": "[a-z]+" }
      }
    }
"#};

/// `name = value;` lines.
pub const STATEMENTS: &str = indoc! {r#"
    {
      "name": "statements",
      "extras": [{ "type": "PATTERN", "value": "\\s" }],
      "rules": {
        "program": { "type": "REPEAT", "content": { "type": "SYMBOL", "name": "statement" } },
        "statement": {
          "type": "SEQ",
          "members": [
            { "type": "FIELD", "name": "name", "content": { "type": "SYMBOL", "name": "identifier" } },
            { "type": "STRING", "value": "=" },
            { "type": "FIELD", "name": "value", "content": { "type": "SYMBOL", "name": "number" } },
            { "type": "STRING", "value": ";" }
          ]
        },
        "identifier": { "type": "PATTERN", "value": "[a-z]+" },
        "number": { "type": "PATTERN", "value": "[0-9]+" }
      }
    }
"#};

/// A keyword that is also a valid identifier spelling.
pub const KEYWORDS: &str = indoc! {r#"
    {
      "name": "keywords",
      "extras": [{ "type": "PATTERN", "value": "\\s" }],
      "rules": {
        "program": {
          "type": "REPEAT",
          "content": {
            "type": "CHOICE",
            "members": [
              { "type": "STRING", "value": "if" },
              { "type": "SYMBOL", "name": "identifier" }
            ]
          }
        },
        "identifier": { "type": "PATTERN", "value": "[a-z]+" }
      }
    }
"#};

pub fn language(json: &str) -> Language {
    let grammar = Grammar::from_json(json).unwrap();
    generate_language(&grammar).unwrap()
}

pub fn parse(json: &str, source: &str) -> Tree {
    Parser::new(&language(json)).parse(source)
}

pub fn sexp(json: &str, source: &str) -> String {
    parse(json, source).to_sexp()
}

/// Parse with a [`PrintTracer`] and return the tree and the trace.
pub fn traced(language: &Language, source: &str, verbosity: Verbosity) -> (Tree, Vec<String>) {
    let mut tracer = PrintTracer::new(language, verbosity);
    let tree = Parser::new(language).parse_with_tracer(source, &mut tracer);
    (tree, tracer.into_lines())
}

/// Spans of the non-empty leaves, in order.
pub fn leaf_spans(tree: &Tree) -> Vec<Range<usize>> {
    fn walk(node: &GreenNode, start: usize, out: &mut Vec<Range<usize>>) {
        if node.children().is_empty() {
            if !node.is_empty() {
                out.push(start..start + node.len());
            }
            return;
        }
        let mut offset = start;
        for child in node.children() {
            walk(&child.node, offset, out);
            offset += child.node.len();
        }
    }
    let mut out = Vec::new();
    walk(tree.root(), 0, &mut out);
    out
}

/// Check that the leaves tile the source exactly.
pub fn assert_covers(tree: &Tree) {
    let mut expected = 0;
    for span in leaf_spans(tree) {
        assert_eq!(span.start, expected, "gap or overlap before {span:?}");
        expected = span.end;
    }
    assert_eq!(expected, tree.source().len());
    assert_eq!(tree.root().len(), tree.source().len());
}
