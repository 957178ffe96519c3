//! Choosing between two parses of the same text.
//!
//! Used when two stack links carry the same symbol over the same span, and
//! when several versions accept. The order is: lower error cost, higher
//! dynamic precedence, then the first differing node in pre-order decides by
//! declared precedence and associativity, and finally by size.

use std::cmp::Ordering;

use numscript_tables::{Associativity, Language};

use crate::tree::GreenNode;

/// Whether `candidate` should replace `existing`. Ties keep `existing`.
pub fn prefer(language: &Language, candidate: &GreenNode, existing: &GreenNode) -> bool {
    compare(language, candidate, existing) == Ordering::Less
}

/// `Less` means `a` is the better parse.
pub fn compare(language: &Language, a: &GreenNode, b: &GreenNode) -> Ordering {
    a.error_cost()
        .cmp(&b.error_cost())
        .then_with(|| b.dynamic_precedence().cmp(&a.dynamic_precedence()))
        .then_with(|| match first_difference(a, b) {
            Some((x, y)) => compare_divergence(language, x, y),
            None => Ordering::Equal,
        })
}

/// First pair of nodes, in pre-order, that differ in symbol, span,
/// production, or in where their children start.
fn first_difference<'a>(a: &'a GreenNode, b: &'a GreenNode) -> Option<(&'a GreenNode, &'a GreenNode)> {
    let mut stack = vec![(a, b)];
    while let Some((x, y)) = stack.pop() {
        if x.ptr_eq(y) {
            continue;
        }
        if x.symbol() != y.symbol()
            || x.len() != y.len()
            || x.production() != y.production()
            || x.children().len() != y.children().len()
            || x.children()
                .iter()
                .zip(y.children())
                .any(|(cx, cy)| cx.node.len() != cy.node.len())
        {
            return Some((x, y));
        }
        for (cx, cy) in x.children().iter().zip(y.children()).rev() {
            stack.push((&cx.node, &cy.node));
        }
    }
    None
}

fn compare_divergence(language: &Language, x: &GreenNode, y: &GreenNode) -> Ordering {
    if let (Some(px), Some(py)) = (x.production(), y.production()) {
        let px = language.production(px);
        let py = language.production(py);
        match py.precedence.cmp(&px.precedence) {
            Ordering::Equal => {}
            decided => return decided,
        }
        if px.associativity == py.associativity {
            let first_len = |n: &GreenNode| n.children().first().map_or(0, |c| c.node.len());
            let decided = match px.associativity {
                Associativity::Left => first_len(y).cmp(&first_len(x)),
                Associativity::Right => first_len(x).cmp(&first_len(y)),
                Associativity::None => Ordering::Equal,
            };
            if decided != Ordering::Equal {
                return decided;
            }
        }
    }

    x.len()
        .cmp(&y.len())
        .then_with(|| x.node_count().cmp(&y.node_count()))
        .then_with(|| x.symbol().cmp(&y.symbol()))
}
