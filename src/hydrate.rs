//! Hydration of a parse tree into user values.
//!
//! The core never assumes a user representation. For every rule node it
//! calls the [IBuilder](crate::IBuilder) supplied by the DSL surface with
//! the rule name, the covered span and text, the declared captures in
//! declaration order, and the remaining anonymous rule children.

use crate::grammar::{CaptureKind, CompiledGrammar};
use crate::util::Code;
use crate::{CaptureValue, IBuilder, ParseTree, TreeKind};
use std::collections::HashMap;
use std::rc::Rc;

impl<V> CaptureValue<V> {
    /// Whether the capture bound nothing.
    pub fn is_empty(&self) -> bool {
        matches!(self, CaptureValue::Empty)
    }

    /// The bound text of a textual capture.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            CaptureValue::Text(text) => Some(text),
            _ => None,
        }
    }

    /// The bound value of a scalar capture.
    pub fn as_value(&self) -> Option<&V> {
        match self {
            CaptureValue::One(value) => Some(value),
            _ => None,
        }
    }

    /// The items of a repetition capture; a scalar binds as one item and an
    /// empty capture as none.
    pub fn into_items(self) -> Vec<CaptureValue<V>> {
        match self {
            CaptureValue::Many(items) => items,
            CaptureValue::Empty => Vec::new(),
            other => vec![other],
        }
    }
}

/// Hydrate a parse tree rooted at a rule node into the builder's values.
pub fn hydrate<B: IBuilder>(
    grammar: &CompiledGrammar,
    tree: &ParseTree,
    code: &Code,
    builder: &B,
) -> B::Value {
    hydrate_rule(grammar, tree, code, builder)
}

fn hydrate_rule<B: IBuilder>(
    grammar: &CompiledGrammar,
    tree: &ParseTree,
    code: &Code,
    builder: &B,
) -> B::Value {
    let rule = match tree.rule_name() {
        Some(rule) => rule,
        None => panic!("Bug! Hydration starts at rule nodes only."),
    };

    let mut bindings: HashMap<Rc<str>, Vec<CaptureValue<B::Value>>> = HashMap::new();
    let mut children: Vec<B::Value> = Vec::new();
    for child in &tree.children {
        scan(grammar, child, code, builder, &mut bindings, &mut children);
    }

    let declared = grammar
        .find(rule)
        .map(|nt| grammar.nt(nt).capture_decls.clone())
        .unwrap_or_default();
    let mut captures: Vec<(Rc<str>, CaptureValue<B::Value>)> = Vec::new();
    for (name, kind) in declared {
        let mut bound = bindings.remove(&name).unwrap_or_default();
        let value = match (bound.len(), kind) {
            (0, CaptureKind::List) => CaptureValue::Many(Vec::new()),
            (0, _) => CaptureValue::Empty,
            (1, _) => bound.remove(0),
            (_, _) => CaptureValue::Many(bound),
        };
        captures.push((name, value));
    }

    builder.build(
        rule,
        (tree.start, tree.end),
        tree.text(code),
        captures,
        children,
    )
}

/// Collect capture bindings and anonymous rule children of one rule node,
/// descending through spliced anonymous structure but never into nested
/// rule nodes, whose captures belong to their own hydration.
fn scan<B: IBuilder>(
    grammar: &CompiledGrammar,
    tree: &ParseTree,
    code: &Code,
    builder: &B,
    bindings: &mut HashMap<Rc<str>, Vec<CaptureValue<B::Value>>>,
    children: &mut Vec<B::Value>,
) {
    if let Some(capture) = &tree.capture {
        let value = value_of(grammar, tree, code, builder);
        bindings.entry(capture.clone()).or_default().push(value);
        return;
    }
    match &tree.kind {
        TreeKind::Rule(_) => children.push(hydrate_rule(grammar, tree, code, builder)),
        TreeKind::Token | TreeKind::Separator => {}
        TreeKind::List => {
            for child in &tree.children {
                scan(grammar, child, code, builder, bindings, children);
            }
        }
    }
}

fn value_of<B: IBuilder>(
    grammar: &CompiledGrammar,
    tree: &ParseTree,
    code: &Code,
    builder: &B,
) -> CaptureValue<B::Value> {
    match &tree.kind {
        TreeKind::Rule(_) => CaptureValue::One(hydrate_rule(grammar, tree, code, builder)),
        TreeKind::Token | TreeKind::Separator => CaptureValue::Text(tree.text(code).to_string()),
        TreeKind::List => {
            let items: Vec<CaptureValue<B::Value>> = tree
                .children
                .iter()
                .filter(|child| child.kind != TreeKind::Separator)
                .map(|child| value_of(grammar, child, code, builder))
                .collect();
            // A repetition of bare terminals reads back as its joined text,
            // the way a captured character run is one substring.
            if !items.is_empty() && items.iter().all(|item| item.as_text().is_some()) {
                let joined: String = items
                    .iter()
                    .map(|item| item.as_text().unwrap())
                    .collect();
                CaptureValue::Text(joined)
            } else {
                CaptureValue::Many(items)
            }
        }
    }
}
