//! A left recursive arithmetic grammar disambiguated by priority and
//! associativity.
//!
//! `Expr = Add | Mul | Paren | Num` with `Add = Expr [+-] Expr`,
//! `Mul = Expr [*/] Expr`, `Paren = "(" Expr ")"` and `Num = [0-9]+`.
//! Multiplication binds tighter than addition and both operators group to
//! the left, so `1+2*3` parses as `Add(1, Mul(2, 3))` and `1+2+3` as
//! `Add(Add(1, 2), 3)`.

use crate::grammar::{CompiledGrammar, GrammarBuilder};
use crate::rule::RuleExpr;
use crate::util::Code;
use crate::{hydrate, Associativity, CaptureValue, IBuilder, ParseError, ParseSession};
use std::rc::Rc;

#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    Num(i64),
    Binary {
        op: char,
        left: Box<Expr>,
        right: Box<Expr>,
    },
    Paren(Box<Expr>),
}

pub fn arithmetic_grammar() -> CompiledGrammar {
    let mut builder = GrammarBuilder::new();
    builder
        .register_rule(
            "Add",
            RuleExpr::sequence(vec![
                RuleExpr::reference("Expr").capture("left"),
                RuleExpr::chars("+-").capture("op"),
                RuleExpr::reference("Expr").capture("right"),
            ]),
            file!(),
            line!(),
        )
        .unwrap();
    builder
        .register_rule(
            "Mul",
            RuleExpr::sequence(vec![
                RuleExpr::reference("Expr").capture("left"),
                RuleExpr::chars("*/").capture("op"),
                RuleExpr::reference("Expr").capture("right"),
            ]),
            file!(),
            line!(),
        )
        .unwrap();
    builder
        .register_rule(
            "Paren",
            RuleExpr::sequence(vec![
                RuleExpr::lit("("),
                RuleExpr::reference("Expr").capture("inner"),
                RuleExpr::lit(")"),
            ]),
            file!(),
            line!(),
        )
        .unwrap();
    builder
        .register_rule(
            "Num",
            RuleExpr::plus(RuleExpr::chars("0-9")).capture("digits"),
            file!(),
            line!(),
        )
        .unwrap();
    builder
        .register_union(
            "Expr",
            &["Add", "Mul", "Paren", "Num"],
            &["Mul", "Add"],
            &[
                ("Add", Associativity::Left),
                ("Mul", Associativity::Left),
            ],
            file!(),
            line!(),
        )
        .unwrap();
    builder.compile("Expr").unwrap()
}

pub struct ExprBuilder;

impl IBuilder for ExprBuilder {
    type Value = Expr;

    fn build(
        &self,
        rule: &str,
        _span: (usize, usize),
        text: &str,
        captures: Vec<(Rc<str>, CaptureValue<Expr>)>,
        mut children: Vec<Expr>,
    ) -> Expr {
        match rule {
            "Num" => Expr::Num(text.parse().expect("digit run")),
            "Paren" => {
                let inner = take(captures, "inner")
                    .and_then(|value| match value {
                        CaptureValue::One(expr) => Some(expr),
                        _ => None,
                    })
                    .expect("parenthesized expression");
                Expr::Paren(Box::new(inner))
            }
            "Add" | "Mul" => {
                let mut left = None;
                let mut op = None;
                let mut right = None;
                for (name, value) in captures {
                    match (name.as_ref(), value) {
                        ("left", CaptureValue::One(expr)) => left = Some(expr),
                        ("right", CaptureValue::One(expr)) => right = Some(expr),
                        ("op", CaptureValue::Text(text)) => op = text.chars().next(),
                        _ => {}
                    }
                }
                Expr::Binary {
                    op: op.expect("operator"),
                    left: Box::new(left.expect("left operand")),
                    right: Box::new(right.expect("right operand")),
                }
            }
            _ => children.remove(0),
        }
    }
}

fn take(
    captures: Vec<(Rc<str>, CaptureValue<Expr>)>,
    name: &str,
) -> Option<CaptureValue<Expr>> {
    captures
        .into_iter()
        .find(|(capture, _)| capture.as_ref() == name)
        .map(|(_, value)| value)
}

/// Parse an arithmetic expression into its grouped form.
pub fn parse_expression(input: &str) -> Result<Expr, ParseError> {
    let grammar = arithmetic_grammar();
    let session = ParseSession::new(&grammar);
    let tree = session.parse(input).into_result()?;
    let code = Code::from(input);
    Ok(hydrate(&grammar, &tree, &code, &ExprBuilder))
}
