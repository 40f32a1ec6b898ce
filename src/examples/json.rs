//! A JSON subset grammar: objects, arrays, strings without escapes, integer
//! and decimal numbers, booleans and null.

use crate::grammar::{CompiledGrammar, GrammarBuilder};
use crate::rule::RuleExpr;
use crate::util::Code;
use crate::{hydrate, CaptureValue, IBuilder, ParseError, ParseSession};
use std::rc::Rc;

#[derive(Debug, Clone, PartialEq)]
pub enum JsonValue {
    Null,
    Bool(bool),
    Number(f64),
    String(String),
    Array(Vec<JsonValue>),
    Object(Vec<(String, JsonValue)>),
    /// Intermediate result of a single `key: value` pair.
    Pair(String, Box<JsonValue>),
}

pub fn json_grammar() -> CompiledGrammar {
    let mut builder = GrammarBuilder::new();
    builder
        .register_rule(
            "JString",
            RuleExpr::sequence(vec![
                RuleExpr::lit("\""),
                RuleExpr::star(RuleExpr::chars("^\"")),
                RuleExpr::lit("\""),
            ]),
            file!(),
            line!(),
        )
        .unwrap();
    builder
        .register_rule(
            "JNumber",
            RuleExpr::sequence(vec![
                RuleExpr::optional(RuleExpr::lit("-")),
                RuleExpr::plus(RuleExpr::chars("0-9")),
                RuleExpr::optional(RuleExpr::sequence(vec![
                    RuleExpr::lit("."),
                    RuleExpr::plus(RuleExpr::chars("0-9")),
                ])),
            ]),
            file!(),
            line!(),
        )
        .unwrap();
    builder
        .register_rule(
            "JBool",
            RuleExpr::choice(vec![RuleExpr::lit("true"), RuleExpr::lit("false")]),
            file!(),
            line!(),
        )
        .unwrap();
    builder
        .register_rule("JNull", RuleExpr::lit("null"), file!(), line!())
        .unwrap();
    builder
        .register_rule(
            "JArray",
            RuleExpr::sequence(vec![
                RuleExpr::lit("["),
                RuleExpr::separated(RuleExpr::reference("JValue"), RuleExpr::lit(","), 0, None)
                    .capture("items"),
                RuleExpr::lit("]"),
            ]),
            file!(),
            line!(),
        )
        .unwrap();
    builder
        .register_rule(
            "JPair",
            RuleExpr::sequence(vec![
                RuleExpr::reference("JString").capture("key"),
                RuleExpr::lit(":"),
                RuleExpr::reference("JValue").capture("value"),
            ]),
            file!(),
            line!(),
        )
        .unwrap();
    builder
        .register_rule(
            "JObject",
            RuleExpr::sequence(vec![
                RuleExpr::lit("{"),
                RuleExpr::separated(RuleExpr::reference("JPair"), RuleExpr::lit(","), 0, None)
                    .capture("pairs"),
                RuleExpr::lit("}"),
            ]),
            file!(),
            line!(),
        )
        .unwrap();
    builder
        .register_union(
            "JValue",
            &["JObject", "JArray", "JString", "JNumber", "JBool", "JNull"],
            &[],
            &[],
            file!(),
            line!(),
        )
        .unwrap();
    builder.compile("JValue").unwrap()
}

pub struct JsonBuilder;

impl IBuilder for JsonBuilder {
    type Value = JsonValue;

    fn build(
        &self,
        rule: &str,
        _span: (usize, usize),
        text: &str,
        captures: Vec<(Rc<str>, CaptureValue<JsonValue>)>,
        _children: Vec<JsonValue>,
    ) -> JsonValue {
        match rule {
            "JNull" => JsonValue::Null,
            "JBool" => JsonValue::Bool(text == "true"),
            "JNumber" => JsonValue::Number(text.parse().expect("number literal")),
            "JString" => JsonValue::String(text[1..text.len() - 1].to_string()),
            "JPair" => {
                let mut key = None;
                let mut value = None;
                for (name, bound) in captures {
                    match (name.as_ref(), bound) {
                        ("key", CaptureValue::One(JsonValue::String(k))) => key = Some(k),
                        ("value", CaptureValue::One(v)) => value = Some(v),
                        _ => {}
                    }
                }
                JsonValue::Pair(key.expect("pair key"), Box::new(value.expect("pair value")))
            }
            "JArray" => {
                let items = named(captures, "items")
                    .into_iter()
                    .filter_map(|item| item.as_value().cloned())
                    .collect();
                JsonValue::Array(items)
            }
            "JObject" => {
                let pairs = named(captures, "pairs")
                    .into_iter()
                    .filter_map(|item| match item {
                        CaptureValue::One(JsonValue::Pair(key, value)) => Some((key, *value)),
                        _ => None,
                    })
                    .collect();
                JsonValue::Object(pairs)
            }
            other => panic!("Unexpected rule {} in JSON hydration.", other),
        }
    }
}

fn named(
    captures: Vec<(Rc<str>, CaptureValue<JsonValue>)>,
    name: &str,
) -> Vec<CaptureValue<JsonValue>> {
    captures
        .into_iter()
        .find(|(capture, _)| capture.as_ref() == name)
        .map(|(_, value)| value.into_items())
        .unwrap_or_default()
}

/// Parse a JSON document from the subset grammar.
pub fn parse_json(input: &str) -> Result<JsonValue, ParseError> {
    let grammar = json_grammar();
    let session = ParseSession::new(&grammar);
    let tree = session.parse(input).into_result()?;
    let code = Code::from(input);
    Ok(hydrate(&grammar, &tree, &code, &JsonBuilder))
}
