//! `Greeting = "Hello, " name:[a-zA-Z]+ "!"`

use crate::grammar::{CompiledGrammar, GrammarBuilder};
use crate::rule::RuleExpr;
use crate::util::Code;
use crate::{hydrate, CaptureValue, IBuilder, ParseError, ParseSession};
use std::rc::Rc;

pub fn greeting_grammar() -> CompiledGrammar {
    let mut builder = GrammarBuilder::new();
    builder
        .register_rule(
            "Greeting",
            RuleExpr::sequence(vec![
                RuleExpr::lit("Hello, "),
                RuleExpr::plus(RuleExpr::chars("a-zA-Z")).capture("name"),
                RuleExpr::lit("!"),
            ]),
            file!(),
            line!(),
        )
        .unwrap();
    builder.compile("Greeting").unwrap()
}

struct GreetingBuilder;

impl IBuilder for GreetingBuilder {
    type Value = String;

    fn build(
        &self,
        _rule: &str,
        _span: (usize, usize),
        _text: &str,
        captures: Vec<(Rc<str>, CaptureValue<String>)>,
        _children: Vec<String>,
    ) -> String {
        captures
            .into_iter()
            .find(|(name, _)| name.as_ref() == "name")
            .and_then(|(_, value)| value.as_text().map(str::to_string))
            .unwrap_or_default()
    }
}

/// Parse a greeting and return the captured name.
pub fn parse_greeting(input: &str) -> Result<String, ParseError> {
    let grammar = greeting_grammar();
    let session = ParseSession::new(&grammar);
    let tree = session.parse(input).into_result()?;
    let code = Code::from(input);
    Ok(hydrate(&grammar, &tree, &code, &GreetingBuilder))
}
