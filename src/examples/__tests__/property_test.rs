use crate::examples::arithmetic::arithmetic_grammar;
use crate::examples::json::json_grammar;
use crate::grammar::GrammarBuilder;
use crate::rule::RuleExpr;
use crate::util::Code;
use crate::{ParseOutcome, ParseSession, ParseTree};

fn leaf_concatenation(tree: &ParseTree, input: &str) -> String {
    let code = Code::from(input);
    tree.leaves()
        .into_iter()
        .map(|leaf| leaf.text(&code))
        .collect()
}

#[test]
pub fn leaves_reproduce_the_input() {
    let grammar = json_grammar();
    let session = ParseSession::new(&grammar);
    let document = r#"{"a":1,"b":[true,false],"c":{"d":[],"e":"x"}}"#;
    let tree = session.parse(document).into_result().unwrap();
    assert_eq!(leaf_concatenation(&tree, document), document);

    let grammar = arithmetic_grammar();
    let session = ParseSession::new(&grammar);
    let input = "(1+2)*3/4-5";
    let tree = session.parse(input).into_result().unwrap();
    assert_eq!(leaf_concatenation(&tree, input), input);
}

#[test]
pub fn reparsing_the_leaves_reproduces_the_tree() {
    let grammar = arithmetic_grammar();
    let session = ParseSession::new(&grammar);
    let input = "1+2*3+4";
    let tree = session.parse(input).into_result().unwrap();
    let rendered = leaf_concatenation(&tree, input);
    let again = session.parse(&rendered).into_result().unwrap();
    assert_eq!(format!("{:?}", tree), format!("{:?}", again));
}

#[test]
pub fn wildly_ambiguous_grammars_terminate() {
    // E -> E E | "a" | ε derives every input in unboundedly many ways; the
    // descriptor set keeps the parse finite and extraction picks an acyclic
    // derivation.
    let mut builder = GrammarBuilder::new();
    builder
        .register_rule(
            "E",
            RuleExpr::choice(vec![
                RuleExpr::sequence(vec![RuleExpr::reference("E"), RuleExpr::reference("E")]),
                RuleExpr::lit("a"),
                RuleExpr::lit(""),
            ]),
            file!(),
            line!(),
        )
        .unwrap();
    let grammar = builder.compile("E").unwrap();
    let session = ParseSession::new(&grammar);
    for input in ["", "a", "aa", "aaaa", "aaaaaaaa"] {
        match session.parse(input) {
            ParseOutcome::Success(tree) | ParseOutcome::Ambiguous(tree, _) => {
                assert_eq!((tree.start, tree.end), (0, input.len()), "{}", input);
                assert_eq!(leaf_concatenation(&tree, input), input, "{}", input);
            }
            other => panic!("{}: {:?}", input, other),
        }
    }
}

#[test]
pub fn parses_are_pure_functions_of_grammar_and_input() {
    let input = r#"{"k":[1,2,{"n":null}]}"#;
    let first_grammar = json_grammar();
    let second_grammar = json_grammar();
    let first = ParseSession::new(&first_grammar)
        .parse(input)
        .into_result()
        .unwrap();
    let second = ParseSession::new(&second_grammar)
        .parse(input)
        .into_result()
        .unwrap();
    assert_eq!(format!("{:?}", first), format!("{:?}", second));
}

#[test]
pub fn grammars_may_be_shared_by_many_sessions() {
    let grammar = arithmetic_grammar();
    let strict = ParseSession::with_ambiguity_mode(&grammar, crate::AmbiguityMode::Error);
    let lenient = ParseSession::new(&grammar);
    assert!(strict.parse("1+2*3").is_success());
    assert!(lenient.parse("1+2*3").is_success());
    assert!(!strict.parse("1+*3").is_success());
}
