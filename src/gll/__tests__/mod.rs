use crate::grammar::{CompiledGrammar, GrammarBuilder};
use crate::rule::RuleExpr;
use crate::{CancellationToken, ParseOutcome, ParseSession};

fn single_rule(name: &str, body: RuleExpr) -> CompiledGrammar {
    let mut builder = GrammarBuilder::new();
    builder.register_rule(name, body, file!(), line!()).unwrap();
    builder.compile(name).unwrap()
}

#[test]
fn single_character_literal() {
    let grammar = single_rule("X", RuleExpr::lit("x"));
    let session = ParseSession::new(&grammar);

    match session.parse("x") {
        ParseOutcome::Success(tree) => {
            assert_eq!((tree.start, tree.end), (0, 1));
            assert_eq!(tree.rule_name(), Some("X"));
        }
        other => panic!("{:?}", other),
    }
    match session.parse("y") {
        ParseOutcome::Failure(error) => {
            assert_eq!(error.pointer, 0);
            assert_eq!(error.position.line, 1);
            assert_eq!(error.position.column, 1);
        }
        other => panic!("{:?}", other),
    }
    match session.parse("") {
        ParseOutcome::Failure(error) => {
            assert!(error.message.contains("end of input"), "{}", error.message);
        }
        other => panic!("{:?}", other),
    }
    // A match must cover the whole input; partial success is a failure.
    match session.parse("xx") {
        ParseOutcome::Failure(error) => assert_eq!(error.pointer, 1),
        other => panic!("{:?}", other),
    }
}

#[test]
fn direct_left_recursion_terminates() {
    let mut builder = GrammarBuilder::new();
    builder
        .register_rule(
            "E",
            RuleExpr::choice(vec![
                RuleExpr::sequence(vec![
                    RuleExpr::reference("E"),
                    RuleExpr::lit("+"),
                    RuleExpr::reference("E"),
                ]),
                RuleExpr::lit("a"),
            ]),
            file!(),
            line!(),
        )
        .unwrap();
    let grammar = builder.compile("E").unwrap();
    let session = ParseSession::new(&grammar);

    // The grammar is ambiguous for two or more operators; the parse still
    // terminates and covers the whole input.
    match session.parse("a+a+a+a") {
        ParseOutcome::Success(tree) | ParseOutcome::Ambiguous(tree, _) => {
            assert_eq!((tree.start, tree.end), (0, 7));
        }
        other => panic!("{:?}", other),
    }
}

#[test]
fn hidden_left_recursion_terminates() {
    // S -> A S "b" | "c" with nullable A hides the left recursion on S.
    let mut builder = GrammarBuilder::new();
    builder
        .register_rule("A", RuleExpr::star(RuleExpr::lit("a")), file!(), line!())
        .unwrap();
    builder
        .register_rule(
            "S",
            RuleExpr::choice(vec![
                RuleExpr::sequence(vec![
                    RuleExpr::reference("A"),
                    RuleExpr::reference("S"),
                    RuleExpr::lit("b"),
                ]),
                RuleExpr::lit("c"),
            ]),
            file!(),
            line!(),
        )
        .unwrap();
    let grammar = builder.compile("S").unwrap();
    let session = ParseSession::new(&grammar);

    for input in ["c", "cb", "cbb", "acbb", "aacbbb"] {
        match session.parse(input) {
            ParseOutcome::Success(tree) | ParseOutcome::Ambiguous(tree, _) => {
                assert_eq!((tree.start, tree.end), (0, input.len()), "{}", input);
            }
            other => panic!("{}: {:?}", input, other),
        }
    }
    match session.parse("ab") {
        ParseOutcome::Failure(_) => {}
        other => panic!("{:?}", other),
    }
}

#[test]
fn empty_input_accepted_iff_start_is_nullable() {
    let nullable = single_rule("S", RuleExpr::star(RuleExpr::lit("x")));
    let session = ParseSession::new(&nullable);
    match session.parse("") {
        ParseOutcome::Success(tree) => assert_eq!((tree.start, tree.end), (0, 0)),
        other => panic!("{:?}", other),
    }

    let strict = single_rule("S", RuleExpr::lit("x"));
    let session = ParseSession::new(&strict);
    match session.parse("") {
        ParseOutcome::Failure(error) => {
            assert_eq!(error.pointer, 0);
            assert!(!error.expected.is_empty());
        }
        other => panic!("{:?}", other),
    }
}

#[test]
fn repetition_bounds() {
    let star = single_rule("S", RuleExpr::star(RuleExpr::lit("x")));
    let session = ParseSession::new(&star);
    for input in ["", "x", "xxxx"] {
        assert!(session.parse(input).is_success(), "{:?}", input);
    }

    let one = single_rule("S", RuleExpr::repeat(RuleExpr::lit("x"), 1, Some(1)));
    let session = ParseSession::new(&one);
    assert!(session.parse("x").is_success());
    assert!(!session.parse("").is_success());
    assert!(!session.parse("xx").is_success());

    let none = single_rule("S", RuleExpr::repeat(RuleExpr::lit("x"), 0, Some(0)));
    let session = ParseSession::new(&none);
    assert!(session.parse("").is_success());
    assert!(!session.parse("x").is_success());

    let bounded = single_rule("S", RuleExpr::repeat(RuleExpr::lit("x"), 2, Some(4)));
    let session = ParseSession::new(&bounded);
    assert!(!session.parse("x").is_success());
    assert!(session.parse("xx").is_success());
    assert!(session.parse("xxxx").is_success());
    assert!(!session.parse("xxxxx").is_success());
}

#[test]
fn separators_never_trail() {
    let grammar = single_rule(
        "S",
        RuleExpr::separated(RuleExpr::lit("a"), RuleExpr::lit(","), 1, None),
    );
    let session = ParseSession::new(&grammar);
    assert!(session.parse("a").is_success());
    assert!(session.parse("a,a,a").is_success());
    assert!(!session.parse("a,").is_success());
    assert!(!session.parse(",a").is_success());
    assert!(!session.parse("a,,a").is_success());
}

#[test]
fn identical_alternatives_report_ambiguity() {
    let grammar = single_rule(
        "S",
        RuleExpr::choice(vec![RuleExpr::lit("a"), RuleExpr::lit("a")]),
    );
    let session = ParseSession::new(&grammar);
    match session.parse("a") {
        ParseOutcome::Ambiguous(tree, diagnostic) => {
            assert_eq!((tree.start, tree.end), (0, 1));
            assert!(diagnostic.count >= 1);
        }
        other => panic!("{:?}", other),
    }
}

#[test]
fn ambiguity_can_be_promoted_to_error() {
    let grammar = single_rule(
        "S",
        RuleExpr::choice(vec![RuleExpr::lit("a"), RuleExpr::lit("a")]),
    );
    let session =
        ParseSession::with_ambiguity_mode(&grammar, crate::AmbiguityMode::Error);
    match session.parse("a") {
        ParseOutcome::Failure(error) => {
            assert!(error.message.contains("Ambiguous"), "{}", error.message)
        }
        other => panic!("{:?}", other),
    }
}

#[test]
fn farthest_failure_position_and_expected_set() {
    let grammar = single_rule(
        "S",
        RuleExpr::sequence(vec![
            RuleExpr::lit("hello"),
            RuleExpr::lit(" "),
            RuleExpr::lit("world"),
        ]),
    );
    let session = ParseSession::new(&grammar);
    match session.parse("hello earth") {
        ParseOutcome::Failure(error) => {
            assert_eq!(error.pointer, 6);
            assert_eq!(error.position.line, 1);
            assert_eq!(error.position.column, 7);
            let expected: Vec<&str> = error.expected.iter().map(|e| e.as_ref()).collect();
            assert_eq!(expected, vec!["\"world\""]);
        }
        other => panic!("{:?}", other),
    }
}

#[test]
fn unexpected_end_of_input_names_eof() {
    let grammar = single_rule(
        "S",
        RuleExpr::sequence(vec![RuleExpr::lit("("), RuleExpr::lit(")")]),
    );
    let session = ParseSession::new(&grammar);
    match session.parse("(") {
        ParseOutcome::Failure(error) => {
            assert_eq!(error.pointer, 1);
            assert!(error.message.contains("end of input"), "{}", error.message);
            let rendered = format!("{}", error);
            assert!(rendered.contains("Expected one of"), "{}", rendered);
        }
        other => panic!("{:?}", other),
    }
}

#[test]
fn multiline_error_positions() {
    let grammar = single_rule(
        "S",
        RuleExpr::sequence(vec![
            RuleExpr::plus(RuleExpr::chars("a-z")),
            RuleExpr::lit("\n"),
            RuleExpr::plus(RuleExpr::chars("a-z")),
        ]),
    );
    let session = ParseSession::new(&grammar);
    match session.parse("hello\n12345") {
        ParseOutcome::Failure(error) => {
            assert_eq!(error.position.line, 2);
            assert_eq!(error.position.column, 1);
            assert_eq!(error.line_text, "12345");
        }
        other => panic!("{:?}", other),
    }
}

#[test]
fn cancellation_returns_distinct_outcome() {
    let grammar = single_rule("S", RuleExpr::plus(RuleExpr::chars("a-z")));
    let session = ParseSession::new(&grammar);
    let token = CancellationToken::new();
    token.cancel();
    match session.parse_with_cancellation("abc", &token) {
        ParseOutcome::Cancelled => {}
        other => panic!("{:?}", other),
    }
}

#[test]
fn parse_is_deterministic() {
    let mut builder = GrammarBuilder::new();
    builder
        .register_rule(
            "E",
            RuleExpr::choice(vec![
                RuleExpr::sequence(vec![
                    RuleExpr::reference("E"),
                    RuleExpr::lit("+"),
                    RuleExpr::reference("E"),
                ]),
                RuleExpr::plus(RuleExpr::chars("0-9")),
            ]),
            file!(),
            line!(),
        )
        .unwrap();
    let grammar = builder.compile("E").unwrap();
    let session = ParseSession::new(&grammar);
    let first = format!("{:?}", session.parse("1+2+3").tree());
    let second = format!("{:?}", session.parse("1+2+3").tree());
    assert_eq!(first, second);
}

#[test]
fn unicode_input_spans_are_byte_offsets() {
    let grammar = single_rule(
        "S",
        RuleExpr::sequence(vec![
            RuleExpr::plus(RuleExpr::chars("α-ω")).capture("word"),
            RuleExpr::lit("!"),
        ]),
    );
    let session = ParseSession::new(&grammar);
    match session.parse("λμ!") {
        ParseOutcome::Success(tree) => {
            let word = tree.child_by_capture("word").unwrap();
            // Two greek letters occupy four bytes.
            assert_eq!((word.start, word.end), (0, 4));
        }
        other => panic!("{:?}", other),
    }
}

#[test]
fn parse_from_alternate_entry_point() {
    let mut builder = GrammarBuilder::new();
    builder
        .register_rule(
            "Outer",
            RuleExpr::sequence(vec![RuleExpr::lit("<"), RuleExpr::reference("Inner"), RuleExpr::lit(">")]),
            file!(),
            line!(),
        )
        .unwrap();
    builder
        .register_rule("Inner", RuleExpr::plus(RuleExpr::chars("0-9")), file!(), line!())
        .unwrap();
    let grammar = builder.compile("Outer").unwrap();
    let session = ParseSession::new(&grammar);
    assert!(session.parse_from("Inner", "42").is_success());
    match session.parse_from("Nowhere", "42") {
        ParseOutcome::Failure(error) => {
            assert!(error.message.contains("Nowhere"), "{}", error.message)
        }
        other => panic!("{:?}", other),
    }
}
