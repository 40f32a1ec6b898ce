use crate::grammar::GrammarBuilder;
use crate::rule::RuleExpr;
use crate::{Associativity, GrammarError};

fn digits() -> RuleExpr {
    RuleExpr::plus(RuleExpr::chars("0-9"))
}

#[test]
fn registration_is_idempotent_for_identical_bodies() {
    let mut builder = GrammarBuilder::new();
    builder
        .register_rule("Number", digits(), file!(), line!())
        .unwrap();
    builder
        .register_rule("Number", digits(), file!(), line!())
        .unwrap();
    builder.compile("Number").unwrap();
}

#[test]
fn conflicting_redefinition_is_fatal() {
    let mut builder = GrammarBuilder::new();
    builder
        .register_rule("Number", digits(), file!(), line!())
        .unwrap();
    match builder.register_rule("Number", RuleExpr::lit("0"), file!(), line!()) {
        Err(GrammarError::ConflictingRedefinition { name, .. }) => {
            assert_eq!(name.as_ref(), "Number")
        }
        other => panic!("Expected conflicting redefinition, got {:?}", other.err()),
    }
}

#[test]
fn unresolved_reference_names_the_symbol() {
    let mut builder = GrammarBuilder::new();
    builder
        .register_rule(
            "Root",
            RuleExpr::sequence(vec![RuleExpr::lit("x"), RuleExpr::reference("Missing")]),
            file!(),
            line!(),
        )
        .unwrap();
    match builder.compile("Root") {
        Err(GrammarError::UnresolvedReference { name, .. }) => {
            assert_eq!(name.as_ref(), "Missing")
        }
        other => panic!("Expected unresolved reference, got {:?}", other.err()),
    }
}

#[test]
fn unknown_start_symbol() {
    let builder = GrammarBuilder::new();
    match builder.compile("Nowhere") {
        Err(GrammarError::UnknownStartSymbol { name }) => assert_eq!(name.as_ref(), "Nowhere"),
        other => panic!("Expected unknown start symbol, got {:?}", other.err()),
    }
}

#[test]
fn duplicate_capture_is_fatal() {
    let mut builder = GrammarBuilder::new();
    builder
        .register_rule(
            "Pair",
            RuleExpr::sequence(vec![
                digits().capture("value"),
                RuleExpr::lit(","),
                digits().capture("value"),
            ]),
            file!(),
            line!(),
        )
        .unwrap();
    match builder.compile("Pair") {
        Err(GrammarError::DuplicateCapture { rule, capture }) => {
            assert_eq!(rule.as_ref(), "Pair");
            assert_eq!(capture.as_ref(), "value");
        }
        other => panic!("Expected duplicate capture, got {:?}", other.err()),
    }
}

#[test]
fn malformed_char_class_surfaces_at_compile() {
    let mut builder = GrammarBuilder::new();
    builder
        .register_rule("Bad", RuleExpr::chars("z-a"), file!(), line!())
        .unwrap();
    match builder.compile("Bad") {
        Err(GrammarError::MalformedCharClass { rule, .. }) => assert_eq!(rule.as_ref(), "Bad"),
        other => panic!("Expected malformed char class, got {:?}", other.err()),
    }
}

#[test]
fn invalid_repetition_bounds() {
    let mut builder = GrammarBuilder::new();
    builder
        .register_rule(
            "Bad",
            RuleExpr::repeat(RuleExpr::chars("0-9"), 3, Some(2)),
            file!(),
            line!(),
        )
        .unwrap();
    match builder.compile("Bad") {
        Err(GrammarError::InvalidRepetition { rule, .. }) => assert_eq!(rule.as_ref(), "Bad"),
        other => panic!("Expected invalid repetition, got {:?}", other.err()),
    }
}

#[test]
fn left_recursion_is_not_an_error() {
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
                digits(),
            ]),
            file!(),
            line!(),
        )
        .unwrap();
    builder.compile("E").unwrap();
}

#[test]
fn nullability_fixed_point() {
    let mut builder = GrammarBuilder::new();
    builder
        .register_rule(
            "A",
            RuleExpr::sequence(vec![
                RuleExpr::star(RuleExpr::lit("x")),
                RuleExpr::optional(RuleExpr::lit("y")),
            ]),
            file!(),
            line!(),
        )
        .unwrap();
    builder
        .register_rule(
            "B",
            RuleExpr::sequence(vec![RuleExpr::reference("A"), RuleExpr::lit("z")]),
            file!(),
            line!(),
        )
        .unwrap();
    let grammar = builder.compile("B").unwrap();
    let a = grammar.find("A").unwrap();
    let b = grammar.find("B").unwrap();
    assert!(grammar.nt(a).nullable, "A derives the empty string");
    assert!(!grammar.nt(b).nullable, "B always consumes the z");
}

#[test]
fn first_sets_reach_through_nullable_heads() {
    let mut builder = GrammarBuilder::new();
    builder
        .register_rule(
            "S",
            RuleExpr::sequence(vec![
                RuleExpr::optional(RuleExpr::lit("-")),
                RuleExpr::plus(RuleExpr::chars("0-9")),
            ]),
            file!(),
            line!(),
        )
        .unwrap();
    let grammar = builder.compile("S").unwrap();
    let s = grammar.find("S").unwrap();
    assert!(grammar.nt(s).first.contains('-'));
    assert!(grammar.nt(s).first.contains('7'));
    assert!(!grammar.nt(s).first.contains('a'));
}

#[test]
fn productions_are_flat_after_lifting() {
    let mut builder = GrammarBuilder::new();
    builder
        .register_rule(
            "List",
            RuleExpr::sequence(vec![
                RuleExpr::lit("["),
                RuleExpr::separated(RuleExpr::chars("0-9"), RuleExpr::lit(","), 0, None)
                    .capture("items"),
                RuleExpr::lit("]"),
            ]),
            file!(),
            line!(),
        )
        .unwrap();
    let grammar = builder.compile("List").unwrap();
    // Every alternate of every production holds only atoms.
    let listing = grammar.render_grammar().unwrap();
    assert!(listing.contains("List.rep1"), "{}", listing);
    assert!(listing.contains("items"), "{}", listing);
}

#[test]
fn union_configuration_is_validated() {
    let mut builder = GrammarBuilder::new();
    builder
        .register_rule("Num", digits(), file!(), line!())
        .unwrap();
    match builder.register_union(
        "Expr",
        &["Num"],
        &["Num"],
        &[("Num", Associativity::Left)],
        file!(),
        line!(),
    ) {
        Ok(()) => {}
        Err(error) => panic!("{:?}", error),
    }
    // A precedence entry that is not an alternative is rejected.
    let mut other = GrammarBuilder::new();
    other
        .register_rule("Num", digits(), file!(), line!())
        .unwrap();
    other
        .register_union("Expr", &["Num"], &["Mul"], &[], file!(), line!())
        .unwrap();
    match other.compile("Expr") {
        Err(GrammarError::UnknownUnionMember { union, member }) => {
            assert_eq!(union.as_ref(), "Expr");
            assert_eq!(member.as_ref(), "Mul");
        }
        other => panic!("Expected unknown union member, got {:?}", other.err()),
    }
}

#[test]
fn parse_expr_parses_a_bare_expression() {
    let outcome =
        GrammarBuilder::parse_expr(RuleExpr::plus(RuleExpr::chars("a-z")), "apple").unwrap();
    assert!(outcome.is_success());

    let outcome =
        GrammarBuilder::parse_expr(RuleExpr::plus(RuleExpr::chars("a-z")), "apple1").unwrap();
    assert!(!outcome.is_success());
}

#[test]
fn compilation_is_order_independent() {
    let build = |reversed: bool| {
        let mut builder = GrammarBuilder::new();
        let mut definitions = vec![
            ("A", RuleExpr::sequence(vec![RuleExpr::lit("a"), RuleExpr::reference("B")])),
            ("B", RuleExpr::lit("b")),
        ];
        if reversed {
            definitions.reverse();
        }
        for (name, body) in definitions {
            builder.register_rule(name, body, file!(), line!()).unwrap();
        }
        builder.compile("A").unwrap().render_grammar().unwrap()
    };
    assert_eq!(build(false), build(true));
}
