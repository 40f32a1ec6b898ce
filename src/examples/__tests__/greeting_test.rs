use crate::examples::greeting::{greeting_grammar, parse_greeting};
use crate::{ParseOutcome, ParseSession};

#[test]
pub fn captures_the_name() {
    assert_eq!(parse_greeting("Hello, World!").unwrap(), "World");
    assert_eq!(parse_greeting("Hello, Rustaceans!").unwrap(), "Rustaceans");
}

#[test]
pub fn tree_shape() {
    let grammar = greeting_grammar();
    let session = ParseSession::new(&grammar);
    match session.parse("Hello, World!") {
        ParseOutcome::Success(tree) => {
            assert_eq!(tree.rule_name(), Some("Greeting"));
            assert_eq!((tree.start, tree.end), (0, 13));
            let name = tree.child_by_capture("name").unwrap();
            assert_eq!((name.start, name.end), (7, 12));
        }
        other => panic!("{:?}", other),
    }
}

#[test]
pub fn rejects_a_missing_name() {
    match parse_greeting("Hello, !") {
        Ok(name) => panic!("Unexpected success: {}", name),
        Err(error) => assert_eq!(error.pointer, 7),
    }
}
