use crate::charset::{CharSet, CodePointSet};

#[test]
fn single_members_and_ranges() {
    let digits = CharSet::parse("0-9").unwrap();
    assert!(digits.contains('0'));
    assert!(digits.contains('5'));
    assert!(digits.contains('9'));
    assert!(!digits.contains('a'));

    let word = CharSet::parse("a-zA-Z0-9_").unwrap();
    assert!(word.contains('q'));
    assert!(word.contains('Q'));
    assert!(word.contains('_'));
    assert!(!word.contains('-'));
    assert!(!word.contains(' '));
}

#[test]
fn negated_class() {
    let not_quote = CharSet::parse("^\"").unwrap();
    assert!(!not_quote.contains('"'));
    assert!(not_quote.contains('a'));
    assert!(not_quote.contains('\n'));
}

#[test]
fn escapes() {
    let class = CharSet::parse("\\n\\t\\r\\\\\\-\\]").unwrap();
    assert!(class.contains('\n'));
    assert!(class.contains('\t'));
    assert!(class.contains('\r'));
    assert!(class.contains('\\'));
    assert!(class.contains('-'));
    assert!(class.contains(']'));
    assert!(!class.contains('n'));
}

#[test]
fn escaped_dash_is_not_a_range() {
    // `a\-z` holds exactly three members.
    let class = CharSet::parse("a\\-z").unwrap();
    assert!(class.contains('a'));
    assert!(class.contains('-'));
    assert!(class.contains('z'));
    assert!(!class.contains('m'));
}

#[test]
fn literal_dash_at_the_edges() {
    let leading = CharSet::parse("-x").unwrap();
    assert!(leading.contains('-'));
    assert!(leading.contains('x'));

    let trailing = CharSet::parse("x-").unwrap();
    assert!(trailing.contains('-'));
    assert!(trailing.contains('x'));
}

#[test]
fn unicode_members() {
    let greek = CharSet::parse("α-ω").unwrap();
    assert!(greek.contains('λ'));
    assert!(!greek.contains('a'));

    let negated = CharSet::parse("^α-ω").unwrap();
    assert!(!negated.contains('λ'));
    assert!(negated.contains('a'));
    assert!(negated.contains('\u{10FFFF}'));
}

#[test]
fn overlapping_ranges_are_merged() {
    let class = CharSet::parse("a-mc-z").unwrap();
    let intervals = class.intervals();
    assert_eq!(intervals, vec![('a' as u32, 'z' as u32)]);
}

#[test]
fn malformed_classes() {
    match CharSet::parse("z-a") {
        Ok(_) => panic!("Out of order range should fail."),
        Err(message) => assert!(message.contains("out of order"), "{}", message),
    }
    match CharSet::parse("a\\q") {
        Ok(_) => panic!("Unknown escape should fail."),
        Err(message) => assert!(message.contains("escape"), "{}", message),
    }
    match CharSet::parse("") {
        Ok(_) => panic!("Empty class should fail."),
        Err(message) => assert!(message.contains("member"), "{}", message),
    }
    match CharSet::parse("abc\\") {
        Ok(_) => panic!("Dangling escape should fail."),
        Err(message) => assert!(message.contains("Dangling"), "{}", message),
    }
}

#[test]
fn code_point_set_union() {
    let mut set = CodePointSet::new();
    assert!(set.is_empty());
    set.insert_char('+');
    set.insert_class(&CharSet::parse("0-9").unwrap());
    assert!(set.contains('+'));
    assert!(set.contains('7'));
    assert!(!set.contains('a'));

    let mut other = CodePointSet::new();
    other.insert_class(&CharSet::parse("a-z").unwrap());
    set.extend(&other);
    assert!(set.contains('a'));
}
