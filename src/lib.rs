//! Language parsing tool (lang_gll) is a library to build a generalized LL
//! (GLL) parser from a declarative grammar description and parse text into a
//! typed parse tree ([ParseTree]).
//!
//! # Overview
//! Top down parsers are pleasant to write grammars for, but plain recursive
//! descent cannot handle every context-free shape: left recursion loops
//! forever and ambiguity forces ad hoc backtracking rules into the grammar.
//! This library instead implements the GLL algorithm, which handles direct,
//! indirect and hidden left recursion natively and terminates on every
//! context-free grammar in O(n³) worst case.
//! All simultaneous derivations are kept in a shared packed parse forest
//! (SPPF); a declarative disambiguation filter (operator priority,
//! associativity, longest match) then collapses the forest into the single
//! preferred tree.
//!
//! # Design
//!
//! Grammars are submitted as [RuleExpr](crate::rule::RuleExpr) trees through
//! a [GrammarBuilder](crate::grammar::GrammarBuilder). Compilation lifts
//! inline repetitions, options and choices into anonymous productions so
//! every rule body becomes a flat sequence of atoms, precomputes nullability
//! and FIRST sets, and freezes everything into an immutable
//! [CompiledGrammar](crate::grammar::CompiledGrammar). A
//! [ParseSession] then drives the GLL work-list over a borrowed input: the
//! graph structured stack (GSS) shares pending returns, the SPPF shares
//! derivations, and a per-parse descriptor set guarantees termination.
//! Named captures declared on the grammar are bound to input spans during
//! extraction and handed to an opaque [IBuilder] for hydration into user
//! values, so the core never needs to know the caller's representation.
//!
//! # Example
//!
//! ```
//! use lang_gll::grammar::GrammarBuilder;
//! use lang_gll::rule::RuleExpr;
//! use lang_gll::{ParseOutcome, ParseSession};
//!
//! let mut builder = GrammarBuilder::new();
//! builder
//!     .register_rule(
//!         "Greeting",
//!         RuleExpr::sequence(vec![
//!             RuleExpr::lit("Hello, "),
//!             RuleExpr::plus(RuleExpr::chars("a-zA-Z")).capture("name"),
//!             RuleExpr::lit("!"),
//!         ]),
//!         file!(),
//!         line!(),
//!     )
//!     .unwrap();
//!
//! let grammar = builder.compile("Greeting").unwrap();
//! let session = ParseSession::new(&grammar);
//!
//! match session.parse("Hello, World!") {
//!     ParseOutcome::Success(tree) => {
//!         let name = tree.child_by_capture("name").unwrap();
//!         assert_eq!((name.start, name.end), (7, 12));
//!     }
//!     other => panic!("{:?}", other),
//! }
//! ```
//!
//! Ambiguous operator grammars are declared as unions with priority and
//! associativity; see [examples::arithmetic] for a left recursive expression
//! grammar where `1+2*3` groups as `Add(1, Mul(2, 3))` without any grammar
//! rewriting.
//!
//! # License
//! [lang_gll](crate) is provided under the MIT license.

mod charset;
mod disambiguate;
mod error;
pub mod examples;
mod extract;
mod gll;
pub mod grammar;
mod hydrate;
pub mod rule;
mod tree;
pub mod util;

pub use charset::CharSet;
pub use hydrate::hydrate;

use crate::rule::SourceLocation;
use crate::util::Position;
use std::rc::Rc;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
/// Grouping direction of a binary operator rule inside a union.
pub enum Associativity {
    Left,
    Right,
    None,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
/// How residual ambiguity, beyond the declared disambiguation rules, is
/// surfaced: as a warning attached to the result or as a parse failure.
pub enum AmbiguityMode {
    Warn,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// The label of a [ParseTree] node.
pub enum TreeKind {
    /// A node derived by a named rule.
    Rule(Rc<str>),
    /// A terminal match.
    Token,
    /// A separator match inside a repetition.
    Separator,
    /// The grouped items of a captured repetition or option.
    List,
}

#[derive(Clone)]
/// The single preferred derivation of the input, produced after
/// disambiguation. Every node carries its input span; concatenating the
/// spans of all leaves reproduces the parsed input.
pub struct ParseTree {
    pub kind: TreeKind,
    pub start: usize,
    pub end: usize,
    /// The capture name this node is bound to in its enclosing rule.
    pub capture: Option<Rc<str>>,
    pub children: Vec<ParseTree>,
}

#[derive(Debug)]
/// An error raised while registering or compiling a grammar. Fatal to the
/// enclosing operation and never retried.
pub enum GrammarError {
    UnresolvedReference {
        name: Rc<str>,
        referenced_from: SourceLocation,
    },
    DuplicateCapture {
        rule: Rc<str>,
        capture: Rc<str>,
    },
    ConflictingRedefinition {
        name: Rc<str>,
        previous: SourceLocation,
        current: SourceLocation,
    },
    MalformedCharClass {
        rule: Rc<str>,
        message: String,
    },
    InvalidRepetition {
        rule: Rc<str>,
        message: String,
    },
    UnknownStartSymbol {
        name: Rc<str>,
    },
    UnknownUnionMember {
        union: Rc<str>,
        member: Rc<str>,
    },
    OverlappingUnionMembership {
        rule: Rc<str>,
        unions: (Rc<str>, Rc<str>),
    },
}

#[derive(Debug, Clone)]
/// An error returned when the input does not match the grammar.
///
/// Carries the farthest input offset the parser reached, its line and
/// column, and the sorted deduplicated set of expected atoms there. The
/// [Display](std::fmt::Display) rendering shows the offending line with a
/// caret.
pub struct ParseError {
    pub pointer: usize,
    pub position: Position,
    pub expected: Vec<Rc<str>>,
    pub line_text: String,
    pub message: String,
}

#[derive(Debug, Clone)]
/// A note that disambiguation had to break a tie beyond the declared
/// priority and associativity rules. A warning by default; promotable to a
/// failure with [AmbiguityMode::Error].
pub struct AmbiguityDiagnostic {
    pub symbol: Rc<str>,
    pub start: usize,
    pub end: usize,
    pub position: Position,
    /// How many ambiguous nodes were tie-broken in this parse.
    pub count: usize,
}

#[derive(Debug)]
/// The result of one parse invocation.
pub enum ParseOutcome {
    /// The input matched with a unique preferred derivation.
    Success(ParseTree),
    /// The input matched but a tie was broken by declaration order.
    Ambiguous(ParseTree, AmbiguityDiagnostic),
    /// The input did not match.
    Failure(ParseError),
    /// The cancellation signal fired before the parse finished.
    Cancelled,
}

#[derive(Debug, Clone, Default)]
/// A cancellation signal shared between the caller and a running parse,
/// polled at each descriptor pop. Timeouts are implemented by cancelling
/// from another thread after the elapsed wall time.
pub struct CancellationToken {
    flag: Arc<AtomicBool>,
}

/// A parse driver over a compiled grammar.
///
/// Sessions are cheap views; any number of them (and of concurrent parses)
/// may share one immutable [CompiledGrammar](crate::grammar::CompiledGrammar).
pub struct ParseSession<'g> {
    grammar: &'g grammar::CompiledGrammar,
    ambiguity_mode: AmbiguityMode,
}

#[derive(Debug, Clone)]
/// A value bound to a capture name during hydration.
pub enum CaptureValue<V> {
    /// A captured sub-rule, hydrated.
    One(V),
    /// A captured repetition: every item in input order. A repetition of
    /// bare terminals collapses to [CaptureValue::Text] instead.
    Many(Vec<CaptureValue<V>>),
    /// A captured terminal match, resolved to its substring. For a captured
    /// repetition this is the items joined in input order, which is not a
    /// contiguous span once separators are dropped.
    Text(String),
    /// A capture inside an optional that did not match.
    Empty,
}

/// The hydration callback supplied by the DSL surface.
///
/// For every rule node the extractor calls [build](IBuilder::build) with the
/// rule name, the covered span and text, the declared captures in
/// declaration order (absent optionals bind [CaptureValue::Empty]) and the
/// hydrated anonymous rule children. The core treats the produced values as
/// opaque.
pub trait IBuilder {
    type Value;

    fn build(
        &self,
        rule: &str,
        span: (usize, usize),
        text: &str,
        captures: Vec<(Rc<str>, CaptureValue<Self::Value>)>,
        children: Vec<Self::Value>,
    ) -> Self::Value;
}
