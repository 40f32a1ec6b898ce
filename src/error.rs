use crate::util::{Code, Position};
use crate::{AmbiguityDiagnostic, GrammarError, ParseError};
use std::collections::BTreeSet;
use std::fmt::{Display, Formatter};
use std::rc::Rc;

impl ParseError {
    pub fn new(pointer: usize, position: Position, message: String) -> Self {
        Self {
            pointer,
            position,
            expected: Vec::new(),
            line_text: String::new(),
            message,
        }
    }

    /// Build the error for an input rejected at `farthest`, the greatest
    /// offset any descriptor reached before failing to advance.
    pub(crate) fn from_failure(code: &Code, farthest: usize, expected: BTreeSet<Rc<str>>) -> Self {
        let position = code.obtain_position(farthest);
        let message = if farthest == code.len() {
            "Unexpected end of input.".to_string()
        } else {
            let offending = match code.char_at(farthest) {
                Some((c, _)) => c.to_string(),
                None => String::new(),
            };
            format!("Unexpected '{}'.", offending)
        };
        Self {
            pointer: farthest,
            position,
            expected: expected.into_iter().collect(),
            line_text: code.obtain_line_text(farthest).to_string(),
            message,
        }
    }

    pub(crate) fn from_ambiguity(code: &Code, diagnostic: &AmbiguityDiagnostic) -> Self {
        Self {
            pointer: diagnostic.start,
            position: diagnostic.position,
            expected: Vec::new(),
            line_text: code.obtain_line_text(diagnostic.start).to_string(),
            message: format!("{}", diagnostic),
        }
    }

    pub(crate) fn unknown_rule(rule: &str) -> Self {
        Self {
            pointer: 0,
            position: Position::new(1, 1),
            expected: Vec::new(),
            line_text: String::new(),
            message: format!("Rule {} is not part of the compiled grammar.", rule),
        }
    }
}

impl Display for ParseError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "SyntaxError: {} at {}.", self.message, self.position)?;
        if !self.line_text.is_empty() {
            writeln!(f, "    {}", self.line_text)?;
            writeln!(f, "    {}^", " ".repeat(self.position.column - 1))?;
        }
        if !self.expected.is_empty() {
            let expected: Vec<&str> = self.expected.iter().map(|e| e.as_ref()).collect();
            writeln!(f, "Expected one of: {}", expected.join(", "))?;
        }
        Ok(())
    }
}

impl Display for AmbiguityDiagnostic {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Ambiguous derivation of {} at {} ({} unresolved choice{}); kept the first alternative in declaration order",
            self.symbol,
            self.position,
            self.count,
            if self.count == 1 { "" } else { "s" }
        )
    }
}

impl GrammarError {
    fn describe(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            GrammarError::UnresolvedReference {
                name,
                referenced_from,
            } => write!(
                f,
                "Reference to undefined rule {} at {}.",
                name, referenced_from
            ),
            GrammarError::DuplicateCapture { rule, capture } => write!(
                f,
                "Capture {} is declared more than once in rule {}.",
                capture, rule
            ),
            GrammarError::ConflictingRedefinition {
                name,
                previous,
                current,
            } => write!(
                f,
                "Rule {} defined at {} conflicts with its previous definition at {}.",
                name, current, previous
            ),
            GrammarError::MalformedCharClass { rule, message } => {
                write!(f, "Malformed character class in rule {}: {}", rule, message)
            }
            GrammarError::InvalidRepetition { rule, message } => {
                write!(f, "Invalid repetition in rule {}: {}.", rule, message)
            }
            GrammarError::UnknownStartSymbol { name } => {
                write!(f, "Start symbol {} is not a registered rule.", name)
            }
            GrammarError::UnknownUnionMember { union, member } => write!(
                f,
                "Union {} configures {} which is not one of its alternatives.",
                union, member
            ),
            GrammarError::OverlappingUnionMembership { rule, unions } => write!(
                f,
                "Rule {} belongs to both union {} and union {}.",
                rule, unions.0, unions.1
            ),
        }
    }
}

impl Display for GrammarError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "GrammarError: ")?;
        self.describe(f)
    }
}
