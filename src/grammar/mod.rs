//! Grammar submission and compilation.
//!
//! The DSL surface hands rule definitions to a [GrammarBuilder] and receives
//! an immutable [CompiledGrammar](crate::grammar::CompiledGrammar) from
//! [compile](GrammarBuilder::compile). Registration is idempotent for
//! identical bodies; conflicting redefinition, unresolved references,
//! duplicate captures and malformed character classes are all surfaced as
//! [GrammarError](crate::GrammarError) values.

mod compile;
mod compiled;

#[cfg(test)]
mod __tests__;

pub use compiled::CompiledGrammar;
pub(crate) use compiled::{Atom, AtomRole, CaptureKind, NtIndex, NtOrigin};

use crate::rule::{RuleDef, RuleExpr, SourceLocation};
use crate::util::Log;
use crate::{Associativity, GrammarError};
use std::collections::HashMap;
use std::rc::Rc;

#[derive(Debug, Clone, PartialEq)]
/// A named choice with disambiguation declarations.
pub(crate) struct UnionDef {
    pub name: Rc<str>,
    pub location: SourceLocation,
    pub alternatives: Vec<Rc<str>>,
    pub precedence: Vec<Rc<str>>,
    pub associativity: Vec<(Rc<str>, Associativity)>,
}

/// Accumulates rule and union definitions and compiles them into a
/// [CompiledGrammar].
///
/// # Example
/// ```
/// use lang_gll::rule::RuleExpr;
/// use lang_gll::grammar::GrammarBuilder;
///
/// let mut builder = GrammarBuilder::new();
/// builder
///     .register_rule(
///         "Greeting",
///         RuleExpr::sequence(vec![
///             RuleExpr::lit("Hello, "),
///             RuleExpr::plus(RuleExpr::chars("a-zA-Z")).capture("name"),
///             RuleExpr::lit("!"),
///         ]),
///         file!(),
///         line!(),
///     )
///     .unwrap();
/// let grammar = builder.compile("Greeting").unwrap();
/// ```
pub struct GrammarBuilder {
    rules: Vec<RuleDef>,
    rule_index: HashMap<Rc<str>, usize>,
    unions: Vec<UnionDef>,
    union_index: HashMap<Rc<str>, usize>,
    debuggers: HashMap<Rc<str>, Log<&'static str>>,
}

impl GrammarBuilder {
    pub fn new() -> Self {
        Self {
            rules: Vec::new(),
            rule_index: HashMap::new(),
            unions: Vec::new(),
            union_index: HashMap::new(),
            debuggers: HashMap::new(),
        }
    }

    /// Register a named rule.
    ///
    /// Registering the same name twice is accepted when the bodies are
    /// identical; a different body is a conflicting redefinition.
    pub fn register_rule(
        &mut self,
        name: &str,
        body: RuleExpr,
        source_file: &str,
        line: u32,
    ) -> Result<(), GrammarError> {
        let definition = RuleDef::new(name, body, source_file, line);
        if let Some(index) = self.union_index.get(definition.name.as_ref()) {
            return Err(GrammarError::ConflictingRedefinition {
                name: definition.name.clone(),
                previous: self.unions[*index].location.clone(),
                current: definition.location,
            });
        }
        match self.rule_index.get(definition.name.as_ref()) {
            Some(index) => {
                let existing = &self.rules[*index];
                if existing.body == definition.body {
                    Ok(())
                } else {
                    Err(GrammarError::ConflictingRedefinition {
                        name: definition.name.clone(),
                        previous: existing.location.clone(),
                        current: definition.location,
                    })
                }
            }
            None => {
                self.rule_index
                    .insert(definition.name.clone(), self.rules.len());
                self.rules.push(definition);
                Ok(())
            }
        }
    }

    /// Register a named union of rules with its disambiguation declarations.
    ///
    /// `precedence` lists member rule names highest priority first; members
    /// absent from the list get the lowest priority. `associativity` maps
    /// member names to their grouping direction; absent members are `None`.
    pub fn register_union(
        &mut self,
        name: &str,
        alternatives: &[&str],
        precedence: &[&str],
        associativity: &[(&str, Associativity)],
        source_file: &str,
        line: u32,
    ) -> Result<(), GrammarError> {
        let definition = UnionDef {
            name: name.into(),
            location: SourceLocation {
                file: source_file.into(),
                line,
            },
            alternatives: alternatives.iter().map(|a| Rc::from(*a)).collect(),
            precedence: precedence.iter().map(|p| Rc::from(*p)).collect(),
            associativity: associativity
                .iter()
                .map(|(r, a)| (Rc::from(*r), *a))
                .collect(),
        };
        if let Some(index) = self.rule_index.get(definition.name.as_ref()) {
            return Err(GrammarError::ConflictingRedefinition {
                name: definition.name.clone(),
                previous: self.rules[*index].location.clone(),
                current: definition.location,
            });
        }
        match self.union_index.get(definition.name.as_ref()) {
            Some(index) => {
                let existing = &self.unions[*index];
                if existing.alternatives == definition.alternatives
                    && existing.precedence == definition.precedence
                    && existing.associativity == definition.associativity
                {
                    Ok(())
                } else {
                    Err(GrammarError::ConflictingRedefinition {
                        name: definition.name.clone(),
                        previous: existing.location.clone(),
                        current: definition.location,
                    })
                }
            }
            None => {
                self.union_index
                    .insert(definition.name.clone(), self.unions.len());
                self.unions.push(definition);
                Ok(())
            }
        }
    }

    /// Set a log label to debug a registered rule based on the level of [Log].
    pub fn set_log(&mut self, rule: &str, debugger: Log<&'static str>) {
        self.debuggers.insert(rule.into(), debugger);
    }

    /// Freeze all registered definitions into an immutable grammar with the
    /// given start symbol.
    pub fn compile(&self, start_symbol: &str) -> Result<CompiledGrammar, GrammarError> {
        compile::compile(self, start_symbol)
    }

    /// Parse `input` against a single anonymous rule expression.
    ///
    /// Registers the expression under a synthetic rule name, compiles a
    /// throwaway grammar and parses in one call; a convenience for quick
    /// checks and demos.
    pub fn parse_expr(expr: RuleExpr, input: &str) -> Result<crate::ParseOutcome, GrammarError> {
        let mut builder = GrammarBuilder::new();
        builder.register_rule("expr", expr, file!(), line!())?;
        let grammar = builder.compile("expr")?;
        let session = crate::ParseSession::new(&grammar);
        Ok(session.parse(input))
    }

    pub(crate) fn unions(&self) -> &[UnionDef] {
        &self.unions
    }
    pub(crate) fn rule_named(&self, name: &str) -> Option<&RuleDef> {
        self.rule_index.get(name).map(|index| &self.rules[*index])
    }
    pub(crate) fn union_named(&self, name: &str) -> Option<&UnionDef> {
        self.union_index.get(name).map(|index| &self.unions[*index])
    }
    pub(crate) fn debugger_for(&self, name: &str) -> Option<Log<&'static str>> {
        self.debuggers.get(name).copied()
    }
}

impl Default for GrammarBuilder {
    fn default() -> Self {
        Self::new()
    }
}
