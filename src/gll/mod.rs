//! The GLL parsing core.
//!
//! One [ParseRun] owns the per-parse state: the descriptor work-list, the
//! graph structured stack, the shared packed parse forest and the farthest
//! failure tracker. Descriptors are deduplicated and processed FIFO, which
//! both guarantees termination on arbitrary context-free grammars (including
//! hidden left recursion) and keeps results deterministic.

mod gss;
mod sppf;

#[cfg(test)]
mod __tests__;

pub(crate) use sppf::{PackedNode, SppfArena, SppfId, SppfKey};

use gss::{GssArena, GssId, ROOT_SLOT};

use crate::disambiguate::Selection;
use crate::extract;
use crate::grammar::{Atom, CompiledGrammar, NtIndex, NtOrigin};
use crate::util::{Code, Position};
use crate::{
    AmbiguityMode, CancellationToken, ParseError, ParseOutcome, ParseSession, ParseTree,
};
use std::collections::{BTreeSet, HashSet, VecDeque};
use std::rc::Rc;
use std::sync::atomic::Ordering;

#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq)]
/// A scheduling record: resume `slot` with stack `gss` at `position`, with
/// `sppf` holding the derivation accumulated so far in this production.
struct Descriptor {
    slot: usize,
    gss: GssId,
    position: u32,
    sppf: Option<SppfId>,
}

/// The outcome of the raw engine, before disambiguation and extraction.
pub(crate) enum RunOutcome {
    Accepted(SppfArena, SppfId),
    Rejected {
        farthest: usize,
        expected: BTreeSet<Rc<str>>,
    },
    Cancelled,
}

pub(crate) struct ParseRun<'g, 'c> {
    grammar: &'g CompiledGrammar,
    code: &'c Code<'c>,
    sppf: SppfArena,
    gss: GssArena,
    queue: VecDeque<Descriptor>,
    seen: HashSet<Descriptor>,
    farthest: usize,
    expected: BTreeSet<Rc<str>>,
}

impl<'g, 'c> ParseRun<'g, 'c> {
    pub fn new(grammar: &'g CompiledGrammar, code: &'c Code<'c>) -> Self {
        Self {
            grammar,
            code,
            sppf: SppfArena::new(),
            gss: GssArena::new(),
            queue: VecDeque::new(),
            seen: HashSet::new(),
            farthest: 0,
            expected: BTreeSet::new(),
        }
    }

    pub fn run(mut self, start: NtIndex, cancellation: Option<&CancellationToken>) -> RunOutcome {
        let input_len = self.code.len() as u32;
        let root = self.gss.intern(ROOT_SLOT, 0);
        self.schedule_alternates(start, root, 0);

        while let Some(descriptor) = self.queue.pop_front() {
            if let Some(token) = cancellation {
                if token.is_cancelled() {
                    return RunOutcome::Cancelled;
                }
            }
            self.process(descriptor);
        }

        // The parse accepts iff a derivation of the start symbol popped
        // through the root covering the whole input.
        let accepted = self
            .gss
            .node(root)
            .pops
            .iter()
            .copied()
            .find(|id| self.sppf.extents(*id) == (0, input_len));
        match accepted {
            Some(root_node) => RunOutcome::Accepted(self.sppf, root_node),
            None => {
                // A derivation that stops short of the end of the input is
                // still a failure; report it at the end of the longest
                // completed prefix when no later mismatch was recorded.
                let best_prefix = self
                    .gss
                    .node(root)
                    .pops
                    .iter()
                    .map(|id| self.sppf.extents(*id).1 as usize)
                    .max()
                    .unwrap_or(0);
                if best_prefix > self.farthest {
                    RunOutcome::Rejected {
                        farthest: best_prefix,
                        expected: BTreeSet::new(),
                    }
                } else {
                    RunOutcome::Rejected {
                        farthest: self.farthest,
                        expected: self.expected,
                    }
                }
            }
        }
    }

    /// Enqueue a descriptor for every alternate of `nt` that can match at
    /// `position`. Non-nullable alternates whose FIRST set excludes the next
    /// code point are pruned, recording their first-terminal descriptions as
    /// expected input so error reports are identical with and without the
    /// pruning.
    fn schedule_alternates(&mut self, nt: NtIndex, gss: GssId, position: u32) {
        let grammar = self.grammar;
        for &alt in &grammar.nt(nt).alternates {
            let alternate = grammar.alternate(alt);
            if !alternate.nullable {
                let starts = match self.code.char_at(position as usize) {
                    Some((c, _)) => alternate.first.contains(c),
                    None => false,
                };
                if !starts {
                    self.record_expected_set(position as usize, &alternate.first_desc);
                    continue;
                }
            }
            self.add(Descriptor {
                slot: alternate.slot_base,
                gss,
                position,
                sppf: None,
            });
        }
    }

    fn add(&mut self, descriptor: Descriptor) {
        if self.seen.insert(descriptor) {
            #[cfg(debug_assertions)]
            {
                let (alt, _) = self.grammar.decode_slot(descriptor.slot);
                if let Some(debugger) = self
                    .grammar
                    .nt(self.grammar.alternate(alt).lhs)
                    .debugger
                    .get()
                {
                    debugger.log_descriptor(&descriptor);
                }
            }
            self.queue.push_back(descriptor);
        }
    }

    fn process(&mut self, descriptor: Descriptor) {
        let grammar = self.grammar;
        let (alt_id, mut dot) = grammar.decode_slot(descriptor.slot);
        let alternate = grammar.alternate(alt_id);
        let slot_base = alternate.slot_base;
        let total = alternate.atoms.len();
        let mut position = descriptor.position;
        let mut sppf = descriptor.sppf;

        if total == 0 {
            // An epsilon alternate completes immediately with an empty
            // terminal node.
            let empty = self.sppf.terminal(position, position);
            let node = self.get_node_p(slot_base, None, empty);
            self.pop(descriptor.gss, position, node);
            return;
        }

        loop {
            if dot == total {
                let node = match sppf {
                    Some(node) => node,
                    None => panic!("Bug! Completed a non-empty production without an SPPF node."),
                };
                self.pop(descriptor.gss, position, node);
                return;
            }
            let entry = &grammar.alternate(alt_id).atoms[dot];
            match &entry.atom {
                Atom::Literal(value) => {
                    let bytes = value.as_bytes();
                    if self.code.value[position as usize..].starts_with(bytes) {
                        let end = position + bytes.len() as u32;
                        let matched = self.sppf.terminal(position, end);
                        sppf = Some(self.get_node_p(slot_base + dot + 1, sppf, matched));
                        position = end;
                        dot += 1;
                    } else {
                        let description = entry.atom.describe(grammar);
                        self.record_expected(position as usize, description);
                        return;
                    }
                }
                Atom::Class(class) => match self.code.char_at(position as usize) {
                    Some((c, width)) if class.contains(c) => {
                        let end = position + width as u32;
                        let matched = self.sppf.terminal(position, end);
                        sppf = Some(self.get_node_p(slot_base + dot + 1, sppf, matched));
                        position = end;
                        dot += 1;
                    }
                    _ => {
                        let description = entry.atom.describe(grammar);
                        self.record_expected(position as usize, description);
                        return;
                    }
                },
                Atom::NonTerm(nt) => {
                    let nt = *nt;
                    let return_slot = slot_base + dot + 1;
                    let child = self.create(return_slot, descriptor.gss, position, sppf);
                    self.schedule_alternates(nt, child, position);
                    return;
                }
            }
        }
    }

    /// GSS "create": ensure the node `(return_slot, position)` exists with an
    /// edge back to the caller, and replay any pops already recorded on it.
    fn create(
        &mut self,
        return_slot: usize,
        caller: GssId,
        position: u32,
        sppf: Option<SppfId>,
    ) -> GssId {
        let node = self.gss.intern(return_slot, position);
        if self.gss.add_edge(node, sppf, caller) {
            let pops = self.gss.node(node).pops.clone();
            for popped in pops {
                let resumed = self.get_node_p(return_slot, sppf, popped);
                let (_, end) = self.sppf.extents(popped);
                self.add(Descriptor {
                    slot: return_slot,
                    gss: caller,
                    position: end,
                    sppf: Some(resumed),
                });
            }
        }
        node
    }

    /// GSS "pop": record the completed derivation and resume every caller.
    fn pop(&mut self, gss: GssId, position: u32, sppf: SppfId) {
        self.gss.record_pop(gss, sppf);
        let slot = self.gss.node(gss).slot;
        if slot == ROOT_SLOT {
            return;
        }
        let edges = self.gss.node(gss).edges.clone();
        for (label, caller) in edges {
            let resumed = self.get_node_p(slot, label, sppf);
            self.add(Descriptor {
                slot,
                gss: caller,
                position,
                sppf: Some(resumed),
            });
        }
    }

    /// Combine the derivation so far (`left`) with a freshly matched child
    /// (`right`) under the grammar slot just reached, deduplicating by key
    /// and attaching a packed child for this particular split.
    fn get_node_p(&mut self, slot: usize, left: Option<SppfId>, right: SppfId) -> SppfId {
        let grammar = self.grammar;
        let (alt_id, dot) = grammar.decode_slot(slot);
        let alternate = grammar.alternate(alt_id);
        let total = alternate.atoms.len();

        // After only the first symbol of a longer production there is
        // nothing to combine yet; the child itself carries the derivation.
        if dot == 1 && dot < total {
            return right;
        }

        let (pivot, end) = self.sppf.extents(right);
        let start = match left {
            Some(left) => self.sppf.extents(left).0,
            None => pivot,
        };
        let key = if dot == total {
            SppfKey::Symbol {
                nt: alternate.lhs,
                start,
                end,
            }
        } else {
            SppfKey::Intermediate {
                slot: slot as u32,
                start,
                end,
            }
        };
        let node = self.sppf.intern(key);
        self.sppf.add_packed(
            node,
            PackedNode {
                slot,
                pivot,
                left,
                right,
            },
        );
        #[cfg(debug_assertions)]
        if dot == total {
            if let Some(debugger) = grammar.nt(alternate.lhs).debugger.get() {
                debugger.log_derivation(
                    &grammar.nt(alternate.lhs).name,
                    start as usize,
                    end as usize,
                    self.code,
                );
            }
        }
        node
    }

    fn record_expected(&mut self, position: usize, description: Rc<str>) {
        if position > self.farthest {
            self.farthest = position;
            self.expected.clear();
        }
        if position == self.farthest {
            self.expected.insert(description);
        }
    }

    fn record_expected_set(&mut self, position: usize, descriptions: &BTreeSet<Rc<str>>) {
        if position > self.farthest {
            self.farthest = position;
            self.expected.clear();
        }
        if position == self.farthest {
            self.expected.extend(descriptions.iter().cloned());
        }
    }
}

impl CancellationToken {
    pub fn new() -> Self {
        Self::default()
    }

    /// Signal the running parse to stop at its next descriptor pop.
    pub fn cancel(&self) {
        self.flag.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.flag.load(Ordering::Relaxed)
    }
}

impl ParseOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, ParseOutcome::Success(_))
    }

    /// The produced tree, if the input matched.
    pub fn tree(&self) -> Option<&ParseTree> {
        match self {
            ParseOutcome::Success(tree) | ParseOutcome::Ambiguous(tree, _) => Some(tree),
            ParseOutcome::Failure(_) | ParseOutcome::Cancelled => None,
        }
    }

    /// Collapse into a plain result, treating a tie broken by declaration
    /// order as success.
    pub fn into_result(self) -> Result<ParseTree, ParseError> {
        match self {
            ParseOutcome::Success(tree) | ParseOutcome::Ambiguous(tree, _) => Ok(tree),
            ParseOutcome::Failure(error) => Err(error),
            ParseOutcome::Cancelled => Err(ParseError::new(
                0,
                Position::new(1, 1),
                "The parse was cancelled.".to_string(),
            )),
        }
    }
}

impl<'g> ParseSession<'g> {
    /// Create a parse session over a compiled grammar.
    pub fn new(grammar: &'g CompiledGrammar) -> Self {
        Self {
            grammar,
            ambiguity_mode: AmbiguityMode::Warn,
        }
    }

    /// Promote residual ambiguity to a parse failure instead of a warning.
    pub fn with_ambiguity_mode(grammar: &'g CompiledGrammar, mode: AmbiguityMode) -> Self {
        Self {
            grammar,
            ambiguity_mode: mode,
        }
    }

    /// Parse `input` from the grammar's start symbol.
    pub fn parse(&self, input: &str) -> ParseOutcome {
        self.parse_internal(self.grammar.start, input, None)
    }

    /// Parse `input` from any named rule of the grammar.
    pub fn parse_from(&self, rule: &str, input: &str) -> ParseOutcome {
        match self.grammar.find(rule) {
            Some(nt)
                if matches!(
                    self.grammar.nt(nt).origin,
                    NtOrigin::Named | NtOrigin::Union
                ) =>
            {
                self.parse_internal(nt, input, None)
            }
            _ => ParseOutcome::Failure(ParseError::unknown_rule(rule)),
        }
    }

    /// Parse with a cancellation signal polled at each descriptor pop.
    pub fn parse_with_cancellation(
        &self,
        input: &str,
        cancellation: &CancellationToken,
    ) -> ParseOutcome {
        self.parse_internal(self.grammar.start, input, Some(cancellation))
    }

    fn parse_internal(
        &self,
        start: NtIndex,
        input: &str,
        cancellation: Option<&CancellationToken>,
    ) -> ParseOutcome {
        let code = Code::from(input);
        let run = ParseRun::new(self.grammar, &code);
        match run.run(start, cancellation) {
            RunOutcome::Cancelled => ParseOutcome::Cancelled,
            RunOutcome::Rejected { farthest, expected } => {
                ParseOutcome::Failure(ParseError::from_failure(&code, farthest, expected))
            }
            RunOutcome::Accepted(sppf, root) => {
                let mut selection = Selection::new(self.grammar);
                let tree = extract::extract_tree(self.grammar, &sppf, root, &mut selection);
                match selection.into_diagnostic(&code) {
                    None => ParseOutcome::Success(tree),
                    Some(diagnostic) => match self.ambiguity_mode {
                        AmbiguityMode::Warn => ParseOutcome::Ambiguous(tree, diagnostic),
                        AmbiguityMode::Error => {
                            ParseOutcome::Failure(ParseError::from_ambiguity(&code, &diagnostic))
                        }
                    },
                }
            }
        }
    }
}
