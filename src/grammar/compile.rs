use super::compiled::{
    Alternate, Atom, AtomEntry, AtomRole, CaptureKind, CompiledGrammar, Membership, NonTerminal,
    NtIndex, NtOrigin, UnionConfig,
};
use super::{GrammarBuilder, UnionDef};
use crate::charset::{CharSet, CodePointSet};
use crate::rule::{RuleDef, RuleExpr, SourceLocation};
use crate::{Associativity, GrammarError};
use once_cell::unsync::OnceCell;
use std::collections::{BTreeSet, HashMap, HashSet, VecDeque};
use std::rc::Rc;

pub(super) fn compile(
    builder: &GrammarBuilder,
    start_symbol: &str,
) -> Result<CompiledGrammar, GrammarError> {
    let mut compilation = Compilation::new(builder);
    let reachable = compilation.collect_reachable(start_symbol)?;
    for name in &reachable {
        compilation.check_captures(name)?;
        compilation.allocate_named(name);
    }
    for name in &reachable {
        compilation.lower_named(name)?;
    }
    compilation.number_slots();
    compilation.solve_nullability();
    compilation.solve_first_sets();
    compilation.build_union_configs()?;
    compilation.finish(start_symbol)
}

// Alternate atoms are accumulated here and moved into `Alternate` records
// once slot numbering is known.
struct PendingAlternate {
    lhs: NtIndex,
    atoms: Vec<AtomEntry>,
}

struct Compilation<'b> {
    builder: &'b GrammarBuilder,
    nonterminals: Vec<NonTerminal>,
    pending: Vec<PendingAlternate>,
    names: HashMap<Rc<str>, NtIndex>,
    unions: HashMap<NtIndex, UnionConfig>,
    membership: HashMap<NtIndex, Membership>,
    slots: Vec<(usize, usize)>,
    alternates: Vec<Alternate>,
}

impl<'b> Compilation<'b> {
    fn new(builder: &'b GrammarBuilder) -> Self {
        Self {
            builder,
            nonterminals: Vec::new(),
            pending: Vec::new(),
            names: HashMap::new(),
            unions: HashMap::new(),
            membership: HashMap::new(),
            slots: Vec::new(),
            alternates: Vec::new(),
        }
    }

    /// Breadth-first enumeration of every named definition reachable from the
    /// start symbol, in discovery order. Unresolved references are fatal.
    fn collect_reachable(&self, start_symbol: &str) -> Result<Vec<Rc<str>>, GrammarError> {
        let start: Rc<str> = match (
            self.builder.rule_named(start_symbol),
            self.builder.union_named(start_symbol),
        ) {
            (Some(rule), _) => rule.name.clone(),
            (_, Some(union)) => union.name.clone(),
            (None, None) => {
                return Err(GrammarError::UnknownStartSymbol {
                    name: start_symbol.into(),
                })
            }
        };

        let mut ordered = Vec::new();
        let mut seen: HashSet<Rc<str>> = HashSet::new();
        let mut queue: VecDeque<Rc<str>> = VecDeque::new();
        seen.insert(start.clone());
        queue.push_back(start);

        while let Some(name) = queue.pop_front() {
            ordered.push(name.clone());
            let mut references: Vec<(Rc<str>, SourceLocation)> = Vec::new();
            if let Some(rule) = self.builder.rule_named(&name) {
                collect_references(&rule.body, &rule.location, &mut references);
            } else if let Some(union) = self.builder.union_named(&name) {
                for alternative in &union.alternatives {
                    references.push((alternative.clone(), union.location.clone()));
                }
            }
            for (referenced, from) in references {
                if self.builder.rule_named(&referenced).is_none()
                    && self.builder.union_named(&referenced).is_none()
                {
                    return Err(GrammarError::UnresolvedReference {
                        name: referenced,
                        referenced_from: from,
                    });
                }
                if seen.insert(referenced.clone()) {
                    queue.push_back(referenced);
                }
            }
        }
        Ok(ordered)
    }

    /// Reject duplicate capture names within one rule; the declaration order
    /// and shape of each capture is recorded for hydration.
    fn check_captures(&self, name: &str) -> Result<(), GrammarError> {
        let rule = match self.builder.rule_named(name) {
            Some(rule) => rule,
            None => return Ok(()),
        };
        let mut declared: Vec<(Rc<str>, CaptureKind)> = Vec::new();
        collect_captures(&rule.body, &mut declared);
        let mut seen: HashSet<&str> = HashSet::new();
        for (capture, _) in &declared {
            if !seen.insert(capture.as_ref()) {
                return Err(GrammarError::DuplicateCapture {
                    rule: rule.name.clone(),
                    capture: capture.clone(),
                });
            }
        }
        Ok(())
    }

    fn allocate(&mut self, name: Rc<str>, origin: NtOrigin) -> NtIndex {
        let index = NtIndex(self.nonterminals.len());
        self.names.insert(name.clone(), index);
        self.nonterminals.push(NonTerminal {
            name,
            origin,
            alternates: Vec::new(),
            nullable: false,
            first: CodePointSet::new(),
            first_desc: BTreeSet::new(),
            capture_decls: Vec::new(),
            debugger: OnceCell::new(),
        });
        index
    }

    fn allocate_named(&mut self, name: &str) {
        let origin = if self.builder.union_named(name).is_some() {
            NtOrigin::Union
        } else {
            NtOrigin::Named
        };
        let rc_name: Rc<str> = match self.builder.rule_named(name) {
            Some(rule) => rule.name.clone(),
            None => self.builder.union_named(name).unwrap().name.clone(),
        };
        let index = self.allocate(rc_name.clone(), origin);
        if let Some(debugger) = self.builder.debugger_for(name) {
            let _ = self.nonterminals[index.0].debugger.set(debugger);
        }
        if let Some(rule) = self.builder.rule_named(name) {
            let mut declared = Vec::new();
            collect_captures(&rule.body, &mut declared);
            self.nonterminals[index.0].capture_decls = declared;
        }
    }

    fn lower_named(&mut self, name: &str) -> Result<(), GrammarError> {
        let index = self.names[name];
        if let Some(union) = self.builder.union_named(name) {
            let union = union.clone();
            self.lower_union(index, &union);
            return Ok(());
        }
        let rule = self.builder.rule_named(name).unwrap().clone();
        self.lower_rule(index, &rule)
    }

    fn lower_union(&mut self, index: NtIndex, union: &UnionDef) {
        for alternative in &union.alternatives {
            let member = self.names[alternative];
            let atoms = vec![AtomEntry {
                atom: Atom::NonTerm(member),
                capture: None,
                role: AtomRole::Plain,
            }];
            self.push_alternate(index, atoms);
        }
    }

    fn lower_rule(&mut self, index: NtIndex, rule: &RuleDef) -> Result<(), GrammarError> {
        let mut counters = LiftCounters::default();
        match &rule.body {
            // A top level uncaptured choice contributes one alternate per
            // alternative; anything else is a single alternate.
            RuleExpr::Choice {
                alternatives,
                capture: None,
            } => {
                for alternative in alternatives {
                    let mut atoms = Vec::new();
                    self.push_expr(
                        alternative,
                        &rule.name,
                        &mut counters,
                        AtomRole::Plain,
                        &mut atoms,
                    )?;
                    self.push_alternate(index, atoms);
                }
            }
            body => {
                let mut atoms = Vec::new();
                self.push_expr(body, &rule.name, &mut counters, AtomRole::Plain, &mut atoms)?;
                self.push_alternate(index, atoms);
            }
        }
        Ok(())
    }

    fn push_alternate(&mut self, lhs: NtIndex, atoms: Vec<AtomEntry>) {
        let id = self.pending.len();
        self.pending.push(PendingAlternate { lhs, atoms });
        self.nonterminals[lhs.0].alternates.push(id);
    }

    /// Flatten `expr` into `atoms`, lifting nested repetition, option and
    /// choice sub-expressions to fresh anonymous non-terminals.
    fn push_expr(
        &mut self,
        expr: &RuleExpr,
        rule: &Rc<str>,
        counters: &mut LiftCounters,
        role: AtomRole,
        atoms: &mut Vec<AtomEntry>,
    ) -> Result<(), GrammarError> {
        match expr {
            RuleExpr::Literal { value, capture } => {
                // The empty literal matches nothing and contributes no atom.
                if !value.is_empty() {
                    atoms.push(AtomEntry {
                        atom: Atom::Literal(value.clone()),
                        capture: capture.clone(),
                        role,
                    });
                }
                Ok(())
            }
            RuleExpr::CharClass { pattern, capture } => {
                let class = self.parse_class(rule, pattern)?;
                atoms.push(AtomEntry {
                    atom: Atom::Class(class),
                    capture: capture.clone(),
                    role,
                });
                Ok(())
            }
            RuleExpr::Ref { name, capture, .. } => {
                atoms.push(AtomEntry {
                    atom: Atom::NonTerm(self.names[name]),
                    capture: capture.clone(),
                    role,
                });
                Ok(())
            }
            RuleExpr::Sequence { parts, capture } => match capture {
                None => {
                    for part in parts {
                        self.push_expr(part, rule, counters, role, atoms)?;
                    }
                    Ok(())
                }
                Some(capture) => {
                    let lift = self.lift_sequence(rule, counters, parts)?;
                    atoms.push(AtomEntry {
                        atom: Atom::NonTerm(lift),
                        capture: Some(capture.clone()),
                        role,
                    });
                    Ok(())
                }
            },
            RuleExpr::Choice {
                alternatives,
                capture,
            } => {
                let lift = self.lift_choice(rule, counters, alternatives)?;
                atoms.push(AtomEntry {
                    atom: Atom::NonTerm(lift),
                    capture: capture.clone(),
                    role,
                });
                Ok(())
            }
            RuleExpr::Optional { body, capture } => {
                let lift = self.lift_optional(rule, counters, body)?;
                atoms.push(AtomEntry {
                    atom: Atom::NonTerm(lift),
                    capture: capture.clone(),
                    role,
                });
                Ok(())
            }
            RuleExpr::Repeat {
                body,
                at_least,
                at_most,
                separator,
                capture,
            } => {
                let lift = self.lift_repeat(
                    rule,
                    counters,
                    body,
                    *at_least,
                    *at_most,
                    separator.as_deref(),
                )?;
                atoms.push(AtomEntry {
                    atom: Atom::NonTerm(lift),
                    capture: capture.clone(),
                    role,
                });
                Ok(())
            }
        }
    }

    /// Reduce `expr` to a single atom, lifting when it is not already atomic.
    fn atom_of(
        &mut self,
        expr: &RuleExpr,
        rule: &Rc<str>,
        counters: &mut LiftCounters,
        role: AtomRole,
    ) -> Result<AtomEntry, GrammarError> {
        let mut atoms = Vec::new();
        self.push_expr(expr, rule, counters, role, &mut atoms)?;
        if atoms.len() == 1 {
            Ok(atoms.into_iter().next().unwrap())
        } else {
            // Multi-atom expansions (uncaptured sequences) still need a
            // single handle to repeat, so wrap them in a sequence lift.
            let lift = self.allocate(
                format!("{}.seq{}", rule, counters.next_seq()).into(),
                NtOrigin::SequenceLift,
            );
            self.push_alternate(lift, atoms);
            Ok(AtomEntry {
                atom: Atom::NonTerm(lift),
                capture: None,
                role,
            })
        }
    }

    fn lift_sequence(
        &mut self,
        rule: &Rc<str>,
        counters: &mut LiftCounters,
        parts: &[RuleExpr],
    ) -> Result<NtIndex, GrammarError> {
        let lift = self.allocate(
            format!("{}.seq{}", rule, counters.next_seq()).into(),
            NtOrigin::SequenceLift,
        );
        let mut atoms = Vec::new();
        for part in parts {
            self.push_expr(part, rule, counters, AtomRole::Item, &mut atoms)?;
        }
        self.push_alternate(lift, atoms);
        Ok(lift)
    }

    fn lift_choice(
        &mut self,
        rule: &Rc<str>,
        counters: &mut LiftCounters,
        alternatives: &[RuleExpr],
    ) -> Result<NtIndex, GrammarError> {
        let lift = self.allocate(
            format!("{}.alt{}", rule, counters.next_alt()).into(),
            NtOrigin::ChoiceLift,
        );
        for alternative in alternatives {
            let mut atoms = Vec::new();
            self.push_expr(alternative, rule, counters, AtomRole::Item, &mut atoms)?;
            self.push_alternate(lift, atoms);
        }
        Ok(lift)
    }

    fn lift_optional(
        &mut self,
        rule: &Rc<str>,
        counters: &mut LiftCounters,
        body: &RuleExpr,
    ) -> Result<NtIndex, GrammarError> {
        let lift = self.allocate(
            format!("{}.opt{}", rule, counters.next_opt()).into(),
            NtOrigin::OptionLift,
        );
        let mut atoms = Vec::new();
        self.push_expr(body, rule, counters, AtomRole::Item, &mut atoms)?;
        self.push_alternate(lift, atoms);
        self.push_alternate(lift, Vec::new());
        Ok(lift)
    }

    /// Rewrite `body{m,M} sep s` into right-recursive productions:
    /// the mandatory occurrences are unrolled in line, and the optional
    /// remainder becomes a chain (bounded) or a self-recursive tail
    /// (unbounded), with the separator strictly between occurrences.
    fn lift_repeat(
        &mut self,
        rule: &Rc<str>,
        counters: &mut LiftCounters,
        body: &RuleExpr,
        at_least: usize,
        at_most: Option<usize>,
        separator: Option<&RuleExpr>,
    ) -> Result<NtIndex, GrammarError> {
        if let Some(at_most) = at_most {
            if at_most < at_least {
                return Err(GrammarError::InvalidRepetition {
                    rule: rule.clone(),
                    message: format!(
                        "at_most ({}) is smaller than at_least ({})",
                        at_most, at_least
                    ),
                });
            }
        }

        let rep_index = counters.next_rep();
        let lift = self.allocate(
            format!("{}.rep{}", rule, rep_index).into(),
            NtOrigin::RepeatLift,
        );

        if at_most == Some(0) {
            self.push_alternate(lift, Vec::new());
            return Ok(lift);
        }

        let item = self.atom_of(body, rule, counters, AtomRole::Item)?;
        let sep = match separator {
            Some(separator) => Some(self.atom_of(separator, rule, counters, AtomRole::Separator)?),
            None => None,
        };

        // Tail accepting up to `extra` further `sep? body` occurrences.
        let mandatory = at_least.max(1);
        let tail = match at_most {
            None => {
                let tail = self.allocate(
                    format!("{}.rep{}.tail", rule, rep_index).into(),
                    NtOrigin::RepeatLift,
                );
                let mut atoms = Vec::new();
                if let Some(sep) = &sep {
                    atoms.push(sep.clone());
                }
                atoms.push(item.clone());
                atoms.push(AtomEntry {
                    atom: Atom::NonTerm(tail),
                    capture: None,
                    role: AtomRole::Plain,
                });
                self.push_alternate(tail, atoms);
                self.push_alternate(tail, Vec::new());
                Some(tail)
            }
            Some(at_most) => {
                let extra = at_most - mandatory;
                let mut tail: Option<NtIndex> = None;
                for depth in 1..=extra {
                    let next = self.allocate(
                        format!("{}.rep{}.upto{}", rule, rep_index, depth).into(),
                        NtOrigin::RepeatLift,
                    );
                    let mut atoms = Vec::new();
                    if let Some(sep) = &sep {
                        atoms.push(sep.clone());
                    }
                    atoms.push(item.clone());
                    if let Some(inner) = tail {
                        atoms.push(AtomEntry {
                            atom: Atom::NonTerm(inner),
                            capture: None,
                            role: AtomRole::Plain,
                        });
                    }
                    self.push_alternate(next, atoms);
                    self.push_alternate(next, Vec::new());
                    tail = Some(next);
                }
                tail
            }
        };

        let mut atoms = Vec::new();
        atoms.push(item.clone());
        for _ in 1..mandatory {
            if let Some(sep) = &sep {
                atoms.push(sep.clone());
            }
            atoms.push(item.clone());
        }
        if let Some(tail) = tail {
            atoms.push(AtomEntry {
                atom: Atom::NonTerm(tail),
                capture: None,
                role: AtomRole::Plain,
            });
        }
        self.push_alternate(lift, atoms);
        if at_least == 0 {
            self.push_alternate(lift, Vec::new());
        }
        Ok(lift)
    }

    fn parse_class(&self, rule: &Rc<str>, pattern: &str) -> Result<Rc<CharSet>, GrammarError> {
        CharSet::parse(pattern)
            .map(Rc::new)
            .map_err(|message| GrammarError::MalformedCharClass {
                rule: rule.clone(),
                message,
            })
    }

    /// Assign every alternate its base slot id; a production of length `k`
    /// owns `k + 1` consecutive slots.
    fn number_slots(&mut self) {
        let pending = std::mem::take(&mut self.pending);
        for (id, alternate) in pending.into_iter().enumerate() {
            let slot_base = self.slots.len();
            for dot in 0..=alternate.atoms.len() {
                self.slots.push((id, dot));
            }
            self.alternates.push(Alternate {
                lhs: alternate.lhs,
                atoms: alternate.atoms,
                slot_base,
                nullable: false,
                first: CodePointSet::new(),
                first_desc: BTreeSet::new(),
            });
        }
    }

    /// Fixed point nullability over all non-terminals.
    fn solve_nullability(&mut self) {
        loop {
            let mut changed = false;
            for id in 0..self.alternates.len() {
                let lhs = self.alternates[id].lhs.0;
                if self.nonterminals[lhs].nullable {
                    continue;
                }
                if self.alternate_is_nullable(id) {
                    self.nonterminals[lhs].nullable = true;
                    changed = true;
                }
            }
            if !changed {
                break;
            }
        }
        for id in 0..self.alternates.len() {
            self.alternates[id].nullable = self.alternate_is_nullable(id);
        }
    }

    fn alternate_is_nullable(&self, id: usize) -> bool {
        self.alternates[id]
            .atoms
            .iter()
            .all(|entry| match &entry.atom {
                Atom::Literal(_) | Atom::Class(_) => false,
                Atom::NonTerm(nt) => self.nonterminals[nt.0].nullable,
            })
    }

    /// Fixed point FIRST computation, as code point interval sets plus the
    /// first-terminal descriptions used for expected-token reporting.
    ///
    /// GLL does not need FIRST for correctness; the sets only prune
    /// descriptors and feed error messages.
    fn solve_first_sets(&mut self) {
        loop {
            let mut changed = false;
            for id in 0..self.alternates.len() {
                let (first, first_desc) = self.alternate_first(id);
                let lhs = self.alternates[id].lhs.0;
                let nonterminal = &mut self.nonterminals[lhs];
                let mut merged = nonterminal.first.clone();
                merged.extend(&first);
                if merged != nonterminal.first {
                    nonterminal.first = merged;
                    changed = true;
                }
                let before = nonterminal.first_desc.len();
                nonterminal.first_desc.extend(first_desc.iter().cloned());
                if nonterminal.first_desc.len() != before {
                    changed = true;
                }
            }
            if !changed {
                break;
            }
        }
        for id in 0..self.alternates.len() {
            let (first, first_desc) = self.alternate_first(id);
            self.alternates[id].first = first;
            self.alternates[id].first_desc = first_desc;
        }
    }

    fn alternate_first(&self, id: usize) -> (CodePointSet, BTreeSet<Rc<str>>) {
        let mut first = CodePointSet::new();
        let mut first_desc = BTreeSet::new();
        for entry in &self.alternates[id].atoms {
            match &entry.atom {
                Atom::Literal(value) => {
                    if let Some(c) = value.chars().next() {
                        first.insert_char(c);
                    }
                    first_desc.insert(format!("\"{}\"", value).into());
                    break;
                }
                Atom::Class(class) => {
                    first.insert_class(class);
                    first_desc.insert(format!("{}", class).into());
                    break;
                }
                Atom::NonTerm(nt) => {
                    let nonterminal = &self.nonterminals[nt.0];
                    first.extend(&nonterminal.first);
                    first_desc.extend(nonterminal.first_desc.iter().cloned());
                    if !nonterminal.nullable {
                        break;
                    }
                }
            }
        }
        (first, first_desc)
    }

    fn build_union_configs(&mut self) -> Result<(), GrammarError> {
        for union in self.builder.unions() {
            let index = match self.names.get(&union.name) {
                Some(index) => *index,
                // Unreachable unions are simply not part of the grammar.
                None => continue,
            };
            let alternatives: HashSet<&str> =
                union.alternatives.iter().map(|a| a.as_ref()).collect();
            let mut rank_of = HashMap::new();
            for (rank, member) in union.precedence.iter().enumerate() {
                if !alternatives.contains(member.as_ref()) {
                    return Err(GrammarError::UnknownUnionMember {
                        union: union.name.clone(),
                        member: member.clone(),
                    });
                }
                rank_of.insert(member.clone(), rank);
            }
            let mut assoc_of = HashMap::new();
            for (member, assoc) in &union.associativity {
                if !alternatives.contains(member.as_ref()) {
                    return Err(GrammarError::UnknownUnionMember {
                        union: union.name.clone(),
                        member: member.clone(),
                    });
                }
                assoc_of.insert(member.clone(), *assoc);
            }
            let unlisted_rank = union.precedence.len();
            for member in &union.alternatives {
                let member_index = self.names[member];
                if let Some(existing) = self.membership.get(&member_index) {
                    let existing_union = self.nonterminals[existing.union.0].name.clone();
                    return Err(GrammarError::OverlappingUnionMembership {
                        rule: member.clone(),
                        unions: (existing_union, union.name.clone()),
                    });
                }
                let rank = rank_of.get(member).copied().unwrap_or(unlisted_rank);
                let assoc = assoc_of
                    .get(member)
                    .copied()
                    .unwrap_or(Associativity::None);
                self.membership.insert(
                    member_index,
                    Membership {
                        union: index,
                        rank,
                        assoc,
                    },
                );
            }
            self.unions.insert(index, UnionConfig { rank_of, assoc_of });
        }
        Ok(())
    }

    fn finish(self, start_symbol: &str) -> Result<CompiledGrammar, GrammarError> {
        let start = self.names[start_symbol];
        Ok(CompiledGrammar {
            start,
            nonterminals: self.nonterminals,
            alternates: self.alternates,
            slots: self.slots,
            names: self.names,
            unions: self.unions,
            membership: self.membership,
        })
    }
}

#[derive(Default)]
struct LiftCounters {
    rep: usize,
    opt: usize,
    alt: usize,
    seq: usize,
}

impl LiftCounters {
    fn next_rep(&mut self) -> usize {
        self.rep += 1;
        self.rep
    }
    fn next_opt(&mut self) -> usize {
        self.opt += 1;
        self.opt
    }
    fn next_alt(&mut self) -> usize {
        self.alt += 1;
        self.alt
    }
    fn next_seq(&mut self) -> usize {
        self.seq += 1;
        self.seq
    }
}

fn collect_references(
    expr: &RuleExpr,
    enclosing: &SourceLocation,
    out: &mut Vec<(Rc<str>, SourceLocation)>,
) {
    match expr {
        RuleExpr::Literal { .. } | RuleExpr::CharClass { .. } => {}
        RuleExpr::Ref { name, location, .. } => {
            let from = location.clone().unwrap_or_else(|| enclosing.clone());
            out.push((name.clone(), from));
        }
        RuleExpr::Choice { alternatives, .. } => {
            for alternative in alternatives {
                collect_references(alternative, enclosing, out);
            }
        }
        RuleExpr::Sequence { parts, .. } => {
            for part in parts {
                collect_references(part, enclosing, out);
            }
        }
        RuleExpr::Repeat {
            body, separator, ..
        } => {
            collect_references(body, enclosing, out);
            if let Some(separator) = separator {
                collect_references(separator, enclosing, out);
            }
        }
        RuleExpr::Optional { body, .. } => collect_references(body, enclosing, out),
    }
}

fn collect_captures(expr: &RuleExpr, out: &mut Vec<(Rc<str>, CaptureKind)>) {
    if let Some(capture) = expr.capture_name() {
        let kind = match expr {
            RuleExpr::Repeat { .. } => CaptureKind::List,
            RuleExpr::Optional { .. } => CaptureKind::Maybe,
            _ => CaptureKind::Scalar,
        };
        out.push((capture.clone(), kind));
    }
    match expr {
        RuleExpr::Literal { .. } | RuleExpr::CharClass { .. } | RuleExpr::Ref { .. } => {}
        RuleExpr::Choice { alternatives, .. } => {
            for alternative in alternatives {
                collect_captures(alternative, out);
            }
        }
        RuleExpr::Sequence { parts, .. } => {
            for part in parts {
                collect_captures(part, out);
            }
        }
        RuleExpr::Repeat {
            body, separator, ..
        } => {
            collect_captures(body, out);
            if let Some(separator) = separator {
                collect_captures(separator, out);
            }
        }
        RuleExpr::Optional { body, .. } => collect_captures(body, out),
    }
}
