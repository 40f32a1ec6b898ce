use crate::charset::{CharSet, CodePointSet};
use crate::util::Log;
use crate::Associativity;
use once_cell::unsync::OnceCell;
use std::collections::{BTreeSet, HashMap};
use std::fmt::Write;
use std::rc::Rc;

#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq, PartialOrd, Ord)]
/// Index of a non-terminal in the compiled grammar table.
pub(crate) struct NtIndex(pub usize);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
/// Why a non-terminal exists: written by the user, or lifted out of an
/// inline sub-expression during compilation.
pub(crate) enum NtOrigin {
    Named,
    Union,
    RepeatLift,
    OptionLift,
    ChoiceLift,
    SequenceLift,
}

#[derive(Debug, Clone)]
pub(crate) enum Atom {
    Literal(Rc<str>),
    Class(Rc<CharSet>),
    NonTerm(NtIndex),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
/// How an atom's match participates in extraction: a plain part of a user
/// rule, a repetition/option item, or a separator between items.
pub(crate) enum AtomRole {
    Plain,
    Item,
    Separator,
}

#[derive(Debug, Clone)]
pub(crate) struct AtomEntry {
    pub atom: Atom,
    pub capture: Option<Rc<str>>,
    pub role: AtomRole,
}

#[derive(Debug, Clone)]
/// One alternate of a non-terminal: a flat sequence of atoms with
/// pre-computed scheduling data.
pub(crate) struct Alternate {
    pub lhs: NtIndex,
    pub atoms: Vec<AtomEntry>,
    /// Global slot id of the position before the first atom; the slot after
    /// atom `k` is `slot_base + k + 1`.
    pub slot_base: usize,
    pub nullable: bool,
    pub first: CodePointSet,
    pub first_desc: BTreeSet<Rc<str>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
/// The shape a capture produces when hydrated.
pub(crate) enum CaptureKind {
    Scalar,
    List,
    Maybe,
}

#[derive(Debug, Clone)]
/// Disambiguation configuration of one union non-terminal.
pub(crate) struct UnionConfig {
    pub rank_of: HashMap<Rc<str>, usize>,
    pub assoc_of: HashMap<Rc<str>, Associativity>,
}

#[derive(Debug, Clone, Copy)]
/// Membership of a rule in a configured union.
pub(crate) struct Membership {
    pub union: NtIndex,
    pub rank: usize,
    pub assoc: Associativity,
}

pub(crate) struct NonTerminal {
    pub name: Rc<str>,
    pub origin: NtOrigin,
    /// Global alternate ids, in declaration order.
    pub alternates: Vec<usize>,
    pub nullable: bool,
    pub first: CodePointSet,
    pub first_desc: BTreeSet<Rc<str>>,
    /// Declared captures of a named rule, in declaration order.
    pub capture_decls: Vec<(Rc<str>, CaptureKind)>,
    pub debugger: OnceCell<Log<&'static str>>,
}

/// An immutable compiled grammar: the non-terminal table, flat alternates,
/// grammar slots and the per-union disambiguation configuration.
///
/// A compiled grammar is read-only and may be shared between any number of
/// parse invocations.
pub struct CompiledGrammar {
    pub(crate) start: NtIndex,
    pub(crate) nonterminals: Vec<NonTerminal>,
    pub(crate) alternates: Vec<Alternate>,
    /// Slot id decode table: slot -> (alternate id, dot).
    pub(crate) slots: Vec<(usize, usize)>,
    pub(crate) names: HashMap<Rc<str>, NtIndex>,
    pub(crate) unions: HashMap<NtIndex, UnionConfig>,
    pub(crate) membership: HashMap<NtIndex, Membership>,
}

impl CompiledGrammar {
    /// The designated start symbol.
    pub fn start_symbol(&self) -> &str {
        &self.nonterminals[self.start.0].name
    }

    /// Look up a non-terminal by name.
    pub(crate) fn find(&self, name: &str) -> Option<NtIndex> {
        self.names.get(name).copied()
    }

    pub(crate) fn nt(&self, index: NtIndex) -> &NonTerminal {
        &self.nonterminals[index.0]
    }

    pub(crate) fn alternate(&self, id: usize) -> &Alternate {
        &self.alternates[id]
    }

    pub(crate) fn decode_slot(&self, slot: usize) -> (usize, usize) {
        self.slots[slot]
    }

    /// The member rule derived by the given alternate of a union
    /// non-terminal, when the alternate is the canonical single-reference
    /// shape unions compile to.
    pub(crate) fn union_member_of_alternate(&self, alt: usize) -> Option<NtIndex> {
        let alternate = self.alternate(alt);
        if self.nt(alternate.lhs).origin != NtOrigin::Union {
            return None;
        }
        match alternate.atoms.as_slice() {
            [entry] => match entry.atom {
                Atom::NonTerm(member) => Some(member),
                _ => None,
            },
            _ => None,
        }
    }

    /// Render every reachable production, including lifted anonymous ones,
    /// as a human readable grammar listing.
    pub fn render_grammar(&self) -> Result<String, std::fmt::Error> {
        let mut writer = String::new();
        for nonterminal in &self.nonterminals {
            write!(writer, "{}", nonterminal.name)?;
            write!(writer, "{:>4}", ":")?;
            for (index, alt) in nonterminal.alternates.iter().enumerate() {
                if index != 0 {
                    write!(writer, " |")?;
                }
                let alternate = &self.alternates[*alt];
                if alternate.atoms.is_empty() {
                    write!(writer, " ε")?;
                }
                for entry in &alternate.atoms {
                    match &entry.atom {
                        Atom::Literal(value) => write!(writer, " {:?}", value)?,
                        Atom::Class(class) => write!(writer, " {}", class)?,
                        Atom::NonTerm(nt) => write!(writer, " {}", self.nt(*nt).name)?,
                    }
                    if let Some(capture) = &entry.capture {
                        write!(writer, "@{}", capture)?;
                    }
                }
            }
            writeln!(writer, " ;")?;
        }
        for (index, nonterminal) in self.nonterminals.iter().enumerate() {
            let config = match self.unions.get(&NtIndex(index)) {
                Some(config) => config,
                None => continue,
            };
            let mut ranked: Vec<(&Rc<str>, usize)> = config
                .rank_of
                .iter()
                .map(|(member, rank)| (member, *rank))
                .collect();
            ranked.sort_by_key(|(_, rank)| *rank);
            if !ranked.is_empty() {
                let names: Vec<&str> = ranked.iter().map(|(member, _)| member.as_ref()).collect();
                writeln!(
                    writer,
                    "priority {} : {} ;",
                    nonterminal.name,
                    names.join(" > ")
                )?;
            }
            let mut assoc: Vec<(&Rc<str>, Associativity)> = config
                .assoc_of
                .iter()
                .map(|(member, assoc)| (member, *assoc))
                .collect();
            assoc.sort_by(|a, b| a.0.cmp(b.0));
            for (member, direction) in assoc {
                writeln!(
                    writer,
                    "associativity {} : {:?} ;",
                    member, direction
                )?;
            }
        }
        Ok(writer)
    }
}

impl Atom {
    /// The description used in expected-token sets and grammar listings.
    pub(crate) fn describe(&self, grammar: &CompiledGrammar) -> Rc<str> {
        match self {
            Atom::Literal(value) => format!("\"{}\"", value).into(),
            Atom::Class(class) => format!("{}", class).into(),
            Atom::NonTerm(nt) => grammar.nt(*nt).name.clone(),
        }
    }
}
