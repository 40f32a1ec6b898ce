//! Selection of one packed child per ambiguous SPPF node.
//!
//! The filter never reshapes the forest; it decides, lazily and only along
//! the selected derivation, which packed child each symbol or intermediate
//! node contributes to the extracted tree. The decision sequence is the one
//! declared on the union configuration: priority, then associativity, then
//! longest match, then document order with a recorded diagnostic.

use crate::gll::{PackedNode, SppfArena, SppfId, SppfKey};
use crate::grammar::{CompiledGrammar, NtIndex};
use crate::util::Code;
use crate::{AmbiguityDiagnostic, Associativity};
use std::collections::{HashMap, HashSet};

pub(crate) struct Selection<'g> {
    grammar: &'g CompiledGrammar,
    choices: HashMap<SppfId, usize>,
    /// Symbol nodes currently being extracted. A cyclic grammar (one whose
    /// non-terminals can derive themselves) yields cyclic SPPFs; packed
    /// children pointing back into this set are avoided so extraction always
    /// follows an acyclic derivation.
    active: HashSet<SppfId>,
    /// (symbol name, start, end) of every tie that fell through to document
    /// order; the first one becomes the reported diagnostic.
    ties: Vec<(std::rc::Rc<str>, usize, usize)>,
}

impl<'g> Selection<'g> {
    pub fn new(grammar: &'g CompiledGrammar) -> Self {
        Self {
            grammar,
            choices: HashMap::new(),
            active: HashSet::new(),
            ties: Vec::new(),
        }
    }

    /// Mark a symbol node whose derivation is being extracted.
    pub fn enter(&mut self, id: SppfId) {
        self.active.insert(id);
    }

    pub fn leave(&mut self, id: SppfId) {
        self.active.remove(&id);
    }

    /// The packed child index this node contributes to the selected tree.
    pub fn select(&mut self, sppf: &SppfArena, id: SppfId) -> usize {
        if let Some(choice) = self.choices.get(&id) {
            return *choice;
        }
        if sppf.node(id).packed.len() <= 1 {
            self.choices.insert(id, 0);
            return 0;
        }
        let (choice, cacheable) = self.choose(sppf, id);
        if cacheable {
            self.choices.insert(id, choice);
        }
        choice
    }

    /// Consume the selection and report the first tie broken beyond the
    /// declared rules, if any.
    pub fn into_diagnostic(self, code: &Code) -> Option<AmbiguityDiagnostic> {
        let count = self.ties.len();
        self.ties
            .into_iter()
            .next()
            .map(|(symbol, start, end)| AmbiguityDiagnostic {
                symbol,
                start,
                end,
                position: code.obtain_position(start),
                count,
            })
    }

    fn choose(&mut self, sppf: &SppfArena, id: SppfId) -> (usize, bool) {
        let node = sppf.node(id);
        let packed: Vec<PackedNode> = node.packed.clone();
        let key = node.key;
        let mut candidates: Vec<usize> = (0..packed.len()).collect();

        // Avoid derivations that loop back into a node currently being
        // extracted; such a choice is context dependent and never cached.
        let acyclic: Vec<usize> = candidates
            .iter()
            .copied()
            .filter(|c| {
                let p = packed[*c];
                p.right != id
                    && p.left != Some(id)
                    && !self.active.contains(&p.right)
                    && p.left.map_or(true, |left| !self.active.contains(&left))
            })
            .collect();
        let cacheable = acyclic.len() == candidates.len();
        if !acyclic.is_empty() {
            candidates = acyclic;
        }

        if let SppfKey::Symbol { nt, .. } = key {
            // Priority: at a configured union node, the loosest binding
            // member derives the outermost span.
            if self.grammar.unions.contains_key(&nt) {
                let ranks: Vec<usize> = candidates
                    .iter()
                    .map(|c| self.candidate_rank(packed[*c]))
                    .collect();
                let best = *ranks.iter().max().unwrap();
                let mut index = 0;
                candidates.retain(|_| {
                    let keep = ranks[index] == best;
                    index += 1;
                    keep
                });
            }

            // Associativity: at a member rule node, reject the grouping the
            // declared direction forbids.
            if let Some(membership) = self.grammar.membership.get(&nt).copied() {
                let survivors: Vec<usize> = candidates
                    .iter()
                    .copied()
                    .filter(|c| {
                        let right_recurses = self.recurses(sppf, packed[*c].right, nt);
                        let left_recurses = self
                            .leftmost_child(sppf, packed[*c])
                            .map(|child| self.recurses(sppf, child, nt))
                            .unwrap_or(false);
                        match membership.assoc {
                            Associativity::Left => !right_recurses,
                            Associativity::Right => !left_recurses,
                            Associativity::None => !right_recurses && !left_recurses,
                        }
                    })
                    .collect();
                // When every candidate violates the declared direction there
                // is nothing the filter can honor; fall through with the
                // original set and let document order decide.
                if !survivors.is_empty() {
                    candidates = survivors;
                }
            }
        }

        // Longest match: among splits of the same derivation prefer the
        // longer left part, i.e. the greatest pivot.
        if candidates.len() > 1 {
            let best = candidates
                .iter()
                .map(|c| packed[*c].pivot)
                .max()
                .unwrap();
            candidates.retain(|c| packed[*c].pivot == best);
        }

        // Document order: the alternate declared first wins; a tie reaching
        // this point is a genuine ambiguity worth reporting.
        if candidates.len() > 1 {
            let (symbol, start, end) = match key {
                SppfKey::Symbol { nt, start, end } => {
                    (self.grammar.nt(nt).name.clone(), start as usize, end as usize)
                }
                SppfKey::Intermediate { slot, start, end } => {
                    let (alt, _) = self.grammar.decode_slot(slot as usize);
                    let lhs = self.grammar.alternate(alt).lhs;
                    (self.grammar.nt(lhs).name.clone(), start as usize, end as usize)
                }
                SppfKey::Terminal { .. } => {
                    panic!("Bug! Terminal nodes have no packed children.")
                }
            };
            self.ties.push((symbol, start, end));
            candidates.sort_by_key(|c| self.alternate_order(packed[*c]));
        }

        (candidates[0], cacheable)
    }

    /// Priority rank of a union packed child: the rank of the member rule
    /// its alternate derives, where higher means looser binding.
    fn candidate_rank(&self, packed: PackedNode) -> usize {
        let (alt, _) = self.grammar.decode_slot(packed.slot);
        match self.grammar.union_member_of_alternate(alt) {
            Some(member) => self
                .grammar
                .membership
                .get(&member)
                .map(|membership| membership.rank)
                .unwrap_or(usize::MAX),
            None => usize::MAX,
        }
    }

    /// Whether `child` is (or will resolve to) a derivation through the rule
    /// `member` again, looking through the union wrapper node.
    fn recurses(&self, sppf: &SppfArena, child: SppfId, member: NtIndex) -> bool {
        match sppf.node(child).key {
            SppfKey::Symbol { nt, .. } => {
                if !self.grammar.unions.contains_key(&nt) {
                    return nt == member;
                }
                // The union node resolves to its loosest derivable member.
                self.effective_member(sppf, child) == Some(member)
            }
            _ => false,
        }
    }

    /// The member rule a configured union node resolves to under the
    /// priority filter, before associativity is considered.
    fn effective_member(&self, sppf: &SppfArena, id: SppfId) -> Option<NtIndex> {
        let node = sppf.node(id);
        let mut best: Option<(usize, NtIndex)> = None;
        for packed in &node.packed {
            let (alt, _) = self.grammar.decode_slot(packed.slot);
            let member = match self.grammar.union_member_of_alternate(alt) {
                Some(member) => member,
                None => continue,
            };
            let rank = self
                .grammar
                .membership
                .get(&member)
                .map(|membership| membership.rank)
                .unwrap_or(usize::MAX);
            let better = match best {
                Some((best_rank, _)) => rank > best_rank,
                None => true,
            };
            if better {
                best = Some((rank, member));
            }
        }
        best.map(|(_, member)| member)
    }

    /// The first symbol child of a packed derivation, reached by descending
    /// the chain of intermediate left children.
    fn leftmost_child(&mut self, sppf: &SppfArena, packed: PackedNode) -> Option<SppfId> {
        let mut current = packed;
        loop {
            match current.left {
                Some(left) => match sppf.node(left).key {
                    SppfKey::Intermediate { .. } => {
                        let choice = self.select(sppf, left);
                        current = sppf.node(left).packed[choice];
                    }
                    SppfKey::Symbol { .. } => return Some(left),
                    SppfKey::Terminal { .. } => return None,
                },
                None => {
                    return match sppf.node(current.right).key {
                        SppfKey::Symbol { .. } => Some(current.right),
                        _ => None,
                    }
                }
            }
        }
    }

    /// Declaration index of the alternate a packed child used, for the final
    /// document order tie break.
    fn alternate_order(&self, packed: PackedNode) -> (usize, usize) {
        let (alt, _) = self.grammar.decode_slot(packed.slot);
        let lhs = self.grammar.alternate(alt).lhs;
        let declaration = self
            .grammar
            .nt(lhs)
            .alternates
            .iter()
            .position(|a| *a == alt)
            .unwrap_or(usize::MAX);
        (declaration, packed.pivot as usize)
    }
}
