//! Extraction of the selected derivation into a [ParseTree].
//!
//! The extractor walks the SPPF along the packed children chosen by the
//! disambiguation filter and rebuilds the flat children of every production.
//! Non-terminals lifted during compilation disappear from the result: their
//! matches are spliced into the enclosing rule, grouped under a list node
//! when the lifted expression was captured.

use crate::disambiguate::Selection;
use crate::gll::{PackedNode, SppfArena, SppfId, SppfKey};
use crate::grammar::{Atom, AtomRole, CompiledGrammar, NtOrigin};
use crate::{ParseTree, TreeKind};

pub(crate) fn extract_tree(
    grammar: &CompiledGrammar,
    sppf: &SppfArena,
    root: SppfId,
    selection: &mut Selection,
) -> ParseTree {
    let mut trees = extract_symbol(grammar, sppf, root, selection);
    match trees.len() {
        1 => trees.remove(0),
        _ => panic!("Bug! The start symbol must extract to exactly one tree."),
    }
}

/// The trees a symbol node contributes to its parent: one rule node for a
/// named rule, the member's tree for a union, and the spliced matches for a
/// lifted non-terminal.
fn extract_symbol(
    grammar: &CompiledGrammar,
    sppf: &SppfArena,
    id: SppfId,
    selection: &mut Selection,
) -> Vec<ParseTree> {
    let (nt, start, end) = match sppf.node(id).key {
        SppfKey::Symbol { nt, start, end } => (nt, start as usize, end as usize),
        _ => panic!("Bug! extract_symbol expects a symbol node."),
    };
    selection.enter(id);
    let result = match grammar.nt(nt).origin {
        NtOrigin::Named => {
            let children = derive_children(grammar, sppf, id, selection);
            vec![ParseTree::new(
                TreeKind::Rule(grammar.nt(nt).name.clone()),
                start,
                end,
                None,
                children,
            )]
        }
        NtOrigin::Union
        | NtOrigin::RepeatLift
        | NtOrigin::OptionLift
        | NtOrigin::ChoiceLift
        | NtOrigin::SequenceLift => derive_children(grammar, sppf, id, selection),
    };
    selection.leave(id);
    result
}

/// Rebuild the ordered children of the selected alternate of a symbol node.
fn derive_children(
    grammar: &CompiledGrammar,
    sppf: &SppfArena,
    id: SppfId,
    selection: &mut Selection,
) -> Vec<ParseTree> {
    let choice = selection.select(sppf, id);
    let packed = sppf.node(id).packed[choice];
    let (alt, _) = grammar.decode_slot(packed.slot);
    let alternate = grammar.alternate(alt);
    if alternate.atoms.is_empty() {
        return Vec::new();
    }

    let mut child_nodes: Vec<SppfId> = Vec::new();
    collect_chain(sppf, selection, packed, &mut child_nodes);
    if child_nodes.len() != alternate.atoms.len() {
        panic!(
            "Bug! Derivation of {} yielded {} children for {} atoms.",
            grammar.nt(alternate.lhs).name,
            child_nodes.len(),
            alternate.atoms.len()
        );
    }

    let mut out: Vec<ParseTree> = Vec::new();
    for (entry, child) in alternate.atoms.iter().zip(child_nodes) {
        let (child_start, child_end) = sppf.extents(child);
        let (child_start, child_end) = (child_start as usize, child_end as usize);
        match &entry.atom {
            Atom::Literal(_) | Atom::Class(_) => {
                let kind = match entry.role {
                    AtomRole::Separator => TreeKind::Separator,
                    _ => TreeKind::Token,
                };
                out.push(ParseTree::leaf(
                    kind,
                    child_start,
                    child_end,
                    entry.capture.clone(),
                ));
            }
            Atom::NonTerm(nt) => {
                let mut sub = extract_symbol(grammar, sppf, child, selection);
                if entry.role == AtomRole::Separator {
                    out.push(ParseTree::new(
                        TreeKind::Separator,
                        child_start,
                        child_end,
                        None,
                        sub,
                    ));
                    continue;
                }
                match grammar.nt(*nt).origin {
                    NtOrigin::Named | NtOrigin::Union => {
                        // A named reference or a union contributes exactly
                        // one tree; the union wrapper is already collapsed.
                        for mut tree in sub.drain(..) {
                            if tree.capture.is_none() {
                                tree.capture = entry.capture.clone();
                            }
                            out.push(tree);
                        }
                    }
                    NtOrigin::RepeatLift => match &entry.capture {
                        Some(capture) => out.push(ParseTree::new(
                            TreeKind::List,
                            child_start,
                            child_end,
                            Some(capture.clone()),
                            sub,
                        )),
                        None => out.extend(sub),
                    },
                    NtOrigin::OptionLift | NtOrigin::ChoiceLift | NtOrigin::SequenceLift => {
                        match &entry.capture {
                            None => out.extend(sub),
                            Some(capture) => {
                                let items: Vec<&ParseTree> = sub
                                    .iter()
                                    .filter(|tree| tree.kind != TreeKind::Separator)
                                    .collect();
                                if items.len() == 1 && sub.len() == 1 {
                                    let mut tree = sub.remove(0);
                                    tree.capture = Some(capture.clone());
                                    out.push(tree);
                                } else if !sub.is_empty() {
                                    out.push(ParseTree::new(
                                        TreeKind::List,
                                        child_start,
                                        child_end,
                                        Some(capture.clone()),
                                        sub,
                                    ));
                                }
                                // An unmatched option contributes nothing;
                                // hydration reports the capture as empty.
                            }
                        }
                    }
                }
            }
        }
    }
    out
}

/// Walk the left chain of a packed derivation collecting the child node of
/// every atom position, left to right.
fn collect_chain(
    sppf: &SppfArena,
    selection: &mut Selection,
    packed: PackedNode,
    out: &mut Vec<SppfId>,
) {
    if let Some(left) = packed.left {
        match sppf.node(left).key {
            SppfKey::Intermediate { .. } => {
                let choice = selection.select(sppf, left);
                let inner = sppf.node(left).packed[choice];
                collect_chain(sppf, selection, inner, out);
            }
            _ => out.push(left),
        }
    }
    out.push(packed.right);
}
