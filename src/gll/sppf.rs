use crate::grammar::NtIndex;
use std::collections::HashMap;

#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq, PartialOrd, Ord)]
/// Index of a node in the per-parse SPPF arena.
pub(crate) struct SppfId(pub u32);

#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq)]
/// Identity of an SPPF node. A parse builds at most one node per key.
pub(crate) enum SppfKey {
    /// A terminal match over `[start, end)`; `start == end` is the empty
    /// match of a nullable production.
    Terminal { start: u32, end: u32 },
    /// A completed non-terminal derivation over `[start, end)`.
    Symbol {
        nt: NtIndex,
        start: u32,
        end: u32,
    },
    /// A partial production match, keyed by the grammar slot reached.
    Intermediate {
        slot: u32,
        start: u32,
        end: u32,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
/// One derivation of a symbol or intermediate node.
///
/// `slot` records the grammar slot that produced the combination; for a
/// symbol node that is the end-of-production slot, which identifies the
/// alternate the derivation used.
pub(crate) struct PackedNode {
    pub slot: usize,
    pub pivot: u32,
    pub left: Option<SppfId>,
    pub right: SppfId,
}

pub(crate) struct SppfNode {
    pub key: SppfKey,
    pub packed: Vec<PackedNode>,
}

/// The shared packed parse forest arena of one parse invocation.
///
/// Nodes are deduplicated by their key triple; packed children are
/// deduplicated per node. Multiple packed children under one node mean the
/// grammar derived the same span in more than one way.
pub(crate) struct SppfArena {
    nodes: Vec<SppfNode>,
    index: HashMap<SppfKey, SppfId>,
}

impl SppfArena {
    pub fn new() -> Self {
        Self {
            nodes: Vec::new(),
            index: HashMap::new(),
        }
    }

    pub fn node(&self, id: SppfId) -> &SppfNode {
        &self.nodes[id.0 as usize]
    }

    pub fn intern(&mut self, key: SppfKey) -> SppfId {
        if let Some(id) = self.index.get(&key) {
            return *id;
        }
        let id = SppfId(self.nodes.len() as u32);
        self.nodes.push(SppfNode {
            key,
            packed: Vec::new(),
        });
        self.index.insert(key, id);
        id
    }

    pub fn terminal(&mut self, start: u32, end: u32) -> SppfId {
        self.intern(SppfKey::Terminal { start, end })
    }

    pub fn extents(&self, id: SppfId) -> (u32, u32) {
        match self.node(id).key {
            SppfKey::Terminal { start, end }
            | SppfKey::Symbol { start, end, .. }
            | SppfKey::Intermediate { start, end, .. } => (start, end),
        }
    }

    pub fn add_packed(&mut self, id: SppfId, packed: PackedNode) {
        let node = &mut self.nodes[id.0 as usize];
        if !node.packed.contains(&packed) {
            node.packed.push(packed);
        }
    }
}
