use super::sppf::SppfId;
use std::collections::HashMap;

#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq)]
/// Index of a node in the per-parse graph structured stack.
pub(crate) struct GssId(pub u32);

/// The return slot of the synthetic root node. Never decoded.
pub(crate) const ROOT_SLOT: usize = usize::MAX;

/// A GSS node represents every pending return to one grammar slot at one
/// input position. Edges point towards callers and are labelled with the
/// SPPF node accumulated before the call.
pub(crate) struct GssNode {
    pub slot: usize,
    pub position: u32,
    pub edges: Vec<(Option<SppfId>, GssId)>,
    /// Completed derivations popped through this node, used to resume
    /// callers that link up after the pop already happened.
    pub pops: Vec<SppfId>,
}

pub(crate) struct GssArena {
    nodes: Vec<GssNode>,
    index: HashMap<(usize, u32), GssId>,
}

impl GssArena {
    pub fn new() -> Self {
        Self {
            nodes: Vec::new(),
            index: HashMap::new(),
        }
    }

    pub fn node(&self, id: GssId) -> &GssNode {
        &self.nodes[id.0 as usize]
    }

    pub fn intern(&mut self, slot: usize, position: u32) -> GssId {
        if let Some(id) = self.index.get(&(slot, position)) {
            return *id;
        }
        let id = GssId(self.nodes.len() as u32);
        self.nodes.push(GssNode {
            slot,
            position,
            edges: Vec::new(),
            pops: Vec::new(),
        });
        self.index.insert((slot, position), id);
        id
    }

    /// Add an edge from `from` back to `to`; returns whether it was new.
    pub fn add_edge(&mut self, from: GssId, label: Option<SppfId>, to: GssId) -> bool {
        let node = &mut self.nodes[from.0 as usize];
        if node.edges.iter().any(|edge| *edge == (label, to)) {
            false
        } else {
            node.edges.push((label, to));
            true
        }
    }

    pub fn record_pop(&mut self, id: GssId, sppf: SppfId) {
        let node = &mut self.nodes[id.0 as usize];
        if !node.pops.contains(&sppf) {
            node.pops.push(sppf);
        }
    }
}
