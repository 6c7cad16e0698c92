//! # Embedding Tower
//!
//! The linear chain obtained by following `embeds` links from a fault down
//! to its innermost base. Index 0 is the innermost fault, the last index
//! is the fault the walk started from.
//!
//! The walk is generic over [`Embed`] so that any chain-shaped structure
//! (including deliberately cyclic test doubles) can be measured.

use crate::fault::Fault;
use std::collections::BTreeSet;

/// A node with at most one embedded successor.
pub trait Embed: Sized {
    /// The next node down the chain.
    fn embeds(&self) -> Option<Self>;

    /// Identity of this node; revisiting an identity ends the walk.
    fn node_id(&self) -> usize;
}

impl Embed for Fault {
    fn embeds(&self) -> Option<Self> {
        Fault::embeds(self)
    }

    fn node_id(&self) -> usize {
        Fault::node_id(self)
    }
}

/// Collect the embedding tower of `fault`, innermost first.
///
/// The walk stops at the first node without a successor, or at the first
/// node whose identity was already visited (that node is not repeated).
pub fn embedding_tower<N: Embed + Clone>(fault: &N) -> Vec<N> {
    let mut seen = BTreeSet::new();
    let mut tower = Vec::new();
    let mut current = Some(fault.clone());

    while let Some(node) = current {
        if !seen.insert(node.node_id()) {
            break;
        }
        current = node.embeds();
        tower.push(node);
    }

    tower.reverse();
    tower
}

// =============================================================================
// TESTS
// =============================================================================
