//! # Traversal Engine
//!
//! Depth-first search over the search graph (`nested` links), used by
//! [`is`], [`as_into`]/[`as_kind`] and [`as_node`].
//!
//! The search keeps an explicit stack so deep chains never grow the call
//! stack. Children are pushed in order and popped last-first, so the
//! members of a join are visited in reverse order. Searches over the
//! same graph therefore always report the same hit.

use crate::fault::{Fault, FaultKind};
use std::sync::Arc;

/// A node of the search graph.
pub trait Nested: Sized {
    /// Outgoing edges, in declaration order.
    fn nested(&self) -> Vec<Self>;
}

impl Nested for Fault {
    fn nested(&self) -> Vec<Self> {
        Fault::nested(self)
    }
}

/// Visit `fault` and everything reachable from it, depth first, until
/// `visit` returns `true`.
///
/// Returns `false` when `fault` is absent (without calling `visit`) or
/// when every node was visited without success.
pub fn traverse<N, F>(fault: Option<&N>, mut visit: F) -> bool
where
    N: Nested + Clone,
    F: FnMut(&N) -> bool,
{
    let Some(root) = fault else {
        return false;
    };

    let mut stack = vec![root.clone()];

    while let Some(top) = stack.pop() {
        if visit(&top) {
            return true;
        }
        stack.extend(top.nested());
    }

    false
}

/// Whether `fault`, or anything reachable from it, equals `target`.
///
/// A node matches when it is the same instance as `target`, when it
/// shares `target`'s descriptor, or when its payload's custom equality
/// accepts `target`.
pub fn is(fault: Option<&Fault>, target: Option<&Fault>) -> bool {
    let (Some(fault), Some(target)) = (fault, target) else {
        return false;
    };

    let target_descriptor = target.descriptor();

    traverse(Some(fault), |node| {
        if node.ptr_eq(target) {
            return true;
        }

        let same_descriptor = match (&target_descriptor, node.descriptor()) {
            (Some(wanted), Some(found)) => wanted.same(&found),
            _ => false,
        };

        same_descriptor || node.custom_is(target)
    })
}

/// Search for a wrapping fault whose payload is a `T` and store it in
/// `slot`.
///
/// A payload may also claim the slot through
/// [`FaultKind::extract_into`]. On failure `slot` is left untouched.
pub fn as_into<T: FaultKind>(fault: Option<&Fault>, slot: &mut Option<Arc<T>>) -> bool {
    let mut found: Option<Arc<T>> = None;

    let hit = traverse(fault, |node| {
        if let Some(kind) = node.kind_arc::<T>() {
            found = Some(kind);
            return true;
        }
        node.custom_extract(&mut found) && found.is_some()
    });

    match found {
        Some(kind) if hit => {
            *slot = Some(kind);
            true
        }
        _ => false,
    }
}

/// Owned form of [`as_into`].
#[must_use]
pub fn as_kind<T: FaultKind>(fault: Option<&Fault>) -> Option<Arc<T>> {
    let mut slot = None;
    as_into(fault, &mut slot);
    slot
}

/// First fault in search order that satisfies `wanted`, as a handle.
///
/// Unlike [`as_kind`], this recovers any variant, such as a join or a
/// base reached through a cause.
pub fn as_node<P>(fault: Option<&Fault>, mut wanted: P) -> Option<Fault>
where
    P: FnMut(&Fault) -> bool,
{
    let mut found = None;

    traverse(fault, |node| {
        if wanted(node) {
            found = Some(node.clone());
        }
        found.is_some()
    });

    found
}

impl Fault {
    /// `is(Some(self), Some(target))`.
    #[must_use]
    pub fn is(&self, target: &Fault) -> bool {
        is(Some(self), Some(target))
    }
}

// =============================================================================
// TESTS
// =============================================================================
