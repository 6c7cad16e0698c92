//! # Faults
//!
//! A [`Fault`] is a cheap, shareable handle over one of three variants:
//!
//! - **Base**: binds a [`Descriptor`], a timestamp, suggestions, stack
//!   frames, a context store and an optional upstream cause.
//! - **Wrapping**: embeds exactly one fault and adds a domain payload
//!   implementing [`FaultKind`]. Level, code, message and timestamp are
//!   always those of the embedded base.
//! - **Join**: aggregates sibling faults behind a synthesized base (see
//!   [`crate::join`]).
//!
//! Two links leave every node. `embeds` forms the embedding tower used for
//! rendering; `nested` forms the search graph used by `is`/`as`:
//!
//! | variant  | embeds            | nested            |
//! |----------|-------------------|-------------------|
//! | Base     | none              | its cause, if any |
//! | Wrapping | the embedded base | the embedded base |
//! | Join     | synthesized base  | every member      |
//!
//! An *opaque* wrapping fault hides its embedded value from both links.
//! Nothing below it is reachable, so any operation that needs the base
//! reports [`crate::descriptor::bad_construction`].
//!
//! A base keeps its mutable state behind a `RwLock` only so that faults
//! are `Send + Sync` and can travel as panic payloads. Callers still finish
//! annotating a fault before sharing it; the lock does not make concurrent
//! annotation ordered.
//!
//! Dropping a fault frees its chain with a work list, so arbitrarily deep
//! chains never grow the call stack.

use crate::descriptor::{Descriptor, bad_construction};
use crate::level::Severity;
use crate::render;
use chrono::{DateTime, Utc};
use std::any::Any;
use std::collections::BTreeMap;
use std::fmt;
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

// =============================================================================
// DOWNCAST SUPPORT
// =============================================================================

/// Upcast helper that lets trait objects be recovered as concrete types.
///
/// Blanket-implemented; never implement it by hand. Call it on the trait
/// object (`kind.as_ref().as_any()`), not on the `Arc` holding it.
pub trait AsAny: Any + Send + Sync {
    /// Borrow as `&dyn Any`.
    fn as_any(&self) -> &dyn Any;

    /// Convert a shared handle into a shared `dyn Any` handle.
    fn into_any(self: Arc<Self>) -> Arc<dyn Any + Send + Sync>;
}

impl<T: Any + Send + Sync> AsAny for T {
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn into_any(self: Arc<Self>) -> Arc<dyn Any + Send + Sync> {
        self
    }
}

// =============================================================================
// FAULT KIND (domain payload of a wrapping fault)
// =============================================================================

/// Domain payload carried by a wrapping fault.
///
/// Implementors contribute their own info lines and may opt into custom
/// equality or custom extraction during `is`/`as` searches.
pub trait FaultKind: AsAny + fmt::Debug {
    /// Lines this payload adds to a rendering. Must not repeat the
    /// embedded fault's lines nor the top-level message.
    fn info_lines(&self) -> Vec<String>;

    /// Custom equality consulted by [`crate::is`].
    fn is(&self, _target: &Fault) -> bool {
        false
    }

    /// Custom extraction consulted by [`crate::as_into`].
    ///
    /// `slot` is the caller's `Option<Arc<T>>`. Return `true` only after
    /// filling it.
    fn extract_into(&self, _slot: &mut dyn Any) -> bool {
        false
    }
}

// =============================================================================
// BASE FAULT
// =============================================================================

#[derive(Default)]
pub(crate) struct BaseState {
    pub(crate) suggestions: Vec<String>,
    pub(crate) stack_trace: Vec<String>,
    pub(crate) context: BTreeMap<String, crate::context::Value>,
}

/// Leaf node of every fault graph.
pub struct BaseFault {
    descriptor: Descriptor,
    timestamp: Option<DateTime<Utc>>,
    cause: Option<Fault>,
    state: RwLock<BaseState>,
}

impl BaseFault {
    pub(crate) fn new(
        descriptor: Descriptor,
        timestamp: Option<DateTime<Utc>>,
        cause: Option<Fault>,
    ) -> Self {
        Self {
            descriptor,
            timestamp,
            cause,
            state: RwLock::new(BaseState::default()),
        }
    }

    /// The identity of this fault.
    #[must_use]
    pub fn descriptor(&self) -> &Descriptor {
        &self.descriptor
    }

    #[must_use]
    pub fn level(&self) -> Severity {
        self.descriptor.level()
    }

    #[must_use]
    pub fn timestamp(&self) -> Option<DateTime<Utc>> {
        self.timestamp
    }

    /// The upstream fault recorded at construction.
    #[must_use]
    pub fn cause(&self) -> Option<&Fault> {
        self.cause.as_ref()
    }

    /// `"[<level>] (<code>) <message>"`.
    #[must_use]
    pub fn error_message(&self) -> String {
        self.descriptor.error_message()
    }

    /// Snapshot of the suggestions, in insertion order.
    #[must_use]
    pub fn suggestions(&self) -> Vec<String> {
        self.read_state().suggestions.clone()
    }

    /// Snapshot of the stack frames, oldest first.
    #[must_use]
    pub fn stack_trace(&self) -> Vec<String> {
        self.read_state().stack_trace.clone()
    }

    /// Context keys in rendering order.
    #[must_use]
    pub fn context_keys(&self) -> Vec<String> {
        self.read_state().context.keys().cloned().collect()
    }

    /// This base's own contribution to a rendering.
    ///
    /// Order: timestamp, suggestions, context, stack trace, cause.
    #[must_use]
    pub fn info_lines(&self) -> Vec<String> {
        let mut lines = Vec::new();

        if let Some(timestamp) = self.timestamp {
            lines.push(format!("Occurred at: {}", timestamp));
        }

        let state = self.read_state();

        if !state.suggestions.is_empty() {
            lines.push("Suggestions:".to_string());
            lines.extend(state.suggestions.iter().map(|s| format!("- {}", s)));
        }

        if !state.context.is_empty() {
            lines.push("Context:".to_string());
            lines.extend(
                state
                    .context
                    .iter()
                    .map(|(key, value)| format!("- {}: {}", key, value)),
            );
        }

        if !state.stack_trace.is_empty() {
            lines.push("Stack trace:".to_string());
            let frames: Vec<&str> = state.stack_trace.iter().rev().map(String::as_str).collect();
            lines.push(format!("- {}", frames.join(" <- ")));
        }

        drop(state);

        if let Some(cause) = &self.cause {
            lines.push("Caused by:".to_string());
            lines.extend(
                render::render(Some(cause))
                    .into_iter()
                    .map(|line| format!("\t{}", line)),
            );
        }

        lines
    }

    pub(crate) fn read_state(&self) -> RwLockReadGuard<'_, BaseState> {
        self.state.read().unwrap_or_else(PoisonError::into_inner)
    }

    pub(crate) fn write_state(&self) -> RwLockWriteGuard<'_, BaseState> {
        self.state.write().unwrap_or_else(PoisonError::into_inner)
    }
}

// =============================================================================
// WRAPPING & JOIN FAULTS
// =============================================================================

/// A fault that embeds another fault and adds a domain payload.
pub struct WrappingFault {
    // Always `Some` outside of `Drop`.
    base: Option<Fault>,
    kind: Arc<dyn FaultKind>,
    opaque: bool,
}

impl WrappingFault {
    /// The embedded fault, unless this wrapper is opaque.
    #[must_use]
    pub fn base(&self) -> Option<&Fault> {
        self.base.as_ref().filter(|_| !self.opaque)
    }

    /// The domain payload.
    #[must_use]
    pub fn kind(&self) -> &dyn FaultKind {
        self.kind.as_ref()
    }

    #[must_use]
    pub fn is_opaque(&self) -> bool {
        self.opaque
    }
}

/// A fault aggregating several sibling faults.
pub struct JoinFault {
    base: Fault,
    members: Vec<Fault>,
}

impl JoinFault {
    pub(crate) fn new(base: Fault, members: Vec<Fault>) -> Self {
        Self { base, members }
    }

    /// The synthesized base carrying the derived level and timestamp.
    #[must_use]
    pub fn base(&self) -> &Fault {
        &self.base
    }

    /// The joined faults, in the order they were given.
    #[must_use]
    pub fn members(&self) -> &[Fault] {
        &self.members
    }
}

// =============================================================================
// FAULT HANDLE
// =============================================================================

/// The three fault variants.
pub enum FaultNode {
    Base(BaseFault),
    Wrapping(WrappingFault),
    Join(JoinFault),
}

impl FaultNode {
    /// Move every owned child handle into `out`.
    ///
    /// A join's synthesized base has no cause, so it is left in place.
    fn take_children(&mut self, out: &mut Vec<Fault>) {
        match self {
            FaultNode::Base(b) => out.extend(b.cause.take()),
            FaultNode::Wrapping(w) => out.extend(w.base.take()),
            FaultNode::Join(j) => out.append(&mut j.members),
        }
    }
}

impl Drop for FaultNode {
    fn drop(&mut self) {
        let mut pending = Vec::new();
        self.take_children(&mut pending);

        // Only the last handle to a node unlinks its children; shared
        // nodes stay alive for their other owners.
        while let Some(Fault(node)) = pending.pop() {
            if let Some(mut node) = Arc::into_inner(node) {
                node.take_children(&mut pending);
            }
        }
    }
}

/// Shareable handle to a fault. Clones share identity.
#[derive(Clone)]
pub struct Fault(Arc<FaultNode>);

impl Fault {
    pub(crate) fn from_base(base: BaseFault) -> Self {
        Self(Arc::new(FaultNode::Base(base)))
    }

    pub(crate) fn from_join(join: JoinFault) -> Self {
        Self(Arc::new(FaultNode::Join(join)))
    }

    /// Wrap `base` with a domain payload.
    #[must_use]
    pub fn wrap<K: FaultKind>(base: Fault, kind: K) -> Self {
        Self(Arc::new(FaultNode::Wrapping(WrappingFault {
            base: Some(base),
            kind: Arc::new(kind),
            opaque: false,
        })))
    }

    /// Wrap `base` but hide it from both the embedding tower and the
    /// search graph.
    #[must_use]
    pub fn wrap_opaque<K: FaultKind>(base: Fault, kind: K) -> Self {
        Self(Arc::new(FaultNode::Wrapping(WrappingFault {
            base: Some(base),
            kind: Arc::new(kind),
            opaque: true,
        })))
    }

    /// The variant behind this handle.
    #[must_use]
    pub fn node(&self) -> &FaultNode {
        &self.0
    }

    /// Whether both handles are the same fault instance.
    #[must_use]
    pub fn ptr_eq(&self, other: &Fault) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }

    /// Stable address of this fault instance, used for cycle guards.
    #[must_use]
    pub fn node_id(&self) -> usize {
        Arc::as_ptr(&self.0) as usize
    }

    /// Next fault down the embedding tower.
    #[must_use]
    pub fn embeds(&self) -> Option<Fault> {
        match self.node() {
            FaultNode::Base(_) => None,
            FaultNode::Wrapping(w) => w.base().cloned(),
            FaultNode::Join(j) => Some(j.base.clone()),
        }
    }

    /// Outgoing edges of the search graph.
    #[must_use]
    pub fn nested(&self) -> Vec<Fault> {
        match self.node() {
            FaultNode::Base(b) => b.cause.iter().cloned().collect(),
            FaultNode::Wrapping(w) => w.base().into_iter().cloned().collect(),
            FaultNode::Join(j) => j.members.clone(),
        }
    }

    /// This node's own rendering contribution, excluding its embedded
    /// fault and the top-level message.
    #[must_use]
    pub fn info_lines(&self) -> Vec<String> {
        match self.node() {
            FaultNode::Base(b) => b.info_lines(),
            FaultNode::Wrapping(w) => w.kind.info_lines(),
            FaultNode::Join(j) => j.members.iter().flat_map(Fault::info_lines).collect(),
        }
    }

    /// The base fault reached by following the embedding tower.
    #[must_use]
    pub fn base(&self) -> Option<&BaseFault> {
        let mut current = self;
        loop {
            match current.node() {
                FaultNode::Base(base) => return Some(base),
                FaultNode::Wrapping(w) => current = w.base()?,
                FaultNode::Join(j) => current = &j.base,
            }
        }
    }

    /// Like [`Fault::base`], but reports the misuse as a fault.
    pub fn try_base(&self) -> Result<&BaseFault, Fault> {
        self.base().ok_or_else(bad_construction)
    }

    #[must_use]
    pub fn descriptor(&self) -> Option<Descriptor> {
        self.base().map(|base| base.descriptor.clone())
    }

    /// Severity of the base, or `Unknown` when no base is reachable.
    #[must_use]
    pub fn level(&self) -> Severity {
        self.base().map_or(Severity::Unknown, BaseFault::level)
    }

    #[must_use]
    pub fn timestamp(&self) -> Option<DateTime<Utc>> {
        self.base().and_then(BaseFault::timestamp)
    }

    /// The base's `"[<level>] (<code>) <message>"`. Without a reachable
    /// base, the bad-construction message is returned instead.
    #[must_use]
    pub fn error_message(&self) -> String {
        match self.base() {
            Some(base) => base.error_message(),
            None => crate::descriptor::BAD_CONSTRUCTION.error_message(),
        }
    }

    /// Borrow this node's payload as `T`, if it is a wrapping fault of
    /// that kind. Does not search.
    #[must_use]
    pub fn kind<T: FaultKind>(&self) -> Option<&T> {
        match self.node() {
            FaultNode::Wrapping(w) => w.kind.as_ref().as_any().downcast_ref::<T>(),
            _ => None,
        }
    }

    /// Shared handle to this node's payload as `T`. Does not search.
    #[must_use]
    pub fn kind_arc<T: FaultKind>(&self) -> Option<Arc<T>> {
        match self.node() {
            FaultNode::Wrapping(w) => Arc::clone(&w.kind).into_any().downcast::<T>().ok(),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_join(&self) -> Option<&JoinFault> {
        match self.node() {
            FaultNode::Join(j) => Some(j),
            _ => None,
        }
    }

    /// Custom equality of this node's payload.
    pub(crate) fn custom_is(&self, target: &Fault) -> bool {
        match self.node() {
            FaultNode::Wrapping(w) => w.kind.is(target),
            _ => false,
        }
    }

    /// Custom extraction of this node's payload.
    pub(crate) fn custom_extract(&self, slot: &mut dyn Any) -> bool {
        match self.node() {
            FaultNode::Wrapping(w) => w.kind.extract_into(slot),
            _ => false,
        }
    }

    // -------------------------------------------------------------------------
    // Suggestions & stack frames
    // -------------------------------------------------------------------------

    /// Append suggestions to the base, dropping empty strings.
    pub fn add_suggestions<I, S>(&self, suggestions: I) -> Result<(), Fault>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let filtered: Vec<String> = suggestions
            .into_iter()
            .map(Into::into)
            .filter(|s| !s.is_empty())
            .collect();

        if filtered.is_empty() {
            return Ok(());
        }

        let base = self.try_base()?;
        base.write_state().suggestions.extend(filtered);
        Ok(())
    }

    /// Append a stack frame to the base. Frames are stored oldest first.
    pub fn push_frame(&self, frame: impl Into<String>) -> Result<(), Fault> {
        let base = self.try_base()?;
        base.write_state().stack_trace.push(frame.into());
        Ok(())
    }

    /// Builder form of [`Fault::add_suggestions`] for a single suggestion.
    ///
    /// When no base is reachable the bad-construction fault is returned in
    /// place of `self`.
    #[must_use]
    pub fn suggest(self, suggestion: impl Into<String>) -> Fault {
        match self.add_suggestions([suggestion.into()]) {
            Ok(()) => self,
            Err(misuse) => misuse,
        }
    }

    /// Builder form of [`Fault::push_frame`].
    ///
    /// When no base is reachable the bad-construction fault is returned in
    /// place of `self`.
    #[must_use]
    pub fn throw(self, frame: impl Into<String>) -> Fault {
        match self.push_frame(frame) {
            Ok(()) => self,
            Err(misuse) => misuse,
        }
    }
}

impl fmt::Display for Fault {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.error_message())
    }
}

impl fmt::Debug for Fault {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.node() {
            FaultNode::Base(b) => f
                .debug_struct("BaseFault")
                .field("descriptor", &b.descriptor)
                .field("timestamp", &b.timestamp)
                .field("cause", &b.cause)
                .finish_non_exhaustive(),
            FaultNode::Wrapping(w) => f
                .debug_struct("WrappingFault")
                .field("kind", &w.kind)
                .field("opaque", &w.opaque)
                .field("base", &w.base)
                .finish(),
            FaultNode::Join(j) => f
                .debug_struct("JoinFault")
                .field("base", &j.base)
                .field("members", &j.members)
                .finish(),
        }
    }
}

impl std::error::Error for Fault {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.base()
            .and_then(BaseFault::cause)
            .map(|cause| cause as &(dyn std::error::Error + 'static))
    }
}

// =============================================================================
// TESTS
// =============================================================================
