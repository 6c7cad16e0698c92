//! # fault-core
//!
//! Composable faults - THE LOGIC.
//!
//! A fault is a severity-tagged, coded, timestamped error value that can be
//! wrapped with domain payloads, joined with sibling faults, searched by
//! identity or payload type, annotated with context and rendered into
//! human-readable lines.
//!
//! ## Architectural Constraints
//!
//! - Pure library: no logging, no async, no I/O beyond the
//!   [`render::write_fault`] boundary.
//! - Never panics: misuse is reported as a fault value (see
//!   [`descriptor::bad_construction`]).
//! - Deterministic: context renders in key order and searches visit nodes in
//!   a fixed order.

// =============================================================================
// MODULES
// =============================================================================

pub mod code;
pub mod common;
pub mod context;
pub mod descriptor;
pub mod fault;
pub mod filters;
pub mod join;
pub mod level;
pub mod ops;
pub mod recover;
pub mod render;
pub mod tower;
pub mod traverse;

// =============================================================================
// RE-EXPORTS: Core Types
// =============================================================================

pub use code::{FaultCode, StandardCode};
pub use descriptor::{BAD_CONSTRUCTION, Descriptor, SHORT_WRITE, bad_construction};
pub use fault::{AsAny, BaseFault, Fault, FaultKind, FaultNode, JoinFault, WrappingFault};
pub use level::Severity;

// =============================================================================
// RE-EXPORTS: Composition & Search
// =============================================================================

pub use join::join;
pub use tower::{Embed, embedding_tower};
pub use traverse::{Nested, as_into, as_kind, as_node, is, traverse};

// =============================================================================
// RE-EXPORTS: Context, Accessors & Rendering
// =============================================================================

pub use common::{ErrorFault, FaultOption};
pub use context::{
    ContextValue, Value, add_key, delete_key, edit_value, get_value, set_value, typed_value,
};
pub use ops::{
    access, add_suggestions, descriptor_of, error_of, level_of, throw, timestamp_of, unwrap_fault,
};
pub use recover::{PanicFault, new_panic, try_run};
pub use render::{WriteError, info_lines_of, render, write_fault};
