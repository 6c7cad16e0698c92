//! Absence-aware accessors and mutation helpers.
//!
//! These mirror the inherent [`Fault`] methods for callers that hold an
//! `Option<&Fault>`.

use crate::common::nil_parameter;
use crate::descriptor::Descriptor;
use crate::fault::{Fault, FaultKind};
use crate::level::Severity;
use crate::tower::embedding_tower;
use chrono::{DateTime, Utc};
use std::sync::Arc;

// =============================================================================
// ACCESSORS
// =============================================================================

#[must_use]
pub fn descriptor_of(fault: Option<&Fault>) -> Option<Descriptor> {
    fault.and_then(Fault::descriptor)
}

/// The base's error message, or an empty string for absence.
#[must_use]
pub fn error_of(fault: Option<&Fault>) -> String {
    fault.map(Fault::error_message).unwrap_or_default()
}

#[must_use]
pub fn level_of(fault: Option<&Fault>) -> Severity {
    fault.map_or(Severity::Unknown, Fault::level)
}

#[must_use]
pub fn timestamp_of(fault: Option<&Fault>) -> Option<DateTime<Utc>> {
    fault.and_then(Fault::timestamp)
}

/// The outermost payload of type `T` along the embedding chain.
///
/// Unlike [`crate::as_kind`] this never leaves the chain: join members and
/// causes are not searched.
#[must_use]
pub fn access<T: FaultKind>(fault: Option<&Fault>) -> Option<Arc<T>> {
    let fault = fault?;
    embedding_tower(fault)
        .iter()
        .rev()
        .find_map(Fault::kind_arc::<T>)
}

/// The first search-graph child of `fault`.
#[must_use]
pub fn unwrap_fault(fault: Option<&Fault>) -> Option<Fault> {
    fault?.nested().into_iter().next()
}

// =============================================================================
// MUTATION
// =============================================================================

/// Append suggestions, dropping empty strings.
///
/// With no non-empty suggestion this succeeds even for an absent fault.
pub fn add_suggestions<I, S>(fault: Option<&Fault>, suggestions: I) -> Result<(), Fault>
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

    match fault {
        Some(fault) => fault.add_suggestions(filtered),
        None => Err(nil_parameter("fault", &[])),
    }
}

/// Record `frame` on the fault's stack trace. Absent in, absent out.
#[must_use]
pub fn throw(fault: Option<Fault>, frame: impl Into<String>) -> Option<Fault> {
    fault.map(|f| f.throw(frame))
}

// =============================================================================
// TESTS
// =============================================================================
