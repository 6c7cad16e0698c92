//! # Join
//!
//! Aggregates sibling faults into one. The joined fault synthesizes its own
//! base: the most severe member level, the earliest member timestamp, the
//! message `"joined <N> faults"` and the [`StandardCode::FaultJoin`] code.
//!
//! Members keep their given order. Rendering concatenates member lines in
//! that order while searches visit members last-first (see
//! [`crate::traverse`]).

use crate::code::StandardCode;
use crate::descriptor::Descriptor;
use crate::fault::{Fault, JoinFault};
use crate::filters::{highest_level, oldest, reject_absent};
use crate::level::Severity;

/// Join `faults`, ignoring absent entries.
///
/// Returns `None` when nothing remains after filtering.
pub fn join<I, T>(faults: I) -> Option<Fault>
where
    I: IntoIterator<Item = T>,
    T: Into<Option<Fault>>,
{
    let members = reject_absent(faults);
    if members.is_empty() {
        return None;
    }

    let level = highest_level(&members).unwrap_or(Severity::Unknown);
    let timestamp = oldest(&members).and_then(Fault::timestamp);

    let base = Descriptor::new(
        level,
        StandardCode::FaultJoin,
        format!("joined {} faults", members.len()),
    )
    .init_at(timestamp);

    Some(Fault::from_join(JoinFault::new(base, members)))
}

// =============================================================================
// TESTS
// =============================================================================
