//! List filters over faults.
//!
//! Inputs may contain absent entries; every helper except
//! [`reject_absent`] works on already-present faults.

use crate::fault::Fault;
use crate::level::Severity;

/// Drop absent entries, keeping the order of the rest.
pub fn reject_absent<I, T>(faults: I) -> Vec<Fault>
where
    I: IntoIterator<Item = T>,
    T: Into<Option<Fault>>,
{
    faults.into_iter().filter_map(Into::into).collect()
}

/// Keep the faults matching `predicate`.
pub fn retain<P>(faults: &[Fault], mut predicate: P) -> Vec<Fault>
where
    P: FnMut(&Fault) -> bool,
{
    faults.iter().filter(|f| predicate(f)).cloned().collect()
}

/// Drop the faults matching `predicate`.
pub fn reject<P>(faults: &[Fault], mut predicate: P) -> Vec<Fault>
where
    P: FnMut(&Fault) -> bool,
{
    retain(faults, |f| !predicate(f))
}

/// The most severe level in `faults`, or `None` for an empty list.
#[must_use]
pub fn highest_level(faults: &[Fault]) -> Option<Severity> {
    faults.iter().map(Fault::level).max()
}

/// The fault with the earliest timestamp.
///
/// Ties keep the first fault. Faults without a timestamp are considered
/// only when no fault carries one.
#[must_use]
pub fn oldest(faults: &[Fault]) -> Option<&Fault> {
    let mut best: Option<&Fault> = None;

    for fault in faults {
        best = match best {
            None => Some(fault),
            Some(current) => match (current.timestamp(), fault.timestamp()) {
                (None, Some(_)) => Some(fault),
                (Some(held), Some(seen)) if seen < held => Some(fault),
                _ => Some(current),
            },
        };
    }

    best
}
