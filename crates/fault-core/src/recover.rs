//! Panic capture.
//!
//! [`try_run`] turns a panic into a fault so that callers can render it like
//! any other failure. A panic raised with a [`Fault`] payload (through
//! [`std::panic::resume_unwind`]) comes back unchanged.

use crate::code::StandardCode;
use crate::fault::{Fault, FaultKind};
use crate::level::Severity;
use std::any::Any;
use std::panic::{self, UnwindSafe};

const NON_STRING_PAYLOAD: &str = "<non-string panic payload>";

/// Payload of a fault produced from a captured panic.
#[derive(Debug, Clone)]
pub struct PanicFault {
    pub value: String,
}

impl FaultKind for PanicFault {
    fn info_lines(&self) -> Vec<String> {
        vec![format!("- Value: {}", self.value)]
    }
}

/// A fatal fault describing a panic with the given value.
#[must_use]
pub fn new_panic(value: impl Into<String>) -> Fault {
    let base = crate::common::with_level(
        Severity::Fatal,
        StandardCode::UnknownCode,
        "a panic occurred",
    );
    Fault::wrap(
        base,
        PanicFault {
            value: value.into(),
        },
    )
}

/// Run `f`, capturing a panic as a fault.
///
/// Returns `None` when `f` completes normally.
pub fn try_run<F>(f: F) -> Option<Fault>
where
    F: FnOnce() + UnwindSafe,
{
    panic::catch_unwind(f).err().map(from_payload)
}

fn from_payload(payload: Box<dyn Any + Send>) -> Fault {
    let payload = match payload.downcast::<Fault>() {
        Ok(fault) => return *fault,
        Err(other) => other,
    };

    if let Some(err) = payload.downcast_ref::<Box<dyn std::error::Error + Send + Sync>>() {
        return new_panic(err.to_string());
    }
    if let Some(s) = payload.downcast_ref::<&'static str>() {
        return new_panic(*s);
    }
    if let Some(s) = payload.downcast_ref::<String>() {
        return new_panic(s.clone());
    }

    new_panic(NON_STRING_PAYLOAD)
}
