//! # Fault Codes
//!
//! A code names the broad category a fault belongs to. Any displayable,
//! thread-safe value can serve as a code; applications usually declare
//! their own `enum` next to the faults that use it.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Capability required from a fault code.
///
/// Blanket-implemented for every `Display + Debug + Send + Sync + 'static`
/// type, so a plain `enum` with a `Display` impl is enough.
pub trait FaultCode: fmt::Display + fmt::Debug + Send + Sync + 'static {}

impl<T> FaultCode for T where T: fmt::Display + fmt::Debug + Send + Sync + 'static {}

/// The standard set of codes shipped with the library.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum StandardCode {
    /// The fault graph was built in a way that cannot be interpreted.
    Invalid,
    /// No code was specified.
    UnknownCode,
    /// Code of the base synthesized by `join`.
    FaultJoin,
    /// An argument had an unexpected value.
    BadParameter,
    /// An operation failed.
    OperationFailed,
}

impl StandardCode {
    /// Variant name, as rendered between parentheses.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            StandardCode::Invalid => "Invalid",
            StandardCode::UnknownCode => "UnknownCode",
            StandardCode::FaultJoin => "FaultJoin",
            StandardCode::BadParameter => "BadParameter",
            StandardCode::OperationFailed => "OperationFailed",
        }
    }
}

impl fmt::Display for StandardCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
