//! Constructors and ready-made faults.
//!
//! Every common fault gets a fresh descriptor, is stamped with the current
//! time and accepts a list of [`FaultOption`]s that annotate its context.

use crate::code::{FaultCode, StandardCode};
use crate::descriptor::Descriptor;
use crate::fault::{Fault, FaultKind};
use crate::level::Severity;

// =============================================================================
// OPTIONS
// =============================================================================

/// Location annotation added to a common fault's context.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FaultOption {
    /// Stored under `at`.
    At(String),
    /// Stored under `before`.
    Before(String),
    /// Stored under `after`.
    After(String),
}

impl FaultOption {
    pub fn at(location: impl Into<String>) -> Self {
        Self::At(location.into())
    }

    pub fn before(location: impl Into<String>) -> Self {
        Self::Before(location.into())
    }

    pub fn after(location: impl Into<String>) -> Self {
        Self::After(location.into())
    }

    fn key(&self) -> &'static str {
        match self {
            Self::At(_) => "at",
            Self::Before(_) => "before",
            Self::After(_) => "after",
        }
    }

    fn value(&self) -> &str {
        match self {
            Self::At(v) | Self::Before(v) | Self::After(v) => v,
        }
    }
}

fn apply(fault: Fault, options: &[FaultOption]) -> Fault {
    for option in options {
        if let Err(misuse) = fault.add_key(option.key(), option.value().to_string()) {
            return misuse;
        }
    }
    fault
}

// =============================================================================
// CONSTRUCTORS
// =============================================================================

/// A base fault at level `Error`.
#[must_use]
pub fn new(code: impl FaultCode, message: impl Into<String>) -> Fault {
    with_level(Severity::Error, code, message)
}

/// A base fault at an explicit level.
#[must_use]
pub fn with_level(level: Severity, code: impl FaultCode, message: impl Into<String>) -> Fault {
    Descriptor::new(level, code, message).init()
}

/// A base fault without a meaningful code.
#[must_use]
pub fn from_string(message: impl Into<String>) -> Fault {
    new(StandardCode::UnknownCode, message)
}

/// Payload of a fault built from a foreign error.
#[derive(Debug, Clone)]
pub struct ErrorFault {
    pub error: String,
}

impl FaultKind for ErrorFault {
    fn info_lines(&self) -> Vec<String> {
        vec![format!("- Error: {}", self.error)]
    }
}

/// Wrap a foreign error in a fault.
#[must_use]
pub fn from_error<E>(err: &E) -> Fault
where
    E: std::error::Error + ?Sized,
{
    Fault::wrap(
        from_string("something went wrong"),
        ErrorFault {
            error: err.to_string(),
        },
    )
}

// =============================================================================
// COMMON FAULTS
// =============================================================================

/// A method was called on an uninitialised receiver.
#[must_use]
pub fn nil_receiver(options: &[FaultOption]) -> Fault {
    let fault = new(StandardCode::OperationFailed, "receiver must be non-nil")
        .suggest("Did you forget to initialize the receiver?");
    apply(fault, options)
}

#[must_use]
pub fn bad_parameter(message: impl Into<String>, options: &[FaultOption]) -> Fault {
    apply(new(StandardCode::BadParameter, message), options)
}

/// A required parameter was absent.
#[must_use]
pub fn nil_parameter(name: &str, options: &[FaultOption]) -> Fault {
    let message = format!("parameter ({:?}) must be non-nil", name);
    apply(new(StandardCode::BadParameter, message), options)
}

/// An operation was used wrongly; `usage` becomes a suggestion.
#[must_use]
pub fn invalid_usage(
    message: impl Into<String>,
    usage: impl Into<String>,
    options: &[FaultOption],
) -> Fault {
    let fault = new(StandardCode::OperationFailed, message).suggest(usage);
    apply(fault, options)
}

#[must_use]
pub fn no_such_key(key: &str, options: &[FaultOption]) -> Fault {
    let message = format!("the specified key ({:?}) does not exist", key);
    apply(new(StandardCode::OperationFailed, message), options)
}

// =============================================================================
// TESTS
// =============================================================================
