//! # Descriptors
//!
//! A descriptor is the immutable `(level, code, message)` identity of a
//! base fault. Descriptors compare by allocation: two descriptors built
//! from identical fields are different identities, while every fault
//! initialised from the same descriptor shares one identity. Sentinel
//! faults rely on this.

use crate::code::{FaultCode, StandardCode};
use crate::fault::{BaseFault, Fault};
use crate::level::Severity;
use chrono::{DateTime, Utc};
use std::fmt;
use std::sync::{Arc, LazyLock};

struct DescriptorData {
    level: Severity,
    code: Box<dyn FaultCode>,
    message: String,
}

/// Shared, read-only identity of a base fault.
///
/// Cloning a `Descriptor` clones the handle, not the identity.
#[derive(Clone)]
pub struct Descriptor(Arc<DescriptorData>);

impl Descriptor {
    /// Create a new descriptor. Each call yields a distinct identity.
    #[must_use]
    pub fn new(level: Severity, code: impl FaultCode, message: impl Into<String>) -> Self {
        Self(Arc::new(DescriptorData {
            level,
            code: Box::new(code),
            message: message.into(),
        }))
    }

    /// Severity carried by every fault of this descriptor.
    #[must_use]
    pub fn level(&self) -> Severity {
        self.0.level
    }

    /// The code of this descriptor.
    #[must_use]
    pub fn code(&self) -> &dyn FaultCode {
        self.0.code.as_ref()
    }

    /// The human message, without level or code.
    #[must_use]
    pub fn message(&self) -> &str {
        &self.0.message
    }

    /// `"[<level>] (<code>) <message>"`.
    ///
    /// This is the only place the level/code/message format is produced.
    #[must_use]
    pub fn error_message(&self) -> String {
        format!("[{}] ({}) {}", self.0.level, self.0.code, self.0.message)
    }

    /// Whether both handles point at the same descriptor.
    #[must_use]
    pub fn same(&self, other: &Descriptor) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }

    /// Create a base fault bound to this descriptor, stamped with the
    /// current time.
    #[must_use]
    pub fn init(&self) -> Fault {
        self.init_at(Some(Utc::now()))
    }

    /// Like [`Descriptor::init`] but with an explicit timestamp.
    ///
    /// `None` produces a fault whose timestamp line is omitted.
    #[must_use]
    pub fn init_at(&self, timestamp: Option<DateTime<Utc>>) -> Fault {
        Fault::from_base(BaseFault::new(self.clone(), timestamp, None))
    }

    /// Like [`Descriptor::init`] but recording `cause` as the upstream fault.
    #[must_use]
    pub fn init_caused_by(&self, cause: Fault) -> Fault {
        Fault::from_base(BaseFault::new(self.clone(), Some(Utc::now()), Some(cause)))
    }
}

impl PartialEq for Descriptor {
    fn eq(&self, other: &Self) -> bool {
        self.same(other)
    }
}

impl Eq for Descriptor {}

impl fmt::Debug for Descriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Descriptor")
            .field("level", &self.0.level)
            .field("code", &self.0.code)
            .field("message", &self.0.message)
            .finish()
    }
}

impl fmt::Display for Descriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.error_message())
    }
}

/// Initialise an optional descriptor. Absence stays absence.
#[must_use]
pub fn init(descriptor: Option<&Descriptor>) -> Option<Fault> {
    descriptor.map(Descriptor::init)
}

// =============================================================================
// PROCESS-WIDE SENTINELS
// =============================================================================

/// A fault whose embedding chain never reaches a base fault.
///
/// Always obtained through [`bad_construction`]; test for it with
/// `is(fault, &bad_construction())`.
pub static BAD_CONSTRUCTION: LazyLock<Descriptor> = LazyLock::new(|| {
    Descriptor::new(
        Severity::Fatal,
        StandardCode::Invalid,
        "fault does not embed a base fault",
    )
});

/// A sink accepted fewer bytes than it was offered.
pub static SHORT_WRITE: LazyLock<Descriptor> = LazyLock::new(|| {
    Descriptor::new(
        Severity::Error,
        StandardCode::OperationFailed,
        "short write",
    )
});

/// A fresh fault of the [`BAD_CONSTRUCTION`] descriptor.
///
/// Each call allocates a new base so that context added by one caller is
/// never visible to another; identity is carried by the descriptor.
#[must_use]
pub fn bad_construction() -> Fault {
    BAD_CONSTRUCTION.init()
}

// =============================================================================
// TESTS
// =============================================================================
