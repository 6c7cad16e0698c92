//! Machine-readable fault reports for `--json-mode`.

use fault_core::{BAD_CONSTRUCTION, Fault, Severity, render};
use serde::{Deserialize, Serialize};

/// JSON view of a fault.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FaultReport {
    pub level: Severity,
    pub code: String,
    pub message: String,
    /// RFC 3339 timestamp, absent when the fault carries none.
    pub timestamp: Option<String>,
    /// The full text rendering.
    pub lines: Vec<String>,
}

impl FaultReport {
    #[must_use]
    pub fn from_fault(fault: &Fault) -> Self {
        let descriptor = fault.descriptor().unwrap_or_else(|| BAD_CONSTRUCTION.clone());

        Self {
            level: descriptor.level(),
            code: descriptor.code().to_string(),
            message: descriptor.message().to_string(),
            timestamp: fault.timestamp().map(|ts| ts.to_rfc3339()),
            lines: render(Some(fault)),
        }
    }
}
