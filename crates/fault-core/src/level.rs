//! # Severity Levels
//!
//! Total order over fault severity. Declaration order is the comparison
//! order, so `Fatal` compares greatest and `max()` selects the most severe.
//!
//! `Unknown` sits strictly below every named level. It is a placeholder
//! for "not determined yet" and is never produced by a constructor.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Severity of a fault, from least to most severe.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default,
)]
#[serde(rename_all = "UPPERCASE")]
pub enum Severity {
    /// Not yet determined. Less severe than every named level.
    #[default]
    Unknown,
    /// Only meaningful while debugging; ignored in production.
    Debug,
    /// Informs the operator about something that is not critical.
    Notice,
    /// Not a problem yet, but may require attention.
    Warning,
    /// A recoverable error. The level used by `new`.
    Error,
    /// Panic-level severity.
    Fatal,
}

impl Severity {
    /// All named levels, most severe first.
    pub const NAMED: [Severity; 5] = [
        Severity::Fatal,
        Severity::Error,
        Severity::Warning,
        Severity::Notice,
        Severity::Debug,
    ];

    /// Upper-case label used in rendered messages.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Severity::Unknown => "UNKNOWN",
            Severity::Debug => "DEBUG",
            Severity::Notice => "NOTICE",
            Severity::Warning => "WARNING",
            Severity::Error => "ERROR",
            Severity::Fatal => "FATAL",
        }
    }

    /// Whether `self` is strictly more severe than `other`.
    #[must_use]
    pub fn is_more_severe_than(self, other: Severity) -> bool {
        self > other
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// =============================================================================
// TESTS
// =============================================================================
