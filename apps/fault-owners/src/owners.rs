//! # Owners Directory
//!
//! Maps owner names to their pet. Loaded from a TOML file:
//!
//! ```toml
//! [owners]
//! Alice = "cat"
//! Bob = "dog"
//! ```
//!
//! A miss produces a [`KeyNotFound`] fault bound to the shared
//! [`KEY_NOT_FOUND`] descriptor, so callers can test for it with
//! `fault_core::is`.

use crate::AppError;
use fault_core::{Descriptor, Fault, FaultKind, Severity, StandardCode};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;
use std::sync::LazyLock;

/// Name of the set reported in lookup faults.
pub const SET_NAME: &str = "Owners";

/// Maximum owners file size (1 MB).
const MAX_OWNERS_FILE_SIZE: u64 = 1024 * 1024;

/// Identity of every lookup miss.
pub static KEY_NOT_FOUND: LazyLock<Descriptor> = LazyLock::new(|| {
    Descriptor::new(
        Severity::Error,
        StandardCode::OperationFailed,
        "the specified key was not found",
    )
});

// =============================================================================
// LOOKUP FAULT
// =============================================================================

/// Payload of a lookup miss.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyNotFound {
    pub key: String,
    pub set_name: String,
}

impl FaultKind for KeyNotFound {
    fn info_lines(&self) -> Vec<String> {
        vec![
            format!("- Key: {:?}", self.key),
            format!("- Set name: {:?}", self.set_name),
        ]
    }
}

/// Build the fault reported when `key` is missing from `set_name`.
///
/// `known` lists the keys that do exist; they are offered as a suggestion.
pub fn key_not_found(key: &str, set_name: &str, known: &[&str]) -> Fault {
    let fault = Fault::wrap(
        KEY_NOT_FOUND.init(),
        KeyNotFound {
            key: key.to_string(),
            set_name: set_name.to_string(),
        },
    );

    let suggestion = if known.is_empty() {
        format!("The {} set is empty", set_name)
    } else {
        format!("Known owners are: {}", known.join(", "))
    };

    match fault
        .add_suggestions([suggestion])
        .and_then(|()| fault.add_key("key", key.to_string()))
    {
        Ok(()) => fault,
        Err(misuse) => misuse,
    }
}

// =============================================================================
// DIRECTORY
// =============================================================================

/// On-disk layout of an owners file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OwnersFile {
    #[serde(default)]
    pub owners: BTreeMap<String, String>,
}

/// Owner name to pet lookup table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OwnerDirectory {
    owners: BTreeMap<String, String>,
}

impl Default for OwnerDirectory {
    fn default() -> Self {
        Self::builtin()
    }
}

impl OwnerDirectory {
    /// The built-in directory: Alice owns a cat, Bob owns a dog.
    #[must_use]
    pub fn builtin() -> Self {
        let mut owners = BTreeMap::new();
        owners.insert("Alice".to_string(), "cat".to_string());
        owners.insert("Bob".to_string(), "dog".to_string());
        Self { owners }
    }

    /// Parse an owners file from TOML text.
    pub fn from_toml_str(text: &str) -> Result<Self, AppError> {
        let file: OwnersFile = toml::from_str(text)
            .map_err(|e| AppError::Config(format!("Invalid owners file: {}", e)))?;

        if let Some(name) = file.owners.keys().find(|name| name.trim().is_empty()) {
            return Err(AppError::Config(format!(
                "Owner name {:?} must not be blank",
                name
            )));
        }

        Ok(Self { owners: file.owners })
    }

    /// Load an owners file from disk.
    pub fn load(path: &Path) -> Result<Self, AppError> {
        let metadata = std::fs::metadata(path).map_err(|e| {
            AppError::Config(format!("Cannot read owners file '{}': {}", path.display(), e))
        })?;

        if metadata.len() > MAX_OWNERS_FILE_SIZE {
            return Err(AppError::Config(format!(
                "Owners file size {} bytes exceeds maximum allowed {} bytes",
                metadata.len(),
                MAX_OWNERS_FILE_SIZE
            )));
        }

        let text = std::fs::read_to_string(path)?;
        Self::from_toml_str(&text)
    }

    /// Look up the pet of `name`.
    pub fn pet_of(&self, name: &str) -> Result<&str, Fault> {
        self.owners
            .get(name)
            .map(String::as_str)
            .ok_or_else(|| key_not_found(name, SET_NAME, &self.names()))
    }

    /// Owner names in sorted order.
    #[must_use]
    pub fn names(&self) -> Vec<&str> {
        self.owners.keys().map(String::as_str).collect()
    }

    /// `(owner, pet)` pairs in sorted order.
    pub fn entries(&self) -> impl Iterator<Item = (&str, &str)> {
        self.owners.iter().map(|(o, p)| (o.as_str(), p.as_str()))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.owners.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.owners.is_empty()
    }
}

// =============================================================================
// TESTS
// =============================================================================
