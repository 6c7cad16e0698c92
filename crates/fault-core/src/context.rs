//! # Context Store
//!
//! A key/value side-channel attached to a base fault for diagnostic data.
//! Keys render in sorted order.
//!
//! `add_key` inserts or overwrites; `set_value` and `edit_value` only ever
//! update an existing key and fail with a "no such key" fault otherwise.
//! Handing back a [`Value`] obtained from `get_value` stores it as-is, so
//! the key keeps resolving to its original type.
//!
//! The free functions accept `Option<&Fault>` and answer absence with a
//! nil-parameter fault. The inherent methods on [`Fault`] do the work.
//! Either way, a fault whose embedding chain never reaches a base yields
//! the bad-construction fault.

use crate::common::{nil_parameter, no_such_key};
use crate::fault::{AsAny, Fault};
use std::any::Any;
use std::fmt;
use std::sync::Arc;

/// A value that can be stored in a fault's context.
///
/// Blanket-implemented for every `Display + Debug + Send + Sync + 'static`
/// type. Values are rendered with `Display`.
pub trait ContextValue: AsAny + fmt::Display + fmt::Debug {
    /// Name of the concrete type, for mismatch diagnostics.
    fn type_name(&self) -> &'static str;
}

impl<T> ContextValue for T
where
    T: fmt::Display + fmt::Debug + Send + Sync + 'static,
{
    fn type_name(&self) -> &'static str {
        std::any::type_name::<T>()
    }
}

/// Shared handle to a stored context value.
pub type Value = Arc<dyn ContextValue>;

/// Box `value` for storage. A `Value` is itself a `ContextValue`, so an
/// existing handle is reused instead of being wrapped again.
fn into_value<V: ContextValue>(value: V) -> Value {
    match (&value as &dyn Any).downcast_ref::<Value>() {
        Some(shared) => Arc::clone(shared),
        None => Arc::new(value),
    }
}

// =============================================================================
// INHERENT OPERATIONS
// =============================================================================

impl Fault {
    /// Insert or overwrite `key`. An empty key is a successful no-op.
    pub fn add_key<V: ContextValue>(&self, key: &str, value: V) -> Result<(), Fault> {
        if key.is_empty() {
            return Ok(());
        }

        let base = self.try_base()?;
        base.write_state()
            .context
            .insert(key.to_string(), into_value(value));
        Ok(())
    }

    /// Read the value stored under `key`.
    pub fn get_value(&self, key: &str) -> Result<Value, Fault> {
        let base = self.try_base()?;
        let state = base.read_state();
        state.context.get(key).cloned().ok_or_else(|| no_such_key(key, &[]))
    }

    /// Read the value stored under `key` as a `T`.
    ///
    /// A value of another type is reported as a missing key, with two
    /// suggestions naming the expected and the found type.
    pub fn typed_value<T>(&self, key: &str) -> Result<T, Fault>
    where
        T: Clone + 'static,
    {
        let value = self.get_value(key)?;

        if let Some(typed) = value.as_ref().as_any().downcast_ref::<T>() {
            return Ok(typed.clone());
        }

        let err = no_such_key(key, &[]);
        err.add_suggestions([
            format!(
                "key with type {} does not exist, but one of type {} was found",
                std::any::type_name::<T>(),
                value.as_ref().type_name()
            ),
            "You may have forgotten to cast the value to the correct type or the desired key does not exist"
                .to_string(),
        ])?;
        Err(err)
    }

    /// Replace the value of an existing key. Never creates `key`.
    pub fn set_value<V: ContextValue>(&self, key: &str, value: V) -> Result<(), Fault> {
        self.replace_value(key, into_value(value))
    }

    /// Replace the value of an existing key with `f(current)`.
    ///
    /// `f` may return `current` itself, or any new value.
    pub fn edit_value<V, F>(&self, key: &str, f: F) -> Result<(), Fault>
    where
        V: ContextValue,
        F: FnOnce(Value) -> V,
    {
        let current = self.get_value(key)?;
        self.set_value(key, f(current))
    }

    /// Remove `key` if present.
    pub fn delete_key(&self, key: &str) -> Result<(), Fault> {
        let base = self.try_base()?;
        base.write_state().context.remove(key);
        Ok(())
    }

    fn replace_value(&self, key: &str, value: Value) -> Result<(), Fault> {
        let base = self.try_base()?;
        let mut state = base.write_state();

        match state.context.get_mut(key) {
            Some(slot) => {
                *slot = value;
                Ok(())
            }
            None => Err(no_such_key(key, &[])),
        }
    }
}

// =============================================================================
// FREE FUNCTIONS (absence-aware)
// =============================================================================

fn require(fault: Option<&Fault>) -> Result<&Fault, Fault> {
    fault.ok_or_else(|| nil_parameter("fault", &[]))
}

/// See [`Fault::add_key`]. An empty key succeeds even without a fault.
pub fn add_key<V: ContextValue>(fault: Option<&Fault>, key: &str, value: V) -> Result<(), Fault> {
    if key.is_empty() {
        return Ok(());
    }
    require(fault)?.add_key(key, value)
}

/// See [`Fault::get_value`].
pub fn get_value(fault: Option<&Fault>, key: &str) -> Result<Value, Fault> {
    require(fault)?.get_value(key)
}

/// See [`Fault::typed_value`].
pub fn typed_value<T: Clone + 'static>(fault: Option<&Fault>, key: &str) -> Result<T, Fault> {
    require(fault)?.typed_value(key)
}

/// See [`Fault::set_value`].
pub fn set_value<V: ContextValue>(fault: Option<&Fault>, key: &str, value: V) -> Result<(), Fault> {
    require(fault)?.set_value(key, value)
}

/// See [`Fault::edit_value`].
pub fn edit_value<V, F>(fault: Option<&Fault>, key: &str, f: F) -> Result<(), Fault>
where
    V: ContextValue,
    F: FnOnce(Value) -> V,
{
    require(fault)?.edit_value(key, f)
}

/// See [`Fault::delete_key`]. Absence is a no-op; only a broken embedding
/// chain is reported.
pub fn delete_key(fault: Option<&Fault>, key: &str) -> Result<(), Fault> {
    match fault {
        Some(fault) => fault.delete_key(key),
        None => Ok(()),
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::code::StandardCode;
    use crate::descriptor::{BAD_CONSTRUCTION, Descriptor};
    use crate::fault::FaultKind;
    use crate::level::Severity;
    use crate::traverse::is;

    #[derive(Debug)]
    struct Veil;

    impl FaultKind for Veil {
        fn info_lines(&self) -> Vec<String> {
            Vec::new()
        }
    }

    fn fault() -> Fault {
        Descriptor::new(Severity::Error, StandardCode::OperationFailed, "ctx").init()
    }

    #[test]
    fn add_then_get() {
        let f = fault();
        add_key(Some(&f), "key", "Mark").expect("add");

        let value = get_value(Some(&f), "key").expect("get");
        assert_eq!(value.to_string(), "Mark");
    }

    #[test]
    fn empty_key_is_noop_success() {
        let f = fault();
        add_key(Some(&f), "", 1).expect("noop");
        add_key(None, "", 1).expect("noop without fault");

        assert!(f.base().expect("base").context_keys().is_empty());
    }

    #[test]
    fn add_overwrites() {
        let f = fault();
        f.add_key("n", 1_i32).expect("add");
        f.add_key("n", 2_i32).expect("add");

        assert_eq!(f.typed_value::<i32>("n").expect("typed"), 2);
    }

    #[test]
    fn get_missing_key_is_no_such_key() {
        let f = fault();
        let err = get_value(Some(&f), "absent").expect_err("missing");

        assert_eq!(
            err.to_string(),
            "[ERROR] (OperationFailed) the specified key (\"absent\") does not exist"
        );
    }

    #[test]
    fn absent_fault_yields_nil_parameter() {
        let err = get_value(None, "k").expect_err("absent");
        assert_eq!(
            err.to_string(),
            "[ERROR] (BadParameter) parameter (\"fault\") must be non-nil"
        );

        assert!(set_value(None, "k", 1).is_err());
        assert!(add_key(None, "k", 1).is_err());
        assert!(delete_key(None, "k").is_ok());
    }

    #[test]
    fn typed_value_mismatch_suggests() {
        let f = fault();
        f.add_key("count", 7_u8).expect("add");

        let err = typed_value::<String>(Some(&f), "count").expect_err("mismatch");
        let suggestions = err.base().expect("base").suggestions();

        assert_eq!(suggestions.len(), 2);
        assert!(suggestions[0].contains("alloc::string::String"));
        assert!(suggestions[0].contains("u8"));
    }

    #[test]
    fn set_never_creates() {
        let f = fault();
        let err = set_value(Some(&f), "fresh", "x").expect_err("no such key");

        assert!(err.to_string().contains("\"fresh\""));
        assert!(f.base().expect("base").context_keys().is_empty());
    }

    #[test]
    fn add_then_set_succeeds() {
        let f = fault();
        add_key(Some(&f), "k", "old").expect("add");
        set_value(Some(&f), "k", "new").expect("set");

        assert_eq!(f.typed_value::<&str>("k").expect("typed"), "new");
    }

    #[test]
    fn edit_applies_function() {
        let f = fault();
        f.add_key("hits", 1_u32).expect("add");

        edit_value(Some(&f), "hits", |v| {
            v.as_ref().as_any().downcast_ref::<u32>().copied().unwrap_or(0) + 1
        })
        .expect("edit");

        assert_eq!(f.typed_value::<u32>("hits").expect("typed"), 2);
        assert!(edit_value(Some(&f), "misses", |_| 0_u32).is_err());
    }

    #[test]
    fn identity_edit_keeps_type() {
        let f = fault();
        add_key(Some(&f), "n", 5_u32).expect("add");

        edit_value(Some(&f), "n", |v| v).expect("edit");
        assert_eq!(typed_value::<u32>(Some(&f), "n").expect("typed"), 5);

        let current = get_value(Some(&f), "n").expect("get");
        set_value(Some(&f), "n", Arc::clone(&current)).expect("set");
        add_key(Some(&f), "copy", current).expect("add");

        assert_eq!(f.typed_value::<u32>("n").expect("typed"), 5);
        assert_eq!(f.typed_value::<u32>("copy").expect("typed"), 5);
    }

    #[test]
    fn delete_removes_and_tolerates_missing() {
        let f = fault();
        f.add_key("gone", true).expect("add");

        delete_key(Some(&f), "gone").expect("delete");
        delete_key(Some(&f), "gone").expect("delete again");
        assert!(f.get_value("gone").is_err());
    }

    #[test]
    fn context_reaches_through_wrappers() {
        let inner = fault();
        let outer = Fault::wrap(inner.clone(), Veil);

        outer.add_key("via", "wrapper").expect("add");
        assert_eq!(inner.typed_value::<&str>("via").expect("typed"), "wrapper");
    }

    #[test]
    fn opaque_chain_is_bad_construction() {
        let broken = Fault::wrap_opaque(fault(), Veil);

        for err in [
            broken.add_key("k", 1).expect_err("add"),
            broken.get_value("k").expect_err("get"),
            broken.set_value("k", 1).expect_err("set"),
            broken.delete_key("k").expect_err("delete"),
        ] {
            assert!(is(Some(&err), Some(&BAD_CONSTRUCTION.init())));
            assert_eq!(err.level(), Severity::Fatal);
        }
    }
}
