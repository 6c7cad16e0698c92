//! # CLI Command Implementations

use crate::AppError;
use crate::owners::{KEY_NOT_FOUND, KeyNotFound, OwnerDirectory};
use crate::report::FaultReport;
use fault_core::{
    Descriptor, Fault, Severity, StandardCode, as_kind, common, is, join, try_run, write_fault,
};
use std::io::Write;
use std::panic;

// =============================================================================
// OUTPUT
// =============================================================================

/// Print `fault` as a rendering or, in JSON mode, as a [`FaultReport`].
pub fn emit_fault<W: Write>(out: &mut W, json_mode: bool, fault: &Fault) -> Result<(), AppError> {
    if json_mode {
        let report = FaultReport::from_fault(fault);
        writeln!(out, "{}", serde_json::to_string_pretty(&report)?)?;
    } else {
        write_fault(out, Some(fault))?;
    }
    Ok(())
}

fn emit_json<W: Write>(out: &mut W, value: &serde_json::Value) -> Result<(), AppError> {
    writeln!(out, "{}", serde_json::to_string_pretty(value)?)?;
    Ok(())
}

// =============================================================================
// LOOKUP COMMANDS
// =============================================================================

/// Print the pet of `name`. A miss is printed and returned as an error.
pub fn cmd_lookup<W: Write>(
    directory: &OwnerDirectory,
    out: &mut W,
    json_mode: bool,
    name: &str,
) -> Result<(), AppError> {
    match directory.pet_of(name) {
        Ok(pet) => {
            tracing::info!(owner = name, pet, "Lookup hit");
            if json_mode {
                emit_json(out, &serde_json::json!({ "owner": name, "pet": pet }))
            } else {
                writeln!(out, "{}'s pet is a {}", name, pet)?;
                Ok(())
            }
        }
        Err(fault) => {
            tracing::warn!(owner = name, "Lookup miss");
            emit_fault(out, json_mode, &fault)?;
            Err(AppError::Fault(fault))
        }
    }
}

/// List every owner.
pub fn cmd_list<W: Write>(
    directory: &OwnerDirectory,
    out: &mut W,
    json_mode: bool,
) -> Result<(), AppError> {
    if json_mode {
        let owners: serde_json::Map<String, serde_json::Value> = directory
            .entries()
            .map(|(owner, pet)| (owner.to_string(), serde_json::Value::from(pet)))
            .collect();
        return emit_json(out, &serde_json::json!({ "owners": owners }));
    }

    for (owner, pet) in directory.entries() {
        writeln!(out, "{}: {}", owner, pet)?;
    }
    Ok(())
}

/// Look up every name. Hits are printed; misses are joined into one fault.
pub fn cmd_join<W: Write>(
    directory: &OwnerDirectory,
    out: &mut W,
    json_mode: bool,
    names: &[String],
) -> Result<(), AppError> {
    let mut hits = Vec::new();
    let mut misses = Vec::new();

    for name in names {
        match directory.pet_of(name) {
            Ok(pet) => hits.push((name.as_str(), pet)),
            Err(fault) => misses.push(fault),
        }
    }
    tracing::info!(hits = hits.len(), misses = misses.len(), "Joined lookup");

    if json_mode {
        let found: serde_json::Map<String, serde_json::Value> = hits
            .iter()
            .map(|&(owner, pet)| (owner.to_string(), serde_json::Value::from(pet)))
            .collect();
        let fault = join(misses.clone());
        let report = fault.as_ref().map(FaultReport::from_fault);

        emit_json(out, &serde_json::json!({ "found": found, "fault": report }))?;
        return fault.map_or(Ok(()), |f| Err(AppError::Fault(f)));
    }

    for (owner, pet) in &hits {
        writeln!(out, "{}'s pet is a {}", owner, pet)?;
    }

    match join(misses) {
        Some(fault) => {
            emit_fault(out, false, &fault)?;
            Err(AppError::Fault(fault))
        }
        None => Ok(()),
    }
}

// =============================================================================
// PANIC COMMAND
// =============================================================================

/// Unwind with `message` and print the captured fault.
///
/// The unwind is raised with `resume_unwind`, so the panic hook does not
/// print anything of its own.
pub fn cmd_panic<W: Write>(
    out: &mut W,
    json_mode: bool,
    message: &str,
    as_fault: bool,
) -> Result<(), AppError> {
    let payload = message.to_string();

    let captured = try_run(move || {
        if as_fault {
            panic::resume_unwind(Box::new(common::from_string(payload)))
        } else {
            panic::resume_unwind(Box::new(payload))
        }
    });

    match captured {
        Some(fault) => {
            tracing::warn!(level = %fault.level(), "Captured panic");
            emit_fault(out, json_mode, &fault)
        }
        None => {
            tracing::debug!("Closure completed without panicking");
            Ok(())
        }
    }
}

// =============================================================================
// DEMO COMMAND
// =============================================================================

/// Build the demo composition:
///
/// ```text
/// join
/// ├── startup failed (caused by: lookup miss for "Mark")
/// └── parameter ("owners") must be non-nil
/// ```
pub fn build_demo(directory: &OwnerDirectory) -> Option<Fault> {
    let miss = directory.pet_of("Mark").err();

    let startup = Descriptor::new(Severity::Fatal, StandardCode::OperationFailed, "startup failed");
    let caused = match miss {
        Some(miss) => startup.init_caused_by(miss),
        None => startup.init(),
    };

    let nil = common::nil_parameter("owners", &[common::FaultOption::at("demo")]);

    join([caused.throw("load_config").throw("main"), nil])
}

/// Print the demo composition and the results of searching it.
pub fn cmd_demo<W: Write>(
    directory: &OwnerDirectory,
    out: &mut W,
    json_mode: bool,
) -> Result<(), AppError> {
    let Some(fault) = build_demo(directory) else {
        return Ok(());
    };

    let sentinel = KEY_NOT_FOUND.init();
    let found_is = is(Some(&fault), Some(&sentinel));
    let found_as = as_kind::<KeyNotFound>(Some(&fault));
    tracing::debug!(is = found_is, as_hit = found_as.is_some(), "Searched demo fault");

    if json_mode {
        return emit_json(
            out,
            &serde_json::json!({
                "fault": FaultReport::from_fault(&fault),
                "is_key_not_found": found_is,
                "as_key_not_found": found_as.as_ref().map(|k| k.key.as_str()),
            }),
        );
    }

    emit_fault(out, false, &fault)?;
    writeln!(out)?;
    writeln!(out, "is(key not found): {}", found_is)?;
    match found_as {
        Some(kind) => writeln!(out, "as(KeyNotFound): key = {:?}", kind.key)?,
        None => writeln!(out, "as(KeyNotFound): none")?,
    }
    Ok(())
}

// =============================================================================
// TESTS
// =============================================================================
