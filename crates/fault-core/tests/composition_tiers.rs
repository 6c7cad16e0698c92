//! # Composition Tier Tests (T0-T4)
//!
//! Each tier builds on the previous one. If ANY tier fails, composed
//! faults cannot be trusted.
//!
//! ## Tiers
//! - T0: Descriptor & Base Fault
//! - T1: Wrapping & Embedding Tower
//! - T2: Search (`is` / `as`)
//! - T3: Join
//! - T4: Context Store & Misuse

#![allow(clippy::unwrap_used, clippy::panic)]

use chrono::{TimeZone, Utc};
use fault_core::{
    Descriptor, Fault, FaultKind, Severity, StandardCode, as_kind, as_node, bad_construction,
    embedding_tower, is, join, render, traverse,
};
use std::sync::Arc;

#[derive(Debug)]
struct KeyNotFound {
    key: String,
}

impl FaultKind for KeyNotFound {
    fn info_lines(&self) -> Vec<String> {
        vec![format!("- Key: {:?}", self.key)]
    }
}

#[derive(Debug)]
struct Retry {
    attempts: u32,
}

impl FaultKind for Retry {
    fn info_lines(&self) -> Vec<String> {
        vec![format!("- Attempts: {}", self.attempts)]
    }
}

fn not_found() -> Descriptor {
    Descriptor::new(
        Severity::Error,
        StandardCode::OperationFailed,
        "the specified key was not found",
    )
}

fn at(level: Severity, secs: i64) -> Fault {
    Descriptor::new(level, StandardCode::UnknownCode, "member")
        .init_at(Utc.timestamp_opt(secs, 0).single())
}

// =============================================================================
// TIER T0: DESCRIPTOR & BASE FAULT
// =============================================================================

mod t0_base {
    use super::*;

    /// T0.1: The error message is produced from the descriptor.
    #[test]
    fn error_message_from_descriptor() {
        let fault = not_found().init();
        assert_eq!(
            fault.error_message(),
            "[ERROR] (OperationFailed) the specified key was not found"
        );
    }

    /// T0.2: Faults of one descriptor share identity.
    #[test]
    fn shared_descriptor_is_shared_identity() {
        let desc = not_found();
        assert!(is(Some(&desc.init()), Some(&desc.init())));
        assert!(!is(Some(&desc.init()), Some(&not_found().init())));
    }

    /// T0.3: Causes are reachable and rendered.
    #[test]
    fn cause_is_searchable() {
        let root = not_found().init();
        let outer = Descriptor::new(Severity::Fatal, StandardCode::OperationFailed, "startup failed")
            .init_caused_by(root.clone());

        assert!(is(Some(&outer), Some(&root)));
        assert!(render(Some(&outer)).iter().any(|l| l == "Caused by:"));
    }
}

// =============================================================================
// TIER T1: WRAPPING & EMBEDDING TOWER
// =============================================================================

mod t1_tower {
    use super::*;

    /// T1.1: Wrapping delegates level, message and timestamp.
    #[test]
    fn wrapping_delegates() {
        let base = not_found().init();
        let wrapped = Fault::wrap(base.clone(), KeyNotFound { key: "Mark".into() });

        assert_eq!(wrapped.level(), base.level());
        assert_eq!(wrapped.to_string(), base.to_string());
        assert_eq!(wrapped.timestamp(), base.timestamp());
    }

    /// T1.2: The tower is innermost first.
    #[test]
    fn tower_innermost_first() {
        let base = not_found().init();
        let wrapped = Fault::wrap(base.clone(), KeyNotFound { key: "Mark".into() });
        let outer = Fault::wrap(wrapped.clone(), Retry { attempts: 3 });

        let tower = embedding_tower(&outer);
        assert_eq!(tower.len(), 3);
        assert!(tower[0].ptr_eq(&base));
        assert!(tower[2].ptr_eq(&outer));
    }

    /// T1.3: Rendering follows the tower.
    #[test]
    fn render_follows_tower() {
        let base = not_found().init_at(None);
        let outer = Fault::wrap(
            Fault::wrap(base, KeyNotFound { key: "Mark".into() }),
            Retry { attempts: 3 },
        );

        assert_eq!(
            render(Some(&outer)),
            vec![
                "[ERROR] (OperationFailed) the specified key was not found.",
                "",
                "- Key: \"Mark\"",
                "- Attempts: 3",
            ]
        );
    }
}

// =============================================================================
// TIER T2: SEARCH
// =============================================================================

mod t2_search {
    use super::*;

    /// T2.1: `as` reaches through every kind of edge.
    #[test]
    fn as_through_wrap_join_and_cause() {
        let miss = Fault::wrap(not_found().init(), KeyNotFound { key: "Zed".into() });
        let caused = Descriptor::new(Severity::Error, StandardCode::OperationFailed, "lookup")
            .init_caused_by(miss);
        let joined = join([at(Severity::Debug, 1), caused]).unwrap();

        let found: Arc<KeyNotFound> = as_kind(Some(&joined)).unwrap();
        assert_eq!(found.key, "Zed");
        assert!(as_kind::<Retry>(Some(&joined)).is_none());
    }

    /// T2.2: Absence never matches.
    #[test]
    fn absence_never_matches() {
        let f = not_found().init();
        assert!(!is(None, Some(&f)));
        assert!(!is(Some(&f), None));
        assert!(as_kind::<Retry>(None).is_none());
    }

    /// T2.3: Deep chains are searched and dropped without recursion.
    #[test]
    fn deep_chain_is_searchable() {
        let worker = std::thread::Builder::new()
            .stack_size(2 * 1024 * 1024)
            .spawn(|| {
                let target = not_found().init();
                let mut current = target.clone();
                for attempts in 0..50_000 {
                    current = Fault::wrap(current, Retry { attempts });
                }

                assert!(is(Some(&current), Some(&target)));
                assert_eq!(embedding_tower(&current).len(), 50_001);
                drop(current);
                target.to_string()
            })
            .unwrap();

        assert_eq!(
            worker.join().unwrap(),
            "[ERROR] (OperationFailed) the specified key was not found"
        );
    }

    /// T2.4: A join buried under a cause is recovered as a fault handle.
    #[test]
    fn as_node_finds_join_under_cause() {
        let inner = join([at(Severity::Warning, 1), at(Severity::Error, 2)]).unwrap();
        let outer = Descriptor::new(Severity::Fatal, StandardCode::OperationFailed, "startup")
            .init_caused_by(inner.clone());
        let wrapped = Fault::wrap(outer, Retry { attempts: 3 });

        let found = as_node(Some(&wrapped), |node| node.as_join().is_some()).unwrap();
        assert!(found.ptr_eq(&inner));
        assert_eq!(found.as_join().map(|j| j.members().len()), Some(2));
    }

    /// T2.5: Traversal counts every node once in a tree.
    #[test]
    fn traversal_visits_all_nodes() {
        let joined = join([at(Severity::Error, 1), at(Severity::Error, 2), at(Severity::Error, 3)])
            .unwrap();

        let mut visited = 0;
        let hit = traverse(Some(&joined), |_| {
            visited += 1;
            false
        });

        assert!(!hit);
        assert_eq!(visited, 4);
    }
}

// =============================================================================
// TIER T3: JOIN
// =============================================================================

mod t3_join {
    use super::*;

    /// T3.1: Level is the most severe, timestamp the earliest.
    #[test]
    fn derived_level_and_timestamp() {
        let joined = join([at(Severity::Warning, 20), at(Severity::Fatal, 10)]).unwrap();

        assert_eq!(joined.level(), Severity::Fatal);
        assert_eq!(joined.timestamp(), Utc.timestamp_opt(10, 0).single());
        assert_eq!(joined.to_string(), "[FATAL] (FaultJoin) joined 2 faults");
    }

    /// T3.2: Rendering lists members in given order.
    #[test]
    fn members_render_in_order() {
        let a = Fault::wrap(not_found().init_at(None), KeyNotFound { key: "a".into() });
        let b = Fault::wrap(not_found().init_at(None), KeyNotFound { key: "b".into() });
        let joined = join([Some(a), None, Some(b)]).unwrap();

        assert_eq!(
            render(Some(&joined)),
            vec![
                "[ERROR] (FaultJoin) joined 2 faults.",
                "",
                "- Key: \"a\"",
                "- Key: \"b\"",
            ]
        );
    }

    /// T3.3: Nothing to join is absence.
    #[test]
    fn empty_join_is_absent() {
        assert!(join(Vec::<Option<Fault>>::new()).is_none());
    }
}

// =============================================================================
// TIER T4: CONTEXT STORE & MISUSE
// =============================================================================

mod t4_context {
    use super::*;

    /// T4.1: The lookup-miss rendering.
    #[test]
    fn lookup_miss_rendering() {
        let fault = not_found().init();
        fault.add_suggestions(["check spelling"]).unwrap();
        fault.add_key("key", "Mark").unwrap();

        let lines = render(Some(&fault));
        assert_eq!(lines[0], "[ERROR] (OperationFailed) the specified key was not found.");
        assert_eq!(lines[1], "");
        assert!(lines[2].starts_with("Occurred at: "));
        assert!(lines.contains(&"- check spelling".to_string()));
        assert!(lines.contains(&"- key: Mark".to_string()));
    }

    /// T4.2: Context written through a wrapper lands on the base.
    #[test]
    fn context_through_wrapper() {
        let base = not_found().init();
        let outer = Fault::wrap(base.clone(), Retry { attempts: 1 });

        outer.add_key("attempt", 1_u32).unwrap();
        outer.set_value("attempt", 2_u32).unwrap();
        assert_eq!(base.typed_value::<u32>("attempt").unwrap(), 2);
    }

    /// T4.3: A broken chain surfaces the bad-construction fault.
    #[test]
    fn broken_chain_reports_misuse() {
        let broken = Fault::wrap_opaque(not_found().init(), Retry { attempts: 0 });
        let err = broken.add_key("k", "v").unwrap_err();

        assert!(is(Some(&err), Some(&bad_construction())));
        assert_eq!(err.level(), Severity::Fatal);
    }
}
