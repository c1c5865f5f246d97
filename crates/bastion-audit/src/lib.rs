//! # bastion-audit
//!
//! Immutable, append-only, SHA-256 hash-chained audit trail for BASTION
//! investigation runs.
//!
//! ## Overview
//!
//! Every trace step the coordinator records is wrapped in an `AuditEvent`
//! linked to the previous event of the same run by its SHA-256 hash.
//! Tampering with any event, even a single byte of an agent's outputs, breaks
//! the chain and is detected by `verify_chain`.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use bastion_audit::InMemoryAuditWriter;
//!
//! let audit = InMemoryAuditWriter::new();
//! let coordinator = Coordinator::new(roster, policy, Box::new(audit.clone()), verifier);
//! let result = coordinator.run(&messages, Mode::Assist, None)?;
//!
//! assert!(audit.verify_integrity(&result.run_id));
//! let log = audit.export_log(&result.run_id);
//! ```

pub mod chain;
pub mod event;
pub mod memory;

pub use chain::{hash_event, verify_chain};
pub use event::{AuditEvent, AuditLog};
pub use memory::InMemoryAuditWriter;

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use serde_json::json;

    use bastion_contracts::{
        error::BastionError,
        trace::{PolicyHit, RunId, ToolCall, TraceStep},
    };
    use bastion_core::{
        trace::{make_step, DEFAULT_CONFIDENCE},
        traits::AuditWriter,
    };

    use super::{AuditEvent, InMemoryAuditWriter};

    // ── Helpers ───────────────────────────────────────────────────────────────

    /// Build a trace step with a distinguishable payload.
    fn make_record(agent: &str, note: &str) -> TraceStep {
        make_step(
            agent,
            format!("{agent} rationale"),
            json!({ "note": note }).as_object().cloned().unwrap(),
            vec![ToolCall::new("nmap").with_arg("scan", "-sS")],
            vec![PolicyHit::FlagNotAllowed("-X".to_string())],
            DEFAULT_CONFIDENCE,
        )
    }

    fn write_three(writer: &InMemoryAuditWriter, run_id: &RunId) {
        writer.write(run_id, &make_record("intel_analyst", "first")).unwrap();
        writer.write(run_id, &make_record("attacker", "second")).unwrap();
        writer.write(run_id, &make_record("defender", "third")).unwrap();
    }

    // ── Tests ─────────────────────────────────────────────────────────────────

    #[test]
    fn test_hash_chain_integrity() {
        let writer = InMemoryAuditWriter::new();
        let run_id = RunId::new();
        write_three(&writer, &run_id);

        assert!(writer.verify_integrity(&run_id), "chain must be valid after sequential writes");
    }

    /// Mutating a stored step's outputs breaks the chain.
    #[test]
    fn test_tamper_detection() {
        let writer = InMemoryAuditWriter::new();
        let run_id = RunId::new();
        write_three(&writer, &run_id);

        {
            let mut chains = writer.chains.lock().unwrap();
            let chain = chains.get_mut(&run_id).unwrap();
            chain.events[0]
                .record
                .outputs
                .insert("note".to_string(), json!("TAMPERED"));
        }

        assert!(
            !writer.verify_integrity(&run_id),
            "chain must detect tampering with a stored step"
        );
    }

    /// Dropping a policy hit from a recorded step is tampering too.
    #[test]
    fn test_policy_hit_removal_detected() {
        let writer = InMemoryAuditWriter::new();
        let run_id = RunId::new();
        write_three(&writer, &run_id);

        let mut log = writer.export_log(&run_id).unwrap();
        log.events[2].record.policy_hits.clear();

        assert!(!super::verify_chain(&log.events));
    }

    #[test]
    fn test_genesis_hash() {
        let writer = InMemoryAuditWriter::new();
        let run_id = RunId::new();
        writer.write(&run_id, &make_record("intel_analyst", "first")).unwrap();

        let log = writer.export_log(&run_id).unwrap();
        assert_eq!(log.events.len(), 1);
        assert_eq!(log.events[0].prev_hash, AuditEvent::GENESIS_HASH);
    }

    #[test]
    fn test_sequence_monotonic() {
        let writer = InMemoryAuditWriter::new();
        let run_id = RunId::new();
        write_three(&writer, &run_id);

        let log = writer.export_log(&run_id).unwrap();
        for (idx, event) in log.events.iter().enumerate() {
            assert_eq!(event.sequence, idx as u64);
        }
    }

    /// Chains of different runs are independent.
    #[test]
    fn test_runs_have_separate_chains() {
        let writer = InMemoryAuditWriter::new();
        let first = RunId::new();
        let second = RunId::new();
        write_three(&writer, &first);
        writer.write(&second, &make_record("intel_analyst", "other")).unwrap();

        let a = writer.export_log(&first).unwrap();
        let b = writer.export_log(&second).unwrap();
        assert_eq!(a.events.len(), 3);
        assert_eq!(b.events.len(), 1);
        assert_eq!(b.events[0].prev_hash, AuditEvent::GENESIS_HASH);
        assert_eq!(writer.run_ids().len(), 2);
    }

    #[test]
    fn test_export_log() {
        let writer = InMemoryAuditWriter::new();
        let run_id = RunId::new();
        write_three(&writer, &run_id);
        writer.finalize(&run_id).unwrap();

        let log = writer.export_log(&run_id).unwrap();

        assert_eq!(log.run_id, run_id.to_string());
        assert_eq!(log.events.len(), 3);
        assert!(log.finalized_at.is_some());
        assert_eq!(log.terminal_hash, log.events.last().unwrap().this_hash);
        assert_eq!(log.events[1].record.agent, "attacker");
        assert!(super::verify_chain(&log.events));
    }

    /// A finalized run is sealed against further writes.
    #[test]
    fn test_finalized_run_rejects_writes() {
        let writer = InMemoryAuditWriter::new();
        let run_id = RunId::new();
        write_three(&writer, &run_id);
        writer.finalize(&run_id).unwrap();
        assert!(writer.is_finalized(&run_id));

        match writer.write(&run_id, &make_record("decider", "late")) {
            Err(BastionError::AuditWriteFailed { reason }) => {
                assert!(reason.contains("already finalized"), "unexpected reason: {reason}");
            }
            other => panic!("expected AuditWriteFailed, got {:?}", other),
        }
        assert_eq!(writer.export_log(&run_id).unwrap().events.len(), 3);
    }

    /// Clones share the same chains.
    #[test]
    fn test_clones_share_state() {
        let writer = InMemoryAuditWriter::new();
        let handle = writer.clone();
        let run_id = RunId::new();
        write_three(&writer, &run_id);

        assert_eq!(handle.export_log(&run_id).unwrap().events.len(), 3);
    }

    /// Taking a finalized log drains it from the writer; open runs stay.
    #[test]
    fn test_take_log_drains_finalized_runs() {
        let writer = InMemoryAuditWriter::new();
        let done = RunId::new();
        let open = RunId::new();
        write_three(&writer, &done);
        writer.finalize(&done).unwrap();
        writer.write(&open, &make_record("intel_analyst", "pending")).unwrap();

        assert!(writer.take_log(&open).is_none(), "open runs must not be drained");

        let log = writer.take_log(&done).unwrap();
        assert_eq!(log.events.len(), 3);
        assert!(log.finalized_at.is_some());
        assert_eq!(log.terminal_hash, log.events[2].this_hash);
        assert!(super::verify_chain(&log.events));

        assert!(writer.take_log(&done).is_none());
        assert!(writer.export_log(&done).is_none());
        assert_eq!(writer.run_ids(), vec![open]);
    }

    #[test]
    fn test_verify_empty() {
        let writer = InMemoryAuditWriter::new();
        assert!(writer.verify_integrity(&RunId::new()));
        assert!(writer.export_log(&RunId::new()).is_none());
        assert!(super::verify_chain(&[]));
    }
}
