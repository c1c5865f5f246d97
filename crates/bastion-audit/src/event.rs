//! Audit event and log types.
//!
//! `AuditEvent` wraps one `TraceStep` with its chain position and the SHA-256
//! hashes that make tampering detectable. `AuditLog` is the exported record
//! of one run.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use bastion_contracts::trace::TraceStep;

/// A single entry in one run's hash chain.
///
/// Modifying any field, including the embedded `record`, invalidates
/// `this_hash` and every later `prev_hash`, which `verify_chain` detects.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditEvent {
    /// Position in the chain, starting at 0.
    pub sequence: u64,

    /// The run this event belongs to.
    pub run_id: String,

    /// The trace step exactly as the coordinator returned it.
    pub record: TraceStep,

    /// Hex SHA-256 of the previous event, or `GENESIS_HASH` for the first.
    pub prev_hash: String,

    /// Hex SHA-256 over (run_id, sequence, prev_hash, canonical JSON of record).
    pub this_hash: String,
}

impl AuditEvent {
    /// The `prev_hash` of the first event in every chain.
    pub const GENESIS_HASH: &'static str =
        "0000000000000000000000000000000000000000000000000000000000000000";
}

/// The audit trail of one run.
///
/// `terminal_hash` is the `this_hash` of the last event and commits to the
/// whole log.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditLog {
    pub run_id: String,

    /// All events in chain order (sequence 0 first).
    pub events: Vec<AuditEvent>,

    /// When the coordinator finalized the run; `None` while it is still open.
    pub finalized_at: Option<DateTime<Utc>>,

    /// Empty string if the log is empty.
    pub terminal_hash: String,
}
