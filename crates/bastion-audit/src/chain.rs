//! Hash-chain primitives: hashing and chain integrity verification.
//!
//! Hash input layout (bytes, in order):
//!   1. run_id as UTF-8 bytes
//!   2. sequence as 8-byte little-endian
//!   3. prev_hash as UTF-8 bytes (64 ASCII hex chars)
//!   4. compact JSON of the trace step

use sha2::{Digest, Sha256};

use bastion_contracts::{
    error::{BastionError, BastionResult},
    trace::TraceStep,
};

use crate::event::AuditEvent;

/// Compute the SHA-256 hash for a single audit event.
///
/// Returns a lowercase 64-character hex string, or `AuditWriteFailed` if the
/// step cannot be serialized.
pub fn hash_event(
    run_id: &str,
    sequence: u64,
    record: &TraceStep,
    prev_hash: &str,
) -> BastionResult<String> {
    // Outputs are a BTreeMap-backed JSON object, so key order is stable.
    let record_json = serde_json::to_vec(record).map_err(|e| BastionError::AuditWriteFailed {
        reason: format!("trace step could not be serialized: {}", e),
    })?;

    let mut hasher = Sha256::new();
    hasher.update(run_id.as_bytes());
    hasher.update(sequence.to_le_bytes());
    hasher.update(prev_hash.as_bytes());
    hasher.update(&record_json);

    Ok(hex::encode(hasher.finalize()))
}

/// Verify the integrity of one run's hash chain.
///
/// Valid when every event's `prev_hash` equals the previous event's
/// `this_hash` (or `GENESIS_HASH` for the first), every `sequence` equals its
/// position, and every `this_hash` matches the recomputed value. An empty
/// chain is valid.
pub fn verify_chain(events: &[AuditEvent]) -> bool {
    let mut expected_prev = AuditEvent::GENESIS_HASH.to_string();

    for (position, event) in events.iter().enumerate() {
        if event.sequence != position as u64 || event.prev_hash != expected_prev {
            return false;
        }

        match hash_event(&event.run_id, event.sequence, &event.record, &event.prev_hash) {
            Ok(recomputed) if recomputed == event.this_hash => {}
            _ => return false,
        }

        expected_prev = event.this_hash.clone();
    }

    true
}
