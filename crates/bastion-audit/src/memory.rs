//! In-memory implementation of `AuditWriter`.
//!
//! `InMemoryAuditWriter` keeps one hash chain per run behind a shared
//! `Mutex`. Cloning the writer shares the underlying chains, so a caller can
//! hand one clone to the coordinator and keep another to export logs.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use chrono::{DateTime, Utc};
use tracing::{debug, info, warn};

use bastion_contracts::{
    error::{BastionError, BastionResult},
    trace::{RunId, TraceStep},
};
use bastion_core::traits::AuditWriter;

use crate::{
    chain::{hash_event, verify_chain},
    event::{AuditEvent, AuditLog},
};

// ── Internal mutable state ────────────────────────────────────────────────────

/// One run's chain.
pub(crate) struct RunChain {
    pub(crate) events: Vec<AuditEvent>,
    /// Next sequence number to assign.
    pub(crate) sequence: u64,
    /// `this_hash` of the last event, or `GENESIS_HASH` before any write.
    pub(crate) last_hash: String,
    pub(crate) finalized_at: Option<DateTime<Utc>>,
}

impl RunChain {
    fn new() -> Self {
        Self {
            events: Vec::new(),
            sequence: 0,
            last_hash: AuditEvent::GENESIS_HASH.to_string(),
            finalized_at: None,
        }
    }
}

pub(crate) type Chains = HashMap<RunId, RunChain>;

// ── Public writer ─────────────────────────────────────────────────────────────

/// An in-memory, append-only audit writer backed by per-run SHA-256 chains.
///
/// A finalized run is sealed: further writes for it are rejected. Chains are
/// held until a caller drains them with `take_log`; a long-lived writer must
/// take each finished run's log or it grows without bound.
#[derive(Clone, Default)]
pub struct InMemoryAuditWriter {
    pub(crate) chains: Arc<Mutex<Chains>>,
}

impl InMemoryAuditWriter {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> BastionResult<MutexGuard<'_, Chains>> {
        self.chains.lock().map_err(|e| BastionError::AuditWriteFailed {
            reason: format!("audit state lock poisoned: {}", e),
        })
    }

    /// Read-side lock. Reads tolerate poisoning: the chain itself is
    /// verified by hash, not by the lock.
    fn read(&self) -> MutexGuard<'_, Chains> {
        self.chains.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Export the audit log of `run_id`, or `None` if nothing was written for it.
    pub fn export_log(&self, run_id: &RunId) -> Option<AuditLog> {
        let chains = self.read();
        let chain = chains.get(run_id)?;
        let terminal_hash = chain
            .events
            .last()
            .map(|e| e.this_hash.clone())
            .unwrap_or_default();

        Some(AuditLog {
            run_id: run_id.to_string(),
            events: chain.events.clone(),
            finalized_at: chain.finalized_at,
            terminal_hash,
        })
    }

    /// Remove the finalized chain of `run_id` and return it as a log.
    ///
    /// Open chains are left in place and `None` is returned, as it is for
    /// an unknown run.
    pub fn take_log(&self, run_id: &RunId) -> Option<AuditLog> {
        let mut chains = self.read();
        if chains.get(run_id)?.finalized_at.is_none() {
            return None;
        }
        let chain = chains.remove(run_id)?;
        debug!(run_id = %run_id, event_count = chain.events.len(), "audit log taken");

        let terminal_hash = chain
            .events
            .last()
            .map(|e| e.this_hash.clone())
            .unwrap_or_default();
        Some(AuditLog {
            run_id: run_id.to_string(),
            events: chain.events,
            finalized_at: chain.finalized_at,
            terminal_hash,
        })
    }

    /// Verify that the chain of `run_id` has not been tampered with.
    ///
    /// A run with no events is trivially valid.
    pub fn verify_integrity(&self, run_id: &RunId) -> bool {
        let chains = self.read();
        chains
            .get(run_id)
            .map(|chain| verify_chain(&chain.events))
            .unwrap_or(true)
    }

    /// Every run this writer holds events for, in no particular order.
    pub fn run_ids(&self) -> Vec<RunId> {
        self.read().keys().cloned().collect()
    }

    pub fn is_finalized(&self, run_id: &RunId) -> bool {
        self.read()
            .get(run_id)
            .is_some_and(|chain| chain.finalized_at.is_some())
    }
}

// ── AuditWriter impl ──────────────────────────────────────────────────────────

impl AuditWriter for InMemoryAuditWriter {
    /// Append one trace step to the chain of `run_id`.
    ///
    /// Returns `AuditWriteFailed` if the run was already finalized, the step
    /// cannot be hashed, or the lock is poisoned.
    fn write(&self, run_id: &RunId, step: &TraceStep) -> BastionResult<()> {
        let mut chains = self.lock()?;
        let key = run_id.to_string();
        let chain = chains.entry(run_id.clone()).or_insert_with(RunChain::new);

        if chain.finalized_at.is_some() {
            warn!(run_id = %key, step_id = %step.step_id, "write rejected for sealed run");
            return Err(BastionError::AuditWriteFailed {
                reason: format!("run '{}' is already finalized", key),
            });
        }

        let prev_hash = chain.last_hash.clone();
        let sequence = chain.sequence;
        let this_hash = hash_event(&key, sequence, step, &prev_hash)?;

        chain.events.push(AuditEvent {
            sequence,
            run_id: key.clone(),
            record: step.clone(),
            prev_hash,
            this_hash: this_hash.clone(),
        });
        chain.sequence += 1;
        chain.last_hash = this_hash;

        debug!(run_id = %key, sequence, agent = %step.agent, "trace step audited");
        Ok(())
    }

    /// Seal the chain of `run_id`.
    fn finalize(&self, run_id: &RunId) -> BastionResult<()> {
        let mut chains = self.lock()?;
        let chain = chains.entry(run_id.clone()).or_insert_with(RunChain::new);
        chain.finalized_at = Some(Utc::now());

        info!(
            run_id = %run_id,
            event_count = chain.events.len(),
            terminal_hash = %chain.last_hash,
            "audit log finalized"
        );

        Ok(())
    }
}
