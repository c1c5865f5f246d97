//! Core trait definitions for the BASTION pipeline.
//!
//! These four traits are the seams the coordinator is built on:
//!
//! - `Agent`       — one specialist role (may later be backed by an LLM)
//! - `ToolPolicy`  — screens proposed tool invocations against an allowlist
//! - `AuditWriter` — records every finalized trace step immutably
//! - `Verifier`    — checks an agent's outputs before its step is recorded
//!
//! The coordinator owns one of each collaborator and passes the run's
//! blackboard to agents per call; no agent holds shared state of its own.

use std::collections::BTreeMap;

use bastion_contracts::{
    error::BastionResult,
    trace::{Outputs, PolicyHit, RunId, TraceStep},
    verify::{OutputSchema, VerificationReport},
};

use crate::blackboard::Blackboard;

/// One specialist in the investigation roster.
///
/// Implementations are stateless: everything an agent learns during a run
/// lives on the run's `Blackboard`, which the coordinator lends to each call.
pub trait Agent: Send + Sync {
    /// Stable name used for trace steps and blackboard keys (e.g. "toolsmith").
    fn name(&self) -> &str;

    /// Explain how this agent will approach `goal`.
    ///
    /// Must be pure and deterministic for a given goal.
    fn plan(&self, goal: &str) -> String;

    /// Produce this phase's output payload.
    ///
    /// `blackboard` holds every observation recorded by earlier phases of the
    /// same run. An `Err` aborts the run; the coordinator never records a
    /// step for a failed `act()`.
    fn act(&self, blackboard: &Blackboard) -> BastionResult<Outputs>;

    /// Record `outputs` for later phases.
    ///
    /// The default appends them to the blackboard under `self.name()`.
    fn observe(&self, outputs: &Outputs, blackboard: &mut Blackboard) {
        blackboard.append_observation(self.name(), outputs.clone());
    }

    /// One-line summary of what the agent did.
    fn report(&self) -> String {
        format!("{} completed action.", self.name())
    }

    /// Schema the coordinator verifies this agent's outputs against.
    ///
    /// `None` (the default) skips verification for this agent.
    fn output_schema(&self) -> Option<OutputSchema> {
        None
    }
}

/// Screens a proposed tool invocation.
///
/// Policy hits are audit signals, not errors, so this is infallible: an
/// unknown tool or flag is reported in the returned list.
pub trait ToolPolicy: Send + Sync {
    /// Return every violation `name` + `args` commits, in detection order.
    fn validate_tool_request(&self, name: &str, args: &BTreeMap<String, String>) -> Vec<PolicyHit>;
}

/// The immutable execution record.
///
/// Every finalized step of every run is written here. A failed write is
/// fatal to the run.
pub trait AuditWriter: Send + Sync {
    /// Append one trace step to the audit log of `run_id`.
    ///
    /// Records written here are never modified or deleted by the runtime.
    fn write(&self, run_id: &RunId, step: &TraceStep) -> BastionResult<()>;

    /// Mark `run_id` as complete. Called once, after the decision phase.
    fn finalize(&self, run_id: &RunId) -> BastionResult<()>;
}

/// The output verifier.
///
/// Implementations must not call agent logic; they inspect outputs against a
/// declarative `OutputSchema` and report.
pub trait Verifier: Send + Sync {
    fn verify(&self, outputs: &Outputs, schema: &OutputSchema) -> BastionResult<VerificationReport>;
}
