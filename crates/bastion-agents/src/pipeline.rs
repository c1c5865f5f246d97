//! Default wiring: the canonical roster, an allowlist policy, the in-memory
//! hash-chained audit writer and the schema verifier.

use tracing::debug;

use bastion_audit::InMemoryAuditWriter;
use bastion_contracts::{
    conversation::{ConversationRequest, Message, Mode},
    error::BastionResult,
    trace::ConversationResult,
};
use bastion_core::Coordinator;
use bastion_policy::AllowlistPolicy;
use bastion_verify::SchemaVerifier;

use crate::agents::default_roster;

/// A ready-to-run coordinator plus a handle on its audit trail.
pub struct Pipeline {
    coordinator: Coordinator,
    audit: InMemoryAuditWriter,
}

impl Pipeline {
    /// Wire the default roster with `policy`.
    pub fn new(policy: AllowlistPolicy) -> Self {
        let audit = InMemoryAuditWriter::new();
        debug!(
            tools = ?policy.allowed_tools().collect::<Vec<_>>(),
            "pipeline assembled"
        );
        let coordinator = default_coordinator(policy, audit.clone());
        Self { coordinator, audit }
    }

    /// Wire the default roster with the built-in allowlist.
    pub fn builtin() -> BastionResult<Self> {
        Ok(Self::new(AllowlistPolicy::builtin()?))
    }

    pub fn run(
        &self,
        messages: &[Message],
        mode: Mode,
        scenario_id: Option<&str>,
    ) -> BastionResult<ConversationResult> {
        self.coordinator.run(messages, mode, scenario_id)
    }

    pub fn run_request(&self, request: &ConversationRequest) -> BastionResult<ConversationResult> {
        self.coordinator.run_request(request)
    }

    /// The audit writer every run of this pipeline records into.
    pub fn audit(&self) -> &InMemoryAuditWriter {
        &self.audit
    }

    pub fn coordinator(&self) -> &Coordinator {
        &self.coordinator
    }
}

/// Build a coordinator over the default roster.
pub fn default_coordinator(policy: AllowlistPolicy, audit: InMemoryAuditWriter) -> Coordinator {
    Coordinator::new(
        default_roster(),
        Box::new(policy),
        Box::new(audit),
        Box::new(SchemaVerifier::new()),
    )
}

/// Run one conversation through a fresh built-in pipeline.
pub fn run_conversation(
    messages: &[Message],
    mode: Mode,
    scenario_id: Option<&str>,
) -> BastionResult<ConversationResult> {
    Pipeline::builtin()?.run(messages, mode, scenario_id)
}
