//! The BASTION coordinator: one fixed-order pass over the agent roster.
//!
//! Each run walks the linear state machine
//!
//!   Planning → Intel → Attack → Defense → Tooling → Decision → Done
//!
//! and for every agent phase executes
//!
//!   plan → act → [verify] → observe → [policy] → make_step
//!
//! Steps are buffered in the run and written to the `AuditWriter` only once
//! `Done` is reached, then the chain is finalized.
//!
//! The tooling phase screens every proposed tool call with the `ToolPolicy`
//! before its step is built, and carries the resulting hits onto the decision
//! step. Policy hits never stop the run; they lower the final risk score.
//!
//! Failure policy is abort-run: a failed `act()`, a failed verification, a
//! malformed tool request, or a failed audit write returns `Err` and the
//! run's blackboard is dropped with it. Callers never see a partial result.

use tracing::{debug, info, warn};

use bastion_contracts::{
    conversation::{ConversationRequest, Message, Mode},
    error::{BastionError, BastionResult},
    trace::{ConversationResult, FinalDecision, Outputs, PolicyHit, RunId, ToolCall, TraceStep},
};

use crate::{
    blackboard::Blackboard,
    phase::{Phase, Roster},
    planner,
    trace::{make_step, tool_calls_from_outputs, DEFAULT_CONFIDENCE},
    traits::{Agent, AuditWriter, ToolPolicy, Verifier},
};

/// Risk score of a run in which no proposed tool call violated policy.
pub const RISK_SCORE_CLEAN: f64 = 0.6;

/// Risk score of a run with at least one policy hit.
pub const RISK_SCORE_FLAGGED: f64 = 0.4;

/// Decider output key holding the recommended action.
pub const DECISION_KEY: &str = "decision";

/// Summary used when the decider produced no `decision`.
pub const NO_DECISION: &str = "No decision.";

/// Recommendation used when the decider produced no `decision`.
pub const DEFAULT_RECOMMENDATION: &str = "Document findings.";

/// Drives investigation runs over a fixed roster.
///
/// The coordinator owns its collaborators but holds no per-run state, so one
/// instance can serve any number of runs, including concurrent ones: each run
/// builds its own `Blackboard` and `RunId`.
pub struct Coordinator {
    roster: Roster,
    policy: Box<dyn ToolPolicy>,
    audit: Box<dyn AuditWriter>,
    verifier: Box<dyn Verifier>,
}

/// Everything one run accumulates between phases.
struct RunState {
    run_id: RunId,
    goal: String,
    blackboard: Blackboard,
    steps: Vec<(Phase, TraceStep)>,
    hits: Vec<PolicyHit>,
    decision: Option<Outputs>,
}

impl Coordinator {
    /// Create a coordinator with the given roster and trusted collaborators.
    pub fn new(
        roster: Roster,
        policy: Box<dyn ToolPolicy>,
        audit: Box<dyn AuditWriter>,
        verifier: Box<dyn Verifier>,
    ) -> Self {
        Self {
            roster,
            policy,
            audit,
            verifier,
        }
    }

    /// Run one conversation turn from a request record.
    ///
    /// `conversation_id` is logged and otherwise ignored; continuing a
    /// conversation is the caller's job.
    pub fn run_request(&self, request: &ConversationRequest) -> BastionResult<ConversationResult> {
        if let Some(conversation_id) = &request.conversation_id {
            debug!(conversation_id = %conversation_id, "continuing caller conversation");
        }
        self.run(&request.messages, request.mode, request.scenario_id.as_deref())
    }

    /// Run one investigation over `messages`.
    ///
    /// `mode` and `scenario_id` are accepted and logged but do not change the
    /// pipeline.
    ///
    /// # Errors
    ///
    /// - `EmptyConversation` if `messages` is empty (no phase runs)
    /// - `ConfigError` if two roster agents share a name (no phase runs)
    /// - `AgentFailed` if any agent's `act()` fails
    /// - `VerificationFailed` if an agent's outputs fail its schema
    /// - `MalformedToolRequest` if the toolsmith's tool list cannot be parsed
    /// - `AuditWriteFailed` if a step cannot be audited
    pub fn run(
        &self,
        messages: &[Message],
        mode: Mode,
        scenario_id: Option<&str>,
    ) -> BastionResult<ConversationResult> {
        if messages.is_empty() {
            warn!("rejecting empty conversation before any phase runs");
            return Err(BastionError::EmptyConversation);
        }
        self.roster.validate()?;

        let mut run = RunState {
            run_id: RunId::new(),
            goal: String::new(),
            blackboard: Blackboard::new(),
            steps: Vec::with_capacity(Phase::AGENT_PHASES.len()),
            hits: Vec::new(),
            decision: None,
        };

        info!(
            run_id = %run.run_id,
            mode = %mode,
            scenario_id = scenario_id.unwrap_or("-"),
            message_count = messages.len(),
            "investigation run starting"
        );

        let mut phase = Phase::Planning;
        while phase != Phase::Done {
            match phase {
                Phase::Planning => {
                    run.goal = planner::decompose(messages);
                    debug!(run_id = %run.run_id, goal = %run.goal, "goal decomposed");
                }
                agent_phase => {
                    if let Some(agent) = self.roster.agent_for(agent_phase) {
                        self.run_agent_phase(&mut run, agent_phase, agent)?;
                    }
                }
            }
            phase = phase.next();
        }

        // Canonical ordering pass: steps leave in phase order whatever order
        // they were produced in.
        run.steps.sort_by_key(|(phase, _)| phase.ordinal());
        let steps: Vec<TraceStep> = run.steps.into_iter().map(|(_, step)| step).collect();

        // Only a completed run reaches the audit log, so an aborted run
        // leaves no chain behind.
        for step in &steps {
            self.audit.write(&run.run_id, step)?;
        }
        self.audit.finalize(&run.run_id)?;

        let final_decision = final_decision(run.decision.as_ref(), &run.hits);

        info!(
            run_id = %run.run_id,
            step_count = steps.len(),
            hit_count = run.hits.len(),
            risk_score = final_decision.risk_score,
            "investigation run complete"
        );

        Ok(ConversationResult {
            run_id: run.run_id,
            steps,
            final_decision,
        })
    }

    /// Execute one agent phase and record its step.
    fn run_agent_phase(
        &self,
        run: &mut RunState,
        phase: Phase,
        agent: &dyn Agent,
    ) -> BastionResult<()> {
        let name = agent.name().to_string();
        debug!(run_id = %run.run_id, phase = %phase, agent = %name, "phase starting");

        // ── plan ─────────────────────────────────────────────────────────────
        let rationale = agent.plan(&run.goal);

        // ── act ──────────────────────────────────────────────────────────────
        let outputs = agent.act(&run.blackboard).map_err(|e| {
            warn!(run_id = %run.run_id, agent = %name, error = %e, "agent act failed, aborting run");
            match e {
                BastionError::AgentFailed { .. } => e,
                other => BastionError::AgentFailed {
                    agent: name.clone(),
                    reason: other.to_string(),
                },
            }
        })?;

        // ── verify ───────────────────────────────────────────────────────────
        //
        // Before observe(), so rejected outputs never reach the blackboard.
        if let Some(schema) = agent.output_schema() {
            let report = self.verifier.verify(&outputs, &schema)?;
            if !report.passed {
                let reason = report.failure_summary();
                warn!(
                    run_id = %run.run_id,
                    agent = %name,
                    schema_id = %schema.schema_id,
                    failures = %reason,
                    "agent output verification failed, aborting run"
                );
                return Err(BastionError::VerificationFailed {
                    agent: name,
                    reason,
                });
            }
        }

        // ── observe ──────────────────────────────────────────────────────────
        agent.observe(&outputs, &mut run.blackboard);

        // ── policy ───────────────────────────────────────────────────────────
        let (tool_calls, policy_hits) = match phase {
            Phase::Tooling => {
                let calls = tool_calls_from_outputs(&outputs)?;
                let hits = self.screen_tool_calls(&run.run_id, &calls);
                run.hits.extend(hits.iter().cloned());
                (calls, hits)
            }
            // The decider does not call the policy engine; its step carries
            // the run's hits so its audit record shows the policy context.
            Phase::Decision => (Vec::new(), run.hits.clone()),
            _ => (Vec::new(), Vec::new()),
        };

        if phase == Phase::Decision {
            run.decision = Some(outputs.clone());
        }

        // ── record ───────────────────────────────────────────────────────────
        let step = make_step(
            name.as_str(),
            rationale,
            outputs,
            tool_calls,
            policy_hits,
            DEFAULT_CONFIDENCE,
        );

        debug!(
            run_id = %run.run_id,
            phase = %phase,
            step_id = %step.step_id,
            report = %agent.report(),
            "phase recorded"
        );

        run.steps.push((phase, step));
        Ok(())
    }

    /// Run every proposed call through the policy engine, in proposal order.
    fn screen_tool_calls(&self, run_id: &RunId, calls: &[ToolCall]) -> Vec<PolicyHit> {
        let mut hits = Vec::new();
        for call in calls {
            let call_hits = self.policy.validate_tool_request(&call.name, &call.args);
            if call_hits.is_empty() {
                debug!(run_id = %run_id, tool = %call.name, "tool call within policy");
            } else {
                warn!(
                    run_id = %run_id,
                    tool = %call.name,
                    hit_count = call_hits.len(),
                    "tool call violates policy"
                );
            }
            hits.extend(call_hits);
        }
        hits
    }
}

/// Derive the run's final decision from the decider's outputs and the run's hits.
fn final_decision(decision: Option<&Outputs>, hits: &[PolicyHit]) -> FinalDecision {
    let decided = decision
        .and_then(|outputs| outputs.get(DECISION_KEY))
        .and_then(|v| v.as_str())
        .map(str::to_string);

    let risk_score = if hits.is_empty() {
        RISK_SCORE_CLEAN
    } else {
        RISK_SCORE_FLAGGED
    };

    FinalDecision {
        summary: decided.clone().unwrap_or_else(|| NO_DECISION.to_string()),
        risk_score,
        recommendations: vec![decided.unwrap_or_else(|| DEFAULT_RECOMMENDATION.to_string())],
    }
}

// ── Tests ────────────────────────────────────────────────────────────────────
