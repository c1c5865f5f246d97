//! Trace recorder: builds the immutable audit record for one pipeline step.
//!
//! Pure construction. Nothing here touches the blackboard, the policy engine,
//! or the audit writer.

use chrono::Utc;

use bastion_contracts::{
    error::{BastionError, BastionResult},
    trace::{Outputs, PolicyHit, StepId, ToolCall, TraceStep},
};

/// Confidence recorded for a step when the agent does not state one.
pub const DEFAULT_CONFIDENCE: f64 = 0.6;

/// Output key under which a toolsmith lists the tool calls it proposes.
pub const TOOLS_REQUESTED_KEY: &str = "tools_requested";

/// Build a `TraceStep` with a fresh `StepId`.
///
/// `confidence` is clamped into `[0, 1]`; NaN is recorded as `0.0`.
pub fn make_step(
    agent: impl Into<String>,
    rationale: impl Into<String>,
    outputs: Outputs,
    tool_calls: Vec<ToolCall>,
    policy_hits: Vec<PolicyHit>,
    confidence: f64,
) -> TraceStep {
    let confidence = if confidence.is_nan() {
        0.0
    } else {
        confidence.clamp(0.0, 1.0)
    };

    TraceStep {
        step_id: StepId::new(),
        agent: agent.into(),
        rationale: rationale.into(),
        outputs,
        tool_calls,
        policy_hits,
        confidence,
        timestamp: Utc::now(),
    }
}

/// Wrap the raw `tools_requested` descriptors in `outputs` into `ToolCall`s.
///
/// A missing or null key means no tools were requested. Anything that is not
/// a list of `{ "name": string, "args": { string: string } }` records is a
/// `MalformedToolRequest`.
pub fn tool_calls_from_outputs(outputs: &Outputs) -> BastionResult<Vec<ToolCall>> {
    match outputs.get(TOOLS_REQUESTED_KEY) {
        None | Some(serde_json::Value::Null) => Ok(Vec::new()),
        Some(raw) => serde_json::from_value(raw.clone()).map_err(|e| {
            BastionError::MalformedToolRequest {
                reason: format!("'{}' is not a list of tool calls: {}", TOOLS_REQUESTED_KEY, e),
            }
        }),
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn outputs(value: serde_json::Value) -> Outputs {
        value.as_object().cloned().unwrap()
    }

    #[test]
    fn make_step_defaults_to_empty_lists() {
        let step = make_step(
            "attacker",
            "probe the edge",
            outputs(json!({ "hypothesis": "ssh exposed" })),
            Vec::new(),
            Vec::new(),
            DEFAULT_CONFIDENCE,
        );

        assert_eq!(step.agent, "attacker");
        assert_eq!(step.rationale, "probe the edge");
        assert!(step.tool_calls.is_empty());
        assert!(step.policy_hits.is_empty());
        assert_eq!(step.confidence, 0.6);
        assert!(!step.step_id.to_string().is_empty());
    }

    #[test]
    fn make_step_issues_fresh_ids() {
        let a = make_step("decider", "r", Outputs::new(), vec![], vec![], DEFAULT_CONFIDENCE);
        let b = make_step("decider", "r", Outputs::new(), vec![], vec![], DEFAULT_CONFIDENCE);
        assert_ne!(a.step_id, b.step_id);
    }

    #[test]
    fn make_step_clamps_confidence() {
        let high = make_step("a", "r", Outputs::new(), vec![], vec![], 1.7);
        let low = make_step("a", "r", Outputs::new(), vec![], vec![], -0.2);
        let nan = make_step("a", "r", Outputs::new(), vec![], vec![], f64::NAN);
        assert_eq!(high.confidence, 1.0);
        assert_eq!(low.confidence, 0.0);
        assert_eq!(nan.confidence, 0.0);
    }

    #[test]
    fn tool_calls_are_wrapped_in_order() {
        let out = outputs(json!({
            "tools_requested": [
                { "name": "nmap", "args": { "target": "203.0.113.12", "scan": "-sS -Pn" } },
                { "name": "whois" }
            ]
        }));

        let calls = tool_calls_from_outputs(&out).unwrap();
        assert_eq!(calls.len(), 2);
        assert_eq!(calls[0].name, "nmap");
        assert_eq!(calls[0].args["scan"], "-sS -Pn");
        assert_eq!(calls[1], ToolCall::new("whois"));
    }

    #[test]
    fn missing_tools_key_means_no_calls() {
        assert!(tool_calls_from_outputs(&Outputs::new()).unwrap().is_empty());
        let out = outputs(json!({ "tools_requested": null }));
        assert!(tool_calls_from_outputs(&out).unwrap().is_empty());
    }

    #[test]
    fn malformed_descriptors_are_rejected() {
        let out = outputs(json!({ "tools_requested": [{ "args": { "scan": "-sS" } }] }));
        match tool_calls_from_outputs(&out) {
            Err(BastionError::MalformedToolRequest { reason }) => {
                assert!(reason.contains("tools_requested"), "unexpected reason: {reason}");
            }
            other => panic!("expected MalformedToolRequest, got {:?}", other),
        }
    }
}
