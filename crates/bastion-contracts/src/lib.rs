//! # bastion-contracts
//!
//! Shared types, schemas, and contracts for the BASTION investigation
//! pipeline.
//!
//! All crates in the workspace import from here. No pipeline logic lives in
//! this crate, only data definitions and the error type.

pub mod conversation;
pub mod error;
pub mod trace;
pub mod verify;

#[cfg(test)]
mod tests {
    use super::*;
    use conversation::{ConversationRequest, Message, Mode, Role};
    use error::BastionError;
    use trace::{PolicyHit, RunId, StepId, ToolCall};

    // ── PolicyHit wire codes ─────────────────────────────────────────────────

    #[test]
    fn policy_hit_display_matches_wire_codes() {
        assert_eq!(PolicyHit::ToolNotAllowed.to_string(), "tool_not_allowed");
        assert_eq!(
            PolicyHit::FlagNotAllowed("-X".to_string()).to_string(),
            "flag_not_allowed:-X"
        );
    }

    #[test]
    fn policy_hit_parses_wire_codes() {
        assert_eq!(
            "tool_not_allowed".parse::<PolicyHit>().unwrap(),
            PolicyHit::ToolNotAllowed
        );
        assert_eq!(
            "flag_not_allowed:-sU".parse::<PolicyHit>().unwrap(),
            PolicyHit::FlagNotAllowed("-sU".to_string())
        );
    }

    #[test]
    fn policy_hit_rejects_unknown_codes() {
        for bad in ["", "flag_not_allowed:", "tool_denied"] {
            match bad.parse::<PolicyHit>() {
                Err(BastionError::InvalidPolicyHit { code }) => assert_eq!(code, bad),
                other => panic!("expected InvalidPolicyHit for {bad:?}, got {:?}", other),
            }
        }
    }

    #[test]
    fn policy_hit_serializes_as_plain_string() {
        let hits = vec![
            PolicyHit::ToolNotAllowed,
            PolicyHit::FlagNotAllowed("-X".to_string()),
        ];
        let json = serde_json::to_value(&hits).unwrap();
        assert_eq!(json, serde_json::json!(["tool_not_allowed", "flag_not_allowed:-X"]));

        let decoded: Vec<PolicyHit> = serde_json::from_value(json).unwrap();
        assert_eq!(decoded, hits);
    }

    // ── Mode ─────────────────────────────────────────────────────────────────

    #[test]
    fn mode_defaults_to_assist() {
        assert_eq!(Mode::default(), Mode::Assist);
    }

    #[test]
    fn mode_parses_case_insensitively() {
        assert_eq!("assist".parse::<Mode>().unwrap(), Mode::Assist);
        assert_eq!("SIMULATE".parse::<Mode>().unwrap(), Mode::Simulate);
        assert_eq!(" Simulate ".parse::<Mode>().unwrap(), Mode::Simulate);
    }

    #[test]
    fn mode_rejects_unknown_values() {
        let err = "attack".parse::<Mode>().unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("attack"));
        assert!(msg.contains("assist"));
    }

    // ── Conversation input ───────────────────────────────────────────────────

    #[test]
    fn message_roles_serialize_lowercase() {
        let json = serde_json::to_value(Message::user("hi")).unwrap();
        assert_eq!(json, serde_json::json!({ "role": "user", "content": "hi" }));

        let decoded: Message =
            serde_json::from_value(serde_json::json!({ "role": "assistant", "content": "ok" }))
                .unwrap();
        assert_eq!(decoded.role, Role::Assistant);
    }

    #[test]
    fn request_deserializes_with_defaults() {
        let req: ConversationRequest = serde_json::from_value(serde_json::json!({
            "messages": [{ "role": "user", "content": "Investigate scans" }]
        }))
        .unwrap();

        assert_eq!(req.mode, Mode::Assist);
        assert!(req.scenario_id.is_none());
        assert!(req.conversation_id.is_none());
        assert_eq!(req.messages.len(), 1);
    }

    #[test]
    fn request_builder_sets_optional_fields() {
        let req = ConversationRequest::new(vec![Message::user("x")])
            .with_mode(Mode::Simulate)
            .with_scenario("lab-7")
            .with_conversation("conv-1");

        assert_eq!(req.mode, Mode::Simulate);
        assert_eq!(req.scenario_id.as_deref(), Some("lab-7"));
        assert_eq!(req.conversation_id.as_deref(), Some("conv-1"));
    }

    // ── Identifiers ──────────────────────────────────────────────────────────

    #[test]
    fn step_id_new_produces_unique_values() {
        let unique: std::collections::HashSet<String> =
            (0..100).map(|_| StepId::new().to_string()).collect();
        assert_eq!(unique.len(), 100);
    }

    #[test]
    fn run_id_new_produces_unique_values() {
        assert_ne!(RunId::new(), RunId::new());
    }

    // ── ToolCall ─────────────────────────────────────────────────────────────

    #[test]
    fn tool_call_args_default_to_empty() {
        let call: ToolCall = serde_json::from_value(serde_json::json!({ "name": "nmap" })).unwrap();
        assert_eq!(call, ToolCall::new("nmap"));
        assert!(call.args.is_empty());
    }

    // ── BastionError display messages ────────────────────────────────────────

    #[test]
    fn error_agent_failed_display() {
        let err = BastionError::AgentFailed {
            agent: "defender".to_string(),
            reason: "telemetry timeout".to_string(),
        };
        let msg = err.to_string();
        assert!(msg.contains("defender"));
        assert!(msg.contains("telemetry timeout"));
    }

    #[test]
    fn error_verification_failed_display() {
        let err = BastionError::VerificationFailed {
            agent: "toolsmith".to_string(),
            reason: "required field missing".to_string(),
        };
        let msg = err.to_string();
        assert!(msg.contains("verification failed"));
        assert!(msg.contains("toolsmith"));
    }

    #[test]
    fn error_empty_conversation_display() {
        assert!(BastionError::EmptyConversation
            .to_string()
            .contains("at least one message"));
    }

    #[test]
    fn error_config_error_display() {
        let err = BastionError::ConfigError {
            reason: "missing allowlist".to_string(),
        };
        let msg = err.to_string();
        assert!(msg.contains("configuration error"));
        assert!(msg.contains("missing allowlist"));
    }
}
