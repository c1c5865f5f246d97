//! # bastion-agents
//!
//! The BASTION investigation roster and the default pipeline around it.
//!
//! Five deterministic specialists run in fixed order:
//!
//! 1. **IntelAnalyst** gathers threat intelligence
//! 2. **Attacker** hypothesizes ingress
//! 3. **Defender** triages alerts
//! 4. **Toolsmith** proposes tool invocations for policy screening
//! 5. **Decider** weighs the blackboard and recommends an action
//!
//! None of them touches the network or executes anything.
//!
//! ```rust,ignore
//! use bastion_agents::Pipeline;
//! use bastion_contracts::conversation::{Message, Mode};
//!
//! let pipeline = Pipeline::builtin()?;
//! let result = pipeline.run(&[Message::user("Investigate scans from 203.0.113.12")], Mode::Assist, None)?;
//! assert!(pipeline.audit().verify_integrity(&result.run_id));
//! ```

pub mod agents;
pub mod pipeline;
pub mod schemas;

pub use agents::{default_roster, Attacker, Decider, Defender, IntelAnalyst, Toolsmith};
pub use pipeline::{default_coordinator, run_conversation, Pipeline};

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use serde_json::json;

    use bastion_contracts::trace::Outputs;
    use bastion_core::{
        trace::tool_calls_from_outputs,
        traits::{Agent, Verifier},
        Blackboard, Phase,
    };
    use bastion_verify::SchemaVerifier;

    use crate::{
        agents::decider::CONSIDERED_KEY, default_roster, schemas, Decider, Toolsmith,
    };

    fn outputs(value: serde_json::Value) -> Outputs {
        value.as_object().cloned().unwrap()
    }

    #[test]
    fn test_roster_names_follow_phase_order() {
        let roster = default_roster();
        let names: Vec<&str> = Phase::AGENT_PHASES
            .iter()
            .filter_map(|p| roster.agent_for(*p))
            .map(|a| a.name())
            .collect();

        assert_eq!(
            names,
            vec!["intel_analyst", "attacker", "defender", "toolsmith", "decider"]
        );
    }

    #[test]
    fn test_plans_ignore_goal() {
        let roster = default_roster();
        for phase in Phase::AGENT_PHASES {
            let agent = roster.agent_for(phase).unwrap();
            assert_eq!(agent.plan("a"), agent.plan("something else entirely"));
            assert_eq!(agent.report(), format!("{} completed action.", agent.name()));
        }
    }

    /// Every canned output passes its own schema.
    #[test]
    fn test_canned_outputs_verify() {
        let roster = default_roster();
        let verifier = SchemaVerifier::new();
        let board = Blackboard::new();

        for phase in Phase::AGENT_PHASES {
            let agent = roster.agent_for(phase).unwrap();
            let out = agent.act(&board).unwrap();
            let schema = agent.output_schema().expect("every agent declares a schema");
            let report = verifier.verify(&out, &schema).unwrap();
            assert!(
                report.passed,
                "{} failed {}: {}",
                agent.name(),
                schema.schema_id,
                report.failure_summary()
            );
        }
    }

    #[test]
    fn test_toolsmith_proposes_nmap() {
        let out = Toolsmith.act(&Blackboard::new()).unwrap();
        let calls = tool_calls_from_outputs(&out).unwrap();

        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].name, "nmap");
        assert_eq!(calls[0].args["target"], "203.0.113.12");
        assert_eq!(calls[0].args["scan"], "-sS -Pn");
    }

    /// Argument contents are left to the policy engine; only the shape is
    /// verified.
    #[test]
    fn test_toolsmith_schema_checks_structure_only() {
        let verifier = SchemaVerifier::new();

        let unusual_args = outputs(json!({
            "tools_requested": [{ "name": "curl", "args": { "url": "http://x/?a=1&b=2; id | sh" } }]
        }));
        let report = verifier.verify(&unusual_args, &schemas::toolsmith_schema()).unwrap();
        assert!(report.passed, "unexpected failures: {}", report.failure_summary());

        let numeric_arg = outputs(json!({
            "tools_requested": [{ "name": "nmap", "args": { "ports": 443 } }]
        }));
        let report = verifier.verify(&numeric_arg, &schemas::toolsmith_schema()).unwrap();
        assert!(!report.passed);
    }

    /// The decider names exactly the agents present on the blackboard.
    #[test]
    fn test_decider_reads_blackboard() {
        let mut board = Blackboard::new();
        board.append_observation("defender", outputs(json!({ "triage": "t" })));
        board.append_observation("attacker", outputs(json!({ "hypothesis": "h" })));
        board.append_observation("attacker", outputs(json!({ "hypothesis": "h2" })));

        let out = Decider.act(&board).unwrap();
        assert_eq!(out[CONSIDERED_KEY], json!(["attacker", "defender"]));
        assert!(out["decision"].as_str().unwrap().starts_with("Block IP"));

        let empty = Decider.act(&Blackboard::new()).unwrap();
        assert_eq!(empty[CONSIDERED_KEY], json!([]));
    }

    /// A decider output without `decision` still verifies.
    #[test]
    fn test_decider_decision_optional() {
        let report = SchemaVerifier::new()
            .verify(&outputs(json!({ "considered": [] })), &schemas::decider_schema())
            .unwrap();
        assert!(report.passed);
    }
}
