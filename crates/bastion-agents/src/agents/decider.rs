use serde_json::{json, Value};

use bastion_contracts::{error::BastionResult, trace::Outputs, verify::OutputSchema};
use bastion_core::{coordinator::DECISION_KEY, traits::Agent, Blackboard};

use crate::schemas;

pub const NAME: &str = "decider";

/// Output key listing the agents whose observations the decider weighed.
pub const CONSIDERED_KEY: &str = "considered";

/// Weighs the earlier phases and recommends an action.
pub struct Decider;

impl Agent for Decider {
    fn name(&self) -> &str {
        NAME
    }

    fn plan(&self, _goal: &str) -> String {
        "Evaluate risk & cost-benefit; approve or deny containment.".to_string()
    }

    /// Names every agent with observations on the blackboard, sorted.
    fn act(&self, blackboard: &Blackboard) -> BastionResult<Outputs> {
        let considered: Vec<Value> = blackboard
            .all_observations()
            .keys()
            .map(|agent| Value::String(agent.clone()))
            .collect();

        Ok(Outputs::from_iter([
            (
                DECISION_KEY.to_string(),
                json!("Block IP at edge firewall; schedule service validation post-block."),
            ),
            (CONSIDERED_KEY.to_string(), Value::Array(considered)),
        ]))
    }

    fn output_schema(&self) -> Option<OutputSchema> {
        Some(schemas::decider_schema())
    }
}
