use serde_json::json;

use bastion_contracts::{error::BastionResult, trace::Outputs, verify::OutputSchema};
use bastion_core::{traits::Agent, Blackboard};

use crate::schemas;

pub const NAME: &str = "attacker";

/// Thinks like the adversary: hypothesizes how the activity gets in.
pub struct Attacker;

impl Agent for Attacker {
    fn name(&self) -> &str {
        NAME
    }

    fn plan(&self, _goal: &str) -> String {
        "Probe external surface for open ports to hypothesize ingress.".to_string()
    }

    fn act(&self, _blackboard: &Blackboard) -> BastionResult<Outputs> {
        Ok(Outputs::from_iter([(
            "hypothesis".to_string(),
            json!("Ports 22/80/443 likely exposed; attempt banner grab."),
        )]))
    }

    fn output_schema(&self) -> Option<OutputSchema> {
        Some(schemas::attacker_schema())
    }
}
