use serde_json::json;

use bastion_contracts::{error::BastionResult, trace::Outputs, verify::OutputSchema};
use bastion_core::{traits::Agent, Blackboard};

use crate::schemas;

pub const NAME: &str = "intel_analyst";

/// Gathers threat intelligence on the activity under investigation.
pub struct IntelAnalyst;

impl Agent for IntelAnalyst {
    fn name(&self) -> &str {
        NAME
    }

    fn plan(&self, _goal: &str) -> String {
        "Query CTI + Reddit/SO for recent scanning campaigns & IOCs.".to_string()
    }

    fn act(&self, _blackboard: &Blackboard) -> BastionResult<Outputs> {
        Ok(Outputs::from_iter([(
            "intel".to_string(),
            json!(["Recent mass-scan campaigns on 22/443 reported this week."]),
        )]))
    }

    fn output_schema(&self) -> Option<OutputSchema> {
        Some(schemas::intel_schema())
    }
}
