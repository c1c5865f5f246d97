use serde_json::json;

use bastion_contracts::{error::BastionResult, trace::Outputs, verify::OutputSchema};
use bastion_core::{trace::TOOLS_REQUESTED_KEY, traits::Agent, Blackboard};

use crate::schemas;

pub const NAME: &str = "toolsmith";

/// Prepares tool invocations for approval.
///
/// The toolsmith only proposes: its `tools_requested` list is screened by the
/// policy engine and nothing is ever executed.
pub struct Toolsmith;

impl Agent for Toolsmith {
    fn name(&self) -> &str {
        NAME
    }

    fn plan(&self, _goal: &str) -> String {
        "Prepare safe tool parameters; request approval.".to_string()
    }

    fn act(&self, _blackboard: &Blackboard) -> BastionResult<Outputs> {
        Ok(Outputs::from_iter([(
            TOOLS_REQUESTED_KEY.to_string(),
            json!([{
                "name": "nmap",
                "args": { "target": "203.0.113.12", "scan": "-sS -Pn" }
            }]),
        )]))
    }

    fn output_schema(&self) -> Option<OutputSchema> {
        Some(schemas::toolsmith_schema())
    }
}
