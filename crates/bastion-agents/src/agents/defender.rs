use serde_json::json;

use bastion_contracts::{error::BastionResult, trace::Outputs, verify::OutputSchema};
use bastion_core::{traits::Agent, Blackboard};

use crate::schemas;

pub const NAME: &str = "defender";

/// Triages the alerts the activity produced on the defending side.
pub struct Defender;

impl Agent for Defender {
    fn name(&self) -> &str {
        NAME
    }

    fn plan(&self, _goal: &str) -> String {
        "Correlate alerts; check EDR/NGFW for scans from suspicious IPs.".to_string()
    }

    fn act(&self, _blackboard: &Blackboard) -> BastionResult<Outputs> {
        Ok(Outputs::from_iter([(
            "triage".to_string(),
            json!("Detected SYN scan spikes from 203.0.113.12; candidate block."),
        )]))
    }

    fn output_schema(&self) -> Option<OutputSchema> {
        Some(schemas::defender_schema())
    }
}
