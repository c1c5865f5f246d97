//! Output schemas for the roster.
//!
//! Each schema pins the shape later phases and the coordinator rely on. The
//! decider's `decision` is deliberately optional: a missing decision falls
//! back to "No decision." in the final result rather than aborting the run.

use serde_json::{json, Value};

use bastion_contracts::verify::{OutputSchema, VerificationRule, VerificationRuleType};

fn schema(schema_id: &str, json_schema: Value, rules: Vec<VerificationRule>) -> OutputSchema {
    OutputSchema {
        schema_id: schema_id.to_string(),
        json_schema,
        rules,
    }
}

fn required(rule_id: &str, field_path: &str) -> VerificationRule {
    VerificationRule {
        rule_id: rule_id.to_string(),
        description: format!("'{field_path}' must be present"),
        rule_type: VerificationRuleType::RequiredField {
            field_path: field_path.to_string(),
        },
    }
}

/// An object whose single required `key` is a non-empty string.
fn single_text_field(key: &str) -> Value {
    json!({
        "type": "object",
        "required": [key],
        "properties": {
            key: { "type": "string", "minLength": 1 }
        }
    })
}

pub fn intel_schema() -> OutputSchema {
    schema(
        "intel-analyst-output-v1",
        json!({
            "type": "object",
            "required": ["intel"],
            "properties": {
                "intel": {
                    "type": "array",
                    "items": { "type": "string" }
                }
            }
        }),
        vec![required("intel-present", "intel")],
    )
}

pub fn attacker_schema() -> OutputSchema {
    schema(
        "attacker-output-v1",
        single_text_field("hypothesis"),
        vec![required("hypothesis-present", "hypothesis")],
    )
}

pub fn defender_schema() -> OutputSchema {
    schema(
        "defender-output-v1",
        single_text_field("triage"),
        vec![required("triage-present", "triage")],
    )
}

/// Structure only: `{ name, args: { string: string } }` records.
///
/// Argument contents are screened by the policy engine, which records hits
/// instead of stopping the run.
pub fn toolsmith_schema() -> OutputSchema {
    schema(
        "toolsmith-output-v1",
        json!({
            "type": "object",
            "required": ["tools_requested"],
            "properties": {
                "tools_requested": {
                    "type": "array",
                    "items": {
                        "type": "object",
                        "required": ["name"],
                        "properties": {
                            "name": { "type": "string", "minLength": 1 },
                            "args": {
                                "type": "object",
                                "additionalProperties": { "type": "string" }
                            }
                        }
                    }
                }
            }
        }),
        vec![required("tools-present", "tools_requested")],
    )
}

pub fn decider_schema() -> OutputSchema {
    schema(
        "decider-output-v1",
        json!({
            "type": "object",
            "required": ["considered"],
            "properties": {
                "decision": { "type": "string" },
                "considered": {
                    "type": "array",
                    "items": { "type": "string" }
                }
            }
        }),
        Vec::new(),
    )
}
