//! Output verification schema and report types.
//!
//! An agent may declare an `OutputSchema` for its outputs. When it does, the
//! coordinator runs the verifier before the step is recorded, and only a
//! passing `VerificationReport` lets the run continue.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// What an agent's outputs are checked against.
///
/// Combines a JSON Schema document with rules JSON Schema cannot express
/// conveniently.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputSchema {
    /// Unique identifier for this schema (e.g. "toolsmith-output-v1").
    pub schema_id: String,
    /// Structural JSON Schema. `Null` means no structural constraint.
    pub json_schema: Value,
    /// Additional rules evaluated after structural validation.
    pub rules: Vec<VerificationRule>,
}

/// A single verification rule applied to agent outputs.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VerificationRule {
    /// Referenced in failure reports.
    pub rule_id: String,
    pub description: String,
    pub rule_type: VerificationRuleType,
}

/// The kinds of checks the verifier supports.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum VerificationRuleType {
    /// The field at `field_path` must be present and non-null.
    RequiredField {
        /// Dotted path, e.g. "tools_requested".
        field_path: String,
    },

    /// The field at `field_path` must equal one of `allowed`.
    AllowedValues {
        field_path: String,
        allowed: Vec<Value>,
    },

    /// The string at `field_path` must not contain `pattern`.
    ForbiddenPattern { field_path: String, pattern: String },

    /// Delegate to a named function registered with the verifier.
    Custom { function_name: String },
}

/// The result of running an `OutputSchema` against one set of outputs.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VerificationReport {
    /// True only if every rule passed.
    pub passed: bool,
    pub failures: Vec<VerificationFailure>,
}

impl VerificationReport {
    /// One-line `[rule] message; ...` summary of every failure.
    pub fn failure_summary(&self) -> String {
        self.failures
            .iter()
            .map(|f| format!("[{}] {}", f.rule_id, f.message))
            .collect::<Vec<_>>()
            .join("; ")
    }
}

/// A single rule failure within a `VerificationReport`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VerificationFailure {
    pub rule_id: String,
    pub message: String,
}
