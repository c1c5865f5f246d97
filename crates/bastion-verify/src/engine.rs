//! Schema-based output verifier.
//!
//! `SchemaVerifier` implements the `Verifier` trait from `bastion-core` in
//! two passes:
//!
//! 1. **Structural**: the outputs, as a JSON object, are validated against
//!    `OutputSchema::json_schema` with the `jsonschema` crate.
//! 2. **Semantic**: each `VerificationRule` is evaluated in order.
//!
//! Every failure from both passes ends up in the report.

use std::collections::HashMap;

use serde_json::Value;
use tracing::{debug, warn};

use bastion_contracts::{
    error::BastionResult,
    trace::Outputs,
    verify::{OutputSchema, VerificationFailure, VerificationReport, VerificationRuleType},
};
use bastion_core::traits::Verifier;

use crate::rules::check_builtin;

/// Rule id attached to structural failures.
pub const JSON_SCHEMA_RULE_ID: &str = "json-schema";

/// A caller-supplied check. Returns `Some(message)` on failure.
pub type CustomVerifierFn = Box<dyn Fn(&Outputs) -> Option<String> + Send + Sync>;

/// Verifies agent outputs against declarative schemas.
#[derive(Default)]
pub struct SchemaVerifier {
    custom_rules: HashMap<String, CustomVerifierFn>,
}

impl SchemaVerifier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `f` for `VerificationRuleType::Custom { function_name: name }`.
    ///
    /// Registering a name twice replaces the earlier function.
    pub fn register_rule(&mut self, name: impl Into<String>, f: CustomVerifierFn) {
        self.custom_rules.insert(name.into(), f);
    }

    fn structural_failures(outputs: &Outputs, schema: &OutputSchema) -> Vec<VerificationFailure> {
        if schema.json_schema.is_null() {
            return Vec::new();
        }

        let failure = |message: String| {
            warn!(schema_id = %schema.schema_id, %message, "structural validation failure");
            VerificationFailure {
                rule_id: JSON_SCHEMA_RULE_ID.to_string(),
                message,
            }
        };

        match jsonschema::validator_for(&schema.json_schema) {
            Ok(validator) => {
                let payload = Value::Object(outputs.clone());
                let failures: Vec<VerificationFailure> = validator
                    .iter_errors(&payload)
                    .map(|error| {
                        failure(format!(
                            "JSON Schema violation at '{}': {}",
                            error.instance_path, error
                        ))
                    })
                    .collect();
                failures
            }
            // A broken schema document is reported, not raised, so the run
            // aborts through the normal verification path.
            Err(e) => vec![failure(format!("invalid JSON Schema document: {e}"))],
        }
    }
}

impl Verifier for SchemaVerifier {
    fn verify(&self, outputs: &Outputs, schema: &OutputSchema) -> BastionResult<VerificationReport> {
        let mut failures = Self::structural_failures(outputs, schema);

        for rule in &schema.rules {
            debug!(rule_id = %rule.rule_id, description = %rule.description, "evaluating rule");

            let message = match &rule.rule_type {
                VerificationRuleType::Custom { function_name } => {
                    match self.custom_rules.get(function_name) {
                        Some(f) => f(outputs),
                        None => Some(format!(
                            "no custom rule registered for function name '{function_name}'"
                        )),
                    }
                }
                builtin => check_builtin(outputs, builtin),
            };

            if let Some(message) = message {
                warn!(rule_id = %rule.rule_id, %message, "semantic rule failed");
                failures.push(VerificationFailure {
                    rule_id: rule.rule_id.clone(),
                    message,
                });
            }
        }

        let passed = failures.is_empty();
        debug!(
            schema_id = %schema.schema_id,
            passed,
            failure_count = failures.len(),
            "verification complete"
        );

        Ok(VerificationReport { passed, failures })
    }
}
