//! Semantic rule evaluation over an agent's outputs.

use serde_json::Value;

use bastion_contracts::{trace::Outputs, verify::VerificationRuleType};

/// Resolve a dotted path (e.g. `"tools_requested.0.name"`) against `outputs`.
///
/// Numeric segments index into arrays. Returns `None` when a segment is
/// missing or the value found is JSON `null`.
pub fn resolve_path<'v>(outputs: &'v Outputs, path: &str) -> Option<&'v Value> {
    let mut segments = path.split('.');
    let mut current = outputs.get(segments.next()?)?;

    for segment in segments {
        current = match current {
            Value::Array(items) => items.get(segment.parse::<usize>().ok()?)?,
            other => other.get(segment)?,
        };
    }

    (!current.is_null()).then_some(current)
}

/// Every string reachable from `value`, depth first.
fn strings_in(value: &Value) -> Vec<&str> {
    match value {
        Value::String(s) => vec![s.as_str()],
        Value::Array(items) => items.iter().flat_map(strings_in).collect(),
        Value::Object(map) => map.values().flat_map(strings_in).collect(),
        _ => Vec::new(),
    }
}

/// Evaluate one built-in rule. Returns the failure message, if any.
///
/// `Custom` rules are dispatched by the verifier and yield `None` here.
pub fn check_builtin(outputs: &Outputs, rule_type: &VerificationRuleType) -> Option<String> {
    match rule_type {
        VerificationRuleType::RequiredField { field_path } => resolve_path(outputs, field_path)
            .is_none()
            .then(|| format!("required field '{field_path}' is missing or null")),

        VerificationRuleType::AllowedValues { field_path, allowed } => {
            match resolve_path(outputs, field_path) {
                None => Some(format!(
                    "field '{field_path}' is missing; cannot check allowed values"
                )),
                Some(actual) if allowed.contains(actual) => None,
                Some(actual) => Some(format!(
                    "field '{field_path}' has value {actual} which is not in the allowed set"
                )),
            }
        }

        // Applies to every string under the field, so lists of findings are
        // screened too. An absent field passes.
        VerificationRuleType::ForbiddenPattern { field_path, pattern } => {
            let value = resolve_path(outputs, field_path)?;
            strings_in(value)
                .into_iter()
                .any(|s| s.contains(pattern.as_str()))
                .then(|| format!("field '{field_path}' contains forbidden pattern '{pattern}'"))
        }

        VerificationRuleType::Custom { .. } => None,
    }
}
