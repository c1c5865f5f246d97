//! Allowlist configuration schema.
//!
//! An `AllowlistConfig` is deserialized from TOML and maps each permitted
//! tool name to a `ToolRule`. Tools not present are not allowed at all.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use bastion_contracts::trace::PolicyHit;

/// Tokens starting with this marker are treated as flags.
pub const FLAG_MARKER: char = '-';

/// Argument carrying the flag string when a rule does not name one.
pub const DEFAULT_FLAG_ARGUMENT: &str = "scan";

fn default_flag_argument() -> String {
    DEFAULT_FLAG_ARGUMENT.to_string()
}

/// What one allowlisted tool may be invoked with.
///
/// Example in TOML:
/// ```toml
/// [tools.nmap]
/// description = "Port and service discovery"
/// allowed_flags = ["-sS", "-sV", "-Pn", "-T4"]
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolRule {
    /// Human-readable note for operators.
    #[serde(default)]
    pub description: String,

    /// Flag tokens this tool may carry. Matched exactly (case-sensitive).
    #[serde(default)]
    pub allowed_flags: BTreeSet<String>,

    /// Which argument holds the whitespace-separated flag string.
    #[serde(default = "default_flag_argument")]
    pub flag_argument: String,
}

impl ToolRule {
    /// Every flag in `args` this rule does not allow, in token order.
    ///
    /// An invocation without the flag argument yields no hits. Non-flag
    /// tokens (targets, ports) are ignored.
    pub fn disallowed_flags(&self, args: &BTreeMap<String, String>) -> Vec<PolicyHit> {
        let Some(flags) = args.get(&self.flag_argument) else {
            return Vec::new();
        };

        flags
            .split_whitespace()
            .filter(|token| token.starts_with(FLAG_MARKER))
            .filter(|token| !self.allowed_flags.contains(*token))
            .map(|token| PolicyHit::FlagNotAllowed(token.to_string()))
            .collect()
    }
}

/// The top-level structure deserialized from a TOML allowlist file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AllowlistConfig {
    /// Allowlisted tools keyed by the name the toolsmith uses.
    #[serde(default)]
    pub tools: BTreeMap<String, ToolRule>,
}
