//! TOML-driven allowlist policy.
//!
//! `AllowlistPolicy` loads an `AllowlistConfig` from a TOML string or file
//! and implements the `ToolPolicy` trait from bastion-core.
//!
//! Evaluation algorithm:
//!
//! 1. Look the tool name up in the allowlist.
//! 2. Absent → a single `tool_not_allowed` hit; nothing else is checked.
//! 3. Present → split the rule's flag argument on whitespace and report
//!    `flag_not_allowed:<flag>` for every flag token outside the allowed set,
//!    in token order.
//!
//! Hits are audit signals. This engine never blocks anything itself.

use std::collections::BTreeMap;
use std::path::Path;

use tracing::{debug, warn};

use bastion_contracts::{
    error::{BastionError, BastionResult},
    trace::PolicyHit,
};
use bastion_core::traits::ToolPolicy;

use crate::rule::AllowlistConfig;

/// The allowlist shipped with the crate.
pub const BUILTIN_ALLOWLIST: &str = include_str!("../policies/tool_allowlist.toml");

/// A `ToolPolicy` backed by a tool/flag allowlist.
///
/// ```rust,ignore
/// use bastion_policy::AllowlistPolicy;
///
/// let policy = AllowlistPolicy::from_file(Path::new("policies/tool_allowlist.toml"))?;
/// ```
#[derive(Debug, Clone)]
pub struct AllowlistPolicy {
    config: AllowlistConfig,
}

impl AllowlistPolicy {
    /// Wrap an already-built configuration.
    pub fn from_config(config: AllowlistConfig) -> Self {
        Self { config }
    }

    /// Parse `s` as TOML and build an `AllowlistPolicy`.
    ///
    /// Returns `BastionError::ConfigError` if the TOML is malformed or does
    /// not match the `AllowlistConfig` schema.
    pub fn from_toml_str(s: &str) -> BastionResult<Self> {
        let config: AllowlistConfig = toml::from_str(s).map_err(|e| BastionError::ConfigError {
            reason: format!("failed to parse allowlist TOML: {}", e),
        })?;
        Ok(Self { config })
    }

    /// Read the file at `path` and parse it as an allowlist.
    pub fn from_file(path: &Path) -> BastionResult<Self> {
        let contents = std::fs::read_to_string(path).map_err(|e| BastionError::ConfigError {
            reason: format!("failed to read allowlist file '{}': {}", path.display(), e),
        })?;
        Self::from_toml_str(&contents)
    }

    /// The built-in allowlist: `nmap` with `-sS -sV -Pn -T4`.
    pub fn builtin() -> BastionResult<Self> {
        Self::from_toml_str(BUILTIN_ALLOWLIST)
    }

    /// Names of every allowlisted tool, sorted.
    pub fn allowed_tools(&self) -> impl Iterator<Item = &str> {
        self.config.tools.keys().map(String::as_str)
    }

    pub fn config(&self) -> &AllowlistConfig {
        &self.config
    }
}

impl ToolPolicy for AllowlistPolicy {
    fn validate_tool_request(&self, name: &str, args: &BTreeMap<String, String>) -> Vec<PolicyHit> {
        let Some(rule) = self.config.tools.get(name) else {
            warn!(tool = %name, "tool is not on the allowlist");
            return vec![PolicyHit::ToolNotAllowed];
        };

        let hits = rule.disallowed_flags(args);
        if hits.is_empty() {
            debug!(tool = %name, flag_argument = %rule.flag_argument, "tool request within allowlist");
        } else {
            warn!(
                tool = %name,
                hit_count = hits.len(),
                "tool request carries flags outside the allowlist"
            );
        }
        hits
    }
}
