//! Runtime error types for the BASTION investigation pipeline.
//!
//! All fallible operations in the pipeline return `BastionResult<T>`.
//! Policy violations are deliberately absent: they are audit signals
//! (`PolicyHit`), never errors.

use thiserror::Error;

/// The unified error type for the BASTION runtime.
#[derive(Debug, Error)]
pub enum BastionError {
    /// The caller supplied no messages. Rejected before any phase runs.
    #[error("conversation must contain at least one message")]
    EmptyConversation,

    /// An agent's `act()` reported a failure. The run is aborted.
    #[error("agent '{agent}' failed: {reason}")]
    AgentFailed { agent: String, reason: String },

    /// The verifier rejected an agent's outputs before the step was recorded.
    #[error("output verification failed for agent '{agent}': {reason}")]
    VerificationFailed { agent: String, reason: String },

    /// A toolsmith produced a tool descriptor that is not a `{name, args}` record.
    #[error("malformed tool request: {reason}")]
    MalformedToolRequest { reason: String },

    /// The audit writer could not persist a trace step.
    ///
    /// Fatal: a step that cannot be audited cannot be returned.
    #[error("audit write failed: {reason}")]
    AuditWriteFailed { reason: String },

    /// A required configuration value is missing or invalid.
    #[error("configuration error: {reason}")]
    ConfigError { reason: String },

    /// A mode tag other than `assist` or `simulate`.
    #[error("invalid mode '{value}': expected 'assist' or 'simulate'")]
    InvalidMode { value: String },

    /// A policy hit code that is neither `tool_not_allowed` nor `flag_not_allowed:<flag>`.
    #[error("unrecognized policy hit code '{code}'")]
    InvalidPolicyHit { code: String },
}

/// Convenience alias used throughout the BASTION crates.
pub type BastionResult<T> = Result<T, BastionError>;
