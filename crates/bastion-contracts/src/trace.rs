//! Trace and result types.
//!
//! `TraceStep` is the immutable audit record of one agent invocation.
//! `ConversationResult` is the only thing the pipeline hands back to its caller.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::BastionError;

/// An agent's output payload: an arbitrary JSON object.
pub type Outputs = serde_json::Map<String, serde_json::Value>;

/// Unique identifier of one trace step.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct StepId(pub uuid::Uuid);

impl StepId {
    /// Create a new, unique step ID.
    pub fn new() -> Self {
        Self(uuid::Uuid::new_v4())
    }
}

impl Default for StepId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for StepId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Unique identifier of one pipeline run.
///
/// Every audit event written for the run is keyed by this value.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RunId(pub uuid::Uuid);

impl RunId {
    pub fn new() -> Self {
        Self(uuid::Uuid::new_v4())
    }
}

impl Default for RunId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for RunId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// A tool invocation proposed by the toolsmith. Never executed by the core.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolCall {
    pub name: String,
    #[serde(default)]
    pub args: BTreeMap<String, String>,
}

impl ToolCall {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            args: BTreeMap::new(),
        }
    }

    pub fn with_arg(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.args.insert(key.into(), value.into());
        self
    }
}

/// A coded allowlist violation.
///
/// Serialized as its wire code: `tool_not_allowed` or `flag_not_allowed:<flag>`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub enum PolicyHit {
    /// The tool is not in the allowlist at all.
    ToolNotAllowed,
    /// The tool is allowed but this flag is not.
    FlagNotAllowed(String),
}

impl PolicyHit {
    const TOOL_NOT_ALLOWED: &'static str = "tool_not_allowed";
    const FLAG_NOT_ALLOWED_PREFIX: &'static str = "flag_not_allowed:";

    /// The wire code for this hit.
    pub fn code(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for PolicyHit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PolicyHit::ToolNotAllowed => f.write_str(Self::TOOL_NOT_ALLOWED),
            PolicyHit::FlagNotAllowed(flag) => {
                write!(f, "{}{}", Self::FLAG_NOT_ALLOWED_PREFIX, flag)
            }
        }
    }
}

impl FromStr for PolicyHit {
    type Err = BastionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s == Self::TOOL_NOT_ALLOWED {
            return Ok(PolicyHit::ToolNotAllowed);
        }
        match s.strip_prefix(Self::FLAG_NOT_ALLOWED_PREFIX) {
            Some(flag) if !flag.is_empty() => Ok(PolicyHit::FlagNotAllowed(flag.to_string())),
            _ => Err(BastionError::InvalidPolicyHit {
                code: s.to_string(),
            }),
        }
    }
}

impl From<PolicyHit> for String {
    fn from(hit: PolicyHit) -> Self {
        hit.to_string()
    }
}

impl TryFrom<String> for PolicyHit {
    type Error = BastionError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

/// An immutable record of one agent invocation.
///
/// One per agent per run, in invocation order. Once the coordinator has
/// appended a step to the audit chain it is never modified.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TraceStep {
    pub step_id: StepId,
    /// The agent's stable name (e.g. "toolsmith").
    pub agent: String,
    /// Why the agent did what it did, from `Agent::plan()`.
    pub rationale: String,
    /// The agent's output payload, from `Agent::act()`.
    pub outputs: Outputs,
    /// Tool invocations proposed in this step, in proposal order.
    pub tool_calls: Vec<ToolCall>,
    /// Allowlist violations relevant to this step, in detection order.
    pub policy_hits: Vec<PolicyHit>,
    /// Agent confidence in `[0, 1]`.
    pub confidence: f64,
    /// Wall-clock time the step was recorded (UTC).
    pub timestamp: DateTime<Utc>,
}

/// The single terminal recommendation of a run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FinalDecision {
    pub summary: String,
    /// Risk in `[0, 1]`, derived solely from the run's policy hits.
    pub risk_score: f64,
    pub recommendations: Vec<String>,
}

/// The complete output of one pipeline run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConversationResult {
    /// The run whose audit chain holds these steps.
    pub run_id: RunId,
    /// One step per agent, in canonical phase order.
    pub steps: Vec<TraceStep>,
    #[serde(rename = "final")]
    pub final_decision: FinalDecision,
}

impl ConversationResult {
    /// Every policy hit recorded anywhere in the run, in step order.
    pub fn policy_hits(&self) -> impl Iterator<Item = &PolicyHit> {
        self.steps.iter().flat_map(|s| s.policy_hits.iter())
    }

    /// The step recorded for `agent`, if that agent ran.
    pub fn step_for(&self, agent: &str) -> Option<&TraceStep> {
        self.steps.iter().find(|s| s.agent == agent)
    }
}
