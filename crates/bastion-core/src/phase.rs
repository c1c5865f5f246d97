//! The coordinator's linear state machine and the roster that fills it.

use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};

use bastion_contracts::error::{BastionError, BastionResult};

use crate::traits::Agent;

/// One state of a pipeline run.
///
/// `Planning → Intel → Attack → Defense → Tooling → Decision → Done`.
/// No branching, no retries, no re-entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    Planning,
    Intel,
    Attack,
    Defense,
    Tooling,
    Decision,
    Done,
}

impl Phase {
    /// The agent phases in canonical order. Trace steps always follow it.
    pub const AGENT_PHASES: [Phase; 5] = [
        Phase::Intel,
        Phase::Attack,
        Phase::Defense,
        Phase::Tooling,
        Phase::Decision,
    ];

    /// The state after this one. `Done` is terminal and maps to itself.
    pub fn next(self) -> Phase {
        match self {
            Phase::Planning => Phase::Intel,
            Phase::Intel => Phase::Attack,
            Phase::Attack => Phase::Defense,
            Phase::Defense => Phase::Tooling,
            Phase::Tooling => Phase::Decision,
            Phase::Decision => Phase::Done,
            Phase::Done => Phase::Done,
        }
    }

    /// Position in `AGENT_PHASES`, or `None` for `Planning` and `Done`.
    ///
    /// Used to restore canonical ordering if phases ever run out of order.
    pub fn ordinal(self) -> Option<usize> {
        Self::AGENT_PHASES.iter().position(|p| *p == self)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Phase::Planning => "planning",
            Phase::Intel => "intel",
            Phase::Attack => "attack",
            Phase::Defense => "defense",
            Phase::Tooling => "tooling",
            Phase::Decision => "decision",
            Phase::Done => "done",
        }
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The fixed five-agent roster, one slot per agent phase.
///
/// Slots are named rather than a `Vec`, so every phase has exactly one agent
/// and steps follow slot order. The agents' `name()`s are the caller's
/// choice; `validate` only rejects names that would collide on the
/// blackboard.
pub struct Roster {
    pub intel: Box<dyn Agent>,
    pub attacker: Box<dyn Agent>,
    pub defender: Box<dyn Agent>,
    pub toolsmith: Box<dyn Agent>,
    pub decider: Box<dyn Agent>,
}

impl Roster {
    /// The agent that runs in `phase`, or `None` for `Planning` and `Done`.
    pub fn agent_for(&self, phase: Phase) -> Option<&dyn Agent> {
        match phase {
            Phase::Intel => Some(self.intel.as_ref()),
            Phase::Attack => Some(self.attacker.as_ref()),
            Phase::Defense => Some(self.defender.as_ref()),
            Phase::Tooling => Some(self.toolsmith.as_ref()),
            Phase::Decision => Some(self.decider.as_ref()),
            Phase::Planning | Phase::Done => None,
        }
    }

    /// Reject empty or duplicate agent names.
    ///
    /// Two agents sharing a name would append to the same blackboard log and
    /// produce indistinguishable trace steps.
    pub fn validate(&self) -> BastionResult<()> {
        let mut seen = BTreeSet::new();
        for phase in Phase::AGENT_PHASES {
            let Some(agent) = self.agent_for(phase) else {
                continue;
            };
            let name = agent.name();
            if name.trim().is_empty() {
                return Err(BastionError::ConfigError {
                    reason: format!("agent in the {} slot has an empty name", phase),
                });
            }
            if !seen.insert(name) {
                return Err(BastionError::ConfigError {
                    reason: format!("agent name '{}' is used by more than one slot", name),
                });
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use bastion_contracts::trace::Outputs;

    use crate::blackboard::Blackboard;

    use super::*;

    struct Named(&'static str);

    impl Agent for Named {
        fn name(&self) -> &str {
            self.0
        }

        fn plan(&self, _goal: &str) -> String {
            String::new()
        }

        fn act(&self, _blackboard: &Blackboard) -> BastionResult<Outputs> {
            Ok(Outputs::new())
        }
    }

    fn roster(names: [&'static str; 5]) -> Roster {
        let [intel, attacker, defender, toolsmith, decider] = names;
        Roster {
            intel: Box::new(Named(intel)),
            attacker: Box::new(Named(attacker)),
            defender: Box::new(Named(defender)),
            toolsmith: Box::new(Named(toolsmith)),
            decider: Box::new(Named(decider)),
        }
    }

    #[test]
    fn distinct_names_validate() {
        let ok = roster(["intel_analyst", "attacker", "defender", "toolsmith", "decider"]);
        assert!(ok.validate().is_ok());
        assert_eq!(ok.agent_for(Phase::Tooling).map(|a| a.name()), Some("toolsmith"));
        assert!(ok.agent_for(Phase::Planning).is_none());
    }

    #[test]
    fn duplicate_name_rejected() {
        let dup = roster(["decider", "attacker", "defender", "toolsmith", "decider"]);
        match dup.validate() {
            Err(BastionError::ConfigError { reason }) => assert!(reason.contains("'decider'")),
            other => panic!("expected ConfigError, got {:?}", other),
        }
    }

    #[test]
    fn empty_name_rejected() {
        let blank = roster(["intel_analyst", " ", "defender", "toolsmith", "decider"]);
        match blank.validate() {
            Err(BastionError::ConfigError { reason }) => assert!(reason.contains("attack slot")),
            other => panic!("expected ConfigError, got {:?}", other),
        }
    }

    #[test]
    fn walks_every_state_once_then_stops() {
        let mut phase = Phase::Planning;
        let mut visited = vec![phase];
        while phase != Phase::Done {
            phase = phase.next();
            visited.push(phase);
        }

        assert_eq!(
            visited,
            vec![
                Phase::Planning,
                Phase::Intel,
                Phase::Attack,
                Phase::Defense,
                Phase::Tooling,
                Phase::Decision,
                Phase::Done,
            ]
        );
        assert_eq!(Phase::Done.next(), Phase::Done);
    }

    #[test]
    fn ordinals_follow_agent_order() {
        assert_eq!(Phase::Planning.ordinal(), None);
        assert_eq!(Phase::Intel.ordinal(), Some(0));
        assert_eq!(Phase::Decision.ordinal(), Some(4));
        assert_eq!(Phase::Done.ordinal(), None);
    }
}
