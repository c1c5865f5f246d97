//! The five specialists of the investigation roster.
//!
//! Every agent is a stateless unit struct with canned, deterministic outputs.
//! Whatever an agent needs from earlier phases it reads from the blackboard
//! the coordinator lends to `act()`.

pub mod attacker;
pub mod decider;
pub mod defender;
pub mod intel_analyst;
pub mod toolsmith;

pub use attacker::Attacker;
pub use decider::Decider;
pub use defender::Defender;
pub use intel_analyst::IntelAnalyst;
pub use toolsmith::Toolsmith;

use bastion_core::Roster;

/// The canonical roster, one agent per phase.
pub fn default_roster() -> Roster {
    Roster {
        intel: Box::new(IntelAnalyst),
        attacker: Box::new(Attacker),
        defender: Box::new(Defender),
        toolsmith: Box::new(Toolsmith),
        decider: Box::new(Decider),
    }
}
