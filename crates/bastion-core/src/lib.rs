//! # bastion-core
//!
//! The deterministic, audited investigation pipeline for BASTION.
//!
//! This crate provides:
//! - The four trait seams (`Agent`, `ToolPolicy`, `AuditWriter`, `Verifier`)
//! - The per-run `Blackboard`, the goal `planner`, and the `trace` recorder
//! - The `Phase` state machine, the fixed `Roster`, and the `Coordinator`
//!   that wires them together in canonical order
//!
//! ## Usage
//!
//! ```rust,ignore
//! use bastion_core::{Coordinator, Roster};
//!
//! let coordinator = Coordinator::new(roster, policy, audit, verifier);
//! let result = coordinator.run(&messages, Mode::Assist, None)?;
//! ```

pub mod blackboard;
pub mod coordinator;
pub mod phase;
pub mod planner;
pub mod trace;
pub mod traits;

pub use blackboard::Blackboard;
pub use coordinator::Coordinator;
pub use phase::{Phase, Roster};
