//! # bastion-policy
//!
//! A TOML-driven tool allowlist for the BASTION investigation pipeline.
//!
//! ## Overview
//!
//! This crate provides [`AllowlistPolicy`], which implements the
//! [`ToolPolicy`](bastion_core::traits::ToolPolicy) trait. Each allowlisted
//! tool declares the flag tokens it may carry; anything else is reported as a
//! policy hit. Tools missing from the allowlist are reported outright.
//!
//! ## Quick start
//!
//! ```rust,ignore
//! use bastion_policy::AllowlistPolicy;
//!
//! let policy = AllowlistPolicy::builtin()?;
//! // Pass `policy` to `bastion_core::Coordinator::new(...)`.
//! ```
//!
//! ## Permissive default
//!
//! An allowlisted tool invoked without its flag argument produces no hits.
//! Tools whose risky options live in other arguments need their own rules.

pub mod engine;
pub mod rule;

pub use engine::{AllowlistPolicy, BUILTIN_ALLOWLIST};
pub use rule::{AllowlistConfig, ToolRule, DEFAULT_FLAG_ARGUMENT};

// ── Tests ─────────────────────────────────────────────────────────────────────
