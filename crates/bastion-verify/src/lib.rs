//! # bastion-verify
//!
//! Output verification for BASTION agents.
//!
//! [`SchemaVerifier`] implements [`Verifier`](bastion_core::traits::Verifier):
//! an agent that declares an `OutputSchema` has its outputs checked against
//! the schema's JSON Schema document and semantic rules before the
//! coordinator records its step.
//!
//! ```rust,ignore
//! use bastion_verify::SchemaVerifier;
//!
//! let mut verifier = SchemaVerifier::new();
//! verifier.register_rule("has-target", Box::new(|outputs| {
//!     (!outputs.contains_key("target")).then(|| "no target".to_string())
//! }));
//! ```

pub mod engine;
pub mod rules;

pub use engine::{CustomVerifierFn, SchemaVerifier, JSON_SCHEMA_RULE_ID};
pub use rules::resolve_path;

// ── Tests ─────────────────────────────────────────────────────────────────────
