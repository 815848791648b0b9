//! Inference over a loaded rule base
//!
//! `diagnose` walks diagnosis rules in declaration order and keeps the
//! first `(disease, treatment)` per disease. `explain` re-evaluates the rule
//! that produced a disease and renders which symptoms satisfied it.
//!
//! Fact stores are passed in explicitly. The engine itself is stateless
//! apart from the shared, immutable rule base.

mod engine;
mod explain;

pub use engine::{DiagnosisCandidate, InferenceEngine};
pub use explain::{ExplanationBuilder, ExplanationTrace};
