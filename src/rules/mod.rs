//! Rule base subsystem
//!
//! Loads the declarative knowledge base once at startup and compiles it
//! into ordered diagnosis rules and safety triggers.
//!
//! # Source format
//!
//! ```text
//! % comment
//! diagnose(flu, rest) :- has_symptom(fever), has_symptom(cough).
//! diagnose(cold, rest) :- has_symptom(runny_nose), no_other_symptoms.
//! contraindicated(rest, dust).
//! safety_alert(w1) :- patient_info(allergy, dust), diagnose(flu, rest), contraindicated(rest, dust).
//! explain_diagnosis(flu, 'fever and cough: {symptoms}').
//! ```
//!
//! # Design Principles
//!
//! - Declaration order is the only priority
//! - Conditions are conjunctions of symptoms (subset match by default)
//! - No negation, disjunction or runtime unification
//! - Immutable after load

mod base;
mod compiler;
mod errors;
mod lexer;
mod loader;
mod parser;
mod types;

pub use base::{RuleBase, RuleBaseInfo};
pub use errors::{LoadErrorKind, RuleBaseLoadError, RuleLoadResult};
pub use loader::{RuleBaseLoader, MEMORY_SOURCE};
pub use types::{DiagnosisRule, LoadWarning, MatchMode, SafetyRule, Template};
