//! doctor_droid - rule-based diagnosis service
//!
//! A consultation validates symptom and allergy tokens, asserts them into
//! a fresh fact store, evaluates an immutable rule base in declaration
//! order, explains each diagnosis and scans for contraindications.

pub mod cli;
pub mod consultation;
pub mod facts;
pub mod http_server;
pub mod inference;
pub mod observability;
pub mod rules;
pub mod safety;
