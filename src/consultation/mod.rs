//! Consultation orchestration
//!
//! The boundary external callers use. One consultation:
//!
//! 1. Validate every symptom and allergy token (nothing asserted on failure)
//! 2. Clear a fresh fact store and assert the validated facts
//! 3. Diagnose, explain each diagnosis, scan for contraindications
//! 4. Assemble the result
//!
//! Nothing is cached between consultations. The only shared state is the
//! immutable rule base and the metrics counters.

mod coordinator;
mod errors;
mod state;
mod types;

pub use coordinator::ConsultationCoordinator;
pub use errors::{ConsultError, ConsultResult};
pub use state::{Consultation, ConsultationState};
pub use types::{
    ConsultationRequest, ConsultationResult, Diagnosis, PatientData, MAX_ALLERGIES, MAX_SYMPTOMS,
};
