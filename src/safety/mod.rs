//! Contraindication checks
//!
//! Safety rules are compiled into `(treatment, allergy)` triggers when the
//! rule base is loaded. Scanning a consultation only compares those triggers
//! with the diagnosed treatments and the patient's allergy attributes.

mod checker;

pub use checker::SafetyChecker;
