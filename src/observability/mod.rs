//! Observability subsystem
//!
//! - Structured logging (JSON lines)
//! - Lock-free consultation counters
//! - Scope-based begin/complete events
//!
//! Patient symptom and allergy tokens are never logged. Consultations are
//! identified by their id and described by counts only.
//!
//! # Usage
//!
//! ```ignore
//! use doctor_droid::observability::{Logger, ObservationScope};
//!
//! Logger::info("CONFIG_LOADED", &[("rules_path", "kb.pl")]);
//!
//! let scope = ObservationScope::new("RULEBASE_LOAD");
//! // ... load ...
//! scope.complete();
//! ```

mod events;
mod logger;
mod metrics;
mod scope;

pub use events::Event;
pub use logger::{Logger, Severity};
pub use metrics::{MetricsRegistry, MetricsSnapshot};
pub use scope::{ObservationScope, Timer};

/// Logs a lifecycle event
pub fn log_event(event: Event) {
    Logger::log(event.severity(), event.as_str(), &[]);
}

/// Logs a lifecycle event with fields
pub fn log_event_with_fields(event: Event, fields: &[(&str, &str)]) {
    Logger::log(event.severity(), event.as_str(), fields);
}
