//! Observable events
//!
//! Stable UPPER_SNAKE names. Begin/complete pairs around rule loading and
//! consultations are emitted by `ObservationScope` under the `RULEBASE_LOAD`
//! and `CONSULTATION` scope names.

use std::fmt;

use super::logger::Severity;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    // Lifecycle
    StartupBegin,
    StartupComplete,
    ConfigLoaded,
    Serving,
    ShutdownComplete,

    // Rule base
    RuleBaseWarning,

    // Consultation
    SafetyAlertRaised,
    /// Request arrived while no rule base is loaded
    EngineUnavailable,
}

impl Event {
    pub fn as_str(&self) -> &'static str {
        match self {
            Event::StartupBegin => "DOCTOR_DROID_STARTUP_BEGIN",
            Event::StartupComplete => "DOCTOR_DROID_STARTUP_COMPLETE",
            Event::ConfigLoaded => "CONFIG_LOADED",
            Event::Serving => "DOCTOR_DROID_SERVING",
            Event::ShutdownComplete => "SHUTDOWN_COMPLETE",
            Event::RuleBaseWarning => "RULEBASE_WARNING",
            Event::SafetyAlertRaised => "SAFETY_ALERT_RAISED",
            Event::EngineUnavailable => "ENGINE_UNAVAILABLE",
        }
    }

    /// Rejections and refusals are logged at WARN, everything else at INFO
    pub fn severity(&self) -> Severity {
        match self {
            Event::RuleBaseWarning | Event::EngineUnavailable => Severity::Warn,
            _ => Severity::Info,
        }
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL: [Event; 8] = [
        Event::StartupBegin,
        Event::StartupComplete,
        Event::ConfigLoaded,
        Event::Serving,
        Event::ShutdownComplete,
        Event::RuleBaseWarning,
        Event::SafetyAlertRaised,
        Event::EngineUnavailable,
    ];

    #[test]
    fn test_no_event_shadows_a_scope_lifecycle() {
        for event in ALL {
            let name = event.as_str();
            assert!(!name.starts_with("RULEBASE_LOAD"), "{} duplicates the load scope", name);
            assert!(!name.starts_with("CONSULTATION_"), "{} duplicates the consultation scope", name);
        }
    }
}
