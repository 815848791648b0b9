//! Shared handler state

use std::sync::Arc;

use crate::consultation::{ConsultError, ConsultationCoordinator};
use crate::observability::{log_event, Event, MetricsRegistry};

/// State shared by every handler.
///
/// `coordinator` is `None` when the rule base never loaded; consultation
/// routes then answer 503 instead of an empty result.
#[derive(Clone)]
pub struct AppState {
    coordinator: Option<Arc<ConsultationCoordinator>>,
    metrics: Arc<MetricsRegistry>,
}

impl AppState {
    pub fn new(coordinator: Arc<ConsultationCoordinator>) -> Self {
        let metrics = Arc::clone(coordinator.metrics());
        Self {
            coordinator: Some(coordinator),
            metrics,
        }
    }

    /// State with no engine behind it
    pub fn unavailable() -> Self {
        Self {
            coordinator: None,
            metrics: Arc::new(MetricsRegistry::new()),
        }
    }

    pub fn metrics(&self) -> &MetricsRegistry {
        &self.metrics
    }

    pub fn is_ready(&self) -> bool {
        self.coordinator.is_some()
    }

    /// The coordinator, or `EngineUnavailable` (counted and logged)
    pub fn coordinator(&self) -> Result<&ConsultationCoordinator, ConsultError> {
        match &self.coordinator {
            Some(c) => Ok(c.as_ref()),
            None => {
                self.metrics.increment_engine_unavailable();
                log_event(Event::EngineUnavailable);
                Err(ConsultError::EngineUnavailable)
            }
        }
    }
}
