//! Consultation counters
//!
//! - Counters only, monotonic
//! - Reset only on process start
//! - Lock-free; shared across request handlers via `Arc`

use std::sync::atomic::{AtomicU64, Ordering};

use serde::Serialize;

#[derive(Debug, Default)]
pub struct MetricsRegistry {
    consultations_completed: AtomicU64,
    /// Rejected for invalid tokens or request limits
    consultations_rejected: AtomicU64,
    diagnoses_emitted: AtomicU64,
    warnings_emitted: AtomicU64,
    /// Requests refused because no rule base was loaded
    engine_unavailable: AtomicU64,
}

impl MetricsRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records one successful consultation and what it produced.
    pub fn record_consultation(&self, diagnoses: usize, warnings: usize) {
        self.consultations_completed.fetch_add(1, Ordering::Relaxed);
        self.diagnoses_emitted
            .fetch_add(diagnoses as u64, Ordering::Relaxed);
        self.warnings_emitted
            .fetch_add(warnings as u64, Ordering::Relaxed);
    }

    pub fn increment_rejected(&self) {
        self.consultations_rejected.fetch_add(1, Ordering::Relaxed);
    }

    pub fn increment_engine_unavailable(&self) {
        self.engine_unavailable.fetch_add(1, Ordering::Relaxed);
    }

    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            consultations_completed: self.consultations_completed.load(Ordering::Relaxed),
            consultations_rejected: self.consultations_rejected.load(Ordering::Relaxed),
            diagnoses_emitted: self.diagnoses_emitted.load(Ordering::Relaxed),
            warnings_emitted: self.warnings_emitted.load(Ordering::Relaxed),
            engine_unavailable: self.engine_unavailable.load(Ordering::Relaxed),
        }
    }

    /// Current values as a JSON object
    pub fn to_json(&self) -> String {
        serde_json::to_string(&self.snapshot()).unwrap_or_else(|_| "{}".to_string())
    }
}

/// Point-in-time copy of every counter
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MetricsSnapshot {
    pub consultations_completed: u64,
    pub consultations_rejected: u64,
    pub diagnoses_emitted: u64,
    pub warnings_emitted: u64,
    pub engine_unavailable: u64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::thread;

    #[test]
    fn test_new_registry_is_zero() {
        let snapshot = MetricsRegistry::new().snapshot();
        assert_eq!(snapshot.consultations_completed, 0);
        assert_eq!(snapshot.engine_unavailable, 0);
    }

    #[test]
    fn test_record_consultation() {
        let registry = MetricsRegistry::new();
        registry.record_consultation(2, 1);
        registry.record_consultation(0, 0);
        registry.increment_rejected();

        let snapshot = registry.snapshot();
        assert_eq!(snapshot.consultations_completed, 2);
        assert_eq!(snapshot.diagnoses_emitted, 2);
        assert_eq!(snapshot.warnings_emitted, 1);
        assert_eq!(snapshot.consultations_rejected, 1);
    }

    #[test]
    fn test_to_json() {
        let registry = MetricsRegistry::new();
        registry.increment_engine_unavailable();

        let parsed: serde_json::Value = serde_json::from_str(&registry.to_json()).unwrap();
        assert_eq!(parsed["engine_unavailable"], 1);
        assert_eq!(parsed["consultations_completed"], 0);
    }

    #[test]
    fn test_concurrent_increments() {
        let registry = Arc::new(MetricsRegistry::new());
        let handles: Vec<_> = (0..8)
            .map(|_| {
                let reg = Arc::clone(&registry);
                thread::spawn(move || {
                    for _ in 0..100 {
                        reg.record_consultation(1, 0);
                    }
                })
            })
            .collect();

        for handle in handles {
            handle.join().unwrap();
        }

        let snapshot = registry.snapshot();
        assert_eq!(snapshot.consultations_completed, 800);
        assert_eq!(snapshot.diagnoses_emitted, 800);
    }
}
