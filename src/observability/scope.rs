//! ObservationScope for begin/complete logging
//!
//! - `{name}_BEGIN` on creation
//! - `{name}_COMPLETE` on `complete`
//! - `{name}_REJECTED` (WARN) on `reject`, for caller errors
//! - `{name}_FAILED` (FATAL) on `fail_fatal`
//! - `{name}_INCOMPLETE` (WARN) if dropped without any of the above

use std::time::Instant;

use super::logger::Logger;

pub struct ObservationScope<'a> {
    name: &'a str,
    finished: bool,
    fields: Vec<(&'a str, String)>,
    timer: Timer,
}

impl<'a> ObservationScope<'a> {
    pub fn new(name: &'a str) -> Self {
        Self::with_fields(name, &[])
    }

    /// Opens a scope whose fields are repeated on every event it logs.
    pub fn with_fields(name: &'a str, fields: &[(&'a str, &str)]) -> Self {
        Logger::info(&format!("{}_BEGIN", name), fields);
        Self {
            name,
            finished: false,
            fields: fields.iter().map(|(k, v)| (*k, v.to_string())).collect(),
            timer: Timer::new(),
        }
    }

    fn merged<'f>(&'f self, extra: &[(&'f str, &'f str)], elapsed: &'f str) -> Vec<(&'f str, &'f str)> {
        let mut all: Vec<(&str, &str)> = self.fields.iter().map(|(k, v)| (*k, v.as_str())).collect();
        all.extend(extra.iter().copied());
        all.push(("elapsed_ms", elapsed));
        all
    }

    pub fn complete(self) {
        self.complete_with_fields(&[]);
    }

    pub fn complete_with_fields(mut self, extra: &[(&str, &str)]) {
        self.finished = true;
        let elapsed = self.timer.elapsed_ms();
        Logger::info(&format!("{}_COMPLETE", self.name), &self.merged(extra, &elapsed));
    }

    /// Caller error; the process carries on.
    pub fn reject(mut self, code: &str, reason: &str) {
        self.finished = true;
        let elapsed = self.timer.elapsed_ms();
        Logger::warn(
            &format!("{}_REJECTED", self.name),
            &self.merged(&[("code", code), ("reason", reason)], &elapsed),
        );
    }

    pub fn fail_fatal(mut self, reason: &str) {
        self.finished = true;
        let elapsed = self.timer.elapsed_ms();
        Logger::fatal(
            &format!("{}_FAILED", self.name),
            &self.merged(&[("reason", reason)], &elapsed),
        );
    }

    pub fn is_finished(&self) -> bool {
        self.finished
    }
}

impl Drop for ObservationScope<'_> {
    fn drop(&mut self) {
        if !self.finished {
            Logger::warn(
                &format!("{}_INCOMPLETE", self.name),
                &[("reason", "scope dropped without completion")],
            );
        }
    }
}

/// Wall-clock timer for `elapsed_ms` fields
pub struct Timer {
    start: Instant,
}

impl Timer {
    pub fn new() -> Self {
        Self {
            start: Instant::now(),
        }
    }

    pub fn elapsed_ms(&self) -> String {
        self.start.elapsed().as_millis().to_string()
    }
}

impl Default for Timer {
    fn default() -> Self {
        Self::new()
    }
}
