//! Per-consultation lifecycle
//!
//! `Idle -> Cleared -> FactsAsserted -> Diagnosed -> Explained -> Done`
//!
//! `Done` is terminal. Every request starts a fresh consultation at `Idle`.
//! Out-of-order transitions are programming errors and panic.

use std::fmt;

use crate::facts::{Fact, FactStore};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConsultationState {
    Idle,
    Cleared,
    FactsAsserted,
    Diagnosed,
    Explained,
    Done,
}

impl ConsultationState {
    /// The only state reachable from `self`
    pub fn next(self) -> Option<ConsultationState> {
        use ConsultationState::*;
        match self {
            Idle => Some(Cleared),
            Cleared => Some(FactsAsserted),
            FactsAsserted => Some(Diagnosed),
            Diagnosed => Some(Explained),
            Explained => Some(Done),
            Done => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ConsultationState::Idle => "IDLE",
            ConsultationState::Cleared => "CLEARED",
            ConsultationState::FactsAsserted => "FACTS_ASSERTED",
            ConsultationState::Diagnosed => "DIAGNOSED",
            ConsultationState::Explained => "EXPLAINED",
            ConsultationState::Done => "DONE",
        }
    }
}

impl fmt::Display for ConsultationState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One consultation: its own fact store and its position in the lifecycle.
#[derive(Debug)]
pub struct Consultation {
    state: ConsultationState,
    store: FactStore,
}

impl Consultation {
    pub fn new() -> Self {
        Self {
            state: ConsultationState::Idle,
            store: FactStore::new(),
        }
    }

    pub fn state(&self) -> ConsultationState {
        self.state
    }

    pub fn store(&self) -> &FactStore {
        &self.store
    }

    /// Moves to `to`, which must directly follow the current state.
    pub fn advance(&mut self, to: ConsultationState) {
        assert_eq!(
            self.state.next(),
            Some(to),
            "illegal consultation transition {} -> {}",
            self.state,
            to
        );
        self.state = to;
    }

    pub fn clear(&mut self) {
        self.store.clear();
        self.advance(ConsultationState::Cleared);
    }

    /// Asserts pre-validated facts.
    pub fn assert_facts(&mut self, facts: impl IntoIterator<Item = Fact>) {
        assert_eq!(self.state, ConsultationState::Cleared, "facts asserted before clear");
        for fact in facts {
            self.store.insert(fact);
        }
        self.advance(ConsultationState::FactsAsserted);
    }
}

impl Default for Consultation {
    fn default() -> Self {
        Self::new()
    }
}
