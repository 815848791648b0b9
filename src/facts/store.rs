//! Per-consultation fact store
//!
//! Holds symptoms and patient attributes as sets. Nothing here is global:
//! two stores never observe each other's facts.

use std::collections::{BTreeMap, BTreeSet};

use super::errors::FactResult;
use super::token::{Token, TokenKind};

/// Attribute key under which allergies are recorded
pub const ALLERGY: &str = "allergy";

/// An asserted datum.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub enum Fact {
    /// `has_symptom(id)`
    Symptom(Token),
    /// `patient_info(key, value)`
    PatientAttribute { key: Token, value: Token },
}

/// Set of facts for one consultation.
#[derive(Debug, Clone, Default)]
pub struct FactStore {
    symptoms: BTreeSet<Token>,
    attributes: BTreeMap<Token, BTreeSet<Token>>,
}

impl FactStore {
    /// Creates an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Removes every fact. Idempotent.
    pub fn clear(&mut self) {
        self.symptoms.clear();
        self.attributes.clear();
    }

    /// Validates `raw` and asserts it as a symptom.
    ///
    /// Returns `false` if the symptom was already present.
    pub fn assert_symptom(&mut self, raw: &str) -> FactResult<bool> {
        let token = Token::parse(TokenKind::Symptom, raw)?;
        Ok(self.insert(Fact::Symptom(token)))
    }

    /// Validates `key` and `raw` and asserts them as a patient attribute.
    pub fn assert_attribute(&mut self, key: &str, raw: &str) -> FactResult<bool> {
        let key = Token::parse(TokenKind::AttributeKey, key)?;
        let kind = if key == ALLERGY {
            TokenKind::Allergy
        } else {
            TokenKind::AttributeValue
        };
        let value = Token::parse(kind, raw)?;
        Ok(self.insert(Fact::PatientAttribute { key, value }))
    }

    /// Asserts an already validated fact.
    pub fn insert(&mut self, fact: Fact) -> bool {
        match fact {
            Fact::Symptom(token) => self.symptoms.insert(token),
            Fact::PatientAttribute { key, value } => {
                self.attributes.entry(key).or_default().insert(value)
            }
        }
    }

    pub fn has_symptom(&self, symptom: &str) -> bool {
        self.symptoms.contains(symptom)
    }

    pub fn has_attribute(&self, key: &str, value: &str) -> bool {
        self.attributes
            .get(key)
            .map_or(false, |values| values.contains(value))
    }

    /// Returns every value asserted under `key`.
    pub fn attributes_of(&self, key: &str) -> BTreeSet<Token> {
        self.attributes.get(key).cloned().unwrap_or_default()
    }

    /// Symptoms in lexicographic order
    pub fn symptoms(&self) -> impl Iterator<Item = &Token> {
        self.symptoms.iter()
    }

    pub fn symptom_count(&self) -> usize {
        self.symptoms.len()
    }

    /// Total number of distinct facts
    pub fn len(&self) -> usize {
        self.symptoms.len() + self.attributes.values().map(BTreeSet::len).sum::<usize>()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// All facts in a stable order: symptoms first, then attributes by key.
    pub fn facts(&self) -> Vec<Fact> {
        let symptoms = self.symptoms.iter().cloned().map(Fact::Symptom);
        let attributes = self.attributes.iter().flat_map(|(key, values)| {
            values.iter().map(move |value| Fact::PatientAttribute {
                key: key.clone(),
                value: value.clone(),
            })
        });
        symptoms.chain(attributes).collect()
    }
}
