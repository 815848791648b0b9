//! Declaration-order rule evaluator
//!
//! Rules are evaluated in the order they were declared. The fact store is
//! only ever queried, never iterated, so output order does not depend on its
//! internal representation.

use std::collections::BTreeSet;
use std::sync::Arc;

use serde::Serialize;

use crate::facts::{FactStore, Token};
use crate::rules::{DiagnosisRule, RuleBase};

use super::explain::{ExplanationBuilder, ExplanationTrace};

/// A `(disease, treatment)` pair produced by `diagnose`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DiagnosisCandidate {
    pub disease: Token,
    pub treatment: Token,
}

/// Evaluates a shared rule base against per-consultation fact stores.
///
/// The engine holds no per-consultation state; one instance can serve any
/// number of concurrent consultations.
#[derive(Debug, Clone)]
pub struct InferenceEngine {
    rules: Arc<RuleBase>,
}

impl InferenceEngine {
    pub fn new(rules: Arc<RuleBase>) -> Self {
        Self { rules }
    }

    pub fn rules(&self) -> &RuleBase {
        &self.rules
    }

    /// Diagnoses in declaration order, one per disease.
    ///
    /// When several rules yield the same disease, the first matching rule
    /// decides the treatment.
    pub fn diagnose(&self, store: &FactStore) -> Vec<DiagnosisCandidate> {
        let mut seen: BTreeSet<&Token> = BTreeSet::new();
        let mut candidates = Vec::new();

        for rule in self.rules.diagnosis_rules() {
            if seen.contains(&rule.disease) || !rule.matches(store) {
                continue;
            }
            seen.insert(&rule.disease);
            candidates.push(DiagnosisCandidate {
                disease: rule.disease.clone(),
                treatment: rule.treatment.clone(),
            });
        }

        candidates
    }

    /// First rule for `disease` that `store` satisfies
    fn producing_rule(&self, store: &FactStore, disease: &str) -> Option<&DiagnosisRule> {
        self.rules
            .diagnosis_rules()
            .iter()
            .find(|rule| rule.disease == disease && rule.matches(store))
    }

    /// Re-evaluates the rule that produced `disease`, if any.
    pub fn trace(&self, store: &FactStore, disease: &str) -> Option<ExplanationTrace> {
        self.producing_rule(store, disease).map(ExplanationTrace::from_rule)
    }

    /// Human-readable justification for `disease`.
    ///
    /// Returns an empty string when `store` does not produce `disease`.
    pub fn explain(&self, store: &FactStore, disease: &str) -> String {
        match self.trace(store, disease) {
            Some(trace) => ExplanationBuilder::new(&self.rules).render(&trace),
            None => String::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::RuleBaseLoader;

    fn engine(source: &str) -> InferenceEngine {
        InferenceEngine::new(Arc::new(RuleBaseLoader::load_str(source).unwrap()))
    }

    fn store(symptoms: &[&str]) -> FactStore {
        let mut store = FactStore::new();
        for s in symptoms {
            store.assert_symptom(s).unwrap();
        }
        store
    }

    fn diseases(candidates: &[DiagnosisCandidate]) -> Vec<&str> {
        candidates.iter().map(|c| c.disease.as_str()).collect()
    }

    const KB: &str = "\
        diagnose(flu, rest) :- has_symptom(fever), has_symptom(cough).\n\
        diagnose(cold, fluids) :- has_symptom(cough).\n\
        diagnose(flu, antivirals) :- has_symptom(fever).\n\
        diagnose(allergy, antihistamine) :- has_symptom(sneezing), no_other_symptoms.\n";

    #[test]
    fn test_declaration_order() {
        let e = engine(KB);
        let out = e.diagnose(&store(&["cough", "fever"]));
        assert_eq!(diseases(&out), vec!["flu", "cold"]);
    }

    #[test]
    fn test_dedup_keeps_first_matching_rule() {
        let e = engine(KB);

        let out = e.diagnose(&store(&["fever", "cough"]));
        assert_eq!(out[0].treatment, "rest");

        // First flu rule does not match; the later one decides
        let out = e.diagnose(&store(&["fever"]));
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].treatment, "antivirals");
    }

    #[test]
    fn test_exact_match_rule() {
        let e = engine(KB);
        assert_eq!(diseases(&e.diagnose(&store(&["sneezing"]))), vec!["allergy"]);
        assert_eq!(diseases(&e.diagnose(&store(&["sneezing", "cough"]))), vec!["cold"]);
    }

    #[test]
    fn test_no_match_is_empty() {
        let e = engine(KB);
        assert!(e.diagnose(&store(&["headache"])).is_empty());
        assert!(e.diagnose(&FactStore::new()).is_empty());
    }

    #[test]
    fn test_deterministic() {
        let e = engine(KB);
        let s = store(&["fever", "cough", "sneezing"]);
        let first = e.diagnose(&s);
        for _ in 0..10 {
            assert_eq!(e.diagnose(&s), first);
        }
    }

    #[test]
    fn test_explain_names_satisfied_symptoms() {
        let e = engine(KB);
        let s = store(&["fever", "cough", "headache"]);
        assert_eq!(
            e.explain(&s, "flu"),
            "matched because symptoms {fever, cough} present"
        );
    }

    #[test]
    fn test_explain_follows_producing_rule() {
        let e = engine(KB);
        assert_eq!(
            e.explain(&store(&["fever"]), "flu"),
            "matched because symptoms {fever} present"
        );
    }

    #[test]
    fn test_explain_unknown_disease_is_empty() {
        let e = engine(KB);
        let s = store(&["fever"]);
        assert_eq!(e.explain(&s, "cold"), "");
        assert_eq!(e.explain(&s, "measles"), "");
    }

    #[test]
    fn test_explain_never_empty_for_diagnosed() {
        let e = engine(KB);
        let s = store(&["fever", "cough", "sneezing"]);
        for candidate in e.diagnose(&s) {
            assert!(!e.explain(&s, candidate.disease.as_str()).is_empty());
        }
    }
}
