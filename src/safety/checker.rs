//! Contraindication scan
//!
//! A warning fires only when a diagnosed treatment and an asserted allergy
//! both match one compiled safety trigger.

use std::collections::BTreeSet;
use std::sync::Arc;

use crate::facts::{FactStore, ALLERGY};
use crate::inference::DiagnosisCandidate;
use crate::rules::{RuleBase, SafetyRule};

/// Scans diagnoses against patient allergies for contraindications.
#[derive(Debug, Clone)]
pub struct SafetyChecker {
    rules: Arc<RuleBase>,
}

impl SafetyChecker {
    pub fn new(rules: Arc<RuleBase>) -> Self {
        Self { rules }
    }

    /// Warnings raised by `diagnoses` for the patient in `store`.
    ///
    /// A rule fires only when its treatment was actually diagnosed (for its
    /// disease, when it names one) and its allergy was asserted. The result is
    /// a set; the same text raised twice appears once.
    pub fn scan(&self, store: &FactStore, diagnoses: &[DiagnosisCandidate]) -> BTreeSet<String> {
        let mut warnings = BTreeSet::new();

        for rule in self.rules.safety_rules() {
            if !store.has_attribute(ALLERGY, rule.allergy.as_str()) {
                continue;
            }
            for candidate in diagnoses.iter().filter(|c| applies(rule, c)) {
                warnings.insert(rule.warning.render(&[
                    ("treatment", rule.treatment.as_str()),
                    ("allergy", rule.allergy.as_str()),
                    ("disease", candidate.disease.as_str()),
                ]));
            }
        }

        warnings
    }
}

fn applies(rule: &SafetyRule, candidate: &DiagnosisCandidate) -> bool {
    candidate.treatment == rule.treatment
        && rule
            .disease
            .as_ref()
            .map_or(true, |disease| *disease == candidate.disease)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::inference::InferenceEngine;
    use crate::rules::RuleBaseLoader;

    const KB: &str = "\
        diagnose(flu, rest) :- has_symptom(fever), has_symptom(cough).\n\
        diagnose(strep, amoxicillin) :- has_symptom(sore_throat).\n\
        diagnose(sinusitis, amoxicillin) :- has_symptom(facial_pain).\n\
        contraindicated(rest, dust).\n\
        contraindicated(amoxicillin, penicillin).\n\
        safety_alert(w1) :- patient_info(allergy, dust), diagnose(flu, rest), contraindicated(rest, dust).\n\
        safety_alert('avoid {treatment} for {disease}: {allergy} allergy') :-\n\
            patient_info(allergy, A), diagnose(_, T), contraindicated(T, A).\n\
        safety_alert(strep_only) :- patient_info(allergy, penicillin), diagnose(strep, amoxicillin).\n";

    fn run(symptoms: &[&str], allergies: &[&str]) -> BTreeSet<String> {
        let rb = Arc::new(RuleBaseLoader::load_str(KB).unwrap());
        let mut store = FactStore::new();
        for s in symptoms {
            store.assert_symptom(s).unwrap();
        }
        for a in allergies {
            store.assert_attribute(ALLERGY, a).unwrap();
        }
        let diagnoses = InferenceEngine::new(Arc::clone(&rb)).diagnose(&store);
        SafetyChecker::new(rb).scan(&store, &diagnoses)
    }

    fn set(items: &[&str]) -> BTreeSet<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_fires_when_treatment_and_allergy_present() {
        assert_eq!(
            run(&["fever", "cough"], &["dust"]),
            set(&["avoid rest for flu: dust allergy", "w1"])
        );
    }

    #[test]
    fn test_requires_allergy() {
        assert!(run(&["fever", "cough"], &[]).is_empty());
        assert!(run(&["fever", "cough"], &["penicillin"]).is_empty());
    }

    #[test]
    fn test_requires_diagnosed_treatment() {
        assert!(run(&["fever"], &["dust"]).is_empty());
    }

    #[test]
    fn test_disease_restriction() {
        assert_eq!(
            run(&["facial_pain"], &["penicillin"]),
            set(&["avoid amoxicillin for sinusitis: penicillin allergy"])
        );
        assert_eq!(
            run(&["sore_throat"], &["penicillin"]),
            set(&["avoid amoxicillin for strep: penicillin allergy", "strep_only"])
        );
    }

    #[test]
    fn test_one_warning_per_rendered_text() {
        let warnings = run(&["sore_throat", "facial_pain"], &["penicillin"]);
        assert_eq!(warnings.len(), 3);
    }

    #[test]
    fn test_identical_text_deduplicated() {
        let rb = Arc::new(
            RuleBaseLoader::load_str(
                "diagnose(a, x) :- has_symptom(s1).\n\
                 diagnose(b, x) :- has_symptom(s2).\n\
                 contraindicated(x, y).\n\
                 safety_alert(warn_x) :- patient_info(allergy, y), diagnose(_, x), contraindicated(x, y).\n",
            )
            .unwrap(),
        );
        let mut store = FactStore::new();
        store.assert_symptom("s1").unwrap();
        store.assert_symptom("s2").unwrap();
        store.assert_attribute(ALLERGY, "y").unwrap();

        let diagnoses = InferenceEngine::new(Arc::clone(&rb)).diagnose(&store);
        assert_eq!(diagnoses.len(), 2);
        assert_eq!(SafetyChecker::new(rb).scan(&store, &diagnoses), set(&["warn_x"]));
    }
}
