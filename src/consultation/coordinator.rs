//! Consultation coordinator
//!
//! Runs one request end to end on a fresh fact store. Validation happens
//! before any fact is asserted.

use std::sync::Arc;

use uuid::Uuid;

use crate::facts::{Fact, Token, TokenKind, ALLERGY};
use crate::inference::InferenceEngine;
use crate::observability::{log_event_with_fields, Event, MetricsRegistry, ObservationScope};
use crate::rules::RuleBase;
use crate::safety::SafetyChecker;

use super::errors::{ConsultError, ConsultResult};
use super::state::{Consultation, ConsultationState};
use super::types::{
    ConsultationRequest, ConsultationResult, Diagnosis, MAX_ALLERGIES, MAX_SYMPTOMS,
};

/// Runs consultations against a shared rule base.
///
/// Each call to [`consult`](Self::consult) owns a fresh fact store, so
/// concurrent consultations never observe each other's facts.
pub struct ConsultationCoordinator {
    engine: InferenceEngine,
    checker: SafetyChecker,
    metrics: Arc<MetricsRegistry>,
}

impl ConsultationCoordinator {
    pub fn new(rules: Arc<RuleBase>) -> Self {
        Self::with_metrics(rules, Arc::new(MetricsRegistry::new()))
    }

    pub fn with_metrics(rules: Arc<RuleBase>, metrics: Arc<MetricsRegistry>) -> Self {
        Self {
            engine: InferenceEngine::new(Arc::clone(&rules)),
            checker: SafetyChecker::new(rules),
            metrics,
        }
    }

    pub fn rules(&self) -> &RuleBase {
        self.engine.rules()
    }

    pub fn metrics(&self) -> &Arc<MetricsRegistry> {
        &self.metrics
    }

    /// Diagnoses one patient.
    ///
    /// Every token is validated before anything is asserted; a rejected
    /// request leaves no trace beyond the rejection counter.
    pub fn consult(&self, request: ConsultationRequest) -> ConsultResult<ConsultationResult> {
        let id = Uuid::new_v4();
        let id_str = id.to_string();
        let scope = ObservationScope::with_fields("CONSULTATION", &[("consultation_id", &id_str)]);

        let facts = match validate(&request) {
            Ok(facts) => facts,
            Err(e) => {
                self.metrics.increment_rejected();
                scope.reject(e.code(), &e.to_string());
                return Err(e);
            }
        };

        let mut consultation = Consultation::new();
        consultation.clear();
        consultation.assert_facts(facts);

        let candidates = self.engine.diagnose(consultation.store());
        consultation.advance(ConsultationState::Diagnosed);

        let diagnoses: Vec<Diagnosis> = candidates
            .iter()
            .map(|c| Diagnosis {
                disease: c.disease.clone(),
                treatment: c.treatment.clone(),
                explanation: self.engine.explain(consultation.store(), c.disease.as_str()),
            })
            .collect();
        consultation.advance(ConsultationState::Explained);

        let warnings: Vec<String> = self
            .checker
            .scan(consultation.store(), &candidates)
            .into_iter()
            .collect();
        consultation.advance(ConsultationState::Done);

        if !warnings.is_empty() {
            log_event_with_fields(
                Event::SafetyAlertRaised,
                &[("consultation_id", &id_str), ("warnings", &warnings.len().to_string())],
            );
        }

        self.metrics.record_consultation(diagnoses.len(), warnings.len());
        scope.complete_with_fields(&[
            ("diagnoses", &diagnoses.len().to_string()),
            ("symptoms", &consultation.store().symptom_count().to_string()),
            ("warnings", &warnings.len().to_string()),
        ]);

        Ok(ConsultationResult {
            status: "success",
            patient_data: request.into(),
            diagnoses,
            warnings,
            consultation_id: id,
        })
    }
}

/// Checks limits and parses every token into a fact.
fn validate(request: &ConsultationRequest) -> ConsultResult<Vec<Fact>> {
    let allergies = request.allergies();
    check_limit("symptoms", request.symptoms.len(), MAX_SYMPTOMS)?;
    check_limit("allergies", allergies.len(), MAX_ALLERGIES)?;

    let allergy_key = Token::parse(TokenKind::AttributeKey, ALLERGY)?;
    let mut facts = Vec::with_capacity(request.symptoms.len() + allergies.len());

    for raw in &request.symptoms {
        facts.push(Fact::Symptom(Token::parse(TokenKind::Symptom, raw)?));
    }
    for raw in allergies {
        facts.push(Fact::PatientAttribute {
            key: allergy_key.clone(),
            value: Token::parse(TokenKind::Allergy, raw)?,
        });
    }

    Ok(facts)
}

fn check_limit(field: &'static str, count: usize, limit: usize) -> ConsultResult<()> {
    if count > limit {
        return Err(ConsultError::TooManyItems { field, count, limit });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::RuleBaseLoader;

    const KB: &str = "\
        diagnose(flu, rest) :- has_symptom(fever), has_symptom(cough).\n\
        contraindicated(rest, dust).\n\
        safety_alert(w1) :- patient_info(allergy, dust), diagnose(flu, rest), contraindicated(rest, dust).\n";

    fn coordinator() -> ConsultationCoordinator {
        ConsultationCoordinator::new(Arc::new(RuleBaseLoader::load_str(KB).unwrap()))
    }

    #[test]
    fn test_consult_success() {
        let c = coordinator();
        let result = c
            .consult(ConsultationRequest::new(["fever", "cough"], ["dust"]))
            .unwrap();

        assert_eq!(result.status, "success");
        assert_eq!(result.diseases().collect::<Vec<_>>(), vec!["flu"]);
        assert_eq!(result.diagnoses[0].treatment, "rest");
        assert!(!result.diagnoses[0].explanation.is_empty());
        assert_eq!(result.warnings, vec!["w1".to_string()]);
        assert_eq!(result.patient_data.symptoms, vec!["fever", "cough"]);
    }

    #[test]
    fn test_invalid_token_rejected() {
        let c = coordinator();
        let err = c
            .consult(ConsultationRequest::new(["fever", "cough)"], []))
            .unwrap_err();
        assert!(matches!(err, ConsultError::InvalidToken(_)));
        assert_eq!(c.metrics().snapshot().consultations_rejected, 1);
        assert_eq!(c.metrics().snapshot().consultations_completed, 0);
    }

    #[test]
    fn test_invalid_allergy_rejected() {
        let c = coordinator();
        let err = c
            .consult(ConsultationRequest::new(["fever"], ["dust; drop"]))
            .unwrap_err();
        assert_eq!(err.code(), "DROID_INVALID_TOKEN");
    }

    #[test]
    fn test_limits() {
        let c = coordinator();
        let symptoms: Vec<String> = (0..=MAX_SYMPTOMS).map(|i| format!("s{}", i)).collect();
        let err = c
            .consult(ConsultationRequest {
                symptoms,
                allergies: None,
            })
            .unwrap_err();
        assert!(matches!(err, ConsultError::TooManyItems { field: "symptoms", .. }));

        let allergies: Vec<String> = (0..=MAX_ALLERGIES).map(|i| format!("a{}", i)).collect();
        let err = c
            .consult(ConsultationRequest {
                symptoms: vec!["fever".into()],
                allergies: Some(allergies),
            })
            .unwrap_err();
        assert!(matches!(err, ConsultError::TooManyItems { field: "allergies", .. }));
    }

    #[test]
    fn test_metrics_recorded() {
        let c = coordinator();
        c.consult(ConsultationRequest::new(["fever", "cough"], ["dust"])).unwrap();
        c.consult(ConsultationRequest::new(["fever"], [])).unwrap();

        let snapshot = c.metrics().snapshot();
        assert_eq!(snapshot.consultations_completed, 2);
        assert_eq!(snapshot.diagnoses_emitted, 1);
        assert_eq!(snapshot.warnings_emitted, 1);
    }

    #[test]
    fn test_unique_consultation_ids() {
        let c = coordinator();
        let a = c.consult(ConsultationRequest::new(["fever"], [])).unwrap();
        let b = c.consult(ConsultationRequest::new(["fever"], [])).unwrap();
        assert_ne!(a.consultation_id, b.consultation_id);
    }
}
