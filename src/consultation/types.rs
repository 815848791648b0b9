//! Request and response shapes

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::facts::Token;

/// Maximum symptoms accepted in one consultation
pub const MAX_SYMPTOMS: usize = 256;
/// Maximum allergies accepted in one consultation
pub const MAX_ALLERGIES: usize = 64;

/// `{ "symptoms": [...], "allergies": [...]? }`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConsultationRequest {
    pub symptoms: Vec<String>,
    #[serde(default)]
    pub allergies: Option<Vec<String>>,
}

impl ConsultationRequest {
    pub fn new<S: Into<String>>(
        symptoms: impl IntoIterator<Item = S>,
        allergies: impl IntoIterator<Item = S>,
    ) -> Self {
        Self {
            symptoms: symptoms.into_iter().map(Into::into).collect(),
            allergies: Some(allergies.into_iter().map(Into::into).collect()),
        }
    }

    pub fn allergies(&self) -> &[String] {
        self.allergies.as_deref().unwrap_or(&[])
    }
}

/// Echo of the submitted patient, with missing allergies as `[]`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PatientData {
    pub symptoms: Vec<String>,
    pub allergies: Vec<String>,
}

impl From<ConsultationRequest> for PatientData {
    fn from(request: ConsultationRequest) -> Self {
        Self {
            symptoms: request.symptoms,
            allergies: request.allergies.unwrap_or_default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Diagnosis {
    pub disease: Token,
    pub treatment: Token,
    pub explanation: String,
}

/// Successful consultation, serialized as the `/consult` response body.
#[derive(Debug, Clone, Serialize)]
pub struct ConsultationResult {
    pub status: &'static str,
    pub patient_data: PatientData,
    pub diagnoses: Vec<Diagnosis>,
    /// Deduplicated and sorted
    pub warnings: Vec<String>,
    #[serde(skip)]
    pub consultation_id: Uuid,
}

impl ConsultationResult {
    pub fn diseases(&self) -> impl Iterator<Item = &str> {
        self.diagnoses.iter().map(|d| d.disease.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_allergies_optional() {
        let req: ConsultationRequest = serde_json::from_str(r#"{"symptoms":["fever"]}"#).unwrap();
        assert!(req.allergies.is_none());
        assert!(req.allergies().is_empty());

        let echo = serde_json::to_value(PatientData::from(req)).unwrap();
        assert_eq!(echo, serde_json::json!({"symptoms": ["fever"], "allergies": []}));
    }

    #[test]
    fn test_symptoms_required() {
        assert!(serde_json::from_str::<ConsultationRequest>(r#"{"allergies":[]}"#).is_err());
    }

    #[test]
    fn test_result_omits_consultation_id() {
        let result = ConsultationResult {
            status: "success",
            patient_data: ConsultationRequest::new(["fever"], []).into(),
            diagnoses: Vec::new(),
            warnings: Vec::new(),
            consultation_id: Uuid::new_v4(),
        };
        let value = serde_json::to_value(&result).unwrap();
        assert_eq!(value["status"], "success");
        assert!(value.get("consultation_id").is_none());
        assert_eq!(value["patient_data"]["allergies"], serde_json::json!([]));
    }
}
