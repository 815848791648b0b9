//! Immutable rule base
//!
//! Built once at startup and shared read-only between consultations
//! (typically behind an `Arc`). Nothing here has interior mutability, so
//! concurrent readers need no locking.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::facts::Token;

use super::compiler::CompiledRules;
use super::types::{DiagnosisRule, LoadWarning, SafetyRule, Template};

/// Load metadata, reported by `check` and `GET /rules`.
#[derive(Debug, Clone, Serialize)]
pub struct RuleBaseInfo {
    /// File path or `<memory>`
    pub source: String,
    /// CRC32 of the source text, lowercase hex
    pub checksum: String,
    pub loaded_at: DateTime<Utc>,
    pub diagnosis_rules: usize,
    pub safety_rules: usize,
    pub contraindications: usize,
    pub explanations: usize,
    pub warnings: Vec<LoadWarning>,
}

#[derive(Debug)]
pub struct RuleBase {
    diagnosis_rules: Vec<DiagnosisRule>,
    safety_rules: Vec<SafetyRule>,
    contraindications: Vec<(Token, Token)>,
    explanations: BTreeMap<Token, Template>,
    info: RuleBaseInfo,
}

impl RuleBase {
    pub(crate) fn from_compiled(
        compiled: CompiledRules,
        source: impl Into<String>,
        checksum: u32,
    ) -> Self {
        let info = RuleBaseInfo {
            source: source.into(),
            checksum: format!("{:08x}", checksum),
            loaded_at: Utc::now(),
            diagnosis_rules: compiled.diagnosis_rules.len(),
            safety_rules: compiled.safety_rules.len(),
            contraindications: compiled.contraindications.len(),
            explanations: compiled.explanations.len(),
            warnings: compiled.warnings,
        };

        Self {
            diagnosis_rules: compiled.diagnosis_rules,
            safety_rules: compiled.safety_rules,
            contraindications: compiled.contraindications,
            explanations: compiled.explanations,
            info,
        }
    }

    /// Diagnosis rules in declaration order
    pub fn diagnosis_rules(&self) -> &[DiagnosisRule] {
        &self.diagnosis_rules
    }

    /// Compiled safety triggers in declaration order
    pub fn safety_rules(&self) -> &[SafetyRule] {
        &self.safety_rules
    }

    /// Declared `contraindicated(Treatment, Allergy)` facts
    pub fn contraindications(&self) -> &[(Token, Token)] {
        &self.contraindications
    }

    pub fn is_contraindicated(&self, treatment: &str, allergy: &str) -> bool {
        self.contraindications
            .iter()
            .any(|(t, a)| t == treatment && a == allergy)
    }

    /// Custom explanation template declared for `disease`, if any
    pub fn explanation_for(&self, disease: &str) -> Option<&Template> {
        self.explanations.get(disease)
    }

    pub fn warnings(&self) -> &[LoadWarning] {
        &self.info.warnings
    }

    pub fn info(&self) -> &RuleBaseInfo {
        &self.info
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::RuleBaseLoader;

    #[test]
    fn test_rule_base_is_shareable() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<RuleBase>();
    }

    #[test]
    fn test_accessors() {
        let rb = RuleBaseLoader::load_str(
            "diagnose(flu, rest) :- has_symptom(fever).\n\
             contraindicated(rest, dust).\n\
             explain_diagnosis(flu, 'because {symptoms}').",
        )
        .unwrap();

        assert_eq!(rb.diagnosis_rules().len(), 1);
        assert!(rb.is_contraindicated("rest", "dust"));
        assert!(!rb.is_contraindicated("dust", "rest"));
        assert!(rb.explanation_for("flu").is_some());
        assert!(rb.explanation_for("cold").is_none());

        let info = rb.info();
        assert_eq!(info.source, "<memory>");
        assert_eq!(info.checksum.len(), 8);
        assert_eq!(info.diagnosis_rules, 1);
        assert_eq!(info.contraindications, 1);
        assert_eq!(info.explanations, 1);
    }
}
