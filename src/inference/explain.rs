//! Explanation rendering
//!
//! An explanation names the symptoms that satisfied the rule which
//! produced a diagnosis. Rule bases may override the wording per disease
//! with `explain_diagnosis/2`.

use serde::Serialize;

use crate::facts::Token;
use crate::rules::{DiagnosisRule, MatchMode, RuleBase, Template};

const DEFAULT_TEMPLATE: &str = "matched because symptoms {{symptoms}} present";
const EXACT_TEMPLATE: &str = "matched because exactly symptoms {{symptoms}} present";

/// The rule evaluation behind one diagnosis
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExplanationTrace {
    pub disease: Token,
    pub treatment: Token,
    /// Satisfied conditions in rule declaration order
    pub symptoms: Vec<Token>,
    pub match_mode: MatchMode,
    /// Source line of the producing rule
    pub rule_line: usize,
}

impl ExplanationTrace {
    pub fn from_rule(rule: &DiagnosisRule) -> Self {
        Self {
            disease: rule.disease.clone(),
            treatment: rule.treatment.clone(),
            symptoms: rule.conditions.clone(),
            match_mode: rule.match_mode,
            rule_line: rule.line,
        }
    }
}

pub struct ExplanationBuilder<'a> {
    rules: &'a RuleBase,
}

impl<'a> ExplanationBuilder<'a> {
    pub fn new(rules: &'a RuleBase) -> Self {
        Self { rules }
    }

    pub fn render(&self, trace: &ExplanationTrace) -> String {
        let symptoms = trace
            .symptoms
            .iter()
            .map(Token::as_str)
            .collect::<Vec<_>>()
            .join(", ");

        let vars = [
            ("symptoms", symptoms.as_str()),
            ("disease", trace.disease.as_str()),
            ("treatment", trace.treatment.as_str()),
        ];

        match self.rules.explanation_for(trace.disease.as_str()) {
            Some(template) => template.render(&vars),
            None => {
                let fallback = match trace.match_mode {
                    MatchMode::Subset => DEFAULT_TEMPLATE,
                    MatchMode::Exact => EXACT_TEMPLATE,
                };
                Template::new(fallback).render(&vars)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::RuleBaseLoader;

    fn trace_for(rb: &RuleBase, disease: &str) -> ExplanationTrace {
        let rule = rb
            .diagnosis_rules()
            .iter()
            .find(|r| r.disease == disease)
            .unwrap();
        ExplanationTrace::from_rule(rule)
    }

    #[test]
    fn test_default_wording() {
        let rb = RuleBaseLoader::load_str(
            "diagnose(flu, rest) :- has_symptom(fever), has_symptom(cough).",
        )
        .unwrap();
        let text = ExplanationBuilder::new(&rb).render(&trace_for(&rb, "flu"));
        assert_eq!(text, "matched because symptoms {fever, cough} present");
    }

    #[test]
    fn test_exact_wording() {
        let rb = RuleBaseLoader::load_str(
            "diagnose(cold, rest) :- has_symptom(runny_nose), no_other_symptoms.",
        )
        .unwrap();
        let text = ExplanationBuilder::new(&rb).render(&trace_for(&rb, "cold"));
        assert_eq!(text, "matched because exactly symptoms {runny_nose} present");
    }

    #[test]
    fn test_custom_template() {
        let rb = RuleBaseLoader::load_str(
            "diagnose(flu, rest) :- has_symptom(fever), has_symptom(cough).\n\
             explain_diagnosis(flu, '{disease} suspected from {symptoms}; prescribe {treatment}').",
        )
        .unwrap();
        let text = ExplanationBuilder::new(&rb).render(&trace_for(&rb, "flu"));
        assert_eq!(text, "flu suspected from fever, cough; prescribe rest");
    }

    #[test]
    fn test_trace_records_rule_line() {
        let rb = RuleBaseLoader::load_str(
            "% header\n\ndiagnose(flu, rest) :- has_symptom(fever).",
        )
        .unwrap();
        assert_eq!(trace_for(&rb, "flu").rule_line, 3);
    }
}
