//! Compiled rule types
//!
//! These are the in-memory form of the rule source. They are built once by
//! the compiler and never mutated afterwards.

use serde::Serialize;

use crate::facts::{FactStore, Token};

/// How a diagnosis rule compares its conditions to the asserted symptoms.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchMode {
    /// Every condition must be present; extra symptoms are allowed.
    Subset,
    /// The asserted symptoms must be exactly the conditions
    /// (`no_other_symptoms` goal).
    Exact,
}

/// `diagnose(Disease, Treatment) :- has_symptom(S1), ..., has_symptom(Sn).`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiagnosisRule {
    pub disease: Token,
    pub treatment: Token,
    /// Required symptoms in declaration order, without duplicates
    pub conditions: Vec<Token>,
    pub match_mode: MatchMode,
    /// Source line of the clause
    pub line: usize,
}

impl DiagnosisRule {
    /// True when `store` satisfies every condition of this rule.
    pub fn matches(&self, store: &FactStore) -> bool {
        let all_present = self
            .conditions
            .iter()
            .all(|symptom| store.has_symptom(symptom.as_str()));

        match self.match_mode {
            MatchMode::Subset => all_present,
            MatchMode::Exact => all_present && store.symptom_count() == self.conditions.len(),
        }
    }
}

/// One compiled contraindication trigger of a `safety_alert/1` clause.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SafetyRule {
    pub treatment: Token,
    pub allergy: Token,
    /// Restricts the trigger to a single diagnosed disease
    pub disease: Option<Token>,
    pub warning: Template,
    pub line: usize,
}

/// Text with `{name}` placeholders.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Template(String);

impl Template {
    pub fn new(text: impl Into<String>) -> Self {
        Self(text.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Substitutes each `{name}` for its value. Unknown placeholders are
    /// left as written.
    pub fn render(&self, vars: &[(&str, &str)]) -> String {
        let mut out = String::with_capacity(self.0.len());
        let mut rest = self.0.as_str();

        while let Some(open) = rest.find('{') {
            out.push_str(&rest[..open]);
            let after = &rest[open + 1..];
            let substituted = after.find('}').and_then(|close| {
                let name = &after[..close];
                vars.iter()
                    .find(|(k, _)| *k == name)
                    .map(|(_, v)| (*v, close))
            });

            match substituted {
                Some((value, close)) => {
                    out.push_str(value);
                    rest = &after[close + 1..];
                }
                None => {
                    out.push('{');
                    rest = after;
                }
            }
        }
        out.push_str(rest);
        out
    }
}

/// Non-fatal finding reported while loading.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LoadWarning {
    pub line: usize,
    pub message: String,
}

impl std::fmt::Display for LoadWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "line {}: {}", self.line, self.message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::facts::TokenKind;

    fn tok(s: &str) -> Token {
        Token::parse(TokenKind::Symptom, s).unwrap()
    }

    fn rule(conditions: &[&str], match_mode: MatchMode) -> DiagnosisRule {
        DiagnosisRule {
            disease: tok("flu"),
            treatment: tok("rest"),
            conditions: conditions.iter().map(|s| tok(s)).collect(),
            match_mode,
            line: 1,
        }
    }

    fn store(symptoms: &[&str]) -> FactStore {
        let mut store = FactStore::new();
        for s in symptoms {
            store.assert_symptom(s).unwrap();
        }
        store
    }

    #[test]
    fn test_subset_match_allows_extra_symptoms() {
        let r = rule(&["fever", "cough"], MatchMode::Subset);
        assert!(r.matches(&store(&["fever", "cough"])));
        assert!(r.matches(&store(&["cough", "fever", "headache"])));
        assert!(!r.matches(&store(&["fever"])));
    }

    #[test]
    fn test_exact_match_rejects_extra_symptoms() {
        let r = rule(&["fever", "cough"], MatchMode::Exact);
        assert!(r.matches(&store(&["fever", "cough"])));
        assert!(!r.matches(&store(&["fever", "cough", "headache"])));
    }

    #[test]
    fn test_template_render() {
        let t = Template::new("{allergy} allergy: avoid {treatment}");
        assert_eq!(
            t.render(&[("treatment", "amoxicillin"), ("allergy", "penicillin")]),
            "penicillin allergy: avoid amoxicillin"
        );
    }

    #[test]
    fn test_template_keeps_unknown_placeholders() {
        let t = Template::new("{unknown} and {treatment} and {");
        assert_eq!(t.render(&[("treatment", "rest")]), "{unknown} and rest and {");
    }
}
