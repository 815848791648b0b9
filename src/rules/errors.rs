//! Rule base load errors
//!
//! Error codes:
//! - DROID_RULEBASE_LOAD_FAILED (FATAL)
//!
//! A malformed rule source aborts startup. The process never serves with a
//! partially loaded rule base.

use std::fmt;

use thiserror::Error;

/// What went wrong while loading a rule source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadErrorKind {
    /// Source could not be read
    Io(String),
    /// Character outside the clause grammar
    UnexpectedChar(char),
    /// Quoted text not closed before end of input
    UnterminatedText,
    /// `(` without `)` or a stray `)`
    UnbalancedParenthesis,
    /// Clause not terminated by `.`
    MissingTerminator,
    /// Lexeme out of place
    Unexpected {
        found: String,
        expected: &'static str,
    },
    /// Predicate not part of the rule language
    UnknownPredicate { name: String, arity: usize },
    /// Clause head cannot be used here
    InvalidHead(String),
    /// Variables are not allowed in diagnosis rules
    VariableInDiagnosis(String),
    /// `diagnose/2` rule without any `has_symptom/1` condition
    EmptyDiagnosisBody,
    /// Required goal missing from a safety rule
    MissingGoal(&'static str),
    /// Variable never bound to a constant
    UnboundVariable(String),
    /// Quoted text where an identifier is required
    TextNotAllowed(String),
    /// Constant that violates the token grammar
    InvalidToken(String),
    /// `patient_info/2` with a key other than `allergy`
    UnsupportedAttribute(String),
    /// Source defines no diagnosis rules
    EmptyRuleBase,
}

impl fmt::Display for LoadErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LoadErrorKind::Io(msg) => write!(f, "failed to read rule source: {}", msg),
            LoadErrorKind::UnexpectedChar(c) => write!(f, "unexpected character {:?}", c),
            LoadErrorKind::UnterminatedText => write!(f, "unterminated quoted text"),
            LoadErrorKind::UnbalancedParenthesis => write!(f, "unbalanced parenthesis"),
            LoadErrorKind::MissingTerminator => write!(f, "clause is not terminated by '.'"),
            LoadErrorKind::Unexpected { found, expected } => {
                write!(f, "expected {}, found {}", expected, found)
            }
            LoadErrorKind::UnknownPredicate { name, arity } => {
                write!(f, "unknown predicate {}/{}", name, arity)
            }
            LoadErrorKind::InvalidHead(head) => write!(f, "invalid clause head {}", head),
            LoadErrorKind::VariableInDiagnosis(var) => {
                write!(f, "variable {} is not allowed in a diagnosis rule", var)
            }
            LoadErrorKind::EmptyDiagnosisBody => {
                write!(f, "diagnosis rule requires at least one has_symptom/1 condition")
            }
            LoadErrorKind::MissingGoal(goal) => write!(f, "safety rule is missing {}", goal),
            LoadErrorKind::UnboundVariable(var) => write!(f, "variable {} is never bound", var),
            LoadErrorKind::TextNotAllowed(text) => {
                write!(f, "quoted text '{}' is not allowed here", text)
            }
            LoadErrorKind::InvalidToken(reason) => write!(f, "invalid identifier: {}", reason),
            LoadErrorKind::UnsupportedAttribute(key) => {
                write!(f, "patient_info/2 only supports the allergy key, found {}", key)
            }
            LoadErrorKind::EmptyRuleBase => write!(f, "rule source defines no diagnosis rules"),
        }
    }
}

/// Rule base load failure with the offending position and clause.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error(
    "{source_name}:{line}:{column}: {kind}{}",
    .clause.as_ref().map(|c| format!(" in `{}`", c)).unwrap_or_default()
)]
pub struct RuleBaseLoadError {
    /// File path or `<memory>`
    pub source_name: String,
    /// 1-based line, 0 when not tied to a position
    pub line: usize,
    /// 1-based column
    pub column: usize,
    /// Offending clause as written, when one was parsed
    pub clause: Option<String>,
    pub kind: LoadErrorKind,
}

impl RuleBaseLoadError {
    pub(crate) fn at(line: usize, column: usize, kind: LoadErrorKind) -> Self {
        Self {
            source_name: String::new(),
            line,
            column,
            clause: None,
            kind,
        }
    }

    pub(crate) fn with_clause(mut self, clause: impl Into<String>) -> Self {
        self.clause = Some(clause.into());
        self
    }

    pub(crate) fn with_source(mut self, source_name: impl Into<String>) -> Self {
        self.source_name = source_name.into();
        self
    }

    /// Returns the stable error code
    pub fn code(&self) -> &'static str {
        "DROID_RULEBASE_LOAD_FAILED"
    }

    /// Load failures always abort startup
    pub fn is_fatal(&self) -> bool {
        true
    }
}

/// Result type for rule loading
pub type RuleLoadResult<T> = Result<T, RuleBaseLoadError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_includes_position_and_clause() {
        let err = RuleBaseLoadError::at(
            3,
            1,
            LoadErrorKind::UnknownPredicate {
                name: "cures".into(),
                arity: 2,
            },
        )
        .with_clause("cures(flu, rest).")
        .with_source("kb.pl");

        let display = err.to_string();
        assert_eq!(display, "kb.pl:3:1: unknown predicate cures/2 in `cures(flu, rest).`");
    }

    #[test]
    fn test_display_without_clause() {
        let err = RuleBaseLoadError::at(1, 7, LoadErrorKind::UnterminatedText).with_source("kb.pl");
        assert_eq!(err.to_string(), "kb.pl:1:7: unterminated quoted text");
    }

    #[test]
    fn test_always_fatal() {
        let err = RuleBaseLoadError::at(0, 0, LoadErrorKind::EmptyRuleBase);
        assert!(err.is_fatal());
        assert_eq!(err.code(), "DROID_RULEBASE_LOAD_FAILED");
    }
}
