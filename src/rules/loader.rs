//! Rule base loader
//!
//! Reads a rule source once at startup, compiles it and reports load
//! warnings. Any error is fatal for the caller.

use std::fs;
use std::path::Path;

use crate::observability::{log_event_with_fields, Event, ObservationScope};

use super::base::RuleBase;
use super::compiler::compile;
use super::errors::{LoadErrorKind, RuleBaseLoadError, RuleLoadResult};
use super::lexer::tokenize;
use super::parser::parse;

/// Source name used for rule bases not read from disk
pub const MEMORY_SOURCE: &str = "<memory>";

pub struct RuleBaseLoader;

impl RuleBaseLoader {
    /// Loads and compiles the rule file at `path`.
    pub fn load_file(path: &Path) -> RuleLoadResult<RuleBase> {
        let source_name = path.display().to_string();
        let text = fs::read_to_string(path).map_err(|e| {
            RuleBaseLoadError::at(0, 0, LoadErrorKind::Io(e.to_string())).with_source(&source_name)
        })?;
        Self::load_named(&source_name, &text)
    }

    /// Compiles rule source held in memory.
    pub fn load_str(text: &str) -> RuleLoadResult<RuleBase> {
        Self::load_named(MEMORY_SOURCE, text)
    }

    /// Compiles `text`, labelling errors and metadata with `source_name`.
    pub fn load_named(source_name: &str, text: &str) -> RuleLoadResult<RuleBase> {
        let scope = ObservationScope::with_fields("RULEBASE_LOAD", &[("source", source_name)]);

        let compiled = match tokenize(text)
            .and_then(parse)
            .and_then(|clauses| compile(&clauses))
        {
            Ok(compiled) => compiled,
            Err(e) => {
                let e = e.with_source(source_name);
                scope.fail_fatal(&e.to_string());
                return Err(e);
            }
        };

        let rule_base = RuleBase::from_compiled(compiled, source_name, crc32fast::hash(text.as_bytes()));

        for warning in rule_base.warnings() {
            let line = warning.line.to_string();
            log_event_with_fields(
                Event::RuleBaseWarning,
                &[("line", &line), ("message", &warning.message), ("source", source_name)],
            );
        }

        let info = rule_base.info();
        scope.complete_with_fields(&[
            ("checksum", &info.checksum),
            ("diagnosis_rules", &info.diagnosis_rules.to_string()),
            ("safety_rules", &info.safety_rules.to_string()),
            ("warnings", &info.warnings.len().to_string()),
        ]);

        Ok(rule_base)
    }
}
