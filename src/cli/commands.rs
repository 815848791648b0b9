//! CLI command implementations
//!
//! Startup order for `serve`:
//! 1. Configuration load
//! 2. Rule base load (fatal on any error)
//! 3. HTTP server on a tokio runtime

use std::io::{self, Read, Write};
use std::path::Path;
use std::sync::Arc;

use crate::consultation::{ConsultationCoordinator, ConsultationRequest};
use crate::http_server::{AppState, HttpServer};
use crate::observability::{log_event, log_event_with_fields, Event, Logger, MetricsRegistry};
use crate::rules::{RuleBase, RuleBaseLoader};

use super::args::Command;
use super::config::Config;
use super::errors::{CliError, CliResult};
use super::io::{read_request_from, write_error_to, write_json_to};

/// Main CLI entry point. The only function main.rs calls.
pub fn run() -> CliResult<()> {
    let cli = super::args::Cli::parse_args();
    run_command(cli.command)
}

pub fn run_command(cmd: Command) -> CliResult<()> {
    match cmd {
        Command::Serve { config, port } => serve(&config, port),
        Command::Consult { config } => consult(&config),
        Command::Check { rules } => check(&rules),
    }
}

fn load_config(config_path: &Path) -> CliResult<Config> {
    let config = Config::load(config_path)?;
    let rules_path = config.rules_path();
    log_event_with_fields(
        Event::ConfigLoaded,
        &[
            ("config", &config_path.display().to_string()),
            ("rules_path", &rules_path.display().to_string()),
        ],
    );
    Ok(config)
}

fn load_rules(config: &Config) -> CliResult<Arc<RuleBase>> {
    Ok(Arc::new(RuleBaseLoader::load_file(&config.rules_path())?))
}

/// Loads the rule base and serves HTTP until interrupted.
///
/// A rule base that fails to load aborts startup; the server never runs
/// with a partial rule base.
pub fn serve(config_path: &Path, port: Option<u16>) -> CliResult<()> {
    log_event(Event::StartupBegin);

    let config = load_config(config_path)?;
    let rules = load_rules(&config)?;

    let metrics = Arc::new(MetricsRegistry::new());
    let coordinator = Arc::new(ConsultationCoordinator::with_metrics(rules, metrics));

    let mut http_config = config.http.clone();
    if let Some(port) = port {
        http_config.port = port;
    }
    let server = HttpServer::with_config(http_config, AppState::new(coordinator));

    log_event_with_fields(Event::StartupComplete, &[("addr", &server.socket_addr())]);

    let rt = tokio::runtime::Runtime::new()
        .map_err(|e| CliError::boot_failed(format!("Failed to create tokio runtime: {}", e)))?;

    rt.block_on(async {
        server
            .start()
            .await
            .map_err(|e| CliError::boot_failed(format!("HTTP server failed: {}", e)))
    })
}

/// Runs one consultation from stdin and prints the result.
///
/// Rejected requests print an error object and still exit 0, matching
/// what the HTTP surface returns for the same input. Stdout carries only
/// the result; log lines go to stderr.
pub fn consult(config_path: &Path) -> CliResult<()> {
    Logger::reserve_stdout();
    consult_with(config_path, io::stdin().lock(), &mut io::stdout().lock())
}

pub fn consult_with<R: Read, W: Write>(config_path: &Path, input: R, out: &mut W) -> CliResult<()> {
    let config = load_config(config_path)?;
    let coordinator = ConsultationCoordinator::new(load_rules(&config)?);

    let body = read_request_from(input)?;
    let request: ConsultationRequest = match serde_json::from_str(&body) {
        Ok(request) => request,
        Err(e) => {
            return write_error_to(out, "DROID_INVALID_REQUEST", &format!("malformed request body: {}", e))
        }
    };

    match coordinator.consult(request) {
        Ok(result) => write_json_to(out, &result),
        Err(e) => write_error_to(out, e.code(), &e.to_string()),
    }
}

/// Loads a rule file and prints its metadata.
pub fn check(rules_path: &Path) -> CliResult<()> {
    Logger::reserve_stdout();
    check_with(rules_path, &mut io::stdout().lock())
}

pub fn check_with<W: Write>(rules_path: &Path, out: &mut W) -> CliResult<()> {
    let rules = RuleBaseLoader::load_file(rules_path)?;
    write_json_to(out, rules.info())
}

#[cfg(test)]
mod tests {
    use super::super::errors::CliErrorCode;
    use super::*;
    use serde_json::json;
    use std::fs;
    use tempfile::TempDir;

    fn write_config(dir: &TempDir, rules: &str) -> std::path::PathBuf {
        fs::write(dir.path().join("kb.pl"), rules).unwrap();
        let config_path = dir.path().join("doctor_droid.json");
        fs::write(&config_path, json!({ "rules_path": "kb.pl" }).to_string()).unwrap();
        config_path
    }

    fn run_consult(config_path: &Path, request: &str) -> String {
        let mut out = Vec::new();
        consult_with(config_path, request.as_bytes(), &mut out).unwrap();
        String::from_utf8(out).unwrap()
    }

    const FLU_RULES: &str = "\
        diagnose(flu, rest) :- has_symptom(fever), has_symptom(cough).\n\
        contraindicated(rest, dust).\n\
        safety_alert(w1) :- patient_info(allergy, dust), diagnose(flu, rest), contraindicated(rest, dust).\n";

    #[test]
    fn test_consult_output_is_single_result_object() {
        let dir = TempDir::new().unwrap();
        let config_path = write_config(&dir, FLU_RULES);

        let text = run_consult(
            &config_path,
            r#"{"symptoms":["fever","cough"],"allergies":["dust"]}"#,
        );
        assert_eq!(text.lines().count(), 1);

        let body: serde_json::Value = serde_json::from_str(&text).unwrap();
        assert_eq!(body["status"], "success");
        assert_eq!(body["diagnoses"][0]["disease"], "flu");
        assert_eq!(body["warnings"], json!(["w1"]));
        assert_eq!(body["patient_data"]["allergies"], json!(["dust"]));
    }

    #[test]
    fn test_consult_invalid_token_prints_error_object() {
        let dir = TempDir::new().unwrap();
        let config_path = write_config(&dir, FLU_RULES);

        let text = run_consult(&config_path, r#"{"symptoms":["fever)"]}"#);
        assert_eq!(text.lines().count(), 1);

        let body: serde_json::Value = serde_json::from_str(&text).unwrap();
        assert_eq!(body["status"], "error");
        assert_eq!(body["code"], "DROID_INVALID_TOKEN");
    }

    #[test]
    fn test_consult_malformed_body_prints_error_object() {
        let dir = TempDir::new().unwrap();
        let config_path = write_config(&dir, FLU_RULES);

        let body: serde_json::Value =
            serde_json::from_str(&run_consult(&config_path, "{ not json")).unwrap();
        assert_eq!(body["code"], "DROID_INVALID_REQUEST");
    }

    #[test]
    fn test_consult_fails_on_bad_rules() {
        let dir = TempDir::new().unwrap();
        let config_path = write_config(&dir, "cures(flu, rest).\n");

        let mut out = Vec::new();
        let err = consult_with(&config_path, "{}".as_bytes(), &mut out).unwrap_err();
        assert_eq!(err.code(), &CliErrorCode::RuleBaseLoadFailed);
        assert!(out.is_empty());
    }

    #[test]
    fn test_check_reports_load_error() {
        let dir = TempDir::new().unwrap();
        let rules = dir.path().join("bad.pl");
        fs::write(&rules, "cures(flu, rest).\n").unwrap();

        let err = check(&rules).unwrap_err();
        assert_eq!(err.code(), &CliErrorCode::RuleBaseLoadFailed);
        assert!(err.message().contains("unknown predicate cures/2"));
    }

    #[test]
    fn test_check_valid_rules() {
        let dir = TempDir::new().unwrap();
        let rules = dir.path().join("kb.pl");
        fs::write(&rules, "diagnose(flu, rest) :- has_symptom(fever).\n").unwrap();

        let mut out = Vec::new();
        check_with(&rules, &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert_eq!(text.lines().count(), 1);

        let info: serde_json::Value = serde_json::from_str(&text).unwrap();
        assert_eq!(info["diagnosis_rules"], 1);
    }

    #[test]
    fn test_serve_fails_without_rules() {
        let dir = TempDir::new().unwrap();
        let config_path = dir.path().join("doctor_droid.json");
        fs::write(&config_path, json!({ "rules_path": "missing.pl" }).to_string()).unwrap();

        let err = serve(&config_path, None).unwrap_err();
        assert_eq!(err.code(), &CliErrorCode::RuleBaseLoadFailed);
    }

    #[test]
    fn test_serve_fails_on_bad_config() {
        let dir = TempDir::new().unwrap();
        let config_path = dir.path().join("doctor_droid.json");
        fs::write(&config_path, "{ not json").unwrap();

        let err = serve(&config_path, None).unwrap_err();
        assert_eq!(err.code(), &CliErrorCode::ConfigError);
    }
}
