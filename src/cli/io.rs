//! JSON over stdin/stdout for one-shot commands
//!
//! - Input: one JSON document on stdin
//! - Output: one JSON object per line on stdout

use std::io::{Read, Write};

use serde::Serialize;

use super::errors::{CliError, CliResult};

/// Reads all of `input` (stdin for `consult`) as one request body.
pub fn read_request_from<R: Read>(mut input: R) -> CliResult<String> {
    let mut body = String::new();
    input.read_to_string(&mut body)?;

    if body.trim().is_empty() {
        return Err(CliError::io_error("Empty input"));
    }
    Ok(body)
}

/// Writes `value` as a single JSON line.
pub fn write_json_to<W: Write, T: Serialize>(out: &mut W, value: &T) -> CliResult<()> {
    serde_json::to_writer(&mut *out, value)?;
    writeln!(out)?;
    out.flush()?;
    Ok(())
}

/// Writes `{"status":"error","code":..,"message":..}`.
pub fn write_error_to<W: Write>(out: &mut W, code: &str, message: &str) -> CliResult<()> {
    write_json_to(
        out,
        &serde_json::json!({
            "status": "error",
            "code": code,
            "message": message
        }),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_input_rejected() {
        let err = read_request_from("  \n".as_bytes()).unwrap_err();
        assert!(err.message().contains("Empty input"));
    }

    #[test]
    fn test_error_object_is_one_line() {
        let mut out = Vec::new();
        write_error_to(&mut out, "DROID_INVALID_TOKEN", "bad").unwrap();
        let text = String::from_utf8(out).unwrap();
        assert_eq!(text.lines().count(), 1);
        let parsed: serde_json::Value = serde_json::from_str(&text).unwrap();
        assert_eq!(parsed["status"], "error");
        assert_eq!(parsed["code"], "DROID_INVALID_TOKEN");
    }
}
