//! JSON envelope printed by every command, and exit code selection.
//!
//! stdout always carries exactly one document:
//! `{"success": true, "data": ...}` or `{"success": false, "error": ...}`.

use std::io::{self, Write};

use nssync::error::Hint;
use nssync::{Error, Result};
use serde::Serialize;
use serde_json::Value;

#[derive(Debug, Serialize)]
pub struct CliResponse {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<CliError>,
}

#[derive(Debug, Serialize)]
pub struct CliError {
    pub code: &'static str,
    pub message: String,
    pub details: Value,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub hints: Vec<Hint>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub retryable: Option<bool>,
}

impl From<&Error> for CliError {
    fn from(err: &Error) -> Self {
        Self {
            code: err.code.as_str(),
            message: err.message.clone(),
            details: err.details.clone(),
            hints: err.hints.clone(),
            retryable: err.retryable,
        }
    }
}

impl CliResponse {
    pub fn from_result(result: &Result<Value>) -> Self {
        match result {
            Ok(data) => Self {
                success: true,
                data: Some(data.clone()),
                error: None,
            },
            Err(err) => Self {
                success: false,
                data: None,
                error: Some(err.into()),
            },
        }
    }
}

/// Serialize a command's output and pick the exit code: the command's own
/// on success, the error code's otherwise.
pub fn map_cmd_result_to_json<T: Serialize>(result: Result<(T, i32)>) -> (Result<Value>, i32) {
    match result {
        Ok((data, exit_code)) => match serde_json::to_value(data) {
            Ok(value) => (Ok(value), exit_code),
            Err(err) => (
                Err(Error::internal_json(
                    err.to_string(),
                    Some("serialize response".to_string()),
                )),
                1,
            ),
        },
        Err(err) => {
            let exit_code = err.code.exit_code();
            (Err(err), exit_code)
        }
    }
}

pub fn print_json_result(result: Result<Value>) -> Result<()> {
    let payload = serde_json::to_string_pretty(&CliResponse::from_result(&result))
        .map_err(|e| Error::internal_json(e.to_string(), Some("serialize response".to_string())))?;

    let mut handle = io::stdout().lock();
    match writeln!(handle, "{}", payload) {
        Ok(()) => Ok(()),
        // Reader went away (`nssync audit . | head`)
        Err(e) if e.kind() == io::ErrorKind::BrokenPipe => Ok(()),
        Err(e) => Err(Error::internal_io(
            e.to_string(),
            Some("write stdout".to_string()),
        )),
    }
}
