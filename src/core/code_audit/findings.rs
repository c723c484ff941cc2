//! Audit findings: namespace discrepancies and files the audit could not judge.

use std::path::Path;

use crate::error::Error;

/// A file whose declared namespace differs from the path-derived one.
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct Discrepancy {
    /// Namespace as written in the file.
    pub declared: String,
    /// Namespace derived from the file's directory.
    pub expected: String,
    /// Absolute file path.
    pub file: String,
}

impl Discrepancy {
    pub fn new(declared: impl Into<String>, expected: impl Into<String>, file: &Path) -> Self {
        Self {
            declared: declared.into(),
            expected: expected.into(),
            file: file.display().to_string(),
        }
    }

    /// Line written to the report file: `<declared> <path>`.
    pub fn report_line(&self) -> String {
        format!("{} {}", self.declared, self.file)
    }
}

/// A file left out of the comparison, with the error that caused it.
#[derive(Debug, Clone, serde::Serialize)]
pub struct SkippedFile {
    pub file: String,
    pub code: String,
    pub reason: String,
}

impl SkippedFile {
    pub fn from_error(file: &Path, err: &Error) -> Self {
        let reason = err
            .details
            .get("problem")
            .or_else(|| err.details.get("context"))
            .and_then(|v| v.as_str())
            .map(|detail| format!("{} ({})", err.message, detail))
            .unwrap_or_else(|| err.message.clone());

        Self {
            file: file.display().to_string(),
            code: err.code.as_str().to_string(),
            reason,
        }
    }
}
