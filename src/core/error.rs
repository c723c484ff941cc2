use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    ConfigInvalidJson,
    ConfigInvalidValue,

    ValidationMissingArgument,
    ValidationInvalidArgument,

    ProjectNotFound,

    NamespacePathResolution,
    NamespaceNotFound,
    SourceParseFailed,
    SourceInvalidEncoding,

    InternalIoError,
    InternalJsonError,
    InternalUnexpected,
}

impl ErrorCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::ConfigInvalidJson => "config.invalid_json",
            ErrorCode::ConfigInvalidValue => "config.invalid_value",

            ErrorCode::ValidationMissingArgument => "validation.missing_argument",
            ErrorCode::ValidationInvalidArgument => "validation.invalid_argument",

            ErrorCode::ProjectNotFound => "project.not_found",

            ErrorCode::NamespacePathResolution => "namespace.path_resolution",
            ErrorCode::NamespaceNotFound => "namespace.not_found",
            ErrorCode::SourceParseFailed => "source.parse_failed",
            ErrorCode::SourceInvalidEncoding => "source.invalid_encoding",

            ErrorCode::InternalIoError => "internal.io_error",
            ErrorCode::InternalJsonError => "internal.json_error",
            ErrorCode::InternalUnexpected => "internal.unexpected",
        }
    }

    /// Process exit code for a command that failed with this error.
    pub fn exit_code(&self) -> i32 {
        match self {
            ErrorCode::ConfigInvalidJson
            | ErrorCode::ConfigInvalidValue
            | ErrorCode::ValidationMissingArgument
            | ErrorCode::ValidationInvalidArgument => 2,

            ErrorCode::NamespacePathResolution
            | ErrorCode::NamespaceNotFound
            | ErrorCode::SourceParseFailed
            | ErrorCode::SourceInvalidEncoding => 3,

            ErrorCode::ProjectNotFound => 4,

            ErrorCode::InternalIoError
            | ErrorCode::InternalJsonError
            | ErrorCode::InternalUnexpected => 1,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Hint {
    pub message: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfigInvalidJsonDetails {
    pub path: String,
    pub error: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfigInvalidValueDetails {
    pub key: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
    pub problem: String,
}

#[derive(Debug, Clone)]
pub struct Error {
    pub code: ErrorCode,
    pub message: String,
    pub details: Value,
    pub hints: Vec<Hint>,
    pub retryable: Option<bool>,
}

pub type Result<T> = std::result::Result<T, Error>;

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for Error {}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NotFoundDetails {
    pub id: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MissingArgumentDetails {
    pub args: Vec<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InvalidArgumentDetails {
    pub field: String,
    pub problem: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tried: Option<Vec<String>>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PathResolutionDetails {
    pub file: String,
    pub project_root: String,
    pub problem: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NamespaceNotFoundDetails {
    pub file: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ParseFailedDetails {
    pub file: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub line: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub column: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub context: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InvalidEncodingDetails {
    pub file: String,
    pub problem: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InternalIoErrorDetails {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub context: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InternalJsonErrorDetails {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub context: Option<String>,
}

fn to_details<T: Serialize>(details: T) -> Value {
    serde_json::to_value(details).unwrap_or_else(|_| Value::Object(serde_json::Map::new()))
}

impl Error {
    pub fn new(code: ErrorCode, message: impl Into<String>, details: Value) -> Self {
        Self {
            code,
            message: message.into(),
            details,
            hints: Vec::new(),
            retryable: None,
        }
    }

    pub fn validation_missing_argument(args: Vec<String>) -> Self {
        Self::new(
            ErrorCode::ValidationMissingArgument,
            "Missing required argument",
            to_details(MissingArgumentDetails { args }),
        )
    }

    pub fn validation_invalid_argument(
        field: impl Into<String>,
        problem: impl Into<String>,
        id: Option<String>,
        tried: Option<Vec<String>>,
    ) -> Self {
        let details = to_details(InvalidArgumentDetails {
            field: field.into(),
            problem: problem.into(),
            id,
            tried,
        });

        Self::new(
            ErrorCode::ValidationInvalidArgument,
            "Invalid argument",
            details,
        )
    }

    pub fn project_not_found(id: impl Into<String>) -> Self {
        Self::new(
            ErrorCode::ProjectNotFound,
            "Project not found",
            to_details(NotFoundDetails { id: id.into() }),
        )
        .with_hint("Pass --project <path/to/Project.csproj> or --project <dir> explicitly")
    }

    /// The file's directory cannot be expressed relative to the project root.
    pub fn namespace_path_resolution(
        file: impl Into<String>,
        project_root: impl Into<String>,
        problem: impl Into<String>,
    ) -> Self {
        let problem = problem.into();
        let details = to_details(PathResolutionDetails {
            file: file.into(),
            project_root: project_root.into(),
            problem: problem.clone(),
        });

        Self::new(
            ErrorCode::NamespacePathResolution,
            format!("Cannot derive namespace: {}", problem),
            details,
        )
    }

    pub fn namespace_not_found(file: impl Into<String>) -> Self {
        let file = file.into();
        Self::new(
            ErrorCode::NamespaceNotFound,
            format!("No namespace declaration found in {}", file),
            to_details(NamespaceNotFoundDetails { file }),
        )
    }

    pub fn source_parse_failed(
        file: impl Into<String>,
        position: Option<(usize, usize)>,
        context: Option<String>,
    ) -> Self {
        let file = file.into();
        let details = to_details(ParseFailedDetails {
            file: file.clone(),
            line: position.map(|(line, _)| line),
            column: position.map(|(_, column)| column),
            context,
        });

        Self::new(
            ErrorCode::SourceParseFailed,
            format!("Failed to parse {}", file),
            details,
        )
    }

    /// Source bytes are not UTF-8. Such files are never rewritten.
    pub fn source_invalid_encoding(file: impl Into<String>, problem: impl Into<String>) -> Self {
        let file = file.into();
        let details = to_details(InvalidEncodingDetails {
            file: file.clone(),
            problem: problem.into(),
        });

        Self::new(
            ErrorCode::SourceInvalidEncoding,
            format!("{} is not valid UTF-8", file),
            details,
        )
        .with_hint("Re-save the file as UTF-8 before syncing its namespace")
    }

    pub fn config_invalid_json(path: impl Into<String>, err: serde_json::Error) -> Self {
        let details = to_details(ConfigInvalidJsonDetails {
            path: path.into(),
            error: err.to_string(),
        });

        Self::new(
            ErrorCode::ConfigInvalidJson,
            "Invalid JSON in configuration",
            details,
        )
    }

    pub fn config_invalid_value(
        key: impl Into<String>,
        value: Option<String>,
        problem: impl Into<String>,
    ) -> Self {
        let details = to_details(ConfigInvalidValueDetails {
            key: key.into(),
            value,
            problem: problem.into(),
        });

        Self::new(
            ErrorCode::ConfigInvalidValue,
            "Invalid configuration value",
            details,
        )
    }

    pub fn internal_io(error: impl Into<String>, context: Option<String>) -> Self {
        let details = to_details(InternalIoErrorDetails {
            error: error.into(),
            context,
        });

        Self::new(ErrorCode::InternalIoError, "IO error", details)
    }

    pub fn internal_json(error: impl Into<String>, context: Option<String>) -> Self {
        let details = to_details(InternalJsonErrorDetails {
            error: error.into(),
            context,
        });

        Self::new(ErrorCode::InternalJsonError, "JSON error", details)
    }

    pub fn internal_unexpected(error: impl Into<String>) -> Self {
        Self::new(
            ErrorCode::InternalUnexpected,
            "Unexpected error",
            serde_json::json!({ "error": error.into() }),
        )
    }

    pub fn with_hint(mut self, message: impl Into<String>) -> Self {
        self.hints.push(Hint {
            message: message.into(),
        });
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn namespace_not_found_carries_file_detail() {
        let err = Error::namespace_not_found("/src/App/Foo.cs");
        assert_eq!(err.code, ErrorCode::NamespaceNotFound);
        assert_eq!(err.details["file"], "/src/App/Foo.cs");
        assert!(err.message.contains("/src/App/Foo.cs"));
    }

    #[test]
    fn parse_failed_omits_missing_position() {
        let err = Error::source_parse_failed("Foo.cs", None, None);
        assert_eq!(err.code.as_str(), "source.parse_failed");
        assert!(err.details.get("line").is_none());

        let err = Error::source_parse_failed("Foo.cs", Some((3, 7)), None);
        assert_eq!(err.details["line"], 3);
        assert_eq!(err.details["column"], 7);
    }

    #[test]
    fn project_not_found_has_hint() {
        let err = Error::project_not_found("/tmp/nowhere/Foo.cs");
        assert_eq!(err.code.as_str(), "project.not_found");
        assert_eq!(err.hints.len(), 1);
    }

    #[test]
    fn exit_codes_group_by_failure_kind() {
        assert_eq!(ErrorCode::ValidationInvalidArgument.exit_code(), 2);
        assert_eq!(ErrorCode::ConfigInvalidJson.exit_code(), 2);
        assert_eq!(ErrorCode::SourceParseFailed.exit_code(), 3);
        assert_eq!(ErrorCode::SourceInvalidEncoding.exit_code(), 3);
        assert_eq!(ErrorCode::ProjectNotFound.exit_code(), 4);
        assert_eq!(ErrorCode::InternalIoError.exit_code(), 1);
    }

    #[test]
    fn invalid_encoding_names_the_file() {
        let err = Error::source_invalid_encoding("/src/App/Legacy.cs", "invalid utf-8");
        assert_eq!(err.code.as_str(), "source.invalid_encoding");
        assert_eq!(err.details["file"], "/src/App/Legacy.cs");
        assert_eq!(err.hints.len(), 1);
    }
}
