//! Optional per-project `nssync.json` settings.
//!
//! The file lives in the project root. Every key is optional; a missing file
//! means defaults everywhere.

use std::path::Path;

use glob_match::glob_match;
use serde::{Deserialize, Deserializer, Serialize};

use crate::error::{Error, Result};
use crate::local_files::{self, FileSystem};

pub const CONFIG_FILE: &str = "nssync.json";

/// Report file written next to the project file by `audit`.
pub const DEFAULT_REPORT_FILE: &str = "different_namespaces.txt";

const DEFAULT_EXTENSIONS: &[&str] = &["cs"];

const DEFAULT_SKIP_DIRS: &[&str] = &[".git", ".vs", "bin", "obj", "node_modules"];

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ProjectConfig {
    /// Overrides the namespace prefix taken from the project file name.
    #[serde(
        skip_serializing_if = "Option::is_none",
        deserialize_with = "deserialize_empty_as_none"
    )]
    pub project_name: Option<String>,
    /// Source file extensions to audit, without the leading dot.
    pub extensions: Vec<String>,
    /// Directory names never descended into, at any depth.
    pub skip_dirs: Vec<String>,
    /// Glob patterns over root-relative paths (`/` separated) to leave out.
    pub exclude: Vec<String>,
    /// Report file name, created in the project root.
    pub report_file: String,
}

impl Default for ProjectConfig {
    fn default() -> Self {
        Self {
            project_name: None,
            extensions: DEFAULT_EXTENSIONS.iter().map(|s| s.to_string()).collect(),
            skip_dirs: DEFAULT_SKIP_DIRS.iter().map(|s| s.to_string()).collect(),
            exclude: Vec::new(),
            report_file: DEFAULT_REPORT_FILE.to_string(),
        }
    }
}

/// Normalize empty strings to None.
fn deserialize_empty_as_none<'de, D>(
    deserializer: D,
) -> std::result::Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let opt = Option::<String>::deserialize(deserializer)?;
    Ok(opt.filter(|s| !s.trim().is_empty()))
}

impl ProjectConfig {
    pub fn validate(&self) -> Result<()> {
        if self.extensions.is_empty() {
            return Err(Error::config_invalid_value(
                "extensions",
                None,
                "at least one source extension is required",
            ));
        }

        let report = self.report_file.trim();
        if report.is_empty() || report.contains('/') || report.contains('\\') {
            return Err(Error::config_invalid_value(
                "report_file",
                Some(self.report_file.clone()),
                "must be a plain file name inside the project root",
            ));
        }

        Ok(())
    }

    pub fn matches_extension(&self, path: &Path) -> bool {
        path.extension()
            .and_then(|e| e.to_str())
            .is_some_and(|ext| {
                self.extensions
                    .iter()
                    .any(|wanted| wanted.trim_start_matches('.') == ext)
            })
    }

    pub fn skips_dir(&self, name: &str) -> bool {
        self.skip_dirs.iter().any(|d| d == name)
    }

    /// `relative` uses `/` separators regardless of platform.
    pub fn is_excluded(&self, relative: &str) -> bool {
        self.exclude
            .iter()
            .any(|pattern| glob_match(pattern, relative))
    }
}

/// Read `nssync.json` from a project root, falling back to defaults.
pub fn read_project_config(root: &Path) -> Result<ProjectConfig> {
    let config_path = root.join(CONFIG_FILE);
    if !config_path.is_file() {
        return Ok(ProjectConfig::default());
    }

    let content = local_files::local().read(&config_path)?;
    let config: ProjectConfig = serde_json::from_str(&content)
        .map_err(|e| Error::config_invalid_json(config_path.display().to_string(), e))?;

    config.validate()?;
    Ok(config)
}
