//! Configuration validation.
//!
//! Semantic checks that a parsed [`CourierConfig`] can drive the message
//! formatter and file resolver without surprising results.

use std::path::{Path, PathBuf};

use crate::{loader, schema::CourierConfig};

/// Severity level for a diagnostic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Severity {
    Error,
    Warning,
    Info,
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Error => write!(f, "error"),
            Self::Warning => write!(f, "warning"),
            Self::Info => write!(f, "info"),
        }
    }
}

/// A single validation diagnostic.
#[derive(Debug, Clone)]
pub struct Diagnostic {
    pub severity: Severity,
    /// Dotted path, e.g. "messages.split.max_length"
    pub path: String,
    pub message: String,
}

/// Result of validating a configuration.
#[derive(Debug, Clone, Default)]
pub struct ValidationResult {
    pub diagnostics: Vec<Diagnostic>,
    pub config_path: Option<PathBuf>,
}

impl ValidationResult {
    /// Returns `true` if any diagnostic is an error.
    #[must_use]
    pub fn has_errors(&self) -> bool {
        self.diagnostics
            .iter()
            .any(|d| d.severity == Severity::Error)
    }

    /// Count diagnostics by severity.
    #[must_use]
    pub fn count(&self, severity: Severity) -> usize {
        self.diagnostics
            .iter()
            .filter(|d| d.severity == severity)
            .count()
    }

    fn push(&mut self, severity: Severity, path: &str, message: impl Into<String>) {
        self.diagnostics.push(Diagnostic {
            severity,
            path: path.to_string(),
            message: message.into(),
        });
    }
}

/// Validate the config file at `path`, or the discovered one when `None`.
pub fn validate(path: Option<&Path>) -> ValidationResult {
    let config_path = path.map(Path::to_path_buf).or_else(loader::find_config_file);
    let Some(config_path) = config_path else {
        let mut result = validate_config(&CourierConfig::default());
        result.push(Severity::Info, "", "no config file found; using defaults");
        return result;
    };

    match loader::load_config(&config_path) {
        Ok(config) => ValidationResult {
            config_path: Some(config_path),
            ..validate_config(&config)
        },
        Err(e) => {
            let mut result = ValidationResult {
                config_path: Some(config_path),
                ..Default::default()
            };
            result.push(Severity::Error, "", e.to_string());
            result
        },
    }
}

/// Run semantic checks on an already-parsed config.
#[must_use]
pub fn validate_config(config: &CourierConfig) -> ValidationResult {
    let mut result = ValidationResult::default();
    let split = &config.messages.split;

    if split.max_length == 0 {
        result.push(
            Severity::Error,
            "messages.split.max_length",
            "must be greater than zero",
        );
    }
    if split.separator.is_empty() {
        result.push(
            Severity::Error,
            "messages.split.separator",
            "must not be empty",
        );
    }
    if config.files.default_name.trim().is_empty() {
        result.push(
            Severity::Warning,
            "files.default_name",
            "empty name; unnamed attachments will be sent without a file name",
        );
    }
    if config.files.http_timeout_secs == 0 {
        result.push(
            Severity::Warning,
            "files.http_timeout_secs",
            "zero disables the request timeout for URL attachments",
        );
    }

    result
}
