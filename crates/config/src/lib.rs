//! Process-wide defaults for message building: mention escaping, split
//! limits, and attachment resolution.
//!
//! Config files: `courier.toml`, `courier.yaml`, or `courier.json`
//! Searched in `./` then `~/.config/courier/`.
//!
//! Supports `${ENV_VAR}` substitution in all string values.

pub mod env_subst;
pub mod error;
pub mod loader;
pub mod schema;
pub mod validate;

pub use {
    error::{Error, Result},
    loader::{config_dir, discover_and_load, find_config_file, load_config},
    schema::{
        CourierConfig, DEFAULT_FILE_NAME, DEFAULT_SPLIT_MAX_LENGTH, DEFAULT_SPLIT_SEPARATOR,
        FilesConfig, LineMode, MessagesConfig, SplitDefaults,
    },
    validate::{Diagnostic, Severity, ValidationResult},
};
