/// Config schema types for message formatting and attachment resolution.
use serde::{Deserialize, Serialize};

/// Character limit applied when a split request does not set one.
pub const DEFAULT_SPLIT_MAX_LENGTH: usize = 2000;

/// Line separator used when a split request does not set one.
pub const DEFAULT_SPLIT_SEPARATOR: &str = "\n";

/// Placeholder attachment name when nothing better can be derived.
pub const DEFAULT_FILE_NAME: &str = "file.jpg";

/// Root configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct CourierConfig {
    pub messages: MessagesConfig,
    pub files: FilesConfig,
}

/// Defaults consulted while formatting message content.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct MessagesConfig {
    /// Neutralize `@everyone` / `@here` unless a send overrides it.
    pub disable_everyone: bool,
    pub split: SplitDefaults,
}

/// What to do with a single line that is longer than the split limit.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LineMode {
    /// Lines are atomic; an oversized line is an error.
    #[default]
    Whole,
    /// Oversized lines are broken at the character limit.
    Break,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct SplitDefaults {
    /// Maximum characters per chunk, including prepend/append.
    pub max_length: usize,
    pub separator: String,
    pub line_mode: LineMode,
}

impl Default for SplitDefaults {
    fn default() -> Self {
        Self {
            max_length: DEFAULT_SPLIT_MAX_LENGTH,
            separator: DEFAULT_SPLIT_SEPARATOR.into(),
            line_mode: LineMode::default(),
        }
    }
}

/// Attachment resolution settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct FilesConfig {
    /// Name given to attachments whose name cannot be derived.
    pub default_name: String,
    /// Request timeout for URL attachments (seconds).
    pub http_timeout_secs: u64,
    pub user_agent: String,
}

impl Default for FilesConfig {
    fn default() -> Self {
        Self {
            default_name: DEFAULT_FILE_NAME.into(),
            http_timeout_secs: 30,
            user_agent: concat!("courier/", env!("CARGO_PKG_VERSION")).into(),
        }
    }
}
