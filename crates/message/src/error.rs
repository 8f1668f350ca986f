#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Nonce is present but not a non-negative integer.
    #[error("message nonce must be a non-negative integer, got {value:?}")]
    InvalidNonce { value: String },

    /// Reply source does not carry a usable user id.
    #[error("reply target cannot be resolved to a user id")]
    InvalidMentionTarget,

    /// A line cannot be split any further and still exceeds the limit.
    #[error("line of {length} characters does not fit in a {max_length} character message")]
    MessageTooLong { length: usize, max_length: usize },

    /// The byte resolver failed for one attachment.
    #[error("failed to resolve attachment {name}: {source}")]
    FileResolution {
        name: String,
        #[source]
        source: courier_media::Error,
    },

    #[error(transparent)]
    SerdeJson(#[from] serde_json::Error),
}

impl Error {
    #[must_use]
    pub fn invalid_nonce(value: impl std::fmt::Display) -> Self {
        Self::InvalidNonce {
            value: value.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
