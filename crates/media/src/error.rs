use std::error::Error as StdError;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("{path} is not a file")]
    NotAFile { path: String },

    #[error(transparent)]
    Http(#[from] reqwest::Error),

    #[error("GET {url} returned {status}")]
    Status { url: String, status: u16 },

    #[error("stream source was already consumed")]
    StreamConsumed,

    #[error("stream read failed: {0}")]
    Stream(#[source] std::io::Error),

    #[error("{message}")]
    InvalidInput { message: String },

    #[error("{context}: {source}")]
    External {
        context: String,
        #[source]
        source: Box<dyn StdError + Send + Sync>,
    },
}

impl Error {
    #[must_use]
    pub fn external<E>(context: impl Into<String>, source: E) -> Self
    where
        E: StdError + Send + Sync + 'static,
    {
        Self::External {
            context: context.into(),
            source: Box::new(source),
        }
    }

    #[must_use]
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::InvalidInput {
            message: message.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
