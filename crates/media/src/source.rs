use std::{
    fmt,
    path::Path,
    pin::Pin,
    sync::{Arc, Mutex},
};

use {
    bytes::Bytes,
    futures::Stream,
    tokio::io::AsyncRead,
    tokio_util::io::ReaderStream,
};

/// Boxed stream of byte chunks.
pub type ByteStream = Pin<Box<dyn Stream<Item = std::io::Result<Bytes>> + Send>>;

/// Where an attachment's bytes come from.
#[derive(Debug, Clone, PartialEq)]
pub enum FileSource {
    /// Filesystem path, or an `http(s)://` URL.
    Path(String),
    /// Bytes already in memory.
    Buffer(Bytes),
    /// A one-shot readable stream.
    Stream(StreamSource),
}

impl FileSource {
    /// The path-like attribute of this source, if it has one.
    #[must_use]
    pub fn path(&self) -> Option<&str> {
        match self {
            Self::Path(path) => Some(path),
            Self::Stream(stream) => stream.path(),
            Self::Buffer(_) => None,
        }
    }

    #[must_use]
    pub fn is_url(&self) -> bool {
        matches!(self, Self::Path(p) if is_url(p))
    }

    /// Short label for logs.
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Path(p) if is_url(p) => "url",
            Self::Path(_) => "path",
            Self::Buffer(_) => "buffer",
            Self::Stream(_) => "stream",
        }
    }
}

pub(crate) fn is_url(path: &str) -> bool {
    path.starts_with("http://") || path.starts_with("https://")
}

impl From<&str> for FileSource {
    fn from(path: &str) -> Self {
        Self::Path(path.to_owned())
    }
}

impl From<String> for FileSource {
    fn from(path: String) -> Self {
        Self::Path(path)
    }
}

impl From<&Path> for FileSource {
    fn from(path: &Path) -> Self {
        Self::Path(path.to_string_lossy().into_owned())
    }
}

impl From<Bytes> for FileSource {
    fn from(bytes: Bytes) -> Self {
        Self::Buffer(bytes)
    }
}

impl From<Vec<u8>> for FileSource {
    fn from(bytes: Vec<u8>) -> Self {
        Self::Buffer(Bytes::from(bytes))
    }
}

impl From<&'static [u8]> for FileSource {
    fn from(bytes: &'static [u8]) -> Self {
        Self::Buffer(Bytes::from_static(bytes))
    }
}

impl From<StreamSource> for FileSource {
    fn from(stream: StreamSource) -> Self {
        Self::Stream(stream)
    }
}

/// A readable stream that can be drained exactly once.
///
/// Clones share the same underlying stream, so whichever clone is resolved
/// first consumes it.
#[derive(Clone)]
pub struct StreamSource {
    path: Option<String>,
    inner: Arc<Mutex<Option<ByteStream>>>,
}

impl StreamSource {
    pub fn new<S>(stream: S) -> Self
    where
        S: Stream<Item = std::io::Result<Bytes>> + Send + 'static,
    {
        Self {
            path: None,
            inner: Arc::new(Mutex::new(Some(Box::pin(stream)))),
        }
    }

    /// Wrap any async reader, e.g. an open `tokio::fs::File`.
    pub fn from_reader<R>(reader: R) -> Self
    where
        R: AsyncRead + Send + 'static,
    {
        Self::new(ReaderStream::new(reader))
    }

    /// Record the path the stream was opened from, used to name the upload.
    #[must_use]
    pub fn with_path(mut self, path: impl Into<String>) -> Self {
        self.path = Some(path.into());
        self
    }

    #[must_use]
    pub fn path(&self) -> Option<&str> {
        self.path.as_deref()
    }

    /// Take the stream out, leaving the source consumed.
    pub fn take(&self) -> Option<ByteStream> {
        let mut slot = self.inner.lock().unwrap_or_else(|e| e.into_inner());
        slot.take()
    }

    #[must_use]
    pub fn is_consumed(&self) -> bool {
        self.inner
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .is_none()
    }
}

impl PartialEq for StreamSource {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner) && self.path == other.path
    }
}

impl fmt::Debug for StreamSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StreamSource")
            .field("path", &self.path)
            .field("consumed", &self.is_consumed())
            .finish()
    }
}

#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests {
    use {super::*, rstest::rstest};

    #[rstest]
    #[case(FileSource::from("https://cdn.example.com/a.png"), "url", true)]
    #[case(FileSource::from("http://cdn.example.com/a.png"), "url", true)]
    #[case(FileSource::from("./assets/a.png"), "path", false)]
    #[case(FileSource::from(vec![1u8, 2, 3]), "buffer", false)]
    fn classifies_sources(#[case] source: FileSource, #[case] kind: &str, #[case] url: bool) {
        assert_eq!(source.kind(), kind);
        assert_eq!(source.is_url(), url);
    }

    #[test]
    fn stream_path_is_exposed() {
        let stream = StreamSource::new(futures::stream::empty()).with_path("/tmp/report.csv");
        let source = FileSource::from(stream);
        assert_eq!(source.path(), Some("/tmp/report.csv"));
        assert_eq!(source.kind(), "stream");
    }

    #[test]
    fn stream_can_be_taken_once() {
        let stream = StreamSource::new(futures::stream::empty());
        let clone = stream.clone();
        assert!(!clone.is_consumed());
        assert!(stream.take().is_some());
        assert!(clone.is_consumed());
        assert!(clone.take().is_none());
    }

    #[test]
    fn clones_compare_equal_but_distinct_streams_do_not() {
        let a = StreamSource::new(futures::stream::empty());
        let b = StreamSource::new(futures::stream::empty());
        assert_eq!(a, a.clone());
        assert_ne!(a, b);
    }
}
