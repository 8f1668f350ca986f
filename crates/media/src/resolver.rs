use std::time::Duration;

use {
    async_trait::async_trait,
    bytes::{Bytes, BytesMut},
    futures::TryStreamExt,
    tracing::debug,
};

use courier_config::FilesConfig;

use crate::{
    error::{Error, Result},
    source::{FileSource, StreamSource, is_url},
};

/// Turns an attachment source into transmittable bytes.
#[async_trait]
pub trait ResolveFile: Send + Sync {
    async fn resolve_file(&self, source: &FileSource) -> Result<Bytes>;
}

/// Default resolver: reads local files, fetches URLs, drains streams.
#[derive(Debug, Clone, Default)]
pub struct DataResolver {
    http: reqwest::Client,
}

impl DataResolver {
    #[must_use]
    pub fn new(http: reqwest::Client) -> Self {
        Self { http }
    }

    /// Build a resolver whose HTTP client honors the configured timeout and
    /// user agent. A zero timeout leaves requests unbounded.
    pub fn from_config(config: &FilesConfig) -> Result<Self> {
        let mut builder = reqwest::Client::builder().user_agent(config.user_agent.clone());
        if config.http_timeout_secs > 0 {
            builder = builder.timeout(Duration::from_secs(config.http_timeout_secs));
        }
        Ok(Self::new(builder.build()?))
    }

    async fn fetch_url(&self, url: &str) -> Result<Bytes> {
        let resp = self.http.get(url).send().await?;
        let status = resp.status();
        if !status.is_success() {
            return Err(Error::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }
        Ok(resp.bytes().await?)
    }

    async fn read_path(path: &str) -> Result<Bytes> {
        let io_err = |source| Error::Io {
            path: path.to_string(),
            source,
        };
        let meta = tokio::fs::metadata(path).await.map_err(io_err)?;
        if !meta.is_file() {
            return Err(Error::NotAFile {
                path: path.to_string(),
            });
        }
        let data = tokio::fs::read(path).await.map_err(io_err)?;
        Ok(Bytes::from(data))
    }

    async fn drain_stream(stream: &StreamSource) -> Result<Bytes> {
        let chunks = stream.take().ok_or(Error::StreamConsumed)?;
        let buf = chunks
            .try_fold(BytesMut::new(), |mut buf, chunk| async move {
                buf.extend_from_slice(&chunk);
                Ok(buf)
            })
            .await
            .map_err(Error::Stream)?;
        Ok(buf.freeze())
    }
}

#[async_trait]
impl ResolveFile for DataResolver {
    async fn resolve_file(&self, source: &FileSource) -> Result<Bytes> {
        let bytes = match source {
            FileSource::Buffer(bytes) => bytes.clone(),
            FileSource::Path(path) if is_url(path) => self.fetch_url(path).await?,
            FileSource::Path(path) => Self::read_path(path).await?,
            FileSource::Stream(stream) => Self::drain_stream(stream).await?,
        };
        debug!(
            kind = source.kind(),
            path = source.path(),
            len = bytes.len(),
            "attachment resolved"
        );
        Ok(bytes)
    }
}

#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn buffer_is_returned_as_is() {
        let resolver = DataResolver::default();
        let bytes = resolver
            .resolve_file(&FileSource::from(b"png-bytes".to_vec()))
            .await
            .unwrap();
        assert_eq!(&bytes[..], b"png-bytes");
    }

    #[tokio::test]
    async fn reads_local_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("notes.txt");
        tokio::fs::write(&path, "hello").await.unwrap();

        let bytes = DataResolver::default()
            .resolve_file(&FileSource::from(path.as_path()))
            .await
            .unwrap();
        assert_eq!(&bytes[..], b"hello");
    }

    #[tokio::test]
    async fn directory_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let err = DataResolver::default()
            .resolve_file(&FileSource::from(dir.path()))
            .await
            .unwrap_err();
        assert!(matches!(err, Error::NotAFile { .. }));
    }

    #[tokio::test]
    async fn missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope.bin");
        let err = DataResolver::default()
            .resolve_file(&FileSource::from(missing.as_path()))
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Io { .. }));
        assert!(err.to_string().contains("nope.bin"));
    }

    #[tokio::test]
    async fn drains_reader_stream_once() {
        let stream = StreamSource::from_reader(&b"streamed body"[..]).with_path("/var/log/app.log");
        let source = FileSource::from(stream);
        let resolver = DataResolver::default();

        let bytes = resolver.resolve_file(&source).await.unwrap();
        assert_eq!(&bytes[..], b"streamed body");

        let err = resolver.resolve_file(&source).await.unwrap_err();
        assert!(matches!(err, Error::StreamConsumed));
    }

    #[tokio::test]
    async fn stream_errors_are_surfaced() {
        let failing = futures::stream::iter(vec![
            Ok(Bytes::from_static(b"partial")),
            Err(std::io::Error::other("connection reset")),
        ]);
        let err = DataResolver::default()
            .resolve_file(&FileSource::from(StreamSource::new(failing)))
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Stream(_)));
    }

    #[tokio::test]
    async fn fetches_url() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/avatar.png")
            .with_status(200)
            .with_body("image-data")
            .create_async()
            .await;

        let resolver = DataResolver::from_config(&FilesConfig::default()).unwrap();
        let url = format!("{}/avatar.png", server.url());
        let bytes = resolver.resolve_file(&FileSource::from(url)).await.unwrap();

        assert_eq!(&bytes[..], b"image-data");
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn url_error_status_is_reported() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("GET", "/gone.png")
            .with_status(404)
            .create_async()
            .await;

        let url = format!("{}/gone.png", server.url());
        let err = DataResolver::default()
            .resolve_file(&FileSource::from(url))
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Status { status: 404, .. }));
    }
}
