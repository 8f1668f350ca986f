use courier_media::FileSource;

/// A file to upload, optionally with an explicit name.
#[derive(Debug, Clone, PartialEq)]
pub struct Attachment {
    pub attachment: FileSource,
    pub name: Option<String>,
}

impl Attachment {
    pub fn new(attachment: impl Into<FileSource>) -> Self {
        Self {
            attachment: attachment.into(),
            name: None,
        }
    }

    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }
}

/// Anything accepted in a `files` list: a bare source, or a source wrapped
/// with a name.
#[derive(Debug, Clone, PartialEq)]
pub enum FileLike {
    Source(FileSource),
    Attachment(Attachment),
}

impl FileLike {
    #[must_use]
    pub fn source(&self) -> &FileSource {
        match self {
            Self::Source(source) => source,
            Self::Attachment(attachment) => &attachment.attachment,
        }
    }

    #[must_use]
    pub fn explicit_name(&self) -> Option<&str> {
        match self {
            Self::Source(_) => None,
            Self::Attachment(attachment) => attachment.name.as_deref().filter(|n| !n.is_empty()),
        }
    }
}

impl From<Attachment> for FileLike {
    fn from(attachment: Attachment) -> Self {
        Self::Attachment(attachment)
    }
}

impl From<FileSource> for FileLike {
    fn from(source: FileSource) -> Self {
        Self::Source(source)
    }
}

impl From<&str> for FileLike {
    fn from(path: &str) -> Self {
        Self::Source(FileSource::from(path))
    }
}

impl From<String> for FileLike {
    fn from(path: String) -> Self {
        Self::Source(FileSource::from(path))
    }
}
