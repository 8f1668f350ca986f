use {
    bytes::Bytes,
    courier_config::FilesConfig,
    courier_media::{FileSource, ResolveFile},
    futures::future::try_join_all,
    tracing::debug,
};

use crate::{
    attachment::FileLike,
    error::{Error, Result},
    options::MessageOptions,
};

/// An attachment ready for upload.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedFile {
    /// The source the bytes were read from.
    pub attachment: FileSource,
    pub name: String,
    pub file: Bytes,
}

/// Every file referenced by `options`: the explicit list first, then the
/// files of each rich item in send order.
#[must_use]
pub fn collect_file_likes(options: &MessageOptions) -> Vec<FileLike> {
    options
        .files
        .iter()
        .flatten()
        .chain(options.rich_items().flat_map(|embed| embed.files.iter()))
        .cloned()
        .collect()
}

/// Upload name for `file`: its explicit name, else the last segment of its
/// path or URL, else `default_name`.
#[must_use]
pub fn file_name(file: &FileLike, default_name: &str) -> String {
    if let Some(name) = file.explicit_name() {
        return name.to_string();
    }
    let source = file.source();
    source
        .path()
        .and_then(|path| {
            let path = path.split('?').next().unwrap_or(path);
            let path = if source.is_url() {
                path.split('#').next().unwrap_or(path)
            } else {
                path
            };
            path.rsplit(['/', '\\']).next()
        })
        .filter(|name| !name.is_empty())
        .map_or_else(|| default_name.to_string(), str::to_string)
}

/// Resolve every attachment of `options` concurrently.
///
/// Results keep discovery order no matter which resolution finishes first.
/// The first failure aborts the whole call.
pub async fn resolve_files(
    resolver: &dyn ResolveFile,
    options: &MessageOptions,
    config: &FilesConfig,
) -> Result<Vec<ResolvedFile>> {
    let files = collect_file_likes(options);
    if files.is_empty() {
        return Ok(Vec::new());
    }
    debug!(count = files.len(), "resolving attachments");

    let tasks = files.into_iter().map(|file| async move {
        let name = file_name(&file, &config.default_name);
        let attachment = file.source().clone();
        match resolver.resolve_file(&attachment).await {
            Ok(bytes) => {
                debug!(
                    name = %name,
                    source = attachment.kind(),
                    bytes = bytes.len(),
                    "resolved attachment"
                );
                Ok(ResolvedFile {
                    attachment,
                    name,
                    file: bytes,
                })
            },
            Err(source) => Err(Error::FileResolution { name, source }),
        }
    });
    try_join_all(tasks).await
}
