//! Attachment byte resolution: turn a path, URL, in-memory buffer, or
//! readable stream into the bytes that get uploaded alongside a message.

pub mod error;
pub mod resolver;
pub mod source;

pub use {
    error::{Error, Result},
    resolver::{DataResolver, ResolveFile},
    source::{ByteStream, FileSource, StreamSource},
};
