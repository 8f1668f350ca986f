//! Outgoing message preparation.
//!
//! Normalizes the loosely-shaped arguments of a "send" call into one
//! [`MessageOptions`] record, renders the final content (reply mention,
//! code fence, mass-mention escaping, splitting), builds the JSON payload
//! for the target kind, and resolves attachments into bytes in input order.

pub mod attachment;
pub mod content;
pub mod embed;
pub mod error;
pub mod files;
pub mod mention;
pub mod message;
pub mod normalize;
pub mod options;
pub mod payload;
pub mod split;
pub mod target;

pub use {
    attachment::{Attachment, FileLike},
    content::{MessageContent, escape_code_block, escape_mass_mentions, make_content},
    embed::{Embed, EmbedAuthor, EmbedField, EmbedFooter, EmbedMedia},
    error::{Error, Result},
    files::{ResolvedFile, collect_file_likes, file_name, resolve_files},
    mention::MentionSource,
    message::{OutgoingMessage, PreparedMessage},
    normalize::{normalize, partition_additions},
    options::{CodeBlock, EmbedSlot, MessageInput, MessageOptions, Nonce, Split, SplitOptions},
    payload::{MessagePayload, resolve_nonce, resolve_payload},
    split::{SplitPlan, split_message},
    target::{MessageTarget, Target, TargetKind},
};

pub use courier_config::{LineMode, MessagesConfig};
pub use courier_media::{DataResolver, FileSource, ResolveFile, StreamSource};
