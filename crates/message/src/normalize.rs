//! Reconcile the argument shapes of a send call into one [`MessageOptions`].
//!
//! Callers may pass `(content, options)`, just an options-like value in the
//! content slot, or a list of embeds and attachments in either slot. After
//! this step the rest of the pipeline sees a single canonical record whose
//! embed fields match the target kind.

use tracing::debug;

use crate::{
    attachment::{Attachment, FileLike},
    embed::Embed,
    options::{EmbedSlot, MessageInput, MessageOptions},
    target::TargetKind,
};

/// Split mixed additions into embeds and attachments, each in input order.
/// Items that are neither are dropped.
#[must_use]
pub fn partition_additions(items: Vec<MessageInput>) -> (Vec<Embed>, Vec<Attachment>) {
    let mut embeds = Vec::new();
    let mut attachments = Vec::new();
    let mut ignored = 0usize;
    for item in items {
        match item {
            MessageInput::Embed(embed) => embeds.push(*embed),
            MessageInput::Attachment(attachment) => attachments.push(attachment),
            _ => ignored += 1,
        }
    }
    if ignored > 0 {
        debug!(ignored, "ignored message additions that are not embeds or attachments");
    }
    (embeds, attachments)
}

/// Build the canonical options for a send to a `kind` target.
///
/// `extra` is layered on top of whatever the call shape produced. Feeding
/// the result back in as `options` returns it unchanged.
#[must_use]
pub fn normalize(
    kind: TargetKind,
    content: Option<MessageInput>,
    options: Option<MessageInput>,
    extra: MessageOptions,
) -> MessageOptions {
    let (content, options) = match (content, options) {
        (Some(object), None) if is_options_like(&object) => (None, Some(object)),
        (Some(object), Some(options)) if is_options_like(&object) => {
            debug!("options given twice; ignoring the one in the content slot");
            (None, Some(options))
        },
        shapes => shapes,
    };

    let base = match options {
        Some(MessageInput::Options(options)) => MessageOptions {
            content: text_content(content),
            ..Default::default()
        }
        .merge(*options),
        Some(MessageInput::Embed(embed)) => {
            with_additions(kind, text_content(content), vec![*embed], Vec::new())
        },
        Some(MessageInput::Attachment(attachment)) => MessageOptions {
            content: text_content(content),
            files: Some(vec![FileLike::from(attachment)]),
            ..Default::default()
        },
        Some(MessageInput::Additions(items)) => {
            let (embeds, attachments) = partition_additions(items);
            with_additions(kind, text_content(content), embeds, attachments)
        },
        Some(MessageInput::Text(text)) => MessageOptions {
            content: Some(text),
            ..Default::default()
        },
        None => match content {
            Some(MessageInput::Additions(items)) => {
                let (embeds, attachments) = partition_additions(items);
                if embeds.is_empty() && attachments.is_empty() {
                    MessageOptions {
                        content: Some(String::new()),
                        ..Default::default()
                    }
                } else {
                    with_additions(kind, None, embeds, attachments)
                }
            },
            content => MessageOptions {
                content: text_content(content),
                ..Default::default()
            },
        },
    };

    conform_to_kind(kind, base.merge(extra))
}

/// A non-list object standing in for the options argument.
fn is_options_like(input: &MessageInput) -> bool {
    matches!(
        input,
        MessageInput::Options(_) | MessageInput::Embed(_) | MessageInput::Attachment(_)
    )
}

/// Positional content, when it is text. A list in the content slot loses to
/// explicit options.
fn text_content(content: Option<MessageInput>) -> Option<String> {
    match content {
        Some(MessageInput::Text(text)) => Some(text),
        _ => None,
    }
}

fn with_additions(
    kind: TargetKind,
    content: Option<String>,
    embeds: Vec<Embed>,
    attachments: Vec<Attachment>,
) -> MessageOptions {
    let files = (!attachments.is_empty())
        .then(|| attachments.into_iter().map(FileLike::from).collect());
    let mut options = MessageOptions {
        content,
        files,
        ..Default::default()
    };
    if kind.is_relay() {
        options.embeds = Some(embeds);
    } else {
        options.embed = first_embed(kind, embeds).map(EmbedSlot::Item);
    }
    options
}

/// Entity targets take a single embed; the rest are dropped.
fn first_embed(kind: TargetKind, embeds: Vec<Embed>) -> Option<Embed> {
    if embeds.len() > 1 {
        debug!(
            target_kind = %kind,
            dropped = embeds.len() - 1,
            "target accepts a single embed, keeping the first"
        );
    }
    embeds.into_iter().next()
}

/// Keep exactly one of `embed` / `embeds` populated for `kind`. An explicit
/// `embed: null` survives for both kinds.
fn conform_to_kind(kind: TargetKind, mut options: MessageOptions) -> MessageOptions {
    if kind.is_relay() {
        match options.embed.take() {
            Some(EmbedSlot::Item(embed)) if options.embeds.is_none() => {
                options.embeds = Some(vec![embed]);
            },
            Some(EmbedSlot::Item(_)) => {
                debug!("relay target uses the embed list; single embed dropped");
            },
            slot => options.embed = slot,
        }
    } else if let Some(embeds) = options.embeds.take()
        && options.embed.is_none()
    {
        options.embed = first_embed(kind, embeds).map(EmbedSlot::Item);
    }
    options
}
