use {
    courier_config::MessagesConfig,
    serde::Serialize,
    serde_json::Value,
    tracing::debug,
};

use crate::{
    content::{MessageContent, make_content},
    error::{Error, Result},
    options::{EmbedSlot, MessageOptions, Nonce},
    target::MessageTarget,
};

/// JSON body of a message-creation request.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct MessagePayload {
    pub content: MessageContent,
    pub tts: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub nonce: Option<u64>,
    /// Unset, explicit `null`, or the first rich item.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub embed: Option<Option<Value>>,
    /// Always set on a resolved payload; absent on leading split chunks.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub embeds: Option<Vec<Value>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub avatar_url: Option<String>,
}

/// Validate a nonce: integers must be non-negative, strings must hold one.
pub fn resolve_nonce(nonce: &Nonce) -> Result<u64> {
    match nonce {
        Nonce::Integer(n) => u64::try_from(*n).map_err(|_| Error::invalid_nonce(n)),
        Nonce::Text(text) => {
            let digits = text.trim();
            if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
                return Err(Error::invalid_nonce(text));
            }
            digits.parse().map_err(|_| Error::invalid_nonce(text))
        },
    }
}

/// Build the request body for sending `options` to `target`.
pub fn resolve_payload(
    target: &dyn MessageTarget,
    options: &MessageOptions,
    defaults: &MessagesConfig,
) -> Result<MessagePayload> {
    let kind = target.kind();
    let content = make_content(target, options, defaults)?;
    let nonce = options.nonce.as_ref().map(resolve_nonce).transpose()?;

    let embeds = if kind.is_relay() {
        options
            .embeds
            .iter()
            .flatten()
            .map(|embed| embed.to_wire())
            .collect::<Result<Vec<_>>>()?
    } else {
        match &options.embed {
            Some(EmbedSlot::Item(embed)) => vec![embed.to_wire()?],
            Some(EmbedSlot::Null) | None => Vec::new(),
        }
    };
    let embed = match options.embed {
        Some(EmbedSlot::Null) => Some(None),
        _ => embeds.first().cloned().map(Some),
    };

    let (username, avatar_url) = if kind.is_relay() {
        (
            options
                .username
                .clone()
                .or_else(|| target.name().map(str::to_string)),
            options.avatar_url.clone(),
        )
    } else {
        (None, None)
    };

    debug!(
        target_kind = %kind,
        embeds = embeds.len(),
        chunked = content.is_chunked(),
        "resolved message payload"
    );

    Ok(MessagePayload {
        content,
        tts: options.tts.unwrap_or(false),
        nonce,
        embed,
        embeds: Some(embeds),
        username,
        avatar_url,
    })
}
