use std::sync::Arc;

use {
    courier_config::CourierConfig,
    courier_media::ResolveFile,
    tracing::debug,
};

use crate::{
    content::{self, MessageContent},
    error::Result,
    files::{self, ResolvedFile},
    normalize::normalize,
    options::{MessageInput, MessageOptions},
    payload::{self, MessagePayload},
    target::MessageTarget,
};

/// A message on its way to `target`.
///
/// The send arguments are normalized once at construction; rendering the
/// payload and resolving files read that record and never change it.
#[derive(Debug, Clone)]
pub struct OutgoingMessage<T> {
    target: T,
    options: MessageOptions,
    config: Arc<CourierConfig>,
}

impl<T: MessageTarget> OutgoingMessage<T> {
    /// Wrap an options record for `target`.
    pub fn new(target: T, options: MessageOptions, config: Arc<CourierConfig>) -> Self {
        Self::create(target, None, Some(options.into()), MessageOptions::default(), config)
    }

    /// Build from the loose `(content, options)` argument pair of a send
    /// call; `extra` is layered on top of both.
    pub fn create(
        target: T,
        content: Option<MessageInput>,
        options: Option<MessageInput>,
        extra: MessageOptions,
        config: Arc<CourierConfig>,
    ) -> Self {
        let options = normalize(target.kind(), content, options, extra);
        Self {
            target,
            options,
            config,
        }
    }

    pub fn target(&self) -> &T {
        &self.target
    }

    pub fn options(&self) -> &MessageOptions {
        &self.options
    }

    pub fn make_content(&self) -> Result<MessageContent> {
        content::make_content(&self.target, &self.options, &self.config.messages)
    }

    pub fn resolve_payload(&self) -> Result<MessagePayload> {
        payload::resolve_payload(&self.target, &self.options, &self.config.messages)
    }

    pub async fn resolve_files(&self, resolver: &dyn ResolveFile) -> Result<Vec<ResolvedFile>> {
        files::resolve_files(resolver, &self.options, &self.config.files).await
    }

    /// Payload and files together. The payload is built first so that
    /// formatting errors surface before any file is read.
    pub async fn prepare(&self, resolver: &dyn ResolveFile) -> Result<PreparedMessage> {
        let payload = self.resolve_payload()?;
        let files = self.resolve_files(resolver).await?;
        debug!(
            target_kind = %self.target.kind(),
            files = files.len(),
            "prepared message"
        );
        Ok(PreparedMessage { payload, files })
    }
}

/// Payload plus its uploads, ready for the transport.
#[derive(Debug, Clone, PartialEq)]
pub struct PreparedMessage {
    pub payload: MessagePayload,
    pub files: Vec<ResolvedFile>,
}

impl PreparedMessage {
    /// One message per content chunk.
    ///
    /// Every chunk keeps `tts` and the relay identity; nonce, embeds and
    /// files ride on the last chunk only. Unsplit content yields `self`.
    #[must_use]
    pub fn split(mut self) -> Vec<PreparedMessage> {
        let (last, rest) = match std::mem::take(&mut self.payload.content) {
            MessageContent::Chunks(mut chunks) => match chunks.pop() {
                Some(last) => (last, chunks),
                None => return vec![self],
            },
            content => {
                self.payload.content = content;
                return vec![self];
            },
        };

        let mut messages: Vec<PreparedMessage> = rest
            .into_iter()
            .map(|chunk| PreparedMessage {
                payload: MessagePayload {
                    content: MessageContent::Text(chunk),
                    tts: self.payload.tts,
                    username: self.payload.username.clone(),
                    avatar_url: self.payload.avatar_url.clone(),
                    ..Default::default()
                },
                files: Vec::new(),
            })
            .collect();
        self.payload.content = MessageContent::Text(last);
        messages.push(self);
        messages
    }
}

#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests {
    use {
        super::*,
        crate::{
            attachment::Attachment,
            embed::Embed,
            options::SplitOptions,
            target::{Target, TargetKind},
        },
        bytes::Bytes,
        courier_media::FileSource,
        rstest::rstest,
        serde_json::{Value, json},
    };

    fn config() -> Arc<CourierConfig> {
        Arc::new(CourierConfig::default())
    }

    fn resolved(name: &str) -> ResolvedFile {
        ResolvedFile {
            attachment: FileSource::from(vec![1u8]),
            name: name.into(),
            file: Bytes::from_static(&[1]),
        }
    }

    #[test]
    fn create_normalizes_for_the_target() {
        let message = OutgoingMessage::create(
            Target::new(TargetKind::OtherEntity),
            Some("hi".into()),
            Some(vec![Embed::new().with_title("a"), Embed::new().with_title("b")].into()),
            MessageOptions::default(),
            config(),
        );
        assert_eq!(message.options().content.as_deref(), Some("hi"));
        assert!(message.options().embeds.is_none());
        assert_eq!(message.resolve_payload().unwrap().embeds.unwrap().len(), 1);
    }

    #[test]
    fn new_wraps_an_options_record() {
        let options = MessageOptions::new().with_content("hello").with_tts(true);
        let message = OutgoingMessage::new(Target::relay("hook"), options.clone(), config());
        assert_eq!(message.options(), &options);
        assert_eq!(message.target().name.as_deref(), Some("hook"));
    }

    #[test]
    fn config_defaults_reach_the_formatter() {
        let mut config = CourierConfig::default();
        config.messages.disable_everyone = true;
        let message = OutgoingMessage::new(
            Target::new(TargetKind::OtherEntity),
            MessageOptions::new().with_content("@here"),
            Arc::new(config),
        );
        assert_eq!(
            message.make_content().unwrap(),
            MessageContent::Text("@\u{200b}here".into())
        );
    }

    #[test]
    fn split_spreads_chunks_and_keeps_extras_on_the_last() {
        let message = OutgoingMessage::new(
            Target::relay("hook"),
            MessageOptions::new()
                .with_content("one\ntwo\nthree")
                .with_tts(true)
                .with_nonce(9_i64)
                .with_avatar_url("https://example.com/a.png")
                .with_embeds(vec![Embed::new().with_title("report")])
                .with_split(SplitOptions::default().with_max_length(5)),
            config(),
        );
        let prepared = PreparedMessage {
            payload: message.resolve_payload().unwrap(),
            files: vec![resolved("a.png")],
        };
        let parts = prepared.split();
        assert_eq!(parts.len(), 3);
        for part in &parts {
            assert!(part.payload.tts);
            assert_eq!(part.payload.username.as_deref(), Some("hook"));
            assert!(part.payload.avatar_url.is_some());
        }
        for part in &parts[..2] {
            assert_eq!(part.payload.nonce, None);
            assert!(part.payload.embeds.is_none());
            let json = serde_json::to_value(&part.payload).unwrap();
            let mut keys: Vec<&String> = json.as_object().unwrap().keys().collect();
            keys.sort();
            assert_eq!(keys, ["avatar_url", "content", "tts", "username"]);
            assert!(part.payload.embed.is_none());
            assert!(part.files.is_empty());
        }
        let last = &parts[2];
        assert_eq!(last.payload.content, MessageContent::Text("three".into()));
        assert_eq!(last.payload.nonce, Some(9));
        assert_eq!(last.payload.embeds.as_ref().map(Vec::len), Some(1));
        assert_eq!(last.files.len(), 1);
    }

    #[rstest]
    #[case(Target::relay("hook"))]
    #[case(Target::new(TargetKind::OtherEntity))]
    fn explicit_null_embed_reaches_the_payload(#[case] target: Target) {
        let message = OutgoingMessage::new(
            target,
            MessageOptions::new().with_content("x").without_embed(),
            config(),
        );
        let json = serde_json::to_value(message.resolve_payload().unwrap()).unwrap();
        assert!(json.as_object().unwrap().contains_key("embed"));
        assert_eq!(json["embed"], Value::Null);
        assert_eq!(json["embeds"], json!([]));
    }

    #[test]
    fn unsplit_message_is_returned_as_is() {
        let prepared = PreparedMessage {
            payload: MessagePayload {
                content: MessageContent::Text("hi".into()),
                ..Default::default()
            },
            files: vec![resolved("b.txt")],
        };
        assert_eq!(prepared.clone().split(), vec![prepared]);
    }

    #[tokio::test]
    async fn prepare_reports_formatting_errors_before_reading_files() {
        let message = OutgoingMessage::new(
            Target::new(TargetKind::OtherEntity),
            MessageOptions::new()
                .with_nonce("abc")
                .add_file(Attachment::new("./does/not/exist.png")),
            config(),
        );
        let err = message
            .prepare(&courier_media::DataResolver::default())
            .await
            .unwrap_err();
        assert!(matches!(err, crate::Error::InvalidNonce { .. }));
    }
}
