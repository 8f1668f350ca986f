use {
    courier_config::MessagesConfig,
    serde::{Deserialize, Serialize},
    tracing::debug,
};

use crate::{
    error::Result,
    mention::reply_prefix,
    options::MessageOptions,
    split::{SplitPlan, split_with_lead},
    target::MessageTarget,
};

const ZERO_WIDTH_SPACE: char = '\u{200b}';

/// Rendered message body: one string, or ordered chunks when splitting.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MessageContent {
    Text(String),
    Chunks(Vec<String>),
}

impl MessageContent {
    /// Every message this body turns into, in send order.
    #[must_use]
    pub fn parts(&self) -> Vec<&str> {
        match self {
            Self::Text(text) => vec![text.as_str()],
            Self::Chunks(chunks) => chunks.iter().map(String::as_str).collect(),
        }
    }

    #[must_use]
    pub fn is_chunked(&self) -> bool {
        matches!(self, Self::Chunks(_))
    }
}

impl Default for MessageContent {
    fn default() -> Self {
        Self::Text(String::new())
    }
}

/// Break every triple backtick inside a code block body so it cannot close
/// the surrounding fence.
#[must_use]
pub fn escape_code_block(text: &str) -> String {
    text.replace("```", &format!("`{ZERO_WIDTH_SPACE}``"))
}

/// Neutralize `@everyone` and `@here` (case-sensitive). Idempotent.
#[must_use]
pub fn escape_mass_mentions(text: &str) -> String {
    text.replace("@everyone", &format!("@{ZERO_WIDTH_SPACE}everyone"))
        .replace("@here", &format!("@{ZERO_WIDTH_SPACE}here"))
}

/// Render the final content for a send to `target`.
///
/// The reply mention leads the text (and the first chunk when splitting),
/// a code fence wraps the escaped body, mass mentions are neutralized
/// unless allowed, and an active split policy yields chunks. With both a
/// code fence and splitting, every chunk carries its own fence.
pub fn make_content(
    target: &dyn MessageTarget,
    options: &MessageOptions,
    defaults: &MessagesConfig,
) -> Result<MessageContent> {
    let content = options.content.as_deref().unwrap_or_default();
    let mention = match &options.reply {
        Some(source) if target.kind().allows_reply_mention() => reply_prefix(target, source)?,
        Some(_) => {
            debug!(target_kind = %target.kind(), "reply mention not rendered for this target");
            String::new()
        },
        None => String::new(),
    };
    if content.is_empty() && mention.is_empty() {
        return Ok(MessageContent::default());
    }

    let disable_everyone = options
        .disable_everyone
        .unwrap_or(defaults.disable_everyone);
    let escape = |text: String| {
        if disable_everyone {
            escape_mass_mentions(&text)
        } else {
            text
        }
    };
    let split = options
        .split_options()
        .map(|split| SplitPlan::resolve(split, &defaults.split));

    match (options.code_language(), split) {
        (Some(language), Some(mut plan)) => {
            plan.prepend = format!("{}```{language}\n", plan.prepend);
            plan.append = format!("\n```{}", plan.append);
            let body = escape(escape_code_block(content));
            Ok(MessageContent::Chunks(split_with_lead(&body, &mention, &plan)?))
        },
        (Some(language), None) => {
            let body = escape_code_block(content);
            Ok(MessageContent::Text(escape(format!(
                "{mention}```{language}\n{body}\n```"
            ))))
        },
        (None, Some(plan)) => {
            let body = escape(content.to_string());
            Ok(MessageContent::Chunks(split_with_lead(&body, &mention, &plan)?))
        },
        (None, None) => Ok(MessageContent::Text(escape(format!("{mention}{content}")))),
    }
}

#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests {
    use {
        super::*,
        crate::{
            Error,
            mention::MentionSource,
            options::SplitOptions,
            target::{Target, TargetKind},
        },
        rstest::rstest,
    };

    fn render(kind: TargetKind, options: &MessageOptions) -> MessageContent {
        make_content(&Target::new(kind), options, &MessagesConfig::default()).unwrap()
    }

    fn text(content: MessageContent) -> String {
        match content {
            MessageContent::Text(text) => text,
            MessageContent::Chunks(chunks) => panic!("expected text, got {chunks:?}"),
        }
    }

    fn chunks(content: MessageContent) -> Vec<String> {
        match content {
            MessageContent::Chunks(chunks) => chunks,
            MessageContent::Text(text) => panic!("expected chunks, got {text:?}"),
        }
    }

    #[test]
    fn unset_content_renders_empty() {
        assert_eq!(
            render(TargetKind::OtherEntity, &MessageOptions::new()),
            MessageContent::Text(String::new())
        );
        let split = MessageOptions::new().with_split(SplitOptions::default());
        assert_eq!(
            render(TargetKind::OtherEntity, &split),
            MessageContent::Text(String::new())
        );
    }

    #[rstest]
    #[case(TargetKind::Relay, "<@42>, hi")]
    #[case(TargetKind::OtherEntity, "<@42>, hi")]
    #[case(TargetKind::DirectEntity, "hi")]
    #[case(TargetKind::DirectMessageChannel, "hi")]
    fn reply_mention_depends_on_target(#[case] kind: TargetKind, #[case] expected: &str) {
        let options = MessageOptions::new().with_content("hi").reply_to("42");
        assert_eq!(text(render(kind, &options)), expected);
    }

    #[test]
    fn nickname_mention_form() {
        let options = MessageOptions::new()
            .with_content("hi")
            .reply_to(MentionSource::member("42", Some("Ace".into())));
        assert_eq!(text(render(TargetKind::OtherEntity, &options)), "<@!42>, hi");
    }

    #[test]
    fn mention_alone_is_rendered() {
        let options = MessageOptions::new().reply_to("42");
        assert_eq!(text(render(TargetKind::OtherEntity, &options)), "<@42>, ");
    }

    #[test]
    fn unresolvable_mention_fails() {
        let options = MessageOptions::new().with_content("hi").reply_to("");
        let err = make_content(
            &Target::new(TargetKind::OtherEntity),
            &options,
            &MessagesConfig::default(),
        )
        .unwrap_err();
        assert!(matches!(err, Error::InvalidMentionTarget));
    }

    #[test]
    fn code_fence_follows_mention_and_escapes_body() {
        let options = MessageOptions::new()
            .with_content("let a = ```;")
            .with_code("rs")
            .reply_to("42");
        assert_eq!(
            text(render(TargetKind::OtherEntity, &options)),
            "<@42>, ```rs\nlet a = `\u{200b}``;\n```"
        );
    }

    #[test]
    fn plain_fence_has_no_language() {
        let options = MessageOptions::new().with_content("x").with_code("");
        assert_eq!(text(render(TargetKind::Relay, &options)), "```\nx\n```");
    }

    #[test]
    fn fence_and_split_fence_every_chunk() {
        let body: Vec<String> = (0..40).map(|i| format!("console.log({i});")).collect();
        let options = MessageOptions::new()
            .with_content(body.join("\n"))
            .with_code("js")
            .with_split(SplitOptions::default().with_max_length(120));
        let chunks = chunks(render(TargetKind::OtherEntity, &options));
        assert!(chunks.len() > 1);
        for chunk in &chunks {
            assert!(chunk.starts_with("```js\n"), "{chunk:?}");
            assert!(chunk.ends_with("\n```"), "{chunk:?}");
            assert!(chunk.chars().count() <= 120);
        }
    }

    #[test]
    fn mention_leads_first_fenced_chunk() {
        let options = MessageOptions::new()
            .with_content("a\nb")
            .with_code("js")
            .with_split(SplitOptions::default().with_max_length(20))
            .reply_to("7");
        let chunks = chunks(render(TargetKind::Relay, &options));
        assert_eq!(chunks, vec!["<@7>, ```js\na\nb\n```"]);
    }

    #[test]
    fn split_uses_configured_defaults() {
        let defaults = MessagesConfig {
            split: courier_config::SplitDefaults {
                max_length: 5,
                ..Default::default()
            },
            ..Default::default()
        };
        let options = MessageOptions::new()
            .with_content("abc\ndef")
            .with_split(SplitOptions::default());
        let content = make_content(&Target::new(TargetKind::Relay), &options, &defaults).unwrap();
        assert_eq!(chunks(content), vec!["abc", "def"]);
    }

    #[rstest]
    #[case("@everyone hi", "@\u{200b}everyone hi")]
    #[case("ping @here now", "ping @\u{200b}here now")]
    #[case("@Everyone hi", "@Everyone hi")]
    #[case("@HERE", "@HERE")]
    fn mass_mentions_are_case_sensitive(#[case] input: &str, #[case] expected: &str) {
        let escaped = escape_mass_mentions(input);
        assert_eq!(escaped, expected);
        assert_eq!(escape_mass_mentions(&escaped), escaped);
    }

    #[rstest]
    #[case(false, None, "@everyone")]
    #[case(true, None, "@\u{200b}everyone")]
    #[case(true, Some(false), "@everyone")]
    #[case(false, Some(true), "@\u{200b}everyone")]
    fn per_send_override_beats_default(
        #[case] default: bool,
        #[case] override_: Option<bool>,
        #[case] expected: &str,
    ) {
        let defaults = MessagesConfig {
            disable_everyone: default,
            ..Default::default()
        };
        let options = MessageOptions {
            disable_everyone: override_,
            ..MessageOptions::new().with_content("@everyone")
        };
        let content =
            make_content(&Target::new(TargetKind::OtherEntity), &options, &defaults).unwrap();
        assert_eq!(text(content), expected);
    }

    #[test]
    fn escaping_happens_before_splitting() {
        let options = MessageOptions::new()
            .with_content("@everyone\n@here")
            .with_disable_everyone(true)
            .with_split(SplitOptions::default().with_max_length(10));
        let chunks = chunks(render(TargetKind::OtherEntity, &options));
        assert_eq!(chunks, vec!["@\u{200b}everyone", "@\u{200b}here"]);
    }

    #[test]
    fn parts_lists_every_message() {
        assert_eq!(MessageContent::Text("a".into()).parts(), vec!["a"]);
        let chunked = MessageContent::Chunks(vec!["a".into(), "b".into()]);
        assert_eq!(chunked.parts(), vec!["a", "b"]);
        assert!(chunked.is_chunked());
    }
}
