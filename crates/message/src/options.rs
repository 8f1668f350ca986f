use courier_config::LineMode;

use crate::{
    attachment::{Attachment, FileLike},
    embed::Embed,
    mention::MentionSource,
};

/// Client-chosen message nonce, as an integer or its string form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Nonce {
    Integer(i64),
    Text(String),
}

impl From<i64> for Nonce {
    fn from(value: i64) -> Self {
        Self::Integer(value)
    }
}

impl From<&str> for Nonce {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for Nonce {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl std::fmt::Display for Nonce {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Integer(n) => write!(f, "{n}"),
            Self::Text(s) => f.write_str(s),
        }
    }
}

/// Long-message splitting policy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Split {
    Off,
    On(SplitOptions),
}

/// Per-send split knobs. Unset knobs fall back to `SplitDefaults`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SplitOptions {
    pub max_length: Option<usize>,
    pub separator: Option<String>,
    /// Text placed at the start of every chunk.
    pub prepend: Option<String>,
    /// Text placed at the end of every chunk.
    pub append: Option<String>,
    pub line_mode: Option<LineMode>,
}

impl SplitOptions {
    #[must_use]
    pub fn with_max_length(mut self, max_length: usize) -> Self {
        self.max_length = Some(max_length);
        self
    }

    #[must_use]
    pub fn with_separator(mut self, separator: impl Into<String>) -> Self {
        self.separator = Some(separator.into());
        self
    }

    #[must_use]
    pub fn with_prepend(mut self, prepend: impl Into<String>) -> Self {
        self.prepend = Some(prepend.into());
        self
    }

    #[must_use]
    pub fn with_append(mut self, append: impl Into<String>) -> Self {
        self.append = Some(append.into());
        self
    }

    #[must_use]
    pub fn with_line_mode(mut self, line_mode: LineMode) -> Self {
        self.line_mode = Some(line_mode);
        self
    }
}

/// Code-fence wrapping. An empty language renders a plain fence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CodeBlock {
    Off,
    Language(String),
}

impl CodeBlock {
    #[must_use]
    pub fn plain() -> Self {
        Self::Language(String::new())
    }
}

/// The single-embed field: an explicit `null` is kept distinct from unset.
#[derive(Debug, Clone, PartialEq)]
pub enum EmbedSlot {
    Null,
    Item(Embed),
}

/// Canonical send options.
///
/// Every field is optional so that records can be layered: a later record
/// overrides only the fields it sets (see [`MessageOptions::merge`]).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MessageOptions {
    pub content: Option<String>,
    pub tts: Option<bool>,
    pub nonce: Option<Nonce>,
    /// Prefix the content with a mention of this user.
    pub reply: Option<MentionSource>,
    pub split: Option<Split>,
    pub code: Option<CodeBlock>,
    /// Overrides `MessagesConfig::disable_everyone` for this send.
    pub disable_everyone: Option<bool>,
    pub embed: Option<EmbedSlot>,
    pub embeds: Option<Vec<Embed>>,
    pub files: Option<Vec<FileLike>>,
    pub username: Option<String>,
    pub avatar_url: Option<String>,
}

impl MessageOptions {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_content(mut self, content: impl Into<String>) -> Self {
        self.content = Some(content.into());
        self
    }

    #[must_use]
    pub fn with_tts(mut self, tts: bool) -> Self {
        self.tts = Some(tts);
        self
    }

    #[must_use]
    pub fn with_nonce(mut self, nonce: impl Into<Nonce>) -> Self {
        self.nonce = Some(nonce.into());
        self
    }

    #[must_use]
    pub fn reply_to(mut self, source: impl Into<MentionSource>) -> Self {
        self.reply = Some(source.into());
        self
    }

    #[must_use]
    pub fn with_split(mut self, options: SplitOptions) -> Self {
        self.split = Some(Split::On(options));
        self
    }

    #[must_use]
    pub fn with_code(mut self, language: impl Into<String>) -> Self {
        self.code = Some(CodeBlock::Language(language.into()));
        self
    }

    #[must_use]
    pub fn with_disable_everyone(mut self, disable: bool) -> Self {
        self.disable_everyone = Some(disable);
        self
    }

    #[must_use]
    pub fn with_embed(mut self, embed: Embed) -> Self {
        self.embed = Some(EmbedSlot::Item(embed));
        self
    }

    /// Send an explicit `embed: null`.
    #[must_use]
    pub fn without_embed(mut self) -> Self {
        self.embed = Some(EmbedSlot::Null);
        self
    }

    #[must_use]
    pub fn with_embeds(mut self, embeds: Vec<Embed>) -> Self {
        self.embeds = Some(embeds);
        self
    }

    #[must_use]
    pub fn add_file(mut self, file: impl Into<FileLike>) -> Self {
        self.files.get_or_insert_with(Vec::new).push(file.into());
        self
    }

    #[must_use]
    pub fn with_username(mut self, username: impl Into<String>) -> Self {
        self.username = Some(username.into());
        self
    }

    #[must_use]
    pub fn with_avatar_url(mut self, avatar_url: impl Into<String>) -> Self {
        self.avatar_url = Some(avatar_url.into());
        self
    }

    /// Shallow merge: every field set on `overrides` replaces the one here.
    #[must_use]
    pub fn merge(self, overrides: MessageOptions) -> MessageOptions {
        MessageOptions {
            content: overrides.content.or(self.content),
            tts: overrides.tts.or(self.tts),
            nonce: overrides.nonce.or(self.nonce),
            reply: overrides.reply.or(self.reply),
            split: overrides.split.or(self.split),
            code: overrides.code.or(self.code),
            disable_everyone: overrides.disable_everyone.or(self.disable_everyone),
            embed: overrides.embed.or(self.embed),
            embeds: overrides.embeds.or(self.embeds),
            files: overrides.files.or(self.files),
            username: overrides.username.or(self.username),
            avatar_url: overrides.avatar_url.or(self.avatar_url),
        }
    }

    #[must_use]
    pub fn split_options(&self) -> Option<&SplitOptions> {
        match &self.split {
            Some(Split::On(options)) => Some(options),
            Some(Split::Off) | None => None,
        }
    }

    #[must_use]
    pub fn code_language(&self) -> Option<&str> {
        match &self.code {
            Some(CodeBlock::Language(language)) => Some(language),
            Some(CodeBlock::Off) | None => None,
        }
    }

    /// Rich-content items in send order: the single item, then the list.
    pub fn rich_items(&self) -> impl Iterator<Item = &Embed> {
        let single = match &self.embed {
            Some(EmbedSlot::Item(embed)) => Some(embed),
            Some(EmbedSlot::Null) | None => None,
        };
        single.into_iter().chain(self.embeds.iter().flatten())
    }
}

/// One argument of a send call, before normalization.
#[derive(Debug, Clone, PartialEq)]
pub enum MessageInput {
    Text(String),
    Options(Box<MessageOptions>),
    Embed(Box<Embed>),
    Attachment(Attachment),
    /// Mixed embeds and attachments; anything else inside is ignored.
    Additions(Vec<MessageInput>),
}

impl From<&str> for MessageInput {
    fn from(text: &str) -> Self {
        Self::Text(text.to_string())
    }
}

impl From<String> for MessageInput {
    fn from(text: String) -> Self {
        Self::Text(text)
    }
}

impl From<MessageOptions> for MessageInput {
    fn from(options: MessageOptions) -> Self {
        Self::Options(Box::new(options))
    }
}

impl From<Embed> for MessageInput {
    fn from(embed: Embed) -> Self {
        Self::Embed(Box::new(embed))
    }
}

impl From<Attachment> for MessageInput {
    fn from(attachment: Attachment) -> Self {
        Self::Attachment(attachment)
    }
}

impl From<Vec<MessageInput>> for MessageInput {
    fn from(items: Vec<MessageInput>) -> Self {
        Self::Additions(items)
    }
}

impl From<Vec<Embed>> for MessageInput {
    fn from(embeds: Vec<Embed>) -> Self {
        Self::Additions(embeds.into_iter().map(Self::from).collect())
    }
}
