use std::sync::Arc;

use {
    anyhow::Result,
    clap::{Args, ValueEnum},
    courier_config::{CourierConfig, LineMode},
    courier_media::DataResolver,
    courier_message::{
        Attachment, Embed, MentionSource, MessageOptions, OutgoingMessage, PreparedMessage,
        SplitOptions, Target, TargetKind,
    },
    serde_json::{Value, json},
    tracing::info,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum CliTargetKind {
    Relay,
    DirectEntity,
    OtherEntity,
    Dm,
}

impl From<CliTargetKind> for TargetKind {
    fn from(value: CliTargetKind) -> Self {
        match value {
            CliTargetKind::Relay => Self::Relay,
            CliTargetKind::DirectEntity => Self::DirectEntity,
            CliTargetKind::OtherEntity => Self::OtherEntity,
            CliTargetKind::Dm => Self::DirectMessageChannel,
        }
    }
}

#[derive(Debug, Args)]
pub struct PreviewArgs {
    /// Message text.
    pub content: Option<String>,

    /// Kind of destination the message is built for.
    #[arg(long, value_enum, default_value_t = CliTargetKind::OtherEntity)]
    pub kind: CliTargetKind,

    /// Destination display name (default username for relay targets).
    #[arg(long)]
    pub name: Option<String>,

    /// Reply to this user id.
    #[arg(long)]
    pub reply: Option<String>,

    /// Nickname of the replied-to member; selects the nickname mention form.
    #[arg(long, requires = "reply")]
    pub nickname: Option<String>,

    #[arg(long)]
    pub tts: bool,

    #[arg(long)]
    pub nonce: Option<String>,

    /// Wrap the content in a code block, optionally with a language tag.
    #[arg(long, num_args = 0..=1, default_missing_value = "")]
    pub code: Option<String>,

    /// Split long content into several messages.
    #[arg(long)]
    pub split: bool,

    #[arg(long)]
    pub max_length: Option<usize>,

    #[arg(long)]
    pub separator: Option<String>,

    #[arg(long)]
    pub prepend: Option<String>,

    #[arg(long)]
    pub append: Option<String>,

    /// Break lines that exceed the limit instead of failing.
    #[arg(long)]
    pub break_lines: bool,

    /// Neutralize @everyone/@here (overrides the config default).
    #[arg(long, num_args = 0..=1, default_missing_value = "true")]
    pub disable_everyone: Option<bool>,

    #[arg(long)]
    pub embed_title: Option<String>,

    #[arg(long)]
    pub embed_description: Option<String>,

    #[arg(long)]
    pub embed_image: Option<String>,

    /// Send an explicit `embed: null`.
    #[arg(long, conflicts_with_all = ["embed_title", "embed_description", "embed_image"])]
    pub no_embed: bool,

    /// Attach a file (path or URL). Use `name=source` to rename it.
    #[arg(long = "file")]
    pub files: Vec<String>,

    #[arg(long)]
    pub username: Option<String>,

    #[arg(long)]
    pub avatar_url: Option<String>,

    /// Print one payload per chunk, the way the messages would be sent.
    #[arg(long)]
    pub split_messages: bool,

    /// Resolve attachments and list their names and sizes.
    #[arg(long)]
    pub resolve_files: bool,
}

impl PreviewArgs {
    fn split_options(&self) -> Option<SplitOptions> {
        let knobs_set = self.max_length.is_some()
            || self.separator.is_some()
            || self.prepend.is_some()
            || self.append.is_some()
            || self.break_lines;
        if !self.split && !knobs_set {
            return None;
        }
        Some(SplitOptions {
            max_length: self.max_length,
            separator: self.separator.clone(),
            prepend: self.prepend.clone(),
            append: self.append.clone(),
            line_mode: self.break_lines.then_some(LineMode::Break),
        })
    }

    fn embed(&self) -> Option<Embed> {
        if self.embed_title.is_none()
            && self.embed_description.is_none()
            && self.embed_image.is_none()
        {
            return None;
        }
        let mut embed = Embed::new();
        embed.title = self.embed_title.clone();
        embed.description = self.embed_description.clone();
        if let Some(image) = &self.embed_image {
            embed = embed.with_image(image);
        }
        Some(embed)
    }

    fn to_options(&self) -> MessageOptions {
        let mut options = MessageOptions {
            content: self.content.clone(),
            tts: self.tts.then_some(true),
            disable_everyone: self.disable_everyone,
            username: self.username.clone(),
            avatar_url: self.avatar_url.clone(),
            ..Default::default()
        };
        if let Some(nonce) = &self.nonce {
            options = options.with_nonce(nonce.as_str());
        }
        if let Some(id) = &self.reply {
            options = options.reply_to(match &self.nickname {
                Some(nickname) => MentionSource::member(id.as_str(), Some(nickname.clone())),
                None => MentionSource::from(id.as_str()),
            });
        }
        if let Some(language) = &self.code {
            options = options.with_code(language.as_str());
        }
        if let Some(split) = self.split_options() {
            options = options.with_split(split);
        }
        if self.no_embed {
            options = options.without_embed();
        } else if let Some(embed) = self.embed() {
            options = options.with_embed(embed);
        }
        for file in &self.files {
            options = options.add_file(parse_file(file));
        }
        options
    }
}

/// `name=source` renames the upload; anything else is a bare source.
fn parse_file(spec: &str) -> Attachment {
    match spec.split_once('=') {
        Some((name, source)) if !name.is_empty() && !name.contains('/') => {
            Attachment::new(source).with_name(name)
        },
        _ => Attachment::new(spec),
    }
}

fn render(message: &PreparedMessage) -> Result<Value> {
    let files: Vec<Value> = message
        .files
        .iter()
        .map(|file| {
            json!({
                "name": file.name,
                "bytes": file.file.len(),
                "source": file.attachment.kind(),
            })
        })
        .collect();
    Ok(json!({
        "payload": serde_json::to_value(&message.payload)?,
        "files": files,
    }))
}

pub async fn handle_preview(args: PreviewArgs, config: CourierConfig) -> Result<()> {
    let resolver = DataResolver::from_config(&config.files)?;
    let target = Target {
        kind: args.kind.into(),
        name: args.name.clone(),
    };
    let message = OutgoingMessage::new(target, args.to_options(), Arc::new(config));

    let prepared = if args.resolve_files {
        message.prepare(&resolver).await?
    } else {
        PreparedMessage {
            payload: message.resolve_payload()?,
            files: Vec::new(),
        }
    };
    let messages = if args.split_messages {
        prepared.split()
    } else {
        vec![prepared]
    };
    info!(messages = messages.len(), "rendered preview");

    for message in &messages {
        println!("{}", serde_json::to_string_pretty(&render(message)?)?);
    }
    Ok(())
}
