use serde::{Deserialize, Serialize};

use crate::mention::MentionSource;

/// Destination kinds a message can be sent to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TargetKind {
    /// Webhook-style relay: takes a list of embeds and per-send
    /// username/avatar overrides.
    Relay,
    /// A user or member addressed directly.
    DirectEntity,
    /// Any other entity (guild text channel, thread, message).
    OtherEntity,
    /// A direct-message channel.
    DirectMessageChannel,
}

impl TargetKind {
    #[must_use]
    pub fn is_relay(self) -> bool {
        matches!(self, Self::Relay)
    }

    /// Whether a reply mention prefix is rendered for this kind.
    #[must_use]
    pub fn allows_reply_mention(self) -> bool {
        matches!(self, Self::Relay | Self::OtherEntity)
    }
}

impl std::fmt::Display for TargetKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Self::Relay => "relay",
            Self::DirectEntity => "direct_entity",
            Self::OtherEntity => "other_entity",
            Self::DirectMessageChannel => "direct_message_channel",
        })
    }
}

/// What the message builder reads from a destination.
pub trait MessageTarget: Send + Sync {
    fn kind(&self) -> TargetKind;

    /// Display name; relay targets use it as the default username.
    fn name(&self) -> Option<&str> {
        None
    }

    /// Resolve a raw user id from a loosely-typed reference.
    fn resolve_user_id(&self, source: &MentionSource) -> Option<String> {
        source.raw_id()
    }
}

impl<T: MessageTarget + ?Sized> MessageTarget for &T {
    fn kind(&self) -> TargetKind {
        (**self).kind()
    }

    fn name(&self) -> Option<&str> {
        (**self).name()
    }

    fn resolve_user_id(&self, source: &MentionSource) -> Option<String> {
        (**self).resolve_user_id(source)
    }
}

/// Plain target value for callers that have no richer destination type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Target {
    pub kind: TargetKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

impl Target {
    #[must_use]
    pub fn new(kind: TargetKind) -> Self {
        Self { kind, name: None }
    }

    #[must_use]
    pub fn relay(name: impl Into<String>) -> Self {
        Self::new(TargetKind::Relay).with_name(name)
    }

    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }
}

impl MessageTarget for Target {
    fn kind(&self) -> TargetKind {
        self.kind
    }

    fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }
}
