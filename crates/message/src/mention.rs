use serde_json::Value;

use crate::{
    error::{Error, Result},
    target::MessageTarget,
};

/// Who a reply mention points at.
#[derive(Debug, Clone, PartialEq)]
pub enum MentionSource {
    /// A bare user id.
    Id(String),
    User {
        id: String,
    },
    /// A guild member; a set nickname selects the `<@!id>` form.
    Member {
        id: String,
        nickname: Option<String>,
    },
    /// Loosely-typed object expected to carry an `id` key.
    Object(Value),
}

impl MentionSource {
    #[must_use]
    pub fn member(id: impl Into<String>, nickname: Option<String>) -> Self {
        Self::Member {
            id: id.into(),
            nickname,
        }
    }

    /// The id carried by the reference, if any.
    #[must_use]
    pub fn raw_id(&self) -> Option<String> {
        let id = match self {
            Self::Id(id) | Self::User { id } | Self::Member { id, .. } => id.trim().to_string(),
            Self::Object(value) => match value.get("id")? {
                Value::String(s) => s.trim().to_string(),
                Value::Number(n) => n.to_string(),
                _ => return None,
            },
        };
        (!id.is_empty()).then_some(id)
    }

    #[must_use]
    pub fn has_nickname(&self) -> bool {
        matches!(self, Self::Member { nickname: Some(nick), .. } if !nick.is_empty())
    }
}

impl From<&str> for MentionSource {
    fn from(id: &str) -> Self {
        Self::Id(id.to_string())
    }
}

impl From<String> for MentionSource {
    fn from(id: String) -> Self {
        Self::Id(id)
    }
}

/// Render the `"<@id>, "` reply prefix for `source`.
pub fn reply_prefix(target: &dyn MessageTarget, source: &MentionSource) -> Result<String> {
    let id = target
        .resolve_user_id(source)
        .ok_or(Error::InvalidMentionTarget)?;
    let bang = if source.has_nickname() { "!" } else { "" };
    Ok(format!("<@{bang}{id}>, "))
}

#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests {
    use {
        super::*,
        crate::target::{Target, TargetKind},
        rstest::rstest,
        serde_json::json,
    };

    #[rstest]
    #[case(MentionSource::from("123"), "<@123>, ")]
    #[case(MentionSource::User { id: "123".into() }, "<@123>, ")]
    #[case(MentionSource::member("123", None), "<@123>, ")]
    #[case(MentionSource::member("123", Some("Ace".into())), "<@!123>, ")]
    #[case(MentionSource::member("123", Some(String::new())), "<@123>, ")]
    #[case(MentionSource::Object(json!({"id": "123"})), "<@123>, ")]
    #[case(MentionSource::Object(json!({"id": 123})), "<@123>, ")]
    fn renders_prefix(#[case] source: MentionSource, #[case] expected: &str) {
        let target = Target::new(TargetKind::OtherEntity);
        assert_eq!(reply_prefix(&target, &source).unwrap(), expected);
    }

    #[rstest]
    #[case(MentionSource::from("  "))]
    #[case(MentionSource::Object(json!({"name": "no id"})))]
    #[case(MentionSource::Object(json!({"id": null})))]
    #[case(MentionSource::Object(json!("123")))]
    fn unresolvable_sources_fail(#[case] source: MentionSource) {
        let target = Target::new(TargetKind::OtherEntity);
        let err = reply_prefix(&target, &source).unwrap_err();
        assert!(matches!(err, Error::InvalidMentionTarget));
    }

    struct DirectoryTarget;

    impl MessageTarget for DirectoryTarget {
        fn kind(&self) -> TargetKind {
            TargetKind::OtherEntity
        }

        fn resolve_user_id(&self, source: &MentionSource) -> Option<String> {
            match source.raw_id()?.as_str() {
                "alice" => Some("42".to_string()),
                _ => None,
            }
        }
    }

    #[test]
    fn target_controls_id_resolution() {
        assert_eq!(
            reply_prefix(&DirectoryTarget, &MentionSource::from("alice")).unwrap(),
            "<@42>, "
        );
        assert!(reply_prefix(&DirectoryTarget, &MentionSource::from("bob")).is_err());
    }
}
