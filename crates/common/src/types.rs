//! Core data types for the wuphf broadcast system.

use std::{
    fmt,
    str::FromStr,
    time::{SystemTime, UNIX_EPOCH},
};

use {serde::{Deserialize, Serialize}, uuid::Uuid};

use crate::error::Error;

/// Current time as epoch milliseconds.
#[must_use]
pub fn now_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_millis() as u64
}

/// A delivery surface a wuphf can go out on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChannelKind {
    Facebook,
    Twitter,
    Sms,
    Email,
    Chat,
    Printer,
    LinkedIn,
    Instagram,
    Slack,
}

impl ChannelKind {
    /// Every supported channel, in presentation order.
    pub const ALL: [Self; 9] = [
        Self::Facebook,
        Self::Twitter,
        Self::Sms,
        Self::Email,
        Self::Chat,
        Self::Printer,
        Self::LinkedIn,
        Self::Instagram,
        Self::Slack,
    ];

    /// Stable lowercase identifier, matching the serde representation.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Facebook => "facebook",
            Self::Twitter => "twitter",
            Self::Sms => "sms",
            Self::Email => "email",
            Self::Chat => "chat",
            Self::Printer => "printer",
            Self::LinkedIn => "linkedin",
            Self::Instagram => "instagram",
            Self::Slack => "slack",
        }
    }
}

impl fmt::Display for ChannelKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

impl FromStr for ChannelKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "facebook" => Ok(Self::Facebook),
            "twitter" => Ok(Self::Twitter),
            "sms" => Ok(Self::Sms),
            "email" => Ok(Self::Email),
            "chat" => Ok(Self::Chat),
            "printer" => Ok(Self::Printer),
            "linkedin" => Ok(Self::LinkedIn),
            "instagram" => Ok(Self::Instagram),
            "slack" => Ok(Self::Slack),
            other => Err(Error::unknown_channel(other)),
        }
    }
}

/// Where a message is in its lifecycle.
///
/// Created `Pending`, flipped to `Sending` the moment dispatch begins, then
/// exactly one transition to a terminal value once every channel has reported
/// back. Terminal messages never change again.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum DeliveryStatus {
    Pending,
    Sending,
    Delivered,
    PartiallyDelivered,
    Failed,
}

impl DeliveryStatus {
    #[must_use]
    pub fn is_terminal(self) -> bool {
        matches!(
            self,
            Self::Delivered | Self::PartiallyDelivered | Self::Failed
        )
    }
}

/// Result of one channel's delivery attempt. Immutable once produced.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeliveryOutcome {
    pub channel: ChannelKind,
    pub success: bool,
    /// Reference id from the external service. Present iff the attempt succeeded.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub external_id: Option<String>,
    /// Human-readable failure description. Present iff the attempt failed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    pub attempted_at_ms: u64,
}

impl DeliveryOutcome {
    #[must_use]
    pub fn ok(channel: ChannelKind, external_id: impl Into<String>) -> Self {
        Self {
            channel,
            success: true,
            external_id: Some(external_id.into()),
            error: None,
            attempted_at_ms: now_ms(),
        }
    }

    #[must_use]
    pub fn failed(channel: ChannelKind, error: impl Into<String>) -> Self {
        Self {
            channel,
            success: false,
            external_id: None,
            error: Some(error.into()),
            attempted_at_ms: now_ms(),
        }
    }
}

/// A wuphf: one message broadcast across a set of channels.
///
/// Once `status` is terminal, `outcomes` holds exactly one entry per
/// requested channel; until then it is empty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Message {
    pub id: String,
    pub from_user: String,
    pub to_user: String,
    pub body: String,
    pub created_at_ms: u64,
    pub channels: Vec<ChannelKind>,
    pub status: DeliveryStatus,
    #[serde(default)]
    pub outcomes: Vec<DeliveryOutcome>,
}

impl Message {
    #[must_use]
    pub fn new(
        from_user: impl Into<String>,
        to_user: impl Into<String>,
        body: impl Into<String>,
        channels: Vec<ChannelKind>,
    ) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            from_user: from_user.into(),
            to_user: to_user.into(),
            body: body.into(),
            created_at_ms: now_ms(),
            channels,
            status: DeliveryStatus::Pending,
            outcomes: Vec::new(),
        }
    }

    /// Outcome for a channel, resolved by identity rather than position.
    #[must_use]
    pub fn outcome_for(&self, kind: ChannelKind) -> Option<&DeliveryOutcome> {
        self.outcomes.iter().find(|o| o.channel == kind)
    }

    #[must_use]
    pub fn success_count(&self) -> usize {
        self.outcomes.iter().filter(|o| o.success).count()
    }

    /// Whether `name` is the sender or the recipient (case-insensitive).
    #[must_use]
    pub fn involves_user(&self, name: &str) -> bool {
        self.from_user.eq_ignore_ascii_case(name) || self.to_user.eq_ignore_ascii_case(name)
    }
}

/// Product limits. Only the message and channel caps are enforced by
/// validation; the per-user daily quota and printer queue depth are carried
/// as data for front ends to display.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Limits {
    pub max_message_len: usize,
    pub max_channels: usize,
    pub max_messages_per_user_per_day: u32,
    pub printer_queue_limit: u32,
}

impl Default for Limits {
    fn default() -> Self {
        Self {
            max_message_len: 280,
            max_channels: 9,
            max_messages_per_user_per_day: 100,
            printer_queue_limit: 50,
        }
    }
}

#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_channel_kind_serializes_lowercase() {
        let json = serde_json::to_string(&ChannelKind::LinkedIn).unwrap();
        assert_eq!(json, "\"linkedin\"");
        let back: ChannelKind = serde_json::from_str("\"sms\"").unwrap();
        assert_eq!(back, ChannelKind::Sms);
    }

    #[test]
    fn test_channel_kind_parse_roundtrip() {
        for kind in ChannelKind::ALL {
            assert_eq!(kind.as_str().parse::<ChannelKind>().unwrap(), kind);
        }
        assert!("myspace".parse::<ChannelKind>().is_err());
    }

    #[test]
    fn test_channel_kind_parse_is_case_insensitive() {
        assert_eq!(
            "LinkedIn".parse::<ChannelKind>().unwrap(),
            ChannelKind::LinkedIn
        );
    }

    #[test]
    fn test_status_serializes_camel_case() {
        let json = serde_json::to_string(&DeliveryStatus::PartiallyDelivered).unwrap();
        assert_eq!(json, "\"partiallyDelivered\"");
    }

    #[test]
    fn test_terminal_statuses() {
        assert!(!DeliveryStatus::Pending.is_terminal());
        assert!(!DeliveryStatus::Sending.is_terminal());
        assert!(DeliveryStatus::Delivered.is_terminal());
        assert!(DeliveryStatus::PartiallyDelivered.is_terminal());
        assert!(DeliveryStatus::Failed.is_terminal());
    }

    #[test]
    fn test_outcome_constructors_pair_fields() {
        let ok = DeliveryOutcome::ok(ChannelKind::Email, "email_abc");
        assert!(ok.success);
        assert_eq!(ok.external_id.as_deref(), Some("email_abc"));
        assert!(ok.error.is_none());

        let failed = DeliveryOutcome::failed(ChannelKind::Printer, "out of toner");
        assert!(!failed.success);
        assert!(failed.external_id.is_none());
        assert_eq!(failed.error.as_deref(), Some("out of toner"));
    }

    #[test]
    fn test_outcome_skips_absent_fields() {
        let ok = DeliveryOutcome::ok(ChannelKind::Email, "email_abc");
        let v = serde_json::to_value(&ok).unwrap();
        assert!(v.get("error").is_none());
        assert_eq!(v["externalId"], "email_abc");
    }

    #[test]
    fn test_message_starts_pending_with_fresh_id() {
        let a = Message::new("pam", "jim", "hello", vec![ChannelKind::Email]);
        let b = Message::new("pam", "jim", "hello", vec![ChannelKind::Email]);
        assert_eq!(a.status, DeliveryStatus::Pending);
        assert!(a.outcomes.is_empty());
        assert_ne!(a.id, b.id);
    }

    #[test]
    fn test_outcome_for_resolves_by_identity() {
        let mut message = Message::new(
            "pam",
            "jim",
            "hello",
            vec![ChannelKind::Email, ChannelKind::Printer],
        );
        message.outcomes = vec![
            DeliveryOutcome::failed(ChannelKind::Printer, "out of paper"),
            DeliveryOutcome::ok(ChannelKind::Email, "email_1"),
        ];
        assert!(message.outcome_for(ChannelKind::Email).unwrap().success);
        assert!(!message.outcome_for(ChannelKind::Printer).unwrap().success);
        assert!(message.outcome_for(ChannelKind::Slack).is_none());
        assert_eq!(message.success_count(), 1);
    }

    #[test]
    fn test_involves_user_matches_either_side() {
        let message = Message::new("Pam", "jim", "hello", vec![ChannelKind::Email]);
        assert!(message.involves_user("pam"));
        assert!(message.involves_user("JIM"));
        assert!(!message.involves_user("dwight"));
    }

    #[test]
    fn test_message_roundtrip() {
        let mut message = Message::new("pam", "jim", "hello", vec![ChannelKind::Email]);
        message.status = DeliveryStatus::Delivered;
        message.outcomes = vec![DeliveryOutcome::ok(ChannelKind::Email, "email_1")];
        let json = serde_json::to_string(&message).unwrap();
        let back: Message = serde_json::from_str(&json).unwrap();
        assert_eq!(message, back);
    }

    #[test]
    fn test_default_limits() {
        let limits = Limits::default();
        assert_eq!(limits.max_message_len, 280);
        assert_eq!(limits.max_channels, 9);
    }
}
