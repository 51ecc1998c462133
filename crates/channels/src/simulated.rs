//! Simulated channel transports.
//!
//! Each kind gets a behavior profile: a success rate, a latency window
//! standing in for the network round trip, an external-id prefix, and a
//! kind-specific failure text. Twitter additionally hard-fails any body over
//! its 280-character cap. Profiles are plain data so tests can pin rates and
//! zero out latency.

use std::{ops::Range, time::Duration};

use {rand::Rng, tracing::{debug, warn}, uuid::Uuid};

use wuphf_common::types::{ChannelKind, DeliveryOutcome};

use crate::transport::{ChannelTransport, DeliveryRequest};

/// Behavior profile for one simulated channel.
#[derive(Debug, Clone)]
pub struct TransportProfile {
    pub kind: ChannelKind,
    /// Chance of a successful delivery, in percent.
    pub success_percent: u8,
    /// Simulated round-trip window, sampled uniformly in milliseconds.
    pub latency_ms: Range<u64>,
    /// Prefix for generated external reference ids.
    pub id_prefix: &'static str,
    /// Failure description reported when the attempt does not go through.
    pub failure_text: &'static str,
    /// Bodies longer than this always fail, regardless of the roll.
    pub max_body_len: Option<usize>,
}

impl TransportProfile {
    /// Reference profile table. Adding a channel means one more row here.
    #[must_use]
    pub fn for_kind(kind: ChannelKind) -> Self {
        let (success_percent, id_prefix, failure_text, max_body_len) = match kind {
            ChannelKind::Facebook => (85, "fb_", "Facebook API rate limit exceeded", None),
            ChannelKind::Twitter => (
                80,
                "tw_",
                "Tweet too long or Twitter is down again",
                Some(280),
            ),
            ChannelKind::Sms => (90, "sms_", "Invalid phone number format", None),
            // Email almost always works.
            ChannelKind::Email => (100, "email_", "Mailbox unavailable", None),
            ChannelKind::Chat => (75, "chat_", "User is offline", None),
            ChannelKind::Printer => (60, "print_", "Printer out of paper or toner", None),
            ChannelKind::LinkedIn => (70, "li_", "LinkedIn connection required", None),
            ChannelKind::Instagram => (65, "ig_", "Instagram requires visual content", None),
            ChannelKind::Slack => (75, "slack_", "Slack webhook failed or unreachable", None),
        };
        Self {
            kind,
            success_percent,
            latency_ms: 100..1000,
            id_prefix,
            failure_text,
            max_body_len,
        }
    }

    /// Same profile with no simulated latency.
    #[must_use]
    pub fn instant(mut self) -> Self {
        self.latency_ms = 0..0;
        self
    }

    /// Same profile with a pinned success rate.
    #[must_use]
    pub fn with_success_percent(mut self, success_percent: u8) -> Self {
        self.success_percent = success_percent;
        self
    }
}

/// Transport that emulates a real platform from a [`TransportProfile`].
pub struct SimulatedTransport {
    profile: TransportProfile,
}

impl SimulatedTransport {
    #[must_use]
    pub fn new(profile: TransportProfile) -> Self {
        Self { profile }
    }

    fn roll(&self) -> bool {
        rand::rng().random_range(0..100) < u64::from(self.profile.success_percent)
    }

    fn external_id(&self) -> String {
        format!("{}{}", self.profile.id_prefix, Uuid::new_v4().simple())
    }
}

#[async_trait::async_trait]
impl ChannelTransport for SimulatedTransport {
    async fn attempt(&self, request: &DeliveryRequest) -> DeliveryOutcome {
        let delay = if self.profile.latency_ms.is_empty() {
            0
        } else {
            rand::rng().random_range(self.profile.latency_ms.clone())
        };
        if delay > 0 {
            tokio::time::sleep(Duration::from_millis(delay)).await;
        }

        let over_cap = self
            .profile
            .max_body_len
            .is_some_and(|cap| request.body.chars().count() > cap);
        if !over_cap && self.roll() {
            let external_id = self.external_id();
            debug!(
                channel = %request.channel,
                external_id = %external_id,
                latency_ms = delay,
                "delivered"
            );
            DeliveryOutcome::ok(request.channel, external_id)
        } else {
            warn!(
                channel = %request.channel,
                error = self.profile.failure_text,
                "delivery failed"
            );
            DeliveryOutcome::failed(request.channel, self.profile.failure_text)
        }
    }
}

#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests {
    use super::*;

    fn request(kind: ChannelKind, body: &str) -> DeliveryRequest {
        DeliveryRequest {
            channel: kind,
            from_user: "pam".into(),
            to_user: "jim".into(),
            body: body.into(),
        }
    }

    #[test]
    fn test_profile_table_id_prefixes() {
        assert_eq!(TransportProfile::for_kind(ChannelKind::Facebook).id_prefix, "fb_");
        assert_eq!(TransportProfile::for_kind(ChannelKind::Email).id_prefix, "email_");
        assert_eq!(TransportProfile::for_kind(ChannelKind::Printer).id_prefix, "print_");
    }

    #[test]
    fn test_email_profile_never_fails_by_default() {
        assert_eq!(
            TransportProfile::for_kind(ChannelKind::Email).success_percent,
            100
        );
    }

    #[test]
    fn test_only_twitter_caps_body_length() {
        for kind in ChannelKind::ALL {
            let profile = TransportProfile::for_kind(kind);
            if kind == ChannelKind::Twitter {
                assert_eq!(profile.max_body_len, Some(280));
            } else {
                assert_eq!(profile.max_body_len, None);
            }
        }
    }

    #[tokio::test]
    async fn test_guaranteed_success_reports_prefixed_id() {
        let transport = SimulatedTransport::new(
            TransportProfile::for_kind(ChannelKind::Sms)
                .instant()
                .with_success_percent(100),
        );
        let outcome = transport.attempt(&request(ChannelKind::Sms, "hello")).await;
        assert!(outcome.success);
        assert!(outcome.external_id.unwrap().starts_with("sms_"));
        assert!(outcome.error.is_none());
    }

    #[tokio::test]
    async fn test_guaranteed_failure_reports_profile_text() {
        let transport = SimulatedTransport::new(
            TransportProfile::for_kind(ChannelKind::Printer)
                .instant()
                .with_success_percent(0),
        );
        let outcome = transport
            .attempt(&request(ChannelKind::Printer, "hello"))
            .await;
        assert!(!outcome.success);
        assert_eq!(
            outcome.error.as_deref(),
            Some("Printer out of paper or toner")
        );
        assert!(outcome.external_id.is_none());
    }

    #[tokio::test]
    async fn test_twitter_hard_fails_over_cap_even_at_full_rate() {
        let transport = SimulatedTransport::new(
            TransportProfile::for_kind(ChannelKind::Twitter)
                .instant()
                .with_success_percent(100),
        );
        let long_body = "x".repeat(281);
        let outcome = transport
            .attempt(&request(ChannelKind::Twitter, &long_body))
            .await;
        assert!(!outcome.success);

        let at_cap = "x".repeat(280);
        let outcome = transport
            .attempt(&request(ChannelKind::Twitter, &at_cap))
            .await;
        assert!(outcome.success);
    }

    #[tokio::test]
    async fn test_external_ids_are_unique_per_attempt() {
        let transport = SimulatedTransport::new(
            TransportProfile::for_kind(ChannelKind::Email).instant(),
        );
        let req = request(ChannelKind::Email, "hello");
        let first = transport.attempt(&req).await.external_id.unwrap();
        let second = transport.attempt(&req).await.external_id.unwrap();
        assert_ne!(first, second);
    }
}
