//! Pre-dispatch validation.
//!
//! Pure and side-effect free. Front ends run this before invoking the
//! engine and surface failures verbatim; the engine does not re-validate.

use thiserror::Error;

use wuphf_common::types::{ChannelKind, Limits};

/// Caller-correctable request problems. Never retried automatically.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("message cannot be empty")]
    EmptyMessage,

    #[error("message too long: maximum is {limit} characters")]
    MessageTooLong { limit: usize },

    #[error("no channels selected")]
    NoChannelsSelected,

    #[error("too many channels: maximum is {limit}")]
    TooManyChannels { limit: usize },
}

/// Check a message body and channel selection against the configured limits.
///
/// Duplicate kinds count once: the engine collapses them before dispatch, so
/// the size check here matches what will actually be attempted.
pub fn validate(
    body: &str,
    channels: &[ChannelKind],
    limits: &Limits,
) -> Result<(), ValidationError> {
    if body.trim().is_empty() {
        return Err(ValidationError::EmptyMessage);
    }
    if body.chars().count() > limits.max_message_len {
        return Err(ValidationError::MessageTooLong {
            limit: limits.max_message_len,
        });
    }
    let distinct = distinct_channels(channels);
    if distinct.is_empty() {
        return Err(ValidationError::NoChannelsSelected);
    }
    if distinct.len() > limits.max_channels {
        return Err(ValidationError::TooManyChannels {
            limit: limits.max_channels,
        });
    }
    Ok(())
}

/// Collapse duplicate kinds, preserving first-seen order.
#[must_use]
pub fn distinct_channels(channels: &[ChannelKind]) -> Vec<ChannelKind> {
    let mut distinct = Vec::with_capacity(channels.len());
    for &kind in channels {
        if !distinct.contains(&kind) {
            distinct.push(kind);
        }
    }
    distinct
}
