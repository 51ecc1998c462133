use async_trait::async_trait;

use wuphf_common::types::{ChannelKind, DeliveryOutcome};

/// One message, bound for one channel.
#[derive(Debug, Clone)]
pub struct DeliveryRequest {
    pub channel: ChannelKind,
    pub from_user: String,
    pub to_user: String,
    pub body: String,
}

/// A single delivery attempt against one channel.
#[async_trait]
pub trait ChannelTransport: Send + Sync {
    /// Attempt delivery. Failure is data in the outcome, never an `Err`:
    /// the dispatcher relies on every attempt producing exactly one outcome.
    async fn attempt(&self, request: &DeliveryRequest) -> DeliveryOutcome;
}
