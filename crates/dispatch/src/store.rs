//! Message history storage.

use async_trait::async_trait;

use {
    serde::{Deserialize, Serialize},
    wuphf_common::types::{DeliveryOutcome, DeliveryStatus, Message},
};

use crate::Result;

/// History query constraints. An absent field means no constraint on that
/// dimension.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryFilter {
    /// Case-insensitive exact match on sender OR recipient.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user: Option<String>,
    /// Inclusive lower bound on creation time (epoch millis).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub from_ms: Option<u64>,
    /// Inclusive upper bound on creation time (epoch millis).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub to_ms: Option<u64>,
}

/// Append-only log of dispatched messages.
///
/// The engine appends a message the moment dispatch begins and writes its
/// outcomes exactly once when every channel has reported back; history
/// queries may observe the in-between `Sending` state with no outcomes.
#[async_trait]
pub trait MessageStore: Send + Sync {
    /// Insert a new message. Ids are generated fresh at creation and never
    /// reused; a duplicate is a programming error.
    async fn append(&self, message: Message) -> Result<()>;

    /// Record the final outcomes and terminal status for an in-flight
    /// message. The message is immutable afterwards.
    async fn complete(
        &self,
        id: &str,
        outcomes: Vec<DeliveryOutcome>,
        status: DeliveryStatus,
    ) -> Result<()>;

    async fn get(&self, id: &str) -> Result<Option<Message>>;

    /// Matching messages, strictly newest first.
    async fn query(&self, filter: &HistoryFilter) -> Result<Vec<Message>>;
}
