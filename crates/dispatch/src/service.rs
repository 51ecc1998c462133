//! Dispatch engine: concurrent fan-out, single join, status resolution.

use std::{sync::Arc, time::Duration};

use {
    tokio::{
        task::JoinHandle,
        time::{Instant, timeout_at},
    },
    tracing::{info, warn},
};

use {
    wuphf_channels::{TransportRegistry, transport::DeliveryRequest},
    wuphf_common::types::{ChannelKind, DeliveryOutcome, DeliveryStatus, Limits, Message},
};

use crate::{
    Error, Result,
    resolve::resolve_status,
    store::{HistoryFilter, MessageStore},
    validate::{ValidationError, distinct_channels, validate},
};

/// Failure text recorded for a channel that missed the overall deadline.
const TIMEOUT_ERROR: &str = "timed out waiting for channel";
/// Failure text recorded when a transport task panics.
const TASK_ERROR: &str = "delivery task failed";
/// Failure text for a kind with no registered transport.
const UNREGISTERED_ERROR: &str = "no transport registered";

/// Engine configuration.
#[derive(Debug, Clone)]
pub struct DispatchConfig {
    pub limits: Limits,
    /// Upper bound on a whole dispatch. Channels still in flight at the
    /// deadline are recorded as failed so a message can never stick in
    /// `Sending`. `None` disables the bound; each attempt is then limited
    /// only by its own transport.
    pub overall_timeout: Option<Duration>,
}

impl Default for DispatchConfig {
    fn default() -> Self {
        Self {
            limits: Limits::default(),
            overall_timeout: Some(Duration::from_secs(30)),
        }
    }
}

/// Fans one message out across the requested channels, waits for every
/// attempt, and aggregates the results into a terminal status.
pub struct DispatchService {
    registry: Arc<TransportRegistry>,
    store: Arc<dyn MessageStore>,
    config: DispatchConfig,
}

impl DispatchService {
    pub fn new(registry: Arc<TransportRegistry>, store: Arc<dyn MessageStore>) -> Self {
        Self::with_config(registry, store, DispatchConfig::default())
    }

    pub fn with_config(
        registry: Arc<TransportRegistry>,
        store: Arc<dyn MessageStore>,
        config: DispatchConfig,
    ) -> Self {
        Self {
            registry,
            store,
            config,
        }
    }

    #[must_use]
    pub fn config(&self) -> &DispatchConfig {
        &self.config
    }

    /// Check a request against this engine's limits. Front ends call this
    /// before [`dispatch`](Self::dispatch) and surface failures verbatim.
    pub fn validate(
        &self,
        body: &str,
        channels: &[ChannelKind],
    ) -> std::result::Result<(), ValidationError> {
        validate(body, channels, &self.config.limits)
    }

    /// Broadcast one message across the requested channels.
    ///
    /// Every channel gets its own independent attempt; no failure aborts the
    /// others, and nothing returns early on first success. The returned
    /// message is terminal and matches what the store now holds.
    pub async fn dispatch(
        &self,
        from_user: &str,
        to_user: &str,
        body: &str,
        channels: &[ChannelKind],
    ) -> Result<Message> {
        let channels = distinct_channels(channels);
        if channels.is_empty() {
            return Err(Error::NoChannels);
        }

        let mut message = Message::new(from_user, to_user, body, channels.clone());
        message.status = DeliveryStatus::Sending;
        info!(
            id = %message.id,
            from = from_user,
            to = to_user,
            channel_count = channels.len(),
            "dispatching wuphf"
        );
        // In-flight messages are visible to history queries with an empty
        // outcome list until completion.
        self.store.append(message.clone()).await?;

        let deadline = self.config.overall_timeout.map(|t| Instant::now() + t);
        let attempts: Vec<(ChannelKind, Option<JoinHandle<DeliveryOutcome>>)> = channels
            .iter()
            .map(|&kind| {
                let Some(transport) = self.registry.get(kind) else {
                    return (kind, None);
                };
                let request = DeliveryRequest {
                    channel: kind,
                    from_user: from_user.to_string(),
                    to_user: to_user.to_string(),
                    body: body.to_string(),
                };
                let handle = tokio::spawn(async move { transport.attempt(&request).await });
                (kind, Some(handle))
            })
            .collect();

        // Join everything; exactly one outcome per requested channel, in
        // requested order.
        let mut outcomes = Vec::with_capacity(attempts.len());
        for (kind, handle) in attempts {
            let outcome = match handle {
                Some(handle) => join_attempt(kind, handle, deadline).await,
                None => {
                    warn!(channel = %kind, "no transport registered");
                    DeliveryOutcome::failed(kind, UNREGISTERED_ERROR)
                }
            };
            outcomes.push(outcome);
        }

        let status = resolve_status(&outcomes, channels.len());
        let successes = outcomes.iter().filter(|o| o.success).count();
        info!(
            id = %message.id,
            status = ?status,
            success_rate = successes * 100 / channels.len(),
            "wuphf dispatched"
        );

        self.store
            .complete(&message.id, outcomes.clone(), status)
            .await?;
        message.outcomes = outcomes;
        message.status = status;
        Ok(message)
    }

    pub async fn get_message(&self, id: &str) -> Result<Option<Message>> {
        self.store.get(id).await
    }

    pub async fn history(&self, filter: &HistoryFilter) -> Result<Vec<Message>> {
        self.store.query(filter).await
    }
}

/// Await one spawned attempt, converting a panic or a missed deadline into a
/// failed outcome instead of crashing the dispatch.
async fn join_attempt(
    kind: ChannelKind,
    mut handle: JoinHandle<DeliveryOutcome>,
    deadline: Option<Instant>,
) -> DeliveryOutcome {
    let joined = match deadline {
        Some(deadline) => match timeout_at(deadline, &mut handle).await {
            Ok(joined) => joined,
            Err(_) => {
                handle.abort();
                warn!(channel = %kind, "channel missed the dispatch deadline");
                return DeliveryOutcome::failed(kind, TIMEOUT_ERROR);
            }
        },
        None => (&mut handle).await,
    };
    match joined {
        Ok(outcome) => outcome,
        Err(err) => {
            warn!(channel = %kind, error = %err, "delivery task aborted");
            DeliveryOutcome::failed(kind, TASK_ERROR)
        }
    }
}
