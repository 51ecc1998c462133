//! In-memory message store.

use std::sync::Mutex;

use async_trait::async_trait;

use wuphf_common::types::{DeliveryOutcome, DeliveryStatus, Message};

use crate::{
    Error, Result,
    store::{HistoryFilter, MessageStore},
};

/// Store backed by a mutex-guarded `Vec`, in insertion order. History is
/// process-lifetime only; durability is out of scope at this layer.
pub struct InMemoryStore {
    messages: Mutex<Vec<Message>>,
}

impl InMemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self {
            messages: Mutex::new(Vec::new()),
        }
    }
}

impl Default for InMemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

fn matches(message: &Message, filter: &HistoryFilter) -> bool {
    if let Some(user) = &filter.user
        && !message.involves_user(user)
    {
        return false;
    }
    if let Some(from_ms) = filter.from_ms
        && message.created_at_ms < from_ms
    {
        return false;
    }
    if let Some(to_ms) = filter.to_ms
        && message.created_at_ms > to_ms
    {
        return false;
    }
    true
}

#[async_trait]
impl MessageStore for InMemoryStore {
    async fn append(&self, message: Message) -> Result<()> {
        let mut messages = self.messages.lock().unwrap_or_else(|e| e.into_inner());
        if messages.iter().any(|m| m.id == message.id) {
            return Err(Error::duplicate_id(&message.id));
        }
        messages.push(message);
        Ok(())
    }

    async fn complete(
        &self,
        id: &str,
        outcomes: Vec<DeliveryOutcome>,
        status: DeliveryStatus,
    ) -> Result<()> {
        let mut messages = self.messages.lock().unwrap_or_else(|e| e.into_inner());
        let Some(message) = messages.iter_mut().find(|m| m.id == id) else {
            return Err(Error::message_not_found(id));
        };
        if message.status.is_terminal() {
            return Err(Error::already_completed(id));
        }
        message.outcomes = outcomes;
        message.status = status;
        Ok(())
    }

    async fn get(&self, id: &str) -> Result<Option<Message>> {
        let messages = self.messages.lock().unwrap_or_else(|e| e.into_inner());
        Ok(messages.iter().find(|m| m.id == id).cloned())
    }

    async fn query(&self, filter: &HistoryFilter) -> Result<Vec<Message>> {
        let messages = self.messages.lock().unwrap_or_else(|e| e.into_inner());
        // Walk newest-appended first so the stable sort breaks timestamp
        // ties in favor of the most recent append.
        let mut matched: Vec<Message> = messages
            .iter()
            .rev()
            .filter(|m| matches(m, filter))
            .cloned()
            .collect();
        matched.sort_by(|a, b| b.created_at_ms.cmp(&a.created_at_ms));
        Ok(matched)
    }
}
