//! Multi-channel dispatch engine.
//!
//! Control flow: [`validate`](validate::validate) gates the request, the
//! [`DispatchService`] fans one concurrent delivery attempt out per channel
//! and joins them all, [`resolve_status`](resolve::resolve_status) maps the
//! outcomes to a terminal status, and the [`MessageStore`] keeps the
//! newest-first history.

pub mod error;
pub mod resolve;
pub mod service;
pub mod store;
pub mod store_memory;
pub mod validate;

pub use {
    error::{Error, Result},
    service::{DispatchConfig, DispatchService},
    store::{HistoryFilter, MessageStore},
    store_memory::InMemoryStore,
    validate::ValidationError,
};
