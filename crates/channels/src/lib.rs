//! Channel transport layer.
//!
//! Every delivery surface (Facebook, Twitter, SMS, a printer, ...) sits
//! behind the [`ChannelTransport`] trait. A transport attempt never fails at
//! the call level: whatever goes wrong is reported inside the returned
//! outcome, so one channel's trouble cannot abort the rest of a broadcast.
//!
//! The simulated transports model per-channel latency and reliability so the
//! dispatch engine can be exercised without real platform credentials.

pub mod registry;
pub mod simulated;
pub mod transport;

pub use {
    registry::TransportRegistry,
    simulated::{SimulatedTransport, TransportProfile},
    transport::{ChannelTransport, DeliveryRequest},
};
