use std::{collections::HashMap, sync::Arc};

use wuphf_common::types::ChannelKind;

use crate::{
    simulated::{SimulatedTransport, TransportProfile},
    transport::ChannelTransport,
};

/// Table of transports, one per channel kind.
///
/// Adding a channel means registering one more entry; nothing else in the
/// dispatch path changes.
pub struct TransportRegistry {
    transports: HashMap<ChannelKind, Arc<dyn ChannelTransport>>,
}

impl Default for TransportRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl TransportRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self {
            transports: HashMap::new(),
        }
    }

    /// Registry wired with the simulated transport for every known kind.
    #[must_use]
    pub fn simulated() -> Self {
        let mut registry = Self::new();
        for kind in ChannelKind::ALL {
            registry.register(
                kind,
                Arc::new(SimulatedTransport::new(TransportProfile::for_kind(kind))),
            );
        }
        registry
    }

    pub fn register(&mut self, kind: ChannelKind, transport: Arc<dyn ChannelTransport>) {
        self.transports.insert(kind, transport);
    }

    #[must_use]
    pub fn get(&self, kind: ChannelKind) -> Option<Arc<dyn ChannelTransport>> {
        self.transports.get(&kind).map(Arc::clone)
    }

    #[must_use]
    pub fn kinds(&self) -> Vec<ChannelKind> {
        self.transports.keys().copied().collect()
    }
}

#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests {
    use {super::*, crate::transport::DeliveryRequest, async_trait::async_trait,
        wuphf_common::types::DeliveryOutcome};

    struct AlwaysUp;

    #[async_trait]
    impl ChannelTransport for AlwaysUp {
        async fn attempt(&self, request: &DeliveryRequest) -> DeliveryOutcome {
            DeliveryOutcome::ok(request.channel, "up_1")
        }
    }

    #[test]
    fn test_simulated_registry_covers_every_kind() {
        let registry = TransportRegistry::simulated();
        for kind in ChannelKind::ALL {
            assert!(registry.get(kind).is_some(), "missing transport for {kind}");
        }
        assert_eq!(registry.kinds().len(), ChannelKind::ALL.len());
    }

    #[test]
    fn test_register_replaces_transport() {
        let mut registry = TransportRegistry::simulated();
        registry.register(ChannelKind::Email, Arc::new(AlwaysUp));
        assert!(registry.get(ChannelKind::Email).is_some());
    }

    #[test]
    fn test_empty_registry_resolves_nothing() {
        let registry = TransportRegistry::new();
        assert!(registry.get(ChannelKind::Email).is_none());
        assert!(registry.kinds().is_empty());
    }
}
