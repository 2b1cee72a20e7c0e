//! Gateway adapter registry with capability lookup.
//!
//! The host registers one adapter per connected platform; controllers ask
//! for an adapter by the capability they need. Matching is on declared
//! capabilities, never on adapter names, so a new platform plugs in without
//! touching controller logic.

use std::sync::Arc;

use tracing::info;

use crate::ports::{GatewayCapability, PlatformGateway};

/// Registry of currently connected platform adapters.
///
/// Built once at startup (builder-style registration) and shared immutably
/// afterwards; lookups are lock-free.
#[derive(Default)]
pub struct GatewayRegistry {
    gateways: Vec<Arc<dyn PlatformGateway>>,
}

impl GatewayRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers an adapter. Registration order is lookup order.
    #[must_use]
    pub fn register(mut self, gateway: Arc<dyn PlatformGateway>) -> Self {
        info!(
            adapter = gateway.name(),
            capabilities = ?gateway.capabilities(),
            "gateway adapter registered"
        );
        self.gateways.push(gateway);
        self
    }

    /// First registered adapter declaring `capability`, if any.
    ///
    /// Callers treat `None` as a logged no-op and proceed with their local
    /// state transition regardless.
    pub fn with_capability(
        &self,
        capability: GatewayCapability,
    ) -> Option<Arc<dyn PlatformGateway>> {
        self.gateways
            .iter()
            .find(|gateway| gateway.capabilities().contains(&capability))
            .cloned()
    }

    /// Number of registered adapters.
    pub fn len(&self) -> usize {
        self.gateways.len()
    }

    /// True if no adapters are registered.
    pub fn is_empty(&self) -> bool {
        self.gateways.is_empty()
    }
}
