//! Backend registry - construction and lookup of build backends.
//!
//! Registry construction never fails and never touches the host. Tool
//! availability is checked lazily via `shim.availability()`.

use std::collections::HashMap;
use std::sync::Arc;

use crate::builder::shim::backend_id::BackendId;
use crate::builder::shim::mock_shim::MockShim;
use crate::builder::shim::rpmbuild_shim::RpmbuildShim;
use crate::builder::shim::trait_def::{BackendAvailability, BackendConfig, BackendShim};

/// Registry of build backends sharing one [`BackendConfig`].
pub struct BackendRegistry {
    backends: HashMap<BackendId, Arc<dyn BackendShim>>,
}

impl BackendRegistry {
    /// Create a registry with all built-in backends.
    pub fn new(config: &BackendConfig) -> Self {
        let mut registry = BackendRegistry {
            backends: HashMap::new(),
        };

        registry.register(Arc::new(RpmbuildShim::new(config.clone())));
        registry.register(Arc::new(MockShim::new(config.clone())));

        registry
    }

    /// Register a backend shim, replacing any backend with the same id.
    pub fn register(&mut self, shim: Arc<dyn BackendShim>) {
        self.backends.insert(shim.id(), shim);
    }

    /// Get a backend by ID.
    pub fn get(&self, id: BackendId) -> Option<Arc<dyn BackendShim>> {
        self.backends.get(&id).cloned()
    }

    /// Check availability of all backends, in a stable order.
    pub fn check_all(&self) -> Vec<(BackendId, BackendAvailability)> {
        BackendId::ALL
            .iter()
            .filter_map(|id| self.backends.get(id).map(|b| (*id, b.availability())))
            .collect()
    }
}
