use std::collections::HashMap;
use std::sync::Arc;

use tracing::info;

use crate::transport::Transport;

/// Holds every registered `Transport` by name so the gating layer can look
/// one up for a given chat without knowing its concrete type.
///
/// Reconnect/backoff is the adapter's own concern (spec.md §6 — "reconnect
/// and queueing are the adapter's concern"), so unlike the teacher's
/// `ChannelManager` this registry has no connect/disconnect lifecycle of
/// its own: it is a lookup table, nothing more.
#[derive(Default)]
pub struct TransportRegistry {
    transports: HashMap<String, Arc<dyn Transport>>,
}

impl TransportRegistry {
    pub fn new() -> Self {
        Self {
            transports: HashMap::new(),
        }
    }

    pub fn register(&mut self, transport: Arc<dyn Transport>) {
        let name = transport.name().to_string();
        info!(transport = %name, "registering transport adapter");
        self.transports.insert(name, transport);
    }

    pub fn get(&self, name: &str) -> Option<Arc<dyn Transport>> {
        self.transports.get(name).cloned()
    }

    pub fn default_transport(&self) -> Option<Arc<dyn Transport>> {
        self.transports.values().next().cloned()
    }
}
