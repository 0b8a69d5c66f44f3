//! Configuration slots and ready state shared by every view of one adapter

use super::types::{AdapterOptions, ReadyState, StateKey};
use dashmap::DashMap;
use serde_json::Value;
use tokio::sync::watch;

/// Mutable slots of an adapter.
///
/// Copies of an adapter record share one `AdapterState`; only the function
/// table is copied when an enhancer replaces a function.
#[derive(Debug)]
pub struct AdapterState {
    config: DashMap<StateKey, Value>,
    ready: watch::Sender<ReadyState>,
}

impl AdapterState {
    pub fn new() -> Self {
        let (ready, _) = watch::channel(ReadyState::Connecting);
        Self {
            config: DashMap::new(),
            ready,
        }
    }

    pub fn from_options(options: &AdapterOptions) -> Self {
        let state = Self::new();
        for (key, value) in &options.initial_config {
            state.config.insert(key.clone(), value.clone());
        }
        state
    }

    pub fn get_config(&self, key: &StateKey) -> Option<Value> {
        self.config.get(key).map(|r| r.clone())
    }

    /// Set a slot. `Value::Null` clears it.
    pub fn set_config(&self, key: StateKey, value: Value) {
        if value.is_null() {
            self.config.remove(&key);
        } else {
            self.config.insert(key, value);
        }
    }

    pub fn ready_state(&self) -> ReadyState {
        *self.ready.borrow()
    }

    pub fn set_ready_state(&self, state: ReadyState) {
        let previous = self.ready.send_replace(state);
        if previous != state {
            tracing::debug!(?previous, current = ?state, "adapter ready state changed");
        }
    }

    /// Watch ready-state transitions.
    pub fn watch_ready_state(&self) -> watch::Receiver<ReadyState> {
        self.ready.subscribe()
    }
}

impl Default for AdapterState {
    fn default() -> Self {
        Self::new()
    }
}
