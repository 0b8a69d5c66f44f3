//! Core adapter layer types
//!
//! - Handler: one callable slot of an adapter (ingress, egress, callbacks)
//! - ReadyState: connection lifecycle of an adapter
//! - StateKey: names of the adapter's configuration slots
//! - AdapterOptions: construction options handed to an adapter factory

use crate::error::AdapterResult;
use serde_json::Value;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// A callable adapter slot taking one value of type `T`.
pub type Handler<T> = Arc<dyn Fn(T) -> AdapterResult<()> + Send + Sync>;

/// Wrap a closure as a [`Handler`].
pub fn handler<T, F>(f: F) -> Handler<T>
where
    F: Fn(T) -> AdapterResult<()> + Send + Sync + 'static,
{
    Arc::new(f)
}

/// Lifecycle of an adapter's connection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ReadyState {
    #[default]
    Connecting,
    Open,
    Closing,
    Closed,
}

/// Name of a configuration slot on an adapter.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum StateKey {
    BotId,
    UserDisplayName,
    UserId,
    /// Slot defined by a feature enhancer
    Custom(String),
}

impl fmt::Display for StateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::BotId => write!(f, "botId"),
            Self::UserDisplayName => write!(f, "userDisplayName"),
            Self::UserId => write!(f, "userId"),
            Self::Custom(name) => write!(f, "{}", name),
        }
    }
}

/// Construction options passed to an adapter factory.
#[derive(Debug, Clone, Default)]
pub struct AdapterOptions {
    /// Values the configuration slots start with
    pub initial_config: HashMap<StateKey, Value>,
}

impl AdapterOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(mut self, key: StateKey, value: impl Into<Value>) -> Self {
        self.initial_config.insert(key, value.into());
        self
    }
}
