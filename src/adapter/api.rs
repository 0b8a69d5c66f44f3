//! The adapter view handed to middlewares

use super::record::AdapterFunctions;
use super::state::AdapterState;
use super::types::{ReadyState, StateKey};
use crate::error::AdapterResult;
use serde_json::Value;
use std::sync::Arc;

/// What a middleware sees of the adapter it is attached to.
///
/// The designated function in `functions` is the deferred proxy, so a
/// middleware calling it later reaches the fully composed chain.
pub struct MiddlewareApi<T> {
    pub functions: AdapterFunctions<T>,
    state: Arc<AdapterState>,
}

impl<T> Clone for MiddlewareApi<T> {
    fn clone(&self) -> Self {
        Self {
            functions: self.functions.clone(),
            state: self.state.clone(),
        }
    }
}

impl<T> MiddlewareApi<T> {
    pub fn new(functions: AdapterFunctions<T>, state: Arc<AdapterState>) -> Self {
        Self { functions, state }
    }

    pub fn ingress(&self, value: T) -> AdapterResult<()> {
        (self.functions.ingress)(value)
    }

    pub fn egress(&self, value: T) -> AdapterResult<()> {
        (self.functions.egress)(value)
    }

    pub fn get_config(&self, key: &StateKey) -> Option<Value> {
        self.state.get_config(key)
    }

    pub fn set_config(&self, key: StateKey, value: impl Into<Value>) {
        self.state.set_config(key, value.into());
    }

    pub fn ready_state(&self) -> ReadyState {
        self.state.ready_state()
    }
}
