//! Adapter representations
//!
//! An adapter is either a plain record (a function table plus shared slots)
//! or a class-style object whose behaviour sits behind virtual dispatch.
//! Enhancers that replace functions need the record form: overriding a field
//! on a copy of an object would leave its own methods calling the old code.

use super::api::MiddlewareApi;
use super::state::AdapterState;
use super::types::{Handler, ReadyState, StateKey};
use crate::error::{AdapterError, AdapterResult};
use serde_json::Value;
use std::sync::{Arc, Mutex};
use tokio::sync::mpsc::UnboundedReceiver;

/// The named functions of an adapter.
pub struct AdapterFunctions<T> {
    /// Inbound delivery: activities arriving from the chat service
    pub ingress: Handler<T>,
    /// Outbound send: activities leaving for the chat service
    pub egress: Handler<T>,
}

impl<T> Clone for AdapterFunctions<T> {
    fn clone(&self) -> Self {
        Self {
            ingress: self.ingress.clone(),
            egress: self.egress.clone(),
        }
    }
}

type Inbox<T> = Arc<Mutex<Option<UnboundedReceiver<T>>>>;
type CloseFn = Arc<dyn Fn() + Send + Sync>;

/// A plain adapter: functions are fields, replaceable on a copy.
pub struct AdapterRecord<T> {
    pub functions: AdapterFunctions<T>,
    state: Arc<AdapterState>,
    inbox: Inbox<T>,
    close: CloseFn,
}

impl<T> Clone for AdapterRecord<T> {
    fn clone(&self) -> Self {
        Self {
            functions: self.functions.clone(),
            state: self.state.clone(),
            inbox: self.inbox.clone(),
            close: self.close.clone(),
        }
    }
}

impl<T: Send + 'static> AdapterRecord<T> {
    pub fn new(functions: AdapterFunctions<T>, state: Arc<AdapterState>) -> Self {
        let close_state = state.clone();
        Self {
            functions,
            state,
            inbox: Arc::new(Mutex::new(None)),
            close: Arc::new(move || close_state.set_ready_state(ReadyState::Closed)),
        }
    }

    pub fn with_inbox(self, receiver: UnboundedReceiver<T>) -> Self {
        Self {
            inbox: Arc::new(Mutex::new(Some(receiver))),
            ..self
        }
    }

    pub fn with_close(self, close: impl Fn() + Send + Sync + 'static) -> Self {
        Self {
            close: Arc::new(close),
            ..self
        }
    }

    /// Copy of this record with a different function table.
    pub fn with_functions(&self, functions: AdapterFunctions<T>) -> Self {
        Self {
            functions,
            ..self.clone()
        }
    }

    pub fn state(&self) -> &Arc<AdapterState> {
        &self.state
    }

    /// The view middlewares receive.
    pub fn api(&self) -> MiddlewareApi<T> {
        MiddlewareApi::new(self.functions.clone(), self.state.clone())
    }

    /// Take the receiving end of the inbox. Returns `None` after the first call.
    pub fn take_activities(&self) -> Option<UnboundedReceiver<T>> {
        self.inbox.lock().ok().and_then(|mut inbox| inbox.take())
    }
}

/// A class-style adapter: behaviour is reached through methods only.
pub trait AdapterObject<T>: Send + Sync {
    fn ingress(&self, value: T) -> AdapterResult<()>;

    fn egress(&self, value: T) -> AdapterResult<()>;

    fn state(&self) -> &AdapterState;

    fn take_activities(&self) -> Option<UnboundedReceiver<T>> {
        None
    }

    fn close(&self) {
        self.state().set_ready_state(ReadyState::Closed);
    }
}

/// An adapter as passed between enhancers.
pub enum Adapter<T> {
    Record(AdapterRecord<T>),
    Object(Arc<dyn AdapterObject<T>>),
}

impl<T> Clone for Adapter<T> {
    fn clone(&self) -> Self {
        match self {
            Self::Record(record) => Self::Record(record.clone()),
            Self::Object(object) => Self::Object(object.clone()),
        }
    }
}

impl<T: Send + 'static> Adapter<T> {
    pub fn is_plain(&self) -> bool {
        matches!(self, Self::Record(_))
    }

    /// Require the plain record form.
    pub fn into_record(self) -> AdapterResult<AdapterRecord<T>> {
        match self {
            Self::Record(record) => Ok(record),
            Self::Object(_) => Err(AdapterError::NonPlainAdapter),
        }
    }

    pub fn as_record(&self) -> Option<&AdapterRecord<T>> {
        match self {
            Self::Record(record) => Some(record),
            Self::Object(_) => None,
        }
    }

    fn state(&self) -> &AdapterState {
        match self {
            Self::Record(record) => record.state().as_ref(),
            Self::Object(object) => object.state(),
        }
    }

    pub fn ingress(&self, value: T) -> AdapterResult<()> {
        match self {
            Self::Record(record) => (record.functions.ingress)(value),
            Self::Object(object) => object.ingress(value),
        }
    }

    pub fn egress(&self, value: T) -> AdapterResult<()> {
        match self {
            Self::Record(record) => (record.functions.egress)(value),
            Self::Object(object) => object.egress(value),
        }
    }

    pub fn get_config(&self, key: &StateKey) -> Option<Value> {
        self.state().get_config(key)
    }

    pub fn set_config(&self, key: StateKey, value: impl Into<Value>) {
        self.state().set_config(key, value.into());
    }

    pub fn ready_state(&self) -> ReadyState {
        self.state().ready_state()
    }

    pub fn set_ready_state(&self, state: ReadyState) {
        self.state().set_ready_state(state);
    }

    pub fn watch_ready_state(&self) -> tokio::sync::watch::Receiver<ReadyState> {
        self.state().watch_ready_state()
    }

    pub fn take_activities(&self) -> Option<UnboundedReceiver<T>> {
        match self {
            Self::Record(record) => record.take_activities(),
            Self::Object(object) => object.take_activities(),
        }
    }

    pub fn close(&self) {
        match self {
            Self::Record(record) => (record.close)(),
            Self::Object(object) => object.close(),
        }
    }
}
