//! Terminal adapter factory
//!
//! The innermost creator of every enhancer chain. Produces a plain record
//! whose ingress queues activities for a single consumer and whose egress
//! has nowhere to go until an egress enhancer replaces it.

use super::enhancer::AdapterCreator;
use super::record::{Adapter, AdapterFunctions, AdapterRecord};
use super::state::AdapterState;
use super::types::{handler, AdapterOptions, ReadyState};
use crate::error::AdapterError;
use crate::error::AdapterResult;
use std::sync::Arc;
use tokio::sync::mpsc;

/// Build a base adapter.
pub fn create_adapter<T: Send + 'static>(options: AdapterOptions) -> AdapterResult<Adapter<T>> {
    let state = Arc::new(AdapterState::from_options(&options));
    let (tx, rx) = mpsc::unbounded_channel();

    let ingress_state = state.clone();
    let functions = AdapterFunctions {
        ingress: handler(move |activity: T| {
            if ingress_state.ready_state() == ReadyState::Closed {
                return Err(AdapterError::Closed);
            }
            tx.send(activity).map_err(|_| AdapterError::Closed)
        }),
        egress: handler(|_: T| Err(AdapterError::EgressUnavailable)),
    };

    Ok(Adapter::Record(
        AdapterRecord::new(functions, state).with_inbox(rx),
    ))
}

/// [`create_adapter`] as an [`AdapterCreator`].
pub fn base_creator<T: Send + 'static>() -> AdapterCreator<T> {
    Arc::new(create_adapter::<T>)
}
