//! Adapter layer
//!
//! Adapters are built by a creator; enhancers wrap creators to layer
//! behaviour onto every adapter they build.

mod api;
mod base;
mod enhancer;
mod record;
mod state;
mod types;

pub use api::MiddlewareApi;
pub use base::{base_creator, create_adapter};
pub use enhancer::{compose_enhancers, creator, enhancer, map_adapter, AdapterCreator, Enhancer};
pub use record::{Adapter, AdapterFunctions, AdapterObject, AdapterRecord};
pub use state::AdapterState;
pub use types::{handler, AdapterOptions, Handler, ReadyState, StateKey};
