//! chatlayer: composable enhancer and middleware chains for chat adapters
//!
//! An adapter is produced by an adapter creator. Behaviour is layered on by
//! enhancers (wrappers around the creator) and, for a single designated
//! function such as `ingress`, by middlewares (wrappers around that
//! function only).
//!
//! # Core Concepts
//!
//! - **Adapter**: a plain record of named functions plus shared config slots
//! - **Enhancer**: creator in, creator out; first in a list is outermost
//! - **Middleware**: `api -> (next -> wrapped)` for one adapter function
//! - **Deferred proxy**: the designated function as middlewares see it,
//!   bound to the fully composed chain once construction finishes
//!
//! # Example
//!
//! ```
//! use chatlayer::adapter::{base_creator, handler, AdapterOptions, Handler, MiddlewareApi};
//! use chatlayer::middleware::{apply_ingress_middleware, middleware};
//!
//! let double = middleware(|_api: &MiddlewareApi<u32>| {
//!     |next: Handler<u32>| handler(move |n: u32| next(n * 2))
//! });
//! let enhance = apply_ingress_middleware(vec![double]);
//! let adapter = enhance(base_creator())(AdapterOptions::new()).unwrap();
//!
//! let mut inbox = adapter.take_activities().unwrap();
//! adapter.ingress(21).unwrap();
//! assert_eq!(inbox.try_recv().unwrap(), 42);
//! ```

pub mod adapter;
pub mod chat;
pub mod diagnostics;
mod error;
pub mod middleware;
pub mod session;

pub use adapter::{
    compose_enhancers, Adapter, AdapterCreator, AdapterOptions, Enhancer, Handler, MiddlewareApi,
    ReadyState, StateKey,
};
pub use chat::{
    create_chat_adapter, create_chat_enhancer, ChatAdapterOptions, ChatDependencies, ChatToken,
};
pub use diagnostics::{Diagnostics, RecordingDiagnostics, TracingDiagnostics};
pub use error::{AdapterError, AdapterResult};
pub use middleware::{
    apply_egress_middleware, apply_ingress_middleware, ApplyMiddleware, Middleware,
};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
