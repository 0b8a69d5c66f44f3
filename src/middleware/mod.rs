//! Middleware for a single designated adapter function
//!
//! Narrower than an enhancer: a middleware only sees the middleware API and
//! wraps one function, so it survives changes to the rest of the adapter.

mod apply;
mod compose;
mod deferred;

pub use apply::{
    apply_egress_middleware, apply_ingress_middleware, ApplyMiddleware, FunctionGetter,
    FunctionSetter,
};
pub use compose::{compose_middlewares, middleware, Middleware, Transform};
pub use deferred::{deferred, Resolver};
