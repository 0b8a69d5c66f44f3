//! Middleware application: many middlewares become one enhancer
//!
//! The produced enhancer builds the adapter, hands middlewares an API whose
//! designated function is a deferred proxy, composes their transformers
//! around the adapter's own function and binds the proxy to the result.
//! Middlewares written against this API keep working if the adapter shape
//! changes, since they only ever see the one function they wrap.

use super::compose::{compose_middlewares, Middleware};
use super::deferred::deferred;
use crate::adapter::{
    creator, enhancer, Adapter, AdapterCreator, AdapterFunctions, Enhancer, Handler,
};
use crate::error::AdapterError;
use std::sync::Arc;

/// Reads the designated function out of a function table.
pub type FunctionGetter<T> = fn(&AdapterFunctions<T>) -> Handler<T>;

/// Returns a copy of a function table with the designated function replaced.
pub type FunctionSetter<T> = fn(AdapterFunctions<T>, Handler<T>) -> AdapterFunctions<T>;

/// Factory for enhancers that apply middlewares to one adapter function.
pub struct ApplyMiddleware<T> {
    get: FunctionGetter<T>,
    set: FunctionSetter<T>,
}

impl<T> Clone for ApplyMiddleware<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for ApplyMiddleware<T> {}

impl<T: Send + 'static> ApplyMiddleware<T> {
    pub fn new(get: FunctionGetter<T>, set: FunctionSetter<T>) -> Self {
        Self { get, set }
    }

    /// Targets the adapter's `ingress` function.
    pub fn ingress() -> Self {
        Self::new(
            |functions| functions.ingress.clone(),
            |functions, ingress| AdapterFunctions {
                ingress,
                ..functions
            },
        )
    }

    /// Targets the adapter's `egress` function.
    pub fn egress() -> Self {
        Self::new(
            |functions| functions.egress.clone(),
            |functions, egress| AdapterFunctions {
                egress,
                ..functions
            },
        )
    }

    /// Build the enhancer applying `middlewares`, first listed outermost.
    ///
    /// Each adapter built through the enhancer gets its own proxy, so two
    /// adapters never share composed state. Fails construction with
    /// [`AdapterError::NonPlainAdapter`] when the inner creator returns a
    /// class-style adapter, [`AdapterError::PrematureInvocation`] when a
    /// middleware called the proxy while being set up, and
    /// [`AdapterError::MalformedMiddleware`] when one produced no transformer.
    pub fn apply(&self, middlewares: Vec<Arc<dyn Middleware<T>>>) -> Enhancer<T> {
        let ApplyMiddleware { get, set } = *self;
        let middlewares: Arc<[Arc<dyn Middleware<T>>]> = middlewares.into();

        enhancer(move |next: AdapterCreator<T>| {
            let middlewares = middlewares.clone();
            creator(move |options| {
                let record = next(options)?.into_record()?;

                let (proxy, resolver) = deferred::<T>();
                let api = record.with_functions(set(record.functions.clone(), proxy)).api();
                let composed_fn = compose_middlewares(&api, &middlewares)
                    .map(|combined| combined(get(&record.functions)));

                // Counts proxy calls from `wrap` and from transformers alike,
                // including ones whose error was swallowed.
                if resolver.premature_invocations() > 0 {
                    return Err(AdapterError::PrematureInvocation);
                }
                let composed_fn = composed_fn?;
                resolver.resolve(composed_fn.clone());

                tracing::debug!(middlewares = middlewares.len(), "middleware chain applied");
                Ok(Adapter::Record(
                    record.with_functions(set(record.functions.clone(), composed_fn)),
                ))
            })
        })
    }
}

/// Enhancer applying `middlewares` to the adapter's `ingress` function.
pub fn apply_ingress_middleware<T: Send + 'static>(
    middlewares: Vec<Arc<dyn Middleware<T>>>,
) -> Enhancer<T> {
    ApplyMiddleware::ingress().apply(middlewares)
}

/// Enhancer applying `middlewares` to the adapter's `egress` function.
pub fn apply_egress_middleware<T: Send + 'static>(
    middlewares: Vec<Arc<dyn Middleware<T>>>,
) -> Enhancer<T> {
    ApplyMiddleware::egress().apply(middlewares)
}
