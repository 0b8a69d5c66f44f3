//! Enhancers: wrappers around an adapter factory
//!
//! An enhancer takes the next creator and returns a creator that builds on
//! it. Composition is right-to-left: the first enhancer in a list is the
//! outermost, so its creator runs first and sees the adapter last.

use super::record::Adapter;
use super::types::AdapterOptions;
use crate::error::{AdapterError, AdapterResult};
use std::sync::Arc;

/// Builds one adapter from construction options.
pub type AdapterCreator<T> = Arc<dyn Fn(AdapterOptions) -> AdapterResult<Adapter<T>> + Send + Sync>;

/// Wraps an adapter creator.
pub type Enhancer<T> = Arc<dyn Fn(AdapterCreator<T>) -> AdapterCreator<T> + Send + Sync>;

/// Wrap a closure as an [`AdapterCreator`].
pub fn creator<T, F>(f: F) -> AdapterCreator<T>
where
    F: Fn(AdapterOptions) -> AdapterResult<Adapter<T>> + Send + Sync + 'static,
{
    Arc::new(f)
}

/// Wrap a closure as an [`Enhancer`].
pub fn enhancer<T, F>(f: F) -> Enhancer<T>
where
    F: Fn(AdapterCreator<T>) -> AdapterCreator<T> + Send + Sync + 'static,
{
    Arc::new(f)
}

/// Enhancer that post-processes every adapter the next creator builds.
///
/// Covers the common case of "build, then configure" without writing the
/// two nested closures by hand.
pub fn map_adapter<T, F>(f: F) -> Enhancer<T>
where
    T: Send + 'static,
    F: Fn(Adapter<T>) -> AdapterResult<Adapter<T>> + Send + Sync + 'static,
{
    let f = Arc::new(f);
    Arc::new(move |next: AdapterCreator<T>| {
        let f = f.clone();
        creator(move |options| f(next(options)?))
    })
}

/// Compose enhancers, first listed outermost. An empty list is the identity.
///
/// Every enhancer boundary only passes plain adapters: a class-style
/// adapter produced anywhere in the chain fails construction with
/// [`AdapterError::NonPlainAdapter`].
pub fn compose_enhancers<T: Send + 'static>(enhancers: Vec<Enhancer<T>>) -> Enhancer<T> {
    Arc::new(move |next: AdapterCreator<T>| {
        enhancers
            .iter()
            .rev()
            .fold(next, |inner, enhance| plain_only(enhance(inner)))
    })
}

fn plain_only<T: Send + 'static>(next: AdapterCreator<T>) -> AdapterCreator<T> {
    creator(move |options| match next(options)? {
        Adapter::Object(_) => Err(AdapterError::NonPlainAdapter),
        adapter => Ok(adapter),
    })
}
