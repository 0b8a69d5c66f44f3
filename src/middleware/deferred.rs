//! Deferred dispatch: a handler that exists before its target does
//!
//! Middlewares receive the designated function while the chain that will
//! become that function is still being built. They get a stable proxy
//! instead; once the chain is composed its result is bound behind the proxy.

use crate::adapter::Handler;
use crate::error::AdapterError;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, OnceLock};

struct Target<T> {
    resolved: OnceLock<Handler<T>>,
    premature: AtomicUsize,
}

/// Binds the target of a deferred handler. Consumed on use.
pub struct Resolver<T> {
    target: Arc<Target<T>>,
}

impl<T> Resolver<T> {
    /// Number of calls that reached the proxy before it was resolved.
    pub fn premature_invocations(&self) -> usize {
        self.target.premature.load(Ordering::SeqCst)
    }

    /// Forward every call on the proxy, including through earlier clones, to `f`.
    pub fn resolve(self, f: Handler<T>) {
        // The resolver is unique and consumed here, so the cell is still empty.
        let _ = self.target.resolved.set(f);
    }
}

/// Create a proxy handler and the resolver that binds it.
///
/// Until resolved, calling the proxy fails with
/// [`AdapterError::PrematureInvocation`] every time.
pub fn deferred<T: 'static>() -> (Handler<T>, Resolver<T>) {
    let target = Arc::new(Target {
        resolved: OnceLock::new(),
        premature: AtomicUsize::new(0),
    });

    let forward = target.clone();
    let proxy: Handler<T> = Arc::new(move |value: T| match forward.resolved.get() {
        Some(f) => f(value),
        None => {
            forward.premature.fetch_add(1, Ordering::SeqCst);
            Err(AdapterError::PrematureInvocation)
        }
    });

    (proxy, Resolver { target })
}
