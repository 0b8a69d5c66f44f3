//! Middleware contract and chain composition

use crate::adapter::{Handler, MiddlewareApi};
use crate::error::{AdapterError, AdapterResult};
use std::marker::PhantomData;
use std::sync::Arc;

/// Turns the next function into its wrapped replacement.
pub type Transform<T> = Box<dyn FnOnce(Handler<T>) -> Handler<T> + Send>;

/// An interceptor for one designated adapter function.
///
/// `wrap` is called once per adapter construction with the middleware API.
/// Returning `None` means no transformer was produced, which aborts
/// construction with [`AdapterError::MalformedMiddleware`].
pub trait Middleware<T>: Send + Sync {
    fn wrap(&self, api: &MiddlewareApi<T>) -> Option<Transform<T>>;
}

struct FnMiddleware<F, W> {
    f: F,
    _transform: PhantomData<fn() -> W>,
}

impl<T, F, W> Middleware<T> for FnMiddleware<F, W>
where
    T: 'static,
    F: Fn(&MiddlewareApi<T>) -> W + Send + Sync,
    W: FnOnce(Handler<T>) -> Handler<T> + Send + 'static,
{
    fn wrap(&self, api: &MiddlewareApi<T>) -> Option<Transform<T>> {
        Some(Box::new((self.f)(api)))
    }
}

/// Middleware from a closure `api -> (next -> wrapped)`.
pub fn middleware<T, F, W>(f: F) -> Arc<dyn Middleware<T>>
where
    T: 'static,
    F: Fn(&MiddlewareApi<T>) -> W + Send + Sync + 'static,
    W: FnOnce(Handler<T>) -> Handler<T> + Send + 'static,
{
    Arc::new(FnMiddleware {
        f,
        _transform: PhantomData,
    })
}

/// Run every middleware against `api` and compose their transformers.
///
/// The result applied to `f` is `T1(T2(...Tn(f)))`: the first middleware is
/// outermost and the last one's next is `f` itself. No middlewares yields
/// the identity.
pub fn compose_middlewares<T: 'static>(
    api: &MiddlewareApi<T>,
    middlewares: &[Arc<dyn Middleware<T>>],
) -> AdapterResult<Transform<T>> {
    let mut chain = Vec::with_capacity(middlewares.len());
    for (index, m) in middlewares.iter().enumerate() {
        let transform = m
            .wrap(api)
            .ok_or(AdapterError::MalformedMiddleware { index })?;
        chain.push(transform);
    }

    Ok(Box::new(move |original: Handler<T>| {
        chain
            .into_iter()
            .rev()
            .fold(original, |next, transform| transform(next))
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapter::{handler, AdapterFunctions, AdapterState};
    use std::sync::Mutex;

    fn api() -> MiddlewareApi<u32> {
        MiddlewareApi::new(
            AdapterFunctions {
                ingress: handler(|_| Ok(())),
                egress: handler(|_| Ok(())),
            },
            Arc::new(AdapterState::new()),
        )
    }

    fn numbered(index: u32, order: Arc<Mutex<Vec<u32>>>) -> Arc<dyn Middleware<u32>> {
        middleware(move |_api: &MiddlewareApi<u32>| {
            let order = order.clone();
            move |next: Handler<u32>| {
                handler(move |value| {
                    order.lock().unwrap().push(index);
                    next(value)
                })
            }
        })
    }

    struct Forgetful;

    impl Middleware<u32> for Forgetful {
        fn wrap(&self, _api: &MiddlewareApi<u32>) -> Option<Transform<u32>> {
            None
        }
    }

    #[test]
    fn first_middleware_runs_first() {
        let order = Arc::new(Mutex::new(Vec::new()));
        let middlewares: Vec<_> = (1..=4).map(|i| numbered(i, order.clone())).collect();

        let reached = Arc::new(Mutex::new(None));
        let sink = reached.clone();
        let original = handler(move |value| {
            *sink.lock().unwrap() = Some(value);
            Ok(())
        });

        let combined = compose_middlewares(&api(), &middlewares).unwrap();
        combined(original)(42).unwrap();

        assert_eq!(*order.lock().unwrap(), vec![1, 2, 3, 4]);
        assert_eq!(*reached.lock().unwrap(), Some(42));
    }

    #[test]
    fn empty_list_is_identity() {
        let original = handler(|_: u32| Err(AdapterError::Closed));
        let combined = compose_middlewares(&api(), &[]).unwrap();
        let result = combined(original.clone());
        assert!(Arc::ptr_eq(&result, &original));
    }

    #[test]
    fn missing_transformer_is_malformed() {
        let order = Arc::new(Mutex::new(Vec::new()));
        let middlewares: Vec<Arc<dyn Middleware<u32>>> =
            vec![numbered(1, order), Arc::new(Forgetful)];

        let err = compose_middlewares(&api(), &middlewares).err().unwrap();
        assert!(matches!(err, AdapterError::MalformedMiddleware { index: 1 }));
    }

    #[test]
    fn middleware_may_short_circuit() {
        let skip_odd = middleware(|_api: &MiddlewareApi<u32>| {
            |next: Handler<u32>| {
                handler(move |value: u32| if value % 2 == 0 { next(value) } else { Ok(()) })
            }
        });

        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = seen.clone();
        let original = handler(move |value| {
            sink.lock().unwrap().push(value);
            Ok(())
        });

        let wrapped = compose_middlewares(&api(), &[skip_odd]).unwrap()(original);
        for n in 1..=4 {
            wrapped(n).unwrap();
        }
        assert_eq!(*seen.lock().unwrap(), vec![2, 4]);
    }
}
