use std::future::Future;

/// Resolves a window of unique keys in one bulk call.
///
/// The returned vector must hold exactly one entry per input key, in input
/// order. One-to-many relations return an empty collection for unmatched
/// keys, to-one relations return `None`.
pub trait BatchFn<K, V>: Send + Sync {
    type Error: std::error::Error + Send + Sync + 'static;

    fn load(&self, keys: &[K]) -> impl Future<Output = Result<Vec<V>, Self::Error>> + Send;
}

/// A [`BatchFn`] built from an async closure. See [`from_fn`].
#[derive(Clone, Copy)]
pub struct FromFn<F> {
    f: F,
}

/// Wrap a closure taking the window's keys as a [`BatchFn`].
pub fn from_fn<F>(f: F) -> FromFn<F> {
    FromFn { f }
}

impl<K, V, E, F, Fut> BatchFn<K, V> for FromFn<F>
where
    K: Clone,
    F: Fn(Vec<K>) -> Fut + Send + Sync,
    Fut: Future<Output = Result<Vec<V>, E>> + Send,
    E: std::error::Error + Send + Sync + 'static,
{
    type Error = E;

    fn load(&self, keys: &[K]) -> impl Future<Output = Result<Vec<V>, E>> + Send {
        (self.f)(keys.to_vec())
    }
}

impl<F> std::fmt::Debug for FromFn<F> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FromFn")
            .field("f", &std::any::type_name::<F>())
            .finish()
    }
}
