use std::collections::HashMap;
use std::hash::Hash;
use std::sync::{Arc, Mutex, MutexGuard, OnceLock, PoisonError};

use dashmap::DashMap;
use futures_util::future::{try_join_all, BoxFuture, FutureExt, Shared};
use tokio::sync::OnceCell;

use crate::batch::BatchFn;
use crate::error::LoadError;

/// Scheduler yields the first waiter of a window performs before closing it.
pub const DEFAULT_YIELD_COUNT: usize = 10;

type Outcome<K, V> = Arc<Result<HashMap<K, Arc<V>>, LoadError>>;

/// The spawned bulk call of a closed window.
type Flight<K, V> = Shared<BoxFuture<'static, Outcome<K, V>>>;

/// One accumulation buffer. Keys are only appended while the window is the
/// loader's open window; once closed the key set is frozen.
struct Window<K, V> {
    keys: Mutex<Vec<K>>,
    flight: OnceLock<Flight<K, V>>,
    outcome: OnceCell<Outcome<K, V>>,
}

impl<K, V> Window<K, V> {
    fn new() -> Self {
        Self {
            keys: Mutex::new(Vec::new()),
            flight: OnceLock::new(),
            outcome: OnceCell::new(),
        }
    }
}

struct WindowState<K, V> {
    open: Option<Arc<Window<K, V>>>,
    /// Keys registered in a window that has not completed yet.
    waiting: HashMap<K, Arc<Window<K, V>>>,
}

/// Deduplicating, batching, caching key loader.
///
/// Every `load` issued before the window's first waiter has yielded to the
/// scheduler `yield_count` times is coalesced into one [`BatchFn`] call over
/// the de-duplicated keys. Successful values are cached and shared as
/// [`Arc`]s; failures are delivered to every waiter of the window and are not
/// cached.
///
/// The bulk call runs on its own task and is issued at most once per window.
/// If the future driving a window is dropped, the call still completes and
/// the next waiter of that window picks up its result.
pub struct Loader<K, V, F> {
    name: &'static str,
    batch_fn: Arc<F>,
    cache: DashMap<K, Arc<V>>,
    state: Mutex<WindowState<K, V>>,
    yield_count: usize,
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

impl<K, V, F> Loader<K, V, F>
where
    K: Eq + Hash + Clone + Send + Sync + 'static,
    V: Send + Sync + 'static,
    F: BatchFn<K, V> + 'static,
{
    pub fn new(name: &'static str, batch_fn: F) -> Self {
        Self {
            name,
            batch_fn: Arc::new(batch_fn),
            cache: DashMap::new(),
            state: Mutex::new(WindowState {
                open: None,
                waiting: HashMap::new(),
            }),
            yield_count: DEFAULT_YIELD_COUNT,
        }
    }

    /// Set how many times a window's first waiter yields before dispatching.
    pub fn with_yield_count(mut self, yield_count: usize) -> Self {
        self.yield_count = yield_count;
        self
    }

    /// Whether `key` has already been resolved by this loader.
    pub fn is_cached(&self, key: &K) -> bool {
        self.cache.contains_key(key)
    }

    /// Load the value for `key`, joining the current batch window.
    pub async fn load(&self, key: K) -> Result<Arc<V>, LoadError> {
        if let Some(hit) = self.cache.get(&key) {
            return Ok(Arc::clone(hit.value()));
        }

        let window = {
            let mut state = lock(&self.state);
            if let Some(pending) = state.waiting.get(&key) {
                Arc::clone(pending)
            } else if let Some(hit) = self.cache.get(&key) {
                // Resolved between the fast path and taking the lock.
                return Ok(Arc::clone(hit.value()));
            } else {
                let window = Arc::clone(state.open.get_or_insert_with(|| Arc::new(Window::new())));
                lock(&window.keys).push(key.clone());
                state.waiting.insert(key.clone(), Arc::clone(&window));
                window
            }
        };

        let outcome = window
            .outcome
            .get_or_init(|| self.dispatch(&window))
            .await;
        match outcome.as_ref() {
            Ok(values) => values
                .get(&key)
                .cloned()
                .ok_or(LoadError::Missing { loader: self.name }),
            Err(err) => Err(err.clone()),
        }
    }

    /// Load several keys, returning values in input order.
    pub async fn load_many<I>(&self, keys: I) -> Result<Vec<Arc<V>>, LoadError>
    where
        I: IntoIterator<Item = K>,
    {
        try_join_all(keys.into_iter().map(|key| self.load(key))).await
    }

    async fn dispatch(&self, window: &Arc<Window<K, V>>) -> Outcome<K, V> {
        let flight = match window.flight.get() {
            // The previous driver was dropped after the bulk call started.
            Some(flight) => flight.clone(),
            None => {
                for _ in 0..self.yield_count {
                    tokio::task::yield_now().await;
                }
                self.close(window);
                window.flight.get_or_init(|| self.launch(window)).clone()
            }
        };

        let outcome = flight.await;
        let keys = lock(&window.keys).clone();
        match outcome.as_ref() {
            Ok(values) => {
                for (key, value) in values {
                    self.cache.insert(key.clone(), Arc::clone(value));
                }
            }
            Err(err) => tracing::warn!(loader = self.name, error = %err, "batch failed"),
        }

        let mut state = lock(&self.state);
        for key in &keys {
            if state
                .waiting
                .get(key)
                .is_some_and(|pending| Arc::ptr_eq(pending, window))
            {
                state.waiting.remove(key);
            }
        }
        outcome
    }

    fn close(&self, window: &Arc<Window<K, V>>) {
        let mut state = lock(&self.state);
        if state
            .open
            .as_ref()
            .is_some_and(|open| Arc::ptr_eq(open, window))
        {
            state.open = None;
        }
    }

    fn launch(&self, window: &Window<K, V>) -> Flight<K, V> {
        let keys = lock(&window.keys).clone();
        let name = self.name;
        let batch_fn = Arc::clone(&self.batch_fn);
        tracing::debug!(loader = name, keys = keys.len(), "dispatching batch");

        let task = tokio::spawn(async move { resolve(name, batch_fn.as_ref(), &keys).await });
        async move {
            let outcome = task
                .await
                .unwrap_or_else(|_| Err(LoadError::Aborted { loader: name }));
            Arc::new(outcome)
        }
        .boxed()
        .shared()
    }
}

async fn resolve<K, V, F>(
    name: &'static str,
    batch_fn: &F,
    keys: &[K],
) -> Result<HashMap<K, Arc<V>>, LoadError>
where
    K: Eq + Hash + Clone,
    F: BatchFn<K, V>,
{
    let values = batch_fn.load(keys).await.map_err(|err| LoadError::Batch {
        loader: name,
        source: Arc::new(err),
    })?;

    if values.len() != keys.len() {
        return Err(LoadError::Misaligned {
            loader: name,
            expected: keys.len(),
            actual: values.len(),
        });
    }

    Ok(keys
        .iter()
        .cloned()
        .zip(values.into_iter().map(Arc::new))
        .collect())
}

impl<K, V, F> std::fmt::Debug for Loader<K, V, F>
where
    K: Eq + Hash,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Loader")
            .field("name", &self.name)
            .field("cached", &self.cache.len())
            .field("yield_count", &self.yield_count)
            .finish()
    }
}
