// In-flight request deduplication
use crate::domain::error::RecapError;
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use futures_util::future::{BoxFuture, FutureExt, Shared};
use std::future::Future;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::oneshot;
use tokio::time::Instant;
use tracing::debug;

pub const DEFAULT_DEDUP_WINDOW: Duration = Duration::from_secs(30);

type SharedResult<T> = Shared<BoxFuture<'static, Result<T, RecapError>>>;

struct Pending<T> {
    id: u64,
    created_at: Instant,
    result: SharedResult<T>,
}

/// Collapses concurrent requests for the same key onto one producer.
///
/// Producers are spawned, so they run to completion even if every caller
/// stops waiting. A registered request is shared only while it is younger
/// than the dedup window; after that a new producer replaces it.
pub struct RequestCoordinator<T> {
    pending: Arc<DashMap<String, Pending<T>>>,
    window: Duration,
    next_id: AtomicU64,
}

impl<T> RequestCoordinator<T>
where
    T: Clone + Send + Sync + 'static,
{
    pub fn new(window: Duration) -> Self {
        Self {
            pending: Arc::new(DashMap::new()),
            window,
            next_id: AtomicU64::new(0),
        }
    }

    /// Number of requests currently registered.
    pub fn in_flight(&self) -> usize {
        self.pending.len()
    }

    /// Join the in-flight request for `key`, or start `producer` and
    /// register it. Every waiter sees the same value or the same error.
    pub async fn dedupe<F, Fut>(&self, key: String, producer: F) -> Result<T, RecapError>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, RecapError>> + Send + 'static,
    {
        // The entry guard holds the shard lock, so lookup and insert are atomic.
        let result = match self.pending.entry(key.clone()) {
            Entry::Occupied(ref entry) if entry.get().created_at.elapsed() < self.window => {
                debug!(key = %key, "joined in-flight request");
                entry.get().result.clone()
            }
            entry => {
                let id = self.next_id.fetch_add(1, Ordering::Relaxed);
                let result = self.spawn(key.clone(), id, producer());
                let pending = Pending {
                    id,
                    created_at: Instant::now(),
                    result: result.clone(),
                };
                match entry {
                    Entry::Occupied(mut stale) => {
                        debug!(key = %key, "replacing stale in-flight request");
                        stale.insert(pending);
                    }
                    Entry::Vacant(vacant) => {
                        vacant.insert(pending);
                    }
                }
                result
            }
        };

        result.await
    }

    fn spawn<Fut>(&self, key: String, id: u64, producer: Fut) -> SharedResult<T>
    where
        Fut: Future<Output = Result<T, RecapError>> + Send + 'static,
    {
        let (sender, receiver) = oneshot::channel();
        let evict = EvictOnDrop {
            pending: Arc::clone(&self.pending),
            key,
            id,
        };

        tokio::spawn(async move {
            let result = producer.await;
            // Evict before publishing so late callers start a fresh request
            // instead of joining a settled one.
            drop(evict);
            sender.send(result).ok();
        });

        receiver
            .map(|received| {
                received.unwrap_or_else(|_| {
                    Err(RecapError::Internal(
                        "in-flight request ended without a result".to_string(),
                    ))
                })
            })
            .boxed()
            .shared()
    }
}

// Also runs if the producer panics.
struct EvictOnDrop<T> {
    pending: Arc<DashMap<String, Pending<T>>>,
    key: String,
    id: u64,
}

impl<T> Drop for EvictOnDrop<T> {
    fn drop(&mut self) {
        // A stale request must not evict the one that replaced it.
        self.pending
            .remove_if(&self.key, |_, pending| pending.id == self.id);
    }
}
