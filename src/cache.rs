use std::collections::HashMap;
use std::future::Future;
use std::sync::Arc;
use tokio::sync::{Mutex, OnceCell};
use tracing::debug;

use crate::error::TmdbResult;
use crate::models::MovieDetails;

type Slot = Arc<OnceCell<Arc<MovieDetails>>>;

/// Session-lifetime store of movie details keyed by the id's string form.
///
/// No eviction. Concurrent lookups for the same id share one in-flight fetch; a failed
/// fetch drops the slot so the next caller tries again.
#[derive(Debug, Default)]
pub struct ResultCache {
    pub(crate) slots: Mutex<HashMap<String, Slot>>,
}

impl ResultCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn get(&self, id: u64) -> Option<Arc<MovieDetails>> {
        let slots = self.slots.lock().await;
        slots.get(&id.to_string()).and_then(|s| s.get().cloned())
    }

    /// Stores `details`, replacing any earlier entry for the id.
    pub async fn put(&self, id: u64, details: MovieDetails) -> Arc<MovieDetails> {
        let details = Arc::new(details);
        let slot = Arc::new(OnceCell::new_with(Some(details.clone())));
        self.slots.lock().await.insert(id.to_string(), slot);
        details
    }

    /// Read-through lookup. `fetch` runs only on a miss, and at most once at a time per id.
    pub async fn get_or_fetch<F, Fut>(&self, id: u64, fetch: F) -> TmdbResult<Arc<MovieDetails>>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = TmdbResult<MovieDetails>>,
    {
        let slot = {
            let mut slots = self.slots.lock().await;
            slots.entry(id.to_string()).or_default().clone()
        };
        if let Some(hit) = slot.get() {
            debug!(movie_id = id, "cache hit");
            return Ok(hit.clone());
        }
        let result = slot
            .get_or_try_init(|| async move { fetch().await.map(Arc::new) })
            .await
            .cloned();
        if result.is_err() {
            self.forget_empty(id, &slot).await;
        }
        result
    }

    /// Drops the slot for `id` if it is still `slot` and never got a value.
    async fn forget_empty(&self, id: u64, slot: &Slot) {
        let key = id.to_string();
        let mut slots = self.slots.lock().await;
        let unused = slots
            .get(&key)
            .is_some_and(|s| Arc::ptr_eq(s, slot) && !s.initialized());
        if unused {
            slots.remove(&key);
        }
    }

    /// Number of ids with a stored value.
    pub async fn len(&self) -> usize {
        let slots = self.slots.lock().await;
        slots.values().filter(|s| s.initialized()).count()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }

    pub async fn clear(&self) {
        self.slots.lock().await.clear();
    }
}
