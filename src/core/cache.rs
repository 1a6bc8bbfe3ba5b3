use super::prediction::PredictionKey;
use std::collections::HashSet;
use std::fmt::Debug;
use std::hash::Hash;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::debug;

/// Shared set of keys with atomic insert-if-absent.
#[derive(Clone)]
pub struct KeySet<K> {
    inner: Arc<Mutex<HashSet<K>>>,
}

/// Keys the prediction service has confirmed have no data.
pub type KnownFailedSet = KeySet<PredictionKey>;

impl<K> KeySet<K>
where
    K: Eq + Hash + Send + Sync + Debug,
{
    pub fn new() -> Self {
        Self {
            inner: Arc::new(Mutex::new(HashSet::new())),
        }
    }

    pub async fn contains(&self, key: &K) -> bool {
        let set = self.inner.lock().await;
        let hit = set.contains(key);
        if hit {
            debug!(?key, "Cache HIT");
        } else {
            debug!(?key, "Cache MISS");
        }
        hit
    }

    /// Returns `true` if the key was not present before.
    pub async fn insert(&self, key: K) -> bool {
        let mut set = self.inner.lock().await;
        debug!(?key, "Cache PUT");
        set.insert(key)
    }

    /// Inserts only if `allowed` still holds once the set is locked.
    pub async fn insert_if(&self, key: K, allowed: impl FnOnce() -> bool) -> bool {
        let mut set = self.inner.lock().await;
        if !allowed() {
            debug!(?key, "Cache PUT skipped");
            return false;
        }
        debug!(?key, "Cache PUT");
        set.insert(key)
    }

    pub async fn len(&self) -> usize {
        self.inner.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.inner.lock().await.is_empty()
    }
}

impl<K> Default for KeySet<K>
where
    K: Eq + Hash + Send + Sync + Debug,
{
    fn default() -> Self {
        Self::new()
    }
}
