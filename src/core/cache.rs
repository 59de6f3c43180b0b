use std::collections::HashMap;
use std::fmt::Debug;
use std::hash::Hash;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::debug;

/// Process-lifetime key/value memo shared between provider clones.
#[derive(Clone)]
pub struct Cache<K, V>
where
    K: Eq + Hash + Debug + Send + Sync + 'static,
    V: Clone + Send + Sync + 'static,
{
    inner: Arc<Mutex<HashMap<K, V>>>,
}

impl<K, V> Cache<K, V>
where
    K: Eq + Hash + Debug + Send + Sync,
    V: Clone + Send + Sync,
{
    pub fn new() -> Self {
        Self {
            inner: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    /// Returns the entry for `key`, inserting `default()` first when there is
    /// none. Lookup and insert happen under one lock.
    pub async fn get_or_insert_with(&self, key: K, default: impl FnOnce() -> V) -> V {
        let mut cache = self.inner.lock().await;
        if let Some(value) = cache.get(&key) {
            debug!("Cache HIT for key: {:?}", key);
            return value.clone();
        }
        debug!("Cache PUT for key: {:?}", key);
        let value = default();
        cache.insert(key, value.clone());
        value
    }
}

impl<K, V> Default for Cache<K, V>
where
    K: Eq + Hash + Debug + Send + Sync,
    V: Clone + Send + Sync,
{
    fn default() -> Self {
        Self::new()
    }
}
