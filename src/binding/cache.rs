use super::Binding;
use crate::Result;
use dashmap::DashMap;
use std::fmt;
use std::sync::Arc;
use tracing::trace;

/// A binding that caches values once they've been retrieved.
///
/// Only entries that exist are cached; a lookup that comes back empty is
/// forwarded to the delegate again next time, so an entry that appears later
/// is still picked up. Cached entries are never evicted.
///
/// Concurrent lookups of the same uncached key may each reach the delegate.
/// They all observe the same value, the cache only saves repeated reads.
///
/// # Example
///
/// ```rust,no_run
/// use service_bindings::binding::{Binding, CacheBinding, ConfigTreeBinding};
/// use std::sync::Arc;
///
/// let b = CacheBinding::new(Arc::new(ConfigTreeBinding::new("/bindings/account-database")));
///
/// // Reads the file once, later calls are served from memory
/// let first = b.get_as_bytes("username")?;
/// let second = b.get_as_bytes("username")?;
/// assert_eq!(first, second);
/// # Ok::<(), service_bindings::BindingError>(())
/// ```
pub struct CacheBinding {
    delegate: Arc<dyn Binding>,
    cache: DashMap<String, Vec<u8>>,
}

impl CacheBinding {
    /// Creates a new `CacheBinding` that retrieves original values from `delegate`.
    pub fn new(delegate: Arc<dyn Binding>) -> Self {
        Self {
            delegate,
            cache: DashMap::new(),
        }
    }
}

impl Binding for CacheBinding {
    fn get_as_bytes(&self, key: &str) -> Result<Option<Vec<u8>>> {
        if let Some(value) = self.cache.get(key) {
            trace!(key, "cache hit");
            return Ok(Some(value.value().clone()));
        }

        trace!(key, "cache miss");
        let value = self.delegate.get_as_bytes(key)?;
        if let Some(v) = &value {
            self.cache.insert(key.to_string(), v.clone());
        }

        Ok(value)
    }

    fn name(&self) -> &str {
        self.delegate.name()
    }
}

impl fmt::Debug for CacheBinding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CacheBinding")
            .field("name", &self.delegate.name())
            .field("cached", &self.cache.len())
            .finish()
    }
}
