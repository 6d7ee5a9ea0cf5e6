use super::Binding;
use crate::Result;
use service_bindings_core::is_valid_secret_key;
use std::collections::HashMap;
use std::fmt;

/// A binding that returns values from an in-memory map.
///
/// The content is fixed at construction; there is no way to add or change
/// entries afterwards.
///
/// # Example
///
/// ```rust
/// use service_bindings::binding::{Binding, MapBinding};
///
/// let b = MapBinding::new("cache", [("type", "redis"), ("host", "localhost")]);
/// assert_eq!(b.name(), "cache");
/// assert_eq!(b.get_as_bytes("host")?, Some(b"localhost".to_vec()));
/// # Ok::<(), service_bindings::BindingError>(())
/// ```
pub struct MapBinding {
    name: String,
    content: HashMap<String, Vec<u8>>,
}

impl MapBinding {
    /// Creates a new `MapBinding` with the given name and entries.
    pub fn new<K, V>(name: impl Into<String>, content: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<Vec<u8>>,
    {
        Self {
            name: name.into(),
            content: content
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

impl Binding for MapBinding {
    fn get_as_bytes(&self, key: &str) -> Result<Option<Vec<u8>>> {
        if !is_valid_secret_key(key) {
            return Ok(None);
        }

        Ok(self.content.get(key).cloned())
    }

    fn name(&self) -> &str {
        &self.name
    }
}

// Values are secrets, only keys are printed.
impl fmt::Debug for MapBinding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut keys: Vec<&String> = self.content.keys().collect();
        keys.sort();
        f.debug_struct("MapBinding")
            .field("name", &self.name)
            .field("keys", &keys)
            .finish()
    }
}
