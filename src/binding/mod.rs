//! # Bindings
//!
//! A binding is a named group of entries describing one external service
//! connection, as defined by the [Kubernetes Service Binding Specification].
//! Every entry is addressed by a key and holds a raw byte value.
//!
//! ## Architecture
//!
//! The module is built around the [`Binding`] trait, which defines the two
//! operations every source of binding data supports: fetching the raw bytes of
//! an entry and naming the binding. Three implementations are provided:
//!
//! - [`MapBinding`]: an in-memory map, for tests and synthetic sources
//! - [`ConfigTreeBinding`]: a directory of files as projected by Kubernetes
//! - [`CacheBinding`]: a decorator that memoizes the entries of another binding
//!
//! The free functions [`get`], [`get_provider`] and [`get_type`] sit on top of
//! any binding and turn raw bytes into trimmed strings.
//!
//! ## Example
//!
//! ```rust
//! use service_bindings::binding::{self, MapBinding};
//!
//! let b = MapBinding::new(
//!     "account-database",
//!     [("type", "postgresql\n"), ("username", "admin\n")],
//! );
//!
//! assert_eq!(binding::get_type(&b)?, "postgresql");
//! assert_eq!(binding::get(&b, "username")?.as_deref(), Some("admin"));
//! assert_eq!(binding::get_provider(&b)?, None);
//! # Ok::<(), service_bindings::BindingError>(())
//! ```
//!
//! [Kubernetes Service Binding Specification]: https://github.com/k8s-service-bindings/spec#workload-projection

use crate::{BindingError, Result};
use service_bindings_core::{PROVIDER, TYPE};
use std::sync::Arc;

pub mod cache;
pub mod config_tree;
pub mod map;


pub use cache::CacheBinding;
pub use config_tree::ConfigTreeBinding;
pub use map::MapBinding;

/// Trait defining the interface for a source of binding entries.
///
/// # Thread Safety
///
/// Bindings must be `Send + Sync` so a discovered collection can be shared
/// across the threads of the host application.
///
/// # Implementation Guidelines
///
/// - Keys that fail [`is_valid_secret_key`](service_bindings_core::is_valid_secret_key)
///   must return `Ok(None)` without touching the backing storage
/// - A missing entry is `Ok(None)`, never an error
/// - Only genuine faults of the backing storage are returned as `Err`
pub trait Binding: Send + Sync {
    /// Returns the contents of a binding entry in its raw form.
    ///
    /// # Returns
    ///
    /// - `Ok(Some(bytes))` if the entry exists
    /// - `Ok(None)` if the entry doesn't exist or the key is invalid
    /// - `Err` if the backing storage could not be read
    fn get_as_bytes(&self, key: &str) -> Result<Option<Vec<u8>>>;

    /// Returns the name of the binding.
    fn name(&self) -> &str;
}

impl<B: Binding + ?Sized> Binding for Arc<B> {
    fn get_as_bytes(&self, key: &str) -> Result<Option<Vec<u8>>> {
        (**self).get_as_bytes(key)
    }

    fn name(&self) -> &str {
        (**self).name()
    }
}

impl<B: Binding + ?Sized> Binding for Box<B> {
    fn get_as_bytes(&self, key: &str) -> Result<Option<Vec<u8>>> {
        (**self).get_as_bytes(key)
    }

    fn name(&self) -> &str {
        (**self).name()
    }
}

/// Returns the contents of a binding entry as a UTF-8 decoded string.
///
/// Invalid UTF-8 sequences are replaced with `U+FFFD`. Surrounding whitespace,
/// including the trailing newline most projected files carry, is trimmed.
///
/// # Returns
///
/// - `Ok(Some(value))` if the entry exists
/// - `Ok(None)` if the entry doesn't exist
pub fn get<B: Binding + ?Sized>(binding: &B, key: &str) -> Result<Option<String>> {
    Ok(binding.get_as_bytes(key)?.map(|bytes| decode(&bytes)))
}

/// Returns the value of the [`PROVIDER`] entry, if the binding declares one.
pub fn get_provider<B: Binding + ?Sized>(binding: &B) -> Result<Option<String>> {
    get(binding, PROVIDER)
}

/// Returns the value of the [`TYPE`] entry.
///
/// # Errors
///
/// Returns [`BindingError::MissingType`] if the binding has no `type` entry,
/// since every binding is required to declare one.
pub fn get_type<B: Binding + ?Sized>(binding: &B) -> Result<String> {
    get(binding, TYPE)?.ok_or(BindingError::MissingType)
}

fn decode(bytes: &[u8]) -> String {
    String::from_utf8_lossy(bytes)
        .trim_matches(|c: char| c.is_whitespace() || c == '\u{feff}')
        .to_string()
}
