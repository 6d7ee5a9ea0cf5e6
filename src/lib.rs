//! Service Bindings - A client for the Kubernetes Service Binding Specification
//!
//! This library discovers and reads the service binding metadata that the
//! [Service Binding Specification] projects into an application container: a
//! directory per binding under `$SERVICE_BINDING_ROOT`, a file per entry.
//!
//! # Features
//!
//! - **Discovery**: Build a collection of bindings from a directory or from `$SERVICE_BINDING_ROOT`
//! - **Lookup**: Find a binding by name or filter by declared type and provider
//! - **Caching**: Optionally memoize entries so each file is read at most once
//! - **Validation**: Keys are checked against Kubernetes Secret key rules before any filesystem access
//!
//! # Example
//!
//! ```no_run
//! use service_bindings::{binding, bindings};
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let all = bindings::cached(&bindings::from_service_binding_root()?);
//!
//!     let postgres = bindings::filter(&all, Some("postgresql"), None)?;
//!     if postgres.len() != 1 {
//!         return Err(format!("Incorrect number of PostgreSQL bindings: {}", postgres.len()).into());
//!     }
//!
//!     let url = binding::get(&postgres[0], "url")?.ok_or("No URL in binding")?;
//!     println!("Connecting to {}", url);
//!
//!     Ok(())
//! }
//! ```
//!
//! [Service Binding Specification]: https://github.com/k8s-service-bindings/spec

mod error;

pub mod binding;
pub mod bindings;

// CLI module (feature-gated)
#[cfg(feature = "cli")]
pub mod cli;

// Public API exports
pub use binding::{Binding, CacheBinding, ConfigTreeBinding, MapBinding};
pub use error::{BindingError, Result};
pub use service_bindings_core::{
    KeyError, PROVIDER, SERVICE_BINDING_ROOT, SecretKey, TYPE, is_valid_secret_key,
};
