//! Discovery and querying of binding collections
//!
//! Bindings are projected under a single root directory, one subdirectory per
//! binding. [`from_path`] turns such a directory into a list of
//! [`ConfigTreeBinding`]s and [`from_service_binding_root`] does the same for
//! the directory named by `$SERVICE_BINDING_ROOT`. The resulting list can be
//! searched by name with [`find`] or narrowed by type and provider with
//! [`filter`].
//!
//! ```rust,no_run
//! use service_bindings::{binding, bindings};
//!
//! let all = bindings::cached(&bindings::from_service_binding_root()?);
//!
//! let postgres = bindings::filter(&all, Some("postgresql"), None)?;
//! if let [b] = postgres.as_slice() {
//!     let url = binding::get(b, "url")?;
//!     println!("connecting to {:?}", url);
//! }
//! # Ok::<(), service_bindings::BindingError>(())
//! ```

use crate::Result;
use crate::binding::{Binding, CacheBinding, ConfigTreeBinding, get_provider, get_type};
use service_bindings_core::SERVICE_BINDING_ROOT;
use std::env;
use std::fs;
use std::io;
use std::path::Path;
use std::sync::Arc;
use tracing::{debug, trace};

/// Wraps each binding in a [`CacheBinding`].
///
/// The input is left untouched; the returned list holds new wrappers in the
/// same order, each sharing its delegate with the input.
pub fn cached(bindings: &[Arc<dyn Binding>]) -> Vec<Arc<dyn Binding>> {
    bindings
        .iter()
        .map(|b| Arc::new(CacheBinding::new(Arc::clone(b))) as Arc<dyn Binding>)
        .collect()
}

/// Creates a collection of bindings from the subdirectories of `root`.
///
/// Every immediate subdirectory of `root` becomes a [`ConfigTreeBinding`];
/// regular files and other entries are skipped. Entries are returned in the
/// order the directory listing yields them, which is not sorted.
///
/// # Returns
///
/// - An empty collection if `root` does not exist or is not a directory
/// - `Err` for any other failure to stat `root`, list it, or stat an entry
pub fn from_path(root: impl AsRef<Path>) -> Result<Vec<Arc<dyn Binding>>> {
    let root = root.as_ref();

    let metadata = match fs::metadata(root) {
        Ok(metadata) => metadata,
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            debug!(root = %root.display(), "binding root does not exist");
            return Ok(Vec::new());
        }
        Err(e) => return Err(e.into()),
    };

    if !metadata.is_dir() {
        debug!(root = %root.display(), "binding root is not a directory");
        return Ok(Vec::new());
    }

    let mut bindings: Vec<Arc<dyn Binding>> = Vec::new();
    for entry in fs::read_dir(root)? {
        let path = entry?.path();

        // Follows symlinks, Kubernetes projects bindings through them
        if fs::metadata(&path)?.is_dir() {
            trace!(path = %path.display(), "discovered binding");
            bindings.push(Arc::new(ConfigTreeBinding::new(path)));
        }
    }

    debug!(root = %root.display(), count = bindings.len(), "discovered bindings");
    Ok(bindings)
}

/// Creates a collection of bindings using `$SERVICE_BINDING_ROOT` as the root.
///
/// If the variable is not set, an empty collection is returned without
/// touching the filesystem. Otherwise this behaves exactly like [`from_path`].
pub fn from_service_binding_root() -> Result<Vec<Arc<dyn Binding>>> {
    match env::var_os(SERVICE_BINDING_ROOT) {
        Some(root) => from_path(root),
        None => {
            debug!("${} is not set", SERVICE_BINDING_ROOT);
            Ok(Vec::new())
        }
    }
}

/// Returns the first binding with the given name, compared case-insensitively.
pub fn find<'a>(bindings: &'a [Arc<dyn Binding>], name: &str) -> Option<&'a Arc<dyn Binding>> {
    bindings.iter().find(|b| equals_ignore_case(b.name(), name))
}

/// Returns the bindings with the given type and provider.
///
/// A `None` argument does not filter on that attribute. Comparisons are
/// case-insensitive and the input order is preserved.
///
/// # Errors
///
/// When filtering on type, every binding must declare one: a binding without a
/// `type` entry fails the whole call with
/// [`BindingError::MissingType`](crate::BindingError::MissingType). Bindings
/// without a `provider` entry simply don't match a provider filter.
pub fn filter(
    bindings: &[Arc<dyn Binding>],
    binding_type: Option<&str>,
    provider: Option<&str>,
) -> Result<Vec<Arc<dyn Binding>>> {
    let mut matched = Vec::new();

    for b in bindings {
        let type_matches = match binding_type {
            Some(t) => equals_ignore_case(&get_type(b)?, t),
            None => true,
        };

        let provider_matches = match provider {
            Some(p) => get_provider(b)?.is_some_and(|v| equals_ignore_case(&v, p)),
            None => true,
        };

        if type_matches && provider_matches {
            matched.push(Arc::clone(b));
        }
    }

    Ok(matched)
}

fn equals_ignore_case(a: &str, b: &str) -> bool {
    a.chars()
        .flat_map(char::to_lowercase)
        .eq(b.chars().flat_map(char::to_lowercase))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::binding::MapBinding;
    use crate::binding::tests::CountingBinding;
    use crate::BindingError;
    use std::sync::atomic::Ordering;
    use tempfile::TempDir;

    fn map_binding(name: &str, entries: &[(&str, &str)]) -> Arc<dyn Binding> {
        Arc::new(MapBinding::new(name, entries.iter().copied()))
    }

    fn names(bindings: &[Arc<dyn Binding>]) -> Vec<String> {
        bindings.iter().map(|b| b.name().to_string()).collect()
    }

    fn typed_bindings() -> Vec<Arc<dyn Binding>> {
        vec![
            map_binding(
                "test-name-1",
                &[("type", "test-type-1"), ("provider", "test-provider-1")],
            ),
            map_binding(
                "test-name-2",
                &[("type", "test-type-1"), ("provider", "test-provider-2")],
            ),
            map_binding(
                "test-name-3",
                &[("type", "test-type-2"), ("provider", "test-provider-2")],
            ),
            map_binding("test-name-4", &[("type", "test-type-2")]),
        ]
    }

    #[test]
    fn test_cached_wraps_each_binding() {
        let stub = Arc::new(CountingBinding::new(MapBinding::new(
            "test-name-1",
            [("type", "test-type-1")],
        )));
        let input = vec![stub.clone() as Arc<dyn Binding>, map_binding("test-name-2", &[])];

        let wrapped = cached(&input);
        assert_eq!(names(&wrapped), vec!["test-name-1", "test-name-2"]);
        assert_eq!(input.len(), 2);

        get_type(&wrapped[0]).unwrap();
        get_type(&wrapped[0]).unwrap();
        assert_eq!(stub.get_calls.load(Ordering::SeqCst), 1);

        // The input still talks to the delegate directly
        get_type(&input[0]).unwrap();
        assert_eq!(stub.get_calls.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_from_path_missing() {
        let temp_dir = TempDir::new().unwrap();
        let bindings = from_path(temp_dir.path().join("missing")).unwrap();
        assert!(bindings.is_empty());
    }

    #[test]
    fn test_from_path_not_a_directory() {
        let temp_dir = TempDir::new().unwrap();
        let file = temp_dir.path().join("additional-file");
        fs::write(&file, "").unwrap();

        let bindings = from_path(&file).unwrap();
        assert!(bindings.is_empty());
    }

    #[test]
    fn test_from_path_empty_directory() {
        let temp_dir = TempDir::new().unwrap();
        assert!(from_path(temp_dir.path()).unwrap().is_empty());
    }

    #[test]
    fn test_from_path() {
        let temp_dir = TempDir::new().unwrap();
        for name in ["test-name-1", "test-name-2", "test-name-3"] {
            fs::create_dir(temp_dir.path().join(name)).unwrap();
        }
        fs::write(temp_dir.path().join("additional-file"), "").unwrap();

        let bindings = from_path(temp_dir.path()).unwrap();
        assert_eq!(bindings.len(), 3);

        let mut found = names(&bindings);
        found.sort();
        assert_eq!(found, vec!["test-name-1", "test-name-2", "test-name-3"]);
    }

    #[test]
    fn test_find_missing() {
        let bindings = vec![map_binding("test-name-1", &[])];
        assert!(find(&bindings, "test-name-2").is_none());
    }

    #[test]
    fn test_find() {
        let bindings = vec![map_binding("test-name-1", &[]), map_binding("test-name-2", &[])];

        let b = find(&bindings, "test-name-1").unwrap();
        assert_eq!(b.name(), "test-name-1");
    }

    #[test]
    fn test_find_ignores_case() {
        let bindings = vec![map_binding("test-name-1", &[])];

        let b = find(&bindings, "TEST-NAME-1").unwrap();
        assert_eq!(b.name(), "test-name-1");
    }

    #[test]
    fn test_find_returns_first_match() {
        let bindings = vec![
            map_binding("Duplicate", &[("type", "first")]),
            map_binding("duplicate", &[("type", "second")]),
        ];

        let b = find(&bindings, "DUPLICATE").unwrap();
        assert_eq!(get_type(b).unwrap(), "first");
    }

    #[test]
    fn test_equals_ignore_case() {
        assert!(equals_ignore_case("AbC", "abc"));
        assert!(equals_ignore_case("ÉCOLE", "école"));
        assert!(!equals_ignore_case("ecole", "école"));
        assert!(!equals_ignore_case("abc", "abcd"));
    }

    #[test]
    fn test_filter_no_bindings() {
        let bindings = typed_bindings();
        assert!(filter(&bindings, Some("test-type-3"), None).unwrap().is_empty());
    }

    #[test]
    fn test_filter_by_type() {
        let bindings = typed_bindings();

        let matched = filter(&bindings, Some("test-type-1"), None).unwrap();
        assert_eq!(names(&matched), vec!["test-name-1", "test-name-2"]);

        let matched = filter(&bindings, Some("TEST-TYPE-2"), None).unwrap();
        assert_eq!(names(&matched), vec!["test-name-3", "test-name-4"]);
    }

    #[test]
    fn test_filter_by_provider() {
        let bindings = typed_bindings();

        let matched = filter(&bindings, None, Some("test-provider-2")).unwrap();
        assert_eq!(names(&matched), vec!["test-name-2", "test-name-3"]);
    }

    #[test]
    fn test_filter_by_type_and_provider() {
        let bindings = typed_bindings();

        let matched = filter(&bindings, Some("test-type-1"), Some("test-provider-1")).unwrap();
        assert_eq!(names(&matched), vec!["test-name-1"]);
    }

    #[test]
    fn test_filter_without_arguments() {
        let bindings = typed_bindings();

        let matched = filter(&bindings, None, None).unwrap();
        assert_eq!(
            names(&matched),
            vec!["test-name-1", "test-name-2", "test-name-3", "test-name-4"]
        );
    }

    #[test]
    fn test_filter_by_type_requires_type() {
        let bindings = vec![
            map_binding("test-name-1", &[("type", "test-type-1")]),
            map_binding("test-name-2", &[("provider", "test-provider-1")]),
        ];

        match filter(&bindings, Some("test-type-1"), None) {
            Err(BindingError::MissingType) => {}
            Err(e) => panic!("Expected MissingType error, got {}", e),
            Ok(_) => panic!("Expected MissingType error"),
        }

        // Only a type filter needs the type
        let matched = filter(&bindings, None, Some("test-provider-1")).unwrap();
        assert_eq!(names(&matched), vec!["test-name-2"]);
    }
}
