use super::Binding;
use crate::Result;
use service_bindings_core::is_valid_secret_key;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use tracing::trace;

/// A binding that reads files from a [volume mounted] Kubernetes Secret.
///
/// Each regular file directly under the root is one entry: the file name is
/// the key and the file contents are the value. Nothing is held in memory, so
/// every lookup reads the filesystem again and reflects its current state.
///
/// # Example
///
/// ```rust,no_run
/// use service_bindings::binding::{Binding, ConfigTreeBinding};
///
/// let b = ConfigTreeBinding::new("/bindings/account-database");
/// assert_eq!(b.name(), "account-database");
///
/// if let Some(password) = b.get_as_bytes("password")? {
///     println!("password is {} bytes", password.len());
/// }
/// # Ok::<(), service_bindings::BindingError>(())
/// ```
///
/// [volume mounted]: https://kubernetes.io/docs/concepts/configuration/secret/#using-secrets
#[derive(Debug, Clone)]
pub struct ConfigTreeBinding {
    root: PathBuf,
    name: String,
}

impl ConfigTreeBinding {
    /// Creates a new `ConfigTreeBinding` rooted at `root`.
    ///
    /// The binding is named after the final component of `root`. The path is
    /// not checked for existence.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        let root = root.into();
        let name = root
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();

        Self { root, name }
    }

    /// Returns the directory this binding reads from.
    pub fn root(&self) -> &Path {
        &self.root
    }
}

impl Binding for ConfigTreeBinding {
    /// Reads the file named `key` under the root.
    ///
    /// A missing file and a path that is not a regular file (e.g. a nested
    /// directory) are both reported as `Ok(None)`. Any other I/O error, such
    /// as a permission failure, is returned as an error.
    fn get_as_bytes(&self, key: &str) -> Result<Option<Vec<u8>>> {
        if !is_valid_secret_key(key) {
            return Ok(None);
        }

        let path = self.root.join(key);
        trace!(binding = %self.name, key, "reading binding entry");

        match fs::metadata(&path) {
            Ok(metadata) if metadata.is_file() => Ok(Some(fs::read(&path)?)),
            Ok(_) => Ok(None),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn name(&self) -> &str {
        &self.name
    }
}
