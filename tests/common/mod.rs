use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Test helper for laying out a binding root in a temporary directory
pub struct TestFixture {
    temp_dir: TempDir,
    pub root: PathBuf,
}

impl TestFixture {
    pub fn new() -> Self {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path().join("bindings");
        fs::create_dir(&root).unwrap();
        Self {
            temp_dir,
            root,
        }
    }

    /// Create a binding directory with one file per entry
    pub fn add_binding(&self, name: &str, entries: &[(&str, &str)]) -> PathBuf {
        let dir = self.root.join(name);
        fs::create_dir_all(&dir).unwrap();
        for (key, value) in entries {
            fs::write(dir.join(key), value).unwrap();
        }
        dir
    }

    /// Create a regular file directly under the root
    pub fn add_file(&self, name: &str) -> PathBuf {
        let path = self.root.join(name);
        fs::write(&path, "").unwrap();
        path
    }

    /// Directory next to the root, for content that must not be discovered
    pub fn outside(&self) -> &Path {
        self.temp_dir.path()
    }

    /// Create the layout from the Service Binding Specification examples
    ///
    /// Two bindings, one of them without a provider, plus a stray file and a
    /// nested directory that discovery and lookups must ignore.
    pub fn create_standard_layout(&self) {
        let database = self.add_binding(
            "account-database",
            &[
                ("type", "postgresql\n"),
                ("provider", "bitnami\n"),
                ("uri", "postgresql://db.example.com:5432/accounts\n"),
                ("username", "admin\n"),
                ("password", "hunter2\n"),
            ],
        );
        fs::create_dir(database.join("certificates")).unwrap();

        self.add_binding(
            "transaction-event-stream",
            &[
                ("type", "kafka\n"),
                ("connection-count", "4\n"),
                ("uri", "kafka://stream.example.com:9092\n"),
            ],
        );

        self.add_file("additional-file");
    }
}

impl Default for TestFixture {
    fn default() -> Self {
        Self::new()
    }
}
