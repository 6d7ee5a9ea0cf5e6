//! # Service Bindings Core
//!
//! This crate provides the key grammar and the reserved names shared by every
//! part of the service binding client.
//!
//! A service binding is projected into a container as a directory tree: one
//! subdirectory per binding, one regular file per entry. Entry names follow the
//! [Kubernetes Secret key] rules, so a key is only ever made of ASCII letters,
//! digits, `-`, `_` and `.`.
//!
//! ```text
//! $SERVICE_BINDING_ROOT
//! ├── account-database
//! │   ├── type
//! │   ├── provider
//! │   ├── uri
//! │   ├── username
//! │   └── password
//! └── transaction-event-stream
//!     ├── type
//!     ├── connection-count
//!     ├── uri
//!     ├── certificates
//!     └── private-key
//! ```
//!
//! [Kubernetes Secret key]: https://kubernetes.io/docs/concepts/configuration/secret/#overview-of-secrets

use std::fmt;
use std::ops::Deref;
use std::str::FromStr;

/// The key for the provider of a binding.
pub const PROVIDER: &str = "provider";

/// The key for the type of a binding.
pub const TYPE: &str = "type";

/// The environment variable naming the directory bindings are projected under.
pub const SERVICE_BINDING_ROOT: &str = "SERVICE_BINDING_ROOT";

/// Tests whether a string is a valid Kubernetes Secret key.
///
/// A valid key is non-empty and contains only ASCII letters, digits, `-`, `_`
/// and `.`.
///
/// # Example
///
/// ```
/// use service_bindings_core::is_valid_secret_key;
///
/// assert!(is_valid_secret_key("username"));
/// assert!(is_valid_secret_key(".hidden-key_1"));
/// assert!(!is_valid_secret_key("test^key"));
/// assert!(!is_valid_secret_key(""));
/// ```
pub fn is_valid_secret_key(key: &str) -> bool {
    !key.is_empty() && key.chars().all(is_valid_key_character)
}

fn is_valid_key_character(c: char) -> bool {
    c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.')
}

fn first_invalid_character(key: &str) -> Option<char> {
    key.chars().find(|&c| !is_valid_key_character(c))
}

/// A binding entry key that is known to satisfy [`is_valid_secret_key`].
///
/// Bindings accept plain `&str` keys and report invalid ones as absent. This
/// type is for callers that want to reject a malformed key up front instead,
/// e.g. when the key comes from user input.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SecretKey(String);

impl SecretKey {
    /// Returns the key as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consumes the key, returning the underlying string.
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl TryFrom<&str> for SecretKey {
    type Error = KeyError;

    fn try_from(key: &str) -> Result<Self, Self::Error> {
        if key.is_empty() {
            return Err(KeyError::Empty);
        }

        if let Some(character) = first_invalid_character(key) {
            return Err(KeyError::InvalidCharacter {
                key: key.to_string(),
                character,
            });
        }

        Ok(SecretKey(key.to_string()))
    }
}

impl TryFrom<String> for SecretKey {
    type Error = KeyError;

    fn try_from(key: String) -> Result<Self, Self::Error> {
        Self::try_from(key.as_str())
    }
}

impl FromStr for SecretKey {
    type Err = KeyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::try_from(s)
    }
}

impl Deref for SecretKey {
    type Target = str;

    fn deref(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for SecretKey {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SecretKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Errors returned when a string is not a valid [`SecretKey`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeyError {
    /// The key was the empty string
    Empty,
    /// The key contained a character outside `[A-Za-z0-9-_.]`
    InvalidCharacter { key: String, character: char },
}

impl fmt::Display for KeyError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            KeyError::Empty => write!(f, "key cannot be empty"),
            KeyError::InvalidCharacter { key, character } => write!(
                f,
                "invalid key '{}': character '{}' is not allowed (expected [A-Za-z0-9-_.])",
                key, character
            ),
        }
    }
}

impl std::error::Error for KeyError {}
