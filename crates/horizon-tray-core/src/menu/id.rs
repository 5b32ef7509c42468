//! Identifiers for menu nodes and tray entries.

use std::borrow::Borrow;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

/// Global counter for generated identifiers.
static NEXT_AUTO_ID: AtomicU64 = AtomicU64::new(1);

fn next_auto_id(prefix: &str) -> String {
    format!("{prefix}-{}", NEXT_AUTO_ID.fetch_add(1, Ordering::Relaxed))
}

/// An opaque identifier for a menu node.
///
/// Unique within one menu tree. Builders generate one (`auto-<n>`) when the
/// caller does not supply it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MenuId(String);

impl MenuId {
    /// Create an identifier from a caller-supplied string.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Generate a fresh identifier.
    pub(crate) fn generate() -> Self {
        Self(next_auto_id("auto"))
    }

    /// Get the identifier as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consume the identifier, returning the inner string.
    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for MenuId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for MenuId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl From<String> for MenuId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl AsRef<str> for MenuId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Borrow<str> for MenuId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl PartialEq<str> for MenuId {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

impl PartialEq<&str> for MenuId {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}

/// An opaque identifier for one tray entry.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TrayId(String);

impl TrayId {
    /// Create an identifier from a caller-supplied string.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Generate a fresh identifier.
    pub(crate) fn generate() -> Self {
        Self(next_auto_id("tray"))
    }

    /// Get the identifier as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TrayId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl Borrow<str> for TrayId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl From<&str> for TrayId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl From<String> for TrayId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generated_ids_are_unique() {
        let a = MenuId::generate();
        let b = MenuId::generate();
        assert_ne!(a, b);
        assert!(a.as_str().starts_with("auto-"));
        assert!(TrayId::generate().as_str().starts_with("tray-"));
    }

    #[test]
    fn test_comparisons_with_str() {
        let id = MenuId::from("quit");
        assert_eq!(id, "quit");
        assert_eq!(id.to_string(), "quit");
        assert_eq!(id.into_string(), "quit");
    }
}
