//! User identifiers issued by the upstream auth service.

use serde::{Deserialize, Serialize};

/// Opaque user identifier.
///
/// The upstream auth service owns user records, so the ID is kept as the
/// string it hands out. An empty ID is representable because the upstream
/// can return one; callers that gate on identity must check [`UserId::is_empty`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(String);

impl UserId {
    /// Create a new ID from any string-like value.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Get the underlying string.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether the ID is empty or whitespace only.
    ///
    /// A whitespace-only ID counts as empty, so the access gate treats its
    /// holder as anonymous and skips the purchase lookup. Sending it upstream
    /// could not grant access anyway, so both paths end in a denial.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.trim().is_empty()
    }
}

impl ::core::fmt::Display for UserId {
    fn fmt(&self, f: &mut ::core::fmt::Formatter<'_>) -> ::core::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<String> for UserId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl From<&str> for UserId {
    fn from(id: &str) -> Self {
        Self(id.to_owned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_ids() {
        assert!(UserId::new("").is_empty());
        assert!(UserId::new("   ").is_empty());
        assert!(!UserId::new("u_123").is_empty());
    }

    #[test]
    fn test_display_is_raw_value() {
        let id = UserId::from("7f9c2b0e-4d1a-4e55-9a7e-3c2d1b0a9f88");
        assert_eq!(id.to_string(), "7f9c2b0e-4d1a-4e55-9a7e-3c2d1b0a9f88");
    }
}
