//! Typed ID wrappers for domain entities.

use crate::{KedaiError, KedaiResult};
use serde::{Deserialize, Serialize};
use std::fmt::{self, Display};

/// A strongly-typed wrapper for product IDs.
///
/// Product ids are caller-chosen strings such as `"P-001"`. They end up
/// inside Redis keys, so blank ids and ids containing whitespace are rejected.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProductId(String);

impl ProductId {
    /// Creates a product ID, validating its format.
    pub fn new(id: impl Into<String>) -> KedaiResult<Self> {
        let id = id.into();
        if id.trim().is_empty() {
            return Err(KedaiError::validation("Product id must not be blank"));
        }
        if id.chars().any(char::is_whitespace) {
            return Err(KedaiError::validation(format!(
                "Product id '{}' must not contain whitespace",
                id
            )));
        }
        Ok(Self(id))
    }

    /// Creates a product ID without validation.
    ///
    /// Used when reading ids back from storage.
    #[must_use]
    pub fn new_unchecked(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Returns the ID as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns the inner string.
    #[must_use]
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl Display for ProductId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl AsRef<str> for ProductId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl TryFrom<&str> for ProductId {
    type Error = KedaiError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}
