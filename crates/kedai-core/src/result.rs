//! Result type aliases for Kedai.

use crate::KedaiError;

/// A specialized `Result` type for Kedai operations.
pub type KedaiResult<T> = Result<T, KedaiError>;
