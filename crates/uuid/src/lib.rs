//! Storage key utilities.
//!
//! Every uploaded blob is named after a freshly generated storage key, and the same key becomes
//! the identifier of its metadata record. Keys are random, never derived from content.
//!
//! ## Canonical key form
//! - Length: 36
//! - Layout: `8-4-4-4-12` lowercase hexadecimal groups separated by hyphens
//! - Example: `550e8400-e29b-41d4-a716-446655440000`
//!
//! This is the standard textual rendering of a UUID, i.e. what `Uuid::new_v4().to_string()`
//! yields. Identifiers supplied by callers must already be canonical; [`StorageKey::parse`]
//! rejects uppercase, braced, URN or simple (hyphen-less) forms, and anything path-like.
//!
//! ## Generation
//! Key generation sits behind the [`KeyGenerator`] trait so that the storage coordinator can be
//! driven with deterministic keys in tests:
//! - [`RandomKeyGenerator`]: UUID v4 from the OS RNG (production)
//! - [`SequentialKeyGenerator`]: monotonically increasing keys (tests, fixtures)

mod generator;
mod key;

pub use generator::{KeyGenerator, RandomKeyGenerator, SequentialKeyGenerator};
pub use key::StorageKey;

/// Error type for storage key operations.
#[derive(Debug, thiserror::Error)]
pub enum UuidError {
    /// Invalid input provided
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

/// Result type for storage key operations.
pub type UuidResult<T> = Result<T, UuidError>;
