//! The [`StorageKey`] wrapper type.

use crate::{UuidError, UuidResult};
use std::fmt;
use uuid::Uuid;

/// Length of the canonical hyphenated rendering.
const CANONICAL_LEN: usize = 36;

/// Byte offsets of the hyphens in the canonical rendering.
const HYPHEN_POSITIONS: [usize; 4] = [8, 13, 18, 23];

/// A blob storage key in canonical form (hyphenated, lowercase).
///
/// Once constructed the contained UUID is guaranteed to render canonically, which keeps blob
/// filenames and record identifiers byte-for-byte identical.
///
/// # Construction
/// - [`StorageKey::new`] draws a fresh random (v4) key.
/// - [`StorageKey::parse`] validates an identifier supplied by a caller before it is turned
///   into a blob path.
/// - [`StorageKey::from_uuid`] wraps an existing UUID (used by deterministic generators).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct StorageKey(Uuid);

impl StorageKey {
    /// Generates a new random storage key (RFC 4122 version 4).
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Wraps an existing UUID.
    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Validates and parses a key that must already be in canonical form.
    ///
    /// # Errors
    ///
    /// Returns [`UuidError::InvalidInput`] if `input` is not canonical.
    pub fn parse(input: &str) -> UuidResult<Self> {
        if !Self::is_canonical(input) {
            return Err(UuidError::InvalidInput(format!(
                "storage key must be a lowercase hyphenated UUID, got: '{}'",
                input
            )));
        }
        Uuid::parse_str(input)
            .map(Self)
            .map_err(|e| UuidError::InvalidInput(format!("{}: {}", input, e)))
    }

    /// Returns true if `input` is a canonical storage key.
    ///
    /// Purely syntactic: 36 bytes, hyphens at the four group boundaries, lowercase hex elsewhere.
    pub fn is_canonical(input: &str) -> bool {
        input.len() == CANONICAL_LEN
            && input.bytes().enumerate().all(|(i, b)| {
                if HYPHEN_POSITIONS.contains(&i) {
                    b == b'-'
                } else {
                    matches!(b, b'0'..=b'9' | b'a'..=b'f')
                }
            })
    }
}

impl fmt::Display for StorageKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.hyphenated())
    }
}
