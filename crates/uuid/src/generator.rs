//! Storage key generators.

use crate::key::StorageKey;
use std::sync::atomic::{AtomicU64, Ordering};
use uuid::Uuid;

/// Source of fresh storage keys.
///
/// Implementations must never hand out the same key twice for the lifetime of a store.
pub trait KeyGenerator: Send + Sync {
    /// Produces the next storage key.
    fn generate(&self) -> StorageKey;
}

/// Random UUID v4 keys. The production generator.
#[derive(Clone, Copy, Debug, Default)]
pub struct RandomKeyGenerator;

impl KeyGenerator for RandomKeyGenerator {
    fn generate(&self) -> StorageKey {
        StorageKey::new()
    }
}

/// Deterministic keys counting up from a starting value.
///
/// The counter occupies the low 64 bits of the UUID, so the first key from
/// `SequentialKeyGenerator::new()` renders as `00000000-0000-0000-0000-000000000001`.
#[derive(Debug)]
pub struct SequentialKeyGenerator {
    high: u64,
    next: AtomicU64,
}

impl Default for SequentialKeyGenerator {
    fn default() -> Self {
        Self::new()
    }
}

impl SequentialKeyGenerator {
    /// Counts from 1 with zeroed high bits.
    pub fn new() -> Self {
        Self::with_prefix(0)
    }

    /// Counts from 1 with `high` in the upper 64 bits, keeping separate generators disjoint.
    pub fn with_prefix(high: u64) -> Self {
        Self {
            high,
            next: AtomicU64::new(1),
        }
    }
}

impl KeyGenerator for SequentialKeyGenerator {
    fn generate(&self) -> StorageKey {
        let low = self.next.fetch_add(1, Ordering::Relaxed);
        let value = (u128::from(self.high) << 64) | u128::from(low);
        StorageKey::from_uuid(Uuid::from_u128(value))
    }
}
