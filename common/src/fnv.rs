//! Deterministic FNV-1a hasher.
//!
//! `DefaultHasher` uses random seeds, producing different hashes across process
//! invocations. FNV-1a is deterministic and fast for short keys such as the
//! small integer tuples hashed by label dictionaries and transition caches.

use std::hash::{Hash, Hasher};

const FNV_OFFSET_BASIS: u64 = 0xcbf29ce484222325;
const FNV_PRIME: u64 = 0x100000001b3;

/// FNV-1a 64-bit hasher with fixed seed.
#[derive(Debug, Clone, Copy)]
pub struct FnvHasher(u64);

impl FnvHasher {
    pub fn new() -> Self {
        Self(FNV_OFFSET_BASIS)
    }
}

impl Default for FnvHasher {
    fn default() -> Self {
        Self::new()
    }
}

impl Hasher for FnvHasher {
    fn finish(&self) -> u64 {
        self.0
    }

    fn write(&mut self, bytes: &[u8]) {
        for &b in bytes {
            self.0 ^= b as u64;
            self.0 = self.0.wrapping_mul(FNV_PRIME);
        }
    }
}

/// Hashes a single value with a fresh [`FnvHasher`].
pub fn fnv_hash<T: Hash + ?Sized>(value: &T) -> u64 {
    let mut hasher = FnvHasher::new();
    value.hash(&mut hasher);
    hasher.finish()
}
