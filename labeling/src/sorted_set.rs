//! Immutable sorted set of label ids.

use std::hash::{Hash, Hasher};
use std::sync::Arc;

use common::fnv::fnv_hash;

use crate::bimap::LabelId;

/// Sorted, duplicate-free, immutable sequence of label ids.
///
/// Cloning shares the backing storage. [`with_added`](Self::with_added) and
/// [`with_removed`](Self::with_removed) return a clone of `self` (same storage,
/// see [`ptr_eq`](Self::ptr_eq)) when the operation would not change the
/// content. The content hash is computed once at construction.
#[derive(Debug, Clone)]
pub struct SortedValueSet {
    values: Arc<[LabelId]>,
    hash: u64,
}

impl SortedValueSet {
    pub fn empty() -> Self {
        Self::from_sorted(Vec::new())
    }

    /// Builds a set from ids in any order; duplicates are dropped.
    pub fn from_values(values: impl IntoIterator<Item = LabelId>) -> Self {
        let mut values: Vec<LabelId> = values.into_iter().collect();
        values.sort_unstable();
        values.dedup();
        Self::from_sorted(values)
    }

    fn from_sorted(values: Vec<LabelId>) -> Self {
        debug_assert!(values.windows(2).all(|w| w[0] < w[1]));
        let hash = fnv_hash(values.as_slice());
        Self {
            values: values.into(),
            hash,
        }
    }

    #[inline]
    pub fn contains(&self, value: LabelId) -> bool {
        self.values.binary_search(&value).is_ok()
    }

    pub fn with_added(&self, value: LabelId) -> Self {
        match self.values.binary_search(&value) {
            Ok(_) => self.clone(),
            Err(pos) => {
                let mut values = Vec::with_capacity(self.values.len() + 1);
                values.extend_from_slice(&self.values[..pos]);
                values.push(value);
                values.extend_from_slice(&self.values[pos..]);
                Self::from_sorted(values)
            }
        }
    }

    pub fn with_removed(&self, value: LabelId) -> Self {
        match self.values.binary_search(&value) {
            Err(_) => self.clone(),
            Ok(pos) => {
                let mut values = Vec::with_capacity(self.values.len() - 1);
                values.extend_from_slice(&self.values[..pos]);
                values.extend_from_slice(&self.values[pos + 1..]);
                Self::from_sorted(values)
            }
        }
    }

    /// True when both sets share the same backing storage.
    #[inline]
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.values, &other.values)
    }

    #[inline]
    pub fn as_slice(&self) -> &[LabelId] {
        &self.values
    }

    pub fn iter(&self) -> impl Iterator<Item = LabelId> + '_ {
        self.values.iter().copied()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl Default for SortedValueSet {
    fn default() -> Self {
        Self::empty()
    }
}

impl PartialEq for SortedValueSet {
    fn eq(&self, other: &Self) -> bool {
        self.hash == other.hash && self.values == other.values
    }
}

impl Eq for SortedValueSet {}

impl Hash for SortedValueSet {
    fn hash<H: Hasher>(&self, state: &mut H) {
        state.write_u64(self.hash);
    }
}
