//! Canonical interning of label sets.
//!
//! Every distinct label set stored in a grid is represented by exactly one
//! [`InternedLabelSet`], addressed by a dense index. Index `0` is always the
//! empty set.


use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use hashbrown::HashMap;
use parking_lot::RwLock;

use crate::bimap::{LabelId, LabelIdBimap};
use crate::config::{IndexWidth, LabelingConfig};
use crate::error::{LabelingError, LabelingResult};
use crate::sorted_set::SortedValueSet;
use crate::transition_cache::TransitionCache;
use crate::Label;

static NEXT_DICTIONARY_ID: AtomicU64 = AtomicU64::new(1);

/// Canonical representative of one label set.
///
/// Holds only ids; resolve them through the owning [`LabelDictionary`]
/// (see [`LabelDictionary::labels_of`]).
#[derive(Debug, PartialEq, Eq)]
pub struct InternedLabelSet {
    set: SortedValueSet,
    index: u32,
}

impl InternedLabelSet {
    /// Position of this set in the dictionary's index table.
    #[inline]
    pub fn index(&self) -> u32 {
        self.index
    }

    #[inline]
    pub fn set(&self) -> &SortedValueSet {
        &self.set
    }

    #[inline]
    pub fn contains_id(&self, id: LabelId) -> bool {
        self.set.contains(id)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.set.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.set.is_empty()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Transition {
    Add,
    Remove,
}

impl Transition {
    fn apply(self, set: &SortedValueSet, id: LabelId) -> SortedValueSet {
        match self {
            Transition::Add => set.with_added(id),
            Transition::Remove => set.with_removed(id),
        }
    }
}

#[derive(Debug)]
struct SetTables {
    by_index: Vec<Arc<InternedLabelSet>>,
    by_content: HashMap<SortedValueSet, Arc<InternedLabelSet>>,
}

impl SetTables {
    fn new() -> Self {
        let mut tables = Self {
            by_index: Vec::new(),
            by_content: HashMap::new(),
        };
        tables.reset();
        tables
    }

    fn reset(&mut self) {
        self.by_index.clear();
        self.by_content.clear();

        let empty = Arc::new(InternedLabelSet {
            set: SortedValueSet::empty(),
            index: 0,
        });
        self.by_content.insert(empty.set.clone(), Arc::clone(&empty));
        self.by_index.push(empty);
    }

    fn get(&self, index: u32) -> LabelingResult<&Arc<InternedLabelSet>> {
        self.by_index
            .get(index as usize)
            .ok_or(LabelingError::UnknownIndex {
                index,
                num_sets: self.by_index.len(),
            })
    }

    fn intern(
        &mut self,
        set: SortedValueSet,
        width: IndexWidth,
    ) -> LabelingResult<Arc<InternedLabelSet>> {
        if let Some(existing) = self.by_content.get(&set) {
            return Ok(Arc::clone(existing));
        }

        let index = self.by_index.len();
        if index as u64 >= width.max_sets() {
            tracing::error!(
                ?width,
                num_sets = index,
                "label set index space exhausted"
            );
            return Err(LabelingError::IndexWidthExceeded {
                width,
                max_sets: width.max_sets(),
            });
        }

        let interned = Arc::new(InternedLabelSet {
            set,
            index: index as u32,
        });
        self.by_content
            .insert(interned.set.clone(), Arc::clone(&interned));
        self.by_index.push(Arc::clone(&interned));
        tracing::trace!(index, len = interned.len(), "interned label set");

        Ok(interned)
    }
}

/// Interning table from label sets to dense canonical indices.
///
/// All methods take `&self`: lookups share a read lock and only the creation
/// of a new entry (or a structural reset) takes the write lock, so one
/// dictionary can be queried from several threads, each through its own
/// [`TransitionCache`].
///
/// Every structural mutation ([`clear`](Self::clear),
/// [`bulk_replace`](Self::bulk_replace)) bumps [`generation`](Self::generation);
/// transition caches compare it on every lookup and drop their slots when it
/// moved.
#[derive(Debug)]
pub struct LabelDictionary<L> {
    id: u64,
    config: LabelingConfig,
    bimap: LabelIdBimap<L>,
    tables: RwLock<SetTables>,
    generation: AtomicU64,
}

impl<L: Label> Default for LabelDictionary<L> {
    fn default() -> Self {
        Self::new()
    }
}

impl<L: Label> LabelDictionary<L> {
    pub fn new() -> Self {
        Self::with_config(LabelingConfig::default())
    }

    pub fn with_config(config: LabelingConfig) -> Self {
        config.validate();

        Self {
            id: NEXT_DICTIONARY_ID.fetch_add(1, Ordering::Relaxed),
            config,
            bimap: LabelIdBimap::new(),
            tables: RwLock::new(SetTables::new()),
            generation: AtomicU64::new(0),
        }
    }

    #[inline]
    pub fn config(&self) -> &LabelingConfig {
        &self.config
    }

    #[inline]
    pub fn bimap(&self) -> &LabelIdBimap<L> {
        &self.bimap
    }

    /// Id of an already known label; never allocates.
    pub fn label_id(&self, label: &L) -> Option<LabelId> {
        self.bimap.try_get_id(label)
    }

    /// Counter bumped by every structural mutation.
    #[inline]
    pub fn generation(&self) -> u64 {
        self.generation.load(Ordering::Acquire)
    }

    #[inline]
    pub(crate) fn id(&self) -> u64 {
        self.id
    }

    /// Creates a transition cache bound to this dictionary.
    pub fn transition_cache(&self) -> TransitionCache<L> {
        TransitionCache::for_dictionary(self)
    }

    /// Returns the canonical entry for `set`, creating it on first sight.
    ///
    /// Structurally equal inputs always yield the same `Arc`.
    pub fn intern(&self, set: SortedValueSet) -> LabelingResult<Arc<InternedLabelSet>> {
        if let Some(existing) = self.tables.read().by_content.get(&set) {
            return Ok(Arc::clone(existing));
        }

        self.tables.write().intern(set, self.config.index_width)
    }

    pub fn num_sets(&self) -> usize {
        self.tables.read().by_index.len()
    }

    pub fn interned_at(&self, index: u32) -> Option<Arc<InternedLabelSet>> {
        self.tables.read().by_index.get(index as usize).cloned()
    }

    /// Labels of an interned set, in label-id order.
    pub fn labels_of(&self, interned: &InternedLabelSet) -> Vec<L> {
        self.bimap.labels_for(interned.set.as_slice())
    }

    pub fn contains_label(&self, interned: &InternedLabelSet, label: &L) -> bool {
        self.bimap
            .try_get_id(label)
            .is_some_and(|id| interned.contains_id(id))
    }

    /// Labels of the set stored at `index`, in label-id order.
    pub fn label_sets_at(&self, index: u32) -> Option<Vec<L>> {
        let interned = self.interned_at(index)?;
        Some(self.labels_of(&interned))
    }

    /// Snapshot of every interned set, ordered by index.
    pub fn all_label_sets(&self) -> Vec<Vec<L>> {
        let tables = self.tables.read();
        tables
            .by_index
            .iter()
            .map(|interned| self.bimap.labels_for(interned.set.as_slice()))
            .collect()
    }

    /// Index of the set `labels_at(index) + {label}`.
    pub fn add_label_at(&self, label: &L, index: u32) -> LabelingResult<u32> {
        let id = self.bimap.get_id(label);
        self.transition(Transition::Add, id, index)
    }

    /// Index of the set `labels_at(index) - {label}`.
    pub fn remove_label_at(&self, label: &L, index: u32) -> LabelingResult<u32> {
        match self.bimap.try_get_id(label) {
            Some(id) => self.transition(Transition::Remove, id, index),
            None => {
                // a label without id cannot be in any set
                self.tables.read().get(index)?;
                Ok(index)
            }
        }
    }

    pub(crate) fn apply(
        &self,
        transition: Transition,
        label: &L,
        index: u32,
    ) -> LabelingResult<u32> {
        match transition {
            Transition::Add => self.add_label_at(label, index),
            Transition::Remove => self.remove_label_at(label, index),
        }
    }

    fn transition(
        &self,
        transition: Transition,
        id: LabelId,
        index: u32,
    ) -> LabelingResult<u32> {
        let next = {
            let tables = self.tables.read();
            let current = tables.get(index)?;
            let next = transition.apply(&current.set, id);
            if next.ptr_eq(&current.set) {
                return Ok(index);
            }
            if let Some(existing) = tables.by_content.get(&next) {
                return Ok(existing.index);
            }
            next
        };

        let interned = self
            .tables
            .write()
            .intern(next, self.config.index_width)?;
        Ok(interned.index)
    }

    /// Resets the dictionary to the single empty set at index `0`.
    ///
    /// Label ids stay allocated.
    pub fn clear(&self) {
        let mut tables = self.tables.write();
        self.generation.fetch_add(1, Ordering::AcqRel);
        tables.reset();
        tracing::debug!(dictionary = self.id, "label dictionary cleared");
    }

    /// Replaces all interned sets; entry `i` of `label_sets` receives index `i`.
    ///
    /// The list must be non-empty, start with the empty set and hold no two
    /// equal sets. A rejected list leaves the dictionary untouched, including
    /// the label ids.
    pub fn bulk_replace(&self, label_sets: &[Vec<L>]) -> LabelingResult<()> {
        validate_label_sets(label_sets, self.config.index_width)?;

        let mut tables = self.tables.write();
        self.generation.fetch_add(1, Ordering::AcqRel);
        tables.reset();

        for (expected_index, labels) in label_sets.iter().enumerate().skip(1) {
            let set =
                SortedValueSet::from_values(labels.iter().map(|label| self.bimap.get_id(label)));
            let interned = tables.intern(set, self.config.index_width)?;
            debug_assert_eq!(interned.index as usize, expected_index);
        }

        tracing::debug!(
            dictionary = self.id,
            num_sets = tables.by_index.len(),
            "label dictionary replaced"
        );

        Ok(())
    }
}

/// Checks a bulk replacement list without touching any dictionary state.
///
/// Labels get provisional local ids so sets can be compared by content; the
/// outcome does not depend on which ids the dictionary later assigns.
fn validate_label_sets<L: Label>(
    label_sets: &[Vec<L>],
    width: IndexWidth,
) -> LabelingResult<()> {
    let first = label_sets.first().ok_or(LabelingError::EmptyLabelSetList)?;
    if !first.is_empty() {
        return Err(LabelingError::FirstLabelSetNotEmpty);
    }
    if label_sets.len() as u64 > width.max_sets() {
        return Err(LabelingError::IndexWidthExceeded {
            width,
            max_sets: width.max_sets(),
        });
    }

    let mut local_ids: HashMap<&L, u32> = HashMap::new();
    let mut seen: HashMap<Vec<u32>, usize> = HashMap::with_capacity(label_sets.len());

    for (position, labels) in label_sets.iter().enumerate() {
        let mut key: Vec<u32> = labels
            .iter()
            .map(|label| {
                let next = local_ids.len() as u32;
                *local_ids.entry(label).or_insert(next)
            })
            .collect();
        key.sort_unstable();
        key.dedup();

        if let Some(first) = seen.insert(key, position) {
            return Err(LabelingError::DuplicateLabelSet {
                first,
                second: position,
            });
        }
    }

    Ok(())
}
