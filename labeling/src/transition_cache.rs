//! Per-consumer memo of label add/remove transitions.

use common::fnv::fnv_hash;

use crate::dictionary::{LabelDictionary, Transition};
use crate::error::LabelingResult;
use crate::Label;

#[derive(Debug, Clone)]
struct CacheSlot<L> {
    from: u32,
    label: L,
    to: u32,
}

/// Direct-mapped cache of `(index, label) -> index` for one dictionary.
///
/// Each direction has a fixed number of single-entry buckets; colliding keys
/// evict each other. A cache belongs to one consumer and is not shared between
/// threads, while several caches may use the same dictionary concurrently.
///
/// The cache remembers the dictionary generation its slots were filled
/// against and empties itself on the first lookup after a structural change.
#[derive(Debug, Clone)]
pub struct TransitionCache<L> {
    dictionary_id: u64,
    generation: u64,
    add_slots: Box<[Option<CacheSlot<L>>]>,
    remove_slots: Box<[Option<CacheSlot<L>>]>,
    misses: u64,
}

impl<L: Label> TransitionCache<L> {
    pub(crate) fn for_dictionary(dictionary: &LabelDictionary<L>) -> Self {
        let capacity = dictionary.config().cache_slots;
        assert!(capacity > 0, "transition cache needs at least one slot");

        Self {
            dictionary_id: dictionary.id(),
            generation: dictionary.generation(),
            add_slots: vec![None; capacity].into_boxed_slice(),
            remove_slots: vec![None; capacity].into_boxed_slice(),
            misses: 0,
        }
    }

    /// Slots per direction.
    pub fn capacity(&self) -> usize {
        self.add_slots.len()
    }

    /// Number of lookups that had to ask the dictionary.
    pub fn miss_count(&self) -> u64 {
        self.misses
    }

    pub fn clear(&mut self) {
        self.add_slots.fill(None);
        self.remove_slots.fill(None);
    }

    pub fn add_label_at(
        &mut self,
        dictionary: &LabelDictionary<L>,
        label: &L,
        index: u32,
    ) -> LabelingResult<u32> {
        self.lookup(dictionary, Transition::Add, label, index)
    }

    pub fn remove_label_at(
        &mut self,
        dictionary: &LabelDictionary<L>,
        label: &L,
        index: u32,
    ) -> LabelingResult<u32> {
        self.lookup(dictionary, Transition::Remove, label, index)
    }

    fn lookup(
        &mut self,
        dictionary: &LabelDictionary<L>,
        transition: Transition,
        label: &L,
        index: u32,
    ) -> LabelingResult<u32> {
        assert_eq!(
            self.dictionary_id,
            dictionary.id(),
            "transition cache used with a foreign dictionary"
        );

        // read before resolving: a result computed while the generation moves
        // is stamped with the old one and dropped on the next lookup
        let generation = dictionary.generation();
        if generation != self.generation {
            self.clear();
            self.generation = generation;
        }

        let bucket = (fnv_hash(&(index, label)) % self.capacity() as u64) as usize;
        let slots = match transition {
            Transition::Add => &mut self.add_slots,
            Transition::Remove => &mut self.remove_slots,
        };

        if let Some(slot) = &slots[bucket] {
            if slot.from == index && slot.label == *label {
                return Ok(slot.to);
            }
        }

        self.misses += 1;
        let to = dictionary.apply(transition, label, index)?;
        slots[bucket] = Some(CacheSlot {
            from: index,
            label: label.clone(),
            to,
        });

        Ok(to)
    }
}
