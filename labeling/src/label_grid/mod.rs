//! Labeled N-dimensional grid.


use std::sync::Arc;

use crate::config::LabelingConfig;
use crate::dictionary::LabelDictionary;
use crate::error::{LabelingError, LabelingResult};
use crate::fragment::{Fragment, FragmentAggregate};
use crate::index_grid::IndexGrid;
use crate::transition_cache::TransitionCache;
use crate::Label;

/// Grid storing one canonical label set index per point.
///
/// Label edits go through a private [`TransitionCache`]; fragment queries scan
/// the grid once and run-code the points of every requested label.
///
/// The grid remembers the dictionary generation its indices were written
/// against. Once the shared dictionary is cleared or replaced elsewhere, every
/// dictionary-backed operation returns [`LabelingError::StaleGrid`] until
/// [`reset`](Self::reset) or [`clear`](Self::clear) is called.
#[derive(Debug)]
pub struct LabelGrid<L> {
    grid: IndexGrid,
    dictionary: Arc<LabelDictionary<L>>,
    cache: TransitionCache<L>,
    generation: u64,
}

impl<L: Label> LabelGrid<L> {
    pub fn new(dims: &[usize]) -> Self {
        Self::with_config(dims, LabelingConfig::default())
    }

    pub fn with_config(dims: &[usize], config: LabelingConfig) -> Self {
        Self::with_dictionary(dims, Arc::new(LabelDictionary::with_config(config)))
    }

    /// Uses an existing dictionary, e.g. one restored with
    /// [`LabelDictionary::bulk_replace`]. Every point starts at index `0`.
    pub fn with_dictionary(dims: &[usize], dictionary: Arc<LabelDictionary<L>>) -> Self {
        let cache = dictionary.transition_cache();
        let generation = dictionary.generation();
        Self {
            grid: IndexGrid::new(dims),
            dictionary,
            cache,
            generation,
        }
    }

    #[inline]
    pub fn dictionary(&self) -> &Arc<LabelDictionary<L>> {
        &self.dictionary
    }

    #[inline]
    pub fn grid(&self) -> &IndexGrid {
        &self.grid
    }

    #[inline]
    pub fn cache(&self) -> &TransitionCache<L> {
        &self.cache
    }

    #[inline]
    pub fn dims(&self) -> &[usize] {
        self.grid.dims()
    }

    #[inline]
    pub fn num_dims(&self) -> usize {
        self.grid.num_dims()
    }

    /// Whether the dictionary was cleared or replaced since the grid's
    /// indices were written.
    #[inline]
    pub fn is_stale(&self) -> bool {
        self.generation != self.dictionary.generation()
    }

    fn check_fresh(&self) -> LabelingResult<()> {
        let dictionary_generation = self.dictionary.generation();
        if self.generation != dictionary_generation {
            tracing::warn!(
                grid_generation = self.generation,
                dictionary_generation,
                "label grid outlived a dictionary reset"
            );
            return Err(LabelingError::StaleGrid {
                grid_generation: self.generation,
                dictionary_generation,
            });
        }
        Ok(())
    }

    #[inline]
    pub fn index_at(&self, position: &[usize]) -> u32 {
        self.grid.get(position)
    }

    /// Stores a raw index; it must already be interned in the dictionary.
    pub fn set_index_at(&mut self, position: &[usize], index: u32) -> LabelingResult<()> {
        self.check_fresh()?;

        let num_sets = self.dictionary.num_sets();
        if index as usize >= num_sets {
            return Err(LabelingError::UnknownIndex { index, num_sets });
        }
        self.grid.set(position, index);
        Ok(())
    }

    pub fn labels_at(&self, position: &[usize]) -> LabelingResult<Vec<L>> {
        self.check_fresh()?;

        let index = self.index_at(position);
        self.dictionary
            .label_sets_at(index)
            .ok_or_else(|| LabelingError::UnknownIndex {
                index,
                num_sets: self.dictionary.num_sets(),
            })
    }

    pub fn add_label(&mut self, position: &[usize], label: &L) -> LabelingResult<()> {
        self.check_fresh()?;

        let index = self.grid.get(position);
        let next = self.cache.add_label_at(&self.dictionary, label, index)?;
        self.store(position, next)
    }

    pub fn remove_label(&mut self, position: &[usize], label: &L) -> LabelingResult<()> {
        self.check_fresh()?;

        let index = self.grid.get(position);
        let next = self.cache.remove_label_at(&self.dictionary, label, index)?;
        self.store(position, next)
    }

    // a reset racing the transition leaves `next` meaningless
    fn store(&mut self, position: &[usize], next: u32) -> LabelingResult<()> {
        self.check_fresh()?;
        self.grid.set(position, next);
        Ok(())
    }

    /// Resets every point to the empty set and clears the dictionary.
    pub fn clear(&mut self) {
        self.dictionary.clear();
        self.reset();
    }

    /// Resets every point to the empty set and adopts the dictionary's
    /// current generation, leaving the dictionary itself untouched.
    pub fn reset(&mut self) {
        self.grid.fill(0);
        self.generation = self.dictionary.generation();
    }

    pub fn fragment(&self, label: &L) -> LabelingResult<Fragment> {
        let mut fragments = self.fragments(std::slice::from_ref(label))?;
        Ok(fragments.swap_remove(0))
    }

    /// Scans the grid once and returns one fragment per label, in input order.
    ///
    /// Labels the dictionary has never seen yield empty fragments.
    pub fn fragments(&self, labels: &[L]) -> LabelingResult<Vec<Fragment>> {
        self.check_fresh()?;

        let ids: Vec<_> = labels
            .iter()
            .map(|label| self.dictionary.label_id(label))
            .collect();

        // for every canonical index, the positions in `labels` it carries
        let members: Vec<Vec<usize>> = (0..self.dictionary.num_sets() as u32)
            .map(|index| match self.dictionary.interned_at(index) {
                Some(interned) => ids
                    .iter()
                    .enumerate()
                    .filter(|(_, id)| id.is_some_and(|id| interned.contains_id(id)))
                    .map(|(k, _)| k)
                    .collect(),
                None => Vec::new(),
            })
            .collect();

        let origin = vec![0; self.num_dims()];
        let mut aggregates: Vec<FragmentAggregate> = labels
            .iter()
            .map(|_| FragmentAggregate::new(&origin))
            .collect();

        let mut unknown = None;
        self.grid.for_each_point(|position, index| match members.get(index as usize) {
            Some(member_of) => {
                for &k in member_of {
                    aggregates[k].add(position);
                }
            }
            None => {
                unknown.get_or_insert(index);
            }
        });

        // a reset during the scan invalidates what was read
        self.check_fresh()?;
        if let Some(index) = unknown {
            return Err(LabelingError::UnknownIndex {
                index,
                num_sets: members.len(),
            });
        }

        tracing::debug!(
            num_labels = labels.len(),
            num_points = self.grid.len(),
            "scanned label grid"
        );

        Ok(aggregates
            .into_iter()
            .map(FragmentAggregate::done)
            .collect())
    }

    /// Points whose label set is exactly the one stored at `index`.
    pub fn fragment_for_index(&self, index: u32) -> Fragment {
        let mut aggregate = FragmentAggregate::new(&vec![0; self.num_dims()]);
        self.grid.for_each_point(|position, point_index| {
            if point_index == index {
                aggregate.add(position);
            }
        });
        aggregate.done()
    }
}
