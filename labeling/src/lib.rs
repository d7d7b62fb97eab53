//! Label-set interning and compact per-label spatial index.
//!
//! A [`LabelDictionary`] maps every distinct set of labels to a small
//! canonical index so that a labeled grid only has to store one integer per
//! point. A [`Fragment`] records the points carrying one label as a
//! run-length stream which a [`RunCursor`] replays without rescanning the
//! grid.

use std::fmt::Debug;
use std::hash::Hash;

pub mod bimap;
pub mod config;
pub mod dictionary;
pub mod error;
pub mod fragment;
pub mod index_grid;
pub mod label_grid;
pub mod run_code;
pub mod sorted_set;
pub mod transition_cache;

pub use bimap::{LabelId, LabelIdBimap};
pub use config::{IndexWidth, LabelingConfig};
pub use dictionary::{InternedLabelSet, LabelDictionary};
pub use error::{LabelingError, LabelingResult};
pub use fragment::{BoundingBox, Fragment, FragmentAggregate};
pub use index_grid::IndexGrid;
pub use label_grid::LabelGrid;
pub use run_code::{RunCursor, RunEncoder};
pub use sorted_set::SortedValueSet;
pub use transition_cache::TransitionCache;

/// Values usable as labels.
pub trait Label: Clone + Eq + Hash + Debug {}

impl<T: Clone + Eq + Hash + Debug> Label for T {}
