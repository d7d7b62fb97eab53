use thiserror::Error;

use crate::config::IndexWidth;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum LabelingError {
    #[error("Index width {width:?} cannot address more than {max_sets} label sets")]
    IndexWidthExceeded { width: IndexWidth, max_sets: u64 },
    #[error("Label set list is empty")]
    EmptyLabelSetList,
    #[error("First label set must be empty")]
    FirstLabelSetNotEmpty,
    #[error("Label sets at positions {first} and {second} are equal")]
    DuplicateLabelSet { first: usize, second: usize },
    #[error("Index {index} is not interned (dictionary holds {num_sets} sets)")]
    UnknownIndex { index: u32, num_sets: usize },
    #[error(
        "Grid indices refer to dictionary generation {grid_generation}, \
         dictionary is at {dictionary_generation}"
    )]
    StaleGrid {
        grid_generation: u64,
        dictionary_generation: u64,
    },
}

pub type LabelingResult<T> = std::result::Result<T, LabelingError>;
