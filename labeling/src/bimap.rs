//! Bijection between label values and dense label ids.

use hashbrown::HashMap;
use parking_lot::RwLock;

use common::index_type;

use crate::Label;

index_type!(LabelId);

#[derive(Debug)]
struct BimapTables<L> {
    ids: HashMap<L, LabelId>,
    labels: Vec<L>,
}

/// Append-only mapping `label <-> id`.
///
/// Ids are handed out sequentially from zero and never reused. Lookups take a
/// shared lock; only the allocation of a new id takes the exclusive one.
#[derive(Debug)]
pub struct LabelIdBimap<L> {
    tables: RwLock<BimapTables<L>>,
}

impl<L: Label> Default for LabelIdBimap<L> {
    fn default() -> Self {
        Self::new()
    }
}

impl<L: Label> LabelIdBimap<L> {
    pub fn new() -> Self {
        Self {
            tables: RwLock::new(BimapTables {
                ids: HashMap::new(),
                labels: Vec::new(),
            }),
        }
    }

    /// Returns the id of `label`, allocating the next sequential id on first use.
    pub fn get_id(&self, label: &L) -> LabelId {
        if let Some(id) = self.try_get_id(label) {
            return id;
        }

        let mut tables = self.tables.write();
        // another writer may have allocated it between the two locks
        if let Some(&id) = tables.ids.get(label) {
            return id;
        }

        let id = LabelId::from_usize(tables.labels.len());
        tables.labels.push(label.clone());
        tables.ids.insert(label.clone(), id);
        tracing::trace!(?label, %id, "allocated label id");

        id
    }

    pub fn try_get_id(&self, label: &L) -> Option<LabelId> {
        self.tables.read().ids.get(label).copied()
    }

    pub fn get_label(&self, id: LabelId) -> Option<L> {
        self.tables.read().labels.get(id.as_usize()).cloned()
    }

    pub fn len(&self) -> usize {
        self.tables.read().labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Snapshot of all labels, ordered by id.
    pub fn labels(&self) -> Vec<L> {
        self.tables.read().labels.clone()
    }

    /// Resolves every id in `ids` under a single lock.
    pub(crate) fn labels_for(&self, ids: &[LabelId]) -> Vec<L> {
        let tables = self.tables.read();
        ids.iter()
            .map(|id| tables.labels[id.as_usize()].clone())
            .collect()
    }
}
