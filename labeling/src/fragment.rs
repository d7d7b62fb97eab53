//! Per-label point statistics and their run-coded member points.

use std::sync::Arc;

use crate::run_code::{RunCursor, RunEncoder};

/// Inclusive axis-aligned box.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoundingBox {
    min: Vec<i64>,
    max: Vec<i64>,
}

impl BoundingBox {
    pub fn new(min: Vec<i64>, max: Vec<i64>) -> Self {
        assert_eq!(min.len(), max.len(), "bounding box dimensionality mismatch");
        assert!(
            min.iter().zip(&max).all(|(lo, hi)| lo <= hi),
            "bounding box min {:?} exceeds max {:?}",
            min,
            max
        );
        Self { min, max }
    }

    #[inline]
    pub fn min(&self) -> &[i64] {
        &self.min
    }

    #[inline]
    pub fn max(&self) -> &[i64] {
        &self.max
    }

    #[inline]
    pub fn num_dims(&self) -> usize {
        self.min.len()
    }

    /// Number of grid positions along each dimension.
    pub fn extent(&self) -> Vec<u64> {
        self.min
            .iter()
            .zip(&self.max)
            .map(|(lo, hi)| (hi - lo) as u64 + 1)
            .collect()
    }

    pub fn contains(&self, position: &[i64]) -> bool {
        position.len() == self.num_dims()
            && position
                .iter()
                .zip(self.min.iter().zip(&self.max))
                .all(|(c, (lo, hi))| lo <= c && c <= hi)
    }

    pub fn translated(&self, delta: &[i64]) -> Self {
        assert_eq!(delta.len(), self.num_dims(), "offset dimensionality mismatch");
        Self {
            min: self.min.iter().zip(delta).map(|(c, d)| c + d).collect(),
            max: self.max.iter().zip(delta).map(|(c, d)| c + d).collect(),
        }
    }
}

/// Running statistics over the points of one label, collected during a scan.
///
/// Points are run-coded relative to the aggregate's origin, the lowest corner
/// of the scanned region, so any region can be encoded regardless of sign.
#[derive(Debug, Clone)]
pub struct FragmentAggregate {
    count: usize,
    origin: Vec<i64>,
    local: Vec<i64>,
    min: Vec<i64>,
    max: Vec<i64>,
    encoder: RunEncoder,
}

impl FragmentAggregate {
    pub fn new(origin: &[i64]) -> Self {
        let num_dims = origin.len();
        Self {
            count: 0,
            origin: origin.to_vec(),
            local: vec![0; num_dims],
            min: vec![i64::MAX; num_dims],
            max: vec![i64::MIN; num_dims],
            encoder: RunEncoder::new(num_dims),
        }
    }

    #[inline]
    pub fn origin(&self) -> &[i64] {
        &self.origin
    }

    /// Adds one member point; points must arrive in scan order and lie at or
    /// above the origin in every dimension.
    pub fn add(&mut self, position: &[i64]) {
        assert_eq!(
            position.len(),
            self.origin.len(),
            "position dimensionality mismatch"
        );
        for ((local, &c), &o) in self.local.iter_mut().zip(position).zip(&self.origin) {
            assert!(
                c >= o,
                "point {:?} lies below aggregate origin {:?}",
                position,
                self.origin
            );
            *local = c - o;
        }

        self.encoder.push(&self.local);
        self.count += 1;

        for ((lo, hi), &c) in self.min.iter_mut().zip(self.max.iter_mut()).zip(&self.local) {
            *lo = (*lo).min(c);
            *hi = (*hi).max(c);
        }
    }

    #[inline]
    pub fn point_count(&self) -> usize {
        self.count
    }

    /// Closes the open run and freezes the statistics.
    pub fn done(self) -> Fragment {
        let bounding_box = (self.count > 0).then(|| BoundingBox::new(self.min, self.max));

        Fragment {
            count: self.count,
            bounding_box,
            origin: self.origin,
            stream: self.encoder.finish().into(),
        }
    }
}

/// Immutable set of points sharing one label (or one canonical index).
///
/// The run stream is shared between clones and translated copies; moving a
/// fragment never re-encodes it.
#[derive(Debug, Clone)]
pub struct Fragment {
    count: usize,
    bounding_box: Option<BoundingBox>,
    origin: Vec<i64>,
    stream: Arc<[i64]>,
}

impl Fragment {
    /// Builds a fragment from points in any order; duplicates collapse.
    ///
    /// The origin is the per-dimension minimum over the points.
    pub fn from_points(num_dims: usize, points: impl IntoIterator<Item = Vec<i64>>) -> Self {
        let mut points: Vec<Vec<i64>> = points.into_iter().collect();
        assert!(
            points.iter().all(|p| p.len() == num_dims),
            "position dimensionality mismatch"
        );
        points.sort_unstable_by(|a, b| a.iter().rev().cmp(b.iter().rev()));
        points.dedup();

        let origin: Vec<i64> = (0..num_dims)
            .map(|d| points.iter().map(|p| p[d]).min().unwrap_or(0))
            .collect();
        let mut aggregate = FragmentAggregate::new(&origin);
        for point in &points {
            aggregate.add(point);
        }
        aggregate.done()
    }

    #[inline]
    pub fn point_count(&self) -> usize {
        self.count
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    #[inline]
    pub fn num_dims(&self) -> usize {
        self.origin.len()
    }

    /// Position that the stored run coordinates are relative to.
    #[inline]
    pub fn origin(&self) -> &[i64] {
        &self.origin
    }

    #[inline]
    pub fn stream(&self) -> &[i64] {
        &self.stream
    }

    /// Box around all member points, `None` for an empty fragment.
    pub fn bounding_box(&self) -> Option<BoundingBox> {
        self.bounding_box
            .as_ref()
            .map(|bbox| bbox.translated(&self.origin))
    }

    /// Replays the member points at the fragment's origin.
    pub fn cursor(&self) -> RunCursor<'_> {
        RunCursor::new(&self.stream, &self.origin)
    }

    /// Replays the member points shifted by `offset` from the origin.
    pub fn cursor_at(&self, offset: &[i64]) -> RunCursor<'_> {
        assert_eq!(offset.len(), self.num_dims(), "offset dimensionality mismatch");
        let shifted: Vec<i64> = self.origin.iter().zip(offset).map(|(o, d)| o + d).collect();
        RunCursor::new(&self.stream, &shifted)
    }

    pub fn translated(&self, delta: &[i64]) -> Self {
        assert_eq!(delta.len(), self.num_dims(), "offset dimensionality mismatch");
        Self {
            count: self.count,
            bounding_box: self.bounding_box.clone(),
            origin: self.origin.iter().zip(delta).map(|(o, d)| o + d).collect(),
            stream: Arc::clone(&self.stream),
        }
    }

    /// Membership test by replay; linear in the number of points.
    pub fn contains(&self, position: &[i64]) -> bool {
        if !self
            .bounding_box()
            .is_some_and(|bbox| bbox.contains(position))
        {
            return false;
        }

        let mut cursor = self.cursor();
        while cursor.fwd() {
            if (0..self.num_dims()).all(|d| cursor.get(d) == position[d]) {
                return true;
            }
        }
        false
    }
}
