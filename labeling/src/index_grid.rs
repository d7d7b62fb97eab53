use std::ops::{Deref, Index};

/// N-dimensional buffer of canonical label set indices.
///
/// Row-major with dimension 0 varying fastest; linear order is the scan order
/// used for run coding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexGrid {
    dims: Vec<usize>,
    strides: Vec<usize>,
    indices: Vec<u32>,
}

impl IndexGrid {
    pub fn new(dims: &[usize]) -> Self {
        assert!(!dims.is_empty(), "grid needs at least one dimension");

        let mut strides = Vec::with_capacity(dims.len());
        let mut len = 1usize;
        for &extent in dims {
            strides.push(len);
            len = len
                .checked_mul(extent)
                .unwrap_or_else(|| panic!("grid dims {:?} overflow usize", dims));
        }

        Self {
            dims: dims.to_vec(),
            strides,
            indices: vec![0; len],
        }
    }

    #[inline]
    pub fn num_dims(&self) -> usize {
        self.dims.len()
    }

    #[inline]
    pub fn dims(&self) -> &[usize] {
        &self.dims
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.indices.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    #[inline]
    pub fn linear_index(&self, position: &[usize]) -> usize {
        assert_eq!(
            position.len(),
            self.num_dims(),
            "position dimensionality mismatch"
        );
        position
            .iter()
            .zip(&self.dims)
            .zip(&self.strides)
            .map(|((&c, &extent), &stride)| {
                assert!(
                    c < extent,
                    "position {:?} outside grid {:?}",
                    position,
                    self.dims
                );
                c * stride
            })
            .sum()
    }

    pub fn position_of(&self, linear: usize) -> Vec<usize> {
        assert!(linear < self.len(), "linear index {} outside grid", linear);
        self.dims
            .iter()
            .zip(&self.strides)
            .map(|(&extent, &stride)| (linear / stride) % extent)
            .collect()
    }

    #[inline]
    pub fn get(&self, position: &[usize]) -> u32 {
        self.indices[self.linear_index(position)]
    }

    #[inline]
    pub fn set(&mut self, position: &[usize], index: u32) {
        let linear = self.linear_index(position);
        self.indices[linear] = index;
    }

    #[inline]
    pub fn indices(&self) -> &[u32] {
        &self.indices
    }

    #[inline]
    pub fn fill(&mut self, index: u32) {
        self.indices.fill(index);
    }

    /// Visits every point in scan order with its position and stored index.
    pub fn for_each_point(&self, mut visit: impl FnMut(&[i64], u32)) {
        if self.is_empty() {
            return;
        }

        let mut position = vec![0i64; self.num_dims()];
        for &index in &self.indices {
            visit(&position, index);

            for (c, &extent) in position.iter_mut().zip(&self.dims) {
                *c += 1;
                if (*c as usize) < extent {
                    break;
                }
                *c = 0;
            }
        }
    }
}

impl Index<&[usize]> for IndexGrid {
    type Output = u32;

    #[inline]
    fn index(&self, position: &[usize]) -> &Self::Output {
        &self.indices[self.linear_index(position)]
    }
}

impl Deref for IndexGrid {
    type Target = [u32];

    #[inline]
    fn deref(&self) -> &Self::Target {
        &self.indices
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn linear_layout_is_x_fastest() {
        let grid = IndexGrid::new(&[4, 3, 2]);
        assert_eq!(grid.len(), 24);
        assert_eq!(grid.linear_index(&[0, 0, 0]), 0);
        assert_eq!(grid.linear_index(&[1, 0, 0]), 1);
        assert_eq!(grid.linear_index(&[0, 1, 0]), 4);
        assert_eq!(grid.linear_index(&[3, 2, 1]), 23);
        assert_eq!(grid.position_of(23), vec![3, 2, 1]);
        assert_eq!(grid.position_of(5), vec![1, 1, 0]);
    }

    #[test]
    fn get_set_fill() {
        let mut grid = IndexGrid::new(&[3, 3]);
        grid.set(&[2, 1], 7);
        assert_eq!(grid.get(&[2, 1]), 7);
        assert_eq!(grid[&[2usize, 1][..]], 7);
        assert_eq!(grid.iter().filter(|&&i| i == 7).count(), 1);

        grid.fill(0);
        assert!(grid.indices().iter().all(|&i| i == 0));
    }

    #[test]
    fn for_each_point_follows_scan_order() {
        let mut grid = IndexGrid::new(&[2, 2, 2]);
        grid.set(&[1, 1, 1], 3);

        let mut visited = Vec::new();
        grid.for_each_point(|position, index| visited.push((position.to_vec(), index)));

        assert_eq!(visited.len(), 8);
        for (linear, (position, _)) in visited.iter().enumerate() {
            let expected: Vec<i64> = grid.position_of(linear).iter().map(|&c| c as i64).collect();
            assert_eq!(position, &expected);
        }
        assert_eq!(visited[7], (vec![1, 1, 1], 3));
    }

    #[test]
    fn zero_extent_grid_has_no_points() {
        let grid = IndexGrid::new(&[3, 0]);
        assert!(grid.is_empty());

        let mut visits = 0;
        grid.for_each_point(|_, _| visits += 1);
        assert_eq!(visits, 0);
    }

    #[test]
    #[should_panic(expected = "overflow usize")]
    fn oversized_dims_panic() {
        IndexGrid::new(&[usize::MAX, 2]);
    }

    #[test]
    #[should_panic(expected = "outside grid")]
    fn out_of_bounds_panics() {
        IndexGrid::new(&[2, 2]).get(&[2, 0]);
    }
}
