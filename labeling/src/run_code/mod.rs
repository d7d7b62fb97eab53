//! Run-length code for point sets on a grid.
//!
//! Points are fed in scan order (dimension 0 varies fastest) and stored as
//! maximal runs of consecutive dimension-0 coordinates. Stream layout:
//!
//! ```text
//! header:  y z ...          coordinates of dimensions 1.. of the first point
//! run:     start end        inclusive dimension-0 range at the current row
//! jump:    -k c1 .. ck      dimensions 1..=k changed, new values follow
//! ```
//!
//! A run never starts with a negative value, so a negative entry always marks
//! a jump. Coordinates are local: non-negative, with any absolute placement
//! applied by the cursor's offset.
//!
//! Space is one pair per run plus `k + 1` values per jump, independent of run
//! length.

#[cfg(test)]
mod tests;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum EncoderState {
    NotStarted,
    InRun,
}

/// Single-pass writer of a run stream.
#[derive(Debug, Clone)]
pub struct RunEncoder {
    state: EncoderState,
    stream: Vec<i64>,
    run_start: i64,
    prev: Vec<i64>,
}

impl RunEncoder {
    pub fn new(num_dims: usize) -> Self {
        assert!(num_dims > 0, "run code needs at least one dimension");

        Self {
            state: EncoderState::NotStarted,
            stream: Vec::new(),
            run_start: 0,
            prev: vec![0; num_dims],
        }
    }

    #[inline]
    pub fn num_dims(&self) -> usize {
        self.prev.len()
    }

    /// Appends one point. Points must arrive strictly in scan order.
    pub fn push(&mut self, position: &[i64]) {
        assert_eq!(
            position.len(),
            self.num_dims(),
            "position dimensionality mismatch"
        );
        assert!(
            position.iter().all(|&c| c >= 0),
            "run code coordinates must be non-negative, got {:?}",
            position
        );

        match self.state {
            EncoderState::NotStarted => {
                self.stream.extend_from_slice(&position[1..]);
                self.state = EncoderState::InRun;
            }
            EncoderState::InRun => {
                let x = position[0];
                let changed = (1..self.num_dims())
                    .rev()
                    .find(|&d| position[d] != self.prev[d]);

                match changed {
                    None => {
                        assert!(
                            x > self.prev[0],
                            "points out of scan order: {:?} after {:?}",
                            position,
                            self.prev
                        );
                        if x == self.prev[0] + 1 {
                            self.prev[0] = x;
                            return;
                        }
                        self.close_run();
                    }
                    Some(k) => {
                        assert!(
                            position[k] > self.prev[k],
                            "points out of scan order: {:?} after {:?}",
                            position,
                            self.prev
                        );
                        self.close_run();
                        self.stream.push(-(k as i64));
                        self.stream.extend_from_slice(&position[1..=k]);
                    }
                }
            }
        }

        self.run_start = position[0];
        self.prev.copy_from_slice(position);
    }

    fn close_run(&mut self) {
        self.stream.push(self.run_start);
        self.stream.push(self.prev[0]);
    }

    /// Closes the open run and returns the stream.
    pub fn finish(mut self) -> Vec<i64> {
        if self.state == EncoderState::InRun {
            self.close_run();
        }
        self.stream
    }
}

/// Replays a run stream point by point.
///
/// Like a grid cursor the position is undefined until the first
/// [`fwd`](Self::fwd). Copies are independent: each owns its replay state and
/// offset.
#[derive(Debug, Clone)]
pub struct RunCursor<'a> {
    stream: &'a [i64],
    offset: Vec<i64>,
    local: Vec<i64>,
    next: usize,
    run_end: i64,
    in_run: bool,
}

impl<'a> RunCursor<'a> {
    /// `offset` is added to every decoded position.
    pub fn new(stream: &'a [i64], offset: &[i64]) -> Self {
        assert!(!offset.is_empty(), "run code needs at least one dimension");

        let mut cursor = Self {
            stream,
            offset: offset.to_vec(),
            local: vec![0; offset.len()],
            next: 0,
            run_end: 0,
            in_run: false,
        };
        cursor.reset();
        cursor
    }

    pub fn reset(&mut self) {
        self.local.fill(0);
        self.in_run = false;
        self.run_end = 0;

        let header = self.local.len() - 1;
        if self.stream.len() > header {
            self.local[1..].copy_from_slice(&self.stream[..header]);
            self.next = header;
        } else {
            self.next = self.stream.len();
        }
    }

    #[inline]
    pub fn num_dims(&self) -> usize {
        self.local.len()
    }

    #[inline]
    pub fn has_next(&self) -> bool {
        (self.in_run && self.local[0] < self.run_end) || self.next < self.stream.len()
    }

    /// Moves to the next point; returns `false` once the stream is exhausted.
    pub fn fwd(&mut self) -> bool {
        if self.in_run && self.local[0] < self.run_end {
            self.local[0] += 1;
            return true;
        }

        if self.next >= self.stream.len() {
            self.in_run = false;
            return false;
        }

        let head = self.stream[self.next];
        if head < 0 {
            let k = (-head) as usize;
            let values = &self.stream[self.next + 1..self.next + 1 + k];
            self.local[1..=k].copy_from_slice(values);
            self.next += k + 1;
        }

        self.local[0] = self.stream[self.next];
        self.run_end = self.stream[self.next + 1];
        self.next += 2;
        self.in_run = true;

        true
    }

    /// Advances `steps` points, one at a time.
    ///
    /// Cost is linear in `steps`; runs are not skipped in bulk.
    pub fn jump_fwd(&mut self, steps: usize) -> bool {
        for _ in 0..steps {
            if !self.fwd() {
                return false;
            }
        }
        true
    }

    /// Current position without the offset.
    #[inline]
    pub fn local_position(&self) -> &[i64] {
        &self.local
    }

    #[inline]
    pub fn get(&self, d: usize) -> i64 {
        self.local[d] + self.offset[d]
    }

    pub fn localize(&self, position: &mut [i64]) {
        for (d, out) in position.iter_mut().enumerate() {
            *out = self.get(d);
        }
    }

    /// Current position with the offset applied.
    pub fn current_position(&self) -> Vec<i64> {
        let mut position = vec![0; self.num_dims()];
        self.localize(&mut position);
        position
    }
}

impl Iterator for RunCursor<'_> {
    type Item = Vec<i64>;

    fn next(&mut self) -> Option<Self::Item> {
        self.fwd().then(|| self.current_position())
    }
}
