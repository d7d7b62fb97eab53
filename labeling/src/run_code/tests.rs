//! Tests for the run-length point code.

use std::collections::BTreeSet;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use super::*;

/// Sorts points into scan order: highest dimension first, dimension 0 last.
fn scan_sorted(points: &BTreeSet<Vec<i64>>) -> Vec<Vec<i64>> {
    let mut sorted: Vec<Vec<i64>> = points.iter().cloned().collect();
    sorted.sort_by(|a, b| a.iter().rev().cmp(b.iter().rev()));
    sorted
}

fn encode(points: &[Vec<i64>], num_dims: usize) -> Vec<i64> {
    let mut encoder = RunEncoder::new(num_dims);
    for point in points {
        encoder.push(point);
    }
    encoder.finish()
}

#[test]
fn empty_stream() {
    let stream = RunEncoder::new(3).finish();
    assert!(stream.is_empty());

    let mut cursor = RunCursor::new(&stream, &[0, 0, 0]);
    assert!(!cursor.has_next());
    assert!(!cursor.fwd());
}

#[test]
fn single_point() {
    let stream = encode(&[vec![4, 2]], 2);
    assert_eq!(stream, vec![2, 4, 4]);

    let decoded: Vec<_> = RunCursor::new(&stream, &[0, 0]).collect();
    assert_eq!(decoded, vec![vec![4, 2]]);
}

#[test]
fn horizontal_line_is_one_run() {
    for length in [1, 2, 17, 1000] {
        let points: Vec<Vec<i64>> = (0..length).map(|x| vec![3 + x, 5, 7]).collect();
        let stream = encode(&points, 3);

        // header (y, z) + one (start, end) pair
        assert_eq!(stream, vec![5, 7, 3, 3 + length - 1]);
        assert_eq!(RunCursor::new(&stream, &[0, 0, 0]).count(), length as usize);
    }
}

#[test]
fn gap_in_row_starts_new_run_without_jump() {
    // .##.#
    let stream = encode(&[vec![1, 0], vec![2, 0], vec![4, 0]], 2);
    assert_eq!(stream, vec![0, 1, 2, 4, 4]);
}

#[test]
fn row_change_emits_jump() {
    // row 0: x = 0..=1, row 2: x = 3
    let stream = encode(&[vec![0, 0], vec![1, 0], vec![3, 2]], 2);
    assert_eq!(stream, vec![0, 0, 1, -1, 2, 3, 3]);
}

#[test]
fn jump_covers_highest_changed_dimension() {
    // moving from (x, 4, 0) to (x, 0, 1) changes both y and z
    let points = vec![vec![0, 4, 0], vec![2, 0, 1]];
    let stream = encode(&points, 3);
    assert_eq!(stream, vec![4, 0, 0, 0, -2, 0, 1, 2, 2]);

    let decoded: Vec<_> = RunCursor::new(&stream, &[0, 0, 0]).collect();
    assert_eq!(decoded, points);
}

#[test]
fn one_dimensional_runs() {
    let points: Vec<Vec<i64>> = [0, 1, 2, 5, 9, 10].iter().map(|&x| vec![x]).collect();
    let stream = encode(&points, 1);
    assert_eq!(stream, vec![0, 2, 5, 5, 9, 10]);

    let decoded: Vec<_> = RunCursor::new(&stream, &[0]).collect();
    assert_eq!(decoded, points);
}

#[test]
fn offset_translates_every_point() {
    let points = vec![vec![0, 0], vec![1, 0], vec![1, 3]];
    let stream = encode(&points, 2);

    let decoded: Vec<_> = RunCursor::new(&stream, &[10, -5]).collect();
    assert_eq!(decoded, vec![vec![10, -5], vec![11, -5], vec![11, -2]]);
}

#[test]
fn random_point_sets_round_trip() {
    let mut rng = StdRng::seed_from_u64(0x5eed);

    for num_dims in 1..=4usize {
        for _ in 0..25 {
            let extent = rng.random_range(1..8i64);
            let count = rng.random_range(0..60);
            let points: BTreeSet<Vec<i64>> = (0..count)
                .map(|_| {
                    (0..num_dims)
                        .map(|_| rng.random_range(-extent..extent))
                        .collect()
                })
                .collect();
            let ordered = scan_sorted(&points);

            // the stream holds coordinates relative to the lowest corner
            let origin: Vec<i64> = (0..num_dims)
                .map(|d| points.iter().map(|p| p[d]).min().unwrap_or(0))
                .collect();
            let local: Vec<Vec<i64>> = ordered
                .iter()
                .map(|p| p.iter().zip(&origin).map(|(c, o)| c - o).collect())
                .collect();
            let stream = encode(&local, num_dims);

            let decoded: Vec<Vec<i64>> = RunCursor::new(&stream, &origin).collect();
            assert_eq!(decoded, ordered);

            let offset: Vec<i64> = origin
                .iter()
                .enumerate()
                .map(|(d, o)| o + d as i64 * 3 - 4)
                .collect();
            let translated: BTreeSet<Vec<i64>> = RunCursor::new(&stream, &offset).collect();
            let expected: BTreeSet<Vec<i64>> = points
                .iter()
                .map(|p| {
                    p.iter()
                        .enumerate()
                        .map(|(d, c)| c + d as i64 * 3 - 4)
                        .collect()
                })
                .collect();
            assert_eq!(translated, expected);
        }
    }
}

#[test]
fn cursor_copies_are_independent() {
    let stream = encode(&[vec![0, 0], vec![1, 0], vec![0, 1]], 2);
    let mut first = RunCursor::new(&stream, &[0, 0]);
    assert!(first.fwd());

    let mut second = first.clone();
    assert!(second.fwd());
    assert!(second.fwd());

    assert_eq!(first.current_position(), vec![0, 0]);
    assert_eq!(second.current_position(), vec![0, 1]);
    assert!(first.has_next());
    assert!(!second.has_next());
}

#[test]
fn jump_fwd_and_reset() {
    let points: Vec<Vec<i64>> = (0..10).map(|x| vec![x, x % 2]).collect();
    let ordered = scan_sorted(&points.iter().cloned().collect());
    let stream = encode(&ordered, 2);

    let mut cursor = RunCursor::new(&stream, &[0, 0]);
    assert!(cursor.jump_fwd(7));
    assert_eq!(cursor.current_position(), ordered[6]);
    assert_eq!(cursor.local_position(), ordered[6].as_slice());

    assert!(!cursor.jump_fwd(4));
    assert!(!cursor.has_next());

    cursor.reset();
    assert!(cursor.fwd());
    assert_eq!(cursor.current_position(), ordered[0]);
}

#[test]
fn iterator_continues_from_manual_steps() {
    let ordered = vec![vec![0, 0], vec![1, 0], vec![4, 0], vec![2, 3]];
    let stream = encode(&ordered, 2);

    let mut cursor = RunCursor::new(&stream, &[10, -1]);
    assert!(cursor.fwd());
    assert_eq!(cursor.current_position(), vec![10, -1]);

    let rest: Vec<Vec<i64>> = cursor.by_ref().collect();
    assert_eq!(rest, vec![vec![11, -1], vec![14, -1], vec![12, 2]]);
    assert_eq!(cursor.next(), None);
}

#[test]
#[should_panic(expected = "out of scan order")]
fn out_of_order_input_panics() {
    let mut encoder = RunEncoder::new(2);
    encoder.push(&[3, 1]);
    encoder.push(&[0, 0]);
}

#[test]
#[should_panic(expected = "non-negative")]
fn negative_coordinate_panics() {
    let mut encoder = RunEncoder::new(2);
    encoder.push(&[-1, 0]);
}
