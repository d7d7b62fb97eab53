use std::hint::black_box;

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};

use labeling::{LabelDictionary, LabelGrid, RunCursor, RunEncoder};

fn striped_stream(width: i64, height: i64) -> Vec<i64> {
    let mut encoder = RunEncoder::new(2);
    for y in 0..height {
        for x in 0..width {
            if (x / 8 + y) % 2 == 0 {
                encoder.push(&[x, y]);
            }
        }
    }
    encoder.finish()
}

fn bench_jump_fwd(c: &mut Criterion) {
    let stream = striped_stream(512, 512);
    let mut group = c.benchmark_group("run_cursor_jump_fwd");

    for steps in [1_000usize, 10_000, 100_000] {
        group.bench_with_input(BenchmarkId::from_parameter(steps), &steps, |b, &steps| {
            b.iter(|| {
                let mut cursor = RunCursor::new(&stream, &[0, 0]);
                black_box(cursor.jump_fwd(steps));
                black_box(cursor.local_position()[0])
            })
        });
    }

    group.finish();
}

fn bench_add_label(c: &mut Criterion) {
    c.bench_function("label_grid_add_label", |b| {
        b.iter(|| {
            let mut grid = LabelGrid::new(&[128, 128]);
            for y in 0..128usize {
                for x in 0..128usize {
                    let label = (x / 16 + y / 16) as u32 % 5;
                    grid.add_label(&[x, y], &label)
                        .unwrap_or_else(|e| panic!("add_label failed: {}", e));
                }
            }
            black_box(grid.dictionary().num_sets())
        })
    });

    c.bench_function("dictionary_add_label_uncached", |b| {
        let dictionary = LabelDictionary::new();
        b.iter(|| {
            let mut index = 0;
            for label in 0..32u32 {
                index = dictionary
                    .add_label_at(&label, index)
                    .unwrap_or_else(|e| panic!("add_label_at failed: {}", e));
            }
            black_box(index)
        })
    });
}

fn bench_fragments(c: &mut Criterion) {
    let mut grid = LabelGrid::new(&[256, 256]);
    for y in 0..256usize {
        for x in 0..256usize {
            if (x * x + y * y) % 7 < 3 {
                grid.add_label(&[x, y], &"speckle")
                    .unwrap_or_else(|e| panic!("add_label failed: {}", e));
            }
        }
    }

    c.bench_function("label_grid_fragments", |b| {
        b.iter(|| black_box(grid.fragments(&["speckle"])))
    });
}

criterion_group!(benches, bench_jump_fwd, bench_add_label, bench_fragments);
criterion_main!(benches);
