//! Labels a small volume, then prints per-label fragment statistics.

use labeling::{IndexWidth, LabelGrid, LabelingConfig};

fn main() -> anyhow::Result<()> {
    common::log_setup::setup_logging("debug", "fragment_scan");

    let config = LabelingConfig {
        index_width: IndexWidth::U16,
        ..LabelingConfig::default()
    };
    let dims = [32usize, 32, 8];
    let mut grid = LabelGrid::with_config(&dims, config);

    for z in 0..dims[2] {
        for y in 0..dims[1] {
            for x in 0..dims[0] {
                let (fx, fy, fz) = (x as f32 - 16.0, y as f32 - 16.0, z as f32 * 2.0 - 8.0);
                let r2 = fx * fx + fy * fy + fz * fz;
                if r2 < 100.0 {
                    grid.add_label(&[x, y, z], &"core")?;
                }
                if r2 < 196.0 {
                    grid.add_label(&[x, y, z], &"shell")?;
                }
                if x < 4 {
                    grid.add_label(&[x, y, z], &"border")?;
                }
            }
        }
    }

    let labels = ["core", "shell", "border", "missing"];
    let fragments = grid.fragments(&labels)?;
    for (label, fragment) in labels.iter().zip(&fragments) {
        match fragment.bounding_box() {
            Some(bbox) => tracing::info!(
                label,
                points = fragment.point_count(),
                stream_len = fragment.stream().len(),
                min = ?bbox.min(),
                max = ?bbox.max(),
                "fragment"
            ),
            None => tracing::info!(label, "empty fragment"),
        }
    }

    tracing::info!(
        num_sets = grid.dictionary().num_sets(),
        cache_misses = grid.cache().miss_count(),
        "dictionary"
    );

    Ok(())
}
