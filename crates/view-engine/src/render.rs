//! Full-frame projection rendering.
//!
//! One render pass is the unit of recompute: every output pixel is mapped
//! back through the azimuthal-equidistant inverse and sampled from the
//! source. Pixels are independent, so the pass partitions by rows across
//! the rayon pool; the only shared state is the read-only source and each
//! row's private slice of the output.

use std::time::Instant;

use projection::AzimuthalEquidistant;
use rayon::prelude::*;
use tracing::debug;

use crate::error::{EngineError, Result};
use crate::resample::sample_into;
use crate::types::{Interpolation, ProjectedRaster, ProjectionParameters, SourceRaster};

/// Render one azimuthal-equidistant frame of the source raster.
///
/// Fails with `InvalidParameters` or `SourceUnavailable` before any pixel
/// work; a failed call never produces a partial raster.
pub fn render(
    source: &SourceRaster,
    params: &ProjectionParameters,
    interpolation: Interpolation,
) -> Result<ProjectedRaster> {
    params.validate()?;
    if source.is_empty() {
        return Err(EngineError::source_unavailable(
            "source raster has no samples",
        ));
    }

    let mapper = AzimuthalEquidistant::new(
        params.center_lat,
        params.center_lon,
        params.angular_radius,
        params.output_width,
        params.output_height,
    )?;

    let width = params.output_width;
    let height = params.output_height;
    let channels = source.channels();
    let row_len = width * channels;
    let started = Instant::now();

    let mut data = vec![f32::NAN; row_len * height];
    let mut mask = vec![false; width * height];

    data.par_chunks_mut(row_len)
        .zip(mask.par_chunks_mut(width))
        .enumerate()
        .for_each(|(py, (data_row, mask_row))| {
            for px in 0..width {
                let (x, y) = mapper.pixel_to_plane(px as f64, py as f64);
                if let Some((lat, lon)) = mapper.plane_to_geo(x, y) {
                    let out = &mut data_row[px * channels..(px + 1) * channels];
                    sample_into(source, lat, lon, interpolation, out);
                    mask_row[px] = true;
                }
            }
        });

    debug!(
        width,
        height,
        channels,
        center_lat = params.center_lat,
        center_lon = params.center_lon,
        elapsed_ms = started.elapsed().as_millis() as u64,
        "rendered frame"
    );

    Ok(ProjectedRaster::from_parts(data, mask, width, height, channels))
}
