//! Sampling the source raster at geographic coordinates.
//!
//! Longitude is wrapped into the source's declared window before indexing so
//! the raster stays continuous across its seam; latitude is clamped so the
//! pole rows answer for anything at or beyond the poles.

use crate::types::{Interpolation, SourceRaster};

/// Sample the source at (`lat_deg`, `lon_deg`), writing one pixel's channels
/// into `out`.
///
/// `out.len()` must equal `source.channels()`. Any in-range geographic
/// position yields a value; out-of-domain handling happens upstream in the
/// projection, not here.
pub fn sample_into(
    source: &SourceRaster,
    lat_deg: f64,
    lon_deg: f64,
    interpolation: Interpolation,
    out: &mut [f32],
) {
    let (col, row) = geo_to_grid(source, lat_deg, lon_deg);
    match interpolation {
        Interpolation::Nearest => sample_nearest(source, col, row, out),
        Interpolation::Bilinear => sample_bilinear(source, col, row, out),
    }
}

/// Fractional, cell-centered grid coordinates of a geographic position.
///
/// Column 0.0 is the center of the westernmost column; row 0.0 the center of
/// the northernmost row. Values may fall outside `[0, width-1]` by up to
/// half a cell (or more for non-global extents); neighbor selection wraps or
/// clamps them.
fn geo_to_grid(source: &SourceRaster, lat_deg: f64, lon_deg: f64) -> (f64, f64) {
    let extent = source.extent();
    let (lon_res, lat_res) = source.resolution();
    let lon = extent.wrap_lon(lon_deg);
    let lat = lat_deg.clamp(extent.lat_min, extent.lat_max);
    let col = (lon - extent.lon_min) / lon_res - 0.5;
    let row = (extent.lat_max - lat) / lat_res - 0.5;
    (col, row)
}

/// Wrap a column index modulo the width for seam-continuous (global)
/// rasters; clamp to the edge columns otherwise.
#[inline]
fn resolve_col(source: &SourceRaster, col: i64) -> usize {
    let width = source.width() as i64;
    if source.extent().is_global_lon() {
        col.rem_euclid(width) as usize
    } else {
        col.clamp(0, width - 1) as usize
    }
}

/// Clamp a row index to the raster; rows never wrap.
#[inline]
fn resolve_row(source: &SourceRaster, row: i64) -> usize {
    row.clamp(0, source.height() as i64 - 1) as usize
}

/// Nearest neighbor: closest source pixel, ties broken toward the lower
/// index (round half down, so the tie-break is deterministic).
fn sample_nearest(source: &SourceRaster, col: f64, row: f64, out: &mut [f32]) {
    let c = (col - 0.5).ceil() as i64;
    let r = (row - 0.5).ceil() as i64;
    source.copy_pixel(resolve_col(source, c), resolve_row(source, r), out);
}

/// Bilinear: weighted average of the four enclosing pixels, with
/// wrap-aware neighbor selection at the longitude seam. If any corner is
/// NaN the result is NaN rather than a blend with garbage.
fn sample_bilinear(source: &SourceRaster, col: f64, row: f64, out: &mut [f32]) {
    let c0f = col.floor();
    let r0f = row.floor();
    let tx = (col - c0f) as f32;
    let ty = (row - r0f) as f32;

    let c0 = resolve_col(source, c0f as i64);
    let c1 = resolve_col(source, c0f as i64 + 1);
    let r0 = resolve_row(source, r0f as i64);
    let r1 = resolve_row(source, r0f as i64 + 1);

    for channel in 0..source.channels() {
        let v00 = source.channel_at(c0, r0, channel);
        let v10 = source.channel_at(c1, r0, channel);
        let v01 = source.channel_at(c0, r1, channel);
        let v11 = source.channel_at(c1, r1, channel);

        if v00.is_nan() || v10.is_nan() || v01.is_nan() || v11.is_nan() {
            out[channel] = f32::NAN;
            continue;
        }

        let top = v00 * (1.0 - tx) + v10 * tx;
        let bottom = v01 * (1.0 - tx) + v11 * tx;
        out[channel] = top * (1.0 - ty) + bottom * ty;
    }
}
