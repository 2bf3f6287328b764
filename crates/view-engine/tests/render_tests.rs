//! End-to-end tests of the projection pipeline: source raster in,
//! azimuthal-equidistant frame out.

use sphere_common::GeoExtent;
use view_engine::{render, sample_into, Interpolation, ProjectionParameters, SourceRaster};

/// 360x180 one-degree raster where each pixel's value encodes its cell:
/// value = col * 1000 + row.
fn degree_source() -> SourceRaster {
    let mut data = Vec::with_capacity(360 * 180);
    for row in 0..180 {
        for col in 0..360 {
            data.push((col * 1000 + row) as f32);
        }
    }
    SourceRaster::new(data, 360, 180, 1, GeoExtent::global()).unwrap()
}

/// 360x180 raster whose value is the row index alone — an isolatitude
/// pattern for symmetry checks.
fn latitude_source() -> SourceRaster {
    let mut data = Vec::with_capacity(360 * 180);
    for row in 0..180 {
        for _ in 0..360 {
            data.push(row as f32);
        }
    }
    SourceRaster::new(data, 360, 180, 1, GeoExtent::global()).unwrap()
}

// ============================================================================
// Full-disk scenario: 360x180 source, center (0, 0), radius 180, 200x200 out
// ============================================================================

#[test]
fn test_full_disk_center_pixel_matches_source_center() {
    let source = degree_source();
    let params = ProjectionParameters::new(0.0, 0.0, 200, 200, 180.0);
    let frame = render(&source, &params, Interpolation::Nearest).unwrap();

    let mut expected = [0.0f32];
    sample_into(&source, 0.0, 0.0, Interpolation::Nearest, &mut expected);
    assert_eq!(
        frame.pixel(100, 100),
        Some(&expected[..]),
        "raster center must carry the source value at (lat 0, lon 0)"
    );
}

#[test]
fn test_full_disk_corner_is_no_data() {
    let source = degree_source();
    let params = ProjectionParameters::new(0.0, 0.0, 200, 200, 180.0);
    let frame = render(&source, &params, Interpolation::Nearest).unwrap();

    // The corner's distance from the center exceeds the antipode for a
    // square output, so it must be flagged rather than filled with garbage.
    assert!(!frame.is_valid(0, 0));
    assert!(!frame.is_valid(199, 0));
    assert!(!frame.is_valid(0, 199));
    assert!(!frame.is_valid(199, 199));
    assert!(frame.pixel(0, 0).is_none());
}

#[test]
fn test_full_disk_mask_shape() {
    let source = degree_source();
    let params = ProjectionParameters::new(0.0, 0.0, 200, 200, 180.0);
    let frame = render(&source, &params, Interpolation::Nearest).unwrap();

    // Valid exactly on the inscribed disk (radius 100 pixels).
    let area = frame.valid_count() as f64;
    let disk = std::f64::consts::PI * 100.0 * 100.0;
    assert!(
        (area - disk).abs() / disk < 0.02,
        "valid area {} should be close to the disk area {}",
        area,
        disk
    );
}

// ============================================================================
// Pole-centered views
// ============================================================================

#[test]
fn test_north_pole_view_is_radially_symmetric() {
    let source = latitude_source();
    let params = ProjectionParameters::new(90.0, 0.0, 128, 128, 90.0);
    let frame = render(&source, &params, Interpolation::Nearest).unwrap();

    // Pixels at equal distance from the center lie on one parallel and
    // must sample one latitude row.
    let ring = [(96, 64), (64, 96), (32, 64), (64, 32)];
    let reference = frame.pixel(96, 64).expect("ring pixel valid")[0];
    for &(x, y) in &ring {
        let value = frame.pixel(x, y).expect("ring pixel valid")[0];
        assert_eq!(
            value, reference,
            "pixel ({}, {}) broke the polar symmetry",
            x, y
        );
    }

    // All finite, non-degenerate output.
    assert!(frame.valid_count() > 0);
    for (i, &value) in frame.data().iter().enumerate() {
        if frame.mask()[i] {
            assert!(value.is_finite());
        }
    }
}

#[test]
fn test_south_pole_view_renders() {
    let source = latitude_source();
    let params = ProjectionParameters::new(-90.0, 45.0, 64, 64, 90.0);
    let frame = render(&source, &params, Interpolation::Bilinear).unwrap();
    // The center samples the southernmost row.
    let center = frame.pixel(32, 32).expect("center valid")[0];
    assert!(
        center > 170.0,
        "south pole view should sample the bottom rows, got {}",
        center
    );
}

// ============================================================================
// Seam behavior end to end
// ============================================================================

#[test]
fn test_view_centered_on_the_seam() {
    let source = degree_source();
    let params = ProjectionParameters::new(0.0, -180.0, 100, 100, 90.0);
    let frame = render(&source, &params, Interpolation::Nearest).unwrap();

    let mut expected = [0.0f32];
    sample_into(&source, 0.0, -180.0, Interpolation::Nearest, &mut expected);
    assert_eq!(frame.pixel(50, 50), Some(&expected[..]));

    // Columns either side of the center straddle the dateline; both must
    // be valid data, not no-data artifacts.
    assert!(frame.is_valid(49, 50));
    assert!(frame.is_valid(51, 50));
}

// ============================================================================
// Interpolation modes
// ============================================================================

#[test]
fn test_modes_agree_at_cell_centers() {
    let source = degree_source();
    // 45.5N 10.5E is a cell center: both modes must return the stored value.
    let mut nearest = [0.0f32];
    let mut bilinear = [0.0f32];
    sample_into(&source, 45.5, 10.5, Interpolation::Nearest, &mut nearest);
    sample_into(&source, 45.5, 10.5, Interpolation::Bilinear, &mut bilinear);
    assert_eq!(nearest[0], bilinear[0]);
}
