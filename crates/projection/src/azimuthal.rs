//! Azimuthal equidistant projection.
//!
//! The projection used to prepare imagery for spherical displays: a point's
//! pixel distance from the output raster center is proportional to its
//! great-circle distance from the chosen geographic center, out to a
//! configurable angular radius (180 degrees renders the full sphere).
//!
//! The projection parameters include:
//! - Center latitude and longitude (the point shown at the raster center)
//! - Angular radius: maximum angular distance from the center to render
//! - Output raster dimensions in pixels
//!
//! Axis convention: centered plane coordinates have x growing eastward
//! (right) and y growing northward (up), so the azimuth `theta = atan2(x, y)`
//! is the bearing from true north at the center, clockwise positive. North
//! is up at the raster center. This convention is fixed; it determines the
//! orientation of every rendered image.

use std::f64::consts::PI;

use sphere_common::normalize_lon;
use thiserror::Error;

/// Below this value of `cos(center_lat)` the center is treated as a pole
/// and the meridian-fan simplification is used instead of the general
/// spherical triangle, which would otherwise lose the azimuth.
const POLE_COS_EPSILON: f64 = 1e-12;

/// Invalid projection setup.
#[derive(Debug, Error)]
pub enum ProjectionError {
    #[error("center latitude {0} must be between -90 and 90 degrees")]
    CenterLatitude(f64),

    #[error("center longitude {0} must be finite")]
    CenterLongitude(f64),

    #[error("angular radius {0} must be within (0, 180] degrees")]
    AngularRadius(f64),

    #[error("output dimensions {0}x{1} must be non-zero")]
    EmptyOutput(usize, usize),
}

/// Azimuthal equidistant projection parameters.
///
/// Maps between centered plane coordinates (pixels from the raster center)
/// and geographic coordinates (degrees), for a fixed center and output size.
#[derive(Debug, Clone)]
pub struct AzimuthalEquidistant {
    /// Projection center latitude (degrees), kept verbatim so the center
    /// fixpoint is exact
    lat0_deg: f64,
    /// Projection center longitude (degrees), normalized to [-180, 180)
    lon0_deg: f64,
    /// Projection center longitude (radians)
    lon0: f64,
    /// Maximum angular distance rendered (radians)
    angular_radius: f64,
    /// Output raster width (pixels)
    width: usize,
    /// Output raster height (pixels)
    height: usize,
    /// Precomputed sin(lat0)
    sin_lat0: f64,
    /// Precomputed cos(lat0)
    cos_lat0: f64,
    /// Pixel distance that maps to `angular_radius`
    pixel_radius: f64,
    /// +1 when the center is the north pole, -1 south pole, 0 otherwise
    pole: i8,
}

impl AzimuthalEquidistant {
    /// Create a new projection centered on (`center_lat_deg`,
    /// `center_lon_deg`), rendering out to `angular_radius_deg` on an
    /// output raster of `width` x `height` pixels.
    pub fn new(
        center_lat_deg: f64,
        center_lon_deg: f64,
        angular_radius_deg: f64,
        width: usize,
        height: usize,
    ) -> Result<Self, ProjectionError> {
        if !center_lat_deg.is_finite() || !(-90.0..=90.0).contains(&center_lat_deg) {
            return Err(ProjectionError::CenterLatitude(center_lat_deg));
        }
        if !center_lon_deg.is_finite() {
            return Err(ProjectionError::CenterLongitude(center_lon_deg));
        }
        if !angular_radius_deg.is_finite()
            || angular_radius_deg <= 0.0
            || angular_radius_deg > 180.0
        {
            return Err(ProjectionError::AngularRadius(angular_radius_deg));
        }
        if width == 0 || height == 0 {
            return Err(ProjectionError::EmptyOutput(width, height));
        }

        let lat0_deg = center_lat_deg;
        let lon0_deg = normalize_lon(center_lon_deg);
        let lat0 = lat0_deg.to_radians();
        let lon0 = lon0_deg.to_radians();
        let (sin_lat0, cos_lat0) = lat0.sin_cos();

        // The full-sphere radius must compare equal to the antipodal
        // distance PI, which degree conversion does not guarantee.
        let angular_radius = if angular_radius_deg == 180.0 {
            PI
        } else {
            angular_radius_deg.to_radians()
        };

        let pole = if cos_lat0.abs() < POLE_COS_EPSILON {
            if lat0 > 0.0 {
                1
            } else {
                -1
            }
        } else {
            0
        };

        Ok(Self {
            lat0_deg,
            lon0_deg,
            lon0,
            angular_radius,
            width,
            height,
            sin_lat0,
            cos_lat0,
            pixel_radius: width.min(height) as f64 / 2.0,
            pole,
        })
    }

    /// Output raster dimensions.
    pub fn dimensions(&self) -> (usize, usize) {
        (self.width, self.height)
    }

    /// Projection center as (lat, lon) in degrees.
    pub fn center(&self) -> (f64, f64) {
        (self.lat0_deg, self.lon0_deg)
    }

    /// Maximum rendered angular distance in degrees.
    pub fn angular_radius_deg(&self) -> f64 {
        self.angular_radius.to_degrees()
    }

    /// Convert raster pixel coordinates to centered plane coordinates.
    ///
    /// The raster center pixel (width/2, height/2) maps to plane (0, 0).
    #[inline]
    pub fn pixel_to_plane(&self, px: f64, py: f64) -> (f64, f64) {
        (px - self.width as f64 / 2.0, self.height as f64 / 2.0 - py)
    }

    /// Convert centered plane coordinates back to raster pixel coordinates.
    #[inline]
    pub fn plane_to_pixel(&self, x: f64, y: f64) -> (f64, f64) {
        (x + self.width as f64 / 2.0, self.height as f64 / 2.0 - y)
    }

    /// Convert centered plane coordinates to geographic (lat, lon) degrees.
    ///
    /// Returns `None` when the point lies beyond the rendered angular
    /// radius (or beyond the antipode at 180 degrees).
    pub fn plane_to_geo(&self, x: f64, y: f64) -> Option<(f64, f64)> {
        let rho = x.hypot(y);
        if rho == 0.0 {
            // Exact center fixpoint.
            return Some(self.center());
        }

        let c = rho / self.pixel_radius * self.angular_radius;
        if c > self.angular_radius || c > PI {
            return None;
        }

        let theta = x.atan2(y);
        let (sin_c, cos_c) = c.sin_cos();

        if self.pole != 0 {
            // Every azimuth is a meridian at the pole; theta maps to
            // longitude directly.
            let (lat, lon) = if self.pole > 0 {
                (PI / 2.0 - c, self.lon0 + PI - theta)
            } else {
                (c - PI / 2.0, self.lon0 + theta)
            };
            return Some((lat.to_degrees(), normalize_lon(lon.to_degrees())));
        }

        let sin_lat = (cos_c * self.sin_lat0 + sin_c * self.cos_lat0 * theta.cos()).clamp(-1.0, 1.0);
        let lat = sin_lat.asin();
        let lon = self.lon0
            + (sin_c * theta.sin())
                .atan2(cos_c * self.cos_lat0 - sin_c * self.sin_lat0 * theta.cos());

        Some((lat.to_degrees(), normalize_lon(lon.to_degrees())))
    }

    /// Convert geographic (lat, lon) degrees to centered plane coordinates.
    ///
    /// Returns `None` when the point's angular distance from the center
    /// exceeds the rendered angular radius. The center itself maps to
    /// (0, 0) exactly; the antipode (no unique bearing) maps deterministically
    /// to bearing 0, due north.
    pub fn geo_to_plane(&self, lat_deg: f64, lon_deg: f64) -> Option<(f64, f64)> {
        // Coincident with the center: the origin, exactly.
        if lat_deg == self.lat0_deg && normalize_lon(lon_deg) == self.lon0_deg {
            return Some((0.0, 0.0));
        }

        let lat = lat_deg.to_radians();
        let lon = lon_deg.to_radians();
        let dlon = lon - self.lon0;

        let (sin_lat, cos_lat) = lat.sin_cos();
        let cos_c =
            (self.sin_lat0 * sin_lat + self.cos_lat0 * cos_lat * dlon.cos()).clamp(-1.0, 1.0);
        let c = cos_c.acos();

        if c > self.angular_radius {
            return None;
        }
        if c == 0.0 {
            return Some((0.0, 0.0));
        }

        let theta = if (PI - c).abs() < 1e-12 {
            0.0
        } else {
            (dlon.sin() * cos_lat)
                .atan2(self.cos_lat0 * sin_lat - self.sin_lat0 * cos_lat * dlon.cos())
        };

        let rho = c / self.angular_radius * self.pixel_radius;
        Some((rho * theta.sin(), rho * theta.cos()))
    }

    /// Convert raster pixel coordinates to geographic (lat, lon) degrees.
    ///
    /// Returns `None` for pixels outside the rendered disk.
    pub fn pixel_to_geo(&self, px: f64, py: f64) -> Option<(f64, f64)> {
        let (x, y) = self.pixel_to_plane(px, py);
        self.plane_to_geo(x, y)
    }

    /// Convert geographic (lat, lon) degrees to raster pixel coordinates.
    pub fn geo_to_pixel(&self, lat_deg: f64, lon_deg: f64) -> Option<(f64, f64)> {
        self.geo_to_plane(lat_deg, lon_deg)
            .map(|(x, y)| self.plane_to_pixel(x, y))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TOL: f64 = 1e-9;

    #[test]
    fn test_center_fixpoint() {
        let proj = AzimuthalEquidistant::new(23.5, -42.25, 180.0, 400, 400).unwrap();
        let (lat, lon) = proj.plane_to_geo(0.0, 0.0).unwrap();
        assert_eq!(lat, 23.5);
        assert_eq!(lon, -42.25);
    }

    #[test]
    fn test_center_forward_is_origin() {
        let proj = AzimuthalEquidistant::new(23.5, -42.25, 180.0, 400, 400).unwrap();
        let (x, y) = proj.geo_to_plane(23.5, -42.25).unwrap();
        assert_eq!(x, 0.0);
        assert_eq!(y, 0.0);
    }

    #[test]
    fn test_north_is_up() {
        // Directly above the center on the plane must be due north.
        let proj = AzimuthalEquidistant::new(0.0, 0.0, 180.0, 360, 360).unwrap();
        let (lat, lon) = proj.plane_to_geo(0.0, 45.0).unwrap();
        assert!(lat > 0.0, "plane +y should move north, got lat {}", lat);
        assert!(lon.abs() < TOL, "due north should stay on the meridian, got lon {}", lon);
    }

    #[test]
    fn test_east_is_right() {
        let proj = AzimuthalEquidistant::new(0.0, 0.0, 180.0, 360, 360).unwrap();
        let (lat, lon) = proj.plane_to_geo(45.0, 0.0).unwrap();
        assert!(lat.abs() < TOL, "due east from the equator stays on it, got lat {}", lat);
        assert!(lon > 0.0, "plane +x should move east, got lon {}", lon);
    }

    #[test]
    fn test_roundtrip_inside_domain() {
        let proj = AzimuthalEquidistant::new(48.0, 7.5, 120.0, 640, 480).unwrap();

        for &(lat, lon) in &[
            (48.0, 7.5),
            (0.0, 0.0),
            (-30.0, 100.0),
            (60.0, -120.0),
            (10.0, 179.5),
            (-89.0, 45.0),
        ] {
            let Some((x, y)) = proj.geo_to_plane(lat, lon) else {
                continue; // outside the angular radius
            };
            let (lat2, lon2) = proj.plane_to_geo(x, y).expect("roundtrip left the domain");
            assert!(
                (lat - lat2).abs() < 1e-9,
                "lat roundtrip failed: {} vs {}",
                lat,
                lat2
            );
            assert!(
                (lon - lon2).abs() < 1e-9,
                "lon roundtrip failed: {} vs {}",
                lon,
                lon2
            );
        }
    }

    #[test]
    fn test_roundtrip_plane_first() {
        let proj = AzimuthalEquidistant::new(-15.0, 33.0, 180.0, 500, 500).unwrap();
        for &(x, y) in &[(10.0, 20.0), (-100.0, 0.5), (0.0, -220.0), (150.0, -150.0)] {
            let Some((lat, lon)) = proj.plane_to_geo(x, y) else {
                continue;
            };
            let (x2, y2) = proj.geo_to_plane(lat, lon).expect("forward left the domain");
            assert!((x - x2).abs() < 1e-6, "x roundtrip failed: {} vs {}", x, x2);
            assert!((y - y2).abs() < 1e-6, "y roundtrip failed: {} vs {}", y, y2);
        }
    }

    #[test]
    fn test_out_of_domain_beyond_radius() {
        let proj = AzimuthalEquidistant::new(0.0, 0.0, 90.0, 200, 200).unwrap();
        // Antipode is 180 degrees away, radius is 90.
        assert!(proj.geo_to_plane(0.0, 180.0).is_none());
        // Corner of the square output lies beyond the inscribed disk.
        assert!(proj.pixel_to_geo(0.0, 0.0).is_none());
    }

    #[test]
    fn test_full_sphere_corner_is_out_of_domain() {
        // Even at 180 degrees the square corners exceed the antipode.
        let proj = AzimuthalEquidistant::new(0.0, 0.0, 180.0, 200, 200).unwrap();
        assert!(proj.pixel_to_geo(0.0, 0.0).is_none());
        assert!(proj.pixel_to_geo(100.0, 100.0).is_some());
    }

    #[test]
    fn test_antipode_maps_to_boundary_north() {
        let proj = AzimuthalEquidistant::new(0.0, 0.0, 180.0, 200, 200).unwrap();
        let (x, y) = proj.geo_to_plane(0.0, 180.0).unwrap();
        // Bearing to the antipode is ambiguous; it is fixed due north at
        // the boundary circle.
        assert!(x.abs() < 1e-6, "antipode x should be 0, got {}", x);
        assert!((y - 100.0).abs() < 1e-6, "antipode y should be at the rim, got {}", y);
    }

    #[test]
    fn test_north_pole_center() {
        let proj = AzimuthalEquidistant::new(90.0, 0.0, 90.0, 360, 360).unwrap();

        // All pixels at equal distance from the center share a latitude.
        let mut lats = Vec::new();
        for theta_deg in [0.0_f64, 45.0, 90.0, 200.0, 315.0] {
            let theta = theta_deg.to_radians();
            let (x, y) = (90.0 * theta.sin(), 90.0 * theta.cos());
            let (lat, lon) = proj.plane_to_geo(x, y).unwrap();
            assert!(lat.is_finite() && lon.is_finite());
            lats.push(lat);
        }
        for lat in &lats {
            assert!(
                (lat - lats[0]).abs() < 1e-9,
                "polar rings should be isolatitude: {:?}",
                lats
            );
        }
        // Half the pixel radius at a 90 degree angular radius is 45
        // degrees from the pole.
        assert!((lats[0] - 45.0).abs() < 1e-9);
    }

    #[test]
    fn test_south_pole_center_roundtrip() {
        let proj = AzimuthalEquidistant::new(-90.0, 10.0, 180.0, 256, 256).unwrap();
        let (x, y) = proj.geo_to_plane(-45.0, 100.0).unwrap();
        let (lat, lon) = proj.plane_to_geo(x, y).unwrap();
        assert!((lat - -45.0).abs() < 1e-9);
        assert!((lon - 100.0).abs() < 1e-9);
    }

    #[test]
    fn test_non_square_output_uses_short_side() {
        let proj = AzimuthalEquidistant::new(0.0, 0.0, 180.0, 400, 200).unwrap();
        // Pixel radius is 100: plane (0, 100) is the antipode boundary.
        assert!(proj.plane_to_geo(0.0, 100.0).is_some());
        assert!(proj.plane_to_geo(0.0, 100.1).is_none());
        // Beyond the disk horizontally as well, even though x fits the width.
        assert!(proj.plane_to_geo(150.0, 0.0).is_none());
    }

    #[test]
    fn test_invalid_parameters_rejected() {
        assert!(AzimuthalEquidistant::new(91.0, 0.0, 180.0, 100, 100).is_err());
        assert!(AzimuthalEquidistant::new(0.0, f64::NAN, 180.0, 100, 100).is_err());
        assert!(AzimuthalEquidistant::new(0.0, 0.0, 0.0, 100, 100).is_err());
        assert!(AzimuthalEquidistant::new(0.0, 0.0, 181.0, 100, 100).is_err());
        assert!(AzimuthalEquidistant::new(0.0, 0.0, 180.0, 0, 100).is_err());
    }

    #[test]
    fn test_longitude_normalized() {
        let proj = AzimuthalEquidistant::new(0.0, 190.0, 180.0, 100, 100).unwrap();
        let (_, lon) = proj.center();
        assert_eq!(lon, -170.0);
    }
}
