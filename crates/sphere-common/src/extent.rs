//! Geographic extent of an equirectangular raster.

use serde::{Deserialize, Serialize};

/// The geographic region covered by an equirectangular raster.
///
/// Longitudes may be declared in any 360-degree window (typically
/// `[-180, 180)` or `[0, 360)`); latitudes must lie within `[-90, 90]`.
/// Row 0 of the raster corresponds to `lat_max` (north at the top).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoExtent {
    pub lon_min: f64,
    pub lon_max: f64,
    pub lat_min: f64,
    pub lat_max: f64,
}

impl GeoExtent {
    /// Create a validated extent.
    pub fn new(lon_min: f64, lon_max: f64, lat_min: f64, lat_max: f64) -> Result<Self, ExtentError> {
        if !(lon_min < lon_max) {
            return Err(ExtentError::InvertedLongitude {
                min: lon_min,
                max: lon_max,
            });
        }
        if !(lat_min < lat_max) {
            return Err(ExtentError::InvertedLatitude {
                min: lat_min,
                max: lat_max,
            });
        }
        if lon_max - lon_min > 360.0 + 1e-9 {
            return Err(ExtentError::LongitudeSpanTooWide(lon_max - lon_min));
        }
        for lat in [lat_min, lat_max] {
            if !(-90.0..=90.0).contains(&lat) {
                return Err(ExtentError::LatitudeOutOfRange(lat));
            }
        }
        Ok(Self {
            lon_min,
            lon_max,
            lat_min,
            lat_max,
        })
    }

    /// Full-globe extent: longitude `[-180, 180)`, latitude `[-90, 90]`.
    pub fn global() -> Self {
        Self {
            lon_min: -180.0,
            lon_max: 180.0,
            lat_min: -90.0,
            lat_max: 90.0,
        }
    }

    /// Longitude span in degrees.
    pub fn lon_span(&self) -> f64 {
        self.lon_max - self.lon_min
    }

    /// Latitude span in degrees.
    pub fn lat_span(&self) -> f64 {
        self.lat_max - self.lat_min
    }

    /// Whether the extent wraps the full 360 degrees of longitude.
    ///
    /// A raster with a global span is continuous across its left/right
    /// edges; sampling must wrap columns there instead of clamping.
    pub fn is_global_lon(&self) -> bool {
        (self.lon_span() - 360.0).abs() < 1e-9
    }

    /// Wrap a longitude into `[lon_min, lon_min + 360)`.
    pub fn wrap_lon(&self, lon_deg: f64) -> f64 {
        (lon_deg - self.lon_min).rem_euclid(360.0) + self.lon_min
    }

    /// Check whether a geographic point falls inside the extent.
    pub fn contains(&self, lat_deg: f64, lon_deg: f64) -> bool {
        let lon = self.wrap_lon(lon_deg);
        lat_deg >= self.lat_min && lat_deg <= self.lat_max && lon < self.lon_max
    }
}

impl Default for GeoExtent {
    fn default() -> Self {
        Self::global()
    }
}

/// Validation failures for a declared extent.
#[derive(Debug, thiserror::Error)]
pub enum ExtentError {
    #[error("minimum longitude {min} must be less than maximum longitude {max}")]
    InvertedLongitude { min: f64, max: f64 },

    #[error("minimum latitude {min} must be less than maximum latitude {max}")]
    InvertedLatitude { min: f64, max: f64 },

    #[error("longitude span {0} degrees exceeds 360")]
    LongitudeSpanTooWide(f64),

    #[error("latitude {0} must be between -90 and 90 degrees")]
    LatitudeOutOfRange(f64),
}
