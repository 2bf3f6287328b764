//! Core types for the view engine.

use serde::{Deserialize, Serialize};
use sphere_common::GeoExtent;

use crate::error::{EngineError, Result};

/// Immutable equirectangular source raster.
///
/// Samples are stored channel-interleaved in row-major order with row 0 at
/// the northern edge of the declared extent. Cell-centered registration:
/// column `i` covers `[lon_min + i*res, lon_min + (i+1)*res)` with its
/// center at `lon_min + (i + 0.5)*res`, and likewise for rows from the top.
///
/// The raster is created once at load time by the decoding collaborator and
/// is only ever read afterwards; render passes share it freely.
#[derive(Debug, Clone)]
pub struct SourceRaster {
    data: Vec<f32>,
    width: usize,
    height: usize,
    channels: usize,
    extent: GeoExtent,
}

impl SourceRaster {
    /// Create a source raster from decoded samples.
    ///
    /// `data.len()` must equal `width * height * channels`.
    pub fn new(
        data: Vec<f32>,
        width: usize,
        height: usize,
        channels: usize,
        extent: GeoExtent,
    ) -> Result<Self> {
        if width == 0 || height == 0 || channels == 0 {
            return Err(EngineError::source_unavailable(format!(
                "raster dimensions {}x{}x{} must be non-zero",
                width, height, channels
            )));
        }
        if data.len() != width * height * channels {
            return Err(EngineError::source_unavailable(format!(
                "sample count {} does not match {}x{}x{}",
                data.len(),
                width,
                height,
                channels
            )));
        }
        Ok(Self {
            data,
            width,
            height,
            channels,
            extent,
        })
    }

    /// Width in pixels.
    pub fn width(&self) -> usize {
        self.width
    }

    /// Height in pixels.
    pub fn height(&self) -> usize {
        self.height
    }

    /// Channels per pixel.
    pub fn channels(&self) -> usize {
        self.channels
    }

    /// Declared geographic extent.
    pub fn extent(&self) -> &GeoExtent {
        &self.extent
    }

    /// Whether the raster holds no samples.
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Sample resolution in degrees per pixel, (longitude, latitude).
    pub fn resolution(&self) -> (f64, f64) {
        (
            self.extent.lon_span() / self.width as f64,
            self.extent.lat_span() / self.height as f64,
        )
    }

    /// One channel of one pixel.
    #[inline]
    pub fn channel_at(&self, col: usize, row: usize, channel: usize) -> f32 {
        self.data[(row * self.width + col) * self.channels + channel]
    }

    /// Copy all channels of one pixel into `out`.
    #[inline]
    pub fn copy_pixel(&self, col: usize, row: usize, out: &mut [f32]) {
        let start = (row * self.width + col) * self.channels;
        out.copy_from_slice(&self.data[start..start + self.channels]);
    }
}

/// Parameters of one projected view.
///
/// Immutable once constructed; editing a parameter produces a new value so
/// instances can be compared cheaply and used verbatim as cache keys.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ProjectionParameters {
    /// Projection center latitude, degrees in [-90, 90].
    pub center_lat: f64,
    /// Projection center longitude, degrees in [-180, 180).
    pub center_lon: f64,
    /// Output raster width in pixels.
    pub output_width: usize,
    /// Output raster height in pixels.
    pub output_height: usize,
    /// Maximum angular distance from the center to render, degrees (0, 180].
    pub angular_radius: f64,
}

impl ProjectionParameters {
    /// Create new parameters.
    pub fn new(
        center_lat: f64,
        center_lon: f64,
        output_width: usize,
        output_height: usize,
        angular_radius: f64,
    ) -> Self {
        Self {
            center_lat,
            center_lon,
            output_width,
            output_height,
            angular_radius,
        }
    }

    /// A copy recentered on (`lat`, `lon`).
    pub fn with_center(&self, lat: f64, lon: f64) -> Self {
        Self {
            center_lat: lat,
            center_lon: lon,
            ..*self
        }
    }

    /// A copy with a different angular radius (zoom).
    pub fn with_angular_radius(&self, angular_radius: f64) -> Self {
        Self {
            angular_radius,
            ..*self
        }
    }

    /// Validate the parameter ranges.
    ///
    /// Rejection happens at this boundary so the projection math never
    /// sees malformed values.
    pub fn validate(&self) -> Result<()> {
        if !self.center_lat.is_finite() || !(-90.0..=90.0).contains(&self.center_lat) {
            return Err(EngineError::invalid_parameters(format!(
                "center latitude {} must be between -90 and 90 degrees",
                self.center_lat
            )));
        }
        if !self.center_lon.is_finite() || !(-180.0..180.0).contains(&self.center_lon) {
            return Err(EngineError::invalid_parameters(format!(
                "center longitude {} must be between -180 and 180 degrees",
                self.center_lon
            )));
        }
        if !self.angular_radius.is_finite()
            || self.angular_radius <= 0.0
            || self.angular_radius > 180.0
        {
            return Err(EngineError::invalid_parameters(format!(
                "angular radius {} must be within (0, 180] degrees",
                self.angular_radius
            )));
        }
        if self.output_width == 0 || self.output_height == 0 {
            return Err(EngineError::invalid_parameters(format!(
                "output dimensions {}x{} must be non-zero",
                self.output_width, self.output_height
            )));
        }
        Ok(())
    }
}

impl Default for ProjectionParameters {
    fn default() -> Self {
        // Full-sphere view of the prime meridian / equator intersection.
        Self {
            center_lat: 0.0,
            center_lon: 0.0,
            output_width: 720,
            output_height: 720,
            angular_radius: 180.0,
        }
    }
}

/// One rendered frame in the azimuthal-equidistant projection.
///
/// Same channel layout as the source raster. Pixels outside the rendered
/// angular radius carry NaN in every channel and a false mask bit; the mask
/// is the contract, the NaN fill is a convenience for consumers that blit
/// the samples directly.
#[derive(Debug, Clone)]
pub struct ProjectedRaster {
    data: Vec<f32>,
    mask: Vec<bool>,
    width: usize,
    height: usize,
    channels: usize,
}

impl ProjectedRaster {
    pub(crate) fn from_parts(
        data: Vec<f32>,
        mask: Vec<bool>,
        width: usize,
        height: usize,
        channels: usize,
    ) -> Self {
        debug_assert_eq!(data.len(), width * height * channels);
        debug_assert_eq!(mask.len(), width * height);
        Self {
            data,
            mask,
            width,
            height,
            channels,
        }
    }

    /// Width in pixels.
    pub fn width(&self) -> usize {
        self.width
    }

    /// Height in pixels.
    pub fn height(&self) -> usize {
        self.height
    }

    /// Channels per pixel.
    pub fn channels(&self) -> usize {
        self.channels
    }

    /// All samples, channel-interleaved, row-major.
    pub fn data(&self) -> &[f32] {
        &self.data
    }

    /// Per-pixel validity mask (true = valid sample).
    pub fn mask(&self) -> &[bool] {
        &self.mask
    }

    /// Whether the pixel holds a valid sample. Out-of-range coordinates
    /// count as no-data.
    pub fn is_valid(&self, x: usize, y: usize) -> bool {
        x < self.width && y < self.height && self.mask[y * self.width + x]
    }

    /// The channels of one pixel, or `None` for a no-data pixel.
    pub fn pixel(&self, x: usize, y: usize) -> Option<&[f32]> {
        if !self.is_valid(x, y) {
            return None;
        }
        let start = (y * self.width + x) * self.channels;
        Some(&self.data[start..start + self.channels])
    }

    /// Number of valid pixels.
    pub fn valid_count(&self) -> usize {
        self.mask.iter().filter(|&&v| v).count()
    }
}

/// Interpolation method for sampling the source raster.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Interpolation {
    /// Nearest neighbor (preserves exact values).
    Nearest,
    /// Bilinear interpolation (smooth, slight value changes).
    #[default]
    Bilinear,
}

impl Interpolation {
    /// Parse from string (case-insensitive); unknown values fall back to
    /// bilinear.
    pub fn from_str(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "nearest" => Self::Nearest,
            _ => Self::Bilinear,
        }
    }
}

impl std::fmt::Display for Interpolation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Nearest => write!(f, "nearest"),
            Self::Bilinear => write!(f, "bilinear"),
        }
    }
}

/// Statistics about a viewport cache.
#[derive(Debug, Clone, Default)]
pub struct CacheStats {
    pub hits: u64,
    pub misses: u64,
    pub evictions: u64,
    pub entries: usize,
}

impl CacheStats {
    /// Calculate the cache hit rate (0.0 - 1.0).
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }
}
