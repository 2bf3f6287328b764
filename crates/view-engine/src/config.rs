//! Configuration for the view engine.

use serde::{Deserialize, Serialize};

use crate::types::{Interpolation, ProjectionParameters};

/// Configuration for view rendering.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ViewEngineConfig {
    /// Interpolation used when sampling the source raster.
    pub interpolation: Interpolation,

    /// Worker threads for sweep rendering (0 = one per core).
    pub sweep_workers: usize,

    /// Output raster width for new views, pixels.
    pub output_width: usize,

    /// Output raster height for new views, pixels.
    pub output_height: usize,

    /// Maximum angular distance from the center to render, degrees.
    pub angular_radius: f64,
}

impl Default for ViewEngineConfig {
    fn default() -> Self {
        Self {
            interpolation: Interpolation::Bilinear,
            sweep_workers: 0,
            output_width: 720,
            output_height: 720,
            angular_radius: 180.0,
        }
    }
}

impl ViewEngineConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(val) = std::env::var("VIEW_INTERPOLATION") {
            config.interpolation = Interpolation::from_str(&val);
        }

        if let Ok(val) = std::env::var("VIEW_SWEEP_WORKERS") {
            if let Ok(workers) = val.parse() {
                config.sweep_workers = workers;
            }
        }

        if let Ok(val) = std::env::var("VIEW_OUTPUT_WIDTH") {
            if let Ok(width) = val.parse() {
                config.output_width = width;
            }
        }

        if let Ok(val) = std::env::var("VIEW_OUTPUT_HEIGHT") {
            if let Ok(height) = val.parse() {
                config.output_height = height;
            }
        }

        if let Ok(val) = std::env::var("VIEW_ANGULAR_RADIUS") {
            if let Ok(radius) = val.parse() {
                config.angular_radius = radius;
            }
        }

        config
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<(), String> {
        if self.output_width == 0 || self.output_height == 0 {
            return Err("output dimensions must be > 0".to_string());
        }
        if !(self.angular_radius > 0.0 && self.angular_radius <= 180.0) {
            return Err("angular_radius must be within (0, 180]".to_string());
        }
        Ok(())
    }

    /// Projection parameters for a view centered at (`lat`, `lon`).
    pub fn parameters(&self, center_lat: f64, center_lon: f64) -> ProjectionParameters {
        ProjectionParameters::new(
            center_lat,
            center_lon,
            self.output_width,
            self.output_height,
            self.angular_radius,
        )
    }
}
