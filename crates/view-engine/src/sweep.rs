//! Batch precomputation of frames over a grid of projection centers.
//!
//! For installations that swap frames rather than rendering live, the whole
//! grid of centers (every `step` degrees within the configured bounds) is
//! rendered up front. Centers are independent, so the sweep fans out across
//! a worker pool sized by the operator.

use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use sphere_common::normalize_lon;
use tracing::info;

use crate::error::{EngineError, Result};
use crate::render::render;
use crate::types::{Interpolation, ProjectedRaster, ProjectionParameters, SourceRaster};

/// Grid of projection centers: every `step` degrees of latitude and
/// longitude within the bounds, inclusive of both ends where the step
/// divides the span.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CenterGrid {
    pub lat_min: f64,
    pub lat_max: f64,
    pub lon_min: f64,
    pub lon_max: f64,
    pub step: f64,
}

impl CenterGrid {
    /// Create a validated grid.
    pub fn new(lat_min: f64, lat_max: f64, lon_min: f64, lon_max: f64, step: f64) -> Result<Self> {
        let grid = Self {
            lat_min,
            lat_max,
            lon_min,
            lon_max,
            step,
        };
        grid.validate()?;
        Ok(grid)
    }

    /// Validate bounds and step.
    pub fn validate(&self) -> Result<()> {
        if !(self.lat_min < self.lat_max) {
            return Err(EngineError::invalid_parameters(format!(
                "minimum latitude {} must be less than maximum latitude {}",
                self.lat_min, self.lat_max
            )));
        }
        if !(self.lon_min < self.lon_max) {
            return Err(EngineError::invalid_parameters(format!(
                "minimum longitude {} must be less than maximum longitude {}",
                self.lon_min, self.lon_max
            )));
        }
        for lat in [self.lat_min, self.lat_max] {
            if !(-90.0..=90.0).contains(&lat) {
                return Err(EngineError::invalid_parameters(format!(
                    "latitude bound {} must be between -90 and 90 degrees",
                    lat
                )));
            }
        }
        if !(self.step > 0.0) || !self.step.is_finite() {
            return Err(EngineError::invalid_parameters(format!(
                "step {} must be a positive number of degrees",
                self.step
            )));
        }
        Ok(())
    }

    /// Latitudes of the grid, south to north.
    pub fn latitudes(&self) -> Vec<f64> {
        Self::steps(self.lat_min, self.lat_max, self.step)
    }

    /// Longitudes of the grid, west to east.
    pub fn longitudes(&self) -> Vec<f64> {
        Self::steps(self.lon_min, self.lon_max, self.step)
    }

    /// Total number of centers.
    pub fn len(&self) -> usize {
        self.latitudes().len() * self.longitudes().len()
    }

    /// Whether the grid holds no centers.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Step from a grid index by whole-cell deltas, wrapping at the edges
    /// on both axes — dragging past the last column continues at the
    /// first, and likewise for rows.
    pub fn neighbor(
        &self,
        lon_idx: usize,
        lat_idx: usize,
        dlon: i64,
        dlat: i64,
    ) -> (usize, usize) {
        let lon_count = self.longitudes().len() as i64;
        let lat_count = self.latitudes().len() as i64;
        (
            (lon_idx as i64 + dlon).rem_euclid(lon_count) as usize,
            (lat_idx as i64 + dlat).rem_euclid(lat_count) as usize,
        )
    }

    fn steps(min: f64, max: f64, step: f64) -> Vec<f64> {
        // Inclusive of max when the step divides the span exactly (within
        // float tolerance).
        let count = ((max - min) / step + 1e-9).floor() as usize + 1;
        (0..count).map(|i| min + i as f64 * step).collect()
    }
}

/// Render one frame for every center of the grid.
///
/// `workers` sizes a dedicated pool for the sweep; 0 uses one worker per
/// core. Parameters are validated for every center before any rendering
/// starts — a sweep either fails up front or produces the full set.
pub fn render_sweep(
    source: &SourceRaster,
    grid: &CenterGrid,
    output_size: (usize, usize),
    angular_radius: f64,
    interpolation: Interpolation,
    workers: usize,
) -> Result<Vec<(ProjectionParameters, ProjectedRaster)>> {
    grid.validate()?;

    let latitudes = grid.latitudes();
    let centers: Vec<ProjectionParameters> = grid
        .longitudes()
        .iter()
        .flat_map(|&lon| {
            latitudes.iter().map(move |&lat| {
                ProjectionParameters::new(
                    lat,
                    normalize_lon(lon),
                    output_size.0,
                    output_size.1,
                    angular_radius,
                )
            })
        })
        .collect();

    for params in &centers {
        params.validate()?;
    }

    info!(
        centers = centers.len(),
        width = output_size.0,
        height = output_size.1,
        workers,
        "starting projection sweep"
    );

    let run = || {
        centers
            .par_iter()
            .map(|params| render(source, params, interpolation).map(|frame| (*params, frame)))
            .collect::<Result<Vec<_>>>()
    };

    let frames = if workers == 0 {
        run()?
    } else {
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(workers)
            .build()
            .map_err(|err| EngineError::WorkerPool(err.to_string()))?;
        pool.install(run)?
    };

    info!(centers = frames.len(), "projection sweep complete");
    Ok(frames)
}
