//! Azimuthal-Equidistant Viewport Engine
//!
//! Converts an equirectangular raster of a planetary surface into
//! azimuthal-equidistant frames centered on an interactively chosen
//! latitude/longitude, for display on spherical hardware. This crate is the
//! projection/resampling core; windowing, configuration files and image
//! decoding live in the host application.
//!
//! # Architecture
//!
//! ```text
//! parameter change (typed coordinates, drag)
//!      │
//!      ▼
//! UpdateController::submit(params)
//!      │
//!      ├─► coalesce while a pass is in flight (latest wins)
//!      │
//!      └─► ViewportCache::get_or_compute
//!               │
//!               ├─► cache hit: return the stored frame
//!               │
//!               └─► cache miss: render()
//!                        │
//!                        ├─► AzimuthalEquidistant inverse per pixel
//!                        │
//!                        └─► sample_into() against the source raster
//!               │
//!               ▼
//!          FrameUpdate delivered to the view
//! ```
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use sphere_common::GeoExtent;
//! use view_engine::{Interpolation, ProjectionParameters, SourceRaster, UpdateController};
//!
//! # async fn run() -> view_engine::Result<()> {
//! let source = Arc::new(SourceRaster::new(
//!     vec![0.0; 360 * 180],
//!     360,
//!     180,
//!     1,
//!     GeoExtent::global(),
//! )?);
//!
//! let (controller, mut frames) = UpdateController::new(source, Interpolation::Bilinear);
//! controller.submit(ProjectionParameters::default())?;
//!
//! if let Some(update) = frames.recv().await {
//!     // hand update.raster to the display layer
//! }
//! # Ok(())
//! # }
//! ```

pub mod cache;
pub mod config;
pub mod controller;
pub mod error;
pub mod render;
pub mod resample;
pub mod sweep;
pub mod types;

// Re-export commonly used types at crate root
pub use cache::{CacheEntry, ViewportCache};
pub use config::ViewEngineConfig;
pub use controller::{FrameUpdate, RenderBackend, UpdateController};
pub use error::{EngineError, Result};
pub use render::render;
pub use resample::sample_into;
pub use sweep::{render_sweep, CenterGrid};
pub use types::{
    CacheStats, Interpolation, ProjectedRaster, ProjectionParameters, SourceRaster,
};
