//! Single-slot cache of the most recently rendered frame.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

use tracing::debug;

use crate::error::Result;
use crate::render::render;
use crate::types::{CacheStats, Interpolation, ProjectedRaster, ProjectionParameters, SourceRaster};

/// One cached frame paired with the parameters that produced it.
#[derive(Debug, Clone)]
pub struct CacheEntry {
    pub params: ProjectionParameters,
    pub raster: Arc<ProjectedRaster>,
    /// Monotonically increasing across entries stored in this cache.
    pub generation: u64,
}

/// Caches the most recent frame for one view.
///
/// Keyed by structural equality on `ProjectionParameters`: parameters are
/// immutable and used verbatim as the key, and the source raster never
/// changes during a session, so a hit is always the correct result — no
/// time- or content-based invalidation exists. One view holds one slot;
/// detached views each hold their own `ViewportCache` rather than widening
/// a shared key space (which would grow without bound as the user scrubs).
pub struct ViewportCache {
    slot: Mutex<Option<CacheEntry>>,
    generation: AtomicU64,
    hits: AtomicU64,
    misses: AtomicU64,
    evictions: AtomicU64,
}

impl ViewportCache {
    /// Create an empty cache.
    pub fn new() -> Self {
        Self {
            slot: Mutex::new(None),
            generation: AtomicU64::new(0),
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
            evictions: AtomicU64::new(0),
        }
    }

    /// Return the cached frame for `params`, rendering it on a miss.
    ///
    /// The slot lock is never held across the render itself; only lookup
    /// and insert are serialized. A failed render leaves the previous
    /// entry in place.
    pub fn get_or_compute(
        &self,
        source: &SourceRaster,
        params: &ProjectionParameters,
        interpolation: Interpolation,
    ) -> Result<Arc<ProjectedRaster>> {
        if let Some(raster) = self.lookup(params) {
            return Ok(raster);
        }

        let raster = Arc::new(render(source, params, interpolation)?);
        self.insert(*params, Arc::clone(&raster));
        Ok(raster)
    }

    /// Return the cached frame if its parameters structurally equal
    /// `params`.
    pub fn lookup(&self, params: &ProjectionParameters) -> Option<Arc<ProjectedRaster>> {
        let slot = self.slot.lock().unwrap();
        match slot.as_ref() {
            Some(entry) if entry.params == *params => {
                self.hits.fetch_add(1, Ordering::Relaxed);
                debug!(generation = entry.generation, "viewport cache hit");
                Some(Arc::clone(&entry.raster))
            }
            _ => {
                self.misses.fetch_add(1, Ordering::Relaxed);
                None
            }
        }
    }

    /// Store a frame, evicting the previous entry for this view.
    fn insert(&self, params: ProjectionParameters, raster: Arc<ProjectedRaster>) {
        let generation = self.generation.fetch_add(1, Ordering::Relaxed) + 1;
        let mut slot = self.slot.lock().unwrap();
        if slot.take().is_some() {
            self.evictions.fetch_add(1, Ordering::Relaxed);
        }
        *slot = Some(CacheEntry {
            params,
            raster,
            generation,
        });
    }

    /// The current entry, if any.
    pub fn entry(&self) -> Option<CacheEntry> {
        self.slot.lock().unwrap().clone()
    }

    /// Drop the cached frame.
    pub fn clear(&self) {
        if self.slot.lock().unwrap().take().is_some() {
            self.evictions.fetch_add(1, Ordering::Relaxed);
        }
    }

    /// Cache statistics.
    pub fn stats(&self) -> CacheStats {
        CacheStats {
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
            evictions: self.evictions.load(Ordering::Relaxed),
            entries: usize::from(self.slot.lock().unwrap().is_some()),
        }
    }
}

impl Default for ViewportCache {
    fn default() -> Self {
        Self::new()
    }
}
