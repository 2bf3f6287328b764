//! Update controller: serializes parameter changes into render passes.
//!
//! One controller owns one view. Requests are coalesced latest-wins: edits
//! arriving while a pass is in flight overwrite a single pending slot
//! instead of queueing, so a mouse drag can never build a backlog of stale
//! recomputes. A pass whose parameters were superseded has its result
//! discarded on completion — consumers never see an older center arrive
//! after a newer one.

use std::sync::{Arc, Mutex};

use tokio::sync::mpsc;
use tracing::{debug, warn};

use crate::cache::ViewportCache;
use crate::error::{EngineError, Result};
use crate::types::{Interpolation, ProjectedRaster, ProjectionParameters, SourceRaster};

/// Source of rendered frames for a controller.
///
/// `ViewportCache` is the production implementation; tests substitute a
/// backend that gates completion to exercise the coalescing logic
/// deterministically.
pub trait RenderBackend: Send + Sync + 'static {
    fn render_frame(
        &self,
        source: &SourceRaster,
        params: &ProjectionParameters,
        interpolation: Interpolation,
    ) -> Result<Arc<ProjectedRaster>>;
}

impl RenderBackend for ViewportCache {
    fn render_frame(
        &self,
        source: &SourceRaster,
        params: &ProjectionParameters,
        interpolation: Interpolation,
    ) -> Result<Arc<ProjectedRaster>> {
        self.get_or_compute(source, params, interpolation)
    }
}

/// A finished frame delivered to the owning view.
#[derive(Debug, Clone)]
pub struct FrameUpdate {
    /// Submission order of the request that produced this frame.
    pub request_id: u64,
    pub params: ProjectionParameters,
    pub raster: Arc<ProjectedRaster>,
}

#[derive(Debug, Clone, Copy)]
struct Request {
    id: u64,
    params: ProjectionParameters,
}

#[derive(Debug, Default)]
struct State {
    computing: bool,
    pending: Option<Request>,
    next_request_id: u64,
}

struct Inner<B> {
    backend: B,
    source: Arc<SourceRaster>,
    interpolation: Interpolation,
    state: Mutex<State>,
    delivery: mpsc::UnboundedSender<FrameUpdate>,
}

/// Drives recomputation for one view.
///
/// `submit` must be called from within a tokio runtime; the render itself
/// runs on the blocking pool so the event side stays responsive.
pub struct UpdateController<B: RenderBackend = ViewportCache> {
    inner: Arc<Inner<B>>,
}

impl UpdateController<ViewportCache> {
    /// Create a controller with its own viewport cache.
    pub fn new(
        source: Arc<SourceRaster>,
        interpolation: Interpolation,
    ) -> (Self, mpsc::UnboundedReceiver<FrameUpdate>) {
        Self::with_backend(source, ViewportCache::new(), interpolation)
    }
}

impl<B: RenderBackend> UpdateController<B> {
    /// Create a controller over an explicit backend.
    pub fn with_backend(
        source: Arc<SourceRaster>,
        backend: B,
        interpolation: Interpolation,
    ) -> (Self, mpsc::UnboundedReceiver<FrameUpdate>) {
        let (delivery, receiver) = mpsc::unbounded_channel();
        let controller = Self {
            inner: Arc::new(Inner {
                backend,
                source,
                interpolation,
                state: Mutex::new(State::default()),
                delivery,
            }),
        };
        (controller, receiver)
    }

    /// The backend frames are rendered through.
    pub fn backend(&self) -> &B {
        &self.inner.backend
    }

    /// Whether no pass is in flight.
    pub fn is_idle(&self) -> bool {
        !self.inner.state.lock().unwrap().computing
    }

    /// Submit a parameter change for this view.
    ///
    /// Malformed parameters and an empty source are rejected here, at the
    /// request boundary, and reported to the caller; the view keeps
    /// displaying its previous frame. A valid request either starts a pass
    /// immediately or replaces the pending one (latest wins).
    pub fn submit(&self, params: ProjectionParameters) -> Result<()> {
        params.validate()?;
        if self.inner.source.is_empty() {
            return Err(EngineError::source_unavailable(
                "source raster has no samples",
            ));
        }

        let request = {
            let mut state = self.inner.state.lock().unwrap();
            let id = state.next_request_id;
            state.next_request_id += 1;
            let request = Request { id, params };

            if state.computing {
                if let Some(stale) = state.pending.replace(request) {
                    debug!(request_id = stale.id, "coalesced pending request");
                }
                return Ok(());
            }
            state.computing = true;
            request
        };

        self.spawn_pass(request);
        Ok(())
    }

    /// Run passes until no request is pending, delivering only results
    /// that were not superseded while they computed.
    fn spawn_pass(&self, first: Request) {
        let inner = Arc::clone(&self.inner);
        tokio::spawn(async move {
            let mut request = first;
            loop {
                let render_inner = Arc::clone(&inner);
                let params = request.params;
                let joined = tokio::task::spawn_blocking(move || {
                    render_inner.backend.render_frame(
                        &render_inner.source,
                        &params,
                        render_inner.interpolation,
                    )
                })
                .await;

                let mut state = inner.state.lock().unwrap();
                if let Some(pending) = state.pending.take() {
                    drop(state);
                    debug!(
                        superseded = request.id,
                        request_id = pending.id,
                        "discarding superseded frame"
                    );
                    request = pending;
                    continue;
                }

                match joined {
                    Ok(Ok(raster)) => {
                        let update = FrameUpdate {
                            request_id: request.id,
                            params: request.params,
                            raster,
                        };
                        if inner.delivery.send(update).is_err() {
                            debug!(request_id = request.id, "view closed; dropping frame");
                        }
                    }
                    Ok(Err(err)) => {
                        warn!(request_id = request.id, error = %err, "render pass failed");
                    }
                    Err(err) => {
                        warn!(request_id = request.id, error = %err, "render task aborted");
                    }
                }

                state.computing = false;
                break;
            }
        });
    }
}
