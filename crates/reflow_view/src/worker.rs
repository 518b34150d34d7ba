//! The layout and render worker threads.

use crate::pipeline::{PassOutcome, ViewCore};
use crate::queue::{LayoutLane, ReflowEvent, RepaintLane};
use anyhow::{Context as _, Result, anyhow};
use log::{debug, info, trace};
use std::sync::Arc;
use std::thread::{self, JoinHandle};

pub(crate) const LAYOUT_THREAD: &str = "reflow-layout";
pub(crate) const RENDER_THREAD: &str = "reflow-render";

/// Join handles of a running worker pair.
#[derive(Debug)]
pub(crate) struct Workers {
    layout: JoinHandle<()>,
    render: JoinHandle<()>,
}

impl Workers {
    /// Spawn both workers over `core`.
    ///
    /// # Errors
    ///
    /// Returns an error if either thread cannot be spawned. The other one is shut
    /// down before returning.
    pub(crate) fn spawn(
        core: &Arc<ViewCore>,
        layout_lane: LayoutLane,
        repaint_lane: RepaintLane,
    ) -> Result<Self> {
        let layout_core = Arc::clone(core);
        let layout = thread::Builder::new()
            .name(LAYOUT_THREAD.to_owned())
            .spawn(move || layout_loop(&layout_core, layout_lane))
            .with_context(|| format!("failed to spawn {LAYOUT_THREAD}"))?;

        let render_core = Arc::clone(core);
        let spawned = thread::Builder::new()
            .name(RENDER_THREAD.to_owned())
            .spawn(move || render_loop(&render_core, repaint_lane));
        match spawned {
            Ok(render) => {
                info!("Started {LAYOUT_THREAD} and {RENDER_THREAD}");
                Ok(Self { layout, render })
            }
            Err(err) => {
                core.queue.close();
                let _joined = layout.join();
                Err(anyhow!(err).context(format!("failed to spawn {RENDER_THREAD}")))
            }
        }
    }

    /// Wait for both workers to exit. The queue must already be closed.
    ///
    /// # Errors
    ///
    /// Returns an error naming every worker that panicked.
    pub(crate) fn join(self) -> Result<()> {
        let layout = self.layout.join();
        let render = self.render.join();
        match (layout.is_err(), render.is_err()) {
            (false, false) => Ok(()),
            (true, false) => Err(anyhow!("{LAYOUT_THREAD} panicked")),
            (false, true) => Err(anyhow!("{RENDER_THREAD} panicked")),
            (true, true) => Err(anyhow!("{LAYOUT_THREAD} and {RENDER_THREAD} panicked")),
        }
    }
}

/// Serve layout requests until the lane closes.
///
/// Requests are taken newest-first: everything already queued collapses into the
/// latest request, and a request whose epoch a pass has already covered is
/// skipped.
fn layout_loop(core: &ViewCore, mut lane: LayoutLane) {
    let mut served_epoch = 0_u64;
    while let Some(request) = lane.recv_latest() {
        if request.epoch <= served_epoch {
            trace!(
                "Skipping {:?} (epoch {}); already served {served_epoch}",
                request.event, request.epoch
            );
            continue;
        }
        debug!("Serving {:?} (epoch {})", request.event, request.epoch);
        let report = core.run_pass();
        if report.outcome != PassOutcome::Skipped {
            served_epoch = served_epoch.max(report.epoch);
        }
    }
    debug!("{LAYOUT_THREAD} exiting");
}

/// Forward completed layouts to the host as repaint requests.
fn render_loop(core: &ViewCore, mut lane: RepaintLane) {
    while let Some(event) = lane.recv() {
        match event {
            ReflowEvent::LayoutComplete => core.parts.host.request_repaint(),
            ReflowEvent::DocumentSet | ReflowEvent::CanvasResized(_) => {
                debug!("{RENDER_THREAD} ignoring {event:?}");
            }
        }
    }
    debug!("{RENDER_THREAD} exiting");
}
