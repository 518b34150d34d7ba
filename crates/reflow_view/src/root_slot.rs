//! The shared reference to the published box tree.
//!
//! One mutex guards the current document, the published root, the stop token of
//! the pass currently running, the request epoch and the latest requested viewport
//! size. Dispatching a request stops the running pass in the same critical section
//! that bumps the epoch, and publishing checks the pass's token in the same
//! critical section that swaps the root, so a superseded pass never publishes.

use core::fmt;
use log::trace;
use reflow_layout::{Document, Layer, LayoutBox, Size, StopToken};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

/// Geometry the last published pass ran with.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PassGeometry {
    /// Width the pass laid out against.
    pub render_width: i32,
    /// Extent of the laid out content after viewport fitting.
    pub intrinsic: Size,
}

#[derive(Default)]
struct SlotState {
    document: Option<Arc<dyn Document>>,
    root: Option<Arc<LayoutBox>>,
    geometry: PassGeometry,
    active: Option<StopToken>,
    epoch: u64,
    requested_size: Option<Size>,
}

impl SlotState {
    fn stop_active(&mut self) {
        if let Some(active) = self.active.take() {
            trace!("Stopping the running pass at epoch {}", self.epoch);
            active.stop();
        }
    }
}

/// What a starting pass needs from the slot.
#[derive(Clone)]
pub struct PassTicket {
    pub stop: StopToken,
    /// Newest request epoch this pass covers.
    pub epoch: u64,
    /// Latest size requested through a resize, if any.
    pub requested_size: Option<Size>,
    /// Document the pass lays out.
    pub document: Arc<dyn Document>,
}

impl fmt::Debug for PassTicket {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter
            .debug_struct("PassTicket")
            .field("stop", &self.stop)
            .field("epoch", &self.epoch)
            .field("requested_size", &self.requested_size)
            .field("root", &self.document.root())
            .finish()
    }
}

#[derive(Default)]
pub struct RootSlot {
    state: Mutex<SlotState>,
}

impl fmt::Debug for RootSlot {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.state();
        formatter
            .debug_struct("RootSlot")
            .field("has_document", &state.document.is_some())
            .field("published", &state.root.is_some())
            .field("running", &state.active.is_some())
            .field("epoch", &state.epoch)
            .finish_non_exhaustive()
    }
}

impl RootSlot {
    pub fn new() -> Self {
        Self::default()
    }

    fn state(&self) -> MutexGuard<'_, SlotState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Snapshot of the published tree.
    pub fn root(&self) -> Option<Arc<LayoutBox>> {
        self.state().root.clone()
    }

    /// Layer of the published root box.
    pub fn root_layer(&self) -> Option<Arc<Layer>> {
        self.state()
            .root
            .as_ref()
            .map(|root| Arc::clone(root.layer()))
    }

    pub fn geometry(&self) -> PassGeometry {
        self.state().geometry
    }

    pub fn clear(&self) {
        self.state().root = None;
    }

    pub fn has_document(&self) -> bool {
        self.state().document.is_some()
    }

    /// Take the document away: stop the running pass, drop the published tree and
    /// bump the epoch. Passes starting before [`Self::attach_document`] are skipped.
    pub fn detach_document(&self) {
        let mut state = self.state();
        state.epoch = state.epoch.wrapping_add(1);
        state.stop_active();
        state.document = None;
        state.root = None;
    }

    pub fn attach_document(&self, document: Arc<dyn Document>) {
        self.state().document = Some(document);
    }

    /// Latest size requested through a resize.
    pub fn requested_size(&self) -> Option<Size> {
        self.state().requested_size
    }

    pub fn epoch(&self) -> u64 {
        self.state().epoch
    }

    /// Register a new layout request and stop the running pass. Returns the epoch
    /// to stamp the request with.
    pub fn dispatch(&self, resize: Option<Size>) -> u64 {
        let mut state = self.state();
        state.epoch = state.epoch.wrapping_add(1);
        if let Some(size) = resize {
            state.requested_size = Some(size);
        }
        state.stop_active();
        state.epoch
    }

    /// Install a fresh stop token for a new pass, stopping any previous one.
    /// `None` when no document is attached; nothing changes then.
    pub fn begin_pass(&self) -> Option<PassTicket> {
        let mut state = self.state();
        let document = state.document.clone()?;
        state.stop_active();
        let stop = StopToken::new();
        state.active = Some(stop.clone());
        Some(PassTicket {
            stop,
            epoch: state.epoch,
            requested_size: state.requested_size,
            document,
        })
    }

    /// Finalize the positions of `root` and publish it, unless the pass holding
    /// `stop` was cancelled. Returns whether the tree was published.
    pub fn publish(&self, stop: &StopToken, root: Arc<LayoutBox>, geometry: PassGeometry) -> bool {
        let mut state = self.state();
        if stop.is_stopped() {
            return false;
        }
        root.layer().finalize_positions();
        state.root = Some(root);
        state.geometry = geometry;
        if state.active.as_ref().is_some_and(|active| active.same_as(stop)) {
            state.active = None;
        }
        true
    }

    /// Forget the token of a pass that ended without publishing.
    pub fn end_pass(&self, stop: &StopToken) {
        let mut state = self.state();
        if state.active.as_ref().is_some_and(|active| active.same_as(stop)) {
            state.active = None;
        }
    }

    /// Stop the running pass, if any.
    pub fn cancel_active(&self) {
        self.state().stop_active();
    }
}
