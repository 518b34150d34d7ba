//! State shared by the controller and its workers, and the layout pass itself.

use crate::config::ViewConfig;
use crate::fit::{self, FitInput};
use crate::host::{HostViewport, PageInfo, ScrollMode};
use crate::interaction::InteractionState;
use crate::listeners::DocumentListeners;
use crate::queue::{LayoutRequest, ReflowEvent, ReflowQueue};
use crate::root_slot::{PassGeometry, PassTicket, RootSlot};
use core::sync::atomic::{AtomicUsize, Ordering};
use log::{debug, error, trace};
use reflow_layout::{BoxBuilder, LayoutContext, Rect, Size, TopLevelNode};
use reflow_style::{CascadeResolver, FontMetricsProvider};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tracing::info_span;

/// How a layout pass ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PassOutcome {
    /// Nothing to lay out: no paint surface or no document.
    Skipped,
    /// Stopped before publishing; the previous tree stays.
    Cancelled,
    /// A new tree was published.
    Completed,
}

/// Result of one pass and the request epoch it covered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PassReport {
    pub outcome: PassOutcome,
    /// Zero when the pass was skipped before it started.
    pub epoch: u64,
}

/// Number of passes per outcome since the controller was created.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PassCounts {
    pub completed: usize,
    pub cancelled: usize,
    pub skipped: usize,
}

#[derive(Debug, Default)]
struct PassStats {
    completed: AtomicUsize,
    cancelled: AtomicUsize,
    skipped: AtomicUsize,
}

impl PassStats {
    fn record(&self, outcome: PassOutcome) {
        let counter = match outcome {
            PassOutcome::Completed => &self.completed,
            PassOutcome::Cancelled => &self.cancelled,
            PassOutcome::Skipped => &self.skipped,
        };
        counter.fetch_add(1, Ordering::Relaxed);
    }

    fn snapshot(&self) -> PassCounts {
        PassCounts {
            completed: self.completed.load(Ordering::Relaxed),
            cancelled: self.cancelled.load(Ordering::Relaxed),
            skipped: self.skipped.load(Ordering::Relaxed),
        }
    }
}

/// Collaborators the view is built from.
#[derive(Clone)]
pub struct ViewParts {
    pub host: Arc<dyn HostViewport>,
    pub builder: Arc<dyn BoxBuilder>,
    pub cascade: Arc<dyn CascadeResolver>,
    pub fonts: Arc<dyn FontMetricsProvider>,
}

pub(crate) struct ViewCore {
    pub(crate) config: ViewConfig,
    pub(crate) parts: ViewParts,
    pub(crate) slot: RootSlot,
    pub(crate) queue: ReflowQueue,
    pub(crate) listeners: DocumentListeners,
    page_info: Mutex<Option<PageInfo>>,
    /// Default mode of the attached scroll container; `None` when detached.
    scroll_container: Mutex<Option<ScrollMode>>,
    pub(crate) interaction: Mutex<InteractionState>,
    stats: PassStats,
}

fn locked<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

impl ViewCore {
    pub(crate) fn new(config: ViewConfig, parts: ViewParts, queue: ReflowQueue) -> Self {
        Self {
            config,
            parts,
            slot: RootSlot::new(),
            queue,
            listeners: DocumentListeners::new(),
            page_info: Mutex::new(None),
            scroll_container: Mutex::new(None),
            interaction: Mutex::new(InteractionState::default()),
            stats: PassStats::default(),
        }
    }

    pub(crate) fn page_info(&self) -> Option<PageInfo> {
        *locked(&self.page_info)
    }

    pub(crate) fn set_page_info(&self, page_info: Option<PageInfo>) {
        *locked(&self.page_info) = page_info;
    }

    pub(crate) fn set_scroll_container(&self, attached: bool) {
        let mode = attached.then(|| self.parts.host.default_scroll_mode());
        *locked(&self.scroll_container) = mode;
    }

    fn scroll_container(&self) -> Option<ScrollMode> {
        *locked(&self.scroll_container)
    }

    /// Visible area when the canvas sits in an attached scroll container.
    pub(crate) fn enclosed_viewport(&self) -> Option<Size> {
        self.scroll_container()
            .and_then(|_| self.parts.host.visible_size())
    }

    /// Area a pass lays out against.
    pub(crate) fn base_extents(&self, requested_size: Option<Size>) -> Size {
        if let Some(page) = self.page_info() {
            return page.content_size();
        }
        requested_size
            .or_else(|| self.enclosed_viewport())
            .unwrap_or_else(|| self.parts.host.canvas_size())
    }

    pub(crate) fn pass_counts(&self) -> PassCounts {
        self.stats.snapshot()
    }

    /// Register a layout request with the slot and hand it to the layout worker.
    pub(crate) fn dispatch(&self, event: ReflowEvent) {
        let resize = match event {
            ReflowEvent::CanvasResized(size) => Some(size),
            ReflowEvent::DocumentSet | ReflowEvent::LayoutComplete => None,
        };
        let epoch = self.slot.dispatch(resize);
        self.queue.push_layout(LayoutRequest { epoch, event });
    }

    /// Run one layout pass and publish its tree unless it is cancelled.
    pub(crate) fn run_pass(&self) -> PassReport {
        let _span = info_span!("reflow.layout_pass").entered();
        if !self.parts.host.has_paint_surface() {
            debug!("No paint surface; skipping layout");
            return self.report(PassOutcome::Skipped, 0);
        }
        let Some(ticket) = self.slot.begin_pass() else {
            debug!("No document; skipping layout");
            return self.report(PassOutcome::Skipped, 0);
        };

        let outcome = self.layout_document(&ticket);
        if outcome != PassOutcome::Completed {
            self.slot.end_pass(&ticket.stop);
        }
        self.report(outcome, ticket.epoch)
    }

    fn report(&self, outcome: PassOutcome, epoch: u64) -> PassReport {
        self.stats.record(outcome);
        PassReport { outcome, epoch }
    }

    fn layout_document(&self, ticket: &PassTicket) -> PassOutcome {
        let host = &self.parts.host;
        let extents = self.base_extents(ticket.requested_size);
        let mut ctx = LayoutContext::new(
            Rect::from_size(extents),
            ticket.stop.clone(),
            Arc::clone(&self.parts.cascade),
            Arc::clone(&self.parts.fonts),
        )
        .with_dpi(self.config.dpi)
        .with_print(self.page_info().is_some());
        let top_level = TopLevelNode::new(Arc::clone(&ticket.document));
        debug!(
            "Layout pass for epoch {} at {}x{}",
            ticket.epoch, extents.width, extents.height
        );

        let mut root_box = self.parts.builder.pre_layout(&mut ctx, &top_level);
        if ctx.should_stop() {
            trace!("Layout pass cancelled after box generation");
            return PassOutcome::Cancelled;
        }
        self.parts
            .builder
            .real_layout(&mut ctx, &mut root_box, &top_level);
        if !ctx.is_styles_all_popped() {
            error!("Mismatch in style popping and pushing; publishing the tree anyway");
        }
        if ctx.should_stop() {
            trace!("Layout pass cancelled during layout");
            return PassOutcome::Cancelled;
        }

        let layer = Arc::clone(root_box.layer());
        let offset = layer.max_offset();
        let fit = fit::plan(FitInput {
            canvas: host.canvas_size(),
            visible: self.enclosed_viewport(),
            intrinsic: Size::new(offset.x, offset.y),
            fixed_content: layer.contains_fixed_content(),
            default_scroll_mode: self.scroll_container().unwrap_or_default(),
        });
        if let Some(height) = fit.stretch_to {
            fit::stretch_document(&mut root_box, height);
        }

        let geometry = PassGeometry {
            render_width: extents.width,
            intrinsic: fit.intrinsic,
        };
        if !self.slot.publish(&ticket.stop, Arc::new(root_box), geometry) {
            trace!("Layout pass cancelled before publishing");
            return PassOutcome::Cancelled;
        }
        debug!(
            "Published layout for epoch {}: {}x{}",
            ticket.epoch, fit.intrinsic.width, fit.intrinsic.height
        );

        // Only a published pass may touch the host.
        host.set_opaque(fit.opaque);
        for size in &fit.preferred_sizes {
            host.set_preferred_size(*size);
        }
        if let Some(mode) = fit.scroll_mode {
            host.set_scroll_mode(mode);
        }
        if self.config.use_threads {
            self.queue.push_repaint(ReflowEvent::LayoutComplete);
        }
        self.listeners.notify_loaded();
        PassOutcome::Completed
    }
}
