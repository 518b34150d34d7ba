//! The view a host widget embeds.
//!
//! `ViewportController` owns the published box tree and routes document and
//! viewport changes to the layout worker. With threads disabled in
//! [`ViewConfig`] it spawns nothing and the host drives layout itself by calling
//! [`ViewportController::layout_now`], typically from its paint handler.

use crate::config::ViewConfig;
use crate::host::PageInfo;
use crate::interaction::InteractionState;
use crate::listeners::{DocumentListener, ListenerId};
use crate::pipeline::{PassCounts, PassOutcome, ViewCore, ViewParts};
use crate::queue::{ReflowEvent, ReflowQueue};
use crate::worker::Workers;
use anyhow::Result;
use log::{debug, error, info, trace};
use reflow_layout::{Document, Layer, LayoutBox, Rect, Size};
use reflow_style::{DocumentContext, Media, NodeKey};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

pub struct ViewportController {
    core: Arc<ViewCore>,
    workers: Mutex<Option<Workers>>,
}

impl ViewportController {
    /// Create the view and, when configured, start its workers.
    ///
    /// # Errors
    ///
    /// Returns an error if a worker thread cannot be spawned.
    pub fn new(config: ViewConfig, parts: ViewParts) -> Result<Self> {
        let (queue, layout_lane, repaint_lane) = ReflowQueue::new();
        let use_threads = config.use_threads;
        let core = Arc::new(ViewCore::new(config, parts, queue));
        let workers = if use_threads {
            Some(Workers::spawn(&core, layout_lane, repaint_lane)?)
        } else {
            core.queue.close();
            None
        };
        Ok(Self {
            core,
            workers: Mutex::new(workers),
        })
    }

    /// Attach a new document and schedule its first layout.
    ///
    /// Stops any pass over the previous document and drops its tree before the
    /// cascade is flushed and pointed at `base_url`, with `print` media when a page
    /// is set and `screen` otherwise. Passes starting before the new document is
    /// attached are skipped.
    pub fn set_document(&self, document: Arc<dyn Document>, base_url: &str) {
        let parts = &self.core.parts;
        self.core.slot.detach_document();
        parts.host.reset_scroll_position();
        self.interaction().clear();

        if self.core.config.cache_stylesheets {
            parts.cascade.flush_style_sheets();
        } else {
            parts.cascade.flush_all_style_sheets();
        }
        let media = if self.is_print_view() {
            Media::Print
        } else {
            Media::Screen
        };
        parts.cascade.set_document_context(&DocumentContext {
            base_url: base_url.to_owned(),
            media,
        });
        self.core.slot.attach_document(document);
        info!("Document set ({base_url}, {})", media.as_str());

        if self.core.config.use_threads {
            self.core.dispatch(ReflowEvent::DocumentSet);
        } else {
            parts.host.request_repaint();
        }
    }

    /// The viewport changed size; lay out again against `size`.
    ///
    /// Supersedes a pass that is still running. Ignored until a document is set.
    pub fn canvas_resized(&self, size: Size) {
        if !self.core.slot.has_document() {
            trace!(
                "Resize to {}x{} before any document; ignoring",
                size.width, size.height
            );
            return;
        }
        if self.core.config.use_threads {
            self.core.dispatch(ReflowEvent::CanvasResized(size));
        } else {
            self.core.slot.clear();
        }
    }

    /// Run a layout pass on the calling thread.
    pub fn layout_now(&self) -> PassOutcome {
        self.core.run_pass().outcome
    }

    /// Cancel any running pass, stop both workers and wait for them.
    ///
    /// Idempotent.
    ///
    /// # Errors
    ///
    /// Returns an error if a worker panicked.
    pub fn shutdown(&self) -> Result<()> {
        self.core.slot.cancel_active();
        self.core.queue.close();
        let workers = self
            .workers
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
        match workers {
            Some(workers) => {
                debug!("Joining view workers");
                workers.join()
            }
            None => Ok(()),
        }
    }

    /// Published tree; `None` until a pass completes for the current document.
    pub fn root_box(&self) -> Option<Arc<LayoutBox>> {
        self.core.slot.root()
    }

    /// Root stacking layer of the published tree.
    pub fn root_layer(&self) -> Option<Arc<Layer>> {
        self.core.slot.root_layer()
    }

    /// Content extent of the published tree, after viewport fitting.
    pub fn intrinsic_size(&self) -> Size {
        self.core.slot.geometry().intrinsic
    }

    /// Area the next pass lays out against.
    ///
    /// The page content area in print view, otherwise the last requested viewport
    /// size, the visible area of the scroll container, or the canvas.
    pub fn base_extents(&self) -> Size {
        self.core.base_extents(self.core.slot.requested_size())
    }

    /// Area `position: fixed` content is placed against.
    pub fn fixed_rectangle(&self) -> Rect {
        let size = self
            .core
            .enclosed_viewport()
            .unwrap_or_else(|| self.core.parts.host.canvas_size());
        Rect::from_size(size)
    }

    /// Width of [`Self::base_extents`].
    pub fn layout_width(&self) -> i32 {
        self.base_extents().width
    }

    /// Width the published tree was laid out against.
    pub fn render_width(&self) -> i32 {
        self.core.slot.geometry().render_width
    }

    /// Whether a page description is set.
    pub fn is_print_view(&self) -> bool {
        self.core.page_info().is_some()
    }

    /// Switch to print view with the given page, or back to screen with `None`.
    /// Takes effect with the next document.
    pub fn set_page_info(&self, page_info: Option<PageInfo>) {
        self.core.set_page_info(page_info);
    }

    /// Page the print view lays out against.
    pub fn page_info(&self) -> Option<PageInfo> {
        self.core.page_info()
    }

    /// Attach or detach the enclosing scroll container. Attaching captures the
    /// host's default scroll mode, restored whenever no fixed content is present.
    pub fn set_scroll_container(&self, attached: bool) {
        self.core.set_scroll_container(attached);
    }

    /// Register a listener called after every published pass.
    pub fn add_document_listener(&self, listener: Arc<dyn DocumentListener>) -> ListenerId {
        self.core.listeners.add(listener)
    }

    /// Unregister a listener. Returns `false` for an unknown id.
    pub fn remove_document_listener(&self, id: ListenerId) -> bool {
        self.core.listeners.remove(id)
    }

    /// Element under the pointer, or `None`.
    pub fn set_hovered(&self, node: Option<NodeKey>) {
        self.interaction().set_hovered(node);
    }

    /// Element being activated, or `None`.
    pub fn set_active(&self, node: Option<NodeKey>) {
        self.interaction().set_active(node);
    }

    /// Element holding focus, or `None`.
    pub fn set_focused(&self, node: Option<NodeKey>) {
        self.interaction().set_focused(node);
    }

    /// `:hover` for `node`.
    pub fn is_hover(&self, node: NodeKey) -> bool {
        self.interaction().is_hover(node)
    }

    /// `:active` for `node`.
    pub fn is_active(&self, node: NodeKey) -> bool {
        self.interaction().is_active(node)
    }

    /// `:focus` for `node`.
    pub fn is_focus(&self, node: NodeKey) -> bool {
        self.interaction().is_focus(node)
    }

    /// Passes run so far, by outcome.
    pub fn pass_counts(&self) -> PassCounts {
        self.core.pass_counts()
    }

    fn interaction(&self) -> MutexGuard<'_, InteractionState> {
        self.core
            .interaction
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }
}

impl Drop for ViewportController {
    fn drop(&mut self) {
        if let Err(err) = self.shutdown() {
            error!("View shutdown failed: {err:#}");
        }
    }
}
