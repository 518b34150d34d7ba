#![allow(
    dead_code,
    clippy::expect_used,
    reason = "shared test helpers; each test binary uses a different subset"
)]

use core::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use core::time::Duration;
use reflow_layout::testing::{NodeSpec, ProportionalMetrics, SpecCascade, StackingBuilder, StaticDocument};
use reflow_layout::{BoxBuilder, Document, Layer, LayoutBox, LayoutContext, Size, TopLevelNode};
use reflow_style::{CascadeResolver, ComputedStyle, DocumentContext, NodeKey};
use reflow_view::{HostViewport, ScrollMode, ViewConfig, ViewParts, ViewportController};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, mpsc};

/// Upper bound for waiting on a worker in tests.
pub const WAIT: Duration = Duration::from_secs(10);

fn locked<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

type CanvasHook = Box<dyn FnOnce() + Send>;

/// Host that records every call and signals repaints on a channel.
pub struct RecordingHost {
    canvas: Mutex<Size>,
    visible: Mutex<Option<Size>>,
    surface: AtomicBool,
    default_mode: ScrollMode,
    scroll_modes: Mutex<Vec<ScrollMode>>,
    preferred: Mutex<Vec<Size>>,
    opaque: Mutex<Vec<bool>>,
    on_canvas_query: Mutex<Option<CanvasHook>>,
    scroll_resets: AtomicUsize,
    repaints: AtomicUsize,
    repaint_signal: Mutex<mpsc::Sender<()>>,
}

impl RecordingHost {
    pub fn new(canvas: Size) -> (Arc<Self>, mpsc::Receiver<()>) {
        let (sender, receiver) = mpsc::channel();
        let host = Arc::new(Self {
            canvas: Mutex::new(canvas),
            visible: Mutex::new(None),
            surface: AtomicBool::new(true),
            default_mode: ScrollMode::Blit,
            scroll_modes: Mutex::new(Vec::new()),
            preferred: Mutex::new(Vec::new()),
            opaque: Mutex::new(Vec::new()),
            on_canvas_query: Mutex::new(None),
            scroll_resets: AtomicUsize::new(0),
            repaints: AtomicUsize::new(0),
            repaint_signal: Mutex::new(sender),
        });
        (host, receiver)
    }

    pub fn set_canvas(&self, size: Size) {
        *locked(&self.canvas) = size;
    }

    pub fn set_visible(&self, size: Option<Size>) {
        *locked(&self.visible) = size;
    }

    pub fn set_surface(&self, available: bool) {
        self.surface.store(available, Ordering::SeqCst);
    }

    pub fn scroll_modes(&self) -> Vec<ScrollMode> {
        locked(&self.scroll_modes).clone()
    }

    pub fn preferred_sizes(&self) -> Vec<Size> {
        locked(&self.preferred).clone()
    }

    /// Last opacity the view set.
    pub fn opaque(&self) -> Option<bool> {
        locked(&self.opaque).last().copied()
    }

    pub fn opaque_calls(&self) -> Vec<bool> {
        locked(&self.opaque).clone()
    }

    /// Run `hook` on the thread that next asks for the canvas size, before answering.
    pub fn on_next_canvas_query(&self, hook: impl FnOnce() + Send + 'static) {
        *locked(&self.on_canvas_query) = Some(Box::new(hook));
    }

    pub fn scroll_resets(&self) -> usize {
        self.scroll_resets.load(Ordering::SeqCst)
    }

    pub fn repaints(&self) -> usize {
        self.repaints.load(Ordering::SeqCst)
    }
}

impl HostViewport for RecordingHost {
    fn canvas_size(&self) -> Size {
        let hook = locked(&self.on_canvas_query).take();
        if let Some(hook) = hook {
            hook();
        }
        *locked(&self.canvas)
    }

    fn visible_size(&self) -> Option<Size> {
        *locked(&self.visible)
    }

    fn default_scroll_mode(&self) -> ScrollMode {
        self.default_mode
    }

    fn reset_scroll_position(&self) {
        self.scroll_resets.fetch_add(1, Ordering::SeqCst);
    }

    fn set_scroll_mode(&self, mode: ScrollMode) {
        locked(&self.scroll_modes).push(mode);
    }

    fn set_preferred_size(&self, size: Size) {
        locked(&self.preferred).push(size);
    }

    fn set_opaque(&self, opaque: bool) {
        locked(&self.opaque).push(opaque);
    }

    fn request_repaint(&self) {
        self.repaints.fetch_add(1, Ordering::SeqCst);
        let _sent = locked(&self.repaint_signal).send(());
    }

    fn has_paint_surface(&self) -> bool {
        self.surface.load(Ordering::SeqCst)
    }
}

/// Stacking builder that can hold its first passes until the test releases them,
/// and remembers the extents and root layer of every pass.
pub struct GatedBuilder {
    inner: StackingBuilder,
    held_passes: AtomicUsize,
    entered: Mutex<mpsc::Sender<()>>,
    gate: Mutex<mpsc::Receiver<()>>,
    widths: Mutex<Vec<i32>>,
    layers: Mutex<Vec<Arc<Layer>>>,
}

/// Test-side handles of a [`GatedBuilder`].
pub struct Gate {
    pub entered: mpsc::Receiver<()>,
    pub release: mpsc::Sender<()>,
}

impl GatedBuilder {
    pub fn new(tree: NodeSpec, held_passes: usize) -> (Arc<Self>, Gate) {
        let (entered_tx, entered_rx) = mpsc::channel();
        let (release_tx, release_rx) = mpsc::channel();
        let builder = Arc::new(Self {
            inner: StackingBuilder::new(tree),
            held_passes: AtomicUsize::new(held_passes),
            entered: Mutex::new(entered_tx),
            gate: Mutex::new(release_rx),
            widths: Mutex::new(Vec::new()),
            layers: Mutex::new(Vec::new()),
        });
        let gate = Gate {
            entered: entered_rx,
            release: release_tx,
        };
        (builder, gate)
    }

    pub fn widths(&self) -> Vec<i32> {
        locked(&self.widths).clone()
    }

    pub fn layers(&self) -> Vec<Arc<Layer>> {
        locked(&self.layers).clone()
    }

    fn take_hold(&self) -> bool {
        self.held_passes
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |held| held.checked_sub(1))
            .is_ok()
    }
}

impl BoxBuilder for GatedBuilder {
    fn pre_layout(&self, ctx: &mut LayoutContext, root: &TopLevelNode) -> LayoutBox {
        locked(&self.widths).push(ctx.extents().width);
        let root_box = self.inner.pre_layout(ctx, root);
        locked(&self.layers).push(Arc::clone(root_box.layer()));
        if self.take_hold() {
            let _sent = locked(&self.entered).send(());
            let _released = locked(&self.gate).recv_timeout(WAIT);
        }
        root_box
    }

    fn real_layout(&self, ctx: &mut LayoutContext, root_box: &mut LayoutBox, root: &TopLevelNode) {
        self.inner.real_layout(ctx, root_box, root);
    }
}

/// Cascade that can release a held [`GatedBuilder`] pass from inside its next
/// style sheet flush.
pub struct ReleasingCascade {
    inner: SpecCascade,
    release: Mutex<Option<mpsc::Sender<()>>>,
}

impl ReleasingCascade {
    pub fn new(tree: &NodeSpec) -> Self {
        Self {
            inner: SpecCascade::new(tree),
            release: Mutex::new(None),
        }
    }

    pub fn release_on_next_flush(&self, release: mpsc::Sender<()>) {
        *locked(&self.release) = Some(release);
    }

    pub fn flush_count(&self) -> usize {
        self.inner.flush_count()
    }

    fn fire(&self) {
        if let Some(release) = locked(&self.release).take() {
            let _sent = release.send(());
        }
    }
}

impl CascadeResolver for ReleasingCascade {
    fn computed_style(&self, node: NodeKey) -> Arc<ComputedStyle> {
        self.inner.computed_style(node)
    }

    fn flush_style_sheets(&self) {
        self.inner.flush_style_sheets();
        self.fire();
    }

    fn flush_all_style_sheets(&self) {
        self.inner.flush_all_style_sheets();
        self.fire();
    }

    fn set_document_context(&self, context: &DocumentContext) {
        self.inner.set_document_context(context);
    }
}

/// Builder that leaves one style pushed after every pass.
pub struct UnbalancedBuilder(pub StackingBuilder);

impl BoxBuilder for UnbalancedBuilder {
    fn pre_layout(&self, ctx: &mut LayoutContext, root: &TopLevelNode) -> LayoutBox {
        self.0.pre_layout(ctx, root)
    }

    fn real_layout(&self, ctx: &mut LayoutContext, root_box: &mut LayoutBox, root: &TopLevelNode) {
        self.0.real_layout(ctx, root_box, root);
        ctx.push_style(Arc::new(ComputedStyle::default()));
    }
}

/// `html > body > children`.
pub fn page(children: Vec<NodeSpec>) -> NodeSpec {
    let body = children
        .into_iter()
        .fold(NodeSpec::block(2, "body"), NodeSpec::child);
    NodeSpec::block(1, "html").child(body)
}

pub fn document_for(tree: &NodeSpec) -> Arc<dyn Document> {
    Arc::new(StaticDocument { root: tree.key })
}

/// Assemble a controller over `tree`.
///
/// # Panics
/// Panics if the workers cannot be spawned.
pub fn controller(
    use_threads: bool,
    host: &Arc<RecordingHost>,
    builder: Arc<dyn BoxBuilder>,
    tree: &NodeSpec,
) -> (ViewportController, Arc<SpecCascade>) {
    let cascade = Arc::new(SpecCascade::new(tree));
    let view = controller_with_cascade(use_threads, host, builder, Arc::clone(&cascade) as _);
    (view, cascade)
}

/// Assemble a controller over an arbitrary cascade.
///
/// # Panics
/// Panics if the workers cannot be spawned.
pub fn controller_with_cascade(
    use_threads: bool,
    host: &Arc<RecordingHost>,
    builder: Arc<dyn BoxBuilder>,
    cascade: Arc<dyn CascadeResolver>,
) -> ViewportController {
    let _ = env_logger::builder().is_test(true).try_init();
    let parts = ViewParts {
        host: Arc::clone(host) as Arc<dyn HostViewport>,
        builder,
        cascade,
        fonts: Arc::new(ProportionalMetrics),
    };
    ViewportController::new(ViewConfig::new(use_threads, true, 96.0), parts)
        .expect("view should start")
}
