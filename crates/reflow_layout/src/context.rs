//! Per-pass layout context.
//!
//! One `LayoutContext` exists for each layout pass. It carries the extents the pass
//! lays out against, the pass's stop token, and the collaborators the box builder
//! needs (cascade and font metrics). It also keeps the style stack the builder
//! pushes and pops while descending, so the pipeline can report unbalanced
//! bookkeeping after the pass.

use crate::geometry::Rect;
use crate::stop::StopToken;
use core::fmt;
use log::warn;
use reflow_style::{
    CascadeResolver, ComputedStyle, CssContext, FontMetricsProvider, LineMetrics, NodeKey,
    StyleFacet,
};
use std::sync::Arc;

/// Document handle handed to the box builder.
pub trait Document: Send + Sync {
    /// Top-level node the box tree is generated from.
    fn root(&self) -> NodeKey;
}

/// Entry point for box construction: the document and its top-level node.
#[derive(Clone)]
pub struct TopLevelNode {
    document: Arc<dyn Document>,
}

impl TopLevelNode {
    pub fn new(document: Arc<dyn Document>) -> Self {
        Self { document }
    }

    pub fn key(&self) -> NodeKey {
        self.document.root()
    }

    pub fn document(&self) -> &Arc<dyn Document> {
        &self.document
    }
}

impl fmt::Debug for TopLevelNode {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter
            .debug_struct("TopLevelNode")
            .field("key", &self.key())
            .finish()
    }
}

pub struct LayoutContext {
    extents: Rect,
    stop: StopToken,
    cascade: Arc<dyn CascadeResolver>,
    fonts: Arc<dyn FontMetricsProvider>,
    mm_per_px: f32,
    print: bool,
    interactive: bool,
    style_stack: Vec<Arc<ComputedStyle>>,
    /// Pops attempted on an empty stack.
    excess_pops: usize,
}

impl LayoutContext {
    /// Create a context for one pass.
    ///
    /// # Arguments
    ///
    /// * `extents` - Area the document is laid out against
    /// * `stop` - Token the pass polls; stopping it cancels the pass
    /// * `cascade` - Source of computed styles
    /// * `fonts` - Font metrics provider
    pub fn new(
        extents: Rect,
        stop: StopToken,
        cascade: Arc<dyn CascadeResolver>,
        fonts: Arc<dyn FontMetricsProvider>,
    ) -> Self {
        Self {
            extents,
            stop,
            cascade,
            fonts,
            mm_per_px: 25.4 / 96.0,
            print: false,
            interactive: true,
            style_stack: Vec::new(),
            excess_pops: 0,
        }
    }

    /// Device resolution used for absolute units.
    #[must_use]
    pub fn with_dpi(mut self, dots_per_inch: f32) -> Self {
        self.mm_per_px = 25.4 / dots_per_inch.max(1.0);
        self
    }

    /// Print layouts are paginated and not interactive.
    #[must_use]
    pub fn with_print(mut self, print: bool) -> Self {
        self.print = print;
        self.interactive = !print;
        self
    }

    #[inline]
    pub fn extents(&self) -> Rect {
        self.extents
    }

    #[inline]
    pub fn is_print(&self) -> bool {
        self.print
    }

    #[inline]
    pub fn is_interactive(&self) -> bool {
        self.interactive
    }

    /// Builders poll this at subtree boundaries and return early when it is set.
    #[inline]
    pub fn should_stop(&self) -> bool {
        self.stop.is_stopped()
    }

    /// Cancel this pass.
    pub fn stop_rendering(&self) {
        self.stop.stop();
    }

    #[inline]
    pub fn stop_token(&self) -> &StopToken {
        &self.stop
    }

    pub fn computed_style(&self, node: NodeKey) -> Arc<ComputedStyle> {
        self.cascade.computed_style(node)
    }

    pub fn line_metrics(&self, facet: &StyleFacet) -> LineMetrics {
        facet.line_metrics(self.fonts.as_ref())
    }

    pub fn push_style(&mut self, style: Arc<ComputedStyle>) {
        self.style_stack.push(style);
    }

    pub fn pop_style(&mut self) {
        if self.style_stack.pop().is_none() {
            warn!("pop_style called with an empty style stack");
            self.excess_pops = self.excess_pops.saturating_add(1);
        }
    }

    /// Style of the innermost box being laid out.
    pub fn current_style(&self) -> Option<&Arc<ComputedStyle>> {
        self.style_stack.last()
    }

    /// Whether every pushed style was popped exactly once.
    pub fn is_styles_all_popped(&self) -> bool {
        self.style_stack.is_empty() && self.excess_pops == 0
    }
}

impl CssContext for LayoutContext {
    fn mm_per_px(&self) -> f32 {
        self.mm_per_px
    }
}

impl fmt::Debug for LayoutContext {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter
            .debug_struct("LayoutContext")
            .field("extents", &self.extents)
            .field("stopped", &self.should_stop())
            .field("print", &self.print)
            .field("style_depth", &self.style_stack.len())
            .finish_non_exhaustive()
    }
}
