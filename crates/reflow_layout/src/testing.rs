//! Test doubles for the layout collaborators.
//!
//! [`StackingBuilder`] is a deliberately small box builder: it stacks block boxes
//! vertically, gives out-of-flow boxes their `top`/`left` offsets, attaches layers
//! the way a real builder must, and polls the stop token between siblings. It is
//! enough to drive the pipeline end to end without a real layout algorithm.

use crate::builder::BoxBuilder;
use crate::context::{Document, LayoutContext, TopLevelNode};
use crate::layer::Layer;
use crate::layout_box::{ElementRef, LayoutBox};
use core::sync::atomic::{AtomicUsize, Ordering};
use reflow_style::{
    CascadeResolver, ComputedStyle, Dimension, Display, DocumentContext, FontMetricsProvider,
    FontSpec, LineMetrics, NodeKey, Position, StyleFacet,
};
use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};

/// One element of a test document.
#[derive(Debug, Clone)]
pub struct NodeSpec {
    pub key: NodeKey,
    pub tag: String,
    pub style: ComputedStyle,
    /// Height of the element's own content (text, replaced content).
    pub content_height: f32,
    pub children: Vec<NodeSpec>,
}

impl NodeSpec {
    /// A `display: block` element.
    pub fn block(key: u64, tag: &str) -> Self {
        Self::with_style(
            key,
            tag,
            ComputedStyle {
                display: Display::Block,
                ..Default::default()
            },
        )
    }

    pub fn with_style(key: u64, tag: &str, style: ComputedStyle) -> Self {
        Self {
            key: NodeKey(key),
            tag: tag.to_owned(),
            style,
            content_height: 0.0,
            children: Vec::new(),
        }
    }

    #[must_use]
    pub fn content_height(mut self, height: f32) -> Self {
        self.content_height = height;
        self
    }

    #[must_use]
    pub fn child(mut self, child: Self) -> Self {
        self.children.push(child);
        self
    }

    fn collect<'tree>(&'tree self, out: &mut HashMap<NodeKey, &'tree Self>) {
        out.insert(self.key, self);
        for child in &self.children {
            child.collect(out);
        }
    }
}

/// Document whose top-level node is a fixed key.
#[derive(Debug, Clone, Copy)]
pub struct StaticDocument {
    pub root: NodeKey,
}

impl Document for StaticDocument {
    fn root(&self) -> NodeKey {
        self.root
    }
}

/// Cascade answering from the styles of a [`NodeSpec`] tree.
#[derive(Debug, Default)]
pub struct SpecCascade {
    styles: HashMap<NodeKey, Arc<ComputedStyle>>,
    flushes: AtomicUsize,
    full_flushes: AtomicUsize,
    context: Mutex<Option<DocumentContext>>,
}

impl SpecCascade {
    pub fn new(tree: &NodeSpec) -> Self {
        let mut nodes = HashMap::new();
        tree.collect(&mut nodes);
        let styles = nodes
            .into_iter()
            .map(|(key, spec)| (key, Arc::new(spec.style.clone())))
            .collect();
        Self {
            styles,
            ..Self::default()
        }
    }

    pub fn flush_count(&self) -> usize {
        self.flushes.load(Ordering::SeqCst)
    }

    pub fn full_flush_count(&self) -> usize {
        self.full_flushes.load(Ordering::SeqCst)
    }

    pub fn document_context(&self) -> Option<DocumentContext> {
        self.context
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl CascadeResolver for SpecCascade {
    fn computed_style(&self, node: NodeKey) -> Arc<ComputedStyle> {
        self.styles
            .get(&node)
            .map_or_else(|| Arc::new(ComputedStyle::default()), Arc::clone)
    }

    fn flush_style_sheets(&self) {
        self.flushes.fetch_add(1, Ordering::SeqCst);
    }

    fn flush_all_style_sheets(&self) {
        self.full_flushes.fetch_add(1, Ordering::SeqCst);
    }

    fn set_document_context(&self, context: &DocumentContext) {
        *self.context.lock().unwrap_or_else(PoisonError::into_inner) = Some(context.clone());
    }
}

/// Metrics proportional to the font size.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProportionalMetrics;

impl FontMetricsProvider for ProportionalMetrics {
    fn line_metrics(&self, font: &FontSpec) -> LineMetrics {
        LineMetrics {
            ascent: font.size * 0.8,
            descent: font.size * 0.2,
            leading: 0.0,
        }
    }
}

/// Block stacking builder over a [`NodeSpec`] tree.
#[derive(Debug, Clone)]
pub struct StackingBuilder {
    tree: NodeSpec,
    content_heights: HashMap<NodeKey, f32>,
}

impl StackingBuilder {
    pub fn new(tree: NodeSpec) -> Self {
        let mut nodes = HashMap::new();
        tree.collect(&mut nodes);
        let content_heights = nodes
            .into_iter()
            .map(|(key, spec)| (key, spec.content_height))
            .collect();
        Self {
            tree,
            content_heights,
        }
    }

    pub fn tree(&self) -> &NodeSpec {
        &self.tree
    }

    fn generate(
        &self,
        ctx: &LayoutContext,
        spec: &NodeSpec,
        containing_width: f32,
        parent_layer: &Arc<Layer>,
    ) -> Option<LayoutBox> {
        let style = ctx.computed_style(spec.key);
        if style.display == Display::None {
            return None;
        }
        let facet = StyleFacet::new(style, containing_width);
        let layer = if facet.requires_layer() {
            Layer::new_child(parent_layer, facet.is_fixed())
        } else {
            Arc::clone(parent_layer)
        };
        let inner_width = containing_width
            - facet.margin_rect(ctx).horizontal()
            - facet.padding_rect(ctx).horizontal();
        let mut layout_box = LayoutBox::new(
            Some(ElementRef::new(spec.key, spec.tag.as_str())),
            facet,
            Arc::clone(&layer),
        );
        for child in &spec.children {
            if ctx.should_stop() {
                break;
            }
            if let Some(child_box) = self.generate(ctx, child, inner_width, &layer) {
                layout_box.push_child(child_box);
            }
        }
        Some(layout_box)
    }

    /// Lay out `layout_box` with its margin box starting at `(x, y)`; returns the
    /// vertical space it consumes in flow.
    fn layout_block(
        &self,
        ctx: &mut LayoutContext,
        layout_box: &mut LayoutBox,
        x: f32,
        y: f32,
        available_width: f32,
    ) -> f32 {
        let style = Arc::clone(layout_box.style().computed_style());
        ctx.push_style(Arc::clone(&style));
        let margin = layout_box.style().margin_rect(ctx);
        let padding = layout_box.style().padding_rect(ctx);

        layout_box.x = x + margin.left;
        layout_box.y = y + margin.top;
        layout_box.width = match style.width {
            Dimension::Length(width) => width.to_px(ctx, style.font.size, available_width),
            Dimension::Auto => (available_width - margin.horizontal()).max(0.0),
        };

        let content_x = layout_box.x + padding.left;
        let content_y = layout_box.y + padding.top;
        let content_width = (layout_box.width - padding.horizontal()).max(0.0);
        let mut cursor = content_y;
        for index in 0..layout_box.child_count() {
            if ctx.should_stop() {
                break;
            }
            let Some(child) = layout_box.child_mut(index) else {
                break;
            };
            if child.style().is_fixed() || child.style().is_absolute() {
                let child_style = Arc::clone(child.style().computed_style());
                let font_size = child_style.font.size;
                let (origin_x, origin_y, base) = if child.style().is_fixed() {
                    (0.0, 0.0, ctx.extents().width as f32)
                } else {
                    (content_x, content_y, content_width)
                };
                let left = child_style.left.to_px_or_zero(ctx, font_size, base);
                let top = child_style.top.to_px_or_zero(ctx, font_size, base);
                self.layout_block(ctx, child, origin_x + left, origin_y + top, base);
            } else {
                cursor += self.layout_block(ctx, child, content_x, cursor, content_width);
            }
        }

        let own_content = layout_box
            .element
            .as_ref()
            .map(|element| element.key)
            .and_then(|key| self.content_heights.get(&key).copied())
            .unwrap_or(0.0);
        let content_height = (cursor - content_y).max(own_content);
        layout_box.height = match style.height {
            Dimension::Length(height) if !layout_box.style().is_auto_height() => {
                height.to_px(ctx, style.font.size, 0.0)
            }
            _ => content_height + padding.vertical(),
        };

        layout_box.layer().add_box(layout_box);
        ctx.pop_style();
        margin.top + layout_box.height + margin.bottom
    }
}

impl BoxBuilder for StackingBuilder {
    fn pre_layout(&self, ctx: &mut LayoutContext, root: &TopLevelNode) -> LayoutBox {
        let width = ctx.extents().width as f32;
        let layer = Layer::new_root();
        let document_style = Arc::new(ComputedStyle {
            display: Display::Block,
            ..Default::default()
        });
        let mut root_box = LayoutBox::new(
            None,
            StyleFacet::new(document_style, width),
            Arc::clone(&layer),
        );
        if root.key() == self.tree.key
            && let Some(child) = self.generate(ctx, &self.tree, width, &layer)
        {
            root_box.push_child(child);
        }
        root_box
    }

    fn real_layout(&self, ctx: &mut LayoutContext, root_box: &mut LayoutBox, _root: &TopLevelNode) {
        let width = ctx.extents().width as f32;
        let _consumed = self.layout_block(ctx, root_box, 0.0, 0.0, width);
    }
}

/// Shorthand for an absolutely or fixed positioned block at `(left, top)`.
pub fn positioned_style(
    position: Position,
    left: f32,
    top: f32,
    width: f32,
    height: f32,
) -> ComputedStyle {
    ComputedStyle {
        display: Display::Block,
        position,
        left: Dimension::px(left),
        top: Dimension::px(top),
        width: Dimension::px(width),
        height: Dimension::px(height),
        ..Default::default()
    }
}
