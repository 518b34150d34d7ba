//! Per-box view of a computed style.
//!
//! A [`StyleFacet`] pairs one [`ComputedStyle`] snapshot with the width of the
//! containing block the box was created in. Layout asks it for resolved margin and
//! padding rectangles and for the classification questions that decide floats,
//! clearance, block formatting contexts and stacking layers.

use crate::font::{FontMetricsProvider, FontSpec, LineMetrics};
use crate::length::CssContext;
use crate::style_model::{
    BackgroundAttachment, BackgroundRepeat, Clear, ComputedStyle, Display, Edges, Float,
    Overflow, Position,
};
use log::trace;
use std::sync::Arc;

#[derive(Clone, Debug)]
pub struct StyleFacet {
    style: Arc<ComputedStyle>,
    /// Fixed for the facet's lifetime; a new containing block needs a new facet.
    containing_block_width: f32,
    margin_top_override: Option<f32>,
    margin_bottom_override: Option<f32>,
}

impl StyleFacet {
    #[inline]
    pub fn new(style: Arc<ComputedStyle>, containing_block_width: f32) -> Self {
        Self {
            style,
            containing_block_width,
            margin_top_override: None,
            margin_bottom_override: None,
        }
    }

    #[inline]
    pub fn computed_style(&self) -> &Arc<ComputedStyle> {
        &self.style
    }

    /// Point the facet at a recomputed style. Margin overrides survive.
    #[inline]
    pub fn set_computed_style(&mut self, style: Arc<ComputedStyle>) {
        self.style = style;
    }

    #[inline]
    pub fn containing_block_width(&self) -> f32 {
        self.containing_block_width
    }

    /// Replace the cascade's top margin, e.g. with a collapsed margin.
    pub fn set_margin_top_override(&mut self, value: f32) {
        trace!("margin-top override set to {value}");
        self.margin_top_override = Some(value);
    }

    /// Replace the cascade's bottom margin, e.g. with a collapsed margin.
    pub fn set_margin_bottom_override(&mut self, value: f32) {
        trace!("margin-bottom override set to {value}");
        self.margin_bottom_override = Some(value);
    }

    #[inline]
    pub fn margin_top_override(&self) -> Option<f32> {
        self.margin_top_override
    }

    #[inline]
    pub fn margin_bottom_override(&self) -> Option<f32> {
        self.margin_bottom_override
    }

    /// Margin widths resolved against the containing block.
    ///
    /// `auto` margins are zero here; distributing free space is the builder's job.
    /// Overridden top or bottom margins replace the cascade values.
    pub fn margin_rect(&self, ctx: &dyn CssContext) -> Edges {
        let font_size = self.style.font.size;
        let base = self.containing_block_width;
        let margin = &self.style.margin;
        Edges {
            top: self
                .margin_top_override
                .unwrap_or_else(|| margin.top.to_px_or_zero(ctx, font_size, base)),
            right: margin.right.to_px_or_zero(ctx, font_size, base),
            bottom: self
                .margin_bottom_override
                .unwrap_or_else(|| margin.bottom.to_px_or_zero(ctx, font_size, base)),
            left: margin.left.to_px_or_zero(ctx, font_size, base),
        }
    }

    /// Padding widths resolved against the containing block.
    pub fn padding_rect(&self, ctx: &dyn CssContext) -> Edges {
        let font_size = self.style.font.size;
        let base = self.containing_block_width;
        let padding = &self.style.padding;
        Edges {
            top: padding.top.to_px(ctx, font_size, base),
            right: padding.right.to_px(ctx, font_size, base),
            bottom: padding.bottom.to_px(ctx, font_size, base),
            left: padding.left.to_px(ctx, font_size, base),
        }
    }

    fn border_rect(&self, ctx: &dyn CssContext) -> Edges {
        let font_size = self.style.font.size;
        let base = self.containing_block_width;
        let border = &self.style.border_width;
        Edges {
            top: border.top.to_px(ctx, font_size, base),
            right: border.right.to_px(ctx, font_size, base),
            bottom: border.bottom.to_px(ctx, font_size, base),
            left: border.left.to_px(ctx, font_size, base),
        }
    }

    /// Left margin + border + padding, rounded to whole pixels.
    pub fn left_margin_border_padding(&self, ctx: &dyn CssContext) -> i32 {
        let total = self.margin_rect(ctx).left
            + self.border_rect(ctx).left
            + self.padding_rect(ctx).left;
        total.round() as i32
    }

    /// Right margin + border + padding, rounded to whole pixels.
    pub fn right_margin_border_padding(&self, ctx: &dyn CssContext) -> i32 {
        let total = self.margin_rect(ctx).right
            + self.border_rect(ctx).right
            + self.padding_rect(ctx).right;
        total.round() as i32
    }

    #[inline]
    pub fn font(&self) -> &FontSpec {
        &self.style.font
    }

    /// Metrics of this box's font. The values describe the font, not a line.
    pub fn line_metrics(&self, provider: &dyn FontMetricsProvider) -> LineMetrics {
        provider.line_metrics(&self.style.font)
    }

    // Clearance and floats

    pub fn is_clear_left(&self) -> bool {
        matches!(self.style.clear, Clear::Left | Clear::Both)
    }

    pub fn is_clear_right(&self) -> bool {
        matches!(self.style.clear, Clear::Right | Clear::Both)
    }

    pub fn is_cleared(&self) -> bool {
        self.style.clear != Clear::None
    }

    pub fn is_floated(&self) -> bool {
        matches!(self.style.float, Float::Left | Float::Right)
    }

    pub fn is_floated_left(&self) -> bool {
        self.style.float == Float::Left
    }

    pub fn is_floated_right(&self) -> bool {
        self.style.float == Float::Right
    }

    // Positioning

    pub fn is_absolute(&self) -> bool {
        self.style.position == Position::Absolute
    }

    pub fn is_fixed(&self) -> bool {
        self.style.position == Position::Fixed
    }

    pub fn is_relative(&self) -> bool {
        self.style.position == Position::Relative
    }

    pub fn is_positioned_or_floated(&self) -> bool {
        self.is_absolute() || self.is_fixed() || self.is_floated() || self.is_relative()
    }

    pub fn is_top_auto(&self) -> bool {
        self.style.top.is_auto()
    }

    pub fn is_bottom_auto(&self) -> bool {
        self.style.bottom.is_auto()
    }

    /// Whether descendants are laid out in an independent block formatting
    /// context, so floats inside do not affect siblings outside.
    pub fn establishes_bfc(&self) -> bool {
        self.is_floated()
            || matches!(self.style.position, Position::Absolute | Position::Fixed)
            || matches!(self.style.display, Display::InlineBlock | Display::TableCell)
            || self.style.overflow != Overflow::Visible
    }

    /// Whether the box needs its own stacking layer.
    pub fn requires_layer(&self) -> bool {
        matches!(
            self.style.position,
            Position::Absolute | Position::Relative | Position::Fixed
        )
    }

    // Backgrounds

    #[inline]
    pub fn background_repeat(&self) -> BackgroundRepeat {
        self.style.background_repeat
    }

    #[inline]
    pub fn background_attachment(&self) -> BackgroundAttachment {
        self.style.background_attachment
    }

    pub fn is_horizontal_background_repeat(&self) -> bool {
        matches!(
            self.style.background_repeat,
            BackgroundRepeat::RepeatX | BackgroundRepeat::Repeat
        )
    }

    pub fn is_vertical_background_repeat(&self) -> bool {
        matches!(
            self.style.background_repeat,
            BackgroundRepeat::RepeatY | BackgroundRepeat::Repeat
        )
    }

    pub fn is_fixed_background(&self) -> bool {
        self.style.background_attachment == BackgroundAttachment::Fixed
    }

    // Sizing

    pub fn is_auto_width(&self) -> bool {
        self.style.width.is_auto()
    }

    /// The containing block's height is assumed indeterminate, so any height not
    /// given in an absolute unit (percentages included) counts as `auto`.
    pub fn is_auto_height(&self) -> bool {
        self.style.height.is_auto() || !self.style.height.has_absolute_unit()
    }

    pub fn is_auto_z_index(&self) -> bool {
        self.style.z_index.is_none()
    }
}
