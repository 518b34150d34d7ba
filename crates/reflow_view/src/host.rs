//! Interfaces to the widget that hosts the view.
//!
//! The host owns the painting surface and, optionally, an enclosing scroll
//! container. Its methods are called from both workers; implementations forward
//! them to their UI thread as needed.

use reflow_layout::Size;

/// How the enclosing scroll container moves content.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum ScrollMode {
    /// Copy already painted pixels and repaint the exposed strip.
    #[default]
    Blit,
    /// Scroll an off-screen backing store.
    Backing,
    /// Repaint the whole visible area on every scroll. Required whenever
    /// fixed-position content must stay put.
    Simple,
}

/// Content area of a printed page, in device pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageInfo {
    pub content_width: i32,
    pub content_height: i32,
}

impl PageInfo {
    pub const fn new(content_width: i32, content_height: i32) -> Self {
        Self {
            content_width,
            content_height,
        }
    }

    #[inline]
    pub const fn content_size(&self) -> Size {
        Size::new(self.content_width, self.content_height)
    }
}

pub trait HostViewport: Send + Sync {
    /// Current size of the painting canvas.
    fn canvas_size(&self) -> Size;

    /// Size of the visible area when the canvas sits inside a scroll container.
    fn visible_size(&self) -> Option<Size>;

    /// Scroll mode the container uses when nothing requires `Simple`.
    fn default_scroll_mode(&self) -> ScrollMode;

    fn reset_scroll_position(&self);

    fn set_scroll_mode(&self, mode: ScrollMode);

    /// Ask the host to resize the canvas to `size`.
    fn set_preferred_size(&self, size: Size);

    /// Hint whether the canvas paints every pixel it covers.
    fn set_opaque(&self, opaque: bool);

    fn request_repaint(&self);

    /// Whether a surface exists to lay out against.
    fn has_paint_surface(&self) -> bool;
}
