//! Fitting a finished layout to the host viewport.
//!
//! After a pass the content extent decides the canvas size the host should adopt.
//! When the canvas sits in a scroll container and the content is shorter than the
//! visible area, the document is stretched to fill it: the root, `html` and `body`
//! boxes all take the visible height.

use crate::host::ScrollMode;
use reflow_layout::{LayoutBox, Size};

/// Viewport facts a fit is computed from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FitInput {
    pub canvas: Size,
    /// Visible area of the enclosing scroll container, if any.
    pub visible: Option<Size>,
    /// Maximum offset of the laid out content.
    pub intrinsic: Size,
    pub fixed_content: bool,
    /// Mode the scroll container uses when `Simple` is not required.
    pub default_scroll_mode: ScrollMode,
}

/// Host updates a fit produces, applied in order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewportFit {
    /// Preferred-size requests, in the order they must reach the host.
    pub preferred_sizes: Vec<Size>,
    /// Scroll mode to apply; only set when enclosed.
    pub scroll_mode: Option<ScrollMode>,
    pub opaque: bool,
    /// Content extent after stretching to the viewport.
    pub intrinsic: Size,
    /// Height the root, `html` and `body` boxes must be stretched to.
    pub stretch_to: Option<i32>,
}

/// Compute the host updates for a finished layout.
pub fn plan(input: FitInput) -> ViewportFit {
    let FitInput {
        canvas,
        visible,
        mut intrinsic,
        fixed_content,
        default_scroll_mode,
    } = input;
    let mut preferred_sizes = Vec::new();
    let mut scroll_mode = None;
    let mut stretch_to = None;

    if intrinsic.width != canvas.width {
        preferred_sizes.push(Size::new(intrinsic.width, canvas.height));
    }

    if let Some(visible) = visible {
        if intrinsic.height < visible.height {
            if visible.height != canvas.height {
                preferred_sizes.push(Size::new(canvas.width, visible.height));
            }
            stretch_to = Some(visible.height);
            intrinsic.height = visible.height;
        } else if canvas.height != intrinsic.height {
            preferred_sizes.push(Size::new(canvas.width, intrinsic.height));
        }
        scroll_mode = Some(if fixed_content {
            ScrollMode::Simple
        } else {
            default_scroll_mode
        });
    } else {
        preferred_sizes.push(intrinsic);
    }

    ViewportFit {
        preferred_sizes,
        scroll_mode,
        opaque: !fixed_content,
        intrinsic,
        stretch_to,
    }
}

/// Give the root box, every `html` box and every `body` child of those `height`.
///
/// The root box may itself be the `html` box or an anonymous document box
/// wrapping it.
pub fn stretch_document(root: &mut LayoutBox, height: i32) {
    let height = height as f32;
    root.height = height;
    if root.is_element("html") {
        stretch_html(root, height);
        return;
    }
    root.children_mut()
        .iter_mut()
        .filter(|child| child.is_element("html"))
        .for_each(|html| stretch_html(html, height));
}

fn stretch_html(html: &mut LayoutBox, height: f32) {
    html.height = height;
    for body in html
        .children_mut()
        .iter_mut()
        .filter(|child| child.is_element("body"))
    {
        body.height = height;
    }
}
