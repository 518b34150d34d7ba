//! Boundary to the box construction algorithm.

use crate::context::{LayoutContext, TopLevelNode};
use crate::layout_box::LayoutBox;

/// Builds and sizes the box tree for a document.
///
/// The pipeline calls both entry points once per pass, in order. Implementations
/// should poll [`LayoutContext::should_stop`] between sibling subtrees and return
/// early when it is set; a partial tree is never published.
pub trait BoxBuilder: Send + Sync {
    /// First pass: generate the unsized tree, with layers attached.
    fn pre_layout(&self, ctx: &mut LayoutContext, root: &TopLevelNode) -> LayoutBox;

    /// Second pass: resolve sizes and positions in place and record every box into
    /// its layer.
    fn real_layout(&self, ctx: &mut LayoutContext, root_box: &mut LayoutBox, root: &TopLevelNode);
}
