//! Stacking layers.
//!
//! A layer groups the boxes that share one stacking/positioning context. The box
//! builder creates a child layer for every box whose style requires one and records
//! each box's extent into the layer it belongs to. After a pass the pipeline reads
//! two aggregates from the root layer: whether any fixed-position content exists
//! (which decides the scroll/paint strategy) and the maximum content offset (which
//! sizes the document).

use crate::geometry::Point;
use crate::layout_box::LayoutBox;
use core::sync::atomic::{AtomicBool, Ordering};
use log::warn;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

/// Bottom-right corner of one contained box.
#[derive(Debug, Clone, Copy)]
struct BoxExtent {
    right: f32,
    bottom: f32,
    fixed: bool,
}

#[derive(Debug, Default)]
struct LayerContents {
    extents: Vec<BoxExtent>,
    children: Vec<Arc<Layer>>,
}

#[derive(Debug, Default)]
pub struct Layer {
    /// The box that established this layer is `position: fixed`.
    fixed_master: bool,
    contents: Mutex<LayerContents>,
    positions_finalized: AtomicBool,
}

impl Layer {
    /// Layer of the root box; every pass starts with a fresh one.
    pub fn new_root() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Create a layer nested in `parent`.
    ///
    /// # Arguments
    ///
    /// * `parent` - Enclosing layer
    /// * `fixed_master` - Whether the establishing box is `position: fixed`
    pub fn new_child(parent: &Arc<Self>, fixed_master: bool) -> Arc<Self> {
        let child = Arc::new(Self {
            fixed_master,
            ..Self::default()
        });
        parent.contents().children.push(Arc::clone(&child));
        child
    }

    fn contents(&self) -> MutexGuard<'_, LayerContents> {
        self.contents.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Record a laid-out box as belonging to this layer.
    pub fn add_box(&self, layout_box: &LayoutBox) {
        let extent = BoxExtent {
            right: layout_box.right(),
            bottom: layout_box.bottom(),
            fixed: layout_box.style().is_fixed(),
        };
        self.contents().extents.push(extent);
    }

    pub fn box_count(&self) -> usize {
        self.contents().extents.len()
    }

    pub fn child_count(&self) -> usize {
        self.contents().children.len()
    }

    /// Snapshot of the nested layers.
    pub fn children(&self) -> Vec<Arc<Self>> {
        self.contents().children.clone()
    }

    /// Whether this layer or any nested one holds `position: fixed` content.
    pub fn contains_fixed_content(&self) -> bool {
        if self.fixed_master {
            return true;
        }
        let contents = self.contents();
        contents.extents.iter().any(|extent| extent.fixed)
            || contents
                .children
                .iter()
                .any(|child| child.contains_fixed_content())
    }

    /// Largest right and bottom edges of the boxes in this layer and its nested
    /// layers, rounded up to whole pixels.
    pub fn max_offset(&self) -> Point {
        let (right, bottom) = self.max_extent();
        Point::new(right.ceil() as i32, bottom.ceil() as i32)
    }

    fn max_extent(&self) -> (f32, f32) {
        let contents = self.contents();
        let own = contents
            .extents
            .iter()
            .fold((0.0_f32, 0.0_f32), |(right, bottom), extent| {
                (right.max(extent.right), bottom.max(extent.bottom))
            });
        contents.children.iter().fold(own, |(right, bottom), child| {
            let (child_right, child_bottom) = child.max_extent();
            (right.max(child_right), bottom.max(child_bottom))
        })
    }

    /// Mark box positions in this layer tree as final. Only a complete,
    /// uncancelled pass calls this, once.
    pub fn finalize_positions(&self) {
        if self.positions_finalized.swap(true, Ordering::AcqRel) {
            warn!("Layer positions finalized twice; ignoring");
            return;
        }
        for child in self.children() {
            child.finalize_positions();
        }
    }

    /// Until this is true no consumer may trust box positions in this layer.
    pub fn positions_finalized(&self) -> bool {
        self.positions_finalized.load(Ordering::Acquire)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reflow_style::{ComputedStyle, Position, StyleFacet};

    fn placed_box(layer: &Arc<Layer>, position: Position, rect: (f32, f32, f32, f32)) -> LayoutBox {
        let style = ComputedStyle {
            position,
            ..Default::default()
        };
        let mut layout_box = LayoutBox::new(None, StyleFacet::new(Arc::new(style), 800.0), Arc::clone(layer));
        layout_box.x = rect.0;
        layout_box.y = rect.1;
        layout_box.width = rect.2;
        layout_box.height = rect.3;
        layout_box
    }

    /// Test that the maximum offset spans nested layers.
    ///
    /// # Panics
    /// Panics if a nested layer's extent is ignored.
    #[test]
    fn max_offset_includes_nested_layers() {
        let root = Layer::new_root();
        let block = placed_box(&root, Position::Static, (0.0, 0.0, 300.0, 120.5));
        root.add_box(&block);

        let child = Layer::new_child(&root, false);
        let positioned = placed_box(&child, Position::Absolute, (250.0, 40.0, 100.0, 10.0));
        child.add_box(&positioned);

        assert_eq!(root.max_offset(), Point::new(350, 121));
        assert_eq!(child.max_offset(), Point::new(350, 50));
        assert_eq!(root.child_count(), 1);
    }

    #[test]
    fn fixed_content_propagates_from_nested_layer() {
        let root = Layer::new_root();
        assert!(!root.contains_fixed_content());
        let child = Layer::new_child(&root, true);
        assert!(child.contains_fixed_content());
        assert!(root.contains_fixed_content());
    }

    #[test]
    fn fixed_box_marks_its_layer() {
        let root = Layer::new_root();
        let fixed = placed_box(&root, Position::Fixed, (0.0, 0.0, 10.0, 10.0));
        root.add_box(&fixed);
        assert!(root.contains_fixed_content());
    }

    #[test]
    fn finalize_is_set_once_and_recursive() {
        let root = Layer::new_root();
        let child = Layer::new_child(&root, false);
        assert!(!root.positions_finalized());
        root.finalize_positions();
        root.finalize_positions();
        assert!(root.positions_finalized());
        assert!(child.positions_finalized());
    }
}
