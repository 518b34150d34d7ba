//! Boxes of the layout tree.
//!
//! The box builder creates the tree during a pass and mutates geometry while it
//! lays it out. Once the pass publishes the root, the tree is shared read-only.
//! Coordinates are absolute: `x` and `y` are the border-box origin relative to the
//! canvas origin.

use crate::layer::Layer;
use reflow_style::{NodeKey, StyleFacet};
use std::sync::Arc;

/// Identity of the document element a box was generated for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ElementRef {
    pub key: NodeKey,
    /// Lower-case local name.
    pub tag: String,
}

impl ElementRef {
    pub fn new(key: NodeKey, tag: impl Into<String>) -> Self {
        Self {
            key,
            tag: tag.into(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct LayoutBox {
    /// `None` for anonymous boxes and the document box.
    pub element: Option<ElementRef>,
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    style: StyleFacet,
    layer: Arc<Layer>,
    children: Vec<LayoutBox>,
}

impl LayoutBox {
    pub fn new(element: Option<ElementRef>, style: StyleFacet, layer: Arc<Layer>) -> Self {
        Self {
            element,
            x: 0.0,
            y: 0.0,
            width: 0.0,
            height: 0.0,
            style,
            layer,
            children: Vec::new(),
        }
    }

    #[inline]
    pub fn style(&self) -> &StyleFacet {
        &self.style
    }

    #[inline]
    pub fn style_mut(&mut self) -> &mut StyleFacet {
        &mut self.style
    }

    /// Layer this box paints in.
    #[inline]
    pub fn layer(&self) -> &Arc<Layer> {
        &self.layer
    }

    /// Whether the box was generated for an element with the given local name.
    pub fn is_element(&self, tag: &str) -> bool {
        self.element
            .as_ref()
            .is_some_and(|element| element.tag.eq_ignore_ascii_case(tag))
    }

    #[inline]
    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    #[inline]
    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }

    pub fn push_child(&mut self, child: Self) {
        self.children.push(child);
    }

    #[inline]
    pub fn child_count(&self) -> usize {
        self.children.len()
    }

    #[inline]
    pub fn child(&self, index: usize) -> Option<&Self> {
        self.children.get(index)
    }

    #[inline]
    pub fn child_mut(&mut self, index: usize) -> Option<&mut Self> {
        self.children.get_mut(index)
    }

    #[inline]
    pub fn children(&self) -> &[Self] {
        &self.children
    }

    #[inline]
    pub fn children_mut(&mut self) -> &mut [Self] {
        &mut self.children
    }

    /// Number of boxes in this subtree, this one included.
    pub fn subtree_len(&self) -> usize {
        1 + self.children.iter().map(Self::subtree_len).sum::<usize>()
    }

    /// First box in this subtree, in pre-order, generated for `key`.
    pub fn find(&self, key: NodeKey) -> Option<&Self> {
        if self.element.as_ref().is_some_and(|element| element.key == key) {
            return Some(self);
        }
        self.children.iter().find_map(|child| child.find(key))
    }
}
