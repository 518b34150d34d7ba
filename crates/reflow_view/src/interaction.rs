//! Elements in a dynamic pseudo-class state.
//!
//! The cascade asks the view which element is hovered, active or focused when it
//! matches `:hover`, `:active` and `:focus`.

use reflow_style::NodeKey;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct InteractionState {
    hovered: Option<NodeKey>,
    active: Option<NodeKey>,
    focused: Option<NodeKey>,
}

impl InteractionState {
    pub fn set_hovered(&mut self, node: Option<NodeKey>) {
        self.hovered = node;
    }

    pub fn set_active(&mut self, node: Option<NodeKey>) {
        self.active = node;
    }

    pub fn set_focused(&mut self, node: Option<NodeKey>) {
        self.focused = node;
    }

    #[inline]
    pub fn is_hover(&self, node: NodeKey) -> bool {
        self.hovered == Some(node)
    }

    #[inline]
    pub fn is_active(&self, node: NodeKey) -> bool {
        self.active == Some(node)
    }

    #[inline]
    pub fn is_focus(&self, node: NodeKey) -> bool {
        self.focused == Some(node)
    }

    /// Forget every element, e.g. when the document changes.
    pub fn clear(&mut self) {
        *self = Self::default();
    }
}
