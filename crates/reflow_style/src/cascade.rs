//! Boundary to the cascade resolver that produces [`ComputedStyle`] snapshots.

use crate::style_model::ComputedStyle;
use std::sync::Arc;

/// Identifier of a document node, assigned by the DOM owner.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeKey(pub u64);

impl NodeKey {
    pub const ROOT: Self = Self(0);
}

/// Media the document is being laid out for.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Media {
    #[default]
    Screen,
    Print,
}

impl Media {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Screen => "screen",
            Self::Print => "print",
        }
    }
}

/// Document-wide inputs to style resolution.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct DocumentContext {
    pub base_url: String,
    pub media: Media,
}

/// Supplies computed styles. Implementations are shared between the UI thread and
/// the layout worker, so every method takes `&self`.
pub trait CascadeResolver: Send + Sync {
    /// Computed style for `node` under the current document context.
    fn computed_style(&self, node: NodeKey) -> Arc<ComputedStyle>;

    /// Drop cached per-document style sheets while keeping shared ones.
    fn flush_style_sheets(&self);

    /// Drop every cached style sheet.
    fn flush_all_style_sheets(&self);

    fn set_document_context(&self, context: &DocumentContext);
}
