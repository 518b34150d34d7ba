//! Box tree, stacking layers and the per-pass layout context.
//!
//! The box construction algorithm itself lives behind [`BoxBuilder`]; this crate
//! owns the data it produces and the bookkeeping the pipeline reads back after a
//! pass (fixed content, maximum offset, finalized positions).

pub mod builder;
pub mod context;
pub mod geometry;
pub mod layer;
pub mod layout_box;
pub mod stop;
#[cfg(any(test, feature = "test-support"))]
pub mod testing;

pub use builder::BoxBuilder;
pub use context::{Document, LayoutContext, TopLevelNode};
pub use geometry::{Point, Rect, Size};
pub use layer::Layer;
pub use layout_box::{ElementRef, LayoutBox};
pub use stop::StopToken;
