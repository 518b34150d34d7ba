//! Style-to-geometry resolution for the reflow engine.
//!
//! The cascade resolver produces one [`ComputedStyle`] per box. Layout never reads
//! it directly; it wraps it in a [`StyleFacet`] bound to the box's containing block
//! and asks the facet for resolved rectangles and classification predicates.

pub mod cascade;
pub mod facet;
pub mod font;
pub mod length;
pub mod style_model;

pub use cascade::{CascadeResolver, DocumentContext, Media, NodeKey};
pub use facet::StyleFacet;
pub use font::{FontMetricsProvider, FontSpec, FontStyle, LineMetrics};
pub use length::{CssContext, Dimension, Length, LengthUnit, ReferenceContext};
pub use style_model::{
    BackgroundAttachment, BackgroundRepeat, Clear, ComputedStyle, Display, Edges, Float,
    Overflow, Position, Sides,
};
