//! Viewport controller and the concurrent layout/render pipeline.
//!
//! A [`ViewportController`] sits between a host widget and the box builder. Document
//! and viewport changes become [`ReflowEvent`]s for a layout worker, which rebuilds
//! the box tree, fits it to the viewport and publishes it; a render worker then asks
//! the host to repaint. Newer requests cancel a pass that is still running.

pub mod config;
pub mod controller;
pub mod fit;
pub mod host;
pub mod interaction;
pub mod listeners;
pub mod pipeline;
pub mod queue;
pub mod root_slot;
mod worker;

pub use config::ViewConfig;
pub use controller::ViewportController;
pub use host::{HostViewport, PageInfo, ScrollMode};
pub use interaction::InteractionState;
pub use listeners::{DocumentListener, DocumentListeners, ListenerId};
pub use pipeline::{PassCounts, PassOutcome, PassReport, ViewParts};
pub use queue::{LayoutRequest, ReflowEvent, ReflowQueue};
pub use root_slot::{PassGeometry, RootSlot};
