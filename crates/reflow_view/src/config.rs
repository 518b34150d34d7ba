//! Configuration for the viewport controller.
//!
//! Decides whether layout runs on background workers, how stylesheets are flushed
//! when a document is set, and the device resolution absolute units resolve
//! against. Configuration can be loaded from environment variables or constructed
//! programmatically.

use std::env;

/// CSS reference resolution.
const DEFAULT_DPI: f32 = 96.0;

#[derive(Clone, Debug, PartialEq)]
pub struct ViewConfig {
    /// Run layout and repaint on the `reflow-layout`/`reflow-render` workers. When
    /// off the host drives layout itself through `layout_now`.
    pub use_threads: bool,
    /// Keep parsed stylesheets across documents and flush only derived state.
    pub cache_stylesheets: bool,
    /// Device dots per inch (minimum 1)
    pub dpi: f32,
}

impl ViewConfig {
    /// Construct a new `ViewConfig` with explicit values.
    ///
    /// # Arguments
    ///
    /// * `use_threads` - Whether layout runs on background workers
    /// * `cache_stylesheets` - Whether document changes keep cached stylesheets
    /// * `dpi` - Device resolution in dots per inch (minimum 1)
    #[inline]
    #[must_use]
    pub const fn new(use_threads: bool, cache_stylesheets: bool, dpi: f32) -> Self {
        let dpi = if dpi < 1.0 { 1.0 } else { dpi };
        Self {
            use_threads,
            cache_stylesheets,
            dpi,
        }
    }

    /// Load configuration from environment variables.
    ///
    /// Reads the following environment variables:
    /// - `REFLOW_USE_THREADS`: "0" or "false" lays out on the caller (default: threaded)
    /// - `REFLOW_CACHE_STYLESHEETS`: "0" or "false" flushes every stylesheet on
    ///   document change (default: cached)
    /// - `REFLOW_DPI`: Device resolution (default: 96)
    #[inline]
    #[must_use]
    pub fn from_env() -> Self {
        let use_threads = flag("REFLOW_USE_THREADS");
        let cache_stylesheets = flag("REFLOW_CACHE_STYLESHEETS");
        let dpi = env::var("REFLOW_DPI")
            .ok()
            .and_then(|val| val.trim().parse::<f32>().ok())
            .filter(|dpi| dpi.is_finite())
            .unwrap_or(DEFAULT_DPI)
            .max(1.0);
        Self::new(use_threads, cache_stylesheets, dpi)
    }
}

impl Default for ViewConfig {
    fn default() -> Self {
        Self::new(true, true, DEFAULT_DPI)
    }
}

/// Boolean switch that is on unless set to "0" or "false".
fn flag(name: &str) -> bool {
    env::var(name).map_or(true, |val| {
        let val = val.trim();
        !(val == "0" || val.eq_ignore_ascii_case("false"))
    })
}
