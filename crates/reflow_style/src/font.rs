//! Font description handed to the host's metrics provider.

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum FontStyle {
    #[default]
    Normal,
    Italic,
    Oblique,
}

/// Resolved font for one box: what a metrics provider needs to measure lines.
#[derive(Clone, Debug, PartialEq)]
pub struct FontSpec {
    /// Family names in preference order.
    pub families: Vec<String>,
    /// Computed font size in pixels.
    pub size: f32,
    /// Numeric weight, 100..=900.
    pub weight: u16,
    pub style: FontStyle,
}

impl Default for FontSpec {
    fn default() -> Self {
        Self {
            families: Vec::new(),
            size: 16.0,
            weight: 400,
            style: FontStyle::Normal,
        }
    }
}

/// Vertical metrics of a font, in pixels.
///
/// These describe the font rather than a particular line of text, so asking for
/// the metrics of an empty string is enough.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct LineMetrics {
    pub ascent: f32,
    pub descent: f32,
    pub leading: f32,
}

impl LineMetrics {
    /// Distance between consecutive baselines.
    #[inline]
    pub fn line_height(&self) -> f32 {
        self.ascent + self.descent + self.leading
    }
}

/// Measures fonts for layout. Shaping and rasterisation live behind this trait.
pub trait FontMetricsProvider: Send + Sync {
    fn line_metrics(&self, font: &FontSpec) -> LineMetrics;
}
