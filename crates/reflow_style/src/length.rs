//! CSS lengths and their resolution to pixels.
//!
//! Absolute units go through the reference pixel reported by a [`CssContext`];
//! font-relative units use the font size of the style being resolved; percentages
//! resolve against the containing-block width (for vertical margins and padding
//! too, as CSS 2.2 §8.3 requires).

/// Millimetres in one inch.
const MM_PER_INCH: f32 = 25.4;
/// Points in one inch.
const PT_PER_INCH: f32 = 72.0;
/// Picas in one inch.
const PC_PER_INCH: f32 = 6.0;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum LengthUnit {
    #[default]
    Px,
    Pt,
    Pc,
    In,
    Cm,
    Mm,
    Em,
    Ex,
    Percent,
}

impl LengthUnit {
    /// Whether the unit has a fixed physical size, independent of fonts and
    /// containing blocks.
    #[inline]
    pub const fn is_absolute(self) -> bool {
        matches!(
            self,
            Self::Px | Self::Pt | Self::Pc | Self::In | Self::Cm | Self::Mm
        )
    }
}

/// Environment needed to turn a length into device pixels.
pub trait CssContext {
    /// Millimetres covered by one CSS pixel.
    fn mm_per_px(&self) -> f32 {
        MM_PER_INCH / 96.0
    }

    /// Ratio of the x-height to the font size, used for `ex`.
    fn x_height_ratio(&self) -> f32 {
        0.5
    }
}

/// Context using the CSS reference pixel (96 per inch) and a half-em x-height.
#[derive(Clone, Copy, Debug, Default)]
pub struct ReferenceContext;

impl CssContext for ReferenceContext {}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Length {
    pub value: f32,
    pub unit: LengthUnit,
}

impl Length {
    #[inline]
    pub const fn px(value: f32) -> Self {
        Self {
            value,
            unit: LengthUnit::Px,
        }
    }

    #[inline]
    pub const fn percent(value: f32) -> Self {
        Self {
            value,
            unit: LengthUnit::Percent,
        }
    }

    #[inline]
    pub const fn new(value: f32, unit: LengthUnit) -> Self {
        Self { value, unit }
    }

    /// Resolve to pixels.
    ///
    /// # Arguments
    ///
    /// * `ctx` - Unit conversion environment
    /// * `font_size` - Font size in pixels of the style owning this length
    /// * `percentage_base` - Length that `100%` refers to
    pub fn to_px(&self, ctx: &dyn CssContext, font_size: f32, percentage_base: f32) -> f32 {
        let px_per_inch = MM_PER_INCH / ctx.mm_per_px();
        match self.unit {
            LengthUnit::Px => self.value,
            LengthUnit::Pt => self.value * px_per_inch / PT_PER_INCH,
            LengthUnit::Pc => self.value * px_per_inch / PC_PER_INCH,
            LengthUnit::In => self.value * px_per_inch,
            LengthUnit::Cm => self.value * 10.0 / ctx.mm_per_px(),
            LengthUnit::Mm => self.value / ctx.mm_per_px(),
            LengthUnit::Em => self.value * font_size,
            LengthUnit::Ex => self.value * font_size * ctx.x_height_ratio(),
            LengthUnit::Percent => self.value * percentage_base / 100.0,
        }
    }
}

/// A length that may also be `auto`.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub enum Dimension {
    #[default]
    Auto,
    Length(Length),
}

impl Dimension {
    #[inline]
    pub const fn px(value: f32) -> Self {
        Self::Length(Length::px(value))
    }

    #[inline]
    pub const fn is_auto(&self) -> bool {
        matches!(self, Self::Auto)
    }

    /// True only for a length in an absolute unit; `auto` has no unit at all.
    #[inline]
    pub const fn has_absolute_unit(&self) -> bool {
        match self {
            Self::Auto => false,
            Self::Length(length) => length.unit.is_absolute(),
        }
    }

    /// Resolve to pixels, with `auto` becoming zero.
    pub fn to_px_or_zero(&self, ctx: &dyn CssContext, font_size: f32, percentage_base: f32) -> f32 {
        match self {
            Self::Auto => 0.0,
            Self::Length(length) => length.to_px(ctx, font_size, percentage_base),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Test absolute unit conversions at the reference pixel.
    ///
    /// # Panics
    /// Panics if a conversion drifts from the CSS reference values.
    #[test]
    fn absolute_units_use_reference_pixel() {
        let ctx = ReferenceContext;
        let cases = [
            (Length::new(1.0, LengthUnit::In), 96.0),
            (Length::new(72.0, LengthUnit::Pt), 96.0),
            (Length::new(1.0, LengthUnit::Pc), 16.0),
            (Length::new(2.54, LengthUnit::Cm), 96.0),
            (Length::new(25.4, LengthUnit::Mm), 96.0),
        ];
        for (length, expected) in cases {
            let resolved = length.to_px(&ctx, 16.0, 0.0);
            assert!(
                (resolved - expected).abs() < 0.01,
                "{length:?} resolved to {resolved}"
            );
        }
    }

    /// Test font-relative and percentage resolution.
    ///
    /// # Panics
    /// Panics if relative units ignore their base.
    #[test]
    fn relative_units_follow_their_base() {
        let ctx = ReferenceContext;
        assert!((Length::new(2.0, LengthUnit::Em).to_px(&ctx, 10.0, 0.0) - 20.0).abs() < f32::EPSILON);
        assert!((Length::new(2.0, LengthUnit::Ex).to_px(&ctx, 10.0, 0.0) - 10.0).abs() < f32::EPSILON);
        assert!((Length::percent(25.0).to_px(&ctx, 10.0, 400.0) - 100.0).abs() < f32::EPSILON);
    }

    #[test]
    fn only_absolute_lengths_report_absolute_unit() {
        assert!(Dimension::px(10.0).has_absolute_unit());
        assert!(Dimension::Length(Length::new(1.0, LengthUnit::Cm)).has_absolute_unit());
        assert!(!Dimension::Length(Length::percent(50.0)).has_absolute_unit());
        assert!(!Dimension::Length(Length::new(1.0, LengthUnit::Em)).has_absolute_unit());
        assert!(!Dimension::Auto.has_absolute_unit());
    }
}
