//! Watermark layer configuration and application.

use image::RgbaImage;
use tracing::{debug, warn};

use super::glyph::{CELL_SIZE, InkBox, composite_over, outline_text, rasterize};
use super::{LayerConfig, LayerEffect, RenderContext};
use crate::color::ColorSpec;
use crate::error::{ConfigError, Error, RenderError};
use crate::icon::RectPx;

/// Most characters a watermark may hold.
pub const MAX_TEXT_CHARS: usize = 4;

/// Text cell height as a fraction of the rendition dimension.
pub const DEFAULT_SCALE: f32 = 1.0 / 7.0;

/// Distance from the anchored edges as a fraction of the rendition dimension.
pub const DEFAULT_INSET: f32 = 1.0 / 5.0;

/// Dark slate used when no text color is given.
pub const DEFAULT_TEXT_COLOR: ColorSpec = ColorSpec::rgb(38, 44, 42);

const SCALE_RANGE: (f32, f32) = (0.01, 1.0);
const INSET_RANGE: (f32, f32) = (0.0, 0.5);

// ============================================================================
// Anchor
// ============================================================================

/// Where the text sits on the rendition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Anchor {
    TopLeft,
    TopRight,
    BottomLeft,
    #[default]
    BottomRight,
    Center,
}

// ============================================================================
// Properties
// ============================================================================

/// Pixel rectangle covered by the watermark glyphs of one rendition.
///
/// Emitted by the watermark layer when text was drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GlyphBounds(pub RectPx);

// ============================================================================
// WatermarkConfig
// ============================================================================

/// Configuration for the text watermark.
///
/// Geometry is relative: `scale` and `inset` are fractions of the rendition
/// dimension, so every rendition of a container gets the same proportions.
///
/// # Emitted Properties
///
/// - [`GlyphBounds`]: the area the glyphs cover.
#[derive(Debug, Clone, PartialEq)]
pub struct WatermarkConfig {
    text: String,
    pub color: ColorSpec,
    pub anchor: Anchor,
    scale: f32,
    inset: f32,
    /// Renditions narrower than this are passed through.
    pub min_dimension: u32,
}

impl WatermarkConfig {
    /// Creates a watermark with default color, anchor and geometry.
    ///
    /// Fails if the text has more than [`MAX_TEXT_CHARS`] characters or
    /// contains a control character. Characters outside the glyph set are
    /// reported when rendering.
    pub fn new(text: impl Into<String>) -> Result<Self, ConfigError> {
        let text = text.into();
        validate_text(&text)?;
        Ok(Self {
            text,
            color: DEFAULT_TEXT_COLOR,
            anchor: Anchor::default(),
            scale: DEFAULT_SCALE,
            inset: DEFAULT_INSET,
            min_dimension: 0,
        })
    }

    pub fn with_color(mut self, color: ColorSpec) -> Self {
        self.color = color;
        self
    }

    pub fn with_anchor(mut self, anchor: Anchor) -> Self {
        self.anchor = anchor;
        self
    }

    pub fn with_scale(mut self, scale: f32) -> Result<Self, ConfigError> {
        self.scale = check_range("scale", scale, SCALE_RANGE)?;
        Ok(self)
    }

    pub fn with_inset(mut self, inset: f32) -> Result<Self, ConfigError> {
        self.inset = check_range("inset", inset, INSET_RANGE)?;
        Ok(self)
    }

    pub fn with_min_dimension(mut self, min_dimension: u32) -> Self {
        self.min_dimension = min_dimension;
        self
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn scale(&self) -> f32 {
        self.scale
    }

    pub fn inset(&self) -> f32 {
        self.inset
    }

    /// Places the ink box of the text on a `dimension`-wide rendition.
    ///
    /// Returns the pixel scale of one font unit, the translation of the text
    /// origin, and the pixel rectangle the ink covers.
    fn layout(&self, ink: InkBox, dimension: u32) -> (f32, f32, f32, RectPx) {
        let dim = dimension as f32;
        let unit = dim * self.scale / CELL_SIZE as f32;
        let inset = dim * self.inset;
        let width = ink.width() as f32 * unit;
        let height = ink.height() as f32 * unit;

        let (left, top) = match self.anchor {
            Anchor::TopLeft => (inset, inset),
            Anchor::TopRight => (dim - inset - width, inset),
            Anchor::BottomLeft => (inset, dim - inset - height),
            Anchor::BottomRight => (dim - inset - width, dim - inset - height),
            Anchor::Center => ((dim - width) / 2.0, (dim - height) / 2.0),
        };

        let clamp = |v: f32| v.clamp(0.0, dim) as u32;
        let (x0, y0) = (clamp(left.floor()), clamp(top.floor()));
        let (x1, y1) = (clamp((left + width).ceil()), clamp((top + height).ceil()));
        let bounds = RectPx::new(x0, y0, x1 - x0, y1 - y0);

        let dx = left - ink.x0 as f32 * unit;
        let dy = top - ink.y0 as f32 * unit;
        (unit, dx, dy, bounds)
    }
}

impl LayerConfig for WatermarkConfig {
    fn differs_from(&self, other: &Self) -> bool {
        self.text != other.text
            || self.color != other.color
            || self.anchor != other.anchor
            || self.min_dimension != other.min_dimension
            || (self.scale - other.scale).abs() > 0.0001
            || (self.inset - other.inset).abs() > 0.0001
    }

    fn is_noop(&self) -> bool {
        self.text.is_empty()
    }
}

impl LayerEffect for WatermarkConfig {
    fn transform(&self, ctx: &mut RenderContext) -> Result<(), Error> {
        let tag = ctx.rendition.tag();
        if let Some(bounds) = apply_watermark(&mut ctx.rendition.data, self)? {
            debug!(%tag, ?bounds, text = %self.text, "drew watermark");
            ctx.set(GlyphBounds(bounds));
        }
        Ok(())
    }
}

// ============================================================================
// Helper Functions
// ============================================================================

/// Draws the watermark onto an image.
///
/// Returns the covered rectangle, or `None` if nothing was drawn (empty or
/// blank text, or an image below `min_dimension`).
pub fn apply_watermark(
    image: &mut RgbaImage,
    config: &WatermarkConfig,
) -> Result<Option<RectPx>, RenderError> {
    if config.text.is_empty() {
        return Ok(None);
    }
    let dimension = image.width();
    if dimension < config.min_dimension {
        warn!(
            dimension,
            min_dimension = config.min_dimension,
            "rendition too small, skipping watermark"
        );
        return Ok(None);
    }

    let outline = outline_text(&config.text)?;
    let Some(ink) = outline.ink else {
        return Ok(None);
    };

    let (unit, dx, dy, bounds) = config.layout(ink, dimension);
    if bounds.width == 0 || bounds.height == 0 {
        return Ok(None);
    }

    let layer = rasterize(
        &outline,
        bounds.width,
        bounds.height,
        unit,
        dx - bounds.x as f32,
        dy - bounds.y as f32,
        config.color,
    )?;
    composite_over(image, &layer, bounds.x as i32, bounds.y as i32);

    Ok(Some(bounds))
}

fn validate_text(text: &str) -> Result<(), ConfigError> {
    let len = text.chars().count();
    if len > MAX_TEXT_CHARS {
        return Err(ConfigError::TextTooLong {
            text: text.to_string(),
            len,
            max: MAX_TEXT_CHARS,
        });
    }
    match text.chars().find(|c| c.is_control()) {
        Some(c) => Err(ConfigError::UnsupportedTextCharacter(c)),
        None => Ok(()),
    }
}

fn check_range(name: &'static str, value: f32, (min, max): (f32, f32)) -> Result<f32, ConfigError> {
    if (min..=max).contains(&value) {
        Ok(value)
    } else {
        Err(ConfigError::OutOfRange {
            name,
            value,
            min,
            max,
        })
    }
}

// ============================================================================
// Tests
// ============================================================================
