//! Color remapping layer.
//!
//! Every visible pixel is put in one class. Light, desaturated pixels are
//! background; strongly hued pixels are foreground; everything else
//! (near-black, grays, dark muted tones) is left alone. Recoloring keeps the
//! shading of the original art: background pixels scale the target color by
//! their brightness, foreground pixels take the target hue and saturation
//! but keep their own lightness.

use image::{Rgba, RgbaImage};
use palette::{Hsl, IntoColor, Srgb};
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::{LayerConfig, LayerEffect, RenderContext};
use crate::color::ColorSpec;
use crate::error::Error;

/// Default minimum intensity (exclusive) of a background pixel.
pub const DEFAULT_LIGHT_INTENSITY: u8 = 220;
/// Default maximum channel spread (exclusive) of a background pixel.
pub const DEFAULT_NEUTRAL_SPREAD: u8 = 30;
/// Default minimum channel spread (exclusive) of a foreground pixel.
pub const DEFAULT_SATURATION_SPREAD: u8 = 64;

// ============================================================================
// Classification
// ============================================================================

/// Thresholds used to sort pixels into classes.
///
/// All comparisons are on 0-255 channel values. Intensity is the rounded
/// mean of the red, green and blue channels; spread is the largest channel
/// minus the smallest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "jsonschema", derive(schemars::JsonSchema))]
#[serde(rename_all = "camelCase", default)]
pub struct ClassifierThresholds {
    /// A background pixel is brighter than this.
    pub light_intensity: u8,
    /// A background pixel has a spread below this.
    pub neutral_spread: u8,
    /// A foreground pixel has a spread above this.
    pub saturation_spread: u8,
}

impl Default for ClassifierThresholds {
    fn default() -> Self {
        Self {
            light_intensity: DEFAULT_LIGHT_INTENSITY,
            neutral_spread: DEFAULT_NEUTRAL_SPREAD,
            saturation_spread: DEFAULT_SATURATION_SPREAD,
        }
    }
}

/// The class a pixel falls into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PixelClass {
    /// Near-white and near-neutral.
    Background,
    /// Strongly hued.
    Foreground,
    /// Neither; never recolored.
    Other,
    /// Alpha is zero; never recolored.
    Transparent,
}

/// Rounded mean of the color channels.
pub fn intensity(pixel: Rgba<u8>) -> u8 {
    let [r, g, b, _] = pixel.0;
    let sum = r as u16 + g as u16 + b as u16;
    ((sum as f32) / 3.0).round() as u8
}

/// Largest color channel minus the smallest.
pub fn spread(pixel: Rgba<u8>) -> u8 {
    let [r, g, b, _] = pixel.0;
    r.max(g).max(b) - r.min(g).min(b)
}

impl ClassifierThresholds {
    /// Classifies a single pixel. The background test runs first, so a pixel
    /// can never be both.
    pub fn classify(&self, pixel: Rgba<u8>) -> PixelClass {
        if pixel[3] == 0 {
            return PixelClass::Transparent;
        }
        let spread = spread(pixel);
        if intensity(pixel) > self.light_intensity && spread < self.neutral_spread {
            PixelClass::Background
        } else if spread > self.saturation_spread {
            PixelClass::Foreground
        } else {
            PixelClass::Other
        }
    }
}

/// Number of pixels in each class, counted before recoloring.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ClassCensus {
    pub background: usize,
    pub foreground: usize,
    pub other: usize,
    pub transparent: usize,
}

impl ClassCensus {
    fn record(&mut self, class: PixelClass) {
        match class {
            PixelClass::Background => self.background += 1,
            PixelClass::Foreground => self.foreground += 1,
            PixelClass::Other => self.other += 1,
            PixelClass::Transparent => self.transparent += 1,
        }
    }

    /// Total number of pixels counted.
    pub fn total(&self) -> usize {
        self.background + self.foreground + self.other + self.transparent
    }
}

// ============================================================================
// RemapConfig
// ============================================================================

/// Configuration for color remapping.
///
/// A role without a color passes through unmodified. The alpha of a role's
/// color is the strength of the recolor: 255 replaces the color outright,
/// lower values mix the recolored value with the original.
///
/// # Emitted Properties
///
/// - [`ClassCensus`]: the class counts of the image before recoloring.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RemapConfig {
    /// Target for strongly hued pixels.
    pub foreground: Option<ColorSpec>,
    /// Target for light, neutral pixels.
    pub background: Option<ColorSpec>,
    pub thresholds: ClassifierThresholds,
}

impl RemapConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_foreground(mut self, color: ColorSpec) -> Self {
        self.foreground = Some(color);
        self
    }

    pub fn with_background(mut self, color: ColorSpec) -> Self {
        self.background = Some(color);
        self
    }

    pub fn with_thresholds(mut self, thresholds: ClassifierThresholds) -> Self {
        self.thresholds = thresholds;
        self
    }
}

impl LayerConfig for RemapConfig {
    fn differs_from(&self, other: &Self) -> bool {
        self != other
    }

    fn is_noop(&self) -> bool {
        self.foreground.is_none() && self.background.is_none()
    }
}

impl LayerEffect for RemapConfig {
    fn transform(&self, ctx: &mut RenderContext) -> Result<(), Error> {
        let census = remap_image(&mut ctx.rendition.data, self);
        debug!(
            tag = %ctx.rendition.tag(),
            background = census.background,
            foreground = census.foreground,
            other = census.other,
            "remapped colors"
        );
        ctx.set(census);
        Ok(())
    }
}

// ============================================================================
// Helper Functions
// ============================================================================

/// Recolors an image in place and returns the class counts.
pub fn remap_image(image: &mut RgbaImage, config: &RemapConfig) -> ClassCensus {
    let mut census = ClassCensus::default();

    for pixel in image.pixels_mut() {
        let class = config.thresholds.classify(*pixel);
        census.record(class);

        let recolored = match (class, config.background, config.foreground) {
            (PixelClass::Background, Some(target), _) => recolor_background(*pixel, target),
            (PixelClass::Foreground, _, Some(target)) => recolor_foreground(*pixel, target),
            _ => continue,
        };
        *pixel = recolored;
    }

    census
}

/// Scales the target color by the pixel's brightness relative to white.
pub fn recolor_background(pixel: Rgba<u8>, target: ColorSpec) -> Rgba<u8> {
    let [r, g, b, a] = pixel.0;
    let ratio = (r as f32 + g as f32 + b as f32) / (3.0 * 255.0);
    let scaled = [target.r, target.g, target.b].map(|c| c as f32 * ratio);
    mix(pixel, scaled, target.a, a)
}

/// Gives the pixel the target's hue and saturation, keeping its lightness.
pub fn recolor_foreground(pixel: Rgba<u8>, target: ColorSpec) -> Rgba<u8> {
    let [r, g, b, a] = pixel.0;
    let source: Hsl = Srgb::new(r as f32 / 255.0, g as f32 / 255.0, b as f32 / 255.0).into_color();
    let tint: Hsl = Srgb::new(
        target.r as f32 / 255.0,
        target.g as f32 / 255.0,
        target.b as f32 / 255.0,
    )
    .into_color();

    let tinted: Hsl = Hsl::new(tint.hue, tint.saturation, source.lightness);
    let recolored: Srgb = tinted.into_color();
    let scaled = [recolored.red, recolored.green, recolored.blue].map(|c| c.clamp(0.0, 1.0) * 255.0);
    mix(pixel, scaled, target.a, a)
}

/// Mixes the original pixel toward `target` by `strength / 255` and
/// quantizes with rounding. Alpha is carried over untouched.
fn mix(pixel: Rgba<u8>, target: [f32; 3], strength: u8, alpha: u8) -> Rgba<u8> {
    let t = strength as f32 / 255.0;
    let channel = |original: u8, target: f32| -> u8 {
        let original = original as f32;
        (original + (target - original) * t).round().clamp(0.0, 255.0) as u8
    };
    Rgba([
        channel(pixel[0], target[0]),
        channel(pixel[1], target[1]),
        channel(pixel[2], target[2]),
        alpha,
    ])
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn px(r: u8, g: u8, b: u8) -> Rgba<u8> {
        Rgba([r, g, b, 255])
    }

    #[test]
    fn intensity_and_spread() {
        assert_eq!(intensity(px(255, 255, 255)), 255);
        assert_eq!(intensity(px(0, 0, 1)), 0);
        assert_eq!(intensity(px(0, 1, 1)), 1);
        assert_eq!(spread(px(10, 200, 40)), 190);
        assert_eq!(spread(px(7, 7, 7)), 0);
    }

    #[test]
    fn background_intensity_boundary() {
        let t = ClassifierThresholds::default();
        assert_eq!(t.classify(px(221, 221, 221)), PixelClass::Background);
        assert_eq!(t.classify(px(220, 220, 220)), PixelClass::Other);
    }

    #[test]
    fn background_spread_boundary() {
        let t = ClassifierThresholds::default();
        // Intensity 240 in both cases; spread 29 vs 30.
        assert_eq!(t.classify(px(255, 240, 226)), PixelClass::Background);
        assert_eq!(t.classify(px(255, 241, 225)), PixelClass::Other);
    }

    #[test]
    fn foreground_spread_boundary() {
        let t = ClassifierThresholds::default();
        assert_eq!(t.classify(px(100, 100, 165)), PixelClass::Foreground);
        assert_eq!(t.classify(px(100, 100, 164)), PixelClass::Other);
    }

    #[test]
    fn background_wins_when_both_match() {
        let t = ClassifierThresholds {
            light_intensity: 200,
            neutral_spread: 40,
            saturation_spread: 10,
        };
        assert_eq!(t.classify(px(250, 240, 230)), PixelClass::Background);
    }

    #[test]
    fn dark_and_transparent_pixels_are_not_recolorable() {
        let t = ClassifierThresholds::default();
        assert_eq!(t.classify(px(0, 0, 0)), PixelClass::Other);
        assert_eq!(t.classify(px(128, 128, 128)), PixelClass::Other);
        assert_eq!(t.classify(Rgba([0, 0, 255, 0])), PixelClass::Transparent);
    }

    #[test]
    fn white_becomes_target_background() {
        let mut image = RgbaImage::from_pixel(256, 256, px(255, 255, 255));
        let config = RemapConfig::new().with_background(ColorSpec::rgb(0xF0, 0xF0, 0xF0));
        let census = remap_image(&mut image, &config);

        assert_eq!(census.background, 256 * 256);
        assert!(image.pixels().all(|p| p.0 == [240, 240, 240, 255]));
    }

    #[test]
    fn background_keeps_shading() {
        let target = ColorSpec::rgb(200, 100, 0);
        let lit = recolor_background(px(255, 255, 255), target);
        let shaded = recolor_background(px(230, 230, 230), target);
        assert_eq!(lit.0, [200, 100, 0, 255]);
        assert_eq!(shaded.0, [180, 90, 0, 255]);
    }

    #[test]
    fn blue_becomes_orange_and_black_stays() {
        let mut image = RgbaImage::from_fn(8, 8, |x, _| {
            if x < 4 { px(0, 0, 255) } else { px(0, 0, 0) }
        });
        let config = RemapConfig::new().with_foreground(ColorSpec::rgb(0xFF, 0x8A, 0x00));
        let census = remap_image(&mut image, &config);
        assert_eq!(census.foreground, 32);
        assert_eq!(census.other, 32);

        let orange = image.get_pixel(0, 0);
        assert!(orange[0] >= 250, "{orange:?}");
        assert!((130..=145).contains(&orange[1]), "{orange:?}");
        assert!(orange[2] <= 5, "{orange:?}");
        assert_eq!(orange[3], 255);
        assert_eq!(image.get_pixel(7, 7).0, [0, 0, 0, 255]);
    }

    #[test]
    fn foreground_keeps_relative_lightness() {
        let target = ColorSpec::rgb(0xFF, 0x8A, 0x00);
        let light = recolor_foreground(px(120, 120, 255), target);
        let dark = recolor_foreground(px(0, 0, 120), target);
        let lightness = |p: Rgba<u8>| p[0].max(p[1]).max(p[2]) as u16 + p[0].min(p[1]).min(p[2]) as u16;
        assert!(lightness(light) > lightness(dark));
        assert!(light[0] > light[2] && dark[0] > dark[2]);
    }

    #[test]
    fn alpha_is_preserved() {
        let mut image = RgbaImage::new(3, 1);
        image.put_pixel(0, 0, Rgba([255, 255, 255, 90]));
        image.put_pixel(1, 0, Rgba([0, 0, 255, 17]));
        image.put_pixel(2, 0, Rgba([0, 0, 255, 0]));
        let config = RemapConfig::new()
            .with_background(ColorSpec::rgb(10, 20, 30))
            .with_foreground(ColorSpec::rgb(0, 255, 0));
        let census = remap_image(&mut image, &config);

        assert_eq!(image.get_pixel(0, 0)[3], 90);
        assert_eq!(image.get_pixel(1, 0)[3], 17);
        assert_eq!(image.get_pixel(2, 0).0, [0, 0, 255, 0]);
        assert_eq!(census.transparent, 1);
        assert_eq!(census.total(), 3);
    }

    #[test]
    fn missing_role_passes_through() {
        let original = RgbaImage::from_fn(4, 4, |x, _| {
            if x % 2 == 0 { px(255, 255, 255) } else { px(255, 0, 0) }
        });
        let mut image = original.clone();
        remap_image(&mut image, &RemapConfig::new().with_background(ColorSpec::rgb(0, 0, 0)));
        for (x, y, p) in image.enumerate_pixels() {
            if x % 2 == 1 {
                assert_eq!(p, original.get_pixel(x, y));
            } else {
                assert_eq!(p.0, [0, 0, 0, 255]);
            }
        }
    }

    #[test]
    fn color_alpha_sets_strength() {
        let half = ColorSpec::rgba(0, 0, 0, 128);
        let mixed = recolor_background(px(255, 255, 255), half);
        assert_eq!(mixed.0, [127, 127, 127, 255]);
    }

    #[test]
    fn noop_without_colors() {
        assert!(RemapConfig::new().is_noop());
        assert!(!RemapConfig::new().with_foreground(ColorSpec::rgb(1, 2, 3)).is_noop());
    }
}
