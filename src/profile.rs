//! Serializable stamping profile.
//!
//! A [`StampProfile`] captures all layer settings in a format that can be
//! stored as JSON and handed to the pipeline by whatever front end collects
//! the caller's options.
//!
//! # Example
//!
//! ```
//! use icns_stamp::{ColorSpec, RecolorSettings, StampProfile, WatermarkSettings};
//!
//! let profile = StampProfile::new()
//!     .with_recolor(RecolorSettings {
//!         background: Some(ColorSpec::rgb(0xF0, 0xF0, 0xF0)),
//!         ..RecolorSettings::default()
//!     })
//!     .with_watermark(WatermarkSettings::new("22"));
//!
//! let json = profile.to_json().unwrap();
//! let restored = StampProfile::from_json(&json).unwrap();
//! assert_eq!(restored, profile);
//! ```

use serde::{Deserialize, Serialize};

use crate::color::ColorSpec;
use crate::error::ConfigError;
use crate::layer::watermark::{DEFAULT_INSET, DEFAULT_SCALE};
use crate::layer::{Anchor, ClassifierThresholds};

// ============================================================================
// Layer Settings (Serializable)
// ============================================================================

/// Serializable settings for the color remapping layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "jsonschema", derive(schemars::JsonSchema))]
#[serde(rename_all = "camelCase")]
pub struct RecolorSettings {
    /// Target for strongly hued pixels, as `#RRGGBB` or `#RRGGBBAA`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[cfg_attr(feature = "jsonschema", schemars(with = "Option<String>"))]
    pub foreground: Option<ColorSpec>,

    /// Target for light, neutral pixels, as `#RRGGBB` or `#RRGGBBAA`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[cfg_attr(feature = "jsonschema", schemars(with = "Option<String>"))]
    pub background: Option<ColorSpec>,

    /// Classification thresholds.
    #[serde(default)]
    pub thresholds: ClassifierThresholds,

    /// Whether this layer is enabled.
    #[serde(default = "default_true")]
    pub enabled: bool,
}

impl Default for RecolorSettings {
    fn default() -> Self {
        Self {
            foreground: None,
            background: None,
            thresholds: ClassifierThresholds::default(),
            enabled: true,
        }
    }
}

/// Serializable settings for the watermark layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "jsonschema", derive(schemars::JsonSchema))]
#[serde(rename_all = "camelCase")]
pub struct WatermarkSettings {
    /// Text to draw (at most four characters).
    pub text: String,

    /// Text color. Defaults to a dark slate.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[cfg_attr(feature = "jsonschema", schemars(with = "Option<String>"))]
    pub color: Option<ColorSpec>,

    /// Where the text sits.
    #[serde(default)]
    pub anchor: SerializableAnchor,

    /// Text height as a fraction of the rendition dimension.
    #[serde(default = "default_scale")]
    pub scale: f32,

    /// Distance from the anchored edges as a fraction of the dimension.
    #[serde(default = "default_inset")]
    pub inset: f32,

    /// Renditions narrower than this many pixels are left alone.
    #[serde(default)]
    pub min_dimension: u32,

    /// Whether this layer is enabled.
    #[serde(default = "default_true")]
    pub enabled: bool,
}

impl WatermarkSettings {
    /// Creates enabled settings for `text` with default geometry.
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            color: None,
            anchor: SerializableAnchor::default(),
            scale: DEFAULT_SCALE,
            inset: DEFAULT_INSET,
            min_dimension: 0,
            enabled: true,
        }
    }
}

/// Serializable version of [`Anchor`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[cfg_attr(feature = "jsonschema", derive(schemars::JsonSchema))]
#[cfg_attr(feature = "clap", derive(clap::ValueEnum))]
#[serde(rename_all = "kebab-case")]
pub enum SerializableAnchor {
    TopLeft,
    TopRight,
    BottomLeft,
    #[default]
    BottomRight,
    Center,
}

impl From<Anchor> for SerializableAnchor {
    fn from(anchor: Anchor) -> Self {
        match anchor {
            Anchor::TopLeft => Self::TopLeft,
            Anchor::TopRight => Self::TopRight,
            Anchor::BottomLeft => Self::BottomLeft,
            Anchor::BottomRight => Self::BottomRight,
            Anchor::Center => Self::Center,
        }
    }
}

impl From<SerializableAnchor> for Anchor {
    fn from(anchor: SerializableAnchor) -> Self {
        match anchor {
            SerializableAnchor::TopLeft => Self::TopLeft,
            SerializableAnchor::TopRight => Self::TopRight,
            SerializableAnchor::BottomLeft => Self::BottomLeft,
            SerializableAnchor::BottomRight => Self::BottomRight,
            SerializableAnchor::Center => Self::Center,
        }
    }
}

fn default_true() -> bool {
    true
}

fn default_scale() -> f32 {
    DEFAULT_SCALE
}

fn default_inset() -> f32 {
    DEFAULT_INSET
}

// ============================================================================
// StampProfile
// ============================================================================

/// A serializable profile containing all stamping settings.
///
/// # JSON Format
///
/// ```json
/// {
///   "recolor": {
///     "foreground": "#FF8A00",
///     "background": "#F0F0F0",
///     "thresholds": { "lightIntensity": 220, "neutralSpread": 30, "saturationSpread": 64 },
///     "enabled": true
///   },
///   "watermark": {
///     "text": "22",
///     "anchor": "bottom-right",
///     "scale": 0.14285715,
///     "inset": 0.2,
///     "minDimension": 0,
///     "enabled": true
///   }
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[cfg_attr(feature = "jsonschema", derive(schemars::JsonSchema))]
#[serde(rename_all = "camelCase")]
pub struct StampProfile {
    /// Color remapping settings. `None` means no config set.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recolor: Option<RecolorSettings>,

    /// Watermark settings. `None` means no config set.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub watermark: Option<WatermarkSettings>,
}

impl StampProfile {
    /// Creates an empty profile with no layers configured.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets recolor settings.
    pub fn with_recolor(mut self, settings: RecolorSettings) -> Self {
        self.recolor = Some(settings);
        self
    }

    /// Sets watermark settings.
    pub fn with_watermark(mut self, settings: WatermarkSettings) -> Self {
        self.watermark = Some(settings);
        self
    }

    /// Serializes the profile to a JSON string.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Serializes the profile to a pretty-printed JSON string.
    pub fn to_json_pretty(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Deserializes a profile from a JSON string.
    ///
    /// Malformed JSON and invalid color strings are both reported as
    /// [`ConfigError::Profile`].
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        serde_json::from_str(json).map_err(|e| ConfigError::Profile(e.to_string()))
    }
}

// ============================================================================
// Tests
// ============================================================================
