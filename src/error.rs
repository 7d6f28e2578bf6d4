//! Error types for the icon stamping pipeline.
//!
//! Every failure is fatal for the current run. Errors raised while a single
//! rendition is being transformed are wrapped in [`Error::Rendition`] so the
//! caller can tell which size failed.

use thiserror::Error;

use crate::container::OSType;
use crate::icon::SizeTag;

/// Malformed caller input.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    /// A color string was not `#RRGGBB` or `#RRGGBBAA`.
    #[error("invalid color {0:?}: expected '#' followed by 6 or 8 hex digits")]
    InvalidColor(String),

    /// Watermark text longer than the compositor accepts.
    #[error("watermark text {text:?} has {len} characters (at most {max} allowed)")]
    TextTooLong { text: String, len: usize, max: usize },

    /// Watermark text containing a control character.
    #[error("watermark text contains unsupported character {0:?}")]
    UnsupportedTextCharacter(char),

    /// A numeric setting outside its accepted range.
    #[error("{name} must be within {min}..={max} (got {value})")]
    OutOfRange {
        name: &'static str,
        value: f32,
        min: f32,
        max: f32,
    },

    /// The profile JSON could not be parsed.
    #[error("invalid profile: {0}")]
    Profile(String),
}

/// Unrecognized or corrupt container bytes, or a rendition the container
/// format cannot hold.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FormatError {
    #[error("not an icns container (wrong magic literal)")]
    BadMagic,

    #[error("container is truncated")]
    Truncated,

    #[error("header declares {declared} bytes but the input has {actual}")]
    LengthMismatch { declared: u32, actual: usize },

    #[error("element '{ostype}' has invalid length {length}")]
    InvalidElementLength { ostype: String, length: u32 },

    #[error("invalid RLE-compressed data in '{0}'")]
    InvalidRle(String),

    #[error("element '{ostype}' has {actual} payload bytes (expected {expected})")]
    PayloadLength {
        ostype: String,
        expected: usize,
        actual: usize,
    },

    #[error("cannot decode '{ostype}': {reason}")]
    Decode { ostype: String, reason: String },

    #[error("cannot encode '{ostype}': {reason}")]
    Encode { ostype: String, reason: String },

    #[error("'{ostype}' decoded to {width}x{height} (expected {expected}x{expected})")]
    WrongDimensions {
        ostype: String,
        width: u32,
        height: u32,
        expected: u32,
    },

    #[error("container holds more than one '{0}' element")]
    DuplicateRendition(OSType),

    #[error("container has no decodable renditions")]
    NoRenditions,

    #[error("rendition is not square ({width}x{height})")]
    NotSquare { width: u32, height: u32 },

    #[error("no icns element type holds {pixels}x{pixels} pixels at {density}x density")]
    UnsupportedDimension { pixels: u32, density: u32 },

    #[error("replacement renditions do not match the extracted ones: {0}")]
    RenditionMismatch(String),
}

/// Failure while rasterizing the watermark.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RenderError {
    #[error("no glyph for character {0:?}")]
    UnsupportedCharacter(char),

    #[error("cannot allocate a {width}x{height} glyph surface")]
    Surface { width: u32, height: u32 },

    #[error("glyph outline rejected by the rasterizer: {0}")]
    Outline(String),
}

/// Any error surfaced by the pipeline.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum Error {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Format(#[from] FormatError),

    #[error(transparent)]
    Render(#[from] RenderError),

    /// A failure while transforming one rendition.
    #[error("rendition {tag}: {source}")]
    Rendition {
        tag: SizeTag,
        #[source]
        source: Box<Error>,
    },
}

impl Error {
    /// Attaches the size tag of the rendition that was being processed.
    pub fn in_rendition(self, tag: SizeTag) -> Self {
        Self::Rendition {
            tag,
            source: Box::new(self),
        }
    }

    /// Returns the originating error, skipping rendition context.
    pub fn root(&self) -> &Error {
        match self {
            Self::Rendition { source, .. } => source.root(),
            other => other,
        }
    }

    /// Returns the size tag of the failing rendition, if any.
    pub fn size_tag(&self) -> Option<SizeTag> {
        match self {
            Self::Rendition { tag, .. } => Some(*tag),
            _ => None,
        }
    }
}
