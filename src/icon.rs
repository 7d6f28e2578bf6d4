//! Rendition types for multi-resolution icons.
//!
//! An icns container holds one square image per (size, density) pair. A
//! [`Rendition`] is that image plus the element type it is stored as.

use std::fmt;

use image::RgbaImage;

use crate::container::IconType;
use crate::error::FormatError;

/// A rectangle defined in pixel coordinates.
///
/// Used to report the region a watermark glyph run covers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RectPx {
    /// X offset from the left edge of the image
    pub x: u32,
    /// Y offset from the top edge of the image
    pub y: u32,
    /// Width of the rectangle
    pub width: u32,
    /// Height of the rectangle
    pub height: u32,
}

impl RectPx {
    /// Creates a new rectangle with the given position and dimensions.
    pub fn new(x: u32, y: u32, width: u32, height: u32) -> Self {
        Self { x, y, width, height }
    }

    /// Returns the right edge coordinate (x + width).
    pub fn right(&self) -> u32 {
        self.x + self.width
    }

    /// Returns the bottom edge coordinate (y + height).
    pub fn bottom(&self) -> u32 {
        self.y + self.height
    }

    /// Returns true if the pixel at (x, y) lies inside the rectangle.
    pub fn contains(&self, x: u32, y: u32) -> bool {
        x >= self.x && x < self.right() && y >= self.y && y < self.bottom()
    }
}

/// A 2D size in pixel units.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SizePx {
    pub width: u32,
    pub height: u32,
}

impl SizePx {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Returns true if width equals height.
    pub fn is_square(&self) -> bool {
        self.width == self.height
    }
}

/// Pixel density of a rendition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Density {
    /// Standard resolution (@1x).
    Standard,
    /// Retina / HiDPI resolution (@2x).
    High,
}

impl Density {
    /// Returns the scale factor: 1 for standard, 2 for high density.
    pub fn scale(self) -> u32 {
        match self {
            Self::Standard => 1,
            Self::High => 2,
        }
    }
}

/// Identity of a rendition inside a container: nominal (point) size and
/// density.
///
/// A `128x128@2x` rendition is 256 pixels wide.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SizeTag {
    /// Nominal size in points.
    pub size: u32,
    pub density: Density,
}

impl SizeTag {
    pub fn new(size: u32, density: Density) -> Self {
        Self { size, density }
    }

    /// Returns the edge length of the pixel grid.
    pub fn pixel_dimension(&self) -> u32 {
        self.size * self.density.scale()
    }
}

impl fmt::Display for SizeTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{0}x{0}", self.size)?;
        if self.density == Density::High {
            write!(f, "@2x")?;
        }
        Ok(())
    }
}

/// One fixed-size square image inside an icon container.
#[derive(Debug, Clone, PartialEq)]
pub struct Rendition {
    /// The element type this rendition is stored as.
    pub icon_type: IconType,

    /// The image data in RGBA format.
    pub data: RgbaImage,
}

impl Rendition {
    /// Creates a rendition stored as the given element type.
    pub fn new(icon_type: IconType, data: RgbaImage) -> Self {
        Self { icon_type, data }
    }

    /// Creates a rendition from an image, picking the PNG element type that
    /// holds its pixel dimension at the given density.
    pub fn from_image(data: RgbaImage, density: Density) -> Result<Self, FormatError> {
        let size = SizePx::new(data.width(), data.height());
        if !size.is_square() {
            return Err(FormatError::NotSquare {
                width: size.width,
                height: size.height,
            });
        }
        let icon_type = IconType::for_pixels(size.width, density).ok_or(
            FormatError::UnsupportedDimension {
                pixels: size.width,
                density: density.scale(),
            },
        )?;
        Ok(Self::new(icon_type, data))
    }

    /// Returns the (size, density) identity of this rendition.
    pub fn tag(&self) -> SizeTag {
        self.icon_type.size_tag()
    }

    /// Returns the pixel dimensions of the image.
    pub fn dimensions(&self) -> SizePx {
        SizePx::new(self.data.width(), self.data.height())
    }

    /// Checks that the pixel grid is square and matches the element type.
    pub fn validate(&self) -> Result<(), FormatError> {
        let size = self.dimensions();
        if !size.is_square() {
            return Err(FormatError::NotSquare {
                width: size.width,
                height: size.height,
            });
        }
        let expected = self.icon_type.pixel_width();
        if size.width != expected {
            return Err(FormatError::WrongDimensions {
                ostype: self.icon_type.ostype().to_string(),
                width: size.width,
                height: size.height,
                expected,
            });
        }
        Ok(())
    }
}
