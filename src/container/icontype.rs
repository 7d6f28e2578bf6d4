use std::fmt;
use std::str::FromStr;

use crate::icon::{Density, SizeTag};

/// Types of icon elements that can be decoded as renditions or masks.
#[allow(non_camel_case_types)]
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum IconType {
    /// 16x16 24-bit icon (without alpha).
    RGB24_16x16,
    /// 16x16 8-bit alpha mask.
    Mask8_16x16,
    /// 32x32 24-bit icon (without alpha).
    RGB24_32x32,
    /// 32x32 8-bit alpha mask.
    Mask8_32x32,
    /// 48x48 24-bit icon (without alpha).
    RGB24_48x48,
    /// 48x48 8-bit alpha mask.
    Mask8_48x48,
    /// 128x128 24-bit icon (without alpha).
    RGB24_128x128,
    /// 128x128 8-bit alpha mask.
    Mask8_128x128,
    /// 16x16 32-bit icon, ARGB or PNG payload.
    ARGB32_16x16,
    /// 32x32 32-bit icon, ARGB or PNG payload.
    ARGB32_32x32,
    /// 16x16 32-bit icon.
    RGBA32_16x16,
    /// 16x16 32-bit icon at 2x "retina" density (so, 32 by 32 pixels).
    RGBA32_16x16_2x,
    /// 32x32 32-bit icon.
    RGBA32_32x32,
    /// 32x32 32-bit icon at 2x "retina" density (so, 64 by 64 pixels).
    RGBA32_32x32_2x,
    /// 64x64 32-bit icon.
    RGBA32_64x64,
    /// 128x128 32-bit icon.
    RGBA32_128x128,
    /// 128x128 32-bit icon at 2x "retina" density (so, 256 by 256 pixels).
    RGBA32_128x128_2x,
    /// 256x256 32-bit icon.
    RGBA32_256x256,
    /// 256x256 32-bit icon at 2x "retina" density (so, 512 by 512 pixels).
    RGBA32_256x256_2x,
    /// 512x512 32-bit icon.
    RGBA32_512x512,
    /// 512x512 32-bit icon at 2x "retina" density (so, 1024 by 1024 pixels).
    RGBA32_512x512_2x,
}

impl IconType {
    /// Get the icon type associated with the given OSType, if any.
    pub fn from_ostype(ostype: OSType) -> Option<IconType> {
        let OSType(raw_ostype) = ostype;
        match &raw_ostype {
            b"is32" => Some(IconType::RGB24_16x16),
            b"s8mk" => Some(IconType::Mask8_16x16),
            b"il32" => Some(IconType::RGB24_32x32),
            b"l8mk" => Some(IconType::Mask8_32x32),
            b"ih32" => Some(IconType::RGB24_48x48),
            b"h8mk" => Some(IconType::Mask8_48x48),
            b"it32" => Some(IconType::RGB24_128x128),
            b"t8mk" => Some(IconType::Mask8_128x128),
            b"ic04" => Some(IconType::ARGB32_16x16),
            b"ic05" => Some(IconType::ARGB32_32x32),
            b"icp4" => Some(IconType::RGBA32_16x16),
            b"ic11" => Some(IconType::RGBA32_16x16_2x),
            b"icp5" => Some(IconType::RGBA32_32x32),
            b"ic12" => Some(IconType::RGBA32_32x32_2x),
            b"icp6" => Some(IconType::RGBA32_64x64),
            b"ic07" => Some(IconType::RGBA32_128x128),
            b"ic13" => Some(IconType::RGBA32_128x128_2x),
            b"ic08" => Some(IconType::RGBA32_256x256),
            b"ic14" => Some(IconType::RGBA32_256x256_2x),
            b"ic09" => Some(IconType::RGBA32_512x512),
            b"ic10" => Some(IconType::RGBA32_512x512_2x),
            _ => None,
        }
    }

    /// Get the OSType that represents this icon type.
    pub fn ostype(self) -> OSType {
        match self {
            IconType::RGB24_16x16 => OSType(*b"is32"),
            IconType::Mask8_16x16 => OSType(*b"s8mk"),
            IconType::RGB24_32x32 => OSType(*b"il32"),
            IconType::Mask8_32x32 => OSType(*b"l8mk"),
            IconType::RGB24_48x48 => OSType(*b"ih32"),
            IconType::Mask8_48x48 => OSType(*b"h8mk"),
            IconType::RGB24_128x128 => OSType(*b"it32"),
            IconType::Mask8_128x128 => OSType(*b"t8mk"),
            IconType::ARGB32_16x16 => OSType(*b"ic04"),
            IconType::ARGB32_32x32 => OSType(*b"ic05"),
            IconType::RGBA32_16x16 => OSType(*b"icp4"),
            IconType::RGBA32_16x16_2x => OSType(*b"ic11"),
            IconType::RGBA32_32x32 => OSType(*b"icp5"),
            IconType::RGBA32_32x32_2x => OSType(*b"ic12"),
            IconType::RGBA32_64x64 => OSType(*b"icp6"),
            IconType::RGBA32_128x128 => OSType(*b"ic07"),
            IconType::RGBA32_128x128_2x => OSType(*b"ic13"),
            IconType::RGBA32_256x256 => OSType(*b"ic08"),
            IconType::RGBA32_256x256_2x => OSType(*b"ic14"),
            IconType::RGBA32_512x512 => OSType(*b"ic09"),
            IconType::RGBA32_512x512_2x => OSType(*b"ic10"),
        }
    }

    /// Returns the PNG-capable icon type that stores `pixels` x `pixels` at
    /// the given density, if the format has one.
    ///
    /// # Examples
    /// ```
    /// use icns_stamp::{Density, IconType};
    /// assert_eq!(IconType::for_pixels(1024, Density::High), Some(IconType::RGBA32_512x512_2x));
    /// assert_eq!(IconType::for_pixels(48, Density::Standard), None);
    /// ```
    pub fn for_pixels(pixels: u32, density: Density) -> Option<IconType> {
        match (density, pixels) {
            (Density::Standard, 16) => Some(IconType::RGBA32_16x16),
            (Density::Standard, 32) => Some(IconType::RGBA32_32x32),
            (Density::Standard, 64) => Some(IconType::RGBA32_64x64),
            (Density::Standard, 128) => Some(IconType::RGBA32_128x128),
            (Density::Standard, 256) => Some(IconType::RGBA32_256x256),
            (Density::Standard, 512) => Some(IconType::RGBA32_512x512),
            (Density::High, 32) => Some(IconType::RGBA32_16x16_2x),
            (Density::High, 64) => Some(IconType::RGBA32_32x32_2x),
            (Density::High, 256) => Some(IconType::RGBA32_128x128_2x),
            (Density::High, 512) => Some(IconType::RGBA32_256x256_2x),
            (Density::High, 1024) => Some(IconType::RGBA32_512x512_2x),
            _ => None,
        }
    }

    /// Returns true if this is a pure alpha mask type.
    pub fn is_mask(self) -> bool {
        self.encoding() == Encoding::Mask8
    }

    /// Returns the mask type that completes this icon type, if it has one.
    pub fn mask_type(self) -> Option<IconType> {
        match self {
            IconType::RGB24_16x16 => Some(IconType::Mask8_16x16),
            IconType::RGB24_32x32 => Some(IconType::Mask8_32x32),
            IconType::RGB24_48x48 => Some(IconType::Mask8_48x48),
            IconType::RGB24_128x128 => Some(IconType::Mask8_128x128),
            _ => None,
        }
    }

    /// Returns the pixel data width of this icon type.  Normally this is the
    /// same as the screen width, but for 2x "retina" density icons, this will
    /// be twice that value.
    ///
    /// # Examples
    /// ```
    /// use icns_stamp::IconType;
    /// assert_eq!(IconType::Mask8_128x128.pixel_width(), 128);
    /// assert_eq!(IconType::RGBA32_256x256_2x.pixel_width(), 512);
    /// ```
    pub fn pixel_width(self) -> u32 {
        self.screen_width() * self.density().scale()
    }

    /// Returns the pixel density for this icon type.
    pub fn density(self) -> Density {
        match self {
            IconType::RGBA32_16x16_2x
            | IconType::RGBA32_32x32_2x
            | IconType::RGBA32_128x128_2x
            | IconType::RGBA32_256x256_2x
            | IconType::RGBA32_512x512_2x => Density::High,
            _ => Density::Standard,
        }
    }

    /// Returns the screen width of this icon type, in points.
    pub fn screen_width(self) -> u32 {
        match self {
            IconType::RGB24_16x16
            | IconType::Mask8_16x16
            | IconType::ARGB32_16x16
            | IconType::RGBA32_16x16
            | IconType::RGBA32_16x16_2x => 16,
            IconType::RGB24_32x32
            | IconType::Mask8_32x32
            | IconType::ARGB32_32x32
            | IconType::RGBA32_32x32
            | IconType::RGBA32_32x32_2x => 32,
            IconType::RGB24_48x48 | IconType::Mask8_48x48 => 48,
            IconType::RGBA32_64x64 => 64,
            IconType::RGB24_128x128
            | IconType::Mask8_128x128
            | IconType::RGBA32_128x128
            | IconType::RGBA32_128x128_2x => 128,
            IconType::RGBA32_256x256 | IconType::RGBA32_256x256_2x => 256,
            IconType::RGBA32_512x512 | IconType::RGBA32_512x512_2x => 512,
        }
    }

    /// Returns the (size, density) identity of renditions of this type.
    pub fn size_tag(self) -> SizeTag {
        SizeTag::new(self.screen_width(), self.density())
    }

    /// Returns the encoding used within an ICNS file for this icon type.
    pub fn encoding(self) -> Encoding {
        match self {
            IconType::RGB24_16x16
            | IconType::RGB24_32x32
            | IconType::RGB24_48x48
            | IconType::RGB24_128x128 => Encoding::RLE24,
            IconType::Mask8_16x16
            | IconType::Mask8_32x32
            | IconType::Mask8_48x48
            | IconType::Mask8_128x128 => Encoding::Mask8,
            _ => Encoding::Packed,
        }
    }
}

/// A Macintosh OSType (also known as a ResType), used in ICNS files to
/// identify the type of each icon element.
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct OSType(pub [u8; 4]);

impl OSType {
    /// The table-of-contents element.
    pub const TOC: OSType = OSType(*b"TOC ");
}

impl fmt::Display for OSType {
    fn fmt(&self, out: &mut fmt::Formatter) -> fmt::Result {
        for &byte in &self.0 {
            if byte.is_ascii_graphic() || byte == b' ' {
                write!(out, "{}", byte as char)?;
            } else {
                write!(out, "\\x{byte:02X}")?;
            }
        }
        Ok(())
    }
}

impl FromStr for OSType {
    type Err = String;

    fn from_str(input: &str) -> Result<OSType, String> {
        let bytes = input.as_bytes();
        if bytes.len() != 4 {
            Err(format!("OSType string must be 4 bytes (was {})", bytes.len()))
        } else {
            let mut raw = [0u8; 4];
            raw.clone_from_slice(bytes);
            Ok(OSType(raw))
        }
    }
}

/// Method of encoding an image within an icon element.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum Encoding {
    /// Icon element data payload is an uncompressed 8-bit alpha mask.
    Mask8,
    /// Icon element data payload is an RLE-compressed 24-bit RGB image.
    RLE24,
    /// Icon element data payload is a PNG, an ARGB-RLE image or a JPEG 2000
    /// file; the payload signature tells which.
    Packed,
}
