use std::io::{Cursor, Read, Write};

use byteorder::{BigEndian, ReadBytesExt, WriteBytesExt};
use image::codecs::png::PngEncoder;
use image::{ExtendedColorType, ImageEncoder, ImageFormat, RgbaImage};

use super::icontype::{IconType, OSType};
use super::rle;
use crate::error::FormatError;

/// The length of an icon element header, in bytes:
pub const ICON_ELEMENT_HEADER_LENGTH: u32 = 8;

const PNG_SIGNATURE: &[u8; 8] = b"\x89PNG\r\n\x1a\n";
const ARGB_MAGIC: &[u8; 4] = b"ARGB";
const JP2_SIGNATURE: &[u8; 12] = b"\x00\x00\x00\x0cjP  \r\n\x87\n";
const J2K_CODESTREAM: &[u8; 4] = b"\xff\x4f\xff\x51";

/// `it32` color data starts with four zero bytes before the RLE planes.
const IT32_PREFIX: [u8; 4] = [0; 4];

const RGB_CHANNELS: [usize; 3] = [0, 1, 2];
const ARGB_CHANNELS: [usize; 4] = [3, 0, 1, 2];

/// How the pixels of a packed element are stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PayloadKind {
    Png,
    Argb,
    Rle24,
    Jpeg2000,
}

impl PayloadKind {
    /// Identifies the payload of a packed (`icp4`, `ic07`, ...) element by
    /// its signature.
    pub fn sniff(data: &[u8]) -> Option<PayloadKind> {
        if data.starts_with(PNG_SIGNATURE) {
            Some(PayloadKind::Png)
        } else if data.starts_with(ARGB_MAGIC) {
            Some(PayloadKind::Argb)
        } else if data.starts_with(JP2_SIGNATURE) || data.starts_with(J2K_CODESTREAM) {
            Some(PayloadKind::Jpeg2000)
        } else {
            None
        }
    }
}

/// One entry in an ICNS file.  Depending on the resource type, this may
/// represent an icon, or part of an icon (such as an alpha mask, or color
/// data without the mask).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IconElement {
    pub ostype: OSType,
    pub data: Vec<u8>,
}

impl IconElement {
    /// Creates an icon element with the given OSType and data payload.
    pub fn new(ostype: OSType, data: Vec<u8>) -> IconElement {
        IconElement { ostype, data }
    }

    /// Returns the type of icon encoded by this element, or `None` if this
    /// element does not encode a supported icon type.
    pub fn icon_type(&self) -> Option<IconType> {
        IconType::from_ostype(self.ostype)
    }

    /// Returns the encoded length of the element, in bytes, including the
    /// length of the header.
    pub fn total_length(&self) -> u32 {
        ICON_ELEMENT_HEADER_LENGTH + self.data.len() as u32
    }

    /// Reads an icon element from within an ICNS file.
    pub fn read(reader: &mut Cursor<&[u8]>) -> Result<IconElement, FormatError> {
        let mut raw_ostype = [0u8; 4];
        reader.read_exact(&mut raw_ostype).map_err(truncated)?;
        let ostype = OSType(raw_ostype);
        let element_length = reader.read_u32::<BigEndian>().map_err(truncated)?;
        if element_length < ICON_ELEMENT_HEADER_LENGTH {
            return Err(FormatError::InvalidElementLength {
                ostype: ostype.to_string(),
                length: element_length,
            });
        }
        let data_length = (element_length - ICON_ELEMENT_HEADER_LENGTH) as usize;
        let remaining = reader.get_ref().len() - reader.position() as usize;
        if data_length > remaining {
            return Err(FormatError::Truncated);
        }
        let mut data = vec![0u8; data_length];
        reader.read_exact(&mut data).map_err(truncated)?;
        Ok(IconElement::new(ostype, data))
    }

    /// Writes the icon element to within an ICNS file.
    pub fn write<W: Write>(&self, mut writer: W) -> Result<(), FormatError> {
        let encode_error = |e: std::io::Error| FormatError::Encode {
            ostype: self.ostype.to_string(),
            reason: e.to_string(),
        };
        writer.write_all(&self.ostype.0).map_err(encode_error)?;
        writer
            .write_u32::<BigEndian>(self.total_length())
            .map_err(encode_error)?;
        writer.write_all(&self.data).map_err(encode_error)?;
        Ok(())
    }
}

fn truncated(_: std::io::Error) -> FormatError {
    FormatError::Truncated
}

// ============================================================================
// Payload decoding
// ============================================================================

/// Decodes a packed element (PNG or ARGB) into an RGBA image.
pub fn decode_packed(
    icon_type: IconType,
    kind: PayloadKind,
    data: &[u8],
) -> Result<RgbaImage, FormatError> {
    let ostype = icon_type.ostype();
    let image = match kind {
        PayloadKind::Png => image::load_from_memory_with_format(data, ImageFormat::Png)
            .map_err(|e| FormatError::Decode {
                ostype: ostype.to_string(),
                reason: e.to_string(),
            })?
            .to_rgba8(),
        PayloadKind::Argb => {
            let size = icon_type.pixel_width();
            let mut rgba = vec![0u8; (size * size * 4) as usize];
            rle::decode_planes(&data[ARGB_MAGIC.len()..], &ARGB_CHANNELS, &mut rgba, ostype)?;
            rgba_image(icon_type, rgba)?
        }
        PayloadKind::Rle24 | PayloadKind::Jpeg2000 => {
            return Err(FormatError::Decode {
                ostype: ostype.to_string(),
                reason: format!("{kind:?} payloads are not supported here"),
            });
        }
    };
    check_dimensions(icon_type, &image)?;
    Ok(image)
}

/// Decodes RLE24 color data and an optional 8-bit mask into an RGBA image.
/// Without a mask the image is fully opaque.
pub fn decode_rle24(
    icon_type: IconType,
    color: &[u8],
    mask: Option<&[u8]>,
) -> Result<RgbaImage, FormatError> {
    let ostype = icon_type.ostype();
    let size = icon_type.pixel_width();
    let num_pixels = (size * size) as usize;

    let planes = if icon_type == IconType::RGB24_128x128 && color.starts_with(&IT32_PREFIX) {
        &color[IT32_PREFIX.len()..]
    } else {
        color
    };

    let mut rgba = vec![255u8; num_pixels * 4];
    rle::decode_planes(planes, &RGB_CHANNELS, &mut rgba, ostype)?;

    if let Some(mask) = mask {
        if mask.len() != num_pixels {
            let mask_type = icon_type.mask_type().unwrap_or(icon_type);
            return Err(FormatError::PayloadLength {
                ostype: mask_type.ostype().to_string(),
                expected: num_pixels,
                actual: mask.len(),
            });
        }
        for (pixel, &alpha) in rgba.chunks_exact_mut(4).zip(mask) {
            pixel[3] = alpha;
        }
    }

    rgba_image(icon_type, rgba)
}

fn rgba_image(icon_type: IconType, rgba: Vec<u8>) -> Result<RgbaImage, FormatError> {
    let size = icon_type.pixel_width();
    RgbaImage::from_raw(size, size, rgba).ok_or_else(|| FormatError::Decode {
        ostype: icon_type.ostype().to_string(),
        reason: "pixel buffer does not match the element size".to_string(),
    })
}

fn check_dimensions(icon_type: IconType, image: &RgbaImage) -> Result<(), FormatError> {
    let expected = icon_type.pixel_width();
    if image.width() != expected || image.height() != expected {
        return Err(FormatError::WrongDimensions {
            ostype: icon_type.ostype().to_string(),
            width: image.width(),
            height: image.height(),
            expected,
        });
    }
    Ok(())
}

// ============================================================================
// Payload encoding
// ============================================================================

/// Encodes an RGBA image as a PNG payload.
pub fn encode_png(icon_type: IconType, image: &RgbaImage) -> Result<Vec<u8>, FormatError> {
    let mut buffer = Vec::new();
    PngEncoder::new(&mut buffer)
        .write_image(
            image.as_raw(),
            image.width(),
            image.height(),
            ExtendedColorType::Rgba8,
        )
        .map_err(|e| FormatError::Encode {
            ostype: icon_type.ostype().to_string(),
            reason: e.to_string(),
        })?;
    Ok(buffer)
}

/// Encodes an RGBA image as an `ARGB` RLE payload.
pub fn encode_argb(image: &RgbaImage) -> Vec<u8> {
    let mut data = ARGB_MAGIC.to_vec();
    rle::encode_planes(image.as_raw(), &ARGB_CHANNELS, &mut data);
    data
}

/// Encodes the color planes of an RGBA image as RLE24 data.
pub fn encode_rle24(icon_type: IconType, image: &RgbaImage) -> Vec<u8> {
    let mut data = Vec::new();
    if icon_type == IconType::RGB24_128x128 {
        data.extend_from_slice(&IT32_PREFIX);
    }
    rle::encode_planes(image.as_raw(), &RGB_CHANNELS, &mut data);
    data
}

/// Extracts the alpha channel of an RGBA image as a raw 8-bit mask.
pub fn encode_mask(image: &RgbaImage) -> Vec<u8> {
    image.pixels().map(|px| px[3]).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;

    #[test]
    fn read_element() {
        let bytes: &[u8] = b"quux\0\0\0\x0efoobar";
        let mut cursor = Cursor::new(bytes);
        let element = IconElement::read(&mut cursor).expect("read failed");
        assert_eq!(element.ostype, OSType(*b"quux"));
        assert_eq!(element.data, b"foobar");
        assert_eq!(element.total_length(), 14);
    }

    #[test]
    fn read_element_rejects_short_length() {
        let bytes: &[u8] = b"quux\0\0\0\x04";
        let err = IconElement::read(&mut Cursor::new(bytes)).unwrap_err();
        assert_eq!(
            err,
            FormatError::InvalidElementLength {
                ostype: "quux".into(),
                length: 4
            }
        );
    }

    #[test]
    fn read_element_rejects_overlong_length() {
        let bytes: &[u8] = b"quux\0\0\0\x20foo";
        assert_eq!(
            IconElement::read(&mut Cursor::new(bytes)),
            Err(FormatError::Truncated)
        );
    }

    #[test]
    fn write_element() {
        let element = IconElement::new(OSType(*b"baz!"), b"#".to_vec());
        let mut output = Vec::new();
        element.write(&mut output).unwrap();
        assert_eq!(output, b"baz!\0\0\0\x09#");
    }

    #[test]
    fn sniff_payloads() {
        assert_eq!(PayloadKind::sniff(PNG_SIGNATURE), Some(PayloadKind::Png));
        assert_eq!(PayloadKind::sniff(b"ARGB\x00"), Some(PayloadKind::Argb));
        assert_eq!(PayloadKind::sniff(JP2_SIGNATURE), Some(PayloadKind::Jpeg2000));
        assert_eq!(PayloadKind::sniff(b"\xff\x4f\xff\x51\x00"), Some(PayloadKind::Jpeg2000));
        assert_eq!(PayloadKind::sniff(b"junk"), None);
    }

    #[test]
    fn png_payload_round_trip() {
        let mut image = RgbaImage::from_pixel(32, 32, Rgba([10, 20, 30, 255]));
        image.put_pixel(3, 4, Rgba([200, 100, 50, 17]));
        let data = encode_png(IconType::RGBA32_32x32, &image).unwrap();
        let decoded = decode_packed(IconType::RGBA32_32x32, PayloadKind::Png, &data).unwrap();
        assert_eq!(decoded, image);
    }

    #[test]
    fn png_payload_with_wrong_size_is_rejected() {
        let image = RgbaImage::new(16, 16);
        let data = encode_png(IconType::RGBA32_16x16, &image).unwrap();
        let err = decode_packed(IconType::RGBA32_32x32, PayloadKind::Png, &data).unwrap_err();
        assert!(matches!(err, FormatError::WrongDimensions { expected: 32, .. }));
    }

    #[test]
    fn argb_payload_round_trip() {
        let mut image = RgbaImage::from_pixel(16, 16, Rgba([0, 0, 0, 0]));
        image.put_pixel(8, 8, Rgba([255, 128, 0, 200]));
        let data = encode_argb(&image);
        assert!(data.starts_with(b"ARGB"));
        let decoded = decode_packed(IconType::ARGB32_16x16, PayloadKind::Argb, &data).unwrap();
        assert_eq!(decoded, image);
    }

    #[test]
    fn rle24_with_mask() {
        let mut image = RgbaImage::from_pixel(128, 128, Rgba([40, 80, 120, 255]));
        image.put_pixel(0, 0, Rgba([1, 2, 3, 0]));
        let color = encode_rle24(IconType::RGB24_128x128, &image);
        assert!(color.starts_with(&IT32_PREFIX));
        let mask = encode_mask(&image);

        let decoded = decode_rle24(IconType::RGB24_128x128, &color, Some(&mask)).unwrap();
        assert_eq!(decoded, image);
    }

    #[test]
    fn rle24_without_mask_is_opaque() {
        let image = RgbaImage::from_pixel(16, 16, Rgba([9, 9, 9, 255]));
        let color = encode_rle24(IconType::RGB24_16x16, &image);
        let decoded = decode_rle24(IconType::RGB24_16x16, &color, None).unwrap();
        assert_eq!(decoded.get_pixel(5, 5).0, [9, 9, 9, 255]);
    }

    #[test]
    fn rle24_mask_length_is_checked() {
        let image = RgbaImage::from_pixel(16, 16, Rgba([9, 9, 9, 255]));
        let color = encode_rle24(IconType::RGB24_16x16, &image);
        let err = decode_rle24(IconType::RGB24_16x16, &color, Some(&[0u8; 10])).unwrap_err();
        assert_eq!(
            err,
            FormatError::PayloadLength {
                ostype: "s8mk".into(),
                expected: 256,
                actual: 10
            }
        );
    }
}
