//! Container codec for Apple Icon Image (`.icns`) files.
//!
//! [`IconContainer::extract`] unpacks every decodable rendition of a
//! container while remembering the layout of the file: element order,
//! elements it does not understand, and the original payload of every
//! rendition. [`IconContainer::repack`] writes that layout back. Renditions
//! whose pixels are unchanged keep their original payload bytes, so a
//! container that was not modified is reproduced byte for byte.

mod element;
mod icontype;
mod rle;

pub use element::IconElement;
use element::PayloadKind;
pub use icontype::{Encoding, IconType, OSType};

use std::collections::{HashMap, HashSet};
use std::io::Cursor;

use byteorder::{BigEndian, ReadBytesExt, WriteBytesExt};
use image::RgbaImage;
use tracing::{debug, warn};

use crate::error::FormatError;
use crate::icon::Rendition;

// The first four bytes of an ICNS file:
const ICNS_MAGIC_LITERAL: &[u8; 4] = b"icns";

/// The length of an icon family header, in bytes:
const ICON_FAMILY_HEADER_LENGTH: u32 = 8;

/// Position of one element in the container layout.
#[derive(Debug, Clone, PartialEq)]
enum Slot {
    /// Color data (or the whole image) of `renditions[i]`.
    Color(usize),
    /// Alpha mask belonging to `renditions[i]`.
    Mask(usize),
    /// Table of contents as read, regenerated on repack once any rendition
    /// changed.
    Toc(IconElement),
    /// Any element written back verbatim.
    Opaque(IconElement),
}

/// What a rendition looked like when it was extracted.
#[derive(Debug, Clone, PartialEq)]
struct Source {
    image: RgbaImage,
    kind: PayloadKind,
    color: Vec<u8>,
    mask: Option<Vec<u8>>,
}

/// An icns container held in memory.
#[derive(Debug, Clone, PartialEq)]
pub struct IconContainer {
    slots: Vec<Slot>,
    renditions: Vec<Rendition>,
    sources: Vec<Option<Source>>,
}

impl IconContainer {
    /// Builds a fresh container from renditions, in the given order.
    ///
    /// Fails if two renditions share an element type or if any rendition's
    /// pixel grid does not fit its element type.
    pub fn from_renditions(renditions: Vec<Rendition>) -> Result<Self, FormatError> {
        let mut seen = HashSet::new();
        let mut slots = Vec::with_capacity(renditions.len());
        for (index, rendition) in renditions.iter().enumerate() {
            rendition.validate()?;
            if !seen.insert(rendition.icon_type) {
                return Err(FormatError::DuplicateRendition(rendition.icon_type.ostype()));
            }
            slots.push(Slot::Color(index));
            if rendition.icon_type.mask_type().is_some() {
                slots.push(Slot::Mask(index));
            }
        }
        let sources = vec![None; renditions.len()];
        Ok(Self {
            slots,
            renditions,
            sources,
        })
    }

    /// Unpacks a container into its renditions.
    ///
    /// Elements that are not renditions (`TOC `, `icnV`, `name`, nested
    /// dark-mode families, ...) and renditions stored as JPEG 2000 are kept
    /// as opaque elements. Fails if the bytes are not an icns container or if
    /// nothing in it decodes.
    pub fn extract(bytes: &[u8]) -> Result<Self, FormatError> {
        let elements = read_elements(bytes)?;

        let mut renditions = Vec::new();
        let mut sources = Vec::new();
        let mut seen = HashSet::new();
        // Rendition index for every element that decoded as color data, and
        // for the mask type each of those renditions pairs with.
        let mut color_of: Vec<Option<usize>> = vec![None; elements.len()];
        let mut mask_owner: HashMap<IconType, usize> = HashMap::new();

        for (position, element) in elements.iter().enumerate() {
            let Some(icon_type) = element.icon_type() else {
                continue;
            };
            if icon_type.is_mask() {
                continue;
            }

            let mask_type = icon_type.mask_type();
            let mask = mask_type.and_then(|mask_type| {
                elements
                    .iter()
                    .find(|other| other.ostype == mask_type.ostype())
            });

            let (kind, image) = match icon_type.encoding() {
                Encoding::RLE24 => {
                    let mask_data = mask.map(|m| m.data.as_slice());
                    let image = element::decode_rle24(icon_type, &element.data, mask_data)?;
                    (PayloadKind::Rle24, image)
                }
                _ => match PayloadKind::sniff(&element.data) {
                    Some(PayloadKind::Jpeg2000) => {
                        warn!(
                            ostype = %element.ostype,
                            "JPEG 2000 rendition cannot be decoded, passing it through unchanged"
                        );
                        continue;
                    }
                    Some(kind) => (kind, element::decode_packed(icon_type, kind, &element.data)?),
                    None => {
                        return Err(FormatError::Decode {
                            ostype: element.ostype.to_string(),
                            reason: "unrecognized payload signature".to_string(),
                        });
                    }
                },
            };

            // Legacy and modern elements may share a size; each one is its
            // own rendition.
            if !seen.insert(icon_type) {
                return Err(FormatError::DuplicateRendition(element.ostype));
            }
            debug!(
                ostype = %element.ostype,
                tag = %icon_type.size_tag(),
                ?kind,
                "decoded rendition"
            );

            let index = renditions.len();
            color_of[position] = Some(index);
            if let (Some(mask_type), Some(_)) = (mask_type, mask) {
                mask_owner.insert(mask_type, index);
            }
            sources.push(Some(Source {
                image: image.clone(),
                kind,
                color: element.data.clone(),
                mask: mask.map(|m| m.data.clone()),
            }));
            renditions.push(Rendition::new(icon_type, image));
        }

        if renditions.is_empty() {
            return Err(FormatError::NoRenditions);
        }

        let mut slots = Vec::with_capacity(elements.len());
        for (position, element) in elements.iter().enumerate() {
            if let Some(index) = color_of[position] {
                slots.push(Slot::Color(index));
                continue;
            }
            let owner = element
                .icon_type()
                .filter(|icon_type| icon_type.is_mask())
                .and_then(|mask_type| mask_owner.remove(&mask_type));
            if let Some(index) = owner {
                slots.push(Slot::Mask(index));
            } else if element.ostype == OSType::TOC {
                slots.push(Slot::Toc(element.clone()));
            } else {
                debug!(ostype = %element.ostype, "keeping element as is");
                slots.push(Slot::Opaque(element.clone()));
            }
        }

        Ok(Self {
            slots,
            renditions,
            sources,
        })
    }

    /// Returns the renditions in container order.
    pub fn renditions(&self) -> &[Rendition] {
        &self.renditions
    }

    /// Consumes the container, returning its renditions.
    pub fn into_renditions(self) -> Vec<Rendition> {
        self.renditions
    }

    /// Returns the number of renditions.
    pub fn len(&self) -> usize {
        self.renditions.len()
    }

    /// Returns true if the container holds no renditions.
    pub fn is_empty(&self) -> bool {
        self.renditions.is_empty()
    }

    /// Replaces the renditions with transformed ones.
    ///
    /// The replacement must have the same length and the same element types,
    /// in the same order, as the current renditions.
    pub fn replace_renditions(&mut self, renditions: Vec<Rendition>) -> Result<(), FormatError> {
        if renditions.len() != self.renditions.len() {
            return Err(FormatError::RenditionMismatch(format!(
                "expected {} renditions, got {}",
                self.renditions.len(),
                renditions.len()
            )));
        }
        for (old, new) in self.renditions.iter().zip(&renditions) {
            if old.icon_type != new.icon_type {
                return Err(FormatError::RenditionMismatch(format!(
                    "expected '{}' at this position, got '{}'",
                    old.icon_type.ostype(),
                    new.icon_type.ostype()
                )));
            }
        }
        self.renditions = renditions;
        Ok(())
    }

    /// Packs the container back into icns bytes.
    pub fn repack(&self) -> Result<Vec<u8>, FormatError> {
        for rendition in &self.renditions {
            rendition.validate()?;
        }

        let mut elements: Vec<IconElement> = Vec::with_capacity(self.slots.len() + 1);
        let mut toc = None;

        for slot in &self.slots {
            match slot {
                Slot::Color(index) => {
                    let rendition = &self.renditions[*index];
                    elements.push(self.encode_color(*index)?);
                    let needs_new_mask = rendition.icon_type.mask_type().is_some()
                        && !self.slots.contains(&Slot::Mask(*index))
                        && rendition.data.pixels().any(|px| px[3] != 255);
                    if needs_new_mask {
                        elements.push(self.encode_mask(*index));
                    }
                }
                Slot::Mask(index) => elements.push(self.encode_mask(*index)),
                Slot::Toc(original) => toc = Some((elements.len(), original)),
                Slot::Opaque(element) => elements.push(element.clone()),
            }
        }

        if let Some((position, original)) = toc {
            let unchanged = (0..self.renditions.len()).all(|i| self.unchanged_source(i).is_some());
            let toc = if unchanged {
                original.clone()
            } else {
                build_toc(&elements)?
            };
            elements.insert(position, toc);
        }

        write_elements(&elements)
    }

    fn unchanged_source(&self, index: usize) -> Option<&Source> {
        self.sources[index]
            .as_ref()
            .filter(|source| source.image == self.renditions[index].data)
    }

    fn encode_color(&self, index: usize) -> Result<IconElement, FormatError> {
        let rendition = &self.renditions[index];
        let icon_type = rendition.icon_type;
        let ostype = icon_type.ostype();

        if let Some(source) = self.unchanged_source(index) {
            return Ok(IconElement::new(ostype, source.color.clone()));
        }

        let kind = self.sources[index]
            .as_ref()
            .map(|source| source.kind)
            .unwrap_or(match icon_type.encoding() {
                Encoding::RLE24 => PayloadKind::Rle24,
                _ => PayloadKind::Png,
            });
        debug!(%ostype, ?kind, "encoding rendition");

        let data = match kind {
            PayloadKind::Png => element::encode_png(icon_type, &rendition.data)?,
            PayloadKind::Argb => element::encode_argb(&rendition.data),
            PayloadKind::Rle24 => element::encode_rle24(icon_type, &rendition.data),
            PayloadKind::Jpeg2000 => {
                return Err(FormatError::Encode {
                    ostype: ostype.to_string(),
                    reason: "JPEG 2000 encoding is not supported".to_string(),
                });
            }
        };
        Ok(IconElement::new(ostype, data))
    }

    fn encode_mask(&self, index: usize) -> IconElement {
        let rendition = &self.renditions[index];
        let mask_type = rendition.icon_type.mask_type().unwrap_or(rendition.icon_type);
        let data = match self.unchanged_source(index).and_then(|s| s.mask.clone()) {
            Some(original) => original,
            None => element::encode_mask(&rendition.data),
        };
        IconElement::new(mask_type.ostype(), data)
    }
}

/// Unpacks a container into its renditions, in container order.
pub fn extract(bytes: &[u8]) -> Result<Vec<Rendition>, FormatError> {
    Ok(IconContainer::extract(bytes)?.into_renditions())
}

/// Packs renditions into a fresh container, in the given order.
pub fn repack(renditions: &[Rendition]) -> Result<Vec<u8>, FormatError> {
    IconContainer::from_renditions(renditions.to_vec())?.repack()
}

fn read_elements(bytes: &[u8]) -> Result<Vec<IconElement>, FormatError> {
    if bytes.len() < ICON_FAMILY_HEADER_LENGTH as usize {
        return Err(if bytes.starts_with(&ICNS_MAGIC_LITERAL[..bytes.len().min(4)]) {
            FormatError::Truncated
        } else {
            FormatError::BadMagic
        });
    }
    if &bytes[..4] != ICNS_MAGIC_LITERAL {
        return Err(FormatError::BadMagic);
    }

    let mut reader = Cursor::new(&bytes[4..8]);
    let file_length = reader
        .read_u32::<BigEndian>()
        .map_err(|_| FormatError::Truncated)?;
    if file_length < ICON_FAMILY_HEADER_LENGTH || file_length as usize > bytes.len() {
        return Err(FormatError::LengthMismatch {
            declared: file_length,
            actual: bytes.len(),
        });
    }

    let body = &bytes[..file_length as usize];
    let mut reader = Cursor::new(body);
    reader.set_position(ICON_FAMILY_HEADER_LENGTH as u64);

    let mut elements = Vec::new();
    while (reader.position() as usize) < body.len() {
        elements.push(IconElement::read(&mut reader)?);
    }
    Ok(elements)
}

fn write_elements(elements: &[IconElement]) -> Result<Vec<u8>, FormatError> {
    let total_length = elements
        .iter()
        .fold(ICON_FAMILY_HEADER_LENGTH, |acc, e| acc + e.total_length());

    let mut output = Vec::with_capacity(total_length as usize);
    output.extend_from_slice(ICNS_MAGIC_LITERAL);
    output
        .write_u32::<BigEndian>(total_length)
        .map_err(|e| FormatError::Encode {
            ostype: "icns".to_string(),
            reason: e.to_string(),
        })?;
    for element in elements {
        element.write(&mut output)?;
    }
    Ok(output)
}

/// Builds a `TOC ` element listing the type and length of every element.
fn build_toc(elements: &[IconElement]) -> Result<IconElement, FormatError> {
    let mut data = Vec::with_capacity(elements.len() * 8);
    for element in elements {
        data.extend_from_slice(&element.ostype.0);
        data.write_u32::<BigEndian>(element.total_length())
            .map_err(|e| FormatError::Encode {
                ostype: OSType::TOC.to_string(),
                reason: e.to_string(),
            })?;
    }
    Ok(IconElement::new(OSType::TOC, data))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::icon::{Density, SizeTag};
    use image::Rgba;

    fn gradient(size: u32) -> RgbaImage {
        RgbaImage::from_fn(size, size, |x, y| {
            Rgba([(x * 255 / size) as u8, (y * 255 / size) as u8, 128, 255])
        })
    }

    fn png_element(icon_type: IconType) -> IconElement {
        let image = gradient(icon_type.pixel_width());
        IconElement::new(
            icon_type.ostype(),
            element::encode_png(icon_type, &image).unwrap(),
        )
    }

    #[test]
    fn read_icon_family_with_fake_elements() {
        let input: &[u8] = b"icns\0\0\0\x1fquux\0\0\0\x0efoobarbaz!\0\0\0\x09#";
        let elements = read_elements(input).expect("read failed");
        assert_eq!(2, elements.len());
        assert_eq!(OSType(*b"quux"), elements[0].ostype);
        assert_eq!(6, elements[0].data.len());
        assert_eq!(OSType(*b"baz!"), elements[1].ostype);
        assert_eq!(1, elements[1].data.len());
    }

    #[test]
    fn write_icon_family_with_fake_elements() {
        let elements = vec![
            IconElement::new(OSType(*b"quux"), b"foobar".to_vec()),
            IconElement::new(OSType(*b"baz!"), b"#".to_vec()),
        ];
        let output = write_elements(&elements).unwrap();
        assert_eq!(
            b"icns\0\0\0\x1fquux\0\0\0\x0efoobarbaz!\0\0\0\x09#",
            &output as &[u8]
        );
    }

    #[test]
    fn wrong_magic_is_rejected() {
        assert_eq!(
            IconContainer::extract(b"PNG!\0\0\0\x08"),
            Err(FormatError::BadMagic)
        );
        assert_eq!(IconContainer::extract(b"ic"), Err(FormatError::Truncated));
        assert_eq!(IconContainer::extract(b""), Err(FormatError::Truncated));
    }

    #[test]
    fn header_length_must_fit() {
        assert_eq!(
            IconContainer::extract(b"icns\0\0\x01\0"),
            Err(FormatError::LengthMismatch {
                declared: 256,
                actual: 8
            })
        );
    }

    #[test]
    fn empty_family_has_no_renditions() {
        assert_eq!(
            IconContainer::extract(b"icns\0\0\0\x08"),
            Err(FormatError::NoRenditions)
        );
    }

    #[test]
    fn extract_png_renditions_in_order() {
        let elements = vec![
            png_element(IconType::RGBA32_128x128),
            IconElement::new(OSType(*b"icnV"), vec![0x42, 0x00, 0x00, 0x00]),
            png_element(IconType::RGBA32_16x16_2x),
        ];
        let bytes = write_elements(&elements).unwrap();
        let container = IconContainer::extract(&bytes).unwrap();

        let tags: Vec<SizeTag> = container.renditions().iter().map(Rendition::tag).collect();
        assert_eq!(
            tags,
            vec![
                SizeTag::new(128, Density::Standard),
                SizeTag::new(16, Density::High)
            ]
        );
        assert_eq!(container.renditions()[1].data, gradient(32));
        assert_eq!(container.repack().unwrap(), bytes);
    }

    #[test]
    fn legacy_and_modern_elements_share_a_size() {
        let red = RgbaImage::from_pixel(16, 16, Rgba([255, 0, 0, 255]));
        let elements = vec![
            IconElement::new(
                OSType(*b"is32"),
                element::encode_rle24(IconType::RGB24_16x16, &red),
            ),
            IconElement::new(OSType(*b"s8mk"), element::encode_mask(&red)),
            IconElement::new(
                OSType(*b"icp4"),
                element::encode_png(IconType::RGBA32_16x16, &red).unwrap(),
            ),
        ];
        let bytes = write_elements(&elements).unwrap();
        let mut container = IconContainer::extract(&bytes).unwrap();

        let types: Vec<IconType> = container.renditions().iter().map(|r| r.icon_type).collect();
        assert_eq!(types, vec![IconType::RGB24_16x16, IconType::RGBA32_16x16]);
        assert!(container.renditions().iter().all(|r| r.data == red));
        assert_eq!(container.repack().unwrap(), bytes);

        // Both renditions are re-encoded in their own slots.
        let mut renditions = container.renditions().to_vec();
        for rendition in &mut renditions {
            rendition.data.put_pixel(3, 3, Rgba([0, 0, 255, 255]));
        }
        container.replace_renditions(renditions).unwrap();
        let repacked = container.repack().unwrap();
        let order: Vec<OSType> = read_elements(&repacked)
            .unwrap()
            .iter()
            .map(|e| e.ostype)
            .collect();
        assert_eq!(
            order,
            vec![OSType(*b"is32"), OSType(*b"s8mk"), OSType(*b"icp4")]
        );
        for rendition in extract(&repacked).unwrap() {
            assert_eq!(rendition.tag(), SizeTag::new(16, Density::Standard));
            assert_eq!(rendition.data.get_pixel(3, 3).0, [0, 0, 255, 255]);
        }
    }

    #[test]
    fn repeated_element_type_is_rejected() {
        let elements = vec![
            png_element(IconType::RGBA32_16x16),
            png_element(IconType::RGBA32_16x16),
        ];
        let bytes = write_elements(&elements).unwrap();
        assert_eq!(
            IconContainer::extract(&bytes),
            Err(FormatError::DuplicateRendition(OSType(*b"icp4")))
        );

        let image = gradient(16);
        let renditions = vec![
            Rendition::new(IconType::RGB24_16x16, image.clone()),
            Rendition::new(IconType::RGB24_16x16, image),
        ];
        assert_eq!(
            repack(&renditions),
            Err(FormatError::DuplicateRendition(OSType(*b"is32")))
        );
    }

    #[test]
    fn jpeg2000_renditions_pass_through() {
        let mut jp2 = b"\x00\x00\x00\x0cjP  \r\n\x87\n".to_vec();
        jp2.extend_from_slice(b"opaque-codestream");
        let elements = vec![
            IconElement::new(OSType(*b"ic09"), jp2),
            png_element(IconType::RGBA32_32x32),
        ];
        let bytes = write_elements(&elements).unwrap();
        let container = IconContainer::extract(&bytes).unwrap();

        assert_eq!(container.len(), 1);
        assert_eq!(container.repack().unwrap(), bytes);
    }

    #[test]
    fn only_jpeg2000_means_no_renditions() {
        let jp2 = b"\xff\x4f\xff\x51rest".to_vec();
        let bytes = write_elements(&[IconElement::new(OSType(*b"ic10"), jp2)]).unwrap();
        assert_eq!(IconContainer::extract(&bytes), Err(FormatError::NoRenditions));
    }

    #[test]
    fn unknown_payload_is_a_format_error() {
        let bytes =
            write_elements(&[IconElement::new(OSType(*b"ic07"), b"garbage".to_vec())]).unwrap();
        assert!(matches!(
            IconContainer::extract(&bytes),
            Err(FormatError::Decode { .. })
        ));
    }

    #[test]
    fn rle_rendition_keeps_mask_position() {
        let mut image = gradient(16);
        image.put_pixel(0, 0, Rgba([0, 0, 0, 0]));
        let elements = vec![
            IconElement::new(OSType(*b"s8mk"), element::encode_mask(&image)),
            IconElement::new(
                OSType(*b"is32"),
                element::encode_rle24(IconType::RGB24_16x16, &image),
            ),
            png_element(IconType::RGBA32_32x32),
        ];
        let bytes = write_elements(&elements).unwrap();
        let mut container = IconContainer::extract(&bytes).unwrap();
        assert_eq!(container.renditions()[0].data, image);
        assert_eq!(container.repack().unwrap(), bytes);

        // Changing pixels re-encodes both color and mask, in the same slots.
        let mut renditions = container.renditions().to_vec();
        renditions[0].data.put_pixel(1, 1, Rgba([9, 9, 9, 77]));
        container.replace_renditions(renditions).unwrap();
        let repacked = container.repack().unwrap();
        let elements = read_elements(&repacked).unwrap();
        let order: Vec<OSType> = elements.iter().map(|e| e.ostype).collect();
        assert_eq!(
            order,
            vec![OSType(*b"s8mk"), OSType(*b"is32"), OSType(*b"icp5")]
        );
        let reread = IconContainer::extract(&repacked).unwrap();
        assert_eq!(reread.renditions()[0].data.get_pixel(1, 1).0, [9, 9, 9, 77]);
    }

    #[test]
    fn missing_mask_is_added_when_alpha_appears() {
        let image = gradient(32);
        let elements = vec![IconElement::new(
            OSType(*b"il32"),
            element::encode_rle24(IconType::RGB24_32x32, &image),
        )];
        let bytes = write_elements(&elements).unwrap();
        let mut container = IconContainer::extract(&bytes).unwrap();

        let mut renditions = container.renditions().to_vec();
        renditions[0].data.put_pixel(0, 0, Rgba([0, 0, 0, 0]));
        container.replace_renditions(renditions).unwrap();

        let repacked = read_elements(&container.repack().unwrap()).unwrap();
        assert_eq!(repacked[0].ostype, OSType(*b"il32"));
        assert_eq!(repacked[1].ostype, OSType(*b"l8mk"));
    }

    #[test]
    fn toc_is_regenerated() {
        let elements = vec![
            IconElement::new(OSType::TOC, vec![0; 8]),
            png_element(IconType::RGBA32_16x16),
        ];
        let bytes = write_elements(&elements).unwrap();
        let mut container = IconContainer::extract(&bytes).unwrap();

        let mut renditions = container.renditions().to_vec();
        renditions[0].data.put_pixel(2, 2, Rgba([255, 0, 0, 255]));
        container.replace_renditions(renditions).unwrap();

        let repacked = read_elements(&container.repack().unwrap()).unwrap();
        assert_eq!(repacked[0].ostype, OSType::TOC);
        let toc = &repacked[0].data;
        assert_eq!(&toc[0..4], b"icp4");
        let listed = u32::from_be_bytes([toc[4], toc[5], toc[6], toc[7]]);
        assert_eq!(listed, repacked[1].total_length());
    }

    #[test]
    fn replace_renditions_checks_layout() {
        let bytes = write_elements(&[png_element(IconType::RGBA32_16x16)]).unwrap();
        let mut container = IconContainer::extract(&bytes).unwrap();

        let wrong_type = vec![Rendition::new(IconType::RGBA32_32x32, gradient(32))];
        assert!(matches!(
            container.replace_renditions(wrong_type),
            Err(FormatError::RenditionMismatch(_))
        ));
        assert!(matches!(
            container.replace_renditions(Vec::new()),
            Err(FormatError::RenditionMismatch(_))
        ));
    }

    #[test]
    fn repack_rejects_bad_grids() {
        let not_square = Rendition::new(IconType::RGBA32_16x16, RgbaImage::new(16, 8));
        assert_eq!(
            repack(&[not_square]),
            Err(FormatError::NotSquare { width: 16, height: 8 })
        );

        let wrong_size = Rendition::new(IconType::RGBA32_16x16, RgbaImage::new(20, 20));
        assert!(matches!(
            repack(&[wrong_size]),
            Err(FormatError::WrongDimensions { .. })
        ));
    }

    #[test]
    fn free_functions_round_trip() {
        let renditions = vec![
            Rendition::new(IconType::RGBA32_16x16, gradient(16)),
            Rendition::new(IconType::RGB24_32x32, gradient(32)),
            Rendition::new(IconType::RGBA32_16x16_2x, gradient(32)),
        ];
        let bytes = repack(&renditions).unwrap();
        assert_eq!(extract(&bytes).unwrap(), renditions);
    }
}
