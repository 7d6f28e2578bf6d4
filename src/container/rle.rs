//! PackBits-style run-length coding used by `is32`/`il32`/`ih32`/`it32`
//! color planes and `ic04`/`ic05` ARGB payloads.
//!
//! Each channel is stored as a separate plane. A header byte below 128 is
//! followed by `header + 1` literal bytes; a header of 128 or more repeats
//! the next byte `header - 125` times.

use super::icontype::OSType;
use crate::error::FormatError;

const MIN_RUN: usize = 3;
const MAX_RUN: usize = 130;
const MAX_LITERAL: usize = 128;

/// Decodes one plane per entry of `channels` into an interleaved RGBA
/// buffer, writing plane `i` to byte offset `channels[i]` of every pixel.
pub fn decode_planes(
    input: &[u8],
    channels: &[usize],
    rgba: &mut [u8],
    ostype: OSType,
) -> Result<(), FormatError> {
    let rle_error = || FormatError::InvalidRle(ostype.to_string());
    let num_pixels = rgba.len() / 4;
    let mut iter = input.iter();

    for &channel in channels {
        let mut remaining: usize = 0;
        let mut within_run = false;
        let mut run_value: u8 = 0;
        for pixel in 0..num_pixels {
            if remaining == 0 {
                let next = *iter.next().ok_or_else(rle_error)?;
                if next < 128 {
                    remaining = next as usize + 1;
                    within_run = false;
                } else {
                    remaining = next as usize - 125;
                    within_run = true;
                    run_value = *iter.next().ok_or_else(rle_error)?;
                }
            }
            rgba[4 * pixel + channel] = if within_run {
                run_value
            } else {
                *iter.next().ok_or_else(rle_error)?
            };
            remaining -= 1;
        }
        if remaining != 0 {
            return Err(rle_error());
        }
    }

    if iter.next().is_some() {
        Err(rle_error())
    } else {
        Ok(())
    }
}

/// Encodes the given channels of an interleaved RGBA buffer as consecutive
/// RLE planes, appending to `output`.
pub fn encode_planes(rgba: &[u8], channels: &[usize], output: &mut Vec<u8>) {
    for &channel in channels {
        let plane: Vec<u8> = rgba.chunks_exact(4).map(|px| px[channel]).collect();
        encode_plane(&plane, output);
    }
}

fn encode_plane(plane: &[u8], output: &mut Vec<u8>) {
    let mut literal_start = 0;
    let mut i = 0;
    while i < plane.len() {
        let value = plane[i];
        let mut run = 1;
        while i + run < plane.len() && plane[i + run] == value && run < MAX_RUN {
            run += 1;
        }
        if run >= MIN_RUN {
            flush_literals(&plane[literal_start..i], output);
            output.push((run + 125) as u8);
            output.push(value);
            literal_start = i + run;
        }
        i += run;
    }
    flush_literals(&plane[literal_start..], output);
}

fn flush_literals(bytes: &[u8], output: &mut Vec<u8>) {
    for chunk in bytes.chunks(MAX_LITERAL) {
        output.push((chunk.len() - 1) as u8);
        output.extend_from_slice(chunk);
    }
}
