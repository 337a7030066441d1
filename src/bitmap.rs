// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License in the LICENSE-APACHE file or at:
//     https://www.apache.org/licenses/LICENSE-2.0

//! Bitmap representation and conversion
//!
//! Font rasterizers may deliver glyph images as 1-bit monochrome bitmaps
//! (e.g. embedded bitmap strikes or un-anti-aliased rendering). The rest of
//! the pipeline works with 8-bit coverage masks; [`Bitmap::to_gray`] converts
//! between the two.

use crate::conv::to_usize;
use thiserror::Error;

/// Bitmap data does not match the described dimensions
#[derive(Error, Debug)]
#[error("bitmap data does not match dimensions")]
pub struct InvalidBitmap;

/// Pixel storage format of a [`Bitmap`]
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum PixelMode {
    /// 1 bit per pixel, most-significant bit first, rows padded to `pitch`
    Mono,
    /// 8 bits per pixel coverage (0 = transparent, 255 = opaque)
    Gray,
}

impl PixelMode {
    /// Minimum row pitch in bytes for the given width
    pub fn min_pitch(self, width: u32) -> usize {
        match self {
            PixelMode::Mono => to_usize(width.div_ceil(8)),
            PixelMode::Gray => to_usize(width),
        }
    }
}

/// A glyph image
///
/// Rows are stored top-to-bottom, each occupying `pitch` bytes (which may
/// exceed the minimum required for `width` pixels).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Bitmap {
    width: u32,
    height: u32,
    pitch: usize,
    mode: PixelMode,
    data: Vec<u8>,
}

impl Bitmap {
    /// Construct, validating dimensions
    ///
    /// Requires `pitch ≥ mode.min_pitch(width)` and
    /// `data.len() ≥ pitch × height`.
    pub fn new(
        mode: PixelMode,
        width: u32,
        height: u32,
        pitch: usize,
        data: Vec<u8>,
    ) -> Result<Self, InvalidBitmap> {
        if pitch < mode.min_pitch(width) {
            return Err(InvalidBitmap);
        }
        let required = pitch.checked_mul(to_usize(height)).ok_or(InvalidBitmap)?;
        if data.len() < required {
            return Err(InvalidBitmap);
        }
        Ok(Bitmap {
            width,
            height,
            pitch,
            mode,
            data,
        })
    }

    /// Construct a tightly-packed `Gray` bitmap
    ///
    /// Requires `data.len() == width × height` (checked on debug builds).
    pub(crate) fn gray(width: u32, height: u32, data: Vec<u8>) -> Self {
        debug_assert_eq!(data.len(), to_usize(width) * to_usize(height));
        Bitmap {
            width,
            height,
            pitch: to_usize(width),
            mode: PixelMode::Gray,
            data,
        }
    }

    /// Width in pixels
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Height in pixels (number of rows)
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Row stride in bytes
    pub fn pitch(&self) -> usize {
        self.pitch
    }

    /// Pixel storage format
    pub fn mode(&self) -> PixelMode {
        self.mode
    }

    /// Raw data, row-major
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Convert to a tightly-packed 8-bit coverage bitmap
    ///
    /// Monochrome bits expand to coverage 255 (set) or 0 (clear); row padding
    /// is dropped. Converting a `Gray` bitmap repacks rows to minimal pitch.
    pub fn to_gray(&self) -> Bitmap {
        let width = to_usize(self.width);
        let mut data = Vec::with_capacity(width * to_usize(self.height));
        for row in self.data.chunks_exact(self.pitch.max(1)).take(to_usize(self.height)) {
            match self.mode {
                PixelMode::Mono => {
                    for x in 0..width {
                        let bit = (row[x >> 3] >> (7 - (x & 7))) & 1;
                        data.push(if bit == 1 { 255 } else { 0 });
                    }
                }
                PixelMode::Gray => data.extend_from_slice(&row[..width]),
            }
        }
        Bitmap::gray(self.width, self.height, data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mono_to_gray() {
        // 10×2, pitch 2: rows 1010101010 and 0000000011
        let data = vec![0b1010_1010, 0b1000_0000, 0b0000_0000, 0b1100_0000];
        let mono = Bitmap::new(PixelMode::Mono, 10, 2, 2, data).unwrap();

        let gray = mono.to_gray();
        assert_eq!(gray.mode(), PixelMode::Gray);
        assert_eq!(gray.pitch(), 10);
        #[rustfmt::skip]
        assert_eq!(gray.data(), &[
            255, 0, 255, 0, 255, 0, 255, 0, 255, 0,
            0, 0, 0, 0, 0, 0, 0, 0, 255, 255,
        ]);
    }

    #[test]
    fn gray_repack_drops_padding() {
        let data = vec![1, 2, 3, 0xEE, 4, 5, 6, 0xEE];
        let padded = Bitmap::new(PixelMode::Gray, 3, 2, 4, data).unwrap();

        let gray = padded.to_gray();
        assert_eq!(gray.pitch(), 3);
        assert_eq!(gray.data(), &[1, 2, 3, 4, 5, 6]);
    }

    #[test]
    fn invalid_dimensions() {
        assert!(Bitmap::new(PixelMode::Mono, 10, 1, 1, vec![0; 2]).is_err());
        assert!(Bitmap::new(PixelMode::Gray, 4, 2, 4, vec![0; 7]).is_err());
    }

    #[test]
    fn zero_size() {
        let empty = Bitmap::new(PixelMode::Mono, 0, 0, 0, vec![]).unwrap();
        assert_eq!(empty.to_gray().data(), &[] as &[u8]);
    }
}
