// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License in the LICENSE-APACHE file or at:
//     https://www.apache.org/licenses/LICENSE-2.0

//! Type conversion utilities
//!
//! Byte indices into a single line of text are represented as `u32`: a line
//! of UI text never approaches `u32::MAX` bytes, and this matches the
//! cluster indices produced by the shaper.

use easy_cast::Cast;

/// Convert `usize` → `u32`
///
/// This is a "safer" wrapper around `as` ensuring (on debug builds) that the
/// input value may be represented correctly by `u32`.
#[inline]
pub fn to_u32(x: usize) -> u32 {
    x.cast()
}

/// Convert `u32` → `usize`
///
/// This is a "safer" wrapper around `as` ensuring that the operation is
/// zero-extension.
#[inline]
pub fn to_usize(x: u32) -> usize {
    x.cast()
}

/// Convert `u32` → `u16`
///
/// This is a "safer" wrapper around `as` ensuring (on debug builds) that the
/// input value may be represented correctly by `u16`.
#[inline]
pub fn to_u16(x: u32) -> u16 {
    x.cast()
}

/// Metrics for a decoration line (underline or strikethrough), in pixels
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct LineMetrics {
    /// Vertical position of the line's center, relative to the baseline
    pub position: f32,
    /// Line thickness
    pub thickness: f32,
}

/// Scale factor: pixels per font unit
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct DPU(pub f32);

impl DPU {
    pub(crate) fn i32_to_px(self, x: i32) -> f32 {
        x as f32 * self.0
    }
    pub(crate) fn i16_to_px(self, x: i16) -> f32 {
        f32::from(x) * self.0
    }
    pub(crate) fn u16_to_px(self, x: u16) -> f32 {
        f32::from(x) * self.0
    }
    pub(crate) fn to_line_metrics(self, metrics: ttf_parser::LineMetrics) -> LineMetrics {
        LineMetrics {
            position: self.i16_to_px(metrics.position),
            thickness: self.i16_to_px(metrics.thickness),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn narrowing_in_range() {
        assert_eq!(to_u16(0xFFFF), 0xFFFF);
        assert_eq!(to_u32(7), 7);
        assert_eq!(to_usize(u32::MAX), u32::MAX as usize);
    }
}
