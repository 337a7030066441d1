// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License in the LICENSE-APACHE file or at:
//     https://www.apache.org/licenses/LICENSE-2.0

//! Support for rastering glyphs
//!
//! Glyphs are rastered with `ab_glyph`; the optional `fontdue` feature adds
//! an alternative backend, selected via [`Config`]. A [`SpriteDescriptor`]
//! identifies a rastered glyph in a small hashable value, suitable for
//! caching sprites in a `HashMap`.

use crate::bitmap::Bitmap;
use crate::fonts::{FaceId, FontLibrary};
use crate::{Glyph, GlyphId};
use easy_cast::*;

/// Raster configuration
#[derive(Debug, PartialEq)]
pub struct Config {
    #[allow(unused)]
    sb_align: bool,
    #[allow(unused)]
    fontdue: bool,
    scale_steps: f32,
    subpixel_threshold: f32,
    subpixel_steps: u8,
}

impl Config {
    /// Construct configuration
    ///
    /// For large glyphs the effects of configuration will be mostly
    /// unnoticeable but for small glyphs effects are more significant.
    /// The defaults will usually be a good choice.
    ///
    /// The `mode` parameter selects the rendering mode:
    ///
    /// -   `mode == 0` (default): use `ab_glyph` for rastering
    /// -   `mode == 1`: use `ab_glyph` and align glyphs to side bearings
    /// -   `mode == 2`: use `fontdue` for rastering (requires the `fontdue`
    ///     feature, otherwise equivalent to `mode == 0`)
    ///
    /// Font sizes, in pixels per Em, are rounded to a multiple of
    /// `1 / scale_steps`. The default is `scale_steps == 4`.
    ///
    /// For font sizes (in pixels per Em) less than `subpixel_threshold`,
    /// sub-pixel positioning is enabled with `subpixel_steps` (between 1 and
    /// 16 steps). Sub-pixel positioning allows better glyph spacing for small
    /// fonts potentially at the cost of minor blurring.
    pub fn new(mode: u8, scale_steps: u8, subpixel_threshold: u8, subpixel_steps: u8) -> Self {
        Config {
            sb_align: mode == 1,
            fontdue: mode == 2,
            scale_steps: scale_steps.cast(),
            subpixel_threshold: subpixel_threshold.cast(),
            subpixel_steps: subpixel_steps.clamp(1, 16),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Config::new(0, 4, 18, 5)
    }
}

/// A rastered sprite
#[derive(Debug, PartialEq, Eq)]
pub struct Sprite {
    /// Offset to be added to the glyph position
    pub offset: (i32, i32),
    /// Size of the sprite in pixels
    pub size: (u32, u32),
    /// Grayscale coverage, row major order, length `size.0 * size.1`
    pub data: Vec<u8>,
}

impl Sprite {
    /// Copy the sprite's coverage data into a tightly-packed [`Bitmap`]
    pub fn to_bitmap(&self) -> Bitmap {
        Bitmap::gray(self.size.0, self.size.1, self.data.clone())
    }
}

/// A sprite descriptor
///
/// This descriptor includes all important properties of a rastered glyph in a
/// small, easily hashable value. It is thus ideal for caching rastered glyphs
/// in a `HashMap`.
#[derive(Copy, Clone, Eq, PartialEq, Hash)]
pub struct SpriteDescriptor(u64);

impl std::fmt::Debug for SpriteDescriptor {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        let dpem_steps = ((self.0 & 0x00FF_FFFF_0000_0000) >> 32) as u32;
        let x_steps = ((self.0 & 0x0F00_0000_0000_0000) >> 56) as u8;
        let y_steps = ((self.0 & 0xF000_0000_0000_0000) >> 60) as u8;
        f.debug_struct("SpriteDescriptor")
            .field("face", &self.face())
            .field("glyph", &self.glyph())
            .field("dpem_steps", &dpem_steps)
            .field("offset_steps", &(x_steps, y_steps))
            .finish()
    }
}

impl SpriteDescriptor {
    /// Choose a sub-pixel precision multiplier based on scale (pixels per Em)
    ///
    /// Must return an integer between 1 and 16.
    fn sub_pixel_from_dpem(config: &Config, dpem: f32) -> u8 {
        if dpem < config.subpixel_threshold {
            config.subpixel_steps
        } else {
            1
        }
    }

    /// Construct
    ///
    /// The glyph position is used only for its fractional part (sub-pixel
    /// positioning); the integer part is expected to be applied by the caller
    /// when drawing the sprite.
    pub fn new(config: &Config, face: FaceId, glyph: Glyph, dpem: f32) -> Self {
        let face: u16 = face.get().cast();
        let glyph_id: u16 = glyph.id.0;
        let steps = Self::sub_pixel_from_dpem(config, dpem);
        let mult = f32::conv(steps);
        let dpem = u32::conv_trunc(dpem * config.scale_steps + 0.5);
        // rem_euclid keeps the fraction in [0, 1) for negative positions
        let x_off = u8::conv_trunc(glyph.position.0.rem_euclid(1.0) * mult) % steps;
        let y_off = u8::conv_trunc(glyph.position.1.rem_euclid(1.0) * mult) % steps;
        assert!(dpem & 0xFF00_0000 == 0 && x_off & 0xF0 == 0 && y_off & 0xF0 == 0);
        let packed = face as u64
            | ((glyph_id as u64) << 16)
            | ((dpem as u64) << 32)
            | ((x_off as u64) << 56)
            | ((y_off as u64) << 60);
        SpriteDescriptor(packed)
    }

    /// Get `FaceId` descriptor
    pub fn face(self) -> FaceId {
        FaceId((self.0 & 0x0000_0000_0000_FFFF).cast())
    }

    /// Get `GlyphId` descriptor
    pub fn glyph(self) -> GlyphId {
        GlyphId(((self.0 & 0x0000_0000_FFFF_0000) >> 16).cast())
    }

    /// Get scale (pixels per Em)
    pub fn dpem(self, config: &Config) -> f32 {
        let dpem_steps = ((self.0 & 0x00FF_FFFF_0000_0000) >> 32) as u32;
        f32::conv(dpem_steps) / config.scale_steps
    }

    /// Get fractional position
    ///
    /// Returns the `(x, y)` offsets in the range `0.0 ≤ x < 1.0` (and the
    /// same for `y`).
    pub fn fractional_position(self, config: &Config) -> (f32, f32) {
        let mult = 1.0 / f32::conv(Self::sub_pixel_from_dpem(config, self.dpem(config)));
        let x_steps = ((self.0 & 0x0F00_0000_0000_0000) >> 56) as u8;
        let y_steps = ((self.0 & 0xF000_0000_0000_0000) >> 60) as u8;
        let x = f32::conv(x_steps) * mult;
        let y = f32::conv(y_steps) * mult;
        (x, y)
    }
}

fn raster_ab(config: &Config, lib: &FontLibrary, desc: SpriteDescriptor) -> Option<Sprite> {
    use ab_glyph::Font;

    let id = desc.glyph();
    let face_store = lib.get_face_store(desc.face());
    let dpem = desc.dpem(config);

    let (mut x, y) = desc.fractional_position(config);
    if config.sb_align && dpem >= config.subpixel_threshold {
        let sf = face_store.face_ref().scale_by_dpem(dpem);
        x -= sf.h_side_bearing(id);
    }

    let font = face_store.ab_glyph();
    let scale = font
        .units_per_em()
        .map(|upem| dpem * font.height_unscaled() / upem)
        .unwrap_or(dpem);
    let glyph = ab_glyph::Glyph {
        id: id.into(),
        scale: scale.into(),
        position: ab_glyph::point(x, y),
    };
    let outline = font.outline_glyph(glyph)?;

    let bounds = outline.px_bounds();
    let offset = (bounds.min.x.cast_trunc(), bounds.min.y.cast_trunc());
    let size = bounds.max - bounds.min;
    let size = (u32::conv_trunc(size.x), u32::conv_trunc(size.y));
    if size.0 == 0 || size.1 == 0 {
        log::warn!("Zero-sized glyph: {:?}", desc.glyph());
        return None; // nothing to draw
    }

    let mut data = vec![0; usize::conv(size.0 * size.1)];
    outline.draw(|x, y, c| {
        // Convert to u8 with saturating conversion, rounding down:
        data[usize::conv((y * size.0) + x)] = (c * 256.0) as u8;
    });

    Some(Sprite { offset, size, data })
}

#[cfg(feature = "fontdue")]
fn raster_fontdue(config: &Config, lib: &FontLibrary, desc: SpriteDescriptor) -> Option<Sprite> {
    let face = lib.get_face_store(desc.face()).fontdue();

    let (metrics, data) = face.rasterize_indexed(desc.glyph().0, desc.dpem(config));

    let size = (u32::conv(metrics.width), u32::conv(metrics.height));
    let h_off = -metrics.ymin - i32::conv(metrics.height);
    let offset = (metrics.xmin, h_off);
    if size.0 == 0 || size.1 == 0 {
        log::warn!("Zero-sized glyph: {:?}", desc.glyph());
        return None; // nothing to draw
    }

    Some(Sprite { offset, size, data })
}

/// Raster a glyph
///
/// Attempts to raster a glyph. Can fail (if the glyph in the given font face
/// cannot be rastered), in which case `None` is returned.
pub fn raster(config: &Config, lib: &FontLibrary, desc: SpriteDescriptor) -> Option<Sprite> {
    cfg_if::cfg_if! {
        if #[cfg(feature = "fontdue")] {
            if config.fontdue {
                raster_fontdue(config, lib, desc)
            } else {
                raster_ab(config, lib, desc)
            }
        } else {
            raster_ab(config, lib, desc)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Vec2;

    fn glyph(id: u16, position: Vec2) -> Glyph {
        Glyph {
            index: 0,
            id: GlyphId(id),
            position,
        }
    }

    #[test]
    fn descriptor_packing() {
        let config = Config::default();
        let desc = SpriteDescriptor::new(&config, FaceId(3), glyph(42, Vec2(3.4, 7.8)), 24.0);
        assert_eq!(desc.face(), FaceId(3));
        assert_eq!(desc.glyph(), GlyphId(42));
        assert_eq!(desc.dpem(&config), 24.0);
        // dpem >= subpixel_threshold: no sub-pixel steps
        assert_eq!(desc.fractional_position(&config), (0.0, 0.0));
    }

    #[test]
    fn descriptor_subpixel() {
        let config = Config::default();
        let desc = SpriteDescriptor::new(&config, FaceId(0), glyph(7, Vec2(3.4, 7.8)), 12.0);
        // Fractional positions are quantized to 1/5 steps (rounding down):
        let (x, y) = desc.fractional_position(&config);
        assert!((0.2..=0.4).contains(&x));
        assert!((0.6..=0.8).contains(&y));
    }

    #[test]
    fn descriptor_negative_position() {
        let config = Config::default();
        // Negative positions reach this path via negative render offsets and
        // negative shaper y-offsets; the fraction must wrap, not panic.
        let desc = SpriteDescriptor::new(&config, FaceId(0), glyph(7, Vec2(-0.5, -3.25)), 12.0);
        assert_eq!(desc.glyph(), GlyphId(7));
        let (x, y) = desc.fractional_position(&config);
        assert!((0.0..1.0).contains(&x));
        assert!((0.0..1.0).contains(&y));
    }

    #[test]
    fn sprite_to_bitmap() {
        let sprite = Sprite {
            offset: (0, 0),
            size: (2, 2),
            data: vec![0, 255, 7, 9],
        };
        let bitmap = sprite.to_bitmap();
        assert_eq!(bitmap.mode(), crate::PixelMode::Gray);
        assert_eq!(bitmap.pitch(), 2);
        assert_eq!(bitmap.data(), &[0, 255, 7, 9]);
    }

    #[test]
    fn descriptors_equal_up_to_step() {
        let config = Config::default();
        let a = SpriteDescriptor::new(&config, FaceId(1), glyph(9, Vec2(10.0, 2.0)), 24.0);
        let b = SpriteDescriptor::new(&config, FaceId(1), glyph(9, Vec2(512.5, 7.25)), 24.0);
        // Above the sub-pixel threshold only face, glyph and dpem matter:
        assert_eq!(a, b);
    }
}
