// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License in the LICENSE-APACHE file or at:
//     https://www.apache.org/licenses/LICENSE-2.0

//! Single-line rendering

use crate::fonts::{FaceId, FontError, FontLibrary, FontSelector};
use crate::raster::{raster, Config, Sprite, SpriteDescriptor};
use crate::{shaper, Vec2};
use easy_cast::{Cast, Conv};
use log::debug;
use std::collections::HashMap;
use thiserror::Error;

/// Rendering errors
#[derive(Error, Debug)]
pub enum Error {
    /// The output buffer is smaller than `width × height × 4` bytes
    #[error("output buffer too small: {required} bytes required")]
    BufferTooSmall {
        /// Required buffer length in bytes
        required: usize,
    },
    /// Font resolution or loading failed
    #[error(transparent)]
    Font(#[from] FontError),
}

/// Single-line UI text renderer
///
/// Owns the [`FontLibrary`], the main-face selection and a cache of rastered
/// glyphs. This replaces the process-wide state of Fontconfig-style APIs:
/// construct one `Renderer` per rendering context and pass it explicitly.
/// `Renderer` is not internally synchronized.
pub struct Renderer {
    library: FontLibrary,
    config: Config,
    main: FontSelector,
    main_face: Option<FaceId>,
    prefer_color: bool,
    cache: HashMap<SpriteDescriptor, Option<Sprite>>,
}

impl Default for Renderer {
    fn default() -> Self {
        Renderer::new()
    }
}

impl Renderer {
    /// Construct with system fonts and default configuration
    pub fn new() -> Self {
        Renderer::with_library(FontLibrary::with_system_fonts(), Config::default())
    }

    /// Construct over an existing library
    pub fn with_library(library: FontLibrary, config: Config) -> Self {
        Renderer {
            library,
            config,
            main: FontSelector::new(),
            main_face: None,
            prefer_color: false,
            cache: HashMap::new(),
        }
    }

    /// Access the font library
    pub fn library(&self) -> &FontLibrary {
        &self.library
    }

    /// Access the font library mutably
    pub fn library_mut(&mut self) -> &mut FontLibrary {
        &mut self.library
    }

    /// Set the main face
    ///
    /// The main face is the primary font used by [`Self::render_line`];
    /// characters it does not cover use per-character fallback. An empty
    /// `family` selects the default sans-serif font.
    ///
    /// The selection takes effect on the next render; it is resolved against
    /// the font database at that point.
    pub fn set_main_family(&mut self, family: &str, bold: bool, italic: bool) {
        self.set_main_selector(FontSelector::from_family(family, bold, italic));
    }

    /// Set the main face from a [`FontSelector`]
    pub fn set_main_selector(&mut self, selector: FontSelector) {
        if selector != self.main {
            self.main = selector;
            self.main_face = None;
        }
    }

    /// Prefer color fonts when resolving fallback faces
    ///
    /// Affects fallback resolution for characters not yet seen. Default:
    /// disabled.
    pub fn set_prefer_color_fallback(&mut self, prefer_color: bool) {
        self.prefer_color = prefer_color;
    }

    fn main_face(&mut self) -> Result<FaceId, FontError> {
        if let Some(id) = self.main_face {
            return Ok(id);
        }
        let id = self.library.select(&self.main)?;
        debug!("main face: {:?}", self.library.get_face_store(id).path());
        self.main_face = Some(id);
        Ok(id)
    }

    /// Shape a line of text without rendering it
    ///
    /// Resolves the main face, then shapes `text` at `size_px` pixels per Em
    /// with per-character fallback. May be used to measure text (see
    /// [`ShapedLine::caret`][crate::ShapedLine::caret]).
    pub fn shape_line(&mut self, text: &str, size_px: u32) -> Result<crate::ShapedLine, Error> {
        let main_id = self.main_face()?;
        let dpem: f32 = size_px.cast();
        Ok(shaper::shape_line(
            &mut self.library,
            main_id,
            &self.main,
            self.prefer_color,
            text,
            dpem,
        ))
    }

    /// Render a line of text into a pixel buffer
    ///
    /// Renders `text` at `size_px` pixels per Em into `buf`, which must hold
    /// at least `width × height` RGBA8 pixels (row-major, 4 bytes each).
    /// `fg` and `bg` are packed `0x00RRGGBB` colors; glyph coverage blends
    /// `fg` over `bg` and the alpha channel is set to 255.
    ///
    /// The buffer is filled with `bg` and the line's baseline is placed such
    /// that the main face's line box is vertically centered. `x_offset` and
    /// `y_offset` shift all glyphs, with sub-pixel precision at small sizes.
    /// Glyphs are clipped to the buffer; text wider than `width` is cut off.
    ///
    /// On error the buffer is left untouched.
    #[allow(clippy::too_many_arguments)]
    pub fn render_line(
        &mut self,
        text: &str,
        size_px: u32,
        fg: u32,
        bg: u32,
        buf: &mut [u8],
        width: usize,
        height: usize,
        x_offset: f32,
        y_offset: f32,
    ) -> Result<(), Error> {
        let required = width
            .checked_mul(height)
            .and_then(|px| px.checked_mul(4))
            .filter(|req| *req <= buf.len())
            .ok_or(Error::BufferTooSmall {
                required: width.saturating_mul(height).saturating_mul(4),
            })?;

        let line = self.shape_line(text, size_px)?;
        let main_id = self.main_face()?;
        let dpem: f32 = size_px.cast();

        // Fonts resolved; from here on the buffer is written.
        let buf = &mut buf[..required];
        fill_bg(buf, bg);

        let sf = self.library.get_face(main_id).scale_by_dpem(dpem);
        let baseline = (height as f32 - (sf.ascent() - sf.descent())) / 2.0 + sf.ascent();
        let origin = Vec2(x_offset, baseline + y_offset);

        let (config, library, cache) = (&self.config, &self.library, &mut self.cache);
        for run in &line.runs {
            for glyph in &run.glyphs {
                let mut glyph = *glyph;
                glyph.position += origin;
                let desc = SpriteDescriptor::new(config, run.face_id, glyph, run.dpem);
                let sprite = cache
                    .entry(desc)
                    .or_insert_with(|| raster(config, library, desc));
                if let Some(sprite) = sprite {
                    let x0 = glyph.position.0.floor() as i64 + i64::from(sprite.offset.0);
                    let y0 = glyph.position.1.floor() as i64 + i64::from(sprite.offset.1);
                    blit(buf, width, height, x0, y0, sprite, fg);
                }
            }
        }

        Ok(())
    }
}

fn unpack(c: u32) -> (u8, u8, u8) {
    ((c >> 16) as u8, (c >> 8) as u8, c as u8)
}

fn blend(fg: u8, bg: u8, alpha: u16) -> u8 {
    ((u16::from(fg) * alpha + u16::from(bg) * (255 - alpha) + 127) / 255) as u8
}

fn fill_bg(buf: &mut [u8], bg: u32) {
    let (r, g, b) = unpack(bg);
    for px in buf.chunks_exact_mut(4) {
        px.copy_from_slice(&[r, g, b, 255]);
    }
}

/// Composite a sprite at `(x0, y0)`, clipping to the buffer bounds
fn blit(
    buf: &mut [u8],
    width: usize,
    height: usize,
    x0: i64,
    y0: i64,
    sprite: &Sprite,
    fg: u32,
) {
    let (fr, fg_, fb) = unpack(fg);
    for sy in 0..sprite.size.1 {
        let y = y0 + i64::from(sy);
        if y < 0 || y >= height as i64 {
            continue;
        }
        for sx in 0..sprite.size.0 {
            let x = x0 + i64::from(sx);
            if x < 0 || x >= width as i64 {
                continue;
            }
            let alpha = u16::from(sprite.data[usize::conv(sy * sprite.size.0 + sx)]);
            if alpha == 0 {
                continue;
            }
            let i = (y as usize * width + x as usize) * 4;
            buf[i] = blend(fr, buf[i], alpha);
            buf[i + 1] = blend(fg_, buf[i + 1], alpha);
            buf[i + 2] = blend(fb, buf[i + 2], alpha);
            buf[i + 3] = 255;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unpack_channels() {
        assert_eq!(unpack(0x00C08040), (0xC0, 0x80, 0x40));
    }

    #[test]
    fn blend_extremes() {
        assert_eq!(blend(200, 50, 0), 50);
        assert_eq!(blend(200, 50, 255), 200);
        let mid = blend(200, 50, 128);
        assert!(mid > 50 && mid < 200);
    }

    #[test]
    fn buffer_too_small() {
        let mut r = Renderer::with_library(FontLibrary::new(), Config::default());
        let mut buf = vec![0u8; 10];
        let err = r
            .render_line("x", 12, 0, 0, &mut buf, 8, 8, 0.0, 0.0)
            .unwrap_err();
        assert!(matches!(err, Error::BufferTooSmall { required: 256 }));
    }

    #[test]
    fn error_leaves_buffer_untouched() {
        // No fonts loaded: resolution fails and the buffer must not change.
        let mut r = Renderer::with_library(FontLibrary::new(), Config::default());
        let mut buf = vec![7u8; 8 * 8 * 4];
        assert!(r.render_line("x", 12, 0, 0, &mut buf, 8, 8, 0.0, 0.0).is_err());
        assert!(buf.iter().all(|&b| b == 7));
    }

    #[test]
    fn blit_clips_to_bounds() {
        let sprite = Sprite {
            offset: (0, 0),
            size: (4, 4),
            data: vec![255; 16],
        };
        let (width, height) = (3, 3);
        let mut buf = vec![0u8; width * height * 4];
        // Off all four edges; must not panic or write out of range.
        blit(&mut buf, width, height, -2, -2, &sprite, 0xFF0000);
        blit(&mut buf, width, height, 2, 2, &sprite, 0xFF0000);
        assert_eq!(&buf[0..4], &[255, 0, 0, 255]);
        let last = (height - 1) * width + (width - 1);
        assert_eq!(&buf[last * 4..last * 4 + 4], &[255, 0, 0, 255]);
    }
}
