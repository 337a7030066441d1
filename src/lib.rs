// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License in the LICENSE-APACHE file or at:
//     https://www.apache.org/licenses/LICENSE-2.0

//! Single-line UI text rasterization
//!
//! This crate renders single lines of UI text (window titles, prompts, error
//! messages) into a caller-owned pixel buffer. It resolves font-family
//! requests against the system font database ([`fontdb`]), loads font faces
//! ([`ttf_parser`]), locates fallback faces for characters the primary font
//! does not cover, shapes text ([`rustybuzz`]) and rasters glyphs
//! ([`ab_glyph`], optionally `fontdue`).
//!
//! The entry point is [`Renderer`]: an owned service object holding the
//! [`fonts::FontLibrary`], the main-face selection and the raster
//! configuration. There is no global state; all fallible operations return
//! `Result` with a specific error kind.
//!
//! ```no_run
//! use ui_text::Renderer;
//!
//! let mut renderer = Renderer::new();
//! renderer.set_main_family("sans-serif", false, false);
//!
//! let (width, height) = (256, 24);
//! let mut buf = vec![0u8; width * height * 4];
//! renderer
//!     .render_line("Hello, world", 16, 0xFFFFFF, 0x202020,
//!                  &mut buf, width, height, 2.0, 0.0)
//!     .unwrap();
//! ```
//!
//! This crate does not perform line-wrapping, BIDI reordering or rich-text
//! formatting; input is treated as one left-to-right line.

mod bitmap;
pub use bitmap::{Bitmap, InvalidBitmap, PixelMode};

pub(crate) mod conv;

mod data;
pub use data::{GlyphId, Vec2};

pub mod fonts;
pub mod raster;

mod render;
pub use render::{Error, Renderer};

pub(crate) mod shaper;
pub use shaper::{Glyph, GlyphRun, ShapedLine};
