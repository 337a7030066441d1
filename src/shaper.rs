// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License in the LICENSE-APACHE file or at:
//     https://www.apache.org/licenses/LICENSE-2.0

//! Text shaping
//!
//! To quote the HarfBuzz manual:
//!
//! > Text shaping is the process of translating a string of character codes
//! > (such as Unicode codepoints) into a properly arranged sequence of glyphs
//! > that can be rendered onto a screen or into final output form for
//! > inclusion in a document.
//!
//! This module provides the [`shape_line`] function, which shapes a single
//! left-to-right line of text via `rustybuzz`, segmenting it into runs of a
//! common font face: characters not covered by the main face are shaped with
//! a fallback face resolved through the [`FontLibrary`].
//!
//! This module *does not* perform line-breaking, wrapping or text reversal.

use crate::conv::{to_u16, to_u32};
use crate::fonts::{FaceId, FontLibrary, FontSelector};
use crate::{GlyphId, Vec2};
use smallvec::SmallVec;
use std::ops::Range;

/// A positioned glyph
#[derive(Clone, Copy, Debug)]
pub struct Glyph {
    /// Index of char in source text
    pub index: u32,
    /// Glyph identifier in font
    pub id: GlyphId,
    /// Position of glyph, relative to the line origin (baseline at `y = 0`)
    pub position: Vec2,
}

/// A same-face run of shaped glyphs
#[derive(Clone, Debug)]
pub struct GlyphRun {
    /// Face used to shape this run
    pub face_id: FaceId,
    /// Pixel size (pixels per Em) used to shape this run
    pub dpem: f32,
    /// Sequence of all glyphs, with index in text
    pub glyphs: Vec<Glyph>,
    /// Position of the next glyph after this run
    pub caret: f32,
}

/// A shaped line of text
#[derive(Clone, Debug, Default)]
pub struct ShapedLine {
    /// Runs in left-to-right order
    pub runs: SmallVec<[GlyphRun; 2]>,
    /// Total advance of the line
    pub caret: f32,
}

/// Shape a single line of text
///
/// The line is segmented into same-face runs: the last used face is kept
/// while it covers the current char (so that e.g. spaces do not break a
/// fallback run), then the main face is preferred, then a fallback face is
/// resolved. Chars no face covers are shaped with the main face, rendering
/// its missing-glyph representation.
pub(crate) fn shape_line(
    lib: &mut FontLibrary,
    main_id: FaceId,
    selector: &FontSelector,
    prefer_color: bool,
    text: &str,
    dpem: f32,
) -> ShapedLine {
    let mut segments: Vec<(FaceId, Range<usize>)> = Vec::new();
    let mut cur: Option<(FaceId, Range<usize>)> = None;
    for (i, c) in text.char_indices() {
        let face_id = match &cur {
            Some((id, _)) if lib.face_covers(*id, c) => *id,
            _ if lib.face_covers(main_id, c) => main_id,
            _ => lib
                .fallback_for_char(c, selector, prefer_color)
                .unwrap_or(main_id),
        };

        let end = i + c.len_utf8();
        cur = match cur {
            Some((id, range)) if id == face_id => Some((id, range.start..end)),
            Some(seg) => {
                segments.push(seg);
                Some((face_id, i..end))
            }
            None => Some((face_id, i..end)),
        };
    }
    if let Some(seg) = cur {
        segments.push(seg);
    }

    let mut runs = SmallVec::new();
    let mut caret = 0.0;
    for (face_id, range) in segments {
        let run = shape_run(lib, face_id, text, range, dpem, caret);
        caret = run.caret;
        runs.push(run);
    }

    ShapedLine { runs, caret }
}

fn shape_run(
    lib: &FontLibrary,
    face_id: FaceId,
    text: &str,
    range: Range<usize>,
    dpem: f32,
    mut caret: f32,
) -> GlyphRun {
    let store = lib.get_face_store(face_id);
    let dpu = store.face_ref().dpu(dpem);

    let mut buffer = rustybuzz::UnicodeBuffer::new();
    buffer.push_str(&text[range.clone()]);
    buffer.set_direction(rustybuzz::Direction::LeftToRight);
    buffer.set_cluster_level(rustybuzz::BufferClusterLevel::MonotoneCharacters);

    let output = rustybuzz::shape(store.rustybuzz(), &[], buffer);

    let idx_offset = to_u32(range.start);
    let mut glyphs = Vec::with_capacity(output.len());
    for (info, pos) in output
        .glyph_infos()
        .iter()
        .zip(output.glyph_positions().iter())
    {
        let index = idx_offset + info.cluster;
        let id = GlyphId(to_u16(info.glyph_id));
        let position = Vec2(
            caret + dpu.i32_to_px(pos.x_offset),
            -dpu.i32_to_px(pos.y_offset),
        );
        glyphs.push(Glyph {
            index,
            id,
            position,
        });
        caret += dpu.i32_to_px(pos.x_advance);
    }

    GlyphRun {
        face_id,
        dpem,
        glyphs,
        caret,
    }
}
