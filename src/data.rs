// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License in the LICENSE-APACHE file or at:
//     https://www.apache.org/licenses/LICENSE-2.0

//! Simple data types

use std::ops::{Add, AddAssign};

/// A glyph identifier within a font face
///
/// Identifier 0 is the font's "missing glyph" representation (see the cmap
/// table / TrueType specification).
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct GlyphId(pub u16);

impl From<GlyphId> for ttf_parser::GlyphId {
    fn from(id: GlyphId) -> Self {
        ttf_parser::GlyphId(id.0)
    }
}

impl From<GlyphId> for ab_glyph::GlyphId {
    fn from(id: GlyphId) -> Self {
        ab_glyph::GlyphId(id.0)
    }
}

/// A 2D vector or position, in pixels
///
/// Positions use screen convention: `x` right, `y` down.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct Vec2(pub f32, pub f32);

impl Add for Vec2 {
    type Output = Vec2;
    #[inline]
    fn add(self, rhs: Vec2) -> Vec2 {
        Vec2(self.0 + rhs.0, self.1 + rhs.1)
    }
}

impl AddAssign for Vec2 {
    #[inline]
    fn add_assign(&mut self, rhs: Vec2) {
        self.0 += rhs.0;
        self.1 += rhs.1;
    }
}
