// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License in the LICENSE-APACHE file or at:
//     https://www.apache.org/licenses/LICENSE-2.0

//! Font selection and loading
//!
//! Fonts are managed by an owned [`FontLibrary`]: it wraps the system font
//! database, loads font faces on demand and answers per-character fallback
//! queries. Unlike a Fontconfig-style last-error API there is no ambient
//! state here; construct a library (usually via [`FontLibrary::with_system_fonts`])
//! and pass it around explicitly.
//!
//! ### Font sizes
//!
//! Font sizes in this crate are given in *pixels per Em* (`dpem`), the pixel
//! size requested for rendering. Font files internally use *font units*; the
//! scale between the two is [`crate::conv::DPU`] (pixels per font unit):
//!
//! ```none
//! dpu = dpem / units_per_em
//! ```

mod face;
mod families;
mod library;
mod selector;

pub use crate::conv::LineMetrics;
pub use face::{FaceRef, ScaledFaceRef};
pub use library::{FaceId, FaceStore, FontError, FontLibrary, NoFontMatch};
pub use selector::{FaceInfo, FamilyName, FontSelector, HintStyle, Style, Weight};
