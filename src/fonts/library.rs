// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License in the LICENSE-APACHE file or at:
//     https://www.apache.org/licenses/LICENSE-2.0

//! Font library

#![allow(clippy::len_without_is_empty)]

use super::{families, FaceInfo, FaceRef, FontSelector};
use crate::conv::{to_u32, to_usize};
use log::{debug, error, info, warn};
use std::collections::HashMap;
use std::hash::{DefaultHasher, Hash, Hasher};
use std::path::PathBuf;
use std::sync::Arc;
use thiserror::Error;
pub(crate) use ttf_parser::Face;

/// No matching font found
///
/// Either the database has no font for the requested criteria or (for
/// fallback queries) no available face covers the requested character.
#[derive(Error, Debug)]
#[error("no font match")]
pub struct NoFontMatch;

/// Font resolution and loading errors
#[derive(Error, Debug)]
pub enum FontError {
    /// No font matched the selection criteria
    #[error(transparent)]
    NoMatch(#[from] NoFontMatch),
    /// Could not read the font file
    #[error("failed to read font file")]
    Io(#[from] std::io::Error),
    /// The font file could not be parsed
    #[error("font parse error")]
    Parse(#[from] ttf_parser::FaceParsingError),
    /// The font file was rejected by the raster backend
    #[error("font load error")]
    InvalidFont(#[from] ab_glyph::InvalidFont),
    /// The font file was rejected by the fontdue raster backend
    #[cfg(feature = "fontdue")]
    #[error("font load error: {0}")]
    Fontdue(&'static str),
}

/// Font face identifier
///
/// Identifies a loaded font face within a [`FontLibrary`] by index.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct FaceId(pub(crate) u32);
impl FaceId {
    /// Get as `usize`
    pub fn get(self) -> usize {
        to_usize(self.0)
    }
}

/// A store of data for a loaded font face, supporting the crate's backends
pub struct FaceStore {
    path: PathBuf,
    index: u32,
    // Safety: `face`, `rustybuzz` and `ab_glyph` borrow from `data`; all
    // fields live and die together and the data allocation never moves.
    #[allow(unused)]
    data: Arc<dyn AsRef<[u8]> + Send + Sync>,
    face: Face<'static>,
    rustybuzz: rustybuzz::Face<'static>,
    ab_glyph: ab_glyph::FontRef<'static>,
    #[cfg(feature = "fontdue")]
    fontdue: fontdue::Font,
}

impl FaceStore {
    /// Construct from loaded font file contents and a face index
    fn new(
        path: PathBuf,
        data: Arc<dyn AsRef<[u8]> + Send + Sync>,
        index: u32,
    ) -> Result<Self, FontError> {
        // Safety: `slice` points into `data`'s heap allocation, which is
        // owned by the constructed FaceStore. FontLibrary boxes each store
        // and never drops or replaces entries, so borrowers stay valid.
        let slice: &'static [u8] = unsafe { extend_lifetime((*data).as_ref()) };

        let face = Face::parse(slice, index)?;

        Ok(FaceStore {
            path,
            index,
            rustybuzz: rustybuzz::Face::from_face(face.clone()),
            ab_glyph: ab_glyph::FontRef::try_from_slice_and_index(slice, index)?,
            #[cfg(feature = "fontdue")]
            fontdue: {
                let settings = fontdue::FontSettings {
                    collection_index: index,
                    ..Default::default()
                };
                fontdue::Font::from_bytes(slice, settings).map_err(FontError::Fontdue)?
            },
            face,
            data,
        })
    }

    /// Path of the font file this face was loaded from
    pub fn path(&self) -> &std::path::Path {
        &self.path
    }

    /// Face index within the font file
    pub fn index(&self) -> u32 {
        self.index
    }

    /// Access the [`Face`] object
    pub(crate) fn face(&self) -> &Face<'static> {
        &self.face
    }

    /// Access a [`FaceRef`] object
    pub fn face_ref(&self) -> FaceRef<'_> {
        FaceRef(&self.face)
    }

    /// Access the [`rustybuzz`] face
    pub fn rustybuzz(&self) -> &rustybuzz::Face<'static> {
        &self.rustybuzz
    }

    /// Access the [`ab_glyph`] font
    pub fn ab_glyph(&self) -> &ab_glyph::FontRef<'static> {
        &self.ab_glyph
    }

    /// Access the [`fontdue`] font
    #[cfg(feature = "fontdue")]
    pub fn fontdue(&self) -> &fontdue::Font {
        &self.fontdue
    }
}

/// Library of loaded fonts
///
/// Wraps the system font database and owns all loaded faces. This type has
/// no global instance; it is owned by [`crate::Renderer`] or directly by the
/// caller, and requires external synchronization for multi-threaded use.
pub struct FontLibrary {
    db: fontdb::Database,
    // Safety: unsafe code depends on entries never being dropped or moved
    // (hence the otherwise redundant use of Box). See FaceStore::new().
    #[allow(clippy::vec_box)]
    faces: Vec<Box<FaceStore>>,
    // Vec-map from hash of (path, index); length is expected to stay short.
    source_hash: Vec<(u64, FaceId)>,
    fallback_cache: HashMap<(char, u64, bool), Option<FaceId>>,
}

impl Default for FontLibrary {
    fn default() -> Self {
        FontLibrary::new()
    }
}

/// Resolution
impl FontLibrary {
    /// Construct with an empty font database
    ///
    /// Use [`Self::database_mut`] to load fonts, or prefer
    /// [`Self::with_system_fonts`].
    pub fn new() -> Self {
        FontLibrary {
            db: fontdb::Database::new(),
            faces: Vec::new(),
            source_hash: Vec::new(),
            fallback_cache: HashMap::new(),
        }
    }

    /// Construct, loading all available system fonts
    pub fn with_system_fonts() -> Self {
        let mut lib = FontLibrary::new();
        lib.db.load_system_fonts();
        info!("Found {} fonts", lib.db.len());
        families::set_defaults(&mut lib.db);
        lib
    }

    /// Access the font database
    pub fn database(&self) -> &fontdb::Database {
        &self.db
    }

    /// Access the font database mutably
    ///
    /// This may be used to load additional fonts. Cached fallback results are
    /// discarded; already loaded faces are unaffected.
    pub fn database_mut(&mut self) -> &mut fontdb::Database {
        self.fallback_cache.clear();
        &mut self.db
    }

    /// Number of loaded faces
    pub fn len(&self) -> usize {
        self.faces.len()
    }

    /// Resolve selection criteria to a concrete face location
    ///
    /// Queries the font database for the best match for `selector` without
    /// loading the face. The returned [`FaceInfo`] is accepted by
    /// [`Self::load_face`].
    pub fn locate(&self, selector: &FontSelector) -> Result<FaceInfo, NoFontMatch> {
        debug!("locate: {selector:?}");
        let families = selector.fontdb_families();
        let query = selector.to_query(&families);
        let id = self.db.query(&query).ok_or(NoFontMatch)?;
        let face = self.db.face(id).ok_or(NoFontMatch)?;
        self.face_info_for(face).ok_or(NoFontMatch)
    }

    /// Resolve a fallback face able to render `c`
    ///
    /// Returns a loaded face covering `c`. Selection policy:
    ///
    /// 1.  Database faces are ranked by style compatibility with `selector`
    ///     (style match, then smallest weight distance).
    /// 2.  If `prefer_color` is set, faces with color glyph tables are
    ///     preferred over monochrome ones.
    /// 3.  The best-ranked face covering `c` wins.
    ///
    /// Results (including misses) are cached per `(c, selector, prefer_color)`.
    pub fn fallback_for_char(
        &mut self,
        c: char,
        selector: &FontSelector,
        prefer_color: bool,
    ) -> Result<FaceId, FontError> {
        let sel_hash = {
            let mut s = DefaultHasher::new();
            selector.hash(&mut s);
            s.finish()
        };
        let key = (c, sel_hash, prefer_color);
        if let Some(result) = self.fallback_cache.get(&key).copied() {
            return result.ok_or_else(|| NoFontMatch.into());
        }

        let result = match self.scan_fallback(c, selector, prefer_color) {
            Some(info) => match self.load_face(&info) {
                Ok(id) => Some(id),
                Err(err) => {
                    error!("Failed to load fallback font {:?}: {err}", info.path);
                    None
                }
            },
            None => None,
        };

        self.fallback_cache.insert(key, result);
        result.ok_or_else(|| NoFontMatch.into())
    }

    /// Find the best-ranked database face covering `c`
    fn scan_fallback(
        &self,
        c: char,
        selector: &FontSelector,
        prefer_color: bool,
    ) -> Option<FaceInfo> {
        let style = selector.style();
        let weight = selector.weight();

        let mut candidates: Vec<(u32, fontdb::ID)> = self
            .db
            .faces()
            .map(|face| {
                let mut score = 0;
                if face.style != style {
                    score += 1000;
                }
                score += (i32::from(face.weight.0) - i32::from(weight.0)).unsigned_abs();
                (score, face.id)
            })
            .collect();
        candidates.sort_by_key(|&(score, _)| score);

        let passes: &[bool] = if prefer_color { &[true, false] } else { &[false] };
        for &require_color in passes {
            for &(_, id) in &candidates {
                let covers = self
                    .db
                    .with_face_data(id, |data, index| match Face::parse(data, index) {
                        Ok(face) => {
                            face.glyph_index(c).is_some()
                                && (!require_color || has_color_tables(&face))
                        }
                        Err(_) => false,
                    })
                    .unwrap_or(false);
                if covers {
                    return self.db.face(id).and_then(|face| self.face_info_for(face));
                }
            }
        }

        debug!("no fallback face covers {c:?}");
        None
    }

    fn face_info_for(&self, face: &fontdb::FaceInfo) -> Option<FaceInfo> {
        match &face.source {
            fontdb::Source::File(path) | fontdb::Source::SharedFile(path, _) => {
                Some(FaceInfo::new(path.clone(), face.index))
            }
            fontdb::Source::Binary(_) => {
                warn!("cannot locate in-memory face: {}", face.post_script_name);
                None
            }
        }
    }
}

/// Face management
impl FontLibrary {
    /// Load the face described by `info`
    ///
    /// Reads and parses the font file. Loading the same `(path, index)` pair
    /// again returns the existing [`FaceId`] without re-reading the file.
    pub fn load_face(&mut self, info: &FaceInfo) -> Result<FaceId, FontError> {
        let source_hash = {
            let mut hasher = DefaultHasher::new();
            info.path.hash(&mut hasher);
            hasher.write_u32(info.index);
            hasher.finish()
        };

        for (h, id) in self.source_hash.iter().cloned() {
            if h == source_hash {
                let face = &self.faces[id.get()];
                if face.path == info.path && face.index == info.index {
                    return Ok(id);
                }
            }
        }

        let data = Arc::new(std::fs::read(&info.path)?);
        let store = FaceStore::new(info.path.clone(), data, info.index)?;

        let id = FaceId(to_u32(self.faces.len()));
        self.faces.push(Box::new(store));
        self.source_hash.push((source_hash, id));
        debug!("loaded {id:?}: {:?} index {}", info.path, info.index);
        Ok(id)
    }

    /// Resolve and load a face in one step
    pub fn select(&mut self, selector: &FontSelector) -> Result<FaceId, FontError> {
        let info = self.locate(selector)?;
        self.load_face(&info)
    }

    /// Check whether a loaded face covers `c`
    ///
    /// Panics if `id` is not valid (required: `id.get() < self.len()`).
    pub fn face_covers(&self, id: FaceId, c: char) -> bool {
        self.get_face_store(id).face().glyph_index(c).is_some()
    }

    /// Get a font face from its identifier
    ///
    /// Panics if `id` is not valid (required: `id.get() < self.len()`).
    pub fn get_face(&self, id: FaceId) -> FaceRef<'_> {
        self.get_face_store(id).face_ref()
    }

    /// Get access to the [`FaceStore`]
    ///
    /// Panics if `id` is not valid (required: `id.get() < self.len()`).
    pub fn get_face_store(&self, id: FaceId) -> &FaceStore {
        assert!(id.get() < self.faces.len(), "FontLibrary: invalid {id:?}!");
        &self.faces[id.get()]
    }
}

fn has_color_tables(face: &Face) -> bool {
    let tables = face.tables();
    tables.colr.is_some()
        || tables.cbdt.is_some()
        || tables.sbix.is_some()
        || tables.svg.is_some()
}

pub(crate) unsafe fn extend_lifetime<'b, T: ?Sized>(r: &'b T) -> &'static T {
    std::mem::transmute::<&'b T, &'static T>(r)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_database_has_no_match() {
        let lib = FontLibrary::new();
        assert!(lib.locate(&FontSelector::new()).is_err());
    }

    #[test]
    fn fallback_miss_is_cached() {
        let mut lib = FontLibrary::new();
        let sel = FontSelector::new();
        assert!(lib.fallback_for_char('A', &sel, false).is_err());
        assert_eq!(lib.fallback_cache.len(), 1);
        assert!(lib.fallback_for_char('A', &sel, false).is_err());
        assert_eq!(lib.fallback_cache.len(), 1);
    }
}
