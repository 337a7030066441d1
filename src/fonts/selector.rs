// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License in the LICENSE-APACHE file or at:
//     https://www.apache.org/licenses/LICENSE-2.0

//! Font selection criteria and resolved face descriptors

pub use fontdb::{Style, Weight};
use std::path::PathBuf;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A possible value for a font family request
///
/// Either a specific family, specified by name, or a generic class resolved
/// through the font database defaults.
#[derive(Clone, Debug, Eq, PartialEq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum FamilyName {
    /// A specific font family, specified by name: e.g. "Arial", "DejaVu Sans"
    Named(String),
    /// Serif fonts represent the formal text style for a script
    Serif,
    /// Low-contrast fonts without ornamentation, the usual choice for UI text
    SansSerif,
    /// Fonts where all glyphs have the same fixed width
    Monospace,
    /// Fonts resembling handwritten pen or brush writing
    Cursive,
    /// Primarily decorative or expressive fonts
    Fantasy,
}

impl FamilyName {
    /// Construct from a family name string
    ///
    /// The CSS generic names `"serif"`, `"sans-serif"`, `"monospace"`,
    /// `"cursive"` and `"fantasy"` map to the corresponding generic class;
    /// any other (non-empty) string is used as a named family.
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "" => None,
            "serif" => Some(FamilyName::Serif),
            "sans-serif" => Some(FamilyName::SansSerif),
            "monospace" => Some(FamilyName::Monospace),
            "cursive" => Some(FamilyName::Cursive),
            "fantasy" => Some(FamilyName::Fantasy),
            name => Some(FamilyName::Named(name.to_string())),
        }
    }

    pub(crate) fn as_fontdb(&self) -> fontdb::Family<'_> {
        match self {
            FamilyName::Named(name) => fontdb::Family::Name(name),
            FamilyName::Serif => fontdb::Family::Serif,
            FamilyName::SansSerif => fontdb::Family::SansSerif,
            FamilyName::Monospace => fontdb::Family::Monospace,
            FamilyName::Cursive => fontdb::Family::Cursive,
            FamilyName::Fantasy => fontdb::Family::Fantasy,
        }
    }
}

/// A font face selection tool
///
/// This tool selects a font according to the given criteria from available
/// system fonts. Selection criteria are based on CSS.
#[derive(Clone, Debug, Default, Eq, PartialEq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct FontSelector {
    families: Vec<FamilyName>,
    #[cfg_attr(feature = "serde", serde(default, with = "remote::Weight"))]
    weight: Weight,
    #[cfg_attr(feature = "serde", serde(default, with = "remote::Style"))]
    style: Style,
}

impl FontSelector {
    /// Synonym for default
    ///
    /// Without further parametrization, this will select a generic sans-serif
    /// font which should be suitable for most uses.
    #[inline]
    pub fn new() -> Self {
        FontSelector::default()
    }

    /// Construct from a family name with bold and italic flags
    ///
    /// An empty `family` requests the default sans-serif font. The flags map
    /// to [`Weight::BOLD`] and [`Style::Italic`] respectively.
    pub fn from_family(family: &str, bold: bool, italic: bool) -> Self {
        let mut selector = FontSelector::new();
        selector.set_families(FamilyName::from_name(family));
        selector.set_bold(bold);
        selector.set_italic(italic);
        selector
    }

    /// Set family name(s)
    ///
    /// If multiple names are passed, the first to successfully resolve a font
    /// is used (glyph-level fallback is handled separately, by
    /// [`FontLibrary::fallback_for_char`][super::FontLibrary::fallback_for_char]).
    ///
    /// If an empty collection is passed, the default sans-serif font is used.
    pub fn set_families(&mut self, families: impl IntoIterator<Item = FamilyName>) {
        self.families = families.into_iter().collect();
    }

    /// Set style
    #[inline]
    pub fn set_style(&mut self, style: Style) {
        self.style = style;
    }

    /// Set weight
    #[inline]
    pub fn set_weight(&mut self, weight: Weight) {
        self.weight = weight;
    }

    /// Set or clear bold weight
    #[inline]
    pub fn set_bold(&mut self, bold: bool) {
        self.weight = if bold { Weight::BOLD } else { Weight::NORMAL };
    }

    /// Set or clear italic style
    #[inline]
    pub fn set_italic(&mut self, italic: bool) {
        self.style = if italic { Style::Italic } else { Style::Normal };
    }

    /// Get the selected style
    #[inline]
    pub fn style(&self) -> Style {
        self.style
    }

    /// Get the selected weight
    #[inline]
    pub fn weight(&self) -> Weight {
        self.weight
    }

    pub(crate) fn fontdb_families(&self) -> Vec<fontdb::Family<'_>> {
        if self.families.is_empty() {
            vec![fontdb::Family::SansSerif]
        } else {
            self.families.iter().map(|f| f.as_fontdb()).collect()
        }
    }

    pub(crate) fn to_query<'a>(&'a self, families: &'a [fontdb::Family<'a>]) -> fontdb::Query<'a> {
        fontdb::Query {
            families,
            weight: self.weight,
            stretch: fontdb::Stretch::Normal,
            style: self.style,
        }
    }
}

/// Hinting style for rendering a face
///
/// The system font database does not expose per-font hinting configuration,
/// so resolved faces carry the crate default ([`HintStyle::Slight`]); callers
/// may override the value in [`FaceInfo`] before loading.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum HintStyle {
    /// No grid fitting
    None,
    /// Light grid fitting in the vertical direction only
    #[default]
    Slight,
    /// Moderate grid fitting
    Medium,
    /// Full grid fitting
    Full,
}

/// A resolved font face match
///
/// Describes where a matched face may be loaded from: a filesystem path and
/// a face index within that file (for multi-face font collections), plus
/// hinting parameters to apply when rendering with the face.
///
/// The hinting fields are advisory: this crate's outline rasterizers do not
/// grid-fit, so [`FontLibrary::load_face`][super::FontLibrary::load_face]
/// ignores them. They describe the configuration a caller driving a hinting
/// rasterizer should apply to this face.
///
/// Produced by [`FontLibrary::locate`][super::FontLibrary::locate] and
/// [`FontLibrary::fallback_for_char`][super::FontLibrary::fallback_for_char];
/// consumed by [`FontLibrary::load_face`][super::FontLibrary::load_face].
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct FaceInfo {
    /// Path to the font file
    pub path: PathBuf,
    /// Face index within the font file
    pub index: u32,
    /// Whether hinting should be applied at all
    pub hinting: bool,
    /// Hinting style to apply when `hinting` is set
    pub hint_style: HintStyle,
}

impl FaceInfo {
    pub(crate) fn new(path: PathBuf, index: u32) -> Self {
        FaceInfo {
            path,
            index,
            hinting: true,
            hint_style: HintStyle::default(),
        }
    }
}

// See: https://serde.rs/remote-derive.html
#[cfg(feature = "serde")]
mod remote {
    use serde::{Deserialize, Serialize};

    #[derive(Clone, Copy, PartialOrd, Ord, PartialEq, Eq, Debug, Hash, Serialize, Deserialize)]
    #[serde(remote = "fontdb::Weight")]
    pub struct Weight(pub u16);

    #[derive(Clone, Copy, PartialEq, Eq, Debug, Hash, Serialize, Deserialize)]
    #[serde(remote = "fontdb::Style")]
    pub enum Style {
        /// A face that is neither italic not obliqued.
        Normal,
        /// A form that is generally cursive in nature.
        Italic,
        /// A typically-sloped version of the regular face.
        Oblique,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generic_family_names() {
        assert_eq!(FamilyName::from_name(""), None);
        assert_eq!(FamilyName::from_name("sans-serif"), Some(FamilyName::SansSerif));
        assert_eq!(FamilyName::from_name("monospace"), Some(FamilyName::Monospace));
        assert_eq!(
            FamilyName::from_name("DejaVu Sans"),
            Some(FamilyName::Named("DejaVu Sans".to_string()))
        );
    }

    #[test]
    fn selector_flags() {
        let sel = FontSelector::from_family("", true, false);
        assert_eq!(sel.weight(), Weight::BOLD);
        assert_eq!(sel.style(), Style::Normal);
        assert_eq!(sel.fontdb_families(), vec![fontdb::Family::SansSerif]);

        let sel = FontSelector::from_family("Monoid", false, true);
        assert_eq!(sel.weight(), Weight::NORMAL);
        assert_eq!(sel.style(), Style::Italic);
        assert_eq!(sel.fontdb_families(), vec![fontdb::Family::Name("Monoid")]);
    }
}
