// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License in the LICENSE-APACHE file or at:
//     https://www.apache.org/licenses/LICENSE-2.0

//! Default family lists
//!
//! The font database starts without defaults for the generic families, so
//! generic queries like "sans-serif" would only match fonts literally using
//! that name. This module seeds the database with the first family found
//! from each preference list below.
//!
//! Fonts are listed because they ship by default with at least one recent
//! operating system; ordering indicates usage preference.

const DEFAULT_SANS_SERIF: &[&str] = &[
    "sans-serif",
    "Tahoma",
    "Noto Sans",
    "DejaVu Sans",
    "Open Sans",
    "Droid Sans",
    "Arial",
    "Verdana",
    "Cantarell",
    "Roboto",
    "Lato",
    "Liberation Sans",
    "Helvetica",
];

const DEFAULT_SERIF: &[&str] = &[
    "serif",
    "Georgia",
    "Noto Serif",
    "DejaVu Serif",
    "Droid Serif",
    "Times New Roman",
    "Times",
    "Liberation Serif",
];

const DEFAULT_MONOSPACE: &[&str] = &[
    "monospace",
    "Consolas",
    "Menlo",
    "Noto Sans Mono",
    "DejaVu Sans Mono",
    "Droid Sans Mono",
    "Roboto Mono",
    "Source Code Pro",
    "Liberation Mono",
    "Lucida Console",
    "Courier New",
];

fn first_available<'a>(db: &fontdb::Database, names: &[&'a str]) -> Option<&'a str> {
    names.iter().copied().find(|name| {
        db.faces()
            .any(|face| face.families.iter().any(|(family, _)| family == name))
    })
}

/// Set generic family defaults after loading fonts
pub(crate) fn set_defaults(db: &mut fontdb::Database) {
    if let Some(name) = first_available(db, DEFAULT_SANS_SERIF) {
        log::info!("Default sans-serif font: {name}");
        db.set_sans_serif_family(name);
    }
    if let Some(name) = first_available(db, DEFAULT_SERIF) {
        log::info!("Default serif font: {name}");
        db.set_serif_family(name);
    }
    if let Some(name) = first_available(db, DEFAULT_MONOSPACE) {
        log::info!("Default monospace font: {name}");
        db.set_monospace_family(name);
    }
}
