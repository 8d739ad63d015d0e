//! Font discovery shared by the PDF text layer and the chart labels.

use std::env;
use std::path::{Path, PathBuf};

use genpdf::fonts::{self, FontData, FontFamily};

use crate::error::{ReportError, Result};

/// Name of the bundled font family.
pub const FONT_FAMILY_NAME: &str = "Roboto";

/// Environment variable that overrides the font directory, for installs
/// where the bundled assets are not next to the manifest.
pub const FONTS_DIR_ENV: &str = "ACCESS_REPORT_FONTS_DIR";

const FONT_FILES: &[&str] = &[
    "Roboto-Regular.ttf",
    "Roboto-Bold.ttf",
    "Roboto-Italic.ttf",
    "Roboto-BoldItalic.ttf",
];

fn bundled_font_directory() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("assets/fonts")
}

/// The directory fonts are loaded from: `$ACCESS_REPORT_FONTS_DIR` when set,
/// otherwise the bundled `assets/fonts`.
pub fn font_directory() -> PathBuf {
    env::var_os(FONTS_DIR_ENV)
        .map(PathBuf::from)
        .unwrap_or_else(bundled_font_directory)
}

fn ensure_fonts_present(directory: &Path) -> Result<()> {
    let missing: Vec<String> = FONT_FILES
        .iter()
        .map(|name| directory.join(name))
        .filter(|candidate| !candidate.is_file())
        .map(|path| path.display().to_string())
        .collect();

    if missing.is_empty() {
        Ok(())
    } else {
        Err(ReportError::fonts(format!(
            "missing font files: {}. See assets/fonts/README.md for setup.",
            missing.join(", ")
        )))
    }
}

/// Loads the report font family for `genpdf`.
pub fn report_font_family() -> Result<FontFamily<FontData>> {
    let directory = font_directory();
    ensure_fonts_present(&directory)?;

    fonts::from_files(&directory, FONT_FAMILY_NAME, None).map_err(|err| {
        ReportError::fonts(format!(
            "failed to load font family '{}' from {}: {err}",
            FONT_FAMILY_NAME,
            directory.display()
        ))
    })
}

/// Path of the regular-weight font file, for chart label registration.
pub(crate) fn regular_font_file() -> PathBuf {
    font_directory().join(FONT_FILES[0])
}

/// Path of the bold-weight font file, for chart label registration.
pub(crate) fn bold_font_file() -> PathBuf {
    font_directory().join(FONT_FILES[1])
}

/// Whether every required font file is present on disk. Tests use this to
/// skip rendering when the fonts have not been fetched yet.
pub fn fonts_available() -> bool {
    let directory = font_directory();
    FONT_FILES
        .iter()
        .map(|name| directory.join(name))
        .all(|path| path.is_file())
}
