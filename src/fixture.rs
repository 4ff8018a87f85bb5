//! Fixture generators for exercising the watcher.
//!
//! These are the only writers in the crate; the watcher itself only ever
//! reads the directory. Kept in the library so integration tests and
//! demos share them.

use std::fs;
use std::path::Path;

use crate::error::Result;

/// A complete 1x1 transparent PNG.
const PNG_FIXTURE: &[u8] = &[
    0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A, // signature
    0x00, 0x00, 0x00, 0x0D, 0x49, 0x48, 0x44, 0x52, // IHDR
    0x00, 0x00, 0x00, 0x01, 0x00, 0x00, 0x00, 0x01, 0x08, 0x06, 0x00, 0x00, 0x00, 0x1F, 0x15,
    0xC4, 0x89, //
    0x00, 0x00, 0x00, 0x0A, 0x49, 0x44, 0x41, 0x54, // IDAT
    0x78, 0x9C, 0x63, 0x00, 0x01, 0x00, 0x00, 0x05, 0x00, 0x01, 0x0D, 0x0A, 0x2D, 0xB4, //
    0x00, 0x00, 0x00, 0x00, 0x49, 0x45, 0x4E, 0x44, 0xAE, 0x42, 0x60, 0x82, // IEND
];

/// Write a small valid PNG image at `path`.
pub fn create_png(path: &Path) -> Result<()> {
    fs::write(path, PNG_FIXTURE)?;
    Ok(())
}

/// Create an empty subdirectory at `path`.
pub fn create_subdir(path: &Path) -> Result<()> {
    fs::create_dir_all(path)?;
    Ok(())
}
