//! Loads raw bytes by path. Failures are reported, never replaced with empty
//! data.

use std::fs;
use std::path::Path;

use crate::errors::*;

/// Reads the whole file at `path`.
pub fn load<P: AsRef<Path>>(path: P) -> Result<Vec<u8>> {
    let path = path.as_ref();
    let bytes = fs::read(path).with_context(|_| format!("Failed to load {}.", path.display()))?;

    debug!("Loaded {} ({} bytes).", path.display(), bytes.len());
    Ok(bytes)
}

/// Reads the whole file at `path` as UTF-8 text.
pub fn load_string<P: AsRef<Path>>(path: P) -> Result<String> {
    let path = path.as_ref();
    let bytes = load(path)?;

    String::from_utf8(bytes)
        .map_err(|err| format_err!("{} is not valid UTF-8: {}", path.display(), err))
}
