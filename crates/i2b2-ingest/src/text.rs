use std::path::Path;

use crate::error::{IngestError, Result};

/// Reads a text file as UTF-8, falling back to Latin-1 for legacy exports.
pub fn read_text(path: &Path) -> Result<String> {
    let bytes = std::fs::read(path).map_err(|e| IngestError::io(path, e))?;
    Ok(decode(bytes))
}

pub(crate) fn decode(bytes: Vec<u8>) -> String {
    match String::from_utf8(bytes) {
        Ok(text) => text.trim_start_matches('\u{feff}').to_string(),
        Err(error) => error.into_bytes().iter().map(|&b| char::from(b)).collect(),
    }
}
