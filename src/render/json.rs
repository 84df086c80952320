//! JSON rendering for outlines.

use std::fs;
use std::path::Path;

use serde::Serialize;

use crate::error::{Error, Result};
use crate::model::Outline;

/// JSON output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum JsonFormat {
    /// Pretty-printed JSON with 2-space indentation
    #[default]
    Pretty,
    /// Compact JSON without extra whitespace
    Compact,
}

/// Convert an outline to JSON.
///
/// Non-ASCII text is written as-is, not escaped.
pub fn to_json(outline: &Outline, format: JsonFormat) -> Result<String> {
    to_json_value(outline, format)
}

/// Serialize any value (outline, fragment list) in the given format.
pub fn to_json_value<T: Serialize + ?Sized>(value: &T, format: JsonFormat) -> Result<String> {
    let result = match format {
        JsonFormat::Pretty => serde_json::to_string_pretty(value),
        JsonFormat::Compact => serde_json::to_string(value),
    };

    result.map_err(|e| Error::Render(format!("JSON serialization error: {}", e)))
}

/// Write an outline to `path` as UTF-8 JSON, creating parent directories.
pub fn write_outline<P: AsRef<Path>>(outline: &Outline, path: P, format: JsonFormat) -> Result<()> {
    let path = path.as_ref();
    let json = to_json(outline, format)?;

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, json)?;
    Ok(())
}
