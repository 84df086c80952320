//! Rendering outlines to their output artifact.

mod json;

pub use json::{to_json, to_json_value, write_outline, JsonFormat};
