//! Final outline assembly.

use crate::model::{Heading, Outline};

/// Merge a title and filtered headings into an outline.
///
/// Headings keep the order they were given in.
pub fn build_outline(title: impl Into<String>, headings: Vec<Heading>) -> Outline {
    Outline::new(title, headings)
}
