//! Data model shared by the extractor and the outline pipeline.
//!
//! Fragments flow in from an extractor, get labeled with heading levels,
//! and leave as an [`Outline`] of trimmed headings.

mod fragment;
mod metadata;
mod outline;

pub use fragment::{FontSize, Fragment, HeadingLevel, LabeledFragment};
pub use metadata::DocumentMetadata;
pub use outline::{Heading, Outline};
