//! Heading-inference pipeline.
//!
//! Turns a flat list of positioned fragments into a title and an ordered
//! list of H1-H3 headings using only typographic and geometric signals:
//!
//! 1. [`rank_font_sizes`] maps the largest distinct font sizes to levels.
//! 2. [`assign_heading_levels`] keeps fragments set in one of those sizes.
//! 3. [`resolve_title`] picks the metadata title or infers one from page 1.
//! 4. [`filter_headings`] removes long lines, boilerplate, and footers.
//! 5. [`build_outline`] merges title and headings.
//!
//! Every stage is a pure function; [`infer_outline`] runs them in order.

mod assemble;
mod filter;
mod label;
mod options;
mod rank;
mod title;

pub use assemble::build_outline;
pub use filter::{check_heading, filter_headings, repetition_counts, Rejection};
pub use label::assign_heading_levels;
pub use options::OutlineOptions;
pub use rank::{rank_font_sizes, size_histogram, FontLevelMap};
pub use title::{infer_title, resolve_title, resolve_title_with_source, ResolvedTitle, TitleSource};

use crate::error::{EmptyContent, Result};
use crate::model::{Fragment, Outline};

/// Run the full pipeline over one document's fragments.
///
/// Returns [`Error::EmptyContent`](crate::Error::EmptyContent) when a stage
/// leaves nothing to outline. An unresolved title becomes an empty string.
pub fn infer_outline(
    fragments: &[Fragment],
    metadata_title: Option<&str>,
    options: &OutlineOptions,
) -> Result<Outline> {
    if fragments.is_empty() {
        return Err(EmptyContent::NoFragments.into());
    }

    let level_map = FontLevelMap::from_fragments(fragments, options.heading_levels);
    if level_map.is_empty() {
        return Err(EmptyContent::NoFontLevels.into());
    }
    log::debug!("Font size -> heading level map: {:?}", level_map.entries());

    let labeled = assign_heading_levels(fragments, &level_map);
    if labeled.is_empty() {
        return Err(EmptyContent::NoHeadings.into());
    }
    log::debug!("{} fragments assigned a heading level", labeled.len());

    let title = match resolve_title_with_source(metadata_title, fragments, options) {
        Some(resolved) => {
            log::debug!("Title ({:?}): {}", resolved.source, resolved.text);
            resolved.text
        }
        None => {
            log::debug!("Title unresolved, using an empty title");
            String::new()
        }
    };

    let headings = filter_headings(&labeled, options);
    if headings.is_empty() {
        return Err(EmptyContent::AllHeadingsFiltered.into());
    }
    log::debug!("{} headings retained after filtering", headings.len());

    Ok(build_outline(title, headings))
}
