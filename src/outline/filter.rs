//! False-positive removal for labeled headings.

use std::collections::HashMap;

use crate::model::{Heading, LabeledFragment};

use super::options::OutlineOptions;

/// Why a labeled fragment was rejected as a heading.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rejection {
    /// Text longer than `max_heading_chars`
    TooLong,
    /// Text repeated more than `max_repeats` times (running header/footer)
    Repeated,
    /// Positioned below `footer_threshold`
    Footer,
}

/// Occurrences of each trimmed text across the labeled set.
pub fn repetition_counts(labeled: &[LabeledFragment]) -> HashMap<&str, usize> {
    let mut counts = HashMap::new();
    for item in labeled {
        *counts.entry(item.fragment.trimmed_text()).or_insert(0) += 1;
    }
    counts
}

/// Check one labeled fragment against the filter rules.
pub fn check_heading(
    item: &LabeledFragment,
    counts: &HashMap<&str, usize>,
    options: &OutlineOptions,
) -> Result<(), Rejection> {
    let text = item.fragment.trimmed_text();

    if text.chars().count() > options.max_heading_chars {
        return Err(Rejection::TooLong);
    }
    if counts.get(text).copied().unwrap_or(0) > options.max_repeats {
        return Err(Rejection::Repeated);
    }
    if item.fragment.y0 > options.footer_threshold {
        return Err(Rejection::Footer);
    }
    Ok(())
}

/// Drop long lines, boilerplate, and footer lines; project the rest.
///
/// Every occurrence of an over-repeated text is dropped, not just the
/// excess ones. Output keeps input order.
pub fn filter_headings(labeled: &[LabeledFragment], options: &OutlineOptions) -> Vec<Heading> {
    let counts = repetition_counts(labeled);

    labeled
        .iter()
        .filter(|item| match check_heading(item, &counts, options) {
            Ok(()) => true,
            Err(reason) => {
                log::trace!(
                    "Dropped heading candidate {:?} on page {}: {:?}",
                    item.fragment.trimmed_text(),
                    item.fragment.page,
                    reason
                );
                false
            }
        })
        .map(|item| Heading::new(item.level, item.fragment.trimmed_text(), item.fragment.page))
        .collect()
}
