//! Heading labeling by font size.

use crate::model::{Fragment, LabeledFragment};

use super::rank::FontLevelMap;

/// Tag every fragment whose rounded size has a heading level.
///
/// Fragments without a level are body text and are dropped. Output keeps
/// input order.
pub fn assign_heading_levels(fragments: &[Fragment], map: &FontLevelMap) -> Vec<LabeledFragment> {
    if map.is_empty() {
        return Vec::new();
    }

    fragments
        .iter()
        .filter_map(|fragment| {
            map.level_for(fragment.size_key())
                .map(|level| LabeledFragment::new(fragment.clone(), level))
        })
        .collect()
}
