//! Font-size ranking: the largest distinct sizes become heading levels.

use std::collections::{BTreeMap, HashMap};

use crate::model::{FontSize, Fragment, HeadingLevel};

/// Mapping from rounded font size to heading level.
///
/// Holds at most three entries. Keys are the largest distinct sizes seen
/// in the document; the largest always maps to `H1` and levels follow
/// descending size without gaps.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FontLevelMap {
    levels: BTreeMap<FontSize, HeadingLevel>,
}

impl FontLevelMap {
    /// Rank the fragment sizes of a whole document, keeping up to
    /// `max_levels` (at most 3) heading levels.
    pub fn from_fragments(fragments: &[Fragment], max_levels: usize) -> Self {
        let histogram = size_histogram(fragments);

        let mut sizes: Vec<FontSize> = histogram.keys().copied().collect();
        sizes.sort_unstable_by(|a, b| b.cmp(a));

        let levels = sizes
            .into_iter()
            .take(max_levels.min(HeadingLevel::ALL.len()))
            .enumerate()
            .filter_map(|(rank, size)| HeadingLevel::from_rank(rank).map(|level| (size, level)))
            .collect();

        let map = Self { levels };
        log::debug!(
            "Ranked {} distinct font sizes into {:?}",
            histogram.len(),
            map
        );
        map
    }

    /// Level assigned to a rounded size.
    pub fn level_for(&self, size: FontSize) -> Option<HeadingLevel> {
        self.levels.get(&size).copied()
    }

    /// Rounded size assigned to a level.
    pub fn size_for(&self, level: HeadingLevel) -> Option<FontSize> {
        self.levels
            .iter()
            .find(|(_, l)| **l == level)
            .map(|(size, _)| *size)
    }

    /// Entries ordered from `H1` down.
    pub fn entries(&self) -> Vec<(HeadingLevel, FontSize)> {
        let mut entries: Vec<_> = self.levels.iter().map(|(s, l)| (*l, *s)).collect();
        entries.sort();
        entries
    }

    /// Number of mapped sizes.
    pub fn len(&self) -> usize {
        self.levels.len()
    }

    /// Whether no size maps to a heading level.
    pub fn is_empty(&self) -> bool {
        self.levels.is_empty()
    }
}

/// Rank fragment sizes into up to three heading levels.
pub fn rank_font_sizes(fragments: &[Fragment]) -> FontLevelMap {
    FontLevelMap::from_fragments(fragments, HeadingLevel::ALL.len())
}

/// Occurrences of each rounded font size.
pub fn size_histogram(fragments: &[Fragment]) -> HashMap<FontSize, usize> {
    let mut histogram = HashMap::new();
    for fragment in fragments {
        *histogram.entry(fragment.size_key()).or_insert(0) += 1;
    }
    histogram
}
