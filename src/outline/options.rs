//! Heuristic thresholds for outline inference.

/// Options controlling heading ranking, filtering, and title inference.
///
/// The defaults are tuned for roughly A4 portrait pages. The footer
/// threshold is an absolute position and does not scale with page height.
#[derive(Debug, Clone)]
pub struct OutlineOptions {
    /// How many of the largest distinct font sizes become heading levels (1-3)
    pub heading_levels: usize,

    /// Longest heading text kept, in characters
    pub max_heading_chars: usize,

    /// A heading text seen more often than this is boilerplate
    pub max_repeats: usize,

    /// Headings with `y0` beyond this are in the footer region
    pub footer_threshold: f64,

    /// Longest title candidate, in characters
    pub max_title_chars: usize,

    /// Page width used to measure horizontal centering of title candidates
    pub page_width: f64,

    /// Offset added to `x0` before measuring distance from the page center
    pub title_x_offset: f64,

    /// Fragments considered for the title when page 1 has none
    pub title_fallback_window: usize,
}

impl OutlineOptions {
    /// Create new outline options with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the number of heading levels (clamped to 1..=3).
    pub fn with_heading_levels(mut self, levels: usize) -> Self {
        self.heading_levels = levels.clamp(1, 3);
        self
    }

    /// Set the maximum heading length.
    pub fn with_max_heading_chars(mut self, chars: usize) -> Self {
        self.max_heading_chars = chars;
        self
    }

    /// Set the repetition limit.
    pub fn with_max_repeats(mut self, repeats: usize) -> Self {
        self.max_repeats = repeats;
        self
    }

    /// Set the footer threshold.
    pub fn with_footer_threshold(mut self, y: f64) -> Self {
        self.footer_threshold = y;
        self
    }

    /// Set the maximum title length.
    pub fn with_max_title_chars(mut self, chars: usize) -> Self {
        self.max_title_chars = chars;
        self
    }

    /// Set the page width used for title centering.
    pub fn with_page_width(mut self, width: f64) -> Self {
        self.page_width = width;
        self
    }

    /// Set the x offset added to a fragment's left edge before measuring
    /// its distance from the page center.
    pub fn with_title_x_offset(mut self, offset: f64) -> Self {
        self.title_x_offset = offset;
        self
    }

    /// Set the title fallback window.
    pub fn with_title_fallback_window(mut self, count: usize) -> Self {
        self.title_fallback_window = count;
        self
    }
}

impl Default for OutlineOptions {
    fn default() -> Self {
        Self {
            heading_levels: 3,
            max_heading_chars: 120,
            max_repeats: 2,
            footer_threshold: 750.0,
            max_title_chars: 100,
            page_width: 595.2,
            title_x_offset: 10.0,
            title_fallback_window: 10,
        }
    }
}
