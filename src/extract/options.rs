//! Extraction options.

/// Options for turning PDF pages into fragments.
#[derive(Debug, Clone, Default)]
pub struct ExtractOptions {
    /// Fragment granularity
    pub granularity: Granularity,

    /// Error handling mode for individual pages
    pub error_mode: ErrorMode,
}

impl ExtractOptions {
    /// Create new extract options with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set fragment granularity.
    pub fn with_granularity(mut self, granularity: Granularity) -> Self {
        self.granularity = granularity;
        self
    }

    /// Emit one fragment per visual line.
    pub fn lines(mut self) -> Self {
        self.granularity = Granularity::Lines;
        self
    }

    /// Set error mode.
    pub fn with_error_mode(mut self, mode: ErrorMode) -> Self {
        self.error_mode = mode;
        self
    }

    /// Enable lenient mode (skip pages that fail to decode).
    pub fn lenient(mut self) -> Self {
        self.error_mode = ErrorMode::Lenient;
        self
    }
}

/// What one fragment represents.
///
/// Font-size ranking depends on it, so a run must use one granularity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Granularity {
    /// One fragment per paragraph or heading block
    #[default]
    Blocks,
    /// One fragment per visual line
    Lines,
}

/// Error handling mode during extraction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ErrorMode {
    /// Fail on any page error
    #[default]
    Strict,
    /// Skip pages that fail and continue
    Lenient,
}
