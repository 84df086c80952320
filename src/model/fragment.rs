//! Positioned text fragments and the font-size/level vocabulary.

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;

/// A positioned, font-attributed piece of extracted text.
///
/// Depending on the extractor granularity a fragment is either a single
/// visual line or a whole block. Coordinates use a top-left page origin.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Fragment {
    /// Text content (non-empty after trimming)
    pub text: String,
    /// Font size in points, rounded to 2 decimals
    pub font_size: f64,
    /// Font name of the first span (e.g., "Helvetica-Bold")
    pub font_name: String,
    /// Left edge of the first span
    pub x0: f64,
    /// Baseline of the first span, measured from the top of the page
    pub y0: f64,
    /// Page number (1-indexed)
    pub page: u32,
}

impl Fragment {
    /// Create a new fragment. The font size is rounded to 2 decimals.
    pub fn new(
        text: impl Into<String>,
        font_size: f64,
        font_name: impl Into<String>,
        x0: f64,
        y0: f64,
        page: u32,
    ) -> Self {
        Self {
            text: text.into(),
            font_size: FontSize::from_points(font_size).points(),
            font_name: font_name.into(),
            x0,
            y0,
            page,
        }
    }

    /// The rounded font size used for all size comparisons.
    pub fn size_key(&self) -> FontSize {
        FontSize::from_points(self.font_size)
    }

    /// Text with surrounding whitespace removed.
    pub fn trimmed_text(&self) -> &str {
        self.text.trim()
    }
}

/// A font size rounded to 2 decimals, stored as hundredths of a point.
///
/// Comparing rounded integers keeps float noise (11.999 vs 12.0) from
/// splitting one visual size into two buckets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct FontSize(i64);

impl FontSize {
    /// Round a size in points to the nearest hundredth.
    ///
    /// Rounding works on the exact binary value of `points`, with ties to
    /// even, so `10.285` (stored slightly above the decimal) becomes `10.29`
    /// while `10.125` becomes `10.12`.
    pub fn from_points(points: f64) -> Self {
        Self(round_hundredths(points))
    }

    /// The rounded size in points.
    pub fn points(self) -> f64 {
        self.0 as f64 / 100.0
    }

    /// The size in hundredths of a point.
    pub fn hundredths(self) -> i64 {
        self.0
    }
}

impl fmt::Display for FontSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        let abs = self.hundredths().unsigned_abs();
        write!(f, "{}{}.{:02}", sign, abs / 100, abs % 100)
    }
}

/// Correctly rounded `points * 100`, ties to even.
fn round_hundredths(points: f64) -> i64 {
    if !points.is_finite() {
        return 0;
    }

    let bits = points.to_bits();
    let negative = bits >> 63 == 1;
    let exp_bits = ((bits >> 52) & 0x7ff) as i32;
    let fraction = bits & ((1u64 << 52) - 1);
    let (mantissa, exp) = if exp_bits == 0 {
        (fraction, -1074)
    } else {
        (fraction | (1u64 << 52), exp_bits - 1075)
    };

    // Values of 2^52 and above are whole numbers already.
    if exp >= 0 {
        return (points * 100.0) as i64;
    }

    let shift = exp.unsigned_abs();
    if shift >= 127 {
        return 0;
    }

    let scaled = u128::from(mantissa) * 100;
    let quotient = scaled >> shift;
    let remainder = scaled & ((1u128 << shift) - 1);
    let half = 1u128 << (shift - 1);
    let rounded = match remainder.cmp(&half) {
        Ordering::Greater => quotient + 1,
        Ordering::Less => quotient,
        Ordering::Equal => quotient + (quotient & 1),
    };

    let magnitude = rounded as i64;
    if negative {
        -magnitude
    } else {
        magnitude
    }
}

/// Heading level, ordered from the top rank down (`H1 < H2 < H3`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum HeadingLevel {
    H1,
    H2,
    H3,
}

impl HeadingLevel {
    /// All levels, top rank first.
    pub const ALL: [HeadingLevel; 3] = [HeadingLevel::H1, HeadingLevel::H2, HeadingLevel::H3];

    /// Level for the n-th largest font size (0-based), if any.
    pub fn from_rank(rank: usize) -> Option<Self> {
        Self::ALL.get(rank).copied()
    }

    /// Label used in outline output.
    pub fn as_str(self) -> &'static str {
        match self {
            HeadingLevel::H1 => "H1",
            HeadingLevel::H2 => "H2",
            HeadingLevel::H3 => "H3",
        }
    }
}

impl fmt::Display for HeadingLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A fragment tagged with the heading level of its font size.
#[derive(Debug, Clone, PartialEq)]
pub struct LabeledFragment {
    pub fragment: Fragment,
    pub level: HeadingLevel,
}

impl LabeledFragment {
    /// Attach a level to a fragment.
    pub fn new(fragment: Fragment, level: HeadingLevel) -> Self {
        Self { fragment, level }
    }
}
