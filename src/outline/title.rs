//! Document title resolution.
//!
//! A non-blank metadata title always wins. Otherwise the title is inferred
//! from first-page geometry: the largest font on page 1, topmost first,
//! then closest to the horizontal center.

use std::cmp::Ordering;

use crate::model::{FontSize, Fragment};

use super::options::OutlineOptions;

/// Where a resolved title came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TitleSource {
    /// The document info dictionary
    Metadata,
    /// Largest-font candidate on the first page
    Inferred,
    /// Topmost fragment, used when no candidate was short enough
    Topmost,
}

/// A resolved title and its source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedTitle {
    pub text: String,
    pub source: TitleSource,
}

/// Resolve the document title.
///
/// Returns `None` only when the metadata title is absent or blank and there
/// are no fragments to infer from.
pub fn resolve_title(
    metadata_title: Option<&str>,
    fragments: &[Fragment],
    options: &OutlineOptions,
) -> Option<String> {
    resolve_title_with_source(metadata_title, fragments, options).map(|t| t.text)
}

/// Resolve the document title, reporting which stage produced it.
pub fn resolve_title_with_source(
    metadata_title: Option<&str>,
    fragments: &[Fragment],
    options: &OutlineOptions,
) -> Option<ResolvedTitle> {
    if let Some(title) = metadata_title.map(str::trim).filter(|t| !t.is_empty()) {
        return Some(ResolvedTitle {
            text: title.to_string(),
            source: TitleSource::Metadata,
        });
    }

    infer_title(fragments, options)
}

/// Infer a title from fragment geometry alone.
pub fn infer_title(fragments: &[Fragment], options: &OutlineOptions) -> Option<ResolvedTitle> {
    let mut restricted: Vec<&Fragment> = fragments.iter().filter(|f| f.page == 1).collect();
    if restricted.is_empty() {
        restricted = fragments
            .iter()
            .take(options.title_fallback_window)
            .collect();
    }

    let max_size = restricted
        .iter()
        .map(|f| f.font_size)
        .max_by(|a, b| a.partial_cmp(b).unwrap_or(Ordering::Equal))?;
    let max_key = FontSize::from_points(max_size);

    let center = options.page_width / 2.0;
    let centering = |f: &Fragment| ((f.x0 + options.title_x_offset) - center).abs();

    let mut candidates: Vec<&Fragment> = restricted
        .iter()
        .copied()
        .filter(|f| f.size_key() == max_key && f.text.chars().count() <= options.max_title_chars)
        .collect();

    // Stable sort: full ties keep extraction order.
    candidates.sort_by(|a, b| {
        a.y0.partial_cmp(&b.y0)
            .unwrap_or(Ordering::Equal)
            .then_with(|| {
                centering(a)
                    .partial_cmp(&centering(b))
                    .unwrap_or(Ordering::Equal)
            })
    });

    if let Some(best) = candidates.first() {
        return Some(ResolvedTitle {
            text: best.trimmed_text().to_string(),
            source: TitleSource::Inferred,
        });
    }

    restricted
        .iter()
        .min_by(|a, b| a.y0.partial_cmp(&b.y0).unwrap_or(Ordering::Equal))
        .map(|top| ResolvedTitle {
            text: top.trimmed_text().to_string(),
            source: TitleSource::Topmost,
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn frag(text: &str, size: f64, x0: f64, y0: f64, page: u32) -> Fragment {
        Fragment::new(text, size, "Helvetica", x0, y0, page)
    }

    #[test]
    fn test_metadata_title_wins() {
        let fragments = vec![frag("Something Else", 30.0, 200.0, 40.0, 1)];
        let options = OutlineOptions::default();

        let title = resolve_title(Some("Report 2024"), &fragments, &options);
        assert_eq!(title.as_deref(), Some("Report 2024"));

        let resolved = resolve_title_with_source(Some("  Report 2024 "), &[], &options).unwrap();
        assert_eq!(resolved.text, "Report 2024");
        assert_eq!(resolved.source, TitleSource::Metadata);
    }

    #[test]
    fn test_blank_metadata_falls_through() {
        let fragments = vec![
            frag("Intro", 24.0, 250.0, 50.0, 1),
            frag("Body text here", 12.0, 50.0, 80.0, 1),
        ];
        let options = OutlineOptions::default();

        let title = resolve_title(Some("   "), &fragments, &options);
        assert_eq!(title.as_deref(), Some("Intro"));
        let title = resolve_title(None, &fragments, &options);
        assert_eq!(title.as_deref(), Some("Intro"));
    }

    #[test]
    fn test_topmost_candidate_wins() {
        let fragments = vec![
            frag("Lower Title", 24.0, 250.0, 120.0, 1),
            frag("Upper Title", 24.0, 40.0, 60.0, 1),
            frag("Body", 11.0, 40.0, 30.0, 1),
        ];
        let title = resolve_title(None, &fragments, &OutlineOptions::default());
        assert_eq!(title.as_deref(), Some("Upper Title"));
    }

    #[test]
    fn test_centered_candidate_breaks_ties() {
        // Center is 297.6; x0 + 10 = 287.6 is the closest.
        let fragments = vec![
            frag("Left", 20.0, 40.0, 70.0, 1),
            frag("Centered", 20.0, 277.6, 70.0, 1),
            frag("Right", 20.0, 450.0, 70.0, 1),
        ];
        let resolved = infer_title(&fragments, &OutlineOptions::default()).unwrap();
        assert_eq!(resolved.text, "Centered");
        assert_eq!(resolved.source, TitleSource::Inferred);
    }

    #[test]
    fn test_only_first_page_considered() {
        let fragments = vec![
            frag("Cover", 16.0, 100.0, 100.0, 1),
            frag("Huge Chapter", 40.0, 100.0, 50.0, 2),
        ];
        let title = resolve_title(None, &fragments, &OutlineOptions::default());
        assert_eq!(title.as_deref(), Some("Cover"));
    }

    #[test]
    fn test_fallback_window_without_first_page() {
        let mut fragments: Vec<Fragment> = (0..10)
            .map(|i| frag(&format!("line {}", i), 12.0, 50.0, 100.0 + i as f64, 3))
            .collect();
        // Outside the 10-fragment window.
        fragments.push(frag("Late Giant", 48.0, 50.0, 10.0, 3));

        let title = resolve_title(None, &fragments, &OutlineOptions::default());
        assert_eq!(title.as_deref(), Some("line 0"));
    }

    #[test]
    fn test_long_candidates_fall_back_to_topmost() {
        let long_text = "x".repeat(101);
        let fragments = vec![
            frag("  Small top line  ", 10.0, 50.0, 20.0, 1),
            frag(&long_text, 24.0, 50.0, 60.0, 1),
        ];
        let resolved = infer_title(&fragments, &OutlineOptions::default()).unwrap();
        assert_eq!(resolved.text, "Small top line");
        assert_eq!(resolved.source, TitleSource::Topmost);
    }

    #[test]
    fn test_title_length_limit_counts_chars() {
        // 100 multi-byte characters is still within the limit.
        let text = "é".repeat(100);
        let fragments = vec![frag(&text, 24.0, 50.0, 60.0, 1)];
        let resolved = infer_title(&fragments, &OutlineOptions::default()).unwrap();
        assert_eq!(resolved.source, TitleSource::Inferred);
    }

    #[test]
    fn test_title_x_offset_shifts_centering() {
        let fragments = vec![
            frag("Offset centered", 24.0, 287.6, 60.0, 1),
            frag("Edge centered", 24.0, 297.6, 60.0, 1),
        ];

        let resolved = infer_title(&fragments, &OutlineOptions::default()).unwrap();
        assert_eq!(resolved.text, "Offset centered");

        let options = OutlineOptions::new().with_title_x_offset(0.0);
        let resolved = infer_title(&fragments, &options).unwrap();
        assert_eq!(resolved.text, "Edge centered");
    }

    #[test]
    fn test_unresolved_title() {
        assert_eq!(resolve_title(None, &[], &OutlineOptions::default()), None);
        assert_eq!(resolve_title(Some(""), &[], &OutlineOptions::default()), None);
    }
}
