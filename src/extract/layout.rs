//! Grouping spans into lines and blocks, and flattening them to fragments.
//!
//! Spans arriving here already use a top-left page origin, so a smaller
//! `y` is higher on the page.

use std::cmp::Ordering;
use std::sync::OnceLock;

use regex::Regex;
use unicode_normalization::UnicodeNormalization;

use crate::model::Fragment;

use super::content::{is_spaceless_script_char, TextSpan};

/// A text line composed of spans sharing a baseline.
#[derive(Debug, Clone)]
pub struct TextLine {
    /// Spans in this line, sorted by X position
    pub spans: Vec<TextSpan>,
}

impl TextLine {
    /// Create a line from spans, ordering them left to right.
    pub fn from_spans(mut spans: Vec<TextSpan>) -> Self {
        spans.sort_by(|a, b| a.x.partial_cmp(&b.x).unwrap_or(Ordering::Equal));
        Self { spans }
    }

    /// Leftmost X position.
    pub fn x(&self) -> f64 {
        self.spans.first().map(|s| s.x).unwrap_or(0.0)
    }

    /// Baseline of the first span.
    pub fn y(&self) -> f64 {
        self.spans.first().map(|s| s.y).unwrap_or(0.0)
    }

    /// Average span font size.
    pub fn font_size(&self) -> f64 {
        average(self.spans.iter().map(|s| s.font_size))
    }

    /// Combined text with spaces inserted at visual gaps.
    ///
    /// No space is inserted between two CJK characters.
    pub fn text(&self) -> String {
        let mut result = String::new();

        for (i, span) in self.spans.iter().enumerate() {
            let piece = span.text.trim();
            if i > 0 && !result.is_empty() && !piece.is_empty() {
                let prev = &self.spans[i - 1];
                let gap = span.x - (prev.x + prev.width);
                let char_width = span.font_size * 0.5;

                let prev_cjk = result.chars().last().is_some_and(is_spaceless_script_char);
                let curr_cjk = piece.chars().next().is_some_and(is_spaceless_script_char);

                if gap > char_width * 0.2 && !(prev_cjk && curr_cjk) {
                    result.push(' ');
                }
            }
            result.push_str(piece);
        }

        result
    }
}

/// A run of consecutive lines forming a paragraph or heading block.
#[derive(Debug, Clone)]
pub struct TextBlock {
    pub lines: Vec<TextLine>,
}

impl TextBlock {
    /// Combined text of all lines.
    pub fn text(&self) -> String {
        self.lines
            .iter()
            .map(|l| l.text())
            .filter(|t| !t.is_empty())
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// Average font size over every span in the block.
    pub fn font_size(&self) -> f64 {
        average(
            self.lines
                .iter()
                .flat_map(|l| l.spans.iter())
                .map(|s| s.font_size),
        )
    }

    fn first_span(&self) -> Option<&TextSpan> {
        self.lines.first().and_then(|l| l.spans.first())
    }
}

/// Group spans into lines by baseline, top to bottom.
pub fn group_spans_into_lines(mut spans: Vec<TextSpan>) -> Vec<TextLine> {
    spans.sort_by(|a, b| {
        a.y.partial_cmp(&b.y)
            .unwrap_or(Ordering::Equal)
            .then_with(|| a.x.partial_cmp(&b.x).unwrap_or(Ordering::Equal))
    });

    let mut lines = Vec::new();
    let mut current: Vec<TextSpan> = Vec::new();
    let mut current_y: Option<f64> = None;

    for span in spans {
        // Allow 30% of font size variance
        let tolerance = span.font_size * 0.3;
        match current_y {
            Some(y) if (span.y - y).abs() <= tolerance => current.push(span),
            _ => {
                if !current.is_empty() {
                    lines.push(TextLine::from_spans(std::mem::take(&mut current)));
                }
                current_y = Some(span.y);
                current.push(span);
            }
        }
    }

    if !current.is_empty() {
        lines.push(TextLine::from_spans(current));
    }

    lines
}

/// Group consecutive lines into blocks on spacing, size, and indentation breaks.
pub fn group_lines_into_blocks(lines: Vec<TextLine>) -> Vec<TextBlock> {
    let avg_spacing = average_line_spacing(&lines);
    let mut blocks = Vec::new();
    let mut current: Vec<TextLine> = Vec::new();

    for line in lines {
        if let Some(prev) = current.last() {
            if should_break_block(prev, &line, avg_spacing) {
                blocks.push(TextBlock {
                    lines: std::mem::take(&mut current),
                });
            }
        }
        current.push(line);
    }

    if !current.is_empty() {
        blocks.push(TextBlock { lines: current });
    }

    blocks
}

fn average_line_spacing(lines: &[TextLine]) -> f64 {
    let spacings: Vec<f64> = lines
        .windows(2)
        .map(|w| (w[1].y() - w[0].y()).abs())
        .filter(|s| *s > 0.1)
        .collect();

    if spacings.is_empty() {
        return 12.0;
    }
    spacings.iter().sum::<f64>() / spacings.len() as f64
}

fn should_break_block(prev: &TextLine, curr: &TextLine, avg_spacing: f64) -> bool {
    let spacing = (curr.y() - prev.y()).abs();
    spacing > avg_spacing * 1.5
        || (prev.font_size() - curr.font_size()).abs() > 1.0
        || (prev.x() - curr.x()).abs() > 20.0
}

/// Flatten lines into one fragment each.
pub fn lines_to_fragments(lines: &[TextLine], page: u32) -> Vec<Fragment> {
    lines
        .iter()
        .filter_map(|line| {
            let first = line.spans.first()?;
            make_fragment(&line.text(), line.font_size(), first, page)
        })
        .collect()
}

/// Flatten blocks into one fragment each.
pub fn blocks_to_fragments(blocks: &[TextBlock], page: u32) -> Vec<Fragment> {
    blocks
        .iter()
        .filter_map(|block| {
            let first = block.first_span()?;
            make_fragment(&block.text(), block.font_size(), first, page)
        })
        .collect()
}

fn make_fragment(text: &str, font_size: f64, first: &TextSpan, page: u32) -> Option<Fragment> {
    let text = normalize_text(text);
    if text.is_empty() || font_size <= 0.0 {
        return None;
    }
    Some(Fragment::new(
        text,
        font_size,
        first.font_name.clone(),
        first.x,
        first.y,
        page,
    ))
}

/// NFC-normalize and collapse whitespace runs to single spaces.
pub fn normalize_text(text: &str) -> String {
    static WHITESPACE: OnceLock<Regex> = OnceLock::new();
    let re = WHITESPACE.get_or_init(|| Regex::new(r"\s+").unwrap());

    let normalized: String = text.nfc().collect();
    re.replace_all(normalized.trim(), " ").into_owned()
}

fn average(values: impl Iterator<Item = f64>) -> f64 {
    let (sum, count) = values.fold((0.0f64, 0usize), |(s, c), v| (s + v, c + 1));
    if count == 0 {
        0.0
    } else {
        sum / count as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn span(text: &str, x: f64, y: f64, size: f64) -> TextSpan {
        TextSpan::new(text.to_string(), x, y, size, "Helvetica".to_string())
    }

    #[test]
    fn test_group_lines_by_baseline() {
        let spans = vec![
            span("World", 120.0, 100.5, 12.0),
            span("Second", 72.0, 130.0, 12.0),
            span("Hello", 72.0, 100.0, 12.0),
        ];
        let lines = group_spans_into_lines(spans);

        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0].text(), "Hello World");
        assert_eq!(lines[0].y(), 100.0);
        assert_eq!(lines[1].text(), "Second");
    }

    #[test]
    fn test_adjacent_glyph_runs_join_without_space() {
        // "Hel" is 3 chars * 6pt estimated width, so "lo" starts right at its end.
        let line = TextLine::from_spans(vec![span("Hel", 72.0, 100.0, 12.0), span("lo", 90.0, 100.0, 12.0)]);
        assert_eq!(line.text(), "Hello");
    }

    #[test]
    fn test_cjk_runs_join_without_space() {
        let line = TextLine::from_spans(vec![span("中文", 72.0, 100.0, 12.0), span("字", 120.0, 100.0, 12.0)]);
        assert_eq!(line.text(), "中文字");
    }

    #[test]
    fn test_line_font_size_is_average() {
        let line = TextLine::from_spans(vec![span("A", 72.0, 100.0, 10.0), span("B", 200.0, 100.0, 14.0)]);
        assert_eq!(line.font_size(), 12.0);
    }

    #[test]
    fn test_blocks_break_on_size_and_spacing() {
        let spans = vec![
            span("Chapter One", 72.0, 80.0, 20.0),
            span("First line of body", 72.0, 120.0, 11.0),
            span("second line of body", 72.0, 134.0, 11.0),
            span("third line of body", 72.0, 148.0, 11.0),
            span("New paragraph", 72.0, 220.0, 11.0),
        ];
        let blocks = group_lines_into_blocks(group_spans_into_lines(spans));

        let texts: Vec<String> = blocks.iter().map(|b| b.text()).collect();
        assert_eq!(
            texts,
            vec![
                "Chapter One",
                "First line of body second line of body third line of body",
                "New paragraph",
            ]
        );
    }

    #[test]
    fn test_blocks_break_on_indent() {
        let spans = vec![
            span("Left", 72.0, 100.0, 11.0),
            span("Indented", 120.0, 114.0, 11.0),
        ];
        let blocks = group_lines_into_blocks(group_spans_into_lines(spans));
        assert_eq!(blocks.len(), 2);
    }

    #[test]
    fn test_fragments_from_lines_and_blocks() {
        let spans = vec![
            span("Title", 200.0, 60.0, 24.0),
            span("body one", 72.0, 100.0, 12.0),
            span("body two", 72.0, 114.0, 12.0),
        ];
        let lines = group_spans_into_lines(spans);
        let line_frags = lines_to_fragments(&lines, 1);
        assert_eq!(line_frags.len(), 3);
        assert_eq!(line_frags[0].text, "Title");
        assert_eq!(line_frags[0].x0, 200.0);
        assert_eq!(line_frags[0].y0, 60.0);

        let blocks = group_lines_into_blocks(lines);
        let block_frags = blocks_to_fragments(&blocks, 2);
        assert_eq!(block_frags.len(), 2);
        assert_eq!(block_frags[1].text, "body one body two");
        assert_eq!(block_frags[1].font_size, 12.0);
        assert_eq!(block_frags[1].page, 2);
    }

    #[test]
    fn test_normalize_text() {
        assert_eq!(normalize_text("  a \t b\n c  "), "a b c");
        // Decomposed e + combining acute becomes a single code point.
        assert_eq!(normalize_text("Caf\u{0065}\u{0301}"), "Caf\u{00E9}");
        assert_eq!(normalize_text("   "), "");
    }
}
