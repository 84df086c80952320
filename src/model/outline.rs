//! Inferred outline types.

use super::HeadingLevel;
use serde::{Deserialize, Serialize};

/// A heading retained in the final outline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Heading {
    /// Heading level
    pub level: HeadingLevel,
    /// Trimmed heading text
    pub text: String,
    /// Page number (1-indexed)
    pub page: u32,
}

impl Heading {
    /// Create a new heading.
    pub fn new(level: HeadingLevel, text: impl Into<String>, page: u32) -> Self {
        Self {
            level,
            text: text.into(),
            page,
        }
    }
}

/// Document title plus its ordered headings.
///
/// Serializes as `{"title": ..., "outline": [...]}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Outline {
    /// Document title (empty when unresolved)
    pub title: String,
    /// Headings in page order
    pub outline: Vec<Heading>,
}

impl Outline {
    /// Create an outline from a title and headings, keeping their order.
    pub fn new(title: impl Into<String>, headings: Vec<Heading>) -> Self {
        Self {
            title: title.into(),
            outline: headings,
        }
    }

    /// Headings in the outline.
    pub fn headings(&self) -> &[Heading] {
        &self.outline
    }

    /// Number of headings.
    pub fn len(&self) -> usize {
        self.outline.len()
    }

    /// Whether the outline has no headings.
    pub fn is_empty(&self) -> bool {
        self.outline.is_empty()
    }

    /// Number of headings at the given level.
    pub fn count_level(&self, level: HeadingLevel) -> usize {
        self.outline.iter().filter(|h| h.level == level).count()
    }

    /// Split back into title and headings.
    pub fn into_parts(self) -> (String, Vec<Heading>) {
        (self.title, self.outline)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_outline_counts() {
        let outline = Outline::new(
            "Guide",
            vec![
                Heading::new(HeadingLevel::H1, "Intro", 1),
                Heading::new(HeadingLevel::H2, "Scope", 1),
                Heading::new(HeadingLevel::H2, "Terms", 2),
            ],
        );

        assert_eq!(outline.len(), 3);
        assert!(!outline.is_empty());
        assert_eq!(outline.count_level(HeadingLevel::H2), 2);
        assert_eq!(outline.count_level(HeadingLevel::H3), 0);
    }

    #[test]
    fn test_outline_serialized_shape() {
        let outline = Outline::new("Guide", vec![Heading::new(HeadingLevel::H1, "Intro", 1)]);
        let value = serde_json::to_value(&outline).unwrap();

        assert_eq!(value["title"], "Guide");
        assert_eq!(value["outline"][0]["level"], "H1");
        assert_eq!(value["outline"][0]["text"], "Intro");
        assert_eq!(value["outline"][0]["page"], 1);
    }
}
