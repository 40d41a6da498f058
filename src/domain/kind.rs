//! Content kinds and their closed category sets.
//!
//! A kind (articles, tutorials, case studies) owns one directory under the
//! content root, and each of its categories owns one subdirectory:
//!
//! ```text
//! content/
//! └── articles/
//!     ├── advanced/
//!     ├── intermediate/
//!     └── beginner/
//! ```

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// A category directory belonging to a content kind
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    /// Directory segment on disk (e.g. "advanced")
    pub dir: String,

    /// Display label derived from the directory segment (e.g. "Advanced")
    pub label: String,
}

impl Category {
    /// Create a category from its directory segment
    pub fn from_dir(dir: impl Into<String>) -> Self {
        let dir = dir.into();
        let label = label_from_segment(&dir);
        Self { dir, label }
    }

    /// Whether a user-supplied hint names this category (dir or label)
    pub fn matches(&self, hint: &str) -> bool {
        let hint = hint.trim();
        self.dir.eq_ignore_ascii_case(hint) || self.label.eq_ignore_ascii_case(hint)
    }
}

/// A content kind with its ordered category list
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContentKind {
    /// Kind name used on the command line and in output (e.g. "articles")
    pub name: String,

    /// Directory under the content root
    pub dir: String,

    /// Whether the categories are difficulty tiers; if so the category
    /// label is also the item's difficulty level
    #[serde(default)]
    pub difficulty_tiers: bool,

    /// Categories in iteration order
    pub categories: Vec<Category>,
}

impl ContentKind {
    /// Create a kind whose directory equals its name
    pub fn new<I, S>(name: impl Into<String>, categories: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let name = name.into();
        Self {
            dir: name.clone(),
            name,
            difficulty_tiers: false,
            categories: categories.into_iter().map(Category::from_dir).collect(),
        }
    }

    /// Mark the categories as difficulty tiers
    pub fn with_difficulty_tiers(mut self) -> Self {
        self.difficulty_tiers = true;
        self
    }

    /// Use a directory different from the kind name
    pub fn with_dir(mut self, dir: impl Into<String>) -> Self {
        self.dir = dir.into();
        self
    }

    /// Directory holding this kind's categories
    pub fn kind_dir(&self, root: &Path) -> PathBuf {
        root.join(&self.dir)
    }

    /// Directory for one category of this kind
    pub fn category_dir(&self, root: &Path, category: &Category) -> PathBuf {
        self.kind_dir(root).join(&category.dir)
    }

    /// Find a category by hint (dir segment or label, case-insensitive)
    pub fn category(&self, hint: &str) -> Option<&Category> {
        self.categories.iter().find(|c| c.matches(hint))
    }

    /// Categories ordered for a lookup: the hinted one first, then the rest
    pub fn lookup_order(&self, hint: Option<&str>) -> Vec<&Category> {
        let hinted = hint.and_then(|h| self.category(h));
        let mut ordered: Vec<&Category> = hinted.into_iter().collect();
        ordered.extend(self.categories.iter().filter(|c| Some(*c) != hinted));
        ordered
    }
}

/// Default kinds for the site: articles, tutorials and case studies
pub fn default_kinds() -> Vec<ContentKind> {
    vec![
        ContentKind::new("articles", ["advanced", "intermediate", "beginner"])
            .with_difficulty_tiers(),
        ContentKind::new("tutorials", ["beginner", "intermediate", "advanced"])
            .with_difficulty_tiers(),
        ContentKind::new("case-studies", ["enterprise", "startups"]),
    ]
}

/// Turn a path segment into a display label ("case-studies" -> "Case Studies")
pub fn label_from_segment(segment: &str) -> String {
    segment
        .split(|c: char| c == '-' || c == '_' || c.is_whitespace())
        .filter(|w| !w.is_empty())
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_label_from_segment() {
        assert_eq!(label_from_segment("advanced"), "Advanced");
        assert_eq!(label_from_segment("case-studies"), "Case Studies");
        assert_eq!(label_from_segment("big_data"), "Big Data");
        assert_eq!(label_from_segment(""), "");
    }

    #[test]
    fn test_category_matches_dir_or_label() {
        let category = Category::from_dir("advanced");
        assert!(category.matches("advanced"));
        assert!(category.matches("Advanced"));
        assert!(category.matches(" ADVANCED "));
        assert!(!category.matches("beginner"));
    }

    #[test]
    fn test_lookup_order_puts_hint_first() {
        let kind = ContentKind::new("articles", ["advanced", "intermediate", "beginner"]);

        let order: Vec<_> = kind
            .lookup_order(Some("Beginner"))
            .into_iter()
            .map(|c| c.dir.as_str())
            .collect();
        assert_eq!(order, vec!["beginner", "advanced", "intermediate"]);

        let order: Vec<_> = kind
            .lookup_order(None)
            .into_iter()
            .map(|c| c.dir.as_str())
            .collect();
        assert_eq!(order, vec!["advanced", "intermediate", "beginner"]);

        // Unknown hints fall back to configured order
        assert_eq!(kind.lookup_order(Some("expert")).len(), 3);
    }

    #[test]
    fn test_category_dir() {
        let kind = ContentKind::new("tutorials", ["beginner"]).with_dir("learn");
        let root = Path::new("/site/content");
        assert_eq!(
            kind.category_dir(root, &kind.categories[0]),
            PathBuf::from("/site/content/learn/beginner")
        );
    }

    #[test]
    fn test_default_kinds() {
        let kinds = default_kinds();
        assert_eq!(kinds.len(), 3);
        assert!(kinds[0].difficulty_tiers);
        assert!(!kinds[2].difficulty_tiers);
        assert_eq!(kinds[2].categories[0].label, "Enterprise");
    }
}
