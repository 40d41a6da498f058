//! The canonical content record handed to page renderers.

use chrono::NaiveDate;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use super::kind::{Category, ContentKind};
use crate::library::fields::{parse_date, NormalizedFields};
use crate::library::frontmatter::FieldValue;

/// A normalized content item.
///
/// `category` and `kind` come from where the file lives, never from its
/// metadata. Category + slug is the item's key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentItem {
    /// Lookup key derived from the file name
    pub slug: String,

    /// Content kind (e.g. "articles")
    pub kind: String,

    /// Category label from the containing directory (e.g. "Advanced")
    pub category: String,

    pub title: String,
    pub author: String,
    pub description: String,
    #[serde(rename = "abstract")]
    pub abstract_text: String,
    pub keywords: Vec<String>,

    /// Human-readable date, or the raw value when unparseable
    pub date: String,
    pub raw_date: String,

    pub difficulty_level: String,
    pub estimated_time: String,
    pub journal: Option<String>,
    pub doi: Option<String>,

    /// Unrecognized metadata keys, lower-cased
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub extra: IndexMap<String, FieldValue>,
}

impl ContentItem {
    /// Build an item from normalized metadata and its location.
    ///
    /// For kinds whose categories are difficulty tiers, the directory also
    /// decides `difficulty_level`, overriding the file's own claim.
    pub fn from_fields(
        slug: impl Into<String>,
        kind: &ContentKind,
        category: &Category,
        fields: NormalizedFields,
    ) -> Self {
        let difficulty_level = if kind.difficulty_tiers {
            category.label.clone()
        } else {
            fields.difficulty_level
        };

        Self {
            slug: slug.into(),
            kind: kind.name.clone(),
            category: category.label.clone(),
            title: fields.title,
            author: fields.author,
            description: fields.description,
            abstract_text: fields.abstract_text,
            keywords: fields.keywords,
            date: fields.date,
            raw_date: fields.raw_date,
            difficulty_level,
            estimated_time: fields.estimated_time,
            journal: fields.journal,
            doi: fields.doi,
            extra: fields.extra,
        }
    }

    /// Calendar date used for ordering, from the raw source value
    pub fn published_on(&self) -> Option<NaiveDate> {
        parse_date(&self.raw_date)
    }
}

/// A single resolved document: metadata plus markdown body
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolvedContent {
    pub metadata: ContentItem,
    pub content: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::library::fields::normalize_default;
    use crate::library::frontmatter::RawFields;

    fn fields(pairs: &[(&str, &str)]) -> NormalizedFields {
        let raw: RawFields = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), FieldValue::from(*v)))
            .collect();
        normalize_default(&raw)
    }

    #[test]
    fn test_difficulty_comes_from_directory_for_tiered_kinds() {
        let kind = ContentKind::new("articles", ["advanced"]).with_difficulty_tiers();
        let item = ContentItem::from_fields(
            "intro",
            &kind,
            &kind.categories[0],
            fields(&[("difficulty", "Beginner")]),
        );

        assert_eq!(item.category, "Advanced");
        assert_eq!(item.difficulty_level, "Advanced");
        assert_eq!(item.kind, "articles");
    }

    #[test]
    fn test_difficulty_kept_for_untiered_kinds() {
        let kind = ContentKind::new("case-studies", ["enterprise"]);
        let item = ContentItem::from_fields(
            "bank",
            &kind,
            &kind.categories[0],
            fields(&[("difficulty", "Intermediate")]),
        );

        assert_eq!(item.category, "Enterprise");
        assert_eq!(item.difficulty_level, "Intermediate");
    }

    #[test]
    fn test_serializes_canonical_keys() {
        let kind = ContentKind::new("articles", ["beginner"]);
        let item = ContentItem::from_fields(
            "hello",
            &kind,
            &kind.categories[0],
            fields(&[("Title", "Hello"), ("date", "2025-01-05")]),
        );

        let json = serde_json::to_value(&item).unwrap();
        assert_eq!(json["title"], "Hello");
        assert_eq!(json["rawDate"], "2025-01-05");
        assert_eq!(json["date"], "January 5, 2025");
        assert_eq!(json["difficultyLevel"], "Not specified");
        assert_eq!(json["estimatedTime"], "Not specified");
        assert!(json["journal"].is_null());
        assert!(json["doi"].is_null());
        assert_eq!(json["abstract"], "");
        assert!(json.get("extra").is_none());
    }

    #[test]
    fn test_published_on_uses_raw_date() {
        let kind = ContentKind::new("articles", ["beginner"]);
        let item = ContentItem::from_fields(
            "hello",
            &kind,
            &kind.categories[0],
            fields(&[("date", "2024/03/09")]),
        );
        assert_eq!(item.published_on(), NaiveDate::from_ymd_opt(2024, 3, 9));
    }
}
