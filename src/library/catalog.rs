//! Catalog assembly: every document of a kind, normalized and ordered.
//!
//! A catalog is rebuilt from disk on every request. Problems with single
//! directories or files are collected as warnings next to the items, so one
//! bad document never fails the whole listing.

use std::cmp::Reverse;
use std::collections::HashSet;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tokio::fs;

use super::fields::normalize_default;
use super::frontmatter::parse_frontmatter;
use super::slug::{derive_slug, list_content_files, CONTENT_EXTENSION};
use crate::domain::{Category, ContentItem, ContentKind};

/// Catalog of normalized items, newest first
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Catalog {
    /// Most recent item, if any
    pub featured: Option<ContentItem>,

    /// All items sorted by date descending
    pub items: Vec<ContentItem>,

    /// Directories and files that were skipped or degraded
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<CatalogWarning>,
}

impl Catalog {
    /// Build a catalog from items in encounter order.
    ///
    /// Sorts by date descending; undated or unparseable items go last and
    /// ties keep encounter order.
    pub fn from_items(mut items: Vec<ContentItem>, warnings: Vec<CatalogWarning>) -> Self {
        items.sort_by_cached_key(|item| Reverse(item.published_on()));
        Self {
            featured: items.first().cloned(),
            items,
            warnings,
        }
    }

    /// Combine catalogs (e.g. one per kind) into one, re-sorting
    pub fn merge(catalogs: impl IntoIterator<Item = Catalog>) -> Self {
        let mut items = Vec::new();
        let mut warnings = Vec::new();
        for catalog in catalogs {
            items.extend(catalog.items);
            warnings.extend(catalog.warnings);
        }
        Self::from_items(items, warnings)
    }

    /// Get an item by its key (category label + slug)
    pub fn get(&self, category: &str, slug: &str) -> Option<&ContentItem> {
        self.items
            .iter()
            .find(|i| i.slug == slug && i.category.eq_ignore_ascii_case(category))
    }

    /// Search items by query (case-insensitive substring match)
    pub fn search(&self, query: &str) -> Vec<&ContentItem> {
        let query_lower = query.to_lowercase();

        self.items
            .iter()
            .filter(|item| {
                item.title.to_lowercase().contains(&query_lower)
                    || item.description.to_lowercase().contains(&query_lower)
                    || item.author.to_lowercase().contains(&query_lower)
                    || item
                        .keywords
                        .iter()
                        .any(|k| k.to_lowercase().contains(&query_lower))
            })
            .collect()
    }

    /// Filter items by category label or directory name
    pub fn filter_by_category(&self, category: &str) -> Vec<&ContentItem> {
        let wanted = Category::from_dir(category.trim());
        self.items
            .iter()
            .filter(|item| wanted.matches(&item.category))
            .collect()
    }

    /// Items in order, optionally truncated
    pub fn list(&self, limit: Option<usize>) -> Vec<&ContentItem> {
        let mut items: Vec<_> = self.items.iter().collect();
        if let Some(limit) = limit {
            items.truncate(limit);
        }
        items
    }

    /// Get the number of items
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Check if the catalog is empty
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

/// What went wrong with a skipped or degraded path
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WarningKind {
    /// Category directory does not exist
    MissingDirectory,

    /// Category directory exists but could not be listed
    UnreadableDirectory,

    /// Document could not be read; skipped
    UnreadableFile,

    /// Document was not valid UTF-8; decoded lossily and kept
    InvalidUtf8,

    /// Another file in the same directory already produced this slug; skipped
    DuplicateSlug,
}

impl std::fmt::Display for WarningKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            WarningKind::MissingDirectory => write!(f, "missing directory"),
            WarningKind::UnreadableDirectory => write!(f, "unreadable directory"),
            WarningKind::UnreadableFile => write!(f, "unreadable file"),
            WarningKind::InvalidUtf8 => write!(f, "invalid utf-8"),
            WarningKind::DuplicateSlug => write!(f, "duplicate slug"),
        }
    }
}

/// A recorded problem with one path
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogWarning {
    pub path: PathBuf,
    pub kind: WarningKind,
    pub message: String,
}

impl CatalogWarning {
    pub fn new(path: impl Into<PathBuf>, kind: WarningKind, message: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            kind,
            message: message.into(),
        }
    }
}

impl std::fmt::Display for CatalogWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {} ({})", self.kind, self.path.display(), self.message)
    }
}

/// A document loaded from disk
#[derive(Debug, Clone)]
pub struct LoadedDocument {
    pub item: ContentItem,
    pub body: String,

    /// Whether invalid UTF-8 had to be replaced
    pub lossy: bool,
}

/// Read, parse and normalize a single document.
///
/// Only reading can fail; a malformed or missing metadata block degrades to
/// defaults.
pub async fn load_document(
    path: &Path,
    slug: &str,
    kind: &ContentKind,
    category: &Category,
) -> Result<LoadedDocument, CatalogWarning> {
    let bytes = fs::read(path).await.map_err(|e| {
        CatalogWarning::new(path, WarningKind::UnreadableFile, e.to_string())
    })?;

    let (text, lossy) = match String::from_utf8(bytes) {
        Ok(text) => (text, false),
        Err(e) => (String::from_utf8_lossy(e.as_bytes()).into_owned(), true),
    };

    let frontmatter = parse_frontmatter(&text);
    if !frontmatter.has_block {
        tracing::debug!(path = %path.display(), "No metadata block; using defaults");
    }
    let fields = normalize_default(&frontmatter.fields);

    Ok(LoadedDocument {
        item: ContentItem::from_fields(slug, kind, category, fields),
        body: frontmatter.body,
        lossy,
    })
}

/// Whether a file name is exactly its own slug plus the content extension
fn is_literal_name(file_name: &str) -> bool {
    file_name == format!("{}.{}", derive_slug(file_name), CONTENT_EXTENSION)
}

/// Assemble the catalog for one kind under a content root.
///
/// Categories are walked in configured order and files in name order; that
/// encounter order breaks date ties.
pub async fn assemble(root: &Path, kind: &ContentKind) -> Catalog {
    let mut items = Vec::new();
    let mut warnings = Vec::new();

    for category in &kind.categories {
        let dir = kind.category_dir(root, category);

        let files = match list_content_files(&dir).await {
            Ok(files) => files,
            Err(e) => {
                let warning_kind = if e.kind() == ErrorKind::NotFound {
                    WarningKind::MissingDirectory
                } else {
                    WarningKind::UnreadableDirectory
                };
                tracing::warn!(dir = %dir.display(), error = %e, "Skipping category directory");
                warnings.push(CatalogWarning::new(&dir, warning_kind, e.to_string()));
                continue;
            }
        };

        // Slugs owned by a file named exactly `<slug>.md`
        let literal: HashSet<String> = files
            .iter()
            .filter(|name| is_literal_name(name))
            .map(|name| derive_slug(name))
            .collect();

        let mut seen = HashSet::new();
        for file_name in files {
            let path = dir.join(&file_name);
            let slug = derive_slug(&file_name);

            let shadowed = literal.contains(&slug) && !is_literal_name(&file_name);
            if shadowed || !seen.insert(slug.clone()) {
                tracing::warn!(path = %path.display(), slug = %slug, "Duplicate slug in directory");
                warnings.push(CatalogWarning::new(
                    &path,
                    WarningKind::DuplicateSlug,
                    format!("slug '{}' already used in {}", slug, dir.display()),
                ));
                continue;
            }

            match load_document(&path, &slug, kind, category).await {
                Ok(doc) => {
                    if doc.lossy {
                        tracing::warn!(path = %path.display(), "Document is not valid UTF-8");
                        warnings.push(CatalogWarning::new(
                            &path,
                            WarningKind::InvalidUtf8,
                            "invalid UTF-8 replaced",
                        ));
                    }
                    items.push(doc.item);
                }
                Err(warning) => {
                    tracing::warn!(%warning, "Skipping document");
                    warnings.push(warning);
                }
            }
        }
    }

    let catalog = Catalog::from_items(items, warnings);
    tracing::info!(
        kind = %kind.name,
        items = catalog.len(),
        warnings = catalog.warnings.len(),
        "Assembled catalog"
    );
    catalog
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::library::fields::normalize_default;
    use crate::library::frontmatter::{FieldValue, RawFields};

    fn item(slug: &str, category: &str, date: &str) -> ContentItem {
        let kind = ContentKind::new("articles", [category]);
        let mut raw = RawFields::new();
        raw.insert("title".into(), FieldValue::from(slug));
        raw.insert("date".into(), FieldValue::from(date));
        ContentItem::from_fields(slug, &kind, &kind.categories[0], normalize_default(&raw))
    }

    #[test]
    fn test_sorted_newest_first_and_featured() {
        let catalog = Catalog::from_items(
            vec![
                item("old", "beginner", "2024-01-01"),
                item("newest", "beginner", "2025-06-01"),
                item("middle", "beginner", "2025-01-01"),
            ],
            Vec::new(),
        );

        let slugs: Vec<_> = catalog.items.iter().map(|i| i.slug.as_str()).collect();
        assert_eq!(slugs, vec!["newest", "middle", "old"]);
        assert_eq!(catalog.featured.as_ref().map(|i| i.slug.as_str()), Some("newest"));
    }

    #[test]
    fn test_undated_last_and_ties_stable() {
        let catalog = Catalog::from_items(
            vec![
                item("undated", "beginner", "someday"),
                item("first", "advanced", "2025-01-01"),
                item("second", "beginner", "2025-01-01"),
            ],
            Vec::new(),
        );

        let slugs: Vec<_> = catalog.items.iter().map(|i| i.slug.as_str()).collect();
        assert_eq!(slugs, vec!["first", "second", "undated"]);
    }

    #[test]
    fn test_empty_catalog_has_no_featured() {
        let catalog = Catalog::from_items(Vec::new(), Vec::new());
        assert!(catalog.featured.is_none());
        assert!(catalog.is_empty());
    }

    #[test]
    fn test_search_and_filters() {
        let catalog = Catalog::from_items(
            vec![
                item("rust-agents", "advanced", "2025-01-01"),
                item("python-intro", "beginner", "2025-02-01"),
            ],
            Vec::new(),
        );

        assert_eq!(catalog.search("RUST").len(), 1);
        assert_eq!(catalog.search("nothing").len(), 0);
        assert_eq!(catalog.filter_by_category("Advanced").len(), 1);
        assert_eq!(catalog.filter_by_category("beginner").len(), 1);
        assert_eq!(catalog.list(Some(1)).len(), 1);
        assert!(catalog.get("advanced", "rust-agents").is_some());
        assert!(catalog.get("beginner", "rust-agents").is_none());
    }

    #[test]
    fn test_merge_resorts() {
        let a = Catalog::from_items(vec![item("a", "advanced", "2024-05-01")], Vec::new());
        let b = Catalog::from_items(
            vec![item("b", "beginner", "2025-05-01")],
            vec![CatalogWarning::new(
                "/missing",
                WarningKind::MissingDirectory,
                "not found",
            )],
        );

        let merged = Catalog::merge([a, b]);
        assert_eq!(merged.featured.as_ref().map(|i| i.slug.clone()), Some("b".to_string()));
        assert_eq!(merged.len(), 2);
        assert_eq!(merged.warnings.len(), 1);
    }
}
