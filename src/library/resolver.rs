//! Content resolution over a content root.
//!
//! [`Resolver`] is the entry point request boundaries call: look up one
//! document by slug, or list a kind's whole catalog. It holds only
//! configuration; every call re-reads the filesystem.

use std::path::{Path, PathBuf};

use thiserror::Error;

use super::catalog::{assemble, load_document, Catalog};
use super::slug::{derive_slug, find_match, CandidateDir};
use crate::config::ResolvedConfig;
use crate::domain::{Category, ContentKind, ResolvedContent};

/// Outcomes a lookup can report besides success
#[derive(Debug, Error)]
pub enum ResolveError {
    /// No candidate directory holds a matching file (or it could not be read)
    #[error("No content found for slug: {slug}")]
    NotFound { slug: String },

    #[error("Unknown content kind: {0}")]
    UnknownKind(String),
}

impl ResolveError {
    /// Whether the caller should answer with a not-found response
    pub fn is_not_found(&self) -> bool {
        matches!(self, ResolveError::NotFound { .. })
    }
}

/// Resolves slugs and catalogs under a content root
#[derive(Debug, Clone)]
pub struct Resolver {
    root: PathBuf,
    kinds: Vec<ContentKind>,
}

impl Resolver {
    /// Create a resolver for a content root and its kinds
    pub fn new(root: impl Into<PathBuf>, kinds: Vec<ContentKind>) -> Self {
        Self {
            root: root.into(),
            kinds,
        }
    }

    /// Create a resolver from resolved configuration
    pub fn from_config(config: &ResolvedConfig) -> Self {
        Self::new(config.content_root.clone(), config.kinds.clone())
    }

    /// Content root directory
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Configured kinds, in order
    pub fn kinds(&self) -> &[ContentKind] {
        &self.kinds
    }

    /// Look up a kind by name
    pub fn kind(&self, name: &str) -> Result<&ContentKind, ResolveError> {
        self.kinds
            .iter()
            .find(|k| k.name.eq_ignore_ascii_case(name.trim()))
            .ok_or_else(|| ResolveError::UnknownKind(name.to_string()))
    }

    /// Candidate directories for a lookup, hinted category first
    pub fn candidates(&self, kind: &ContentKind, category_hint: Option<&str>) -> Vec<CandidateDir> {
        kind.lookup_order(category_hint)
            .into_iter()
            .map(|category| CandidateDir::from_path(kind.category_dir(&self.root, category)))
            .collect()
    }

    /// Resolve a slug within one kind.
    ///
    /// The matched directory decides the item's category; a file that
    /// cannot be read reports as not found.
    pub async fn resolve(
        &self,
        kind_name: &str,
        slug: &str,
        category_hint: Option<&str>,
    ) -> Result<ResolvedContent, ResolveError> {
        let kind = self.kind(kind_name)?;
        let candidates = self.candidates(kind, category_hint);
        let matched = find_match(slug, &candidates).await?;

        let category = Category::from_dir(candidates[matched.candidate].category.as_str());
        let item_slug = derive_slug(&matched.file_name);

        let doc = load_document(&matched.path, &item_slug, kind, &category)
            .await
            .map_err(|warning| {
                tracing::debug!(%warning, "Matched file could not be loaded");
                ResolveError::NotFound {
                    slug: slug.to_string(),
                }
            })?;

        if doc.lossy {
            tracing::warn!(path = %matched.path.display(), "Document is not valid UTF-8");
        }

        Ok(ResolvedContent {
            metadata: doc.item,
            content: doc.body,
        })
    }

    /// Resolve a slug across all kinds in configured order
    pub async fn resolve_any(
        &self,
        slug: &str,
        category_hint: Option<&str>,
    ) -> Result<ResolvedContent, ResolveError> {
        for kind in &self.kinds {
            match self.resolve(&kind.name, slug, category_hint).await {
                Ok(resolved) => return Ok(resolved),
                Err(e) if e.is_not_found() => continue,
                Err(e) => return Err(e),
            }
        }

        Err(ResolveError::NotFound {
            slug: slug.to_string(),
        })
    }

    /// Catalog of one kind
    pub async fn catalog(&self, kind_name: &str) -> Result<Catalog, ResolveError> {
        let kind = self.kind(kind_name)?;
        Ok(assemble(&self.root, kind).await)
    }

    /// Catalog spanning every kind
    pub async fn catalog_all(&self) -> Catalog {
        let mut catalogs = Vec::with_capacity(self.kinds.len());
        for kind in &self.kinds {
            catalogs.push(assemble(&self.root, kind).await);
        }
        Catalog::merge(catalogs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::default_kinds;

    #[test]
    fn test_unknown_kind() {
        let resolver = Resolver::new("/content", default_kinds());
        assert!(resolver.kind("articles").is_ok());
        assert!(resolver.kind("Tutorials").is_ok());
        assert!(matches!(
            resolver.kind("podcasts"),
            Err(ResolveError::UnknownKind(name)) if name == "podcasts"
        ));
    }

    #[test]
    fn test_candidates_follow_hint() {
        let resolver = Resolver::new("/content", default_kinds());
        let kind = resolver.kind("articles").unwrap();

        let candidates = resolver.candidates(kind, Some("beginner"));
        assert_eq!(candidates[0].path, PathBuf::from("/content/articles/beginner"));
        assert_eq!(candidates[0].kind, "articles");
        assert_eq!(candidates[0].category, "beginner");
        assert_eq!(candidates.len(), 3);
    }

    #[test]
    fn test_error_classification() {
        let not_found = ResolveError::NotFound {
            slug: "x".to_string(),
        };
        assert!(not_found.is_not_found());
        assert!(!ResolveError::UnknownKind("x".to_string()).is_not_found());
        assert_eq!(not_found.to_string(), "No content found for slug: x");
    }
}
