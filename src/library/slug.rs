//! Slug derivation and tiered file matching.
//!
//! Filenames often embed generation timestamps the public slug does not
//! carry (`20250102-120000-agent-evals.md` served as `agent-evals`), so a
//! lookup walks three tiers per directory:
//!
//! 1. **Exact**: `slug.md`, or a file whose derived slug equals the slug
//! 2. **Substring**: file name or derived slug contains the slug
//! 3. **Timestamp**: the slug carries an `YYYYMMDD-HHMMSS` token that a
//!    file name also carries
//!
//! The first directory with any match wins.

use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};
use tokio::fs;

use super::resolver::ResolveError;

/// Extension of content files
pub const CONTENT_EXTENSION: &str = "md";

/// Generation timestamp embedded in file names (8 digits, dash, 6 digits)
static TIMESTAMP_TOKEN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[0-9]{8}-[0-9]{6}").expect("timestamp pattern is valid"));

/// Derive the public slug from a file name.
///
/// Lower-cases, strips the extension and collapses any run of characters
/// other than ASCII letters and digits into a single `-`.
///
/// `"My Article.md"` becomes `"my-article"`.
pub fn derive_slug(file_name: &str) -> String {
    let stem = Path::new(file_name)
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or(file_name);

    let mut slug = String::with_capacity(stem.len());
    let mut pending_dash = false;
    for ch in stem.chars() {
        if ch.is_ascii_alphanumeric() {
            if pending_dash && !slug.is_empty() {
                slug.push('-');
            }
            slug.push(ch.to_ascii_lowercase());
            pending_dash = false;
        } else {
            pending_dash = true;
        }
    }
    slug
}

/// Extract the first timestamp token from a slug, if any
pub fn timestamp_token(slug: &str) -> Option<&str> {
    TIMESTAMP_TOKEN.find(slug).map(|m| m.as_str())
}

/// Which tier produced a match
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchTier {
    Exact,
    Substring,
    Timestamp,
}

impl std::fmt::Display for MatchTier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MatchTier::Exact => write!(f, "exact"),
            MatchTier::Substring => write!(f, "substring"),
            MatchTier::Timestamp => write!(f, "timestamp"),
        }
    }
}

/// A directory to search, with the labels its position assigns
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CandidateDir {
    pub path: PathBuf,

    /// Parent path segment (content kind directory)
    pub kind: String,

    /// Leaf path segment (category directory)
    pub category: String,
}

impl CandidateDir {
    /// Build a candidate, taking labels from the path's last two segments
    pub fn from_path(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let segment = |p: Option<&Path>| {
            p.and_then(|p| p.file_name())
                .map(|s| s.to_string_lossy().into_owned())
                .unwrap_or_default()
        };
        let category = segment(Some(path.as_path()));
        let kind = segment(path.parent());
        Self {
            path,
            kind,
            category,
        }
    }
}

/// A resolved file and where it was found
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchedFile {
    pub path: PathBuf,
    pub file_name: String,
    pub tier: MatchTier,

    /// Index into the candidate list
    pub candidate: usize,
}

/// Match a slug against an already-listed directory.
///
/// `files` must be in listing order; the first hit of the best tier wins.
/// Within the exact tier a file named literally `<slug>.md` beats one whose
/// derived slug merely equals the request.
pub fn match_in_listing<'a>(slug: &str, files: &'a [String]) -> Option<(&'a str, MatchTier)> {
    if slug.is_empty() {
        return None;
    }
    let literal_name = format!("{}.{}", slug, CONTENT_EXTENSION);
    if let Some(name) = files.iter().find(|name| **name == literal_name) {
        return Some((name.as_str(), MatchTier::Exact));
    }

    let slug = slug.to_lowercase();
    let exact_name = format!("{}.{}", slug, CONTENT_EXTENSION);

    let derived: Vec<String> = files.iter().map(|f| derive_slug(f)).collect();

    let exact = files
        .iter()
        .zip(&derived)
        .find(|(name, d)| name.to_lowercase() == exact_name || **d == slug);
    if let Some((name, _)) = exact {
        return Some((name.as_str(), MatchTier::Exact));
    }

    let substring = files
        .iter()
        .zip(&derived)
        .find(|(name, d)| name.to_lowercase().contains(&slug) || d.contains(&slug));
    if let Some((name, _)) = substring {
        return Some((name.as_str(), MatchTier::Substring));
    }

    let token = timestamp_token(&slug)?;
    files
        .iter()
        .find(|name| name.contains(token))
        .map(|name| (name.as_str(), MatchTier::Timestamp))
}

/// List content files in a directory, sorted by name
pub async fn list_content_files(dir: &Path) -> std::io::Result<Vec<String>> {
    let mut names = Vec::new();
    let mut entries = fs::read_dir(dir).await?;

    while let Some(entry) = entries.next_entry().await? {
        if !entry.file_type().await?.is_file() {
            continue;
        }
        if let Some(name) = entry.file_name().to_str() {
            let is_content = Path::new(name)
                .extension()
                .is_some_and(|ext| ext.eq_ignore_ascii_case(CONTENT_EXTENSION));
            if is_content {
                names.push(name.to_string());
            }
        }
    }

    names.sort();
    Ok(names)
}

/// Find the file for a slug across candidate directories, in order.
///
/// Unreadable or missing directories count as "no match here".
pub async fn find_match(slug: &str, candidates: &[CandidateDir]) -> Result<MatchedFile, ResolveError> {
    for (index, candidate) in candidates.iter().enumerate() {
        let files = match list_content_files(&candidate.path).await {
            Ok(files) => files,
            Err(e) => {
                tracing::debug!(
                    dir = %candidate.path.display(),
                    error = %e,
                    "Skipping unreadable candidate directory"
                );
                continue;
            }
        };

        if let Some((name, tier)) = match_in_listing(slug, &files) {
            tracing::debug!(slug, file = name, %tier, "Slug matched");
            return Ok(MatchedFile {
                path: candidate.path.join(name),
                file_name: name.to_string(),
                tier,
                candidate: index,
            });
        }
    }

    Err(ResolveError::NotFound {
        slug: slug.to_string(),
    })
}
