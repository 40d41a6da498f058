//! Configuration for folio.
//!
//! Configuration sources (highest priority first):
//! 1. Environment variables (FOLIO_CONTENT_ROOT)
//! 2. Config file (.folio/config.yaml, then <config dir>/folio/config.yaml)
//! 3. Defaults (./content with articles, tutorials and case studies)
//!
//! Config file discovery:
//! - Searches current directory and parents for .folio/config.yaml
//! - Falls back to the user config directory
//! - For a project file, `content_root` is relative to the directory holding .folio/;
//!   for the user file it is relative to the file's own directory

use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::domain::{default_kinds, Category, ContentKind};

/// Environment variable overriding the content root
pub const CONTENT_ROOT_ENV: &str = "FOLIO_CONTENT_ROOT";

/// Global cached configuration (stores Result to handle init errors)
static CONFIG: OnceLock<Result<ResolvedConfig, String>> = OnceLock::new();

/// Raw config file schema (matches YAML structure)
#[derive(Debug, Clone, Deserialize)]
pub struct ConfigFile {
    pub version: String,

    /// Content root (relative paths resolved against the config location)
    #[serde(default)]
    pub content_root: Option<String>,

    /// Content kinds; defaults are used when omitted
    #[serde(default)]
    pub kinds: Option<Vec<KindConfig>>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct KindConfig {
    pub name: String,
    /// Directory under the content root (defaults to the name)
    pub dir: Option<String>,
    #[serde(default)]
    pub difficulty_tiers: bool,
    /// Category directory names, in iteration order
    #[serde(default)]
    pub categories: Vec<String>,
}

impl From<KindConfig> for ContentKind {
    fn from(cfg: KindConfig) -> Self {
        ContentKind {
            dir: cfg.dir.unwrap_or_else(|| cfg.name.clone()),
            name: cfg.name,
            difficulty_tiers: cfg.difficulty_tiers,
            categories: cfg.categories.into_iter().map(Category::from_dir).collect(),
        }
    }
}

/// Resolved configuration with absolute paths
#[derive(Debug, Clone)]
pub struct ResolvedConfig {
    /// Directory holding one subdirectory per kind
    pub content_root: PathBuf,
    /// Kinds in iteration order
    pub kinds: Vec<ContentKind>,
    /// Path to config file (if found)
    pub config_file: Option<PathBuf>,
}

impl ResolvedConfig {
    /// Defaults relative to a base directory
    pub fn defaults(base: &Path) -> Self {
        Self {
            content_root: base.join("content"),
            kinds: default_kinds(),
            config_file: None,
        }
    }
}

/// Find a project config file by searching `start` and its parents
fn find_project_config(start: &Path) -> Option<PathBuf> {
    let mut current = start.to_path_buf();

    loop {
        let config_path = current.join(".folio").join("config.yaml");
        if config_path.exists() {
            return Some(config_path);
        }

        if !current.pop() {
            break;
        }
    }

    None
}

/// User-level config file, if present
fn find_user_config() -> Option<PathBuf> {
    let path = dirs::config_dir()?.join("folio").join("config.yaml");
    path.exists().then_some(path)
}

/// Load and parse config file
fn load_config_file(path: &Path) -> Result<ConfigFile> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;

    serde_yaml::from_str(&content)
        .with_context(|| format!("Failed to parse config file: {}", path.display()))
}

/// Resolve a path that may be relative to a base directory
fn resolve_path(base: &Path, path_str: &str) -> PathBuf {
    let path = PathBuf::from(path_str);
    if path.is_absolute() {
        path
    } else {
        base.join(path)
            .canonicalize()
            .unwrap_or_else(|_| base.join(path_str))
    }
}

/// Base directory for relative paths in a config file.
///
/// A project file at `<root>/.folio/config.yaml` resolves against `<root>`;
/// any other file resolves against its own directory.
fn config_base_dir(config_path: &Path) -> PathBuf {
    let parent = config_path.parent().unwrap_or(Path::new("."));
    if parent.file_name().is_some_and(|n| n == ".folio") {
        parent.parent().unwrap_or(Path::new(".")).to_path_buf()
    } else {
        parent.to_path_buf()
    }
}

/// Load configuration, discovering config files from `start`
pub fn load_config_from(start: &Path) -> Result<ResolvedConfig> {
    let config_file = find_project_config(start).or_else(find_user_config);
    let env_root = std::env::var(CONTENT_ROOT_ENV).ok().filter(|v| !v.is_empty());

    let mut resolved = if let Some(ref config_path) = config_file {
        let config = load_config_file(config_path)?;
        let base_dir = config_base_dir(config_path);

        let content_root = match config.content_root {
            Some(ref root) => resolve_path(&base_dir, root),
            None => base_dir.join("content"),
        };

        let kinds = match config.kinds {
            Some(kinds) if !kinds.is_empty() => kinds.into_iter().map(ContentKind::from).collect(),
            _ => default_kinds(),
        };

        ResolvedConfig {
            content_root,
            kinds,
            config_file: Some(config_path.clone()),
        }
    } else {
        ResolvedConfig::defaults(start)
    };

    if let Some(root) = env_root {
        resolved.content_root = PathBuf::from(root);
    }

    tracing::debug!(
        content_root = %resolved.content_root.display(),
        kinds = resolved.kinds.len(),
        "Configuration loaded"
    );

    Ok(resolved)
}

/// Load configuration from all sources
fn load_config() -> Result<ResolvedConfig> {
    let cwd = std::env::current_dir().context("Failed to determine current directory")?;
    load_config_from(&cwd)
}

/// Get the global configuration (loads once, then cached)
pub fn config() -> Result<&'static ResolvedConfig> {
    let result = CONFIG.get_or_init(|| load_config().map_err(|e| format!("{:#}", e)));

    match result {
        Ok(config) => Ok(config),
        Err(e) => anyhow::bail!("{}", e),
    }
}

/// Force reload configuration (useful for testing)
pub fn reload_config() -> Result<ResolvedConfig> {
    load_config()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::TempDir;

    #[test]
    fn test_config_file_parsing() {
        let temp = TempDir::new().unwrap();
        let folio_dir = temp.path().join(".folio");
        std::fs::create_dir_all(&folio_dir).unwrap();

        let config_path = folio_dir.join("config.yaml");
        let mut file = std::fs::File::create(&config_path).unwrap();
        writeln!(
            file,
            r#"
version: "1"
content_root: site/content
kinds:
  - name: articles
    difficulty_tiers: true
    categories: [advanced, beginner]
  - name: case-studies
    dir: cases
    categories:
      - enterprise
"#
        )
        .unwrap();

        let config = load_config_file(&config_path).unwrap();
        assert_eq!(config.version, "1");
        assert_eq!(config.content_root, Some("site/content".to_string()));

        let kinds: Vec<ContentKind> = config
            .kinds
            .unwrap()
            .into_iter()
            .map(ContentKind::from)
            .collect();
        assert_eq!(kinds.len(), 2);
        assert!(kinds[0].difficulty_tiers);
        assert_eq!(kinds[0].dir, "articles");
        assert_eq!(kinds[0].categories[1].label, "Beginner");
        assert_eq!(kinds[1].dir, "cases");
        assert!(!kinds[1].difficulty_tiers);
    }

    #[test]
    fn test_project_config_discovered_from_subdirectory() {
        let temp = TempDir::new().unwrap();
        let folio_dir = temp.path().join(".folio");
        std::fs::create_dir_all(&folio_dir).unwrap();
        std::fs::write(
            folio_dir.join("config.yaml"),
            "version: \"1\"\ncontent_root: /srv/site/content\n",
        )
        .unwrap();

        let nested = temp.path().join("a").join("b");
        std::fs::create_dir_all(&nested).unwrap();

        let found = find_project_config(&nested).unwrap();
        assert_eq!(found, folio_dir.join("config.yaml"));

        let config = load_config_file(&found).unwrap();
        assert_eq!(config.content_root.as_deref(), Some("/srv/site/content"));
        assert!(config.kinds.is_none());
    }

    #[test]
    fn test_config_base_dir() {
        assert_eq!(
            config_base_dir(Path::new("/home/user/site/.folio/config.yaml")),
            PathBuf::from("/home/user/site")
        );
        assert_eq!(
            config_base_dir(Path::new("/home/user/.config/folio/config.yaml")),
            PathBuf::from("/home/user/.config/folio")
        );
    }

    #[test]
    fn test_resolve_relative_path() {
        let base = PathBuf::from("/home/user/project");

        assert_eq!(
            resolve_path(&base, "./subdir"),
            PathBuf::from("/home/user/project/subdir")
        );
        assert_eq!(
            resolve_path(&base, "../sibling"),
            PathBuf::from("/home/user/project/../sibling")
        );
        assert_eq!(
            resolve_path(&base, "/absolute/path"),
            PathBuf::from("/absolute/path")
        );
    }

    #[test]
    fn test_defaults() {
        let config = ResolvedConfig::defaults(Path::new("/site"));
        assert_eq!(config.content_root, PathBuf::from("/site/content"));
        assert_eq!(config.kinds.len(), 3);
        assert!(config.config_file.is_none());
    }
}
