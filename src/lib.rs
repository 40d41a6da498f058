//! folio - Markdown content resolution for the company website
//!
//! Resolves slugs to markdown documents and assembles normalized catalogs
//! for the articles, tutorials and case-study pages.
//!
//! # Architecture
//!
//! Everything is derived from the filesystem per request:
//! - Documents carry an optional `---` metadata block
//! - Field spellings are normalized onto one canonical schema
//! - Categories come from directories, never from file content
//!
//! # Modules
//!
//! - `library`: Parsing, normalization, slug matching, catalogs
//! - `domain`: Data structures (ContentItem, ContentKind, Category)
//! - `config`: Content root and kind configuration
//! - `cli`: Command-line interface
//!
//! # Usage
//!
//! ```bash
//! # List all articles, newest first
//! folio list --kind articles
//!
//! # Show one document
//! folio show agent-evals --kind articles --json
//! ```

pub mod cli;
pub mod config;
pub mod domain;
pub mod library;

// Re-export main types at crate root for convenience
pub use domain::{Category, ContentItem, ContentKind, ResolvedContent};
pub use library::{Catalog, CatalogWarning, ResolveError, Resolver};
