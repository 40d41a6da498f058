//! Domain types for folio.
//!
//! - ContentKind / Category: where content lives on disk
//! - ContentItem: the canonical record produced for each document
//! - ResolvedContent: a single item together with its markdown body

pub mod item;
pub mod kind;

// Re-export commonly used types
pub use item::{ContentItem, ResolvedContent};
pub use kind::{default_kinds, label_from_segment, Category, ContentKind};
