//! Content library: markdown documents resolved into normalized records.
//!
//! # Content Layout
//!
//! ```text
//! content/
//! ├── articles/
//! │   ├── advanced/
//! │   │   └── 20250102-120000-agent-evals.md
//! │   ├── intermediate/
//! │   └── beginner/
//! ├── tutorials/
//! └── case-studies/
//! ```
//!
//! # Pipeline
//!
//! 1. **frontmatter**: split the `---` metadata block from the body
//! 2. **fields**: map field spellings onto the canonical schema
//! 3. **slug**: find the file for a requested slug (exact, substring, timestamp)
//! 4. **catalog**: walk all categories, sort newest first, pick the featured item
//! 5. **resolver**: the facade request boundaries call

pub mod catalog;
pub mod fields;
pub mod frontmatter;
pub mod resolver;
pub mod slug;

pub use catalog::{assemble, Catalog, CatalogWarning, WarningKind};
pub use fields::{normalize, normalize_default, CanonicalField, NormalizedFields, DEFAULT_ALIASES};
pub use frontmatter::{parse_frontmatter, FieldValue, Frontmatter, RawFields};
pub use resolver::{ResolveError, Resolver};
pub use slug::{derive_slug, find_match, CandidateDir, MatchTier, MatchedFile};
