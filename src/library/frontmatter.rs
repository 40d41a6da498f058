//! Metadata block extraction from markdown documents.
//!
//! A document may open with a block of `key: value` lines fenced by two
//! lines consisting solely of `---`:
//!
//! ```markdown
//! ---
//! Title: Scaling Retrieval Pipelines
//! author: Dana Reyes
//! keywords: rag, retrieval, evaluation
//! ---
//!
//! # Body starts here
//! ```
//!
//! The block is read line by line rather than as full YAML: source files in
//! the wild carry duplicate keys and loose quoting that a strict YAML parser
//! rejects. Anything that does not look like a field is skipped.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Marker line that opens and closes a metadata block
pub const BLOCK_MARKER: &str = "---";

/// A raw field value as written in the source
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    /// Scalar value (`key: value`)
    Text(String),

    /// List value (`key: [a, b]` or `key:` followed by `- item` lines)
    List(Vec<String>),
}

impl FieldValue {
    /// Whether the value carries nothing (empty string or empty list)
    pub fn is_empty(&self) -> bool {
        match self {
            FieldValue::Text(s) => s.trim().is_empty(),
            FieldValue::List(items) => items.iter().all(|i| i.trim().is_empty()),
        }
    }

    /// Scalar view of the value; lists are joined with ", "
    pub fn to_text(&self) -> String {
        match self {
            FieldValue::Text(s) => s.clone(),
            FieldValue::List(items) => items.join(", "),
        }
    }
}

impl From<&str> for FieldValue {
    fn from(s: &str) -> Self {
        FieldValue::Text(s.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(s: String) -> Self {
        FieldValue::Text(s)
    }
}

impl From<Vec<String>> for FieldValue {
    fn from(items: Vec<String>) -> Self {
        FieldValue::List(items)
    }
}

/// Fields in the order they first appeared in the block
pub type RawFields = IndexMap<String, FieldValue>;

/// Result of splitting a document into its metadata block and body
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frontmatter {
    /// Raw fields; empty when the document has no block
    pub fields: RawFields,

    /// Everything after the closing marker (or the whole text)
    pub body: String,

    /// Whether a complete block (both markers) was found
    pub has_block: bool,
}

impl Frontmatter {
    fn without_block(text: &str) -> Self {
        Self {
            fields: RawFields::new(),
            body: text.to_string(),
            has_block: false,
        }
    }
}

/// Split a document into its metadata block and body.
///
/// Never fails: a missing opening marker or an unterminated block yields an
/// empty field map with the full text as body.
pub fn parse_frontmatter(text: &str) -> Frontmatter {
    let source = text.strip_prefix('\u{feff}').unwrap_or(text);
    let mut lines = source.split_inclusive('\n');

    let mut offset = match lines.next() {
        Some(first) if is_marker(first) => first.len(),
        _ => return Frontmatter::without_block(text),
    };
    let mut block: Vec<&str> = Vec::new();
    let mut closed_at = None;

    for line in lines {
        offset += line.len();
        if is_marker(line) {
            closed_at = Some(offset);
            break;
        }
        block.push(line);
    }

    let Some(body_start) = closed_at else {
        tracing::debug!("Metadata block opened but never closed; treating document as body");
        return Frontmatter::without_block(text);
    };

    Frontmatter {
        fields: parse_block(&block),
        body: source[body_start..].to_string(),
        has_block: true,
    }
}

/// Whether a line is exactly the block marker (ignoring the line break and
/// trailing whitespace)
fn is_marker(line: &str) -> bool {
    line.trim_end() == BLOCK_MARKER
}

/// Parse the lines between the markers into fields
fn parse_block(lines: &[&str]) -> RawFields {
    let mut fields = RawFields::new();
    // Key whose value was left empty; following `- item` lines belong to it
    let mut open_list: Option<String> = None;

    for line in lines {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }

        if let Some(key) = &open_list {
            if let Some(item) = trimmed.strip_prefix('-') {
                let item = unquote(item.trim());
                match fields.get_mut(key) {
                    Some(FieldValue::List(items)) => items.push(item),
                    Some(slot) => *slot = FieldValue::List(vec![item]),
                    None => {
                        fields.insert(key.clone(), FieldValue::List(vec![item]));
                    }
                }
                continue;
            }
        }
        open_list = None;

        let Some((key, value)) = trimmed.split_once(':') else {
            continue;
        };
        let key = key.trim();
        if key.is_empty() {
            continue;
        }
        let value = value.trim();

        let parsed = if value.is_empty() {
            open_list = Some(key.to_string());
            FieldValue::Text(String::new())
        } else if let Some(inner) = value.strip_prefix('[').and_then(|v| v.strip_suffix(']')) {
            FieldValue::List(
                inner
                    .split(',')
                    .map(|item| unquote(item.trim()))
                    .filter(|item| !item.is_empty())
                    .collect(),
            )
        } else {
            FieldValue::Text(unquote(value))
        };

        // Last occurrence of a key wins; IndexMap keeps its first position
        fields.insert(key.to_string(), parsed);
    }

    fields
}

/// Strip one pair of matching surrounding quotes
fn unquote(value: &str) -> String {
    for quote in ['"', '\''] {
        if value.len() >= 2 && value.starts_with(quote) && value.ends_with(quote) {
            return value[1..value.len() - 1].to_string();
        }
    }
    value.to_string()
}
