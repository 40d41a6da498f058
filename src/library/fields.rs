//! Field normalization: many spellings in, one canonical schema out.
//!
//! Source files name the same field in different ways (`Title`, `title`,
//! `Difficulty Level`, `difficulty`, `readTime`, ...). [`normalize`] maps
//! every raw key through an alias table onto a [`CanonicalField`], keeps the
//! first non-empty value per slot, and applies defaults for fields that are
//! genuinely absent.

use std::hash::Hash;

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use super::frontmatter::{FieldValue, RawFields};

pub const DEFAULT_TITLE: &str = "Untitled Article";
pub const DEFAULT_AUTHOR: &str = "Unknown Author";
pub const NOT_SPECIFIED: &str = "Not specified";

/// Long-form rendering used for parsed dates ("January 5, 2025")
pub const DISPLAY_DATE_FORMAT: &str = "%B %-d, %Y";

/// The fixed output schema
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum CanonicalField {
    Title,
    Author,
    Description,
    Abstract,
    Keywords,
    Date,
    DifficultyLevel,
    EstimatedTime,
    Journal,
    Doi,
}

impl CanonicalField {
    /// Outward-facing key for this field
    pub fn key(&self) -> &'static str {
        match self {
            CanonicalField::Title => "title",
            CanonicalField::Author => "author",
            CanonicalField::Description => "description",
            CanonicalField::Abstract => "abstract",
            CanonicalField::Keywords => "keywords",
            CanonicalField::Date => "date",
            CanonicalField::DifficultyLevel => "difficultyLevel",
            CanonicalField::EstimatedTime => "estimatedTime",
            CanonicalField::Journal => "journal",
            CanonicalField::Doi => "doi",
        }
    }
}

impl std::fmt::Display for CanonicalField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.key())
    }
}

/// Alias table, matched case-insensitively against the trimmed raw key.
///
/// Aliases are lower-case; canonical keys are listed too so `TITLE` and
/// `difficultyLevel` resolve like their aliases do.
pub const DEFAULT_ALIASES: &[(&str, CanonicalField)] = &[
    ("title", CanonicalField::Title),
    ("name", CanonicalField::Title),
    ("author", CanonicalField::Author),
    ("authors", CanonicalField::Author),
    ("by", CanonicalField::Author),
    ("description", CanonicalField::Description),
    ("summary", CanonicalField::Description),
    ("excerpt", CanonicalField::Description),
    ("abstract", CanonicalField::Abstract),
    ("keywords", CanonicalField::Keywords),
    ("keyword", CanonicalField::Keywords),
    ("tags", CanonicalField::Keywords),
    ("date", CanonicalField::Date),
    ("published", CanonicalField::Date),
    ("publishdate", CanonicalField::Date),
    ("publish date", CanonicalField::Date),
    ("publication date", CanonicalField::Date),
    ("difficultylevel", CanonicalField::DifficultyLevel),
    ("difficulty level", CanonicalField::DifficultyLevel),
    ("difficulty_level", CanonicalField::DifficultyLevel),
    ("difficulty", CanonicalField::DifficultyLevel),
    ("level", CanonicalField::DifficultyLevel),
    ("estimatedtime", CanonicalField::EstimatedTime),
    ("estimated time", CanonicalField::EstimatedTime),
    ("estimated_time", CanonicalField::EstimatedTime),
    ("readtime", CanonicalField::EstimatedTime),
    ("read time", CanonicalField::EstimatedTime),
    ("reading time", CanonicalField::EstimatedTime),
    ("readingtime", CanonicalField::EstimatedTime),
    ("journal", CanonicalField::Journal),
    ("doi", CanonicalField::Doi),
];

/// Where a raw key lands after alias resolution
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum FieldKey {
    Canonical(CanonicalField),
    /// Unrecognized key, lower-cased
    Extra(String),
}

/// Resolve a raw key against an alias table
pub fn resolve_key(raw_key: &str, aliases: &[(&str, CanonicalField)]) -> FieldKey {
    let folded = raw_key.trim().to_lowercase();
    aliases
        .iter()
        .find(|(alias, _)| *alias == folded)
        .map(|(_, field)| FieldKey::Canonical(*field))
        .unwrap_or(FieldKey::Extra(folded))
}

/// Metadata restricted to canonical keys, with defaults applied
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NormalizedFields {
    pub title: String,
    pub author: String,
    pub description: String,
    #[serde(rename = "abstract")]
    pub abstract_text: String,
    pub keywords: Vec<String>,

    /// Long-form date, or the raw value when it does not parse
    pub date: String,

    /// Source value of the date field, untouched
    pub raw_date: String,

    pub difficulty_level: String,
    pub estimated_time: String,
    pub journal: Option<String>,
    pub doi: Option<String>,

    /// Unrecognized keys (lower-cased) in first-seen order
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub extra: IndexMap<String, FieldValue>,
}

impl Default for NormalizedFields {
    fn default() -> Self {
        normalize(&RawFields::new(), DEFAULT_ALIASES)
    }
}

impl NormalizedFields {
    /// Express the record as raw fields under canonical keys.
    ///
    /// Feeding the result back through [`normalize`] yields `self` again.
    pub fn to_raw(&self) -> RawFields {
        let mut raw = RawFields::new();
        raw.insert("title".into(), self.title.clone().into());
        raw.insert("author".into(), self.author.clone().into());
        raw.insert("description".into(), self.description.clone().into());
        raw.insert("abstract".into(), self.abstract_text.clone().into());
        raw.insert("keywords".into(), FieldValue::List(self.keywords.clone()));
        if !self.raw_date.is_empty() {
            raw.insert("date".into(), self.raw_date.clone().into());
        }
        raw.insert("difficultyLevel".into(), self.difficulty_level.clone().into());
        raw.insert("estimatedTime".into(), self.estimated_time.clone().into());
        if let Some(journal) = &self.journal {
            raw.insert("journal".into(), journal.clone().into());
        }
        if let Some(doi) = &self.doi {
            raw.insert("doi".into(), doi.clone().into());
        }
        for (key, value) in &self.extra {
            raw.insert(key.clone(), value.clone());
        }
        raw
    }
}

/// Store a value unless the slot already holds something non-empty
fn fill<K: Hash + Eq>(slots: &mut IndexMap<K, FieldValue>, key: K, value: &FieldValue) {
    match slots.get_mut(&key) {
        Some(existing) if !existing.is_empty() => {}
        Some(existing) => {
            if !value.is_empty() {
                *existing = value.clone();
            }
        }
        None => {
            slots.insert(key, value.clone());
        }
    }
}

/// Normalize raw fields against an alias table.
///
/// Collisions resolve first-non-empty-wins in the raw map's iteration order:
/// `Title: Foo` followed by `title: Bar` yields `title = "Foo"`.
pub fn normalize(raw: &RawFields, aliases: &[(&str, CanonicalField)]) -> NormalizedFields {
    let mut slots: IndexMap<CanonicalField, FieldValue> = IndexMap::new();
    let mut extra: IndexMap<String, FieldValue> = IndexMap::new();

    for (key, value) in raw {
        match resolve_key(key, aliases) {
            FieldKey::Canonical(field) => fill(&mut slots, field, value),
            FieldKey::Extra(name) => fill(&mut extra, name, value),
        }
    }

    let text = |field: CanonicalField| slots.get(&field).map(FieldValue::to_text);
    let optional = |field: CanonicalField| text(field).filter(|v| !v.trim().is_empty());

    let description = text(CanonicalField::Description).unwrap_or_default();
    let raw_date = text(CanonicalField::Date).unwrap_or_default();

    NormalizedFields {
        title: text(CanonicalField::Title).unwrap_or_else(|| DEFAULT_TITLE.to_string()),
        author: text(CanonicalField::Author).unwrap_or_else(|| DEFAULT_AUTHOR.to_string()),
        abstract_text: text(CanonicalField::Abstract).unwrap_or_else(|| description.clone()),
        description,
        keywords: normalize_keywords(slots.get(&CanonicalField::Keywords)),
        date: display_date(&raw_date),
        raw_date,
        difficulty_level: text(CanonicalField::DifficultyLevel)
            .unwrap_or_else(|| NOT_SPECIFIED.to_string()),
        estimated_time: text(CanonicalField::EstimatedTime)
            .unwrap_or_else(|| NOT_SPECIFIED.to_string()),
        journal: optional(CanonicalField::Journal),
        doi: optional(CanonicalField::Doi),
        extra,
    }
}

/// Normalize with [`DEFAULT_ALIASES`]
pub fn normalize_default(raw: &RawFields) -> NormalizedFields {
    normalize(raw, DEFAULT_ALIASES)
}

/// Keywords are always a list.
///
/// List elements are kept as written apart from trimming and dropping empty
/// entries; a string is split on commas first.
pub fn normalize_keywords(value: Option<&FieldValue>) -> Vec<String> {
    let items: Vec<String> = match value {
        Some(FieldValue::List(items)) => items.clone(),
        Some(FieldValue::Text(s)) => s.split(',').map(str::to_string).collect(),
        None => Vec::new(),
    };

    items
        .into_iter()
        .map(|k| k.trim().to_string())
        .filter(|k| !k.is_empty())
        .collect()
}

/// Best-effort calendar date parse; `None` when nothing matches
pub fn parse_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.date_naive());
    }

    for format in ["%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M:%S", "%Y-%m-%d %H:%M"] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(raw, format) {
            return Some(dt.date());
        }
    }

    ["%Y-%m-%d", "%Y/%m/%d", "%B %d, %Y", "%b %d, %Y", "%d %B %Y"]
        .iter()
        .find_map(|format| NaiveDate::parse_from_str(raw, format).ok())
}

/// Long-form date for display, falling back to the raw string verbatim
pub fn display_date(raw: &str) -> String {
    match parse_date(raw) {
        Some(date) => date.format(DISPLAY_DATE_FORMAT).to_string(),
        None => raw.to_string(),
    }
}
