//! Core types for kist-core.
//!
//! This module defines the data structures shared across all layers: the
//! user-editable [`SearchState`], the [`IndexCatalog`] discovered from the
//! engine, and the [`ResultSet`] of [`Document`]s returned by a search.

use std::fmt;
use std::str::FromStr;

/// Field names the query builder targets. Both come from `[engine]` config.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldNames {
    /// Full-text field every term is fuzzy-matched against.
    pub title: String,
    /// Integer publication-year field used for range filters and tie-breaks.
    pub year: String,
}

/// Secondary sort direction applied to the year field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum SortOrder {
    Asc,
    #[default]
    Desc,
}

impl SortOrder {
    /// The opposite direction.
    pub fn flipped(self) -> Self {
        match self {
            SortOrder::Asc => SortOrder::Desc,
            SortOrder::Desc => SortOrder::Asc,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            SortOrder::Asc => "asc",
            SortOrder::Desc => "desc",
        }
    }
}

impl fmt::Display for SortOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SortOrder {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "asc" | "ascending" => Ok(SortOrder::Asc),
            "desc" | "descending" => Ok(SortOrder::Desc),
            other => Err(format!("unknown sort order: {other} (expected asc or desc)")),
        }
    }
}

/// Everything the user can edit that feeds the query builder.
///
/// Created once with defaults and mutated only by input handlers. `page_size`
/// grows in steps of the configured page step and is reset by an explicit
/// search.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchState {
    /// Free text as typed; split into terms at build time.
    pub query: String,
    /// Raw index name; empty means "all indices".
    pub index: String,
    pub page_size: usize,
    pub min_year: Option<i32>,
    pub max_year: Option<i32>,
    pub order: SortOrder,
}

impl SearchState {
    pub fn new(page_step: usize) -> Self {
        Self {
            query: String::new(),
            index: String::new(),
            page_size: page_step,
            min_year: None,
            max_year: None,
            order: SortOrder::Desc,
        }
    }

    /// The selected index, or `None` when searching everything.
    pub fn selected_index(&self) -> Option<&str> {
        if self.index.is_empty() {
            None
        } else {
            Some(self.index.as_str())
        }
    }
}

/// One selectable collection on the engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexEntry {
    /// Name as the engine knows it, e.g. `books-2020`.
    pub raw: String,
    /// Human-readable label, e.g. `Books 2020`.
    pub display: String,
}

/// Ordered list of user-visible indices, fetched once at startup.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IndexCatalog {
    pub entries: Vec<IndexEntry>,
}

impl IndexCatalog {
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn first(&self) -> Option<&IndexEntry> {
        self.entries.first()
    }

    pub fn contains(&self, raw: &str) -> bool {
        self.entries.iter().any(|e| e.raw == raw)
    }

    /// Display label for a raw name, falling back to the raw name itself.
    pub fn display_for<'a>(&'a self, raw: &'a str) -> &'a str {
        self.entries
            .iter()
            .find(|e| e.raw == raw)
            .map(|e| e.display.as_str())
            .unwrap_or(raw)
    }
}

/// A single search hit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    /// Engine-assigned `_id`.
    pub id: String,
    /// `_source` fields in engine order, every value rendered as a string.
    pub fields: Vec<(String, String)>,
    /// `_source` exactly as the engine sent it.
    pub source: serde_json::Map<String, serde_json::Value>,
}

impl Document {
    pub fn field(&self, key: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }
}

/// The page of hits from the most recent successful search.
///
/// Replaced wholesale on every search, never merged.
#[derive(Debug, Clone, PartialEq)]
pub struct ResultSet {
    /// Total matching documents as reported by the engine.
    pub total: u64,
    pub hits: Vec<Document>,
    /// When the response was applied (UTC).
    pub fetched_at: chrono::DateTime<chrono::Utc>,
}

impl ResultSet {
    pub fn is_empty(&self) -> bool {
        self.hits.is_empty()
    }
}
