//! Index discovery — turns the engine's tabular index listing into an
//! [`IndexCatalog`].
//!
//! The listing (`GET /_cat/indices?v`) is whitespace-aligned text with a
//! header row:
//!
//! ```text
//! health status index      uuid   pri rep docs.count ...
//! green  open   books-2020 aBc123 1   0   1200       ...
//! ```
//!
//! The third column is the index name. System indices (reserved prefix) and
//! names containing the excluded keyword are dropped.

use std::sync::LazyLock;

use regex::Regex;

use crate::error::ClientError;
use crate::types::{IndexCatalog, IndexEntry};

/// Column holding the index name in each listing row.
const NAME_COLUMN: usize = 2;

/// Column separator. A row that starts with whitespace (a closed index has a
/// blank health cell) yields an empty first column rather than shifting the
/// rest left.
static COLUMN_SEP: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+").expect("column separator regex"));

/// Which listed names are hidden from the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogRules {
    /// Names starting with this are engine-internal (e.g. `.kibana`).
    pub system_prefix: String,
    /// Names containing this substring are skipped (e.g. `*-alerts`).
    pub excluded_keyword: String,
}

impl Default for CatalogRules {
    fn default() -> Self {
        Self {
            system_prefix: ".".to_string(),
            excluded_keyword: "alerts".to_string(),
        }
    }
}

impl CatalogRules {
    pub fn admits(&self, name: &str) -> bool {
        let system = !self.system_prefix.is_empty() && name.starts_with(&self.system_prefix);
        let excluded =
            !self.excluded_keyword.is_empty() && name.contains(&self.excluded_keyword);
        !system && !excluded
    }
}

/// Parse a `_cat/indices?v` body.
///
/// Blank rows are skipped. A non-blank row without a name column makes the
/// whole listing unreadable and yields [`ClientError::Discovery`].
pub fn parse_listing(body: &str, rules: &CatalogRules) -> Result<IndexCatalog, ClientError> {
    let mut entries = Vec::new();

    for (lineno, row) in body.lines().enumerate().skip(1) {
        if row.trim().is_empty() {
            continue;
        }
        let name = COLUMN_SEP.split(row).nth(NAME_COLUMN).ok_or_else(|| {
            ClientError::Discovery(format!(
                "listing row {} has no index column: {:?}",
                lineno + 1,
                row
            ))
        })?;
        if rules.admits(name) {
            entries.push(IndexEntry {
                raw: name.to_string(),
                display: display_name(name),
            });
        }
    }

    tracing::debug!(count = entries.len(), "catalog: parsed index listing");
    Ok(IndexCatalog { entries })
}

/// Human-readable label for a raw index name: hyphens become spaces and each
/// word is title-cased (`books-2020` → `Books 2020`).
pub fn display_name(raw: &str) -> String {
    raw.replace('-', " ")
        .split(' ')
        .map(title_case)
        .collect::<Vec<_>>()
        .join(" ")
}

fn title_case(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first
            .to_uppercase()
            .chain(chars.flat_map(char::to_lowercase))
            .collect(),
        None => String::new(),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn listing(names: &[&str]) -> String {
        let mut out = String::from(
            "health status index uuid pri rep docs.count docs.deleted store.size pri.store.size\n",
        );
        for (i, name) in names.iter().enumerate() {
            out.push_str(&format!("green open {name} uuid{i} 1 0 {i} 0 1kb 1kb\n"));
        }
        out
    }

    #[test]
    fn filters_system_and_alert_indices() {
        let body = listing(&[".kibana", "books-2020", "articles-alerts", "journals"]);
        let cat = parse_listing(&body, &CatalogRules::default()).unwrap();
        let raw: Vec<_> = cat.entries.iter().map(|e| e.raw.as_str()).collect();
        let shown: Vec<_> = cat.entries.iter().map(|e| e.display.as_str()).collect();
        assert_eq!(raw, vec!["books-2020", "journals"]);
        assert_eq!(shown, vec!["Books 2020", "Journals"]);
    }

    #[test]
    fn header_only_yields_empty_catalog() {
        let cat = parse_listing(&listing(&[]), &CatalogRules::default()).unwrap();
        assert!(cat.is_empty());
    }

    #[test]
    fn blank_rows_are_skipped() {
        let body = format!("{}\n   \n\n", listing(&["journals"]));
        let cat = parse_listing(&body, &CatalogRules::default()).unwrap();
        assert_eq!(cat.len(), 1);
    }

    #[test]
    fn short_row_is_a_discovery_failure() {
        let body = "health status index\ngreen open\n";
        let err = parse_listing(body, &CatalogRules::default()).unwrap_err();
        assert!(matches!(err, ClientError::Discovery(_)));
    }

    #[test]
    fn blank_health_cell_keeps_columns_aligned() {
        let body = concat!(
            "health status index     uuid   pri rep\n",
            "green  open   journals  XyZ123 1   0\n",
            "       close  books-old AbCdEf 1   0\n",
        );
        let cat = parse_listing(body, &CatalogRules::default()).unwrap();
        let raw: Vec<_> = cat.entries.iter().map(|e| e.raw.as_str()).collect();
        assert_eq!(raw, vec!["journals", "books-old"]);
    }

    #[test]
    fn blank_health_row_first_becomes_default_selection() {
        let body = "health status index uuid pri rep\n       close  books-old  AbCdEf 1 0\n";
        let cat = parse_listing(body, &CatalogRules::default()).unwrap();
        assert_eq!(cat.first().map(|e| e.raw.as_str()), Some("books-old"));
    }

    #[test]
    fn display_name_title_cases_each_word() {
        assert_eq!(display_name("ULUSAL-tez-merkezi"), "Ulusal Tez Merkezi");
        assert_eq!(display_name("journals"), "Journals");
        assert_eq!(display_name("a--b"), "A  B");
    }

    #[test]
    fn empty_rules_admit_everything() {
        let rules = CatalogRules {
            system_prefix: String::new(),
            excluded_keyword: String::new(),
        };
        assert!(rules.admits(".kibana"));
        assert!(rules.admits("security-alerts"));
    }
}
