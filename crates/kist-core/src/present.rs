//! Presentation adapter — collapsible long values and title shortening.
//!
//! Expansion state is keyed by `(document id, field key)` and lives only as
//! long as the result set it was created for; [`ExpansionState::clear`] is
//! called whenever a new result set replaces the old one.

use std::borrow::Cow;
use std::collections::HashSet;
use std::sync::LazyLock;

use regex::Regex;

/// Appended to a collapsed value.
pub const ELLIPSIS: &str = "...";

/// Default collapsed length, in characters.
pub const DEFAULT_MAX_LEN: usize = 300;

/// Everything up to and including the first `(<n> adet)` item-count marker.
/// Only ASCII digits count.
static COUNT_MARKER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(.*?)(\([0-9]+ adet\))").expect("count marker regex"));

/// A field value that may be shown collapsed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Collapsible<'a> {
    full: &'a str,
    /// Byte offset where the collapsed view ends, if the value is too long.
    cut: Option<usize>,
}

impl<'a> Collapsible<'a> {
    /// Lengths are counted in characters, not bytes.
    pub fn new(full: &'a str, max_len: usize) -> Self {
        let cut = full.char_indices().nth(max_len).map(|(i, _)| i);
        Self { full, cut }
    }

    /// True when the value exceeds the limit and needs a toggle control.
    pub fn is_long(&self) -> bool {
        self.cut.is_some()
    }

    pub fn full(&self) -> &'a str {
        self.full
    }

    /// Text to show given the toggle state.
    pub fn display(&self, expanded: bool) -> Cow<'a, str> {
        match self.cut {
            Some(cut) if !expanded => Cow::Owned(format!("{}{}", &self.full[..cut], ELLIPSIS)),
            _ => Cow::Borrowed(self.full),
        }
    }

    /// Toggle control label, or `None` for short values.
    pub fn toggle_label(&self, expanded: bool) -> Option<&'static str> {
        match (self.is_long(), expanded) {
            (false, _) => None,
            (true, false) => Some("[more]"),
            (true, true) => Some("[less]"),
        }
    }
}

/// Shorten a title to its item-count marker, e.g.
/// `"Journal of X (12 adet) vol. 1-12"` → `"Journal of X (12 adet)"`.
/// Titles without a marker are returned unchanged.
pub fn shorten_title(title: &str) -> &str {
    COUNT_MARKER
        .find(title)
        .map(|m| m.as_str())
        .unwrap_or(title)
}

/// Which long values the user has expanded in the current result set.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExpansionState {
    expanded: HashSet<(String, String)>,
}

impl ExpansionState {
    pub fn is_expanded(&self, doc_id: &str, field: &str) -> bool {
        self.expanded
            .contains(&(doc_id.to_string(), field.to_string()))
    }

    /// Flip one field; returns the new state.
    pub fn toggle(&mut self, doc_id: &str, field: &str) -> bool {
        let key = (doc_id.to_string(), field.to_string());
        if self.expanded.remove(&key) {
            false
        } else {
            self.expanded.insert(key);
            true
        }
    }

    pub fn clear(&mut self) {
        self.expanded.clear();
    }

    pub fn len(&self) -> usize {
        self.expanded.len()
    }

    pub fn is_empty(&self) -> bool {
        self.expanded.is_empty()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
