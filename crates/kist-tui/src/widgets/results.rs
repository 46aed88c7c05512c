//! Results widget — the scrollable hit list on the right.
//!
//! # Navigation (when pane is focused)
//!
//! | Key | Action |
//! |-----|--------|
//! | `↑` / `k` | Move cursor up one row |
//! | `↓` / `j` | Move cursor down one row |
//! | `PageUp` / `Ctrl+u` | Move up one screen |
//! | `PageDown` / `Ctrl+d` | Move down one screen |
//! | `Space` | Expand / collapse the long value under the cursor |
//! | `Enter` | Same as `Space`; on the last row, load more |
//!
//! # Layout
//!
//! The pane is a flat list of [`Row`]s: a heading, then for every document its
//! shortened title followed by one `key: value` row per `_source` field, and
//! finally a load-more row while the engine reports more matches. A row can
//! wrap onto several terminal lines. `offset` is the first row drawn; render
//! adjusts it so the cursor row is always on screen.

use std::cell::Cell;

use crate::event::{AppEvent, Direction};
use crate::theme::Theme;
use crate::widgets::index_list::ALL_INDICES_LABEL;
use kist_core::{
    present::{shorten_title, Collapsible},
    Session, Ticket,
};
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{
        Block, Paragraph, Scrollbar, ScrollbarOrientation, ScrollbarState, StatefulWidget, Widget,
    },
};

const NO_RESULTS: &str = "No results found";

/// One logical row of the results pane.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Row {
    /// `<index> - results (<total>)`
    Heading,
    /// Shown instead of documents when the result set is empty.
    Empty,
    /// Shortened title of the document at this position.
    Title(usize),
    /// `(document, field)` positions.
    Field(usize, usize),
    /// Blank line between documents.
    Spacer,
    LoadMore,
}

/// Flatten the session's current results into rows.
pub fn rows(session: &Session) -> Vec<Row> {
    let Some(results) = session.results() else {
        return Vec::new();
    };

    let mut out = vec![Row::Heading];
    if results.is_empty() {
        out.push(Row::Empty);
        return out;
    }
    for (d, doc) in results.hits.iter().enumerate() {
        out.push(Row::Spacer);
        out.push(Row::Title(d));
        out.extend((0..doc.fields.len()).map(|f| Row::Field(d, f)));
    }
    if session.has_more() {
        out.push(Row::Spacer);
        out.push(Row::LoadMore);
    }
    out
}

/// Heading text: the selected index (or "All indices") and the engine total.
pub fn heading(session: &Session) -> String {
    let index = session.state().index.as_str();
    let label = if index.is_empty() {
        ALL_INDICES_LABEL
    } else {
        session.catalog().display_for(index)
    };
    let total = session.results().map_or(0, |r| r.total);
    format!("{label} - results ({total})")
}

// ---------------------------------------------------------------------------
// State
// ---------------------------------------------------------------------------

#[derive(Debug)]
pub struct ResultsState {
    /// Index into [`rows`] of the highlighted row.
    pub cursor: usize,
    /// Characters shown before a value collapses.
    pub truncate_len: usize,
    /// First row drawn. Render keeps the cursor visible.
    offset: Cell<usize>,
    /// Cached from the last render so `handle()` can page by screenfuls.
    last_height: Cell<usize>,
}

impl ResultsState {
    pub fn new(truncate_len: usize) -> Self {
        Self {
            cursor: 0,
            truncate_len,
            offset: Cell::new(0),
            last_height: Cell::new(20),
        }
    }

    /// Back to the top, for a fresh result set.
    pub fn reset(&mut self) {
        self.cursor = 0;
        self.offset.set(0);
    }

    /// Keep the cursor inside a result set that may have shrunk.
    pub fn clamp(&mut self, session: &Session) {
        let max = rows(session).len().saturating_sub(1);
        if self.cursor > max {
            self.cursor = max;
        }
    }

    /// Handle a navigation or activation event. Returns the search to dispatch
    /// when the load-more row is activated.
    pub fn handle(&mut self, event: &AppEvent, session: &mut Session) -> Option<Ticket> {
        let rows = rows(session);
        if rows.is_empty() {
            return None;
        }
        let max = rows.len() - 1;
        let page = self.last_height.get().max(1);

        match event {
            AppEvent::Nav(Direction::Up) => {
                self.cursor = self.cursor.saturating_sub(1);
            }
            AppEvent::Nav(Direction::Down) => {
                self.cursor = (self.cursor + 1).min(max);
            }
            AppEvent::ScrollUp => {
                self.cursor = self.cursor.saturating_sub(page);
                tracing::debug!(cursor = self.cursor, "results: page up");
            }
            AppEvent::ScrollDown => {
                self.cursor = (self.cursor + page).min(max);
                tracing::debug!(cursor = self.cursor, "results: page down");
            }
            AppEvent::ToggleField | AppEvent::Enter => match rows.get(self.cursor) {
                Some(Row::Field(d, f)) => self.toggle(session, *d, *f),
                Some(Row::LoadMore) if matches!(event, AppEvent::Enter) => {
                    return Some(session.load_more());
                }
                _ => {}
            },
            _ => {}
        }
        None
    }

    fn toggle(&self, session: &mut Session, d: usize, f: usize) {
        let Some((id, key, long)) = session.results().and_then(|rs| {
            let doc = rs.hits.get(d)?;
            let (key, value) = doc.fields.get(f)?;
            let long = Collapsible::new(value, self.truncate_len).is_long();
            Some((doc.id.clone(), key.clone(), long))
        }) else {
            return;
        };
        if long {
            let expanded = session.toggle_field(&id, &key);
            tracing::debug!(doc = %id, field = %key, expanded, "results: toggled field");
        }
    }
}

// ---------------------------------------------------------------------------
// Widget
// ---------------------------------------------------------------------------

pub struct Results<'a> {
    state: &'a ResultsState,
    session: &'a Session,
    focused: bool,
    load_more_key: char,
    theme: &'a Theme,
}

impl<'a> Results<'a> {
    pub fn new(
        state: &'a ResultsState,
        session: &'a Session,
        focused: bool,
        load_more_key: char,
        theme: &'a Theme,
    ) -> Self {
        Self {
            state,
            session,
            focused,
            load_more_key,
            theme,
        }
    }

    /// Styled fragments of one row before wrapping.
    fn fragments(&self, row: Row) -> Vec<(String, Style)> {
        let theme = self.theme;
        let hits = self.session.results().map(|r| r.hits.as_slice()).unwrap_or(&[]);
        match row {
            Row::Heading => vec![(heading(self.session), theme.heading)],
            Row::Empty => vec![(NO_RESULTS.to_string(), theme.empty)],
            Row::Spacer => vec![(String::new(), Style::default())],
            Row::LoadMore => vec![(
                format!("── load more ({}) ──", self.load_more_key),
                theme.toggle,
            )],
            Row::Title(d) => {
                let Some(doc) = hits.get(d) else {
                    return Vec::new();
                };
                let title = doc
                    .field(&self.session.fields().title)
                    .unwrap_or(doc.id.as_str());
                vec![(shorten_title(title).to_string(), theme.doc_title)]
            }
            Row::Field(d, f) => {
                let Some(doc) = hits.get(d) else {
                    return Vec::new();
                };
                let Some((key, value)) = doc.fields.get(f) else {
                    return Vec::new();
                };
                let value = Collapsible::new(value, self.state.truncate_len);
                let expanded = self.session.is_expanded(&doc.id, key);
                let mut out = vec![
                    (format!("{key}: "), theme.field_key),
                    (value.display(expanded).into_owned(), theme.field_value),
                ];
                if let Some(label) = value.toggle_label(expanded) {
                    out.push((format!(" {label}"), theme.toggle));
                }
                out
            }
        }
    }
}

impl Widget for Results<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let border_style = if self.focused {
            self.theme.border_focused
        } else {
            self.theme.border_unfocused
        };

        let block = Block::bordered().title("Results").border_style(border_style);
        let inner = block.inner(area);
        block.render(area, buf);

        let height = inner.height as usize;
        self.state.last_height.set(height);

        // Text (fill) + 1-column scrollbar strip inside the borders
        let text_area = Rect { width: inner.width.saturating_sub(1), ..inner };
        let sb_area = Rect {
            x: inner.right().saturating_sub(1),
            width: 1,
            ..inner
        };
        let width = text_area.width as usize;

        let rows = rows(self.session);
        if rows.is_empty() {
            let msg = if self.session.in_flight() > 0 {
                "searching…"
            } else {
                NO_RESULTS
            };
            Paragraph::new(Line::from(Span::styled(msg, self.theme.empty))).render(text_area, buf);
            return;
        }

        let wrapped: Vec<Vec<Line<'static>>> = rows
            .iter()
            .map(|row| wrap(self.fragments(*row), width))
            .collect();

        let cursor = self.state.cursor.min(rows.len() - 1);
        let offset = visible_offset(
            self.state.offset.get(),
            cursor,
            &wrapped.iter().map(Vec::len).collect::<Vec<_>>(),
            height,
        );
        self.state.offset.set(offset);

        let mut lines: Vec<Line<'static>> = Vec::with_capacity(height);
        for (i, row_lines) in wrapped.iter().enumerate().skip(offset) {
            for line in row_lines {
                if lines.len() == height {
                    break;
                }
                let line = line.clone();
                lines.push(if self.focused && i == cursor {
                    line.patch_style(Style::default().add_modifier(Modifier::REVERSED))
                } else {
                    line
                });
            }
            if lines.len() == height {
                break;
            }
        }
        Paragraph::new(lines).render(text_area, buf);

        let mut sb_state = ScrollbarState::new(rows.len())
            .position(offset)
            .viewport_content_length(height);
        StatefulWidget::render(
            Scrollbar::new(ScrollbarOrientation::VerticalRight)
                .begin_symbol(None)
                .end_symbol(None),
            sb_area,
            buf,
            &mut sb_state,
        );
    }
}

// ---------------------------------------------------------------------------
// Layout helpers
// ---------------------------------------------------------------------------

/// Smallest change to `offset` that puts every line of the cursor row on
/// screen (or at least its first line, when the row is taller than the pane).
fn visible_offset(offset: usize, cursor: usize, heights: &[usize], height: usize) -> usize {
    if cursor < offset {
        return cursor;
    }
    let mut offset = offset;
    while offset < cursor && heights[offset..=cursor].iter().sum::<usize>() > height {
        offset += 1;
    }
    offset
}

/// Character-wrap styled fragments into lines of at most `width` cells.
fn wrap(fragments: Vec<(String, Style)>, width: usize) -> Vec<Line<'static>> {
    let width = width.max(1);
    let mut lines: Vec<Line<'static>> = Vec::new();
    let mut current: Vec<Span<'static>> = Vec::new();
    let mut used = 0usize;

    for (text, style) in fragments {
        let mut chunk = String::new();
        for c in text.chars() {
            if c == '\n' || used == width {
                if !chunk.is_empty() {
                    current.push(Span::styled(std::mem::take(&mut chunk), style));
                }
                lines.push(Line::from(std::mem::take(&mut current)));
                used = 0;
                if c == '\n' {
                    continue;
                }
            }
            chunk.push(c);
            used += 1;
        }
        if !chunk.is_empty() {
            current.push(Span::styled(chunk, style));
        }
    }
    lines.push(Line::from(current));
    lines
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use kist_core::{Document, FieldNames, IndexCatalog, IndexEntry, ResultSet};

    fn session_with(total: u64, docs: Vec<Document>) -> Session {
        let mut s = Session::new(
            FieldNames {
                title: "Başlık".into(),
                year: "Yayin Yili".into(),
            },
            10,
        );
        s.apply_catalog(Ok(IndexCatalog {
            entries: vec![IndexEntry {
                raw: "books-2020".into(),
                display: "Books 2020".into(),
            }],
        }));
        let t = s.refresh();
        s.apply_search(
            t.seq,
            Ok(ResultSet {
                total,
                hits: docs,
                fetched_at: chrono::Utc::now(),
            }),
        );
        s
    }

    fn doc(id: &str, fields: &[(&str, &str)]) -> Document {
        Document {
            id: id.into(),
            fields: fields
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
            source: Default::default(),
        }
    }

    fn text(line: &Line) -> String {
        line.spans.iter().map(|s| s.content.as_ref()).collect()
    }

    #[test]
    fn rows_layout_with_more_available() {
        let s = session_with(
            25,
            vec![doc("a", &[("Başlık", "A"), ("Yayin Yili", "1999")]), doc("b", &[("Başlık", "B")])],
        );
        assert_eq!(
            rows(&s),
            vec![
                Row::Heading,
                Row::Spacer,
                Row::Title(0),
                Row::Field(0, 0),
                Row::Field(0, 1),
                Row::Spacer,
                Row::Title(1),
                Row::Field(1, 0),
                Row::Spacer,
                Row::LoadMore,
            ]
        );
        assert_eq!(heading(&s), "Books 2020 - results (25)");
    }

    #[test]
    fn empty_result_set_shows_empty_row_and_no_load_more() {
        let s = session_with(0, vec![]);
        assert_eq!(rows(&s), vec![Row::Heading, Row::Empty]);
    }

    #[test]
    fn no_rows_before_first_search() {
        let s = Session::new(
            FieldNames {
                title: "t".into(),
                year: "y".into(),
            },
            10,
        );
        assert!(rows(&s).is_empty());
        assert_eq!(heading(&s), "All indices - results (0)");
    }

    #[test]
    fn space_toggles_only_long_values() {
        let long = "x".repeat(301);
        let mut s = session_with(1, vec![doc("a", &[("Başlık", "short"), ("Özet", &long)])]);
        let mut st = ResultsState::new(300);

        st.cursor = 3; // Field(0, 0): short
        st.handle(&AppEvent::ToggleField, &mut s);
        assert!(!s.is_expanded("a", "Başlık"));

        st.cursor = 4; // Field(0, 1): long
        st.handle(&AppEvent::ToggleField, &mut s);
        assert!(s.is_expanded("a", "Özet"));
        st.handle(&AppEvent::Enter, &mut s);
        assert!(!s.is_expanded("a", "Özet"));
    }

    #[test]
    fn enter_on_load_more_row_dispatches_bigger_page() {
        let mut s = session_with(25, vec![doc("a", &[("Başlık", "A")])]);
        let mut st = ResultsState::new(300);
        st.cursor = rows(&s).len() - 1;
        let ticket = st.handle(&AppEvent::Enter, &mut s).expect("load more");
        assert_eq!(ticket.request.size, 20);

        // Space on the same row does nothing
        assert!(st.handle(&AppEvent::ToggleField, &mut s).is_none());
    }

    #[test]
    fn cursor_is_clamped() {
        let mut s = session_with(1, vec![doc("a", &[("Başlık", "A")])]);
        let mut st = ResultsState::new(300);
        for _ in 0..10 {
            st.handle(&AppEvent::Nav(Direction::Down), &mut s);
        }
        assert_eq!(st.cursor, 3);
        st.cursor = 99;
        st.clamp(&s);
        assert_eq!(st.cursor, 3);
    }

    #[test]
    fn wrap_splits_on_width_and_keeps_styles() {
        let key = Style::default().add_modifier(Modifier::BOLD);
        let lines = wrap(
            vec![("ab: ".into(), key), ("cdefgh".into(), Style::default())],
            5,
        );
        let texts: Vec<String> = lines.iter().map(text).collect();
        assert_eq!(texts, vec!["ab: c", "defgh"]);
        assert_eq!(lines[0].spans[0].style, key);
    }

    #[test]
    fn wrap_empty_fragment_is_one_blank_line() {
        assert_eq!(wrap(vec![(String::new(), Style::default())], 10).len(), 1);
    }

    #[test]
    fn offset_follows_cursor() {
        let heights = [1, 3, 1, 1, 4];
        assert_eq!(visible_offset(0, 0, &heights, 5), 0);
        assert_eq!(visible_offset(0, 3, &heights, 5), 1);
        assert_eq!(visible_offset(3, 1, &heights, 5), 1);
        // a row taller than the pane pins to its own first line
        assert_eq!(visible_offset(0, 4, &heights, 3), 4);
    }
}
