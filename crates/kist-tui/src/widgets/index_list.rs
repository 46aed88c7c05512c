//! Index list widget — the selectable list of indices in the left pane.
//!
//! # Navigation
//! - `↑`/`k` and `↓`/`j` move the cursor up and down the list.
//! - `Enter` or `Space` makes the index under the cursor the search target.
//!
//! The first row is always "All indices" (an empty raw name); the discovered
//! catalog follows in listing order. Selecting does not search by itself.

use crate::event::{AppEvent, Direction};
use crate::theme::Theme;
use kist_core::Session;
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, List, ListItem, ListState, StatefulWidget, Widget},
};

/// Label of the synthetic first row.
pub const ALL_INDICES_LABEL: &str = "All indices";

// ---------------------------------------------------------------------------
// State
// ---------------------------------------------------------------------------

#[derive(Debug, Default)]
pub struct IndexListState {
    /// Row under the cursor; 0 is "All indices".
    pub cursor: usize,
}

impl IndexListState {
    /// Raw index name of the row at `row`, `""` for "All indices".
    fn raw_at<'a>(session: &'a Session, row: usize) -> Option<&'a str> {
        match row {
            0 => Some(""),
            n => session
                .catalog()
                .entries
                .get(n - 1)
                .map(|e| e.raw.as_str()),
        }
    }

    fn len(session: &Session) -> usize {
        session.catalog().len() + 1
    }

    /// Move the cursor onto the currently selected index (after discovery).
    pub fn sync(&mut self, session: &Session) {
        let selected = session.state().index.as_str();
        self.cursor = session
            .catalog()
            .entries
            .iter()
            .position(|e| e.raw == selected)
            .map_or(0, |i| i + 1);
    }

    /// Handle an [`AppEvent`], changing the session's index selection on
    /// `Enter` / `Space`.
    pub fn handle(&mut self, event: &AppEvent, session: &mut Session) {
        match event {
            AppEvent::Nav(Direction::Up) => {
                self.cursor = self.cursor.saturating_sub(1);
                tracing::debug!(cursor = self.cursor, "indices: cursor up");
            }
            AppEvent::Nav(Direction::Down) => {
                let max = Self::len(session).saturating_sub(1);
                if self.cursor < max {
                    self.cursor += 1;
                }
                tracing::debug!(cursor = self.cursor, "indices: cursor down");
            }
            AppEvent::Enter | AppEvent::ToggleField => {
                if let Some(raw) = Self::raw_at(session, self.cursor) {
                    let raw = raw.to_string();
                    session.select_index(raw);
                }
            }
            _ => {}
        }
    }
}

// ---------------------------------------------------------------------------
// Widget
// ---------------------------------------------------------------------------

pub struct IndexList<'a> {
    state: &'a IndexListState,
    session: &'a Session,
    focused: bool,
    theme: &'a Theme,
}

impl<'a> IndexList<'a> {
    pub fn new(
        state: &'a IndexListState,
        session: &'a Session,
        focused: bool,
        theme: &'a Theme,
    ) -> Self {
        Self {
            state,
            session,
            focused,
            theme,
        }
    }
}

impl Widget for IndexList<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let border_style = if self.focused {
            self.theme.border_focused
        } else {
            self.theme.border_unfocused
        };

        let block = Block::bordered()
            .title("Indices")
            .border_style(border_style);

        let inner = block.inner(area);
        block.render(area, buf);

        let selected = self.session.state().index.as_str();
        let marker = |raw: &str| if raw == selected { "● " } else { "  " };

        let mut items = vec![ListItem::new(Line::from(vec![
            Span::raw(marker("")),
            Span::styled(ALL_INDICES_LABEL, Style::default().add_modifier(Modifier::BOLD)),
        ]))];
        items.extend(self.session.catalog().entries.iter().map(|entry| {
            ListItem::new(Line::from(vec![
                Span::raw(marker(&entry.raw)),
                Span::styled(entry.display.clone(), self.theme.index_style(&entry.raw)),
            ]))
        }));

        let list =
            List::new(items).highlight_style(Style::default().add_modifier(Modifier::REVERSED));

        let cursor = self.focused.then_some(self.state.cursor);
        let mut list_state = ListState::default().with_selected(cursor);
        StatefulWidget::render(list, inner, buf, &mut list_state);
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
