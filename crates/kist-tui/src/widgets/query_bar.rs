//! Query bar widget — free-text input plus a summary of the active filters.
//!
//! # Editing
//!
//! - `Char(c)` inserts at the cursor.
//! - `Backspace` deletes the character before the cursor.
//! - `Nav(Left)` / `Nav(Right)` move the cursor.
//! - `Enter` runs the search from the first page.
//!
//! Every edit is copied into the session straight away, so `:search` and
//! sort changes always see what is on screen.

use crate::event::{AppEvent, Direction};
use crate::theme::Theme;
use kist_core::{Session, Ticket};
use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Direction as LayoutDir, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Paragraph, Widget},
};

// ---------------------------------------------------------------------------
// State
// ---------------------------------------------------------------------------

#[derive(Debug, Default)]
pub struct QueryBarState {
    /// The search text typed by the user.
    pub query: String,
    /// Byte offset of the cursor within `query`.
    pub cursor: usize,
}

impl QueryBarState {
    /// Handle a key event from the app shell.
    ///
    /// Returns the search to dispatch when the user presses `Enter`.
    pub fn handle(&mut self, event: &AppEvent, session: &mut Session) -> Option<Ticket> {
        match event {
            AppEvent::Char(c) => {
                self.query.insert(self.cursor, *c);
                self.cursor += c.len_utf8();
                session.set_query(self.query.as_str());
                tracing::debug!(query = %self.query, cursor = self.cursor, "query: char inserted");
            }
            AppEvent::Backspace => {
                if self.cursor > 0 {
                    // Walk back one char boundary
                    let prev = self.query[..self.cursor]
                        .char_indices()
                        .last()
                        .map(|(i, _)| i)
                        .unwrap_or(0);
                    self.query.remove(prev);
                    self.cursor = prev;
                    session.set_query(self.query.as_str());
                    tracing::debug!(query = %self.query, cursor = self.cursor, "query: backspace");
                }
            }
            AppEvent::Nav(Direction::Left) => {
                if self.cursor > 0 {
                    self.cursor = self.query[..self.cursor]
                        .char_indices()
                        .last()
                        .map(|(i, _)| i)
                        .unwrap_or(0);
                }
            }
            AppEvent::Nav(Direction::Right) => {
                if self.cursor < self.query.len() {
                    let next = self.query[self.cursor..]
                        .char_indices()
                        .nth(1)
                        .map(|(i, _)| self.cursor + i)
                        .unwrap_or(self.query.len());
                    self.cursor = next;
                }
            }
            AppEvent::Enter => {
                session.set_query(self.query.as_str());
                tracing::debug!(query = %self.query, "query: submitted");
                return Some(session.submit());
            }
            _ => {}
        }
        None
    }
}

// ---------------------------------------------------------------------------
// Widget
// ---------------------------------------------------------------------------

pub struct QueryBar<'a> {
    state: &'a QueryBarState,
    session: &'a Session,
    focused: bool,
    theme: &'a Theme,
}

impl<'a> QueryBar<'a> {
    pub fn new(
        state: &'a QueryBarState,
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

    /// Absolute terminal position of the text cursor within this widget's
    /// rendered area. Pass to `frame.set_cursor_position()` after rendering.
    pub fn cursor_position(&self, area: Rect) -> (u16, u16) {
        // The block adds 1-cell borders; text starts at (area.x+1, area.y+1).
        let col = self.state.query[..self.state.cursor].chars().count() as u16;
        let x = (area.x + 1 + col).min(area.right().saturating_sub(1));
        let y = area.y + 1;
        (x, y)
    }
}

/// One-line description of the filters that are not typed into the bar.
pub fn filter_summary(session: &Session) -> String {
    let state = session.state();
    let years = match (state.min_year, state.max_year) {
        (None, None) => "any year".to_string(),
        (Some(lo), None) => format!("{lo}–"),
        (None, Some(hi)) => format!("–{hi}"),
        (Some(lo), Some(hi)) => format!("{lo}–{hi}"),
    };
    format!("{years} · year {}", state.order)
}

impl Widget for QueryBar<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let border_style = if self.focused {
            self.theme.border_focused
        } else {
            self.theme.border_unfocused
        };

        let block = Block::bordered()
            .title("Search by title")
            .border_style(border_style);

        let inner = block.inner(area);
        block.render(area, buf);

        let summary = filter_summary(self.session);

        // Split inner area: query text (fill) | filter summary (fixed width)
        let chunks = Layout::default()
            .direction(LayoutDir::Horizontal)
            .constraints([
                Constraint::Fill(1),
                Constraint::Length(summary.chars().count() as u16 + 1),
            ])
            .split(inner);

        let query_line = if self.state.query.is_empty() && !self.focused {
            Line::from(Span::styled(
                "press / to search",
                Style::default().add_modifier(Modifier::DIM),
            ))
        } else {
            Line::from(self.state.query.as_str())
        };
        Paragraph::new(query_line).render(chunks[0], buf);

        Paragraph::new(Line::from(Span::styled(
            summary,
            Style::default().add_modifier(Modifier::DIM),
        )))
        .render(chunks[1], buf);
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
