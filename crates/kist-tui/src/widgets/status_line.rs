//! Status line — one row under the query bar.
//!
//! Priority: a search in flight, then the last error, then a summary of the
//! current result set with the local time it was fetched.

use crate::theme::Theme;
use kist_core::Session;
use ratatui::{buffer::Buffer, layout::Rect, text::{Line, Span}, widgets::Widget};

pub struct StatusLine<'a> {
    session: &'a Session,
    theme: &'a Theme,
}

impl<'a> StatusLine<'a> {
    pub fn new(session: &'a Session, theme: &'a Theme) -> Self {
        Self { session, theme }
    }
}

/// Text and style selector for the current session, split out for tests.
fn status_text(session: &Session) -> (StatusKind, String) {
    if session.in_flight() > 0 {
        let n = session.in_flight();
        let plural = if n == 1 { "" } else { "es" };
        return (StatusKind::Busy, format!(" searching… ({n} search{plural} in flight)"));
    }
    if let Some(err) = session.last_error() {
        return (StatusKind::Error, format!(" {err} "));
    }
    match session.results() {
        Some(rs) => {
            let at = rs.fetched_at.with_timezone(&chrono::Local).format("%H:%M:%S");
            (
                StatusKind::Info,
                format!(" showing {} of {} · fetched {at}", rs.hits.len(), rs.total),
            )
        }
        None => (StatusKind::Info, " ready".to_string()),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum StatusKind {
    Busy,
    Error,
    Info,
}

impl Widget for StatusLine<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let (kind, text) = status_text(self.session);
        let style = match kind {
            StatusKind::Busy => self.theme.status_busy,
            StatusKind::Error => self.theme.status_error,
            StatusKind::Info => self.theme.status_info,
        };
        buf.set_line(area.x, area.y, &Line::from(Span::styled(text, style)), area.width);
    }
}
