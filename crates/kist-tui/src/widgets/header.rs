//! Header widget — the application title on the left, key hints on the right.

use crate::theme::Theme;
use kist_core::Session;
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::Widget,
};

/// Renders the 1-line strip at the top of the screen.
///
/// Shows the product name, the engine it talks to and the index currently
/// selected for the next search.
pub struct Header<'a> {
    session: &'a Session,
    base_url: &'a str,
    theme: &'a Theme,
}

impl<'a> Header<'a> {
    pub fn new(session: &'a Session, base_url: &'a str, theme: &'a Theme) -> Self {
        Self { session, base_url, theme }
    }
}

impl Widget for Header<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let index = self.session.state().index.as_str();
        let (label, style) = if index.is_empty() {
            ("All indices", Style::default())
        } else {
            (
                self.session.catalog().display_for(index),
                self.theme.index_style(index),
            )
        };

        let line = Line::from(vec![
            Span::styled(
                " KİST ",
                Style::default()
                    .bg(ratatui::style::Color::DarkGray)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::styled(
                format!(" {} ", self.base_url),
                Style::default().add_modifier(Modifier::DIM),
            ),
            Span::styled(format!(" {label} "), style.add_modifier(Modifier::BOLD)),
        ]);
        buf.set_line(area.x, area.y, &line, area.width);

        // Keybinding hints at the right edge
        let hint = " /:search  m:more  o:order  q:quit  ?:help ";
        let hint_x = area.right().saturating_sub(hint.chars().count() as u16);
        buf.set_string(
            hint_x,
            area.y,
            hint,
            Style::default().add_modifier(Modifier::DIM),
        );
    }
}
