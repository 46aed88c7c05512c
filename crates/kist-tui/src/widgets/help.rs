//! Help popup — centred floating overlay listing all keybindings.
//!
//! Toggle with `?` or `:help`; close with `?` or `Escape`.

use crate::event::Keymap;
use crate::theme::Theme;
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Clear, Paragraph, Widget},
};

pub struct HelpPopup<'a> {
    keymap: &'a Keymap,
    theme: &'a Theme,
}

impl<'a> HelpPopup<'a> {
    pub fn new(keymap: &'a Keymap, theme: &'a Theme) -> Self {
        Self { keymap, theme }
    }
}

fn key_name(c: char) -> String {
    if c == ' ' {
        "Space".to_string()
    } else {
        c.to_string()
    }
}

impl Widget for HelpPopup<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let popup = centered_rect(72, 24, area);
        Clear.render(popup, buf);

        let block = Block::bordered()
            .title(" kist — keybindings (? to close) ")
            .border_style(self.theme.border_focused);

        let inner = block.inner(popup);
        block.render(popup, buf);

        let bindings: Vec<(String, &str)> = vec![
            ("q  /  Ctrl+c".into(), "Quit"),
            ("Tab".into(), "Cycle focus: indices → results → query"),
            (key_name(self.keymap.query_focus), "Focus query bar"),
            ("Enter (query)".into(), "Search from the first page"),
            ("Escape".into(), "Leave the query bar"),
            ("↑ k  /  ↓ j".into(), "Move in the focused list"),
            ("Enter (indices)".into(), "Search this index next"),
            (key_name(self.keymap.toggle_field), "Show more / less of a long value"),
            (key_name(self.keymap.load_more), "Load more results"),
            (key_name(self.keymap.toggle_order), "Flip year order and search again"),
            ("PageUp  /  Ctrl+u".into(), "Scroll results up"),
            ("PageDown / Ctrl+d".into(), "Scroll results down"),
            (":".into(), "Command line"),
            ("?".into(), "Toggle this help popup"),
        ];
        const COMMANDS: &[(&str, &str)] = &[
            (":index <name|all>", "Choose the index to search"),
            (":min [year]  :max [year]", "Set or clear the year range"),
            (":sort <asc|desc>", "Year order"),
            (":search  :more", "Search again / load more"),
            (":theme <name>", "default, gruvbox"),
        ];

        let bold = Style::default().add_modifier(Modifier::BOLD);
        let mut lines: Vec<Line> = bindings
            .iter()
            .map(|(key, desc)| {
                Line::from(vec![
                    Span::styled(format!("  {:<26}", key), bold),
                    Span::raw(*desc),
                ])
            })
            .collect();
        lines.push(Line::default());
        lines.extend(COMMANDS.iter().map(|(cmd, desc)| {
            Line::from(vec![
                Span::styled(format!("  {:<26}", cmd), bold),
                Span::raw(*desc),
            ])
        }));

        Paragraph::new(lines).render(inner, buf);
    }
}

fn centered_rect(width: u16, height: u16, area: Rect) -> Rect {
    let x = area.x + area.width.saturating_sub(width) / 2;
    let y = area.y + area.height.saturating_sub(height) / 2;
    Rect {
        x,
        y,
        width: width.min(area.width),
        height: height.min(area.height),
    }
}
