//! Semantic application events — crossterm key events mapped to a
//! widget-agnostic vocabulary so widgets never touch crossterm directly.
//!
//! # Usage
//!
//! In the main event loop, call [`Keymap::to_app_event`] on every
//! [`crossterm::event::Event`] and match on the returned [`AppEvent`] instead
//! of crossterm types.
//!
//! # Keybindings
//!
//! The four single-character bindings marked *configurable* come from the
//! `[keybindings]` section of the user config; the rest are fixed.
//!
//! | Key(s)                  | Event                      |
//! |-------------------------|----------------------------|
//! | `q`, `Ctrl+c`           | `Quit`                     |
//! | `Tab`                   | `FocusNext`                |
//! | `/` *(configurable)*    | `QueryFocus`               |
//! | `m` *(configurable)*    | `LoadMore`                 |
//! | `o` *(configurable)*    | `ToggleOrder`              |
//! | `Space` *(configurable)*| `ToggleField`              |
//! | `PageUp`, `Ctrl+u`      | `ScrollUp`                 |
//! | `PageDown`, `Ctrl+d`    | `ScrollDown`               |
//! | `↑` / `k`               | `Nav(Up)`                  |
//! | `↓` / `j`               | `Nav(Down)`                |
//! | `←` / `h`               | `Nav(Left)`                |
//! | `→` / `l`               | `Nav(Right)`               |
//! | printable char          | `Char(c)`                  |
//! | `Backspace`             | `Backspace`                |
//! | `Enter`                 | `Enter`                    |
//! | terminal resize         | `Resize(w, h)`             |
//!
//! ## Insert mode
//!
//! When a text-input widget (query bar, command bar) is focused, the event
//! loop calls [`Keymap::to_app_event_insert`] instead. In insert mode every
//! printable character is forwarded as `Char`, arrow keys still produce
//! `Nav`, and only `Ctrl+c`, `Escape`, `Enter`, `Tab`, and `Backspace` keep
//! their special bindings.

use crossterm::event::{Event, KeyCode, KeyEvent, KeyModifiers};
use kist_core::config::KeybindingsConfig;

/// Cardinal direction for list navigation and text-cursor movement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

/// A semantic application event derived from a raw crossterm [`Event`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppEvent {
    /// Exit the application.
    Quit,
    /// Move keyboard focus to the next pane (Tab-cycle).
    FocusNext,
    /// Transfer focus to the query bar.
    QueryFocus,
    /// Scroll the focused list up one page.
    ScrollUp,
    /// Scroll the focused list down one page.
    ScrollDown,
    /// Ask the engine for one more page of results.
    LoadMore,
    /// Flip the year tie-break order (re-searches immediately).
    ToggleOrder,
    /// Expand or collapse the long value under the results cursor.
    ToggleField,
    /// Move within the focused list (or the text cursor in an input).
    Nav(Direction),
    /// A printable character forwarded to the active text input.
    Char(char),
    /// Delete the character before the cursor in the active text input.
    Backspace,
    /// Confirm the active input or activate the focused row.
    Enter,
    /// The terminal was resized to the given (width, height).
    Resize(u16, u16),
    /// Dismiss the active modal (query bar focus, help popup, command bar).
    Escape,
}

/// Resolved single-character bindings from the user config.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Keymap {
    pub query_focus: char,
    pub load_more: char,
    pub toggle_order: char,
    pub toggle_field: char,
}

impl Default for Keymap {
    fn default() -> Self {
        Self {
            query_focus: '/',
            load_more: 'm',
            toggle_order: 'o',
            toggle_field: ' ',
        }
    }
}

impl Keymap {
    /// Resolve the `[keybindings]` section. Each value must be exactly one
    /// character, or the word `space`.
    pub fn from_config(cfg: &KeybindingsConfig) -> anyhow::Result<Self> {
        Ok(Self {
            query_focus: parse_binding("query_focus", &cfg.query_focus)?,
            load_more: parse_binding("load_more", &cfg.load_more)?,
            toggle_order: parse_binding("toggle_order", &cfg.toggle_order)?,
            toggle_field: parse_binding("toggle_field", &cfg.toggle_field)?,
        })
    }

    /// Map a raw crossterm [`Event`] to an [`AppEvent`] (normal / navigation mode).
    ///
    /// Returns `None` for events that carry no meaning for the application
    /// (mouse events, unbound keys).
    pub fn to_app_event(&self, event: Event) -> Option<AppEvent> {
        match event {
            Event::Resize(w, h) => Some(AppEvent::Resize(w, h)),
            Event::Key(key) => self.map_key(key),
            _ => None,
        }
    }

    /// Map a raw crossterm [`Event`] to an [`AppEvent`] for text-input
    /// ("insert") mode.
    pub fn to_app_event_insert(&self, event: Event) -> Option<AppEvent> {
        match event {
            Event::Resize(w, h) => Some(AppEvent::Resize(w, h)),
            Event::Key(key) => map_key_insert(key),
            _ => None,
        }
    }

    fn map_key(&self, key: KeyEvent) -> Option<AppEvent> {
        use KeyCode::*;
        use KeyModifiers as Mod;

        let plain = key.modifiers == Mod::NONE || key.modifiers == Mod::SHIFT;

        match key.code {
            Char('q') if key.modifiers == Mod::NONE => Some(AppEvent::Quit),
            Char('c') if key.modifiers == Mod::CONTROL => Some(AppEvent::Quit),

            Tab if key.modifiers == Mod::NONE => Some(AppEvent::FocusNext),

            Char(c) if plain && c == self.query_focus => Some(AppEvent::QueryFocus),
            Char(c) if plain && c == self.load_more => Some(AppEvent::LoadMore),
            Char(c) if plain && c == self.toggle_order => Some(AppEvent::ToggleOrder),
            Char(c) if plain && c == self.toggle_field => Some(AppEvent::ToggleField),

            PageUp => Some(AppEvent::ScrollUp),
            PageDown => Some(AppEvent::ScrollDown),
            Char('u') if key.modifiers == Mod::CONTROL => Some(AppEvent::ScrollUp),
            Char('d') if key.modifiers == Mod::CONTROL => Some(AppEvent::ScrollDown),

            Up | Char('k') if key.modifiers == Mod::NONE => Some(AppEvent::Nav(Direction::Up)),
            Down | Char('j') if key.modifiers == Mod::NONE => {
                Some(AppEvent::Nav(Direction::Down))
            }
            Left | Char('h') if key.modifiers == Mod::NONE => {
                Some(AppEvent::Nav(Direction::Left))
            }
            Right | Char('l') if key.modifiers == Mod::NONE => {
                Some(AppEvent::Nav(Direction::Right))
            }

            Char(c) if plain => Some(AppEvent::Char(c)),

            Backspace if key.modifiers == Mod::NONE => Some(AppEvent::Backspace),
            Enter if key.modifiers == Mod::NONE => Some(AppEvent::Enter),
            Esc => Some(AppEvent::Escape),

            _ => None,
        }
    }
}

fn parse_binding(name: &str, value: &str) -> anyhow::Result<char> {
    if value.eq_ignore_ascii_case("space") {
        return Ok(' ');
    }
    let mut chars = value.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) => Ok(c),
        _ => anyhow::bail!("keybindings.{name} must be a single character, got {value:?}"),
    }
}

/// Key mapping for text-input / insert mode.
fn map_key_insert(key: KeyEvent) -> Option<AppEvent> {
    use KeyCode::*;
    use KeyModifiers as Mod;

    match key.code {
        // Ctrl+c always quits, even while typing
        Char('c') if key.modifiers == Mod::CONTROL => Some(AppEvent::Quit),

        Up => Some(AppEvent::Nav(Direction::Up)),
        Down => Some(AppEvent::Nav(Direction::Down)),
        Left => Some(AppEvent::Nav(Direction::Left)),
        Right => Some(AppEvent::Nav(Direction::Right)),

        Tab if key.modifiers == Mod::NONE => Some(AppEvent::FocusNext),

        Char(c) if key.modifiers == Mod::NONE || key.modifiers == Mod::SHIFT => {
            Some(AppEvent::Char(c))
        }

        Backspace if key.modifiers == Mod::NONE => Some(AppEvent::Backspace),
        Enter if key.modifiers == Mod::NONE => Some(AppEvent::Enter),
        Esc => Some(AppEvent::Escape),

        _ => None,
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
