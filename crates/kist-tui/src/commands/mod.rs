//! `:` commands — parsing and execution.
//!
//! | Command | Action |
//! |---------|--------|
//! | `q`, `quit` | Quit |
//! | `help` | Toggle the help popup |
//! | `theme <name>` | Switch theme (`default`, `gruvbox`) |
//! | `index <name>`, `index all` | Choose the index for the next search |
//! | `min [year]`, `max [year]` | Set the year range; no argument clears it |
//! | `sort <asc\|desc>` | Year order; searches again when it changes |
//! | `more` | Load one more page |
//! | `search`, `s` | Search from the first page |

use kist_core::SortOrder;

use crate::{app::AppState, theme::Theme};

// ---------------------------------------------------------------------------
// Command
// ---------------------------------------------------------------------------

/// A parsed, validated command ready to be executed by the app shell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Quit,
    Help,
    Theme(String),
    /// Raw or display name, or `all`.
    Index(String),
    MinYear(Option<i32>),
    MaxYear(Option<i32>),
    Sort(SortOrder),
    More,
    Search,
}

impl Command {
    /// Parse a raw command string (the text after the `:` prefix).
    ///
    /// Returns `Ok(cmd)` on success, `Err(message)` on failure. An empty
    /// string returns `Err("")` as a sentinel meaning "close without acting".
    pub fn parse(input: &str) -> Result<Command, String> {
        let input = input.trim();
        if input.is_empty() {
            return Err(String::new());
        }

        let (word, rest) = input
            .split_once(char::is_whitespace)
            .map(|(w, r)| (w, r.trim()))
            .unwrap_or((input, ""));

        match word {
            "q" | "quit" | "q!" | "quit!" => Ok(Command::Quit),
            "help" => Ok(Command::Help),
            "theme" => {
                if rest.is_empty() {
                    Err("usage: theme <default|gruvbox>".to_string())
                } else {
                    Ok(Command::Theme(rest.to_string()))
                }
            }
            "index" | "i" => {
                if rest.is_empty() {
                    Err("usage: index <name|all>".to_string())
                } else {
                    Ok(Command::Index(rest.to_string()))
                }
            }
            "min" => parse_year(rest).map(Command::MinYear),
            "max" => parse_year(rest).map(Command::MaxYear),
            "sort" => {
                if rest.is_empty() {
                    Err("usage: sort <asc|desc>".to_string())
                } else {
                    rest.parse::<SortOrder>().map(Command::Sort)
                }
            }
            "more" => Ok(Command::More),
            "search" | "s" => Ok(Command::Search),
            other => Err(format!("unknown command: {other}")),
        }
    }
}

fn parse_year(rest: &str) -> Result<Option<i32>, String> {
    if rest.is_empty() {
        return Ok(None);
    }
    rest.parse::<i32>()
        .map(Some)
        .map_err(|_| format!("not a year: {rest}"))
}

/// Execute a parsed [`Command`] against the application state.
///
/// Searches are queued on `s.pending`; the app shell spawns them. An `Err`
/// is shown in the command bar.
pub fn execute_command(s: &mut AppState, cmd: Command) -> Result<(), String> {
    match cmd {
        Command::Quit => {
            s.quit = true;
        }
        Command::Help => {
            s.show_help = !s.show_help;
        }
        Command::Theme(name) => {
            s.theme = Theme::by_name(&name);
        }
        Command::Index(name) => {
            let raw = resolve_index(s, &name).ok_or_else(|| format!("unknown index: {name}"))?;
            s.session.select_index(raw);
            s.indices.sync(&s.session);
        }
        Command::MinYear(year) => s.session.set_min_year(year),
        Command::MaxYear(year) => s.session.set_max_year(year),
        Command::Sort(order) => {
            if let Some(ticket) = s.session.set_order(order) {
                s.pending.push(ticket);
            }
        }
        Command::More => {
            if !s.session.has_more() {
                return Err("no more results".to_string());
            }
            let ticket = s.session.load_more();
            s.pending.push(ticket);
        }
        Command::Search => {
            s.results.reset();
            let ticket = s.session.submit();
            s.pending.push(ticket);
        }
    }
    Ok(())
}

/// Match `name` against raw names first, then display names
/// (case-insensitive). `all` maps to the empty selection.
fn resolve_index(s: &AppState, name: &str) -> Option<String> {
    if name.eq_ignore_ascii_case("all") {
        return Some(String::new());
    }
    let entries = &s.session.catalog().entries;
    entries
        .iter()
        .find(|e| e.raw == name)
        .or_else(|| {
            let lower = name.to_lowercase();
            entries.iter().find(|e| e.display.to_lowercase() == lower)
        })
        .map(|e| e.raw.clone())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
