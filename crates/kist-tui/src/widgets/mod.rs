//! Ratatui widgets for the kist TUI.

pub mod command_bar;
pub mod header;
pub mod help;
pub mod index_list;
pub mod query_bar;
pub mod results;
pub mod status_line;
