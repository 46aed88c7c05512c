//! Top-level application state and the main event loop.
//!
//! [`App::run`] sets up the terminal, drives the crossterm event loop, and
//! tears everything down cleanly on exit or panic.
//!
//! Engine calls run on a tokio runtime owned by the caller. Each spawned task
//! sends its [`Outcome`] back over an unbounded channel, and the loop applies
//! whatever has arrived before every redraw.

use crate::{
    commands::{execute_command, Command},
    event::{AppEvent, Keymap},
    theme::Theme,
    widgets::{
        command_bar::{CommandBar, CommandBarState},
        header::Header,
        help::HelpPopup,
        index_list::{IndexList, IndexListState},
        query_bar::{QueryBar, QueryBarState},
        results::{Results, ResultsState},
        status_line::StatusLine,
    },
};
use crossterm::{
    event::{self as ct_event, Event},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use kist_core::{config::Config, ClientError, IndexCatalog, ResultSet, Session, Ticket};
use kist_engine::HttpBackend;
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Direction as LayoutDir, Layout, Rect},
    Frame, Terminal,
};
use std::{io, time::Duration};
use tokio::{runtime::Handle, sync::mpsc};

// ---------------------------------------------------------------------------
// Focus + outcome types
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    Indices,
    Results,
    QueryBar,
    /// Vim-style `:` command line is active.
    Command,
}

/// Result of a background engine call, delivered to the UI thread.
#[derive(Debug)]
pub enum Outcome {
    Catalog(Result<IndexCatalog, ClientError>),
    Search {
        seq: u64,
        result: Result<ResultSet, ClientError>,
    },
}

// ---------------------------------------------------------------------------
// AppState
// ---------------------------------------------------------------------------

pub struct AppState {
    pub session: Session,
    pub indices: IndexListState,
    pub results: ResultsState,
    pub query: QueryBarState,
    pub focus: Focus,
    /// Focus state before entering command mode, restored on exit.
    pub prev_focus: Focus,
    pub theme: Theme,
    pub config: Config,
    pub keymap: Keymap,
    pub show_help: bool,
    pub command_bar: CommandBarState,
    pub quit: bool,
    /// Set once the catalog outcome has been applied and the first search
    /// queued.
    pub mounted: bool,
    /// Searches waiting to be spawned.
    pub pending: Vec<Ticket>,
}

impl AppState {
    pub fn new(config: Config, theme: Theme, keymap: Keymap) -> Self {
        Self {
            session: Session::new(config.engine.fields(), config.ui.page_step),
            indices: IndexListState::default(),
            results: ResultsState::new(config.ui.truncate_len),
            query: QueryBarState::default(),
            focus: Focus::Indices,
            prev_focus: Focus::Indices,
            theme,
            config,
            keymap,
            show_help: false,
            command_bar: CommandBarState::default(),
            quit: false,
            mounted: false,
            pending: Vec::new(),
        }
    }

    /// Fold one background outcome into the session. The first catalog
    /// outcome (success or failure) queues the initial search.
    pub fn apply(&mut self, outcome: Outcome) {
        match outcome {
            Outcome::Catalog(result) => {
                self.session.apply_catalog(result);
                self.indices.sync(&self.session);
                if !self.mounted {
                    self.mounted = true;
                    let ticket = self.session.refresh();
                    self.pending.push(ticket);
                }
            }
            Outcome::Search { seq, result } => {
                self.session.apply_search(seq, result);
                self.results.clamp(&self.session);
            }
        }
    }

    /// Route a semantic event. Searches it triggers land on `pending`.
    pub fn handle(&mut self, event: AppEvent) {
        // Help popup intercepts all events; only close keys pass through.
        if self.show_help {
            match event {
                AppEvent::Char('?') | AppEvent::Escape | AppEvent::Quit => {
                    tracing::debug!("help popup closed");
                    self.show_help = false;
                }
                _ => {}
            }
            return;
        }

        if self.focus == Focus::Command {
            self.handle_command_bar(event);
            return;
        }

        match event {
            // Toggle help (only when not typing in the query bar)
            AppEvent::Char('?') if self.focus != Focus::QueryBar => {
                tracing::debug!("help popup opened");
                self.show_help = true;
            }

            // Enter command mode with `:` (not from the query bar)
            AppEvent::Char(':') if self.focus != Focus::QueryBar => {
                tracing::debug!(prev_focus = ?self.focus, "entering command mode");
                self.prev_focus = self.focus;
                self.command_bar.clear();
                self.focus = Focus::Command;
            }

            AppEvent::Quit => {
                tracing::debug!("quit");
                self.quit = true;
            }

            // Return focus from query bar
            AppEvent::Escape => {
                if self.focus == Focus::QueryBar {
                    tracing::debug!("focus: QueryBar -> Results");
                    self.focus = Focus::Results;
                }
            }

            // Tab-cycle focus: Indices → Results → QueryBar → Indices
            AppEvent::FocusNext => {
                let next = match self.focus {
                    Focus::Indices => Focus::Results,
                    Focus::Results => Focus::QueryBar,
                    Focus::QueryBar | Focus::Command => Focus::Indices,
                };
                tracing::debug!(from = ?self.focus, to = ?next, "focus cycle");
                self.focus = next;
            }

            AppEvent::QueryFocus => {
                tracing::debug!("focus -> QueryBar");
                self.focus = Focus::QueryBar;
            }

            // Paging and ordering work regardless of focus
            AppEvent::LoadMore => {
                if self.session.has_more() {
                    let ticket = self.session.load_more();
                    self.pending.push(ticket);
                }
            }
            AppEvent::ToggleOrder => {
                let order = self.session.state().order.flipped();
                if let Some(ticket) = self.session.set_order(order) {
                    self.pending.push(ticket);
                }
            }

            // Terminal resize is handled automatically by ratatui
            AppEvent::Resize(_, _) => {}

            other => self.dispatch_to_focused(other),
        }
    }

    fn handle_command_bar(&mut self, event: AppEvent) {
        match event {
            AppEvent::Escape => {
                tracing::debug!("command bar cancelled");
                self.command_bar.clear();
                self.focus = self.prev_focus;
            }
            AppEvent::Enter => {
                let input = self.command_bar.input.clone();
                let outcome = Command::parse(&input).and_then(|cmd| {
                    tracing::debug!(command = ?cmd, "executing command");
                    execute_command(self, cmd)
                });
                match outcome {
                    Ok(()) => {
                        self.command_bar.clear();
                        self.focus = self.prev_focus;
                    }
                    Err(msg) if msg.is_empty() => {
                        // Empty input — just close
                        self.command_bar.clear();
                        self.focus = self.prev_focus;
                    }
                    Err(msg) => {
                        // Show the error; bar stays open
                        self.command_bar.error = Some(msg);
                    }
                }
            }
            AppEvent::Quit => self.quit = true,
            other => self.command_bar.handle(&other),
        }
    }

    /// Route an event to the widget that owns the current focus.
    fn dispatch_to_focused(&mut self, event: AppEvent) {
        let ticket = match self.focus {
            Focus::Indices => {
                self.indices.handle(&event, &mut self.session);
                None
            }
            Focus::Results => self.results.handle(&event, &mut self.session),
            Focus::QueryBar => {
                let ticket = self.query.handle(&event, &mut self.session);
                if ticket.is_some() {
                    self.results.reset();
                }
                ticket
            }
            Focus::Command => None, // handled before dispatch, should not reach here
        };
        self.pending.extend(ticket);
    }
}

/// Returns true when the current focus is on a text-input widget, meaning
/// alphabetic keys should produce characters rather than trigger shortcuts.
fn is_insert_mode(focus: Focus) -> bool {
    matches!(focus, Focus::QueryBar | Focus::Command)
}

// ---------------------------------------------------------------------------
// App
// ---------------------------------------------------------------------------

pub struct App {
    state: AppState,
    backend: HttpBackend,
    runtime: Handle,
    tx: mpsc::UnboundedSender<Outcome>,
    rx: mpsc::UnboundedReceiver<Outcome>,
}

impl App {
    pub fn new(state: AppState, backend: HttpBackend, runtime: Handle) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        Self {
            state,
            backend,
            runtime,
            tx,
            rx,
        }
    }

    /// Set up the terminal, run the event loop, and restore the terminal on exit.
    pub fn run(mut self) -> anyhow::Result<()> {
        install_panic_hook();

        enable_raw_mode()?;
        execute!(io::stdout(), EnterAlternateScreen)?;
        let backend = CrosstermBackend::new(io::stdout());
        let mut terminal = Terminal::new(backend)?;

        self.spawn_discovery();
        let result = self.event_loop(&mut terminal);

        // Always restore terminal, even if the loop returned an error
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
        let _ = terminal.show_cursor();

        result
    }

    fn event_loop(
        &mut self,
        terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    ) -> anyhow::Result<()> {
        loop {
            while let Ok(outcome) = self.rx.try_recv() {
                self.state.apply(outcome);
            }
            self.spawn_pending();

            {
                let s = &self.state;
                let base_url = self.backend.base_url();
                terminal.draw(|frame| draw(frame, s, base_url))?;
            }

            if self.state.quit {
                break;
            }

            if ct_event::poll(Duration::from_millis(16))? {
                match ct_event::read()? {
                    Event::Key(key) if key.kind == crossterm::event::KeyEventKind::Press => {
                        let raw = Event::Key(key);
                        // Use insert-mode mapping when a text widget is focused
                        let app_event = if is_insert_mode(self.state.focus) {
                            self.state.keymap.to_app_event_insert(raw)
                        } else {
                            self.state.keymap.to_app_event(raw)
                        };
                        if let Some(ev) = app_event {
                            tracing::debug!(focus = ?self.state.focus, event = ?ev, "key event");
                            self.state.handle(ev);
                        }
                    }
                    other => {
                        if let Some(ev) = self.state.keymap.to_app_event(other) {
                            self.state.handle(ev);
                        }
                    }
                }
            }
        }
        Ok(())
    }

    fn spawn_discovery(&self) {
        let backend = self.backend.clone();
        let rules = self.state.config.catalog.rules();
        let tx = self.tx.clone();
        self.runtime.spawn(async move {
            let result = kist_engine::discover(&backend, &rules).await;
            let _ = tx.send(Outcome::Catalog(result));
        });
    }

    fn spawn_pending(&mut self) {
        for ticket in self.state.pending.drain(..) {
            let backend = self.backend.clone();
            let tx = self.tx.clone();
            self.runtime.spawn(async move {
                let result = kist_engine::execute(&backend, &ticket.request).await;
                let _ = tx.send(Outcome::Search {
                    seq: ticket.seq,
                    result,
                });
            });
        }
    }
}

// ---------------------------------------------------------------------------
// Rendering
// ---------------------------------------------------------------------------

fn draw(frame: &mut Frame, state: &AppState, base_url: &str) {
    let area = frame.area();

    // Vertical: header | body | 3-line query bar | status line
    let vert = Layout::default()
        .direction(LayoutDir::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Fill(1),
            Constraint::Length(3),
            Constraint::Length(1),
        ])
        .split(area);

    // Horizontal body split
    let pct = state.config.ui.index_pane_width_pct.min(80);
    let horiz = Layout::default()
        .direction(LayoutDir::Horizontal)
        .constraints([Constraint::Percentage(pct), Constraint::Fill(1)])
        .split(vert[1]);

    let theme = &state.theme;
    frame.render_widget(Header::new(&state.session, base_url, theme), vert[0]);
    frame.render_widget(
        IndexList::new(
            &state.indices,
            &state.session,
            state.focus == Focus::Indices,
            theme,
        ),
        horiz[0],
    );
    frame.render_widget(
        Results::new(
            &state.results,
            &state.session,
            state.focus == Focus::Results,
            state.keymap.load_more,
            theme,
        ),
        horiz[1],
    );
    frame.render_widget(
        QueryBar::new(
            &state.query,
            &state.session,
            state.focus == Focus::QueryBar,
            theme,
        ),
        vert[2],
    );
    frame.render_widget(StatusLine::new(&state.session, theme), vert[3]);

    if state.show_help {
        frame.render_widget(HelpPopup::new(&state.keymap, theme), area);
    }

    // Command bar overlays the bottom row of the screen
    if state.focus == Focus::Command {
        let cmd_area = Rect {
            y: area.bottom().saturating_sub(1),
            height: 1,
            ..area
        };
        frame.render_widget(CommandBar::new(&state.command_bar, theme), cmd_area);
        let col = state.command_bar.cursor_col(cmd_area);
        frame.set_cursor_position((col, cmd_area.y));
        return; // cursor is set; skip query-bar cursor below
    }

    // Position the terminal cursor when the query bar is focused
    if state.focus == Focus::QueryBar {
        let qb = QueryBar::new(&state.query, &state.session, true, theme);
        let (cx, cy) = qb.cursor_position(vert[2]);
        frame.set_cursor_position((cx, cy));
    }
}

// ---------------------------------------------------------------------------
// Terminal helpers
// ---------------------------------------------------------------------------

fn install_panic_hook() {
    let original = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
        original(info);
    }));
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
