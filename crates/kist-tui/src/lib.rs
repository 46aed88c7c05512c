//! kist TUI — ratatui application shell.
//!
//! [`run`] owns the tokio runtime for the lifetime of the terminal session.
//! The crossterm loop stays on the calling thread; engine calls are spawned
//! onto the runtime and report back through [`app::Outcome`].

pub mod app;
pub mod commands;
pub mod event;
pub mod theme;
pub mod widgets;

pub use app::{App, AppState};

use kist_core::config::Config;
use kist_engine::HttpBackend;

/// Start the TUI against the engine named in `config`.
pub fn run(config: Config) -> anyhow::Result<()> {
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .worker_threads(2)
        .enable_all()
        .build()?;
    let guard = runtime.enter();

    let backend = HttpBackend::new(&config.engine.base_url, config.engine.timeout())?;
    let keymap = event::Keymap::from_config(&config.keybindings)?;
    let theme = theme::Theme::by_name(&config.ui.theme);
    tracing::info!(url = %backend.base_url(), theme = %config.ui.theme, "starting tui");

    let state = AppState::new(config, theme, keymap);
    let result = App::new(state, backend, runtime.handle().clone()).run();

    drop(guard);
    // In-flight requests are abandoned on quit
    runtime.shutdown_background();
    result
}
