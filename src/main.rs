use std::path::PathBuf;

use clap::Parser;
use kist::headless::{self, HeadlessOptions, IndexChoice, OutputFormat};
use kist_core::{config::Config, SortOrder};
use kist_engine::{HttpBackend, SearchClient};

#[derive(Parser)]
#[command(name = "kist", about = "KİST — terminal search for Elasticsearch library catalogues")]
struct Cli {
    /// Write debug logs to /tmp/kist-debug.log (tail -f to inspect).
    #[arg(long)]
    debug: bool,

    /// Config file to use instead of ~/.config/kist/config.toml.
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Engine base URL, overriding `engine.base_url`.
    #[arg(long, value_name = "URL")]
    url: Option<String>,

    /// Run one search and print the results instead of starting the TUI.
    #[arg(long)]
    headless: bool,

    /// Search text (headless).
    #[arg(short, long, default_value = "", requires = "headless")]
    query: String,

    /// Raw index name to search (headless). Defaults to the first discovered index.
    #[arg(long, conflicts_with = "all", requires = "headless")]
    index: Option<String>,

    /// Search every index (headless).
    #[arg(long, requires = "headless")]
    all: bool,

    /// Earliest publication year, inclusive (headless).
    #[arg(long, allow_hyphen_values = true, requires = "headless")]
    min_year: Option<i32>,

    /// Latest publication year, inclusive (headless).
    #[arg(long, allow_hyphen_values = true, requires = "headless")]
    max_year: Option<i32>,

    /// Year order used to break score ties: asc or desc (headless).
    #[arg(long, requires = "headless")]
    order: Option<SortOrder>,

    /// Number of pages to fetch (headless).
    #[arg(long, default_value_t = 1, value_parser = clap::value_parser!(u32).range(1..), requires = "headless")]
    pages: u32,

    /// Output format (headless).
    #[arg(long, value_enum, default_value_t = OutputFormat::Text, requires = "headless")]
    format: OutputFormat,

    /// Print long values in full instead of truncating them (headless, text).
    #[arg(long, requires = "headless")]
    full: bool,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    if cli.debug {
        let file = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open("/tmp/kist-debug.log")?;
        tracing_subscriber::fmt()
            .with_writer(std::sync::Mutex::new(file))
            .with_ansi(false)
            .with_env_filter(
                tracing_subscriber::EnvFilter::try_from_env("RUST_LOG")
                    .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("debug")),
            )
            .init();
        tracing::info!("kist debug log started — tail -f /tmp/kist-debug.log");
    } else if cli.headless {
        tracing_subscriber::fmt()
            .with_writer(std::io::stderr)
            .with_env_filter(
                tracing_subscriber::EnvFilter::try_from_env("RUST_LOG")
                    .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
            )
            .init();
    }

    let mut config = match &cli.config {
        Some(path) => Config::load_from(path)?,
        None => Config::load().unwrap_or_else(|err| {
            tracing::warn!(error = %err, "could not load config, using defaults");
            Config::defaults()
        }),
    };
    if let Some(url) = &cli.url {
        config.engine.base_url = url.clone();
    }

    if cli.headless {
        return run_headless(&cli, config);
    }

    kist_tui::run(config)
}

fn run_headless(cli: &Cli, config: Config) -> anyhow::Result<()> {
    let index = match (&cli.index, cli.all) {
        (Some(name), _) => IndexChoice::Named(name.clone()),
        (None, true) => IndexChoice::All,
        (None, false) => IndexChoice::Default,
    };
    let opts = HeadlessOptions {
        query: cli.query.clone(),
        index,
        min_year: cli.min_year,
        max_year: cli.max_year,
        order: cli.order,
        pages: cli.pages,
        format: cli.format,
        truncate_len: (!cli.full).then_some(config.ui.truncate_len),
    };

    let runtime = tokio::runtime::Runtime::new()?;
    runtime.block_on(async {
        let backend = HttpBackend::new(&config.engine.base_url, config.engine.timeout())?;
        let mut client = SearchClient::new(backend, &config);
        let mut stdout = std::io::stdout().lock();
        headless::run(&mut client, &opts, &mut stdout).await
    })
}
