//! Headless mode — one search, printed to stdout, no terminal UI.
//!
//! Runs the same [`SearchClient`] the tests drive: discovery, one explicit
//! search, then `pages - 1` load-more rounds. The final result set is written
//! as plain text or as JSON lines.

use std::io::Write;

use anyhow::bail;
use kist_core::{
    present::{shorten_title, Collapsible},
    ResultSet, Session, SortOrder,
};
use kist_engine::{Backend, SearchClient};

/// Output format for headless results.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum OutputFormat {
    /// Heading, shortened titles and truncated `key: value` lines.
    #[default]
    Text,
    /// One `{"_id": …, "_source": {…}}` object per line.
    Json,
}

/// Which index to search.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum IndexChoice {
    /// First discovered index, like the TUI at startup.
    #[default]
    Default,
    All,
    Named(String),
}

#[derive(Debug, Clone)]
pub struct HeadlessOptions {
    pub query: String,
    pub index: IndexChoice,
    pub min_year: Option<i32>,
    pub max_year: Option<i32>,
    pub order: Option<SortOrder>,
    /// At least 1.
    pub pages: u32,
    pub format: OutputFormat,
    /// Characters shown per value in text output; `None` prints values in full.
    pub truncate_len: Option<usize>,
}

impl Default for HeadlessOptions {
    fn default() -> Self {
        Self {
            query: String::new(),
            index: IndexChoice::Default,
            min_year: None,
            max_year: None,
            order: None,
            pages: 1,
            format: OutputFormat::Text,
            truncate_len: Some(kist_core::present::DEFAULT_MAX_LEN),
        }
    }
}

/// Run a headless search and write the final result set to `out`.
///
/// Fails when discovery fails, or when the last search round failed.
pub async fn run<B: Backend>(
    client: &mut SearchClient<B>,
    opts: &HeadlessOptions,
    out: &mut impl Write,
) -> anyhow::Result<()> {
    client.discover().await;
    if let Some(err) = client.session().last_error() {
        bail!("{err}");
    }

    let session = client.session_mut();
    match &opts.index {
        IndexChoice::Default => {}
        IndexChoice::All => session.select_index(""),
        IndexChoice::Named(name) => {
            if !session.catalog().contains(name) {
                tracing::warn!(index = %name, "index not in discovered catalog, searching anyway");
            }
            session.select_index(name.as_str());
        }
    }
    session.set_query(opts.query.as_str());
    session.set_min_year(opts.min_year);
    session.set_max_year(opts.max_year);
    if let Some(order) = opts.order {
        session.preset_order(order);
    }

    client.search().await;
    for _ in 1..opts.pages.max(1) {
        if client.session().last_error().is_some() || !client.session().has_more() {
            break;
        }
        client.load_more().await;
    }

    let session = client.session();
    if let Some(err) = session.last_error() {
        bail!("{err}");
    }
    let Some(results) = session.results() else {
        bail!("no search result");
    };

    match opts.format {
        OutputFormat::Text => write_text(session, results, opts.truncate_len, out)?,
        OutputFormat::Json => write_json(results, out)?,
    }
    out.flush()?;
    Ok(())
}

fn write_text(
    session: &Session,
    results: &ResultSet,
    truncate_len: Option<usize>,
    out: &mut impl Write,
) -> std::io::Result<()> {
    let index = session.state().index.as_str();
    let label = if index.is_empty() {
        "All indices"
    } else {
        session.catalog().display_for(index)
    };
    writeln!(out, "{label} - results ({})", results.total)?;

    if results.is_empty() {
        writeln!(out)?;
        writeln!(out, "No results found")?;
        return Ok(());
    }

    let title_field = session.fields().title.as_str();
    for doc in &results.hits {
        writeln!(out)?;
        let title = doc.field(title_field).unwrap_or(doc.id.as_str());
        writeln!(out, "{}", shorten_title(title))?;
        for (key, value) in &doc.fields {
            let shown = match truncate_len {
                Some(max) => Collapsible::new(value, max).display(false),
                None => value.as_str().into(),
            };
            writeln!(out, "  {key}: {shown}")?;
        }
    }

    if session.has_more() {
        writeln!(out)?;
        writeln!(
            out,
            "({} of {} shown; use --pages to load more)",
            results.hits.len(),
            results.total
        )?;
    }
    Ok(())
}

fn write_json(results: &ResultSet, out: &mut impl Write) -> anyhow::Result<()> {
    for doc in &results.hits {
        let line = serde_json::json!({ "_id": doc.id, "_source": doc.source });
        serde_json::to_writer(&mut *out, &line)?;
        writeln!(out)?;
    }
    Ok(())
}
