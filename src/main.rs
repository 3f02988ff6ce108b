use anyhow::{bail, Result};
use clap::Parser;
use tracing::{debug, info};

use patent_lens::config::Settings;
use patent_lens::fetch::SearchClient;
use patent_lens::orchestrator::{run_search, SessionOptions};
use patent_lens::state::SearchState;

/// Patent Lens - search patents, page through results, export and chart them
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Natural-language search query
    query: String,

    /// Search endpoint (overrides PATENT_SEARCH_ENDPOINT)
    #[arg(short, long)]
    endpoint: Option<String>,

    /// Output directory for generated files (overrides PATENT_LENS_OUT_DIR, default "out")
    #[arg(short, long)]
    output_dir: Option<String>,

    /// Result page to render (1-based, clamped to the available pages)
    #[arg(short, long, default_value_t = 1)]
    page: usize,

    /// Show full abstracts instead of the preview
    #[arg(long)]
    expanded: bool,

    /// Write all results to an .xlsx workbook
    #[arg(long)]
    export: bool,

    /// Write chart-ready analytics JSON
    #[arg(long)]
    analytics: bool,

    /// HTTP timeout in seconds
    #[arg(long)]
    timeout_secs: Option<u64>,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_target(false)
        .with_thread_ids(false)
        .with_line_number(true)
        .init();

    let args = Args::parse();
    if args.query.trim().is_empty() {
        bail!("query must not be empty");
    }

    let settings = Settings::resolve(
        args.endpoint.as_deref(),
        args.output_dir.as_deref(),
        args.timeout_secs,
    )?;
    debug!("Settings resolved - {:?}", settings);

    let client = SearchClient::new(settings.endpoint.clone(), settings.timeout)?;
    let mut state = SearchState::default();
    let opts = SessionOptions {
        page: args.page,
        expanded: args.expanded,
        export: args.export,
        analytics: args.analytics,
    };

    let report = run_search(&settings, &client, &mut state, &args.query, &opts).await?;
    if let Some(page) = &report.page_file {
        info!("Page written - {}", page.display());
    }
    if let Some(wb) = &report.workbook {
        info!("Workbook - {}", wb.display());
    }
    Ok(())
}
