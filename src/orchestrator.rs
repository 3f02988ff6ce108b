use anyhow::{Context, Result};
use std::path::PathBuf;
use tracing::{debug, error, info, warn};

use crate::aggregate::{write_analytics, Analytics};
use crate::config::Settings;
use crate::export::{export_file_name, to_rows, write_xlsx};
use crate::fetch::SearchClient;
use crate::render::{render_analytics_summary, render_page};
use crate::state::{Action, Effect, SearchState, Status};

#[derive(Debug, Clone, Default)]
pub struct SessionOptions {
    pub page: usize,
    pub expanded: bool,
    pub export: bool,
    pub analytics: bool,
}

/// Files written by one session.
#[derive(Debug, Clone, Default)]
pub struct SessionReport {
    pub status: Option<Status>,
    pub page_file: Option<PathBuf>,
    pub workbook: Option<PathBuf>,
    pub analytics_dir: Option<PathBuf>,
}

/// Submit `query`, apply the response to `state`, then write the current page
/// and, if asked, the workbook and analytics files.
pub async fn run_search(
    settings: &Settings,
    client: &SearchClient,
    state: &mut SearchState,
    query: &str,
    opts: &SessionOptions,
) -> Result<SessionReport> {
    let session_start = std::time::Instant::now();
    info!("Session started - query={:?}, endpoint={}", query, client.endpoint());

    // 1) submit: clears previous results and hands out the request token
    let (token, query) = match state.apply(Action::Submit { query: query.to_string() }) {
        Effect::Fetch { token, query } => (token, query),
        other => {
            warn!("Submit produced no fetch - effect={:?}", other);
            return Ok(SessionReport::default());
        }
    };

    // 2) fetch; failures degrade to the empty state
    let action = match client.search(&query).await {
        Ok(outcome) => Action::Loaded { token, outcome },
        Err(e) => {
            error!("Search failed - query={:?}, error={:#}", query, e);
            Action::Failed { token }
        }
    };
    if let Effect::Discarded { token } = state.apply(action) {
        debug!("Response for token={} dropped", token);
    }

    // 3) page
    if opts.page > 1 {
        state.apply(Action::ChangePage(opts.page));
    }
    debug!(
        "Page state - current={}, total_pages={}, visible={}",
        state.page.current_page,
        state.page.total_pages(),
        state.visible().len()
    );

    let out_dir = &settings.output_dir;
    std::fs::create_dir_all(out_dir).with_context(|| format!("create {:?}", out_dir))?;

    let page_file = out_dir.join(format!("page-{}.md", state.page.current_page));
    std::fs::write(&page_file, render_page(state, opts.expanded))
        .with_context(|| format!("write {:?}", page_file))?;
    debug!("Wrote {}", page_file.display());

    let mut report = SessionReport {
        status: Some(state.status()),
        page_file: Some(page_file),
        ..Default::default()
    };

    // 4) spreadsheet over the full result list
    if opts.export {
        if state.records.is_empty() {
            warn!("Nothing to export - query={:?}", state.query);
        } else {
            let name = export_file_name(Some(&state.query), chrono::Utc::now().date_naive());
            let path = out_dir.join(name);
            write_xlsx(&path, &to_rows(&state.records))?;
            info!("Workbook written - path={}, rows={}", path.display(), state.records.len());
            report.workbook = Some(path);
        }
    }

    // 5) analytics
    if opts.analytics {
        state.apply(Action::ShowAnalytics(true));
        if state.show_analytics {
            let analytics = Analytics::from_records(&state.records);
            write_analytics(out_dir, &state.query, &state.snapshot_id(), &analytics)?;
            std::fs::write(out_dir.join("analytics.md"), render_analytics_summary(&analytics))
                .context("write analytics.md")?;
            report.analytics_dir = Some(out_dir.clone());
        } else {
            warn!("No data to chart - query={:?}", state.query);
            std::fs::write(out_dir.join("analytics.md"), render_analytics_summary(&Analytics::default()))
                .context("write analytics.md")?;
        }
    }

    info!(
        "Session completed - duration={:.2}s, status={:?}, records={}",
        session_start.elapsed().as_secs_f32(),
        state.status(),
        state.records.len()
    );
    Ok(report)
}
