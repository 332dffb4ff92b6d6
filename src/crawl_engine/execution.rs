//! Harvest execution
//!
//! One run, start to finish:
//! 1. load the identity store from the master file (and skip ledger)
//! 2. collect the frontier on a single primary page
//! 3. extract each new identifier sequentially on that same page
//! 4. write the run file and fold it into master
//! 5. finalize the identity store
//!
//! A crash before step 4 loses only the current run: nothing is persisted
//! until the batch is complete.

use tracing::info;

use super::crawl_types::CrawlResult;
use super::frontier::collect_frontier;
use super::progress::{LogProgress, ProgressReporter};
use crate::config::HarvestConfig;
use crate::content_saver::{CsvRecordStore, write_run_and_merge};
use crate::identity_store::IdentityStore;
use crate::page_extractor::extract_item;
use crate::surface::{ChromiumSession, RenderPage, RenderSession};

/// Counters of one completed run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct HarvestSummary {
    pub pages_visited: usize,
    pub pages_failed: usize,
    /// New identifiers collected this run
    pub discovered: usize,
    /// Records produced
    pub extracted: usize,
    /// Identifiers whose detail page could not be loaded
    pub skipped: usize,
    /// Rows newly appended to master
    pub appended: usize,
    /// Rows in master after the run
    pub master_rows: usize,
}

/// Run one harvest against an already running session.
///
/// # Errors
/// Fails if the record stores cannot be read or written, or if the primary
/// page cannot be opened. Per-page and per-item failures are absorbed.
pub async fn harvest_with<S, R>(
    session: &S,
    config: &HarvestConfig,
    progress: &R,
) -> CrawlResult<HarvestSummary>
where
    S: RenderSession,
    R: ProgressReporter + ?Sized,
{
    let run_store = CsvRecordStore::new(config.run_path());
    let master_store = CsvRecordStore::new(config.master_path());

    let mut identity =
        IdentityStore::load(&master_store, config.ledger_path(), config.identity_policy())?;
    let pacer = config.pacer();

    let page = session.new_page().await?;

    let frontier = collect_frontier(&page, &mut identity, config, &pacer, progress).await;
    let total = frontier.identifiers.len();

    let mut records = Vec::with_capacity(total);
    let mut skipped = 0;
    for (index, identifier) in frontier.identifiers.iter().enumerate() {
        match extract_item(session, &page, identifier, config, &pacer).await {
            Ok(record) => {
                identity.mark_extracted(identifier.as_str());
                progress.report_item_extracted(index + 1, total, identifier.as_str());
                records.push(record);
            }
            Err(e) => {
                skipped += 1;
                progress.report_item_failed(index + 1, total, identifier.as_str(), &e.to_string());
            }
        }
    }

    page.close().await;

    let outcome = write_run_and_merge(&run_store, &master_store, &records)?;
    identity.finalize()?;

    let summary = HarvestSummary {
        pages_visited: frontier.pages_visited,
        pages_failed: frontier.pages_failed,
        discovered: total,
        extracted: records.len(),
        skipped,
        appended: outcome.appended,
        master_rows: outcome.master_rows,
    };
    progress.report_completed(summary.extracted, summary.appended);
    info!(?summary, "Harvest finished");
    Ok(summary)
}

/// Launch Chromium, run one harvest with log-based progress, shut down.
///
/// The browser is shut down whether or not the run succeeded.
pub async fn harvest(config: &HarvestConfig) -> CrawlResult<HarvestSummary> {
    info!(
        search_url = %config.search_url(),
        output_dir = %config.output_dir().display(),
        quota = config.quota(),
        "Starting harvest"
    );

    let session = ChromiumSession::launch(&config.launch_options()).await?;
    let result = harvest_with(&session, config, &LogProgress).await;
    session.shutdown().await;
    result
}
