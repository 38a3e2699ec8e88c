//! Bounded download pipeline.
//!
//! All pages of an issue are fed through `buffer_unordered(PAGE_CONCURRENCY)`,
//! which gives the same admission semantics as the site's informal limit
//! (at most 4 requests in flight) while keeping every page's result
//! observable: failures are aggregated into the returned summary instead of
//! being lost inside a worker.

pub mod crypto;
pub mod error;
pub mod ordinal;
mod page;

use std::io::IsTerminal;
use std::path::Path;

use futures_util::stream::{self, StreamExt};
use indicatif::{ProgressBar, ProgressStyle};
use tokio_util::sync::CancellationToken;

use crate::api::proto::ViewerPage;
use crate::api::FuzClient;
use error::PageOutcome;

/// Admission window: number of page fetches allowed in flight at once.
pub const PAGE_CONCURRENCY: usize = 4;

/// Per-issue batch result. `failed > 0` means the run should exit non-zero
/// with a re-run hint; skips are informational.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct DownloadSummary {
    pub downloaded: usize,
    pub already_present: usize,
    pub skipped: usize,
    pub failed: usize,
}

fn create_progress_bar(total: u64) -> ProgressBar {
    if !std::io::stdout().is_terminal() {
        return ProgressBar::hidden();
    }
    let pb = ProgressBar::new(total);
    pb.set_style(
        ProgressStyle::with_template(
            "[{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({eta}) {msg}",
        )
        .expect("valid template")
        .progress_chars("=> "),
    );
    pb
}

/// Download every page of an issue into `dir`, blocking until all pages have
/// completed or been skipped. Completion order is unordered; the decoded
/// ordinal filename restores page order on disk.
pub async fn download_pages(
    client: &FuzClient,
    dir: &Path,
    pages: &[ViewerPage],
    overwrite: bool,
    shutdown: CancellationToken,
) -> std::io::Result<DownloadSummary> {
    tokio::fs::create_dir_all(dir).await?;

    let pb = create_progress_bar(pages.len() as u64);
    let mut summary = DownloadSummary::default();

    let results = stream::iter(pages.iter().enumerate())
        .take_while(|_| std::future::ready(!shutdown.is_cancelled()))
        .map(|(index, viewer_page)| async move {
            let outcome = match &viewer_page.image {
                Some(image) => page::download_page(client, dir, image, overwrite).await,
                None => Ok(PageOutcome::MissingUrl),
            };
            (index, outcome)
        })
        .buffer_unordered(PAGE_CONCURRENCY);

    tokio::pin!(results);

    while let Some((index, result)) = results.next().await {
        match result {
            Ok(PageOutcome::Downloaded) => summary.downloaded += 1,
            Ok(PageOutcome::AlreadyExists) => {
                summary.already_present += 1;
                pb.suspend(|| tracing::debug!(page = index, "already on disk, skipping"));
            }
            Ok(PageOutcome::MissingUrl) => {
                summary.skipped += 1;
                pb.suspend(|| tracing::warn!(page = index, "no image URL, skipping"));
            }
            Ok(PageOutcome::UnrecognizedUrl) => {
                summary.skipped += 1;
                pb.suspend(|| {
                    tracing::warn!(page = index, "image URL has no filename token, skipping")
                });
            }
            Err(e) => {
                summary.failed += 1;
                pb.suspend(|| tracing::error!(page = index, "page failed: {}", e));
            }
        }
        pb.inc(1);
    }

    pb.finish_and_clear();

    if shutdown.is_cancelled() {
        tracing::info!("Shutdown requested, stopped admitting new pages");
    }
    Ok(summary)
}
