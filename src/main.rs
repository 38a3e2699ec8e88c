//! fuzdl — downloads purchased magazine issues from the Comic-Fuz store.
//!
//! Talks to the store's protobuf-over-HTTPS API, decrypts each page with its
//! per-page AES key, and writes issues as ordered image files (optionally
//! zipped). An update mode compares the store listing against a saved
//! snapshot and fetches only what's new.

#![warn(clippy::all)]

mod api;
mod archive;
mod auth;
mod catalog;
mod cli;
mod config;
mod download;
mod issue;
mod shutdown;
mod updates;

use std::time::Duration;

use anyhow::Context;
use clap::Parser;
use rand::Rng;
use tokio_util::sync::CancellationToken;
use tracing_subscriber::EnvFilter;

use api::FuzClient;
use config::Config;

/// Download one issue end to end: resolve, record provenance, fetch pages,
/// and (when requested) archive the finished directory.
async fn download_issue(
    client: &FuzClient,
    config: &Config,
    issue_id: u32,
    shutdown: &CancellationToken,
) -> anyhow::Result<()> {
    let resolved = issue::resolve(client, issue_id)
        .await
        .with_context(|| format!("could not fetch issue {issue_id}; check the id or retry later"))?;

    let issue_dir = resolved.issue_dir(&config.output_dir);
    tracing::info!(
        magazine = %resolved.magazine_name,
        issue = %resolved.issue_label,
        pages = resolved.response.pages.len(),
        "Downloading issue"
    );

    issue::write_provenance(&issue_dir, &resolved.response).await?;

    let summary = download_pages_for(client, config, &resolved, shutdown).await?;
    tracing::info!(
        downloaded = summary.downloaded,
        already_present = summary.already_present,
        skipped = summary.skipped,
        failed = summary.failed,
        "Issue finished"
    );

    if summary.failed > 0 {
        anyhow::bail!(
            "{} of {} pages failed for issue {issue_id}; re-run the same command to resume",
            summary.failed,
            resolved.response.pages.len(),
        );
    }

    if shutdown.is_cancelled() {
        tracing::info!("Interrupted, leaving issue unarchived");
        return Ok(());
    }

    if config.compress {
        let zip_path = resolved.zip_path(&config.output_dir);
        tracing::info!(zip = %zip_path.display(), "Archiving issue");
        tokio::task::spawn_blocking(move || archive::archive_issue(&issue_dir, &zip_path))
            .await
            .context("archive task panicked")??;
    }

    Ok(())
}

async fn download_pages_for(
    client: &FuzClient,
    config: &Config,
    resolved: &issue::ResolvedIssue,
    shutdown: &CancellationToken,
) -> anyhow::Result<download::DownloadSummary> {
    let issue_dir = resolved.issue_dir(&config.output_dir);
    let summary = download::download_pages(
        client,
        &issue_dir,
        &resolved.response.pages,
        config.overwrite,
        shutdown.clone(),
    )
    .await?;
    Ok(summary)
}

/// Random pause between issues so batch runs don't hammer the store.
async fn inter_issue_delay(shutdown: &CancellationToken) {
    let secs = rand::rng().random_range(10..=20);
    tracing::info!("Waiting {secs}s before the next issue");
    tokio::select! {
        _ = tokio::time::sleep(Duration::from_secs(secs)) => {}
        _ = shutdown.cancelled() => {}
    }
}

/// Download an explicit list of issue ids, sequentially.
async fn run_downloads(
    client: &FuzClient,
    config: &Config,
    ids: &[u32],
    shutdown: &CancellationToken,
) -> anyhow::Result<()> {
    for (i, &id) in ids.iter().enumerate() {
        if shutdown.is_cancelled() {
            tracing::info!("Interrupted, skipping remaining issues");
            break;
        }
        if i > 0 {
            inter_issue_delay(shutdown).await;
        }
        download_issue(client, config, id, shutdown).await?;
    }
    Ok(())
}

/// Compare the store listing against the saved snapshot and download only
/// issues newer than the latest recorded id. The snapshot is rewritten only
/// once every new issue has downloaded, so an interrupted run retries.
async fn run_check_update(
    client: &FuzClient,
    config: &Config,
    shutdown: &CancellationToken,
) -> anyhow::Result<()> {
    let catalog = catalog::list_issues(client, &config.magazine_filter)
        .await
        .context("could not fetch the store listing")?;
    let store = updates::UpdateStore::new(config.state_file.clone());
    let known = store.load()?;

    if known.is_empty() {
        store.save(&catalog)?;
        tracing::info!(
            issues = catalog.len(),
            "First run: recorded the current listing as the baseline; nothing downloaded"
        );
        return Ok(());
    }

    let new_ids = updates::select_new(&catalog, &known);
    if new_ids.is_empty() {
        tracing::info!("No new issues");
        return Ok(());
    }

    tracing::info!(count = new_ids.len(), "Found new issues: {:?}", new_ids);
    run_downloads(client, config, &new_ids, shutdown).await?;

    if shutdown.is_cancelled() {
        tracing::info!("Interrupted, keeping the previous snapshot");
        return Ok(());
    }
    store.save(&catalog)?;
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = cli::Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(cli.log_level.as_filter())),
        )
        .init();

    let config = Config::from_cli(cli)?;
    tokio::fs::create_dir_all(&config.output_dir)
        .await
        .with_context(|| {
            format!("could not create output directory {}", config.output_dir.display())
        })?;

    let mut client = FuzClient::new(&config.api_host, &config.img_host, config.proxy.as_deref())?;
    auth::acquire(&mut client, &config)
        .await
        .context("authentication failed")?;

    let shutdown = shutdown::install_signal_handler();

    if config.check_update {
        run_check_update(&client, &config, &shutdown).await
    } else if !config.issues.is_empty() {
        run_downloads(&client, &config, &config.issues, &shutdown).await
    } else {
        anyhow::bail!("no issue id given and update mode is disabled; pass an issue id or --check-update")
    }
}
