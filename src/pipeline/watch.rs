// src/pipeline/watch.rs

//! Watch pipeline: fetch, extract, classify, diff, notify, persist.
//!
//! One cycle is strictly sequential. Fetch or parse failures abort the
//! cycle before any state mutation; a notify failure propagates before
//! the snapshot is saved, so the next cycle re-detects and re-announces
//! the same listings (at-least-once delivery).

use std::collections::{BTreeMap, BTreeSet};
use std::time::Duration;

use crate::error::Result;
use crate::models::{Config, Listing};
use crate::pipeline::classify::RelevanceFilter;
use crate::pipeline::diff::{DiffOutcome, detect_new};
use crate::pipeline::extract::extract;
use crate::pipeline::identity::identity_of;
use crate::services::fetch::SourceFetcher;
use crate::services::notify::Notifier;
use crate::storage::StateStore;

/// Summary of one watch cycle.
#[derive(Debug, Clone)]
pub struct CycleReport {
    /// Rows extracted from the source document
    pub extracted: usize,

    /// Rows surviving the open-flag and relevance filters
    pub relevant: usize,

    /// Diff outcome against the persisted snapshot
    pub outcome: DiffOutcome,

    /// Messages handed to the notifier
    pub messages_sent: usize,
}

/// Run one full cycle: fetch, extract, classify, diff, notify, persist.
pub async fn run_cycle(
    config: &Config,
    fetcher: &SourceFetcher,
    store: &dyn StateStore,
    notifier: &dyn Notifier,
) -> Result<CycleReport> {
    let raw = fetcher.fetch().await?;
    process_document(&raw, config, store, notifier).await
}

/// Run the pipeline on an already-fetched document.
pub async fn process_document(
    raw: &str,
    config: &Config,
    store: &dyn StateStore,
    notifier: &dyn Notifier,
) -> Result<CycleReport> {
    let extracted = extract(raw, &config.source)?;
    let total = extracted.len();

    // Closed or hidden postings are dropped before classification
    let filter = RelevanceFilter::from_config(&config.filter);
    let relevant: Vec<Listing> = extracted
        .into_iter()
        .filter(|listing| listing.is_open())
        .filter(|listing| filter.is_relevant(listing))
        .collect();

    log::info!(
        "Extracted {} rows, {} relevant after filtering",
        total,
        relevant.len()
    );

    apply_snapshot(&relevant, total, config, store, notifier).await
}

/// Diff the classified listings against stored state, notify, and persist.
async fn apply_snapshot(
    listings: &[Listing],
    extracted: usize,
    config: &Config,
    store: &dyn StateStore,
    notifier: &dyn Notifier,
) -> Result<CycleReport> {
    let mut by_identity: BTreeMap<String, &Listing> = BTreeMap::new();
    for listing in listings {
        by_identity.entry(identity_of(listing)).or_insert(listing);
    }
    let current: BTreeSet<String> = by_identity.keys().cloned().collect();

    let seen = store.load_seen().await?;
    let outcome = detect_new(&current, &seen);

    let mut messages_sent = 0;
    match &outcome {
        DiffOutcome::Baseline { count } => {
            log::info!("Baseline established with {} listings", count);
            if config.notify.announce_baseline {
                let text = format!(
                    "Now tracking {count} internship listings. New postings will be announced."
                );
                notifier.send(&text).await?;
                messages_sent += 1;
            }
        }

        DiffOutcome::Changes { new } if !new.is_empty() => {
            log::info!("{} new listings detected", new.len());

            let summary = config
                .notify
                .summary_template
                .replace("{count}", &new.len().to_string());
            notifier.send(&summary).await?;
            messages_sent += 1;

            let cap = config.notify.max_details;
            for id in new.iter().take(cap) {
                if let Some(listing) = by_identity.get(id) {
                    let detail = listing.format(&config.notify.detail_template);
                    notifier.send(&detail).await?;
                    messages_sent += 1;
                }
            }
            if new.len() > cap {
                log::info!(
                    "{} further new listings not detailed (cap {})",
                    new.len() - cap,
                    cap
                );
            }
        }

        DiffOutcome::Changes { .. } => {
            log::info!("No new listings");
        }
    }

    // Snapshot replacement, not union: ids absent this run drop out
    store.save_seen(&current).await?;

    Ok(CycleReport {
        extracted,
        relevant: listings.len(),
        outcome,
        messages_sent,
    })
}

/// Poll the source on a fixed interval, forever.
///
/// A failed cycle is logged and does not stop subsequent cycles.
pub async fn run_watch(
    config: &Config,
    fetcher: &SourceFetcher,
    store: &dyn StateStore,
    notifier: &dyn Notifier,
    interval: Duration,
) -> Result<()> {
    log::info!("Watching {} every {}s", fetcher.url(), interval.as_secs());

    loop {
        match run_cycle(config, fetcher, store, notifier).await {
            Ok(report) => log::info!(
                "Cycle complete: {} extracted, {} relevant, {} new, {} messages",
                report.extracted,
                report.relevant,
                report.outcome.new_count(),
                report.messages_sent
            ),
            Err(e) => log::error!("Cycle failed: {}", e),
        }

        tokio::time::sleep(interval).await;
    }
}
