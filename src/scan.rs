use std::sync::Arc;

use anyhow::Result;
use chrono::NaiveDate;
use indicatif::{ProgressBar, ProgressStyle};
use serde::Serialize;
use tokio::sync::Semaphore;
use tracing::{info, warn};

use crate::engine::report::{Report, RunSummary};
use crate::engine::{Run, RunStats};
use crate::fetch;
use crate::notify::Notifier;
use crate::source::Source;
use crate::store::SummaryStore;
use crate::targets::Target;

pub const DEFAULT_CONCURRENCY: usize = 2;

/// Outcome of one target's run.
pub struct TargetResult {
    pub label: String,
    pub report: Report,
    pub stats: RunStats,
    pub fetch_error: Option<String>,
}

/// Totals over every scanned target.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct ScanTotals {
    pub targets: usize,
    pub failed: usize,
    pub listings: usize,
    pub discarded: usize,
    pub notified: usize,
    pub records: usize,
}

impl ScanTotals {
    fn add(&mut self, result: &TargetResult, records: usize) {
        self.targets += 1;
        if result.fetch_error.is_some() {
            self.failed += 1;
        }
        self.listings += result.stats.seen;
        self.discarded += result.stats.discarded;
        self.notified += result.stats.notified;
        self.records += records;
    }

    pub fn print(&self) {
        println!(
            "Scanned {} targets ({} failed): {} listings, {} discarded, {} alerts, {} records saved.",
            self.targets, self.failed, self.listings, self.discarded, self.notified, self.records
        );
    }
}

#[derive(Serialize)]
struct JsonRecord<'a> {
    target: &'a str,
    #[serde(flatten)]
    summary: &'a RunSummary,
}

pub struct ScanOptions {
    pub concurrency: usize,
    pub date: NaiveDate,
    pub json: bool,
}

/// Scan targets concurrently, each with its own catalog. Reports are
/// printed and summaries stored as each target finishes.
pub async fn scan_all(
    targets: Vec<Target>,
    opts: &ScanOptions,
    notifier: Arc<dyn Notifier>,
    store: &mut dyn SummaryStore,
) -> Result<ScanTotals> {
    let client = fetch::client()?;
    let semaphore = Arc::new(Semaphore::new(opts.concurrency.max(1)));

    let pb = ProgressBar::new(targets.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("[{elapsed_precise}] {bar:40} {pos}/{len} {msg}")?
            .progress_chars("=> "),
    );

    let (tx, mut rx) = tokio::sync::mpsc::channel::<TargetResult>(targets.len().max(1));

    for target in targets {
        let client = client.clone();
        let sem = Arc::clone(&semaphore);
        let notifier = Arc::clone(&notifier);
        let tx = tx.clone();

        tokio::spawn(async move {
            let Ok(_permit) = sem.acquire().await else {
                return;
            };
            let result = scan_target(&client, &target, notifier.as_ref()).await;
            let _ = tx.send(result).await;
        });
    }

    // rx closes once every task has dropped its sender
    drop(tx);

    let mut totals = ScanTotals::default();
    while let Some(result) = rx.recv().await {
        pb.set_message(result.label.clone());
        print_report(&pb, &result);

        let summaries = result.report.summaries(opts.date);
        if opts.json {
            for summary in &summaries {
                let record = JsonRecord {
                    target: &result.label,
                    summary,
                };
                pb.println(serde_json::to_string(&record)?);
            }
        }
        let saved = match store.append(&result.label, &summaries) {
            Ok(()) => summaries.len(),
            Err(e) => {
                warn!("Failed to save results for {}: {:#}", result.label, e);
                0
            }
        };

        totals.add(&result, saved);
        pb.inc(1);
    }

    pb.finish_and_clear();
    info!(
        "Scanned {} targets ({} failed)",
        totals.targets, totals.failed
    );
    Ok(totals)
}

/// Fetch one target's page and run every listing through a fresh catalog.
/// A fetch failure still produces a (listing-free) report.
pub async fn scan_target(
    client: &reqwest::Client,
    target: &Target,
    notifier: &dyn Notifier,
) -> TargetResult {
    info!("Scanning {} ({})", target.label, target.source);
    let page = fetch::fetch_page(client, &target.url).await;

    let mut run = Run::new(target.label.as_str(), target.source.base_url(), notifier);
    let fetch_error = match page {
        Ok(html) => {
            feed(&mut run, target.source, &html);
            None
        }
        Err(e) => {
            warn!("Failed to fetch {}: {}", target.label, e);
            Some(e.to_string())
        }
    };

    let (report, stats) = run.finish();
    info!(
        "Finished {}: {} listings ({} classified, {} discarded)",
        target.label, stats.seen, stats.observed, stats.discarded
    );
    TargetResult {
        label: target.label.clone(),
        report,
        stats,
        fetch_error,
    }
}

fn feed(run: &mut Run<'_>, source: Source, html: &str) {
    for listing in source.listings(html) {
        run.ingest(&listing);
    }
}

fn print_report(pb: &ProgressBar, result: &TargetResult) {
    pb.println(format!("\nSummary [{}]:", result.label));
    if let Some(e) = &result.fetch_error {
        pb.println(format!("Fetch failed: {}", e));
    }
    for line in &result.report.lines {
        pb.println(line.to_string());
    }
    pb.println("-".repeat(50));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::report::SegmentLine;
    use crate::notify::RecordingNotifier;

    struct MemoryStore(Vec<(String, RunSummary)>);

    impl SummaryStore for MemoryStore {
        fn append(&mut self, target: &str, records: &[RunSummary]) -> Result<()> {
            self.0
                .extend(records.iter().map(|r| (target.to_string(), r.clone())));
            Ok(())
        }
    }

    fn blocked_target(label: &str) -> Target {
        Target {
            label: label.to_string(),
            url: "https://example.com/cars".to_string(),
            source: Source::Otomoto,
        }
    }

    #[tokio::test]
    async fn failed_fetch_still_reports() {
        let client = fetch::client().unwrap();
        let notifier = RecordingNotifier::default();
        let result = scan_target(&client, &blocked_target("blocked"), &notifier).await;

        assert!(result.fetch_error.unwrap().contains("domain not allowed"));
        assert_eq!(result.stats, RunStats::default());
        assert_eq!(result.report.lines.len(), 7);
        assert!(result
            .report
            .lines
            .iter()
            .all(|l| matches!(l, SegmentLine::NoOffers { .. })));
    }

    #[tokio::test]
    async fn failures_are_isolated_per_target() {
        let mut store = MemoryStore(Vec::new());
        let opts = ScanOptions {
            concurrency: 2,
            date: NaiveDate::from_ymd_opt(2025, 5, 14).unwrap(),
            json: false,
        };
        let targets = vec![blocked_target("a"), blocked_target("b"), blocked_target("c")];
        let totals = scan_all(targets, &opts, Arc::new(RecordingNotifier::default()), &mut store)
            .await
            .unwrap();

        assert_eq!(totals.targets, 3);
        assert_eq!(totals.failed, 3);
        assert_eq!(totals.records, 0);
        assert!(store.0.is_empty());
    }

    #[test]
    fn feed_runs_listings_in_document_order() {
        let html = r#"
            <article data-id="1"><h3>70 000 PLN</h3><dd>120 000 km</dd><a href="/o/1">1</a></article>
            <article data-id="2"><h3>60 000 PLN</h3><dd>125 000 km</dd><a href="/o/2">2</a></article>
            <article data-id="3"><h3>59 000 PLN</h3><dd>126 000 km</dd><a href="/o/3">3</a></article>
        "#;
        let notifier = RecordingNotifier::default();
        let mut run = Run::new("Citroen Berlingo otomoto", Source::Otomoto.base_url(), &notifier);
        feed(&mut run, Source::Otomoto, html);

        let alerts = notifier.alerts();
        assert_eq!(alerts.len(), 1);
        assert_eq!(alerts[0].link, "https://www.otomoto.pl/o/2");

        let (report, stats) = run.finish();
        assert_eq!(stats.observed, 3);
        let date = NaiveDate::from_ymd_opt(2025, 5, 14).unwrap();
        assert_eq!(report.summaries(date)[0].average_price, 63_000);
    }
}
