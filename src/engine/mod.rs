pub mod catalog;
pub mod classify;
pub mod extract;
pub mod policy;
pub mod report;

use tracing::{debug, warn};

use crate::error::ListingError;
use crate::notify::{Alert, Notifier};
use catalog::{Catalog, SegmentName};
use policy::Verdict;
use report::Report;

/// Text fragments isolated from one listing card.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawListing {
    pub price_text: String,
    pub mileage_text: String,
    pub link: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Discarded(ListingError),
    Observed {
        segment: SegmentName,
        verdict: Verdict,
        notified: bool,
    },
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunStats {
    pub seen: usize,
    pub observed: usize,
    pub discarded: usize,
    pub notified: usize,
}

/// One scan of one target. Owns a fresh catalog for its whole lifetime.
pub struct Run<'a> {
    label: String,
    base_url: &'a str,
    catalog: Catalog,
    notifier: &'a dyn Notifier,
    stats: RunStats,
}

impl<'a> Run<'a> {
    pub fn new(label: impl Into<String>, base_url: &'a str, notifier: &'a dyn Notifier) -> Self {
        Self {
            label: label.into(),
            base_url,
            catalog: Catalog::new(),
            notifier,
            stats: RunStats::default(),
        }
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// Feed one listing. Bad listings are logged and skipped, never fatal.
    pub fn ingest(&mut self, raw: &RawListing) -> Outcome {
        self.stats.seen += 1;
        match self.observe(raw) {
            Ok((segment, verdict, notified)) => {
                self.stats.observed += 1;
                if notified {
                    self.stats.notified += 1;
                }
                Outcome::Observed {
                    segment,
                    verdict,
                    notified,
                }
            }
            Err(e) => {
                self.stats.discarded += 1;
                warn!("[{}] discarding listing {}: {}", self.label, raw.link, e);
                Outcome::Discarded(e)
            }
        }
    }

    fn observe(&mut self, raw: &RawListing) -> Result<(SegmentName, Verdict, bool), ListingError> {
        let price = extract::parse_price(&raw.price_text)?;
        if price == 0 {
            return Err(ListingError::ZeroPrice {
                text: raw.price_text.clone(),
            });
        }
        let mileage = extract::parse_mileage(&raw.mileage_text)?;

        let segment = classify::classify(mileage, &mut self.catalog)?;
        classify::record_observation(segment, price);
        let verdict = policy::evaluate(segment, mileage, price);
        let name = segment.name();
        debug!(
            "[{}] {} zł, {} km -> segment {} (within budget: {})",
            self.label, price, mileage, name, verdict.within_budget
        );

        let notified = verdict.first_match && policy::notifies(name);
        if notified {
            self.notifier.notify(&Alert {
                link: normalize_link(&raw.link, self.base_url),
                price,
                mileage,
                segment: name,
                source_label: self.label.clone(),
            });
        }
        Ok((name, verdict, notified))
    }

    pub fn finish(self) -> (Report, RunStats) {
        (report::summarize(&self.catalog), self.stats)
    }
}

/// Prefix relative links with the site's base URL.
pub fn normalize_link(link: &str, base_url: &str) -> String {
    if link.starts_with("http") {
        link.to_string()
    } else if link.starts_with('/') || link.is_empty() {
        format!("{}{}", base_url, link)
    } else {
        format!("{}/{}", base_url, link)
    }
}
