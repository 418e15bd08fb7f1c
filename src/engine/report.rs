use std::fmt;

use chrono::NaiveDate;
use serde::Serialize;

use super::catalog::{Catalog, SegmentName};

/// Persisted per-segment record for one run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RunSummary {
    pub date: NaiveDate,
    pub segment: SegmentName,
    pub average_price: u32,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SegmentLine {
    NoOffers {
        segment: SegmentName,
    },
    Stats {
        segment: SegmentName,
        min: u32,
        max: u32,
        matched: bool,
        average: u32,
    },
}

impl fmt::Display for SegmentLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SegmentLine::NoOffers { segment } => write!(f, "Segment {}: no offers", segment),
            SegmentLine::Stats {
                segment,
                min,
                max,
                matched,
                ..
            } => {
                let status = if *matched {
                    "found a car within budget"
                } else {
                    "no cars within budget"
                };
                write!(f, "Segment {}: min {} zł, max {} zł — {}", segment, min, max, status)
            }
        }
    }
}

/// End-of-run view of a catalog, one line per segment in catalog order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Report {
    pub lines: Vec<SegmentLine>,
}

impl Report {
    /// Records for segments with at least one observation.
    pub fn summaries(&self, date: NaiveDate) -> Vec<RunSummary> {
        self.lines
            .iter()
            .filter_map(|line| match line {
                SegmentLine::Stats {
                    segment, average, ..
                } => Some(RunSummary {
                    date,
                    segment: *segment,
                    average_price: *average,
                }),
                SegmentLine::NoOffers { .. } => None,
            })
            .collect()
    }
}

pub fn summarize(catalog: &Catalog) -> Report {
    let lines = catalog
        .segments()
        .iter()
        .map(|s| {
            let prices = s.observed_prices();
            let Some(&first) = prices.first() else {
                return SegmentLine::NoOffers { segment: s.name() };
            };
            let (mut min, mut max) = (first, first);
            for &p in prices {
                if p < min {
                    min = p;
                }
                if p > max {
                    max = p;
                }
            }
            SegmentLine::Stats {
                segment: s.name(),
                min,
                max,
                matched: s.matched(),
                average: floor_average(prices),
            }
        })
        .collect();
    Report { lines }
}

fn floor_average(prices: &[u32]) -> u32 {
    let sum: u64 = prices.iter().map(|&p| u64::from(p)).sum();
    // mean of u32 values always fits in u32
    (sum / prices.len() as u64) as u32
}
