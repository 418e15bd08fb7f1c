use std::fmt;

use serde::Serialize;

/// Pricing tiers, ordered by ascending mileage ceiling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum SegmentName {
    SS,
    S,
    A,
    B,
    C,
    D,
    E,
}

impl SegmentName {
    pub fn as_str(self) -> &'static str {
        match self {
            SegmentName::SS => "SS",
            SegmentName::S => "S",
            SegmentName::A => "A",
            SegmentName::B => "B",
            SegmentName::C => "C",
            SegmentName::D => "D",
            SegmentName::E => "E",
        }
    }
}

impl fmt::Display for SegmentName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// (name, max mileage km, max price zł), ascending by mileage.
const SEGMENT_TABLE: [(SegmentName, u32, u32); 7] = [
    (SegmentName::SS, 1_000, 110_000),
    (SegmentName::S, 40_000, 95_000),
    (SegmentName::A, 90_000, 80_000),
    (SegmentName::B, 150_000, 65_000),
    (SegmentName::C, 220_000, 50_000),
    (SegmentName::D, 280_000, 40_000),
    (SegmentName::E, 350_000, 30_000),
];

/// One pricing tier plus the prices observed for it during a run.
#[derive(Debug, Clone)]
pub struct Segment {
    name: SegmentName,
    max_mileage: u32,
    max_price: u32,
    observed_prices: Vec<u32>,
    matched: bool,
}

impl Segment {
    fn new(name: SegmentName, max_mileage: u32, max_price: u32) -> Self {
        Self {
            name,
            max_mileage,
            max_price,
            observed_prices: Vec::new(),
            matched: false,
        }
    }

    pub fn name(&self) -> SegmentName {
        self.name
    }

    pub fn max_mileage(&self) -> u32 {
        self.max_mileage
    }

    pub fn max_price(&self) -> u32 {
        self.max_price
    }

    /// Prices in discovery order.
    pub fn observed_prices(&self) -> &[u32] {
        &self.observed_prices
    }

    pub fn matched(&self) -> bool {
        self.matched
    }

    pub(crate) fn push_price(&mut self, price: u32) {
        self.observed_prices.push(price);
    }

    /// One-way: there is no way to clear the flag within a run.
    pub(crate) fn mark_matched(&mut self) {
        self.matched = true;
    }
}

/// The seven segments for a single run. Construct one per run; never share.
#[derive(Debug, Clone)]
pub struct Catalog {
    segments: Vec<Segment>,
}

impl Catalog {
    pub fn new() -> Self {
        Self {
            segments: SEGMENT_TABLE
                .iter()
                .map(|&(name, max_mileage, max_price)| Segment::new(name, max_mileage, max_price))
                .collect(),
        }
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    pub(crate) fn segments_mut(&mut self) -> &mut [Segment] {
        &mut self.segments
    }

    pub fn get(&self, name: SegmentName) -> Option<&Segment> {
        self.segments.iter().find(|s| s.name == name)
    }
}

impl Default for Catalog {
    fn default() -> Self {
        Self::new()
    }
}
