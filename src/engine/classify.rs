use super::catalog::{Catalog, Segment};
use crate::error::ListingError;

/// First segment (ascending ceiling) whose `max_mileage` covers `mileage`.
pub fn classify(mileage: u32, catalog: &mut Catalog) -> Result<&mut Segment, ListingError> {
    catalog
        .segments_mut()
        .iter_mut()
        .find(|s| mileage <= s.max_mileage())
        .ok_or(ListingError::ClassificationMiss { mileage })
}

pub fn record_observation(segment: &mut Segment, price: u32) {
    segment.push_price(price);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::catalog::SegmentName;

    fn name_for(mileage: u32) -> Option<SegmentName> {
        let mut catalog = Catalog::new();
        classify(mileage, &mut catalog).ok().map(|s| s.name())
    }

    #[test]
    fn boundaries_are_inclusive() {
        assert_eq!(name_for(0), Some(SegmentName::SS));
        assert_eq!(name_for(1_000), Some(SegmentName::SS));
        assert_eq!(name_for(1_001), Some(SegmentName::S));
        assert_eq!(name_for(90_000), Some(SegmentName::A));
        assert_eq!(name_for(150_001), Some(SegmentName::C));
        assert_eq!(name_for(350_000), Some(SegmentName::E));
    }

    #[test]
    fn smallest_covering_ceiling_wins() {
        let catalog = Catalog::new();
        for m in (0..=400_000).step_by(2_500) {
            let expected = catalog
                .segments()
                .iter()
                .filter(|s| s.max_mileage() >= m)
                .min_by_key(|s| s.max_mileage())
                .map(|s| s.name());
            assert_eq!(name_for(m), expected, "mileage {m}");
        }
    }

    #[test]
    fn beyond_last_ceiling_is_a_miss() {
        let mut catalog = Catalog::new();
        assert_eq!(
            classify(350_001, &mut catalog).unwrap_err(),
            ListingError::ClassificationMiss { mileage: 350_001 }
        );
        assert!(catalog
            .segments()
            .iter()
            .all(|s| s.observed_prices().is_empty()));
    }

    #[test]
    fn observations_keep_discovery_order() {
        let mut catalog = Catalog::new();
        for price in [70_000, 60_000, 70_000] {
            let segment = classify(120_000, &mut catalog).unwrap();
            record_observation(segment, price);
        }
        let b = catalog.get(SegmentName::B).unwrap();
        assert_eq!(b.observed_prices(), &[70_000, 60_000, 70_000]);
        assert!(!b.matched());
    }
}
