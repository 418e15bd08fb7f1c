use super::catalog::{Segment, SegmentName};

/// Segments whose first match is worth an alert.
const NOTIFY_SEGMENTS: &[SegmentName] = &[SegmentName::B, SegmentName::C];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Verdict {
    pub within_budget: bool,
    pub first_match: bool,
}

/// Budget check plus edge trigger. Sets `matched` on the first in-budget
/// listing of the segment; later calls never report `first_match` again.
pub fn evaluate(segment: &mut Segment, mileage: u32, price: u32) -> Verdict {
    let within_budget = mileage <= segment.max_mileage() && price <= segment.max_price();
    let first_match = within_budget && !segment.matched();
    if first_match {
        segment.mark_matched();
    }
    Verdict {
        within_budget,
        first_match,
    }
}

pub fn notifies(name: SegmentName) -> bool {
    NOTIFY_SEGMENTS.contains(&name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::catalog::Catalog;
    use crate::engine::classify::classify;

    #[test]
    fn first_in_budget_listing_matches_once() {
        let mut catalog = Catalog::new();
        let b = classify(120_000, &mut catalog).unwrap();

        let over = evaluate(b, 120_000, 70_000);
        assert_eq!(
            over,
            Verdict {
                within_budget: false,
                first_match: false
            }
        );
        assert!(!b.matched());

        let first = evaluate(b, 120_000, 60_000);
        assert!(first.within_budget && first.first_match);
        assert!(b.matched());

        let again = evaluate(b, 130_000, 55_000);
        assert!(again.within_budget);
        assert!(!again.first_match);
    }

    #[test]
    fn matched_never_resets() {
        let mut catalog = Catalog::new();
        let c = classify(160_000, &mut catalog).unwrap();
        evaluate(c, 160_000, 50_000);
        evaluate(c, 160_000, 99_000);
        assert!(c.matched());
    }

    #[test]
    fn budget_ceiling_is_inclusive() {
        let mut catalog = Catalog::new();
        let c = classify(220_000, &mut catalog).unwrap();
        assert!(evaluate(c, 220_000, 50_000).within_budget);
    }

    #[test]
    fn only_b_and_c_notify() {
        let notifying: Vec<_> = Catalog::new()
            .segments()
            .iter()
            .map(|s| s.name())
            .filter(|&n| notifies(n))
            .collect();
        assert_eq!(notifying, vec![SegmentName::B, SegmentName::C]);
    }
}
