use crate::selector::Selector;
use crate::types::{RatedShipment, SavingsQuery};

/// Selects the top K candidates by priority score.
pub struct TopSavingsSelector {
    pub k: usize,
}

impl Default for TopSavingsSelector {
    fn default() -> Self {
        Self { k: 5 }
    }
}

impl Selector<SavingsQuery, RatedShipment> for TopSavingsSelector {
    fn score(&self, candidate: &RatedShipment) -> f64 {
        candidate.priority_score.unwrap_or(f64::NEG_INFINITY)
    }

    fn size(&self) -> Option<usize> {
        Some(self.k)
    }
}
