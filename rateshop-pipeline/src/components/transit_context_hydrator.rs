use async_trait::async_trait;

use crate::hydrator::Hydrator;
use crate::types::{RatedShipment, SavingsQuery};

/// Hydrates candidates with an urgency signal derived from the lane.
///
/// Cross-country lanes (zones 5+) are where a carrier switch changes
/// transit time the most, so they get the highest urgency. Rows whose
/// zone was the unmapped-destination fallback get a low urgency since
/// the lane itself is uncertain.
pub struct TransitContextHydrator;

#[async_trait]
impl Hydrator<SavingsQuery, RatedShipment> for TransitContextHydrator {
    async fn hydrate(
        &self,
        _query: &SavingsQuery,
        candidates: &[RatedShipment],
    ) -> Result<Vec<RatedShipment>, String> {
        let hydrated = candidates
            .iter()
            .map(|c| {
                let urgency = if c.zone_defaulted {
                    Some(0.2)
                } else if c.zone.is_regional() {
                    Some(0.5)
                } else {
                    Some(0.9)
                };
                RatedShipment {
                    urgency_score: urgency,
                    ..RatedShipment::default()
                }
            })
            .collect();
        Ok(hydrated)
    }

    fn update(&self, candidate: &mut RatedShipment, hydrated: RatedShipment) {
        candidate.urgency_score = hydrated.urgency_score;
    }
}
