use async_trait::async_trait;

use rateshop_core::ServiceTier;

use crate::scorer::Scorer;
use crate::types::{RatedShipment, SavingsQuery};

/// Scores candidates by savings on a log scale, with a service-tier
/// multiplier and a confidence weight.
///
/// Faster tiers get a boost: a dollar saved on an overnight label
/// usually indicates a bigger negotiable lane than a dollar on ground.
/// Rows on the fallback zone are down-weighted since their quote may
/// have used the wrong zone column.
pub struct SavingsScorer;

impl SavingsScorer {
    fn tier_multiplier(tier: ServiceTier) -> f64 {
        match tier {
            ServiceTier::Priority => 1.3,
            ServiceTier::Expedited => 1.15,
            ServiceTier::Ground => 1.0,
        }
    }
}

#[async_trait]
impl Scorer<SavingsQuery, RatedShipment> for SavingsScorer {
    async fn score(
        &self,
        _query: &SavingsQuery,
        candidates: &[RatedShipment],
    ) -> Result<Vec<RatedShipment>, String> {
        let scored = candidates
            .iter()
            .map(|c| {
                let savings = c.savings().unwrap_or(0.0);
                let base_score = (savings.max(0.0) + 1.0).ln(); // log scale, +1 to handle $0
                let confidence = if c.zone_defaulted { 0.7 } else { 1.0 };

                RatedShipment {
                    priority_score: Some(
                        base_score * Self::tier_multiplier(c.tier) * confidence,
                    ),
                    ..RatedShipment::default()
                }
            })
            .collect();

        Ok(scored)
    }

    fn update(&self, candidate: &mut RatedShipment, scored: RatedShipment) {
        candidate.priority_score = scored.priority_score;
    }
}
