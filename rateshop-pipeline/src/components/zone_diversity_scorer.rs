use async_trait::async_trait;
use std::cmp::Ordering;
use std::collections::HashMap;

use crate::scorer::Scorer;
use crate::types::{RatedShipment, SavingsQuery};

/// Attenuates scores for repeated zones, ensuring the digest covers
/// multiple lanes instead of all savings from one corridor.
///
/// Candidates are sorted by current priority score, then each
/// subsequent appearance of the same zone is attenuated by
/// `decay_factor^position`, down to `floor`.
pub struct ZoneDiversityScorer {
    pub decay_factor: f64,
    pub floor: f64,
}

impl Default for ZoneDiversityScorer {
    fn default() -> Self {
        Self {
            decay_factor: 0.7,
            floor: 0.1,
        }
    }
}

impl ZoneDiversityScorer {
    fn multiplier(&self, position: usize) -> f64 {
        (1.0 - self.floor) * self.decay_factor.powf(position as f64) + self.floor
    }
}

#[async_trait]
impl Scorer<SavingsQuery, RatedShipment> for ZoneDiversityScorer {
    async fn score(
        &self,
        _query: &SavingsQuery,
        candidates: &[RatedShipment],
    ) -> Result<Vec<RatedShipment>, String> {
        let mut zone_counts: HashMap<u8, usize> = HashMap::new();
        let mut scored = vec![RatedShipment::default(); candidates.len()];

        // Sort by current priority score descending.
        let mut ordered: Vec<(usize, &RatedShipment)> =
            candidates.iter().enumerate().collect();
        ordered.sort_by(|(_, a), (_, b)| {
            let a_score = a.priority_score.unwrap_or(f64::NEG_INFINITY);
            let b_score = b.priority_score.unwrap_or(f64::NEG_INFINITY);
            b_score.partial_cmp(&a_score).unwrap_or(Ordering::Equal)
        });

        for (original_idx, candidate) in ordered {
            let entry = zone_counts.entry(candidate.zone.get()).or_insert(0);
            let position = *entry;
            *entry += 1;

            let multiplier = self.multiplier(position);
            let adjusted = candidate.priority_score.map(|s| s * multiplier);

            scored[original_idx] = RatedShipment {
                priority_score: adjusted,
                ..RatedShipment::default()
            };
        }

        Ok(scored)
    }

    fn update(&self, candidate: &mut RatedShipment, scored: RatedShipment) {
        candidate.priority_score = scored.priority_score;
    }
}
