use async_trait::async_trait;
use std::sync::Arc;

use rateshop_core::{RateCard, ZoneMap};

use crate::rater::rate_batch;
use crate::shipment_loader::ShipmentRecord;
use crate::source::Source;
use crate::types::{RatedShipment, SavingsQuery};

/// Source that produces `RatedShipment` candidates by rating raw
/// shipment records against the current and proposed rate cards.
///
/// The source:
/// 1. Normalizes each record's weight to a billable tier
/// 2. Resolves the destination zone from the zip prefix
/// 3. Classifies the service label into a tier
/// 4. Quotes both cards and computes the savings delta
///
/// Rows with invalid weights are rejected inside `rate_batch`, logged,
/// and never reach the candidate stream.
pub struct RatingSource {
    records: Vec<ShipmentRecord>,
    zone_map: Arc<ZoneMap>,
    current: Arc<RateCard>,
    proposed: Arc<RateCard>,
}

impl RatingSource {
    pub fn new(
        records: Vec<ShipmentRecord>,
        zone_map: Arc<ZoneMap>,
        current: Arc<RateCard>,
        proposed: Arc<RateCard>,
    ) -> Self {
        Self {
            records,
            zone_map,
            current,
            proposed,
        }
    }
}

#[async_trait]
impl Source<SavingsQuery, RatedShipment> for RatingSource {
    fn enable(&self, _query: &SavingsQuery) -> bool {
        !self.records.is_empty()
    }

    async fn get_candidates(&self, query: &SavingsQuery) -> Result<Vec<RatedShipment>, String> {
        let rated_at = chrono::Utc::now().to_rfc3339();
        let outcome = rate_batch(
            &self.records,
            &self.zone_map,
            &self.current,
            &self.proposed,
            &rated_at,
        );

        if !outcome.rejected.is_empty() {
            log::warn!(
                "request_id={} rejected {} of {} shipment rows",
                query.request_id,
                outcome.rejected.len(),
                self.records.len()
            );
        }

        Ok(outcome.rated)
    }
}
