use async_trait::async_trait;
use std::sync::Arc;

use crate::side_effect::{SideEffect, SideEffectInput};
use crate::types::{RatedShipment, SavingsQuery};

/// Caches the digest payload so repeated queries return instantly.
///
/// In production this would write to Redis or a local cache.
/// For now it serializes the payload and logs the event.
pub struct ReportCacheSideEffect;

#[async_trait]
impl SideEffect<SavingsQuery, RatedShipment> for ReportCacheSideEffect {
    async fn run(
        &self,
        input: Arc<SideEffectInput<SavingsQuery, RatedShipment>>,
    ) -> Result<(), String> {
        let payload = serde_json::to_string(&input.selected_candidates)
            .map_err(|e| format!("failed to serialize digest payload: {e}"))?;

        log::info!(
            "request_id={} cached digest for customer {} ({} candidates, {} bytes)",
            input.query.request_id,
            input.query.customer_id,
            input.selected_candidates.len(),
            payload.len()
        );
        Ok(())
    }
}
