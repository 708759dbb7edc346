use async_trait::async_trait;

use crate::filter::{Filter, FilterResult};
use crate::types::{RatedShipment, SavingsQuery};

/// Filters out shipments below a minimum per-row savings threshold.
///
/// Unpriced rows are removed here too: a digest highlights concrete
/// wins, and a row with no computable savings cannot be one. The batch
/// aggregation path does not run this filter, so unpriced rows still
/// show up in the summary diagnostics.
pub struct LowSavingsFilter {
    pub min_savings: f64,
}

impl LowSavingsFilter {
    pub fn new(min_savings: f64) -> Self {
        Self { min_savings }
    }
}

impl Default for LowSavingsFilter {
    fn default() -> Self {
        Self { min_savings: 0.0 }
    }
}

#[async_trait]
impl Filter<SavingsQuery, RatedShipment> for LowSavingsFilter {
    async fn filter(
        &self,
        query: &SavingsQuery,
        candidates: Vec<RatedShipment>,
    ) -> Result<FilterResult<RatedShipment>, String> {
        let min = query.min_savings.unwrap_or(self.min_savings);
        let (kept, removed): (Vec<_>, Vec<_>) = candidates
            .into_iter()
            .partition(|c| matches!(c.savings(), Some(s) if s > min));

        Ok(FilterResult { kept, removed })
    }
}
