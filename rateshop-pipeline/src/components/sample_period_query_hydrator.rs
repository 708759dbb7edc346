use async_trait::async_trait;

use crate::query_hydrator::QueryHydrator;
use crate::types::{SamplePeriod, SavingsQuery};

/// Hydrates the query with a default sample period if none is provided.
///
/// Projections require a sample length; when the operator omits one we
/// assume a standard thirty-day sample rather than refusing the run.
pub struct SamplePeriodQueryHydrator;

#[async_trait]
impl QueryHydrator<SavingsQuery> for SamplePeriodQueryHydrator {
    async fn hydrate(&self, query: &SavingsQuery) -> Result<SavingsQuery, String> {
        if query.sample_period.is_none() {
            Ok(SavingsQuery {
                sample_period: Some(SamplePeriod::THIRTY_DAYS),
                ..query.clone()
            })
        } else {
            Ok(query.clone())
        }
    }

    fn update(&self, query: &mut SavingsQuery, hydrated: SavingsQuery) {
        query.sample_period = hydrated.sample_period;
    }
}
