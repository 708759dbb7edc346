use async_trait::async_trait;

use crate::util;

/// Scorers assign or adjust priority scores across the whole candidate
/// list. Scoring sees all candidates at once so that relative signals
/// (diversity, saturation) can be computed, not just per-row ones.
#[async_trait]
pub trait Scorer<Q, C>: Send + Sync
where
    Q: Clone + Send + Sync + 'static,
    C: Clone + Send + Sync + 'static,
{
    /// Decide if this scorer should run for the given query.
    fn enable(&self, _query: &Q) -> bool {
        true
    }

    /// Score candidates. The returned vector must be the same length
    /// as the input slice, index-aligned, carrying only the fields this
    /// scorer is responsible for.
    async fn score(&self, query: &Q, candidates: &[C]) -> Result<Vec<C>, String>;

    /// Update the candidate with the scored fields.
    fn update(&self, candidate: &mut C, scored: C);

    /// Returns a stable name for logging/metrics.
    fn name(&self) -> &str {
        util::short_type_name(std::any::type_name::<Self>())
    }
}
