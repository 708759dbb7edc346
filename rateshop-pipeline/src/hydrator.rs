use async_trait::async_trait;

use crate::util;

/// Hydrators enrich candidates with additional fields after they are
/// fetched from sources. Each hydrator produces a parallel vector of
/// candidates carrying only the fields it is responsible for, and
/// `update` copies those fields back onto the originals.
#[async_trait]
pub trait Hydrator<Q, C>: Send + Sync
where
    Q: Clone + Send + Sync + 'static,
    C: Clone + Send + Sync + 'static,
{
    /// Decide if this hydrator should run for the given query.
    fn enable(&self, _query: &Q) -> bool {
        true
    }

    /// Hydrate candidates. The returned vector must be the same length
    /// as the input slice, index-aligned.
    async fn hydrate(&self, query: &Q, candidates: &[C]) -> Result<Vec<C>, String>;

    /// Update the candidate with the hydrated fields.
    /// Only the fields this hydrator is responsible for should be copied.
    fn update(&self, candidate: &mut C, hydrated: C);

    /// Returns a stable name for logging/metrics.
    fn name(&self) -> &str {
        util::short_type_name(std::any::type_name::<Self>())
    }
}
