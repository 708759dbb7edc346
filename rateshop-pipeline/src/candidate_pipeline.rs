use async_trait::async_trait;
use std::sync::Arc;

use crate::filter::Filter;
use crate::hydrator::Hydrator;
use crate::query_hydrator::QueryHydrator;
use crate::scorer::Scorer;
use crate::selector::Selector;
use crate::side_effect::{SideEffect, SideEffectInput};
use crate::source::Source;

/// Queries expose a request id so every stage log line can be tied back
/// to the originating request.
pub trait HasRequestId {
    fn request_id(&self) -> &str;
}

/// Final result of a pipeline execution.
#[derive(Clone)]
pub struct PipelineResult<Q, C> {
    /// The (possibly hydrated) query the pipeline ran with.
    pub query: Q,
    /// Candidate count after sources, before filtering.
    pub retrieved_candidates: usize,
    /// The selected candidates, in selector order.
    pub selected_candidates: Vec<C>,
}

/// A staged candidate pipeline: query hydration, sourcing, candidate
/// hydration, filtering, scoring, selection, post-selection passes, and
/// fire-and-forget side effects.
///
/// Implementors provide the stage components via the accessor methods;
/// `execute` supplies the orchestration. A failing stage is logged and
/// skipped rather than aborting the run, so one bad component degrades
/// the result instead of dropping it.
#[async_trait]
pub trait CandidatePipeline<Q, C>: Send + Sync
where
    Q: HasRequestId + Clone + Send + Sync + 'static,
    C: Clone + Send + Sync + 'static,
{
    fn query_hydrators(&self) -> &[Box<dyn QueryHydrator<Q>>];
    fn sources(&self) -> &[Box<dyn Source<Q, C>>];
    fn hydrators(&self) -> &[Box<dyn Hydrator<Q, C>>];
    fn filters(&self) -> &[Box<dyn Filter<Q, C>>];
    fn scorers(&self) -> &[Box<dyn Scorer<Q, C>>];
    fn selector(&self) -> &dyn Selector<Q, C>;
    fn post_selection_hydrators(&self) -> &[Box<dyn Hydrator<Q, C>>];
    fn post_selection_filters(&self) -> &[Box<dyn Filter<Q, C>>];
    fn side_effects(&self) -> Arc<Vec<Box<dyn SideEffect<Q, C>>>>;

    /// Maximum number of candidates in the final result.
    fn result_size(&self) -> usize;

    /// Run the full pipeline for a query.
    async fn execute(&self, query: Q) -> PipelineResult<Q, C> {
        let mut query = query;
        let request_id = query.request_id().to_string();

        // Stage 1: query hydration.
        for hydrator in self.query_hydrators() {
            if !hydrator.enable(&query) {
                continue;
            }
            match hydrator.hydrate(&query).await {
                Ok(hydrated) => hydrator.update(&mut query, hydrated),
                Err(e) => {
                    log::warn!(
                        "request_id={} query hydrator {} failed: {}",
                        request_id,
                        hydrator.name(),
                        e
                    );
                }
            }
        }

        // Stage 2: sources.
        let mut candidates: Vec<C> = Vec::new();
        for source in self.sources() {
            if !source.enable(&query) {
                continue;
            }
            match source.get_candidates(&query).await {
                Ok(mut fetched) => candidates.append(&mut fetched),
                Err(e) => {
                    log::warn!(
                        "request_id={} source {} failed: {}",
                        request_id,
                        source.name(),
                        e
                    );
                }
            }
        }
        let retrieved_candidates = candidates.len();

        // Stage 3: candidate hydration.
        for hydrator in self.hydrators() {
            if !hydrator.enable(&query) {
                continue;
            }
            match hydrator.hydrate(&query, &candidates).await {
                Ok(hydrated) => {
                    for (candidate, h) in candidates.iter_mut().zip(hydrated) {
                        hydrator.update(candidate, h);
                    }
                }
                Err(e) => {
                    log::warn!(
                        "request_id={} hydrator {} failed: {}",
                        request_id,
                        hydrator.name(),
                        e
                    );
                }
            }
        }

        // Stage 4: filters.
        candidates = run_filters(&request_id, &query, candidates, self.filters()).await;

        // Stage 5: scorers.
        for scorer in self.scorers() {
            if !scorer.enable(&query) {
                continue;
            }
            match scorer.score(&query, &candidates).await {
                Ok(scored) => {
                    for (candidate, s) in candidates.iter_mut().zip(scored) {
                        scorer.update(candidate, s);
                    }
                }
                Err(e) => {
                    log::warn!(
                        "request_id={} scorer {} failed: {}",
                        request_id,
                        scorer.name(),
                        e
                    );
                }
            }
        }

        // Stage 6: selection.
        let mut selected = if self.selector().enable(&query) {
            self.selector().select(&query, candidates)
        } else {
            candidates
        };
        selected.truncate(self.result_size());

        // Stage 7: post-selection hydration and filtering.
        for hydrator in self.post_selection_hydrators() {
            if !hydrator.enable(&query) {
                continue;
            }
            match hydrator.hydrate(&query, &selected).await {
                Ok(hydrated) => {
                    for (candidate, h) in selected.iter_mut().zip(hydrated) {
                        hydrator.update(candidate, h);
                    }
                }
                Err(e) => {
                    log::warn!(
                        "request_id={} post-selection hydrator {} failed: {}",
                        request_id,
                        hydrator.name(),
                        e
                    );
                }
            }
        }
        selected = run_filters(&request_id, &query, selected, self.post_selection_filters()).await;

        // Stage 8: side effects.
        let input = Arc::new(SideEffectInput {
            query: Arc::new(query.clone()),
            selected_candidates: selected.clone(),
        });
        for side_effect in self.side_effects().iter() {
            if !side_effect.enable(Arc::clone(&input.query)) {
                continue;
            }
            if let Err(e) = side_effect.run(Arc::clone(&input)).await {
                log::warn!(
                    "request_id={} side effect {} failed: {}",
                    request_id,
                    side_effect.name(),
                    e
                );
            }
        }

        PipelineResult {
            query,
            retrieved_candidates,
            selected_candidates: selected,
        }
    }
}

/// Run a filter chain, keeping the pre-filter list intact when a
/// filter errors so a broken predicate never drops the whole batch.
async fn run_filters<Q, C>(
    request_id: &str,
    query: &Q,
    candidates: Vec<C>,
    filters: &[Box<dyn Filter<Q, C>>],
) -> Vec<C>
where
    Q: Clone + Send + Sync + 'static,
    C: Clone + Send + Sync + 'static,
{
    let mut candidates = candidates;
    for filter in filters {
        if !filter.enable(query) {
            continue;
        }
        let before = candidates.clone();
        match filter.filter(query, candidates).await {
            Ok(result) => {
                log::debug!(
                    "request_id={} filter {} kept {} removed {}",
                    request_id,
                    filter.name(),
                    result.kept.len(),
                    result.removed.len()
                );
                candidates = result.kept;
            }
            Err(e) => {
                log::warn!(
                    "request_id={} filter {} failed: {}",
                    request_id,
                    filter.name(),
                    e
                );
                candidates = before;
            }
        }
    }
    candidates
}
