use async_trait::async_trait;
use std::sync::Arc;

use rateshop_core::{RateCard, ZoneMap};

use crate::candidate_pipeline::CandidatePipeline;
use crate::components::low_savings_filter::LowSavingsFilter;
use crate::components::rating_source::RatingSource;
use crate::components::report_cache_side_effect::ReportCacheSideEffect;
use crate::components::sample_period_query_hydrator::SamplePeriodQueryHydrator;
use crate::components::savings_scorer::SavingsScorer;
use crate::components::top_savings_selector::TopSavingsSelector;
use crate::components::transit_context_hydrator::TransitContextHydrator;
use crate::components::zone_diversity_scorer::ZoneDiversityScorer;
use crate::filter::Filter;
use crate::hydrator::Hydrator;
use crate::query_hydrator::QueryHydrator;
use crate::scorer::Scorer;
use crate::selector::Selector;
use crate::shipment_loader::ShipmentRecord;
use crate::side_effect::SideEffect;
use crate::source::Source;
use crate::types::{RatedShipment, SavingsQuery};

/// The savings digest pipeline.
///
/// Pipeline flow:
/// 1. SamplePeriodQueryHydrator fills in a default sample window
/// 2. RatingSource rates every shipment against both cards
/// 3. TransitContextHydrator attaches a lane urgency signal
/// 4. LowSavingsFilter drops rows below the savings floor
/// 5. SavingsScorer assigns priority scores
/// 6. ZoneDiversityScorer attenuates repeated lanes
/// 7. TopSavingsSelector picks the top N
/// 8. ReportCacheSideEffect caches the result
pub struct SavingsDigestPipeline {
    query_hydrators: Vec<Box<dyn QueryHydrator<SavingsQuery>>>,
    sources: Vec<Box<dyn Source<SavingsQuery, RatedShipment>>>,
    hydrators: Vec<Box<dyn Hydrator<SavingsQuery, RatedShipment>>>,
    filters: Vec<Box<dyn Filter<SavingsQuery, RatedShipment>>>,
    scorers: Vec<Box<dyn Scorer<SavingsQuery, RatedShipment>>>,
    selector: TopSavingsSelector,
    post_selection_hydrators: Vec<Box<dyn Hydrator<SavingsQuery, RatedShipment>>>,
    post_selection_filters: Vec<Box<dyn Filter<SavingsQuery, RatedShipment>>>,
    side_effects: Arc<Vec<Box<dyn SideEffect<SavingsQuery, RatedShipment>>>>,
    result_size: usize,
}

impl SavingsDigestPipeline {
    /// Create a pipeline over a shipment sample and a pair of cards.
    ///
    /// This is the primary constructor for production use.
    pub fn with_shipments(
        records: Vec<ShipmentRecord>,
        zone_map: Arc<ZoneMap>,
        current: Arc<RateCard>,
        proposed: Arc<RateCard>,
    ) -> Self {
        Self::with_shipments_and_size(records, zone_map, current, proposed, 5)
    }

    /// Create a pipeline with a custom result size.
    pub fn with_shipments_and_size(
        records: Vec<ShipmentRecord>,
        zone_map: Arc<ZoneMap>,
        current: Arc<RateCard>,
        proposed: Arc<RateCard>,
        result_size: usize,
    ) -> Self {
        let query_hydrators: Vec<Box<dyn QueryHydrator<SavingsQuery>>> =
            vec![Box::new(SamplePeriodQueryHydrator)];

        let sources: Vec<Box<dyn Source<SavingsQuery, RatedShipment>>> =
            vec![Box::new(RatingSource::new(records, zone_map, current, proposed))];

        let hydrators: Vec<Box<dyn Hydrator<SavingsQuery, RatedShipment>>> =
            vec![Box::new(TransitContextHydrator)];

        let filters: Vec<Box<dyn Filter<SavingsQuery, RatedShipment>>> =
            vec![Box::new(LowSavingsFilter::default())];

        let scorers: Vec<Box<dyn Scorer<SavingsQuery, RatedShipment>>> = vec![
            Box::new(SavingsScorer),
            Box::new(ZoneDiversityScorer::default()),
        ];

        let selector = TopSavingsSelector { k: result_size };

        let side_effects: Arc<Vec<Box<dyn SideEffect<SavingsQuery, RatedShipment>>>> =
            Arc::new(vec![Box::new(ReportCacheSideEffect)]);

        Self {
            query_hydrators,
            sources,
            hydrators,
            filters,
            scorers,
            selector,
            post_selection_hydrators: Vec::new(),
            post_selection_filters: Vec::new(),
            side_effects,
            result_size,
        }
    }
}

#[async_trait]
impl CandidatePipeline<SavingsQuery, RatedShipment> for SavingsDigestPipeline {
    fn query_hydrators(&self) -> &[Box<dyn QueryHydrator<SavingsQuery>>] {
        &self.query_hydrators
    }

    fn sources(&self) -> &[Box<dyn Source<SavingsQuery, RatedShipment>>] {
        &self.sources
    }

    fn hydrators(&self) -> &[Box<dyn Hydrator<SavingsQuery, RatedShipment>>] {
        &self.hydrators
    }

    fn filters(&self) -> &[Box<dyn Filter<SavingsQuery, RatedShipment>>] {
        &self.filters
    }

    fn scorers(&self) -> &[Box<dyn Scorer<SavingsQuery, RatedShipment>>] {
        &self.scorers
    }

    fn selector(&self) -> &dyn Selector<SavingsQuery, RatedShipment> {
        &self.selector
    }

    fn post_selection_hydrators(&self) -> &[Box<dyn Hydrator<SavingsQuery, RatedShipment>>] {
        &self.post_selection_hydrators
    }

    fn post_selection_filters(&self) -> &[Box<dyn Filter<SavingsQuery, RatedShipment>>] {
        &self.post_selection_filters
    }

    fn side_effects(&self) -> Arc<Vec<Box<dyn SideEffect<SavingsQuery, RatedShipment>>>> {
        Arc::clone(&self.side_effects)
    }

    fn result_size(&self) -> usize {
        self.result_size
    }
}
