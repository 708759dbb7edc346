pub mod low_savings_filter;
pub mod rating_source;
pub mod report_cache_side_effect;
pub mod sample_period_query_hydrator;
pub mod savings_scorer;
pub mod top_savings_selector;
pub mod transit_context_hydrator;
pub mod zone_diversity_scorer;
