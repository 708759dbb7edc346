pub mod aggregator;
pub mod candidate_pipeline;
pub mod components;
pub mod filter;
pub mod hydrator;
pub mod pipelines;
pub mod query_hydrator;
pub mod rater;
pub mod scorer;
pub mod selector;
pub mod shipment_loader;
pub mod side_effect;
pub mod source;
pub mod types;
pub mod util;
