pub mod error;
pub mod policy;
pub mod rates;
pub mod service;
pub mod weight;
pub mod zone;

pub use error::{RateError, RateResult};
pub use rates::{Eligibility, Quote, RateCard, RateDiscrepancy, RateGrid, RateNetwork};
pub use service::ServiceTier;
pub use weight::{normalize, BillableWeight, WeightBucket, WeightUnit};
pub use zone::{zip_prefix, Zone, ZoneMap, ZoneResolution};
