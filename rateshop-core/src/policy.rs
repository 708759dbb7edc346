//! Centralized tariff policy constants for parcel rating.
//!
//! These values encode the rounding and fallback conventions shared by
//! rate-card quoting (`rates.rs`) and batch rating
//! (`rateshop-pipeline/rater.rs`). Changing a value here changes every
//! savings figure downstream.

/// Ounces per pound, the carrier's canonical conversion.
pub const OUNCES_PER_POUND: f64 = 16.0;

/// Billable value of the sub-1-lb ceiling tier. Weights strictly between
/// 15 and 16 ounces bill at this tier instead of promoting to 1 lb.
/// The source spreadsheets implement this boundary at least three
/// different ways; confirm against the carrier tariff before trusting
/// these numbers for billing decisions rather than comparisons.
pub const OUNCE_CEILING: f64 = 15.99;

/// Zone assigned when a destination prefix falls in no configured range.
/// Reports must surface how many shipments took this fallback — zone-5
/// totals are otherwise a silent mix of true zone-5 and unmapped
/// destinations.
pub const DEFAULT_ZONE: u8 = 5;

/// Lowest zone in any carrier chart (closest to origin).
pub const ZONE_MIN: u8 = 1;

/// Highest zone in any carrier chart (farthest from origin).
pub const ZONE_MAX: u8 = 8;

/// Zones 1-4 are regional reach; zones 5-8 are cross-country.
pub const REGIONAL_ZONE_MAX: u8 = 4;
