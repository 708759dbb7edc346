//! Billable weight normalization.
//!
//! Carriers never bill the scale weight: a raw weight is rounded up to a
//! tier, and the tier indexes the rate grid. Under one pound the tiers
//! are whole ounces 1-15 plus a 15.99 oz ceiling tier for anything in
//! the open interval (15, 16) ounces; at one pound and above the tiers
//! are whole pounds. A billable weight is always >= the actual weight —
//! rounding is upward, never downward.

use std::fmt;

use serde::Serialize;

use crate::error::{RateError, RateResult};
use crate::policy::{OUNCES_PER_POUND, OUNCE_CEILING};

/// Unit a raw shipment weight was reported in.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
pub enum WeightUnit {
    Ounce,
    Pound,
}

/// The weight tier a carrier actually charges for.
///
/// Exactly one representation applies to any shipment: whole ounces for
/// sub-1-lb weights, the ceiling tier for the (15, 16) oz boundary, and
/// whole pounds from 1 lb up. Variant order gives a total order by
/// weight, so the enum can key an ordered rate grid directly.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum BillableWeight {
    /// Whole-ounce tier, 1 through 15.
    Ounces(u8),
    /// The 15.99 oz ceiling tier. Distinct from both 15 oz and 1 lb.
    OunceCeiling,
    /// Whole-pound tier, 1 and up.
    Pounds(u32),
}

impl BillableWeight {
    /// Billable weight expressed in ounces, for grid row comparisons.
    pub fn as_ounces(self) -> f64 {
        match self {
            BillableWeight::Ounces(oz) => oz as f64,
            BillableWeight::OunceCeiling => OUNCE_CEILING,
            BillableWeight::Pounds(lb) => lb as f64 * OUNCES_PER_POUND,
        }
    }

    /// Report bucket this tier belongs to.
    pub fn bucket(self) -> WeightBucket {
        match self {
            BillableWeight::Ounces(_) | BillableWeight::OunceCeiling => WeightBucket::UnderOnePound,
            BillableWeight::Pounds(lb) if lb <= 5 => WeightBucket::OneToFivePounds,
            BillableWeight::Pounds(lb) if lb <= 10 => WeightBucket::SixToTenPounds,
            BillableWeight::Pounds(_) => WeightBucket::ElevenPlusPounds,
        }
    }
}

impl fmt::Display for BillableWeight {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BillableWeight::Ounces(oz) => write!(f, "{} oz", oz),
            BillableWeight::OunceCeiling => write!(f, "15.99 oz"),
            BillableWeight::Pounds(lb) => write!(f, "{} lb", lb),
        }
    }
}

/// Coarse weight banding used for report breakdowns.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum WeightBucket {
    UnderOnePound,
    OneToFivePounds,
    SixToTenPounds,
    ElevenPlusPounds,
}

impl fmt::Display for WeightBucket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WeightBucket::UnderOnePound => write!(f, "<1 lb"),
            WeightBucket::OneToFivePounds => write!(f, "1-5 lb"),
            WeightBucket::SixToTenPounds => write!(f, "6-10 lb"),
            WeightBucket::ElevenPlusPounds => write!(f, "11+ lb"),
        }
    }
}

/// Convert a raw reported weight into its billable tier.
///
/// Rules, in order:
/// 1. Convert to ounces (`lb * 16`).
/// 2. Under 16 oz: round up to the next whole ounce, except that the
///    open interval (15, 16) oz clamps to the 15.99 oz ceiling tier —
///    it never promotes to 1 lb. Exactly 15 oz bills as 15 oz.
/// 3. At 16 oz and above: round up to the next whole pound; an exact
///    multiple bills at its own pound, not the next one.
///
/// Non-positive or non-finite weights are rejected; a default is never
/// substituted.
pub fn normalize(raw_weight: f64, unit: WeightUnit) -> RateResult<BillableWeight> {
    if !raw_weight.is_finite() || raw_weight <= 0.0 {
        return Err(RateError::InvalidWeight(raw_weight));
    }

    let ounces = match unit {
        WeightUnit::Ounce => raw_weight,
        WeightUnit::Pound => raw_weight * OUNCES_PER_POUND,
    };

    if ounces < OUNCES_PER_POUND {
        if ounces > 15.0 {
            Ok(BillableWeight::OunceCeiling)
        } else {
            Ok(BillableWeight::Ounces(ounces.ceil() as u8))
        }
    } else {
        Ok(BillableWeight::Pounds((ounces / OUNCES_PER_POUND).ceil() as u32))
    }
}
