//! Service-level classification.
//!
//! Carrier service labels are free text ("FedEx Standard Overnight®",
//! "UPS® Ground", "USPS Ground Advantage"). Savings comparisons only
//! care about the speed class, so every label maps to exactly one of
//! three canonical tiers.

use std::fmt;

use serde::Serialize;

/// Canonical speed class of a shipment, independent of carrier brand.
/// Variant order is the total order by speed: Priority is faster than
/// Expedited is faster than Ground.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum ServiceTier {
    Priority,
    Expedited,
    Ground,
}

/// Labels containing any of these classify as Priority.
const PRIORITY_KEYWORDS: &[&str] = &["overnight", "next day", "first day", "standard overnight"];

/// Labels containing any of these classify as Expedited.
const EXPEDITED_KEYWORDS: &[&str] = &["2nd day", "two day", "3 day", "expedited", "express saver"];

impl ServiceTier {
    pub const ALL: [ServiceTier; 3] = [
        ServiceTier::Priority,
        ServiceTier::Expedited,
        ServiceTier::Ground,
    ];

    /// Map a raw carrier service label to its canonical tier.
    ///
    /// Case-insensitive substring match, checked in priority order —
    /// first matching tier wins, no scoring. Everything unmatched
    /// (including "ground", "surepost", "home delivery", "ground
    /// advantage", and labels nobody has seen before) is Ground.
    pub fn classify(raw_label: &str) -> ServiceTier {
        let label = raw_label.to_lowercase();
        if PRIORITY_KEYWORDS.iter().any(|kw| label.contains(kw)) {
            return ServiceTier::Priority;
        }
        if EXPEDITED_KEYWORDS.iter().any(|kw| label.contains(kw)) {
            return ServiceTier::Expedited;
        }
        ServiceTier::Ground
    }
}

impl fmt::Display for ServiceTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ServiceTier::Priority => write!(f, "Priority"),
            ServiceTier::Expedited => write!(f, "Expedited"),
            ServiceTier::Ground => write!(f, "Ground"),
        }
    }
}
