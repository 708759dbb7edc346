use std::fmt;

use serde::Serialize;

use rateshop_core::{BillableWeight, ServiceTier, Zone};

use crate::candidate_pipeline::HasRequestId;

// ---------------------------------------------------------------------------
// Query types
// ---------------------------------------------------------------------------

/// Length of the shipment sample being analyzed, in days.
///
/// Mandatory on any temporal projection, so a two-week invoice file can
/// never be silently scaled as if it were a month.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct SamplePeriod {
    days: u32,
}

impl SamplePeriod {
    /// The default assumption for an undeclared sample window.
    pub const THIRTY_DAYS: SamplePeriod = SamplePeriod { days: 30 };

    pub fn new(days: u32) -> Option<SamplePeriod> {
        (days > 0).then_some(SamplePeriod { days })
    }

    pub fn days(self) -> u32 {
        self.days
    }
}

impl fmt::Display for SamplePeriod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-day sample", self.days)
    }
}

/// Query from the operator asking for a savings digest over a customer's
/// shipment sample.
#[derive(Clone, Debug)]
pub struct SavingsQuery {
    pub request_id: String,
    pub customer_id: String,
    /// Declared length of the sample window; hydrated to a default when
    /// the caller omits it.
    pub sample_period: Option<SamplePeriod>,
    /// Optional per-shipment savings floor for the digest.
    pub min_savings: Option<f64>,
}

impl HasRequestId for SavingsQuery {
    fn request_id(&self) -> &str {
        &self.request_id
    }
}

// ---------------------------------------------------------------------------
// Candidate types
// ---------------------------------------------------------------------------

/// A shipment with its derived annotations and both card quotes — one
/// logical row flowing through the pipeline, discarded after
/// aggregation.
#[derive(Clone, Debug, Serialize)]
pub struct RatedShipment {
    pub shipment_id: String,
    pub destination_zip: String,
    pub service_label: String,

    /// Derived annotations, each a pure function of the raw record.
    pub billable: BillableWeight,
    pub zone: Zone,
    /// The destination fell outside every configured zone range and
    /// took the fallback zone.
    pub zone_defaulted: bool,
    pub tier: ServiceTier,

    /// What the shipper pays today: the actual charged cost when the
    /// sample includes it, otherwise the current card's quote.
    pub current_price: Option<f64>,
    /// Sub-network the current price came from; `None` when the price
    /// is the actual charged cost.
    pub current_network: Option<String>,
    /// Quote under the proposed program.
    pub proposed_price: Option<f64>,
    pub proposed_network: Option<String>,

    /// RFC-3339 timestamp of the rating run.
    pub rated_at: String,

    // Scoring fields (populated by scorers)
    pub priority_score: Option<f64>,
    pub urgency_score: Option<f64>,
}

impl RatedShipment {
    /// Per-row savings under the proposed program. `None` when either
    /// side is unpriced — an unpriced row is never a $0.00 row.
    pub fn savings(&self) -> Option<f64> {
        Some(self.current_price? - self.proposed_price?)
    }

    /// Savings as a share of current cost. `None` when unpriced or the
    /// current cost is zero.
    pub fn savings_pct(&self) -> Option<f64> {
        let current = self.current_price?;
        let proposed = self.proposed_price?;
        if current == 0.0 {
            return None;
        }
        Some((current - proposed) / current)
    }

    /// Whether both sides carry a price.
    pub fn is_priced(&self) -> bool {
        self.current_price.is_some() && self.proposed_price.is_some()
    }
}

impl Default for RatedShipment {
    fn default() -> Self {
        Self {
            shipment_id: String::new(),
            destination_zip: String::new(),
            service_label: String::new(),
            billable: BillableWeight::Ounces(1),
            zone: Zone::DEFAULT,
            zone_defaulted: false,
            tier: ServiceTier::Ground,
            current_price: None,
            current_network: None,
            proposed_price: None,
            proposed_network: None,
            rated_at: String::new(),
            priority_score: None,
            urgency_score: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn savings_requires_both_prices() {
        let mut row = RatedShipment {
            current_price: Some(6.00),
            proposed_price: Some(3.80),
            ..RatedShipment::default()
        };
        assert!((row.savings().unwrap() - 2.20).abs() < 1e-9);
        assert!((row.savings_pct().unwrap() - 0.3666).abs() < 0.001);

        row.proposed_price = None;
        assert!(row.savings().is_none());
        assert!(!row.is_priced());
    }

    #[test]
    fn zero_current_cost_has_no_percentage() {
        let row = RatedShipment {
            current_price: Some(0.0),
            proposed_price: Some(3.80),
            ..RatedShipment::default()
        };
        assert!(row.savings().is_some());
        assert!(row.savings_pct().is_none());
    }

    #[test]
    fn sample_period_rejects_zero_days() {
        assert!(SamplePeriod::new(0).is_none());
        assert_eq!(SamplePeriod::new(14).unwrap().days(), 14);
    }
}
