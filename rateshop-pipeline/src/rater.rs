//! Shipment rating: annotation merge plus rate-card quoting.
//!
//! Each raw record receives three independent, stateless annotations —
//! billable weight, zone, service tier — and a quote from each card.
//! The current side prefers the actually-charged cost when the sample
//! includes it, falling back to the current card's quote, which is how
//! every savings comparison in the source analyses reads.
//!
//! Only an invalid weight is fatal, and only for that row: the row is
//! dropped from rating and tallied as rejected. A zone fallback or a
//! missing rate cell annotates the row instead and surfaces in the
//! aggregate diagnostics.

use rateshop_core::{normalize, RateCard, RateError, ServiceTier, ZoneMap};

use crate::shipment_loader::ShipmentRecord;
use crate::types::RatedShipment;

/// A row dropped from rating, and why.
#[derive(Clone, Debug)]
pub struct RejectedShipment {
    pub shipment_id: String,
    pub reason: RateError,
}

/// Everything a batch rating run produced. `rated` plus `rejected`
/// always account for every input row.
#[derive(Clone, Debug, Default)]
pub struct RatingOutcome {
    pub rated: Vec<RatedShipment>,
    pub rejected: Vec<RejectedShipment>,
}

/// Rate a single shipment against both cards.
pub fn rate_shipment(
    record: &ShipmentRecord,
    zone_map: &ZoneMap,
    current: &RateCard,
    proposed: &RateCard,
    rated_at: &str,
) -> Result<RatedShipment, RateError> {
    let billable = normalize(record.weight, record.weight_unit)?;
    let resolution = zone_map.resolve(&record.destination_zip);
    let tier = ServiceTier::classify(&record.service);

    let current_quote = current.quote(tier, billable, resolution.zone, &record.destination_zip);
    let proposed_quote = proposed.quote(tier, billable, resolution.zone, &record.destination_zip);

    let (current_price, current_network) = match record.actual_cost {
        Some(cost) => (Some(cost), None),
        None => (
            current_quote.as_ref().map(|q| q.price),
            current_quote.as_ref().map(|q| q.network.clone()),
        ),
    };

    Ok(RatedShipment {
        shipment_id: record.shipment_id.clone(),
        destination_zip: record.destination_zip.clone(),
        service_label: record.service.clone(),
        billable,
        zone: resolution.zone,
        zone_defaulted: resolution.defaulted,
        tier,
        current_price,
        current_network,
        proposed_price: proposed_quote.as_ref().map(|q| q.price),
        proposed_network: proposed_quote.map(|q| q.network),
        rated_at: rated_at.to_string(),
        priority_score: None,
        urgency_score: None,
    })
}

/// Rate a batch. No single malformed row aborts the run; rejects are
/// logged and tallied so the final report can show them.
pub fn rate_batch(
    records: &[ShipmentRecord],
    zone_map: &ZoneMap,
    current: &RateCard,
    proposed: &RateCard,
    rated_at: &str,
) -> RatingOutcome {
    let mut outcome = RatingOutcome::default();

    for record in records {
        match rate_shipment(record, zone_map, current, proposed, rated_at) {
            Ok(rated) => outcome.rated.push(rated),
            Err(reason) => {
                log::warn!("rejecting shipment '{}': {}", record.shipment_id, reason);
                outcome.rejected.push(RejectedShipment {
                    shipment_id: record.shipment_id.clone(),
                    reason,
                });
            }
        }
    }

    outcome
}

#[cfg(test)]
mod tests {
    use super::*;
    use rateshop_core::{
        BillableWeight, Eligibility, RateGrid, RateNetwork, WeightUnit, Zone,
    };

    fn make_record(id: &str, weight: f64, unit: WeightUnit, zip: &str, service: &str) -> ShipmentRecord {
        ShipmentRecord {
            shipment_id: id.to_string(),
            weight,
            weight_unit: unit,
            origin_zip: None,
            destination_zip: zip.to_string(),
            service: service.to_string(),
            actual_cost: None,
        }
    }

    fn card_with_cell(
        name: &str,
        tier: ServiceTier,
        weight: BillableWeight,
        zone: u8,
        price: f64,
    ) -> RateCard {
        let mut grid = RateGrid::new();
        grid.insert(tier, weight, Zone::new(zone).unwrap(), price);
        RateCard::new(name, "v1").with_network(RateNetwork::new(
            "National",
            Eligibility::Always,
            grid,
        ))
    }

    #[test]
    fn half_pound_zone_three_scenario() {
        // 0.5 lb = 8 oz, Atlanta prefix = zone 3, $6.00 vs $3.80.
        let current = card_with_cell("Current", ServiceTier::Ground, BillableWeight::Ounces(8), 3, 6.00);
        let proposed = card_with_cell("Proposed", ServiceTier::Ground, BillableWeight::Ounces(8), 3, 3.80);
        let record = make_record("SHP-1", 0.5, WeightUnit::Pound, "30301", "UPS Ground");

        let rated = rate_shipment(&record, &ZoneMap::northeast(), &current, &proposed, "2025-08-26T00:00:00Z")
            .unwrap();

        assert_eq!(rated.billable, BillableWeight::Ounces(8));
        assert_eq!(rated.zone.get(), 3);
        assert_eq!(rated.tier, ServiceTier::Ground);
        assert!((rated.savings().unwrap() - 2.20).abs() < 1e-9);
        let pct = rated.savings_pct().unwrap();
        assert!((pct - 0.3667).abs() < 0.001, "savings pct {:.4}", pct);
    }

    #[test]
    fn actual_cost_wins_over_current_card_quote() {
        let current = card_with_cell("Current", ServiceTier::Ground, BillableWeight::Ounces(8), 3, 6.00);
        let proposed = card_with_cell("Proposed", ServiceTier::Ground, BillableWeight::Ounces(8), 3, 3.80);
        let mut record = make_record("SHP-2", 8.0, WeightUnit::Ounce, "30301", "Ground");
        record.actual_cost = Some(6.75);

        let rated = rate_shipment(&record, &ZoneMap::northeast(), &current, &proposed, "t").unwrap();
        assert_eq!(rated.current_price, Some(6.75));
        assert!(rated.current_network.is_none());
        assert!((rated.savings().unwrap() - 2.95).abs() < 1e-9);
    }

    #[test]
    fn proposed_miss_leaves_row_unpriced_not_zero() {
        let current = card_with_cell("Current", ServiceTier::Ground, BillableWeight::Pounds(4), 3, 11.20);
        // Proposed card prices a different weight tier only.
        let proposed = card_with_cell("Proposed", ServiceTier::Ground, BillableWeight::Ounces(8), 3, 3.80);
        let record = make_record("SHP-3", 4.0, WeightUnit::Pound, "30301", "Ground");

        let rated = rate_shipment(&record, &ZoneMap::northeast(), &current, &proposed, "t").unwrap();
        assert_eq!(rated.current_price, Some(11.20));
        assert!(rated.proposed_price.is_none());
        assert!(rated.savings().is_none());
        assert!(!rated.is_priced());
    }

    #[test]
    fn unmapped_destination_is_annotated_not_dropped() {
        let current = card_with_cell("Current", ServiceTier::Ground, BillableWeight::Ounces(8), 5, 6.90);
        let proposed = card_with_cell("Proposed", ServiceTier::Ground, BillableWeight::Ounces(8), 5, 4.15);
        let record = make_record("SHP-4", 8.0, WeightUnit::Ounce, "00501", "Ground");

        let rated = rate_shipment(&record, &ZoneMap::northeast(), &current, &proposed, "t").unwrap();
        assert_eq!(rated.zone, Zone::DEFAULT);
        assert!(rated.zone_defaulted);
        assert!(rated.is_priced());
    }

    #[test]
    fn invalid_weight_is_fatal_for_the_row_only() {
        let current = card_with_cell("Current", ServiceTier::Ground, BillableWeight::Ounces(8), 3, 6.00);
        let proposed = card_with_cell("Proposed", ServiceTier::Ground, BillableWeight::Ounces(8), 3, 3.80);
        let records = vec![
            make_record("GOOD-1", 8.0, WeightUnit::Ounce, "30301", "Ground"),
            make_record("BAD-1", 0.0, WeightUnit::Ounce, "30301", "Ground"),
            make_record("GOOD-2", 8.0, WeightUnit::Ounce, "30301", "Ground"),
            make_record("BAD-2", -1.5, WeightUnit::Pound, "30301", "Ground"),
        ];

        let outcome = rate_batch(&records, &ZoneMap::northeast(), &current, &proposed, "t");
        assert_eq!(outcome.rated.len(), 2);
        assert_eq!(outcome.rejected.len(), 2);
        assert_eq!(outcome.rejected[0].shipment_id, "BAD-1");
        assert!(matches!(outcome.rejected[0].reason, RateError::InvalidWeight(_)));
        // Accounting invariant: rated + rejected == input.
        assert_eq!(outcome.rated.len() + outcome.rejected.len(), records.len());
    }

    #[test]
    fn service_label_drives_the_tier_lane() {
        let current = card_with_cell("Current", ServiceTier::Expedited, BillableWeight::Ounces(12), 2, 14.10);
        let proposed = card_with_cell("Proposed", ServiceTier::Expedited, BillableWeight::Ounces(12), 2, 9.35);
        let record = make_record("SHP-5", 12.0, WeightUnit::Ounce, "07001", "UPS 2nd Day Air");

        let rated = rate_shipment(&record, &ZoneMap::northeast(), &current, &proposed, "t").unwrap();
        assert_eq!(rated.tier, ServiceTier::Expedited);
        assert!((rated.savings().unwrap() - 4.75).abs() < 1e-9);
    }
}
