//! Savings aggregation over rated shipment populations.
//!
//! Aggregation is an associative, commutative fold over rows: partial
//! accumulators built per partition merge into the same summary as a
//! single whole-batch pass (up to floating-point tolerance), which is
//! what makes the rayon path safe with no locking.
//!
//! Unpriced rows are excluded from dollar totals but always counted and
//! reported; rejected rows carry into the diagnostics block. A report
//! with a clean-looking total and no diagnostics section is a bug.

use std::collections::BTreeMap;

use rayon::prelude::*;
use serde::Serialize;

use rateshop_core::{ServiceTier, WeightBucket};

use crate::rater::RatingOutcome;
use crate::types::{RatedShipment, SamplePeriod};

// ---------------------------------------------------------------------------
// Bucket statistics
// ---------------------------------------------------------------------------

/// Running sums for one breakdown bucket. Only sums and counts live
/// here so that merging two buckets is plain addition.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize)]
pub struct BucketStats {
    pub shipments: usize,
    pub priced: usize,
    pub unpriced: usize,
    /// Rows in this bucket whose zone was the unmapped-destination
    /// fallback. Nonzero values mean the bucket's volume is partly
    /// approximate.
    pub zone_defaulted: usize,
    pub current_total: f64,
    pub proposed_total: f64,
    pub savings_total: f64,
}

impl BucketStats {
    fn add(&mut self, row: &RatedShipment) {
        self.shipments += 1;
        if row.zone_defaulted {
            self.zone_defaulted += 1;
        }
        match (row.current_price, row.proposed_price) {
            (Some(current), Some(proposed)) => {
                self.priced += 1;
                self.current_total += current;
                self.proposed_total += proposed;
                self.savings_total += current - proposed;
            }
            _ => self.unpriced += 1,
        }
    }

    fn merge(&mut self, other: &BucketStats) {
        self.shipments += other.shipments;
        self.priced += other.priced;
        self.unpriced += other.unpriced;
        self.zone_defaulted += other.zone_defaulted;
        self.current_total += other.current_total;
        self.proposed_total += other.proposed_total;
        self.savings_total += other.savings_total;
    }

    /// Savings share of current spend; `None` when there is no priced
    /// current spend to divide by.
    pub fn savings_pct(&self) -> Option<f64> {
        (self.current_total > 0.0).then(|| self.savings_total / self.current_total)
    }

    pub fn avg_current(&self) -> Option<f64> {
        (self.priced > 0).then(|| self.current_total / self.priced as f64)
    }

    pub fn avg_proposed(&self) -> Option<f64> {
        (self.priced > 0).then(|| self.proposed_total / self.priced as f64)
    }
}

// ---------------------------------------------------------------------------
// Accumulator
// ---------------------------------------------------------------------------

/// Partial aggregation state. `add` rows, `merge` partials from other
/// partitions, then `finish` into the immutable summary.
#[derive(Clone, Debug, Default)]
pub struct SavingsAccumulator {
    totals: BucketStats,
    by_zone: BTreeMap<u8, BucketStats>,
    by_tier: BTreeMap<ServiceTier, BucketStats>,
    by_weight: BTreeMap<WeightBucket, BucketStats>,
    rejected: usize,
}

impl SavingsAccumulator {
    pub fn new() -> SavingsAccumulator {
        SavingsAccumulator::default()
    }

    pub fn add(&mut self, row: &RatedShipment) {
        self.totals.add(row);
        self.by_zone.entry(row.zone.get()).or_default().add(row);
        self.by_tier.entry(row.tier).or_default().add(row);
        self.by_weight
            .entry(row.billable.bucket())
            .or_default()
            .add(row);
    }

    /// Record rows dropped before rating (invalid weight).
    pub fn add_rejected(&mut self, count: usize) {
        self.rejected += count;
    }

    /// Combine two partial accumulations. Associative and commutative,
    /// so partition order never changes the result.
    pub fn merge(mut self, other: SavingsAccumulator) -> SavingsAccumulator {
        self.totals.merge(&other.totals);
        for (zone, stats) in other.by_zone {
            self.by_zone.entry(zone).or_default().merge(&stats);
        }
        for (tier, stats) in other.by_tier {
            self.by_tier.entry(tier).or_default().merge(&stats);
        }
        for (bucket, stats) in other.by_weight {
            self.by_weight.entry(bucket).or_default().merge(&stats);
        }
        self.rejected += other.rejected;
        self
    }

    pub fn finish(self) -> SavingsSummary {
        let totals = self.totals;
        let unpriced_share = if totals.shipments > 0 {
            totals.unpriced as f64 / totals.shipments as f64
        } else {
            0.0
        };

        SavingsSummary {
            shipments: totals.shipments,
            priced: totals.priced,
            current_total: totals.current_total,
            proposed_total: totals.proposed_total,
            savings_total: totals.savings_total,
            savings_pct: totals.savings_pct(),
            avg_current: totals.avg_current(),
            avg_proposed: totals.avg_proposed(),
            by_zone: self.by_zone,
            by_tier: self.by_tier,
            by_weight: self.by_weight,
            diagnostics: Diagnostics {
                rejected: self.rejected,
                unpriced: totals.unpriced,
                unpriced_share,
                zone_defaulted: totals.zone_defaulted,
            },
        }
    }
}

// ---------------------------------------------------------------------------
// Summary
// ---------------------------------------------------------------------------

/// Data-quality tallies that must accompany any rendered report. Every
/// excluded row is visible here; nothing is silently absorbed into the
/// dollar totals.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct Diagnostics {
    /// Rows dropped before rating (invalid weight).
    pub rejected: usize,
    /// Rated rows missing a price on either side, excluded from dollar
    /// totals.
    pub unpriced: usize,
    /// Unpriced share of rated volume, 0.0-1.0.
    pub unpriced_share: f64,
    /// Rows that took the fallback zone; the fallback zone's bucket is
    /// partly unmapped destinations, not all true volume.
    pub zone_defaulted: usize,
}

/// The terminal report artifact for a batch run. Computed once, never
/// mutated, safe to serialize for any presentation layer.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct SavingsSummary {
    /// Rated rows (priced + unpriced). Rejected rows are not included
    /// here; they appear in `diagnostics.rejected`.
    pub shipments: usize,
    pub priced: usize,
    pub current_total: f64,
    pub proposed_total: f64,
    pub savings_total: f64,
    /// Overall savings share of current spend; `None` when current
    /// spend is zero.
    pub savings_pct: Option<f64>,
    pub avg_current: Option<f64>,
    pub avg_proposed: Option<f64>,
    pub by_zone: BTreeMap<u8, BucketStats>,
    pub by_tier: BTreeMap<ServiceTier, BucketStats>,
    pub by_weight: BTreeMap<WeightBucket, BucketStats>,
    pub diagnostics: Diagnostics,
}

impl SavingsSummary {
    /// Project the summary onto a longer (or shorter) window.
    ///
    /// Pure multiplicative post-processing: the sample length is
    /// mandatory and per-row prices are never scaled, so a 2-week file
    /// can't silently double a monthly figure.
    pub fn project(&self, sample: SamplePeriod, window: ProjectionWindow) -> ProjectedSavings {
        let factor = window.days() as f64 / sample.days() as f64;
        ProjectedSavings {
            sample_days: sample.days(),
            window_days: window.days(),
            factor,
            shipments: self.shipments as f64 * factor,
            current_total: self.current_total * factor,
            proposed_total: self.proposed_total * factor,
            savings_total: self.savings_total * factor,
        }
    }
}

/// Target window for temporal extrapolation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum ProjectionWindow {
    Monthly,
    Annual,
    Days(u32),
}

impl ProjectionWindow {
    pub fn days(self) -> u32 {
        match self {
            ProjectionWindow::Monthly => 30,
            ProjectionWindow::Annual => 365,
            ProjectionWindow::Days(days) => days,
        }
    }
}

/// A projected view of a summary. Counts become fractional because they
/// are extrapolations, not observations.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct ProjectedSavings {
    pub sample_days: u32,
    pub window_days: u32,
    pub factor: f64,
    pub shipments: f64,
    pub current_total: f64,
    pub proposed_total: f64,
    pub savings_total: f64,
}

// ---------------------------------------------------------------------------
// Entry points
// ---------------------------------------------------------------------------

/// Aggregate a rated population in one sequential pass.
pub fn aggregate(rows: &[RatedShipment]) -> SavingsSummary {
    let mut acc = SavingsAccumulator::new();
    for row in rows {
        acc.add(row);
    }
    acc.finish()
}

/// Parallel aggregation: per-partition partials combined through the
/// associative merge. Identical to `aggregate` up to floating-point
/// tolerance.
pub fn par_aggregate(rows: &[RatedShipment]) -> SavingsSummary {
    rows.par_iter()
        .fold(SavingsAccumulator::new, |mut acc, row| {
            acc.add(row);
            acc
        })
        .reduce(SavingsAccumulator::new, SavingsAccumulator::merge)
        .finish()
}

/// Aggregate a full rating outcome, carrying the rejected-row tally
/// into the diagnostics.
pub fn aggregate_outcome(outcome: &RatingOutcome) -> SavingsSummary {
    let mut acc = SavingsAccumulator::new();
    for row in &outcome.rated {
        acc.add(row);
    }
    acc.add_rejected(outcome.rejected.len());
    acc.finish()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rateshop_core::{BillableWeight, Zone};

    fn row(id: &str, zone: u8, current: Option<f64>, proposed: Option<f64>) -> RatedShipment {
        RatedShipment {
            shipment_id: id.to_string(),
            billable: BillableWeight::Ounces(8),
            zone: Zone::new(zone).unwrap(),
            current_price: current,
            proposed_price: proposed,
            ..RatedShipment::default()
        }
    }

    fn sample_rows() -> Vec<RatedShipment> {
        vec![
            row("A", 3, Some(6.00), Some(3.80)),
            row("B", 3, Some(7.25), Some(4.10)),
            row("C", 5, Some(9.40), Some(6.15)),
            row("D", 8, Some(12.80), None), // unpriced on proposed side
            row("E", 8, Some(11.10), Some(8.05)),
        ]
    }

    fn assert_close(a: f64, b: f64) {
        assert!((a - b).abs() < 1e-6, "{} != {}", a, b);
    }

    #[test]
    fn totals_exclude_unpriced_rows_but_count_them() {
        let summary = aggregate(&sample_rows());
        assert_eq!(summary.shipments, 5);
        assert_eq!(summary.priced, 4);
        assert_eq!(summary.diagnostics.unpriced, 1);
        assert_close(summary.diagnostics.unpriced_share, 0.2);
        // D's $12.80 current cost must NOT leak into the totals.
        assert_close(summary.current_total, 6.00 + 7.25 + 9.40 + 11.10);
        assert_close(summary.savings_total, 2.20 + 3.15 + 3.25 + 3.05);
        // Accounting invariant: priced + unpriced == rated rows.
        assert_eq!(summary.priced + summary.diagnostics.unpriced, summary.shipments);
    }

    #[test]
    fn aggregation_is_order_invariant() {
        let rows = sample_rows();
        let forward = aggregate(&rows);
        let mut reversed = rows.clone();
        reversed.reverse();
        let backward = aggregate(&reversed);

        assert_eq!(forward.shipments, backward.shipments);
        assert_eq!(forward.priced, backward.priced);
        assert_close(forward.savings_total, backward.savings_total);
        assert_close(forward.current_total, backward.current_total);
    }

    #[test]
    fn partitioned_aggregation_equals_whole_batch() {
        let rows = sample_rows();
        let whole = aggregate(&rows);

        let (left, right) = rows.split_at(2);
        let mut a = SavingsAccumulator::new();
        for r in left {
            a.add(r);
        }
        let mut b = SavingsAccumulator::new();
        for r in right {
            b.add(r);
        }
        let merged = a.merge(b).finish();

        assert_eq!(whole.shipments, merged.shipments);
        assert_eq!(whole.priced, merged.priced);
        assert_close(whole.savings_total, merged.savings_total);
        assert_eq!(whole.by_zone.len(), merged.by_zone.len());
        for (zone, stats) in &whole.by_zone {
            let other = &merged.by_zone[zone];
            assert_eq!(stats.shipments, other.shipments);
            assert_close(stats.savings_total, other.savings_total);
        }
    }

    #[test]
    fn parallel_matches_sequential() {
        let rows: Vec<RatedShipment> = (0..500)
            .map(|i| {
                row(
                    &format!("S{i}"),
                    (i % 8) as u8 + 1,
                    Some(5.0 + (i % 13) as f64 * 0.37),
                    if i % 11 == 0 { None } else { Some(3.0 + (i % 7) as f64 * 0.29) },
                )
            })
            .collect();

        let seq = aggregate(&rows);
        let par = par_aggregate(&rows);
        assert_eq!(seq.shipments, par.shipments);
        assert_eq!(seq.priced, par.priced);
        assert!((seq.savings_total - par.savings_total).abs() < 1e-6);
        assert!((seq.current_total - par.current_total).abs() < 1e-6);
        assert_eq!(seq.diagnostics.unpriced, par.diagnostics.unpriced);
    }

    #[test]
    fn zone_breakdown_annotates_defaulted_volume() {
        let mut fallback = row("F", 5, Some(6.50), Some(4.20));
        fallback.zone_defaulted = true;
        let rows = vec![row("T", 5, Some(7.00), Some(4.90)), fallback];

        let summary = aggregate(&rows);
        let zone5 = &summary.by_zone[&5];
        assert_eq!(zone5.shipments, 2);
        // One of the two zone-5 rows is an unmapped destination; the
        // bucket says so instead of presenting clean zone-5 volume.
        assert_eq!(zone5.zone_defaulted, 1);
        assert_eq!(summary.diagnostics.zone_defaulted, 1);
    }

    #[test]
    fn zero_current_spend_has_no_percentage() {
        let rows = vec![row("Z", 3, Some(0.0), Some(0.0))];
        let summary = aggregate(&rows);
        assert!(summary.savings_pct.is_none());
    }

    #[test]
    fn empty_batch_produces_an_empty_summary() {
        let summary = aggregate(&[]);
        assert_eq!(summary.shipments, 0);
        assert!(summary.savings_pct.is_none());
        assert!(summary.avg_current.is_none());
        assert_close(summary.diagnostics.unpriced_share, 0.0);
    }

    #[test]
    fn projection_scales_by_window_over_sample() {
        let summary = aggregate(&sample_rows());
        let sample = SamplePeriod::new(14).unwrap();

        let annual = summary.project(sample, ProjectionWindow::Annual);
        assert_close(annual.factor, 365.0 / 14.0);
        assert_close(annual.savings_total, summary.savings_total * 365.0 / 14.0);

        // The scaling is post-hoc: the summary itself is untouched.
        assert_close(summary.savings_total, 2.20 + 3.15 + 3.25 + 3.05);

        let monthly = summary.project(sample, ProjectionWindow::Monthly);
        assert_close(monthly.factor, 30.0 / 14.0);
    }

    #[test]
    fn summary_serializes_for_presentation_layers() {
        let summary = aggregate(&sample_rows());
        let json = serde_json::to_string(&summary).unwrap();
        assert!(json.contains("\"savings_total\""));
        assert!(json.contains("\"diagnostics\""));
        assert!(json.contains("\"by_zone\""));
    }
}
