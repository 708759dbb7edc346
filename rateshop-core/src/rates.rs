//! Rate cards and sub-network quoting.
//!
//! A rate card is a fixed price grid indexed by (service tier, billable
//! weight tier, zone), built once from a rate sheet and then read as a
//! pure lookup. Cards may be partitioned into sub-networks — e.g. a
//! discounted metro network plus a full-coverage national fallback —
//! each with its own eligibility rule and complete grid. Eligibility is
//! always evaluated before any grid read; when more than one
//! sub-network is eligible and priced, the lowest price wins.
//!
//! A missing cell is `None`, never zero. Treating an unpriced lane as
//! $0.00 has produced real reporting errors; the aggregator tabulates
//! unpriced rows separately.

use std::collections::{BTreeSet, HashMap};

use serde::Serialize;

use crate::error::{RateError, RateResult};
use crate::service::ServiceTier;
use crate::weight::BillableWeight;
use crate::zone::{zip_prefix, Zone};

/// One priced cell coordinate.
type CellKey = (ServiceTier, BillableWeight, Zone);

/// A fixed price grid for one sub-network.
#[derive(Clone, Debug, Default)]
pub struct RateGrid {
    cells: HashMap<CellKey, f64>,
}

impl RateGrid {
    pub fn new() -> RateGrid {
        RateGrid::default()
    }

    pub fn insert(&mut self, tier: ServiceTier, weight: BillableWeight, zone: Zone, price: f64) {
        self.cells.insert((tier, weight, zone), price);
    }

    /// Load one service tier from zone-column rows, the shape rate
    /// sheets ship in: one row per weight tier, one column per zone 1-8.
    pub fn load_tier_rows(&mut self, tier: ServiceTier, rows: &[(BillableWeight, [f64; 8])]) {
        for (weight, prices) in rows {
            for (idx, price) in prices.iter().enumerate() {
                let zone = Zone::new(idx as u8 + 1).expect("zone column index in 1-8");
                self.insert(tier, *weight, zone, *price);
            }
        }
    }

    /// Pure map read. `None` means the cell is unpriced.
    pub fn lookup(&self, tier: ServiceTier, weight: BillableWeight, zone: Zone) -> Option<f64> {
        self.cells.get(&(tier, weight, zone)).copied()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    fn sorted_keys(&self) -> Vec<CellKey> {
        let mut keys: Vec<CellKey> = self.cells.keys().copied().collect();
        keys.sort();
        keys
    }
}

/// Which destinations a sub-network will carry.
#[derive(Clone, Debug)]
pub enum Eligibility {
    /// Full-coverage network; every destination qualifies.
    Always,
    /// Destination's 3-digit prefix must be in the serviceable set.
    ZipPrefixes(BTreeSet<String>),
    /// Only destinations at or below this zone qualify.
    MaxZone(Zone),
}

impl Eligibility {
    /// Build a prefix set from raw 3-digit prefix strings.
    pub fn zip_prefixes<I, S>(prefixes: I) -> Eligibility
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Eligibility::ZipPrefixes(prefixes.into_iter().map(Into::into).collect())
    }

    pub fn allows(&self, zone: Zone, destination_zip: &str) -> bool {
        match self {
            Eligibility::Always => true,
            Eligibility::ZipPrefixes(set) => {
                zip_prefix(destination_zip).is_some_and(|p| set.contains(&p))
            }
            Eligibility::MaxZone(max) => zone <= *max,
        }
    }
}

/// A named sub-network: an eligibility rule plus a full zone/weight grid.
#[derive(Clone, Debug)]
pub struct RateNetwork {
    pub name: String,
    pub eligibility: Eligibility,
    pub grid: RateGrid,
}

impl RateNetwork {
    pub fn new(name: impl Into<String>, eligibility: Eligibility, grid: RateGrid) -> RateNetwork {
        RateNetwork {
            name: name.into(),
            eligibility,
            grid,
        }
    }
}

/// The price a card quoted, and which sub-network supplied it.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Quote {
    pub network: String,
    pub price: f64,
}

/// A named, versioned rate card: one or more sub-networks sharing a
/// single source of truth, so near-identical grid literals stop
/// multiplying across analysis files.
#[derive(Clone, Debug)]
pub struct RateCard {
    name: String,
    version: String,
    networks: Vec<RateNetwork>,
}

impl RateCard {
    pub fn new(name: impl Into<String>, version: impl Into<String>) -> RateCard {
        RateCard {
            name: name.into(),
            version: version.into(),
            networks: Vec::new(),
        }
    }

    pub fn with_network(mut self, network: RateNetwork) -> RateCard {
        self.networks.push(network);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn version(&self) -> &str {
        &self.version
    }

    /// Quote a shipment against this card.
    ///
    /// Eligibility is evaluated per sub-network before any grid read.
    /// When several eligible sub-networks price the cell, the lowest
    /// price wins — never an average, never an arbitrary pick — and the
    /// multi-eligibility is logged at debug level. `None` means no
    /// eligible sub-network prices this cell.
    pub fn quote(
        &self,
        tier: ServiceTier,
        weight: BillableWeight,
        zone: Zone,
        destination_zip: &str,
    ) -> Option<Quote> {
        let mut best: Option<Quote> = None;
        let mut priced_networks = 0usize;

        for network in &self.networks {
            if !network.eligibility.allows(zone, destination_zip) {
                continue;
            }
            if let Some(price) = network.grid.lookup(tier, weight, zone) {
                priced_networks += 1;
                let better = match &best {
                    Some(current) => price < current.price,
                    None => true,
                };
                if better {
                    best = Some(Quote {
                        network: network.name.clone(),
                        price,
                    });
                }
            }
        }

        if priced_networks > 1 {
            if let Some(quote) = &best {
                log::debug!(
                    "card '{}': {} sub-networks price {}/{}/zone {}; taking lowest from '{}' (${:.2})",
                    self.name,
                    priced_networks,
                    tier,
                    weight,
                    zone,
                    quote.network,
                    quote.price
                );
            }
        }

        best
    }

    /// Validation pass for a newly ingested card: every sub-network must
    /// have a non-empty grid of strictly positive prices.
    pub fn validate(&self) -> RateResult<()> {
        for network in &self.networks {
            if network.grid.is_empty() {
                return Err(RateError::EmptyGrid(network.name.clone()));
            }
            for (&(tier, weight, zone), &price) in &network.grid.cells {
                if !(price > 0.0) {
                    return Err(RateError::InvalidPrice {
                        network: network.name.clone(),
                        cell: format!("{}/{}/zone {}", tier, weight, zone),
                        price,
                    });
                }
            }
        }
        Ok(())
    }

    /// Cell-level diff against another ingest of the same card.
    ///
    /// Grid literals recur across source files with small, likely
    /// erroneous divergences; run this against any re-ingested grid
    /// before trusting it. Discrepancies are ordered deterministically.
    pub fn diff(&self, other: &RateCard) -> Vec<RateDiscrepancy> {
        const PRICE_TOLERANCE: f64 = 0.005;

        let mut discrepancies = Vec::new();

        for ours in &self.networks {
            let Some(theirs) = other.networks.iter().find(|n| n.name == ours.name) else {
                discrepancies.push(RateDiscrepancy {
                    network: ours.name.clone(),
                    cell: "*".to_string(),
                    ours: None,
                    theirs: None,
                });
                continue;
            };

            let mut keys: Vec<CellKey> = ours.grid.sorted_keys();
            for key in theirs.grid.sorted_keys() {
                if !ours.grid.cells.contains_key(&key) {
                    keys.push(key);
                }
            }
            keys.sort();

            for (tier, weight, zone) in keys {
                let a = ours.grid.lookup(tier, weight, zone);
                let b = theirs.grid.lookup(tier, weight, zone);
                let mismatch = match (a, b) {
                    (Some(x), Some(y)) => (x - y).abs() > PRICE_TOLERANCE,
                    (None, None) => false,
                    _ => true,
                };
                if mismatch {
                    discrepancies.push(RateDiscrepancy {
                        network: ours.name.clone(),
                        cell: format!("{}/{}/zone {}", tier, weight, zone),
                        ours: a,
                        theirs: b,
                    });
                }
            }
        }

        for theirs in &other.networks {
            if !self.networks.iter().any(|n| n.name == theirs.name) {
                discrepancies.push(RateDiscrepancy {
                    network: theirs.name.clone(),
                    cell: "*".to_string(),
                    ours: None,
                    theirs: None,
                });
            }
        }

        discrepancies
    }
}

/// One divergence between two ingests of the same card. A `cell` of
/// `"*"` means a whole sub-network is present on only one side.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct RateDiscrepancy {
    pub network: String,
    pub cell: String,
    pub ours: Option<f64>,
    pub theirs: Option<f64>,
}
