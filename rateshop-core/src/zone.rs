//! Destination zone resolution.
//!
//! Zones 1-8 band destinations by distance from a declared origin
//! region, approximated by the 3-digit destination prefix. True carrier
//! zone charts are origin/destination pair specific; this banding is
//! good enough for comparative savings analysis but must never be
//! presented as authoritative billing zone data.
//!
//! The chart is an injected, immutable `ZoneMap` value — one map per
//! declared origin — rather than a global table.

use std::fmt;
use std::ops::RangeInclusive;

use serde::Serialize;

use crate::policy::{DEFAULT_ZONE, REGIONAL_ZONE_MAX, ZONE_MAX, ZONE_MIN};

/// A shipping zone, 1 (closest) through 8 (farthest).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct Zone(u8);

impl Zone {
    /// The documented fallback for unmapped destinations.
    pub const DEFAULT: Zone = Zone(DEFAULT_ZONE);

    pub fn new(value: u8) -> Option<Zone> {
        (ZONE_MIN..=ZONE_MAX).contains(&value).then_some(Zone(value))
    }

    pub fn get(self) -> u8 {
        self.0
    }

    /// Zones 1-4 are regional reach; 5-8 are cross-country.
    pub fn is_regional(self) -> bool {
        self.0 <= REGIONAL_ZONE_MAX
    }
}

impl fmt::Display for Zone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Outcome of a zone resolution. `defaulted` marks destinations that
/// fell outside every configured range and took the fallback zone —
/// downstream reports must tally these, not fold them silently into the
/// fallback zone's volume.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct ZoneResolution {
    pub zone: Zone,
    pub defaulted: bool,
}

/// An ordered 3-digit-prefix chart for one declared origin region.
#[derive(Clone, Debug)]
pub struct ZoneMap {
    origin: String,
    ranges: Vec<(RangeInclusive<u16>, Zone)>,
    default_zone: Zone,
}

impl ZoneMap {
    /// Build a chart from prefix ranges. Ranges are checked in order;
    /// the first range containing the destination prefix wins.
    pub fn new(origin: impl Into<String>, ranges: Vec<(RangeInclusive<u16>, Zone)>) -> ZoneMap {
        ZoneMap {
            origin: origin.into(),
            ranges,
            default_zone: Zone::DEFAULT,
        }
    }

    /// Override the fallback zone for unmapped prefixes.
    pub fn with_default_zone(mut self, zone: Zone) -> ZoneMap {
        self.default_zone = zone;
        self
    }

    /// Built-in chart for a Northeast (PA-area) origin, the single-origin
    /// case of the source analyses.
    pub fn northeast() -> ZoneMap {
        let z = |n: u8| Zone::new(n).expect("builtin chart zone in range");
        ZoneMap::new(
            "US-Northeast",
            vec![
                (150..=196, z(1)),
                (10..=149, z(2)),
                (197..=199, z(2)),
                (200..=289, z(3)),
                (300..=399, z(3)),
                (400..=499, z(4)),
                (600..=699, z(4)),
                (500..=599, z(5)),
                (700..=799, z(5)),
                (800..=879, z(6)),
                (880..=899, z(7)),
                (900..=999, z(8)),
            ],
        )
    }

    pub fn origin(&self) -> &str {
        &self.origin
    }

    /// Resolve a destination zip to a zone.
    ///
    /// Unmapped or unparseable destinations never block a batch: they
    /// take the fallback zone with `defaulted: true` and a data-quality
    /// warning in the log.
    pub fn resolve(&self, destination_zip: &str) -> ZoneResolution {
        match prefix_of(destination_zip) {
            Some(prefix) => {
                for (range, zone) in &self.ranges {
                    if range.contains(&prefix) {
                        return ZoneResolution {
                            zone: *zone,
                            defaulted: false,
                        };
                    }
                }
                log::warn!(
                    "no zone range for prefix {:03} (destination '{}', origin {}); defaulting to zone {}",
                    prefix,
                    destination_zip,
                    self.origin,
                    self.default_zone
                );
                ZoneResolution {
                    zone: self.default_zone,
                    defaulted: true,
                }
            }
            None => {
                log::warn!(
                    "unparseable destination zip '{}'; defaulting to zone {}",
                    destination_zip,
                    self.default_zone
                );
                ZoneResolution {
                    zone: self.default_zone,
                    defaulted: true,
                }
            }
        }
    }
}

/// Normalized 3-digit prefix of a zip, as a zero-padded string.
///
/// Strips a zip+4 suffix and restores leading zeros lost upstream (a
/// spreadsheet turning "07001" into "7001" is routine in the source
/// data). Returns `None` for empty or non-numeric input.
pub fn zip_prefix(zip: &str) -> Option<String> {
    let base = zip.trim().split('-').next().unwrap_or("").trim();
    if base.is_empty() || base.len() > 9 || !base.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    let padded = format!("{:0>5}", base);
    Some(padded[..3].to_string())
}

fn prefix_of(zip: &str) -> Option<u16> {
    zip_prefix(zip).and_then(|p| p.parse().ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolves_mapped_prefixes() {
        let map = ZoneMap::northeast();
        assert_eq!(map.resolve("15213").zone.get(), 1); // Pittsburgh
        assert_eq!(map.resolve("30301").zone.get(), 3); // Atlanta
        assert_eq!(map.resolve("60601").zone.get(), 4); // Chicago
        assert_eq!(map.resolve("75201").zone.get(), 5); // Dallas
        assert_eq!(map.resolve("80202").zone.get(), 6); // Denver
        assert_eq!(map.resolve("90210").zone.get(), 8); // LA
        assert!(!map.resolve("90210").defaulted);
    }

    #[test]
    fn restores_lost_leading_zeros() {
        let map = ZoneMap::northeast();
        // "7001" is Avenel NJ 07001 after a spreadsheet ate the zero.
        let res = map.resolve("7001");
        assert_eq!(res.zone, map.resolve("07001").zone);
        assert!(!res.defaulted);
        assert_eq!(res.zone.get(), 2);
    }

    #[test]
    fn strips_zip_plus_four() {
        let map = ZoneMap::northeast();
        assert_eq!(map.resolve("90210-4321").zone.get(), 8);
    }

    #[test]
    fn unmapped_prefix_defaults_to_zone_five_with_flag() {
        let map = ZoneMap::northeast();
        // 005xx (Holtsville NY) sits below every configured range.
        let res = map.resolve("00501");
        assert_eq!(res.zone, Zone::DEFAULT);
        assert!(res.defaulted);
    }

    #[test]
    fn unparseable_zip_defaults_with_flag() {
        let map = ZoneMap::northeast();
        let res = map.resolve("N0T4ZIP");
        assert_eq!(res.zone, Zone::DEFAULT);
        assert!(res.defaulted);

        let blank = map.resolve("");
        assert!(blank.defaulted);
    }

    #[test]
    fn resolution_is_deterministic() {
        let map = ZoneMap::northeast();
        let first = map.resolve("84115");
        for _ in 0..100 {
            assert_eq!(map.resolve("84115"), first);
        }
    }

    #[test]
    fn custom_origin_chart_overrides_builtin() {
        let z = |n: u8| Zone::new(n).unwrap();
        // A West-coast origin sees California as zone 1.
        let map = ZoneMap::new("US-West", vec![(900..=935, z(1)), (100..=199, z(8))]);
        assert_eq!(map.resolve("90210").zone.get(), 1);
        assert_eq!(map.resolve("10001").zone.get(), 8);
    }

    #[test]
    fn zone_constructor_enforces_bounds() {
        assert!(Zone::new(0).is_none());
        assert!(Zone::new(9).is_none());
        assert_eq!(Zone::new(8).unwrap().get(), 8);
    }

    #[test]
    fn regional_band_splits_at_zone_four() {
        assert!(Zone::new(4).unwrap().is_regional());
        assert!(!Zone::new(5).unwrap().is_regional());
    }

    #[test]
    fn zip_prefix_normalizes() {
        assert_eq!(zip_prefix("07001").as_deref(), Some("070"));
        assert_eq!(zip_prefix("7001").as_deref(), Some("070"));
        assert_eq!(zip_prefix("90210-1234").as_deref(), Some("902"));
        assert_eq!(zip_prefix("902101234").as_deref(), Some("902"));
        assert_eq!(zip_prefix("abc"), None);
        assert_eq!(zip_prefix(""), None);
    }
}
