//! Frequency to amateur band classification.
//!
//! Frequencies are exact decimals in MHz. The table bounds are normative,
//! uneven precision included, and must not be rounded.

use std::fmt;

use rust_decimal::Decimal;
use rust_decimal_macros::dec;

/// An ADIF band, as a labeled frequency range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Band {
    /// Submillimeter, 300 GHz to 7500 GHz.
    Submm,
    /// 1 millimeter.
    B1mm,
    /// 2 millimeters.
    B2mm,
    /// 2.5 millimeters.
    B2p5mm,
    /// 4 millimeters.
    B4mm,
    /// 6 millimeters.
    B6mm,
    /// 1.25 centimeters.
    B1p25cm,
    /// 3 centimeters.
    B3cm,
    /// 6 centimeters.
    B6cm,
    /// 9 centimeters.
    B9cm,
    /// 13 centimeters.
    B13cm,
    /// 23 centimeters.
    B23cm,
    /// 33 centimeters.
    B33cm,
    /// 70 centimeters.
    B70cm,
    /// 1.25 meters.
    B1p25m,
    /// 2 meters.
    B2m,
    /// 4 meters.
    B4m,
    /// 5 meters.
    B5m,
    /// 6 meters.
    B6m,
    /// 8 meters.
    B8m,
    /// 10 meters.
    B10m,
    /// 12 meters.
    B12m,
    /// 15 meters.
    B15m,
    /// 17 meters.
    B17m,
    /// 20 meters.
    B20m,
    /// 30 meters.
    B30m,
    /// 40 meters.
    B40m,
    /// 60 meters.
    B60m,
    /// 80 meters.
    B80m,
    /// 160 meters.
    B160m,
    /// 560 meters.
    B560m,
    /// 630 meters.
    B630m,
    /// 2190 meters.
    B2190m,
    /// Frequency outside every known band.
    Unknown,
}

impl Band {
    /// The ADIF label for this band.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Submm => "submm",
            Self::B1mm => "1mm",
            Self::B2mm => "2mm",
            Self::B2p5mm => "2.5mm",
            Self::B4mm => "4mm",
            Self::B6mm => "6mm",
            Self::B1p25cm => "1.25cm",
            Self::B3cm => "3cm",
            Self::B6cm => "6cm",
            Self::B9cm => "9cm",
            Self::B13cm => "13cm",
            Self::B23cm => "23cm",
            Self::B33cm => "33cm",
            Self::B70cm => "70cm",
            Self::B1p25m => "1.25m",
            Self::B2m => "2m",
            Self::B4m => "4m",
            Self::B5m => "5m",
            Self::B6m => "6m",
            Self::B8m => "8m",
            Self::B10m => "10m",
            Self::B12m => "12m",
            Self::B15m => "15m",
            Self::B17m => "17m",
            Self::B20m => "20m",
            Self::B30m => "30m",
            Self::B40m => "40m",
            Self::B60m => "60m",
            Self::B80m => "80m",
            Self::B160m => "160m",
            Self::B560m => "560m",
            Self::B630m => "630m",
            Self::B2190m => "2190m",
            Self::Unknown => "0m",
        }
    }
}

impl fmt::Display for Band {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An inclusive frequency range in MHz.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BandRange {
    /// Highest frequency in the range.
    pub upper: Decimal,
    /// Lowest frequency in the range.
    pub lower: Decimal,
    /// Band reported for frequencies in the range.
    pub band: Band,
}

impl BandRange {
    /// Create a range from its upper and lower bounds.
    #[must_use]
    pub const fn new(upper: Decimal, lower: Decimal, band: Band) -> Self {
        Self { upper, lower, band }
    }

    /// Check whether `freq` lies within the range, bounds included.
    #[must_use]
    pub fn contains(&self, freq: Decimal) -> bool {
        self.lower <= freq && freq <= self.upper
    }
}

/// Band ranges, highest frequency first.
pub const BAND_TABLE: &[BandRange] = &[
    BandRange::new(dec!(7500000), dec!(300000), Band::Submm),
    BandRange::new(dec!(250000), dec!(241000), Band::B1mm),
    BandRange::new(dec!(149000), dec!(134000), Band::B2mm),
    BandRange::new(dec!(123000), dec!(119980), Band::B2p5mm),
    BandRange::new(dec!(81000), dec!(75500), Band::B4mm),
    BandRange::new(dec!(47200), dec!(47000), Band::B6mm),
    BandRange::new(dec!(24250), dec!(24000), Band::B1p25cm),
    BandRange::new(dec!(10500), dec!(10000), Band::B3cm),
    BandRange::new(dec!(5925), dec!(5650), Band::B6cm),
    BandRange::new(dec!(3500), dec!(3300), Band::B9cm),
    BandRange::new(dec!(2450), dec!(2300), Band::B13cm),
    BandRange::new(dec!(1300), dec!(1240), Band::B23cm),
    BandRange::new(dec!(928), dec!(902), Band::B33cm),
    BandRange::new(dec!(450), dec!(420), Band::B70cm),
    BandRange::new(dec!(225), dec!(222), Band::B1p25m),
    BandRange::new(dec!(148), dec!(144), Band::B2m),
    BandRange::new(dec!(71), dec!(70), Band::B4m),
    BandRange::new(dec!(69.9), dec!(54.000001), Band::B5m),
    BandRange::new(dec!(54), dec!(50), Band::B6m),
    BandRange::new(dec!(45), dec!(40), Band::B8m),
    BandRange::new(dec!(29.7), dec!(28.0), Band::B10m),
    BandRange::new(dec!(24.99), dec!(24.890), Band::B12m),
    BandRange::new(dec!(21.45), dec!(21.0), Band::B15m),
    BandRange::new(dec!(18.168), dec!(18.068), Band::B17m),
    BandRange::new(dec!(14.35), dec!(14.0), Band::B20m),
    BandRange::new(dec!(10.15), dec!(10.1), Band::B30m),
    BandRange::new(dec!(7.3), dec!(7.0), Band::B40m),
    BandRange::new(dec!(5.45), dec!(5.06), Band::B60m),
    BandRange::new(dec!(4.0), dec!(3.5), Band::B80m),
    BandRange::new(dec!(2.0), dec!(1.8), Band::B160m),
    BandRange::new(dec!(0.504), dec!(0.501), Band::B560m),
    BandRange::new(dec!(0.479), dec!(0.472), Band::B630m),
    BandRange::new(dec!(0.1378), dec!(0.1357), Band::B2190m),
];

/// Classify a frequency in MHz using [`BAND_TABLE`].
///
/// Never fails: frequencies outside every range map to [`Band::Unknown`].
#[must_use]
pub fn classify(freq_mhz: Decimal) -> Band {
    classify_with(BAND_TABLE, freq_mhz)
}

/// Classify a frequency against an arbitrary table. The first matching range
/// wins.
#[must_use]
pub fn classify_with(table: &[BandRange], freq_mhz: Decimal) -> Band {
    table
        .iter()
        .find(|range| range.contains(freq_mhz))
        .map_or(Band::Unknown, |range| range.band)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_hf_bands() {
        assert_eq!(classify(dec!(14.025)), Band::B20m);
        assert_eq!(classify(dec!(7.074)), Band::B40m);
        assert_eq!(classify(dec!(3.573)), Band::B80m);
        assert_eq!(classify(dec!(1.830)), Band::B160m);
        assert_eq!(classify(dec!(28.4)), Band::B10m);
    }

    #[test]
    fn test_classify_vhf_and_up() {
        assert_eq!(classify(dec!(144.174)), Band::B2m);
        assert_eq!(classify(dec!(432.1)), Band::B70cm);
        assert_eq!(classify(dec!(1296.2)), Band::B23cm);
        assert_eq!(classify(dec!(10368)), Band::B3cm);
        assert_eq!(classify(dec!(400000)), Band::Submm);
    }

    #[test]
    fn test_every_range_includes_its_bounds() {
        for range in BAND_TABLE {
            assert_eq!(classify(range.lower), range.band, "lower of {}", range.band);
            assert_eq!(classify(range.upper), range.band, "upper of {}", range.band);
        }
    }

    #[test]
    fn test_every_range_includes_its_midpoint() {
        for range in BAND_TABLE {
            let mid = (range.lower + range.upper) / dec!(2);
            assert_eq!(classify(mid), range.band);
        }
    }

    #[test]
    fn test_table_is_ordered_and_disjoint() {
        for pair in BAND_TABLE.windows(2) {
            assert!(pair[0].lower > pair[1].upper, "{} / {}", pair[0].band, pair[1].band);
        }
        for range in BAND_TABLE {
            assert!(range.lower <= range.upper);
        }
    }

    #[test]
    fn test_no_binary_rounding_at_bounds() {
        // Just outside the 20m upper edge.
        assert_eq!(classify(dec!(14.350001)), Band::Unknown);
        assert_eq!(classify(dec!(14.35)), Band::B20m);
        // 5m starts a hair above 6m.
        assert_eq!(classify(dec!(54.0000005)), Band::Unknown);
        assert_eq!(classify(dec!(54.000001)), Band::B5m);
        assert_eq!(classify(dec!(54)), Band::B6m);
    }

    #[test]
    fn test_unknown_frequencies() {
        assert_eq!(classify(Decimal::ZERO), Band::Unknown);
        assert_eq!(classify(dec!(-14.0)), Band::Unknown);
        assert_eq!(classify(dec!(12.0)), Band::Unknown);
        assert_eq!(classify(dec!(9999999)), Band::Unknown);
        assert_eq!(Band::Unknown.as_str(), "0m");
    }

    #[test]
    fn test_first_match_wins() {
        let table = [
            BandRange::new(dec!(20), dec!(10), Band::B30m),
            BandRange::new(dec!(15), dec!(12), Band::B20m),
        ];
        assert_eq!(classify_with(&table, dec!(14)), Band::B30m);
        assert_eq!(classify_with(&table, dec!(21)), Band::Unknown);

        let reversed = [table[1], table[0]];
        assert_eq!(classify_with(&reversed, dec!(14)), Band::B20m);
    }

    #[test]
    fn test_empty_table() {
        assert_eq!(classify_with(&[], dec!(14)), Band::Unknown);
    }

    #[test]
    fn test_band_display() {
        assert_eq!(Band::B2p5mm.to_string(), "2.5mm");
        assert_eq!(Band::B1p25cm.to_string(), "1.25cm");
        assert_eq!(Band::B20m.to_string(), "20m");
        assert_eq!(Band::Submm.to_string(), "submm");
    }
}
