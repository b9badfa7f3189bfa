//! Age bands.
//!
//! Five internal bands partition `[0, 17]`. The external childcare-cost series
//! publishes four bands of its own; `AgeBand::reference_band` is the fixed
//! correspondence between the two.

use serde::{Deserialize, Serialize};

/// Internal age band used to look up cost coefficients.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum AgeBand {
    #[serde(rename = "<1")]
    Under1,
    #[serde(rename = "1-3")]
    From1To3,
    #[serde(rename = "4-5")]
    From4To5,
    #[serde(rename = "6-11")]
    From6To11,
    #[serde(rename = "12-17")]
    From12To17,
}

/// Per-band constants of the costing methodology.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BandCoefficients {
    /// Fraction of the adult-equivalent reference expenditure attributed to goods
    /// and services.
    pub goods_fraction: f64,
    /// Monthly care-time requirement, in hours.
    pub care_hours: f64,
}

impl AgeBand {
    pub const ALL: [AgeBand; 5] = [
        AgeBand::Under1,
        AgeBand::From1To3,
        AgeBand::From4To5,
        AgeBand::From6To11,
        AgeBand::From12To17,
    ];

    /// Oldest age (in years) that still receives a band.
    pub const MAX_AGE: f64 = 17.0;

    /// Map an age in years to its band.
    ///
    /// `[0, 1)` is `<1`. From one year on, completed years decide the band, so
    /// `3.5` falls in `1-3`. Negative, non-finite and `> 17` ages have no band.
    pub fn classify(age: f64) -> Option<AgeBand> {
        if !age.is_finite() || age < 0.0 || age > Self::MAX_AGE {
            return None;
        }
        if age < 1.0 {
            return Some(AgeBand::Under1);
        }
        match age.floor() as u32 {
            1..=3 => Some(AgeBand::From1To3),
            4..=5 => Some(AgeBand::From4To5),
            6..=11 => Some(AgeBand::From6To11),
            12..=17 => Some(AgeBand::From12To17),
            _ => None,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            AgeBand::Under1 => "<1",
            AgeBand::From1To3 => "1-3",
            AgeBand::From4To5 => "4-5",
            AgeBand::From6To11 => "6-11",
            AgeBand::From12To17 => "12-17",
        }
    }

    pub fn coefficients(self) -> BandCoefficients {
        let (goods_fraction, care_hours) = match self {
            AgeBand::Under1 => (0.298, 129.0),
            AgeBand::From1To3 => (0.298, 66.0),
            AgeBand::From4To5 => (0.298, 52.0),
            AgeBand::From6To11 => (0.577, 57.0),
            AgeBand::From12To17 => (0.647, 24.0),
        };
        BandCoefficients {
            goods_fraction,
            care_hours,
        }
    }

    /// Infants need round-the-clock care, which is paid at the monthly rate
    /// rather than by the hour.
    pub fn uses_full_time_rate(self) -> bool {
        self == AgeBand::Under1
    }

    /// External band this band is compared against, if any.
    pub fn reference_band(self) -> Option<ReferenceBand> {
        match self {
            AgeBand::Under1 => Some(ReferenceBand::Under1),
            AgeBand::From1To3 => Some(ReferenceBand::From1To3),
            AgeBand::From4To5 => Some(ReferenceBand::From4To5),
            AgeBand::From6To11 => Some(ReferenceBand::From6To12),
            AgeBand::From12To17 => None,
        }
    }
}

impl std::fmt::Display for AgeBand {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Band published by the external childcare-cost series.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ReferenceBand {
    #[serde(rename = "<1")]
    Under1,
    #[serde(rename = "1-3")]
    From1To3,
    #[serde(rename = "4-5")]
    From4To5,
    #[serde(rename = "6-12")]
    From6To12,
}

impl ReferenceBand {
    pub const ALL: [ReferenceBand; 4] = [
        ReferenceBand::Under1,
        ReferenceBand::From1To3,
        ReferenceBand::From4To5,
        ReferenceBand::From6To12,
    ];

    pub fn label(self) -> &'static str {
        match self {
            ReferenceBand::Under1 => "<1",
            ReferenceBand::From1To3 => "1-3",
            ReferenceBand::From4To5 => "4-5",
            ReferenceBand::From6To12 => "6-12",
        }
    }

    /// Tokens that must all appear in a flattened column label for the column to
    /// belong to this band.
    pub fn tokens(self) -> &'static [&'static str] {
        match self {
            ReferenceBand::Under1 => &["menor"],
            ReferenceBand::From1To3 => &["1", "3"],
            ReferenceBand::From4To5 => &["4", "5"],
            ReferenceBand::From6To12 => &["6", "12"],
        }
    }
}

impl std::fmt::Display for ReferenceBand {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::{prop_assert, prop_assert_eq, proptest};

    #[test]
    fn classify_band_edges() {
        assert_eq!(AgeBand::classify(0.0), Some(AgeBand::Under1));
        assert_eq!(AgeBand::classify(0.5), Some(AgeBand::Under1));
        assert_eq!(AgeBand::classify(1.0), Some(AgeBand::From1To3));
        assert_eq!(AgeBand::classify(3.0), Some(AgeBand::From1To3));
        assert_eq!(AgeBand::classify(3.5), Some(AgeBand::From1To3));
        assert_eq!(AgeBand::classify(4.0), Some(AgeBand::From4To5));
        assert_eq!(AgeBand::classify(5.0), Some(AgeBand::From4To5));
        assert_eq!(AgeBand::classify(6.0), Some(AgeBand::From6To11));
        assert_eq!(AgeBand::classify(11.0), Some(AgeBand::From6To11));
        assert_eq!(AgeBand::classify(12.0), Some(AgeBand::From12To17));
        assert_eq!(AgeBand::classify(17.0), Some(AgeBand::From12To17));
    }

    #[test]
    fn classify_out_of_range_is_none() {
        assert_eq!(AgeBand::classify(-1.0), None);
        assert_eq!(AgeBand::classify(18.0), None);
        assert_eq!(AgeBand::classify(17.5), None);
        assert_eq!(AgeBand::classify(f64::NAN), None);
    }

    #[test]
    fn teen_band_has_no_reference_counterpart() {
        assert_eq!(AgeBand::From12To17.reference_band(), None);
        assert_eq!(
            AgeBand::From6To11.reference_band(),
            Some(ReferenceBand::From6To12)
        );
        let mapped: Vec<_> = AgeBand::ALL.iter().filter_map(|b| b.reference_band()).collect();
        assert_eq!(mapped, ReferenceBand::ALL.to_vec());
    }

    proptest! {
        #[test]
        fn prop_every_age_in_range_gets_exactly_one_band(tenths in 0u32..=170) {
            let age = tenths as f64 / 10.0;
            let band = AgeBand::classify(age);
            prop_assert!(band.is_some());

            // Bands are ordered; a later age never lands in an earlier band.
            let next = AgeBand::classify((age + 0.1).min(AgeBand::MAX_AGE));
            prop_assert!(next >= band);
        }

        #[test]
        fn prop_whole_years_match_inclusive_bounds(years in 0u32..=17) {
            let expected = match years {
                0 => AgeBand::Under1,
                1..=3 => AgeBand::From1To3,
                4..=5 => AgeBand::From4To5,
                6..=11 => AgeBand::From6To11,
                _ => AgeBand::From12To17,
            };
            prop_assert_eq!(AgeBand::classify(years as f64), Some(expected));
        }
    }
}
