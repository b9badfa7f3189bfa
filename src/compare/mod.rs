//! Side-by-side comparison against the external childcare-cost series.
//!
//! Only bands present in the household are compared, and the internal side is
//! always the unscaled cost of one hypothetical child in that band, never the
//! household's scaled figures.

use std::collections::BTreeSet;

use crate::cost::band_cost;
use crate::domain::{
    AgeBand, BandTriple, ComparisonRow, CostParams, Difference, ReferenceCrianzaRow, SubCategory, WagePair,
};

/// Bands present among `ages`, in band order.
pub fn bands_present(ages: &[f64]) -> Vec<AgeBand> {
    let set: BTreeSet<AgeBand> = ages.iter().filter_map(|&a| AgeBand::classify(a)).collect();
    set.into_iter().collect()
}

/// Build one comparison row per band present in the household.
pub fn build_comparison(
    ages: &[f64],
    price_level: f64,
    wages: &WagePair,
    params: &CostParams,
    reference: &ReferenceCrianzaRow,
) -> Vec<ComparisonRow> {
    bands_present(ages)
        .into_iter()
        .map(|band| {
            let internal = band_cost(band, price_level, wages, params).triple();
            let reference_band = band.reference_band();
            ComparisonRow {
                band,
                reference_band,
                internal,
                external: reference_band.map(|rb| *reference.band(rb)),
            }
        })
        .collect()
}

impl ComparisonRow {
    pub fn is_comparable(&self) -> bool {
        self.external.is_some()
    }

    pub fn internal_value(&self, sub: SubCategory) -> f64 {
        self.internal.get(sub)
    }

    pub fn external_value(&self, sub: SubCategory) -> Option<f64> {
        self.external.as_ref().map(|t: &BandTriple| t.get(sub))
    }

    /// Internal minus external; `None` when there is no external counterpart.
    pub fn difference(&self, sub: SubCategory) -> Option<Difference> {
        let external = self.external_value(sub)?;
        let absolute = self.internal_value(sub) - external;
        let percent = if external != 0.0 {
            Some(absolute / external * 100.0)
        } else {
            None
        };
        Some(Difference { absolute, percent })
    }

    /// Row label, noting the band mismatch for school-age children.
    pub fn label(&self) -> String {
        match self.reference_band {
            Some(rb) if rb.label() != self.band.label() => {
                format!("{} (vs external {})", self.band.label(), rb.label())
            }
            Some(_) => self.band.label().to_string(),
            None => format!("{} (no external equivalent)", self.band.label()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn triple(goods: f64, care_time: f64) -> BandTriple {
        BandTriple {
            goods,
            care_time,
            total: goods + care_time,
        }
    }

    fn reference() -> ReferenceCrianzaRow {
        ReferenceCrianzaRow {
            period: NaiveDate::from_ymd_opt(2025, 6, 1).unwrap(),
            under_1: triple(200_000.0, 300_000.0),
            from_1_to_3: triple(240_000.0, 280_000.0),
            from_4_to_5: triple(250_000.0, 200_000.0),
            from_6_to_12: triple(320_000.0, 190_000.0),
        }
    }

    fn wages() -> WagePair {
        WagePair {
            hourly: 3_000.0,
            monthly: 366_000.0,
        }
    }

    #[test]
    fn only_present_bands_are_compared() {
        let rows = build_comparison(&[5.0, 4.0, 8.0], 306_000.0, &wages(), &CostParams::default(), &reference());
        let bands: Vec<AgeBand> = rows.iter().map(|r| r.band).collect();
        assert_eq!(bands, vec![AgeBand::From4To5, AgeBand::From6To11]);
    }

    #[test]
    fn teen_row_has_external_explicitly_absent() {
        let rows = build_comparison(&[15.0], 306_000.0, &wages(), &CostParams::default(), &reference());
        assert_eq!(rows.len(), 1);
        let row = &rows[0];
        assert_eq!(row.band, AgeBand::From12To17);
        assert!(!row.is_comparable());
        assert_eq!(row.external_value(SubCategory::Total), None);
        assert_eq!(row.difference(SubCategory::Total), None);
        assert!(row.internal_value(SubCategory::Total) > 0.0);
    }

    #[test]
    fn school_age_is_compared_against_6_to_12() {
        let rows = build_comparison(&[9.0], 306_000.0, &wages(), &CostParams::default(), &reference());
        assert_eq!(rows[0].external, Some(reference().from_6_to_12));
        assert_eq!(rows[0].label(), "6-11 (vs external 6-12)");
    }

    #[test]
    fn internal_side_is_single_child_unscaled_cost() {
        let rows = build_comparison(&[5.0, 5.0], 306_000.0, &wages(), &CostParams::default(), &reference());
        assert_eq!(rows.len(), 1);
        let expected = band_cost(AgeBand::From4To5, 306_000.0, &wages(), &CostParams::default());
        assert_eq!(rows[0].internal, expected.triple());
    }

    #[test]
    fn difference_is_internal_minus_external() {
        let row = ComparisonRow {
            band: AgeBand::From1To3,
            reference_band: Some(crate::domain::ReferenceBand::From1To3),
            internal: triple(300_000.0, 250_000.0),
            external: Some(triple(240_000.0, 250_000.0)),
        };
        let goods = row.difference(SubCategory::Goods).unwrap();
        assert_eq!(goods.absolute, 60_000.0);
        assert!((goods.percent.unwrap() - 25.0).abs() < 1e-9);

        let care = row.difference(SubCategory::CareTime).unwrap();
        assert_eq!(care.absolute, 0.0);
        assert_eq!(care.percent, Some(0.0));
    }

    #[test]
    fn zero_external_has_no_percent() {
        let row = ComparisonRow {
            band: AgeBand::Under1,
            reference_band: Some(crate::domain::ReferenceBand::Under1),
            internal: triple(10.0, 0.0),
            external: Some(triple(0.0, 0.0)),
        };
        let diff = row.difference(SubCategory::Goods).unwrap();
        assert_eq!(diff.absolute, 10.0);
        assert_eq!(diff.percent, None);
    }

    #[test]
    fn no_children_no_rows() {
        let rows = build_comparison(&[], 306_000.0, &wages(), &CostParams::default(), &reference());
        assert!(rows.is_empty());
    }
}
