//! Per-band and per-household cost computation.

use crate::cost::{round_currency, scale_factor};
use crate::domain::{AgeBand, BandCost, ChildCostRecord, CostParams, HouseholdResult, WagePair};

/// Adult-equivalent reference expenditure implied by a basic-basket price level.
///
/// Not rounded: it is a scale, not a figure shown per child.
pub fn reference_expenditure(price_level: f64, params: &CostParams) -> f64 {
    price_level * params.price_multiplier * params.equivalence_adult
}

/// Hourly rates available to the care-time computation.
#[derive(Debug, Clone, Copy)]
struct CareRates {
    hourly: f64,
    full_time: f64,
}

impl CareRates {
    fn from_wages(wages: &WagePair) -> Self {
        Self {
            hourly: wages.hourly,
            full_time: wages.full_time_rate(),
        }
    }

    fn for_band(&self, band: AgeBand) -> f64 {
        if band.uses_full_time_rate() {
            self.full_time
        } else {
            self.hourly
        }
    }
}

fn cost_for_band(band: AgeBand, reference: f64, rates: &CareRates) -> BandCost {
    let coeffs = band.coefficients();
    let goods = round_currency(coeffs.goods_fraction * reference);
    let care_time = round_currency(coeffs.care_hours * rates.for_band(band));
    BandCost {
        band,
        goods,
        care_time,
        total: goods + care_time,
    }
}

/// Unscaled cost of exactly one child in `band`.
pub fn band_cost(band: AgeBand, price_level: f64, wages: &WagePair, params: &CostParams) -> BandCost {
    let reference = reference_expenditure(price_level, params);
    cost_for_band(band, reference, &CareRates::from_wages(wages))
}

/// Unscaled single-child cost for every band, in band order.
pub fn band_costs(price_level: f64, wages: &WagePair, params: &CostParams) -> Vec<BandCost> {
    let reference = reference_expenditure(price_level, params);
    let rates = CareRates::from_wages(wages);
    AgeBand::ALL
        .iter()
        .map(|&band| cost_for_band(band, reference, &rates))
        .collect()
}

/// Cost a household.
///
/// Ages without a band are skipped. Children are ordered by descending unscaled
/// cost; equal costs keep their input order (stable sort). The household total is
/// the sum of the already-rounded scaled costs.
pub fn compute_household(
    ages: &[f64],
    price_level: f64,
    wages: &WagePair,
    params: &CostParams,
) -> HouseholdResult {
    let reference = reference_expenditure(price_level, params);
    let rates = CareRates::from_wages(wages);

    let mut costed: Vec<(f64, BandCost)> = ages
        .iter()
        .filter_map(|&age| AgeBand::classify(age).map(|band| (age, cost_for_band(band, reference, &rates))))
        .collect();

    costed.sort_by(|a, b| b.1.total.total_cmp(&a.1.total));

    let mut total = 0.0;
    let mut children = Vec::with_capacity(costed.len());
    for (rank, (age, cost)) in costed.into_iter().enumerate() {
        let factor = scale_factor(rank);
        let scaled_cost = round_currency(cost.total * factor);
        total += scaled_cost;
        children.push(ChildCostRecord {
            age,
            band: cost.band,
            goods: cost.goods,
            care_time: cost.care_time,
            unscaled_total: cost.total,
            scale_factor: factor,
            scaled_cost,
        });
    }

    HouseholdResult { children, total }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    const PRICE_LEVEL: f64 = 306_000.0;

    fn wages() -> WagePair {
        WagePair {
            hourly: 3_000.0,
            monthly: 366_000.0,
        }
    }

    fn assert_approx(actual: f64, expected: f64) {
        assert!(
            (actual - expected).abs() <= 1e-6,
            "expected {expected}, got {actual}"
        );
    }

    #[test]
    fn reference_expenditure_scenario() {
        let reference = reference_expenditure(PRICE_LEVEL, &CostParams::default());
        assert_approx(reference, 1_634_268.0);
    }

    #[test]
    fn goods_for_4_to_5_is_rounded_share_of_reference() {
        let cost = band_cost(AgeBand::From4To5, PRICE_LEVEL, &wages(), &CostParams::default());
        // 0.298 * 1_634_268 = 487_011.864
        assert_eq!(cost.goods, 487_012.0);
        assert_eq!(cost.care_time, 52.0 * 3_000.0);
        assert_eq!(cost.total, cost.goods + cost.care_time);
    }

    #[test]
    fn infant_uses_full_time_rate_and_preschooler_uses_hourly() {
        let result = compute_household(&[0.5, 5.0], PRICE_LEVEL, &wages(), &CostParams::default());
        assert_eq!(result.children.len(), 2);

        // 366_000 / 183 = 2_000 per hour for round-the-clock care.
        let infant = &result.children[0];
        assert_eq!(infant.band, AgeBand::Under1);
        assert_eq!(infant.care_time, 129.0 * 2_000.0);
        assert_eq!(infant.unscaled_total, 745_012.0);
        assert_eq!(infant.scale_factor, 1.0);
        assert_eq!(infant.scaled_cost, 745_012.0);

        let preschooler = &result.children[1];
        assert_eq!(preschooler.band, AgeBand::From4To5);
        assert_eq!(preschooler.care_time, 52.0 * 3_000.0);
        assert_eq!(preschooler.unscaled_total, 643_012.0);
        assert_eq!(preschooler.scale_factor, 0.7);
        assert_eq!(preschooler.scaled_cost, 450_108.0);

        assert_eq!(result.total, 745_012.0 + 450_108.0);
    }

    #[test]
    fn single_child_total_is_unscaled_cost() {
        let result = compute_household(&[9.0], PRICE_LEVEL, &wages(), &CostParams::default());
        assert_eq!(result.children.len(), 1);
        assert_eq!(result.children[0].scale_factor, 1.0);
        assert_eq!(result.total, result.children[0].unscaled_total);
    }

    #[test]
    fn equal_costs_keep_input_order() {
        let result = compute_household(&[5.0, 4.0], PRICE_LEVEL, &wages(), &CostParams::default());
        assert_eq!(result.children[0].age, 5.0);
        assert_eq!(result.children[0].scale_factor, 1.0);
        assert_eq!(result.children[1].age, 4.0);
        assert_eq!(result.children[1].scale_factor, 0.7);
    }

    #[test]
    fn third_and_later_children_get_half() {
        let ages = [2.0, 7.0, 13.0, 0.0, 16.0];
        let result = compute_household(&ages, PRICE_LEVEL, &wages(), &CostParams::default());
        assert_eq!(result.children.len(), 5);
        for pair in result.children.windows(2) {
            assert!(pair[0].unscaled_total >= pair[1].unscaled_total);
        }
        assert!(result.children[2..].iter().all(|c| c.scale_factor == 0.5));
    }

    #[test]
    fn uncostable_ages_are_skipped() {
        let result = compute_household(&[18.0, -1.0, 3.0], PRICE_LEVEL, &wages(), &CostParams::default());
        assert_eq!(result.children.len(), 1);
        assert_eq!(result.children[0].band, AgeBand::From1To3);
    }

    #[test]
    fn empty_household_is_zero() {
        let result = compute_household(&[], PRICE_LEVEL, &wages(), &CostParams::default());
        assert!(result.is_empty());
        assert_eq!(result.total, 0.0);

        let result = compute_household(&[20.0], PRICE_LEVEL, &wages(), &CostParams::default());
        assert!(result.is_empty());
        assert_eq!(result.total, 0.0);
    }

    #[test]
    fn band_costs_cover_every_band_in_order() {
        let costs = band_costs(PRICE_LEVEL, &wages(), &CostParams::default());
        let bands: Vec<AgeBand> = costs.iter().map(|c| c.band).collect();
        assert_eq!(bands, AgeBand::ALL.to_vec());
        let direct = band_cost(AgeBand::From12To17, PRICE_LEVEL, &wages(), &CostParams::default());
        assert_eq!(costs[4], direct);
    }

    fn whole_year_ages() -> impl Strategy<Value = Vec<f64>> {
        proptest::collection::vec(0u32..=17, 0..=10)
            .prop_map(|v| v.into_iter().map(f64::from).collect())
    }

    proptest! {
        #![proptest_config(proptest::test_runner::Config::with_cases(64))]

        #[test]
        fn prop_total_ignores_input_order(
            (ages, shuffled) in whole_year_ages().prop_flat_map(|v| (Just(v.clone()), Just(v).prop_shuffle())),
            price_level in 50_000u32..600_000,
            hourly in 500u32..8_000,
        ) {
            let wages = WagePair { hourly: hourly as f64, monthly: hourly as f64 * 150.0 };
            let params = CostParams::default();
            let a = compute_household(&ages, price_level as f64, &wages, &params);
            let b = compute_household(&shuffled, price_level as f64, &wages, &params);
            prop_assert_eq!(a.total, b.total);
        }

        #[test]
        fn prop_higher_price_level_never_lowers_total(
            ages in whole_year_ages(),
            price_level in 50_000u32..600_000,
            bump in 0u32..200_000,
        ) {
            let wages = wages();
            let params = CostParams::default();
            let low = compute_household(&ages, price_level as f64, &wages, &params);
            let high = compute_household(&ages, (price_level + bump) as f64, &wages, &params);
            prop_assert!(high.total >= low.total);
        }

        #[test]
        fn prop_total_is_sum_of_scaled_costs(ages in whole_year_ages()) {
            let result = compute_household(&ages, PRICE_LEVEL, &wages(), &CostParams::default());
            let sum: f64 = result.children.iter().map(|c| c.scaled_cost).sum();
            prop_assert_eq!(result.total, sum);
        }
    }
}
