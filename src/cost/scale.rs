//! Economy-of-scale factors.
//!
//! The most expensive child is fully costed; the second gets 0.7 and every
//! further child 0.5. Discounts are flat steps rather than a continuous decay.

/// Factor for the highest-cost child.
pub const LEAD_FACTOR: f64 = 1.0;
/// Factor for the second-highest-cost child.
pub const SECOND_FACTOR: f64 = 0.7;
/// Factor for the third child onwards.
pub const FURTHER_FACTOR: f64 = 0.5;

/// Scale factor for the child at `rank` (0-based, by descending unscaled cost).
pub fn scale_factor(rank: usize) -> f64 {
    match rank {
        0 => LEAD_FACTOR,
        1 => SECOND_FACTOR,
        _ => FURTHER_FACTOR,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn factor_sequence() {
        let factors: Vec<f64> = (0..10).map(scale_factor).collect();
        assert_eq!(factors[0], 1.0);
        assert_eq!(factors[1], 0.7);
        assert!(factors[2..].iter().all(|&f| f == 0.5));
    }
}
