//! Cost model.
//!
//! Responsibilities:
//!
//! - price goods/services and care time for one child in each age band
//! - order a household's children by cost and apply economy-of-scale factors
//! - keep a single rounding rule for every currency figure
//!
//! Everything here is pure; callers supply the reference inputs.

pub mod household;
pub mod scale;

pub use household::*;
pub use scale::*;

/// Round a currency figure to a whole unit, ties to even.
///
/// Every figure is rounded where it is computed and later steps add the rounded
/// values, so this must be the only rounding used by the model.
pub fn round_currency(value: f64) -> f64 {
    value.round_ties_even()
}
