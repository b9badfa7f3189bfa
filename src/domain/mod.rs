//! Domain types used throughout the calculator.
//!
//! This module defines:
//!
//! - age bands and their fixed cost coefficients (`AgeBand`, `BandCoefficients`)
//! - the bands published by the external childcare-cost series (`ReferenceBand`)
//! - reference inputs (`ReferencePriceLevel`, `WagePair`, `ReferenceCrianzaRow`)
//! - computed outputs (`ChildCostRecord`, `HouseholdResult`, `ComparisonRow`)

pub mod band;
pub mod types;

pub use band::*;
pub use types::*;
