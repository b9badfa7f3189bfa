//! Input/output helpers.
//!
//! - household detail CSV export (`export`)
//! - evaluation JSON read/write (`evaluation`)

pub mod evaluation;
pub mod export;

pub use evaluation::*;
pub use export::*;
