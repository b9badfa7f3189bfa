//! `crianza` library crate.
//!
//! The binary (`crianza`) is a thin wrapper around this library so that:
//!
//! - the cost model is testable without spawning processes
//! - the CLI and the terminal form share one evaluation pipeline
//! - reference data sources can be swapped for local fixtures

pub mod app;
pub mod cli;
pub mod compare;
pub mod cost;
pub mod data;
pub mod domain;
pub mod error;
pub mod io;
pub mod logging;
pub mod report;
pub mod tui;
