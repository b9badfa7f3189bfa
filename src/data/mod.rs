//! External reference data: the price-level series, the wage scale page and the
//! childcare-cost series, plus where they are loaded from and how they are cached.

pub mod cache;
pub mod cba;
pub mod config;
pub mod crianza;
pub mod source;
pub mod table;
pub mod wage;

pub use cache::ReferenceStore;
pub use config::SourceConfig;
pub use source::{DataSource, FileSource, HttpSource, LayeredSource, Payload, PayloadFormat, SourceId};
pub use table::{Cell, RawTable};
