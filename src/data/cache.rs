//! Explicit cache of normalized reference data.
//!
//! Each feed is fetched and normalized at most once per TTL window. Values can
//! also be inserted directly, which is how CLI overrides and tests bypass the
//! network.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use tracing::{debug, info};

use crate::data::source::{DataSource, SourceId};
use crate::data::{cba, crianza, wage};
use crate::domain::{ReferenceCrianzaRow, ReferencePriceLevel, WagePair};
use crate::error::AppError;

#[derive(Debug, Clone, Copy)]
enum Cached {
    PriceLevel(ReferencePriceLevel),
    Wage(WagePair),
    Canasta(ReferenceCrianzaRow),
}

#[derive(Debug, Clone)]
struct Entry {
    value: Cached,
    stored_at: Instant,
}

pub struct ReferenceStore<S: DataSource> {
    source: S,
    ttl: Option<Duration>,
    entries: HashMap<SourceId, Entry>,
}

impl<S: DataSource> ReferenceStore<S> {
    pub fn new(source: S) -> Self {
        Self {
            source,
            ttl: None,
            entries: HashMap::new(),
        }
    }

    pub fn with_ttl(mut self, ttl: Option<Duration>) -> Self {
        self.ttl = ttl;
        self
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    pub fn insert_price_level(&mut self, value: ReferencePriceLevel) {
        self.put(SourceId::PriceLevel, Cached::PriceLevel(value));
    }

    pub fn insert_wage(&mut self, value: WagePair) {
        self.put(SourceId::Wage, Cached::Wage(value));
    }

    pub fn insert_canasta(&mut self, value: ReferenceCrianzaRow) {
        self.put(SourceId::Canasta, Cached::Canasta(value));
    }

    pub fn invalidate(&mut self, id: SourceId) {
        if self.entries.remove(&id).is_some() {
            debug!(source = %id, "cache entry dropped");
        }
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Whether a fresh value is held for `id`.
    pub fn is_cached(&self, id: SourceId) -> bool {
        self.fresh(id).is_some()
    }

    pub fn price_level(&mut self) -> Result<ReferencePriceLevel, AppError> {
        if let Some(Cached::PriceLevel(v)) = self.fresh(SourceId::PriceLevel) {
            return Ok(*v);
        }
        let table = self.source.fetch(SourceId::PriceLevel)?.table()?;
        let value = cba::latest_price_level(&table)?;
        info!(period = %value.period, value = value.value, "price level loaded");
        self.insert_price_level(value);
        Ok(value)
    }

    pub fn wage(&mut self) -> Result<WagePair, AppError> {
        if let Some(Cached::Wage(v)) = self.fresh(SourceId::Wage) {
            return Ok(*v);
        }
        let html = self.source.fetch(SourceId::Wage)?.text();
        let value = wage::parse_wage_page(&html)?;
        info!(hourly = value.hourly, monthly = value.monthly, "wage scale loaded");
        self.insert_wage(value);
        Ok(value)
    }

    pub fn canasta(&mut self) -> Result<ReferenceCrianzaRow, AppError> {
        if let Some(Cached::Canasta(v)) = self.fresh(SourceId::Canasta) {
            return Ok(*v);
        }
        let table = self.source.fetch(SourceId::Canasta)?.table()?;
        let value = crianza::latest_canasta(&table)?;
        info!(period = %value.period, "childcare cost series loaded");
        self.insert_canasta(value);
        Ok(value)
    }

    fn put(&mut self, id: SourceId, value: Cached) {
        self.entries.insert(
            id,
            Entry {
                value,
                stored_at: Instant::now(),
            },
        );
    }

    fn fresh(&self, id: SourceId) -> Option<&Cached> {
        let entry = self.entries.get(&id)?;
        match self.ttl {
            Some(ttl) if entry.stored_at.elapsed() >= ttl => None,
            _ => Some(&entry.value),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::source::{Payload, PayloadFormat};
    use chrono::NaiveDate;
    use std::cell::Cell;

    /// Serves a fixed wage page and counts fetches.
    struct CountingSource {
        fetches: Cell<usize>,
    }

    impl DataSource for CountingSource {
        fn fetch(&self, id: SourceId) -> Result<Payload, AppError> {
            self.fetches.set(self.fetches.get() + 1);
            match id {
                SourceId::Wage => Ok(Payload {
                    format: PayloadFormat::Html,
                    bytes: b"<p>CUARTA CATEGORIA</p><p>Hora: $ 3.000,00 Mensual: $ 366.000,00</p>".to_vec(),
                    origin: "test".to_string(),
                }),
                _ => Err(AppError::fetch(format!("offline: {id}"))),
            }
        }
    }

    fn store() -> ReferenceStore<CountingSource> {
        ReferenceStore::new(CountingSource { fetches: Cell::new(0) })
    }

    #[test]
    fn fetches_once_then_serves_cached() {
        let mut store = store();
        let first = store.wage().unwrap();
        let second = store.wage().unwrap();
        assert_eq!(first, second);
        assert_eq!(store.source().fetches.get(), 1);
        assert!(store.is_cached(SourceId::Wage));
    }

    #[test]
    fn invalidate_forces_refetch() {
        let mut store = store();
        store.wage().unwrap();
        store.invalidate(SourceId::Wage);
        assert!(!store.is_cached(SourceId::Wage));
        store.wage().unwrap();
        assert_eq!(store.source().fetches.get(), 2);
    }

    #[test]
    fn zero_ttl_never_serves_cached() {
        let mut store = store().with_ttl(Some(Duration::ZERO));
        store.wage().unwrap();
        store.wage().unwrap();
        assert_eq!(store.source().fetches.get(), 2);
    }

    #[test]
    fn injected_values_skip_the_source() {
        let mut store = store();
        let level = ReferencePriceLevel {
            period: NaiveDate::from_ymd_opt(2025, 6, 1).unwrap(),
            value: 306_000.0,
        };
        store.insert_price_level(level);
        assert_eq!(store.price_level().unwrap(), level);
        assert_eq!(store.source().fetches.get(), 0);
    }

    #[test]
    fn fetch_errors_propagate_and_cache_nothing() {
        let mut store = store();
        assert!(store.canasta().is_err());
        assert!(!store.is_cached(SourceId::Canasta));
        store.clear();
        assert!(!store.is_cached(SourceId::Wage));
    }
}
