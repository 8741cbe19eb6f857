//! Memoizing provider decorator.

use super::PriceProvider;
use crate::series::PriceSeries;
use crate::Result;
use chrono::NaiveDate;
use std::collections::HashMap;
use std::sync::Mutex;

/// Request identity: sorted, deduplicated, uppercased symbols plus the date
/// range.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct CacheKey {
    symbols: Vec<String>,
    start: NaiveDate,
    end: NaiveDate,
}

impl CacheKey {
    fn new(symbols: &[String], start: NaiveDate, end: NaiveDate) -> Self {
        let mut symbols: Vec<String> = symbols.iter().map(|s| s.to_uppercase()).collect();
        symbols.sort();
        symbols.dedup();
        Self {
            symbols,
            start,
            end,
        }
    }
}

/// Wraps a provider and remembers every successful fetch.
///
/// Requests for the same symbol set and range are served from memory, in
/// the requested column order. Entries live until [`invalidate`] is called
/// or the cache is dropped. Failed fetches are not cached.
///
/// On a miss `inner` receives the symbols exactly as the caller spelled
/// them. Keys ignore case, so a later request for `petr4.sa` is served from
/// an entry fetched as `PETR4.SA`; wrap only providers that resolve symbols
/// case-insensitively.
///
/// [`invalidate`]: CachedProvider::invalidate
#[derive(Debug)]
pub struct CachedProvider<P> {
    inner: P,
    entries: Mutex<HashMap<CacheKey, PriceSeries>>,
}

impl<P: PriceProvider> CachedProvider<P> {
    /// Wrap `inner`.
    pub fn new(inner: P) -> Self {
        Self {
            inner,
            entries: Mutex::new(HashMap::new()),
        }
    }

    /// Drop every cached entry.
    pub fn invalidate(&self) {
        self.lock().clear();
    }

    /// Number of cached requests.
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    /// Whether nothing is cached.
    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    /// The wrapped provider.
    pub fn inner(&self) -> &P {
        &self.inner
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<CacheKey, PriceSeries>> {
        // The map holds no invariant a panicking holder could break.
        self.entries.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl<P: PriceProvider> PriceProvider for CachedProvider<P> {
    fn fetch(&self, symbols: &[String], start: NaiveDate, end: NaiveDate) -> Result<PriceSeries> {
        let key = CacheKey::new(symbols, start, end);
        let requested: Vec<String> = symbols.iter().map(|s| s.to_uppercase()).collect();

        if let Some(cached) = self.lock().get(&key) {
            tracing::debug!(symbols = ?key.symbols, %start, %end, "price cache hit");
            return reorder(cached, &requested, symbols);
        }

        tracing::debug!(symbols = ?key.symbols, %start, %end, "price cache miss");
        let prices = normalize_labels(self.inner.fetch(symbols, start, end)?)?;
        let result = reorder(&prices, &requested, symbols);
        self.lock().insert(key, prices);
        result
    }
}

/// Relabel every column with its uppercased symbol, the spelling entries are
/// stored under.
fn normalize_labels(prices: PriceSeries) -> Result<PriceSeries> {
    if prices.symbols().iter().all(|s| *s == s.to_uppercase()) {
        return Ok(prices);
    }

    let labels = prices.symbols().iter().map(|s| s.to_uppercase()).collect();
    let columns = prices.columns().map(|(_, column)| column.to_vec()).collect();
    PriceSeries::new(prices.dates().to_vec(), labels, columns)
}

/// Select the requested columns from a frame fetched with normalized symbols,
/// labelling them as the caller spelled them.
fn reorder(prices: &PriceSeries, requested: &[String], labels: &[String]) -> Result<PriceSeries> {
    let selected = prices.select(requested)?;
    if requested == labels {
        return Ok(selected);
    }

    let columns = selected
        .columns()
        .map(|(_, column)| column.to_vec())
        .collect();
    PriceSeries::new(selected.dates().to_vec(), labels.to_vec(), columns)
}
