//! Price retrieval boundary.
//!
//! The analytics never fetch data themselves; a [`PriceProvider`] hands them
//! an aligned [`PriceSeries`](crate::series::PriceSeries).

mod cache;
mod json_file;

pub use cache::CachedProvider;
pub use json_file::JsonFileProvider;

use crate::series::PriceSeries;
use crate::Result;
use chrono::NaiveDate;

/// Source of closing prices.
pub trait PriceProvider {
    /// Fetch closing prices for `symbols` on dates in `[start, end)`.
    ///
    /// Columns follow the order of `symbols`. Dates missing a price for any
    /// symbol are dropped.
    ///
    /// # Errors
    ///
    /// [`Error::UnknownSymbol`](crate::Error::UnknownSymbol) for a symbol the
    /// source does not know, [`Error::EmptyResult`](crate::Error::EmptyResult)
    /// when no date in the range has a price for every symbol, and
    /// [`Error::Retrieval`](crate::Error::Retrieval) for anything else.
    fn fetch(&self, symbols: &[String], start: NaiveDate, end: NaiveDate) -> Result<PriceSeries>;
}

impl<P: PriceProvider + ?Sized> PriceProvider for &P {
    fn fetch(&self, symbols: &[String], start: NaiveDate, end: NaiveDate) -> Result<PriceSeries> {
        (**self).fetch(symbols, start, end)
    }
}
