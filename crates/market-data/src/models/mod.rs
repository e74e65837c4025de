//! Market data models
//!
//! This module contains the core data types for exchange rate operations:
//! - `types` - Type aliases for common identifiers (SeriesId)
//! - `rate` - A dated exchange rate and an ordered series of them

mod rate;
mod types;

pub use rate::{ExchangeRate, ExchangeSeries};
pub use types::SeriesId;
