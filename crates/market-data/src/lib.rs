//! Fixwatch Market Data Crate
//!
//! This crate fetches the Mexican peso / US dollar FIX rate from Banco de
//! México's SIE API and keeps client-side bookkeeping of the API's quotas.
//!
//! # Overview
//!
//! - Latest ("oportuno") and historical FIX observations
//! - Sliding-window call counters for the two quota classes, with alerts as
//!   usage approaches the published limits
//! - Trailing averages and last-N slices for display
//!
//! # Architecture
//!
//! ```text
//! +------------------+     +--------------------+
//! |   Render cycle   | --> |   BanxicoClient    |  (TTL cache in front)
//! +------------------+     +--------------------+
//!          |                  |             |
//!          |                  v             v
//!          |       +------------------+  +------------------+
//!          |       | RateLimitTracker |  |   SIE REST API   |
//!          |       +------------------+  +------------------+
//!          v
//! +------------------+
//! |   aggregation    |  (trailing_average, last_n)
//! +------------------+
//! ```
//!
//! # Core Types
//!
//! - [`ExchangeRate`] - A dated USD/MXN rate
//! - [`ExchangeSeries`] - Rates ordered by strictly increasing date
//! - [`RateLimitTracker`] - Per-process quota bookkeeping
//! - [`Alert`] - A threshold crossing for one quota window
//! - [`BanxicoClient`] - The SIE API client

pub mod aggregation;
pub mod clock;
pub mod errors;
pub mod models;
pub mod provider;
pub mod quota;

pub use aggregation::{last_n, trailing_average};
pub use clock::{Clock, FixedClock, SystemClock};
pub use errors::{ErrorClass, MarketDataError};
pub use models::{ExchangeRate, ExchangeSeries, SeriesId};
pub use provider::banxico::{DEFAULT_BASE_URL, USD_MXN_FIX_SERIES};
pub use provider::{BanxicoClient, ResponseCache};
pub use quota::{
    Alert, AlertSeverity, AlertThresholds, CallKind, QuotaLimits, QuotaWindow, RateLimitState,
    RateLimitTracker, WindowUsage,
};
