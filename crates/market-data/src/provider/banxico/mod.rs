//! Banco de México SIE API client for the USD/MXN FIX rate.
//!
//! Two endpoints are used:
//! - `series/{id}/datos/oportuno` for the latest (preliminary) observation
//! - `series/{id}/datos/{start}/{end}` for observations in a date range
//!
//! Every request that is not served from cache is recorded with the
//! [`RateLimitTracker`] before it is sent, and the resulting quota alerts are
//! logged. Nothing is retried.

pub mod models;

use std::sync::Arc;
use std::time::Duration;

use chrono::NaiveDate;
use log::debug;
use reqwest::header::ACCEPT;
use reqwest::Client;

use crate::clock::{Clock, SystemClock};
use crate::errors::MarketDataError;
use crate::models::{ExchangeRate, ExchangeSeries, SeriesId};
use crate::provider::cache::ResponseCache;
use crate::quota::{CallKind, RateLimitTracker};

use models::{parse_history, parse_latest, SieResponse};

/// Production base URL of the SIE REST service.
pub const DEFAULT_BASE_URL: &str = "https://www.banxico.org.mx/SieAPIRest/service/v1";

/// FIX exchange rate, pesos per US dollar.
pub const USD_MXN_FIX_SERIES: &str = "SF43718";

const PROVIDER_ID: &str = "BANXICO";

/// Header carrying the API token.
const TOKEN_HEADER: &str = "Bmx-Token";

/// Default HTTP request timeout
const REQUEST_TIMEOUT: Duration = Duration::from_secs(20);

/// How long a latest-rate answer is reused.
pub const LATEST_CACHE_TTL: Duration = Duration::from_secs(120);

/// How long a date-range answer is reused.
pub const HISTORY_CACHE_TTL: Duration = Duration::from_secs(600);

type HistoryKey = (SeriesId, NaiveDate, NaiveDate);

/// Client for the latest and historical FIX rates.
///
/// # Example
///
/// ```ignore
/// use std::sync::Arc;
/// use fixwatch_market_data::{BanxicoClient, RateLimitTracker, SystemClock, Clock};
///
/// let tracker = Arc::new(RateLimitTracker::new(SystemClock.now()));
/// let client = BanxicoClient::new("your_token", tracker)?;
/// let latest = client.fetch_latest().await?;
/// ```
pub struct BanxicoClient {
    client: Client,
    base_url: String,
    token: String,
    series: SeriesId,
    tracker: Arc<RateLimitTracker>,
    clock: Arc<dyn Clock>,
    latest_cache: ResponseCache<SeriesId, ExchangeRate>,
    history_cache: ResponseCache<HistoryKey, ExchangeSeries>,
}

impl BanxicoClient {
    /// Create a client for the production API.
    ///
    /// # Errors
    ///
    /// Returns [`MarketDataError::Configuration`] if the token is blank.
    pub fn new(
        token: impl Into<String>,
        tracker: Arc<RateLimitTracker>,
    ) -> Result<Self, MarketDataError> {
        let token = token.into().trim().to_string();
        if token.is_empty() {
            return Err(MarketDataError::Configuration(
                "Banxico token missing".to_string(),
            ));
        }

        Ok(Self {
            client: build_http_client(REQUEST_TIMEOUT),
            base_url: DEFAULT_BASE_URL.to_string(),
            token,
            series: SeriesId::Borrowed(USD_MXN_FIX_SERIES),
            tracker,
            clock: Arc::new(SystemClock),
            latest_cache: ResponseCache::new(LATEST_CACHE_TTL),
            history_cache: ResponseCache::new(HISTORY_CACHE_TTL),
        })
    }

    /// Point the client at another deployment of the API.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    /// Bound each request by `timeout` instead of the 20 s default.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.client = build_http_client(timeout);
        self
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn with_series(mut self, series: impl Into<SeriesId>) -> Self {
        self.series = series.into();
        self
    }

    /// Replace both caches. A zero TTL disables that cache.
    pub fn with_cache_ttl(mut self, latest: Duration, history: Duration) -> Self {
        self.latest_cache = ResponseCache::new(latest);
        self.history_cache = ResponseCache::new(history);
        self
    }

    pub fn tracker(&self) -> &Arc<RateLimitTracker> {
        &self.tracker
    }

    pub fn clock(&self) -> &Arc<dyn Clock> {
        &self.clock
    }

    pub fn series(&self) -> &str {
        &self.series
    }

    /// Fetch the latest ("oportuno") observation.
    ///
    /// # Errors
    ///
    /// - [`MarketDataError::DataUnavailable`] if the provider returns the
    ///   "not available" marker or no data point
    /// - a transport-class error if the request fails, times out, or returns
    ///   a non-success status
    pub async fn fetch_latest(&self) -> Result<ExchangeRate, MarketDataError> {
        if let Some(rate) = self.latest_cache.get(&self.series) {
            debug!("Banxico: latest rate for {} served from cache", self.series);
            return Ok(rate);
        }

        let path = format!("series/{}/datos/oportuno", self.series);
        let response = self.request(CallKind::Oportuna, &path).await?;
        let rate = parse_latest(response)?;

        debug!(
            "Banxico: latest {} rate {} on {}",
            self.series, rate.rate, rate.date
        );
        self.latest_cache.insert(self.series.clone(), rate.clone());
        Ok(rate)
    }

    /// Fetch observations between `start` and `end`, inclusive.
    ///
    /// Days without an observation (weekends, holidays) and entries carrying
    /// the "not available" marker are skipped; an empty range is not an error.
    pub async fn fetch_history(
        &self,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<ExchangeSeries, MarketDataError> {
        let key: HistoryKey = (self.series.clone(), start, end);
        if let Some(series) = self.history_cache.get(&key) {
            debug!(
                "Banxico: history {}..{} for {} served from cache",
                start, end, self.series
            );
            return Ok(series);
        }

        let path = format!(
            "series/{}/datos/{}/{}",
            self.series,
            start.format("%Y-%m-%d"),
            end.format("%Y-%m-%d")
        );
        let response = self.request(CallKind::Historica, &path).await?;
        let series = parse_history(response);

        debug!(
            "Banxico: fetched {} observations for {} between {} and {}",
            series.len(),
            self.series,
            start,
            end
        );
        self.history_cache.insert(key, series.clone());
        Ok(series)
    }

    /// Record the call, log quota alerts, then issue the GET.
    async fn request(&self, kind: CallKind, path: &str) -> Result<SieResponse, MarketDataError> {
        let now = self.clock.now();
        self.tracker.record_call(kind, now);
        for alert in self.tracker.check_alerts(kind, now) {
            alert.log();
        }

        let url = format!("{}/{}", self.base_url, path);
        debug!("Banxico request: {}", url);

        let response = self
            .client
            .get(&url)
            .header(TOKEN_HEADER, &self.token)
            .header(ACCEPT, "application/json")
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    MarketDataError::Timeout {
                        provider: PROVIDER_ID.to_string(),
                    }
                } else {
                    MarketDataError::Network(e)
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(MarketDataError::HttpStatus {
                provider: PROVIDER_ID.to_string(),
                status: status.as_u16(),
            });
        }

        response
            .json::<SieResponse>()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    MarketDataError::Timeout {
                        provider: PROVIDER_ID.to_string(),
                    }
                } else {
                    MarketDataError::ProviderError {
                        provider: PROVIDER_ID.to_string(),
                        message: format!("Failed to parse response: {}", e),
                    }
                }
            })
    }
}

fn build_http_client(timeout: Duration) -> Client {
    Client::builder()
        .timeout(timeout)
        .build()
        .unwrap_or_else(|_| Client::new())
}
