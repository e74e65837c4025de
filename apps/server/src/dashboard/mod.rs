//! One render cycle of the USD/MXN dashboard.
//!
//! Fetches the latest FIX rate and a 120-day history window, derives the
//! trailing averages and the most recent rows, and attaches the current quota
//! alerts for both call kinds.

mod render;

pub use render::Renderer;

use chrono::{Days, NaiveDate, NaiveDateTime};
use fixwatch_market_data::{
    last_n, trailing_average, Alert, AlertSeverity, BanxicoClient, CallKind, ExchangeRate,
    MarketDataError,
};
use rust_decimal::{Decimal, RoundingStrategy};
use serde::Serialize;

/// Calendar days of history requested per render.
pub const HISTORY_LOOKBACK_DAYS: u64 = 120;

/// Rows shown in the "past days" card.
pub const RECENT_ROWS: usize = 10;

const ROW_DATE_FORMAT: &str = "%b %d, %Y";

/// Observation counts for the two trailing averages.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AverageWindows {
    pub short: usize,
    pub long: usize,
}

impl Default for AverageWindows {
    fn default() -> Self {
        Self { short: 15, long: 30 }
    }
}

#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CurrentRateView {
    pub date: NaiveDate,
    pub rate: Decimal,
    pub display: String,
}

#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AverageView {
    pub label: String,
    pub observations: usize,
    /// `None` when the history holds fewer observations than the window.
    pub value: Option<f64>,
    pub display: String,
}

#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RecentRowView {
    pub date: NaiveDate,
    pub label: String,
    pub rate: Decimal,
    pub display: String,
}

#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AlertView {
    pub kind: CallKind,
    pub severity: AlertSeverity,
    pub message: String,
}

impl From<&Alert> for AlertView {
    fn from(alert: &Alert) -> Self {
        Self {
            kind: alert.kind,
            severity: alert.severity,
            message: alert.to_string(),
        }
    }
}

#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardView {
    pub current: CurrentRateView,
    pub averages: Vec<AverageView>,
    pub recent: Vec<RecentRowView>,
    pub alerts: Vec<AlertView>,
    pub generated_at: NaiveDateTime,
}

/// Run one render cycle against the client.
///
/// Any fetch failure aborts the cycle; nothing partial is returned.
pub async fn build_dashboard(
    client: &BanxicoClient,
    windows: AverageWindows,
) -> Result<DashboardView, MarketDataError> {
    let latest = client.fetch_latest().await?;

    let now = client.clock().now();
    let today = now.date();
    let start = today
        .checked_sub_days(Days::new(HISTORY_LOOKBACK_DAYS))
        .unwrap_or(NaiveDate::MIN);
    let history = client.fetch_history(start, today).await?;

    let averages = vec![
        average_view(
            format!("Last {} days (avg)", windows.short),
            windows.short,
            trailing_average(&history, windows.short),
        ),
        average_view(
            format!("Last month / {} observations (avg)", windows.long),
            windows.long,
            trailing_average(&history, windows.long),
        ),
    ];

    let recent = last_n(&history, RECENT_ROWS)
        .iter()
        .map(recent_row)
        .collect();

    Ok(DashboardView {
        current: CurrentRateView {
            date: latest.date,
            rate: latest.rate,
            display: format_grouped(&format_rate(latest.rate)),
        },
        averages,
        recent,
        alerts: current_alerts(client, now),
        generated_at: now,
    })
}

/// Alerts for both call kinds at `now`, Oportuna first.
pub fn current_alerts(client: &BanxicoClient, now: NaiveDateTime) -> Vec<AlertView> {
    CallKind::ALL
        .iter()
        .flat_map(|kind| client.tracker().check_alerts(*kind, now))
        .map(|alert| AlertView::from(&alert))
        .collect()
}

fn average_view(label: String, observations: usize, value: f64) -> AverageView {
    let value = (!value.is_nan()).then_some(value);
    let display = match value {
        Some(v) => format_grouped(&format!("{:.4}", v)),
        None => "N/A".to_string(),
    };
    AverageView {
        label,
        observations,
        value,
        display,
    }
}

fn recent_row(point: &ExchangeRate) -> RecentRowView {
    RecentRowView {
        date: point.date,
        label: point.date.format(ROW_DATE_FORMAT).to_string(),
        rate: point.rate,
        display: format_rate(point.rate),
    }
}

/// Rate rounded half away from zero to four places.
fn format_rate(rate: Decimal) -> String {
    let rounded = rate.round_dp_with_strategy(4, RoundingStrategy::MidpointAwayFromZero);
    format!("{:.4}", rounded)
}

/// Insert thousands separators into the integer part of a formatted number.
fn format_grouped(formatted: &str) -> String {
    let (sign, unsigned) = match formatted.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", formatted),
    };
    let (int_part, frac_part) = match unsigned.split_once('.') {
        Some((i, f)) => (i, Some(f)),
        None => (unsigned, None),
    };

    let mut grouped = String::with_capacity(formatted.len() + int_part.len() / 3);
    for (i, ch) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    match frac_part {
        Some(f) => format!("{sign}{grouped}.{f}"),
        None => format!("{sign}{grouped}"),
    }
}
