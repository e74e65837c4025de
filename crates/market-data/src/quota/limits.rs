//! Quota classes, windows, and the provider's published limits.

use std::fmt;

use chrono::{NaiveDateTime, NaiveTime, TimeDelta};
use serde::Serialize;

/// Oportuna calls allowed per minute.
const OPORTUNA_PER_MINUTE: u32 = 80;

/// Oportuna calls allowed per day.
const OPORTUNA_PER_DAY: u32 = 40_000;

/// Historica calls allowed per five minutes.
const HISTORICA_PER_FIVE_MINUTES: u32 = 200;

/// Historica calls allowed per day.
const HISTORICA_PER_DAY: u32 = 10_000;

/// Quota class of an outbound API call.
///
/// The provider meters "latest value" requests and "date range" requests
/// against separate budgets.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CallKind {
    /// Latest-value ("oportuno") requests.
    Oportuna,
    /// Date-range requests.
    Historica,
}

impl CallKind {
    pub const ALL: [CallKind; 2] = [CallKind::Oportuna, CallKind::Historica];

    /// The short window this kind is metered on, besides the daily one.
    pub fn short_window(&self) -> QuotaWindow {
        match self {
            Self::Oportuna => QuotaWindow::Minute,
            Self::Historica => QuotaWindow::FiveMinutes,
        }
    }

    /// Windows this kind is counted in, short window first.
    pub fn windows(&self) -> [QuotaWindow; 2] {
        [self.short_window(), QuotaWindow::Day]
    }
}

impl fmt::Display for CallKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Oportuna => write!(f, "Oportuna"),
            Self::Historica => write!(f, "Historica"),
        }
    }
}

/// Sliding window a call counter covers.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum QuotaWindow {
    /// The last 60 seconds.
    Minute,
    /// The last 300 seconds.
    FiveMinutes,
    /// Since local midnight.
    Day,
}

impl QuotaWindow {
    /// Oldest timestamp still inside the window at `now`.
    ///
    /// Entries strictly older than the cutoff fall out of the window; an entry
    /// exactly at the cutoff is still counted.
    pub fn cutoff(&self, now: NaiveDateTime) -> NaiveDateTime {
        match self {
            Self::Minute => now - TimeDelta::seconds(60),
            Self::FiveMinutes => now - TimeDelta::seconds(300),
            Self::Day => now.date().and_time(NaiveTime::MIN),
        }
    }

    pub fn is_daily(&self) -> bool {
        matches!(self, Self::Day)
    }
}

impl fmt::Display for QuotaWindow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Minute => write!(f, "per-minute"),
            Self::FiveMinutes => write!(f, "5-min"),
            Self::Day => write!(f, "daily"),
        }
    }
}

/// Limits for one call kind.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize)]
pub struct KindLimits {
    /// Calls allowed within the kind's short window.
    pub short_window: u32,
    /// Calls allowed per day.
    pub per_day: u32,
}

/// Provider quotas for both call kinds.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize)]
pub struct QuotaLimits {
    pub oportuna: KindLimits,
    pub historica: KindLimits,
}

impl QuotaLimits {
    /// Limits published by the Banxico SIE API.
    pub const BANXICO: QuotaLimits = QuotaLimits {
        oportuna: KindLimits {
            short_window: OPORTUNA_PER_MINUTE,
            per_day: OPORTUNA_PER_DAY,
        },
        historica: KindLimits {
            short_window: HISTORICA_PER_FIVE_MINUTES,
            per_day: HISTORICA_PER_DAY,
        },
    };

    pub fn for_kind(&self, kind: CallKind) -> KindLimits {
        match kind {
            CallKind::Oportuna => self.oportuna,
            CallKind::Historica => self.historica,
        }
    }

    /// Limit for `kind` within `window`.
    pub fn limit(&self, kind: CallKind, window: QuotaWindow) -> u32 {
        let limits = self.for_kind(kind);
        if window.is_daily() {
            limits.per_day
        } else {
            limits.short_window
        }
    }
}

impl Default for QuotaLimits {
    fn default() -> Self {
        Self::BANXICO
    }
}

/// Usage ratios at which alerts fire.
///
/// The approaching ratio differs between the short window and the daily
/// window; both call kinds share the same ratios.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AlertThresholds {
    /// Informational "half limit" ratio, applied to every window.
    pub half: f64,
    /// "Approaching" ratio for the short window.
    pub short_window_warn: f64,
    /// "Approaching" ratio for the daily window.
    pub daily_warn: f64,
}

impl AlertThresholds {
    pub const DEFAULT: AlertThresholds = AlertThresholds {
        half: 0.5,
        short_window_warn: 0.75,
        daily_warn: 0.85,
    };

    /// The "approaching" ratio for `window`.
    pub fn warn_ratio(&self, window: QuotaWindow) -> f64 {
        if window.is_daily() {
            self.daily_warn
        } else {
            self.short_window_warn
        }
    }
}

impl Default for AlertThresholds {
    fn default() -> Self {
        Self::DEFAULT
    }
}
