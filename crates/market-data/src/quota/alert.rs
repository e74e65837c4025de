//! Threshold alerts derived from window counts.

use std::fmt;

use log::{log, Level};
use serde::Serialize;

use super::limits::{AlertThresholds, CallKind, QuotaWindow};

/// How close a window is to its limit.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AlertSeverity {
    /// At least half of the limit is used. Informational.
    HalfLimit,
    /// Usage is close to the limit.
    Approaching,
}

/// Call count for one (kind, window) row at a point in time.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize)]
pub struct WindowUsage {
    pub kind: CallKind,
    pub window: QuotaWindow,
    pub count: usize,
    pub limit: u32,
}

impl WindowUsage {
    fn reaches(&self, ratio: f64) -> bool {
        self.count as f64 >= self.limit as f64 * ratio
    }
}

/// A threshold crossing for one window.
#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
pub struct Alert {
    pub kind: CallKind,
    pub window: QuotaWindow,
    pub count: usize,
    pub limit: u32,
    pub severity: AlertSeverity,
}

impl Alert {
    fn from_usage(usage: &WindowUsage, severity: AlertSeverity) -> Self {
        Self {
            kind: usage.kind,
            window: usage.window,
            count: usage.count,
            limit: usage.limit,
            severity,
        }
    }

    /// Log level matching the severity.
    pub fn level(&self) -> Level {
        match self.severity {
            AlertSeverity::HalfLimit => Level::Info,
            AlertSeverity::Approaching => Level::Warn,
        }
    }

    /// Emit the alert's display text at its level.
    pub fn log(&self) {
        log!(self.level(), "{}", self);
    }
}

impl fmt::Display for Alert {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.severity {
            AlertSeverity::HalfLimit => write!(
                f,
                "[HALF LIMIT] {} {}: {}/{}",
                self.kind, self.window, self.count, self.limit
            ),
            AlertSeverity::Approaching => {
                write!(f, "Approaching {} {} limit!", self.kind, self.window)
            }
        }
    }
}

/// Compare window usage against the thresholds.
///
/// `usage` is expected in the order short window, then daily window. All
/// half-limit alerts come before all approaching alerts.
pub fn evaluate(usage: &[WindowUsage], thresholds: &AlertThresholds) -> Vec<Alert> {
    let half = usage
        .iter()
        .filter(|u| u.reaches(thresholds.half))
        .map(|u| Alert::from_usage(u, AlertSeverity::HalfLimit));

    let approaching = usage
        .iter()
        .filter(|u| u.reaches(thresholds.warn_ratio(u.window)))
        .map(|u| Alert::from_usage(u, AlertSeverity::Approaching));

    half.chain(approaching).collect()
}
