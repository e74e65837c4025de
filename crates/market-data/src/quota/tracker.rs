//! Sliding-window call tracker for the provider's quotas.
//!
//! Keeps one timestamp queue per (call kind, window) row. Windows are
//! maintained lazily: old entries are purged right before every read rather
//! than by a background timer.

use std::collections::VecDeque;
use std::sync::{Mutex, MutexGuard};

use chrono::{NaiveDate, NaiveDateTime};
use log::{debug, warn};

use super::alert::{evaluate, Alert, WindowUsage};
use super::limits::{AlertThresholds, CallKind, QuotaLimits, QuotaWindow};

/// Call timestamps for one (kind, window) row.
#[derive(Debug)]
struct WindowRow {
    kind: CallKind,
    window: QuotaWindow,
    limit: u32,
    /// Non-decreasing; appended at the back, trimmed from the front.
    calls: VecDeque<NaiveDateTime>,
}

impl WindowRow {
    fn new(kind: CallKind, window: QuotaWindow, limit: u32) -> Self {
        Self {
            kind,
            window,
            limit,
            calls: VecDeque::new(),
        }
    }

    fn push(&mut self, now: NaiveDateTime) {
        // A clock that steps backwards must not break the ordering.
        let at = match self.calls.back() {
            Some(last) if *last > now => *last,
            _ => now,
        };
        self.calls.push_back(at);
    }

    fn trim_before(&mut self, cutoff: NaiveDateTime) {
        while self.calls.front().is_some_and(|t| *t < cutoff) {
            self.calls.pop_front();
        }
    }

    fn usage(&self) -> WindowUsage {
        WindowUsage {
            kind: self.kind,
            window: self.window,
            count: self.calls.len(),
            limit: self.limit,
        }
    }
}

/// Per-process rate limit bookkeeping.
///
/// A fixed table of four rows (oportuna per minute, oportuna per day,
/// historica per five minutes, historica per day) plus the date the daily
/// rows belong to.
#[derive(Debug)]
pub struct RateLimitState {
    rows: Vec<WindowRow>,
    day_anchor: NaiveDate,
}

impl RateLimitState {
    pub fn new(limits: &QuotaLimits, today: NaiveDate) -> Self {
        let rows = CallKind::ALL
            .iter()
            .flat_map(|kind| {
                kind.windows()
                    .map(|window| WindowRow::new(*kind, window, limits.limit(*kind, window)))
            })
            .collect();

        Self {
            rows,
            day_anchor: today,
        }
    }

    /// Reset the daily rows on a date change, then drop entries that fell out
    /// of their window.
    pub fn purge_old(&mut self, now: NaiveDateTime) {
        let today = now.date();
        if self.day_anchor != today {
            debug!(
                "Quota day rollover from {} to {}, clearing daily counters",
                self.day_anchor, today
            );
            for row in self.rows.iter_mut().filter(|r| r.window.is_daily()) {
                row.calls.clear();
            }
            self.day_anchor = today;
        }

        for row in &mut self.rows {
            let cutoff = row.window.cutoff(now);
            row.trim_before(cutoff);
        }
    }

    /// Append `now` to both rows of `kind`.
    pub fn record_call(&mut self, kind: CallKind, now: NaiveDateTime) {
        for row in self.rows.iter_mut().filter(|r| r.kind == kind) {
            row.push(now);
        }
    }

    /// Current number of entries in a row, without purging.
    pub fn count(&self, kind: CallKind, window: QuotaWindow) -> usize {
        self.rows
            .iter()
            .find(|r| r.kind == kind && r.window == window)
            .map_or(0, |r| r.calls.len())
    }

    /// Rows of `kind`, short window first. Does not purge.
    pub fn usage(&self, kind: CallKind) -> Vec<WindowUsage> {
        self.rows
            .iter()
            .filter(|r| r.kind == kind)
            .map(WindowRow::usage)
            .collect()
    }

    pub fn day_anchor(&self) -> NaiveDate {
        self.day_anchor
    }
}

/// Thread-safe tracker over a [`RateLimitState`].
///
/// Created once at startup and shared by reference with every client that
/// issues metered calls.
pub struct RateLimitTracker {
    state: Mutex<RateLimitState>,
    thresholds: AlertThresholds,
}

impl RateLimitTracker {
    /// Create a tracker with the provider's published limits.
    pub fn new(now: NaiveDateTime) -> Self {
        Self::with_config(QuotaLimits::default(), AlertThresholds::default(), now)
    }

    pub fn with_config(
        limits: QuotaLimits,
        thresholds: AlertThresholds,
        now: NaiveDateTime,
    ) -> Self {
        Self {
            state: Mutex::new(RateLimitState::new(&limits, now.date())),
            thresholds,
        }
    }

    /// Lock the state mutex, recovering from poison if necessary.
    ///
    /// The worst case after a poisoned lock is a slightly off count, which
    /// only affects alerting.
    fn lock_state(&self) -> MutexGuard<'_, RateLimitState> {
        self.state.lock().unwrap_or_else(|poisoned| {
            warn!("Rate limit tracker mutex was poisoned, recovering");
            poisoned.into_inner()
        })
    }

    pub fn purge_old(&self, now: NaiveDateTime) {
        self.lock_state().purge_old(now);
    }

    /// Record one outbound call. Must run before the request is issued.
    pub fn record_call(&self, kind: CallKind, now: NaiveDateTime) {
        self.lock_state().record_call(kind, now);
        debug!("Rate limit tracker: recorded {} call at {}", kind, now);
    }

    /// Purge, then compare the counts for `kind` against the thresholds.
    pub fn check_alerts(&self, kind: CallKind, now: NaiveDateTime) -> Vec<Alert> {
        let usage = self.usage(kind, now);
        evaluate(&usage, &self.thresholds)
    }

    /// Purge, then snapshot the counts for `kind`.
    pub fn usage(&self, kind: CallKind, now: NaiveDateTime) -> Vec<WindowUsage> {
        let mut state = self.lock_state();
        state.purge_old(now);
        state.usage(kind)
    }

    /// Purge, then count the calls of `kind` in `window`.
    pub fn count(&self, kind: CallKind, window: QuotaWindow, now: NaiveDateTime) -> usize {
        let mut state = self.lock_state();
        state.purge_old(now);
        state.count(kind, window)
    }
}
