//! Client-side quota bookkeeping.
//!
//! The provider meters two call classes separately, each on a short window
//! and a daily window. This module counts outbound calls per window and turns
//! the counts into structured alerts; it never blocks or rejects a call.

mod alert;
mod limits;
mod tracker;

pub use alert::{evaluate, Alert, AlertSeverity, WindowUsage};
pub use limits::{AlertThresholds, CallKind, KindLimits, QuotaLimits, QuotaWindow};
pub use tracker::{RateLimitState, RateLimitTracker};
