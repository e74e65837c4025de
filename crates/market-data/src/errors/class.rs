/// Classification of market data failures.
///
/// Used by callers to decide how a failure is surfaced. There is no retry
/// policy: every class aborts the current operation.
///
/// # Behavior Summary
///
/// | Class | Origin | Surfaced as |
/// |-------|--------|-------------|
/// | `Configuration` | missing token or invalid setup | fatal, halts startup |
/// | `Transport` | network, timeout, HTTP status, undecodable body | single error message |
/// | `DataUnavailable` | sentinel or empty payload for the latest rate | single error message |
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ErrorClass {
    /// The client was not configured correctly. Not recoverable at runtime.
    Configuration,

    /// The HTTP exchange with the provider failed.
    Transport,

    /// The provider answered, but had no value to give.
    DataUnavailable,
}
