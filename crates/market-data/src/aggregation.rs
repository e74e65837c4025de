//! Trailing statistics over an exchange rate series.

use num_traits::ToPrimitive;
use rust_decimal::Decimal;

use crate::models::ExchangeSeries;

/// Mean of the last `n` rates in date order.
///
/// Returns NaN when the series holds fewer than `n` points. An average over
/// zero points (`n == 0`) is NaN as well.
pub fn trailing_average(series: &ExchangeSeries, n: usize) -> f64 {
    if n == 0 || series.len() < n {
        return f64::NAN;
    }

    let sum: Decimal = series.tail(n).iter().map(|p| p.rate).sum();
    (sum / Decimal::from(n)).to_f64().unwrap_or(f64::NAN)
}

/// The last `n` points in date order, or the whole series if it is shorter.
pub fn last_n(series: &ExchangeSeries, n: usize) -> ExchangeSeries {
    ExchangeSeries::from_points(series.tail(n).to_vec())
}
