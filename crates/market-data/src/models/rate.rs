use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A single USD to MXN FIX observation.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExchangeRate {
    /// Publication date of the rate
    pub date: NaiveDate,

    /// Pesos per US dollar (always positive)
    pub rate: Decimal,
}

impl ExchangeRate {
    pub fn new(date: NaiveDate, rate: Decimal) -> Self {
        Self { date, rate }
    }
}

/// Exchange rates ordered by strictly increasing date.
///
/// A series is built fresh from each fetch; it is never merged with
/// previously fetched data.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ExchangeSeries(Vec<ExchangeRate>);

impl ExchangeSeries {
    /// Build a series from points in any order.
    ///
    /// Points are sorted by date. When the same date appears more than once,
    /// the point listed last wins.
    pub fn from_points(mut points: Vec<ExchangeRate>) -> Self {
        // Stable sort keeps input order among equal dates.
        points.sort_by_key(|p| p.date);

        let mut deduped: Vec<ExchangeRate> = Vec::with_capacity(points.len());
        for point in points {
            match deduped.last_mut() {
                Some(last) if last.date == point.date => *last = point,
                _ => deduped.push(point),
            }
        }
        Self(deduped)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn as_slice(&self) -> &[ExchangeRate] {
        &self.0
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ExchangeRate> {
        self.0.iter()
    }

    /// Most recent observation, if any.
    pub fn latest(&self) -> Option<&ExchangeRate> {
        self.0.last()
    }

    /// The trailing `n` points, in date order.
    pub fn tail(&self, n: usize) -> &[ExchangeRate] {
        let start = self.0.len().saturating_sub(n);
        &self.0[start..]
    }

    pub fn into_vec(self) -> Vec<ExchangeRate> {
        self.0
    }
}

impl<'a> IntoIterator for &'a ExchangeSeries {
    type Item = &'a ExchangeRate;
    type IntoIter = std::slice::Iter<'a, ExchangeRate>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}
