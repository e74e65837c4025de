//! Banxico SIE API response models.
//!
//! Both the latest-value and the date-range endpoints answer with the same
//! nested envelope: `{"bmx": {"series": [{"idSerie", "titulo", "datos": [...]}]}}`.

use std::str::FromStr;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Deserialize;

use crate::errors::MarketDataError;
use crate::models::{ExchangeRate, ExchangeSeries};

/// Value the API puts in `dato` when an observation is not available.
pub const NOT_AVAILABLE: &str = "N/E";

/// Date format of the `fecha` field.
const FECHA_FORMAT: &str = "%d/%m/%Y";

/// Top-level response envelope
#[derive(Debug, Deserialize)]
pub struct SieResponse {
    pub bmx: SieBody,
}

#[derive(Debug, Deserialize)]
pub struct SieBody {
    #[serde(default)]
    pub series: Vec<SieSeries>,
}

/// One requested series with its observations
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SieSeries {
    pub id_serie: Option<String>,
    #[allow(dead_code)]
    pub titulo: Option<String>,
    pub datos: Option<Vec<SieDataPoint>>,
}

/// A single observation; both fields arrive as text
#[derive(Debug, Deserialize)]
pub struct SieDataPoint {
    pub fecha: Option<String>,
    pub dato: Option<String>,
}

impl SieDataPoint {
    /// Convert to a rate, or `None` if either field is missing or unusable.
    pub fn to_rate(&self) -> Option<ExchangeRate> {
        let date = parse_fecha(self.fecha.as_deref()?)?;
        let rate = parse_dato(self.dato.as_deref()?)?;
        Some(ExchangeRate::new(date, rate))
    }

    fn is_not_available(&self) -> bool {
        match self.dato.as_deref().map(str::trim) {
            None | Some("") => true,
            Some(value) => value == NOT_AVAILABLE,
        }
    }
}

impl SieResponse {
    /// Observations of the first series, or nothing if the payload is empty.
    pub fn into_points(self) -> Vec<SieDataPoint> {
        self.bmx
            .series
            .into_iter()
            .next()
            .and_then(|s| s.datos)
            .unwrap_or_default()
    }
}

/// Parse a `dd/mm/yyyy` date.
pub fn parse_fecha(fecha: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(fecha.trim(), FECHA_FORMAT).ok()
}

/// Parse a rate value. Thousands separators are accepted; the sentinel and
/// non-positive values are rejected.
pub fn parse_dato(dato: &str) -> Option<Decimal> {
    let trimmed = dato.trim();
    if trimmed.is_empty() || trimmed == NOT_AVAILABLE {
        return None;
    }
    let value = Decimal::from_str(&trimmed.replace(',', "")).ok()?;
    (value > Decimal::ZERO).then_some(value)
}

/// Extract the single latest observation.
pub fn parse_latest(response: SieResponse) -> Result<ExchangeRate, MarketDataError> {
    let point = response
        .into_points()
        .into_iter()
        .next()
        .ok_or_else(|| MarketDataError::DataUnavailable("No data point returned.".to_string()))?;

    if point.is_not_available() {
        return Err(MarketDataError::DataUnavailable(
            "No 'oportuno' value available.".to_string(),
        ));
    }

    point.to_rate().ok_or_else(|| {
        MarketDataError::DataUnavailable(format!(
            "Unusable 'oportuno' observation: fecha={:?}, dato={:?}",
            point.fecha, point.dato
        ))
    })
}

/// Extract every usable observation, sorted by date.
///
/// Missing values, the sentinel, and unparseable entries are skipped.
pub fn parse_history(response: SieResponse) -> ExchangeSeries {
    let points = response
        .into_points()
        .iter()
        .filter_map(SieDataPoint::to_rate)
        .collect();
    ExchangeSeries::from_points(points)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use serde_json::json;

    fn response(value: serde_json::Value) -> SieResponse {
        serde_json::from_value(value).unwrap()
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_parse_fecha() {
        assert_eq!(parse_fecha("03/01/2024"), Some(date(2024, 1, 3)));
        assert_eq!(parse_fecha("31/12/2023"), Some(date(2023, 12, 31)));
        assert!(parse_fecha("2024-01-03").is_none());
        assert!(parse_fecha("32/01/2024").is_none());
    }

    #[test]
    fn test_parse_dato() {
        assert_eq!(parse_dato("20.5000"), Some(dec!(20.5000)));
        assert_eq!(parse_dato(" 17.1234 "), Some(dec!(17.1234)));
        assert_eq!(parse_dato("1,234.5600"), Some(dec!(1234.5600)));
        assert!(parse_dato("N/E").is_none());
        assert!(parse_dato("").is_none());
        assert!(parse_dato("abc").is_none());
        assert!(parse_dato("0").is_none());
        assert!(parse_dato("-1.5").is_none());
    }

    #[test]
    fn test_parse_history_skips_sentinel() {
        let body = response(json!({
            "bmx": { "series": [{
                "idSerie": "SF43718",
                "titulo": "Tipo de cambio",
                "datos": [
                    { "fecha": "01/01/2024", "dato": "20.0" },
                    { "fecha": "02/01/2024", "dato": "N/E" },
                    { "fecha": "03/01/2024", "dato": "20.5" }
                ]
            }]}
        }));

        let series = parse_history(body);

        assert_eq!(
            series.into_vec(),
            vec![
                ExchangeRate::new(date(2024, 1, 1), dec!(20.0)),
                ExchangeRate::new(date(2024, 1, 3), dec!(20.5)),
            ]
        );
    }

    #[test]
    fn test_parse_history_skips_missing_fields_and_sorts() {
        let body = response(json!({
            "bmx": { "series": [{
                "idSerie": "SF43718",
                "datos": [
                    { "fecha": "05/01/2024", "dato": "20.3" },
                    { "fecha": "04/01/2024" },
                    { "dato": "20.1" },
                    { "fecha": "not a date", "dato": "20.2" },
                    { "fecha": "03/01/2024", "dato": "20.4" }
                ]
            }]}
        }));

        let dates: Vec<_> = parse_history(body).iter().map(|p| p.date).collect();
        assert_eq!(dates, vec![date(2024, 1, 3), date(2024, 1, 5)]);
    }

    #[test]
    fn test_parse_history_empty_payloads() {
        let no_datos = response(json!({ "bmx": { "series": [{ "idSerie": "SF43718" }] } }));
        assert!(parse_history(no_datos).is_empty());

        let null_datos = response(json!({ "bmx": { "series": [{ "datos": null }] } }));
        assert!(parse_history(null_datos).is_empty());

        let no_series = response(json!({ "bmx": { "series": [] } }));
        assert!(parse_history(no_series).is_empty());
    }

    #[test]
    fn test_parse_latest() {
        let body = response(json!({
            "bmx": { "series": [{
                "idSerie": "SF43718",
                "datos": [{ "fecha": "10/05/2024", "dato": "16.7845" }]
            }]}
        }));
        assert_eq!(
            parse_latest(body).unwrap(),
            ExchangeRate::new(date(2024, 5, 10), dec!(16.7845))
        );
    }

    #[test]
    fn test_parse_latest_sentinel_is_unavailable() {
        let body = response(json!({
            "bmx": { "series": [{ "datos": [{ "fecha": "10/05/2024", "dato": "N/E" }] }] }
        }));
        let err = parse_latest(body).unwrap_err();
        assert!(matches!(err, MarketDataError::DataUnavailable(_)));
    }

    #[test]
    fn test_parse_latest_missing_point_is_unavailable() {
        let body = response(json!({ "bmx": { "series": [{ "datos": [] }] } }));
        assert!(matches!(
            parse_latest(body),
            Err(MarketDataError::DataUnavailable(_))
        ));

        let body = response(json!({ "bmx": { "series": [{ "datos": [{ "fecha": "10/05/2024" }] }] } }));
        assert!(matches!(
            parse_latest(body),
            Err(MarketDataError::DataUnavailable(_))
        ));
    }

    #[test]
    fn test_parse_latest_garbage_value_is_unavailable() {
        let body = response(json!({
            "bmx": { "series": [{ "datos": [{ "fecha": "10/05/2024", "dato": "n.d." }] }] }
        }));
        assert!(matches!(
            parse_latest(body),
            Err(MarketDataError::DataUnavailable(_))
        ));
    }
}
