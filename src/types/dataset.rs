//! Data structures for the global land-surface temperature dataset, and the
//! calendar-enriched records the chart scales operate on.

use crate::chart::error::ChartError;
use chrono::{Datelike, Month, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fmt::{Display, Formatter};

/// A calendar year, displayed with four digits like a `%Y` format.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Ord, PartialOrd, Hash, Serialize, Deserialize)]
pub struct Year(pub i32);

impl Year {
    pub fn get(self) -> i32 {
        self.0
    }

    /// January 1st of this year, the point in time a `%Y` parse yields.
    pub fn start(self) -> Option<NaiveDate> {
        NaiveDate::from_ymd_opt(self.0, 1, 1)
    }
}

impl Display for Year {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}", self.0)
    }
}

/// The payload served by the dataset endpoint.
///
/// ```
/// use climate_heatmap::Dataset;
///
/// let json = r#"{
///     "baseTemperature": 8.66,
///     "monthlyVariance": [{ "year": 1753, "month": 1, "variance": -1.366 }]
/// }"#;
/// let dataset = Dataset::from_json_slice(json.as_bytes()).unwrap();
/// assert_eq!(dataset.base_temperature, 8.66);
/// assert_eq!(dataset.monthly_variance.len(), 1);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Dataset {
    /// Reference temperature in degrees Celsius that every variance is relative to.
    pub base_temperature: f64,
    /// One entry per (year, month) pair, in the order the endpoint lists them.
    pub monthly_variance: Vec<MonthlyVariance>,
}

/// A single year/month observation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MonthlyVariance {
    pub year: i32,
    /// Calendar month, 1 = January.
    pub month: u32,
    /// Deviation from the base temperature in degrees Celsius.
    pub variance: f64,
}

impl MonthlyVariance {
    pub fn temperature(&self, base_temperature: f64) -> f64 {
        base_temperature + self.variance
    }
}

/// A [`MonthlyVariance`] enriched with parsed calendar values for scale lookup.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MonthlyRecord {
    pub year: Year,
    /// January 1st of [`Self::year`].
    pub year_start: NaiveDate,
    pub month: Month,
    pub variance: f64,
}

impl MonthlyRecord {
    /// Parses the calendar fields of a raw entry.
    ///
    /// # Errors
    ///
    /// Returns [`ChartError::InvalidMonth`] if the month is not in `1..=12`, or
    /// [`ChartError::InvalidYear`] if the year cannot be represented as a date.
    pub fn try_from_raw(raw: &MonthlyVariance) -> Result<Self, ChartError> {
        let month = u8::try_from(raw.month)
            .ok()
            .and_then(|m| Month::try_from(m).ok())
            .ok_or(ChartError::InvalidMonth {
                year: raw.year,
                month: raw.month,
            })?;
        let year = Year(raw.year);
        let year_start = year
            .start()
            .ok_or(ChartError::InvalidYear { year: raw.year })?;
        Ok(Self {
            year,
            year_start,
            month,
            variance: raw.variance,
        })
    }

    /// Integer year, the value of the `data-year` attribute.
    pub fn year_number(&self) -> i32 {
        self.year_start.year()
    }

    /// Zero-based month index, the value of the `data-month` attribute.
    pub fn month_index(&self) -> u32 {
        self.month.number_from_month() - 1
    }

    /// Full English month name followed by the year, e.g. `January 1753`.
    pub fn label(&self) -> String {
        format!("{} {}", self.month.name(), self.year)
    }
}

impl Dataset {
    /// Parses the JSON document served by the dataset endpoint.
    pub fn from_json_slice(bytes: &[u8]) -> Result<Self, serde_json::Error> {
        serde_json::from_slice(bytes)
    }

    /// Enriches every entry with its calendar values, keeping the original order.
    pub fn records(&self) -> Result<Vec<MonthlyRecord>, ChartError> {
        self.monthly_variance
            .iter()
            .map(MonthlyRecord::try_from_raw)
            .collect()
    }

    /// `(min, max)` of the years present, `None` for an empty dataset.
    pub fn year_extent(&self) -> Option<(i32, i32)> {
        let min = self.monthly_variance.iter().map(|d| d.year).min()?;
        let max = self.monthly_variance.iter().map(|d| d.year).max()?;
        Some((min, max))
    }

    /// `(min, max)` of the variances present, `None` for an empty dataset.
    pub fn variance_extent(&self) -> Option<(f64, f64)> {
        crate::chart::scale::extent(self.monthly_variance.iter().map(|d| d.variance))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Dataset {
        Dataset {
            base_temperature: 8.66,
            monthly_variance: vec![
                MonthlyVariance { year: 1753, month: 1, variance: -1.366 },
                MonthlyVariance { year: 1753, month: 2, variance: -2.223 },
                MonthlyVariance { year: 2015, month: 12, variance: 1.299 },
            ],
        }
    }

    #[test]
    fn test_parse_camel_case_payload() {
        let json = br#"{"baseTemperature":8.66,"monthlyVariance":[{"year":1753,"month":1,"variance":-1.366}]}"#;
        let dataset = Dataset::from_json_slice(json).unwrap();
        assert_eq!(dataset.base_temperature, 8.66);
        assert_eq!(
            dataset.monthly_variance[0],
            MonthlyVariance { year: 1753, month: 1, variance: -1.366 }
        );
    }

    #[test]
    fn test_missing_field_is_an_error() {
        let json = br#"{"baseTemperature":8.66,"monthlyVariance":[{"year":1753,"variance":-1.366}]}"#;
        assert!(Dataset::from_json_slice(json).is_err());
    }

    #[test]
    fn test_records_enrich_calendar_values() {
        let records = sample().records().unwrap();
        assert_eq!(records.len(), 3);
        assert_eq!(records[0].month, Month::January);
        assert_eq!(records[0].year_start, NaiveDate::from_ymd_opt(1753, 1, 1).unwrap());
        assert_eq!(records[2].month_index(), 11);
        assert_eq!(records[2].year_number(), 2015);
        assert_eq!(records[1].label(), "February 1753");
    }

    #[test]
    fn test_invalid_month_is_rejected() {
        let raw = MonthlyVariance { year: 1900, month: 13, variance: 0.0 };
        match MonthlyRecord::try_from_raw(&raw) {
            Err(ChartError::InvalidMonth { year, month }) => {
                assert_eq!(year, 1900);
                assert_eq!(month, 13);
            }
            other => panic!("expected InvalidMonth, got {:?}", other),
        }
        let raw = MonthlyVariance { year: 1900, month: 0, variance: 0.0 };
        assert!(MonthlyRecord::try_from_raw(&raw).is_err());
    }

    #[test]
    fn test_unrepresentable_year_is_rejected() {
        for year in [i32::MAX, i32::MIN] {
            let raw = MonthlyVariance { year, month: 6, variance: 0.0 };
            match MonthlyRecord::try_from_raw(&raw) {
                Err(ChartError::InvalidYear { year: reported }) => assert_eq!(reported, year),
                other => panic!("expected InvalidYear, got {:?}", other),
            }
        }
        let dataset = Dataset {
            base_temperature: 8.66,
            monthly_variance: vec![MonthlyVariance { year: 300_000, month: 1, variance: 0.0 }],
        };
        assert!(matches!(
            dataset.records(),
            Err(ChartError::InvalidYear { year: 300_000 })
        ));
    }

    #[test]
    fn test_extents() {
        let dataset = sample();
        assert_eq!(dataset.year_extent(), Some((1753, 2015)));
        assert_eq!(dataset.variance_extent(), Some((-2.223, 1.299)));

        let empty = Dataset { base_temperature: 0.0, monthly_variance: vec![] };
        assert_eq!(empty.year_extent(), None);
        assert_eq!(empty.variance_extent(), None);
    }

    #[test]
    fn test_year_display_pads_to_four_digits() {
        assert_eq!(Year(812).to_string(), "0812");
        assert_eq!(Year(1999).to_string(), "1999");
    }
}
