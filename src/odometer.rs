//! Odometer and date extraction

use crate::error::{compile, Result};
use crate::types::{DateInfo, RelativeDay};
use regex::Regex;
use std::ops::RangeInclusive;

/// Readings outside this range are rejected
pub const VALID_ODOMETER: RangeInclusive<u32> = 1_000..=500_000;

/// Distance number: digits with optional thousands separators
const READING: &str = r"((?:\d{1,3}(?:,\d{3})+)|\d+)";

const DISTANCE_UNIT: &str = r"(?:km|kms|kilometers?|kilometres?)";

const NEXT_SERVICE_PHRASES: &[&str] =
    &["next service", "next maintenance", "come back", "return in"];

/// Extracts mileage and date hints
///
/// Patterns are tried in order; within a pattern every match is tried until one
/// yields a reading inside [`VALID_ODOMETER`].
#[derive(Debug)]
pub struct OdometerExtractor {
    odometer: Vec<Regex>,
    relative_days: Vec<(Regex, RelativeDay)>,
    dates: Vec<Regex>,
}

impl OdometerExtractor {
    pub fn new() -> Result<Self> {
        let odometer_sources = [
            format!(r"\b{READING}\s*{DISTANCE_UNIT}\b"),
            format!(r"\bodometer\s*(?:reading)?\s*(?:is|at|of|shows|reads)?\s*[:\-]?\s*{READING}"),
            format!(
                r"\b{READING}\s*(?:on\s+the\s+odometer|on\s+odometer|odometer\s+reading|reading)\b"
            ),
            format!(r"\bat\s*{READING}\s*{DISTANCE_UNIT}\b"),
            format!(r"\b{READING}\s*{DISTANCE_UNIT}\s*(?:done|completed|run)\b"),
        ];
        let odometer = odometer_sources
            .iter()
            .map(|source| compile("odometer", source))
            .collect::<Result<Vec<_>>>()?;

        let relative_days = vec![
            (compile("dates", r"\btoday\b")?, RelativeDay::Today),
            (compile("dates", r"\btomorrow\b")?, RelativeDay::Tomorrow),
            (compile("dates", r"\byesterday\b")?, RelativeDay::Yesterday),
        ];

        let dates = vec![
            compile("dates", r"\b\d{1,2}[/\-]\d{1,2}[/\-]\d{4}\b")?,
            compile(
                "dates",
                r"\b\d{1,2}\s+(?:jan|feb|mar|apr|may|jun|jul|aug|sep|oct|nov|dec)[a-z]*\s+\d{4}\b",
            )?,
        ];

        Ok(Self {
            odometer,
            relative_days,
            dates,
        })
    }

    pub fn odometer(&self, text: &str) -> Option<u32> {
        for pattern in &self.odometer {
            for caps in pattern.captures_iter(text) {
                let Some(raw) = caps.get(1) else {
                    continue;
                };
                let Ok(value) = raw.as_str().replace(',', "").parse::<u32>() else {
                    continue;
                };
                if VALID_ODOMETER.contains(&value) {
                    return Some(value);
                }
            }
        }
        None
    }

    /// Never fails; unresolved keys are simply left unset
    pub fn date_info(&self, text: &str) -> DateInfo {
        let service_date = self
            .relative_days
            .iter()
            .find(|(pattern, _)| pattern.is_match(text))
            .map(|(_, day)| *day);

        let has_next_service = NEXT_SERVICE_PHRASES.iter().any(|p| text.contains(p));

        let specific_date = self
            .dates
            .iter()
            .find_map(|pattern| pattern.find(text))
            .map(|m| m.as_str().to_string());

        DateInfo {
            service_date,
            has_next_service,
            specific_date,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn extractor() -> OdometerExtractor {
        OdometerExtractor::new().unwrap()
    }

    #[test]
    fn test_reading_with_unit() {
        assert_eq!(extractor().odometer("done at 15000 kilometers"), Some(15000));
        assert_eq!(extractor().odometer("at 15000 km"), Some(15000));
        assert_eq!(extractor().odometer("reading 45,500 kms"), Some(45500));
    }

    #[test]
    fn test_odometer_keyword() {
        assert_eq!(extractor().odometer("odometer reading: 32000"), Some(32000));
        assert_eq!(extractor().odometer("28000 on the odometer"), Some(28000));
    }

    #[test]
    fn test_out_of_range_readings_are_skipped() {
        assert_eq!(extractor().odometer("drove 500 km to get here"), None);
        assert_eq!(extractor().odometer("odometer 900000"), None);
        // the first candidate is too small, the second one is valid
        assert_eq!(extractor().odometer("towed 20 km, car at 60000 km"), Some(60000));
    }

    #[test]
    fn test_no_reading() {
        assert_eq!(extractor().odometer("replaced battery for 2500 rupees"), None);
    }

    #[test]
    fn test_date_info() {
        let info = extractor().date_info("serviced today, next service due on 12/03/2025");
        assert_eq!(info.service_date, Some(RelativeDay::Today));
        assert!(info.has_next_service);
        assert_eq!(info.specific_date.as_deref(), Some("12/03/2025"));
    }

    #[test]
    fn test_date_with_month_name() {
        let info = extractor().date_info("work completed on 5 march 2024");
        assert_eq!(info.specific_date.as_deref(), Some("5 march 2024"));
        assert_eq!(info.service_date, None);
    }

    #[test]
    fn test_date_info_empty() {
        assert!(extractor().date_info("changed oil").is_empty());
    }
}
