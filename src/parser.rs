//! Transcript parser - the single entry point of the crate
//!
//! `ServiceParser` compiles every catalog and pattern table once; `parse` is
//! then a pure function of its input. A parser can be shared across threads
//! (for example behind an `Arc`) without locking.

use crate::catalog::Catalog;
use crate::classifier::classify;
use crate::confidence::{ConfidenceInputs, ConfidenceScorer};
use crate::config::ParserConfig;
use crate::cost::{estimate_total, CostExtractor};
use crate::error::Result;
use crate::normalize::{normalize, truncate_chars};
use crate::odometer::OdometerExtractor;
use crate::parts::PartDetector;
use crate::quantity::QuantityExtractor;
use crate::summary::summarize;
use crate::types::ParseResult;
use std::sync::OnceLock;
use tracing::{debug, instrument, warn};

#[derive(Debug)]
pub struct ServiceParser {
    config: ParserConfig,
    catalog: Catalog,
    quantities: QuantityExtractor,
    detector: PartDetector,
    costs: CostExtractor,
    odometer: OdometerExtractor,
    scorer: ConfidenceScorer,
}

impl ServiceParser {
    pub fn new() -> Result<Self> {
        Self::with_config(ParserConfig::default())
    }

    pub fn with_config(config: ParserConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            catalog: Catalog::build(&config)?,
            quantities: QuantityExtractor::new()?,
            detector: PartDetector::new()?,
            costs: CostExtractor::new()?,
            odometer: OdometerExtractor::new()?,
            scorer: ConfidenceScorer::new()?,
            config,
        })
    }

    /// Process-wide parser with the default configuration, built on first use
    pub fn shared() -> Result<&'static ServiceParser> {
        static SHARED: OnceLock<ServiceParser> = OnceLock::new();
        if let Some(parser) = SHARED.get() {
            return Ok(parser);
        }
        let parser = ServiceParser::new()?;
        Ok(SHARED.get_or_init(|| parser))
    }

    pub fn config(&self) -> &ParserConfig {
        &self.config
    }

    /// Parse one transcript into a service draft. Never fails.
    #[instrument(skip_all, fields(len = transcript.len()))]
    pub fn parse(&self, transcript: &str) -> ParseResult {
        if transcript.trim().is_empty() {
            debug!("empty transcript");
            return ParseResult::empty(transcript);
        }

        let input = truncate_chars(transcript, self.config.max_input_chars);
        if input.len() < transcript.len() {
            warn!(
                max_chars = self.config.max_input_chars,
                "transcript truncated before parsing"
            );
        }

        let lowered = input.to_lowercase();
        let text = normalize(input);

        let service_type = classify(&self.catalog, &text);
        debug!(%service_type, "classified");

        let detected = self.detector.detect(&self.catalog, &self.quantities, &text);
        debug!(
            replaced = detected.replaced.len(),
            repaired = detected.repaired.len(),
            "parts detected"
        );

        let labor_cost = self.costs.labor_cost(&text);
        let parts_cost = self.costs.parts_cost(&text);
        let stated_total = self.costs.total_cost(&text);
        debug!(labor_cost, parts_cost, stated_total, "costs extracted");

        let odometer_reading = self.odometer.odometer(&text);
        let date_info = self.odometer.date_info(&text);

        let confidence_score = self.scorer.score(&ConfidenceInputs {
            lowered: &lowered,
            normalized: &text,
            parts_found: detected.len(),
            total_cost: stated_total,
            odometer: odometer_reading,
        });

        let work_summary = summarize(
            service_type,
            &detected.replaced,
            &detected.repaired,
            stated_total,
        );

        let total_cost = if stated_total > 0.0 {
            stated_total
        } else if !detected.is_empty() {
            let estimate = estimate_total(
                &self.config,
                &detected.replaced,
                &detected.repaired,
                labor_cost,
            );
            debug!(estimate, "no total stated, estimated from catalog prices");
            estimate
        } else {
            labor_cost + parts_cost
        };

        // Replaced parts only; repairs are reported separately
        let raw_parts_found = detected.replaced.iter().map(|p| p.name.clone()).collect();

        let parsed_successfully = confidence_score > self.config.success_threshold;
        debug!(confidence_score, parsed_successfully, "transcript parsed");

        ParseResult {
            transcript: transcript.to_string(),
            service_type,
            parts_replaced: detected.replaced,
            parts_repaired: detected.repaired,
            labor_cost,
            parts_cost,
            total_cost,
            odometer_reading,
            date_info,
            work_summary,
            confidence_score,
            parsed_successfully,
            raw_parts_found,
        }
    }

    /// `parse` serialized as JSON
    pub fn parse_json(&self, transcript: &str) -> Result<String> {
        Ok(serde_json::to_string(&self.parse(transcript))?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ServiceType;

    fn parser() -> ServiceParser {
        ServiceParser::new().unwrap()
    }

    #[test]
    fn test_parser_is_shareable() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<ServiceParser>();
    }

    #[test]
    fn test_shared_parser_is_built_once() {
        let first = ServiceParser::shared().unwrap();
        let second = ServiceParser::shared().unwrap();
        assert!(std::ptr::eq(first, second));
        assert_eq!(first.config(), &ParserConfig::default());
    }

    #[test]
    fn test_raw_parts_lists_replaced_only() {
        let result = parser().parse("replaced the battery. fixed the alternator");
        assert_eq!(result.raw_parts_found, vec!["Battery".to_string()]);
        assert_eq!(result.parts_repaired[0].name, "Alternator");
    }

    #[test]
    fn test_empty_transcript_short_circuits() {
        let result = parser().parse("   ");
        assert_eq!(result, ParseResult::empty("   "));
        assert!(!result.parsed_successfully);
        assert_eq!(result.confidence_score, 0.0);
    }

    #[test]
    fn test_estimates_total_when_not_stated() {
        let result = parser().parse("installed a new battery");
        assert_eq!(result.parts_replaced.len(), 1);
        assert_eq!(result.parts_replaced[0].id, "battery");
        // 2500 + labor max(750, 500)
        assert_eq!(result.total_cost, 3250.0);
        assert_eq!(result.work_summary, "Regular Service. Replaced: Battery");
    }

    #[test]
    fn test_total_falls_back_to_scoped_costs_without_parts() {
        let result = parser().parse("labour 400 for the visit");
        assert!(result.parts_replaced.is_empty());
        assert_eq!(result.labor_cost, 400.0);
        assert_eq!(result.total_cost, 400.0);
    }

    #[test]
    fn test_unmatched_text_is_not_successful() {
        let result = parser().parse("hello");
        assert_eq!(result.service_type, ServiceType::RegularService);
        assert!((result.confidence_score - 0.3).abs() < 1e-9);
        assert!(!result.parsed_successfully);
        assert_eq!(result.work_summary, "Regular Service performed");
    }

    #[test]
    fn test_long_transcript_is_truncated() {
        let config = ParserConfig {
            max_input_chars: 20,
            ..ParserConfig::default()
        };
        let parser = ServiceParser::with_config(config).unwrap();
        let transcript = "replaced the battery and then much later changed the spark plugs";
        let result = parser.parse(transcript);
        assert_eq!(result.transcript, transcript);
        assert!(result.all_parts().all(|p| p.id != "spark_plug"));
    }

    #[test]
    fn test_invalid_config_is_rejected() {
        let config = ParserConfig {
            proximity_window: 0,
            ..ParserConfig::default()
        };
        assert!(ServiceParser::with_config(config).is_err());
    }

    #[test]
    fn test_parse_json() {
        let json = parser().parse_json("changed engine oil").unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["service_type"], "regular_service");
        assert_eq!(value["parts_replaced"][0]["name"], "Engine Oil");
        assert_eq!(value["parts_replaced"][0]["detection_method"], "action_proximity");
    }
}
