//! Heuristic confidence score for a whole extraction

use crate::cost::PLAUSIBLE_TOTAL;
use crate::error::{compile, Result};
use regex::Regex;

pub const BASE_CONFIDENCE: f64 = 0.3;

const PART_WEIGHT: f64 = 0.15;
const MAX_PART_BONUS: f64 = 0.4;
const COST_BONUS: f64 = 0.2;
const PLAUSIBLE_COST_BONUS: f64 = 0.05;
const ODOMETER_BONUS: f64 = 0.1;
const KEYWORD_WEIGHT: f64 = 0.02;
const MAX_KEYWORD_BONUS: f64 = 0.15;

/// Words whose presence suggests a well-formed service transcript
const QUALITY_KEYWORDS: &[&str] = &[
    "replaced", "changed", "service", "cost", "rupees", "km", "filter", "oil", "brake", "tire",
];

const ACTION_WORDS: &[&str] = &["replaced", "changed", "fixed", "installed", "checked"];
const SERVICE_CONTEXT_WORDS: &[&str] = &["service", "maintenance", "repair", "inspection"];

/// Everything the scorer looks at
#[derive(Debug, Clone, Copy)]
pub struct ConfidenceInputs<'a> {
    /// Lower-cased transcript before abbreviation expansion
    pub lowered: &'a str,
    pub normalized: &'a str,
    pub parts_found: usize,
    pub total_cost: f64,
    pub odometer: Option<u32>,
}

/// Scores extractions with precompiled keyword matchers
#[derive(Debug)]
pub struct ConfidenceScorer {
    quality: Vec<Regex>,
}

impl ConfidenceScorer {
    pub fn new() -> Result<Self> {
        let quality = QUALITY_KEYWORDS
            .iter()
            .map(|kw| compile("confidence keywords", &format!(r"\b{kw}\b")))
            .collect::<Result<Vec<_>>>()?;
        Ok(Self { quality })
    }

    /// Score in [0, 1]
    pub fn score(&self, inputs: &ConfidenceInputs<'_>) -> f64 {
        let mut confidence = BASE_CONFIDENCE;

        if inputs.parts_found > 0 {
            confidence += (inputs.parts_found as f64 * PART_WEIGHT).min(MAX_PART_BONUS);
        }

        if inputs.total_cost > 0.0 {
            confidence += COST_BONUS;
            if PLAUSIBLE_TOTAL.contains(&inputs.total_cost) {
                confidence += PLAUSIBLE_COST_BONUS;
            }
        }

        if inputs.odometer.is_some() {
            confidence += ODOMETER_BONUS;
        }

        // A keyword counts if the speaker used it or normalization produced it
        let keyword_count = self
            .quality
            .iter()
            .filter(|kw| kw.is_match(inputs.lowered) || kw.is_match(inputs.normalized))
            .count();
        confidence += (keyword_count as f64 * KEYWORD_WEIGHT).min(MAX_KEYWORD_BONUS);

        let word_count = inputs.normalized.split_whitespace().count();
        if word_count > 10 {
            confidence += 0.1;
        } else if word_count > 5 {
            confidence += 0.05;
        }

        if ACTION_WORDS.iter().any(|w| inputs.normalized.contains(w)) {
            confidence += 0.05;
        }

        if SERVICE_CONTEXT_WORDS.iter().any(|w| inputs.normalized.contains(w)) {
            confidence += 0.05;
        }

        confidence.clamp(0.0, 1.0)
    }
}
