//! Batch regression evaluation of the rule set against labelled transcripts

use crate::parser::ServiceParser;
use crate::types::ParseResult;
use ahash::AHashSet;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Costs closer than this count as a match
const COST_TOLERANCE: f64 = 0.01;

/// One labelled transcript
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvaluationCase {
    pub input: String,
    #[serde(default)]
    pub expected_parts: Vec<String>,
    #[serde(default)]
    pub expected_cost: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CaseReport {
    pub input: String,
    pub parsed: ParseResult,
    pub expected_parts: Vec<String>,
    pub expected_cost: f64,
    /// Percentage of expected part names that were detected
    pub parts_accuracy: f64,
    pub cost_match: bool,
    pub confidence: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvaluationSummary {
    pub total_tests: usize,
    pub average_parts_accuracy: f64,
    /// Percentage of cases whose total cost matched
    pub cost_accuracy: f64,
    pub average_confidence: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvaluationReport {
    pub results: Vec<CaseReport>,
    pub summary: EvaluationSummary,
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Case-insensitive overlap of detected and expected part names, as a percentage
/// of the expected set. Two empty sets are a perfect match.
pub fn parts_accuracy(detected: &[String], expected: &[String]) -> f64 {
    let detected: AHashSet<String> = detected.iter().map(|p| p.to_lowercase()).collect();
    let expected: AHashSet<String> = expected.iter().map(|p| p.to_lowercase()).collect();

    if expected.is_empty() {
        return if detected.is_empty() { 100.0 } else { 0.0 };
    }
    let hits = expected.intersection(&detected).count();
    hits as f64 / expected.len() as f64 * 100.0
}

pub fn evaluate(parser: &ServiceParser, cases: &[EvaluationCase]) -> EvaluationReport {
    let results: Vec<CaseReport> = cases
        .iter()
        .map(|case| {
            let parsed = parser.parse(&case.input);
            let found: Vec<String> = parsed.all_parts().map(|p| p.name.clone()).collect();
            let parts_accuracy = parts_accuracy(&found, &case.expected_parts);
            let cost_match = (parsed.total_cost - case.expected_cost).abs() < COST_TOLERANCE;
            let confidence = parsed.confidence_score;
            CaseReport {
                input: case.input.clone(),
                expected_parts: case.expected_parts.clone(),
                expected_cost: case.expected_cost,
                parts_accuracy: round2(parts_accuracy),
                cost_match,
                confidence,
                parsed,
            }
        })
        .collect();

    let summary = if results.is_empty() {
        EvaluationSummary {
            total_tests: 0,
            average_parts_accuracy: 0.0,
            cost_accuracy: 0.0,
            average_confidence: 0.0,
        }
    } else {
        let n = results.len() as f64;
        let matched = results.iter().filter(|r| r.cost_match).count() as f64;
        EvaluationSummary {
            total_tests: results.len(),
            average_parts_accuracy: round2(
                results.iter().map(|r| r.parts_accuracy).sum::<f64>() / n,
            ),
            cost_accuracy: round2(matched / n * 100.0),
            average_confidence: round2(results.iter().map(|r| r.confidence).sum::<f64>() / n),
        }
    };
    debug!(
        total = summary.total_tests,
        parts = summary.average_parts_accuracy,
        cost = summary.cost_accuracy,
        "evaluation finished"
    );

    EvaluationReport { results, summary }
}
