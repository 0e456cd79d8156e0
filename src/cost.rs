//! Cost extraction: scoped labor/parts costs, the stated total, and a fallback
//! estimate from catalog prices when nothing was stated.

use crate::catalog::phrase;
use crate::config::ParserConfig;
use crate::error::{compile, Result};
use crate::types::ExtractedPart;
use regex::{Captures, Regex};
use std::ops::RangeInclusive;

/// Any extracted amount outside this range is noise
pub const VALID_AMOUNT: RangeInclusive<f64> = 10.0..=1_000_000.0;

/// Amounts in this range earn a confidence bonus
pub const PLAUSIBLE_TOTAL: RangeInclusive<f64> = 100.0..=100_000.0;

pub const LABOR_KEYWORDS: &[&str] = &["labor", "labour", "work", "service", "charge", "fee"];
pub const PARTS_KEYWORDS: &[&str] = &["parts", "spares", "components", "material"];

/// Amount with optional thousands separators and decimals
const AMOUNT: &str = r"((?:\d{1,3}(?:,\d{3})+|\d+)(?:\.\d+)?)";

/// Currency prefix
const CURRENCY: &str = r"(?:\brupees|\brs\.?|\binr|₹|\$)";

fn parse_amount(raw: &str) -> Option<f64> {
    let cleaned = raw.replace(',', "");
    cleaned.parse::<f64>().ok().filter(|v| v.is_finite())
}

fn valid_amount(raw: &str) -> Option<f64> {
    parse_amount(raw).filter(|v| VALID_AMOUNT.contains(v))
}

/// In-range amount from capture group 1, unless a distance unit follows it
/// ("rupees 45000 km" is a reading, not a price)
fn captured_amount(caps: &Captures<'_>, text: &str, distance: &Regex) -> Option<f64> {
    let m = caps.get(1)?;
    if distance.is_match(&text[m.end()..]) {
        return None;
    }
    valid_amount(m.as_str())
}

/// Cascade of patterns anchored to one set of scope keywords
#[derive(Debug)]
struct ScopedCascade {
    patterns: Vec<Regex>,
}

impl ScopedCascade {
    fn build(keywords: &[&str]) -> Result<Self> {
        let mut patterns = Vec::with_capacity(keywords.len() * 3);
        for keyword in keywords {
            let kw = phrase(keyword);
            let context = format!("cost scope `{keyword}`");
            for source in [
                format!(
                    r"\b{kw}\s*(?:cost|charges?|fees?)?\s*(?:is|was|of)?\s*[:\-]?\s*(?:{CURRENCY}\s*)?{AMOUNT}"
                ),
                format!(
                    r"(?:{CURRENCY}\s*)?\b{AMOUNT}\s*(?:rupees\s+)?(?:for|on)\s+(?:the\s+)?{kw}\b"
                ),
                format!(r"\b{kw}\s*{CURRENCY}\s*{AMOUNT}"),
            ] {
                patterns.push(compile(&context, &source)?);
            }
        }
        Ok(Self { patterns })
    }

    /// First in-range amount, or 0.0
    fn first_amount(&self, text: &str, distance: &Regex) -> f64 {
        for pattern in &self.patterns {
            for caps in pattern.captures_iter(text) {
                if let Some(amount) = captured_amount(&caps, text, distance) {
                    return amount;
                }
            }
        }
        0.0
    }
}

/// Compiled cost cascades, built once per parser
#[derive(Debug)]
pub struct CostExtractor {
    total: Vec<Regex>,
    distance: Regex,
    labor: ScopedCascade,
    parts: ScopedCascade,
}

impl CostExtractor {
    pub fn new() -> Result<Self> {
        let sources = [
            format!(
                r"\btotal\s*(?:cost|bill|amount)?\s*(?:is|was|of)?\s*[:\-]?\s*(?:{CURRENCY}\s*)?{AMOUNT}"
            ),
            format!(r"{CURRENCY}\s*{AMOUNT}\s*(?:in\s+total|total|altogether)"),
            format!(r"\bcosts?\s*(?:is|of|was)?\s*[:\-]?\s*(?:{CURRENCY}\s*)?{AMOUNT}"),
            format!(r"\b{AMOUNT}\s*(?:rupees|rs|inr)\b"),
            format!(r"{CURRENCY}\s*{AMOUNT}"),
            format!(r"\bcharged\s*(?:{CURRENCY}\s*)?{AMOUNT}"),
            format!(r"\bbill\s*(?:of|for|is|was)?\s*[:\-]?\s*(?:{CURRENCY}\s*)?{AMOUNT}"),
        ];
        let total = sources
            .iter()
            .map(|source| compile("total cost", source))
            .collect::<Result<Vec<_>>>()?;

        Ok(Self {
            total,
            distance: compile("cost distance filter", r"^\s*(?:km|kms|kilomet(?:er|re)s?)\b")?,
            labor: ScopedCascade::build(LABOR_KEYWORDS)?,
            parts: ScopedCascade::build(PARTS_KEYWORDS)?,
        })
    }

    pub fn labor_cost(&self, text: &str) -> f64 {
        self.labor.first_amount(text, &self.distance)
    }

    pub fn parts_cost(&self, text: &str) -> f64 {
        self.parts.first_amount(text, &self.distance)
    }

    /// Largest in-range amount mentioned anywhere, or 0.0.
    ///
    /// The largest figure is taken as the grand total since itemized costs are
    /// smaller. A discounted total stated alongside a larger sub-cost is
    /// misread; this is a known limitation kept for compatibility.
    pub fn total_cost(&self, text: &str) -> f64 {
        self.total
            .iter()
            .flat_map(|pattern| pattern.captures_iter(text))
            .filter_map(|caps| captured_amount(&caps, text, &self.distance))
            .fold(0.0, f64::max)
    }
}

/// Estimate a total from catalog prices when none was stated.
///
/// Replaced parts count at full price, repaired parts at `repair_cost_ratio`.
/// A stated labor cost is added as is; otherwise labor is estimated as the
/// larger of `labor_estimate_ratio` of the parts subtotal and `min_labor_estimate`.
pub fn estimate_total(
    config: &ParserConfig,
    replaced: &[ExtractedPart],
    repaired: &[ExtractedPart],
    labor_cost: f64,
) -> f64 {
    let parts_subtotal: f64 = replaced.iter().map(ExtractedPart::total_price).sum::<f64>()
        + repaired
            .iter()
            .map(|p| p.total_price() * config.repair_cost_ratio)
            .sum::<f64>();

    let mut total = labor_cost + parts_subtotal;
    if labor_cost == 0.0 && total > 0.0 {
        total += (total * config.labor_estimate_ratio).max(config.min_labor_estimate);
    }
    (total * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{DetectionMethod, PartAction};

    fn extractor() -> CostExtractor {
        CostExtractor::new().unwrap()
    }

    fn part(id: &str, price: f64, quantity: u32, action: PartAction) -> ExtractedPart {
        ExtractedPart {
            id: id.to_string(),
            name: id.to_string(),
            category: "Test".to_string(),
            estimated_price: price,
            action,
            quantity,
            detection_method: DetectionMethod::ActionProximity,
        }
    }

    #[test]
    fn test_total_from_rupees_suffix() {
        let text = "changed oil filter and engine oil for 1200 rupees at 15000 kilometers";
        assert_eq!(extractor().total_cost(text), 1200.0);
    }

    #[test]
    fn test_total_takes_largest_amount() {
        let text = "labor 1000, parts 3000, total 4000 rupees";
        assert_eq!(extractor().total_cost(text), 4000.0);
    }

    #[test]
    fn test_currency_prefix_and_separators() {
        assert_eq!(extractor().total_cost("paid rs. 1,500 for the battery"), 1500.0);
        assert_eq!(extractor().total_cost("bill of ₹2,250.50"), 2250.5);
        assert_eq!(extractor().total_cost("charged $45"), 45.0);
    }

    #[test]
    fn test_out_of_range_amounts_are_dropped() {
        assert_eq!(extractor().total_cost("5000000"), 0.0);
        assert_eq!(extractor().total_cost("5000000 rupees"), 0.0);
        assert_eq!(extractor().total_cost("cost 5 rupees"), 0.0);
    }

    #[test]
    fn test_bare_numbers_are_not_costs() {
        assert_eq!(extractor().total_cost("odometer at 45000 kilometers"), 0.0);
    }

    #[test]
    fn test_distance_after_currency_is_not_a_cost() {
        let costs = extractor();
        assert_eq!(costs.total_cost("replaced battery for 2500 rupees 45000 km"), 2500.0);
        assert_eq!(costs.total_cost("paid rupees 1800 45000 kilometers"), 1800.0);
        assert_eq!(costs.total_cost("rs 45000 kms"), 0.0);
    }

    #[test]
    fn test_words_ending_in_rs_are_not_currency() {
        assert_eq!(extractor().total_cost("took 3 hours 200 minutes"), 0.0);
    }

    #[test]
    fn test_scoped_costs() {
        let text = "labor 1000, parts 3000, total 4000 rupees";
        let costs = extractor();
        assert_eq!(costs.labor_cost(text), 1000.0);
        assert_eq!(costs.parts_cost(text), 3000.0);
    }

    #[test]
    fn test_scoped_cost_for_keyword() {
        let costs = extractor();
        assert_eq!(costs.labor_cost("paid 800 rupees for labour"), 800.0);
        assert_eq!(costs.parts_cost("no prices mentioned"), 0.0);
    }

    #[test]
    fn test_estimate_with_labor_floor() {
        let config = ParserConfig::default();
        let replaced = vec![part("engine_oil", 500.0, 1, PartAction::Replaced)];
        // 500 parts + max(150, 500) labor
        assert_eq!(estimate_total(&config, &replaced, &[], 0.0), 1000.0);
    }

    #[test]
    fn test_estimate_with_ratio_labor_and_repairs() {
        let config = ParserConfig::default();
        let replaced = vec![part("tire", 2000.0, 4, PartAction::Replaced)];
        let repaired = vec![part("alternator", 3000.0, 1, PartAction::Repaired)];
        // 8000 + 1500 = 9500 parts, labor 0.3 * 9500 = 2850
        assert_eq!(estimate_total(&config, &replaced, &repaired, 0.0), 12350.0);
    }

    #[test]
    fn test_estimate_keeps_stated_labor() {
        let config = ParserConfig::default();
        let replaced = vec![part("battery", 2500.0, 1, PartAction::Replaced)];
        assert_eq!(estimate_total(&config, &replaced, &[], 300.0), 2800.0);
    }
}
