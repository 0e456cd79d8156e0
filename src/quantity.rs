//! Quantity extraction for detected parts

use crate::catalog::{phrase, PartCatalogEntry};
use crate::error::{compile, Result};
use regex::Regex;

#[derive(Debug, Clone, Copy)]
enum QuantityRule {
    /// Use the number in capture group 1
    Captured,
    Fixed(u32),
}

/// Keyword-anchored quantity cascade, compiled once per catalog part
#[derive(Debug)]
pub struct QuantityPatterns {
    cascade: Vec<(Regex, QuantityRule)>,
}

impl QuantityPatterns {
    /// Cascade anchored to any of the part's keywords, singular or plural
    pub fn for_keywords(part_id: &str, keywords: &[&str]) -> Result<Self> {
        let alternatives: Vec<String> = keywords.iter().map(|kw| phrase(kw)).collect();
        let kw = format!(r"(?:{})(?:s|es)?", alternatives.join("|"));
        let units = r"(?:pcs|pieces|units|sets?)";
        let sources = [
            (format!(r"\b(\d{{1,2}})\s+(?:new\s+)?{kw}\b"), QuantityRule::Captured),
            (format!(r"\b{kw}\s*(?:x|×)\s*(\d{{1,2}})\b"), QuantityRule::Captured),
            (format!(r"\ball\s+(\d{{1,2}})\s+(?:new\s+)?{kw}\b"), QuantityRule::Captured),
            (format!(r"\bboth\s+(?:front|rear)\s+{kw}\b"), QuantityRule::Fixed(2)),
            (
                format!(
                    r"\bfront\s+and\s+rear\s+{kw}\b|\b{kw}\s+(?:on\s+)?(?:both\s+)?front\s+and\s+rear\b"
                ),
                QuantityRule::Fixed(2),
            ),
            (format!(r"\b(\d{{1,2}})\s*{units}\s+(?:of\s+)?{kw}\b"), QuantityRule::Captured),
            (format!(r"\b{kw}\s*[,:\-]?\s*(\d{{1,2}})\s*{units}\b"), QuantityRule::Captured),
        ];

        let context = format!("quantity for `{part_id}`");
        let mut cascade = Vec::with_capacity(sources.len());
        for (source, rule) in sources {
            cascade.push((compile(&context, &source)?, rule));
        }
        Ok(Self { cascade })
    }

    /// First explicit quantity stated for the part, if any
    pub fn explicit(&self, text: &str) -> Option<u32> {
        for (pattern, rule) in &self.cascade {
            let Some(caps) = pattern.captures(text) else {
                continue;
            };
            match rule {
                QuantityRule::Fixed(n) => return Some(*n),
                QuantityRule::Captured => {
                    // Unparsable or zero counts fall through to the next pattern
                    let parsed = caps.get(1).and_then(|m| m.as_str().parse::<u32>().ok());
                    if let Some(n) = parsed.filter(|n| *n > 0) {
                        return Some(n);
                    }
                }
            }
        }
        None
    }
}

/// Resolves how many units of a part were serviced
#[derive(Debug)]
pub struct QuantityExtractor {
    all_tires: Regex,
    four_tires: Regex,
    front_and_rear: Regex,
    all_four: Regex,
}

impl QuantityExtractor {
    pub fn new() -> Result<Self> {
        Ok(Self {
            all_tires: compile(
                "quantity defaults",
                r"\ball\s+(?:(?:four|4)\s+)?(?:tires|tyres)\b",
            )?,
            four_tires: compile("quantity defaults", r"\b(?:4|four)\s+(?:tires|tyres)\b")?,
            front_and_rear: compile("quantity defaults", r"\bfront\s+and\s+rear\b")?,
            all_four: compile("quantity defaults", r"\ball\s+four\b")?,
        })
    }

    /// Always at least 1
    pub fn extract(&self, text: &str, part: &PartCatalogEntry) -> u32 {
        if let Some(n) = part.quantity_patterns().explicit(text) {
            return n;
        }

        if part.is_tire_family() {
            if self.all_tires.is_match(text) || self.four_tires.is_match(text) {
                return 4;
            }
            return 1;
        }

        if part.is_brake_pad() {
            if self.front_and_rear.is_match(text) {
                return 2;
            }
            if self.all_four.is_match(text) {
                return 4;
            }
        }

        1
    }
}
