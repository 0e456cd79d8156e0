//! Part detection
//!
//! Four strategies each propose candidate parts from the normalized text:
//!
//! 1. action proximity: a catalog pattern hits and an action verb of the
//!    requested kind sits next to the part's primary keyword
//! 2. list items: the tail after "with", "including", "replaced", ... is split
//!    on commas / "and" / "&" and each item is looked up in the catalog
//! 3. context rules: full-service bundle, tire alignment/balancing, and
//!    commonly paired parts
//! 4. implied phrases: "oil change", "brake job", "full service", ...
//!
//! Candidates are concatenated in that order and reduced by [`dedupe`], which
//! keeps the first occurrence of every part id.

use crate::catalog::{Catalog, PartCatalogEntry};
use crate::error::{compile, Result};
use crate::quantity::QuantityExtractor;
use crate::types::{DetectionMethod, ExtractedPart, PartAction};
use ahash::AHashSet;
use regex::Regex;
use tracing::trace;

/// Parts implied by a full service
pub const FULL_SERVICE_BUNDLE: &[&str] = &["engine_oil", "oil_filter", "air_filter"];

const FULL_SERVICE_PHRASES: &[&str] = &["full service", "complete service", "major service"];

/// Words that close a list tail
const LIST_END: &str =
    r"(?:\.|;|\bfor\b|\bat\b|\brupees\b|\brs\b|\btotal\b|\bcost\b|\blabou?r\b|$)";

const LIST_INTROS: &[&str] = &[
    r"\b(?:with|including)\s+",
    r"\b(?:replaced|changed)\s+",
    r"\b(?:full|complete|major)\s+service\s+(?:with\s+)?",
    r"\bservice\s+(?:with\s+)?",
];

/// Items shorter than this are ignored during list lookup
const MIN_ITEM_CHARS: usize = 3;

#[derive(Debug, Clone, Copy)]
enum Implied {
    Part(&'static str),
    FullServiceBundle,
}

const IMPLIED_PHRASES: &[(&str, Implied)] = &[
    (r"\boils?\s+change", Implied::Part("engine_oil")),
    (r"\boil\s+and\s+filter\b", Implied::Part("oil_filter")),
    (r"\bnew\s+battery\b", Implied::Part("battery")),
    (r"\bfilter\s+change", Implied::Part("oil_filter")),
    (r"\bbrake\s+service\b", Implied::Part("brake_pad")),
    (r"\bbrake\s+job\b", Implied::Part("brake_pad")),
    (r"\bfull\s+service\b", Implied::FullServiceBundle),
    (r"\bt[iy]re\s+rotation\b", Implied::Part("tire")),
    (r"\bwheel\s+service\b", Implied::Part("wheel_alignment")),
];

/// Deduplicated replaced and repaired parts
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DetectedParts {
    pub replaced: Vec<ExtractedPart>,
    pub repaired: Vec<ExtractedPart>,
}

impl DetectedParts {
    pub fn len(&self) -> usize {
        self.replaced.len() + self.repaired.len()
    }

    pub fn is_empty(&self) -> bool {
        self.replaced.is_empty() && self.repaired.is_empty()
    }
}

/// Compiled rule tables for the detection strategies
#[derive(Debug)]
pub struct PartDetector {
    list_patterns: Vec<Regex>,
    item_separator: Regex,
    alignment_words: Regex,
    implied: Vec<(Regex, Implied)>,
}

impl PartDetector {
    pub fn new() -> Result<Self> {
        let list_patterns = LIST_INTROS
            .iter()
            .map(|intro| compile("list extraction", &format!("{intro}(.+?){LIST_END}")))
            .collect::<Result<Vec<_>>>()?;

        let implied = IMPLIED_PHRASES
            .iter()
            .map(|(source, hint)| compile("implied parts", source).map(|re| (re, *hint)))
            .collect::<Result<Vec<_>>>()?;

        Ok(Self {
            list_patterns,
            item_separator: compile("list extraction", r"\s*,\s*|\s+and\s+|\s*&\s*")?,
            alignment_words: compile("tire context", r"balancing|alignment")?,
            implied,
        })
    }

    /// Run every strategy in order and deduplicate each list independently
    pub fn detect(
        &self,
        catalog: &Catalog,
        quantities: &QuantityExtractor,
        text: &str,
    ) -> DetectedParts {
        let mut replaced =
            self.by_action_proximity(catalog, quantities, text, PartAction::Replaced);
        let repaired = self.by_action_proximity(catalog, quantities, text, PartAction::Repaired);
        trace!(replaced = replaced.len(), repaired = repaired.len(), "action proximity");

        let listed = self.from_lists(catalog, quantities, text);
        trace!(count = listed.len(), "list items");
        replaced.extend(listed);

        let inferred = self.from_context(catalog, text, &replaced);
        trace!(count = inferred.len(), "context rules");
        replaced.extend(inferred);

        let implied = self.from_implied_phrases(catalog, quantities, text);
        trace!(count = implied.len(), "implied phrases");
        replaced.extend(implied);

        DetectedParts {
            replaced: dedupe(replaced),
            repaired: dedupe(repaired),
        }
    }

    /// Strategy 1
    fn by_action_proximity(
        &self,
        catalog: &Catalog,
        quantities: &QuantityExtractor,
        text: &str,
        action: PartAction,
    ) -> Vec<ExtractedPart> {
        catalog
            .parts()
            .iter()
            .filter(|part| part.mentioned_in(text) && part.acted_on(text, action))
            .map(|part| {
                let quantity = quantities.extract(text, part);
                part.to_extracted(action, quantity, DetectionMethod::ActionProximity)
            })
            .collect()
    }

    /// Strategy 2
    fn from_lists(
        &self,
        catalog: &Catalog,
        quantities: &QuantityExtractor,
        text: &str,
    ) -> Vec<ExtractedPart> {
        let mut found = Vec::new();
        for pattern in &self.list_patterns {
            for caps in pattern.captures_iter(text) {
                let Some(tail) = caps.get(1) else {
                    continue;
                };
                for item in self.item_separator.split(tail.as_str()) {
                    let item = item.trim();
                    if item.chars().count() < MIN_ITEM_CHARS {
                        continue;
                    }
                    if let Some(part) = best_part_for_item(catalog, item) {
                        let quantity = quantities.extract(text, part);
                        found.push(part.to_extracted(
                            PartAction::Replaced,
                            quantity,
                            DetectionMethod::ListItem,
                        ));
                    }
                }
            }
        }
        found
    }

    /// Strategy 3. Only adds parts, and only ones not already in `existing`.
    fn from_context(
        &self,
        catalog: &Catalog,
        text: &str,
        existing: &[ExtractedPart],
    ) -> Vec<ExtractedPart> {
        let mut added: Vec<ExtractedPart> = Vec::new();
        let known = |id: &str, added: &[ExtractedPart]| {
            existing.iter().chain(added.iter()).any(|p| p.id == id)
        };

        if FULL_SERVICE_PHRASES.iter().any(|p| text.contains(p)) {
            for &id in FULL_SERVICE_BUNDLE {
                if let Some(part) = catalog.part(id) {
                    if !known(id, &added) {
                        added.push(part.to_extracted(
                            PartAction::Replaced,
                            1,
                            DetectionMethod::FullServiceContext,
                        ));
                    }
                }
            }
        }

        let tire_mentioned = existing.iter().any(|p| p.id == "tire")
            || text.contains("tire")
            || text.contains("tyre");
        if tire_mentioned && self.alignment_words.is_match(text) {
            for id in ["wheel_alignment", "wheel_balancing"] {
                if let Some(part) = catalog.part(id) {
                    if !known(id, &added) {
                        added.push(part.to_extracted(
                            PartAction::Replaced,
                            1,
                            DetectionMethod::TireContext,
                        ));
                    }
                }
            }
        }

        for detected in existing {
            let Some(entry) = catalog.part(&detected.id) else {
                continue;
            };
            for &partner in entry.common_with {
                if let Some(part) = catalog.part(partner) {
                    if !known(partner, &added) {
                        added.push(part.to_extracted(
                            PartAction::Replaced,
                            1,
                            DetectionMethod::CommonPairing,
                        ));
                    }
                }
            }
        }

        added
    }

    /// Strategy 4. Kept apart from the context rules even where both yield the
    /// full-service bundle; the reducer drops the overlap.
    fn from_implied_phrases(
        &self,
        catalog: &Catalog,
        quantities: &QuantityExtractor,
        text: &str,
    ) -> Vec<ExtractedPart> {
        let mut found = Vec::new();
        for (pattern, hint) in &self.implied {
            if !pattern.is_match(text) {
                continue;
            }
            match hint {
                Implied::Part(id) => {
                    if let Some(part) = catalog.part(id) {
                        let quantity = quantities.extract(text, part);
                        found.push(part.to_extracted(
                            PartAction::Replaced,
                            quantity,
                            DetectionMethod::ImpliedPhrase,
                        ));
                    }
                }
                Implied::FullServiceBundle => {
                    for id in FULL_SERVICE_BUNDLE {
                        if let Some(part) = catalog.part(id) {
                            found.push(part.to_extracted(
                                PartAction::Replaced,
                                1,
                                DetectionMethod::ImpliedFullService,
                            ));
                        }
                    }
                }
            }
        }
        found
    }
}

/// The part whose contained keyword is longest; ties go to catalog order
fn best_part_for_item<'c>(catalog: &'c Catalog, item: &str) -> Option<&'c PartCatalogEntry> {
    let mut best: Option<(&PartCatalogEntry, usize)> = None;
    for part in catalog.parts() {
        if let Some(len) = part.longest_keyword_in(item) {
            if best.map_or(true, |(_, best_len)| len > best_len) {
                best = Some((part, len));
            }
        }
    }
    best.map(|(part, _)| part)
}

/// Keep the first occurrence of each part id, preserving order
pub fn dedupe(parts: Vec<ExtractedPart>) -> Vec<ExtractedPart> {
    let mut seen = AHashSet::with_capacity(parts.len());
    parts.into_iter().filter(|p| seen.insert(p.id.clone())).collect()
}
