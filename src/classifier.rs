//! Service-type classifier - maps a transcript onto one service category

use crate::catalog::Catalog;
use crate::types::ServiceType;

/// Phrases that force a regular service when no category matched
const FULL_SERVICE_PHRASES: &[&str] = &["full service", "complete service", "major service"];

/// Phrases that force an emergency when no category matched
const EMERGENCY_WORDS: &[&str] = &["emergency", "breakdown", "stranded", "urgent"];

/// Classify normalized text.
///
/// Categories are tried in catalog priority order (regular service, repair,
/// inspection, emergency, warranty); the first one whose patterns or keywords
/// hit wins. Falls back to the phrase heuristics, then to a regular service.
pub fn classify(catalog: &Catalog, text: &str) -> ServiceType {
    for definition in catalog.service_types() {
        if definition.matches(text) {
            return definition.service_type;
        }
    }

    if FULL_SERVICE_PHRASES.iter().any(|p| text.contains(p)) {
        return ServiceType::RegularService;
    }

    if EMERGENCY_WORDS.iter().any(|w| text.contains(w)) {
        return ServiceType::Emergency;
    }

    ServiceType::RegularService
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ParserConfig;

    fn classify_text(text: &str) -> ServiceType {
        let catalog = Catalog::build(&ParserConfig::default()).unwrap();
        classify(&catalog, text)
    }

    #[test]
    fn test_full_service() {
        assert_eq!(classify_text("full service with oil change"), ServiceType::RegularService);
    }

    #[test]
    fn test_repair() {
        assert_eq!(classify_text("alternator not working, fixed wiring"), ServiceType::Repair);
    }

    #[test]
    fn test_inspection() {
        assert_eq!(classify_text("pre-trip inspection of brakes"), ServiceType::Inspection);
    }

    #[test]
    fn test_emergency() {
        assert_eq!(classify_text("stranded on highway, towed in"), ServiceType::Emergency);
    }

    #[test]
    fn test_warranty() {
        assert_eq!(classify_text("battery swapped under warranty"), ServiceType::Warranty);
    }

    #[test]
    fn test_priority_order_prefers_regular_service() {
        // "service" (regular) outranks "breakdown" (emergency)
        assert_eq!(
            classify_text("breakdown service, replaced battery"),
            ServiceType::RegularService
        );
    }

    #[test]
    fn test_default_is_regular_service() {
        assert_eq!(classify_text("changed oil filter and engine oil"), ServiceType::RegularService);
        assert_eq!(classify_text(""), ServiceType::RegularService);
    }
}
