//! Reference catalogs: parts, actions and service types
//!
//! The tables below are static; `Catalog::build` compiles every pattern once
//! and the result is shared read-only by all parse calls.

use crate::config::ParserConfig;
use crate::error::{compile, Result};
use crate::quantity::QuantityPatterns;
use crate::types::{DetectionMethod, ExtractedPart, PartAction, ServiceType};
use ahash::AHashMap;
use regex::Regex;

struct PartSpec {
    id: &'static str,
    name: &'static str,
    category: &'static str,
    avg_price: f64,
    /// First keyword is the primary one used for proximity lookups
    keywords: &'static [&'static str],
    patterns: &'static [&'static str],
    common_with: &'static [&'static str],
}

const PARTS: &[PartSpec] = &[
    // Engine & fluids
    PartSpec {
        id: "engine_oil",
        name: "Engine Oil",
        category: "Fluid",
        avg_price: 500.0,
        keywords: &[
            "engine oil",
            "motor oil",
            "oil change",
            "changed oil",
            "oil replaced",
            "oil",
            "lubricant",
        ],
        patterns: &[
            r"\bengine\s+oil\b",
            r"\bmotor\s+oil\b",
            r"\boil\s+change",
            r"\bchanged\s+oil\b",
            r"\breplaced\s+oil\b",
        ],
        common_with: &["oil_filter"],
    },
    PartSpec {
        id: "oil_filter",
        name: "Oil Filter",
        category: "Filter",
        avg_price: 200.0,
        keywords: &["oil filter", "filter change", "replaced filter", "filter", "oil element"],
        patterns: &[r"\boil\s+filter", r"\bfilter\s+change", r"\breplaced\s+filter"],
        common_with: &["engine_oil", "air_filter"],
    },
    PartSpec {
        id: "air_filter",
        name: "Air Filter",
        category: "Filter",
        avg_price: 300.0,
        keywords: &["air filter", "air cleaner", "cabin filter", "air filter change", "ac filter"],
        patterns: &[r"\bair\s+filter", r"\bcabin\s+filter", r"\bac\s+filter"],
        common_with: &["engine_oil", "oil_filter"],
    },
    PartSpec {
        id: "fuel_filter",
        name: "Fuel Filter",
        category: "Filter",
        avg_price: 400.0,
        keywords: &["fuel filter", "petrol filter", "diesel filter"],
        patterns: &[r"\b(?:fuel|petrol|diesel)\s+filter"],
        common_with: &[],
    },
    PartSpec {
        id: "coolant",
        name: "Coolant",
        category: "Fluid",
        avg_price: 350.0,
        keywords: &["coolant", "anti freeze", "antifreeze", "radiator coolant", "cooling fluid"],
        patterns: &[r"\bcoolant\b", r"\banti\s*freeze\b"],
        common_with: &[],
    },
    // Brakes
    PartSpec {
        id: "brake_pad",
        name: "Brake Pads",
        category: "Brakes",
        avg_price: 800.0,
        keywords: &["brake pad", "brake pads", "pads", "front pads", "rear pads", "disc pads"],
        patterns: &[
            r"\bbrake\s+pads?\b",
            r"\bfront\s+pads\b",
            r"\brear\s+pads\b",
            r"\bdisc\s+pads\b",
        ],
        common_with: &["brake_disc", "brake_fluid"],
    },
    PartSpec {
        id: "brake_disc",
        name: "Brake Disc",
        category: "Brakes",
        avg_price: 1500.0,
        keywords: &["brake disc", "brake disk", "disc brake", "rotor", "brake rotors", "discs"],
        patterns: &[
            r"\bbrake\s+(?:disc|disk|rotor)s?\b",
            r"\bdiscs?\s+brake",
            r"\brotors?\s+brake",
        ],
        common_with: &[],
    },
    PartSpec {
        id: "brake_fluid",
        name: "Brake Fluid",
        category: "Fluid",
        avg_price: 250.0,
        keywords: &["brake fluid", "brake oil", "hydraulic fluid", "dot fluid"],
        patterns: &[r"\bbrake\s+fluid\b", r"\bbrake\s+oil\b"],
        common_with: &["brake_pad", "brake_disc"],
    },
    // Electrical
    PartSpec {
        id: "battery",
        name: "Battery",
        category: "Electrical",
        avg_price: 2500.0,
        keywords: &["battery", "accumulator", "car battery", "new battery"],
        patterns: &[r"\bbattery\b", r"\baccumulator\b"],
        common_with: &[],
    },
    PartSpec {
        id: "spark_plug",
        name: "Spark Plug",
        category: "Electrical",
        avg_price: 150.0,
        keywords: &["spark plug", "sparkplug", "ignition plug", "spark plugs"],
        patterns: &[r"\bspark\s*plugs?\b", r"\bignition\s+plugs?\b"],
        common_with: &[],
    },
    PartSpec {
        id: "alternator",
        name: "Alternator",
        category: "Electrical",
        avg_price: 3000.0,
        keywords: &["alternator", "generator"],
        patterns: &[r"\balternator\b", r"\bgenerator\b"],
        common_with: &[],
    },
    // Tires & wheels
    PartSpec {
        id: "tire",
        name: "Tire",
        category: "Tires",
        avg_price: 2000.0,
        keywords: &[
            "tire",
            "tyre",
            "tires",
            "tyres",
            "wheel",
            "wheels",
            "new tyre",
            "tire replaced",
        ],
        patterns: &[r"\btires?\b", r"\btyres?\b", r"\bwheel\s+tire\b", r"\bnew\s+(?:tire|tyre)"],
        common_with: &["wheel_alignment", "wheel_balancing"],
    },
    PartSpec {
        id: "wheel_alignment",
        name: "Wheel Alignment",
        category: "Service",
        avg_price: 300.0,
        keywords: &["wheel alignment", "alignment", "wheel align", "alignment done"],
        patterns: &[r"\bwheel\s+alignment\b", r"\balignment\b"],
        common_with: &["tire", "wheel_balancing"],
    },
    PartSpec {
        id: "wheel_balancing",
        name: "Wheel Balancing",
        category: "Service",
        avg_price: 200.0,
        keywords: &["wheel balancing", "balancing", "wheel balance", "balance wheels"],
        patterns: &[r"\bwheel\s+balancing\b", r"\bbalancing\b"],
        common_with: &["tire", "wheel_alignment"],
    },
    // AC
    PartSpec {
        id: "ac_gas",
        name: "AC Gas",
        category: "AC",
        avg_price: 800.0,
        keywords: &["ac gas", "refrigerant", "cooling gas", "ac refrigerant"],
        patterns: &[r"\bac\s+gas\b", r"\brefrigerant\b", r"\bcooling\s+gas\b"],
        common_with: &[],
    },
    // Belts
    PartSpec {
        id: "timing_belt",
        name: "Timing Belt",
        category: "Engine",
        avg_price: 3000.0,
        keywords: &["timing belt", "cambelt", "timing chain"],
        patterns: &[r"\btiming\s+(?:belt|chain)", r"\bcam\s*belt"],
        common_with: &[],
    },
    // Wipers
    PartSpec {
        id: "wiper_blade",
        name: "Wiper Blades",
        category: "Exterior",
        avg_price: 500.0,
        keywords: &["wiper blade", "wiper", "windshield wiper", "wiper blades"],
        patterns: &[r"\bwiper\s+blades?\b", r"\bwindshield\s+wipers?\b"],
        common_with: &[],
    },
];

const ACTIONS: &[(PartAction, &[&str])] = &[
    (
        PartAction::Replaced,
        &["replaced", "changed", "installed", "fitted", "put in", "new", "renewed", "substituted"],
    ),
    (
        PartAction::Repaired,
        &["repaired", "fixed", "mended", "adjusted", "tightened", "corrected", "serviced"],
    ),
    (
        PartAction::Checked,
        &["checked", "inspected", "examined", "tested", "verified", "looked at"],
    ),
    (
        PartAction::Cleaned,
        &["cleaned", "washed", "polished", "lubricated", "greased", "degreased"],
    ),
];

/// Actions the part detector asks about; only these get proximity patterns
pub const PROXIMITY_ACTIONS: &[PartAction] = &[PartAction::Replaced, PartAction::Repaired];

struct ServiceTypeSpec {
    service_type: ServiceType,
    keywords: &'static [&'static str],
    patterns: &'static [&'static str],
}

/// Priority order matters: the classifier returns the first category that matches.
const SERVICE_TYPES: &[ServiceTypeSpec] = &[
    ServiceTypeSpec {
        service_type: ServiceType::RegularService,
        keywords: &[
            "service",
            "maintenance",
            "regular",
            "periodic",
            "scheduled",
            "routine",
            "full service",
            "complete service",
        ],
        patterns: &[r"\bfull\s+service\b", r"\bcomplete\s+service\b", r"\bregular\s+service\b"],
    },
    ServiceTypeSpec {
        service_type: ServiceType::Repair,
        keywords: &[
            "repair",
            "broken",
            "damaged",
            "faulty",
            "not working",
            "issue",
            "problem",
            "fix",
        ],
        patterns: &[r"repair", r"broken", r"not\s+working"],
    },
    ServiceTypeSpec {
        service_type: ServiceType::Inspection,
        keywords: &["inspection", "check", "test", "diagnosis", "evaluation", "scan"],
        patterns: &[r"inspection", r"check", r"diagnosis"],
    },
    ServiceTypeSpec {
        service_type: ServiceType::Emergency,
        keywords: &["emergency", "urgent", "breakdown", "tow", "stranded", "immediate"],
        patterns: &[r"emergency", r"breakdown", r"urgent"],
    },
    ServiceTypeSpec {
        service_type: ServiceType::Warranty,
        keywords: &["warranty", "guarantee", "under warranty"],
        patterns: &[r"warranty", r"guarantee"],
    },
];

/// Regex source for a literal phrase, tolerant of repeated whitespace between words
pub(crate) fn phrase(text: &str) -> String {
    text.split_whitespace()
        .map(regex::escape)
        .collect::<Vec<_>>()
        .join(r"\s+")
}

/// Word-bounded alternation over a keyword list
pub(crate) fn any_word(keywords: &[&str]) -> String {
    let alternatives: Vec<String> = keywords.iter().map(|kw| phrase(kw)).collect();
    format!(r"\b(?:{})\b", alternatives.join("|"))
}

/// One serviceable part and the compiled patterns that recognise it
#[derive(Debug)]
pub struct PartCatalogEntry {
    pub id: &'static str,
    pub name: &'static str,
    pub category: &'static str,
    pub avg_price: f64,
    pub keywords: &'static [&'static str],
    pub common_with: &'static [&'static str],
    patterns: Vec<Regex>,
    proximity: Vec<(PartAction, Regex)>,
    quantity: QuantityPatterns,
}

impl PartCatalogEntry {
    /// Whether any of the part's own patterns occurs in the text
    pub fn mentioned_in(&self, text: &str) -> bool {
        self.patterns.iter().any(|p| p.is_match(text))
    }

    /// Whether an action of the given kind is applied to this part nearby.
    /// Always false for actions outside [`PROXIMITY_ACTIONS`].
    pub fn acted_on(&self, text: &str, action: PartAction) -> bool {
        self.proximity
            .iter()
            .any(|(kind, pattern)| *kind == action && pattern.is_match(text))
    }

    pub fn quantity_patterns(&self) -> &QuantityPatterns {
        &self.quantity
    }

    pub fn is_tire_family(&self) -> bool {
        self.category == "Tires"
    }

    pub fn is_brake_pad(&self) -> bool {
        self.id == "brake_pad"
    }

    /// Longest keyword of this part contained in `item`, if any
    pub fn longest_keyword_in(&self, item: &str) -> Option<usize> {
        self.keywords
            .iter()
            .filter(|kw| item.contains(*kw))
            .map(|kw| kw.len())
            .max()
    }

    pub fn to_extracted(
        &self,
        action: PartAction,
        quantity: u32,
        detection_method: DetectionMethod,
    ) -> ExtractedPart {
        ExtractedPart {
            id: self.id.to_string(),
            name: self.name.to_string(),
            category: self.category.to_string(),
            estimated_price: self.avg_price,
            action,
            quantity,
            detection_method,
        }
    }
}

/// Keyword set for one action category
#[derive(Debug)]
pub struct ActionDefinition {
    pub action: PartAction,
    pub keywords: &'static [&'static str],
}

/// Keywords and patterns for one service category
#[derive(Debug)]
pub struct ServiceTypeDefinition {
    pub service_type: ServiceType,
    patterns: Vec<Regex>,
    keywords: Regex,
}

impl ServiceTypeDefinition {
    /// Patterns first (higher precision), then plain keywords
    pub fn matches(&self, text: &str) -> bool {
        self.patterns.iter().any(|p| p.is_match(text)) || self.keywords.is_match(text)
    }
}

/// Immutable reference data shared by all parse calls
#[derive(Debug)]
pub struct Catalog {
    parts: Vec<PartCatalogEntry>,
    index: AHashMap<&'static str, usize>,
    actions: Vec<ActionDefinition>,
    service_types: Vec<ServiceTypeDefinition>,
}

impl Catalog {
    pub fn build(config: &ParserConfig) -> Result<Self> {
        let actions: Vec<ActionDefinition> = ACTIONS
            .iter()
            .map(|&(action, keywords)| ActionDefinition { action, keywords })
            .collect();

        let mut parts = Vec::with_capacity(PARTS.len());
        let mut index = AHashMap::with_capacity(PARTS.len());
        for spec in PARTS {
            let context = format!("part `{}`", spec.id);
            let patterns = spec
                .patterns
                .iter()
                .map(|p| compile(&context, p))
                .collect::<Result<Vec<_>>>()?;

            let primary = phrase(spec.keywords[0]);
            let mut proximity = Vec::with_capacity(PROXIMITY_ACTIONS.len());
            for definition in actions.iter().filter(|a| PROXIMITY_ACTIONS.contains(&a.action)) {
                let verbs = any_word(definition.keywords);
                // "<verb> ... <part>" within one sentence, or "<part> (was) <verb>"
                let before = format!(
                    r"{verbs}[^.]{{0,{window}}}?\b{primary}(?:s|es)?\b",
                    window = config.proximity_window,
                );
                let after =
                    format!(r"\b{primary}(?:s|es)?\s+(?:(?:was|were|is|are|got|been)\s+)*{verbs}");
                let source = format!("{before}|{after}");
                proximity.push((definition.action, compile(&context, &source)?));
            }

            index.insert(spec.id, parts.len());
            parts.push(PartCatalogEntry {
                id: spec.id,
                name: spec.name,
                category: spec.category,
                avg_price: spec.avg_price,
                keywords: spec.keywords,
                common_with: spec.common_with,
                patterns,
                proximity,
                quantity: QuantityPatterns::for_keywords(spec.id, spec.keywords)?,
            });
        }

        let mut service_types = Vec::with_capacity(SERVICE_TYPES.len());
        for spec in SERVICE_TYPES {
            let context = format!("service type `{}`", spec.service_type);
            service_types.push(ServiceTypeDefinition {
                service_type: spec.service_type,
                patterns: spec
                    .patterns
                    .iter()
                    .map(|p| compile(&context, p))
                    .collect::<Result<Vec<_>>>()?,
                keywords: compile(&context, &any_word(spec.keywords))?,
            });
        }

        Ok(Self {
            parts,
            index,
            actions,
            service_types,
        })
    }

    /// Parts in catalog order
    pub fn parts(&self) -> &[PartCatalogEntry] {
        &self.parts
    }

    pub fn part(&self, id: &str) -> Option<&PartCatalogEntry> {
        self.index.get(id).map(|&i| &self.parts[i])
    }

    pub fn actions(&self) -> &[ActionDefinition] {
        &self.actions
    }

    /// Service types in classifier priority order
    pub fn service_types(&self) -> &[ServiceTypeDefinition] {
        &self.service_types
    }
}
