//! Core data types for parse results

use serde::{Deserialize, Serialize};
use std::fmt;

/// Service category assigned to a transcript
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ServiceType {
    RegularService,
    Repair,
    Inspection,
    Emergency,
    Warranty,
    Custom,
}

impl ServiceType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ServiceType::RegularService => "regular_service",
            ServiceType::Repair => "repair",
            ServiceType::Inspection => "inspection",
            ServiceType::Emergency => "emergency",
            ServiceType::Warranty => "warranty",
            ServiceType::Custom => "custom",
        }
    }

    /// Title-cased label used in work summaries ("Regular Service")
    pub fn label(&self) -> &'static str {
        match self {
            ServiceType::RegularService => "Regular Service",
            ServiceType::Repair => "Repair",
            ServiceType::Inspection => "Inspection",
            ServiceType::Emergency => "Emergency",
            ServiceType::Warranty => "Warranty",
            ServiceType::Custom => "Custom",
        }
    }
}

impl fmt::Display for ServiceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What was done to a part
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PartAction {
    Replaced,
    Repaired,
    Checked,
    Cleaned,
}

impl PartAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            PartAction::Replaced => "replaced",
            PartAction::Repaired => "repaired",
            PartAction::Checked => "checked",
            PartAction::Cleaned => "cleaned",
        }
    }
}

/// Which detection strategy produced a part. Audit only, never used for decisions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DetectionMethod {
    ActionProximity,
    ListItem,
    FullServiceContext,
    TireContext,
    CommonPairing,
    ImpliedPhrase,
    ImpliedFullService,
}

impl DetectionMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            DetectionMethod::ActionProximity => "action_proximity",
            DetectionMethod::ListItem => "list_item",
            DetectionMethod::FullServiceContext => "full_service_context",
            DetectionMethod::TireContext => "tire_context",
            DetectionMethod::CommonPairing => "common_pairing",
            DetectionMethod::ImpliedPhrase => "implied_phrase",
            DetectionMethod::ImpliedFullService => "implied_full_service",
        }
    }
}

/// A part detected in a transcript
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExtractedPart {
    pub id: String,
    pub name: String,
    pub category: String,
    pub estimated_price: f64,
    pub action: PartAction,
    pub quantity: u32,
    pub detection_method: DetectionMethod,
}

impl ExtractedPart {
    /// Price of all units, as persisted by the caller's part records
    pub fn total_price(&self) -> f64 {
        self.estimated_price * f64::from(self.quantity)
    }
}

/// Relative day mentioned in a transcript
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RelativeDay {
    Today,
    Tomorrow,
    Yesterday,
}

/// Date hints found in a transcript. Keys that could not be resolved are omitted when serialized.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateInfo {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub service_date: Option<RelativeDay>,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub has_next_service: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub specific_date: Option<String>,
}

impl DateInfo {
    pub fn is_empty(&self) -> bool {
        self.service_date.is_none() && !self.has_next_service && self.specific_date.is_none()
    }
}

/// Structured service draft produced from one transcript
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParseResult {
    pub transcript: String,
    pub service_type: ServiceType,
    pub parts_replaced: Vec<ExtractedPart>,
    pub parts_repaired: Vec<ExtractedPart>,
    pub labor_cost: f64,
    pub parts_cost: f64,
    pub total_cost: f64,
    pub odometer_reading: Option<u32>,
    pub date_info: DateInfo,
    pub work_summary: String,
    pub confidence_score: f64,
    pub parsed_successfully: bool,
    pub raw_parts_found: Vec<String>,
}

impl ParseResult {
    /// Result for an empty or whitespace-only transcript
    pub fn empty(transcript: &str) -> Self {
        Self {
            transcript: transcript.to_string(),
            service_type: ServiceType::RegularService,
            parts_replaced: Vec::new(),
            parts_repaired: Vec::new(),
            labor_cost: 0.0,
            parts_cost: 0.0,
            total_cost: 0.0,
            odometer_reading: None,
            date_info: DateInfo::default(),
            work_summary: "No transcript provided".to_string(),
            confidence_score: 0.0,
            parsed_successfully: false,
            raw_parts_found: Vec::new(),
        }
    }

    /// Replaced and repaired parts, in that order
    pub fn all_parts(&self) -> impl Iterator<Item = &ExtractedPart> {
        self.parts_replaced.iter().chain(self.parts_repaired.iter())
    }
}
