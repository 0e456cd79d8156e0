//! Human-readable work summary

use crate::types::{ExtractedPart, ServiceType};

fn replaced_label(part: &ExtractedPart) -> String {
    if part.quantity > 1 {
        format!("{} (x{})", part.name, part.quantity)
    } else {
        part.name.clone()
    }
}

/// e.g. "Regular Service. Replaced: Brake Pads (x2), Brake Fluid Total cost: Rs3000.00"
///
/// The cost clause follows the last list with a single space.
pub fn summarize(
    service_type: ServiceType,
    replaced: &[ExtractedPart],
    repaired: &[ExtractedPart],
    total_cost: f64,
) -> String {
    if replaced.is_empty() && repaired.is_empty() {
        return format!("{} performed", service_type.label());
    }

    let mut sections = vec![service_type.label().to_string()];
    if !replaced.is_empty() {
        let names: Vec<String> = replaced.iter().map(replaced_label).collect();
        sections.push(format!("Replaced: {}", names.join(", ")));
    }
    if !repaired.is_empty() {
        let names: Vec<&str> = repaired.iter().map(|p| p.name.as_str()).collect();
        sections.push(format!("Repaired: {}", names.join(", ")));
    }
    let mut summary = sections.join(". ");
    if total_cost > 0.0 {
        summary.push_str(&format!(" Total cost: Rs{total_cost:.2}"));
    }
    summary
}
