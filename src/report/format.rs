//! Formatted terminal output.
//!
//! We keep formatting code in one place so:
//! - the pipeline stays free of presentation concerns
//! - the CLI and the TUI show costs the same way

use crate::app::pipeline::PredictionOutcome;
use crate::domain::registry;

/// Width of the text bars in the risk table.
const BAR_WIDTH: usize = 20;

/// Format a cost in rupees with Indian digit grouping (`₹ 1,23,456`).
///
/// Whole amounts print without a fraction. Anything else keeps two decimals,
/// or its full digits when two decimals would make it look whole. Never
/// rounds to a whole rupee.
pub fn format_inr(amount: f64) -> String {
    if !amount.is_finite() {
        return "₹ -".to_string();
    }
    let abs = amount.abs();
    let text = if abs.fract() == 0.0 {
        format!("{abs:.0}")
    } else {
        let fixed = format!("{abs:.2}");
        if fixed.ends_with(".00") { format!("{abs}") } else { fixed }
    };
    let (digits, fraction) = match text.split_once('.') {
        Some((whole, frac)) => (whole, Some(frac)),
        None => (text.as_str(), None),
    };
    let sign = if amount < 0.0 && abs > 0.0 { "-" } else { "" };
    let fraction = fraction.map(|f| format!(".{f}")).unwrap_or_default();

    format!("₹ {sign}{}{fraction}", group_indian(digits))
}

/// `1234567` -> `12,34,567`: last three digits, then pairs.
fn group_indian(digits: &str) -> String {
    if digits.len() <= 3 {
        return digits.to_string();
    }

    let (head, last3) = digits.split_at(digits.len() - 3);
    let mut groups: Vec<&str> = Vec::new();
    let mut end = head.len();
    while end > 2 {
        groups.push(&head[end - 2..end]);
        end -= 2;
    }
    groups.push(&head[..end]);
    groups.reverse();

    format!("{},{last3}", groups.join(","))
}

/// Multi-line report for `premium predict`.
pub fn format_outcome(outcome: &PredictionOutcome) -> String {
    let mut out = String::new();

    out.push_str("=== premium - Health Insurance Cost Estimate ===\n");
    out.push_str(&format!(
        "Predicted cost: {}\n",
        format_inr(outcome.prediction.value())
    ));
    out.push_str(&format!(
        "Band: {} ({})\n",
        outcome.metrics.cost_band.label(),
        outcome.metrics.cost_band.message()
    ));

    out.push_str("\nInputs:\n");
    for (field, value) in outcome.input.iter() {
        out.push_str(&format!("  {:<22} {value}\n", field.name()));
    }

    out.push_str("\nRisk profile:\n");
    out.push_str(&format_risk_bars(outcome));
    out
}

fn format_risk_bars(outcome: &PredictionOutcome) -> String {
    let mut out = String::new();
    for (axis, value) in outcome.metrics.risk_vector.axes() {
        let filled = ((value.clamp(0.0, 1.0) * BAR_WIDTH as f64).round()) as usize;
        out.push_str(&format!(
            "  {axis:<15} {:<width$} {value:.2}\n",
            "#".repeat(filled),
            width = BAR_WIDTH
        ));
    }
    out
}

/// Table of every field and its allowed values (`premium fields`).
pub fn format_registry() -> String {
    let mut out = String::new();
    out.push_str(&format!("{:<22} {:<12} {}\n", "field", "kind", "allowed"));
    out.push_str(&format!("{:-<22} {:-<12} {:-<7}\n", "", "", ""));
    for spec in registry() {
        out.push_str(&format!(
            "{:<22} {:<12} {}\n",
            spec.name,
            spec.kind().to_string(),
            spec.domain.describe()
        ));
    }
    out
}
