//! Human-readable text for transcript entries.

use crate::fields::FieldId;
use crate::prediction::PredictionResult;
use crate::validate::ValidatedRequest;

pub const WELCOME: &str = "Hi! Fill in the six housing attributes and press Enter.\n\
I'll predict the monthly rent in Amsterdam with a ±€50 band.";

/// Restate the submitted values, one per line.
pub fn user_message(request: &ValidatedRequest) -> String {
    FieldId::ALL
        .iter()
        .map(|field| {
            let value = request.get(*field);
            match field.unit() {
                Some(unit) => format!("{}: {} {}", field.label(), value, unit),
                None => format!("{}: {}", field.label(), value),
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn assistant_message(result: &PredictionResult) -> String {
    format!(
        "Predicted rent: {} / month\nBand: {} – {} ({})",
        euros(result.predicted_eur()),
        euros(result.interval_low_eur()),
        euros(result.interval_high_eur()),
        result.interval_type().description(),
    )
}

/// Whole euros, the way the amounts are shown to the user. Halves round away
/// from zero; `{:.0}` alone would round them to even.
pub fn euros(amount: f64) -> String {
    format!("€{:.0}", amount.round())
}
