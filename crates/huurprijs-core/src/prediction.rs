use serde::{Deserialize, Serialize};

/// How the band around the prediction was computed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum IntervalType {
    /// Fixed width, absolute, ±50 EUR.
    #[serde(rename = "fixed_abs_50")]
    FixedAbs50,
}

impl IntervalType {
    pub fn description(&self) -> &'static str {
        match self {
            IntervalType::FixedAbs50 => "fixed ±€50",
        }
    }
}

/// Successful response of `POST /predict`.
///
/// Decoding enforces `interval_low_eur <= predicted_eur <= interval_high_eur`,
/// so a value of this type always satisfies it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawPrediction")]
pub struct PredictionResult {
    predicted_eur: f64,
    interval_low_eur: f64,
    interval_high_eur: f64,
    interval_type: IntervalType,
}

#[derive(Deserialize)]
struct RawPrediction {
    predicted_eur: f64,
    interval_low_eur: f64,
    interval_high_eur: f64,
    interval_type: IntervalType,
}

impl TryFrom<RawPrediction> for PredictionResult {
    type Error = String;

    fn try_from(raw: RawPrediction) -> Result<Self, Self::Error> {
        PredictionResult::new(
            raw.predicted_eur,
            raw.interval_low_eur,
            raw.interval_high_eur,
            raw.interval_type,
        )
    }
}

impl PredictionResult {
    pub fn new(
        predicted_eur: f64,
        interval_low_eur: f64,
        interval_high_eur: f64,
        interval_type: IntervalType,
    ) -> Result<Self, String> {
        if !(interval_low_eur <= predicted_eur && predicted_eur <= interval_high_eur) {
            return Err(format!(
                "band {interval_low_eur}..{interval_high_eur} does not contain prediction {predicted_eur}"
            ));
        }
        Ok(Self {
            predicted_eur,
            interval_low_eur,
            interval_high_eur,
            interval_type,
        })
    }

    pub fn predicted_eur(&self) -> f64 {
        self.predicted_eur
    }

    pub fn interval_low_eur(&self) -> f64 {
        self.interval_low_eur
    }

    pub fn interval_high_eur(&self) -> f64 {
        self.interval_high_eur
    }

    pub fn interval_type(&self) -> IntervalType {
        self.interval_type
    }
}
