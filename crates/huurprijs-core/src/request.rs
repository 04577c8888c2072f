use serde::Serialize;

use crate::validate::ValidatedRequest;

/// Body of `POST /predict`. Field names are fixed by the prediction service.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PredictRequest {
    pub vierkante_meter: f64,
    pub inhoud_m3: f64,
    pub buitenruimte_m2: f64,
    pub aantal_badkamers: f64,
    pub aantal_kamers: f64,
    pub aantal_woonlagen: f64,
}

impl From<&ValidatedRequest> for PredictRequest {
    fn from(request: &ValidatedRequest) -> Self {
        Self {
            vierkante_meter: request.area_m2,
            inhoud_m3: request.volume_m3,
            buitenruimte_m2: request.outdoor_area_m2,
            aantal_badkamers: request.bathroom_count,
            aantal_kamers: request.room_count,
            aantal_woonlagen: request.floor_count,
        }
    }
}

pub fn build_request(request: &ValidatedRequest) -> PredictRequest {
    PredictRequest::from(request)
}
