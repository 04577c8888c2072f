use std::collections::BTreeSet;

use crate::fields::{FieldId, FieldValues};

/// The six fields coerced to finite numbers.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ValidatedRequest {
    pub area_m2: f64,
    pub volume_m3: f64,
    pub outdoor_area_m2: f64,
    pub bathroom_count: f64,
    pub room_count: f64,
    pub floor_count: f64,
}

impl ValidatedRequest {
    pub fn get(&self, field: FieldId) -> f64 {
        match field {
            FieldId::AreaM2 => self.area_m2,
            FieldId::VolumeM3 => self.volume_m3,
            FieldId::OutdoorAreaM2 => self.outdoor_area_m2,
            FieldId::BathroomCount => self.bathroom_count,
            FieldId::RoomCount => self.room_count,
            FieldId::FloorCount => self.floor_count,
        }
    }
}

/// Fields whose text did not coerce to a finite number. Never empty when
/// returned from [`validate`].
pub type InvalidFields = BTreeSet<FieldId>;

/// Parse one raw field value. Surrounding whitespace is ignored; empty text,
/// non-numeric text, NaN and infinities are all rejected.
pub fn parse_field(raw: &str) -> Option<f64> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    trimmed.parse::<f64>().ok().filter(|n| n.is_finite())
}

pub fn validate(values: &FieldValues) -> Result<ValidatedRequest, InvalidFields> {
    let mut parsed = [0.0_f64; 6];
    let mut invalid = InvalidFields::new();

    for (field, raw) in values.iter() {
        match parse_field(raw) {
            Some(n) => parsed[field.index()] = n,
            None => {
                invalid.insert(field);
            }
        }
    }

    if !invalid.is_empty() {
        return Err(invalid);
    }

    let [area_m2, volume_m3, outdoor_area_m2, bathroom_count, room_count, floor_count] = parsed;
    Ok(ValidatedRequest {
        area_m2,
        volume_m3,
        outdoor_area_m2,
        bathroom_count,
        room_count,
        floor_count,
    })
}
