//! The six housing attributes as the user types them.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifies one of the six form fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldId {
    AreaM2,
    VolumeM3,
    OutdoorAreaM2,
    BathroomCount,
    RoomCount,
    FloorCount,
}

impl FieldId {
    /// All fields in form order.
    pub const ALL: [FieldId; 6] = [
        FieldId::AreaM2,
        FieldId::VolumeM3,
        FieldId::OutdoorAreaM2,
        FieldId::BathroomCount,
        FieldId::RoomCount,
        FieldId::FloorCount,
    ];

    pub fn key(&self) -> &'static str {
        match self {
            FieldId::AreaM2 => "area_m2",
            FieldId::VolumeM3 => "volume_m3",
            FieldId::OutdoorAreaM2 => "outdoor_area_m2",
            FieldId::BathroomCount => "bathroom_count",
            FieldId::RoomCount => "room_count",
            FieldId::FloorCount => "floor_count",
        }
    }

    /// Resolve a string key. Unknown keys are an error here, never at lookup time.
    pub fn from_key(key: &str) -> Result<Self, FieldKeyError> {
        FieldId::ALL
            .into_iter()
            .find(|field| field.key() == key)
            .ok_or_else(|| FieldKeyError(key.to_string()))
    }

    pub fn label(&self) -> &'static str {
        match self {
            FieldId::AreaM2 => "Living area",
            FieldId::VolumeM3 => "Volume",
            FieldId::OutdoorAreaM2 => "Outdoor space",
            FieldId::BathroomCount => "Bathrooms",
            FieldId::RoomCount => "Rooms",
            FieldId::FloorCount => "Floors",
        }
    }

    pub fn unit(&self) -> Option<&'static str> {
        match self {
            FieldId::AreaM2 | FieldId::OutdoorAreaM2 => Some("m²"),
            FieldId::VolumeM3 => Some("m³"),
            _ => None,
        }
    }

    pub fn index(&self) -> usize {
        *self as usize
    }
}

impl fmt::Display for FieldId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown field key: {0:?}")]
pub struct FieldKeyError(pub String);

/// Raw text for every field. Each field always has a value, possibly empty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldValues {
    area_m2: String,
    volume_m3: String,
    outdoor_area_m2: String,
    bathroom_count: String,
    room_count: String,
    floor_count: String,
}

impl Default for FieldValues {
    /// A typical Amsterdam two-bedroom flat.
    fn default() -> Self {
        Self {
            area_m2: "75".to_string(),
            volume_m3: "210".to_string(),
            outdoor_area_m2: "8".to_string(),
            bathroom_count: "1".to_string(),
            room_count: "3".to_string(),
            floor_count: "2".to_string(),
        }
    }
}

impl FieldValues {
    /// All six fields empty.
    pub fn empty() -> Self {
        Self {
            area_m2: String::new(),
            volume_m3: String::new(),
            outdoor_area_m2: String::new(),
            bathroom_count: String::new(),
            room_count: String::new(),
            floor_count: String::new(),
        }
    }

    /// Build from `(key, value)` pairs; fields not mentioned start empty.
    pub fn from_pairs<'a, I>(pairs: I) -> Result<Self, FieldKeyError>
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        let mut values = Self::empty();
        for (key, value) in pairs {
            values.set(FieldId::from_key(key)?, value);
        }
        Ok(values)
    }

    pub fn area_m2(&self) -> &str {
        &self.area_m2
    }

    pub fn volume_m3(&self) -> &str {
        &self.volume_m3
    }

    pub fn outdoor_area_m2(&self) -> &str {
        &self.outdoor_area_m2
    }

    pub fn bathroom_count(&self) -> &str {
        &self.bathroom_count
    }

    pub fn room_count(&self) -> &str {
        &self.room_count
    }

    pub fn floor_count(&self) -> &str {
        &self.floor_count
    }

    pub fn get(&self, field: FieldId) -> &str {
        match field {
            FieldId::AreaM2 => &self.area_m2,
            FieldId::VolumeM3 => &self.volume_m3,
            FieldId::OutdoorAreaM2 => &self.outdoor_area_m2,
            FieldId::BathroomCount => &self.bathroom_count,
            FieldId::RoomCount => &self.room_count,
            FieldId::FloorCount => &self.floor_count,
        }
    }

    pub fn set(&mut self, field: FieldId, value: impl Into<String>) {
        let slot = match field {
            FieldId::AreaM2 => &mut self.area_m2,
            FieldId::VolumeM3 => &mut self.volume_m3,
            FieldId::OutdoorAreaM2 => &mut self.outdoor_area_m2,
            FieldId::BathroomCount => &mut self.bathroom_count,
            FieldId::RoomCount => &mut self.room_count,
            FieldId::FloorCount => &mut self.floor_count,
        };
        *slot = value.into();
    }

    /// Iterate `(field, raw text)` in form order.
    pub fn iter(&self) -> impl Iterator<Item = (FieldId, &str)> + '_ {
        FieldId::ALL.into_iter().map(move |field| (field, self.get(field)))
    }
}
