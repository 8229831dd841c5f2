use crate::core::{AnchorRecord, QUATERNION_LEN};
use std::collections::HashSet;
use std::fmt;

/// Reasons a record is not fit to be persisted as a placed anchor
#[derive(Debug, Clone, PartialEq)]
pub enum ValidationError {
    NotPositioned { anchor_id: u32 },
    InvalidRotationLength { anchor_id: u32, length: usize },
    NonFiniteValue { anchor_id: u32, field: &'static str },
    LatitudeOutOfRange { anchor_id: u32, latitude: f64 },
    LongitudeOutOfRange { anchor_id: u32, longitude: f64 },
    DegenerateRotation { anchor_id: u32 },
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationError::NotPositioned { anchor_id } => {
                write!(f, "Anchor {} has no position set", anchor_id)
            }
            ValidationError::InvalidRotationLength { anchor_id, length } => {
                write!(f, "Anchor {} rotation has {} components, expected 0 or {}", anchor_id, length, QUATERNION_LEN)
            }
            ValidationError::NonFiniteValue { anchor_id, field } => {
                write!(f, "Anchor {} has a non-finite {}", anchor_id, field)
            }
            ValidationError::LatitudeOutOfRange { anchor_id, latitude } => {
                write!(f, "Anchor {} latitude {} is outside -90..=90 degrees", anchor_id, latitude)
            }
            ValidationError::LongitudeOutOfRange { anchor_id, longitude } => {
                write!(f, "Anchor {} longitude {} is outside -180..=180 degrees", anchor_id, longitude)
            }
            ValidationError::DegenerateRotation { anchor_id } => {
                write!(f, "Anchor {} rotation is not a usable orientation", anchor_id)
            }
        }
    }
}

impl std::error::Error for ValidationError {}

/// Check that every coordinate and rotation component is a finite number.
///
/// JSON has no encoding for NaN or infinities, so records failing this cannot
/// be written and read back.
pub fn validate_finite(record: &AnchorRecord) -> Result<(), ValidationError> {
    let anchor_id = record.id();

    let fields = [
        ("latitude", record.latitude),
        ("longitude", record.longitude),
        ("altitude", record.altitude),
    ];
    for (field, value) in fields {
        if !value.is_finite() {
            return Err(ValidationError::NonFiniteValue { anchor_id, field });
        }
    }
    if record.rotation.iter().any(|c| !c.is_finite()) {
        return Err(ValidationError::NonFiniteValue { anchor_id, field: "rotation" });
    }

    Ok(())
}

/// Check the shape of a record: rotation length and finite coordinates.
///
/// Loaded records are checked with this; it accepts unpositioned records.
pub fn validate_shape(record: &AnchorRecord) -> Result<(), ValidationError> {
    let length = record.rotation.len();
    if length != 0 && length != QUATERNION_LEN {
        return Err(ValidationError::InvalidRotationLength { anchor_id: record.id(), length });
    }

    validate_finite(record)
}

/// Check that a record describes a placed anchor on the globe.
pub fn validate_placement(record: &AnchorRecord) -> Result<(), ValidationError> {
    validate_shape(record)?;
    let anchor_id = record.id();

    if !record.is_placed() {
        return Err(ValidationError::NotPositioned { anchor_id });
    }
    if record.latitude.abs() > 90.0 {
        return Err(ValidationError::LatitudeOutOfRange { anchor_id, latitude: record.latitude });
    }
    if record.longitude.abs() > 180.0 {
        return Err(ValidationError::LongitudeOutOfRange { anchor_id, longitude: record.longitude });
    }
    if record.orientation().is_none() {
        return Err(ValidationError::DegenerateRotation { anchor_id });
    }

    Ok(())
}

/// Ids that occur more than once, in order of their second occurrence
pub fn duplicate_ids(records: &[AnchorRecord]) -> Vec<u32> {
    let mut seen = HashSet::new();
    let mut reported = HashSet::new();
    records
        .iter()
        .map(AnchorRecord::id)
        .filter(|id| !seen.insert(*id) && reported.insert(*id))
        .collect()
}
